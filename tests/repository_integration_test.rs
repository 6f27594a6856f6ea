// ==========================================
// Repository 层集成测试
// ==========================================

mod helpers;

use std::sync::{Arc, Mutex};

use helpers::listing_builder::ListingBuilder;
use symbio_exchange::domain::types::ListingKind;
use symbio_exchange::repository::error::RepositoryError;
use symbio_exchange::repository::snapshot::SnapshotStore;
use symbio_exchange::logging;
use test_helpers::{create_test_db, insert_chemical, insert_hazard_pair, insert_party, open_conn, seed_reference_data};

fn reference_store() -> (tempfile::NamedTempFile, SnapshotStore) {
    let (tmp, db_path) = create_test_db().unwrap();
    let mut conn = open_conn(&db_path);
    seed_reference_data(&mut conn).unwrap();
    (tmp, SnapshotStore::from_connection(Arc::new(Mutex::new(conn))))
}

#[test]
fn test_list_active_按类型过滤() {
    let (_tmp, store) = reference_store();

    let (offers, demands) = store
        .read(|snapshot| -> Result<_, RepositoryError> {
            let listings = snapshot.listings();
            Ok((
                listings.list_active(Some(ListingKind::Offer))?,
                listings.list_active(Some(ListingKind::Demand))?,
            ))
        })
        .unwrap();

    assert_eq!(offers.len(), 5);
    assert!(offers.iter().all(|l| l.kind == ListingKind::Offer));
    assert_eq!(demands.len(), 5);
    assert_eq!(demands[0].id, 10);
}

#[test]
fn test_load_compositions_批量读取() {
    let (_tmp, store) = reference_store();

    let compositions = store
        .read(|snapshot| snapshot.listings().load_compositions(&[1, 3, 6]))
        .unwrap();

    assert_eq!(compositions[&1].len(), 10);
    assert_eq!(compositions[&3][0].chemical_id, "H2O");
    // 需求挂牌没有成分行
    assert!(!compositions.contains_key(&6));
}

#[test]
fn test_hazard_matrix_只返回不相容配对() {
    let (_tmp, db_path) = create_test_db().unwrap();
    let conn = open_conn(&db_path);
    insert_chemical(&conn, "CAO", "Calcium Oxide", "MEDIUM");
    insert_chemical(&conn, "H2O", "Water", "LOW");
    insert_chemical(&conn, "SO4", "Sulfate", "MEDIUM");
    insert_hazard_pair(&conn, "SO4", "CAO", true);
    insert_hazard_pair(&conn, "H2O", "CAO", false);

    let store = SnapshotStore::from_connection(Arc::new(Mutex::new(conn)));
    let pairs = store.read(|snapshot| snapshot.hazards().list_incompatible()).unwrap();

    assert_eq!(pairs.len(), 1);
    assert_eq!(pairs[0].pair.first(), "CAO");
    assert_eq!(pairs[0].pair.second(), "SO4");
}

#[test]
fn test_list_touching_只读取相关边() {
    let (_tmp, store) = reference_store();

    let capabilities = store
        .read(|snapshot| snapshot.capabilities().list_touching("S", "CAO"))
        .unwrap();

    let ids: Vec<i64> = capabilities.iter().map(|c| c.id).collect();
    assert_eq!(ids, vec![1, 2]);
    assert_eq!(capabilities[0].output_chemical_name, "Sulfate");
}

#[test]
fn test_find_by_id_时间格式损坏() {
    // 初始化日志系统
    logging::init_test();

    let (_tmp, db_path) = create_test_db().unwrap();
    let conn = open_conn(&db_path);
    insert_chemical(&conn, "SIO2", "Silicon Dioxide", "LOW");
    let owner = insert_party(&conn, "Broken Clock Co", "Cement", "Nowhere");
    let listing_id = ListingBuilder::offer(owner, "Mystery Ash")
        .created_at("last tuesday")
        .component("SIO2", 10.0)
        .insert(&conn);

    let store = SnapshotStore::from_connection(Arc::new(Mutex::new(conn)));
    let result = store.read(|snapshot| snapshot.listings().find_by_id(listing_id));

    match result {
        Err(RepositoryError::DataCorruption { field, .. }) => {
            assert_eq!(field, "listings.created_at");
        }
        other => panic!("Expected DataCorruption, got {:?}", other),
    }
}

#[test]
fn test_find_by_id_不存在返回none() {
    let (_tmp, store) = reference_store();

    let result = store.read(|snapshot| snapshot.listings().find_by_id(42)).unwrap();
    assert!(result.is_none());
}
