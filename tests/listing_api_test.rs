// ==========================================
// MasterApi / ListingApi 集成测试
// ==========================================

mod helpers;

use helpers::listing_builder::ListingBuilder;
use symbio_exchange::api::ApiError;
use symbio_exchange::logging;
use test_helpers::{create_reference_state, create_test_db, open_conn};
use symbio_exchange::app::AppState;

#[test]
fn test_list_chemicals_按名称排序() {
    let (_tmp, _path, state) = create_reference_state().unwrap();

    let chemicals = state.master_api.list_chemicals().unwrap();
    assert_eq!(chemicals.len(), 17);
    assert_eq!(chemicals[0].name, "Aluminum Oxide");
    assert_eq!(chemicals[0].id, "AL2O3");
    assert_eq!(chemicals[16].name, "Zinc");

    let mercury = chemicals.iter().find(|c| c.id == "HG").unwrap();
    assert_eq!(mercury.hazard_level, "HIGH");
}

#[test]
fn test_list_active_listings_正常查询() {
    // 初始化日志系统
    logging::init_test();

    let (_tmp, _path, state) = create_reference_state().unwrap();

    let listings = state.listing_api.list_active_listings().unwrap();
    let ids: Vec<i64> = listings.iter().map(|l| l.id).collect();
    assert_eq!(ids, (1..=10).rev().collect::<Vec<_>>());

    // 需求挂牌带验收标准（按成分名称排序），供给挂牌带成分表
    let metal_recovery = &listings[0];
    assert_eq!(metal_recovery.kind, "DEMAND");
    assert!(metal_recovery.composition.is_empty());
    let names: Vec<&str> = metal_recovery
        .criteria
        .iter()
        .map(|c| c.chemical_name.as_str())
        .collect();
    assert_eq!(names, vec!["Cadmium", "Chromium", "Copper", "Lead", "Nickel", "Zinc"]);
    assert_eq!(metal_recovery.criteria[0].min_percentage, Some(1.0));
    assert_eq!(metal_recovery.criteria[0].max_percentage, None);

    let mill_dust = listings.iter().find(|l| l.id == 5).unwrap();
    assert_eq!(mill_dust.composition[0].chemical_id, "FE2O3");
    assert_eq!(mill_dust.composition[1].chemical_id, "ZN");
    assert!(mill_dust.criteria.is_empty());
    assert_eq!(mill_dust.created_at, "2026-02-01 08:04:00");
}

#[test]
fn test_list_active_listings_排除关闭挂牌() {
    let (_tmp, db_path, state) = create_reference_state().unwrap();
    let conn = open_conn(&db_path);

    ListingBuilder::offer(1, "Sold Out Ash")
        .status("CLOSED")
        .component("SIO2", 50.0)
        .insert(&conn);

    let listings = state.listing_api.list_active_listings().unwrap();
    assert_eq!(listings.len(), 10);
}

#[test]
fn test_list_listings_by_owner_正常查询() {
    let (_tmp, _path, state) = create_reference_state().unwrap();

    // Tata Steel: 炉渣(2) / 粉尘(5) / 铁料需求(8)
    let listings = state.listing_api.list_listings_by_owner(3).unwrap();
    let ids: Vec<i64> = listings.iter().map(|l| l.id).collect();
    assert_eq!(ids, vec![8, 5, 2]);
    assert!(listings.iter().all(|l| l.owner_name == "Tata Steel Jamshedpur"));
}

#[test]
fn test_list_listings_by_owner_挂牌方不存在() {
    let (_tmp, _path, state) = create_reference_state().unwrap();

    let result = state.listing_api.list_listings_by_owner(999);
    assert!(matches!(result, Err(ApiError::NotFound(_))));

    let invalid = state.listing_api.list_listings_by_owner(0);
    assert!(matches!(invalid, Err(ApiError::InvalidInput(_))));
}

#[test]
fn test_empty_database_返回空列表() {
    let (_tmp, db_path) = create_test_db().unwrap();
    let state = AppState::new(db_path).unwrap();

    assert!(state.master_api.list_chemicals().unwrap().is_empty());
    assert!(state.listing_api.list_active_listings().unwrap().is_empty());
}
