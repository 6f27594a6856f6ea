// ==========================================
// SearchApi 集成测试
// ==========================================
// 覆盖: 成分筛选 / 处理商路径搜索
// ==========================================

mod helpers;

use helpers::listing_builder::ListingBuilder;
use symbio_exchange::api::dto::{FilterClauseRequest, FilterListingsRequest, FindProcessorsRequest};
use symbio_exchange::api::ApiError;
use symbio_exchange::logging;
use test_helpers::{create_reference_state, insert_capability, open_conn};

fn clause(chemical_id: &str, operator: &str, threshold: f64) -> FilterClauseRequest {
    FilterClauseRequest {
        chemical_id: chemical_id.to_string(),
        operator: operator.to_string(),
        threshold,
    }
}

fn filters(clauses: Vec<FilterClauseRequest>) -> FilterListingsRequest {
    FilterListingsRequest { filters: clauses }
}

fn route_request(input: &str, output: &str) -> FindProcessorsRequest {
    FindProcessorsRequest {
        input_chemical_id: Some(input.to_string()),
        output_chemical_id: Some(output.to_string()),
    }
}

// ==========================================
// 成分筛选
// ==========================================

#[test]
fn test_filter_listings_正常查询() {
    // 初始化日志系统
    logging::init_test();

    let (_tmp, _path, state) = create_reference_state().unwrap();

    let result = state
        .search_api
        .filter_listings(&filters(vec![
            clause("SIO2", ">=", 50.0),
            clause("S", "<=", 1.0),
            clause("PB", "<=", 0.1),
        ]))
        .unwrap();

    assert_eq!(result.len(), 1);
    let fly_ash = &result[0];
    assert_eq!(fly_ash.id, 1);
    assert_eq!(fly_ash.kind, "OFFER");
    assert_eq!(fly_ash.owner_name, "NTPC Dadri");
    // 返回完整成分表，按含量倒序
    assert_eq!(fly_ash.composition.len(), 10);
    assert_eq!(fly_ash.composition[0].chemical_id, "SIO2");
    assert_eq!(fly_ash.composition[9].chemical_id, "PB");
    assert!(fly_ash.criteria.is_empty());
}

#[test]
fn test_filter_listings_多条命中按创建时间倒序() {
    let (_tmp, _path, state) = create_reference_state().unwrap();

    // 飞灰(1) / 炉渣(2) / 底灰(4) 都含 AL2O3 > 10
    let result = state
        .search_api
        .filter_listings(&filters(vec![clause("AL2O3", ">", 10.0)]))
        .unwrap();

    let ids: Vec<i64> = result.iter().map(|l| l.id).collect();
    assert_eq!(ids, vec![4, 2, 1]);
}

#[test]
fn test_filter_listings_缺少成分视为不满足() {
    let (_tmp, _path, state) = create_reference_state().unwrap();

    // 即使是 "< 100"，没有 HG 行的挂牌也不满足
    let result = state
        .search_api
        .filter_listings(&filters(vec![clause("HG", "<", 100.0)]))
        .unwrap();

    let ids: Vec<i64> = result.iter().map(|l| l.id).collect();
    assert_eq!(ids, vec![3]);
}

#[test]
fn test_filter_listings_等号精确比较() {
    let (_tmp, _path, state) = create_reference_state().unwrap();

    let exact = state
        .search_api
        .filter_listings(&filters(vec![clause("CAO", "=", 42.3)]))
        .unwrap();
    assert_eq!(exact.len(), 1);
    assert_eq!(exact[0].id, 2);

    let near = state
        .search_api
        .filter_listings(&filters(vec![clause("CAO", "=", 42.30001)]))
        .unwrap();
    assert!(near.is_empty());
}

#[test]
fn test_filter_listings_排除需求与关闭挂牌() {
    let (_tmp, db_path, state) = create_reference_state().unwrap();
    let conn = open_conn(&db_path);

    ListingBuilder::offer(1, "Closed Fly Ash Lot")
        .status("CLOSED")
        .component("SIO2", 70.0)
        .insert(&conn);

    let result = state
        .search_api
        .filter_listings(&filters(vec![clause("SIO2", ">=", 60.0)]))
        .unwrap();
    assert!(result.is_empty());
}

#[test]
fn test_filter_listings_非法运算符() {
    let (_tmp, _path, state) = create_reference_state().unwrap();

    let result = state.search_api.filter_listings(&filters(vec![
        clause("SIO2", ">=", 50.0),
        clause("S", "LIKE", 1.0),
    ]));

    match result {
        Err(ApiError::InvalidOperator { index, operator }) => {
            assert_eq!(index, 1);
            assert_eq!(operator, "LIKE");
        }
        other => panic!("Expected InvalidOperator, got {:?}", other),
    }
}

#[test]
fn test_filter_listings_空条件集() {
    let (_tmp, _path, state) = create_reference_state().unwrap();

    let result = state.search_api.filter_listings(&filters(vec![]));
    assert!(matches!(result, Err(ApiError::EmptyFilterSet)));
}

// ==========================================
// 处理商路径
// ==========================================

#[test]
fn test_find_processors_两跳路径() {
    // 初始化日志系统
    logging::init_test();

    let (_tmp, _path, state) = create_reference_state().unwrap();

    let response = state.search_api.find_processors(&route_request("S", "CAO")).unwrap();

    assert!(response.direct_paths.is_empty());
    assert_eq!(response.two_hop_paths.len(), 1);
    assert_eq!(response.total_routes, 1);

    let path = &response.two_hop_paths[0];
    assert_eq!(path.step1_id, 1);
    assert_eq!(path.step2_id, 2);
    assert_eq!(path.intermediate_chemical_id, "SO4");
    assert_eq!(path.intermediate_chemical, "Sulfate");
    assert_eq!(path.processor1_name, "GreenProcess Technologies");
    assert_eq!(path.hops, 2);
    assert!((path.total_efficiency - 0.7176).abs() < 1e-9);
}

#[test]
fn test_find_processors_直接路径() {
    let (_tmp, _path, state) = create_reference_state().unwrap();

    let response = state.search_api.find_processors(&route_request("PB", "SIO2")).unwrap();

    assert_eq!(response.direct_paths.len(), 1);
    assert!(response.two_hop_paths.is_empty());
    let path = &response.direct_paths[0];
    assert_eq!(path.capability_id, 3);
    assert_eq!(path.input_name, "Lead");
    assert_eq!(path.output_name, "Silicon Dioxide");
    assert_eq!(path.efficiency, 0.65);
    assert_eq!(path.hops, 1);
}

#[test]
fn test_find_processors_直接与两跳并存() {
    let (_tmp, db_path, state) = create_reference_state().unwrap();
    let conn = open_conn(&db_path);

    // 另一家处理商也能把 S 转成 SO4，并有一条 S → CAO 直达
    let alt_first = insert_capability(&conn, 1, "S", "SO4", 0.5);
    let direct = insert_capability(&conn, 1, "S", "CAO", 0.6);

    let response = state.search_api.find_processors(&route_request("S", "CAO")).unwrap();

    assert_eq!(response.direct_paths.len(), 1);
    assert_eq!(response.direct_paths[0].capability_id, direct);

    let pairs: Vec<(i64, i64)> = response
        .two_hop_paths
        .iter()
        .map(|p| (p.step1_id, p.step2_id))
        .collect();
    assert_eq!(pairs, vec![(1, 2), (alt_first, 2)]);
    assert!((response.two_hop_paths[1].total_efficiency - 0.39).abs() < 1e-9);
    assert_eq!(response.total_routes, 3);
}

#[test]
fn test_find_processors_同一处理商串联两步() {
    let (_tmp, db_path, state) = create_reference_state().unwrap();
    let conn = open_conn(&db_path);

    // Tata Steel 自己完成 ZN → CU → NI
    let first = insert_capability(&conn, 3, "ZN", "CU", 0.8);
    let second = insert_capability(&conn, 3, "CU", "NI", 0.5);

    let response = state.search_api.find_processors(&route_request("ZN", "NI")).unwrap();

    assert!(response.direct_paths.is_empty());
    assert_eq!(response.two_hop_paths.len(), 1);
    let path = &response.two_hop_paths[0];
    assert_eq!((path.step1_id, path.step2_id), (first, second));
    assert_eq!(path.processor1_id, 3);
    assert_eq!(path.processor1_id, path.processor2_id);
    assert_eq!(path.intermediate_chemical_id, "CU");
    assert!((path.total_efficiency - 0.4).abs() < 1e-9);
}

#[test]
fn test_find_processors_无路径不是错误() {
    let (_tmp, _path, state) = create_reference_state().unwrap();

    let response = state.search_api.find_processors(&route_request("N", "S")).unwrap();
    assert_eq!(response.total_routes, 0);
    assert!(response.direct_paths.is_empty());
    assert!(response.two_hop_paths.is_empty());

    // 未登记的成分代码同样返回空结果
    let unknown = state.search_api.find_processors(&route_request("XYZ", "CAO")).unwrap();
    assert_eq!(unknown.total_routes, 0);
}

#[test]
fn test_find_processors_输入输出相同() {
    let (_tmp, _path, state) = create_reference_state().unwrap();

    let result = state.search_api.find_processors(&route_request("S", "S"));
    assert!(matches!(result, Err(ApiError::SameChemical(ref id)) if id == "S"));
}

#[test]
fn test_find_processors_缺少成分代码() {
    let (_tmp, _path, state) = create_reference_state().unwrap();

    let result = state.search_api.find_processors(&FindProcessorsRequest {
        input_chemical_id: Some("S".to_string()),
        output_chemical_id: Some("   ".to_string()),
    });
    assert!(matches!(result, Err(ApiError::InvalidInput(_))));
}
