use crate::api::dto::{FilterListingsRequest, FindProcessorsRequest, MatchBuyersRequest};
use crate::app::state::AppState;

use super::common::{map_api_error, map_join_error, to_json};

// ==========================================
// 撮合检索命令
// ==========================================

/// 按成分条件筛选 OFFER
pub async fn filter_listings(
    state: &AppState,
    request: FilterListingsRequest,
) -> Result<String, String> {
    let search_api = state.search_api.clone();
    let result = tokio::task::spawn_blocking(move || {
        let _perf = crate::perf::PerfGuard::new("cmd.filter_listings");
        search_api.filter_listings(&request)
    })
    .await
    .map_err(map_join_error)?
    .map_err(map_api_error)?;

    to_json(&result)
}

/// 为供给挂牌撮合买方（附危险告警）
pub async fn match_buyers(
    state: &AppState,
    request: MatchBuyersRequest,
) -> Result<String, String> {
    let search_api = state.search_api.clone();
    let result = tokio::task::spawn_blocking(move || {
        let _perf = crate::perf::PerfGuard::new("cmd.match_buyers");
        search_api.match_buyers(&request)
    })
    .await
    .map_err(map_join_error)?
    .map_err(map_api_error)?;

    to_json(&result)
}

/// 搜索处理商路径
pub async fn find_processors(
    state: &AppState,
    request: FindProcessorsRequest,
) -> Result<String, String> {
    let search_api = state.search_api.clone();
    let result = tokio::task::spawn_blocking(move || {
        let _perf = crate::perf::PerfGuard::new("cmd.find_processors");
        search_api.find_processors(&request)
    })
    .await
    .map_err(map_join_error)?
    .map_err(map_api_error)?;

    to_json(&result)
}
