use crate::app::state::AppState;

use super::common::{map_api_error, map_join_error, to_json};

// ==========================================
// 主数据 / 挂牌浏览命令
// ==========================================

/// 查询化学成分主数据
pub async fn list_chemicals(state: &AppState) -> Result<String, String> {
    let master_api = state.master_api.clone();
    let result = tokio::task::spawn_blocking(move || {
        let _perf = crate::perf::PerfGuard::new("cmd.list_chemicals");
        master_api.list_chemicals()
    })
    .await
    .map_err(map_join_error)?
    .map_err(map_api_error)?;

    to_json(&result)
}

/// 查询全部 ACTIVE 挂牌
pub async fn list_active_listings(state: &AppState) -> Result<String, String> {
    let listing_api = state.listing_api.clone();
    let result = tokio::task::spawn_blocking(move || {
        let _perf = crate::perf::PerfGuard::new("cmd.list_active_listings");
        listing_api.list_active_listings()
    })
    .await
    .map_err(map_join_error)?
    .map_err(map_api_error)?;

    to_json(&result)
}

/// 查询某个挂牌方的 ACTIVE 挂牌
pub async fn list_listings_by_owner(state: &AppState, owner_id: i64) -> Result<String, String> {
    let listing_api = state.listing_api.clone();
    let result = tokio::task::spawn_blocking(move || {
        let _perf = crate::perf::PerfGuard::new("cmd.list_listings_by_owner");
        listing_api.list_listings_by_owner(owner_id)
    })
    .await
    .map_err(map_join_error)?
    .map_err(map_api_error)?;

    to_json(&result)
}
