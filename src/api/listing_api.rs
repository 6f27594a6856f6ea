// ==========================================
// 工业固废交换 - 挂牌浏览 API
// ==========================================
// 职责: ACTIVE 挂牌列表（全部 / 按挂牌方）
// 输出: 挂牌 + 成分表（含量倒序）+ 验收标准（名称升序）
// ==========================================

use std::sync::Arc;
use tracing::{debug, instrument};

use crate::api::dto::ListingView;
use crate::api::error::{report_failure, ApiError, ApiResult};
use crate::domain::listing::Listing;
use crate::repository::listing_repo::ListingRepository;
use crate::repository::snapshot::SnapshotStore;

pub struct ListingApi {
    store: Arc<SnapshotStore>,
}

impl ListingApi {
    pub fn new(store: Arc<SnapshotStore>) -> Self {
        Self { store }
    }

    /// 查询全部 ACTIVE 挂牌（OFFER + DEMAND），最新创建的在前
    #[instrument(skip(self))]
    pub fn list_active_listings(&self) -> ApiResult<Vec<ListingView>> {
        self.store
            .read(|snapshot| -> ApiResult<_> {
                let listings = snapshot.listings();
                let active = listings.list_active(None)?;
                attach_details(&listings, active)
            })
            .map_err(|e| report_failure("list_active_listings", e))
    }

    /// 查询某个挂牌方的 ACTIVE 挂牌
    ///
    /// # 返回
    /// - Err(InvalidInput): owner_id 非法
    /// - Err(NotFound): 挂牌方不存在
    #[instrument(skip(self), fields(owner_id = owner_id))]
    pub fn list_listings_by_owner(&self, owner_id: i64) -> ApiResult<Vec<ListingView>> {
        if owner_id <= 0 {
            return Err(report_failure(
                "list_listings_by_owner",
                ApiError::InvalidInput(format!("ownerId 非法: {}", owner_id)),
            ));
        }

        self.store
            .read(|snapshot| -> ApiResult<_> {
                let listings = snapshot.listings();
                if !listings.party_exists(owner_id)? {
                    return Err(ApiError::NotFound(format!("挂牌方(id={})不存在", owner_id)));
                }
                let owned = listings.list_active_by_owner(owner_id)?;
                attach_details(&listings, owned)
            })
            .map_err(|e| report_failure("list_listings_by_owner", e))
    }
}

/// 批量加载成分表与验收标准并组装视图
fn attach_details(
    listings: &ListingRepository<'_>,
    rows: Vec<Listing>,
) -> ApiResult<Vec<ListingView>> {
    let ids: Vec<i64> = rows.iter().map(|l| l.id).collect();
    let compositions = listings.load_compositions(&ids)?;
    let criteria = listings.load_criteria(&ids)?;
    debug!(listings = rows.len(), "挂牌详情已加载");

    Ok(rows
        .iter()
        .map(|listing| {
            ListingView::from_parts(
                listing,
                compositions.get(&listing.id).map(Vec::as_slice).unwrap_or(&[]),
                criteria.get(&listing.id).map(Vec::as_slice).unwrap_or(&[]),
            )
        })
        .collect())
}
