// ==========================================
// 工业固废交换 - 挂牌实体
// ==========================================
// 职责: 挂牌、挂牌方、成分表、验收标准
// 约束: OFFER 只有成分表, DEMAND 只有验收标准（建档时保证）
// ==========================================

use crate::domain::types::{HazardTier, ListingKind, ListingStatus};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

// ==========================================
// Party - 挂牌方（企业）
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Party {
    pub id: i64,
    pub name: String,
    pub industry_type: String,
    pub location: String,
}

// ==========================================
// Listing - 挂牌
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    pub id: i64,
    pub owner: Party,
    pub kind: ListingKind,
    pub material_name: String,
    pub total_quantity: f64,
    pub status: ListingStatus,
    pub created_at: NaiveDateTime,
}

impl Listing {
    pub fn is_active_offer(&self) -> bool {
        self.status.is_active() && self.kind == ListingKind::Offer
    }

    pub fn is_active_demand(&self) -> bool {
        self.status.is_active() && self.kind == ListingKind::Demand
    }

    /// 最新优先的排序比较：created_at 倒序，同一时刻 id 倒序
    pub fn newest_first_cmp(&self, other: &Listing) -> Ordering {
        other
            .created_at
            .cmp(&self.created_at)
            .then_with(|| other.id.cmp(&self.id))
    }
}

/// 按创建时间倒序排列（同一时刻按 id 倒序，保证结果稳定）
pub fn sort_newest_first(listings: &mut [Listing]) {
    listings.sort_by(Listing::newest_first_cmp);
}

// ==========================================
// CompositionEntry - 成分表行
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositionEntry {
    pub listing_id: i64,
    pub chemical_id: String,
    pub chemical_name: String,
    pub hazard_tier: HazardTier,
    pub percentage: f64, // [0, 100]
}

// ==========================================
// AcceptanceCriterion - 验收标准
// ==========================================
// 缺省的上/下限表示该侧不约束
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AcceptanceCriterion {
    pub id: i64,
    pub listing_id: i64,
    pub chemical_id: String,
    pub chemical_name: String,
    pub min_percentage: Option<f64>,
    pub max_percentage: Option<f64>,
}

impl AcceptanceCriterion {
    /// 判断某个含量是否落在 [min, max] 闭区间内
    pub fn accepts(&self, percentage: f64) -> bool {
        let above_min = self.min_percentage.map_or(true, |min| percentage >= min);
        let below_max = self.max_percentage.map_or(true, |max| percentage <= max);
        above_min && below_max
    }
}
