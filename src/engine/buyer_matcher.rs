// ==========================================
// 工业固废交换 - 买方撮合引擎
// ==========================================
// 输入: 一个 OFFER 的成分表 + 候选 DEMAND 及其验收标准
// 输出: 全部验收标准都满足的 ACTIVE DEMAND
// 红线:
// - 没有任何验收标准的 DEMAND 永不命中
// - 区间判定为闭区间 [min, max]，缺省一侧视为无约束
// ==========================================

use crate::domain::listing::{AcceptanceCriterion, CompositionEntry, Listing};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ==========================================
// SupplyProfile - 供给成分索引
// ==========================================
/// chemical_id → 该成分在供给中的含量
#[derive(Debug, Clone, Default)]
pub struct SupplyProfile {
    by_chemical: HashMap<String, Vec<f64>>,
}

impl SupplyProfile {
    pub fn from_composition(composition: &[CompositionEntry]) -> Self {
        let mut by_chemical: HashMap<String, Vec<f64>> = HashMap::new();
        for entry in composition {
            by_chemical
                .entry(entry.chemical_id.clone())
                .or_default()
                .push(entry.percentage);
        }
        Self { by_chemical }
    }

    /// 供给中是否有该成分且含量落在标准区间内
    pub fn satisfies(&self, criterion: &AcceptanceCriterion) -> bool {
        self.by_chemical
            .get(&criterion.chemical_id)
            .map_or(false, |values| values.iter().any(|&pct| criterion.accepts(pct)))
    }

    pub fn is_empty(&self) -> bool {
        self.by_chemical.is_empty()
    }
}

// ==========================================
// CriteriaTally - 验收标准计数
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CriteriaTally {
    pub satisfied: usize,
    pub total: usize,
}

impl CriteriaTally {
    /// 至少一条标准，且全部满足
    pub fn is_full_match(&self) -> bool {
        self.total > 0 && self.satisfied == self.total
    }
}

/// 撮合命中的需求挂牌
#[derive(Debug, Clone, PartialEq)]
pub struct BuyerMatch {
    pub demand: Listing,
    pub criteria: Vec<AcceptanceCriterion>,
    pub tally: CriteriaTally,
}

// ==========================================
// BuyerMatcher
// ==========================================
pub struct BuyerMatcher;

impl BuyerMatcher {
    /// 对单个需求的验收标准计数
    pub fn tally(supply: &SupplyProfile, criteria: &[AcceptanceCriterion]) -> CriteriaTally {
        CriteriaTally {
            satisfied: criteria.iter().filter(|c| supply.satisfies(c)).count(),
            total: criteria.len(),
        }
    }

    /// 在候选需求中找出全部标准都满足的挂牌
    ///
    /// # 参数
    /// - supply: 供给成分索引
    /// - demands: 候选挂牌（非 ACTIVE DEMAND 会被剔除）
    /// - criteria: listing_id → 验收标准
    ///
    /// # 返回
    /// - 命中需求，按 created_at 倒序（同一时刻按 id 倒序）
    pub fn find_matches(
        supply: &SupplyProfile,
        demands: Vec<Listing>,
        criteria: &HashMap<i64, Vec<AcceptanceCriterion>>,
    ) -> Vec<BuyerMatch> {
        let mut matches: Vec<BuyerMatch> = demands
            .into_iter()
            .filter(|listing| listing.is_active_demand())
            .filter_map(|demand| {
                let demand_criteria = criteria.get(&demand.id).cloned().unwrap_or_default();
                let tally = Self::tally(supply, &demand_criteria);
                if !tally.is_full_match() {
                    tracing::trace!(
                        demand_id = demand.id,
                        satisfied = tally.satisfied,
                        total = tally.total,
                        "需求未命中"
                    );
                    return None;
                }
                Some(BuyerMatch {
                    demand,
                    criteria: demand_criteria,
                    tally,
                })
            })
            .collect();

        // 与列表页一致: created_at 倒序，同一时刻 id 倒序
        matches.sort_by(|a, b| a.demand.newest_first_cmp(&b.demand));

        matches
    }
}
