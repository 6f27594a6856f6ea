// ==========================================
// 工业固废交换 - 成分筛选引擎
// ==========================================
// 输入: 筛选条件 [(chemical, op, threshold)] + 候选 OFFER 及其成分表
// 输出: 满足全部条件的 ACTIVE OFFER（附完整成分表），按创建时间倒序
// 红线: 条件之间为 AND，每个条件独立对整张成分表求值
// ==========================================

use crate::domain::listing::{sort_newest_first, CompositionEntry, Listing};
use crate::domain::types::ComparisonOperator;
use crate::engine::composition_guard::CompositionGuard;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ==========================================
// FilterClause - 单个筛选条件
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterClause {
    pub chemical_id: String,
    pub operator: ComparisonOperator,
    pub threshold: f64,
}

impl FilterClause {
    pub fn new(chemical_id: impl Into<String>, operator: ComparisonOperator, threshold: f64) -> Self {
        Self {
            chemical_id: chemical_id.into(),
            operator,
            threshold,
        }
    }

    /// 成分表中是否存在至少一行满足 `percentage <op> threshold`
    pub fn is_satisfied_by(&self, composition: &[CompositionEntry]) -> bool {
        composition.iter().any(|entry| {
            entry.chemical_id == self.chemical_id
                && self.operator.evaluate(entry.percentage, self.threshold)
        })
    }
}

/// 筛选命中的挂牌（附完整成分表）
#[derive(Debug, Clone, PartialEq)]
pub struct FilteredListing {
    pub listing: Listing,
    pub composition: Vec<CompositionEntry>,
}

// ==========================================
// CompositionFilter - 成分筛选
// ==========================================
pub struct CompositionFilter;

impl CompositionFilter {
    /// 判断一张成分表是否满足全部条件
    pub fn passes_all(clauses: &[FilterClause], composition: &[CompositionEntry]) -> bool {
        clauses.iter().all(|clause| clause.is_satisfied_by(composition))
    }

    /// 对候选挂牌执行筛选
    ///
    /// # 参数
    /// - candidates: 候选挂牌（非 ACTIVE OFFER 会被剔除）
    /// - compositions: listing_id → 成分表
    /// - clauses: 筛选条件（调用方保证非空）
    /// - guard: 成分合计复核
    ///
    /// # 返回
    /// - 命中挂牌，按 created_at 倒序（同一时刻按 id 倒序）
    pub fn apply(
        candidates: Vec<Listing>,
        compositions: &HashMap<i64, Vec<CompositionEntry>>,
        clauses: &[FilterClause],
        guard: CompositionGuard,
    ) -> Vec<FilteredListing> {
        let mut matched: Vec<Listing> = candidates
            .into_iter()
            .filter(|listing| listing.is_active_offer())
            .filter(|listing| {
                let composition = compositions
                    .get(&listing.id)
                    .map(Vec::as_slice)
                    .unwrap_or(&[]);
                if let Err(total) = guard.check(composition) {
                    tracing::warn!(
                        listing_id = listing.id,
                        total,
                        "成分合计超过 100%，跳过该挂牌"
                    );
                    return false;
                }
                Self::passes_all(clauses, composition)
            })
            .collect();

        sort_newest_first(&mut matched);

        matched
            .into_iter()
            .map(|listing| {
                let composition = compositions.get(&listing.id).cloned().unwrap_or_default();
                FilteredListing {
                    listing,
                    composition,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::listing::Party;
    use crate::domain::types::{HazardTier, ListingKind, ListingStatus};
    use chrono::NaiveDate;

    fn party() -> Party {
        Party {
            id: 1,
            name: "NTPC Dadri".to_string(),
            industry_type: "Thermal Power".to_string(),
            location: "Dadri".to_string(),
        }
    }

    fn listing(id: i64, kind: ListingKind, status: ListingStatus, hour: u32) -> Listing {
        Listing {
            id,
            owner: party(),
            kind,
            material_name: format!("Material {}", id),
            total_quantity: 100.0,
            status,
            created_at: NaiveDate::from_ymd_opt(2026, 2, 1)
                .unwrap()
                .and_hms_opt(hour, 0, 0)
                .unwrap(),
        }
    }

    fn entry(listing_id: i64, chemical_id: &str, percentage: f64) -> CompositionEntry {
        CompositionEntry {
            listing_id,
            chemical_id: chemical_id.to_string(),
            chemical_name: chemical_id.to_string(),
            hazard_tier: HazardTier::Low,
            percentage,
        }
    }

    fn compositions(rows: Vec<CompositionEntry>) -> HashMap<i64, Vec<CompositionEntry>> {
        let mut map: HashMap<i64, Vec<CompositionEntry>> = HashMap::new();
        for row in rows {
            map.entry(row.listing_id).or_default().push(row);
        }
        map
    }

    #[test]
    fn test_listing_failing_one_clause_is_excluded() {
        let candidates = vec![
            listing(1, ListingKind::Offer, ListingStatus::Active, 8),
            listing(2, ListingKind::Offer, ListingStatus::Active, 9),
        ];
        let comps = compositions(vec![
            entry(1, "SIO2", 58.2),
            entry(1, "S", 0.4),
            entry(1, "PB", 0.02),
            // listing 2 满足 3 个条件中的 2 个
            entry(2, "SIO2", 60.0),
            entry(2, "S", 0.3),
            entry(2, "PB", 0.5),
        ]);
        let clauses = vec![
            FilterClause::new("SIO2", ComparisonOperator::Ge, 50.0),
            FilterClause::new("S", ComparisonOperator::Lt, 1.0),
            FilterClause::new("PB", ComparisonOperator::Le, 0.1),
        ];

        let result =
            CompositionFilter::apply(candidates, &comps, &clauses, CompositionGuard::disabled());

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].listing.id, 1);
        assert_eq!(result[0].composition.len(), 3);
    }

    #[test]
    fn test_missing_chemical_fails_clause() {
        let clause = FilterClause::new("HG", ComparisonOperator::Lt, 1.0);
        assert!(!clause.is_satisfied_by(&[entry(1, "SIO2", 50.0)]));
    }

    #[test]
    fn test_only_active_offers_are_returned_newest_first() {
        let candidates = vec![
            listing(1, ListingKind::Offer, ListingStatus::Active, 8),
            listing(2, ListingKind::Demand, ListingStatus::Active, 9),
            listing(3, ListingKind::Offer, ListingStatus::Closed, 10),
            listing(4, ListingKind::Offer, ListingStatus::Active, 11),
        ];
        let comps = compositions(vec![
            entry(1, "CAO", 42.3),
            entry(2, "CAO", 42.3),
            entry(3, "CAO", 42.3),
            entry(4, "CAO", 40.0),
        ]);
        let clauses = vec![FilterClause::new("CAO", ComparisonOperator::Gt, 35.0)];

        let ids: Vec<i64> =
            CompositionFilter::apply(candidates, &comps, &clauses, CompositionGuard::disabled())
                .into_iter()
                .map(|r| r.listing.id)
                .collect();

        assert_eq!(ids, vec![4, 1]);
    }

    #[test]
    fn test_equality_operator_is_exact() {
        let comps = [entry(1, "S", 0.4)];
        assert!(FilterClause::new("S", ComparisonOperator::Eq, 0.4).is_satisfied_by(&comps));
        assert!(!FilterClause::new("S", ComparisonOperator::Eq, 0.41).is_satisfied_by(&comps));
    }

    #[test]
    fn test_guard_skips_overfull_composition() {
        let candidates = vec![listing(1, ListingKind::Offer, ListingStatus::Active, 8)];
        let comps = compositions(vec![entry(1, "SIO2", 90.0), entry(1, "AL2O3", 30.0)]);
        let clauses = vec![FilterClause::new("SIO2", ComparisonOperator::Ge, 50.0)];

        let trusted =
            CompositionFilter::apply(candidates.clone(), &comps, &clauses, CompositionGuard::disabled());
        assert_eq!(trusted.len(), 1);

        let guarded =
            CompositionFilter::apply(candidates, &comps, &clauses, CompositionGuard::new(true, 0.0));
        assert!(guarded.is_empty());
    }
}
