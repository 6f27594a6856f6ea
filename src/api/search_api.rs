// ==========================================
// 工业固废交换 - 撮合检索 API
// ==========================================
// 职责: 成分筛选 / 买方撮合 + 危险检测 / 处理商路径
// 流程: 入参校验（不访问数据） → 单事务快照读取 → 纯引擎计算 → DTO
// ==========================================

use std::sync::Arc;
use tracing::{debug, instrument};

use crate::api::dto::{
    BuyerMatchView, DirectPathView, FilterClauseRequest, FilterListingsRequest,
    FindProcessorsRequest, FindProcessorsResponse, HazardWarningView, ListingView,
    MatchBuyersRequest, MatchBuyersResponse, TwoHopPathView,
};
use crate::api::error::{report_failure, ApiError, ApiResult};
use crate::config::MatchConfigReader;
use crate::domain::types::{ComparisonOperator, ListingKind};
use crate::engine::buyer_matcher::{BuyerMatcher, SupplyProfile};
use crate::engine::composition_filter::{CompositionFilter, FilterClause};
use crate::engine::composition_guard::CompositionGuard;
use crate::engine::hazard_detector::{HazardDetector, HazardTable};
use crate::engine::processor_pathfinder::{CapabilityGraph, ProcessorPathfinder};
use crate::repository::snapshot::SnapshotStore;

// ==========================================
// SearchApi
// ==========================================
pub struct SearchApi<C: MatchConfigReader> {
    store: Arc<SnapshotStore>,
    config: Arc<C>,
}

impl<C: MatchConfigReader> SearchApi<C> {
    pub fn new(store: Arc<SnapshotStore>, config: Arc<C>) -> Self {
        Self { store, config }
    }

    // ==========================================
    // 成分筛选
    // ==========================================

    /// 按成分条件筛选 ACTIVE OFFER
    ///
    /// # 参数
    /// - request.filters: 非空；运算符 ∈ {<, >, <=, >=, =}
    ///
    /// # 返回
    /// - 命中挂牌（附完整成分表），最新创建的在前
    /// - Err(EmptyFilterSet / InvalidOperator / InvalidInput): 入参非法
    #[instrument(skip(self, request), fields(clauses = request.filters.len()))]
    pub fn filter_listings(&self, request: &FilterListingsRequest) -> ApiResult<Vec<ListingView>> {
        self.run_filter(request)
            .map_err(|e| report_failure("filter_listings", e))
    }

    fn run_filter(&self, request: &FilterListingsRequest) -> ApiResult<Vec<ListingView>> {
        let clauses = parse_filter_clauses(&request.filters)?;
        let guard = self.composition_guard()?;

        let filtered = self.store.read(|snapshot| -> ApiResult<_> {
            let listings = snapshot.listings();
            let candidates = listings.list_active(Some(ListingKind::Offer))?;
            let ids: Vec<i64> = candidates.iter().map(|l| l.id).collect();
            let compositions = listings.load_compositions(&ids)?;
            Ok(CompositionFilter::apply(candidates, &compositions, &clauses, guard))
        })?;

        debug!(matched = filtered.len(), "成分筛选完成");

        Ok(filtered
            .iter()
            .map(|f| ListingView::from_parts(&f.listing, &f.composition, &[]))
            .collect())
    }

    // ==========================================
    // 买方撮合
    // ==========================================

    /// 为一个 OFFER 撮合买方，并附带运输危险告警
    ///
    /// # 返回
    /// - Err(InvalidInput): 未提供 supplyListingId
    /// - Err(NotFound): 挂牌不存在
    /// - Err(ValidationError): 挂牌不是 ACTIVE OFFER
    #[instrument(skip(self, request), fields(supply_listing_id = ?request.supply_listing_id))]
    pub fn match_buyers(&self, request: &MatchBuyersRequest) -> ApiResult<MatchBuyersResponse> {
        self.run_match(request)
            .map_err(|e| report_failure("match_buyers", e))
    }

    fn run_match(&self, request: &MatchBuyersRequest) -> ApiResult<MatchBuyersResponse> {
        let supply_id = match request.supply_listing_id {
            Some(id) if id > 0 => id,
            Some(id) => {
                return Err(ApiError::InvalidInput(format!("supplyListingId 非法: {}", id)));
            }
            None => return Err(ApiError::InvalidInput("supplyListingId 不能为空".to_string())),
        };
        let guard = self.composition_guard()?;
        let hazard_note = self
            .config
            .get_hazard_note()
            .map_err(|e| ApiError::InternalError(format!("读取配置失败: {}", e)))?;

        let (matches, report) = self.store.read(|snapshot| -> ApiResult<_> {
            let listings = snapshot.listings();

            let supply = listings
                .find_by_id(supply_id)?
                .ok_or_else(|| ApiError::NotFound(format!("挂牌(id={})不存在", supply_id)))?;
            if !supply.is_active_offer() {
                return Err(ApiError::ValidationError(format!(
                    "挂牌(id={})不是有效的供给挂牌: type={}, status={}",
                    supply.id, supply.kind, supply.status
                )));
            }

            let composition = listings.load_composition(supply_id)?;
            if let Err(total) = guard.check(&composition) {
                return Err(ApiError::ValidationError(format!(
                    "挂牌(id={})成分合计 {:.4}% 超过 100%",
                    supply_id, total
                )));
            }

            let demands = listings.list_active(Some(ListingKind::Demand))?;
            let demand_ids: Vec<i64> = demands.iter().map(|l| l.id).collect();
            let criteria = listings.load_criteria(&demand_ids)?;
            let hazard_table = HazardTable::from_pairs(snapshot.hazards().list_incompatible()?);

            let supply_profile = SupplyProfile::from_composition(&composition);
            let matches = BuyerMatcher::find_matches(&supply_profile, demands, &criteria);
            let report = HazardDetector::detect(&hazard_table, &composition);
            Ok((matches, report))
        })?;

        debug!(
            matches = matches.len(),
            hazards = report.flags.len(),
            "买方撮合完成"
        );

        let has_hazard = report.has_hazard();
        Ok(MatchBuyersResponse {
            supply_listing_id: supply_id,
            matches: matches.iter().map(BuyerMatchView::from).collect(),
            hazard_warnings: report.flags.iter().map(HazardWarningView::from).collect(),
            has_hazard,
            hazard_note: has_hazard.then_some(hazard_note),
        })
    }

    // ==========================================
    // 处理商路径
    // ==========================================

    /// 搜索 input → output 的一跳/两跳处理路径
    ///
    /// # 返回
    /// - 无路径时 totalRoutes = 0（不是错误）
    /// - Err(InvalidInput): 缺少成分代码
    /// - Err(SameChemical): 输入与输出相同
    #[instrument(skip(self, request), fields(
        input = ?request.input_chemical_id,
        output = ?request.output_chemical_id
    ))]
    pub fn find_processors(
        &self,
        request: &FindProcessorsRequest,
    ) -> ApiResult<FindProcessorsResponse> {
        self.run_find_processors(request)
            .map_err(|e| report_failure("find_processors", e))
    }

    fn run_find_processors(
        &self,
        request: &FindProcessorsRequest,
    ) -> ApiResult<FindProcessorsResponse> {
        let input = required_chemical(request.input_chemical_id.as_deref(), "inputChemicalId")?;
        let output = required_chemical(request.output_chemical_id.as_deref(), "outputChemicalId")?;
        if input == output {
            return Err(ApiError::SameChemical(input.to_string()));
        }

        let capabilities = self
            .store
            .read(|snapshot| -> ApiResult<_> {
                Ok(snapshot.capabilities().list_touching(input, output)?)
            })?;

        let graph = CapabilityGraph::build(&capabilities);
        let routes = ProcessorPathfinder::find_routes(&graph, input, output);

        debug!(
            direct = routes.direct.len(),
            two_hop = routes.two_hop.len(),
            "路径搜索完成"
        );

        Ok(FindProcessorsResponse {
            input_chemical_id: input.to_string(),
            output_chemical_id: output.to_string(),
            direct_paths: routes.direct.iter().map(DirectPathView::from).collect(),
            two_hop_paths: routes.two_hop.iter().map(TwoHopPathView::from).collect(),
            total_routes: routes.total_routes(),
        })
    }

    // ==========================================
    // 配置
    // ==========================================

    fn composition_guard(&self) -> ApiResult<CompositionGuard> {
        let enabled = self
            .config
            .get_verify_composition_sum()
            .map_err(|e| ApiError::InternalError(format!("读取配置失败: {}", e)))?;
        if !enabled {
            return Ok(CompositionGuard::disabled());
        }
        let tolerance = self
            .config
            .get_composition_sum_tolerance()
            .map_err(|e| ApiError::InternalError(format!("读取配置失败: {}", e)))?;
        Ok(CompositionGuard::new(true, tolerance))
    }
}

// ==========================================
// 入参校验
// ==========================================

/// 校验并转换筛选条件
pub fn parse_filter_clauses(requests: &[FilterClauseRequest]) -> ApiResult<Vec<FilterClause>> {
    if requests.is_empty() {
        return Err(ApiError::EmptyFilterSet);
    }

    requests
        .iter()
        .enumerate()
        .map(|(index, request)| {
            let chemical_id = request.chemical_id.trim();
            if chemical_id.is_empty() {
                return Err(ApiError::InvalidInput(format!(
                    "clause[{}] chemicalId 不能为空",
                    index
                )));
            }
            let operator = ComparisonOperator::parse(&request.operator).ok_or_else(|| {
                ApiError::InvalidOperator {
                    index,
                    operator: request.operator.clone(),
                }
            })?;
            if !request.threshold.is_finite() {
                return Err(ApiError::InvalidInput(format!(
                    "clause[{}] threshold 必须是有限数值",
                    index
                )));
            }
            Ok(FilterClause::new(chemical_id, operator, request.threshold))
        })
        .collect()
}

fn required_chemical<'a>(value: Option<&'a str>, field: &str) -> ApiResult<&'a str> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(ApiError::InvalidInput(format!("{} 不能为空", field))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clause(chemical_id: &str, operator: &str, threshold: f64) -> FilterClauseRequest {
        FilterClauseRequest {
            chemical_id: chemical_id.to_string(),
            operator: operator.to_string(),
            threshold,
        }
    }

    #[test]
    fn test_empty_filter_set_is_rejected() {
        assert!(matches!(parse_filter_clauses(&[]), Err(ApiError::EmptyFilterSet)));
    }

    #[test]
    fn test_unknown_operator_is_rejected_with_position() {
        let result = parse_filter_clauses(&[clause("SIO2", ">=", 50.0), clause("S", "!=", 1.0)]);
        match result {
            Err(ApiError::InvalidOperator { index, operator }) => {
                assert_eq!(index, 1);
                assert_eq!(operator, "!=");
            }
            other => panic!("Expected InvalidOperator, got {:?}", other),
        }
    }

    #[test]
    fn test_clauses_are_parsed_in_order() {
        let clauses =
            parse_filter_clauses(&[clause(" SIO2 ", ">=", 50.0), clause("PB", "<=", 0.1)]).unwrap();
        assert_eq!(clauses.len(), 2);
        assert_eq!(clauses[0].chemical_id, "SIO2");
        assert_eq!(clauses[0].operator, ComparisonOperator::Ge);
        assert_eq!(clauses[1].operator, ComparisonOperator::Le);
    }

    #[test]
    fn test_blank_chemical_and_nan_threshold_are_rejected() {
        assert!(matches!(
            parse_filter_clauses(&[clause("  ", "<", 1.0)]),
            Err(ApiError::InvalidInput(_))
        ));
        assert!(matches!(
            parse_filter_clauses(&[clause("S", "<", f64::NAN)]),
            Err(ApiError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_required_chemical() {
        assert_eq!(required_chemical(Some(" FE "), "inputChemicalId").unwrap(), "FE");
        assert!(required_chemical(Some(""), "inputChemicalId").is_err());
        assert!(required_chemical(None, "inputChemicalId").is_err());
    }
}
