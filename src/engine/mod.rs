// ==========================================
// 工业固废交换 - 引擎层
// ==========================================
// 职责: 成分筛选 / 买方撮合 / 危险检测 / 处理商路径
// 红线: Engine 不拼 SQL，只处理内存中的快照数据
// ==========================================

pub mod buyer_matcher;
pub mod composition_filter;
pub mod composition_guard;
pub mod hazard_detector;
pub mod processor_pathfinder;

// 重导出核心引擎
pub use buyer_matcher::{BuyerMatch, BuyerMatcher, CriteriaTally, SupplyProfile};
pub use composition_filter::{CompositionFilter, FilterClause, FilteredListing};
pub use composition_guard::{composition_total, CompositionGuard};
pub use hazard_detector::{HazardDetector, HazardFlag, HazardReport, HazardTable};
pub use processor_pathfinder::{
    CapabilityGraph, DirectRoute, ProcessorPathfinder, RouteSet, TwoHopRoute,
};
