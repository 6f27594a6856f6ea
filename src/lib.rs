// ==========================================
// 工业固废交换 - 核心库
// ==========================================
// 技术栈: Rust + SQLite
// 系统定位: 只读撮合引擎（成分筛选 / 买方撮合 / 危险检测 / 处理商路径）
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 引擎层 - 撮合规则
pub mod engine;

// 配置层 - 系统配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一/建表）
pub mod db;

// 日志系统
pub mod logging;

// 性能观测
pub mod perf;

// API 层 - 业务接口
pub mod api;

// 应用层 - 命令边界
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{ComparisonOperator, HazardTier, ListingKind, ListingStatus};

// 领域实体
pub use domain::{
    AcceptanceCriterion, Chemical, ChemicalPair, CompositionEntry, HazardPair, Listing, Party,
    ProcessCapability,
};

// 引擎
pub use engine::{
    BuyerMatcher, CompositionFilter, FilterClause, HazardDetector, HazardTable,
    ProcessorPathfinder,
};

// API
pub use api::{ListingApi, MasterApi, SearchApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "工业固废交换撮合引擎";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
