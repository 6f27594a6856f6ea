// ==========================================
// 工业固废交换 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod chemical;
pub mod listing;
pub mod process;
pub mod types;

// 重导出核心类型
pub use chemical::{Chemical, ChemicalPair, HazardPair};
pub use listing::{sort_newest_first, AcceptanceCriterion, CompositionEntry, Listing, Party};
pub use process::ProcessCapability;
pub use types::{ComparisonOperator, HazardTier, ListingKind, ListingStatus};
