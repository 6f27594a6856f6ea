// ==========================================
// 工业固废交换 - 数据仓储层
// ==========================================
// 红线: Repository 不含业务逻辑, 只读
// ==========================================
// 职责: 提供数据访问接口,屏蔽数据库细节
// 约束: 所有查询使用参数化,防止 SQL 注入
// ==========================================

pub mod capability_repo;
pub mod chemical_repo;
pub mod error;
pub mod hazard_repo;
pub mod listing_repo;
pub mod snapshot;

// 重导出核心仓储
pub use capability_repo::CapabilityRepository;
pub use chemical_repo::ChemicalRepository;
pub use error::{RepositoryError, RepositoryResult};
pub use hazard_repo::HazardRepository;
pub use listing_repo::ListingRepository;
pub use snapshot::{Snapshot, SnapshotStore};
