// ==========================================
// 工业固废交换 - API 层
// ==========================================
// 职责: 入参校验 + 快照读取 + 引擎调用，供命令层调用
// ==========================================

pub mod dto;
pub mod error;
pub mod listing_api;
pub mod master_api;
pub mod search_api;

// 重导出核心类型
pub use error::{ApiError, ApiResult};
pub use listing_api::ListingApi;
pub use master_api::MasterApi;
pub use search_api::SearchApi;
