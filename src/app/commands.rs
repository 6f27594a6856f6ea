// ==========================================
// 工业固废交换 - JSON 命令（按域拆分）
// ==========================================
// 职责: 请求/响应边界，阻塞的 SQLite 工作放到 spawn_blocking
// 约定: Ok = JSON 响应，Err = JSON ErrorResponse
// ==========================================

mod common;
mod listing;
mod search;
mod system;

pub use common::{map_api_error, ErrorResponse, INFRASTRUCTURE_ERROR_CODE};
pub use listing::*;
pub use search::*;
pub use system::*;
