// ==========================================
// 工业固废交换 - 应用层
// ==========================================
// 职责: 共享状态 + JSON 命令（请求/响应边界）
// ==========================================

pub mod commands;
pub mod state;

// 重导出
pub use commands::*;
pub use state::{get_default_db_path, AppState};
