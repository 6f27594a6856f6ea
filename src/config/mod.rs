// ==========================================
// 工业固废交换 - 配置层
// ==========================================
// 职责: 系统配置管理
// 存储: config_kv 表
// ==========================================

pub mod config_manager;
pub mod match_config_trait;

// 重导出核心配置管理器
pub use config_manager::{config_keys, ConfigManager, DEFAULT_HAZARD_NOTE};
pub use match_config_trait::MatchConfigReader;
