// ==========================================
// 工业固废交换 - 应用状态
// ==========================================
// 职责: 管理应用级别的共享状态和API实例
// ==========================================

use rusqlite::Connection;
use std::sync::{Arc, Mutex};

use crate::api::{ListingApi, MasterApi, SearchApi};
use crate::config::config_manager::ConfigManager;
use crate::db::{ensure_schema, open_sqlite_connection};
use crate::perf::install_sqlite_tracing;
use crate::repository::snapshot::SnapshotStore;

/// 数据库路径环境变量
pub const DB_PATH_ENV: &str = "SYMBIO_EXCHANGE_DB_PATH";

/// 应用状态
///
/// 所有 API 共用一个 SQLite 连接（Mutex 串行化访问）
pub struct AppState {
    /// 数据库路径
    pub db_path: String,

    /// 快照读取入口
    pub store: Arc<SnapshotStore>,

    /// 配置管理器
    pub config_manager: Arc<ConfigManager>,

    /// 撮合检索API
    pub search_api: Arc<SearchApi<ConfigManager>>,

    /// 主数据API
    pub master_api: Arc<MasterApi>,

    /// 挂牌浏览API
    pub listing_api: Arc<ListingApi>,
}

impl AppState {
    /// 创建新的AppState实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径（不存在时自动创建并建表）
    ///
    /// # 返回
    /// - Err(String): 初始化错误
    pub fn new(db_path: String) -> Result<Self, String> {
        tracing::info!("初始化AppState，数据库路径: {}", db_path);

        let mut conn =
            open_sqlite_connection(&db_path).map_err(|e| format!("无法打开数据库: {}", e))?;
        install_sqlite_tracing(&mut conn);
        ensure_schema(&conn).map_err(|e| format!("建表失败: {}", e))?;

        Self::from_connection(db_path, Arc::new(Mutex::new(conn)))
    }

    /// 从已有连接创建（调用方负责建表）
    pub fn from_connection(db_path: String, conn: Arc<Mutex<Connection>>) -> Result<Self, String> {
        let store = Arc::new(SnapshotStore::from_connection(conn.clone()));
        let config_manager = Arc::new(
            ConfigManager::from_connection(conn)
                .map_err(|e| format!("无法创建ConfigManager: {}", e))?,
        );

        let search_api = Arc::new(SearchApi::new(store.clone(), config_manager.clone()));
        let master_api = Arc::new(MasterApi::new(store.clone()));
        let listing_api = Arc::new(ListingApi::new(store.clone()));

        tracing::info!("AppState初始化完成");

        Ok(Self {
            db_path,
            store,
            config_manager,
            search_api,
            master_api,
            listing_api,
        })
    }
}

/// 获取默认数据库路径
///
/// 优先级:
/// 1. 环境变量 SYMBIO_EXCHANGE_DB_PATH
/// 2. 用户数据目录 `<data_dir>/symbio-exchange/symbio_exchange.db`
/// 3. 当前目录 `./symbio_exchange.db`
pub fn get_default_db_path() -> String {
    use std::path::PathBuf;

    if let Ok(path) = std::env::var(DB_PATH_ENV) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./symbio_exchange.db");

    if let Some(data_dir) = dirs::data_dir() {
        let dir = data_dir.join("symbio-exchange");
        // 目录创建失败时退回当前目录
        if std::fs::create_dir_all(&dir).is_ok() {
            path = dir.join("symbio_exchange.db");
        }
    }

    path.to_string_lossy().to_string()
}
