// ==========================================
// 工业固废交换 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写管理
// 存储: config_kv 表 (key-value + scope)
// ==========================================

use crate::config::match_config_trait::MatchConfigReader;
use crate::db::{ensure_schema, open_sqlite_connection};
use rusqlite::{params, Connection};
use serde_json::json;
use std::collections::BTreeMap;
use std::error::Error;
use std::sync::{Arc, Mutex};

/// 全局作用域
pub const GLOBAL_SCOPE: &str = "global";

/// 默认危险提示
pub const DEFAULT_HAZARD_NOTE: &str =
    "Transport hazard detected: some chemicals in this waste are incompatible.";

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> Result<Self, Box<dyn Error>> {
        let conn = open_sqlite_connection(db_path)?;
        ensure_schema(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    ///
    /// 说明：会对传入连接再次应用统一 PRAGMA（幂等）。
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Result<Self, Box<dyn Error>> {
        {
            let conn_guard = conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
            crate::db::configure_sqlite_connection(&conn_guard)?;
        }

        Ok(Self { conn })
    }

    /// 从 config_kv 表读取配置值（scope_id='global'）
    ///
    /// # 返回
    /// - Some(String): 配置值
    /// - None: 配置不存在
    pub fn get_global_config_value(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let result = conn.query_row(
            "SELECT value FROM config_kv WHERE scope_id = ?1 AND key = ?2",
            params![GLOBAL_SCOPE, key],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(Box::new(e)),
        }
    }

    /// 写入 global 配置（UPSERT）
    pub fn set_global_config_value(&self, key: &str, value: &str) -> Result<(), Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
        conn.execute(
            r#"
            INSERT INTO config_kv (scope_id, key, value, updated_at)
            VALUES (?1, ?2, ?3, datetime('now'))
            ON CONFLICT(scope_id, key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
            params![GLOBAL_SCOPE, key, value],
        )?;
        Ok(())
    }

    fn get_config_or_default(&self, key: &str, default: &str) -> Result<String, Box<dyn Error>> {
        Ok(self
            .get_global_config_value(key)?
            .unwrap_or_else(|| default.to_string()))
    }

    /// 获取所有 global 配置的快照（JSON，按 key 排序）
    pub fn get_config_snapshot(&self) -> Result<String, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let mut stmt =
            conn.prepare("SELECT key, value FROM config_kv WHERE scope_id = ?1 ORDER BY key")?;
        let rows = stmt.query_map(params![GLOBAL_SCOPE], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut config_map: BTreeMap<String, String> = BTreeMap::new();
        for row in rows {
            let (key, value) = row?;
            config_map.insert(key, value);
        }

        Ok(serde_json::to_string(&json!(config_map))?)
    }
}

// ==========================================
// MatchConfigReader Trait 实现
// ==========================================
impl MatchConfigReader for ConfigManager {
    fn get_verify_composition_sum(&self) -> Result<bool, Box<dyn Error>> {
        let value = self.get_config_or_default(config_keys::VERIFY_COMPOSITION_SUM, "false")?;
        match value.trim().to_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => {
                tracing::warn!(
                    config_key = config_keys::VERIFY_COMPOSITION_SUM,
                    raw_value = %value,
                    "配置格式错误，使用默认值 false"
                );
                Ok(false)
            }
        }
    }

    fn get_composition_sum_tolerance(&self) -> Result<f64, Box<dyn Error>> {
        let value = self.get_config_or_default(config_keys::COMPOSITION_SUM_TOLERANCE, "0.0")?;
        match value.trim().parse::<f64>() {
            Ok(v) if v.is_finite() && v >= 0.0 => Ok(v),
            _ => {
                tracing::warn!(
                    config_key = config_keys::COMPOSITION_SUM_TOLERANCE,
                    raw_value = %value,
                    "配置格式错误，使用默认值 0.0"
                );
                Ok(0.0)
            }
        }
    }

    fn get_hazard_note(&self) -> Result<String, Box<dyn Error>> {
        let value = self.get_config_or_default(config_keys::HAZARD_NOTE, DEFAULT_HAZARD_NOTE)?;
        if value.trim().is_empty() {
            return Ok(DEFAULT_HAZARD_NOTE.to_string());
        }
        Ok(value)
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 成分合计复核
    pub const VERIFY_COMPOSITION_SUM: &str = "matching.verify_composition_sum";
    pub const COMPOSITION_SUM_TOLERANCE: &str = "matching.composition_sum_tolerance";

    // 危险提示
    pub const HAZARD_NOTE: &str = "matching.hazard_note";
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    fn test_manager() -> (NamedTempFile, ConfigManager) {
        let temp_file = NamedTempFile::new().unwrap();
        let manager = ConfigManager::new(temp_file.path().to_str().unwrap()).unwrap();
        (temp_file, manager)
    }

    #[test]
    fn test_defaults_when_unset() {
        let (_tmp, manager) = test_manager();
        assert!(!manager.get_verify_composition_sum().unwrap());
        assert_eq!(manager.get_composition_sum_tolerance().unwrap(), 0.0);
        assert_eq!(manager.get_hazard_note().unwrap(), DEFAULT_HAZARD_NOTE);
    }

    #[test]
    fn test_overrides_and_snapshot() {
        let (_tmp, manager) = test_manager();
        manager
            .set_global_config_value(config_keys::VERIFY_COMPOSITION_SUM, "true")
            .unwrap();
        manager
            .set_global_config_value(config_keys::COMPOSITION_SUM_TOLERANCE, "0.5")
            .unwrap();

        assert!(manager.get_verify_composition_sum().unwrap());
        assert_eq!(manager.get_composition_sum_tolerance().unwrap(), 0.5);

        let snapshot: BTreeMap<String, String> =
            serde_json::from_str(&manager.get_config_snapshot().unwrap()).unwrap();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot[config_keys::VERIFY_COMPOSITION_SUM], "true");
    }

    #[test]
    fn test_malformed_values_fall_back_to_defaults() {
        let (_tmp, manager) = test_manager();
        manager
            .set_global_config_value(config_keys::VERIFY_COMPOSITION_SUM, "maybe")
            .unwrap();
        manager
            .set_global_config_value(config_keys::COMPOSITION_SUM_TOLERANCE, "-3")
            .unwrap();

        assert!(!manager.get_verify_composition_sum().unwrap());
        assert_eq!(manager.get_composition_sum_tolerance().unwrap(), 0.0);
    }
}
