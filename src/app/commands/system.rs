use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;
use crate::app::state::AppState;

use super::common::{map_api_error, map_join_error, to_json};

// ==========================================
// 系统命令
// ==========================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub app_name: String,
    pub version: String,
    pub schema_version: Option<i64>,
}

/// 健康检查（读取 schema 版本确认存储可用）
pub async fn health(state: &AppState) -> Result<String, String> {
    let store = state.store.clone();
    let schema_version = tokio::task::spawn_blocking(move || {
        store.schema_version().map_err(ApiError::from)
    })
    .await
    .map_err(map_join_error)?
    .map_err(|e| map_api_error(crate::api::error::report_failure("health", e)))?;

    to_json(&HealthResponse {
        status: "ok".to_string(),
        app_name: crate::APP_NAME.to_string(),
        version: crate::VERSION.to_string(),
        schema_version,
    })
}

/// 读取全部全局配置（JSON 对象）
pub async fn get_config_snapshot(state: &AppState) -> Result<String, String> {
    let config_manager = state.config_manager.clone();
    tokio::task::spawn_blocking(move || {
        config_manager
            .get_config_snapshot()
            .map_err(|e| ApiError::InternalError(format!("读取配置失败: {}", e)))
    })
    .await
    .map_err(map_join_error)?
    .map_err(|e| map_api_error(crate::api::error::report_failure("get_config_snapshot", e)))
}

/// 写入一项全局配置
pub async fn set_config_value(state: &AppState, key: String, value: String) -> Result<String, String> {
    let config_manager = state.config_manager.clone();
    tokio::task::spawn_blocking(move || -> Result<(), ApiError> {
        if key.trim().is_empty() {
            return Err(ApiError::InvalidInput("配置项 key 不能为空".to_string()));
        }
        config_manager
            .set_global_config_value(key.trim(), &value)
            .map_err(|e| ApiError::InternalError(format!("写入配置失败: {}", e)))?;
        tracing::info!(key = %key.trim(), "全局配置已更新");
        Ok(())
    })
    .await
    .map_err(map_join_error)?
    .map_err(|e| map_api_error(crate::api::error::report_failure("set_config_value", e)))?;

    to_json(&serde_json::json!({ "updated": true }))
}
