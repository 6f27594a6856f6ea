use crate::api::error::ApiError;
use crate::domain::types::ComparisonOperator;
use serde::{Deserialize, Serialize};

// ==========================================
// 公共工具：错误映射、序列化
// ==========================================

/// 基础设施错误统一使用的错误代码
pub const INFRASTRUCTURE_ERROR_CODE: &str = "INFRASTRUCTURE_ERROR";

/// 基础设施错误对外只返回通用消息，细节只进日志
const INFRASTRUCTURE_ERROR_MESSAGE: &str = "存储服务暂时不可用，请稍后重试";

/// 错误响应（返回给调用方）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// 错误代码
    pub code: String,

    /// 错误消息
    pub message: String,

    /// 详细信息（可选）
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| self.message.clone())
    }
}

/// 将ApiError转换为JSON字符串
pub fn map_api_error(err: ApiError) -> String {
    if err.is_infrastructure() {
        return ErrorResponse {
            code: INFRASTRUCTURE_ERROR_CODE.to_string(),
            message: INFRASTRUCTURE_ERROR_MESSAGE.to_string(),
            details: None,
        }
        .to_json();
    }

    let code = match &err {
        ApiError::InvalidInput(_) => "INVALID_INPUT",
        ApiError::NotFound(_) => "NOT_FOUND",
        ApiError::ValidationError(_) => "VALIDATION_ERROR",
        ApiError::InvalidOperator { .. } => "INVALID_OPERATOR",
        ApiError::EmptyFilterSet => "EMPTY_FILTER_SET",
        ApiError::SameChemical(_) => "SAME_CHEMICAL",
        _ => INFRASTRUCTURE_ERROR_CODE,
    };
    let details = match &err {
        ApiError::InvalidOperator { index, operator } => Some(serde_json::json!({
            "index": index,
            "operator": operator,
            "allowed": ComparisonOperator::ALLOWED,
        })),
        _ => None,
    };

    ErrorResponse {
        code: code.to_string(),
        message: err.to_string(),
        details,
    }
    .to_json()
}

/// spawn_blocking 任务失败（panic / 取消）
pub(super) fn map_join_error(err: tokio::task::JoinError) -> String {
    tracing::error!(error = %err, "命令任务执行失败");
    ErrorResponse {
        code: "TASK_FAILED".to_string(),
        message: format!("任务执行失败: {}", err),
        details: None,
    }
    .to_json()
}

/// 序列化响应
pub(super) fn to_json<T: Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string(value).map_err(|e| {
        ErrorResponse {
            code: "SERIALIZATION_ERROR".to_string(),
            message: format!("序列化失败: {}", e),
            details: None,
        }
        .to_json()
    })
}
