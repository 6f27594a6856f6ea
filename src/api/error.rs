// ==========================================
// 工业固废交换 - API层错误类型
// ==========================================
// 职责: 定义API层错误类型，转换Repository错误为调用方可理解的错误
// 分类:
// - 校验错误: 调用方可修正，原样返回描述
// - 基础设施错误: 存储读取失败，记录日志后以通用消息返回
// ==========================================

use crate::repository::error::RepositoryError;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 校验错误
    // ==========================================
    #[error("无效输入: {0}")]
    InvalidInput(String),

    #[error("资源未找到: {0}")]
    NotFound(String),

    #[error("数据验证失败: {0}")]
    ValidationError(String),

    /// 比较运算符不在 {<, >, <=, >=, =} 之内
    #[error("无效的比较运算符: clause[{index}] operator={operator:?}")]
    InvalidOperator { index: usize, operator: String },

    #[error("筛选条件不能为空")]
    EmptyFilterSet,

    #[error("输入成分与输出成分相同: {0}")]
    SameChemical(String),

    // ==========================================
    // 数据访问错误
    // ==========================================
    #[error("数据库错误: {0}")]
    DatabaseError(String),

    #[error("数据库连接失败: {0}")]
    DatabaseConnectionError(String),

    #[error("数据库事务失败: {0}")]
    DatabaseTransactionError(String),

    // ==========================================
    // 通用错误
    // ==========================================
    #[error("内部错误: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ApiError {
    /// 是否为基础设施错误（存储读取失败等，调用方无法修正）
    pub fn is_infrastructure(&self) -> bool {
        matches!(
            self,
            ApiError::DatabaseError(_)
                | ApiError::DatabaseConnectionError(_)
                | ApiError::DatabaseTransactionError(_)
                | ApiError::InternalError(_)
                | ApiError::Other(_)
        )
    }
}

// ==========================================
// 从 RepositoryError 转换
// ==========================================
impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { entity, id } => {
                ApiError::NotFound(format!("{}(id={})不存在", entity, id))
            }
            RepositoryError::DatabaseConnectionError(msg) => ApiError::DatabaseConnectionError(msg),
            RepositoryError::DatabaseTransactionError(msg) => {
                ApiError::DatabaseTransactionError(msg)
            }
            RepositoryError::LockError(msg) => {
                ApiError::DatabaseConnectionError(format!("数据库锁获取失败: {}", msg))
            }
            RepositoryError::DatabaseQueryError(msg) => ApiError::DatabaseError(msg),

            // 库中数据无法解码，属于存储侧问题
            RepositoryError::DataCorruption { field, message } => {
                ApiError::DatabaseError(format!("字段{}数据损坏: {}", field, message))
            }

            RepositoryError::InternalError(msg) => ApiError::InternalError(msg),
            RepositoryError::Other(err) => ApiError::Other(err),
        }
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;

/// 记录一次失败的 API 调用并原样返回错误
///
/// - 基础设施错误: error 级别（需要排查存储）
/// - 校验错误: debug 级别（调用方可修正）
pub(crate) fn report_failure(op: &'static str, err: ApiError) -> ApiError {
    if err.is_infrastructure() {
        tracing::error!(op, error = %err, "API 调用失败: 基础设施错误");
    } else {
        tracing::debug!(op, error = %err, "API 调用被拒绝: 入参校验失败");
    }
    err
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_error_conversion() {
        let api_err: ApiError = RepositoryError::NotFound {
            entity: "Listing".to_string(),
            id: "42".to_string(),
        }
        .into();
        match api_err {
            ApiError::NotFound(msg) => {
                assert!(msg.contains("Listing"));
                assert!(msg.contains("42"));
            }
            other => panic!("Expected NotFound, got {:?}", other),
        }

        let api_err: ApiError = RepositoryError::DataCorruption {
            field: "listings.type".to_string(),
            message: "SWAP".to_string(),
        }
        .into();
        assert!(matches!(api_err, ApiError::DatabaseError(_)));
    }

    #[test]
    fn test_infrastructure_classification() {
        assert!(ApiError::DatabaseError("disk I/O".to_string()).is_infrastructure());
        assert!(ApiError::from(RepositoryError::LockError("poisoned".to_string())).is_infrastructure());
        assert!(!ApiError::EmptyFilterSet.is_infrastructure());
        assert!(!ApiError::SameChemical("S".to_string()).is_infrastructure());
        assert!(!ApiError::NotFound("listing".to_string()).is_infrastructure());
    }
}
