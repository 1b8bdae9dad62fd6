// ==========================================
// 门窗型材引擎 - 仓储层错误类型
// ==========================================
// 工具: thiserror 派生宏
// 约定: "未找到" 用 Ok(None) 表达，不是错误
// ==========================================

use thiserror::Error;

/// 仓储层错误类型
#[derive(Error, Debug)]
pub enum RepositoryError {
    // ===== 数据库错误 =====
    #[error("数据库连接失败: {0}")]
    DatabaseConnectionError(String),

    #[error("数据库锁获取失败: {0}")]
    LockError(String),

    #[error("数据库查询失败: {0}")]
    DatabaseQueryError(String),

    // ===== 目录访问错误 =====
    #[error("目录访问超时: operation={operation}, timeout={timeout_ms}ms")]
    Timeout { operation: String, timeout_ms: u64 },

    #[error("目录传输失败: {0}")]
    Transport(String),

    // ===== 数据质量错误 =====
    #[error("字段值错误 (field={field}): {message}")]
    FieldValueError { field: String, message: String },

    // ===== 通用错误 =====
    #[error("内部错误: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// 实现 From<rusqlite::Error>
impl From<rusqlite::Error> for RepositoryError {
    fn from(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::SqliteFailure(_, Some(msg)) => RepositoryError::DatabaseQueryError(msg),
            rusqlite::Error::InvalidColumnType(_, name, ty) => RepositoryError::FieldValueError {
                field: name,
                message: format!("unexpected column type {}", ty),
            },
            _ => RepositoryError::DatabaseQueryError(err.to_string()),
        }
    }
}

/// Result 类型别名
pub type RepositoryResult<T> = Result<T, RepositoryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_message_carries_operation() {
        let err = RepositoryError::Timeout {
            operation: "get_stock_item".to_string(),
            timeout_ms: 250,
        };
        let msg = err.to_string();
        assert!(msg.contains("get_stock_item"));
        assert!(msg.contains("250"));
    }

    #[test]
    fn test_from_rusqlite_error() {
        let err: RepositoryError = rusqlite::Error::QueryReturnedNoRows.into();
        assert!(matches!(err, RepositoryError::DatabaseQueryError(_)));
    }
}
