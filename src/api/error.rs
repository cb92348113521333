// ==========================================
// TB CareMap - API层错误类型
// ==========================================
// 职责: 汇总下层错误为驾驶舱可展示的错误消息
// 所有错误信息必须包含显式原因
// ==========================================

use crate::config::ConfigError;
use crate::domain::types::Dataset;
use crate::repository::error::RepositoryError;
use crate::source::DataSourceError;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 请求错误
    // ==========================================
    #[error("无效输入: {0}")]
    InvalidInput(String),

    // ==========================================
    // 数据访问错误
    // ==========================================
    /// 严格模式下任一数据集不可用即终止请求
    #[error("数据集不可用 [{dataset}]: {reason}")]
    DataUnavailable { dataset: Dataset, reason: String },

    #[error("数据库错误: {0}")]
    DatabaseError(String),

    // ==========================================
    // 配置与导出错误
    // ==========================================
    #[error("配置错误: {0}")]
    ConfigError(String),

    #[error("导出失败: {0}")]
    ExportError(String),

    // ==========================================
    // 通用错误
    // ==========================================
    #[error("内部错误: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// ==========================================
// 从下层错误转换
// ==========================================
impl From<DataSourceError> for ApiError {
    fn from(err: DataSourceError) -> Self {
        match err {
            DataSourceError::DataUnavailable { dataset, reason } => {
                ApiError::DataUnavailable { dataset, reason }
            }
        }
    }
}

impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::Other(err) => ApiError::Other(err),
            other => ApiError::DatabaseError(other.to_string()),
        }
    }
}

impl From<ConfigError> for ApiError {
    fn from(err: ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}

impl From<csv::Error> for ApiError {
    fn from(err: csv::Error) -> Self {
        ApiError::ExportError(err.to_string())
    }
}

impl From<std::io::Error> for ApiError {
    fn from(err: std::io::Error) -> Self {
        ApiError::ExportError(err.to_string())
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_unavailable_keeps_dataset() {
        let err: ApiError = DataSourceError::unavailable(Dataset::Inventory, "timeout").into();
        match err {
            ApiError::DataUnavailable { dataset, reason } => {
                assert_eq!(dataset, Dataset::Inventory);
                assert_eq!(reason, "timeout");
            }
            other => panic!("Expected DataUnavailable, got {:?}", other),
        }
    }

    #[test]
    fn test_config_error_message() {
        let err: ApiError = ConfigError::InvalidValue {
            key: "risk_threshold".to_string(),
            value: "15".to_string(),
            message: "must be within [0, 10]".to_string(),
        }
        .into();
        assert!(err.to_string().contains("risk_threshold"));
    }
}
