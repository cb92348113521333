// ==========================================
// TB CareMap - 数据源适配层错误类型
// ==========================================

use crate::domain::types::Dataset;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DataSourceError {
    /// 数据集无法取得（连接失败、表/文件缺失、内容无法解析等）
    #[error("数据集不可用 [{dataset}]: {reason}")]
    DataUnavailable { dataset: Dataset, reason: String },
}

impl DataSourceError {
    /// 以任意错误构造 DataUnavailable,保留原始错误文本
    pub fn unavailable(dataset: Dataset, err: impl std::fmt::Display) -> Self {
        DataSourceError::DataUnavailable {
            dataset,
            reason: err.to_string(),
        }
    }

    pub fn dataset(&self) -> Dataset {
        match self {
            DataSourceError::DataUnavailable { dataset, .. } => *dataset,
        }
    }
}

pub type DataSourceResult<T> = Result<T, DataSourceError>;
