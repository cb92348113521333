// ==========================================
// TB CareMap - 配置层错误类型
// ==========================================

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置存储访问失败: {0}")]
    StoreError(String),

    #[error("锁获取失败: {0}")]
    LockError(String),

    #[error("配置值非法 ({key}={value}): {message}")]
    InvalidValue {
        key: String,
        value: String,
        message: String,
    },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<rusqlite::Error> for ConfigError {
    fn from(err: rusqlite::Error) -> Self {
        ConfigError::StoreError(err.to_string())
    }
}

pub type ConfigResult<T> = Result<T, ConfigError>;
