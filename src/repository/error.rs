// ==========================================
// TB CareMap - 数仓读写错误
// ==========================================
// 缺表单独识别: 上层据此报告具体哪张表不可用
// ==========================================

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("无法打开数仓: {0}")]
    DatabaseConnectionError(String),

    #[error("数仓连接被占用或已损坏: {0}")]
    LockError(String),

    #[error("数仓查询失败: {0}")]
    DatabaseQueryError(String),

    #[error("数仓缺少表 {0}")]
    TableMissing(String),

    // 行内字段无法转换为实体
    #[error("{table}.{field} 取值非法: {message}")]
    FieldValueError {
        table: String,
        field: String,
        message: String,
    },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<rusqlite::Error> for RepositoryError {
    fn from(err: rusqlite::Error) -> Self {
        // prepare 阶段的错误可能携带 SQL 偏移量,统一按消息文本识别缺表
        let text = err.to_string();
        if let Some(pos) = text.find("no such table: ") {
            let table = text[pos + "no such table: ".len()..]
                .split_whitespace()
                .next()
                .unwrap_or("")
                .to_string();
            return RepositoryError::TableMissing(table);
        }

        match err {
            rusqlite::Error::SqliteFailure(_, Some(msg)) => RepositoryError::DatabaseQueryError(msg),
            rusqlite::Error::SqliteFailure(code, None)
                if code.code == rusqlite::ErrorCode::CannotOpen =>
            {
                RepositoryError::DatabaseConnectionError(text)
            }
            _ => RepositoryError::DatabaseQueryError(text),
        }
    }
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;
