// ==========================================
// TB CareMap - 数据文件读取错误
// ==========================================
// 覆盖两段: 文件 → 原始行 (解析), 原始行 → 实体 (映射)
// 行号按文件行计,表头为第 1 行
// ==========================================

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImportError {
    // ===== 解析阶段 =====
    #[error("数据文件不存在: {0}")]
    FileNotFound(String),

    #[error("不支持的数据文件扩展名: {0} (可用: csv / xlsx / xls)")]
    UnsupportedFormat(String),

    #[error("数据文件无法读取: {0}")]
    FileReadError(String),

    #[error("工作簿解析失败: {0}")]
    ExcelParseError(String),

    #[error("CSV 记录解析失败: {0}")]
    CsvParseError(String),

    // ===== 映射阶段 =====
    #[error("第 {row} 行缺少 {field}")]
    MissingField { row: usize, field: String },

    #[error("第 {row} 行 {field} 数值非法: {message}")]
    TypeConversionError {
        row: usize,
        field: String,
        message: String,
    },

    #[error("第 {row} 行 {field} 无法识别为日期: {value}")]
    DateFormatError {
        row: usize,
        field: String,
        value: String,
    },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        ImportError::FileReadError(err.to_string())
    }
}

impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        ImportError::CsvParseError(err.to_string())
    }
}

impl From<calamine::Error> for ImportError {
    fn from(err: calamine::Error) -> Self {
        ImportError::ExcelParseError(err.to_string())
    }
}

pub type ImportResult<T> = Result<T, ImportError>;
