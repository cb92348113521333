// ==========================================
// TB CareMap - 文件读取层
// ==========================================
// 职责: 外部文件 → 原始行 → 领域记录
// 支持: Excel, CSV
// ==========================================

// 模块声明
pub mod error;
pub mod field_mapper;
pub mod file_parser;

// 重导出核心类型
pub use error::{ImportError, ImportResult};
pub use field_mapper::FieldMapper;
pub use file_parser::{CsvParser, ExcelParser, FileParser, RawRow, UniversalFileParser};
