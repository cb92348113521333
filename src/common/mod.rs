// ==========================================
// TB CareMap - 公共工具模块
// ==========================================
// 职责: 仓储层与导入层共用的解析工具
// ==========================================

/// 日期解析工具
pub mod date_utils;

// 重新导出常用函数
pub use date_utils::parse_date_best_effort;
