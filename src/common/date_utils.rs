// ==========================================
// TB CareMap - 日期解析工具
// ==========================================
// 数仓导出与人工表格的日期格式不统一,统一在此尽力解析
// ==========================================

use chrono::{NaiveDate, NaiveDateTime};

/// 尽力解析日期字符串
///
/// # 支持格式
/// - `%Y-%m-%d` (例如: 2025-01-31)
/// - `%Y%m%d` (例如: 20250131)
/// - `%Y/%m/%d` (例如: 2025/01/31)
/// - `%Y-%m-%d %H:%M:%S` / `%Y-%m-%dT%H:%M:%S` (取日期部分)
/// - RFC3339 (取本地日期部分)
///
/// # 返回
/// - `Some(NaiveDate)`: 解析成功
/// - `None`: 空串或无法识别
pub fn parse_date_best_effort(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    for fmt in ["%Y-%m-%d", "%Y%m%d", "%Y/%m/%d"] {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d);
        }
    }
    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_local().date());
    }
    None
}
