// ==========================================
// TB CareMap - 数值统计工具
// ==========================================

use serde::{Deserialize, Serialize};

/// 一组数值的描述统计
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NumericStats {
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    pub min: f64,
    pub max: f64,
}

impl NumericStats {
    /// 空集合返回 None
    ///
    /// 偶数个值的中位数取中间两数的均值
    pub fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }

        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.total_cmp(b));

        let count = sorted.len();
        let mid = count / 2;
        let median = if count % 2 == 0 {
            (sorted[mid - 1] + sorted[mid]) / 2.0
        } else {
            sorted[mid]
        };

        Some(Self {
            count,
            mean: mean(&sorted).unwrap_or(0.0),
            median,
            min: sorted[0],
            max: sorted[count - 1],
        })
    }
}

/// 算术平均,空集合返回 None
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}
