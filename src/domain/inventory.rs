// ==========================================
// TB CareMap - 库存领域模型
// ==========================================
// 职责: 库存观测、派生指标、快照行
// 红线: 派生指标不落库,每次按需从观测重算
// ==========================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ==========================================
// InventoryObservation - 库存观测
// ==========================================
// 主键: (location, item, date)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryObservation {
    pub location: String,     // 省份
    pub item: String,         // 药品/治疗方案
    pub date: NaiveDate,      // 观测日期

    // ===== 库存事实 =====
    pub closing_stock: f64,   // 期末库存 (单位)
    pub tb_cases_active: i64, // 在治患者数
    pub lead_time_days: f64,  // 采购提前期 (天)

    // ===== 外部输入 =====
    pub tb_risk_score: f64,   // 流行病学风险分 [0,10]
}

impl InventoryObservation {
    /// 快照分区键 (location, item)
    pub fn partition_key(&self) -> (&str, &str) {
        (self.location.as_str(), self.item.as_str())
    }
}

// ==========================================
// DerivedMetrics - 派生指标
// ==========================================
// None 表示"不适用"(在治患者为 0 时),不参与任何数值比较
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedMetrics {
    pub daily_need: f64,                           // 日需求量
    pub days_of_therapy_left: Option<f64>,         // 剩余治疗天数
    pub stock_risk_flag: bool,                     // 库存风险标记
    pub programmatic_risk: f64,                    // 规划风险分 (不封顶)
    pub days_until_stockout_vs_lead: Option<f64>,  // 剩余天数 - 提前期
    pub suggested_reorder_qty: f64,                // 建议补货量
}

impl DerivedMetrics {
    /// 缺口天数 (仅当剩余天数已落后于提前期时有值)
    pub fn shortfall_days(&self) -> Option<f64> {
        self.days_until_stockout_vs_lead
            .filter(|d| *d < 0.0)
            .map(f64::abs)
    }
}

// ==========================================
// SnapshotRow - 快照行
// ==========================================
// 观测 + 派生指标的不可变组合
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotRow {
    pub observation: InventoryObservation,
    pub metrics: DerivedMetrics,
}

impl SnapshotRow {
    pub fn location(&self) -> &str {
        &self.observation.location
    }

    pub fn item(&self) -> &str {
        &self.observation.item
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics_with_gap(gap: Option<f64>) -> DerivedMetrics {
        DerivedMetrics {
            daily_need: 1.0,
            days_of_therapy_left: gap.map(|g| g + 10.0),
            stock_risk_flag: gap.map(|g| g < 0.0).unwrap_or(false),
            programmatic_risk: 5.0,
            days_until_stockout_vs_lead: gap,
            suggested_reorder_qty: 0.0,
        }
    }

    #[test]
    fn test_shortfall_days() {
        assert_eq!(metrics_with_gap(Some(-3.5)).shortfall_days(), Some(3.5));
        assert_eq!(metrics_with_gap(Some(0.0)).shortfall_days(), None);
        assert_eq!(metrics_with_gap(Some(4.0)).shortfall_days(), None);
        assert_eq!(metrics_with_gap(None).shortfall_days(), None);
    }
}
