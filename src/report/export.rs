// ==========================================
// TB CareMap - 严重告警导出 (采购清单)
// ==========================================
// 列顺序固定,供采购团队下游表格直接引用
// Shortfall (Days) 保留原始符号 (剩余天数 - 提前期,严重告警恒为负)
// ==========================================

use crate::engine::CriticalAlert;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::io::Write;

/// 导出列 (顺序即 CSV 表头顺序)
pub const EXPORT_HEADERS: [&str; 10] = [
    "Province",
    "Treatment Regimen",
    "Current Stock",
    "Active Cases",
    "Lead Time (Days)",
    "Supply Days Left",
    "Shortfall (Days)",
    "TB Risk Score",
    "Programmatic Risk",
    "Recommended Order Quantity",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriticalAlertExport {
    #[serde(rename = "Province")]
    pub province: String,
    #[serde(rename = "Treatment Regimen")]
    pub treatment_regimen: String,
    #[serde(rename = "Current Stock")]
    pub current_stock: f64,
    #[serde(rename = "Active Cases")]
    pub active_cases: i64,
    #[serde(rename = "Lead Time (Days)")]
    pub lead_time_days: f64,
    #[serde(rename = "Supply Days Left")]
    pub supply_days_left: Option<f64>,
    #[serde(rename = "Shortfall (Days)")]
    pub shortfall_days: Option<f64>,
    #[serde(rename = "TB Risk Score")]
    pub tb_risk_score: f64,
    #[serde(rename = "Programmatic Risk")]
    pub programmatic_risk: f64,
    #[serde(rename = "Recommended Order Quantity")]
    pub recommended_order_quantity: f64,
}

impl CriticalAlertExport {
    pub fn from_alert(alert: &CriticalAlert) -> Self {
        let obs = &alert.row.observation;
        let metrics = &alert.row.metrics;
        Self {
            province: obs.location.clone(),
            treatment_regimen: obs.item.clone(),
            current_stock: obs.closing_stock,
            active_cases: obs.tb_cases_active,
            lead_time_days: obs.lead_time_days,
            supply_days_left: metrics.days_of_therapy_left,
            shortfall_days: metrics.days_until_stockout_vs_lead,
            tb_risk_score: obs.tb_risk_score,
            programmatic_risk: metrics.programmatic_risk,
            recommended_order_quantity: metrics.suggested_reorder_qty,
        }
    }

    /// 保持告警排序
    pub fn from_alerts(alerts: &[CriticalAlert]) -> Vec<Self> {
        alerts.iter().map(Self::from_alert).collect()
    }

    /// 写出 CSV（无数据时仍输出表头）
    ///
    /// # 返回
    /// - Ok(usize): 写出的数据行数
    pub fn write_csv<W: Write>(rows: &[Self], writer: W) -> csv::Result<usize> {
        let mut csv_writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(writer);

        csv_writer.write_record(EXPORT_HEADERS)?;
        for row in rows {
            csv_writer.serialize(row)?;
        }
        csv_writer.flush()?;

        Ok(rows.len())
    }
}

/// 默认导出文件名: tb_critical_procurement_YYYYMMDD_HHMM.csv
pub fn default_export_file_name(now: DateTime<Local>) -> String {
    format!("tb_critical_procurement_{}.csv", now.format("%Y%m%d_%H%M"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::inventory::InventoryObservation;
    use crate::engine::{classify_alerts, compute_snapshot};
    use chrono::{NaiveDate, TimeZone};

    fn critical_alerts() -> Vec<CriticalAlert> {
        let snapshot = compute_snapshot(vec![InventoryObservation {
            location: "Jakarta".to_string(),
            item: "RegimenA".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 1, 3).unwrap(),
            closing_stock: 200.0,
            tb_cases_active: 900,
            lead_time_days: 20.0,
            tb_risk_score: 6.0,
        }]);
        classify_alerts(&snapshot, 8.0).critical
    }

    #[test]
    fn test_export_row_fields() {
        let rows = CriticalAlertExport::from_alerts(&critical_alerts());
        assert_eq!(rows.len(), 1);

        let row = &rows[0];
        assert_eq!(row.province, "Jakarta");
        assert_eq!(row.active_cases, 900);
        assert_eq!(row.programmatic_risk, 12.0);
        assert_eq!(row.recommended_order_quantity, 1500.0);
        assert!(row.shortfall_days.unwrap() < 0.0);
    }

    #[test]
    fn test_write_csv_header_order() {
        let rows = CriticalAlertExport::from_alerts(&critical_alerts());
        let mut buf = Vec::new();
        let written = CriticalAlertExport::write_csv(&rows, &mut buf).unwrap();
        assert_eq!(written, 1);

        let text = String::from_utf8(buf).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next().unwrap(), EXPORT_HEADERS.join(","));
        assert!(lines.next().unwrap().starts_with("Jakarta,RegimenA,200.0,900,20.0,"));
    }

    #[test]
    fn test_write_csv_empty_still_has_header() {
        let mut buf = Vec::new();
        CriticalAlertExport::write_csv(&[], &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text.lines().count(), 1);
    }

    #[test]
    fn test_default_export_file_name() {
        let now = Local.with_ymd_and_hms(2025, 7, 4, 9, 5, 0).unwrap();
        assert_eq!(
            default_export_file_name(now),
            "tb_critical_procurement_20250704_0905.csv"
        );
    }
}
