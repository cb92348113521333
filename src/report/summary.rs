// ==========================================
// TB CareMap - 库存概览汇总
// ==========================================
// 职责: KPI、状态分布、风险矩阵、剩余治疗天数分布、严重告警摘要
// 输入: 原始观测 / 快照 / 告警结果,均只读
// ==========================================

use crate::domain::inventory::{InventoryObservation, SnapshotRow};
use crate::domain::types::AlertTier;
use crate::engine::{AlertReport, CriticalAlert};
use crate::report::stats::{mean, NumericStats};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

// ==========================================
// KpiSummary - 顶部指标卡
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KpiSummary {
    pub provinces_monitored: usize, // 全部原始观测中的省份数
    pub regimens_tracked: usize,    // 全部原始观测中的方案数
    pub total_active_cases: i64,    // 未过滤快照的在治患者合计
    pub high_risk_count: usize,     // 过滤后 programmatic_risk >= 阈值
    pub critical_alert_count: usize,
    pub record_count: usize,
    pub snapshot_row_count: usize, // 未过滤快照行数
    pub latest_observation_date: Option<NaiveDate>,
}

impl KpiSummary {
    /// # 参数
    /// - observations: 全部原始观测
    /// - full_snapshot: 未过滤的最新快照
    /// - alerts: 过滤后快照的告警结果
    pub fn build(
        observations: &[InventoryObservation],
        full_snapshot: &[SnapshotRow],
        alerts: &AlertReport,
    ) -> Self {
        let provinces: BTreeSet<&str> = observations.iter().map(|o| o.location.as_str()).collect();
        let regimens: BTreeSet<&str> = observations.iter().map(|o| o.item.as_str()).collect();

        Self {
            provinces_monitored: provinces.len(),
            regimens_tracked: regimens.len(),
            total_active_cases: full_snapshot
                .iter()
                .map(|r| r.observation.tb_cases_active)
                .sum(),
            high_risk_count: alerts.high_risk_count,
            critical_alert_count: alerts.critical.len(),
            record_count: observations.len(),
            snapshot_row_count: full_snapshot.len(),
            latest_observation_date: observations.iter().map(|o| o.date).max(),
        }
    }
}

// ==========================================
// StatusBreakdown - 供应状态分布
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StatusBreakdown {
    pub critical: usize,
    pub warning: usize,
    pub adequate: usize,
}

impl StatusBreakdown {
    pub fn from_report(report: &AlertReport) -> Self {
        Self {
            critical: report.critical.len(),
            warning: report.warning.len(),
            adequate: report.adequate_count,
        }
    }

    pub fn count(&self, tier: AlertTier) -> usize {
        match tier {
            AlertTier::Critical => self.critical,
            AlertTier::Warning => self.warning,
            AlertTier::Adequate => self.adequate,
        }
    }

    /// (展示名称, 数量),按严重程度降序
    pub fn entries(&self) -> Vec<(&'static str, usize)> {
        [AlertTier::Critical, AlertTier::Warning, AlertTier::Adequate]
            .into_iter()
            .map(|tier| (tier.status_label(), self.count(tier)))
            .collect()
    }
}

// ==========================================
// RiskMatrix - 省份 × 方案 平均规划风险
// ==========================================
// 无观测的组合不出现
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskCell {
    pub province: String,
    pub regimen: String,
    pub mean_programmatic_risk: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RiskMatrix {
    pub provinces: Vec<String>,
    pub regimens: Vec<String>,
    pub cells: Vec<RiskCell>,
}

impl RiskMatrix {
    pub fn build(snapshot: &[SnapshotRow]) -> Self {
        let mut groups: BTreeMap<(&str, &str), Vec<f64>> = BTreeMap::new();
        for row in snapshot {
            groups
                .entry((row.location(), row.item()))
                .or_default()
                .push(row.metrics.programmatic_risk);
        }

        let provinces: BTreeSet<&str> = groups.keys().map(|(p, _)| *p).collect();
        let regimens: BTreeSet<&str> = groups.keys().map(|(_, r)| *r).collect();

        let cells = groups
            .iter()
            .filter_map(|((province, regimen), values)| {
                mean(values).map(|m| RiskCell {
                    province: province.to_string(),
                    regimen: regimen.to_string(),
                    mean_programmatic_risk: m,
                })
            })
            .collect();

        Self {
            provinces: provinces.into_iter().map(str::to_string).collect(),
            regimens: regimens.into_iter().map(str::to_string).collect(),
            cells,
        }
    }

    pub fn get(&self, province: &str, regimen: &str) -> Option<f64> {
        self.cells
            .iter()
            .find(|c| c.province == province && c.regimen == regimen)
            .map(|c| c.mean_programmatic_risk)
    }
}

// ==========================================
// DaysDistribution - 各省剩余治疗天数分布
// ==========================================
// 仅统计有定义的 days_of_therapy_left
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProvinceDays {
    pub province: String,
    pub values: Vec<f64>,
    pub stats: Option<NumericStats>,
}

pub fn days_distribution(snapshot: &[SnapshotRow]) -> Vec<ProvinceDays> {
    let mut groups: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
    for row in snapshot {
        let values = groups.entry(row.location()).or_default();
        if let Some(days) = row.metrics.days_of_therapy_left {
            values.push(days);
        }
    }

    groups
        .into_iter()
        .map(|(province, values)| ProvinceDays {
            province: province.to_string(),
            stats: NumericStats::from_values(&values),
            values,
        })
        .collect()
}

// ==========================================
// CriticalSummary - 严重告警摘要
// ==========================================
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CriticalSummary {
    pub item_count: usize,
    pub provinces_affected: usize,
    pub affected_active_cases: i64,
    pub mean_shortfall_days: Option<f64>,
}

impl CriticalSummary {
    pub fn from_alerts(alerts: &[CriticalAlert]) -> Self {
        let shortfalls: Vec<f64> = alerts.iter().map(|a| a.shortfall_days).collect();
        let provinces: BTreeSet<&str> = alerts.iter().map(|a| a.row.location()).collect();
        Self {
            item_count: alerts.len(),
            provinces_affected: provinces.len(),
            affected_active_cases: alerts
                .iter()
                .map(|a| a.row.observation.tb_cases_active)
                .sum(),
            mean_shortfall_days: mean(&shortfalls),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{classify_alerts, compute_snapshot};

    fn obs(location: &str, item: &str, day: u32, stock: f64, cases: i64, lead: f64) -> InventoryObservation {
        InventoryObservation {
            location: location.to_string(),
            item: item.to_string(),
            date: NaiveDate::from_ymd_opt(2025, 4, day).unwrap(),
            closing_stock: stock,
            tb_cases_active: cases,
            lead_time_days: lead,
            tb_risk_score: 5.0,
        }
    }

    fn sample() -> Vec<InventoryObservation> {
        vec![
            // Aceh/A: 6.67 天 < 20 → 严重
            obs("Aceh", "RegimenA", 1, 900.0, 900, 20.0),
            obs("Aceh", "RegimenA", 2, 200.0, 900, 20.0),
            // Aceh/B: 在治为 0 → 充足
            obs("Aceh", "RegimenB", 2, 50.0, 0, 10.0),
            // Bali/A: 300 天 → 充足
            obs("Bali", "RegimenA", 2, 3000.0, 300, 30.0),
        ]
    }

    #[test]
    fn test_kpi_summary() {
        let raw = sample();
        let snapshot = compute_snapshot(raw.clone());
        let report = classify_alerts(&snapshot, 8.0);

        let kpi = KpiSummary::build(&raw, &snapshot, &report);
        assert_eq!(kpi.provinces_monitored, 2);
        assert_eq!(kpi.regimens_tracked, 2);
        assert_eq!(kpi.total_active_cases, 1200);
        assert_eq!(kpi.critical_alert_count, 1);
        assert_eq!(kpi.record_count, 4);
        assert_eq!(kpi.snapshot_row_count, 3);
        assert_eq!(kpi.latest_observation_date, NaiveDate::from_ymd_opt(2025, 4, 2));
    }

    #[test]
    fn test_status_breakdown_entries() {
        let snapshot = compute_snapshot(sample());
        let breakdown = StatusBreakdown::from_report(&classify_alerts(&snapshot, 8.0));

        assert_eq!(
            breakdown.entries(),
            vec![
                ("Critical Stockout", 1),
                ("Warning Level", 0),
                ("Adequate Supply", 2)
            ]
        );
    }

    #[test]
    fn test_risk_matrix_missing_cells_absent() {
        let snapshot = compute_snapshot(sample());
        let matrix = RiskMatrix::build(&snapshot);

        assert_eq!(matrix.provinces, vec!["Aceh", "Bali"]);
        assert_eq!(matrix.regimens, vec!["RegimenA", "RegimenB"]);
        assert_eq!(matrix.get("Aceh", "RegimenA"), Some(10.0));
        assert_eq!(matrix.get("Bali", "RegimenB"), None);
    }

    #[test]
    fn test_days_distribution_skips_undefined() {
        let snapshot = compute_snapshot(sample());
        let dist = days_distribution(&snapshot);

        let aceh = dist.iter().find(|d| d.province == "Aceh").unwrap();
        assert_eq!(aceh.values.len(), 1);
        assert!(aceh.stats.is_some());
    }

    #[test]
    fn test_critical_summary() {
        let snapshot = compute_snapshot(sample());
        let report = classify_alerts(&snapshot, 8.0);
        let summary = CriticalSummary::from_alerts(&report.critical);

        assert_eq!(summary.item_count, 1);
        assert_eq!(summary.provinces_affected, 1);
        assert_eq!(summary.affected_active_cases, 900);
        let shortfall = summary.mean_shortfall_days.unwrap();
        assert!((shortfall - (20.0 - 200.0 / 30.0)).abs() < 1e-9);

        let empty = CriticalSummary::from_alerts(&[]);
        assert_eq!(empty.provinces_affected, 0);
        assert_eq!(empty.mean_shortfall_days, None);
    }
}
