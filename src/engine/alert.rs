// ==========================================
// TB CareMap - 告警分类引擎
// ==========================================
// 职责: 快照行 → Critical / Warning / Adequate 三层告警
// 输入: 最新快照 (已附派生指标)
// 输出: AlertReport
// ==========================================
// 规则 (可解释):
// - Critical: days_until_stockout_vs_lead < 0
//   - 缺口 > 7 天: CRITICAL,否则 URGENT
// - Warning: days_until_stockout_vs_lead >= 0 且 stock_risk_flag
// - Adequate: 其余 (含指标不适用的行)
// ==========================================

use crate::domain::inventory::{DerivedMetrics, SnapshotRow};
use crate::domain::types::{AlertTier, SeverityLabel};
use serde::{Deserialize, Serialize};

/// 缺口天数严格大于该值时标记为 CRITICAL
pub const CRITICAL_SHORTFALL_DAYS: f64 = 7.0;

// ==========================================
// CriticalAlert - 严重告警
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriticalAlert {
    pub row: SnapshotRow,
    pub shortfall_days: f64,   // 缺口天数 (正数)
    pub label: SeverityLabel,  // CRITICAL / URGENT
    pub reason: String,        // 可读原因
}

// ==========================================
// AlertReport - 分类结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AlertReport {
    /// 按 days_until_stockout_vs_lead 升序 (最负在前)
    pub critical: Vec<CriticalAlert>,
    /// 按 days_of_therapy_left 升序
    pub warning: Vec<SnapshotRow>,
    pub adequate_count: usize,
    /// programmatic_risk >= 阈值的行数
    pub high_risk_count: usize,
}

impl AlertReport {
    /// 参与分类的总行数
    pub fn total(&self) -> usize {
        self.critical.len() + self.warning.len() + self.adequate_count
    }
}

// ==========================================
// AlertClassifier - 告警分类器
// ==========================================
pub struct AlertClassifier {
    // 无状态引擎
}

impl AlertClassifier {
    pub fn new() -> Self {
        Self {}
    }

    /// 判定单行所属分层
    ///
    /// 指标不适用 (None) 的比较一律为假,因此只可能落入 Adequate
    pub fn tier_of(&self, metrics: &DerivedMetrics) -> AlertTier {
        match metrics.days_until_stockout_vs_lead {
            Some(gap) if gap < 0.0 => AlertTier::Critical,
            Some(gap) if gap >= 0.0 && metrics.stock_risk_flag => AlertTier::Warning,
            _ => AlertTier::Adequate,
        }
    }

    /// 严重告警子标签 (边界: 严格大于 7 天)
    pub fn severity_label(&self, shortfall_days: f64) -> SeverityLabel {
        if shortfall_days > CRITICAL_SHORTFALL_DAYS {
            SeverityLabel::Critical
        } else {
            SeverityLabel::Urgent
        }
    }

    /// 对快照整体分类
    ///
    /// # 参数
    /// - `snapshot`: 最新快照行
    /// - `risk_threshold`: 高风险阈值 (programmatic_risk >= 阈值计入 high_risk_count)
    pub fn classify(&self, snapshot: &[SnapshotRow], risk_threshold: f64) -> AlertReport {
        let mut report = AlertReport::default();

        for row in snapshot {
            if row.metrics.programmatic_risk >= risk_threshold {
                report.high_risk_count += 1;
            }

            match self.tier_of(&row.metrics) {
                AlertTier::Critical => {
                    let shortfall_days = row.metrics.shortfall_days().unwrap_or(0.0);
                    let label = self.severity_label(shortfall_days);
                    report.critical.push(CriticalAlert {
                        row: row.clone(),
                        shortfall_days,
                        label,
                        reason: format!(
                            "{} / {}: stock runs out {:.1} days before the next delivery",
                            row.location(),
                            row.item(),
                            shortfall_days
                        ),
                    });
                }
                AlertTier::Warning => report.warning.push(row.clone()),
                AlertTier::Adequate => report.adequate_count += 1,
            }
        }

        // 稳定排序: 相同键保持快照顺序
        report.critical.sort_by(|a, b| {
            let ga = a.row.metrics.days_until_stockout_vs_lead.unwrap_or(0.0);
            let gb = b.row.metrics.days_until_stockout_vs_lead.unwrap_or(0.0);
            ga.total_cmp(&gb)
        });
        report.warning.sort_by(|a, b| {
            let da = a.metrics.days_of_therapy_left.unwrap_or(0.0);
            let db = b.metrics.days_of_therapy_left.unwrap_or(0.0);
            da.total_cmp(&db)
        });

        report
    }
}

impl Default for AlertClassifier {
    fn default() -> Self {
        Self::new()
    }
}

// ==========================================
// 单元测试
// ==========================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::inventory::InventoryObservation;
    use chrono::NaiveDate;

    fn row(location: &str, gap: Option<f64>, flag: bool, risk: f64) -> SnapshotRow {
        SnapshotRow {
            observation: InventoryObservation {
                location: location.to_string(),
                item: "RegimenA".to_string(),
                date: NaiveDate::from_ymd_opt(2025, 2, 1).unwrap(),
                closing_stock: 100.0,
                tb_cases_active: 30,
                lead_time_days: 20.0,
                tb_risk_score: risk,
            },
            metrics: DerivedMetrics {
                daily_need: 1.0,
                days_of_therapy_left: gap.map(|g| g + 20.0),
                stock_risk_flag: flag,
                programmatic_risk: risk,
                days_until_stockout_vs_lead: gap,
                suggested_reorder_qty: 0.0,
            },
        }
    }

    #[test]
    fn test_tier_of() {
        let classifier = AlertClassifier::new();
        assert_eq!(classifier.tier_of(&row("A", Some(-1.0), true, 1.0).metrics), AlertTier::Critical);
        assert_eq!(classifier.tier_of(&row("A", Some(0.0), true, 1.0).metrics), AlertTier::Warning);
        assert_eq!(classifier.tier_of(&row("A", Some(5.0), false, 1.0).metrics), AlertTier::Adequate);
        assert_eq!(classifier.tier_of(&row("A", None, false, 1.0).metrics), AlertTier::Adequate);
    }

    #[test]
    fn test_severity_label_boundary() {
        let classifier = AlertClassifier::new();
        assert_eq!(classifier.severity_label(7.0), SeverityLabel::Urgent);
        assert_eq!(classifier.severity_label(7.1), SeverityLabel::Critical);
        assert_eq!(classifier.severity_label(0.5), SeverityLabel::Urgent);
    }

    #[test]
    fn test_classify_labels_critical_rows() {
        let classifier = AlertClassifier::new();
        let snapshot = vec![row("A", Some(-7.0), true, 4.0), row("B", Some(-7.1), true, 4.0)];
        let report = classifier.classify(&snapshot, 8.0);

        assert_eq!(report.critical.len(), 2);
        // 最负在前
        assert_eq!(report.critical[0].row.location(), "B");
        assert_eq!(report.critical[0].label, SeverityLabel::Critical);
        assert!((report.critical[0].shortfall_days - 7.1).abs() < 1e-9);
        assert_eq!(report.critical[1].label, SeverityLabel::Urgent);
        assert_eq!(report.critical[1].shortfall_days, 7.0);
        assert!(report.critical[1].reason.contains("7.0 days"));
    }

    #[test]
    fn test_classify_partition_and_ordering() {
        let classifier = AlertClassifier::new();
        let snapshot = vec![
            row("A", Some(-2.0), true, 9.0),
            row("B", Some(10.0), true, 3.0),
            row("C", Some(-12.0), true, 8.0),
            row("D", None, false, 10.0),
            row("E", Some(1.0), true, 2.0),
            row("F", Some(40.0), false, 1.0),
        ];
        let report = classifier.classify(&snapshot, 8.0);

        assert_eq!(report.total(), snapshot.len());
        let critical: Vec<&str> = report.critical.iter().map(|a| a.row.location()).collect();
        assert_eq!(critical, vec!["C", "A"]);
        let warning: Vec<&str> = report.warning.iter().map(|r| r.location()).collect();
        assert_eq!(warning, vec!["E", "B"]);
        assert_eq!(report.adequate_count, 2);
        // A(9), C(8), D(10)
        assert_eq!(report.high_risk_count, 3);
    }

    #[test]
    fn test_classify_empty_snapshot() {
        let report = AlertClassifier::new().classify(&[], 8.0);
        assert_eq!(report, AlertReport::default());
    }
}
