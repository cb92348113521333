// ==========================================
// TB CareMap - 诊疗级联延迟统计
// ==========================================

use crate::domain::network::CascadeRecord;
use crate::report::stats::{mean, NumericStats};
use serde::{Deserialize, Serialize};

/// 单省延迟明细
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CascadeDelayRow {
    pub location: String,
    pub patient_delay_days: f64,
    pub diagnostic_delay_days: f64,
    pub treatment_delay_days: f64,
    pub total_delay_days: f64,
}

/// 全国各阶段平均延迟
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StageMeans {
    pub patient_delay_days: f64,
    pub diagnostic_delay_days: f64,
    pub treatment_delay_days: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CascadeStatistics {
    pub rows: Vec<CascadeDelayRow>,
    pub stage_means: Option<StageMeans>,
    pub total_delay: Option<NumericStats>,
}

impl CascadeStatistics {
    /// 空输入时 stage_means / total_delay 为 None
    pub fn build(records: &[CascadeRecord]) -> Self {
        let rows: Vec<CascadeDelayRow> = records
            .iter()
            .map(|r| CascadeDelayRow {
                location: r.location.clone(),
                patient_delay_days: r.median_patient_delay_days,
                diagnostic_delay_days: r.median_diagnostic_delay_days,
                treatment_delay_days: r.median_treatment_delay_days,
                total_delay_days: r.total_delay_days(),
            })
            .collect();

        let stage = |f: fn(&CascadeDelayRow) -> f64| -> Option<f64> {
            let values: Vec<f64> = rows.iter().map(f).collect();
            mean(&values)
        };

        let stage_means = match (
            stage(|r| r.patient_delay_days),
            stage(|r| r.diagnostic_delay_days),
            stage(|r| r.treatment_delay_days),
        ) {
            (Some(patient), Some(diagnostic), Some(treatment)) => Some(StageMeans {
                patient_delay_days: patient,
                diagnostic_delay_days: diagnostic,
                treatment_delay_days: treatment,
            }),
            _ => None,
        };

        let totals: Vec<f64> = rows.iter().map(|r| r.total_delay_days).collect();
        let total_delay = NumericStats::from_values(&totals);

        Self {
            rows,
            stage_means,
            total_delay,
        }
    }
}
