// ==========================================
// TB CareMap - 诊疗网络领域模型
// ==========================================
// 职责: 诊疗级联延迟、医疗机构、药品仓库
// 说明: 仅用于汇总展示,无派生风险语义
// ==========================================

use serde::{Deserialize, Serialize};

// ==========================================
// CascadeRecord - 诊疗级联延迟
// ==========================================
// 从出现症状到开始治疗的三段中位延迟
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CascadeRecord {
    pub location: String,
    pub median_patient_delay_days: f64,    // 患者延迟
    pub median_diagnostic_delay_days: f64, // 诊断延迟
    pub median_treatment_delay_days: f64,  // 开始治疗延迟
}

impl CascadeRecord {
    /// 总延迟 = 三段之和
    pub fn total_delay_days(&self) -> f64 {
        self.median_patient_delay_days
            + self.median_diagnostic_delay_days
            + self.median_treatment_delay_days
    }
}

// ==========================================
// ProviderRecord - 医疗机构
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderRecord {
    pub facility_id: String,
    pub facility_name: String,
    pub location: String,
    pub doctor_count: i64,
    pub incentive_scheme: Option<String>, // 激励计划
}

// ==========================================
// DepotRecord - 药品仓库
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepotRecord {
    pub depot_id: String,
    pub depot_name: String,
    pub location: String,
    pub region: String,
    pub stock_level: f64,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl DepotRecord {
    /// 经纬度齐全时返回 (lat, lon)
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => Some((lat, lon)),
            _ => None,
        }
    }
}
