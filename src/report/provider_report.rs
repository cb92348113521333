// ==========================================
// TB CareMap - 医疗机构网络汇总
// ==========================================
// 在治患者数取自未过滤快照,按省份合计;无库存数据的省份计 0
// ==========================================

use crate::domain::inventory::SnapshotRow;
use crate::domain::network::ProviderRecord;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// 省级诊疗能力
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProvinceCapacity {
    pub location: String,
    pub facilities: usize,
    pub total_doctors: i64,
    pub active_cases: i64,
    /// 医生数为 0 时不适用
    pub patients_per_doctor: Option<f64>,
}

/// 机构名录条目
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacilityEntry {
    pub facility_name: String,
    pub location: String,
    pub doctor_count: i64,
    pub incentive_scheme: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ProviderNetwork {
    pub provinces: Vec<ProvinceCapacity>,
    pub directory: Vec<FacilityEntry>,
}

impl ProviderNetwork {
    pub fn build(providers: &[ProviderRecord], full_snapshot: &[SnapshotRow]) -> Self {
        let mut cases_by_location: HashMap<&str, i64> = HashMap::new();
        for row in full_snapshot {
            *cases_by_location.entry(row.location()).or_insert(0) += row.observation.tb_cases_active;
        }

        // 省份 → (机构集合, 医生合计)
        let mut groups: BTreeMap<&str, (BTreeSet<&str>, i64)> = BTreeMap::new();
        for provider in providers {
            let entry = groups.entry(provider.location.as_str()).or_default();
            entry.0.insert(provider.facility_id.as_str());
            entry.1 += provider.doctor_count;
        }

        let provinces = groups
            .into_iter()
            .map(|(location, (facilities, total_doctors))| {
                let active_cases = cases_by_location.get(location).copied().unwrap_or(0);
                let patients_per_doctor = if total_doctors != 0 {
                    Some(active_cases as f64 / total_doctors as f64)
                } else {
                    None
                };
                ProvinceCapacity {
                    location: location.to_string(),
                    facilities: facilities.len(),
                    total_doctors,
                    active_cases,
                    patients_per_doctor,
                }
            })
            .collect();

        let directory = providers
            .iter()
            .map(|p| FacilityEntry {
                facility_name: p.facility_name.clone(),
                location: p.location.clone(),
                doctor_count: p.doctor_count,
                incentive_scheme: p.incentive_scheme.clone(),
            })
            .collect();

        Self {
            provinces,
            directory,
        }
    }
}
