// ==========================================
// TB CareMap - 药品仓库汇总
// ==========================================

use crate::domain::network::DepotRecord;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 区域库存合计
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionStock {
    pub region: String,
    pub depot_count: usize,
    pub total_stock: f64,
}

/// 地图点位 (仅经纬度齐全的仓库)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepotGeoPoint {
    pub depot_name: String,
    pub location: String,
    pub latitude: f64,
    pub longitude: f64,
    pub stock_level: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DepotSummary {
    /// 按库存降序 (稳定排序)
    pub depots: Vec<DepotRecord>,
    /// 按区域名升序
    pub regions: Vec<RegionStock>,
    pub geo_points: Vec<DepotGeoPoint>,
}

impl DepotSummary {
    pub fn build(depots: &[DepotRecord]) -> Self {
        let mut sorted = depots.to_vec();
        sorted.sort_by(|a, b| b.stock_level.total_cmp(&a.stock_level));

        let mut regions: BTreeMap<&str, (usize, f64)> = BTreeMap::new();
        for depot in depots {
            let entry = regions.entry(depot.region.as_str()).or_insert((0, 0.0));
            entry.0 += 1;
            entry.1 += depot.stock_level;
        }

        let geo_points = sorted
            .iter()
            .filter_map(|d| {
                d.coordinates().map(|(latitude, longitude)| DepotGeoPoint {
                    depot_name: d.depot_name.clone(),
                    location: d.location.clone(),
                    latitude,
                    longitude,
                    stock_level: d.stock_level,
                })
            })
            .collect();

        Self {
            regions: regions
                .into_iter()
                .map(|(region, (depot_count, total_stock))| RegionStock {
                    region: region.to_string(),
                    depot_count,
                    total_stock,
                })
                .collect(),
            depots: sorted,
            geo_points,
        }
    }
}
