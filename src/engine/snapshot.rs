// ==========================================
// TB CareMap - 最新快照选择器
// ==========================================
// 职责: 库存观测时间序列 → 每个 (省份, 方案) 一行最新观测
// 输入: 无序的 InventoryObservation 集合
// 输出: 按 (location, item) 升序的最新观测
// ==========================================
// 同日重复: 输入顺序中靠后的观测胜出 (确定性)
// ==========================================

use crate::domain::inventory::InventoryObservation;
use std::collections::BTreeMap;

// ==========================================
// LatestSnapshotSelector - 最新快照选择器
// ==========================================
pub struct LatestSnapshotSelector {
    // 无状态引擎
}

impl LatestSnapshotSelector {
    pub fn new() -> Self {
        Self {}
    }

    /// 按 (location, item) 分区并选出每个分区日期最大的观测
    ///
    /// # 返回
    /// 每个出现过的 (location, item) 恰好一行,按分区键升序
    pub fn select_latest<I>(&self, observations: I) -> Vec<InventoryObservation>
    where
        I: IntoIterator<Item = InventoryObservation>,
    {
        let mut latest: BTreeMap<(String, String), InventoryObservation> = BTreeMap::new();

        for obs in observations {
            let key = (obs.location.clone(), obs.item.clone());
            match latest.get(&key) {
                // 严格更早的新观测不替换; 同日则后来者胜出
                Some(current) if obs.date < current.date => {}
                _ => {
                    latest.insert(key, obs);
                }
            }
        }

        latest.into_values().collect()
    }
}

impl Default for LatestSnapshotSelector {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn obs(location: &str, item: &str, day: u32, stock: f64) -> InventoryObservation {
        InventoryObservation {
            location: location.to_string(),
            item: item.to_string(),
            date: NaiveDate::from_ymd_opt(2025, 1, day).unwrap(),
            closing_stock: stock,
            tb_cases_active: 100,
            lead_time_days: 14.0,
            tb_risk_score: 5.0,
        }
    }

    #[test]
    fn test_select_latest_single_partition() {
        let selector = LatestSnapshotSelector::new();
        let rows = selector.select_latest(vec![
            obs("Jakarta", "RegimenA", 2, 20.0),
            obs("Jakarta", "RegimenA", 3, 30.0),
            obs("Jakarta", "RegimenA", 1, 10.0),
        ]);

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].date, NaiveDate::from_ymd_opt(2025, 1, 3).unwrap());
        assert_eq!(rows[0].closing_stock, 30.0);
    }

    #[test]
    fn test_one_row_per_partition_sorted_by_key() {
        let selector = LatestSnapshotSelector::new();
        let rows = selector.select_latest(vec![
            obs("Papua", "RegimenB", 5, 1.0),
            obs("Aceh", "RegimenB", 4, 2.0),
            obs("Aceh", "RegimenA", 9, 3.0),
            obs("Papua", "RegimenB", 7, 4.0),
            obs("Aceh", "RegimenA", 1, 5.0),
        ]);

        let keys: Vec<(&str, &str)> = rows.iter().map(|r| r.partition_key()).collect();
        assert_eq!(
            keys,
            vec![("Aceh", "RegimenA"), ("Aceh", "RegimenB"), ("Papua", "RegimenB")]
        );
        assert_eq!(rows[0].closing_stock, 3.0);
        assert_eq!(rows[2].closing_stock, 4.0);
    }

    #[test]
    fn test_same_date_tie_break_keeps_last_in_input_order() {
        let selector = LatestSnapshotSelector::new();
        let rows = selector.select_latest(vec![
            obs("Jakarta", "RegimenA", 3, 111.0),
            obs("Jakarta", "RegimenA", 3, 222.0),
            obs("Jakarta", "RegimenA", 2, 333.0),
        ]);

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].closing_stock, 222.0);
    }

    #[test]
    fn test_empty_input() {
        let selector = LatestSnapshotSelector::new();
        assert!(selector.select_latest(Vec::new()).is_empty());
    }
}
