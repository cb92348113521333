// ==========================================
// TB CareMap - 库存风险流水线
// ==========================================
// 流程: 最新快照选择 → 行级指标计算 → 告警分类
// 红线: 同步、无状态、单遍; 相同输入得到相同输出
// ==========================================

use crate::domain::inventory::{InventoryObservation, SnapshotRow};
use crate::engine::alert::{AlertClassifier, AlertReport};
use crate::engine::metrics::RowMetricCalculator;
use crate::engine::snapshot::LatestSnapshotSelector;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// 计算最新快照并附加派生指标
///
/// # 返回
/// 每个 (location, item) 一行,按分区键升序
pub fn compute_snapshot<I>(observations: I) -> Vec<SnapshotRow>
where
    I: IntoIterator<Item = InventoryObservation>,
{
    let selector = LatestSnapshotSelector::new();
    let calculator = RowMetricCalculator::new();

    let latest = selector.select_latest(observations);
    tracing::debug!(rows = latest.len(), "最新快照选择完成");

    latest.into_iter().map(|obs| calculator.attach(obs)).collect()
}

/// 对快照进行告警分类
pub fn classify_alerts(snapshot: &[SnapshotRow], risk_threshold: f64) -> AlertReport {
    AlertClassifier::new().classify(snapshot, risk_threshold)
}

// ==========================================
// SnapshotFilter - 快照过滤条件
// ==========================================
// None 表示不过滤 (全选)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotFilter {
    pub provinces: Option<BTreeSet<String>>,
    pub regimens: Option<BTreeSet<String>>,
}

impl SnapshotFilter {
    /// 全选
    pub fn all() -> Self {
        Self::default()
    }

    pub fn with_provinces<I, S>(mut self, provinces: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.provinces = Some(provinces.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_regimens<I, S>(mut self, regimens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.regimens = Some(regimens.into_iter().map(Into::into).collect());
        self
    }

    /// 单行是否命中
    pub fn matches(&self, row: &SnapshotRow) -> bool {
        let province_ok = self
            .provinces
            .as_ref()
            .map_or(true, |set| set.contains(row.location()));
        let regimen_ok = self
            .regimens
            .as_ref()
            .map_or(true, |set| set.contains(row.item()));
        province_ok && regimen_ok
    }

    /// 过滤快照 (返回新集合,不修改输入)
    pub fn apply(&self, snapshot: &[SnapshotRow]) -> Vec<SnapshotRow> {
        snapshot
            .iter()
            .filter(|row| self.matches(row))
            .cloned()
            .collect()
    }
}

/// 快照中出现的省份 (升序去重)
pub fn available_provinces(snapshot: &[SnapshotRow]) -> Vec<String> {
    snapshot
        .iter()
        .map(|row| row.location().to_string())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// 快照中出现的治疗方案 (升序去重)
pub fn available_regimens(snapshot: &[SnapshotRow]) -> Vec<String> {
    snapshot
        .iter()
        .map(|row| row.item().to_string())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
