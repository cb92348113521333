// ==========================================
// TB CareMap - 汇总报表层
// ==========================================
// 职责: 将快照/告警/网络数据整理为驾驶舱可直接展示的结构
// 红线: 报表只读输入,不改变任何派生指标
// ==========================================

pub mod cascade_report;
pub mod depot_report;
pub mod export;
pub mod provider_report;
pub mod stats;
pub mod summary;

pub use cascade_report::{CascadeDelayRow, CascadeStatistics, StageMeans};
pub use depot_report::{DepotGeoPoint, DepotSummary, RegionStock};
pub use export::{default_export_file_name, CriticalAlertExport, EXPORT_HEADERS};
pub use provider_report::{FacilityEntry, ProviderNetwork, ProvinceCapacity};
pub use stats::NumericStats;
pub use summary::{
    days_distribution, CriticalSummary, KpiSummary, ProvinceDays, RiskCell, RiskMatrix,
    StatusBreakdown,
};
