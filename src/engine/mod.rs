// ==========================================
// TB CareMap - 引擎层
// ==========================================
// 职责: 库存风险派生与告警分类
// 红线: 引擎不做 I/O, 所有告警必须输出可读原因
// ==========================================

pub mod alert;
pub mod metrics;
pub mod pipeline;
pub mod snapshot;

// 重导出核心引擎
pub use alert::{AlertClassifier, AlertReport, CriticalAlert, CRITICAL_SHORTFALL_DAYS};
pub use metrics::{RowMetricCalculator, DAYS_PER_MONTH, SAFETY_BUFFER_DAYS};
pub use pipeline::{
    available_provinces, available_regimens, classify_alerts, compute_snapshot, SnapshotFilter,
};
pub use snapshot::LatestSnapshotSelector;
