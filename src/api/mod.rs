// ==========================================
// TB CareMap - API 层
// ==========================================
// 职责: 提供驾驶舱业务接口,供展示层与命令行调用
// ==========================================

pub mod dashboard_api;
pub mod error;

// 重导出核心类型
pub use dashboard_api::{
    DashboardApi, DashboardDatasets, DashboardRequest, DashboardView, FullReport,
};
pub use error::{ApiError, ApiResult};
