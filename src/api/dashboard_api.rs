// ==========================================
// TB CareMap - 驾驶舱 API
// ==========================================
// 职责: 取数 → 快照 → 告警 → 报表 的统一入口
// 架构: API 层 → DataSource (取数) / engine (计算) / report (汇总)
// 红线: 严格模式下任一数据集不可用即终止请求,不做静默降级
// ==========================================

use std::io::Write;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::api::error::{ApiError, ApiResult};
use crate::config::DashboardSettings;
use crate::domain::inventory::{InventoryObservation, SnapshotRow};
use crate::domain::network::{CascadeRecord, DepotRecord, ProviderRecord};
use crate::domain::types::FetchMode;
use crate::engine::{
    available_provinces, available_regimens, classify_alerts, compute_snapshot, AlertReport,
    CriticalAlert, SnapshotFilter,
};
use crate::report::{
    days_distribution, CascadeStatistics, CriticalAlertExport, CriticalSummary, DepotSummary,
    KpiSummary, ProviderNetwork, ProvinceDays, RiskMatrix, StatusBreakdown,
};
use crate::source::{DataSource, DataSourceResult};

// ==========================================
// 请求 / 响应
// ==========================================

/// 驾驶舱查询请求
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DashboardRequest {
    /// 省份/方案过滤 (None = 全选)
    pub filter: SnapshotFilter,
    /// 高风险阈值覆盖 (None = 使用配置值)
    pub risk_threshold: Option<f64>,
}

impl DashboardRequest {
    pub fn with_filter(filter: SnapshotFilter) -> Self {
        Self {
            filter,
            risk_threshold: None,
        }
    }
}

/// 库存概览视图
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardView {
    pub risk_threshold: f64,
    pub kpi: KpiSummary,
    pub status: StatusBreakdown,
    pub risk_matrix: RiskMatrix,
    pub days_distribution: Vec<ProvinceDays>,
    pub alerts: AlertReport,
    pub critical_summary: CriticalSummary,
    /// 预警前 N 条 (N = warning_display_limit)
    pub top_warnings: Vec<SnapshotRow>,
    /// 过滤后的最新快照
    pub snapshot: Vec<SnapshotRow>,
    /// 过滤选项 (来自未过滤快照)
    pub province_options: Vec<String>,
    pub regimen_options: Vec<String>,
}

/// 四类原始数据集
#[derive(Debug, Clone, Default)]
pub struct DashboardDatasets {
    pub inventory: Vec<InventoryObservation>,
    pub cascade: Vec<CascadeRecord>,
    pub providers: Vec<ProviderRecord>,
    pub depots: Vec<DepotRecord>,
}

/// 完整报表 (命令行批量输出使用)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FullReport {
    pub dashboard: DashboardView,
    pub cascade: CascadeStatistics,
    pub providers: ProviderNetwork,
    pub depots: DepotSummary,
}

// ==========================================
// DashboardApi - 驾驶舱 API
// ==========================================
pub struct DashboardApi {
    source: Arc<dyn DataSource>,
    settings: DashboardSettings,
}

impl DashboardApi {
    /// 创建新的DashboardApi实例
    ///
    /// # 参数
    /// - source: 数据源 (可为 CachedDataSource)
    /// - settings: 运行参数
    pub fn new(source: Arc<dyn DataSource>, settings: DashboardSettings) -> Self {
        Self { source, settings }
    }

    pub fn settings(&self) -> &DashboardSettings {
        &self.settings
    }

    // ==========================================
    // 取数
    // ==========================================

    /// 按取数模式处理单个数据集结果
    ///
    /// BestEffort 下失败以空集合代替并记录告警
    fn tolerate<T>(&self, result: DataSourceResult<Vec<T>>) -> DataSourceResult<Vec<T>> {
        match (result, self.settings.fetch_mode) {
            (Err(err), FetchMode::BestEffort) => {
                tracing::warn!(
                    dataset = %err.dataset(),
                    error = %err,
                    "数据集不可用,按空集合继续"
                );
                Ok(Vec::new())
            }
            (result, _) => result,
        }
    }

    async fn fetch_inventory(&self) -> DataSourceResult<Vec<InventoryObservation>> {
        self.tolerate(self.source.fetch_inventory().await)
    }

    async fn fetch_cascade(&self) -> DataSourceResult<Vec<CascadeRecord>> {
        self.tolerate(self.source.fetch_cascade().await)
    }

    async fn fetch_providers(&self) -> DataSourceResult<Vec<ProviderRecord>> {
        self.tolerate(self.source.fetch_providers().await)
    }

    async fn fetch_depots(&self) -> DataSourceResult<Vec<DepotRecord>> {
        self.tolerate(self.source.fetch_depots().await)
    }

    /// 并发读取四类数据集
    pub async fn load_datasets(&self) -> ApiResult<DashboardDatasets> {
        let (inventory, cascade, providers, depots) = futures::try_join!(
            self.fetch_inventory(),
            self.fetch_cascade(),
            self.fetch_providers(),
            self.fetch_depots(),
        )?;

        tracing::info!(
            inventory = inventory.len(),
            cascade = cascade.len(),
            providers = providers.len(),
            depots = depots.len(),
            "数据集读取完成"
        );

        Ok(DashboardDatasets {
            inventory,
            cascade,
            providers,
            depots,
        })
    }

    // ==========================================
    // 库存概览
    // ==========================================

    fn resolve_threshold(&self, request: &DashboardRequest) -> ApiResult<f64> {
        match request.risk_threshold {
            None => Ok(self.settings.risk_threshold),
            Some(t) if (0.0..=10.0).contains(&t) => Ok(t),
            Some(t) => Err(ApiError::InvalidInput(format!(
                "risk_threshold 必须在 [0, 10] 区间内,实际 {}",
                t
            ))),
        }
    }

    /// 由已取得的库存观测构建概览视图（纯计算）
    pub fn build_dashboard(
        &self,
        request: &DashboardRequest,
        inventory: &[InventoryObservation],
    ) -> ApiResult<DashboardView> {
        let risk_threshold = self.resolve_threshold(request)?;

        let full_snapshot = compute_snapshot(inventory.iter().cloned());
        let snapshot = request.filter.apply(&full_snapshot);
        let alerts = classify_alerts(&snapshot, risk_threshold);

        tracing::debug!(
            observations = inventory.len(),
            snapshot = full_snapshot.len(),
            filtered = snapshot.len(),
            "快照计算完成"
        );

        let view = DashboardView {
            risk_threshold,
            kpi: KpiSummary::build(inventory, &full_snapshot, &alerts),
            status: StatusBreakdown::from_report(&alerts),
            risk_matrix: RiskMatrix::build(&snapshot),
            days_distribution: days_distribution(&snapshot),
            critical_summary: CriticalSummary::from_alerts(&alerts.critical),
            top_warnings: alerts
                .warning
                .iter()
                .take(self.settings.warning_display_limit)
                .cloned()
                .collect(),
            province_options: available_provinces(&full_snapshot),
            regimen_options: available_regimens(&full_snapshot),
            alerts,
            snapshot,
        };

        tracing::info!(
            rows = view.snapshot.len(),
            critical = view.status.critical,
            warning = view.status.warning,
            adequate = view.status.adequate,
            high_risk = view.kpi.high_risk_count,
            risk_threshold,
            "驾驶舱概览已生成"
        );

        Ok(view)
    }

    /// 加载库存概览
    pub async fn load_dashboard(&self, request: &DashboardRequest) -> ApiResult<DashboardView> {
        let inventory = self.fetch_inventory().await?;
        self.build_dashboard(request, &inventory)
    }

    /// 严重告警列表 (按缺口天数升序)
    pub async fn critical_alerts(
        &self,
        request: &DashboardRequest,
    ) -> ApiResult<Vec<CriticalAlert>> {
        let risk_threshold = self.resolve_threshold(request)?;
        let inventory = self.fetch_inventory().await?;

        let snapshot = request.filter.apply(&compute_snapshot(inventory));
        Ok(classify_alerts(&snapshot, risk_threshold).critical)
    }

    /// 导出严重告警 CSV
    ///
    /// # 返回
    /// - Ok(usize): 写出的告警行数
    pub async fn export_critical_alerts_csv<W: Write>(
        &self,
        request: &DashboardRequest,
        writer: W,
    ) -> ApiResult<usize> {
        let alerts = self.critical_alerts(request).await?;
        let rows = CriticalAlertExport::from_alerts(&alerts);
        let written = CriticalAlertExport::write_csv(&rows, writer)?;

        tracing::info!(rows = written, "严重告警已导出");
        Ok(written)
    }

    // ==========================================
    // 诊疗网络
    // ==========================================

    pub async fn cascade_statistics(&self) -> ApiResult<CascadeStatistics> {
        let cascade = self.fetch_cascade().await?;
        Ok(CascadeStatistics::build(&cascade))
    }

    /// 医疗机构网络 (在治患者数取自未过滤快照)
    pub async fn provider_network(&self) -> ApiResult<ProviderNetwork> {
        let (providers, inventory) =
            futures::try_join!(self.fetch_providers(), self.fetch_inventory())?;
        let full_snapshot = compute_snapshot(inventory);
        Ok(ProviderNetwork::build(&providers, &full_snapshot))
    }

    pub async fn depot_summary(&self) -> ApiResult<DepotSummary> {
        let depots = self.fetch_depots().await?;
        Ok(DepotSummary::build(&depots))
    }

    // ==========================================
    // 完整报表
    // ==========================================

    /// 一次取数生成全部报表
    pub async fn full_report(&self, request: &DashboardRequest) -> ApiResult<FullReport> {
        let datasets = self.load_datasets().await?;
        let dashboard = self.build_dashboard(request, &datasets.inventory)?;
        let full_snapshot = compute_snapshot(datasets.inventory);

        Ok(FullReport {
            dashboard,
            cascade: CascadeStatistics::build(&datasets.cascade),
            providers: ProviderNetwork::build(&datasets.providers, &full_snapshot),
            depots: DepotSummary::build(&datasets.depots),
        })
    }
}
