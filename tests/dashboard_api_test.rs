// ==========================================
// DashboardApi 集成测试
// ==========================================
// 测试范围:
// 1. 库存概览: load_dashboard (KPI / 状态分布 / 风险矩阵 / 过滤)
// 2. 严重告警: critical_alerts, export_critical_alerts_csv
// 3. 诊疗网络: cascade_statistics, provider_network, depot_summary
// 4. 完整报表: full_report
// ==========================================


use std::sync::Arc;

use chrono::NaiveDate;
use tb_caremap::api::{ApiError, DashboardApi, DashboardRequest};
use tb_caremap::config::DashboardSettings;
use tb_caremap::domain::types::SeverityLabel;
use tb_caremap::engine::SnapshotFilter;
use tb_caremap::report::EXPORT_HEADERS;
use tb_caremap::source::WarehouseDataSource;
use test_helpers::{create_seeded_db, MemoryDataSource};

fn memory_api() -> DashboardApi {
    DashboardApi::new(
        Arc::new(MemoryDataSource::scenario()),
        DashboardSettings::default(),
    )
}

// ==========================================
// 库存概览
// ==========================================

#[tokio::test]
async fn test_load_dashboard_全量() {
    let api = memory_api();
    let view = api.load_dashboard(&DashboardRequest::default()).await.unwrap();

    assert_eq!(view.risk_threshold, 8.0);
    assert_eq!(view.kpi.provinces_monitored, 3);
    assert_eq!(view.kpi.regimens_tracked, 3);
    assert_eq!(view.kpi.total_active_cases, 1230);
    assert_eq!(view.kpi.high_risk_count, 3);
    assert_eq!(view.kpi.critical_alert_count, 2);
    assert_eq!(view.kpi.record_count, 7);
    assert_eq!(view.kpi.snapshot_row_count, 4);
    assert_eq!(view.kpi.latest_observation_date, NaiveDate::from_ymd_opt(2025, 3, 3));

    assert_eq!(view.status.critical, 2);
    assert_eq!(view.status.warning, 0);
    assert_eq!(view.status.adequate, 2);

    assert_eq!(view.province_options, vec!["Bali", "Jakarta", "Papua"]);
    assert_eq!(view.regimen_options, vec!["RegimenA", "RegimenB", "RegimenC"]);
    assert_eq!(view.risk_matrix.get("Jakarta", "RegimenA"), Some(12.0));
    assert_eq!(view.risk_matrix.get("Bali", "RegimenC"), None);

    assert_eq!(view.critical_summary.item_count, 2);
    assert_eq!(view.critical_summary.provinces_affected, 2);
    assert_eq!(view.critical_summary.affected_active_cases, 1200);
}

#[tokio::test]
async fn test_load_dashboard_按省份过滤() {
    let api = memory_api();
    let request = DashboardRequest::with_filter(SnapshotFilter::all().with_provinces(["Papua"]));
    let view = api.load_dashboard(&request).await.unwrap();

    assert_eq!(view.snapshot.len(), 1);
    assert_eq!(view.status.critical, 0);
    assert_eq!(view.kpi.high_risk_count, 1);
    // KPI 中的省份数与在治合计不受过滤影响
    assert_eq!(view.kpi.provinces_monitored, 3);
    assert_eq!(view.kpi.total_active_cases, 1230);
    // 过滤选项来自未过滤快照
    assert_eq!(view.province_options.len(), 3);
}

#[tokio::test]
async fn test_load_dashboard_阈值覆盖() {
    let api = memory_api();

    let request = DashboardRequest {
        risk_threshold: Some(10.0),
        ..Default::default()
    };
    let view = api.load_dashboard(&request).await.unwrap();
    assert_eq!(view.risk_threshold, 10.0);
    assert_eq!(view.kpi.high_risk_count, 1);

    let invalid = DashboardRequest {
        risk_threshold: Some(10.5),
        ..Default::default()
    };
    assert!(matches!(
        api.load_dashboard(&invalid).await,
        Err(ApiError::InvalidInput(_))
    ));
}

// ==========================================
// 严重告警
// ==========================================

#[tokio::test]
async fn test_critical_alerts_排序与标签() {
    let api = memory_api();
    let alerts = api.critical_alerts(&DashboardRequest::default()).await.unwrap();

    assert_eq!(alerts.len(), 2);
    assert_eq!(alerts[0].row.location(), "Jakarta");
    assert_eq!(alerts[0].label, SeverityLabel::Critical);
    assert_eq!(alerts[0].row.metrics.suggested_reorder_qty, 1500.0);
    assert_eq!(alerts[1].row.location(), "Bali");
    assert_eq!(alerts[1].label, SeverityLabel::Urgent);
    assert!((alerts[1].shortfall_days - 5.0).abs() < 1e-9);
    assert!(alerts[1].reason.contains("Bali / RegimenA"));
}

#[tokio::test]
async fn test_export_critical_alerts_csv() {
    let api = memory_api();
    let mut buf = Vec::new();

    let written = api
        .export_critical_alerts_csv(&DashboardRequest::default(), &mut buf)
        .await
        .unwrap();
    assert_eq!(written, 2);

    let mut reader = csv::Reader::from_reader(buf.as_slice());
    let headers: Vec<String> = reader.headers().unwrap().iter().map(String::from).collect();
    assert_eq!(headers, EXPORT_HEADERS.to_vec());

    let records: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
    assert_eq!(records.len(), 2);
    assert_eq!(&records[0][0], "Jakarta");
    assert_eq!(&records[1][0], "Bali");
    assert_eq!(records[1][9].parse::<f64>().unwrap(), 650.0);
}

// ==========================================
// 诊疗网络
// ==========================================

#[tokio::test]
async fn test_network_reports() {
    let api = memory_api();

    let cascade = api.cascade_statistics().await.unwrap();
    let total = cascade.total_delay.unwrap();
    assert_eq!(total.mean, 37.0);
    assert_eq!(total.min, 24.0);
    assert_eq!(total.max, 50.0);
    assert_eq!(cascade.stage_means.unwrap().patient_delay_days, 22.0);

    let providers = api.provider_network().await.unwrap();
    let jakarta = providers
        .provinces
        .iter()
        .find(|p| p.location == "Jakarta")
        .unwrap();
    assert_eq!(jakarta.active_cases, 900);
    assert_eq!(jakarta.patients_per_doctor, Some(45.0));

    let depots = api.depot_summary().await.unwrap();
    assert_eq!(depots.depots[0].depot_id, "D01");
    assert_eq!(depots.regions.len(), 2);
    assert_eq!(depots.geo_points.len(), 1);
}

// ==========================================
// SQLite 数仓端到端
// ==========================================

#[tokio::test]
async fn test_full_report_from_warehouse() {
    let (_temp_file, db_path) = create_seeded_db().unwrap();
    let source = WarehouseDataSource::open(&db_path).unwrap();
    let api = DashboardApi::new(Arc::new(source), DashboardSettings::default());

    let report = api.full_report(&DashboardRequest::default()).await.unwrap();

    assert_eq!(report.dashboard.kpi.record_count, 7);
    assert_eq!(report.dashboard.status.critical, 2);
    assert_eq!(report.cascade.rows.len(), 2);
    assert_eq!(report.providers.directory.len(), 2);
    assert_eq!(report.depots.depots.len(), 2);

    // 与内存数据源结果一致
    let expected = memory_api()
        .load_dashboard(&DashboardRequest::default())
        .await
        .unwrap();
    assert_eq!(report.dashboard, expected);
}
