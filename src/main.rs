// ==========================================
// TB CareMap - 命令行入口
// ==========================================
// 用法:
//   tb-caremap [数仓文件或数据目录] [导出目录]
//
// 读取数据 → 生成概览与网络报表 (stdout, JSON)
// → 写出严重告警采购清单 CSV
// ==========================================

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use anyhow::Context;
use chrono::Local;
use serde_json::json;

use tb_caremap::api::DashboardRequest;
use tb_caremap::app::{get_default_db_path, AppState};
use tb_caremap::report::default_export_file_name;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tb_caremap::logging::init();

    let mut args = std::env::args().skip(1);
    let location = args.next().unwrap_or_else(get_default_db_path);
    let export_dir = args
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));

    tracing::info!("==================================================");
    tracing::info!("{} - 药品库存风险决策支持", tb_caremap::APP_NAME);
    tracing::info!("系统版本: {}", tb_caremap::VERSION);
    tracing::info!("==================================================");

    let state = AppState::new(&location)
        .await
        .with_context(|| format!("无法初始化数据位置: {}", location))?;

    let request = DashboardRequest::default();
    let report = state.dashboard_api.full_report(&request).await?;

    let dashboard = &report.dashboard;
    for (label, count) in dashboard.status.entries() {
        tracing::info!(status = label, count, "供应状态");
    }
    for alert in &dashboard.alerts.critical {
        tracing::warn!(label = %alert.label, "{}", alert.reason);
    }

    let summary = json!({
        "kpi": dashboard.kpi,
        "status": dashboard.status,
        "critical_summary": dashboard.critical_summary,
        "top_warnings": dashboard.top_warnings.len(),
        "cascade_total_delay": report.cascade.total_delay,
        "provider_provinces": report.providers.provinces,
        "depot_regions": report.depots.regions,
    });
    println!("{}", serde_json::to_string_pretty(&summary)?);

    // 采购清单 (第二次取数命中缓存)
    std::fs::create_dir_all(&export_dir)
        .with_context(|| format!("无法创建导出目录: {}", export_dir.display()))?;
    let export_path = export_dir.join(default_export_file_name(Local::now()));
    let file = File::create(&export_path)
        .with_context(|| format!("无法创建导出文件: {}", export_path.display()))?;

    let written = state
        .dashboard_api
        .export_critical_alerts_csv(&request, BufWriter::new(file))
        .await?;

    tracing::info!(path = %export_path.display(), rows = written, "采购清单已写出");
    Ok(())
}
