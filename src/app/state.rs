// ==========================================
// TB CareMap - 应用状态
// ==========================================
// 职责: 根据数据位置装配 数据源 → 缓存 → 配置 → DashboardApi
// 数据位置:
// - SQLite 数仓文件 (只读): 读取四张表 + config_kv 配置
// - 文件目录: 读取 TB_*.csv / .xlsx,使用默认配置
// ==========================================

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::api::{ApiError, ApiResult, DashboardApi};
use crate::config::{ConfigManager, DashboardSettings};
use crate::db::{open_sqlite_connection_read_only, table_exists};
use crate::source::{CachedDataSource, DataSource, FileDataSource, WarehouseDataSource};

const CONFIG_TABLE: &str = "config_kv";

/// 数据位置类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Warehouse,
    FileDirectory,
}

/// 应用状态
///
/// 持有驾驶舱 API 与其运行参数
pub struct AppState {
    /// 数据位置 (数仓文件或目录)
    pub location: PathBuf,

    pub source_kind: SourceKind,

    /// 驾驶舱API
    pub dashboard_api: Arc<DashboardApi>,

    /// 缓存数据源 (可手动清空)
    pub cache: Arc<CachedDataSource>,
}

impl AppState {
    /// 创建新的AppState实例
    ///
    /// # 说明
    /// - 目录 → FileDataSource + 默认配置
    /// - 已存在的文件 → SQLite 数仓,只读打开;不建表,缺表在取数时报告 DataUnavailable
    /// - 数仓中没有 config_kv 时使用默认配置
    /// - 路径不存在 → InvalidInput (不会新建文件)
    pub async fn new<P: AsRef<Path>>(location: P) -> ApiResult<Self> {
        let location = location.as_ref().to_path_buf();
        tracing::info!("初始化AppState，数据位置: {}", location.display());

        let (source_kind, inner, settings): (SourceKind, Arc<dyn DataSource>, DashboardSettings) =
            if location.is_dir() {
                (
                    SourceKind::FileDirectory,
                    Arc::new(FileDataSource::new(&location)) as Arc<dyn DataSource>,
                    DashboardSettings::default(),
                )
            } else if location.is_file() {
                let db_path = location.to_string_lossy().to_string();
                let conn = open_sqlite_connection_read_only(&db_path)
                    .map_err(|e| ApiError::DatabaseError(format!("无法打开数据库: {}", e)))?;
                let has_config = table_exists(&conn, CONFIG_TABLE)
                    .map_err(|e| ApiError::DatabaseError(format!("无法读取数仓表结构: {}", e)))?;
                let conn = Arc::new(Mutex::new(conn));

                let settings = if has_config {
                    let config = ConfigManager::from_connection(conn.clone())?;
                    DashboardSettings::load(&config).await?
                } else {
                    tracing::warn!("数仓中没有 {} 表,使用默认运行参数", CONFIG_TABLE);
                    DashboardSettings::default()
                };

                (
                    SourceKind::Warehouse,
                    Arc::new(WarehouseDataSource::from_connection(conn)) as Arc<dyn DataSource>,
                    settings,
                )
            } else {
                return Err(ApiError::InvalidInput(format!(
                    "数据位置不存在: {}",
                    location.display()
                )));
            };

        tracing::info!(
            source = ?source_kind,
            risk_threshold = settings.risk_threshold,
            cache_ttl_secs = settings.cache_ttl_secs,
            fetch_mode = %settings.fetch_mode,
            "运行参数已加载"
        );

        let cache = Arc::new(CachedDataSource::new(inner, settings.cache_ttl()));
        let dashboard_api = Arc::new(DashboardApi::new(cache.clone(), settings));

        Ok(Self {
            location,
            source_kind,
            dashboard_api,
            cache,
        })
    }
}

/// 默认数仓路径
///
/// 优先级: 环境变量 TB_CAREMAP_DB_PATH → 用户数据目录 → 当前目录
pub fn get_default_db_path() -> String {
    if let Ok(path) = std::env::var("TB_CAREMAP_DB_PATH") {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./tb_caremap.db");

    if let Some(data_dir) = dirs::data_dir() {
        let dir = data_dir.join("tb-caremap");
        // 目录创建失败时回退到当前目录
        if std::fs::create_dir_all(&dir).is_ok() {
            path = dir.join("tb_caremap.db");
        }
    }

    path.to_string_lossy().to_string()
}
