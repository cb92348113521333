// ==========================================
// TB CareMap - SQLite 数仓数据源
// ==========================================
// 读取 TB_INVENTORY / TB_CARE_CASCADE / TB_PROVIDERS / TB_DEPOTS
// 仓储调用为同步 IO,放入 blocking 线程池执行
// ==========================================

use crate::db::open_sqlite_connection_read_only;
use crate::domain::inventory::InventoryObservation;
use crate::domain::network::{CascadeRecord, DepotRecord, ProviderRecord};
use crate::domain::types::Dataset;
use crate::repository::{
    CascadeRepository, DepotRepository, InventoryRepository, ProviderRepository,
    RepositoryResult,
};
use crate::source::error::{DataSourceError, DataSourceResult};
use crate::source::DataSource;
use async_trait::async_trait;
use rusqlite::Connection;
use std::sync::{Arc, Mutex};
use std::time::Instant;

pub struct WarehouseDataSource {
    inventory_repo: Arc<InventoryRepository>,
    cascade_repo: Arc<CascadeRepository>,
    provider_repo: Arc<ProviderRepository>,
    depot_repo: Arc<DepotRepository>,
}

impl WarehouseDataSource {
    /// 打开数仓文件
    ///
    /// 说明：只读打开已存在的文件,不建表;表缺失在取数时以 DataUnavailable 报告
    pub fn open(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection_read_only(db_path)?;
        Ok(Self::from_connection(Arc::new(Mutex::new(conn))))
    }

    /// 四个仓储共享同一连接
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self {
            inventory_repo: Arc::new(InventoryRepository::from_connection(conn.clone())),
            cascade_repo: Arc::new(CascadeRepository::from_connection(conn.clone())),
            provider_repo: Arc::new(ProviderRepository::from_connection(conn.clone())),
            depot_repo: Arc::new(DepotRepository::from_connection(conn)),
        }
    }
}

/// 在 blocking 线程池执行仓储读取,并把失败统一转为 DataUnavailable
async fn run_blocking<T, F>(dataset: Dataset, read: F) -> DataSourceResult<Vec<T>>
where
    T: Send + 'static,
    F: FnOnce() -> RepositoryResult<Vec<T>> + Send + 'static,
{
    let start = Instant::now();
    let records = tokio::task::spawn_blocking(read)
        .await
        .map_err(|e| DataSourceError::unavailable(dataset, e))?
        .map_err(|e| DataSourceError::unavailable(dataset, e))?;

    tracing::debug!(
        dataset = %dataset,
        rows = records.len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "数仓读取完成"
    );
    Ok(records)
}

#[async_trait]
impl DataSource for WarehouseDataSource {
    async fn fetch_inventory(&self) -> DataSourceResult<Vec<InventoryObservation>> {
        let repo = self.inventory_repo.clone();
        run_blocking(Dataset::Inventory, move || repo.list_all()).await
    }

    async fn fetch_cascade(&self) -> DataSourceResult<Vec<CascadeRecord>> {
        let repo = self.cascade_repo.clone();
        run_blocking(Dataset::Cascade, move || repo.list_all()).await
    }

    async fn fetch_providers(&self) -> DataSourceResult<Vec<ProviderRecord>> {
        let repo = self.provider_repo.clone();
        run_blocking(Dataset::Providers, move || repo.list_all()).await
    }

    async fn fetch_depots(&self) -> DataSourceResult<Vec<DepotRecord>> {
        let repo = self.depot_repo.clone();
        run_blocking(Dataset::Depots, move || repo.list_all()).await
    }
}
