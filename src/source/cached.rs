// ==========================================
// TB CareMap - 带 TTL 的缓存数据源
// ==========================================
// 装饰任意 DataSource,每个数据集独立缓存
// 失败结果不缓存;缓存过期后下一次请求重新取数
// ==========================================

use crate::domain::inventory::InventoryObservation;
use crate::domain::network::{CascadeRecord, DepotRecord, ProviderRecord};
use crate::domain::types::Dataset;
use crate::source::error::DataSourceResult;
use crate::source::DataSource;
use async_trait::async_trait;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

struct CacheEntry<T> {
    loaded_at: Instant,
    records: Vec<T>,
}

type Slot<T> = Mutex<Option<CacheEntry<T>>>;

pub struct CachedDataSource {
    inner: Arc<dyn DataSource>,
    ttl: Duration,
    inventory: Slot<InventoryObservation>,
    cascade: Slot<CascadeRecord>,
    providers: Slot<ProviderRecord>,
    depots: Slot<DepotRecord>,
}

impl CachedDataSource {
    pub fn new(inner: Arc<dyn DataSource>, ttl: Duration) -> Self {
        Self {
            inner,
            ttl,
            inventory: Mutex::new(None),
            cascade: Mutex::new(None),
            providers: Mutex::new(None),
            depots: Mutex::new(None),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// 清空全部缓存
    pub async fn invalidate(&self) {
        *self.inventory.lock().await = None;
        *self.cascade.lock().await = None;
        *self.providers.lock().await = None;
        *self.depots.lock().await = None;
        tracing::info!("数据缓存已清空");
    }

    /// 命中未过期缓存则直接返回,否则取数并写入缓存
    ///
    /// 取数期间持有该数据集的锁,并发请求只触发一次取数
    async fn get_or_fetch<T, F, Fut>(
        &self,
        slot: &Slot<T>,
        dataset: Dataset,
        fetch: F,
    ) -> DataSourceResult<Vec<T>>
    where
        T: Clone + Send,
        F: FnOnce() -> Fut + Send,
        Fut: Future<Output = DataSourceResult<Vec<T>>> + Send,
    {
        let mut guard = slot.lock().await;

        if let Some(entry) = guard.as_ref() {
            if entry.loaded_at.elapsed() < self.ttl {
                tracing::debug!(dataset = %dataset, rows = entry.records.len(), "缓存命中");
                return Ok(entry.records.clone());
            }
        }

        let records = fetch().await?;
        tracing::debug!(dataset = %dataset, rows = records.len(), "缓存刷新");

        *guard = Some(CacheEntry {
            loaded_at: Instant::now(),
            records: records.clone(),
        });
        Ok(records)
    }
}

#[async_trait]
impl DataSource for CachedDataSource {
    async fn fetch_inventory(&self) -> DataSourceResult<Vec<InventoryObservation>> {
        self.get_or_fetch(&self.inventory, Dataset::Inventory, || {
            self.inner.fetch_inventory()
        })
        .await
    }

    async fn fetch_cascade(&self) -> DataSourceResult<Vec<CascadeRecord>> {
        self.get_or_fetch(&self.cascade, Dataset::Cascade, || self.inner.fetch_cascade())
            .await
    }

    async fn fetch_providers(&self) -> DataSourceResult<Vec<ProviderRecord>> {
        self.get_or_fetch(&self.providers, Dataset::Providers, || {
            self.inner.fetch_providers()
        })
        .await
    }

    async fn fetch_depots(&self) -> DataSourceResult<Vec<DepotRecord>> {
        self.get_or_fetch(&self.depots, Dataset::Depots, || self.inner.fetch_depots())
            .await
    }
}
