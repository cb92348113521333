// ==========================================
// TB CareMap - 数据源适配层
// ==========================================
// 职责: 为流水线提供四类原始数据集
// 实现: SQLite 数仓 / 文件目录 / TTL 缓存装饰
// 红线: 适配层只取数,不计算任何派生指标
// ==========================================

pub mod cached;
pub mod error;
pub mod file_source;
pub mod warehouse_source;

use crate::domain::inventory::InventoryObservation;
use crate::domain::network::{CascadeRecord, DepotRecord, ProviderRecord};
use async_trait::async_trait;

pub use cached::CachedDataSource;
pub use error::{DataSourceError, DataSourceResult};
pub use file_source::FileDataSource;
pub use warehouse_source::WarehouseDataSource;

// ==========================================
// DataSource Trait
// ==========================================
// 任一数据集无法取得时返回 DataUnavailable;空集合是合法结果
#[async_trait]
pub trait DataSource: Send + Sync {
    /// 库存观测（全部历史,保持来源顺序）
    async fn fetch_inventory(&self) -> DataSourceResult<Vec<InventoryObservation>>;

    /// 诊疗级联延迟
    async fn fetch_cascade(&self) -> DataSourceResult<Vec<CascadeRecord>>;

    /// 医疗机构
    async fn fetch_providers(&self) -> DataSourceResult<Vec<ProviderRecord>>;

    /// 药品仓库
    async fn fetch_depots(&self) -> DataSourceResult<Vec<DepotRecord>>;
}
