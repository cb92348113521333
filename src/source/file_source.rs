// ==========================================
// TB CareMap - 文件目录数据源
// ==========================================
// 目录中每个数据集一个文件,文件名为表名:
//   TB_INVENTORY.csv / TB_CARE_CASCADE.xlsx / tb_providers.xls ...
// 查找顺序: 原名 → 小写名; csv → xlsx → xls
// ==========================================

use crate::domain::inventory::InventoryObservation;
use crate::domain::network::{CascadeRecord, DepotRecord, ProviderRecord};
use crate::domain::types::Dataset;
use crate::importer::{FieldMapper, ImportResult, RawRow, UniversalFileParser};
use crate::source::error::{DataSourceError, DataSourceResult};
use crate::source::DataSource;
use async_trait::async_trait;
use std::path::{Path, PathBuf};

const SUPPORTED_EXTENSIONS: [&str; 3] = ["csv", "xlsx", "xls"];

pub struct FileDataSource {
    dir: PathBuf,
}

impl FileDataSource {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// 定位数据集对应的文件
    pub fn resolve_file(&self, dataset: Dataset) -> Option<PathBuf> {
        let table = dataset.table_name();
        let stems = [table.to_string(), table.to_lowercase()];

        stems
            .iter()
            .flat_map(|stem| {
                SUPPORTED_EXTENSIONS
                    .iter()
                    .map(move |ext| self.dir.join(format!("{}.{}", stem, ext)))
            })
            .find(|path| path.is_file())
    }

    /// 读取并映射一个数据集
    async fn load<T, F>(&self, dataset: Dataset, map_row: F) -> DataSourceResult<Vec<T>>
    where
        T: Send + 'static,
        F: Fn(&FieldMapper, &RawRow, usize) -> ImportResult<T> + Send + 'static,
    {
        let path = self.resolve_file(dataset).ok_or_else(|| {
            DataSourceError::unavailable(
                dataset,
                format!("no data file found in {}", self.dir.display()),
            )
        })?;

        tracing::debug!(dataset = %dataset, path = %path.display(), "读取数据文件");

        // 文件解析为同步 IO
        let records = tokio::task::spawn_blocking(move || -> ImportResult<Vec<T>> {
            let rows = UniversalFileParser.parse(&path)?;
            FieldMapper.map_all(&rows, map_row)
        })
        .await
        .map_err(|e| DataSourceError::unavailable(dataset, e))?
        .map_err(|e| DataSourceError::unavailable(dataset, e))?;

        Ok(records)
    }
}

#[async_trait]
impl DataSource for FileDataSource {
    async fn fetch_inventory(&self) -> DataSourceResult<Vec<InventoryObservation>> {
        self.load(Dataset::Inventory, FieldMapper::map_inventory).await
    }

    async fn fetch_cascade(&self) -> DataSourceResult<Vec<CascadeRecord>> {
        self.load(Dataset::Cascade, FieldMapper::map_cascade).await
    }

    async fn fetch_providers(&self) -> DataSourceResult<Vec<ProviderRecord>> {
        self.load(Dataset::Providers, FieldMapper::map_provider).await
    }

    async fn fetch_depots(&self) -> DataSourceResult<Vec<DepotRecord>> {
        self.load(Dataset::Depots, FieldMapper::map_depot).await
    }
}
