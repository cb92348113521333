// ==========================================
// TB CareMap - 诊疗网络数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑,只负责数据访问
// 表: TB_CARE_CASCADE / TB_PROVIDERS / TB_DEPOTS
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::network::{CascadeRecord, DepotRecord, ProviderRecord};
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection};
use std::sync::{Arc, Mutex, MutexGuard};

fn lock_conn(conn: &Arc<Mutex<Connection>>) -> RepositoryResult<MutexGuard<'_, Connection>> {
    conn.lock()
        .map_err(|e| RepositoryError::LockError(e.to_string()))
}

// ==========================================
// CascadeRepository - 诊疗级联仓储
// ==========================================
pub struct CascadeRepository {
    conn: Arc<Mutex<Connection>>,
}

impl CascadeRepository {
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 读取全部诊疗级联记录
    pub fn list_all(&self) -> RepositoryResult<Vec<CascadeRecord>> {
        let conn = lock_conn(&self.conn)?;
        let mut stmt = conn.prepare(
            r#"
            SELECT LOCATION, MEDIAN_PATIENT_DELAY_DAYS,
                   MEDIAN_DIAGNOSTIC_DELAY_DAYS, MEDIAN_TREATMENT_DELAY_DAYS
            FROM TB_CARE_CASCADE
            ORDER BY rowid
            "#,
        )?;

        let records = stmt
            .query_map([], |row| {
                Ok(CascadeRecord {
                    location: row.get(0)?,
                    median_patient_delay_days: row.get(1)?,
                    median_diagnostic_delay_days: row.get(2)?,
                    median_treatment_delay_days: row.get(3)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(records)
    }

    /// 批量插入诊疗级联记录
    pub fn batch_insert(&self, records: &[CascadeRecord]) -> RepositoryResult<usize> {
        let conn = lock_conn(&self.conn)?;
        let tx = conn.unchecked_transaction()?;

        for record in records {
            tx.execute(
                r#"
                INSERT INTO TB_CARE_CASCADE (
                    LOCATION, MEDIAN_PATIENT_DELAY_DAYS,
                    MEDIAN_DIAGNOSTIC_DELAY_DAYS, MEDIAN_TREATMENT_DELAY_DAYS
                ) VALUES (?1, ?2, ?3, ?4)
                "#,
                params![
                    record.location,
                    record.median_patient_delay_days,
                    record.median_diagnostic_delay_days,
                    record.median_treatment_delay_days,
                ],
            )?;
        }

        tx.commit()?;
        Ok(records.len())
    }
}

// ==========================================
// ProviderRepository - 医疗机构仓储
// ==========================================
pub struct ProviderRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ProviderRepository {
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 读取全部医疗机构
    pub fn list_all(&self) -> RepositoryResult<Vec<ProviderRecord>> {
        let conn = lock_conn(&self.conn)?;
        let mut stmt = conn.prepare(
            r#"
            SELECT CAST(FACILITY_ID AS TEXT), FACILITY_NAME, LOCATION,
                   DOCTOR_COUNT, INCENTIVE_SCHEME
            FROM TB_PROVIDERS
            ORDER BY rowid
            "#,
        )?;

        let records = stmt
            .query_map([], |row| {
                Ok(ProviderRecord {
                    facility_id: row.get(0)?,
                    facility_name: row.get(1)?,
                    location: row.get(2)?,
                    doctor_count: row.get(3)?,
                    incentive_scheme: row.get(4)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(records)
    }

    /// 批量插入医疗机构
    pub fn batch_insert(&self, records: &[ProviderRecord]) -> RepositoryResult<usize> {
        let conn = lock_conn(&self.conn)?;
        let tx = conn.unchecked_transaction()?;

        for record in records {
            tx.execute(
                r#"
                INSERT INTO TB_PROVIDERS (
                    FACILITY_ID, FACILITY_NAME, LOCATION, DOCTOR_COUNT, INCENTIVE_SCHEME
                ) VALUES (?1, ?2, ?3, ?4, ?5)
                "#,
                params![
                    record.facility_id,
                    record.facility_name,
                    record.location,
                    record.doctor_count,
                    record.incentive_scheme,
                ],
            )?;
        }

        tx.commit()?;
        Ok(records.len())
    }
}

// ==========================================
// DepotRepository - 药品仓库仓储
// ==========================================
pub struct DepotRepository {
    conn: Arc<Mutex<Connection>>,
}

impl DepotRepository {
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 读取全部仓库
    pub fn list_all(&self) -> RepositoryResult<Vec<DepotRecord>> {
        let conn = lock_conn(&self.conn)?;
        let mut stmt = conn.prepare(
            r#"
            SELECT CAST(DEPOT_ID AS TEXT), DEPOT_NAME, LOCATION, REGION,
                   STOCK_LEVEL, LATITUDE, LONGITUDE
            FROM TB_DEPOTS
            ORDER BY rowid
            "#,
        )?;

        let records = stmt
            .query_map([], |row| {
                Ok(DepotRecord {
                    depot_id: row.get(0)?,
                    depot_name: row.get(1)?,
                    location: row.get(2)?,
                    region: row.get(3)?,
                    stock_level: row.get(4)?,
                    latitude: row.get(5)?,
                    longitude: row.get(6)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(records)
    }

    /// 批量插入仓库
    pub fn batch_insert(&self, records: &[DepotRecord]) -> RepositoryResult<usize> {
        let conn = lock_conn(&self.conn)?;
        let tx = conn.unchecked_transaction()?;

        for record in records {
            tx.execute(
                r#"
                INSERT INTO TB_DEPOTS (
                    DEPOT_ID, DEPOT_NAME, LOCATION, REGION,
                    STOCK_LEVEL, LATITUDE, LONGITUDE
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                "#,
                params![
                    record.depot_id,
                    record.depot_name,
                    record.location,
                    record.region,
                    record.stock_level,
                    record.latitude,
                    record.longitude,
                ],
            )?;
        }

        tx.commit()?;
        Ok(records.len())
    }
}
