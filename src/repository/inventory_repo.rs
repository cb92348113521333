// ==========================================
// TB CareMap - 库存观测数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑,只负责数据访问
// 表: TB_INVENTORY
// ==========================================

use crate::common::parse_date_best_effort;
use crate::db::open_sqlite_connection;
use crate::domain::inventory::InventoryObservation;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection};
use std::sync::{Arc, Mutex};

// ==========================================
// InventoryRepository - 库存观测仓储
// ==========================================
pub struct InventoryRepository {
    conn: Arc<Mutex<Connection>>,
}

impl InventoryRepository {
    /// 创建新的 InventoryRepository 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建仓储实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 读取全部库存观测（按入库顺序）
    ///
    /// # 说明
    /// - DATE 列按文本读取后尽力解析,无法解析时返回 FieldValueError
    /// - 入库顺序即同日重复观测的决胜顺序
    pub fn list_all(&self) -> RepositoryResult<Vec<InventoryObservation>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT LOCATION, ITEM, CAST(DATE AS TEXT), CLOSING_STOCK,
                   TB_CASES_ACTIVE, LEAD_TIME_DAYS, TB_RISK_SCORE
            FROM TB_INVENTORY
            ORDER BY rowid
            "#,
        )?;

        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, f64>(3)?,
                row.get::<_, i64>(4)?,
                row.get::<_, f64>(5)?,
                row.get::<_, f64>(6)?,
            ))
        })?;

        let mut observations = Vec::new();
        for row in rows {
            let (location, item, raw_date, closing_stock, tb_cases_active, lead_time_days, tb_risk_score) =
                row?;

            let date = parse_date_best_effort(&raw_date).ok_or_else(|| {
                RepositoryError::FieldValueError {
                    table: "TB_INVENTORY".to_string(),
                    field: "DATE".to_string(),
                    message: format!("无法解析日期: {}", raw_date),
                }
            })?;

            observations.push(InventoryObservation {
                location,
                item,
                date,
                closing_stock,
                tb_cases_active,
                lead_time_days,
                tb_risk_score,
            });
        }

        Ok(observations)
    }

    /// 批量插入库存观测
    ///
    /// # 返回
    /// - Ok(usize): 成功插入的记录数
    ///
    /// # 说明
    /// - 使用事务确保原子性
    pub fn batch_insert(&self, observations: &[InventoryObservation]) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let tx = conn.unchecked_transaction()?;

        let mut count = 0;
        for obs in observations {
            tx.execute(
                r#"
                INSERT INTO TB_INVENTORY (
                    LOCATION, ITEM, DATE, CLOSING_STOCK,
                    TB_CASES_ACTIVE, LEAD_TIME_DAYS, TB_RISK_SCORE
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                "#,
                params![
                    obs.location,
                    obs.item,
                    obs.date,
                    obs.closing_stock,
                    obs.tb_cases_active,
                    obs.lead_time_days,
                    obs.tb_risk_score,
                ],
            )?;
            count += 1;
        }

        tx.commit()?;
        Ok(count)
    }

    /// 统计记录数
    pub fn count(&self) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        let count = conn.query_row("SELECT COUNT(*) FROM TB_INVENTORY", [], |row| row.get(0))?;
        Ok(count)
    }
}
