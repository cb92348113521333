// ==========================================
// TB CareMap - 配置管理器
// ==========================================
// 职责: 配置加载、查询、写入
// 存储: config_kv 表 (key-value + scope)
// ==========================================

use crate::config::dashboard_config_trait::DashboardConfigReader;
use crate::config::error::{ConfigError, ConfigResult};
use crate::db::open_sqlite_connection;
use crate::domain::types::FetchMode;
use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use serde_json::json;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 高风险阈值 (programmatic_risk)
    pub const RISK_THRESHOLD: &str = "risk_threshold";

    // 数据缓存时长 (秒)
    pub const CACHE_TTL_SECS: &str = "cache_ttl_secs";

    // 预警列表展示条数
    pub const WARNING_DISPLAY_LIMIT: &str = "warning_display_limit";

    // 取数模式 STRICT / BEST_EFFORT
    pub const FETCH_MODE: &str = "fetch_mode";
}

/// 默认值
pub mod config_defaults {
    pub const RISK_THRESHOLD: f64 = 8.0;
    pub const CACHE_TTL_SECS: u64 = 600;
    pub const WARNING_DISPLAY_LIMIT: usize = 10;
}

const GLOBAL_SCOPE: &str = "global";

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> ConfigResult<Self> {
        let conn = open_sqlite_connection(db_path)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    ///
    /// 说明：会对传入连接再次应用统一 PRAGMA（幂等）。
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> ConfigResult<Self> {
        {
            let conn_guard = conn
                .lock()
                .map_err(|e| ConfigError::LockError(e.to_string()))?;
            crate::db::configure_sqlite_connection(&conn_guard)?;
        }

        Ok(Self { conn })
    }

    fn get_conn(&self) -> ConfigResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| ConfigError::LockError(e.to_string()))
    }

    /// 读取 global scope 的配置值
    ///
    /// # 返回
    /// - Some(String): 配置值
    /// - None: 配置不存在
    pub fn get_global_config_value(&self, key: &str) -> ConfigResult<Option<String>> {
        let conn = self.get_conn()?;

        let value = conn
            .query_row(
                "SELECT value FROM config_kv WHERE scope_id = ?1 AND key = ?2",
                params![GLOBAL_SCOPE, key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;

        Ok(value)
    }

    /// 写入 global scope 的配置值（存在则覆盖）
    pub fn set_global_config_value(&self, key: &str, value: &str) -> ConfigResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value) VALUES (?1, ?2, ?3)
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?3, updated_at = datetime('now')",
            params![GLOBAL_SCOPE, key, value],
        )?;
        Ok(())
    }

    /// 获取所有 global 配置的快照（JSON格式,按键排序）
    pub fn get_config_snapshot(&self) -> ConfigResult<String> {
        let conn = self.get_conn()?;

        let mut stmt =
            conn.prepare("SELECT key, value FROM config_kv WHERE scope_id = ?1 ORDER BY key")?;
        let rows = stmt.query_map(params![GLOBAL_SCOPE], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut config_map: BTreeMap<String, String> = BTreeMap::new();
        for row in rows {
            let (key, value) = row?;
            config_map.insert(key, value);
        }

        serde_json::to_string(&json!(config_map))
            .map_err(|e| ConfigError::Other(anyhow::Error::new(e)))
    }

    /// 读取并解析配置值,缺失时返回默认值
    fn parse_or_default<T, F>(&self, key: &str, default: T, parse: F) -> ConfigResult<T>
    where
        F: FnOnce(&str) -> Result<T, String>,
    {
        match self.get_global_config_value(key)? {
            None => Ok(default),
            Some(raw) => parse(raw.trim()).map_err(|message| ConfigError::InvalidValue {
                key: key.to_string(),
                value: raw.clone(),
                message,
            }),
        }
    }
}

// ==========================================
// DashboardConfigReader Trait 实现
// ==========================================
#[async_trait]
impl DashboardConfigReader for ConfigManager {
    async fn get_risk_threshold(&self) -> ConfigResult<f64> {
        self.parse_or_default(
            config_keys::RISK_THRESHOLD,
            config_defaults::RISK_THRESHOLD,
            |raw| {
                let value = raw
                    .parse::<f64>()
                    .map_err(|_| "not a number".to_string())?;
                if (0.0..=10.0).contains(&value) {
                    Ok(value)
                } else {
                    Err("must be within [0, 10]".to_string())
                }
            },
        )
    }

    async fn get_cache_ttl_secs(&self) -> ConfigResult<u64> {
        self.parse_or_default(
            config_keys::CACHE_TTL_SECS,
            config_defaults::CACHE_TTL_SECS,
            |raw| {
                raw.parse::<u64>()
                    .map_err(|_| "not a non-negative integer".to_string())
            },
        )
    }

    async fn get_warning_display_limit(&self) -> ConfigResult<usize> {
        self.parse_or_default(
            config_keys::WARNING_DISPLAY_LIMIT,
            config_defaults::WARNING_DISPLAY_LIMIT,
            |raw| {
                raw.parse::<usize>()
                    .map_err(|_| "not a non-negative integer".to_string())
            },
        )
    }

    async fn get_fetch_mode(&self) -> ConfigResult<FetchMode> {
        self.parse_or_default(config_keys::FETCH_MODE, FetchMode::default(), |raw| {
            FetchMode::parse(raw).ok_or_else(|| "expected STRICT or BEST_EFFORT".to_string())
        })
    }
}
