// ==========================================
// TB CareMap - SQLite 连接初始化
// ==========================================
// 目标:
// - 统一所有 Connection::open 的 PRAGMA 行为
// - 统一 busy_timeout，减少并发读取时的偶发 busy 错误
// - 提供数仓表结构（TB_INVENTORY 等）与 config_kv 的建表入口
// - 应用读取数仓时只读打开,不建表也不新建文件
// ==========================================

use rusqlite::{Connection, OpenFlags, OptionalExtension};
use std::time::Duration;

/// 默认 busy_timeout（毫秒）
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// 当前代码所期望的 schema_version
pub const CURRENT_SCHEMA_VERSION: i64 = 1;

/// 配置 SQLite 连接的统一 PRAGMA
///
/// 说明：
/// - foreign_keys 需要“每个连接”单独开启
/// - busy_timeout 需要“每个连接”单独配置
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// 打开 SQLite 连接并应用统一配置
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// 只读打开已存在的数仓文件
///
/// 文件不存在时返回 CannotOpen 错误,不会新建文件
pub fn open_sqlite_connection_read_only(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open_with_flags(
        db_path,
        OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_URI | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// 判断表是否存在
pub fn table_exists(conn: &Connection, table: &str) -> rusqlite::Result<bool> {
    let found = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type='table' AND name=?1 LIMIT 1",
            [table],
            |_row| Ok(true),
        )
        .optional()?;
    Ok(found.unwrap_or(false))
}

/// 初始化数仓表结构（幂等）
///
/// 表名与列名沿用数仓原始命名（大写）
pub fn init_warehouse_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS TB_INVENTORY (
            LOCATION TEXT NOT NULL,
            ITEM TEXT NOT NULL,
            DATE TEXT NOT NULL,
            CLOSING_STOCK REAL NOT NULL,
            TB_CASES_ACTIVE INTEGER NOT NULL,
            LEAD_TIME_DAYS REAL NOT NULL,
            TB_RISK_SCORE REAL NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_tb_inventory_key
            ON TB_INVENTORY (LOCATION, ITEM, DATE);

        CREATE TABLE IF NOT EXISTS TB_CARE_CASCADE (
            LOCATION TEXT NOT NULL,
            MEDIAN_PATIENT_DELAY_DAYS REAL NOT NULL,
            MEDIAN_DIAGNOSTIC_DELAY_DAYS REAL NOT NULL,
            MEDIAN_TREATMENT_DELAY_DAYS REAL NOT NULL
        );

        CREATE TABLE IF NOT EXISTS TB_PROVIDERS (
            FACILITY_ID TEXT NOT NULL,
            FACILITY_NAME TEXT NOT NULL,
            LOCATION TEXT NOT NULL,
            DOCTOR_COUNT INTEGER NOT NULL,
            INCENTIVE_SCHEME TEXT
        );

        CREATE TABLE IF NOT EXISTS TB_DEPOTS (
            DEPOT_ID TEXT NOT NULL,
            DEPOT_NAME TEXT NOT NULL,
            LOCATION TEXT NOT NULL,
            REGION TEXT NOT NULL,
            STOCK_LEVEL REAL NOT NULL,
            LATITUDE REAL,
            LONGITUDE REAL
        );

        CREATE TABLE IF NOT EXISTS config_kv (
            scope_id TEXT NOT NULL,
            key TEXT NOT NULL,
            value TEXT NOT NULL,
            updated_at TEXT NOT NULL DEFAULT (datetime('now')),
            PRIMARY KEY (scope_id, key)
        );
        "#,
    )?;

    conn.execute(
        "INSERT OR IGNORE INTO schema_version (version) VALUES (?1)",
        [CURRENT_SCHEMA_VERSION],
    )?;

    Ok(())
}

/// 读取 schema_version（若表不存在则返回 None）
pub fn read_schema_version(conn: &Connection) -> rusqlite::Result<Option<i64>> {
    if !table_exists(conn, "schema_version")? {
        return Ok(None);
    }

    let v: Option<i64> = conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| row.get(0))?;
    Ok(v)
}
