// ==========================================
// 工业固废交换 - SQLite 连接初始化
// ==========================================
// 目标:
// - 统一所有 Connection::open 的 PRAGMA 行为
// - 统一 busy_timeout，减少读写并发时的偶发 busy 错误
// - 提供幂等的建表入口（种子程序与测试共用）
// ==========================================

use rusqlite::Connection;
use rusqlite::OptionalExtension;
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

/// 读取 schema_version（若表不存在则返回 None）
pub fn read_schema_version(conn: &Connection) -> rusqlite::Result<Option<i64>> {
    let has_table: bool = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version' LIMIT 1",
            [],
            |_row| Ok(true),
        )
        .optional()?
        .unwrap_or(false);

    if !has_table {
        return Ok(None);
    }

    let v: Option<i64> = conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| row.get(0))?;
    Ok(v)
}

/// 建表（幂等）
///
/// 说明:
/// - hazard_matrix 以 CHECK 约束保证 chem_id_1 < chem_id_2，避免对称重复行
/// - batch_composition 以 (listing_id, chem_id) 为主键，同一化学成分不会重复出现
pub fn ensure_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS config_kv (
            scope_id TEXT NOT NULL,
            key TEXT NOT NULL,
            value TEXT NOT NULL,
            updated_at TEXT NOT NULL DEFAULT (datetime('now')),
            PRIMARY KEY (scope_id, key)
        );

        CREATE TABLE IF NOT EXISTS parties (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            email TEXT NOT NULL UNIQUE,
            industry_type TEXT NOT NULL,
            location TEXT NOT NULL,
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS chemicals (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            hazard_level TEXT NOT NULL CHECK (hazard_level IN ('LOW', 'MEDIUM', 'HIGH'))
        );

        CREATE TABLE IF NOT EXISTS listings (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL REFERENCES parties(id),
            type TEXT NOT NULL CHECK (type IN ('OFFER', 'DEMAND')),
            material_name TEXT NOT NULL,
            total_quantity REAL NOT NULL,
            status TEXT NOT NULL DEFAULT 'ACTIVE',
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS batch_composition (
            listing_id INTEGER NOT NULL REFERENCES listings(id) ON DELETE CASCADE,
            chem_id TEXT NOT NULL REFERENCES chemicals(id),
            percentage REAL NOT NULL CHECK (percentage >= 0 AND percentage <= 100),
            PRIMARY KEY (listing_id, chem_id)
        );

        CREATE TABLE IF NOT EXISTS acceptance_criteria (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            listing_id INTEGER NOT NULL REFERENCES listings(id) ON DELETE CASCADE,
            chem_id TEXT NOT NULL REFERENCES chemicals(id),
            min_percentage REAL,
            max_percentage REAL,
            CHECK (min_percentage IS NOT NULL OR max_percentage IS NOT NULL)
        );

        CREATE TABLE IF NOT EXISTS hazard_matrix (
            chem_id_1 TEXT NOT NULL REFERENCES chemicals(id),
            chem_id_2 TEXT NOT NULL REFERENCES chemicals(id),
            is_incompatible INTEGER NOT NULL DEFAULT 1,
            PRIMARY KEY (chem_id_1, chem_id_2),
            CHECK (chem_id_1 < chem_id_2)
        );

        CREATE TABLE IF NOT EXISTS process_capabilities (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            processor_id INTEGER NOT NULL REFERENCES parties(id),
            input_chem_id TEXT NOT NULL REFERENCES chemicals(id),
            output_chem_id TEXT NOT NULL REFERENCES chemicals(id),
            conversion_efficiency REAL NOT NULL
                CHECK (conversion_efficiency > 0 AND conversion_efficiency <= 1)
        );

        CREATE INDEX IF NOT EXISTS idx_listings_status_type
            ON listings(status, type, created_at);
        CREATE INDEX IF NOT EXISTS idx_listings_owner
            ON listings(user_id, status);
        CREATE INDEX IF NOT EXISTS idx_criteria_listing
            ON acceptance_criteria(listing_id);
        CREATE INDEX IF NOT EXISTS idx_capability_input
            ON process_capabilities(input_chem_id);
        CREATE INDEX IF NOT EXISTS idx_capability_output
            ON process_capabilities(output_chem_id);
        "#,
    )?;

    conn.execute(
        "INSERT OR IGNORE INTO schema_version (version) VALUES (?1)",
        [CURRENT_SCHEMA_VERSION],
    )?;
    Ok(())
}
