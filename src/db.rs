// ==========================================
// 车间排产系统 - SQLite 连接初始化
// ==========================================
// 目标:
// - 统一所有 Connection::open 的 PRAGMA 行为，避免"部分模块外键开启/部分不开启"
// - 统一 busy_timeout，减少并发写入时的偶发 busy 错误
// - 提供幂等的建表入口（测试/引导用；生产表由外部 CRUD 系统维护）
// ==========================================

use rusqlite::Connection;
use rusqlite::OptionalExtension;
use std::time::Duration;

/// 默认 busy_timeout（毫秒）
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// 当前代码所期望的 schema_version
///
/// 说明：
/// - 版本号用于**提示/告警**（不做自动迁移），避免静默在旧库上运行导致隐性错误。
pub const CURRENT_SCHEMA_VERSION: i64 = 1;

/// 配置 SQLite 连接的统一 PRAGMA
///
/// 说明：
/// - foreign_keys 需要"每个连接"单独开启
/// - busy_timeout 需要"每个连接"单独配置
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

    let v: Option<i64> =
        conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| row.get(0))?;
    Ok(v)
}

/// 初始化引擎所需的全部表结构（幂等）
///
/// 说明：
///// - 日期列统一 TEXT "%Y-%m-%d"，时间列统一 TEXT "%Y-%m-%d %H:%M:%S"
/// - schedule_slot 由 SchedulePersister 独占写入，其余表由外部 CRUD 维护
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS config_kv (
            scope_id TEXT NOT NULL DEFAULT 'global',
            key TEXT NOT NULL,
            value TEXT NOT NULL,
            updated_at TEXT NOT NULL DEFAULT (datetime('now')),
            PRIMARY KEY (scope_id, key)
        );

        CREATE TABLE IF NOT EXISTS project (
            project_id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            client TEXT NOT NULL,
            start_date TEXT NOT NULL,
            installation_date TEXT NOT NULL,
            complexity REAL NOT NULL,
            status TEXT NOT NULL,
            created_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS phase (
            phase_id TEXT PRIMARY KEY,
            project_id TEXT NOT NULL REFERENCES project(project_id),
            name TEXT NOT NULL,
            sequence_no INTEGER NOT NULL,
            start_date TEXT,
            end_date TEXT
        );
        CREATE INDEX IF NOT EXISTS idx_phase_project ON phase(project_id, sequence_no);

        CREATE TABLE IF NOT EXISTS standard_task (
            standard_task_id TEXT PRIMARY KEY,
            task_number INTEGER NOT NULL,
            name TEXT NOT NULL,
            time_coefficient REAL,
            day_counter INTEGER NOT NULL DEFAULT 0,
            hourly_cost REAL
        );

        CREATE TABLE IF NOT EXISTS production_route (
            route_id TEXT PRIMARY KEY,
            name TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS route_member (
            route_id TEXT NOT NULL REFERENCES production_route(route_id),
            standard_task_id TEXT NOT NULL REFERENCES standard_task(standard_task_id),
            PRIMARY KEY (route_id, standard_task_id)
        );

        CREATE TABLE IF NOT EXISTS workstation (
            workstation_id TEXT PRIMARY KEY,
            name TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS workstation_capability (
            workstation_id TEXT NOT NULL REFERENCES workstation(workstation_id),
            standard_task_id TEXT NOT NULL REFERENCES standard_task(standard_task_id),
            PRIMARY KEY (workstation_id, standard_task_id)
        );

        CREATE TABLE IF NOT EXISTS task (
            task_id TEXT PRIMARY KEY,
            phase_id TEXT NOT NULL REFERENCES phase(phase_id),
            standard_task_id TEXT,
            name TEXT NOT NULL,
            duration_minutes INTEGER NOT NULL,
            due_date TEXT,
            status TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_task_phase ON task(phase_id);

        CREATE TABLE IF NOT EXISTS task_workstation (
            task_id TEXT NOT NULL REFERENCES task(task_id),
            workstation_id TEXT NOT NULL REFERENCES workstation(workstation_id),
            PRIMARY KEY (task_id, workstation_id)
        );

        CREATE TABLE IF NOT EXISTS holiday (
            team TEXT NOT NULL,
            day TEXT NOT NULL,
            PRIMARY KEY (team, day)
        );

        CREATE TABLE IF NOT EXISTS schedule_slot (
            task_id TEXT PRIMARY KEY,
            project_id TEXT NOT NULL,
            workstation_id TEXT NOT NULL,
            start_at TEXT NOT NULL,
            end_at TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_slot_project ON schedule_slot(project_id);
        "#,
    )?;

    conn.execute(
        "INSERT OR IGNORE INTO schema_version (version) VALUES (?1)",
        [CURRENT_SCHEMA_VERSION],
    )?;

    Ok(())
}
