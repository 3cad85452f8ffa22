// ==========================================
// 车间排产系统 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写管理
// 存储: config_kv 表 (key-value + scope)
// ==========================================

use crate::config::engine_config::EngineConfig;
use crate::db::open_sqlite_connection;
use crate::domain::types::PhaseTaskOrder;
use rusqlite::{params, Connection};
use std::error::Error;
use std::str::FromStr;
use std::sync::{Arc, Mutex};
use tracing::warn;

// ==========================================
// 配置键全集
// ==========================================
pub const KEY_WORK_START_HOUR: &str = "work_start_hour";
pub const KEY_WORK_END_HOUR: &str = "work_end_hour";
pub const KEY_AT_RISK_THRESHOLD_DAYS: &str = "at_risk_threshold_days";
pub const KEY_FALLBACK_TASK_MINUTES: &str = "fallback_task_minutes";
pub const KEY_SCHEDULE_HORIZON_DAYS: &str = "schedule_horizon_days";
pub const KEY_PHASE_TASK_ORDER: &str = "phase_task_order";

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
    pub fn new(db_path: &str) -> Result<Self, Box<dyn Error>> {
        let conn = open_sqlite_connection(db_path)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    ///
    /// 说明：为保证连接行为一致，会对传入连接再次应用统一 PRAGMA（幂等）。
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Result<Self, Box<dyn Error>> {
        {
            let conn_guard = conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
            crate::db::configure_sqlite_connection(&conn_guard)?;
        }

        Ok(Self { conn })
    }

    /// 从 config_kv 表读取配置值（scope_id='global'）
    ///
    /// # 返回
    /// - Some(String): 配置值
    /// - None: 配置不存在
    fn get_config_value(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let result = conn.query_row(
            "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
            params![key],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(Box::new(e)),
        }
    }

    /// 写入 global scope 的配置值（存在则覆盖）
    pub fn set_config_value(&self, key: &str, value: &str) -> Result<(), Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        conn.execute(
            r#"INSERT INTO config_kv (scope_id, key, value, updated_at)
               VALUES ('global', ?1, ?2, datetime('now'))
               ON CONFLICT(scope_id, key) DO UPDATE SET
                   value = excluded.value,
                   updated_at = excluded.updated_at"#,
            params![key, value],
        )?;

        Ok(())
    }

    /// 读取整型配置（缺失/非法时回退默认值并告警）
    fn get_i64_or(&self, key: &str, default: i64) -> Result<i64, Box<dyn Error>> {
        match self.get_config_value(key)? {
            Some(raw) => match raw.parse::<i64>() {
                Ok(v) => Ok(v),
                Err(_) => {
                    warn!(key, raw = %raw, default, "配置值非法，回退默认值");
                    Ok(default)
                }
            },
            None => Ok(default),
        }
    }

    /// 加载引擎配置快照
    ///
    /// 缺失的键使用默认值；整次引擎运行内配置保持不变。
    ///
    /// # 返回
    /// EngineConfig 类型化配置快照
    pub fn load_engine_config(&self) -> Result<EngineConfig, Box<dyn Error>> {
        let defaults = EngineConfig::default();

        let work_start_hour =
            self.get_i64_or(KEY_WORK_START_HOUR, defaults.work_start_hour as i64)? as u32;
        let work_end_hour =
            self.get_i64_or(KEY_WORK_END_HOUR, defaults.work_end_hour as i64)? as u32;
        let at_risk_threshold_days =
            self.get_i64_or(KEY_AT_RISK_THRESHOLD_DAYS, defaults.at_risk_threshold_days)?;
        let fallback_task_minutes =
            self.get_i64_or(KEY_FALLBACK_TASK_MINUTES, defaults.fallback_task_minutes)?;
        let schedule_horizon_days =
            self.get_i64_or(KEY_SCHEDULE_HORIZON_DAYS, defaults.schedule_horizon_days)?;

        let phase_task_order = match self.get_config_value(KEY_PHASE_TASK_ORDER)? {
            Some(raw) => match PhaseTaskOrder::from_str(&raw) {
                Ok(order) => order,
                Err(_) => {
                    warn!(raw = %raw, "任务排序策略非法，回退默认值");
                    defaults.phase_task_order
                }
            },
            None => defaults.phase_task_order,
        };

        let config = EngineConfig {
            work_start_hour,
            work_end_hour,
            at_risk_threshold_days,
            fallback_task_minutes,
            schedule_horizon_days,
            phase_task_order,
        };

        config.validate()?;

        Ok(config)
    }
}
