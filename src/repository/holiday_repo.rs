// ==========================================
// 车间排产系统 - 节假日数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================

use crate::domain::calendar::HolidayEntry;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection};
use std::str::FromStr;
use std::sync::{Arc, Mutex};

// ==========================================
// HolidayRepository - 节假日仓储
// ==========================================
pub struct HolidayRepository {
    conn: Arc<Mutex<Connection>>,
}

impl HolidayRepository {
    /// 创建新的 HolidayRepository 实例
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 登记节假日（重复登记幂等）
    pub fn create(&self, entry: &HolidayEntry) -> RepositoryResult<()> {
        let conn = self.get_conn()?;

        conn.execute(
            "INSERT OR IGNORE INTO holiday (team, day) VALUES (?, ?)",
            params![
                &entry.team.to_string(),
                &entry.day.format("%Y-%m-%d").to_string(),
            ],
        )?;

        Ok(())
    }

    /// 查询全部节假日
    pub fn list_all(&self) -> RepositoryResult<Vec<HolidayEntry>> {
        let conn = self.get_conn()?;

        let mut stmt = conn.prepare("SELECT team, day FROM holiday ORDER BY team ASC, day ASC")?;

        let entries = stmt
            .query_map([], |row| {
                Ok(HolidayEntry {
                    team: FromStr::from_str(&row.get::<_, String>(0)?).map_err(|e: String| {
                        rusqlite::Error::FromSqlConversionFailure(
                            0,
                            rusqlite::types::Type::Text,
                            e.into(),
                        )
                    })?,
                    day: chrono::NaiveDate::parse_from_str(&row.get::<_, String>(1)?, "%Y-%m-%d")
                        .map_err(|e| {
                            rusqlite::Error::FromSqlConversionFailure(
                                1,
                                rusqlite::types::Type::Text,
                                Box::new(e),
                            )
                        })?,
                })
            })?
            .collect::<Result<Vec<HolidayEntry>, _>>()?;

        Ok(entries)
    }
}
