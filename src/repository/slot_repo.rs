// ==========================================
// 车间排产系统 - 排产落位数据仓储
// ==========================================
// 红线: schedule_slot 仅由 SchedulePersister 经本仓储写入
// 语义: 按输入覆盖的项目集合整体替换，task_id 为落位主键
// ==========================================

use crate::domain::schedule::ScheduleSlot;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::project_repo::parse_datetime;
use rusqlite::{params, Connection};
use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};

// ==========================================
// ScheduleSlotRepository - 落位仓储
// ==========================================
pub struct ScheduleSlotRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ScheduleSlotRepository {
    /// 创建新的 ScheduleSlotRepository 实例
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 整体替换输入覆盖项目的落位（单事务，幂等）
    ///
    /// 规则：
    /// 1) 取输入落位的项目ID集合
    /// 2) 删除这些项目已存储的全部落位
    /// 3) 写入输入落位（task_id 为主键）
    ///
    /// 同一落位列表重复持久化得到完全相同的存储状态。
    pub fn replace_for_projects(&self, slots: &[ScheduleSlot]) -> RepositoryResult<usize> {
        let mut conn = self.get_conn()?;
        let tx = conn
            .transaction()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        let project_ids: BTreeSet<&str> =
            slots.iter().map(|slot| slot.project_id.as_str()).collect();

        for project_id in project_ids {
            tx.execute(
                "DELETE FROM schedule_slot WHERE project_id = ?",
                params![project_id],
            )?;
        }

        for slot in slots {
            tx.execute(
                r#"INSERT OR REPLACE INTO schedule_slot (
                    task_id, project_id, workstation_id, start_at, end_at
                ) VALUES (?, ?, ?, ?, ?)"#,
                params![
                    &slot.task_id,
                    &slot.project_id,
                    &slot.workstation_id,
                    &slot.start_at.format("%Y-%m-%d %H:%M:%S").to_string(),
                    &slot.end_at.format("%Y-%m-%d %H:%M:%S").to_string(),
                ],
            )?;
        }

        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        Ok(slots.len())
    }

    /// 查询全部落位（按 task_id 升序，保证可比对的稳定输出）
    pub fn list_all(&self) -> RepositoryResult<Vec<ScheduleSlot>> {
        let conn = self.get_conn()?;

        let mut stmt = conn.prepare(
            r#"SELECT task_id, project_id, workstation_id, start_at, end_at
               FROM schedule_slot
               ORDER BY task_id ASC"#,
        )?;

        let slots = stmt
            .query_map([], |row| Self::map_row(row))?
            .collect::<Result<Vec<ScheduleSlot>, _>>()?;

        Ok(slots)
    }

    /// 查询项目的全部落位（按开工时刻升序）
    pub fn list_by_project(&self, project_id: &str) -> RepositoryResult<Vec<ScheduleSlot>> {
        let conn = self.get_conn()?;

        let mut stmt = conn.prepare(
            r#"SELECT task_id, project_id, workstation_id, start_at, end_at
               FROM schedule_slot
               WHERE project_id = ?
               ORDER BY start_at ASC, task_id ASC"#,
        )?;

        let slots = stmt
            .query_map(params![project_id], |row| Self::map_row(row))?
            .collect::<Result<Vec<ScheduleSlot>, _>>()?;

        Ok(slots)
    }

    fn map_row(row: &rusqlite::Row) -> rusqlite::Result<ScheduleSlot> {
        Ok(ScheduleSlot {
            task_id: row.get(0)?,
            project_id: row.get(1)?,
            workstation_id: row.get(2)?,
            start_at: parse_datetime(row, 3)?,
            end_at: parse_datetime(row, 4)?,
        })
    }
}
