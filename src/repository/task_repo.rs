// ==========================================
// 车间排产系统 - 任务数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// 约束: 候选工位链接随任务一并写入/读取（快照语义）
// ==========================================

use crate::domain::task::Task;
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::NaiveDate;
use rusqlite::{params, Connection};
use std::str::FromStr;
use std::sync::{Arc, Mutex};

// ==========================================
// TaskRepository - 任务仓储
// ==========================================
pub struct TaskRepository {
    conn: Arc<Mutex<Connection>>,
}

impl TaskRepository {
    /// 创建新的 TaskRepository 实例
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 批量写入任务（含候选工位链接，单事务）
    ///
    /// 按 task_id 覆盖: 重新生成同一阶段的任务清单得到确定的最终状态。
    pub fn create_batch(&self, tasks: &[Task]) -> RepositoryResult<usize> {
        let mut conn = self.get_conn()?;
        let tx = conn
            .transaction()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        for task in tasks {
            tx.execute(
                "DELETE FROM task_workstation WHERE task_id = ?",
                params![&task.task_id],
            )?;
            tx.execute(
                r#"INSERT OR REPLACE INTO task (
                    task_id, phase_id, standard_task_id, name,
                    duration_minutes, due_date, status
                ) VALUES (?, ?, ?, ?, ?, ?, ?)"#,
                params![
                    &task.task_id,
                    &task.phase_id,
                    &task.standard_task_id,
                    &task.name,
                    task.duration_minutes,
                    task.due_date.map(|d| d.format("%Y-%m-%d").to_string()),
                    &task.status.to_string(),
                ],
            )?;

            for workstation_id in &task.candidate_workstation_ids {
                tx.execute(
                    "INSERT INTO task_workstation (task_id, workstation_id) VALUES (?, ?)",
                    params![&task.task_id, workstation_id],
                )?;
            }
        }

        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        Ok(tasks.len())
    }

    /// 更新任务状态
    pub fn update_status(&self, task_id: &str, status: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;

        let affected = conn.execute(
            "UPDATE task SET status = ? WHERE task_id = ?",
            params![status, task_id],
        )?;

        if affected == 0 {
            return Err(RepositoryError::NotFound {
                entity: "Task".to_string(),
                id: task_id.to_string(),
            });
        }

        Ok(())
    }

    /// 查询阶段的全部任务（按 task_id 升序）
    pub fn list_by_phase(&self, phase_id: &str) -> RepositoryResult<Vec<Task>> {
        let conn = self.get_conn()?;

        let mut stmt = conn.prepare(
            r#"SELECT task_id, phase_id, standard_task_id, name,
                      duration_minutes, due_date, status
               FROM task
               WHERE phase_id = ?
               ORDER BY task_id ASC"#,
        )?;

        let headers = stmt
            .query_map(params![phase_id], |row| Self::map_row(row))?
            .collect::<Result<Vec<Task>, _>>()?;

        Self::attach_candidates(&conn, headers)
    }

    /// 查询全部任务（含候选工位，按 task_id 升序）
    pub fn list_all(&self) -> RepositoryResult<Vec<Task>> {
        let conn = self.get_conn()?;

        let mut stmt = conn.prepare(
            r#"SELECT task_id, phase_id, standard_task_id, name,
                      duration_minutes, due_date, status
               FROM task
               ORDER BY task_id ASC"#,
        )?;

        let headers = stmt
            .query_map([], |row| Self::map_row(row))?
            .collect::<Result<Vec<Task>, _>>()?;

        Self::attach_candidates(&conn, headers)
    }

    /// 为任务列表补充候选工位链接
    fn attach_candidates(conn: &Connection, mut tasks: Vec<Task>) -> RepositoryResult<Vec<Task>> {
        let mut stmt = conn.prepare(
            r#"SELECT workstation_id FROM task_workstation
               WHERE task_id = ?
               ORDER BY workstation_id ASC"#,
        )?;

        for task in &mut tasks {
            task.candidate_workstation_ids = stmt
                .query_map(params![&task.task_id], |row| row.get::<_, String>(0))?
                .collect::<Result<Vec<String>, _>>()?;
        }

        Ok(tasks)
    }

    fn map_row(row: &rusqlite::Row) -> rusqlite::Result<Task> {
        Ok(Task {
            task_id: row.get(0)?,
            phase_id: row.get(1)?,
            standard_task_id: row.get(2)?,
            name: row.get(3)?,
            duration_minutes: row.get(4)?,
            due_date: row
                .get::<_, Option<String>>(5)?
                .and_then(|s| NaiveDate::parse_from_str(&s, "%Y-%m-%d").ok()),
            status: FromStr::from_str(&row.get::<_, String>(6)?).map_err(|e: String| {
                rusqlite::Error::FromSqlConversionFailure(
                    6,
                    rusqlite::types::Type::Text,
                    e.into(),
                )
            })?,
            // 候选工位由 attach_candidates 统一补充
            candidate_workstation_ids: Vec::new(),
        })
    }
}
