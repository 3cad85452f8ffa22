// ==========================================
// 车间排产系统 - 项目与阶段数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// 约束: 所有查询使用参数化，防止 SQL 注入
// ==========================================

use crate::domain::project::{Phase, Project};
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::{params, Connection};
use std::str::FromStr;
use std::sync::{Arc, Mutex};

// ==========================================
// ProjectRepository - 项目仓储
// ==========================================
pub struct ProjectRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ProjectRepository {
    /// 创建新的 ProjectRepository 实例
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 创建项目
    pub fn create(&self, project: &Project) -> RepositoryResult<String> {
        let conn = self.get_conn()?;

        conn.execute(
            r#"INSERT INTO project (
                project_id, name, client, start_date, installation_date,
                complexity, status, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)"#,
            params![
                &project.project_id,
                &project.name,
                &project.client,
                &project.start_date.format("%Y-%m-%d").to_string(),
                &project.installation_date.format("%Y-%m-%d").to_string(),
                project.complexity,
                &project.status.to_string(),
                &project.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            ],
        )?;

        Ok(project.project_id.clone())
    }

    /// 按 project_id 查询项目
    ///
    /// # 返回
    /// - `Ok(Some(Project))`: 找到项目
    /// - `Ok(None)`: 未找到项目
    pub fn find_by_id(&self, project_id: &str) -> RepositoryResult<Option<Project>> {
        let conn = self.get_conn()?;

        match conn.query_row(
            r#"SELECT project_id, name, client, start_date, installation_date,
                      complexity, status, created_at
               FROM project
               WHERE project_id = ?"#,
            params![project_id],
            |row| Self::map_row(row),
        ) {
            Ok(project) => Ok(Some(project)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// 查询全部项目
    ///
    /// # 返回
    /// 按 (created_at, project_id) 升序——排产遍历顺序的唯一依据
    pub fn list_all(&self) -> RepositoryResult<Vec<Project>> {
        let conn = self.get_conn()?;

        let mut stmt = conn.prepare(
            r#"SELECT project_id, name, client, start_date, installation_date,
                      complexity, status, created_at
               FROM project
               ORDER BY created_at ASC, project_id ASC"#,
        )?;

        let projects = stmt
            .query_map([], |row| Self::map_row(row))?
            .collect::<Result<Vec<Project>, _>>()?;

        Ok(projects)
    }

    /// 更新项目状态
    pub fn update_status(&self, project_id: &str, status: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;

        let affected = conn.execute(
            "UPDATE project SET status = ? WHERE project_id = ?",
            params![status, project_id],
        )?;

        if affected == 0 {
            return Err(RepositoryError::NotFound {
                entity: "Project".to_string(),
                id: project_id.to_string(),
            });
        }

        Ok(())
    }

    /// 行映射
    fn map_row(row: &rusqlite::Row) -> rusqlite::Result<Project> {
        Ok(Project {
            project_id: row.get(0)?,
            name: row.get(1)?,
            client: row.get(2)?,
            start_date: parse_date(row, 3)?,
            installation_date: parse_date(row, 4)?,
            complexity: row.get(5)?,
            status: FromStr::from_str(&row.get::<_, String>(6)?).map_err(|e: String| {
                rusqlite::Error::FromSqlConversionFailure(
                    6,
                    rusqlite::types::Type::Text,
                    e.into(),
                )
            })?,
            created_at: parse_datetime(row, 7)?,
        })
    }
}

// ==========================================
// PhaseRepository - 阶段仓储
// ==========================================
pub struct PhaseRepository {
    conn: Arc<Mutex<Connection>>,
}

impl PhaseRepository {
    /// 创建新的 PhaseRepository 实例
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 创建阶段
    pub fn create(&self, phase: &Phase) -> RepositoryResult<String> {
        let conn = self.get_conn()?;

        conn.execute(
            r#"INSERT INTO phase (
                phase_id, project_id, name, sequence_no, start_date, end_date
            ) VALUES (?, ?, ?, ?, ?, ?)"#,
            params![
                &phase.phase_id,
                &phase.project_id,
                &phase.name,
                phase.sequence_no,
                phase.start_date.map(|d| d.format("%Y-%m-%d").to_string()),
                phase.end_date.map(|d| d.format("%Y-%m-%d").to_string()),
            ],
        )?;

        Ok(phase.phase_id.clone())
    }

    /// 查询项目的全部阶段（按 sequence_no 升序）
    pub fn list_by_project(&self, project_id: &str) -> RepositoryResult<Vec<Phase>> {
        let conn = self.get_conn()?;

        let mut stmt = conn.prepare(
            r#"SELECT phase_id, project_id, name, sequence_no, start_date, end_date
               FROM phase
               WHERE project_id = ?
               ORDER BY sequence_no ASC, phase_id ASC"#,
        )?;

        let phases = stmt
            .query_map(params![project_id], |row| Self::map_row(row))?
            .collect::<Result<Vec<Phase>, _>>()?;

        Ok(phases)
    }

    /// 查询全部阶段（按项目、sequence_no 升序）
    pub fn list_all(&self) -> RepositoryResult<Vec<Phase>> {
        let conn = self.get_conn()?;

        let mut stmt = conn.prepare(
            r#"SELECT phase_id, project_id, name, sequence_no, start_date, end_date
               FROM phase
               ORDER BY project_id ASC, sequence_no ASC, phase_id ASC"#,
        )?;

        let phases = stmt
            .query_map([], |row| Self::map_row(row))?
            .collect::<Result<Vec<Phase>, _>>()?;

        Ok(phases)
    }

    fn map_row(row: &rusqlite::Row) -> rusqlite::Result<Phase> {
        Ok(Phase {
            phase_id: row.get(0)?,
            project_id: row.get(1)?,
            name: row.get(2)?,
            sequence_no: row.get(3)?,
            start_date: row
                .get::<_, Option<String>>(4)?
                .and_then(|s| NaiveDate::parse_from_str(&s, "%Y-%m-%d").ok()),
            end_date: row
                .get::<_, Option<String>>(5)?
                .and_then(|s| NaiveDate::parse_from_str(&s, "%Y-%m-%d").ok()),
        })
    }
}

// ==========================================
// 行解析辅助
// ==========================================

pub(crate) fn parse_date(row: &rusqlite::Row, idx: usize) -> rusqlite::Result<NaiveDate> {
    NaiveDate::parse_from_str(&row.get::<_, String>(idx)?, "%Y-%m-%d").map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}

pub(crate) fn parse_datetime(row: &rusqlite::Row, idx: usize) -> rusqlite::Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(&row.get::<_, String>(idx)?, "%Y-%m-%d %H:%M:%S").map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}
