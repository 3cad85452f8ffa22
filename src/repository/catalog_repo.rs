// ==========================================
// 车间排产系统 - 标准任务目录数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// 覆盖: standard_task / production_route / workstation 及其关联表
// ==========================================

use crate::domain::catalog::{ProductionRoute, StandardTask, Workstation};
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection};
use std::sync::{Arc, Mutex};

// ==========================================
// StandardTaskRepository - 标准任务仓储
// ==========================================
pub struct StandardTaskRepository {
    conn: Arc<Mutex<Connection>>,
}

impl StandardTaskRepository {
    /// 创建新的 StandardTaskRepository 实例
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 创建标准任务
    pub fn create(&self, standard_task: &StandardTask) -> RepositoryResult<String> {
        let conn = self.get_conn()?;

        conn.execute(
            r#"INSERT INTO standard_task (
                standard_task_id, task_number, name, time_coefficient, day_counter, hourly_cost
            ) VALUES (?, ?, ?, ?, ?, ?)"#,
            params![
                &standard_task.standard_task_id,
                standard_task.task_number,
                &standard_task.name,
                standard_task.time_coefficient,
                standard_task.day_counter,
                standard_task.hourly_cost,
            ],
        )?;

        Ok(standard_task.standard_task_id.clone())
    }

    /// 按 standard_task_id 查询
    pub fn find_by_id(&self, standard_task_id: &str) -> RepositoryResult<Option<StandardTask>> {
        let conn = self.get_conn()?;

        match conn.query_row(
            r#"SELECT standard_task_id, task_number, name, time_coefficient, day_counter, hourly_cost
               FROM standard_task
               WHERE standard_task_id = ?"#,
            params![standard_task_id],
            |row| Self::map_row(row),
        ) {
            Ok(task) => Ok(Some(task)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// 查询全部标准任务（按 task_number 升序）
    pub fn list_all(&self) -> RepositoryResult<Vec<StandardTask>> {
        let conn = self.get_conn()?;

        let mut stmt = conn.prepare(
            r#"SELECT standard_task_id, task_number, name, time_coefficient, day_counter, hourly_cost
               FROM standard_task
               ORDER BY task_number ASC, standard_task_id ASC"#,
        )?;

        let tasks = stmt
            .query_map([], |row| Self::map_row(row))?
            .collect::<Result<Vec<StandardTask>, _>>()?;

        Ok(tasks)
    }

    fn map_row(row: &rusqlite::Row) -> rusqlite::Result<StandardTask> {
        Ok(StandardTask {
            standard_task_id: row.get(0)?,
            task_number: row.get(1)?,
            name: row.get(2)?,
            time_coefficient: row.get(3)?,
            day_counter: row.get(4)?,
            hourly_cost: row.get(5)?,
        })
    }
}

// ==========================================
// ProductionRouteRepository - 生产路线仓储
// ==========================================
pub struct ProductionRouteRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ProductionRouteRepository {
    /// 创建新的 ProductionRouteRepository 实例
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 创建路线（含成员）
    pub fn create(&self, route: &ProductionRoute) -> RepositoryResult<String> {
        let mut conn = self.get_conn()?;
        let tx = conn
            .transaction()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        tx.execute(
            "INSERT INTO production_route (route_id, name) VALUES (?, ?)",
            params![&route.route_id, &route.name],
        )?;

        for member_id in &route.member_ids {
            tx.execute(
                "INSERT INTO route_member (route_id, standard_task_id) VALUES (?, ?)",
                params![&route.route_id, member_id],
            )?;
        }

        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        Ok(route.route_id.clone())
    }

    /// 按 route_id 查询路线（含成员）
    pub fn find_by_id(&self, route_id: &str) -> RepositoryResult<Option<ProductionRoute>> {
        let conn = self.get_conn()?;

        let name: Option<String> = match conn.query_row(
            "SELECT name FROM production_route WHERE route_id = ?",
            params![route_id],
            |row| row.get(0),
        ) {
            Ok(name) => Some(name),
            Err(rusqlite::Error::QueryReturnedNoRows) => None,
            Err(e) => return Err(e.into()),
        };

        let Some(name) = name else {
            return Ok(None);
        };

        let mut stmt = conn.prepare(
            r#"SELECT standard_task_id FROM route_member
               WHERE route_id = ?
               ORDER BY standard_task_id ASC"#,
        )?;
        let member_ids = stmt
            .query_map(params![route_id], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<String>, _>>()?;

        Ok(Some(ProductionRoute {
            route_id: route_id.to_string(),
            name,
            member_ids,
        }))
    }

    /// 查询全部路线（含成员）
    pub fn list_all(&self) -> RepositoryResult<Vec<ProductionRoute>> {
        let conn = self.get_conn()?;

        let mut stmt =
            conn.prepare("SELECT route_id, name FROM production_route ORDER BY route_id ASC")?;
        let headers = stmt
            .query_map([], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
            })?
            .collect::<Result<Vec<(String, String)>, _>>()?;

        let mut member_stmt = conn.prepare(
            r#"SELECT standard_task_id FROM route_member
               WHERE route_id = ?
               ORDER BY standard_task_id ASC"#,
        )?;

        let mut routes = Vec::with_capacity(headers.len());
        for (route_id, name) in headers {
            let member_ids = member_stmt
                .query_map(params![&route_id], |row| row.get::<_, String>(0))?
                .collect::<Result<Vec<String>, _>>()?;
            routes.push(ProductionRoute {
                route_id,
                name,
                member_ids,
            });
        }

        Ok(routes)
    }
}

// ==========================================
// WorkstationRepository - 工位仓储
// ==========================================
pub struct WorkstationRepository {
    conn: Arc<Mutex<Connection>>,
}

impl WorkstationRepository {
    /// 创建新的 WorkstationRepository 实例
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 创建工位（含能力链接）
    pub fn create(&self, workstation: &Workstation) -> RepositoryResult<String> {
        let mut conn = self.get_conn()?;
        let tx = conn
            .transaction()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        tx.execute(
            "INSERT INTO workstation (workstation_id, name) VALUES (?, ?)",
            params![&workstation.workstation_id, &workstation.name],
        )?;

        for standard_task_id in &workstation.capable_standard_task_ids {
            tx.execute(
                "INSERT INTO workstation_capability (workstation_id, standard_task_id) VALUES (?, ?)",
                params![&workstation.workstation_id, standard_task_id],
            )?;
        }

        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        Ok(workstation.workstation_id.clone())
    }

    /// 查询全部工位（含能力链接，按 workstation_id 升序）
    pub fn list_all(&self) -> RepositoryResult<Vec<Workstation>> {
        let conn = self.get_conn()?;

        let mut stmt =
            conn.prepare("SELECT workstation_id, name FROM workstation ORDER BY workstation_id ASC")?;
        let headers = stmt
            .query_map([], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
            })?
            .collect::<Result<Vec<(String, String)>, _>>()?;

        let mut cap_stmt = conn.prepare(
            r#"SELECT standard_task_id FROM workstation_capability
               WHERE workstation_id = ?
               ORDER BY standard_task_id ASC"#,
        )?;

        let mut workstations = Vec::with_capacity(headers.len());
        for (workstation_id, name) in headers {
            let capable_standard_task_ids = cap_stmt
                .query_map(params![&workstation_id], |row| row.get::<_, String>(0))?
                .collect::<Result<Vec<String>, _>>()?;
            workstations.push(Workstation {
                workstation_id,
                name,
                capable_standard_task_ids,
            });
        }

        Ok(workstations)
    }
}
