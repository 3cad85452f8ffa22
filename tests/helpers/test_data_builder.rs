// ==========================================
// 测试数据构建器 - 用于集成测试
// ==========================================

use chrono::{NaiveDate, NaiveDateTime};
use workshop_aps::domain::catalog::{ProductionRoute, StandardTask, Workstation};
use workshop_aps::domain::project::{Phase, Project};
use workshop_aps::domain::types::ProjectStatus;

// ==========================================
// Project 构建器
// ==========================================

pub struct ProjectBuilder {
    project_id: String,
    name: String,
    client: String,
    start_date: NaiveDate,
    installation_date: NaiveDate,
    complexity: f64,
    status: ProjectStatus,
    created_at: NaiveDateTime,
}

impl ProjectBuilder {
    pub fn new(project_id: &str) -> Self {
        let start = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
        Self {
            project_id: project_id.to_string(),
            name: format!("项目 {}", project_id),
            client: "客户A".to_string(),
            start_date: start,
            installation_date: NaiveDate::from_ymd_opt(2026, 4, 1).unwrap(),
            complexity: 50.0,
            status: ProjectStatus::Planned,
            created_at: start.and_hms_opt(9, 0, 0).unwrap(),
        }
    }

    pub fn client(mut self, client: &str) -> Self {
        self.client = client.to_string();
        self
    }

    pub fn installation_date(mut self, date: NaiveDate) -> Self {
        self.installation_date = date;
        self
    }

    pub fn complexity(mut self, complexity: f64) -> Self {
        self.complexity = complexity;
        self
    }

    pub fn status(mut self, status: ProjectStatus) -> Self {
        self.status = status;
        self
    }

    pub fn created_at(mut self, at: NaiveDateTime) -> Self {
        self.created_at = at;
        self
    }

    pub fn build(self) -> Project {
        Project {
            project_id: self.project_id,
            name: self.name,
            client: self.client,
            start_date: self.start_date,
            installation_date: self.installation_date,
            complexity: self.complexity,
            status: self.status,
            created_at: self.created_at,
        }
    }
}

// ==========================================
// 其余实体的简易构造函数
// ==========================================

pub fn phase(phase_id: &str, project_id: &str, sequence_no: i32) -> Phase {
    Phase {
        phase_id: phase_id.to_string(),
        project_id: project_id.to_string(),
        name: format!("阶段 {}", sequence_no),
        sequence_no,
        start_date: None,
        end_date: None,
    }
}

pub fn standard_task(
    standard_task_id: &str,
    task_number: i32,
    coefficient: Option<f64>,
    day_counter: i32,
) -> StandardTask {
    StandardTask {
        standard_task_id: standard_task_id.to_string(),
        task_number,
        name: format!("工序 {}", task_number),
        time_coefficient: coefficient,
        day_counter,
        hourly_cost: Some(120.0),
    }
}

pub fn workstation(workstation_id: &str, capable: &[&str]) -> Workstation {
    Workstation {
        workstation_id: workstation_id.to_string(),
        name: format!("工位 {}", workstation_id),
        capable_standard_task_ids: capable.iter().map(|id| id.to_string()).collect(),
    }
}

pub fn route(route_id: &str, member_ids: &[&str]) -> ProductionRoute {
    ProductionRoute {
        route_id: route_id.to_string(),
        name: format!("路线 {}", route_id),
        member_ids: member_ids.iter().map(|id| id.to_string()).collect(),
    }
}
