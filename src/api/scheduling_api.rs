// ==========================================
// 车间排产系统 - 排产 API
// ==========================================
// 职责: 对外唯一业务入口；装配仓储与引擎，编排三类调用:
//   1) generate_schedule  - 全量排产并持久化
//   2) simulate_insertion - what-if 模拟 (零写入)
//   3) generate_project_tasks - 按路线为阶段生成任务清单
// 架构: API 层 → 引擎层 → 仓储层
// ==========================================

use std::sync::{Arc, Mutex};

use chrono::NaiveDateTime;
use rusqlite::Connection;
use tracing::{info, instrument};

use crate::config::{ConfigManager, EngineConfig};
use crate::domain::schedule::{ScheduleWarning, SimulationResult};
use crate::engine::backlog::Backlog;
use crate::engine::error::{EngineError, EngineResult};
use crate::engine::graph_builder::TaskGraphBuilder;
use crate::engine::orchestrator::{ScheduleOrchestrator, ScheduleOutcome};
use crate::engine::persister::SchedulePersister;
use crate::engine::simulation::{HypotheticalProject, SimulationCoordinator};
use crate::repository::catalog_repo::{
    ProductionRouteRepository, StandardTaskRepository, WorkstationRepository,
};
use crate::repository::holiday_repo::HolidayRepository;
use crate::repository::project_repo::{PhaseRepository, ProjectRepository};
use crate::repository::task_repo::TaskRepository;

// ==========================================
// SchedulingApi - 排产业务接口
// ==========================================

/// 排产API
///
/// 持有全部仓储与引擎组件；除 `generate_schedule` 的落位持久化外，
/// 所有调用对存储只读。
pub struct SchedulingApi {
    project_repo: ProjectRepository,
    phase_repo: PhaseRepository,
    task_repo: TaskRepository,
    standard_task_repo: StandardTaskRepository,
    route_repo: ProductionRouteRepository,
    workstation_repo: WorkstationRepository,
    holiday_repo: HolidayRepository,
    persister: SchedulePersister,
    orchestrator: ScheduleOrchestrator,
    simulator: SimulationCoordinator,
    builder: TaskGraphBuilder,
}

impl SchedulingApi {
    /// 用给定连接与引擎配置装配 API 实例
    pub fn new(conn: Arc<Mutex<Connection>>, config: EngineConfig) -> Self {
        Self {
            project_repo: ProjectRepository::new(conn.clone()),
            phase_repo: PhaseRepository::new(conn.clone()),
            task_repo: TaskRepository::new(conn.clone()),
            standard_task_repo: StandardTaskRepository::new(conn.clone()),
            route_repo: ProductionRouteRepository::new(conn.clone()),
            workstation_repo: WorkstationRepository::new(conn.clone()),
            holiday_repo: HolidayRepository::new(conn.clone()),
            persister: SchedulePersister::new(conn),
            orchestrator: ScheduleOrchestrator::new(config.clone()),
            simulator: SimulationCoordinator::new(config.clone()),
            builder: TaskGraphBuilder::new(config.fallback_task_minutes),
        }
    }

    /// 从连接读取 config_kv 中的引擎配置并装配 API 实例
    ///
    /// 配置缺失时采用默认值；配置非法（如工作窗口颠倒）为致命错误。
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> EngineResult<Self> {
        let manager = ConfigManager::from_connection(conn.clone())
            .map_err(|e| EngineError::Config(e.to_string()))?;
        let config = manager
            .load_engine_config()
            .map_err(|e| EngineError::Config(e.to_string()))?;
        Ok(Self::new(conn, config))
    }

    // ==========================================
    // 订单簿装载
    // ==========================================

    /// 从存储装载完整订单簿快照
    ///
    /// 单次调用内引擎只消费本快照，后续并发写不影响本次运行。
    pub fn load_backlog(&self) -> EngineResult<Backlog> {
        Ok(Backlog {
            projects: self.project_repo.list_all()?,
            phases: self.phase_repo.list_all()?,
            tasks: self.task_repo.list_all()?,
            standard_tasks: self.standard_task_repo.list_all()?,
            routes: self.route_repo.list_all()?,
            workstations: self.workstation_repo.list_all()?,
            holidays: self.holiday_repo.list_all()?,
        })
    }

    // ==========================================
    // 核心操作
    // ==========================================

    /// 全量排产并持久化
    ///
    /// 流程: 装载订单簿 → 排产 → 完工预测 → 按项目整体替换落位。
    /// 排产质量问题 (缺目录项、无可用工位、超视野) 以告警随结果返回，
    /// 不中断运行。
    ///
    /// # 参数
    /// - `as_of`: 排产基准时刻，之前的时间不再安排任何工作
    ///
    /// # 返回
    /// ScheduleOutcome: 落位 + 项目完工预测 + 告警
    #[instrument(skip(self), fields(as_of = %as_of))]
    pub fn generate_schedule(&self, as_of: NaiveDateTime) -> EngineResult<ScheduleOutcome> {
        let backlog = self.load_backlog()?;
        let outcome = self.orchestrator.run(&backlog, as_of);
        let written = self.persister.persist(&outcome.slots)?;

        info!(
            written,
            warnings_count = outcome.warnings.len(),
            "全量排产完成并已持久化"
        );
        Ok(outcome)
    }

    /// what-if 模拟: 插入假想项目并量化对真实项目的影响
    ///
    /// 假想实体只存在于内存叠加层，本调用不产生任何写入；
    /// 持久化的落位在调用前后保持不变。
    ///
    /// # 参数
    /// - `draft`: 假想项目草稿
    /// - `route_id`: 生产路线 (None 表示全部标准任务)
    /// - `complexity`: 复杂度 (0-100)
    /// - `as_of`: 排产基准时刻
    #[instrument(skip(self, draft), fields(draft_name = %draft.name, complexity, as_of = %as_of))]
    pub fn simulate_insertion(
        &self,
        draft: &HypotheticalProject,
        route_id: Option<&str>,
        complexity: f64,
        as_of: NaiveDateTime,
    ) -> EngineResult<SimulationResult> {
        let backlog = self.load_backlog()?;
        self.simulator
            .simulate(&backlog, draft, route_id, complexity, as_of)
    }

    /// 按生产路线为项目阶段生成任务清单并落库
    ///
    /// 任务时长 = 工时系数 × 项目复杂度 (四舍五入，至少 1 分钟)；
    /// 系数缺失回退到配置的兜底时长。重复调用以 task_id 覆盖写入。
    ///
    /// # 参数
    /// - `project_id`: 目标项目
    /// - `phase_id`: 目标阶段 (必须属于该项目)
    /// - `route_id`: 生产路线 (None 表示全部标准任务)
    ///
    /// # 返回
    /// (写入任务数, 生成期告警)
    #[instrument(skip(self))]
    pub fn generate_project_tasks(
        &self,
        project_id: &str,
        phase_id: &str,
        route_id: Option<&str>,
    ) -> EngineResult<(usize, Vec<ScheduleWarning>)> {
        let project = self.project_repo.find_by_id(project_id)?.ok_or_else(|| {
            EngineError::ProjectNotFound {
                project_id: project_id.to_string(),
            }
        })?;

        let phase = self
            .phase_repo
            .list_by_project(project_id)?
            .into_iter()
            .find(|phase| phase.phase_id == phase_id)
            .ok_or_else(|| EngineError::PhaseNotFound {
                phase_id: phase_id.to_string(),
            })?;

        let route = match route_id {
            Some(route_id) => Some(self.route_repo.find_by_id(route_id)?.ok_or_else(|| {
                EngineError::RouteNotFound {
                    route_id: route_id.to_string(),
                }
            })?),
            None => None,
        };

        let standard_tasks = self.standard_task_repo.list_all()?;
        let workstations = self.workstation_repo.list_all()?;

        let (tasks, warnings) = self.builder.build_for_phase(
            &project,
            &phase,
            project.complexity,
            route.as_ref(),
            &standard_tasks,
            &workstations,
        );

        let written = self.task_repo.create_batch(&tasks)?;
        info!(written, phase_id, "阶段任务清单已生成");
        Ok((written, warnings))
    }

    /// 读取当前存储的全部落位
    pub fn list_persisted_slots(&self) -> EngineResult<Vec<crate::domain::schedule::ScheduleSlot>> {
        self.persister.load_all()
    }
}

// ==========================================
// 测试模块
// ==========================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use crate::domain::catalog::{ProductionRoute, StandardTask, Workstation};
    use crate::domain::project::{Phase, Project};
    use crate::domain::types::{ProjectHealth, ProjectStatus};
    use chrono::NaiveDate;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, d).unwrap()
    }

    fn api() -> SchedulingApi {
        let conn = Connection::open_in_memory().unwrap();
        db::init_schema(&conn).unwrap();
        SchedulingApi::new(Arc::new(Mutex::new(conn)), EngineConfig::default())
    }

    /// 一个项目、一个阶段、两个标准任务、一个全能工位
    fn seed(api: &SchedulingApi) {
        api.project_repo
            .create(&Project {
                project_id: "P01".to_string(),
                name: "办公楼家具".to_string(),
                client: "客户A".to_string(),
                start_date: date(2),
                installation_date: date(20),
                complexity: 50.0,
                status: ProjectStatus::Planned,
                created_at: date(1).and_hms_opt(9, 0, 0).unwrap(),
            })
            .unwrap();
        api.phase_repo
            .create(&Phase {
                phase_id: "PH1".to_string(),
                project_id: "P01".to_string(),
                name: "生产".to_string(),
                sequence_no: 1,
                start_date: None,
                end_date: None,
            })
            .unwrap();
        api.standard_task_repo
            .create(&StandardTask {
                standard_task_id: "ST1".to_string(),
                task_number: 1,
                name: "开料".to_string(),
                time_coefficient: Some(2.0),
                day_counter: 5,
                hourly_cost: None,
            })
            .unwrap();
        api.standard_task_repo
            .create(&StandardTask {
                standard_task_id: "ST2".to_string(),
                task_number: 2,
                name: "封边".to_string(),
                time_coefficient: Some(3.0),
                day_counter: 3,
                hourly_cost: None,
            })
            .unwrap();
        api.workstation_repo
            .create(&Workstation {
                workstation_id: "W01".to_string(),
                name: "加工中心".to_string(),
                capable_standard_task_ids: vec!["ST1".to_string(), "ST2".to_string()],
            })
            .unwrap();
    }

    #[test]
    fn test_generate_tasks_then_schedule_end_to_end() {
        let api = api();
        seed(&api);
        let as_of = date(2).and_hms_opt(8, 0, 0).unwrap();

        let (written, warnings) = api.generate_project_tasks("P01", "PH1", None).unwrap();
        assert_eq!(written, 2);
        assert!(warnings.is_empty());

        let outcome = api.generate_schedule(as_of).unwrap();

        // 系数 2/3 × 复杂度 50 => 100/150 分钟，day_counter 降序先开料
        assert_eq!(outcome.slots.len(), 2);
        assert_eq!(outcome.slots[0].start_at, date(2).and_hms_opt(8, 0, 0).unwrap());
        assert_eq!(outcome.slots[0].end_at, date(2).and_hms_opt(9, 40, 0).unwrap());
        assert_eq!(outcome.slots[1].end_at, date(2).and_hms_opt(12, 10, 0).unwrap());

        // 落位已持久化
        assert_eq!(api.list_persisted_slots().unwrap(), outcome.slots);

        // 交付宽松 => ON_TRACK
        assert_eq!(outcome.completions.len(), 1);
        assert_eq!(outcome.completions[0].health, ProjectHealth::OnTrack);
    }

    #[test]
    fn test_simulation_leaves_persisted_slots_untouched() {
        let api = api();
        seed(&api);
        let as_of = date(2).and_hms_opt(8, 0, 0).unwrap();

        api.generate_project_tasks("P01", "PH1", None).unwrap();
        api.generate_schedule(as_of).unwrap();
        let persisted_before = api.list_persisted_slots().unwrap();

        let draft = HypotheticalProject {
            name: "急单".to_string(),
            client: "客户B".to_string(),
            start_date: date(2),
            installation_date: date(3),
        };
        let result = api.simulate_insertion(&draft, None, 80.0, as_of).unwrap();
        assert!(result.hypothetical.last_step_end.is_some());

        // 非干扰性: 模拟前后存储状态逐字节一致
        assert_eq!(api.list_persisted_slots().unwrap(), persisted_before);
    }

    #[test]
    fn test_generate_tasks_respects_route_membership() {
        let api = api();
        seed(&api);
        api.route_repo
            .create(&ProductionRoute {
                route_id: "R-CUT".to_string(),
                name: "仅开料".to_string(),
                member_ids: vec!["ST1".to_string()],
            })
            .unwrap();

        let (written, _) = api
            .generate_project_tasks("P01", "PH1", Some("R-CUT"))
            .unwrap();
        assert_eq!(written, 1);

        let tasks = api.task_repo.list_by_phase("PH1").unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].standard_task_id.as_deref(), Some("ST1"));
    }

    #[test]
    fn test_unknown_project_is_fatal() {
        let api = api();
        let result = api.generate_project_tasks("GHOST", "PH1", None);
        assert!(matches!(result, Err(EngineError::ProjectNotFound { .. })));
    }
}
