// ==========================================
// 车间排产系统 - What-if 模拟协调器
// ==========================================
// 职责: "插入假想项目 → 重排 → 量化影响"的可逆沙盘
// 红线: 假想实体只进入内存叠加层，绝不写入共享存储；
// 持久化的落位在模拟前后保持不变 (非干扰性)。
// ==========================================
// 设计说明: 源系统曾将假想实体临时落库再补偿删除，
// 删除失败会以幽灵实体污染订单簿；此处改为影子沙盘
// (快照叠加层)，该失败模式被整体消除。
// ==========================================

use crate::config::EngineConfig;
use crate::domain::project::{Phase, Project};
use crate::domain::schedule::{ProjectImpact, ScheduleWarning, SimulationResult};
use crate::domain::types::ProjectStatus;
use crate::engine::backlog::Backlog;
use crate::engine::error::{EngineError, EngineResult};
use crate::engine::graph_builder::TaskGraphBuilder;
use crate::engine::orchestrator::ScheduleOrchestrator;
use chrono::{NaiveDate, NaiveDateTime};
use tracing::{info, instrument};
use uuid::Uuid;

// ==========================================
// HypotheticalProject - 假想项目草稿
// ==========================================
#[derive(Debug, Clone)]
pub struct HypotheticalProject {
    pub name: String,                 // 项目名称
    pub client: String,               // 客户
    pub start_date: NaiveDate,        // 期望开工日期
    pub installation_date: NaiveDate, // 期望交付日期
}

// ==========================================
// SimulationCoordinator - 模拟协调器
// ==========================================
pub struct SimulationCoordinator {
    config: EngineConfig,
    builder: TaskGraphBuilder,
    orchestrator: ScheduleOrchestrator,
}

impl SimulationCoordinator {
    /// 创建新的模拟协调器实例
    pub fn new(config: EngineConfig) -> Self {
        Self {
            builder: TaskGraphBuilder::new(config.fallback_task_minutes),
            orchestrator: ScheduleOrchestrator::new(config.clone()),
            config,
        }
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 执行 what-if 模拟
    ///
    /// 协议:
    /// 1) 基线: 对真实订单簿跑一次完整管线
    /// 2) 物化: 假想项目/阶段/任务进入快照叠加层 (不落库)
    /// 3) 模拟: 对叠加层重跑完整管线
    /// 4) 差异: 逐个真实项目比对健康度与剩余工作日
    ///
    /// # 参数
    /// - `backlog`: 真实订单簿快照
    /// - `draft`: 假想项目草稿
    /// - `route_id`: 生产路线 (None 表示全部标准任务)
    /// - `complexity`: 复杂度 (0-100)
    /// - `as_of`: 排产基准时刻
    ///
    /// # 返回
    /// SimulationResult: 假想项目自身预测 + 真实项目影响清单
    #[instrument(skip(self, backlog, draft), fields(
        draft_name = %draft.name,
        complexity,
        as_of = %as_of
    ))]
    pub fn simulate(
        &self,
        backlog: &Backlog,
        draft: &HypotheticalProject,
        route_id: Option<&str>,
        complexity: f64,
        as_of: NaiveDateTime,
    ) -> EngineResult<SimulationResult> {
        if !(0.0..=100.0).contains(&complexity) {
            return Err(EngineError::InvalidComplexity(complexity));
        }

        let route = match route_id {
            Some(route_id) => Some(backlog.route(route_id).ok_or_else(|| {
                EngineError::RouteNotFound {
                    route_id: route_id.to_string(),
                }
            })?),
            None => None,
        };

        // 1. 基线管线
        let baseline = self.orchestrator.run(backlog, as_of);

        // 2. 物化假想实体 (仅内存)
        let project_id = format!("SIM-{}", Uuid::new_v4());
        let project = Project {
            project_id: project_id.clone(),
            name: draft.name.clone(),
            client: draft.client.clone(),
            start_date: draft.start_date,
            installation_date: draft.installation_date,
            complexity,
            status: ProjectStatus::Planned,
            // 排产按交付日期优先，假想急单据此参与真实工位争用
            created_at: as_of,
        };
        let phase = Phase {
            phase_id: format!("{}-PROD", project_id),
            project_id: project_id.clone(),
            name: "生产".to_string(),
            sequence_no: 1,
            start_date: Some(draft.start_date),
            end_date: Some(draft.installation_date),
        };

        let (tasks, build_warnings) = self.builder.build_for_phase(
            &project,
            &phase,
            complexity,
            route,
            &backlog.standard_tasks,
            &backlog.workstations,
        );

        let overlay = backlog.with_hypothetical(project, phase, tasks);

        // 3. 叠加层管线
        let simulated = self.orchestrator.run(&overlay, as_of);

        // 4. 真实项目差异
        let impacts = Self::diff_real_projects(&baseline, &simulated, &project_id);

        let hypothetical = simulated
            .completions
            .iter()
            .find(|info| info.project_id == project_id)
            .cloned()
            .ok_or_else(|| EngineError::Internal("模拟结果缺少假想项目预测".to_string()))?;

        info!(
            impacts_count = impacts.len(),
            hypothetical_health = %hypothetical.health,
            "模拟完成，未触达持久化状态"
        );

        // 叠加层排产会对建档期已告警的任务再次告警 (如无候选工位)，
        // 按值去重，保证"N 个任务无法排产"口径准确
        let mut warnings: Vec<ScheduleWarning> = Vec::new();
        for warning in simulated.warnings.into_iter().chain(build_warnings) {
            if !warnings.contains(&warning) {
                warnings.push(warning);
            }
        }

        Ok(SimulationResult {
            hypothetical,
            impacts,
            warnings,
        })
    }

    // ==========================================
    // 辅助方法
    // ==========================================

    /// 比对基线与模拟结果，收集预测发生变化的真实项目
    fn diff_real_projects(
        baseline: &crate::engine::orchestrator::ScheduleOutcome,
        simulated: &crate::engine::orchestrator::ScheduleOutcome,
        hypothetical_id: &str,
    ) -> Vec<ProjectImpact> {
        let mut impacts = Vec::new();

        for before in &baseline.completions {
            if before.project_id == hypothetical_id {
                continue;
            }
            let Some(after) = simulated
                .completions
                .iter()
                .find(|info| info.project_id == before.project_id)
            else {
                continue;
            };

            let shifted = before.health != after.health
                || before.working_days_remaining != after.working_days_remaining;
            if shifted {
                impacts.push(ProjectImpact {
                    project_id: before.project_id.clone(),
                    project_name: before.project_name.clone(),
                    health_before: before.health,
                    health_after: after.health,
                    days_remaining_before: before.working_days_remaining,
                    days_remaining_after: after.working_days_remaining,
                });
            }
        }

        impacts
    }

    /// 引擎配置快照 (只读)
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}
