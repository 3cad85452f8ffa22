// ==========================================
// 车间排产系统 - 任务图生成引擎
// ==========================================
// 职责: 标准任务目录 (可按路线过滤) + 项目复杂度
//       => 具体任务实例 (工时固化 + 候选工位快照)
// 红线: 无候选工位的任务仍然生成并给出告警，不得静默丢弃
// ==========================================
// 输入: 项目/阶段 + 复杂度 + 可选路线 + 目录数据
// 输出: 任务列表 + 告警列表
// ==========================================

use crate::domain::catalog::{ProductionRoute, StandardTask, Workstation};
use crate::domain::project::{Phase, Project};
use crate::domain::schedule::ScheduleWarning;
use crate::domain::task::Task;
use crate::domain::types::TaskStatus;
use chrono::Duration;
use tracing::{debug, instrument};

// ==========================================
// TaskGraphBuilder - 任务图生成引擎
// ==========================================
// 无状态引擎，阶段间先后关系由阶段 sequence_no 结构化表达，
// 生成的任务不携带显式前驱边。
pub struct TaskGraphBuilder {
    fallback_minutes: i64, // 标准任务无系数时的兜底工时
}

impl TaskGraphBuilder {
    /// 构造函数
    ///
    /// # 参数
    /// - `fallback_minutes`: 兜底工时(分钟)，来自 EngineConfig
    pub fn new(fallback_minutes: i64) -> Self {
        Self { fallback_minutes }
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 为单个阶段生成任务实例
    ///
    /// 规则：
    /// 1) 路线存在时只取路线成员，否则取全部标准任务
    /// 2) duration = round(time_coefficient × complexity)，系数缺失用兜底工时
    /// 3) due_date = 安装日期 - day_counter 天 (交期提示)
    /// 4) 候选工位 = 工位能力链接快照
    /// 5) 无候选工位 => 仍生成任务 + NoEligibleWorkstation 告警
    ///
    /// # 参数
    /// - `project`: 归属项目 (真实或假想)
    /// - `phase`: 归属阶段
    /// - `complexity`: 复杂度 (0-100)
    /// - `route`: 生产路线 (None 表示全部标准任务)
    /// - `standard_tasks`: 标准任务目录
    /// - `workstations`: 工位目录 (含能力链接)
    ///
    /// # 返回
    /// (生成的任务列表, 告警列表)，任务按 day_counter 降序、task_number 升序
    #[instrument(skip(self, standard_tasks, workstations), fields(
        project_id = %project.project_id,
        phase_id = %phase.phase_id,
        complexity,
        route_id = route.map(|r| r.route_id.as_str()).unwrap_or("ALL")
    ))]
    pub fn build_for_phase(
        &self,
        project: &Project,
        phase: &Phase,
        complexity: f64,
        route: Option<&ProductionRoute>,
        standard_tasks: &[StandardTask],
        workstations: &[Workstation],
    ) -> (Vec<Task>, Vec<ScheduleWarning>) {
        let mut selected: Vec<&StandardTask> = standard_tasks
            .iter()
            .filter(|st| match route {
                Some(route) => route.contains(&st.standard_task_id),
                None => true,
            })
            .collect();

        // 名义顺序: 提前天数大的在前 (先做的工序)，编号兜底
        selected.sort_by(|a, b| {
            b.day_counter
                .cmp(&a.day_counter)
                .then_with(|| a.task_number.cmp(&b.task_number))
        });

        let mut tasks = Vec::with_capacity(selected.len());
        let mut warnings = Vec::new();

        for standard_task in selected {
            let duration_minutes = self.derive_duration(standard_task, complexity);
            let due_date =
                project.installation_date - Duration::days(standard_task.day_counter as i64);

            let candidate_workstation_ids: Vec<String> = workstations
                .iter()
                .filter(|ws| ws.can_perform(&standard_task.standard_task_id))
                .map(|ws| ws.workstation_id.clone())
                .collect();

            // 生成确定性任务ID，保证同一输入重复生成结果一致
            let task_id = format!("{}-T{:03}", phase.phase_id, standard_task.task_number);

            if candidate_workstation_ids.is_empty() {
                debug!(
                    standard_task_id = %standard_task.standard_task_id,
                    "标准任务无可承接工位，任务将不可排产"
                );
                warnings.push(ScheduleWarning::NoEligibleWorkstation {
                    task_id: task_id.clone(),
                });
            }

            tasks.push(Task {
                task_id,
                phase_id: phase.phase_id.clone(),
                standard_task_id: Some(standard_task.standard_task_id.clone()),
                name: standard_task.name.clone(),
                duration_minutes,
                due_date: Some(due_date),
                status: TaskStatus::Todo,
                candidate_workstation_ids,
            });
        }

        (tasks, warnings)
    }

    // ==========================================
    // 辅助方法
    // ==========================================

    /// 由工时系数与复杂度推导任务工时
    fn derive_duration(&self, standard_task: &StandardTask, complexity: f64) -> i64 {
        match standard_task.time_coefficient {
            Some(coefficient) => ((coefficient * complexity).round() as i64).max(1),
            None => self.fallback_minutes,
        }
    }
}
