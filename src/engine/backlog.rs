// ==========================================
// 车间排产系统 - 订单簿快照
// ==========================================
// 红线: 快照为不可变值，管线各阶段只借用；
// 唯一的持久写入方是 SchedulePersister。
// ==========================================
// 职责: 把"全局可变订单簿"改造为显式传递的快照值，
// 假想实体只进入内存叠加层，绝不落库 (影子沙盘)。
// ==========================================

use crate::domain::calendar::HolidayEntry;
use crate::domain::catalog::{ProductionRoute, StandardTask, Workstation};
use crate::domain::project::{Phase, Project};
use crate::domain::task::Task;
use std::collections::HashMap;

// ==========================================
// Backlog - 订单簿快照
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct Backlog {
    pub projects: Vec<Project>,          // 按 (created_at, project_id) 升序
    pub phases: Vec<Phase>,              // 项目阶段
    pub tasks: Vec<Task>,                // 任务实例
    pub standard_tasks: Vec<StandardTask>, // 标准任务目录
    pub routes: Vec<ProductionRoute>,    // 生产路线
    pub workstations: Vec<Workstation>,  // 工位 (含能力链接)
    pub holidays: Vec<HolidayEntry>,     // 班组节假日
}

impl Backlog {
    /// 项目的阶段列表（按 sequence_no 升序）
    pub fn phases_of(&self, project_id: &str) -> Vec<&Phase> {
        let mut phases: Vec<&Phase> = self
            .phases
            .iter()
            .filter(|phase| phase.project_id == project_id)
            .collect();
        phases.sort_by(|a, b| {
            a.sequence_no
                .cmp(&b.sequence_no)
                .then_with(|| a.phase_id.cmp(&b.phase_id))
        });
        phases
    }

    /// 阶段的任务列表（按 task_id 升序）
    pub fn tasks_of_phase(&self, phase_id: &str) -> Vec<&Task> {
        let mut tasks: Vec<&Task> = self
            .tasks
            .iter()
            .filter(|task| task.phase_id == phase_id)
            .collect();
        tasks.sort_by(|a, b| a.task_id.cmp(&b.task_id));
        tasks
    }

    /// 标准任务索引 (standard_task_id -> StandardTask)
    pub fn standard_task_index(&self) -> HashMap<&str, &StandardTask> {
        self.standard_tasks
            .iter()
            .map(|st| (st.standard_task_id.as_str(), st))
            .collect()
    }

    /// 任务归属项目索引 (task_id -> project_id)
    pub fn task_project_index(&self) -> HashMap<&str, &str> {
        let phase_project: HashMap<&str, &str> = self
            .phases
            .iter()
            .map(|phase| (phase.phase_id.as_str(), phase.project_id.as_str()))
            .collect();

        self.tasks
            .iter()
            .filter_map(|task| {
                phase_project
                    .get(task.phase_id.as_str())
                    .map(|project_id| (task.task_id.as_str(), *project_id))
            })
            .collect()
    }

    /// 按 route_id 查询路线
    pub fn route(&self, route_id: &str) -> Option<&ProductionRoute> {
        self.routes.iter().find(|route| route.route_id == route_id)
    }

    /// 叠加假想实体，得到模拟用的新快照
    ///
    /// 原快照不被修改；假想项目/阶段/任务只存在于返回值中，
    /// 不经过任何仓储写入 (消除补偿删除失败模式)。
    pub fn with_hypothetical(
        &self,
        project: Project,
        phase: Phase,
        tasks: Vec<Task>,
    ) -> Backlog {
        let mut overlay = self.clone();
        overlay.projects.push(project);
        overlay.phases.push(phase);
        overlay.tasks.extend(tasks);
        overlay
    }
}
