// ==========================================
// 车间排产系统 - 完工预测引擎
// ==========================================
// 职责: 由落位推导项目最后生产工序完工时刻，
//       并相对交付日期分级健康度
// 红线: 无状态引擎，纯函数；剩余天数口径为工作日
// ==========================================
// 输入: 落位列表 + 订单簿快照 + 告警列表
// 输出: ProjectCompletionInfo 列表 (项目创建顺序)
// ==========================================

use crate::domain::schedule::{ProjectCompletionInfo, ScheduleSlot, ScheduleWarning};
use crate::domain::types::{ProjectHealth, TeamKind};
use crate::engine::backlog::Backlog;
use crate::engine::calendar::CalendarResolver;
use chrono::NaiveDateTime;
use std::collections::{HashMap, HashSet};
use tracing::instrument;

// ==========================================
// CompletionForecaster - 完工预测引擎
// ==========================================
pub struct CompletionForecaster {
    at_risk_threshold_days: i64, // 剩余工作日低于该值判为 AT_RISK
}

impl CompletionForecaster {
    /// 构造函数
    ///
    /// # 参数
    /// - `at_risk_threshold_days`: 风险阈值(工作日)
    pub fn new(at_risk_threshold_days: i64) -> Self {
        Self {
            at_risk_threshold_days,
        }
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 为订单簿中的全部项目生成完工预测
    ///
    /// 规则（每个项目）：
    /// 1) 取有落位的最大 sequence_no 阶段为"最后生产阶段"，
    ///    其落位最大完工时刻为项目完工预测
    /// 2) 完工晚于交付日窗口终点 => OVERDUE；
    ///    剩余工作日 < 阈值 => AT_RISK；否则 ON_TRACK
    /// 3) 存在未能排产任务的项目打 incomplete 标志，
    ///    预测仍由可排产余量算出
    ///
    /// # 参数
    /// - `slots`: 排产落位
    /// - `backlog`: 订单簿快照
    /// - `warnings`: 排产告警 (用于 incomplete 标志)
    /// - `calendar`: 日历解析器 (工作日口径)
    ///
    /// # 返回
    /// 项目完工预测列表，按项目创建顺序
    #[instrument(skip_all, fields(slots_count = slots.len(), projects_count = backlog.projects.len()))]
    pub fn forecast(
        &self,
        slots: &[ScheduleSlot],
        backlog: &Backlog,
        warnings: &[ScheduleWarning],
        calendar: &CalendarResolver,
    ) -> Vec<ProjectCompletionInfo> {
        // 落位按任务索引
        let slot_by_task: HashMap<&str, &ScheduleSlot> =
            slots.iter().map(|slot| (slot.task_id.as_str(), slot)).collect();

        // 告警涉及的项目集合
        let task_project = backlog.task_project_index();
        let incomplete_projects: HashSet<&str> = warnings
            .iter()
            .filter_map(|warning| task_project.get(warning.task_id()).copied())
            .collect();

        let mut projects: Vec<_> = backlog.projects.iter().collect();
        projects.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.project_id.cmp(&b.project_id))
        });

        let mut completions = Vec::with_capacity(projects.len());

        for project in projects {
            let last_step_end = self.last_production_step_end(backlog, &slot_by_task, &project.project_id);
            let incomplete = incomplete_projects.contains(project.project_id.as_str());

            let (working_days_remaining, health) = match last_step_end {
                Some(end_at) => {
                    // 交付日窗口终点为逾期判定的红线
                    let due_at = project
                        .installation_date
                        .and_time(calendar.window().end_time());
                    let slack = calendar.working_days_between(
                        TeamKind::Production,
                        end_at.date(),
                        project.installation_date,
                    );

                    let health = if end_at > due_at {
                        ProjectHealth::Overdue
                    } else if slack < self.at_risk_threshold_days {
                        ProjectHealth::AtRisk
                    } else {
                        ProjectHealth::OnTrack
                    };
                    (Some(slack), health)
                }
                // 无任何落位: 预测未知；有告警时按风险处理
                None => {
                    let health = if incomplete {
                        ProjectHealth::AtRisk
                    } else {
                        ProjectHealth::OnTrack
                    };
                    (None, health)
                }
            };

            completions.push(ProjectCompletionInfo {
                project_id: project.project_id.clone(),
                project_name: project.name.clone(),
                client: project.client.clone(),
                last_step_end,
                working_days_remaining,
                health,
                incomplete,
            });
        }

        completions
    }

    // ==========================================
    // 辅助方法
    // ==========================================

    /// 项目最后生产阶段的最大完工时刻
    ///
    /// 取"有落位的最大 sequence_no 阶段"——之后的阶段
    /// (如安装) 不参与排产，不产生落位。
    fn last_production_step_end(
        &self,
        backlog: &Backlog,
        slot_by_task: &HashMap<&str, &ScheduleSlot>,
        project_id: &str,
    ) -> Option<NaiveDateTime> {
        let phases = backlog.phases_of(project_id);

        for phase in phases.iter().rev() {
            let phase_end = backlog
                .tasks_of_phase(&phase.phase_id)
                .iter()
                .filter_map(|task| slot_by_task.get(task.task_id.as_str()))
                .map(|slot| slot.end_at)
                .max();

            if let Some(end) = phase_end {
                return Some(end);
            }
        }

        None
    }
}
