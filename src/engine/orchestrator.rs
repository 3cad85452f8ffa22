// ==========================================
// 车间排产系统 - 引擎编排器
// ==========================================
// 用途: 协调排产管线 (日历 → 排产 → 完工预测) 的执行顺序
// 红线: 编排器对订单簿快照纯函数，不做任何持久化
// ==========================================

use crate::config::EngineConfig;
use crate::domain::schedule::{ProjectCompletionInfo, ScheduleSlot, ScheduleWarning};
use crate::engine::backlog::Backlog;
use crate::engine::calendar::{CalendarResolver, WorkingWindow};
use crate::engine::forecaster::CompletionForecaster;
use crate::engine::scheduler::CapacityScheduler;
use chrono::NaiveDateTime;
use tracing::{info, instrument};

// ==========================================
// ScheduleOutcome - 排产结果
// ==========================================
#[derive(Debug, Clone)]
pub struct ScheduleOutcome {
    pub slots: Vec<ScheduleSlot>,                  // 排产落位
    pub completions: Vec<ProjectCompletionInfo>,   // 项目完工预测
    pub warnings: Vec<ScheduleWarning>,            // 非致命告警
}

// ==========================================
// ScheduleOrchestrator - 引擎编排器
// ==========================================
pub struct ScheduleOrchestrator {
    config: EngineConfig,
    scheduler: CapacityScheduler,
    forecaster: CompletionForecaster,
}

impl ScheduleOrchestrator {
    /// 创建新的编排器实例
    ///
    /// # 参数
    /// - config: 引擎配置快照
    pub fn new(config: EngineConfig) -> Self {
        Self {
            scheduler: CapacityScheduler::new(
                config.phase_task_order,
                config.schedule_horizon_days,
            ),
            forecaster: CompletionForecaster::new(config.at_risk_threshold_days),
            config,
        }
    }

    /// 执行完整排产管线
    ///
    /// 步骤:
    /// 1) 由快照节假日 + 配置窗口构造日历解析器
    /// 2) 产能排产 (贪心前向落位)
    /// 3) 完工预测与健康度分级
    ///
    /// # 参数
    /// - `backlog`: 订单簿快照 (只读借用)
    /// - `as_of`: 排产基准时刻
    ///
    /// # 返回
    /// 排产结果 (落位 + 预测 + 告警)
    #[instrument(skip(self, backlog), fields(
        as_of = %as_of,
        projects_count = backlog.projects.len(),
        tasks_count = backlog.tasks.len()
    ))]
    pub fn run(&self, backlog: &Backlog, as_of: NaiveDateTime) -> ScheduleOutcome {
        let calendar = CalendarResolver::new(
            &backlog.holidays,
            WorkingWindow::new(self.config.work_start_hour, self.config.work_end_hour),
            self.config.schedule_horizon_days,
        );

        let (slots, warnings) = self.scheduler.schedule(backlog, &calendar, as_of);

        info!(
            slots_count = slots.len(),
            warnings_count = warnings.len(),
            "产能排产完成"
        );

        let completions = self.forecaster.forecast(&slots, backlog, &warnings, &calendar);

        info!(completions_count = completions.len(), "完工预测完成");

        ScheduleOutcome {
            slots,
            completions,
            warnings,
        }
    }
}

// ==========================================
// 测试模块
// ==========================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::project::{Phase, Project};
    use crate::domain::task::Task;
    use crate::domain::types::{ProjectStatus, TaskStatus};
    use chrono::NaiveDate;

    fn backlog() -> Backlog {
        Backlog {
            projects: vec![Project {
                project_id: "P01".to_string(),
                name: "项目 P01".to_string(),
                client: "客户".to_string(),
                start_date: NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
                installation_date: NaiveDate::from_ymd_opt(2026, 3, 20).unwrap(),
                complexity: 50.0,
                status: ProjectStatus::InProgress,
                created_at: NaiveDate::from_ymd_opt(2026, 2, 1)
                    .unwrap()
                    .and_hms_opt(9, 0, 0)
                    .unwrap(),
            }],
            phases: vec![Phase {
                phase_id: "PH1".to_string(),
                project_id: "P01".to_string(),
                name: "生产".to_string(),
                sequence_no: 1,
                start_date: None,
                end_date: None,
            }],
            tasks: vec![Task {
                task_id: "T01".to_string(),
                phase_id: "PH1".to_string(),
                standard_task_id: None,
                name: "开料".to_string(),
                duration_minutes: 120,
                due_date: None,
                status: TaskStatus::Todo,
                candidate_workstation_ids: vec!["W01".to_string()],
            }],
            ..Default::default()
        }
    }

    #[test]
    fn test_pipeline_produces_slots_and_completions() {
        let orchestrator = ScheduleOrchestrator::new(EngineConfig::default());
        let as_of = NaiveDate::from_ymd_opt(2026, 3, 2)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap();

        let outcome = orchestrator.run(&backlog(), as_of);

        assert_eq!(outcome.slots.len(), 1);
        assert_eq!(outcome.completions.len(), 1);
        assert!(outcome.warnings.is_empty());
        assert_eq!(outcome.completions[0].project_id, "P01");
    }

    #[test]
    fn test_run_is_deterministic() {
        let orchestrator = ScheduleOrchestrator::new(EngineConfig::default());
        let backlog = backlog();
        let as_of = NaiveDate::from_ymd_opt(2026, 3, 2)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap();

        let a = orchestrator.run(&backlog, as_of);
        let b = orchestrator.run(&backlog, as_of);

        assert_eq!(a.slots, b.slots);
        assert_eq!(a.completions, b.completions);
    }
}
