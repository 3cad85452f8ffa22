// ==========================================
// 车间排产系统 - 产能排产引擎
// ==========================================
// 职责: 贪心前向排产，把任务落位到有限工位时间线
// 红线: 同一工位落位不重叠；阶段 k+1 不早于阶段 k 完工
// ==========================================
// 输入: 订单簿快照 + 日历解析器 + as_of 基准时刻
// 输出: ScheduleSlot 列表 + 告警列表 (非致命问题不中断)
// ==========================================
// 确定性: 项目按交付日期优先 (急单优先)，阶段按 sequence_no，
// 阶段内任务按可注入的排序策略；同输入必得同输出。
// ==========================================

use crate::domain::schedule::{ScheduleSlot, ScheduleWarning};
use crate::domain::task::Task;
use crate::domain::types::{PhaseTaskOrder, TeamKind};
use crate::engine::backlog::Backlog;
use crate::engine::calendar::CalendarResolver;
use chrono::NaiveDateTime;
use std::cmp::Ordering;
use std::collections::HashMap;
use tracing::{debug, instrument, warn};

// ==========================================
// CapacityScheduler - 产能排产引擎
// ==========================================
pub struct CapacityScheduler {
    order: PhaseTaskOrder,   // 阶段内任务排序策略 (可注入配置)
    horizon_days: i64,       // 排产视野上限，用于告警携带
}

impl CapacityScheduler {
    /// 构造函数
    ///
    /// # 参数
    /// - `order`: 阶段内任务排序策略
    /// - `horizon_days`: 排产视野上限(天)
    pub fn new(order: PhaseTaskOrder, horizon_days: i64) -> Self {
        Self {
            order,
            horizon_days,
        }
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 执行整个订单簿的前向排产
    ///
    /// 规则（每个任务）：
    /// 1) 最早可开工 = max(as_of, 本项目上一阶段最晚完工, 所选工位时间线末端)
    /// 2) 候选工位中取可行开工最早者，并列取工位ID最小者
    /// 3) 开工点推进到首个可工作分钟；完工点按累计有效工时推进，
    ///    工时不可跨非工作间隙拆分记账 (间隙只计入墙钟跨度)
    /// 4) 视野内无可行区间 => HorizonExceeded 告警，任务不落位
    ///
    /// # 参数
    /// - `backlog`: 订单簿快照
    /// - `calendar`: 日历解析器
    /// - `as_of`: 排产基准时刻
    ///
    /// # 返回
    /// (落位列表, 告警列表)
    #[instrument(skip(self, backlog, calendar), fields(
        as_of = %as_of,
        projects_count = backlog.projects.len(),
        tasks_count = backlog.tasks.len()
    ))]
    pub fn schedule(
        &self,
        backlog: &Backlog,
        calendar: &CalendarResolver,
        as_of: NaiveDateTime,
    ) -> (Vec<ScheduleSlot>, Vec<ScheduleWarning>) {
        let standard_index = backlog.standard_task_index();

        // 工位时间线: workstation_id -> 最后完工时刻
        let mut workstation_last_end: HashMap<String, NaiveDateTime> = HashMap::new();

        let mut slots = Vec::new();
        let mut warnings = Vec::new();

        // 项目处理顺序: 交付日期升序 (急单优先)，创建时间/ID 兜底
        let mut projects: Vec<_> = backlog.projects.iter().collect();
        projects.sort_by(|a, b| {
            a.installation_date
                .cmp(&b.installation_date)
                .then_with(|| a.created_at.cmp(&b.created_at))
                .then_with(|| a.project_id.cmp(&b.project_id))
        });

        for project in projects {
            // 上一阶段最晚完工时刻 (阶段先后约束的唯一来源)
            let mut prev_phase_end = as_of;

            for phase in backlog.phases_of(&project.project_id) {
                let mut tasks = backlog.tasks_of_phase(&phase.phase_id);
                self.sort_phase_tasks(&mut tasks, &standard_index);

                let mut phase_max_end = prev_phase_end;

                for task in tasks {
                    if !task.needs_scheduling() {
                        continue;
                    }

                    // 外部数据不一致: 引用了不存在的标准任务 => 跳过 + 告警
                    if let Some(standard_task_id) = &task.standard_task_id {
                        if !standard_index.contains_key(standard_task_id.as_str()) {
                            warn!(
                                task_id = %task.task_id,
                                standard_task_id = %standard_task_id,
                                "任务引用了不存在的标准任务，跳过"
                            );
                            warnings.push(ScheduleWarning::MissingStandardTask {
                                task_id: task.task_id.clone(),
                                standard_task_id: standard_task_id.clone(),
                            });
                            continue;
                        }
                    }

                    if task.candidate_workstation_ids.is_empty() {
                        warnings.push(ScheduleWarning::NoEligibleWorkstation {
                            task_id: task.task_id.clone(),
                        });
                        continue;
                    }

                    let earliest = prev_phase_end.max(as_of);

                    match self.place_task(task, earliest, &workstation_last_end, calendar) {
                        Some((workstation_id, start_at, end_at)) => {
                            debug!(
                                task_id = %task.task_id,
                                workstation_id = %workstation_id,
                                start_at = %start_at,
                                end_at = %end_at,
                                "任务落位"
                            );
                            workstation_last_end.insert(workstation_id.clone(), end_at);
                            phase_max_end = phase_max_end.max(end_at);
                            slots.push(ScheduleSlot {
                                task_id: task.task_id.clone(),
                                project_id: project.project_id.clone(),
                                workstation_id,
                                start_at,
                                end_at,
                            });
                        }
                        None => {
                            warnings.push(ScheduleWarning::HorizonExceeded {
                                task_id: task.task_id.clone(),
                                horizon_days: self.horizon_days,
                            });
                        }
                    }
                }

                prev_phase_end = phase_max_end;
            }
        }

        (slots, warnings)
    }

    // ==========================================
    // 辅助方法
    // ==========================================

    /// 在候选工位中为任务选择最早可行落位
    ///
    /// # 返回
    /// (工位ID, 开工时刻, 完工时刻)；视野耗尽时为 None
    fn place_task(
        &self,
        task: &Task,
        earliest: NaiveDateTime,
        workstation_last_end: &HashMap<String, NaiveDateTime>,
        calendar: &CalendarResolver,
    ) -> Option<(String, NaiveDateTime, NaiveDateTime)> {
        let mut candidates = task.candidate_workstation_ids.clone();
        candidates.sort();

        let mut best: Option<(String, NaiveDateTime, NaiveDateTime)> = None;

        for workstation_id in candidates {
            let base = workstation_last_end
                .get(&workstation_id)
                .copied()
                .map(|end| end.max(earliest))
                .unwrap_or(earliest);

            let Some(start_at) = calendar.next_workable_minute(TeamKind::Production, base) else {
                continue;
            };
            let Some(end_at) =
                calendar.add_working_minutes(TeamKind::Production, start_at, task.duration_minutes)
            else {
                continue;
            };

            // 可行开工最早者优先；并列时工位ID升序稳定胜出
            let better = match &best {
                None => true,
                Some((best_id, best_start, _)) => match start_at.cmp(best_start) {
                    Ordering::Less => true,
                    Ordering::Greater => false,
                    Ordering::Equal => workstation_id < *best_id,
                },
            };
            if better {
                best = Some((workstation_id, start_at, end_at));
            }
        }

        best
    }

    /// 阶段内任务排序 (可注入策略)
    fn sort_phase_tasks(
        &self,
        tasks: &mut [&Task],
        standard_index: &HashMap<&str, &crate::domain::catalog::StandardTask>,
    ) {
        match self.order {
            PhaseTaskOrder::DayCounterDesc => {
                tasks.sort_by(|a, b| {
                    let day_a = Self::day_counter_of(a, standard_index);
                    let day_b = Self::day_counter_of(b, standard_index);
                    day_b
                        .cmp(&day_a)
                        .then_with(|| a.task_id.cmp(&b.task_id))
                });
            }
            PhaseTaskOrder::CreationOrder => {
                tasks.sort_by(|a, b| a.task_id.cmp(&b.task_id));
            }
        }
    }

    /// 任务的标准任务提前天数 (无标准任务时取 0)
    fn day_counter_of(
        task: &Task,
        standard_index: &HashMap<&str, &crate::domain::catalog::StandardTask>,
    ) -> i32 {
        task.standard_task_id
            .as_deref()
            .and_then(|id| standard_index.get(id))
            .map(|st| st.day_counter)
            .unwrap_or(0)
    }
}
