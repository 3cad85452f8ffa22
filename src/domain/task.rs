// ==========================================
// 车间排产系统 - 任务领域模型
// ==========================================
// 红线: duration_minutes 在任务生成时一次性固化，
// 之后复杂度/系数变化不回溯修改已有任务。
// ==========================================

use crate::domain::types::TaskStatus;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ==========================================
// Task - 任务实例
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub task_id: String,                     // 任务ID
    pub phase_id: String,                    // 关联阶段
    pub standard_task_id: Option<String>,    // 来源标准任务 (可选)
    pub name: String,                        // 任务名称
    pub duration_minutes: i64,               // 工时(分钟)，生成时固化
    pub due_date: Option<NaiveDate>,         // 交期提示 (installation - day_counter)
    pub status: TaskStatus,                  // 状态
    pub candidate_workstation_ids: Vec<String>, // 候选工位 (来自能力链接快照)
}

impl Task {
    /// 判断任务是否还需要排产
    ///
    /// 已完工任务不再占用工位时间线
    pub fn needs_scheduling(&self) -> bool {
        self.status != TaskStatus::Completed
    }
}
