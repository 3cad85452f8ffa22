// ==========================================
// 车间排产系统 - 排产结果领域模型
// ==========================================
// 红线: schedule_slot 仅由 SchedulePersister 落库，
// 预测/模拟结果均为派生值，不反向污染基础数据。
// ==========================================

use crate::domain::types::ProjectHealth;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

// ==========================================
// ScheduleSlot - 排产落位
// ==========================================
// 不变量: 同一工位的落位互不重叠。
// start_at/end_at 为墙钟时间；端点之间可能跨越
// 非工作间隙，这些间隙不计入任务的"有效工时"。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleSlot {
    pub task_id: String,        // 任务ID (落位主键)
    pub project_id: String,     // 项目ID快照 (便于按项目替换/查询)
    pub workstation_id: String, // 工位ID
    pub start_at: NaiveDateTime, // 开工时刻
    pub end_at: NaiveDateTime,   // 完工时刻
}

// ==========================================
// ScheduleWarning - 排产告警
// ==========================================
// 非致命问题随结果返回而非抛出，
// 调用方可呈现"N 个任务无法排产"而不丢失整次计算。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScheduleWarning {
    /// 任务无候选工位：仍会生成任务，但不可排产
    NoEligibleWorkstation { task_id: String },
    /// 任务引用了不存在的标准任务：跳过该任务
    MissingStandardTask {
        task_id: String,
        standard_task_id: String,
    },
    /// 在限定视野内找不到可行区间：按不可排产处理，防止无界搜索
    HorizonExceeded { task_id: String, horizon_days: i64 },
}

impl ScheduleWarning {
    /// 告警关联的任务ID
    pub fn task_id(&self) -> &str {
        match self {
            ScheduleWarning::NoEligibleWorkstation { task_id } => task_id,
            ScheduleWarning::MissingStandardTask { task_id, .. } => task_id,
            ScheduleWarning::HorizonExceeded { task_id, .. } => task_id,
        }
    }
}

// ==========================================
// ProjectCompletionInfo - 项目完工预测
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectCompletionInfo {
    pub project_id: String,                    // 项目ID
    pub project_name: String,                  // 项目名称
    pub client: String,                        // 客户
    pub last_step_end: Option<NaiveDateTime>,  // 最后生产工序完工时刻
    pub working_days_remaining: Option<i64>,   // 相对交付日期的剩余工作日 (可为负)
    pub health: ProjectHealth,                 // 健康度
    pub incomplete: bool,                      // 存在未能排产的任务
}

// ==========================================
// ProjectImpact - 模拟对单个真实项目的影响
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectImpact {
    pub project_id: String,                  // 项目ID
    pub project_name: String,                // 项目名称
    pub health_before: ProjectHealth,        // 模拟前健康度
    pub health_after: ProjectHealth,         // 模拟后健康度
    pub days_remaining_before: Option<i64>,  // 模拟前剩余工作日
    pub days_remaining_after: Option<i64>,   // 模拟后剩余工作日
}

impl ProjectImpact {
    /// 剩余工作日变化量 (after - before，任一侧缺失时为 None)
    pub fn days_delta(&self) -> Option<i64> {
        match (self.days_remaining_before, self.days_remaining_after) {
            (Some(before), Some(after)) => Some(after - before),
            _ => None,
        }
    }
}

// ==========================================
// SimulationResult - What-if 模拟结果
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationResult {
    pub hypothetical: ProjectCompletionInfo, // 假想项目自身的完工预测
    pub impacts: Vec<ProjectImpact>,         // 预测发生变化的真实项目
    pub warnings: Vec<ScheduleWarning>,      // 模拟运行期间收集的告警
}
