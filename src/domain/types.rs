// ==========================================
// 车间排产系统 - 领域类型定义
// ==========================================
// 序列化格式: SCREAMING_SNAKE_CASE (与数据库一致)
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ==========================================
// 班组类型 (Team Kind)
// ==========================================
// 节假日按整个班组登记；个人请假不影响引擎日历
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TeamKind {
    Production,   // 生产班组
    Installation, // 安装班组
}

impl fmt::Display for TeamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TeamKind::Production => write!(f, "PRODUCTION"),
            TeamKind::Installation => write!(f, "INSTALLATION"),
        }
    }
}

impl FromStr for TeamKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PRODUCTION" => Ok(TeamKind::Production),
            "INSTALLATION" => Ok(TeamKind::Installation),
            other => Err(format!("未知班组类型: {}", other)),
        }
    }
}

// ==========================================
// 项目状态 (Project Status)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProjectStatus {
    Planned,    // 已立项
    InProgress, // 进行中
    Done,       // 已完成(归档)
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProjectStatus::Planned => write!(f, "PLANNED"),
            ProjectStatus::InProgress => write!(f, "IN_PROGRESS"),
            ProjectStatus::Done => write!(f, "DONE"),
        }
    }
}

impl FromStr for ProjectStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PLANNED" => Ok(ProjectStatus::Planned),
            "IN_PROGRESS" => Ok(ProjectStatus::InProgress),
            "DONE" => Ok(ProjectStatus::Done),
            other => Err(format!("未知项目状态: {}", other)),
        }
    }
}

// ==========================================
// 任务状态 (Task Status)
// ==========================================
// 由车间工人变更；引擎只读
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    Todo,       // 待开工
    InProgress, // 加工中
    Completed,  // 已完工
    Hold,       // 挂起
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskStatus::Todo => write!(f, "TODO"),
            TaskStatus::InProgress => write!(f, "IN_PROGRESS"),
            TaskStatus::Completed => write!(f, "COMPLETED"),
            TaskStatus::Hold => write!(f, "HOLD"),
        }
    }
}

impl FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "TODO" => Ok(TaskStatus::Todo),
            "IN_PROGRESS" => Ok(TaskStatus::InProgress),
            "COMPLETED" => Ok(TaskStatus::Completed),
            "HOLD" => Ok(TaskStatus::Hold),
            other => Err(format!("未知任务状态: {}", other)),
        }
    }
}

// ==========================================
// 项目健康度 (Project Health)
// ==========================================
// 等级制: 完工预测时间相对交付日期的分级
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProjectHealth {
    OnTrack, // 正常
    AtRisk,  // 风险(剩余工作日低于阈值)
    Overdue, // 已逾期
}

impl fmt::Display for ProjectHealth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProjectHealth::OnTrack => write!(f, "ON_TRACK"),
            ProjectHealth::AtRisk => write!(f, "AT_RISK"),
            ProjectHealth::Overdue => write!(f, "OVERDUE"),
        }
    }
}

// ==========================================
// 阶段内任务排序策略 (Phase Task Order)
// ==========================================
// 阶段内并列任务的确定性排序是可注入配置，
// 而非硬编码——源系统的排序依据未完全确定。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PhaseTaskOrder {
    /// 标准任务 day_counter 降序，task_id 升序兜底（默认）
    DayCounterDesc,
    /// 创建顺序（task_id 升序）
    CreationOrder,
}

impl Default for PhaseTaskOrder {
    fn default() -> Self {
        PhaseTaskOrder::DayCounterDesc
    }
}

impl fmt::Display for PhaseTaskOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PhaseTaskOrder::DayCounterDesc => write!(f, "DAY_COUNTER_DESC"),
            PhaseTaskOrder::CreationOrder => write!(f, "CREATION_ORDER"),
        }
    }
}

impl FromStr for PhaseTaskOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "DAY_COUNTER_DESC" => Ok(PhaseTaskOrder::DayCounterDesc),
            "CREATION_ORDER" => Ok(PhaseTaskOrder::CreationOrder),
            other => Err(format!("未知任务排序策略: {}", other)),
        }
    }
}
