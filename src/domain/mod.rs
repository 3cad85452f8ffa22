// ==========================================
// 车间排产系统 - 领域层
// ==========================================
// 职责: 实体与类型定义，不含持久化与业务流程
// ==========================================

pub mod calendar;
pub mod catalog;
pub mod project;
pub mod schedule;
pub mod task;
pub mod types;

// 重导出核心实体
pub use calendar::HolidayEntry;
pub use catalog::{ProductionRoute, StandardTask, Workstation};
pub use project::{Phase, Project};
pub use schedule::{
    ProjectCompletionInfo, ProjectImpact, ScheduleSlot, ScheduleWarning, SimulationResult,
};
pub use task::Task;
