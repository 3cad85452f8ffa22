// ==========================================
// 车间排产系统 - 引擎层
// ==========================================
// 职责: 实现排产与完工预测的业务规则，不拼 SQL
// 红线: 引擎只读写内存快照；落库仅经 SchedulePersister
// ==========================================

pub mod backlog;
pub mod calendar;
pub mod error;
pub mod forecaster;
pub mod graph_builder;
pub mod orchestrator;
pub mod persister;
pub mod scheduler;
pub mod simulation;

// 重导出核心引擎
pub use backlog::Backlog;
pub use calendar::{CalendarResolver, WorkingWindow};
pub use error::{EngineError, EngineResult};
pub use forecaster::CompletionForecaster;
pub use graph_builder::TaskGraphBuilder;
pub use orchestrator::{ScheduleOrchestrator, ScheduleOutcome};
pub use persister::SchedulePersister;
pub use scheduler::CapacityScheduler;
pub use simulation::{HypotheticalProject, SimulationCoordinator};
