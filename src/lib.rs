// ==========================================
// 车间排产系统 - 核心库
// ==========================================
// 技术栈: Rust + SQLite
// 系统定位: 排产与完工预测引擎 (进程内库服务)
// 边界: CRUD 界面、通知、权限均为外部协作方
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 引擎层 - 业务规则
pub mod engine;

// 配置层 - 系统配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一）
pub mod db;

// 日志系统
pub mod logging;

// API 层 - 业务接口
pub mod api;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{
    PhaseTaskOrder, ProjectHealth, ProjectStatus, TaskStatus, TeamKind,
};

// 领域实体
pub use domain::{
    HolidayEntry, Phase, ProductionRoute, Project, ProjectCompletionInfo, ProjectImpact,
    ScheduleSlot, ScheduleWarning, SimulationResult, StandardTask, Task, Workstation,
};

// 引擎
pub use engine::{
    Backlog, CalendarResolver, CapacityScheduler, CompletionForecaster, EngineError, EngineResult,
    HypotheticalProject, ScheduleOrchestrator, ScheduleOutcome, SchedulePersister,
    SimulationCoordinator, TaskGraphBuilder, WorkingWindow,
};

// 配置
pub use config::{ConfigManager, EngineConfig};

// API
pub use api::SchedulingApi;
