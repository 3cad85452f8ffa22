// ==========================================
// 车间排产系统 - API 层
// ==========================================
// 职责: 提供业务 API 接口，供宿主应用进程内调用
// ==========================================

pub mod scheduling_api;

// 重导出核心类型
pub use scheduling_api::SchedulingApi;
