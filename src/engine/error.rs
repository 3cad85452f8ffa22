// ==========================================
// 车间排产系统 - 引擎层错误类型
// ==========================================
// 职责: 定义引擎层致命错误；排产质量问题不在此列，
// 以 ScheduleWarning 随结果返回
// ==========================================

use crate::repository::error::RepositoryError;
use thiserror::Error;

/// 引擎层错误类型
///
/// 只有让本次调用无法给出结果的问题才算错误：
/// 仓储读写失败、配置非法、调用参数非法。
#[derive(Error, Debug)]
pub enum EngineError {
    // ===== 调用参数错误 =====
    #[error("复杂度超出范围 (0-100): {0}")]
    InvalidComplexity(f64),

    #[error("生产路线未找到: route_id={route_id}")]
    RouteNotFound { route_id: String },

    #[error("项目未找到: project_id={project_id}")]
    ProjectNotFound { project_id: String },

    #[error("阶段未找到: phase_id={phase_id}")]
    PhaseNotFound { phase_id: String },

    // ===== 配置错误 =====
    #[error("引擎配置非法: {0}")]
    Config(String),

    // ===== 数据访问错误 =====
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    // ===== 通用错误 =====
    #[error("内部错误: {0}")]
    Internal(String),
}

/// Result 类型别名
pub type EngineResult<T> = Result<T, EngineError>;
