// ==========================================
// 车间排产系统 - 配置层
// ==========================================
// 职责: 系统配置的加载与类型化
// ==========================================

pub mod config_manager;
pub mod engine_config;

pub use config_manager::ConfigManager;
pub use engine_config::EngineConfig;
