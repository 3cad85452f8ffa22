// ==========================================
// 车间排产系统 - 日志初始化
// ==========================================
// tracing + tracing-subscriber
// RUST_LOG 可覆盖默认过滤
// ==========================================

use tracing_subscriber::{fmt, EnvFilter};

/// 默认过滤: 引擎 info，依赖层只保留 warn
fn default_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn,workshop_aps=info"))
}

/// 初始化日志 (人读格式)
///
/// # 环境变量
/// - RUST_LOG: 覆盖默认过滤
///   例如: RUST_LOG=workshop_aps=trace
pub fn init() {
    fmt()
        .with_env_filter(default_filter())
        .with_target(true)
        .with_line_number(true)
        .init();
}

/// 初始化日志 (JSON 行格式)
///
/// 宿主应用做日志采集时使用；span 字段
/// (如 draft_name/as_of) 随事件一并输出。
pub fn init_json() {
    fmt()
        .json()
        .with_env_filter(default_filter())
        .with_current_span(true)
        .init();
}

/// 初始化测试环境的日志系统
///
/// 输出捕获到测试框架，失败时才展示
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("workshop_aps=debug"))
        .with_test_writer()
        .try_init();
}
