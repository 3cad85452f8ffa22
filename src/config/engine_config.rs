// ==========================================
// 车间排产系统 - 引擎配置快照
// ==========================================
// 约束: 工作时段窗口对整次引擎运行恒定
// ==========================================

use crate::domain::types::PhaseTaskOrder;
use serde::{Deserialize, Serialize};

// ==========================================
// EngineConfig - 引擎配置快照
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub work_start_hour: u32,          // 工作日窗口起点 (整点)
    pub work_end_hour: u32,            // 工作日窗口终点 (整点)
    pub at_risk_threshold_days: i64,   // 剩余工作日低于该阈值判为 AT_RISK
    pub fallback_task_minutes: i64,    // 标准任务无系数时的兜底工时(分钟)
    pub schedule_horizon_days: i64,    // 排产视野上限(天)，防止无界搜索
    pub phase_task_order: PhaseTaskOrder, // 阶段内任务排序策略
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            work_start_hour: 8,
            work_end_hour: 17,
            at_risk_threshold_days: 3,
            fallback_task_minutes: 60,
            schedule_horizon_days: 730,
            phase_task_order: PhaseTaskOrder::DayCounterDesc,
        }
    }
}

impl EngineConfig {
    /// 校验配置合法性
    ///
    /// # 返回
    /// - `Ok(())`: 配置合法
    /// - `Err`: 配置非法（致命，不参与告警式降级）
    pub fn validate(&self) -> Result<(), String> {
        // 窗口终点须为当天合法整点 (0-23)，24 点无法构造时刻
        if self.work_start_hour >= self.work_end_hour || self.work_end_hour >= 24 {
            return Err(format!(
                "非法工作时段窗口: {}:00-{}:00",
                self.work_start_hour, self.work_end_hour
            ));
        }
        if self.fallback_task_minutes <= 0 {
            return Err(format!("兜底工时必须为正: {}", self.fallback_task_minutes));
        }
        if self.schedule_horizon_days <= 0 {
            return Err(format!("排产视野必须为正: {}", self.schedule_horizon_days));
        }
        if self.at_risk_threshold_days < 0 {
            return Err(format!("风险阈值不可为负: {}", self.at_risk_threshold_days));
        }
        Ok(())
    }
}
