// ==========================================
// 车间排产系统 - 工作日历领域模型
// ==========================================
// 节假日按班组整体登记；个人请假影响人员配置，
// 不进入引擎的日历可行性判断。
// ==========================================

use crate::domain::types::TeamKind;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ==========================================
// HolidayEntry - 班组节假日
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HolidayEntry {
    pub team: TeamKind,  // 班组
    pub day: NaiveDate,  // 非工作日
}
