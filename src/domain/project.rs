// ==========================================
// 车间排产系统 - 项目与阶段领域模型
// ==========================================
// 红线: 项目在仍有任务引用时不可删除
// ==========================================

use crate::domain::types::ProjectStatus;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

// ==========================================
// Project - 项目
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub project_id: String,            // 项目ID
    pub name: String,                  // 项目名称
    pub client: String,                // 客户
    pub start_date: NaiveDate,         // 开工日期
    pub installation_date: NaiveDate,  // 安装/交付日期
    pub complexity: f64,               // 复杂度 (0-100)
    pub status: ProjectStatus,         // 状态
    pub created_at: NaiveDateTime,     // 创建时间 (排产处理顺序依据)
}

// ==========================================
// Phase - 项目阶段
// ==========================================
// 不变量: 同一项目的阶段按 sequence_no 全序排列；
// 阶段 N+1 的任务不得早于阶段 N 的任务完成前开工。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Phase {
    pub phase_id: String,              // 阶段ID
    pub project_id: String,            // 关联项目
    pub name: String,                  // 阶段名称
    pub sequence_no: i32,              // 阶段顺序号
    pub start_date: Option<NaiveDate>, // 计划窗口起点
    pub end_date: Option<NaiveDate>,   // 计划窗口终点
}
