// ==========================================
// 车间排产系统 - 标准任务目录领域模型
// ==========================================
// 职责: 标准任务、生产路线、工位的静态目录数据
// ==========================================

use serde::{Deserialize, Serialize};

// ==========================================
// StandardTask - 标准任务 (目录条目)
// ==========================================
// time_coefficient × 项目复杂度 => 生成任务的名义工时(分钟)
// day_counter: 安装日期前的名义提前天数 (交期提示，非排产驱动)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardTask {
    pub standard_task_id: String,      // 标准任务ID
    pub task_number: i32,              // 任务编号
    pub name: String,                  // 任务名称
    pub time_coefficient: Option<f64>, // 工时系数 (缺失时使用兜底工时)
    pub day_counter: i32,              // 提前天数
    pub hourly_cost: Option<f64>,      // 小时成本 (可选)
}

// ==========================================
// ProductionRoute - 生产路线
// ==========================================
// 不变量: 只是标准任务的命名子集，路线内部不含顺序语义
// (顺序仍由 StandardTask.day_counter 与阶段结构决定)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductionRoute {
    pub route_id: String,              // 路线ID
    pub name: String,                  // 路线名称
    pub member_ids: Vec<String>,       // 成员标准任务ID集合
}

impl ProductionRoute {
    /// 判断标准任务是否属于本路线
    pub fn contains(&self, standard_task_id: &str) -> bool {
        self.member_ids.iter().any(|id| id == standard_task_id)
    }
}

// ==========================================
// Workstation - 工位
// ==========================================
// 模型假设: 单工位同一时刻只承载一个任务
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workstation {
    pub workstation_id: String,              // 工位ID
    pub name: String,                        // 工位名称
    pub capable_standard_task_ids: Vec<String>, // 可承接的标准任务ID集合
}

impl Workstation {
    /// 判断工位是否能承接指定标准任务
    pub fn can_perform(&self, standard_task_id: &str) -> bool {
        self.capable_standard_task_ids
            .iter()
            .any(|id| id == standard_task_id)
    }
}
