// ==========================================
// 车间排产系统 - 排产结果持久化器
// ==========================================
// 职责: 排产结果的唯一写入口；按项目整体替换落位
// 红线: 模拟管线绝不经过本模块
// ==========================================

use crate::domain::schedule::ScheduleSlot;
use crate::engine::error::EngineResult;
use crate::repository::slot_repo::ScheduleSlotRepository;
use rusqlite::Connection;
use std::sync::{Arc, Mutex};
use tracing::{info, instrument};

// ==========================================
// SchedulePersister - 落位持久化器
// ==========================================
pub struct SchedulePersister {
    slot_repo: ScheduleSlotRepository,
}

impl SchedulePersister {
    /// 创建新的持久化器实例
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self {
            slot_repo: ScheduleSlotRepository::new(conn),
        }
    }

    /// 持久化一次排产运行的全部落位
    ///
    /// 以输入覆盖的项目集合为单位整体替换：先删后写，单事务。
    /// 同一结果重复持久化得到相同的存储状态（幂等）。
    ///
    /// # 参数
    /// - `slots`: 排产器输出的落位列表
    ///
    /// # 返回
    /// 写入的落位条数
    #[instrument(skip(self, slots), fields(slots_count = slots.len()))]
    pub fn persist(&self, slots: &[ScheduleSlot]) -> EngineResult<usize> {
        let written = self.slot_repo.replace_for_projects(slots)?;
        info!(written, "排产落位已持久化");
        Ok(written)
    }

    /// 读取当前存储的全部落位（按 task_id 升序）
    pub fn load_all(&self) -> EngineResult<Vec<ScheduleSlot>> {
        Ok(self.slot_repo.list_all()?)
    }
}
