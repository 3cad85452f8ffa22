// ==========================================
// 车间排产系统 - 工作日历解析引擎
// ==========================================
// 职责: 班组节假日 + 固定工作时段窗口 => 时刻可行性判定
// 红线: 无状态纯函数查询，分钟粒度
// ==========================================
// 输入: holiday 表 + 引擎配置的工作时段窗口
// 输出: is_workable / 日历感知的区间推进
// ==========================================

use crate::domain::calendar::HolidayEntry;
use crate::domain::types::TeamKind;
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use std::collections::{HashMap, HashSet};

// ==========================================
// WorkingWindow - 工作日时段窗口
// ==========================================
// 整次引擎运行内恒定 (例如 08:00-17:00)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkingWindow {
    pub start_hour: u32, // 窗口起点 (整点)
    pub end_hour: u32,   // 窗口终点 (整点)
}

impl WorkingWindow {
    /// 构造窗口（小时越界已在 EngineConfig::validate 拦截；
    /// 此处收紧到 0-23，保证时刻构造恒成功，不做静默回退）
    pub fn new(start_hour: u32, end_hour: u32) -> Self {
        Self {
            start_hour: start_hour.min(23),
            end_hour: end_hour.min(23),
        }
    }

    /// 窗口起点时刻
    pub fn start_time(&self) -> NaiveTime {
        NaiveTime::from_hms_opt(self.start_hour, 0, 0).unwrap()
    }

    /// 窗口终点时刻
    pub fn end_time(&self) -> NaiveTime {
        NaiveTime::from_hms_opt(self.end_hour, 0, 0).unwrap()
    }

    /// 单个工作日的可用分钟数
    pub fn minutes_per_day(&self) -> i64 {
        (self.end_hour as i64 - self.start_hour as i64) * 60
    }

    /// 时刻是否落在窗口内 (含起点，不含终点)
    pub fn contains(&self, time: NaiveTime) -> bool {
        time >= self.start_time() && time < self.end_time()
    }
}

impl Default for WorkingWindow {
    fn default() -> Self {
        Self::new(8, 17)
    }
}

// ==========================================
// CalendarResolver - 日历解析引擎
// ==========================================
pub struct CalendarResolver {
    holidays: HashMap<TeamKind, HashSet<NaiveDate>>,
    window: WorkingWindow,
    horizon_days: i64,
}

impl CalendarResolver {
    /// 从节假日条目构造解析器
    ///
    /// # 参数
    /// - `entries`: 班组节假日条目
    /// - `window`: 工作时段窗口
    /// - `horizon_days`: 日历推进的视野上限(天)，防止无界搜索
    pub fn new(entries: &[HolidayEntry], window: WorkingWindow, horizon_days: i64) -> Self {
        let mut holidays: HashMap<TeamKind, HashSet<NaiveDate>> = HashMap::new();
        for entry in entries {
            holidays.entry(entry.team).or_default().insert(entry.day);
        }

        Self {
            holidays,
            window,
            horizon_days,
        }
    }

    /// 工作时段窗口
    pub fn window(&self) -> WorkingWindow {
        self.window
    }

    // ==========================================
    // 核心查询
    // ==========================================

    /// 判断日期是否为班组工作日
    ///
    /// 周末不做特殊处理：源数据将全部非工作日登记为节假日条目。
    pub fn is_working_day(&self, team: TeamKind, day: NaiveDate) -> bool {
        !self
            .holidays
            .get(&team)
            .map(|days| days.contains(&day))
            .unwrap_or(false)
    }

    /// 判断时刻对班组是否可工作
    ///
    /// # 返回
    /// false: 日期为班组节假日，或时刻落在工作时段窗口之外
    pub fn is_workable(&self, team: TeamKind, at: NaiveDateTime) -> bool {
        self.is_working_day(team, at.date()) && self.window.contains(at.time())
    }

    // ==========================================
    // 日历感知区间推进
    // ==========================================

    /// 不早于 `from` 的首个可工作分钟
    ///
    /// # 返回
    /// - `Some(ts)`: 对齐到分钟的首个可行开工时刻
    /// - `None`: 视野内无可行时刻 (日历耗尽)
    pub fn next_workable_minute(&self, team: TeamKind, from: NaiveDateTime) -> Option<NaiveDateTime> {
        let from = truncate_to_minute(from);
        let limit = from.date() + Duration::days(self.horizon_days);

        let mut cursor = from;
        while cursor.date() <= limit {
            if !self.is_working_day(team, cursor.date()) || cursor.time() >= self.window.end_time() {
                cursor = (cursor.date() + Duration::days(1)).and_time(self.window.start_time());
                continue;
            }
            if cursor.time() < self.window.start_time() {
                cursor = cursor.date().and_time(self.window.start_time());
            }
            return Some(cursor);
        }

        None
    }

    /// 从可工作时刻 `start` 起累计 `minutes` 分钟有效工时后的完工时刻
    ///
    /// 有效工时只在工作时段内累计；结果端点可能跨越
    /// 非工作间隙 (间隙不计入工时，但计入墙钟跨度)。
    ///
    /// # 参数
    /// - `start`: 开工时刻，须已满足 is_workable
    /// - `minutes`: 任务工时(分钟)
    ///
    /// # 返回
    /// - `Some(ts)`: 完工时刻
    /// - `None`: 视野内无法容纳全部工时 (日历耗尽)
    pub fn add_working_minutes(
        &self,
        team: TeamKind,
        start: NaiveDateTime,
        minutes: i64,
    ) -> Option<NaiveDateTime> {
        let start = truncate_to_minute(start);
        let limit = start.date() + Duration::days(self.horizon_days);

        let mut cursor = start;
        let mut remaining = minutes.max(0);

        loop {
            let day_end = cursor.date().and_time(self.window.end_time());
            let available = (day_end - cursor).num_minutes();

            if remaining <= available {
                return Some(cursor + Duration::minutes(remaining));
            }
            remaining -= available;

            // 跳到下一个工作日的窗口起点
            let mut next_day = cursor.date() + Duration::days(1);
            while !self.is_working_day(team, next_day) {
                if next_day > limit {
                    return None;
                }
                next_day += Duration::days(1);
            }
            if next_day > limit {
                return None;
            }
            cursor = next_day.and_time(self.window.start_time());
        }
    }

    /// 两个日期之间的工作日数 (带符号)
    ///
    /// - `to > from`: 统计 (from, to] 内工作日数，为正
    /// - `to < from`: 统计 (to, from] 内工作日数，取负
    ///
    /// 用于完工预测的剩余工作日口径 (与日历判定一致)。
    pub fn working_days_between(&self, team: TeamKind, from: NaiveDate, to: NaiveDate) -> i64 {
        if from == to {
            return 0;
        }

        let (lo, hi, sign) = if to > from { (from, to, 1) } else { (to, from, -1) };

        let mut count = 0i64;
        let mut day = lo + Duration::days(1);
        while day <= hi {
            if self.is_working_day(team, day) {
                count += 1;
            }
            day += Duration::days(1);
        }

        count * sign
    }
}

/// 对齐到分钟 (引擎全程分钟粒度)
fn truncate_to_minute(ts: NaiveDateTime) -> NaiveDateTime {
    ts.date()
        .and_time(NaiveTime::from_hms_opt(ts.hour(), ts.minute(), 0).unwrap_or(ts.time()))
}
