// ==========================================
// 配置层集成测试
// ==========================================
// 职责: 验证 config_kv 覆写经 from_connection 贯通到排产行为
// ==========================================

mod test_helpers;

#[path = "helpers/test_data_builder.rs"]
mod test_data_builder;

use chrono::{NaiveDate, NaiveDateTime};
use test_data_builder::{phase, standard_task, workstation, ProjectBuilder};
use workshop_aps::config::config_manager::{
    ConfigManager, KEY_WORK_END_HOUR, KEY_WORK_START_HOUR,
};
use workshop_aps::engine::EngineError;
use workshop_aps::repository::catalog_repo::{StandardTaskRepository, WorkstationRepository};
use workshop_aps::repository::project_repo::{PhaseRepository, ProjectRepository};
use workshop_aps::SchedulingApi;

fn dt(d: u32, h: u32, min: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 3, d)
        .unwrap()
        .and_hms_opt(h, min, 0)
        .unwrap()
}

#[test]
fn test_shortened_window_spills_work_to_next_day() {
    let (_tmp, db_path) = test_helpers::create_test_db().unwrap();
    let conn = test_helpers::open_test_connection(&db_path).unwrap();

    ProjectRepository::new(conn.clone())
        .create(&ProjectBuilder::new("P01").complexity(50.0).build())
        .unwrap();
    PhaseRepository::new(conn.clone())
        .create(&phase("PH1", "P01", 1))
        .unwrap();
    let standard_repo = StandardTaskRepository::new(conn.clone());
    standard_repo
        .create(&standard_task("ST1", 1, Some(2.0), 5))
        .unwrap();
    standard_repo
        .create(&standard_task("ST2", 2, Some(3.0), 3))
        .unwrap();
    WorkstationRepository::new(conn.clone())
        .create(&workstation("W01", &["ST1", "ST2"]))
        .unwrap();

    // 半天工作制: 08:00-12:00，每天只有 240 分钟
    let manager = ConfigManager::from_connection(conn.clone()).unwrap();
    manager.set_config_value(KEY_WORK_END_HOUR, "12").unwrap();

    let api = SchedulingApi::from_connection(conn).unwrap();
    api.generate_project_tasks("P01", "PH1", None).unwrap();

    let outcome = api.generate_schedule(dt(2, 8, 0)).unwrap();

    // 100 分钟当日完成；150 分钟拆到次日: 周一余 140 + 周二 10
    assert_eq!(outcome.slots[0].end_at, dt(2, 9, 40));
    assert_eq!(outcome.slots[1].start_at, dt(2, 9, 40));
    assert_eq!(outcome.slots[1].end_at, dt(3, 8, 10));
}

#[test]
fn test_invalid_window_blocks_api_assembly() {
    let (_tmp, db_path) = test_helpers::create_test_db().unwrap();
    let conn = test_helpers::open_test_connection(&db_path).unwrap();

    let manager = ConfigManager::from_connection(conn.clone()).unwrap();
    manager.set_config_value(KEY_WORK_START_HOUR, "20").unwrap();

    let result = SchedulingApi::from_connection(conn);
    assert!(matches!(result, Err(EngineError::Config(_))));
}
