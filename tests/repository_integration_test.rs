// ==========================================
// 仓储层集成测试
// ==========================================
// 职责: 在真实 SQLite 文件上验证各仓储的读写语义
// ==========================================

mod test_helpers;

#[path = "helpers/test_data_builder.rs"]
mod test_data_builder;

use chrono::NaiveDate;
use test_data_builder::{phase, route, standard_task, workstation, ProjectBuilder};
use workshop_aps::domain::calendar::HolidayEntry;
use workshop_aps::domain::schedule::ScheduleSlot;
use workshop_aps::domain::task::Task;
use workshop_aps::domain::types::{ProjectStatus, TaskStatus, TeamKind};
use workshop_aps::repository::catalog_repo::{
    ProductionRouteRepository, StandardTaskRepository, WorkstationRepository,
};
use workshop_aps::repository::holiday_repo::HolidayRepository;
use workshop_aps::repository::project_repo::{PhaseRepository, ProjectRepository};
use workshop_aps::repository::slot_repo::ScheduleSlotRepository;
use workshop_aps::repository::task_repo::TaskRepository;

fn date(m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, m, d).unwrap()
}

#[test]
fn test_project_round_trip_and_status_update() {
    let (_tmp, db_path) = test_helpers::create_test_db().unwrap();
    let conn = test_helpers::open_test_connection(&db_path).unwrap();
    let repo = ProjectRepository::new(conn);

    let project = ProjectBuilder::new("P01").client("客户B").build();
    repo.create(&project).unwrap();

    let loaded = repo.find_by_id("P01").unwrap().unwrap();
    assert_eq!(loaded, project);

    repo.update_status("P01", "IN_PROGRESS").unwrap();
    let loaded = repo.find_by_id("P01").unwrap().unwrap();
    assert_eq!(loaded.status, ProjectStatus::InProgress);
}

#[test]
fn test_list_all_projects_ordered_by_creation() {
    let (_tmp, db_path) = test_helpers::create_test_db().unwrap();
    let conn = test_helpers::open_test_connection(&db_path).unwrap();
    let repo = ProjectRepository::new(conn);

    let early = date(2, 1).and_hms_opt(9, 0, 0).unwrap();
    let late = date(2, 10).and_hms_opt(9, 0, 0).unwrap();
    repo.create(&ProjectBuilder::new("P02").created_at(late).build())
        .unwrap();
    repo.create(&ProjectBuilder::new("P01").created_at(early).build())
        .unwrap();

    let all = repo.list_all().unwrap();
    assert_eq!(all[0].project_id, "P01");
    assert_eq!(all[1].project_id, "P02");
}

#[test]
fn test_phase_listing_sorted_by_sequence() {
    let (_tmp, db_path) = test_helpers::create_test_db().unwrap();
    let conn = test_helpers::open_test_connection(&db_path).unwrap();
    let project_repo = ProjectRepository::new(conn.clone());
    let phase_repo = PhaseRepository::new(conn);

    project_repo
        .create(&ProjectBuilder::new("P01").build())
        .unwrap();
    phase_repo.create(&phase("PH2", "P01", 2)).unwrap();
    phase_repo.create(&phase("PH1", "P01", 1)).unwrap();

    let phases = phase_repo.list_by_project("P01").unwrap();
    assert_eq!(phases.len(), 2);
    assert_eq!(phases[0].phase_id, "PH1");
    assert_eq!(phases[1].phase_id, "PH2");
}

#[test]
fn test_route_members_round_trip() {
    let (_tmp, db_path) = test_helpers::create_test_db().unwrap();
    let conn = test_helpers::open_test_connection(&db_path).unwrap();
    let standard_repo = StandardTaskRepository::new(conn.clone());
    let route_repo = ProductionRouteRepository::new(conn);

    standard_repo
        .create(&standard_task("ST1", 1, Some(2.0), 5))
        .unwrap();
    standard_repo
        .create(&standard_task("ST2", 2, Some(3.0), 3))
        .unwrap();
    route_repo.create(&route("R01", &["ST1", "ST2"])).unwrap();

    let loaded = route_repo.find_by_id("R01").unwrap().unwrap();
    assert_eq!(loaded.member_ids, vec!["ST1", "ST2"]);
    assert!(loaded.contains("ST1"));
    assert!(!loaded.contains("ST9"));
}

#[test]
fn test_workstation_capabilities_round_trip() {
    let (_tmp, db_path) = test_helpers::create_test_db().unwrap();
    let conn = test_helpers::open_test_connection(&db_path).unwrap();
    let standard_repo = StandardTaskRepository::new(conn.clone());
    let workstation_repo = WorkstationRepository::new(conn);

    standard_repo
        .create(&standard_task("ST1", 1, Some(2.0), 5))
        .unwrap();
    workstation_repo
        .create(&workstation("W01", &["ST1"]))
        .unwrap();

    let all = workstation_repo.list_all().unwrap();
    assert_eq!(all.len(), 1);
    assert!(all[0].can_perform("ST1"));
}

#[test]
fn test_task_batch_create_with_candidates() {
    let (_tmp, db_path) = test_helpers::create_test_db().unwrap();
    let conn = test_helpers::open_test_connection(&db_path).unwrap();
    let project_repo = ProjectRepository::new(conn.clone());
    let phase_repo = PhaseRepository::new(conn.clone());
    let standard_repo = StandardTaskRepository::new(conn.clone());
    let workstation_repo = WorkstationRepository::new(conn.clone());
    let task_repo = TaskRepository::new(conn);

    project_repo
        .create(&ProjectBuilder::new("P01").build())
        .unwrap();
    phase_repo.create(&phase("PH1", "P01", 1)).unwrap();
    standard_repo
        .create(&standard_task("ST1", 1, Some(2.0), 5))
        .unwrap();
    workstation_repo
        .create(&workstation("W01", &["ST1"]))
        .unwrap();
    workstation_repo
        .create(&workstation("W02", &["ST1"]))
        .unwrap();

    let tasks = vec![Task {
        task_id: "PH1-T001".to_string(),
        phase_id: "PH1".to_string(),
        standard_task_id: Some("ST1".to_string()),
        name: "开料".to_string(),
        duration_minutes: 100,
        due_date: Some(date(3, 27)),
        status: TaskStatus::Todo,
        candidate_workstation_ids: vec!["W01".to_string(), "W02".to_string()],
    }];
    assert_eq!(task_repo.create_batch(&tasks).unwrap(), 1);

    let loaded = task_repo.list_by_phase("PH1").unwrap();
    assert_eq!(loaded, tasks);

    task_repo.update_status("PH1-T001", "COMPLETED").unwrap();
    let loaded = task_repo.list_by_phase("PH1").unwrap();
    assert_eq!(loaded[0].status, TaskStatus::Completed);
}

#[test]
fn test_holiday_create_is_idempotent() {
    let (_tmp, db_path) = test_helpers::create_test_db().unwrap();
    let conn = test_helpers::open_test_connection(&db_path).unwrap();
    let repo = HolidayRepository::new(conn);

    let entry = HolidayEntry {
        team: TeamKind::Production,
        day: date(3, 3),
    };
    repo.create(&entry).unwrap();
    repo.create(&entry).unwrap();

    let all = repo.list_all().unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].team, TeamKind::Production);
}

#[test]
fn test_slot_replace_is_scoped_to_covered_projects() {
    let (_tmp, db_path) = test_helpers::create_test_db().unwrap();
    let conn = test_helpers::open_test_connection(&db_path).unwrap();
    let repo = ScheduleSlotRepository::new(conn);

    let slot = |task_id: &str, project_id: &str, h: u32| ScheduleSlot {
        task_id: task_id.to_string(),
        project_id: project_id.to_string(),
        workstation_id: "W01".to_string(),
        start_at: date(3, 2).and_hms_opt(h, 0, 0).unwrap(),
        end_at: date(3, 2).and_hms_opt(h + 1, 0, 0).unwrap(),
    };

    repo.replace_for_projects(&[slot("T01", "P01", 8), slot("T05", "P02", 8)])
        .unwrap();

    // 新一轮只覆盖 P01: 其旧落位被整体替换，P02 保持不变
    repo.replace_for_projects(&[slot("T02", "P01", 10)]).unwrap();

    let all = repo.list_all().unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].task_id, "T02");
    assert_eq!(all[1].task_id, "T05");
}
