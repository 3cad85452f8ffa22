// ==========================================
// what-if 模拟端到端测试
// ==========================================
// 职责: 在真实 SQLite 文件上验证急单模拟的
//       影响量化与零写入 (非干扰性)
// ==========================================

mod test_helpers;

#[path = "helpers/test_data_builder.rs"]
mod test_data_builder;

use chrono::{NaiveDate, NaiveDateTime};
use test_data_builder::{phase, standard_task, workstation, ProjectBuilder};
use workshop_aps::config::EngineConfig;
use workshop_aps::domain::types::ProjectHealth;
use workshop_aps::engine::HypotheticalProject;
use workshop_aps::repository::catalog_repo::{StandardTaskRepository, WorkstationRepository};
use workshop_aps::repository::project_repo::{PhaseRepository, ProjectRepository};
use workshop_aps::SchedulingApi;

fn date(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, d).unwrap()
}

fn dt(d: u32, h: u32, min: u32) -> NaiveDateTime {
    date(d).and_hms_opt(h, min, 0).unwrap()
}

/// 单工位被真实项目占用的紧张场景:
/// P01 复杂度 50 => 100+150 分钟，交付 3-05，周一排完 => ON_TRACK
fn seeded_api() -> (tempfile::NamedTempFile, SchedulingApi) {
    let (tmp, db_path) = test_helpers::create_test_db().unwrap();
    let conn = test_helpers::open_test_connection(&db_path).unwrap();

    ProjectRepository::new(conn.clone())
        .create(
            &ProjectBuilder::new("P01")
                .complexity(50.0)
                .installation_date(date(5))
                .build(),
        )
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

    (tmp, SchedulingApi::new(conn, EngineConfig::default()))
}

fn rush_draft(installation: NaiveDate) -> HypotheticalProject {
    HypotheticalProject {
        name: "急单".to_string(),
        client: "客户B".to_string(),
        start_date: date(2),
        installation_date: installation,
    }
}

#[test]
fn test_rush_insertion_quantifies_impact() {
    let (_tmp, api) = seeded_api();
    api.generate_project_tasks("P01", "PH1", None).unwrap();
    let as_of = dt(2, 8, 0);

    // 急单复杂度 100 => 200+300 分钟，交付早于 P01，排在前面
    let result = api
        .simulate_insertion(&rush_draft(date(3)), None, 100.0, as_of)
        .unwrap();

    assert!(result.warnings.is_empty());

    // 急单自身: 周一 16:20 完工，剩余 1 个工作日 => AT_RISK
    assert_eq!(result.hypothetical.last_step_end, Some(dt(2, 16, 20)));
    assert_eq!(result.hypothetical.working_days_remaining, Some(1));
    assert_eq!(result.hypothetical.health, ProjectHealth::AtRisk);

    // 真实项目被挤到周二完工，松弛 3 → 2 => 劣化为 AT_RISK
    assert_eq!(result.impacts.len(), 1);
    let impact = &result.impacts[0];
    assert_eq!(impact.project_id, "P01");
    assert_eq!(impact.health_before, ProjectHealth::OnTrack);
    assert_eq!(impact.health_after, ProjectHealth::AtRisk);
    assert_eq!(impact.days_delta(), Some(-1));
}

#[test]
fn test_simulation_never_writes_storage() {
    let (_tmp, api) = seeded_api();
    api.generate_project_tasks("P01", "PH1", None).unwrap();
    let as_of = dt(2, 8, 0);

    api.generate_schedule(as_of).unwrap();
    let persisted_before = api.list_persisted_slots().unwrap();

    api.simulate_insertion(&rush_draft(date(3)), None, 100.0, as_of)
        .unwrap();

    // 模拟前后存储的落位逐条一致，任务/项目表也未新增假想实体
    assert_eq!(api.list_persisted_slots().unwrap(), persisted_before);
    let backlog = api.load_backlog().unwrap();
    assert_eq!(backlog.projects.len(), 1);
    assert_eq!(backlog.tasks.len(), 2);
}

#[test]
fn test_loose_deadline_rush_has_no_impact() {
    let (_tmp, api) = seeded_api();
    api.generate_project_tasks("P01", "PH1", None).unwrap();

    // 交付宽松的假想项目排在真实项目之后
    let result = api
        .simulate_insertion(&rush_draft(date(25)), None, 50.0, dt(2, 8, 0))
        .unwrap();

    assert!(result.impacts.is_empty());
    assert_eq!(result.hypothetical.health, ProjectHealth::OnTrack);
}
