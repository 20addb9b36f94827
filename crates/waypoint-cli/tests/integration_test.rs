//! CLI output must be the same markdown the core display types produce, since
//! the MCP server returns that markdown directly.

use std::process::Command;

use jiff::civil::date;
use tempfile::TempDir;
use waypoint_core::{
    display::{CriticalPath, PlanReport, PlanSummaries},
    operations,
    params::ListPlans,
    PlanStore, PlanStoreBuilder,
};

const PLAN: &str = r#"{
    "goal_text": "Renovate the kitchen",
    "plan_summary": "Kitchen renovation",
    "tasks": [
        {"id": "T1", "title": "Demolition", "duration_days": 2},
        {"id": "T2", "title": "Plumbing", "duration_days": 2, "depends_on": ["T1"]},
        {"id": "T3", "title": "Electrics", "duration_days": 1, "depends_on": ["T1"]},
        {"id": "T4", "title": "Cabinets", "duration_days": 3, "depends_on": ["T2", "T3"]}
    ]
}"#;

async fn create_test_store(temp_dir: &TempDir) -> PlanStore {
    PlanStoreBuilder::new()
        .with_directory(Some(temp_dir.path().join("plans")))
        .build()
        .await
        .expect("Failed to create store")
}

fn run_cli_command(temp_dir: &TempDir, args: &[&str]) -> String {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_wp"));
    cmd.arg("--no-color")
        .arg("--today")
        .arg("2024-01-16")
        .arg("--plans-dir")
        .arg(temp_dir.path().join("plans"));
    cmd.args(args);

    let output = cmd.output().expect("Failed to run CLI command");
    assert!(output.status.success(), "wp {args:?} failed");
    String::from_utf8(output.stdout).expect("Invalid UTF-8 in CLI output")
}

fn import_via_cli(temp_dir: &TempDir) {
    let path = temp_dir.path().join("kitchen.json");
    std::fs::write(&path, PLAN).unwrap();
    run_cli_command(
        temp_dir,
        &["plan", "import", "--start", "2024-01-15", path.to_str().unwrap()],
    );
}

#[tokio::test]
async fn test_plan_display_consistency() {
    let temp_dir = TempDir::new().unwrap();
    import_via_cli(&temp_dir);

    let store = create_test_store(&temp_dir).await;
    let model = operations::load_model(&store, 1).await.unwrap();

    let cli_output = run_cli_command(&temp_dir, &["plan", "show", "1"]);
    let expected = PlanReport::new(&model).as_of(date(2024, 1, 16)).to_string();
    assert_eq!(cli_output, expected);

    let cli_output = run_cli_command(&temp_dir, &["plan", "critical", "1"]);
    assert_eq!(cli_output, CriticalPath(&model).to_string());
    assert!(cli_output.contains("1. T1 Demolition"));
    assert!(cli_output.contains("3. T4 Cabinets"));
}

#[tokio::test]
async fn test_list_display_consistency() {
    let temp_dir = TempDir::new().unwrap();
    import_via_cli(&temp_dir);
    import_via_cli(&temp_dir);

    let store = create_test_store(&temp_dir).await;
    let summaries: PlanSummaries = operations::list_summaries(&store, &ListPlans::default())
        .await
        .unwrap();
    assert_eq!(summaries.len(), 2);

    let cli_output = run_cli_command(&temp_dir, &["plan", "list"]);
    assert_eq!(cli_output, format!("# Plans\n\n{summaries}"));
}

#[tokio::test]
async fn test_cli_changes_are_visible_to_core() {
    let temp_dir = TempDir::new().unwrap();
    import_via_cli(&temp_dir);

    run_cli_command(&temp_dir, &["task", "toggle", "1", "T1"]);
    run_cli_command(&temp_dir, &["task", "status", "1", "T3", "blocked"]);

    let store = create_test_store(&temp_dir).await;
    let model = operations::load_model(&store, 1).await.unwrap();
    let progress = model.progress();
    assert_eq!(progress.completed, 1);
    assert_eq!(progress.blocked, 1);
    assert_eq!(progress.percent, 25);

    let ready: Vec<_> = model
        .actionable_tasks()
        .iter()
        .map(|t| t.task_id.clone())
        .collect();
    assert_eq!(ready, vec!["T2", "T3"]);
}
