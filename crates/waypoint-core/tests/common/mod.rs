use std::path::PathBuf;

use tempfile::TempDir;
use waypoint_core::{PlanStore, PlanStoreBuilder};

/// Generator output for a small release plan.
///
/// T1 (2d) -> T2 (3d) -> T4 (1d) is the critical chain; T3 (1d) hangs off
/// T1 with two days of slack.
pub const RELEASE_PLAN: &str = r#"{
    "goal_text": "Ship version 2.0",
    "constraints": {
        "deadline": "2024-01-26",
        "max_hours_per_day": 6,
        "no_work_on_weekends": true
    },
    "plan_type": "moderate",
    "plan_summary": "Release 2.0\nFreeze, test, document and publish.",
    "tasks": [
        {"id": "T1", "title": "Freeze features", "duration_days": 2, "priority": "High"},
        {"id": "T2", "title": "Regression tests", "duration_days": 3, "depends_on": ["T1"]},
        {"id": "T3", "title": "Release notes", "duration_days": 1, "depends_on": ["T1"], "priority": "low"},
        {"id": "T4", "title": "Publish", "duration_days": 1, "depends_on": ["T2", "T3"]}
    ]
}"#;

/// Creates a store in a fresh temporary directory.
pub async fn create_test_store() -> (TempDir, PlanStore) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let store = PlanStoreBuilder::new()
        .with_directory(Some(temp_dir.path().join("plans")))
        .build()
        .await
        .expect("Failed to create store");
    (temp_dir, store)
}

/// Writes `contents` next to the store and returns its path.
pub fn write_plan_file(temp_dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = temp_dir.path().join(name);
    std::fs::write(&path, contents).expect("Failed to write plan file");
    path
}
