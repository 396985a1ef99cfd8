// Scenario replay contract tests.

use std::path::PathBuf;

use celledit_cli::replay::replay;
use celledit_cli::scenario::{Scenario, ScenarioError};
use celledit_config::EditSettings;

fn scenario_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("scenarios")
        .join(name)
}

#[test]
fn shipped_spanning_scenario_passes() {
    let scenario = Scenario::load(&scenario_path("spanning_commit.toml")).unwrap();
    let trace = replay(&scenario, EditSettings::default());

    assert!(trace.passed(), "mismatches: {:?}", trace.mismatches);
    let outcomes: Vec<&str> = trace.steps.iter().map(|s| s.outcome.as_str()).collect();
    assert_eq!(outcomes, ["-", "started", "rejected", "committed"]);

    // While editing the cell sits one container lower without moving on screen
    let init = &trace.steps[0];
    let started = &trace.steps[1];
    assert_eq!(init.container, Some(2));
    assert_eq!(started.container, Some(3));
    assert_eq!(started.translate_y, Some(-24.0));
    assert_eq!(started.scene_y, init.scene_y);
    assert!(trace.steps[2].editing);
}

#[test]
fn shipped_scroll_scenario_passes() {
    let scenario = Scenario::load(&scenario_path("scroll_cancels.toml")).unwrap();
    let trace = replay(&scenario, EditSettings::default());

    assert!(trace.passed(), "mismatches: {:?}", trace.mismatches);
    let outcomes: Vec<&str> = trace.steps.iter().map(|s| s.outcome.as_str()).collect();
    assert_eq!(outcomes, ["-", "started", "interrupted", "ignored", "ignored"]);
}

#[test]
fn relocation_can_be_switched_off() {
    let scenario = Scenario::load(&scenario_path("spanning_commit.toml")).unwrap();
    let settings = EditSettings {
        relocate_spanning_cells: false,
        ..EditSettings::default()
    };
    let trace = replay(&scenario, settings);

    assert!(trace.passed());
    assert_eq!(trace.steps[1].container, Some(2));
    assert_eq!(trace.steps[1].translate_y, Some(0.0));
}

#[test]
fn scroll_ignored_when_source_disabled() {
    let scenario = Scenario::load(&scenario_path("scroll_cancels.toml")).unwrap();
    let settings = EditSettings {
        cancel_on_scroll: false,
        ..EditSettings::default()
    };
    let trace = replay(&scenario, settings);

    // Deselection still cancels
    let outcomes: Vec<&str> = trace.steps.iter().map(|s| s.outcome.as_str()).collect();
    assert_eq!(outcomes, ["-", "started", "ignored", "interrupted", "ignored"]);
    assert!(trace.passed());
}

#[test]
fn failed_expectation_is_reported() {
    let source = r#"
[grid]
rendered_rows = 4

[cell]
row = 0
value = "a"

[[step]]
action = "start"

[expect]
editing = false
value = "b"
"#;
    let trace = replay(&Scenario::from_toml_str(source).unwrap(), EditSettings::default());

    assert!(!trace.passed());
    assert_eq!(trace.mismatches.len(), 2);
    assert!(trace.render_text().contains("expect: editing"));
}

#[test]
fn detached_view_keeps_commit_pending() {
    let source = r#"
[grid]
rendered_rows = 6
fixed_rows = 1

[cell]
row = 1
row_span = 3

[[step]]
action = "start"

[[step]]
action = "detach"

[[step]]
action = "commit"
input = "lost"

[[step]]
action = "cancel"

[[step]]
action = "start"
"#;
    let trace = replay(&Scenario::from_toml_str(source).unwrap(), EditSettings::default());
    let outcomes: Vec<&str> = trace.steps.iter().map(|s| s.outcome.as_str()).collect();

    assert_eq!(
        outcomes,
        [
            "-",
            "started",
            "detached",
            "visual-cell-missing",
            "cancelled",
            "cannot start editing: no visual cell bound",
        ]
    );
    assert_eq!(trace.steps[5].value, "");
    assert_eq!(trace.steps[5].container, None);
}

#[test]
fn trace_serializes_to_json() {
    let scenario = Scenario::load(&scenario_path("spanning_commit.toml")).unwrap();
    let trace = replay(&scenario, EditSettings::default());
    let json: serde_json::Value = serde_json::to_value(&trace).unwrap();

    assert_eq!(json["steps"][1]["action"], "start");
    assert_eq!(json["steps"][1]["container"], 3);
    assert_eq!(json["mismatches"].as_array().map(Vec::len), Some(0));
}

#[test]
fn missing_file_is_io_error() {
    let err = Scenario::load(&scenario_path("does_not_exist.toml")).unwrap_err();
    assert!(matches!(err, ScenarioError::Io { .. }));
}

#[test]
fn scenario_from_temp_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("s.toml");
    std::fs::write(&path, "[grid]\nrendered_rows = 2\n[cell]\nrow = 1\n[[step]]\naction = \"start\"\n").unwrap();

    let trace = replay(&Scenario::load(&path).unwrap(), EditSettings::default());
    assert!(trace.steps[1].editing);
}
