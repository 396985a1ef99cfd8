//! Scenario files: a grid, one cell, and the UI events to replay.
//!
//! ```toml
//! [grid]
//! rendered_rows = 5
//! fixed_rows = 1
//!
//! [cell]
//! row = 2
//! row_span = 3
//! value = "draft"
//!
//! [[step]]
//! action = "start"
//!
//! [[step]]
//! action = "commit"
//! input = "final"
//!
//! [expect]
//! editing = false
//! value = "final"
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid scenario: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("scenario is inconsistent: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Scenario {
    pub grid: GridSpec,
    pub cell: CellSpec,
    #[serde(default, rename = "step")]
    pub steps: Vec<Step>,
    #[serde(default)]
    pub expect: Option<Expect>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GridSpec {
    pub rendered_rows: usize,
    #[serde(default)]
    pub fixed_rows: usize,
    #[serde(default = "default_row_height")]
    pub row_height: f64,
}

fn default_row_height() -> f64 {
    24.0
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CellSpec {
    pub row: usize,
    #[serde(default)]
    pub column: usize,
    #[serde(default = "default_span")]
    pub row_span: usize,
    #[serde(default)]
    pub value: String,
    /// Editor widget name shown in the cell while editing
    #[serde(default = "default_editor")]
    pub editor: String,
}

fn default_span() -> usize {
    1
}

fn default_editor() -> String {
    "text".to_string()
}

/// One UI event.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Step {
    Start,
    /// Commit; without `input` the editor rejects.
    Commit {
        input: Option<String>,
    },
    Cancel,
    Scroll {
        to: f64,
    },
    Select,
    Deselect,
    Disable,
    Enable,
    /// Record the cell as last hovered
    Hover,
    /// The renderer drops the visual cell mid-session
    Detach,
}

impl Step {
    pub fn name(&self) -> &'static str {
        match self {
            Step::Start => "start",
            Step::Commit { .. } => "commit",
            Step::Cancel => "cancel",
            Step::Scroll { .. } => "scroll",
            Step::Select => "select",
            Step::Deselect => "deselect",
            Step::Disable => "disable",
            Step::Enable => "enable",
            Step::Hover => "hover",
            Step::Detach => "detach",
        }
    }
}

/// Expected final state. Omitted fields are not checked.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Expect {
    pub editing: Option<bool>,
    pub value: Option<String>,
    /// Rendered index of the container holding the visual cell
    pub container: Option<usize>,
    pub translate_y: Option<f64>,
}

impl Scenario {
    pub fn from_toml_str(source: &str) -> Result<Self, ScenarioError> {
        let scenario: Scenario = toml::from_str(source)?;
        scenario.validate()?;
        Ok(scenario)
    }

    pub fn load(path: &Path) -> Result<Self, ScenarioError> {
        let source = std::fs::read_to_string(path).map_err(|source| ScenarioError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    fn validate(&self) -> Result<(), ScenarioError> {
        if self.grid.rendered_rows == 0 {
            return Err(ScenarioError::Invalid("grid.rendered_rows must be at least 1".into()));
        }
        if self.grid.fixed_rows > self.grid.rendered_rows {
            return Err(ScenarioError::Invalid(format!(
                "grid.fixed_rows ({}) exceeds grid.rendered_rows ({})",
                self.grid.fixed_rows, self.grid.rendered_rows
            )));
        }
        if self.cell.row >= self.grid.rendered_rows {
            return Err(ScenarioError::Invalid(format!(
                "cell.row {} is not rendered (rendered_rows = {})",
                self.cell.row, self.grid.rendered_rows
            )));
        }
        if self.cell.row_span == 0 {
            return Err(ScenarioError::Invalid("cell.row_span must be at least 1".into()));
        }
        if !(self.grid.row_height.is_finite() && self.grid.row_height > 0.0) {
            return Err(ScenarioError::Invalid("grid.row_height must be positive".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
[grid]
rendered_rows = 5

[cell]
row = 1
"#;

    #[test]
    fn test_defaults() {
        let scenario = Scenario::from_toml_str(MINIMAL).unwrap();
        assert_eq!(scenario.grid.fixed_rows, 0);
        assert_eq!(scenario.grid.row_height, 24.0);
        assert_eq!(scenario.cell.row_span, 1);
        assert_eq!(scenario.cell.editor, "text");
        assert!(scenario.steps.is_empty());
        assert!(scenario.expect.is_none());
    }

    #[test]
    fn test_steps_parse() {
        let source = format!(
            "{}\n{}",
            MINIMAL,
            r#"
[[step]]
action = "start"

[[step]]
action = "commit"

[[step]]
action = "commit"
input = "ok"

[[step]]
action = "scroll"
to = 48.0
"#
        );
        let scenario = Scenario::from_toml_str(&source).unwrap();
        assert_eq!(
            scenario.steps,
            vec![
                Step::Start,
                Step::Commit { input: None },
                Step::Commit { input: Some("ok".to_string()) },
                Step::Scroll { to: 48.0 },
            ]
        );
    }

    #[test]
    fn test_unknown_action_rejected() {
        let source = format!("{}\n[[step]]\naction = \"explode\"\n", MINIMAL);
        assert!(matches!(
            Scenario::from_toml_str(&source),
            Err(ScenarioError::Parse(_))
        ));
    }

    #[test]
    fn test_unrendered_anchor_rejected() {
        let source = "[grid]\nrendered_rows = 3\n\n[cell]\nrow = 3\n";
        assert!(matches!(
            Scenario::from_toml_str(source),
            Err(ScenarioError::Invalid(_))
        ));
    }

    #[test]
    fn test_too_many_fixed_rows_rejected() {
        let source = "[grid]\nrendered_rows = 2\nfixed_rows = 3\n\n[cell]\nrow = 0\n";
        assert!(matches!(
            Scenario::from_toml_str(source),
            Err(ScenarioError::Invalid(_))
        ));
    }
}
