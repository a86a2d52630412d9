use serde::{Deserialize, Serialize};

use crate::errors::ProbeError;
use crate::executor::keys::KeyInput;
use crate::perception::types::LogicalPoint;

fn default_drag_steps() -> u32 {
    100
}

/// One input action, in canvas coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Step {
    Tap { at: LogicalPoint },
    Drag {
        from: LogicalPoint,
        to: LogicalPoint,
        #[serde(default = "default_drag_steps")]
        steps: u32,
    },
    Key { key: KeyInput },
    Pause { ms: u64 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    #[serde(default)]
    pub steps: Vec<Step>,
    /// Full trace expected once the steps' output has settled, startup output included.
    pub expected_trace: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScenarioReport {
    pub name: String,
    pub passed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub trace: Vec<String>,
    pub started_at: chrono::DateTime<chrono::Utc>,
    pub finished_at: chrono::DateTime<chrono::Utc>,
}

impl ScenarioReport {
    pub fn new(
        name: &str,
        outcome: Result<(), &ProbeError>,
        trace: Vec<String>,
        started_at: chrono::DateTime<chrono::Utc>,
    ) -> Self {
        Self {
            name: name.to_string(),
            passed: outcome.is_ok(),
            error: outcome.err().map(ToString::to_string),
            trace,
            started_at,
            finished_at: chrono::Utc::now(),
        }
    }
}
