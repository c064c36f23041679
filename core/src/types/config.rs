use serde::{Deserialize, Serialize};

/// Which best-first variant the planner runs.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SearchAlgorithm {
    /// Priority is accumulated cost plus the admissible estimate.
    #[default]
    AStar,
    /// Priority is accumulated cost only. Kept as a correctness baseline.
    UniformCost,
}

/// Planner settings as read from a YAML settings file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlannerSettings {
    #[serde(default = "default_target_revision")]
    pub target_revision: u32,
    #[serde(default = "default_state_file")]
    pub state_file: String,
    #[serde(default)]
    pub algorithm: SearchAlgorithm,
    /// `tracing_subscriber::EnvFilter` directive used when `RUST_LOG` is unset.
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

impl Default for PlannerSettings {
    fn default() -> Self {
        PlannerSettings {
            target_revision: default_target_revision(),
            state_file: default_state_file(),
            algorithm: SearchAlgorithm::default(),
            log_filter: default_log_filter(),
        }
    }
}

fn default_target_revision() -> u32 {
    2
}

fn default_state_file() -> String {
    "startingState.yaml".into()
}

fn default_log_filter() -> String {
    "info".into()
}
