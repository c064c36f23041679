//! State files: YAML lists of node records.
//!
//! ```yaml
//! - name: app1-1
//!   cluster: 1
//!   software_revision: 1
//!   app_running: true
//!   in_loadbalancer_pool: true
//!   cache_warmed: true
//! ```
//!
//! Files written by the legacy tool use flat lower-case keys
//! (`softwarerevision`, `inloadbalancerpool`, ...) and load unchanged.
//!
//! The planner does not validate its input. `parse` and `load` do: a fleet
//! must be non-empty and node names must be unique.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use crate::types::state::{NodeState, State};

#[derive(Debug, Error)]
pub enum StateFileError {
    #[error("cannot access '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid state file: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("state file lists no nodes")]
    Empty,
    #[error("duplicate node name: {0}")]
    DuplicateNode(String),
}

/// Load and validate a state file.
pub fn load(path: &Path) -> Result<State, StateFileError> {
    let content = std::fs::read_to_string(path).map_err(|source| StateFileError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let state = parse(&content)?;
    debug!(path = %path.display(), nodes = state.len(), "loaded state file");
    Ok(state)
}

/// Parse and validate a state from a YAML string.
pub fn parse(content: &str) -> Result<State, StateFileError> {
    let state: State = serde_yaml::from_str(content)?;
    validate(&state)?;
    Ok(state)
}

/// Write `state` to `path`, replacing any existing file.
pub fn save(path: &Path, state: &State) -> Result<(), StateFileError> {
    let content = to_yaml(state)?;
    std::fs::write(path, content).map_err(|source| StateFileError::Io {
        path: path.to_path_buf(),
        source,
    })
}

pub fn to_yaml(state: &State) -> Result<String, StateFileError> {
    Ok(serde_yaml::to_string(state)?)
}

/// Reject empty fleets and duplicate node names.
pub fn validate(state: &State) -> Result<(), StateFileError> {
    if state.is_empty() {
        return Err(StateFileError::Empty);
    }
    let mut seen = HashSet::new();
    for node in state.nodes() {
        if !seen.insert(node.name.as_str()) {
            return Err(StateFileError::DuplicateNode(node.name.clone()));
        }
    }
    Ok(())
}

/// A nine-node, two-cluster fleet with cluster 1 caught mid-rollout to
/// revision 2: one node at every lifecycle step.
pub fn example_state() -> State {
    fn node(name: &str, cluster: u32, revision: u32, running: bool, pooled: bool, warm: bool) -> NodeState {
        NodeState {
            name: name.into(),
            cluster,
            software_revision: revision,
            app_running: running,
            in_loadbalancer_pool: pooled,
            cache_warmed: warm,
        }
    }

    State::new(vec![
        node("app1-1", 1, 1, true, true, true),
        node("app1-2", 1, 1, true, false, true),
        node("app1-3", 1, 1, false, false, false),
        node("app1-4", 1, 2, false, false, false),
        node("app1-5", 1, 2, true, false, false),
        node("app1-6", 1, 2, true, false, true),
        node("app1-7", 1, 2, true, true, true),
        node("app2-1", 2, 1, true, true, true),
        node("app2-2", 2, 1, true, true, true),
    ])
}
