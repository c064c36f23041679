//! Fleet Planner core: computes safe rollout plans for clustered service nodes.
//!
//! The crate is split into a domain-agnostic search layer and the maintenance
//! domain that drives it:
//!
//! | Module | Role |
//! |--------|------|
//! | `search` | Priority frontier and best-first (A* / uniform-cost) search |
//! | `types` | Plain data: node/fleet state and planner settings |
//! | `maintenance` | Step classifier, cluster safety gate, actions, heuristic |
//! | `convergence` | `MaintenancePlanner`, wires the domain into the search |
//! | `data` | State-file and settings-file loading |
//!
//! The planner itself never touches the filesystem; `data` produces a `State`
//! and the planner returns an ordered list of actions.

pub mod convergence;
pub mod data;
pub mod maintenance;
pub mod search;
pub mod types;

pub use convergence::planner::{MaintenancePlanner, Plan, PlanReport};
pub use maintenance::action::{Action, ActionKind};
pub use types::config::{PlannerSettings, SearchAlgorithm};
pub use types::state::{NodeState, State};
