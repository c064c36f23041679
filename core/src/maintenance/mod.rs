//! Maintenance domain model.
//!
//! A node moves through seven lifecycle steps on its way to a new revision
//! (see `step`). The `gate` keeps at most one cluster degraded at a time, and
//! each `ActionKind` generates the legal one-node transitions for its step.
//! `heuristic` supplies the admissible remaining-cost estimate and goal test.

pub mod action;
pub mod gate;
pub mod heuristic;
pub mod step;

pub use action::{Action, ActionKind, Transition};
pub use gate::downable_cluster;
pub use heuristic::{is_goal, node_estimate, state_estimate, EDGE_COST};
pub use step::{cluster_floors, lowest_step_for_cluster, step_for_node, Step};
