//! Convergence: plans the actions that carry a fleet to a target revision.
//!
//! The `planner` module searches the maintenance state space for the shortest
//! safe action sequence. It never executes anything itself.

pub mod planner;
