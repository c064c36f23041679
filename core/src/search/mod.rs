//! Domain-agnostic best-first search.
//!
//! `frontier` is a min-priority queue with lazy deletion; `astar` runs A* (or
//! uniform-cost search) over any type implementing `SearchSpace`.

pub mod astar;
pub mod frontier;

pub use astar::{astar, uniform_cost, SearchOutcome, SearchSpace};
pub use frontier::{Entry, Frontier};
