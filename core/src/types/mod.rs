//! Plain data types shared across the planner.

pub mod config;
pub mod state;
