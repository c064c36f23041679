//! File-backed inputs: the starting fleet state and planner settings.

pub mod settings;
pub mod statefile;

pub use settings::SettingsError;
pub use statefile::StateFileError;
