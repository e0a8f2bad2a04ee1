//! Read-side aggregate types for dashboards.

pub mod types;

pub use types::DeactivationStats;
