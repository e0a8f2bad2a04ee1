//! Deactivation dashboard data types.

use serde::{Deserialize, Serialize};

/// Aggregate counts over requests and entities.
///
/// Purely a read-side projection; computing it never mutates state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeactivationStats {
    /// Requests currently awaiting first-line review.
    pub pending_requests: u64,
    /// Requests approved within the queried day.
    pub approved_today: u64,
    /// Driver accounts currently inactive.
    pub deactivated_drivers: u64,
    /// Company accounts currently inactive.
    pub deactivated_companies: u64,
}
