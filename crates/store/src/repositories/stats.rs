//! Read-side stats projection.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};

use offboard_core::deactivation::RequestStatus;
use offboard_core::stats::DeactivationStats;

use crate::repositories::entity::EntityRepository;
use crate::repositories::request::RequestRepository;

/// Computes dashboard rollups over requests and entities.
///
/// Purely a projection over repository snapshots; never mutates state.
#[derive(Debug)]
pub struct StatsRepository {
    requests: Arc<RequestRepository>,
    entities: Arc<EntityRepository>,
}

impl StatsRepository {
    /// Creates a projection over the given repositories.
    #[must_use]
    pub fn new(requests: Arc<RequestRepository>, entities: Arc<EntityRepository>) -> Self {
        Self { requests, entities }
    }

    /// Computes the aggregate counts.
    ///
    /// `on_day` scopes the approved-request count; it defaults to the
    /// current UTC day.
    #[must_use]
    pub fn compute(&self, on_day: Option<NaiveDate>) -> DeactivationStats {
        let day = on_day.unwrap_or_else(|| Utc::now().date_naive());

        let mut stats = DeactivationStats::default();
        for request in self.requests.snapshot() {
            match request.status {
                RequestStatus::Pending => stats.pending_requests += 1,
                RequestStatus::Approved => {
                    if request
                        .approved_at
                        .is_some_and(|at| at.date_naive() == day)
                    {
                        stats.approved_today += 1;
                    }
                }
                _ => {}
            }
        }
        stats.deactivated_drivers = self.entities.inactive_drivers();
        stats.deactivated_companies = self.entities.inactive_companies();
        stats
    }
}
