//! Deactivation request repository.
//!
//! Transitions commit via compare-and-swap on the expected status: the
//! caller validates against a snapshot, and the commit fails with
//! `ConcurrencyConflict` if another caller won the race in between.

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use offboard_core::deactivation::{
    DeactivationError, DeactivationRequest, RequestAction, RequestStatus,
};
use offboard_shared::types::{RequestId, Subject};

/// In-memory store of deactivation requests.
///
/// A secondary index tracks the single open request per subject; the
/// index entry lock makes the uniqueness check and the insert atomic.
#[derive(Debug, Default)]
pub struct RequestRepository {
    requests: DashMap<RequestId, DeactivationRequest>,
    open_index: DashMap<Subject, RequestId>,
}

impl RequestRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a new pending request, enforcing at most one open request
    /// per subject.
    ///
    /// # Errors
    ///
    /// Returns `OpenRequestExists` if the subject already has a request
    /// in an open status.
    pub fn insert(
        &self,
        request: DeactivationRequest,
    ) -> Result<DeactivationRequest, DeactivationError> {
        match self.open_index.entry(request.subject) {
            Entry::Occupied(mut slot) => {
                let still_open = self
                    .requests
                    .get(slot.get())
                    .is_some_and(|existing| existing.status.is_open());
                if still_open {
                    return Err(DeactivationError::OpenRequestExists {
                        subject: request.subject,
                    });
                }
                // Stale index entry (terminal request); replace it. The
                // request map insert happens under the index entry lock
                // so concurrent creators serialize here.
                self.requests.insert(request.id, request.clone());
                slot.insert(request.id);
            }
            Entry::Vacant(slot) => {
                self.requests.insert(request.id, request.clone());
                slot.insert(request.id);
            }
        }
        Ok(request)
    }

    /// Returns a snapshot of a request.
    ///
    /// # Errors
    ///
    /// Returns `RequestNotFound` if no request has the given ID.
    pub fn get(&self, id: RequestId) -> Result<DeactivationRequest, DeactivationError> {
        self.requests
            .get(&id)
            .map(|r| r.clone())
            .ok_or(DeactivationError::RequestNotFound(id))
    }

    /// Commits a validated transition if the request is still in the
    /// expected status.
    ///
    /// # Errors
    ///
    /// * `RequestNotFound` if no request has the given ID
    /// * `ConcurrencyConflict` if a concurrent transition changed the
    ///   status since the caller's snapshot
    pub fn apply_transition(
        &self,
        id: RequestId,
        expected: RequestStatus,
        action: &RequestAction,
    ) -> Result<DeactivationRequest, DeactivationError> {
        let updated = {
            let mut entry = self
                .requests
                .get_mut(&id)
                .ok_or(DeactivationError::RequestNotFound(id))?;
            if entry.status != expected {
                return Err(DeactivationError::ConcurrencyConflict { request_id: id });
            }
            entry.apply(action);
            entry.clone()
        };
        if updated.status.is_terminal() {
            self.open_index
                .remove_if(&updated.subject, |_, open_id| *open_id == id);
        }
        Ok(updated)
    }

    /// Returns the subject's open request if it is currently approved.
    #[must_use]
    pub fn approved_for(&self, subject: Subject) -> Option<DeactivationRequest> {
        let id = self.open_index.get(&subject).map(|open_id| *open_id)?;
        let request = self.requests.get(&id)?.clone();
        (request.status == RequestStatus::Approved).then_some(request)
    }

    /// Returns a snapshot of every request.
    #[must_use]
    pub fn snapshot(&self) -> Vec<DeactivationRequest> {
        self.requests.iter().map(|r| r.clone()).collect()
    }
}
