//! Append-only audit log.

use std::sync::{PoisonError, RwLock};

use offboard_core::audit::AuditEntry;
use offboard_shared::types::Subject;

/// Append-only, in-process audit sink.
///
/// Writes complete synchronously before the triggering workflow call
/// returns. Entries are never updated or deleted, and denied attempts
/// are recorded even when the state transition itself failed, so the
/// trail is a superset of committed transitions.
#[derive(Debug, Default)]
pub struct AuditLog {
    entries: RwLock<Vec<AuditEntry>>,
}

impl AuditLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an entry.
    pub fn record(&self, entry: AuditEntry) {
        tracing::debug!(
            action = entry.action.as_str(),
            outcome = entry.outcome.as_str(),
            subject = %entry.subject,
            "audit entry recorded"
        );
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(entry);
    }

    /// Returns a snapshot of all entries in recording order.
    #[must_use]
    pub fn snapshot(&self) -> Vec<AuditEntry> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns all entries concerning a subject, in recording order.
    #[must_use]
    pub fn for_subject(&self, subject: Subject) -> Vec<AuditEntry> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|entry| entry.subject == subject)
            .cloned()
            .collect()
    }

    /// Number of recorded entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns true if nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use offboard_core::audit::{AuditAction, AuditActor, AuditOutcome};
    use offboard_shared::types::{ActorId, CompanyId, DriverId};
    use serde_json::json;

    #[test]
    fn test_entries_keep_recording_order() {
        let log = AuditLog::new();
        let subject = Subject::Driver(DriverId::new());
        let actor = AuditActor::Admin(ActorId::new());

        log.record(AuditEntry::success(
            actor,
            subject,
            AuditAction::DeactivationRequested,
            json!({}),
            Utc::now(),
        ));
        log.record(AuditEntry::denied(
            actor,
            subject,
            AuditAction::DeactivationReviewed,
            json!({"error": "INSUFFICIENT_ROLE"}),
            Utc::now(),
        ));

        let entries = log.snapshot();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].action, AuditAction::DeactivationRequested);
        assert_eq!(entries[1].outcome, AuditOutcome::Denied);
    }

    #[test]
    fn test_for_subject_filters() {
        let log = AuditLog::new();
        let driver = Subject::Driver(DriverId::new());
        let company = Subject::Company(CompanyId::new());
        let actor = AuditActor::System;

        log.record(AuditEntry::success(
            actor,
            driver,
            AuditAction::OtpChallengeSent,
            json!({}),
            Utc::now(),
        ));
        log.record(AuditEntry::success(
            actor,
            company,
            AuditAction::OtpChallengeSent,
            json!({}),
            Utc::now(),
        ));

        assert_eq!(log.for_subject(driver).len(), 1);
        assert_eq!(log.for_subject(company).len(), 1);
        assert_eq!(log.len(), 2);
    }
}
