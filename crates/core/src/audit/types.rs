//! Audit entry types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use offboard_shared::types::{ActorId, AuditEntryId, Subject, SubjectKind};

/// Action tag for an audit entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    /// A deactivation request was created.
    DeactivationRequested,
    /// An Admin-II took a request under review.
    DeactivationReviewed,
    /// An Admin-I approved a request and triggered OTP issuance.
    DeactivationApproved,
    /// An admin rejected a request.
    DeactivationRejected,
    /// A driver account was deactivated.
    DriverDeactivated,
    /// A company account was deactivated.
    CompanyDeactivated,
    /// An OTP challenge was issued outside the approval chain.
    OtpChallengeSent,
    /// An OTP challenge verification was attempted.
    OtpChallengeVerified,
}

impl AuditAction {
    /// Returns the deactivation action for a subject kind.
    #[must_use]
    pub const fn deactivated(kind: SubjectKind) -> Self {
        match kind {
            SubjectKind::Driver => Self::DriverDeactivated,
            SubjectKind::Company => Self::CompanyDeactivated,
        }
    }

    /// Returns the string representation of the action.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::DeactivationRequested => "deactivation_requested",
            Self::DeactivationReviewed => "deactivation_reviewed",
            Self::DeactivationApproved => "deactivation_approved",
            Self::DeactivationRejected => "deactivation_rejected",
            Self::DriverDeactivated => "driver_deactivated",
            Self::CompanyDeactivated => "company_deactivated",
            Self::OtpChallengeSent => "otp_challenge_sent",
            Self::OtpChallengeVerified => "otp_challenge_verified",
        }
    }

    /// Parses an action from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "deactivation_requested" => Some(Self::DeactivationRequested),
            "deactivation_reviewed" => Some(Self::DeactivationReviewed),
            "deactivation_approved" => Some(Self::DeactivationApproved),
            "deactivation_rejected" => Some(Self::DeactivationRejected),
            "driver_deactivated" => Some(Self::DriverDeactivated),
            "company_deactivated" => Some(Self::CompanyDeactivated),
            "otp_challenge_sent" => Some(Self::OtpChallengeSent),
            "otp_challenge_verified" => Some(Self::OtpChallengeVerified),
            _ => None,
        }
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Whether the audited attempt succeeded.
///
/// Denied attempts are first-class entries so repeated unauthorized or
/// invalid attempts stay visible for security review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditOutcome {
    /// The attempted transition committed.
    Success,
    /// The attempt was refused; metadata carries the error code.
    Denied,
}

impl AuditOutcome {
    /// Returns the string representation of the outcome.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Denied => "denied",
        }
    }
}

/// Who performed the audited action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "actor_type", content = "actor_id", rename_all = "lowercase")]
pub enum AuditActor {
    /// An administrative actor.
    Admin(ActorId),
    /// The system itself (lapses, anomaly-triggered challenges).
    System,
}

impl AuditActor {
    /// Returns the admin's ID when the actor is an admin.
    #[must_use]
    pub const fn actor_id(&self) -> Option<ActorId> {
        match self {
            Self::Admin(id) => Some(*id),
            Self::System => None,
        }
    }
}

/// An immutable record of a workflow transition or authorization
/// decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEntry {
    /// Unique identifier for the entry.
    pub id: AuditEntryId,
    /// Who performed the action.
    #[serde(flatten)]
    pub actor: AuditActor,
    /// The account the action concerned.
    #[serde(flatten)]
    pub subject: Subject,
    /// What happened.
    pub action: AuditAction,
    /// Whether the attempt succeeded.
    pub outcome: AuditOutcome,
    /// Structured key/value context. Never contains OTP codes.
    pub metadata: serde_json::Value,
    /// When the entry was recorded.
    pub created_at: DateTime<Utc>,
}

impl AuditEntry {
    /// Creates a success entry.
    #[must_use]
    pub fn success(
        actor: AuditActor,
        subject: Subject,
        action: AuditAction,
        metadata: serde_json::Value,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: AuditEntryId::new(),
            actor,
            subject,
            action,
            outcome: AuditOutcome::Success,
            metadata,
            created_at: now,
        }
    }

    /// Creates a denied-attempt entry.
    #[must_use]
    pub fn denied(
        actor: AuditActor,
        subject: Subject,
        action: AuditAction,
        metadata: serde_json::Value,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: AuditEntryId::new(),
            actor,
            subject,
            action,
            outcome: AuditOutcome::Denied,
            metadata,
            created_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use offboard_shared::types::{CompanyId, DriverId};
    use serde_json::json;

    #[test]
    fn test_action_round_trip() {
        for action in [
            AuditAction::DeactivationRequested,
            AuditAction::DeactivationReviewed,
            AuditAction::DeactivationApproved,
            AuditAction::DeactivationRejected,
            AuditAction::DriverDeactivated,
            AuditAction::CompanyDeactivated,
            AuditAction::OtpChallengeSent,
            AuditAction::OtpChallengeVerified,
        ] {
            assert_eq!(AuditAction::parse(action.as_str()), Some(action));
        }
    }

    #[test]
    fn test_deactivated_dispatches_on_kind() {
        assert_eq!(
            AuditAction::deactivated(SubjectKind::Driver),
            AuditAction::DriverDeactivated
        );
        assert_eq!(
            AuditAction::deactivated(SubjectKind::Company),
            AuditAction::CompanyDeactivated
        );
    }

    #[test]
    fn test_success_and_denied_constructors() {
        let actor = AuditActor::Admin(ActorId::new());
        let subject = Subject::Driver(DriverId::new());
        let now = Utc::now();

        let ok = AuditEntry::success(
            actor,
            subject,
            AuditAction::DeactivationRequested,
            json!({"reason": "fraud"}),
            now,
        );
        assert_eq!(ok.outcome, AuditOutcome::Success);
        assert_eq!(ok.created_at, now);

        let denied = AuditEntry::denied(
            actor,
            subject,
            AuditAction::DeactivationReviewed,
            json!({"error": "INSUFFICIENT_ROLE"}),
            now,
        );
        assert_eq!(denied.outcome, AuditOutcome::Denied);
    }

    #[test]
    fn test_system_actor_serializes_with_type_tag() {
        let entry = AuditEntry::success(
            AuditActor::System,
            Subject::Company(CompanyId::new()),
            AuditAction::OtpChallengeSent,
            json!({"reason": "anomaly"}),
            Utc::now(),
        );
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["actor_type"], "system");
        assert_eq!(value["subject_type"], "company");
        assert_eq!(value["action"], "otp_challenge_sent");
    }
}
