//! Deactivation request domain types.
//!
//! This module defines the core types used for managing deactivation
//! request status transitions through the two-admin approval chain.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use offboard_shared::types::{ActorId, RequestId, Subject};

/// Status of a deactivation request in the approval workflow.
///
/// Requests progress through these states from creation to confirmation.
/// The valid transitions are:
/// - Pending → UnderReview (Admin-II review)
/// - UnderReview → Approved (Admin-I approve)
/// - Approved → Confirmed (OTP verified)
/// - Pending | UnderReview | Approved → Rejected (reject)
/// - Approved → Expired (OTP window elapsed unconsumed)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    /// Request has been created and awaits first-line review.
    Pending,
    /// Request has been reviewed by an Admin-II.
    UnderReview,
    /// Request has been approved by an Admin-I; an OTP is outstanding.
    Approved,
    /// OTP verified and the subject deactivated (terminal).
    Confirmed,
    /// Request was rejected before confirmation (terminal).
    Rejected,
    /// The OTP window elapsed unconsumed (terminal).
    Expired,
}

impl RequestStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::UnderReview => "under_review",
            Self::Approved => "approved",
            Self::Confirmed => "confirmed",
            Self::Rejected => "rejected",
            Self::Expired => "expired",
        }
    }

    /// Parses a status from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Some(Self::Pending),
            "under_review" => Some(Self::UnderReview),
            "approved" => Some(Self::Approved),
            "confirmed" => Some(Self::Confirmed),
            "rejected" => Some(Self::Rejected),
            "expired" => Some(Self::Expired),
            _ => None,
        }
    }

    /// Returns true if the request is still in flight.
    ///
    /// At most one open request may exist per subject.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        matches!(self, Self::Pending | Self::UnderReview | Self::Approved)
    }

    /// Returns true if the request has reached a terminal state.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Confirmed | Self::Rejected | Self::Expired)
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One entry in a request's transition log.
///
/// The log keeps the full stage history in order instead of overwriting a
/// single annotation field at each transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageRecord {
    /// The status entered at this stage.
    pub status: RequestStatus,
    /// The actor who caused the transition, if any (None for lapses).
    pub actor: Option<ActorId>,
    /// Optional annotation for this stage (e.g. a rejection reason).
    pub note: Option<String>,
    /// When the stage was entered.
    pub at: DateTime<Utc>,
}

/// A request to deactivate a marketplace account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeactivationRequest {
    /// Unique identifier for the request.
    pub id: RequestId,
    /// The account targeted for deactivation.
    #[serde(flatten)]
    pub subject: Subject,
    /// Why the deactivation was requested.
    pub reason: String,
    /// Current workflow status.
    pub status: RequestStatus,
    /// The Admin-II who created the request.
    pub requested_by: ActorId,
    /// The Admin-II who reviewed the request (set exactly once).
    pub reviewed_by: Option<ActorId>,
    /// The Admin-I who approved the request (set exactly once).
    pub approved_by: Option<ActorId>,
    /// Ordered transition log, one record per stage entered.
    pub stages: Vec<StageRecord>,
    /// When the request was created.
    pub created_at: DateTime<Utc>,
    /// When the request was approved.
    pub approved_at: Option<DateTime<Utc>>,
    /// When the OTP confirmation completed.
    pub confirmed_at: Option<DateTime<Utc>>,
}

impl DeactivationRequest {
    /// Creates a new pending request.
    #[must_use]
    pub fn new(subject: Subject, reason: String, requested_by: ActorId, now: DateTime<Utc>) -> Self {
        Self {
            id: RequestId::new(),
            subject,
            reason,
            status: RequestStatus::Pending,
            requested_by,
            reviewed_by: None,
            approved_by: None,
            stages: vec![StageRecord {
                status: RequestStatus::Pending,
                actor: Some(requested_by),
                note: None,
                at: now,
            }],
            created_at: now,
            approved_at: None,
            confirmed_at: None,
        }
    }

    /// Applies a validated transition to this request, stamping the
    /// corresponding actor/timestamp fields and appending to the
    /// transition log.
    pub fn apply(&mut self, action: &RequestAction) {
        match action {
            RequestAction::Review {
                new_status,
                reviewed_by,
                reviewed_at,
            } => {
                self.status = *new_status;
                self.reviewed_by = Some(*reviewed_by);
                self.push_stage(*new_status, Some(*reviewed_by), None, *reviewed_at);
            }
            RequestAction::Approve {
                new_status,
                approved_by,
                approved_at,
            } => {
                self.status = *new_status;
                self.approved_by = Some(*approved_by);
                self.approved_at = Some(*approved_at);
                self.push_stage(*new_status, Some(*approved_by), None, *approved_at);
            }
            RequestAction::Confirm {
                new_status,
                confirmed_at,
            } => {
                self.status = *new_status;
                self.confirmed_at = Some(*confirmed_at);
                self.push_stage(*new_status, None, None, *confirmed_at);
            }
            RequestAction::Reject {
                new_status,
                rejected_by,
                rejected_at,
                reason,
            } => {
                self.status = *new_status;
                self.push_stage(
                    *new_status,
                    Some(*rejected_by),
                    Some(reason.clone()),
                    *rejected_at,
                );
            }
            RequestAction::Expire {
                new_status,
                expired_at,
            } => {
                self.status = *new_status;
                self.push_stage(*new_status, None, None, *expired_at);
            }
        }
    }

    fn push_stage(
        &mut self,
        status: RequestStatus,
        actor: Option<ActorId>,
        note: Option<String>,
        at: DateTime<Utc>,
    ) {
        self.stages.push(StageRecord {
            status,
            actor,
            note,
            at,
        });
    }
}

/// Workflow action representing a validated state transition.
///
/// Each variant captures the action performed, the resulting status, and
/// the audit trail information (who, when, why).
#[derive(Debug, Clone)]
pub enum RequestAction {
    /// An Admin-II takes the request under review.
    Review {
        /// The new status after review.
        new_status: RequestStatus,
        /// The Admin-II who reviewed the request.
        reviewed_by: ActorId,
        /// When the request was reviewed.
        reviewed_at: DateTime<Utc>,
    },
    /// An Admin-I approves the reviewed request.
    Approve {
        /// The new status after approval.
        new_status: RequestStatus,
        /// The Admin-I who approved the request.
        approved_by: ActorId,
        /// When the request was approved.
        approved_at: DateTime<Utc>,
    },
    /// OTP confirmation completes the request.
    Confirm {
        /// The new status after confirmation.
        new_status: RequestStatus,
        /// When the confirmation completed.
        confirmed_at: DateTime<Utc>,
    },
    /// An admin rejects the request before confirmation.
    Reject {
        /// The new status after rejection.
        new_status: RequestStatus,
        /// The admin who rejected the request.
        rejected_by: ActorId,
        /// When the request was rejected.
        rejected_at: DateTime<Utc>,
        /// The reason for rejection.
        reason: String,
    },
    /// The OTP window elapsed without a successful confirmation.
    Expire {
        /// The new status after expiry.
        new_status: RequestStatus,
        /// When the lapse was observed.
        expired_at: DateTime<Utc>,
    },
}

impl RequestAction {
    /// Returns the new status resulting from this action.
    #[must_use]
    pub const fn new_status(&self) -> RequestStatus {
        match self {
            Self::Review { new_status, .. }
            | Self::Approve { new_status, .. }
            | Self::Confirm { new_status, .. }
            | Self::Reject { new_status, .. }
            | Self::Expire { new_status, .. } => *new_status,
        }
    }
}
