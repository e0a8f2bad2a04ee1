//! Deactivation workflow state transition logic.
//!
//! This module implements the core state machine rules for moving a
//! deactivation request through the two-admin approval chain. It is
//! purely about validation: given a current status and an acting admin,
//! each method either returns the [`RequestAction`] describing the
//! transition or the error explaining why it is not allowed. Committing
//! the action against shared state is the caller's concern.

use chrono::Utc;

use offboard_shared::types::{Actor, AdminRole, Subject};

use crate::deactivation::error::DeactivationError;
use crate::deactivation::types::{RequestAction, RequestStatus};

/// Stateless service for deactivation workflow transitions.
pub struct DeactivationService;

impl DeactivationService {
    /// Validates the preconditions for creating a deactivation request.
    ///
    /// # Errors
    /// * `Validation` if the reason is empty
    /// * `SubjectInactive` if the subject is not currently active
    pub fn request(
        subject: Subject,
        subject_active: bool,
        reason: &str,
    ) -> Result<(), DeactivationError> {
        if reason.trim().is_empty() {
            return Err(DeactivationError::Validation(
                "a deactivation reason is required".to_string(),
            ));
        }
        if !subject_active {
            return Err(DeactivationError::SubjectInactive { subject });
        }
        Ok(())
    }

    /// Takes a pending request under review.
    ///
    /// # Errors
    /// * `InvalidTransition` if the request is not pending
    /// * `RoleAuthorization` if the reviewer does not hold Admin-II
    pub fn review(
        current_status: RequestStatus,
        reviewer: &Actor,
    ) -> Result<RequestAction, DeactivationError> {
        match current_status {
            RequestStatus::Pending => {
                if !reviewer.has_role(AdminRole::AdminTwo) {
                    return Err(DeactivationError::RoleAuthorization {
                        actor_id: reviewer.id,
                        required: AdminRole::AdminTwo,
                    });
                }
                Ok(RequestAction::Review {
                    new_status: RequestStatus::UnderReview,
                    reviewed_by: reviewer.id,
                    reviewed_at: Utc::now(),
                })
            }
            _ => Err(DeactivationError::InvalidTransition {
                from: current_status,
                to: RequestStatus::UnderReview,
            }),
        }
    }

    /// Approves a reviewed request.
    ///
    /// # Errors
    /// * `InvalidTransition` if the request is not under review
    /// * `RoleAuthorization` if the approver does not hold Admin-I
    pub fn approve(
        current_status: RequestStatus,
        approver: &Actor,
    ) -> Result<RequestAction, DeactivationError> {
        match current_status {
            RequestStatus::UnderReview => {
                if !approver.has_role(AdminRole::AdminOne) {
                    return Err(DeactivationError::RoleAuthorization {
                        actor_id: approver.id,
                        required: AdminRole::AdminOne,
                    });
                }
                Ok(RequestAction::Approve {
                    new_status: RequestStatus::Approved,
                    approved_by: approver.id,
                    approved_at: Utc::now(),
                })
            }
            _ => Err(DeactivationError::InvalidTransition {
                from: current_status,
                to: RequestStatus::Approved,
            }),
        }
    }

    /// Confirms an approved request after successful OTP verification.
    ///
    /// # Errors
    /// * `InvalidTransition` if the request is not approved
    pub fn confirm(current_status: RequestStatus) -> Result<RequestAction, DeactivationError> {
        match current_status {
            RequestStatus::Approved => Ok(RequestAction::Confirm {
                new_status: RequestStatus::Confirmed,
                confirmed_at: Utc::now(),
            }),
            _ => Err(DeactivationError::InvalidTransition {
                from: current_status,
                to: RequestStatus::Confirmed,
            }),
        }
    }

    /// Rejects an open request.
    ///
    /// Either admin level may reject; the reported requirement is the
    /// lower bar (Admin-II).
    ///
    /// # Errors
    /// * `Validation` if the reason is empty
    /// * `InvalidTransition` if the request has already terminated
    /// * `RoleAuthorization` if the actor holds no admin role
    pub fn reject(
        current_status: RequestStatus,
        rejected_by: &Actor,
        reason: String,
    ) -> Result<RequestAction, DeactivationError> {
        if reason.trim().is_empty() {
            return Err(DeactivationError::Validation(
                "a rejection reason is required".to_string(),
            ));
        }
        if !current_status.is_open() {
            return Err(DeactivationError::InvalidTransition {
                from: current_status,
                to: RequestStatus::Rejected,
            });
        }
        if !rejected_by.has_role(AdminRole::AdminTwo) && !rejected_by.has_role(AdminRole::AdminOne)
        {
            return Err(DeactivationError::RoleAuthorization {
                actor_id: rejected_by.id,
                required: AdminRole::AdminTwo,
            });
        }
        Ok(RequestAction::Reject {
            new_status: RequestStatus::Rejected,
            rejected_by: rejected_by.id,
            rejected_at: Utc::now(),
            reason,
        })
    }

    /// Expires an approved request whose OTP window lapsed unconsumed.
    ///
    /// Expiry is evaluated lazily at verification time; there is no
    /// background sweep.
    ///
    /// # Errors
    /// * `InvalidTransition` if the request is not approved
    pub fn expire(current_status: RequestStatus) -> Result<RequestAction, DeactivationError> {
        match current_status {
            RequestStatus::Approved => Ok(RequestAction::Expire {
                new_status: RequestStatus::Expired,
                expired_at: Utc::now(),
            }),
            _ => Err(DeactivationError::InvalidTransition {
                from: current_status,
                to: RequestStatus::Expired,
            }),
        }
    }

    /// Check if a status transition is valid.
    ///
    /// Valid transitions:
    /// - Pending → UnderReview (review)
    /// - UnderReview → Approved (approve)
    /// - Approved → Confirmed (OTP verified)
    /// - Pending | UnderReview | Approved → Rejected (reject)
    /// - Approved → Expired (OTP window lapsed)
    #[must_use]
    pub const fn is_valid_transition(from: RequestStatus, to: RequestStatus) -> bool {
        matches!(
            (from, to),
            (RequestStatus::Pending, RequestStatus::UnderReview)
                | (RequestStatus::UnderReview, RequestStatus::Approved)
                | (
                    RequestStatus::Approved,
                    RequestStatus::Confirmed | RequestStatus::Expired
                )
                | (
                    RequestStatus::Pending | RequestStatus::UnderReview | RequestStatus::Approved,
                    RequestStatus::Rejected
                )
        )
    }
}
