//! Deactivation workflow error types.
//!
//! This module defines all error types that can occur during workflow
//! operations: status transitions, role checks, and OTP confirmation.

use thiserror::Error;

use offboard_shared::AppError;
use offboard_shared::types::{ActorId, AdminRole, RequestId, Subject};

use crate::deactivation::types::RequestStatus;
use crate::otp::error::OtpError;

/// Errors that can occur during deactivation workflow operations.
#[derive(Debug, Error)]
pub enum DeactivationError {
    /// Malformed or missing input.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Deactivation request not found.
    #[error("Deactivation request {0} not found")]
    RequestNotFound(RequestId),

    /// No approved request exists for the challenged subject.
    #[error("No approved deactivation request found for {subject}")]
    ApprovedRequestNotFound {
        /// The subject the challenge was issued for.
        subject: Subject,
    },

    /// The targeted account does not exist.
    #[error("Subject not found: {subject}")]
    SubjectNotFound {
        /// The unknown subject.
        subject: Subject,
    },

    /// The targeted account is not currently active.
    #[error("Subject is not active: {subject}")]
    SubjectInactive {
        /// The inactive subject.
        subject: Subject,
    },

    /// Attempted an invalid status transition.
    #[error("Invalid status transition from {from} to {to}")]
    InvalidTransition {
        /// The current status.
        from: RequestStatus,
        /// The attempted target status.
        to: RequestStatus,
    },

    /// An open request already exists for the subject.
    #[error("An open deactivation request already exists for {subject}")]
    OpenRequestExists {
        /// The subject with the open request.
        subject: Subject,
    },

    /// The actor does not hold the role the transition requires.
    #[error("Actor {actor_id} lacks required role {required}")]
    RoleAuthorization {
        /// The actor who attempted the transition.
        actor_id: ActorId,
        /// The role required for the transition.
        required: AdminRole,
    },

    /// A concurrent transition won the race for this request.
    #[error("Concurrent modification detected for request {request_id}")]
    ConcurrencyConflict {
        /// The contested request.
        request_id: RequestId,
    },

    /// OTP issuance or verification failed.
    #[error(transparent)]
    Otp(#[from] OtpError),
}

impl DeactivationError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) | Self::InvalidTransition { .. } => 400,
            Self::RoleAuthorization { .. } => 403,
            Self::RequestNotFound(_)
            | Self::ApprovedRequestNotFound { .. }
            | Self::SubjectNotFound { .. } => 404,
            Self::OpenRequestExists { .. } | Self::ConcurrencyConflict { .. } => 409,
            Self::SubjectInactive { .. } => 422,
            Self::Otp(err) => err.status_code(),
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::RequestNotFound(_) => "REQUEST_NOT_FOUND",
            Self::ApprovedRequestNotFound { .. } => "APPROVED_REQUEST_NOT_FOUND",
            Self::SubjectNotFound { .. } => "SUBJECT_NOT_FOUND",
            Self::SubjectInactive { .. } => "SUBJECT_INACTIVE",
            Self::InvalidTransition { .. } => "INVALID_TRANSITION",
            Self::OpenRequestExists { .. } => "OPEN_REQUEST_EXISTS",
            Self::RoleAuthorization { .. } => "INSUFFICIENT_ROLE",
            Self::ConcurrencyConflict { .. } => "CONCURRENCY_CONFLICT",
            Self::Otp(err) => err.error_code(),
        }
    }
}

impl From<DeactivationError> for AppError {
    fn from(err: DeactivationError) -> Self {
        let message = err.to_string();
        match err {
            DeactivationError::Validation(_) => Self::Validation(message),
            DeactivationError::RequestNotFound(_)
            | DeactivationError::ApprovedRequestNotFound { .. }
            | DeactivationError::SubjectNotFound { .. } => Self::NotFound(message),
            DeactivationError::SubjectInactive { .. }
            | DeactivationError::InvalidTransition { .. } => Self::BusinessRule(message),
            DeactivationError::OpenRequestExists { .. }
            | DeactivationError::ConcurrencyConflict { .. } => Self::Conflict(message),
            DeactivationError::RoleAuthorization { .. } => Self::Forbidden(message),
            DeactivationError::Otp(inner) => inner.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_transition_error() {
        let err = DeactivationError::InvalidTransition {
            from: RequestStatus::Pending,
            to: RequestStatus::Approved,
        };
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.error_code(), "INVALID_TRANSITION");
        assert!(err.to_string().contains("pending"));
        assert!(err.to_string().contains("approved"));
    }

    #[test]
    fn test_role_authorization_error() {
        let err = DeactivationError::RoleAuthorization {
            actor_id: ActorId::new(),
            required: AdminRole::AdminOne,
        };
        assert_eq!(err.status_code(), 403);
        assert_eq!(err.error_code(), "INSUFFICIENT_ROLE");
        assert!(err.to_string().contains("admin_i"));
    }

    #[test]
    fn test_request_not_found_error() {
        let err = DeactivationError::RequestNotFound(RequestId::new());
        assert_eq!(err.status_code(), 404);
        assert_eq!(err.error_code(), "REQUEST_NOT_FOUND");
    }

    #[test]
    fn test_concurrency_conflict_error() {
        let err = DeactivationError::ConcurrencyConflict {
            request_id: RequestId::new(),
        };
        assert_eq!(err.status_code(), 409);
        assert_eq!(err.error_code(), "CONCURRENCY_CONFLICT");
    }

    #[test]
    fn test_otp_error_passes_through() {
        let err = DeactivationError::Otp(OtpError::Expired);
        assert_eq!(err.status_code(), 410);
        assert_eq!(err.error_code(), "OTP_EXPIRED");
    }

    #[test]
    fn test_error_payloads_never_contain_codes() {
        // The OTP variants carry no payload at all, so a code can never
        // leak through Display.
        assert_eq!(
            DeactivationError::Otp(OtpError::Mismatch).to_string(),
            "Submitted code does not match"
        );
    }

    #[test]
    fn test_app_error_conversion_keeps_status() {
        let err = DeactivationError::OpenRequestExists {
            subject: Subject::Driver(offboard_shared::types::DriverId::new()),
        };
        let status = err.status_code();
        let app: AppError = err.into();
        assert_eq!(app.status_code(), status);
    }
}
