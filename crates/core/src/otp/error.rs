//! OTP error types.

use thiserror::Error;

use offboard_shared::AppError;
use offboard_shared::types::ChallengeId;

/// Errors that can occur while verifying a one-time passcode.
///
/// None of these variants carry the submitted or expected code; secrets
/// never travel through error payloads.
#[derive(Debug, Error)]
pub enum OtpError {
    /// No challenge exists with the given ID.
    #[error("OTP challenge {0} not found")]
    ChallengeNotFound(ChallengeId),

    /// The challenge lapsed before a correct submission arrived.
    #[error("OTP challenge has expired")]
    Expired,

    /// The submitted code does not match the issued one.
    #[error("Submitted code does not match")]
    Mismatch,

    /// The challenge was already consumed by an earlier verification.
    #[error("OTP challenge has already been used")]
    AlreadyUsed,
}

impl OtpError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::ChallengeNotFound(_) => 404,
            Self::Expired => 410,
            Self::Mismatch => 403,
            Self::AlreadyUsed => 409,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::ChallengeNotFound(_) => "CHALLENGE_NOT_FOUND",
            Self::Expired => "OTP_EXPIRED",
            Self::Mismatch => "OTP_MISMATCH",
            Self::AlreadyUsed => "OTP_ALREADY_USED",
        }
    }
}

impl From<OtpError> for AppError {
    fn from(err: OtpError) -> Self {
        let message = err.to_string();
        match err {
            OtpError::ChallengeNotFound(_) => Self::NotFound(message),
            OtpError::Expired => Self::BusinessRule(message),
            OtpError::Mismatch => Self::Forbidden(message),
            OtpError::AlreadyUsed => Self::Conflict(message),
        }
    }
}
