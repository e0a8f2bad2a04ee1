//! OTP challenge domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use offboard_shared::types::{ChallengeId, Subject};

/// What an issued challenge proves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OtpPurpose {
    /// Final confirmation of an approved deactivation request.
    DeactivationConfirmation,
    /// Ad hoc identity re-verification outside the approval chain.
    SecurityChallenge,
}

impl OtpPurpose {
    /// Parses a purpose from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "deactivation_confirmation" => Some(Self::DeactivationConfirmation),
            "security_challenge" => Some(Self::SecurityChallenge),
            _ => None,
        }
    }

    /// Returns the string representation of the purpose.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::DeactivationConfirmation => "deactivation_confirmation",
            Self::SecurityChallenge => "security_challenge",
        }
    }
}

impl fmt::Display for OtpPurpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Lifecycle status of an OTP challenge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OtpStatus {
    /// Issued and awaiting verification.
    Sent,
    /// Successfully verified (terminal; single-use).
    Verified,
    /// Lapsed or superseded without verification (terminal).
    Expired,
}

impl OtpStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Sent => "sent",
            Self::Verified => "verified",
            Self::Expired => "expired",
        }
    }

    /// Parses a status from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "sent" => Some(Self::Sent),
            "verified" => Some(Self::Verified),
            "expired" => Some(Self::Expired),
            _ => None,
        }
    }
}

impl fmt::Display for OtpStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A short-lived one-time passcode challenge.
///
/// Only the SHA-256 digest of the code is kept; the raw code exists
/// solely in the [`IssuedChallenge`] handed back at issuance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OtpChallenge {
    /// Unique identifier for the challenge.
    pub id: ChallengeId,
    /// What this challenge proves.
    pub purpose: OtpPurpose,
    /// The account the challenge is bound to.
    #[serde(flatten)]
    pub subject: Subject,
    /// Hex-encoded SHA-256 digest of the code.
    pub code_hash: String,
    /// Current lifecycle status.
    pub status: OtpStatus,
    /// When the challenge was issued.
    pub issued_at: DateTime<Utc>,
    /// When the code stops being accepted.
    pub expires_at: DateTime<Utc>,
    /// When the code was consumed, if it was.
    pub consumed_at: Option<DateTime<Utc>>,
}

impl OtpChallenge {
    /// Returns true if the challenge has lapsed at the given instant.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }
}

/// The result of issuing a challenge: the stored challenge plus the raw
/// code, returned exactly once for out-of-band delivery.
#[derive(Clone)]
pub struct IssuedChallenge {
    /// The challenge as stored (digest only).
    pub challenge: OtpChallenge,
    /// The human-readable 6-digit code. Never persisted or logged.
    pub code: String,
}

// The raw code must never reach log output, so Debug redacts it.
impl fmt::Debug for IssuedChallenge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IssuedChallenge")
            .field("challenge", &self.challenge)
            .field("code", &"[redacted]")
            .finish()
    }
}
