//! OTP challenge issuance.
//!
//! Codes are six decimal digits drawn uniformly from a cryptographically
//! secure generator. Only the SHA-256 digest of a code is ever stored;
//! the raw code is handed back exactly once for out-of-band delivery.

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use sha2::{Digest, Sha256};

use offboard_shared::types::{ChallengeId, Subject};

use crate::otp::types::{IssuedChallenge, OtpChallenge, OtpPurpose, OtpStatus};

/// Stateless issuer for one-time passcode challenges.
pub struct OtpIssuer;

impl OtpIssuer {
    /// Number of decimal digits in a generated code.
    pub const CODE_LENGTH: usize = 6;

    /// Size of the code space (10^CODE_LENGTH).
    const CODE_SPACE: u32 = 1_000_000;

    /// Generates a left-zero-padded 6-digit code.
    ///
    /// `rand::rng()` is a CSPRNG; the draw is uniform over
    /// 000000..=999999 and not derived from any predictable seed.
    #[must_use]
    pub fn generate_code() -> String {
        let mut rng = rand::rng();
        let value = rng.random_range(0..Self::CODE_SPACE);
        format!("{value:06}")
    }

    /// Hashes a code for at-rest storage.
    #[must_use]
    pub fn hash_code(code: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(code.as_bytes());
        format!("{:x}", hasher.finalize())
    }

    /// Issues a fresh challenge bound to `(subject, purpose)`.
    ///
    /// The challenge expires at `now + ttl`. Superseding any prior live
    /// challenge for the same binding is the storage layer's concern.
    #[must_use]
    pub fn issue(
        subject: Subject,
        purpose: OtpPurpose,
        now: DateTime<Utc>,
        ttl: Duration,
    ) -> IssuedChallenge {
        let code = Self::generate_code();
        let challenge = OtpChallenge {
            id: ChallengeId::new(),
            purpose,
            subject,
            code_hash: Self::hash_code(&code),
            status: OtpStatus::Sent,
            issued_at: now,
            expires_at: now + ttl,
            consumed_at: None,
        };
        IssuedChallenge { challenge, code }
    }
}
