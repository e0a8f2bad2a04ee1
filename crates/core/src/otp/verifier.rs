//! OTP submission verification.
//!
//! Verification is pure: given a challenge snapshot, a submitted code,
//! and the current instant, it returns either the verdict to commit or
//! the error to report. The storage layer owns committing the resulting
//! status change (`Verified` on success, `Expired` on lapse).

use chrono::{DateTime, Utc};
use subtle::ConstantTimeEq;

use crate::otp::error::OtpError;
use crate::otp::issuer::OtpIssuer;
use crate::otp::types::{OtpChallenge, OtpStatus};

/// The outcome of a successful verification, to be committed by the
/// caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OtpVerdict {
    /// When the code was consumed.
    pub consumed_at: DateTime<Utc>,
}

/// Stateless verifier for one-time passcodes.
///
/// Retries after a mismatch are permitted until expiry. An attempt
/// counter with lockout would harden this against online guessing but is
/// deliberately not part of the observed behavior.
pub struct OtpVerifier;

impl OtpVerifier {
    /// Verifies a submitted code against a challenge snapshot.
    ///
    /// Check order matters: single-use beats expiry beats correctness. A
    /// correct code submitted after `expires_at` still fails with
    /// `Expired`.
    ///
    /// # Errors
    /// * `AlreadyUsed` if the challenge was consumed before
    /// * `Expired` if the window lapsed (the caller marks the challenge)
    /// * `Mismatch` if the code is wrong (the challenge stays live)
    pub fn verify(
        challenge: &OtpChallenge,
        submitted_code: &str,
        now: DateTime<Utc>,
    ) -> Result<OtpVerdict, OtpError> {
        match challenge.status {
            OtpStatus::Verified => return Err(OtpError::AlreadyUsed),
            OtpStatus::Expired => return Err(OtpError::Expired),
            OtpStatus::Sent => {}
        }

        if challenge.is_expired(now) {
            return Err(OtpError::Expired);
        }

        // Compare digests in constant time; the digest equalizes length,
        // so no submission shape leaks through timing.
        let submitted_hash = OtpIssuer::hash_code(submitted_code);
        let matches = submitted_hash
            .as_bytes()
            .ct_eq(challenge.code_hash.as_bytes());
        if !bool::from(matches) {
            return Err(OtpError::Mismatch);
        }

        Ok(OtpVerdict { consumed_at: now })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::otp::types::OtpPurpose;
    use chrono::Duration;
    use offboard_shared::types::{DriverId, Subject};

    fn issued() -> (OtpChallenge, String, DateTime<Utc>) {
        let now = Utc::now();
        let issued = OtpIssuer::issue(
            Subject::Driver(DriverId::new()),
            OtpPurpose::DeactivationConfirmation,
            now,
            Duration::minutes(10),
        );
        (issued.challenge, issued.code, now)
    }

    #[test]
    fn test_correct_code_verifies() {
        let (challenge, code, now) = issued();
        let verdict = OtpVerifier::verify(&challenge, &code, now).unwrap();
        assert_eq!(verdict.consumed_at, now);
    }

    #[test]
    fn test_wrong_code_mismatches() {
        let (challenge, code, now) = issued();
        let wrong = if code == "000000" { "000001" } else { "000000" };
        let result = OtpVerifier::verify(&challenge, wrong, now);
        assert!(matches!(result, Err(OtpError::Mismatch)));
    }

    #[test]
    fn test_expired_code_fails_even_when_correct() {
        let (challenge, code, now) = issued();
        let late = now + Duration::minutes(11);
        let result = OtpVerifier::verify(&challenge, &code, late);
        assert!(matches!(result, Err(OtpError::Expired)));
    }

    #[test]
    fn test_verified_challenge_rejects_reuse() {
        let (mut challenge, code, now) = issued();
        challenge.status = OtpStatus::Verified;
        challenge.consumed_at = Some(now);
        let result = OtpVerifier::verify(&challenge, &code, now);
        assert!(matches!(result, Err(OtpError::AlreadyUsed)));
    }

    #[test]
    fn test_lapsed_challenge_reports_expired() {
        let (mut challenge, code, now) = issued();
        challenge.status = OtpStatus::Expired;
        let result = OtpVerifier::verify(&challenge, &code, now);
        assert!(matches!(result, Err(OtpError::Expired)));
    }

    #[test]
    fn test_single_use_beats_expiry_in_check_order() {
        let (mut challenge, code, now) = issued();
        challenge.status = OtpStatus::Verified;
        // Both used and lapsed: the reuse error wins.
        let late = now + Duration::hours(1);
        let result = OtpVerifier::verify(&challenge, &code, late);
        assert!(matches!(result, Err(OtpError::AlreadyUsed)));
    }

    #[test]
    fn test_malformed_submission_is_just_a_mismatch() {
        let (challenge, _, now) = issued();
        let result = OtpVerifier::verify(&challenge, "not-a-code", now);
        assert!(matches!(result, Err(OtpError::Mismatch)));
    }
}
