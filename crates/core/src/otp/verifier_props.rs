//! Property-based tests for OtpVerifier.
//!
//! These tests validate the verifier's ordering guarantees with
//! randomized submissions and clock offsets.

use chrono::{Duration, Utc};
use proptest::prelude::*;

use offboard_shared::types::{DriverId, Subject};

use crate::otp::error::OtpError;
use crate::otp::issuer::OtpIssuer;
use crate::otp::types::OtpPurpose;
use crate::otp::verifier::OtpVerifier;

/// Strategy for arbitrary submitted strings, including non-numeric junk.
fn arb_submission() -> impl Strategy<Value = String> {
    prop_oneof![
        "[0-9]{6}",
        "[0-9]{1,5}",
        "[a-zA-Z0-9!@# ]{0,12}",
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// A submission different from the issued code never verifies.
    #[test]
    fn prop_only_the_issued_code_verifies(submission in arb_submission()) {
        let now = Utc::now();
        let issued = OtpIssuer::issue(
            Subject::Driver(DriverId::new()),
            OtpPurpose::SecurityChallenge,
            now,
            Duration::minutes(10),
        );
        prop_assume!(submission != issued.code);

        let result = OtpVerifier::verify(&issued.challenge, &submission, now);
        prop_assert!(matches!(result, Err(OtpError::Mismatch)));
    }

    /// After the window lapses, every submission fails with Expired -
    /// including the correct code.
    #[test]
    fn prop_expiry_dominates_correctness(
        submission in arb_submission(),
        late_secs in 601i64..86_400
    ) {
        let now = Utc::now();
        let issued = OtpIssuer::issue(
            Subject::Driver(DriverId::new()),
            OtpPurpose::SecurityChallenge,
            now,
            Duration::minutes(10),
        );

        let late = now + Duration::seconds(late_secs);
        for candidate in [submission.as_str(), issued.code.as_str()] {
            let result = OtpVerifier::verify(&issued.challenge, candidate, late);
            prop_assert!(matches!(result, Err(OtpError::Expired)));
        }
    }

    /// Inside the window the correct code always verifies, regardless of
    /// how far into the window the submission lands.
    #[test]
    fn prop_correct_code_verifies_within_window(early_secs in 0i64..=600) {
        let now = Utc::now();
        let issued = OtpIssuer::issue(
            Subject::Driver(DriverId::new()),
            OtpPurpose::SecurityChallenge,
            now,
            Duration::minutes(10),
        );

        let at = now + Duration::seconds(early_secs);
        let verdict = OtpVerifier::verify(&issued.challenge, &issued.code, at);
        prop_assert!(verdict.is_ok());
    }
}
