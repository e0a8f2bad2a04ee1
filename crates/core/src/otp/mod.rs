//! One-time passcode primitives for Offboard.
//!
//! Shared by the deactivation confirmation chain and the standalone
//! security-challenge path. Codes are generated from a cryptographically
//! secure source, stored only as digests, and verified in constant time.
//!
//! # Modules
//!
//! - `types` - Challenge domain types (OtpChallenge, OtpPurpose, OtpStatus)
//! - `error` - OTP-specific error types
//! - `issuer` - Code generation and challenge construction
//! - `verifier` - Submission checks (single-use, expiry, match)

pub mod error;
pub mod issuer;
pub mod types;
pub mod verifier;

#[cfg(test)]
mod verifier_props;

pub use error::OtpError;
pub use issuer::OtpIssuer;
pub use types::{IssuedChallenge, OtpChallenge, OtpPurpose, OtpStatus};
pub use verifier::{OtpVerdict, OtpVerifier};
