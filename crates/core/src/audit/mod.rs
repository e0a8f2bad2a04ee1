//! Audit trail vocabulary for Offboard.
//!
//! Every workflow transition - successful or denied - produces exactly
//! one immutable [`AuditEntry`]. Entries are append-only: nothing in
//! this crate reads prior entries to make decisions.

pub mod types;

pub use types::{AuditAction, AuditActor, AuditEntry, AuditOutcome};
