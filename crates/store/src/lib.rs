//! In-memory state and workflow orchestration for Offboard.
//!
//! This crate owns the stateful side of the deactivation workflow:
//! repositories for requests, challenges, entities, and the audit log,
//! plus the [`ApprovalWorkflow`] orchestrator that drives a request from
//! creation through review, approval, and OTP confirmation.
//!
//! Every transition commits via compare-and-swap on the expected status,
//! so independent concurrent callers cannot silently clobber each other.

pub mod entities;
pub mod executor;
pub mod repositories;
pub mod workflow;

pub use executor::{DeactivationExecutor, ExecutionOutcome};
pub use workflow::{ApprovalWorkflow, ClientContext};
