//! Deactivation approval workflow for Offboard.
//!
//! This module implements the deactivation request lifecycle: a request
//! moves through a strict forward-only state graph, gated by Admin-II
//! review, Admin-I approval, and a final OTP confirmation.
//!
//! # Modules
//!
//! - `types` - Request domain types (RequestStatus, RequestAction)
//! - `error` - Workflow-specific error types
//! - `service` - State transition logic

pub mod error;
pub mod service;
pub mod types;

#[cfg(test)]
mod service_props;

pub use error::DeactivationError;
pub use service::DeactivationService;
pub use types::{DeactivationRequest, RequestAction, RequestStatus, StageRecord};
