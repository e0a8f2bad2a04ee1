//! Shared types, errors, and configuration for Offboard.
//!
//! This crate provides common types used across all other crates:
//! - Typed IDs for type-safe entity references
//! - Administrative actors and their role set
//! - The driver/company subject union
//! - Application-wide error types
//! - Configuration management

pub mod config;
pub mod error;
pub mod types;

pub use config::{AppConfig, OtpConfig};
pub use error::{AppError, AppResult};
