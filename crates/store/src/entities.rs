//! Marketplace account records.
//!
//! Only the fields this core consumes are modeled: the active/inactive
//! flag per account kind, plus the driver's `is_current` roster flag.
//! Everything else about drivers and companies lives in the surrounding
//! application.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use offboard_shared::types::{CompanyId, DriverId};

/// Whether an account participates in the marketplace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityStatus {
    /// The account is live.
    Active,
    /// The account has been deactivated.
    Inactive,
}

impl EntityStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
        }
    }
}

/// A driver account row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriverRecord {
    /// Unique identifier for the driver.
    pub id: DriverId,
    /// Display name.
    pub full_name: String,
    /// Active/inactive flag.
    pub status: EntityStatus,
    /// Whether the driver is on the current roster.
    pub is_current: bool,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
}

impl DriverRecord {
    /// Creates an active, current driver record.
    #[must_use]
    pub fn active(full_name: impl Into<String>) -> Self {
        Self {
            id: DriverId::new(),
            full_name: full_name.into(),
            status: EntityStatus::Active,
            is_current: true,
            created_at: Utc::now(),
        }
    }
}

/// A company account row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyRecord {
    /// Unique identifier for the company.
    pub id: CompanyId,
    /// Registered legal name.
    pub legal_name: String,
    /// Active/inactive flag.
    pub status: EntityStatus,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
}

impl CompanyRecord {
    /// Creates an active company record.
    #[must_use]
    pub fn active(legal_name: impl Into<String>) -> Self {
        Self {
            id: CompanyId::new(),
            legal_name: legal_name.into(),
            status: EntityStatus::Active,
            created_at: Utc::now(),
        }
    }
}
