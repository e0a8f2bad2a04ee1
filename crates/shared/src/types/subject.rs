//! The subject of a deactivation: a driver or a company account.
//!
//! Modeled as a tagged union over typed IDs rather than a trait hierarchy;
//! the executor dispatches on the variant.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::id::{CompanyId, DriverId};

/// Kind discriminant for a [`Subject`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubjectKind {
    /// A driver account.
    Driver,
    /// A company account.
    Company,
}

impl SubjectKind {
    /// Parses a kind from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "driver" => Some(Self::Driver),
            "company" => Some(Self::Company),
            _ => None,
        }
    }

    /// Returns the string representation of the kind.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Driver => "driver",
            Self::Company => "company",
        }
    }
}

impl std::fmt::Display for SubjectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A marketplace account targeted by a deactivation request or challenge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "subject_type", content = "subject_id", rename_all = "lowercase")]
pub enum Subject {
    /// A driver account.
    Driver(DriverId),
    /// A company account.
    Company(CompanyId),
}

impl Subject {
    /// Returns the kind discriminant.
    #[must_use]
    pub const fn kind(&self) -> SubjectKind {
        match self {
            Self::Driver(_) => SubjectKind::Driver,
            Self::Company(_) => SubjectKind::Company,
        }
    }

    /// Returns the underlying account UUID.
    #[must_use]
    pub const fn id(&self) -> Uuid {
        match self {
            Self::Driver(id) => id.into_inner(),
            Self::Company(id) => id.into_inner(),
        }
    }
}

impl std::fmt::Display for Subject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.kind(), self.id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_parse() {
        assert_eq!(SubjectKind::parse("driver"), Some(SubjectKind::Driver));
        assert_eq!(SubjectKind::parse("COMPANY"), Some(SubjectKind::Company));
        assert_eq!(SubjectKind::parse("rider"), None);
    }

    #[test]
    fn test_subject_kind_and_id() {
        let driver_id = DriverId::new();
        let subject = Subject::Driver(driver_id);
        assert_eq!(subject.kind(), SubjectKind::Driver);
        assert_eq!(subject.id(), driver_id.into_inner());
    }

    #[test]
    fn test_subject_display_names_kind() {
        let subject = Subject::Company(CompanyId::new());
        assert!(subject.to_string().starts_with("company "));
    }

    #[test]
    fn test_subject_serde_tagging() {
        let subject = Subject::Driver(DriverId::new());
        let json = serde_json::to_value(&subject).unwrap();
        assert_eq!(json["subject_type"], "driver");
        assert!(json["subject_id"].is_string());
    }
}
