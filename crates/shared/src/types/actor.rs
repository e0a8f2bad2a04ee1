//! Administrative actors and their roles.
//!
//! Every workflow operation receives an explicit [`Actor`] carrying its
//! role set. There is no ambient "current admin"; role preconditions are
//! checked against the parameters the caller supplies.

use serde::{Deserialize, Serialize};

use crate::types::id::ActorId;

/// Administrative role levels for the deactivation approval chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AdminRole {
    /// First-line reviewer; may move a request from pending to under review.
    #[serde(rename = "admin_ii")]
    AdminTwo,
    /// Senior approver; may approve a reviewed request and trigger OTP
    /// issuance.
    #[serde(rename = "admin_i")]
    AdminOne,
}

impl AdminRole {
    /// Parses a role from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "admin_ii" => Some(Self::AdminTwo),
            "admin_i" => Some(Self::AdminOne),
            _ => None,
        }
    }

    /// Returns the string representation of the role.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::AdminTwo => "admin_ii",
            Self::AdminOne => "admin_i",
        }
    }
}

impl std::fmt::Display for AdminRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An administrative actor performing a workflow operation.
///
/// The role set is supplied by the embedding application layer (which owns
/// role storage); this core only checks preconditions against it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    /// Unique identifier for the actor.
    pub id: ActorId,
    /// Roles the actor holds.
    pub roles: Vec<AdminRole>,
}

impl Actor {
    /// Creates an actor with the given role set.
    #[must_use]
    pub const fn new(id: ActorId, roles: Vec<AdminRole>) -> Self {
        Self { id, roles }
    }

    /// Creates an actor holding a single role.
    #[must_use]
    pub fn with_role(id: ActorId, role: AdminRole) -> Self {
        Self {
            id,
            roles: vec![role],
        }
    }

    /// Returns true if the actor holds the given role.
    #[must_use]
    pub fn has_role(&self, role: AdminRole) -> bool {
        self.roles.contains(&role)
    }
}
