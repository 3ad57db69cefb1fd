//! Organization kinds and user roles carried by sessions.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of council.
///
/// There is exactly one national council (CFA) and one regional council (CRA)
/// per federative unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrganizationKind {
    /// Conselho Federal de Administração (national).
    #[serde(rename = "CFA")]
    Cfa,
    /// Conselho Regional de Administração (regional).
    #[serde(rename = "CRA")]
    Cra,
}

impl OrganizationKind {
    /// Returns the string representation stored in the database.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cfa => "CFA",
            Self::Cra => "CRA",
        }
    }

    /// Parses a kind from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "CFA" => Some(Self::Cfa),
            "CRA" => Some(Self::Cra),
            _ => None,
        }
    }
}

impl fmt::Display for OrganizationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Role of a user within the federation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Regular member filling in its organization's figures.
    #[default]
    User,
    /// Administrator with moderation rights.
    Admin,
}

impl Role {
    /// Returns the string representation stored in the database.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Admin => "admin",
        }
    }

    /// Parses a role from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "user" => Some(Self::User),
            "admin" => Some(Self::Admin),
            _ => None,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
