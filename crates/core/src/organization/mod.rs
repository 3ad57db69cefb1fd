//! Councils that report figures.
//!
//! The catalog is fixed: one national council and one regional council per
//! federative unit. It is seeded once and rarely mutated.

use std::future::Future;

use declara_shared::types::{OrganizationId, OrganizationKind};
use serde::{Deserialize, Serialize};

use crate::store::StoreError;

/// A council.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organization {
    /// Organization ID.
    pub id: OrganizationId,
    /// Display name (`CRA-SP`).
    pub name: String,
    /// National or regional.
    pub kind: OrganizationKind,
    /// Federative unit.
    pub state: String,
}

impl Organization {
    /// Returns true for the national council.
    #[must_use]
    pub fn is_cfa(&self) -> bool {
        self.kind == OrganizationKind::Cfa
    }
}

/// Catalog entry used to create or refresh an organization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrganizationSeed {
    /// Display name, unique.
    pub name: &'static str,
    /// National or regional.
    pub kind: OrganizationKind,
    /// Federative unit.
    pub state: &'static str,
}

impl OrganizationSeed {
    const fn cfa(name: &'static str, state: &'static str) -> Self {
        Self {
            name,
            kind: OrganizationKind::Cfa,
            state,
        }
    }

    const fn cra(name: &'static str, state: &'static str) -> Self {
        Self {
            name,
            kind: OrganizationKind::Cra,
            state,
        }
    }
}

/// The fixed organization catalog.
pub static ORGANIZATION_SEEDS: [OrganizationSeed; 28] = [
    OrganizationSeed::cfa("CFA - Conselho Federal", "DF"),
    OrganizationSeed::cra("CRA-AC", "AC"),
    OrganizationSeed::cra("CRA-AL", "AL"),
    OrganizationSeed::cra("CRA-AM", "AM"),
    OrganizationSeed::cra("CRA-AP", "AP"),
    OrganizationSeed::cra("CRA-BA", "BA"),
    OrganizationSeed::cra("CRA-CE", "CE"),
    OrganizationSeed::cra("CRA-DF", "DF"),
    OrganizationSeed::cra("CRA-ES", "ES"),
    OrganizationSeed::cra("CRA-GO", "GO"),
    OrganizationSeed::cra("CRA-MA", "MA"),
    OrganizationSeed::cra("CRA-MG", "MG"),
    OrganizationSeed::cra("CRA-MS", "MS"),
    OrganizationSeed::cra("CRA-MT", "MT"),
    OrganizationSeed::cra("CRA-PA", "PA"),
    OrganizationSeed::cra("CRA-PB", "PB"),
    OrganizationSeed::cra("CRA-PE", "PE"),
    OrganizationSeed::cra("CRA-PI", "PI"),
    OrganizationSeed::cra("CRA-PR", "PR"),
    OrganizationSeed::cra("CRA-RJ", "RJ"),
    OrganizationSeed::cra("CRA-RN", "RN"),
    OrganizationSeed::cra("CRA-RO", "RO"),
    OrganizationSeed::cra("CRA-RR", "RR"),
    OrganizationSeed::cra("CRA-RS", "RS"),
    OrganizationSeed::cra("CRA-SC", "SC"),
    OrganizationSeed::cra("CRA-SE", "SE"),
    OrganizationSeed::cra("CRA-SP", "SP"),
    OrganizationSeed::cra("CRA-TO", "TO"),
];

/// Repository trait for organization persistence.
pub trait OrganizationRepository: Send + Sync {
    /// Lists every organization ordered by name.
    fn list(&self) -> impl Future<Output = Result<Vec<Organization>, StoreError>> + Send;

    /// Finds an organization by ID.
    fn find(
        &self,
        id: OrganizationId,
    ) -> impl Future<Output = Result<Option<Organization>, StoreError>> + Send;

    /// Inserts the seed or refreshes the row with the same name.
    fn upsert_by_name(
        &self,
        seed: &OrganizationSeed,
    ) -> impl Future<Output = Result<Organization, StoreError>> + Send;
}
