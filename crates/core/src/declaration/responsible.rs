//! Persons responsible for an organization's figures.

use std::fmt;
use std::future::Future;

use declara_shared::types::OrganizationId;
use serde::{Deserialize, Serialize};

use super::error::DeclarationError;
use crate::store::StoreError;

/// Professional registration used to identify the data responsible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DocumentType {
    /// Accountant registration.
    #[default]
    #[serde(rename = "CRC")]
    Crc,
    /// Administrator registration.
    #[serde(rename = "CRA")]
    Cra,
    /// Taxpayer number.
    #[serde(rename = "CPF")]
    Cpf,
    /// Anything else.
    #[serde(rename = "Outro")]
    Other,
}

impl DocumentType {
    /// Returns the string representation stored in the database.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Crc => "CRC",
            Self::Cra => "CRA",
            Self::Cpf => "CPF",
            Self::Other => "Outro",
        }
    }

    /// Parses a document type from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "CRC" => Some(Self::Crc),
            "CRA" => Some(Self::Cra),
            "CPF" => Some(Self::Cpf),
            "Outro" => Some(Self::Other),
            _ => None,
        }
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Head of the unit and person responsible for the entered data.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ResponsibleData {
    /// Name of the head of the unit.
    pub unit_responsible_name: String,
    /// CRA registration of the head of the unit.
    pub unit_responsible_cra_number: String,
    /// Name of the data responsible.
    pub data_responsible_name: String,
    /// Role of the data responsible.
    pub data_responsible_role: String,
    /// Kind of registration of the data responsible.
    pub data_responsible_doc_type: DocumentType,
    /// Registration number of the data responsible.
    pub data_responsible_doc_number: String,
    /// Organization CNPJ.
    #[serde(default)]
    pub cnpj: Option<String>,
}

impl ResponsibleData {
    /// Checks the fields required to sign a declaration.
    ///
    /// # Errors
    ///
    /// Returns `DeclarationError::Validation` naming the first missing field.
    pub fn validate(&self) -> Result<(), DeclarationError> {
        let required = [
            ("unit_responsible_name", &self.unit_responsible_name),
            ("unit_responsible_cra_number", &self.unit_responsible_cra_number),
            ("data_responsible_name", &self.data_responsible_name),
            ("data_responsible_role", &self.data_responsible_role),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(DeclarationError::Validation(format!("{field} is required")));
            }
        }
        Ok(())
    }
}

/// Repository trait for responsible persons, one row per organization.
pub trait ResponsibleRepository: Send + Sync {
    /// Loads the stored data.
    fn find(
        &self,
        organization_id: OrganizationId,
    ) -> impl Future<Output = Result<Option<ResponsibleData>, StoreError>> + Send;

    /// Inserts or replaces the data.
    fn upsert(
        &self,
        organization_id: OrganizationId,
        data: &ResponsibleData,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete() -> ResponsibleData {
        ResponsibleData {
            unit_responsible_name: "Maria Souza".into(),
            unit_responsible_cra_number: "CRA-SP 12345".into(),
            data_responsible_name: "João Lima".into(),
            data_responsible_role: "Contador".into(),
            data_responsible_doc_type: DocumentType::Crc,
            data_responsible_doc_number: "SP-000111".into(),
            cnpj: None,
        }
    }

    #[test]
    fn test_validate_complete() {
        assert!(complete().validate().is_ok());
    }

    #[test]
    fn test_validate_names_missing_field() {
        let data = ResponsibleData {
            data_responsible_role: "  ".into(),
            ..complete()
        };
        let err = data.validate().unwrap_err();
        assert!(err.to_string().contains("data_responsible_role"));
    }

    #[test]
    fn test_document_type_serde() {
        assert_eq!(
            serde_json::to_string(&DocumentType::Other).unwrap(),
            "\"Outro\""
        );
        assert_eq!(DocumentType::parse("CPF"), Some(DocumentType::Cpf));
        assert_eq!(DocumentType::parse("RG"), None);
    }
}
