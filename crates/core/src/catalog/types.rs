//! Account catalog types and lookups.

use std::collections::BTreeMap;
use std::fmt;

use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;

use super::chart;

/// Whether an account accepts entered values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountKind {
    /// Leaf account. Accepts an entered value.
    Analytic,
    /// Category header. Its value, if shown, is the sum of its descendants.
    Synthetic,
}

impl AccountKind {
    /// Label used in spreadsheets.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Analytic => "Analítica",
            Self::Synthetic => "Sintética",
        }
    }
}

impl fmt::Display for AccountKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One line of the chart of accounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Account {
    /// Dotted account code, also used as the account id.
    pub code: &'static str,
    /// Top-level group name.
    pub group: &'static str,
    /// Second-level group name.
    pub subgroup: &'static str,
    /// Analytic or synthetic.
    pub kind: AccountKind,
    /// Display name, unique within its catalog.
    pub name: &'static str,
}

impl Account {
    /// Returns true if the account accepts entered values.
    #[must_use]
    pub fn is_analytic(&self) -> bool {
        self.kind == AccountKind::Analytic
    }

    /// Returns true if `other` sits below this account in the hierarchy.
    #[must_use]
    pub fn is_ancestor_of(&self, other: &Account) -> bool {
        other
            .code
            .strip_prefix(self.code)
            .is_some_and(|rest| rest.starts_with('.'))
    }
}

/// Rejections of catalog lookups on the write path.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// No account with this code.
    #[error("unknown account '{0}'")]
    UnknownAccount(String),

    /// The account is a category header.
    #[error("account '{0}' is synthetic and does not accept values")]
    SyntheticAccount(String),
}

/// A static, ordered chart of accounts.
#[derive(Debug, Clone, Copy)]
pub struct Catalog {
    accounts: &'static [Account],
}

impl Catalog {
    /// The expense chart.
    #[must_use]
    pub fn expense() -> Self {
        Self {
            accounts: chart::EXPENSE_ACCOUNTS,
        }
    }

    /// The revenue chart.
    #[must_use]
    pub fn revenue() -> Self {
        Self {
            accounts: chart::REVENUE_ACCOUNTS,
        }
    }

    /// All accounts in catalog order.
    #[must_use]
    pub fn accounts(&self) -> &'static [Account] {
        self.accounts
    }

    /// Analytic accounts in catalog order.
    pub fn analytic(&self) -> impl Iterator<Item = &'static Account> + use<> {
        self.accounts.iter().filter(|a| a.is_analytic())
    }

    /// Finds an account by code.
    #[must_use]
    pub fn find(&self, code: &str) -> Option<&'static Account> {
        self.accounts.iter().find(|a| a.code == code)
    }

    /// Finds an analytic account by name, ignoring case and surrounding whitespace.
    #[must_use]
    pub fn find_by_name(&self, name: &str) -> Option<&'static Account> {
        let wanted = name.trim().to_lowercase();
        if wanted.is_empty() {
            return None;
        }
        self.analytic().find(|a| a.name.to_lowercase() == wanted)
    }

    /// Resolves a code that is about to receive a value.
    ///
    /// # Errors
    ///
    /// Fails for unknown codes and for synthetic accounts.
    pub fn require_analytic(&self, code: &str) -> Result<&'static Account, CatalogError> {
        let account = self
            .find(code)
            .ok_or_else(|| CatalogError::UnknownAccount(code.to_string()))?;
        if account.is_analytic() {
            Ok(account)
        } else {
            Err(CatalogError::SyntheticAccount(code.to_string()))
        }
    }

    /// Sums the analytic descendants of `code`.
    ///
    /// For an analytic account this is its own value.
    #[must_use]
    pub fn synthetic_total(&self, code: &str, values: &BTreeMap<String, Decimal>) -> Decimal {
        let Some(root) = self.find(code) else {
            return Decimal::ZERO;
        };
        if root.is_analytic() {
            return values.get(root.code).copied().unwrap_or_default();
        }
        self.analytic()
            .filter(|a| root.is_ancestor_of(a))
            .filter_map(|a| values.get(a.code))
            .copied()
            .sum()
    }
}
