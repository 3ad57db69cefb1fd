//! In-memory implementation of every repository trait, for service tests.

use std::collections::{BTreeMap, HashSet};
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use declara_shared::Principal;
use declara_shared::types::{
    DeclarationId, DocumentId, MessageId, OrganizationId, OrganizationKind, PageRequest,
    RegistrationRequestId, Role, UserId,
};
use rust_decimal::Decimal;

use crate::audit::{
    ActionLogRepository, ActivityLogRepository, OrganizationActivity, UserActionLogEntry,
};
use crate::declaration::{
    Declaration, DeclarationRepository, DeclarationStatus, DocumentType, ResponsibleData,
    ResponsibleRepository,
};
use crate::entries::{
    ClearedData, EntryChange, EntryRepository, ExpenseAmounts, ExpenseRow, ExpenseValues,
    RevenueRow, RevenueValues,
};
use crate::legislation::{LegislationDocument, LegislationRepository};
use crate::messages::{Message, MessageKind, MessageRepository};
use crate::organization::{ORGANIZATION_SEEDS, Organization, OrganizationRepository, OrganizationSeed};
use crate::registration::{RegistrationRepository, RegistrationRequest, RegistrationStatus};
use crate::store::StoreError;
use crate::user::{UserProfile, UserRepository, UserStatus};

#[derive(Default)]
struct State {
    organizations: Vec<Organization>,
    expenses: BTreeMap<(OrganizationId, String), ExpenseAmounts>,
    revenues: BTreeMap<(OrganizationId, String), Decimal>,
    history: Vec<EntryChange>,
    declarations: Vec<Declaration>,
    responsible: BTreeMap<OrganizationId, ResponsibleData>,
    users: Vec<UserProfile>,
    requests: Vec<RegistrationRequest>,
    actions: Vec<UserActionLogEntry>,
    activity: Vec<OrganizationActivity>,
    messages: Vec<Message>,
    documents: Vec<LegislationDocument>,
    failing_expense_orgs: HashSet<OrganizationId>,
    failing_revenue_orgs: HashSet<OrganizationId>,
    fail_declaration_writes: bool,
    fail_document_inserts: bool,
}

/// Repository double backed by a mutex-guarded state, with failure switches.
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

fn injected() -> StoreError {
    StoreError::backend("injected failure")
}

fn page_of<T: Clone>(items: &[T], page: &PageRequest) -> (Vec<T>, u64) {
    let total = items.len() as u64;
    let offset = usize::try_from(page.offset()).unwrap();
    let limit = usize::try_from(page.limit()).unwrap();
    (
        items.iter().skip(offset).take(limit).cloned().collect(),
        total,
    )
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Upserts the fixed organization catalog and returns it ordered by name.
    pub async fn seed_organizations(&self) -> Vec<Organization> {
        for seed in &ORGANIZATION_SEEDS {
            self.upsert_by_name(seed).await.unwrap();
        }
        OrganizationRepository::list(self).await.unwrap()
    }

    pub fn put_expense(&self, org: OrganizationId, code: &str, total: Decimal, finalistica: Decimal) {
        self.state.lock().unwrap().expenses.insert(
            (org, code.to_string()),
            ExpenseAmounts { total, finalistica },
        );
    }

    pub fn put_revenue(&self, org: OrganizationId, code: &str, value: Decimal) {
        self.state
            .lock()
            .unwrap()
            .revenues
            .insert((org, code.to_string()), value);
    }

    pub fn fail_declaration_writes(&self, fail: bool) {
        self.state.lock().unwrap().fail_declaration_writes = fail;
    }

    pub fn fail_expense_batches_for(&self, org: OrganizationId) {
        self.state.lock().unwrap().failing_expense_orgs.insert(org);
    }

    pub fn fail_revenue_batches_for(&self, org: OrganizationId) {
        self.state.lock().unwrap().failing_revenue_orgs.insert(org);
    }

    pub fn fail_document_inserts(&self, fail: bool) {
        self.state.lock().unwrap().fail_document_inserts = fail;
    }
}

/// A regular user of a fresh organization of the given kind.
pub fn principal_for(kind: OrganizationKind) -> Principal {
    Principal {
        user_id: UserId::new(),
        organization_id: OrganizationId::new(),
        organization_type: kind,
        role: Role::User,
    }
}

/// An administrator of the national council.
pub fn admin_principal() -> Principal {
    Principal {
        role: Role::Admin,
        ..principal_for(OrganizationKind::Cfa)
    }
}

/// Complete responsible data.
pub fn responsible_fixture() -> ResponsibleData {
    ResponsibleData {
        unit_responsible_name: "Ana Presidente".to_string(),
        unit_responsible_cra_number: "CRA-SP 12345".to_string(),
        data_responsible_name: "Carlos Contador".to_string(),
        data_responsible_role: "Contador".to_string(),
        data_responsible_doc_type: DocumentType::Crc,
        data_responsible_doc_number: "SP-123456/O".to_string(),
        cnpj: None,
    }
}

impl OrganizationRepository for MemoryStore {
    async fn list(&self) -> Result<Vec<Organization>, StoreError> {
        let mut orgs = self.state.lock().unwrap().organizations.clone();
        orgs.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(orgs)
    }

    async fn find(&self, id: OrganizationId) -> Result<Option<Organization>, StoreError> {
        let state = self.state.lock().unwrap();
        Ok(state.organizations.iter().find(|o| o.id == id).cloned())
    }

    async fn upsert_by_name(&self, seed: &OrganizationSeed) -> Result<Organization, StoreError> {
        let mut state = self.state.lock().unwrap();
        if let Some(existing) = state.organizations.iter_mut().find(|o| o.name == seed.name) {
            existing.kind = seed.kind;
            existing.state = seed.state.to_string();
            return Ok(existing.clone());
        }
        let org = Organization {
            id: OrganizationId::new(),
            name: seed.name.to_string(),
            kind: seed.kind,
            state: seed.state.to_string(),
        };
        state.organizations.push(org.clone());
        Ok(org)
    }
}

impl EntryRepository for MemoryStore {
    async fn load_expenses(&self, organization_id: OrganizationId) -> Result<ExpenseValues, StoreError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .expenses
            .iter()
            .filter(|((org, _), _)| *org == organization_id)
            .map(|((_, code), amounts)| (code.clone(), *amounts))
            .collect())
    }

    async fn load_revenues(&self, organization_id: OrganizationId) -> Result<RevenueValues, StoreError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .revenues
            .iter()
            .filter(|((org, _), _)| *org == organization_id)
            .map(|((_, code), value)| (code.clone(), *value))
            .collect())
    }

    async fn upsert_expenses(
        &self,
        organization_id: OrganizationId,
        rows: &[(String, ExpenseAmounts)],
    ) -> Result<(), StoreError> {
        let mut state = self.state.lock().unwrap();
        if state.failing_expense_orgs.contains(&organization_id) {
            return Err(injected());
        }
        for (code, amounts) in rows {
            state.expenses.insert((organization_id, code.clone()), *amounts);
        }
        Ok(())
    }

    async fn upsert_revenues(
        &self,
        organization_id: OrganizationId,
        rows: &[(String, Decimal)],
    ) -> Result<(), StoreError> {
        let mut state = self.state.lock().unwrap();
        if state.failing_revenue_orgs.contains(&organization_id) {
            return Err(injected());
        }
        for (code, value) in rows {
            state.revenues.insert((organization_id, code.clone()), *value);
        }
        Ok(())
    }

    async fn all_expenses(&self) -> Result<Vec<ExpenseRow>, StoreError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .expenses
            .iter()
            .map(|((org, code), amounts)| ExpenseRow {
                organization_id: *org,
                account_id: code.clone(),
                amounts: *amounts,
            })
            .collect())
    }

    async fn all_revenues(&self) -> Result<Vec<RevenueRow>, StoreError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .revenues
            .iter()
            .map(|((org, code), value)| RevenueRow {
                organization_id: *org,
                account_id: code.clone(),
                value: *value,
            })
            .collect())
    }

    async fn clear_all(&self) -> Result<ClearedData, StoreError> {
        let mut state = self.state.lock().unwrap();
        let cleared = ClearedData {
            expenses: state.expenses.len() as u64,
            revenues: state.revenues.len() as u64,
        };
        state.expenses.clear();
        state.revenues.clear();
        Ok(cleared)
    }

    async fn append_history(&self, changes: &[EntryChange]) -> Result<(), StoreError> {
        self.state
            .lock()
            .unwrap()
            .history
            .extend_from_slice(changes);
        Ok(())
    }

    async fn list_history(&self, organization_id: OrganizationId) -> Result<Vec<EntryChange>, StoreError> {
        let state = self.state.lock().unwrap();
        let mut changes: Vec<_> = state
            .history
            .iter()
            .rev()
            .filter(|c| c.organization_id == organization_id)
            .cloned()
            .collect();
        changes.sort_by(|a, b| b.changed_at.cmp(&a.changed_at));
        Ok(changes)
    }
}

impl DeclarationRepository for MemoryStore {
    async fn latest(
        &self,
        organization_id: OrganizationId,
        period_year: i32,
    ) -> Result<Option<Declaration>, StoreError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .declarations
            .iter()
            .rev()
            .find(|d| d.organization_id == organization_id && d.period_year == period_year)
            .cloned())
    }

    async fn history(
        &self,
        organization_id: OrganizationId,
        period_year: i32,
    ) -> Result<Vec<Declaration>, StoreError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .declarations
            .iter()
            .rev()
            .filter(|d| d.organization_id == organization_id && d.period_year == period_year)
            .cloned()
            .collect())
    }

    async fn insert(&self, declaration: &Declaration) -> Result<(), StoreError> {
        let mut state = self.state.lock().unwrap();
        if state.fail_declaration_writes {
            return Err(injected());
        }
        state.declarations.push(declaration.clone());
        Ok(())
    }

    async fn set_status(&self, id: DeclarationId, status: DeclarationStatus) -> Result<(), StoreError> {
        let mut state = self.state.lock().unwrap();
        if state.fail_declaration_writes {
            return Err(injected());
        }
        if let Some(declaration) = state.declarations.iter_mut().find(|d| d.id == id) {
            declaration.status = status;
        }
        Ok(())
    }
}

impl ResponsibleRepository for MemoryStore {
    async fn find(&self, organization_id: OrganizationId) -> Result<Option<ResponsibleData>, StoreError> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .responsible
            .get(&organization_id)
            .cloned())
    }

    async fn upsert(&self, organization_id: OrganizationId, data: &ResponsibleData) -> Result<(), StoreError> {
        self.state
            .lock()
            .unwrap()
            .responsible
            .insert(organization_id, data.clone());
        Ok(())
    }
}

impl UserRepository for MemoryStore {
    async fn find(&self, id: UserId) -> Result<Option<UserProfile>, StoreError> {
        let state = self.state.lock().unwrap();
        Ok(state.users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserProfile>, StoreError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .users
            .iter()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn list(&self, page: &PageRequest) -> Result<(Vec<UserProfile>, u64), StoreError> {
        let mut users = self.state.lock().unwrap().users.clone();
        users.sort_by(|a, b| a.full_name.cmp(&b.full_name).then(a.email.cmp(&b.email)));
        Ok(page_of(&users, page))
    }

    async fn upsert(&self, profile: &UserProfile) -> Result<(), StoreError> {
        let mut state = self.state.lock().unwrap();
        state.users.retain(|u| u.id != profile.id);
        state.users.push(profile.clone());
        Ok(())
    }

    async fn set_status(&self, id: UserId, status: UserStatus) -> Result<bool, StoreError> {
        let mut state = self.state.lock().unwrap();
        Ok(state
            .users
            .iter_mut()
            .find(|u| u.id == id)
            .map(|u| u.status = status)
            .is_some())
    }

    async fn delete(&self, id: UserId) -> Result<(), StoreError> {
        self.state.lock().unwrap().users.retain(|u| u.id != id);
        Ok(())
    }

    async fn delete_by_email(&self, email: &str) -> Result<u64, StoreError> {
        let mut state = self.state.lock().unwrap();
        let before = state.users.len();
        state.users.retain(|u| !u.email.eq_ignore_ascii_case(email));
        Ok((before - state.users.len()) as u64)
    }
}

impl RegistrationRepository for MemoryStore {
    async fn insert(&self, request: &RegistrationRequest) -> Result<(), StoreError> {
        self.state.lock().unwrap().requests.push(request.clone());
        Ok(())
    }

    async fn find(&self, id: RegistrationRequestId) -> Result<Option<RegistrationRequest>, StoreError> {
        let state = self.state.lock().unwrap();
        Ok(state.requests.iter().find(|r| r.id == id).cloned())
    }

    async fn list(&self, status: Option<RegistrationStatus>) -> Result<Vec<RegistrationRequest>, StoreError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .requests
            .iter()
            .rev()
            .filter(|r| status.is_none_or(|s| r.status == s))
            .cloned()
            .collect())
    }

    async fn delete_by_email(&self, email: &str) -> Result<u64, StoreError> {
        let mut state = self.state.lock().unwrap();
        let before = state.requests.len();
        state.requests.retain(|r| r.email != email);
        Ok((before - state.requests.len()) as u64)
    }

    async fn delete_by_cpf(&self, cpf: &str) -> Result<u64, StoreError> {
        let mut state = self.state.lock().unwrap();
        let before = state.requests.len();
        state.requests.retain(|r| r.cpf != cpf);
        Ok((before - state.requests.len()) as u64)
    }

    async fn delete_other_by_identity(
        &self,
        keep: RegistrationRequestId,
        email: &str,
        cpf: &str,
    ) -> Result<u64, StoreError> {
        let mut state = self.state.lock().unwrap();
        let before = state.requests.len();
        state
            .requests
            .retain(|r| r.id == keep || (r.email != email && r.cpf != cpf));
        Ok((before - state.requests.len()) as u64)
    }

    async fn set_status(
        &self,
        id: RegistrationRequestId,
        status: RegistrationStatus,
        rejection_reason: Option<&str>,
        reviewed_at: DateTime<Utc>,
    ) -> Result<bool, StoreError> {
        let mut state = self.state.lock().unwrap();
        let Some(request) = state
            .requests
            .iter_mut()
            .find(|r| r.id == id && r.status == RegistrationStatus::Pending)
        else {
            return Ok(false);
        };
        request.status = status;
        request.rejection_reason = rejection_reason.map(str::to_string);
        request.reviewed_at = Some(reviewed_at);
        Ok(true)
    }
}

impl ActionLogRepository for MemoryStore {
    async fn append(&self, entry: &UserActionLogEntry) -> Result<(), StoreError> {
        self.state.lock().unwrap().actions.push(entry.clone());
        Ok(())
    }

    async fn list(&self, page: &PageRequest) -> Result<(Vec<UserActionLogEntry>, u64), StoreError> {
        let newest_first: Vec<_> = self
            .state
            .lock()
            .unwrap()
            .actions
            .iter()
            .rev()
            .cloned()
            .collect();
        Ok(page_of(&newest_first, page))
    }
}

impl ActivityLogRepository for MemoryStore {
    async fn append_activity(&self, entry: &OrganizationActivity) -> Result<(), StoreError> {
        self.state.lock().unwrap().activity.push(entry.clone());
        Ok(())
    }

    async fn list_activity(
        &self,
        organization_id: OrganizationId,
    ) -> Result<Vec<OrganizationActivity>, StoreError> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .activity
            .iter()
            .rev()
            .filter(|a| a.organization_id == organization_id)
            .cloned()
            .collect())
    }
}

impl MessageRepository for MemoryStore {
    async fn insert(&self, message: &Message) -> Result<(), StoreError> {
        self.state.lock().unwrap().messages.push(message.clone());
        Ok(())
    }

    async fn find(&self, id: MessageId) -> Result<Option<Message>, StoreError> {
        let state = self.state.lock().unwrap();
        Ok(state.messages.iter().find(|m| m.id == id).cloned())
    }

    async fn list(&self, viewer: Option<OrganizationId>) -> Result<Vec<Message>, StoreError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .messages
            .iter()
            .rev()
            .filter(|m| {
                viewer.is_none_or(|org| m.kind == MessageKind::CfaToCras || m.sender_org == org)
            })
            .cloned()
            .collect())
    }

    async fn mark_read(&self, id: MessageId) -> Result<bool, StoreError> {
        let mut state = self.state.lock().unwrap();
        Ok(state
            .messages
            .iter_mut()
            .find(|m| m.id == id)
            .map(|m| m.read = true)
            .is_some())
    }
}

impl LegislationRepository for MemoryStore {
    async fn insert(&self, document: &LegislationDocument) -> Result<(), StoreError> {
        let mut state = self.state.lock().unwrap();
        if state.fail_document_inserts {
            return Err(injected());
        }
        state.documents.push(document.clone());
        Ok(())
    }

    async fn find(&self, id: DocumentId) -> Result<Option<LegislationDocument>, StoreError> {
        let state = self.state.lock().unwrap();
        Ok(state.documents.iter().find(|d| d.id == id).cloned())
    }

    async fn list(&self) -> Result<Vec<LegislationDocument>, StoreError> {
        let mut documents = self.state.lock().unwrap().documents.clone();
        documents.sort_by_key(|d| d.display_order);
        Ok(documents)
    }

    async fn max_display_order(&self) -> Result<Option<i32>, StoreError> {
        let state = self.state.lock().unwrap();
        Ok(state.documents.iter().map(|d| d.display_order).max())
    }

    async fn set_display_order(&self, order: &[(DocumentId, i32)]) -> Result<(), StoreError> {
        let mut state = self.state.lock().unwrap();
        for (id, position) in order {
            if let Some(document) = state.documents.iter_mut().find(|d| d.id == *id) {
                document.display_order = *position;
            }
        }
        Ok(())
    }

    async fn delete(&self, id: DocumentId) -> Result<(), StoreError> {
        self.state.lock().unwrap().documents.retain(|d| d.id != id);
        Ok(())
    }
}
