//! `SeaORM` entities, one module per table.

pub mod declarations;
pub mod entry_history;
pub mod expenses;
pub mod legislation_documents;
pub mod messages;
pub mod organization_activity_log;
pub mod organizations;
pub mod responsible_persons;
pub mod revenues;
pub mod user_actions_log;
pub mod user_registration_requests;
pub mod users;
