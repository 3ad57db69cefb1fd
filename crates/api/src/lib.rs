//! HTTP API layer with Axum routes and middleware.
//!
//! This crate provides:
//! - REST API routes under `/api/v1`
//! - Session authentication middleware
//! - Domain error to JSON response mapping

pub mod error;
pub mod middleware;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use sea_orm::DatabaseConnection;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use declara_core::batch::SeedService;
use declara_core::consolidation::ConsolidationService;
use declara_core::declaration::{DeclarationService, ReportingPeriod};
use declara_core::entries::EntryService;
use declara_core::legislation::LegislationService;
use declara_core::messages::MessageService;
use declara_core::moderation::ModerationService;
use declara_core::registration::RegistrationService;
use declara_core::storage::StorageService;
use declara_db::{
    ActionLogRepository, ActivityLogRepository, DeclarationRepository, EntryRepository,
    LegislationRepository, MessageRepository, OrganizationRepository, RegistrationRepository,
    ResponsibleRepository, UserRepository,
};
use declara_shared::JwtService;

/// Entry service over the database.
pub type Entries = EntryService<EntryRepository, DeclarationRepository, ActivityLogRepository>;
/// Declaration service over the database.
pub type Declarations = DeclarationService<
    DeclarationRepository,
    EntryRepository,
    ResponsibleRepository,
    ActivityLogRepository,
>;
/// Consolidation service over the database.
pub type Consolidation = ConsolidationService<EntryRepository, OrganizationRepository>;
/// Registration workflow over the database.
pub type Registrations = RegistrationService<
    RegistrationRepository,
    UserRepository,
    ActionLogRepository,
    OrganizationRepository,
>;
/// Moderation service over the database.
pub type Moderation = ModerationService<UserRepository, ActionLogRepository, RegistrationRepository>;
/// Message service over the database.
pub type Messages = MessageService<MessageRepository>;
/// Legislation service over the database.
pub type Legislation = LegislationService<LegislationRepository>;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// JWT service for session validation.
    pub jwt_service: Arc<JwtService>,
    /// Reporting period open for data entry.
    pub period: ReportingPeriod,
    /// Organization catalog.
    pub organizations: Arc<OrganizationRepository>,
    /// Per-organization entries.
    pub entries: Arc<Entries>,
    /// Declarations and responsible persons.
    pub declarations: Arc<Declarations>,
    /// Cross-organization views.
    pub consolidation: Arc<Consolidation>,
    /// Administrative test data jobs.
    pub seeder: Arc<SeedService<EntryRepository>>,
    /// Registration requests.
    pub registrations: Arc<Registrations>,
    /// User moderation.
    pub moderation: Arc<Moderation>,
    /// Messages between councils.
    pub messages: Arc<Messages>,
    /// Legislation documents; `None` when no storage is configured.
    pub legislation: Option<Arc<Legislation>>,
}

impl AppState {
    /// Wires every service to the repositories of one database connection.
    #[must_use]
    pub fn new(
        db: &DatabaseConnection,
        jwt_service: JwtService,
        period: ReportingPeriod,
        protected_email: &str,
        storage: Option<StorageService>,
    ) -> Self {
        let organizations = Arc::new(OrganizationRepository::new(db.clone()));
        let entries = Arc::new(EntryRepository::new(db.clone()));
        let declarations = Arc::new(DeclarationRepository::new(db.clone()));
        let responsible = Arc::new(ResponsibleRepository::new(db.clone()));
        let users = Arc::new(UserRepository::new(db.clone()));
        let actions = Arc::new(ActionLogRepository::new(db.clone()));
        let requests = Arc::new(RegistrationRepository::new(db.clone()));
        let activity = Arc::new(ActivityLogRepository::new(db.clone()));

        let legislation = storage.map(|storage| {
            Arc::new(LegislationService::new(
                Arc::new(LegislationRepository::new(db.clone())),
                storage,
            ))
        });

        Self {
            jwt_service: Arc::new(jwt_service),
            period,
            organizations: organizations.clone(),
            entries: Arc::new(EntryService::new(
                entries.clone(),
                declarations.clone(),
                activity.clone(),
                period,
            )),
            declarations: Arc::new(DeclarationService::new(
                declarations,
                entries.clone(),
                responsible,
                activity,
                period,
            )),
            consolidation: Arc::new(ConsolidationService::new(
                entries.clone(),
                organizations.clone(),
            )),
            seeder: Arc::new(SeedService::new(entries)),
            registrations: Arc::new(RegistrationService::new(
                requests.clone(),
                users.clone(),
                actions.clone(),
                organizations,
            )),
            moderation: Arc::new(ModerationService::new(
                users,
                actions,
                requests,
                protected_email,
            )),
            messages: Arc::new(MessageService::new(Arc::new(MessageRepository::new(
                db.clone(),
            )))),
            legislation,
        }
    }
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes_with_state(state.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
