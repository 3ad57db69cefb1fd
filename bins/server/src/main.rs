//! Declara API Server
//!
//! Main entry point for the declaration backend.

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use declara_api::{AppState, create_router};
use declara_core::declaration::ReportingPeriod;
use declara_core::storage::{StorageConfig, StorageService};
use declara_db::connect_with;
use declara_shared::{AppConfig, JwtConfig, JwtService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "declara=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load().context("failed to load configuration")?;

    let db = connect_with(&config.database).await?;
    info!("Connected to database");

    let jwt_service = JwtService::new(JwtConfig {
        secret: config.jwt.secret.clone(),
        access_token_expiry_secs: i64::try_from(config.jwt.access_token_expiry_secs)
            .context("jwt.access_token_expiry_secs is out of range")?,
    });

    let period = config
        .reporting
        .active_period()
        .map(ReportingPeriod::from)
        .with_context(|| {
            format!(
                "no reporting period configured for active year {}",
                config.reporting.active_year
            )
        })?;
    info!(year = period.year, deadline = %period.deadline, "Reporting period loaded");

    let storage = match &config.storage {
        Some(settings) => {
            let storage_config = StorageConfig::from(settings);
            info!(provider = storage_config.provider.name(), "Storage configured");
            Some(StorageService::from_config(storage_config)?)
        }
        None => {
            warn!("No storage configured, legislation documents are disabled");
            None
        }
    };

    let state = AppState::new(
        &db,
        jwt_service,
        period,
        &config.admin.protected_email,
        storage,
    );
    let app = create_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
