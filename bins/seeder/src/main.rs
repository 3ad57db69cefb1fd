//! Database seeder for Declara.
//!
//! Creates or refreshes the 28 councils of the catalog. With `--random`
//! every analytic account of every council is also filled with random
//! figures, for local development only.
//!
//! Usage: cargo run --bin seeder [-- --random]

use std::sync::Arc;

use anyhow::Context;
use rand::{SeedableRng, rngs::StdRng};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use declara_core::batch::SeedService;
use declara_core::organization::{ORGANIZATION_SEEDS, OrganizationRepository as _};
use declara_db::{EntryRepository, OrganizationRepository, connect_with};
use declara_shared::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "declara=info,seeder=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let random = std::env::args().skip(1).any(|arg| arg == "--random");

    let config = AppConfig::load().context("failed to load configuration")?;
    let db = connect_with(&config.database).await?;
    info!("Connected to database");

    let organizations = OrganizationRepository::new(db.clone());
    let mut seeded = Vec::with_capacity(ORGANIZATION_SEEDS.len());
    for seed in &ORGANIZATION_SEEDS {
        let org = organizations
            .upsert_by_name(seed)
            .await
            .with_context(|| format!("failed to seed {}", seed.name))?;
        seeded.push(org);
    }
    info!(count = seeded.len(), "Organization catalog seeded");

    if random {
        let seeder = SeedService::new(Arc::new(EntryRepository::new(db)));
        let mut rng = StdRng::from_os_rng();
        let report = seeder.seed_random(&seeded, &mut rng).await;
        for warning in &report.warnings {
            warn!("{warning}");
        }
        info!(
            succeeded = report.succeeded(),
            failed = report.failed(),
            skipped = report.skipped(),
            "Random figures seeded"
        );
        if report.failed() > 0 {
            anyhow::bail!("random seeding stopped after {} failure(s)", report.failed());
        }
    }

    Ok(())
}
