//! Application configuration management.

use chrono::{DateTime, FixedOffset, Utc};
use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// JWT configuration.
    pub jwt: JwtSettings,
    /// Reporting periods and their deadlines.
    #[serde(default)]
    pub reporting: ReportingConfig,
    /// Administrative settings.
    #[serde(default)]
    pub admin: AdminConfig,
    /// Object storage for legislation documents (optional).
    #[serde(default)]
    pub storage: Option<StorageSettings>,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

/// JWT settings shared with the identity provider.
#[derive(Debug, Clone, Deserialize)]
pub struct JwtSettings {
    /// Secret key used to verify session tokens.
    pub secret: String,
    /// Access token expiration in seconds (tokens issued by tooling).
    #[serde(default = "default_access_token_expiry")]
    pub access_token_expiry_secs: u64,
}

fn default_access_token_expiry() -> u64 {
    3600
}

/// One reporting cycle with its own hard cutoff.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ReportingPeriodConfig {
    /// Reference year of the figures being declared.
    pub year: i32,
    /// Cutoff for submission and rectification (RFC 3339).
    pub deadline: DateTime<FixedOffset>,
}

/// Reporting configuration: one deadline per period.
#[derive(Debug, Clone, Deserialize)]
pub struct ReportingConfig {
    /// Year currently open for data entry.
    #[serde(default = "default_active_year")]
    pub active_year: i32,
    /// Known periods.
    #[serde(default = "default_periods")]
    pub periods: Vec<ReportingPeriodConfig>,
}

fn default_active_year() -> i32 {
    2025
}

fn default_periods() -> Vec<ReportingPeriodConfig> {
    // 31/03/2026 23:59:59 Brasília time.
    let deadline = DateTime::parse_from_rfc3339("2026-03-31T23:59:59-03:00")
        .unwrap_or_else(|_| DateTime::<Utc>::MIN_UTC.fixed_offset());
    vec![ReportingPeriodConfig {
        year: 2025,
        deadline,
    }]
}

impl Default for ReportingConfig {
    fn default() -> Self {
        Self {
            active_year: default_active_year(),
            periods: default_periods(),
        }
    }
}

impl ReportingConfig {
    /// Finds the configuration of a given year.
    #[must_use]
    pub fn period(&self, year: i32) -> Option<&ReportingPeriodConfig> {
        self.periods.iter().find(|p| p.year == year)
    }

    /// Returns the configuration of the active year.
    #[must_use]
    pub fn active_period(&self) -> Option<&ReportingPeriodConfig> {
        self.period(self.active_year)
    }
}

/// Administrative settings.
#[derive(Debug, Clone, Deserialize)]
pub struct AdminConfig {
    /// Account that can never be deleted through moderation.
    #[serde(default = "default_protected_email")]
    pub protected_email: String,
}

fn default_protected_email() -> String {
    "cfa@admin.com".to_string()
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            protected_email: default_protected_email(),
        }
    }
}

/// Object storage settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "provider", rename_all = "snake_case")]
pub enum StorageSettings {
    /// Local filesystem (development only).
    LocalFs {
        /// Root directory.
        root: String,
        /// Base URL the files are served from.
        public_base_url: String,
    },
    /// S3-compatible storage (Supabase Storage, Cloudflare R2, AWS S3).
    S3 {
        /// Endpoint URL.
        endpoint: String,
        /// Bucket name.
        bucket: String,
        /// Access key ID.
        access_key_id: String,
        /// Secret access key.
        secret_access_key: String,
        /// Region.
        #[serde(default = "default_region")]
        region: String,
        /// Base URL the bucket is publicly served from.
        public_base_url: String,
    },
}

fn default_region() -> String {
    "auto".to_string()
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("DECLARA").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_reporting_period() {
        let reporting = ReportingConfig::default();
        let active = reporting.active_period().expect("default period");
        assert_eq!(active.year, 2025);
        assert_eq!(
            active.deadline.with_timezone(&Utc).to_rfc3339(),
            "2026-04-01T02:59:59+00:00"
        );
        assert!(reporting.period(1999).is_none());
    }

    #[test]
    fn test_load_from_environment() {
        temp_env::with_vars(
            [
                ("DECLARA__SERVER__PORT", Some("9090")),
                ("DECLARA__DATABASE__URL", Some("postgres://localhost/declara")),
                ("DECLARA__JWT__SECRET", Some("secret")),
                ("DECLARA__ADMIN__PROTECTED_EMAIL", Some("root@cfa.org.br")),
            ],
            || {
                let config = AppConfig::load().expect("config loads");
                assert_eq!(config.server.port, 9090);
                assert_eq!(config.server.host, "0.0.0.0");
                assert_eq!(config.database.url, "postgres://localhost/declara");
                assert_eq!(config.database.max_connections, 10);
                assert_eq!(config.jwt.secret, "secret");
                assert_eq!(config.admin.protected_email, "root@cfa.org.br");
                assert_eq!(config.reporting.active_year, 2025);
                assert!(config.storage.is_none());
            },
        );
    }
}
