//! Storage configuration types.

use std::path::PathBuf;

use declara_shared::StorageSettings;

/// Storage backend.
#[derive(Debug, Clone)]
pub enum StorageProvider {
    /// S3-compatible storage.
    S3 {
        /// S3 endpoint URL.
        endpoint: String,
        /// Bucket name.
        bucket: String,
        /// Access key ID.
        access_key_id: String,
        /// Secret access key.
        secret_access_key: String,
        /// Region.
        region: String,
    },
    /// Local filesystem (development only).
    LocalFs {
        /// Root directory path.
        root: PathBuf,
    },
    /// Process memory, lost on exit.
    Memory,
}

impl StorageProvider {
    /// Get the provider name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::S3 { .. } => "s3",
            Self::LocalFs { .. } => "local",
            Self::Memory => "memory",
        }
    }
}

/// Storage service configuration.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Backend.
    pub provider: StorageProvider,
    /// Base URL stored files are publicly served from.
    pub public_base_url: String,
    /// Maximum file size in bytes.
    pub max_file_size: u64,
    /// Accepted MIME types.
    pub allowed_mime_types: Vec<String>,
}

impl StorageConfig {
    /// Default max file size: 10 MiB.
    pub const DEFAULT_MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

    /// Create a config accepting PDFs up to the default size.
    #[must_use]
    pub fn new(provider: StorageProvider, public_base_url: impl Into<String>) -> Self {
        Self {
            provider,
            public_base_url: public_base_url.into(),
            max_file_size: Self::DEFAULT_MAX_FILE_SIZE,
            allowed_mime_types: vec!["application/pdf".to_string()],
        }
    }

    /// Set maximum file size.
    #[must_use]
    pub fn with_max_file_size(mut self, size: u64) -> Self {
        self.max_file_size = size;
        self
    }

    /// Check if a MIME type is allowed.
    #[must_use]
    pub fn is_mime_type_allowed(&self, mime_type: &str) -> bool {
        self.allowed_mime_types
            .iter()
            .any(|t| t.eq_ignore_ascii_case(mime_type))
    }
}

impl From<&StorageSettings> for StorageConfig {
    fn from(settings: &StorageSettings) -> Self {
        match settings {
            StorageSettings::LocalFs {
                root,
                public_base_url,
            } => Self::new(
                StorageProvider::LocalFs {
                    root: PathBuf::from(root),
                },
                public_base_url.clone(),
            ),
            StorageSettings::S3 {
                endpoint,
                bucket,
                access_key_id,
                secret_access_key,
                region,
                public_base_url,
            } => Self::new(
                StorageProvider::S3 {
                    endpoint: endpoint.clone(),
                    bucket: bucket.clone(),
                    access_key_id: access_key_id.clone(),
                    secret_access_key: secret_access_key.clone(),
                    region: region.clone(),
                },
                public_base_url.clone(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_accept_pdf_only() {
        let config = StorageConfig::new(StorageProvider::Memory, "http://files");
        assert_eq!(config.max_file_size, 10 * 1024 * 1024);
        assert!(config.is_mime_type_allowed("application/pdf"));
        assert!(config.is_mime_type_allowed("Application/PDF"));
        assert!(!config.is_mime_type_allowed("image/png"));
    }

    #[test]
    fn test_from_settings() {
        let settings = StorageSettings::S3 {
            endpoint: "https://xyz.supabase.co/storage/v1/s3".into(),
            bucket: "legislation".into(),
            access_key_id: "key".into(),
            secret_access_key: "secret".into(),
            region: "auto".into(),
            public_base_url: "https://xyz.supabase.co/storage/v1/object/public/legislation".into(),
        };
        let config = StorageConfig::from(&settings);
        assert_eq!(config.provider.name(), "s3");
        assert!(config.public_base_url.ends_with("/legislation"));

        let local = StorageSettings::LocalFs {
            root: "./storage".into(),
            public_base_url: "http://localhost:8080/files".into(),
        };
        assert_eq!(StorageConfig::from(&local).provider.name(), "local");
    }
}
