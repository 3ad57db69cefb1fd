//! Storage service implementation using Apache OpenDAL.

use bytes::Bytes;
use opendal::{Operator, services};
use tracing::debug;

use super::config::{StorageConfig, StorageProvider};
use super::error::StorageError;

/// Public document storage.
#[derive(Debug, Clone)]
pub struct StorageService {
    operator: Operator,
    config: StorageConfig,
}

impl StorageService {
    /// Create a new storage service from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage provider cannot be initialized.
    pub fn from_config(config: StorageConfig) -> Result<Self, StorageError> {
        let operator = Self::create_operator(&config.provider)?;
        Ok(Self { operator, config })
    }

    fn create_operator(provider: &StorageProvider) -> Result<Operator, StorageError> {
        let operator = match provider {
            StorageProvider::S3 {
                endpoint,
                bucket,
                access_key_id,
                secret_access_key,
                region,
            } => {
                let builder = services::S3::default()
                    .endpoint(endpoint)
                    .bucket(bucket)
                    .access_key_id(access_key_id)
                    .secret_access_key(secret_access_key)
                    .region(region);
                Operator::new(builder)
                    .map_err(|e| StorageError::configuration(e.to_string()))?
                    .finish()
            }
            StorageProvider::LocalFs { root } => {
                let root = root
                    .to_str()
                    .ok_or_else(|| StorageError::configuration("invalid path"))?;
                Operator::new(services::Fs::default().root(root))
                    .map_err(|e| StorageError::configuration(e.to_string()))?
                    .finish()
            }
            StorageProvider::Memory => Operator::new(services::Memory::default())
                .map_err(|e| StorageError::configuration(e.to_string()))?
                .finish(),
        };
        Ok(operator)
    }

    /// Validate an upload against the configured constraints.
    ///
    /// # Errors
    ///
    /// Returns an error if the file size or MIME type is not accepted.
    pub fn validate_upload(&self, content_type: &str, size: u64) -> Result<(), StorageError> {
        if size > self.config.max_file_size {
            return Err(StorageError::FileTooLarge {
                size,
                max: self.config.max_file_size,
            });
        }
        if !self.config.is_mime_type_allowed(content_type) {
            return Err(StorageError::InvalidMimeType {
                mime_type: content_type.to_string(),
            });
        }
        Ok(())
    }

    /// Validates and stores a file at `path`.
    ///
    /// # Errors
    ///
    /// Returns a validation error or the backend failure.
    pub async fn upload(
        &self,
        path: &str,
        content_type: &str,
        data: Bytes,
    ) -> Result<(), StorageError> {
        self.validate_upload(content_type, data.len() as u64)?;
        self.operator.write(path, data).await?;
        debug!(path, provider = self.config.provider.name(), "file stored");
        Ok(())
    }

    /// Deletes a file. Missing files are not an error.
    ///
    /// # Errors
    ///
    /// Returns the backend failure.
    pub async fn remove(&self, path: &str) -> Result<(), StorageError> {
        self.operator.delete(path).await.map_err(StorageError::from)
    }

    /// Returns true if a file is stored at `path`.
    #[cfg(test)]
    pub(crate) async fn exists(&self, path: &str) -> bool {
        self.operator.stat(path).await.is_ok()
    }

    /// Public URL of a stored file.
    #[must_use]
    pub fn public_url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.config.public_base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

/// Sanitize a filename for use in a storage path.
///
/// Only ASCII alphanumerics, dots, hyphens and underscores survive; any
/// other character becomes `_`.
#[must_use]
pub fn sanitize_filename(filename: &str) -> String {
    filename
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}
