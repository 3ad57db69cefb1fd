//! Object storage for uploaded documents using Apache OpenDAL.
//!
//! Files are written once under a generated path and served publicly from
//! `{public_base_url}/{path}`. Supported backends:
//! - S3-compatible: Supabase Storage, Cloudflare R2, AWS S3
//! - Local filesystem (development only)
//! - In-memory (tests)

mod config;
mod error;
mod service;

pub use config::{StorageConfig, StorageProvider};
pub use error::StorageError;
pub use service::{StorageService, sanitize_filename};
