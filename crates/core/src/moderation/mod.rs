//! User moderation by administrators.

mod error;
mod service;

pub use error::ModerationError;
pub use service::ModerationService;
