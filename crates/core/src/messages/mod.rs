//! Messages between the national council and the regional councils.
//!
//! Regional councils write to the national council; the national council
//! broadcasts to every regional council. A regional council sees the
//! broadcasts and its own messages, the national council sees everything.

mod error;
mod service;
mod types;

pub use error::MessageError;
pub use service::{MessageRepository, MessageService};
pub use types::{Message, MessageKind};
