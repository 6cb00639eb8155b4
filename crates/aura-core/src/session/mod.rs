//! Session domain module.
//!
//! # Module Structure
//!
//! - `model`: Turns and the conversation context seed
//! - `repository`: Repository trait for the append-only session log
//! - `manager`: Session lifecycle for one process run (`SessionManager`)

mod manager;
mod model;
mod repository;

// Re-export public API
pub use manager::SessionManager;
pub use model::{ConversationContext, ConversationMessage, MessageRole, Turn};
pub use repository::SessionLogRepository;
