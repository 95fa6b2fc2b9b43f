//! Session model and store access
//!
//! A session is one tutoring conversation: metadata (title, subject,
//! timestamps) plus an ordered list of user and assistant messages.
//! Persistence lives behind [`SessionStore`]; the export pipeline only
//! reads from it.
//!
//! # Example
//!
//! ```ignore
//! use hw_core::session::{MemoryStore, Message, Session, SessionStore};
//!
//! let store = MemoryStore::new();
//! store.insert(session, messages);
//! let loaded = store.get_sessions(&[id])?;
//! ```

mod model;
mod store;

pub use model::{Message, Session, SessionInfo, DEFAULT_SUBJECT, DEFAULT_TITLE};
pub use store::{MemoryStore, SessionStore};
