//! # kurier-store
//!
//! In-memory data store for the kurier messaging / device-control backend.
//!
//! Three append-only collections (users, messages, devices) live behind one
//! `tokio::sync::RwLock` each.  The store handles are cheap to clone; every
//! clone shares the same underlying collection, so they can be dropped into
//! the HTTP layer's application state directly.  Nothing is persisted —
//! lifetime equals process lifetime.

pub mod constants;
pub mod devices;
pub mod id;
pub mod messages;
pub mod models;
pub mod users;

pub use devices::DeviceStore;
pub use messages::MessageStore;
pub use models::*;
pub use users::UserStore;
