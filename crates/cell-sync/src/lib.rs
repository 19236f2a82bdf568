//! Remote persistence for painted cells
//!
//! [`SyncGateway`] is the only thing the session talks to. It encodes records
//! into one document per cell and drives any [`RemoteStore`] implementation.

pub mod document;
pub mod errors;
pub mod gateway;
pub mod http_store;
pub mod memory_store;
pub mod store;

pub use errors::{Result, SyncError};
pub use gateway::{PersistReport, SyncGateway, DEFAULT_COLLECTION};
pub use http_store::HttpStore;
pub use memory_store::MemoryStore;
pub use store::{server_timestamp_sentinel, Fields, RemoteStore};
