//! Infrastructure layer: document storage, configuration, background workers.

pub mod config;
pub mod store;
pub mod workers;

pub use config::{AppConfig, ConfigError};
pub use store::{DocumentStore, InMemoryDocumentStore, StoreError, StoreResult};
#[cfg(feature = "postgres")]
pub use store::PostgresDocumentStore;
