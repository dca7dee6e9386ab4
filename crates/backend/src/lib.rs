pub mod client;
pub mod fixtures;
pub mod stores;

pub use client::HttpBackendClient;
pub use fixtures::{BackendCall, InMemoryBackend};
pub use stores::{BackendError, CatalogStore, InvoiceStore};
