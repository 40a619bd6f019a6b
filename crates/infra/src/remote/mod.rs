//! Remote catalog access over HTTP.

mod client;
mod errors;
mod types;

pub use client::{GoCampingClient, GoCampingClientConfig};
pub use errors::{SyncError, SyncErrorCategory};
pub use types::{CatalogBody, CatalogEnvelope, CatalogHeader, CatalogItem, CatalogItems};
