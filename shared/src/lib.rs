//! Shared types and catalogs for Counterpass
//!
//! This crate contains the counter data model, the hardware catalog contract
//! used by the pass scheduler, and the table-backed catalogs that implement it.

pub mod catalog;
pub mod error;
pub mod types;

// Re-export commonly used types
pub use catalog::{
    Api, CatalogFile, CatalogRegistry, CounterCatalog, DeviceFamily, StaticCatalog,
};
pub use error::{CatalogError, CatalogResult};
pub use types::{counter::*, location::*};
