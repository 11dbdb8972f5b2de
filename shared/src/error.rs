//! Catalog errors

use crate::types::counter::{HardwareCounterId, PublicCounterId};

/// Errors raised while building, loading or selecting a hardware catalog
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("block {block} has zero counter capacity")]
    ZeroCapacity { block: String },

    #[error("block {block} is declared more than once")]
    DuplicateBlock { block: String },

    #[error("duplicate hardware counter id {0}")]
    DuplicateHardwareCounter(HardwareCounterId),

    #[error("duplicate public counter id {0}")]
    DuplicatePublicCounter(PublicCounterId),

    #[error("hardware counter {counter} references missing block index {block}")]
    MissingBlock { counter: HardwareCounterId, block: usize },

    #[error("public counter {counter} depends on unknown hardware counter {hardware}")]
    UnknownHardwareCounter {
        counter: PublicCounterId,
        hardware: HardwareCounterId,
    },

    #[error("public counter {0} has no hardware counters")]
    EmptyDefinition(PublicCounterId),

    #[error("hardware counter {counter} names unknown block {block}[{instance}]")]
    UnknownBlockName {
        counter: String,
        block: String,
        instance: u32,
    },

    #[error("no catalog registered for {api} on {family}")]
    UnsupportedContext { api: String, family: String },

    #[error("invalid {kind}: {value}")]
    InvalidName { kind: &'static str, value: String },

    #[error("unsupported catalog file extension: {0}")]
    UnsupportedFormat(String),

    #[error("failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse JSON catalog: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to parse TOML catalog: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Result type for catalog operations
pub type CatalogResult<T> = Result<T, CatalogError>;
