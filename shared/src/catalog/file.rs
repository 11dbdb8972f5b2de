//! On-disk catalog description
//!
//! Catalog files are written in JSON or TOML. Block types are declared once
//! with an instance count and expanded into one block per instance; hardware
//! counters refer to their block by name and instance.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use super::registry::{Api, DeviceFamily};
use super::StaticCatalog;
use crate::error::{CatalogError, CatalogResult};
use crate::types::counter::{
    BlockIndex, HardwareBlock, HardwareCounter, HardwareCounterId, IsolationClass,
    PublicCounterDefinition, PublicCounterId,
};

fn one() -> u32 {
    1
}

/// A block type and how many instances the device has
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockSpec {
    pub name: String,

    #[serde(default = "one")]
    pub instances: u32,

    /// Per-instance counter capacity
    pub capacity: u32,

    #[serde(default)]
    pub isolation: IsolationClass,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HardwareCounterSpec {
    pub id: u32,
    pub name: String,
    pub block: String,

    #[serde(default)]
    pub instance: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicCounterSpec {
    pub id: u32,
    pub name: String,
    pub hardware_counters: Vec<u32>,
}

/// Serialized form of one catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogFile {
    /// API this catalog applies to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api: Option<Api>,

    /// Device family this catalog applies to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family: Option<DeviceFamily>,

    pub blocks: Vec<BlockSpec>,

    pub hardware_counters: Vec<HardwareCounterSpec>,

    #[serde(default)]
    pub public_counters: Vec<PublicCounterSpec>,
}

impl CatalogFile {
    /// Load a catalog file, choosing the parser by extension (`.json` or `.toml`)
    pub fn from_path(path: impl AsRef<Path>) -> CatalogResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        let file = match extension.as_str() {
            "json" => Self::from_json_str(&contents)?,
            "toml" => Self::from_toml_str(&contents)?,
            other => return Err(CatalogError::UnsupportedFormat(other.to_string())),
        };

        info!(
            "Loaded catalog file {}: {} block types, {} hardware counters, {} public counters",
            path.display(),
            file.blocks.len(),
            file.hardware_counters.len(),
            file.public_counters.len()
        );

        Ok(file)
    }

    pub fn from_json_str(s: &str) -> CatalogResult<Self> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn from_toml_str(s: &str) -> CatalogResult<Self> {
        Ok(toml::from_str(s)?)
    }

    /// The (API, family) pair, if the file declares both
    pub fn context(&self) -> Option<(Api, DeviceFamily)> {
        self.api.zip(self.family)
    }

    /// Expand block instances, resolve block names and validate the tables
    pub fn into_catalog(self) -> CatalogResult<StaticCatalog> {
        let mut blocks = Vec::new();
        let mut by_name: HashMap<(String, u32), usize> = HashMap::new();
        let mut declared = HashSet::new();

        for spec in &self.blocks {
            if !declared.insert(spec.name.as_str()) {
                return Err(CatalogError::DuplicateBlock {
                    block: spec.name.clone(),
                });
            }
            for instance in 0..spec.instances {
                by_name.insert((spec.name.clone(), instance), blocks.len());
                blocks.push(
                    HardwareBlock::new(spec.name.clone(), instance, spec.capacity)
                        .with_isolation(spec.isolation),
                );
            }
        }

        let hardware = self
            .hardware_counters
            .into_iter()
            .map(|spec| {
                let index = by_name
                    .get(&(spec.block.clone(), spec.instance))
                    .copied()
                    .ok_or_else(|| CatalogError::UnknownBlockName {
                        counter: spec.name.clone(),
                        block: spec.block.clone(),
                        instance: spec.instance,
                    })?;
                Ok(HardwareCounter {
                    id: HardwareCounterId(spec.id),
                    name: spec.name,
                    block: BlockIndex(index),
                })
            })
            .collect::<CatalogResult<Vec<_>>>()?;

        let public = self
            .public_counters
            .into_iter()
            .map(|spec| PublicCounterDefinition {
                id: PublicCounterId(spec.id),
                name: spec.name,
                hardware_counters: spec
                    .hardware_counters
                    .into_iter()
                    .map(HardwareCounterId)
                    .collect(),
            })
            .collect();

        StaticCatalog::new(blocks, hardware, public)
    }
}
