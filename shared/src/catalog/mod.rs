//! Hardware counter catalogs
//!
//! A catalog describes one (API, device family) context: its block instances
//! with their capacities and isolation classes, its raw hardware counters, and
//! the public counters derived from them. Catalogs are loaded once and never
//! mutated; schedulers borrow them.

pub mod file;
pub mod registry;

use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::error::{CatalogError, CatalogResult};
use crate::types::counter::{
    BlockIndex, HardwareBlock, HardwareCounter, HardwareCounterId, PublicCounterDefinition,
    PublicCounterId,
};

pub use file::CatalogFile;
pub use registry::{Api, CatalogRegistry, DeviceFamily};

/// Read-only lookups the scheduler needs from a catalog
pub trait CounterCatalog {
    /// Look up a public counter definition
    fn public_counter(&self, id: PublicCounterId) -> Option<&PublicCounterDefinition>;

    /// All public counters, in catalog order
    fn public_counters(&self) -> &[PublicCounterDefinition];

    /// Look up a hardware counter
    fn hardware_counter(&self, id: HardwareCounterId) -> Option<&HardwareCounter>;

    /// Look up a block instance
    fn block(&self, index: BlockIndex) -> Option<&HardwareBlock>;

    /// Block instance hosting a hardware counter
    fn block_of(&self, id: HardwareCounterId) -> Option<(BlockIndex, &HardwareBlock)> {
        let counter = self.hardware_counter(id)?;
        self.block(counter.block).map(|block| (counter.block, block))
    }

    /// Find a public counter by name (case-insensitive)
    fn find_public_counter(&self, name: &str) -> Option<PublicCounterId> {
        self.public_counters()
            .iter()
            .find(|counter| counter.name.eq_ignore_ascii_case(name))
            .map(|counter| counter.id)
    }
}

/// Table-backed catalog, validated on construction
#[derive(Debug, Clone)]
pub struct StaticCatalog {
    blocks: Vec<HardwareBlock>,
    hardware: Vec<HardwareCounter>,
    hardware_index: HashMap<HardwareCounterId, usize>,
    public: Vec<PublicCounterDefinition>,
    public_index: HashMap<PublicCounterId, usize>,
}

impl StaticCatalog {
    /// Build a catalog from its tables.
    ///
    /// Rejects zero-capacity blocks, repeated block instances, duplicate ids, dangling block indices,
    /// public counters without dependencies and public counters depending on
    /// unknown hardware counters.
    pub fn new(
        blocks: Vec<HardwareBlock>,
        hardware: Vec<HardwareCounter>,
        public: Vec<PublicCounterDefinition>,
    ) -> CatalogResult<Self> {
        if let Some(block) = blocks.iter().find(|b| b.capacity == 0) {
            return Err(CatalogError::ZeroCapacity {
                block: block.label(),
            });
        }

        let mut labels = HashSet::with_capacity(blocks.len());
        if let Some(block) = blocks
            .iter()
            .find(|b| !labels.insert((b.name.as_str(), b.instance)))
        {
            return Err(CatalogError::DuplicateBlock {
                block: block.label(),
            });
        }

        let mut hardware_index = HashMap::with_capacity(hardware.len());
        for (pos, counter) in hardware.iter().enumerate() {
            if counter.block.0 >= blocks.len() {
                return Err(CatalogError::MissingBlock {
                    counter: counter.id,
                    block: counter.block.0,
                });
            }
            if hardware_index.insert(counter.id, pos).is_some() {
                return Err(CatalogError::DuplicateHardwareCounter(counter.id));
            }
        }

        let mut public_index = HashMap::with_capacity(public.len());
        for (pos, counter) in public.iter().enumerate() {
            if counter.hardware_counters.is_empty() {
                return Err(CatalogError::EmptyDefinition(counter.id));
            }
            if let Some(&missing) = counter
                .hardware_counters
                .iter()
                .find(|hw| !hardware_index.contains_key(hw))
            {
                return Err(CatalogError::UnknownHardwareCounter {
                    counter: counter.id,
                    hardware: missing,
                });
            }
            if public_index.insert(counter.id, pos).is_some() {
                return Err(CatalogError::DuplicatePublicCounter(counter.id));
            }
        }

        debug!(
            "Catalog built: {} blocks, {} hardware counters, {} public counters",
            blocks.len(),
            hardware.len(),
            public.len()
        );

        Ok(Self {
            blocks,
            hardware,
            hardware_index,
            public,
            public_index,
        })
    }

    /// All block instances, indexed by `BlockIndex`
    pub fn blocks(&self) -> &[HardwareBlock] {
        &self.blocks
    }

    /// All hardware counters, in catalog order
    pub fn hardware_counters(&self) -> &[HardwareCounter] {
        &self.hardware
    }
}

impl CounterCatalog for StaticCatalog {
    fn public_counter(&self, id: PublicCounterId) -> Option<&PublicCounterDefinition> {
        self.public_index.get(&id).map(|&pos| &self.public[pos])
    }

    fn public_counters(&self) -> &[PublicCounterDefinition] {
        &self.public
    }

    fn hardware_counter(&self, id: HardwareCounterId) -> Option<&HardwareCounter> {
        self.hardware_index.get(&id).map(|&pos| &self.hardware[pos])
    }

    fn block(&self, index: BlockIndex) -> Option<&HardwareBlock> {
        self.blocks.get(index.0)
    }
}
