//! Counter and hardware block definitions
//!
//! These types describe what a device family can measure: the raw hardware
//! counters, the block instances hosting them, and the public counters that
//! are derived from one or more hardware counters.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a raw hardware counter, unique within one catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HardwareCounterId(pub u32);

impl fmt::Display for HardwareCounterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "hw#{}", self.0)
    }
}

/// Identifier of a public (derived) counter, unique within one catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PublicCounterId(pub u32);

impl fmt::Display for PublicCounterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "counter#{}", self.0)
    }
}

/// Position of a block instance in a catalog's block table
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockIndex(pub usize);

/// Mutual-exclusion tag of a hardware block
///
/// Blocks tagged with two different isolated classes can never have active
/// counters in the same pass. `None` blocks share a pass with anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IsolationClass {
    #[default]
    None,
    ShaderSequencer,
    TexturePipeline,
}

impl IsolationClass {
    /// Whether this class locks a pass against other isolated classes
    pub fn is_isolated(self) -> bool {
        !matches!(self, IsolationClass::None)
    }

    /// Whether counters of the two classes may never share a pass
    pub fn conflicts_with(self, other: IsolationClass) -> bool {
        self.is_isolated() && other.is_isolated() && self != other
    }
}

impl fmt::Display for IsolationClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            IsolationClass::None => "none",
            IsolationClass::ShaderSequencer => "shader-sequencer",
            IsolationClass::TexturePipeline => "texture-pipeline",
        };
        f.write_str(name)
    }
}

/// One instance of a functional hardware unit hosting counters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HardwareBlock {
    /// Block type name (e.g. "SQ", "TA", "TCC")
    pub name: String,

    /// Instance index of this block type
    #[serde(default)]
    pub instance: u32,

    /// Maximum number of counters simultaneously active in one pass
    pub capacity: u32,

    /// Isolation class
    #[serde(default)]
    pub isolation: IsolationClass,
}

impl HardwareBlock {
    /// Create a block instance without isolation
    pub fn new(name: impl Into<String>, instance: u32, capacity: u32) -> Self {
        Self {
            name: name.into(),
            instance,
            capacity,
            isolation: IsolationClass::None,
        }
    }

    /// Set the isolation class
    pub fn with_isolation(mut self, isolation: IsolationClass) -> Self {
        self.isolation = isolation;
        self
    }

    /// Display label, e.g. `TA[3]`
    pub fn label(&self) -> String {
        format!("{}[{}]", self.name, self.instance)
    }
}

/// A raw device-level counter exposed by one block instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HardwareCounter {
    pub id: HardwareCounterId,
    pub name: String,
    pub block: BlockIndex,
}

impl HardwareCounter {
    pub fn new(id: u32, name: impl Into<String>, block: usize) -> Self {
        Self {
            id: HardwareCounterId(id),
            name: name.into(),
            block: BlockIndex(block),
        }
    }
}

/// A user-facing counter computed from hardware counters
///
/// The order of `hardware_counters` matters for formula evaluation only; the
/// scheduler treats it as the iteration order when resolving requirements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicCounterDefinition {
    pub id: PublicCounterId,
    pub name: String,
    pub hardware_counters: Vec<HardwareCounterId>,
}

impl PublicCounterDefinition {
    pub fn new(id: u32, name: impl Into<String>, hardware_counters: &[u32]) -> Self {
        Self {
            id: PublicCounterId(id),
            name: name.into(),
            hardware_counters: hardware_counters
                .iter()
                .map(|&hw| HardwareCounterId(hw))
                .collect(),
        }
    }

    /// Check whether this counter depends on the given hardware counter
    pub fn depends_on(&self, hw: HardwareCounterId) -> bool {
        self.hardware_counters.contains(&hw)
    }
}
