//! Schedule summaries for reporting

use counterpass_shared::{CounterCatalog, IsolationClass};
use serde::{Deserialize, Serialize};

use crate::packer::Pass;

/// Usage of one block instance within a pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockUsage {
    /// Block label, e.g. `TA[3]`
    pub block: String,
    pub used: u32,
    pub capacity: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassSummary {
    pub index: usize,
    pub counters: usize,
    pub isolation: IsolationClass,
    pub blocks: Vec<BlockUsage>,
}

/// Aggregate view of a schedule
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleSummary {
    pub pass_count: usize,
    pub public_counter_count: usize,
    pub hardware_counter_count: usize,
    pub passes: Vec<PassSummary>,
}

impl ScheduleSummary {
    /// Summarize passes against the catalog they were packed from
    pub fn new<C>(catalog: &C, passes: &[Pass], public_counter_count: usize) -> Self
    where
        C: CounterCatalog + ?Sized,
    {
        let passes: Vec<PassSummary> = passes
            .iter()
            .enumerate()
            .map(|(index, pass)| PassSummary {
                index,
                counters: pass.len(),
                isolation: pass.isolation().unwrap_or_default(),
                blocks: pass
                    .touched_blocks()
                    .filter_map(|(block_index, left)| {
                        catalog.block(block_index).map(|block| BlockUsage {
                            block: block.label(),
                            used: block.capacity - left,
                            capacity: block.capacity,
                        })
                    })
                    .collect(),
            })
            .collect();

        Self {
            pass_count: passes.len(),
            public_counter_count,
            hardware_counter_count: passes.iter().map(|p| p.counters).sum(),
            passes,
        }
    }

    /// Largest number of counters captured in a single pass
    pub fn max_counters_per_pass(&self) -> usize {
        self.passes.iter().map(|p| p.counters).max().unwrap_or(0)
    }

    /// Block instances filled to capacity in some pass
    pub fn saturated_blocks(&self) -> Vec<(usize, &str)> {
        self.passes
            .iter()
            .flat_map(|pass| {
                pass.blocks
                    .iter()
                    .filter(|usage| usage.used == usage.capacity)
                    .map(move |usage| (pass.index, usage.block.as_str()))
            })
            .collect()
    }
}
