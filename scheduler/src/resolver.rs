//! Requirement resolution
//!
//! Turns the enabled public counters into one deduplicated sequence of
//! hardware counters. Enabled counters are visited in id order and each
//! definition in catalog order, so the sequence depends only on which
//! counters are enabled, never on the order they were enabled in.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use counterpass_shared::{CounterCatalog, HardwareCounterId, PublicCounterId};

use crate::error::{SchedulerError, SchedulerResult};

/// Hardware counters required by an enabled set
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Requirements {
    global_order: Vec<HardwareCounterId>,
    per_counter: BTreeMap<PublicCounterId, Vec<HardwareCounterId>>,
}

impl Requirements {
    /// Distinct hardware counters, in first-seen order
    pub fn global_order(&self) -> &[HardwareCounterId] {
        &self.global_order
    }

    /// Hardware counters one public counter requires, in catalog order
    pub fn for_counter(&self, counter: PublicCounterId) -> Option<&[HardwareCounterId]> {
        self.per_counter.get(&counter).map(Vec::as_slice)
    }

    /// Iterate public counters in id order
    pub fn iter(&self) -> impl Iterator<Item = (PublicCounterId, &[HardwareCounterId])> {
        self.per_counter
            .iter()
            .map(|(id, hws)| (*id, hws.as_slice()))
    }

    pub fn is_empty(&self) -> bool {
        self.per_counter.is_empty()
    }
}

/// Resolve the hardware requirements of the enabled counters
pub fn resolve<C>(catalog: &C, enabled: &BTreeSet<PublicCounterId>) -> SchedulerResult<Requirements>
where
    C: CounterCatalog + ?Sized,
{
    let mut requirements = Requirements::default();
    let mut seen = HashSet::new();

    for &counter in enabled {
        let definition = catalog
            .public_counter(counter)
            .ok_or(SchedulerError::UnknownCounter(counter))?;

        let mut own = Vec::with_capacity(definition.hardware_counters.len());
        for &hw in &definition.hardware_counters {
            if !own.contains(&hw) {
                own.push(hw);
            }
            if seen.insert(hw) {
                requirements.global_order.push(hw);
            }
        }
        requirements.per_counter.insert(counter, own);
    }

    Ok(requirements)
}
