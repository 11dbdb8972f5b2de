//! Result location recording
//!
//! Builds each enabled public counter's view of where its hardware counters
//! were placed. Shared hardware counters resolve to the same location in every
//! view. Every dependency must resolve; a miss means the resolver and packer
//! disagree.

use counterpass_shared::{CounterLocations, ResultLocationMap};

use crate::error::{SchedulerError, SchedulerResult};
use crate::packer::PackedPasses;
use crate::resolver::Requirements;

/// Build the per-public-counter location map
pub fn record(requirements: &Requirements, packed: &PackedPasses) -> SchedulerResult<ResultLocationMap> {
    let mut map = ResultLocationMap::new();

    for (counter, hardware) in requirements.iter() {
        let mut locations = CounterLocations::new();
        for &hw in hardware {
            let location = packed
                .location(hw)
                .ok_or(SchedulerError::UnresolvedDependency {
                    counter,
                    hardware: hw,
                })?;
            locations.insert(hw, location);
        }
        map.insert(counter, locations);
    }

    Ok(map)
}
