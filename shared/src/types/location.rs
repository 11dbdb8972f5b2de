//! Result locations
//!
//! After replay, every scheduled hardware counter's raw value is found at a
//! fixed (pass, offset) address. These types carry those addresses back to
//! whoever evaluates the public counter formulas.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::counter::{HardwareCounterId, PublicCounterId};

/// Address of one hardware counter's value in the replay results
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ResultLocation {
    /// Pass index, in replay order
    pub pass: u32,

    /// Offset within that pass's result buffer
    pub offset: u32,
}

impl ResultLocation {
    pub fn new(pass: u32, offset: u32) -> Self {
        Self { pass, offset }
    }
}

impl fmt::Display for ResultLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.pass, self.offset)
    }
}

/// Locations of every hardware counter one public counter depends on
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterLocations {
    /// Entries in the counter's definition order
    entries: Vec<(HardwareCounterId, ResultLocation)>,
}

impl CounterLocations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a location. Repeated hardware counters keep their first entry.
    pub fn insert(&mut self, hw: HardwareCounterId, location: ResultLocation) {
        if self.get(hw).is_none() {
            self.entries.push((hw, location));
        }
    }

    pub fn get(&self, hw: HardwareCounterId) -> Option<ResultLocation> {
        self.entries
            .iter()
            .find(|(id, _)| *id == hw)
            .map(|(_, location)| *location)
    }

    /// Iterate in definition order
    pub fn iter(&self) -> impl Iterator<Item = (HardwareCounterId, ResultLocation)> + '_ {
        self.entries.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Distinct passes this counter needs, ascending
    pub fn passes(&self) -> Vec<u32> {
        let mut passes: Vec<u32> = self.entries.iter().map(|(_, loc)| loc.pass).collect();
        passes.sort_unstable();
        passes.dedup();
        passes
    }
}

/// Per-public-counter view of the result locations of a schedule
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultLocationMap {
    counters: BTreeMap<PublicCounterId, CounterLocations>,
}

impl ResultLocationMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, counter: PublicCounterId, locations: CounterLocations) {
        self.counters.insert(counter, locations);
    }

    /// Locations for one public counter
    pub fn counter(&self, counter: PublicCounterId) -> Option<&CounterLocations> {
        self.counters.get(&counter)
    }

    /// Location of one hardware counter as seen by one public counter
    pub fn get(&self, counter: PublicCounterId, hw: HardwareCounterId) -> Option<ResultLocation> {
        self.counters.get(&counter).and_then(|locs| locs.get(hw))
    }

    /// Iterate public counters in id order
    pub fn iter(&self) -> impl Iterator<Item = (PublicCounterId, &CounterLocations)> {
        self.counters.iter().map(|(id, locs)| (*id, locs))
    }

    pub fn len(&self) -> usize {
        self.counters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counters.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counter_locations_keep_definition_order() {
        let mut locs = CounterLocations::new();
        locs.insert(HardwareCounterId(9), ResultLocation::new(1, 0));
        locs.insert(HardwareCounterId(3), ResultLocation::new(0, 2));
        locs.insert(HardwareCounterId(9), ResultLocation::new(5, 5));

        let order: Vec<_> = locs.iter().map(|(hw, _)| hw.0).collect();
        assert_eq!(order, vec![9, 3]);
        assert_eq!(locs.get(HardwareCounterId(9)), Some(ResultLocation::new(1, 0)));
        assert_eq!(locs.passes(), vec![0, 1]);
    }

    #[test]
    fn test_location_map_lookup() {
        let mut locs = CounterLocations::new();
        locs.insert(HardwareCounterId(1), ResultLocation::new(0, 4));

        let mut map = ResultLocationMap::new();
        map.insert(PublicCounterId(2), locs);

        assert_eq!(
            map.get(PublicCounterId(2), HardwareCounterId(1)),
            Some(ResultLocation::new(0, 4))
        );
        assert_eq!(map.get(PublicCounterId(2), HardwareCounterId(7)), None);
        assert_eq!(map.get(PublicCounterId(3), HardwareCounterId(1)), None);
        assert_eq!(ResultLocation::new(1, 3).to_string(), "(1, 3)");
    }
}
