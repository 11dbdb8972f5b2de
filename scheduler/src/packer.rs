//! Pass packing
//!
//! Places every required hardware counter into a pass using first-fit,
//! earliest-pass-first placement. A counter goes into the first existing pass
//! that still has capacity in its block instance and whose isolation lock is
//! compatible with the block; a new pass is opened only when none qualifies.

use std::collections::{BTreeMap, HashMap};

use counterpass_shared::{
    BlockIndex, CounterCatalog, HardwareBlock, HardwareCounterId, IsolationClass, ResultLocation,
};
use tracing::debug;

use crate::error::{SchedulerError, SchedulerResult};

/// One replay of the workload and the hardware counters it captures
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pass {
    /// Placed counters; position is the result offset
    counters: Vec<HardwareCounterId>,

    /// Remaining capacity per block instance touched by this pass
    remaining: BTreeMap<BlockIndex, u32>,

    /// Isolation class of the first isolated counter placed
    isolation: Option<IsolationClass>,
}

impl Pass {
    fn new() -> Self {
        Self::default()
    }

    /// Counters in offset order
    pub fn counters(&self) -> &[HardwareCounterId] {
        &self.counters
    }

    pub fn len(&self) -> usize {
        self.counters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counters.is_empty()
    }

    /// Isolation lock, if an isolated counter was placed
    pub fn isolation(&self) -> Option<IsolationClass> {
        self.isolation
    }

    /// Remaining capacity of a block instance, `None` if the pass never used it
    pub fn remaining_capacity(&self, block: BlockIndex) -> Option<u32> {
        self.remaining.get(&block).copied()
    }

    /// Block instances used by this pass with their remaining capacity
    pub fn touched_blocks(&self) -> impl Iterator<Item = (BlockIndex, u32)> + '_ {
        self.remaining.iter().map(|(index, left)| (*index, *left))
    }

    /// Whether a counter of this block can join the pass
    pub fn can_accept(&self, index: BlockIndex, block: &HardwareBlock) -> bool {
        let left = self.remaining.get(&index).copied().unwrap_or(block.capacity);
        if left == 0 {
            return false;
        }

        match self.isolation {
            Some(lock) => !lock.conflicts_with(block.isolation),
            None => true,
        }
    }

    /// Append a counter and return its offset
    fn place(&mut self, hw: HardwareCounterId, index: BlockIndex, block: &HardwareBlock) -> usize {
        let offset = self.counters.len();
        self.counters.push(hw);

        let left = self.remaining.entry(index).or_insert(block.capacity);
        *left = left.saturating_sub(1);

        if self.isolation.is_none() && block.isolation.is_isolated() {
            self.isolation = Some(block.isolation);
        }

        offset
    }
}

/// Output of the packer: the passes and where each counter landed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackedPasses {
    passes: Vec<Pass>,
    locations: HashMap<HardwareCounterId, ResultLocation>,
}

impl PackedPasses {
    pub fn passes(&self) -> &[Pass] {
        &self.passes
    }

    pub fn location(&self, hw: HardwareCounterId) -> Option<ResultLocation> {
        self.locations.get(&hw).copied()
    }

    pub fn counter_count(&self) -> usize {
        self.locations.len()
    }

    pub(crate) fn into_passes(self) -> Vec<Pass> {
        self.passes
    }
}

/// Pack hardware counters into passes
pub fn pack<C>(catalog: &C, global_order: &[HardwareCounterId]) -> SchedulerResult<PackedPasses>
where
    C: CounterCatalog + ?Sized,
{
    let mut packed = PackedPasses::default();

    for &hw in global_order {
        if packed.locations.contains_key(&hw) {
            continue;
        }

        let (index, block) = catalog
            .block_of(hw)
            .filter(|(_, block)| block.capacity > 0)
            .ok_or(SchedulerError::UnplaceableHardwareCounter { hardware: hw })?;

        let pass_index = match packed
            .passes
            .iter()
            .position(|pass| pass.can_accept(index, block))
        {
            Some(existing) => existing,
            None => {
                packed.passes.push(Pass::new());
                debug!(
                    "Opened pass {} for {} in block {}",
                    packed.passes.len() - 1,
                    hw,
                    block.label()
                );
                packed.passes.len() - 1
            }
        };

        let offset = packed.passes[pass_index].place(hw, index, block);
        packed
            .locations
            .insert(hw, location_for(hw, pass_index, offset)?);
    }

    Ok(packed)
}

/// Narrow a placement to the `u32` pair reported to callers
fn location_for(
    hw: HardwareCounterId,
    pass: usize,
    offset: usize,
) -> SchedulerResult<ResultLocation> {
    match (u32::try_from(pass), u32::try_from(offset)) {
        (Ok(pass), Ok(offset)) => Ok(ResultLocation::new(pass, offset)),
        _ => Err(SchedulerError::LocationOverflow {
            hardware: hw,
            pass,
            offset,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use counterpass_shared::{HardwareCounter, StaticCatalog};

    fn catalog() -> StaticCatalog {
        StaticCatalog::new(
            vec![
                HardwareBlock::new("GRBM", 0, 2),
                HardwareBlock::new("SQ", 0, 8).with_isolation(IsolationClass::ShaderSequencer),
                HardwareBlock::new("TA", 0, 2).with_isolation(IsolationClass::TexturePipeline),
            ],
            vec![
                HardwareCounter::new(1, "GRBM_COUNT", 0),
                HardwareCounter::new(2, "GRBM_GUI_ACTIVE", 0),
                HardwareCounter::new(3, "GRBM_TA_BUSY", 0),
                HardwareCounter::new(10, "SQ_WAVES", 1),
                HardwareCounter::new(20, "TA_BUSY", 2),
            ],
            vec![],
        )
        .unwrap()
    }

    fn ids(raw: &[u32]) -> Vec<HardwareCounterId> {
        raw.iter().map(|&id| HardwareCounterId(id)).collect()
    }

    #[test]
    fn test_capacity_opens_new_pass() {
        let packed = pack(&catalog(), &ids(&[1, 2, 3])).unwrap();

        assert_eq!(packed.passes().len(), 2);
        assert_eq!(packed.passes()[0].counters(), ids(&[1, 2]).as_slice());
        assert_eq!(packed.passes()[0].remaining_capacity(BlockIndex(0)), Some(0));
        assert_eq!(packed.location(HardwareCounterId(3)), Some(ResultLocation::new(1, 0)));
    }

    #[test]
    fn test_isolated_classes_never_share() {
        let packed = pack(&catalog(), &ids(&[10, 20])).unwrap();

        assert_eq!(packed.passes().len(), 2);
        assert_eq!(packed.passes()[0].isolation(), Some(IsolationClass::ShaderSequencer));
        assert_eq!(packed.passes()[1].isolation(), Some(IsolationClass::TexturePipeline));
    }

    #[test]
    fn test_earliest_pass_first() {
        // pass 0 fills GRBM, pass 1 opens for GRBM again; SQ and TA then reuse
        // the earliest compatible slack.
        let packed = pack(&catalog(), &ids(&[1, 2, 3, 20, 10])).unwrap();

        assert_eq!(packed.passes().len(), 2);
        assert_eq!(packed.location(HardwareCounterId(20)), Some(ResultLocation::new(0, 2)));
        assert_eq!(packed.location(HardwareCounterId(10)), Some(ResultLocation::new(1, 1)));
    }

    #[test]
    fn test_unlocked_pass_takes_lock_from_later_counter() {
        let packed = pack(&catalog(), &ids(&[1, 10])).unwrap();
        assert_eq!(packed.passes().len(), 1);
        assert_eq!(packed.passes()[0].isolation(), Some(IsolationClass::ShaderSequencer));
    }

    #[test]
    fn test_duplicates_placed_once() {
        let packed = pack(&catalog(), &ids(&[1, 1, 2])).unwrap();
        assert_eq!(packed.counter_count(), 2);
        assert_eq!(packed.passes()[0].len(), 2);
    }

    #[test]
    fn test_unknown_hardware_counter() {
        let err = pack(&catalog(), &ids(&[99])).unwrap_err();
        assert_eq!(
            err,
            SchedulerError::UnplaceableHardwareCounter {
                hardware: HardwareCounterId(99)
            }
        );
    }

    #[test]
    fn test_location_narrowing() {
        let hw = HardwareCounterId(7);
        assert_eq!(location_for(hw, 3, 5).unwrap(), ResultLocation::new(3, 5));
        assert_eq!(
            location_for(hw, 0, u32::MAX as usize).unwrap(),
            ResultLocation::new(0, u32::MAX)
        );
    }

    #[cfg(target_pointer_width = "64")]
    #[test]
    fn test_location_overflow_is_internal() {
        let hw = HardwareCounterId(7);
        let too_far = u32::MAX as usize + 1;

        let err = location_for(hw, too_far, 0).unwrap_err();
        assert_eq!(err.category(), crate::error::ErrorCategory::Internal);
        assert!(matches!(
            location_for(hw, 0, too_far),
            Err(SchedulerError::LocationOverflow { offset, .. }) if offset == too_far
        ));
    }
}
