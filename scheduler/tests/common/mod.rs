//! Shared fixtures for scheduler integration tests

#![allow(dead_code)]

use std::collections::{BTreeMap, HashSet};

use counterpass_scheduler::CounterScheduler;
use counterpass_shared::{
    BlockIndex, CounterCatalog, HardwareBlock, HardwareCounter, HardwareCounterId, IsolationClass,
    PublicCounterDefinition, PublicCounterId, StaticCatalog,
};

pub const GPU_BUSY: PublicCounterId = PublicCounterId(0);
pub const CP_BUSY: PublicCounterId = PublicCounterId(1);
pub const SHADER_BUSY: PublicCounterId = PublicCounterId(2);
pub const SPI_BUSY: PublicCounterId = PublicCounterId(3);
pub const WAVEFRONTS: PublicCounterId = PublicCounterId(4);
pub const TEX_UNIT_BUSY: PublicCounterId = PublicCounterId(5);
pub const TEX_VFETCH_INSTS: PublicCounterId = PublicCounterId(6);

/// Small catalog modelled on a Gfx9 device:
///
/// | block  | capacity | isolation        |
/// |--------|----------|------------------|
/// | GRBM   | 4        | none             |
/// | SPI    | 1        | none             |
/// | SQ     | 8        | shader-sequencer |
/// | TA[0]  | 2        | texture-pipeline |
/// | TA[1]  | 2        | texture-pipeline |
pub fn fixture_catalog() -> StaticCatalog {
    let blocks = vec![
        HardwareBlock::new("GRBM", 0, 4),
        HardwareBlock::new("SPI", 0, 1),
        HardwareBlock::new("SQ", 0, 8).with_isolation(IsolationClass::ShaderSequencer),
        HardwareBlock::new("TA", 0, 2).with_isolation(IsolationClass::TexturePipeline),
        HardwareBlock::new("TA", 1, 2).with_isolation(IsolationClass::TexturePipeline),
    ];

    let hardware = vec![
        HardwareCounter::new(1, "GRBM_COUNT", 0),
        HardwareCounter::new(2, "GRBM_GUI_ACTIVE", 0),
        HardwareCounter::new(3, "GRBM_CP_BUSY", 0),
        HardwareCounter::new(4, "GRBM_SPI_BUSY", 0),
        HardwareCounter::new(5, "GRBM_TA_BUSY", 0),
        HardwareCounter::new(30, "SPI_CSN_BUSY", 1),
        HardwareCounter::new(31, "SPI_PS_BUSY", 1),
        HardwareCounter::new(40, "SQ_WAVES", 2),
        HardwareCounter::new(41, "SQ_INSTS_VMEM_RD", 2),
        HardwareCounter::new(50, "TA0_TA_BUSY", 3),
        HardwareCounter::new(51, "TA1_TA_BUSY", 4),
        HardwareCounter::new(52, "TA0_BUFFER_WAVEFRONTS", 3),
    ];

    let public = vec![
        PublicCounterDefinition::new(GPU_BUSY.0, "GPUBusy", &[1, 2]),
        PublicCounterDefinition::new(CP_BUSY.0, "CPBusy", &[2, 3]),
        PublicCounterDefinition::new(SHADER_BUSY.0, "ShaderBusy", &[2, 3, 4, 5]),
        PublicCounterDefinition::new(SPI_BUSY.0, "SPIBusy", &[30, 31]),
        PublicCounterDefinition::new(WAVEFRONTS.0, "Wavefronts", &[40]),
        PublicCounterDefinition::new(TEX_UNIT_BUSY.0, "TexUnitBusy", &[50, 51, 1]),
        PublicCounterDefinition::new(TEX_VFETCH_INSTS.0, "TexVFetchInsts", &[41, 50, 52]),
    ];

    StaticCatalog::new(blocks, hardware, public).expect("fixture catalog is valid")
}

/// Every id in the fixture catalog
pub fn all_counters() -> Vec<PublicCounterId> {
    (0..=6).map(PublicCounterId).collect()
}

/// Enable counters in the given order and return the scheduler
pub fn scheduler_with<'a>(
    catalog: &'a StaticCatalog,
    counters: &[PublicCounterId],
) -> CounterScheduler<'a, StaticCatalog> {
    let mut scheduler = CounterScheduler::new(catalog);
    for &counter in counters {
        scheduler.enable_counter(counter).expect("fixture counter enables");
    }
    scheduler
}

/// All orderings of a small slice
pub fn permutations(items: &[PublicCounterId]) -> Vec<Vec<PublicCounterId>> {
    if items.len() <= 1 {
        return vec![items.to_vec()];
    }

    let mut out = Vec::new();
    for i in 0..items.len() {
        let mut rest = items.to_vec();
        let head = rest.remove(i);
        for mut tail in permutations(&rest) {
            tail.insert(0, head);
            out.push(tail);
        }
    }
    out
}

/// Check capacity, isolation and dedup invariants of a scheduler's passes
pub fn assert_schedule_invariants(catalog: &StaticCatalog, scheduler: &CounterScheduler<'_, StaticCatalog>) {
    let mut placed = HashSet::new();

    for (pass_index, pass) in scheduler.passes().iter().enumerate() {
        let mut per_block: BTreeMap<BlockIndex, u32> = BTreeMap::new();
        let mut classes = HashSet::new();

        for &hw in pass.counters() {
            assert!(placed.insert(hw), "{} placed more than once", hw);

            let (index, block) = catalog.block_of(hw).expect("placed counter has a block");
            *per_block.entry(index).or_default() += 1;
            if block.isolation.is_isolated() {
                classes.insert(block.isolation);
            }
        }

        for (index, used) in per_block {
            let block = catalog.block(index).unwrap();
            assert!(
                used <= block.capacity,
                "pass {} uses {} counters of {} (capacity {})",
                pass_index,
                used,
                block.label(),
                block.capacity
            );
        }
        assert!(
            classes.len() <= 1,
            "pass {} mixes isolation classes {:?}",
            pass_index,
            classes
        );
    }

    for counter in scheduler.enabled_counters() {
        let definition = catalog.public_counter(counter).unwrap();
        for &hw in &definition.hardware_counters {
            assert!(placed.contains(&hw), "{} of {} was never placed", hw, counter);
            let location = scheduler.result_location(counter, hw).unwrap();
            assert_eq!(
                scheduler.counters_for_pass(location.pass as usize).unwrap()[location.offset as usize],
                hw
            );
        }
    }
}

pub fn hw(id: u32) -> HardwareCounterId {
    HardwareCounterId(id)
}
