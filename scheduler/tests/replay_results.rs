mod common;

use common::*;
use counterpass_scheduler::{CounterScheduler, SchedulerError};
use counterpass_shared::StaticCatalog;

/// Fake replay: every counter reports ten times its hardware id
fn replay(scheduler: &CounterScheduler<'_, StaticCatalog>) -> Vec<Vec<u64>> {
    scheduler
        .passes()
        .iter()
        .map(|pass| pass.counters().iter().map(|hw| hw.0 as u64 * 10).collect())
        .collect()
}

#[test]
fn test_gather_across_passes() {
    let catalog = fixture_catalog();
    let scheduler = scheduler_with(&catalog, &[GPU_BUSY, SPI_BUSY]);
    assert_eq!(scheduler.num_required_passes(), 2);

    let results = replay(&scheduler);
    assert_eq!(results, vec![vec![10, 20, 300], vec![310]]);

    assert_eq!(scheduler.gather_results(SPI_BUSY, &results).unwrap(), vec![300, 310]);
    assert_eq!(scheduler.gather_results(GPU_BUSY, &results).unwrap(), vec![10, 20]);
}

#[test]
fn test_gather_follows_definition_order() {
    let catalog = fixture_catalog();
    let scheduler = scheduler_with(&catalog, &[TEX_UNIT_BUSY]);

    let results = replay(&scheduler);
    assert_eq!(
        scheduler.gather_results(TEX_UNIT_BUSY, &results).unwrap(),
        vec![500, 510, 10]
    );
}

#[test]
fn test_gather_rejects_mismatched_buffers() {
    let catalog = fixture_catalog();
    let scheduler = scheduler_with(&catalog, &[GPU_BUSY, SPI_BUSY]);

    let missing_pass = vec![vec![10u64, 20, 300]];
    assert_eq!(
        scheduler.gather_results(SPI_BUSY, &missing_pass).unwrap_err(),
        SchedulerError::MissingPassResults { pass: 1 }
    );

    let short_pass = vec![vec![10u64, 20], vec![310]];
    assert_eq!(
        scheduler.gather_results(GPU_BUSY, &short_pass).unwrap_err(),
        SchedulerError::PassResultLength {
            pass: 0,
            expected: 3,
            actual: 2,
        }
    );

    let results = replay(&scheduler);
    assert!(scheduler
        .gather_results(WAVEFRONTS, &results)
        .unwrap_err()
        .is_not_found());
}
