//! Replay result gathering
//!
//! The caller replays the workload once per pass, in pass order, and hands
//! back one raw buffer per pass indexed by offset. These helpers check the
//! buffers against the schedule and pull out a public counter's raw hardware
//! values in definition order, ready for formula evaluation.

use counterpass_shared::{PublicCounterId, ResultLocationMap};

use crate::error::{SchedulerError, SchedulerResult};
use crate::packer::Pass;

/// Check that there is one buffer per pass, each holding one value per counter
pub fn validate_pass_results<R>(passes: &[Pass], pass_results: &[R]) -> SchedulerResult<()>
where
    R: AsRef<[u64]>,
{
    for (index, pass) in passes.iter().enumerate() {
        let buffer: &[u64] = pass_results
            .get(index)
            .ok_or(SchedulerError::MissingPassResults { pass: index })?
            .as_ref();
        let actual = buffer.len();
        if actual != pass.len() {
            return Err(SchedulerError::PassResultLength {
                pass: index,
                expected: pass.len(),
                actual,
            });
        }
    }
    Ok(())
}

/// Raw hardware values of one public counter, in definition order
pub fn gather_counter_results<R>(
    locations: &ResultLocationMap,
    counter: PublicCounterId,
    pass_results: &[R],
) -> SchedulerResult<Vec<u64>>
where
    R: AsRef<[u64]>,
{
    let counter_locations = locations
        .counter(counter)
        .ok_or(SchedulerError::CounterNotScheduled(counter))?;

    counter_locations
        .iter()
        .map(|(_, location)| {
            let pass = location.pass as usize;
            let buffer: &[u64] = pass_results
                .get(pass)
                .ok_or(SchedulerError::MissingPassResults { pass })?
                .as_ref();
            buffer
                .get(location.offset as usize)
                .copied()
                .ok_or(SchedulerError::OffsetOutOfRange {
                    pass: location.pass,
                    offset: location.offset,
                    len: buffer.len(),
                })
        })
        .collect()
}
