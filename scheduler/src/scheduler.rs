//! Counter scheduler
//!
//! Owns the enabled counter set of one device/API context and the schedule
//! derived from it. Any change to the enabled set discards the cached
//! schedule; the next query rebuilds it from scratch through the resolver,
//! the packer and the recorder.

use std::cell::OnceCell;
use std::collections::BTreeSet;

use counterpass_shared::{
    CounterCatalog, HardwareCounterId, PublicCounterId, ResultLocation, ResultLocationMap,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::error::{SchedulerError, SchedulerResult};
use crate::packer::{self, Pass};
use crate::recorder;
use crate::resolver;
use crate::results;
use crate::summary::ScheduleSummary;

/// When the schedule is rebuilt after the enabled set changes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchedulingMode {
    /// On the first query after a change
    #[default]
    Lazy,
    /// Immediately after every change
    Eager,
}

impl std::str::FromStr for SchedulingMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "lazy" => Ok(SchedulingMode::Lazy),
            "eager" => Ok(SchedulingMode::Eager),
            _ => Err(format!("Invalid scheduling mode: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SchedulerOptions {
    #[serde(default)]
    pub mode: SchedulingMode,
}

/// Lifecycle state of a scheduler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    /// No counters enabled
    Empty,
    /// Enabled set changed since the last schedule was built
    Dirty,
    /// Schedule is valid for the enabled set
    Scheduled,
}

/// A computed schedule
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schedule {
    passes: Vec<Pass>,
    locations: ResultLocationMap,
}

impl Schedule {
    pub fn passes(&self) -> &[Pass] {
        &self.passes
    }

    pub fn locations(&self) -> &ResultLocationMap {
        &self.locations
    }

    pub fn pass_count(&self) -> usize {
        self.passes.len()
    }
}

fn build_schedule<C>(catalog: &C, enabled: &BTreeSet<PublicCounterId>) -> SchedulerResult<Schedule>
where
    C: CounterCatalog + ?Sized,
{
    if enabled.is_empty() {
        return Ok(Schedule::default());
    }

    let requirements = resolver::resolve(catalog, enabled)?;
    let packed = packer::pack(catalog, requirements.global_order())?;
    let locations = recorder::record(&requirements, &packed)?;

    info!(
        "Scheduled {} hardware counters for {} public counters into {} passes",
        packed.counter_count(),
        enabled.len(),
        packed.passes().len()
    );

    Ok(Schedule {
        passes: packed.into_passes(),
        locations,
    })
}

/// Pass scheduler for one device/API context
///
/// Not meant for concurrent use: mutations and queries must be serialized by
/// the caller. Independent schedulers share nothing but the borrowed catalog.
#[derive(Debug)]
pub struct CounterScheduler<'a, C: CounterCatalog + ?Sized> {
    catalog: &'a C,
    options: SchedulerOptions,
    enabled: BTreeSet<PublicCounterId>,
    schedule: OnceCell<Schedule>,
}

impl<'a, C: CounterCatalog + ?Sized> CounterScheduler<'a, C> {
    /// Create a lazy scheduler over a catalog
    pub fn new(catalog: &'a C) -> Self {
        Self::with_options(catalog, SchedulerOptions::default())
    }

    pub fn with_options(catalog: &'a C, options: SchedulerOptions) -> Self {
        Self {
            catalog,
            options,
            enabled: BTreeSet::new(),
            schedule: OnceCell::new(),
        }
    }

    pub fn catalog(&self) -> &'a C {
        self.catalog
    }

    pub fn options(&self) -> SchedulerOptions {
        self.options
    }

    /// Enable a public counter.
    ///
    /// Fails without changing state if the counter is unknown or one of its
    /// hardware counters cannot be placed. Enabling twice is a no-op.
    pub fn enable_counter(&mut self, counter: PublicCounterId) -> SchedulerResult<()> {
        if let Err(err) = self.check_counter(counter) {
            warn!("Rejected enable of {}: {}", counter, err);
            return Err(err);
        }

        if !self.enabled.insert(counter) {
            debug!("{} already enabled", counter);
            return Ok(());
        }

        debug!("Enabled {} ({} enabled)", counter, self.enabled.len());
        self.invalidate();
        Ok(())
    }

    /// Enable a public counter by name, returning its id
    pub fn enable_counter_by_name(&mut self, name: &str) -> SchedulerResult<PublicCounterId> {
        let counter = self
            .catalog
            .find_public_counter(name)
            .ok_or_else(|| SchedulerError::UnknownCounterName(name.to_string()))?;
        self.enable_counter(counter)?;
        Ok(counter)
    }

    /// Disable a public counter. Disabling a counter that is not enabled is a no-op.
    pub fn disable_counter(&mut self, counter: PublicCounterId) {
        if !self.enabled.remove(&counter) {
            debug!("{} not enabled, nothing to disable", counter);
            return;
        }

        debug!("Disabled {} ({} enabled)", counter, self.enabled.len());
        self.invalidate();
    }

    /// Disable every counter and drop the cached schedule
    pub fn disable_all_counters(&mut self) {
        debug!("Disabling all {} counters", self.enabled.len());
        self.enabled.clear();
        self.schedule = OnceCell::new();
    }

    pub fn is_counter_enabled(&self, counter: PublicCounterId) -> bool {
        self.enabled.contains(&counter)
    }

    pub fn enabled_count(&self) -> usize {
        self.enabled.len()
    }

    /// Enabled counters in id order
    pub fn enabled_counters(&self) -> impl Iterator<Item = PublicCounterId> + '_ {
        self.enabled.iter().copied()
    }

    pub fn state(&self) -> SchedulerState {
        if self.enabled.is_empty() {
            SchedulerState::Empty
        } else if self.schedule.get().is_some() {
            SchedulerState::Scheduled
        } else {
            SchedulerState::Dirty
        }
    }

    /// Current schedule, rebuilt first if the enabled set changed
    pub fn schedule(&self) -> &Schedule {
        self.schedule.get_or_init(|| {
            match build_schedule(self.catalog, &self.enabled) {
                Ok(schedule) => schedule,
                Err(err) => {
                    // enable_counter validated every dependency, so a failure
                    // here means the catalog changed underneath us or a bug.
                    error!("Counter schedule is inconsistent: {}", err);
                    panic!("counter schedule is inconsistent: {err}");
                }
            }
        })
    }

    pub fn num_required_passes(&self) -> usize {
        self.schedule().pass_count()
    }

    pub fn passes(&self) -> &[Pass] {
        self.schedule().passes()
    }

    /// Hardware counters captured in one pass, in offset order
    pub fn counters_for_pass(&self, pass: usize) -> Option<&[HardwareCounterId]> {
        self.schedule().passes().get(pass).map(Pass::counters)
    }

    pub fn result_locations(&self) -> &ResultLocationMap {
        self.schedule().locations()
    }

    /// Where one hardware counter of one public counter will be found
    pub fn result_location(
        &self,
        counter: PublicCounterId,
        hardware: HardwareCounterId,
    ) -> SchedulerResult<ResultLocation> {
        self.result_locations()
            .get(counter, hardware)
            .ok_or(SchedulerError::NotFound { counter, hardware })
    }

    pub fn summary(&self) -> ScheduleSummary {
        ScheduleSummary::new(self.catalog, self.passes(), self.enabled.len())
    }

    /// Raw values of one public counter from per-pass replay buffers
    pub fn gather_results<R>(
        &self,
        counter: PublicCounterId,
        pass_results: &[R],
    ) -> SchedulerResult<Vec<u64>>
    where
        R: AsRef<[u64]>,
    {
        results::validate_pass_results(self.passes(), pass_results)?;
        results::gather_counter_results(self.result_locations(), counter, pass_results)
    }

    fn check_counter(&self, counter: PublicCounterId) -> SchedulerResult<()> {
        let definition = self
            .catalog
            .public_counter(counter)
            .ok_or(SchedulerError::UnknownCounter(counter))?;

        for &hardware in &definition.hardware_counters {
            let (_, block) = self
                .catalog
                .block_of(hardware)
                .ok_or(SchedulerError::UnresolvedHardwareCounter { counter, hardware })?;
            if block.capacity == 0 {
                return Err(SchedulerError::ZeroCapacity {
                    counter,
                    hardware,
                    block: block.label(),
                });
            }
        }

        Ok(())
    }

    fn invalidate(&mut self) {
        self.schedule = OnceCell::new();
        if self.options.mode == SchedulingMode::Eager {
            self.schedule();
        }
    }
}
