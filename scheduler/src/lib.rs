//! GPU counter pass scheduling
//!
//! Hardware blocks can only count a few events at once, so measuring a set of
//! public counters usually takes several replays of the same workload. This
//! crate decides which hardware counters are captured in which replay ("pass")
//! and records where each raw value will be found afterwards.
//!
//! ```text
//! enabled counters -> resolver -> packer -> recorder -> (passes, result locations)
//! ```

pub mod error;
pub mod packer;
pub mod recorder;
pub mod resolver;
pub mod results;
pub mod scheduler;
pub mod summary;

pub use error::{ErrorCategory, SchedulerError, SchedulerResult};
pub use packer::Pass;
pub use scheduler::{CounterScheduler, Schedule, SchedulerOptions, SchedulerState, SchedulingMode};
pub use summary::{BlockUsage, PassSummary, ScheduleSummary};
