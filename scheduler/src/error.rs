//! Scheduler errors

use counterpass_shared::{HardwareCounterId, PublicCounterId};

/// Broad class of a scheduler error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Caller passed something the catalog does not know; no state changed
    InvalidArgument,
    /// Queried pair is not part of the current schedule
    NotFound,
    /// Replay results do not match the schedule
    Results,
    /// Catalog or algorithm inconsistency; a bug, not a runtime condition
    Internal,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchedulerError {
    #[error("unknown public counter {0}")]
    UnknownCounter(PublicCounterId),

    #[error("unknown public counter name: {0}")]
    UnknownCounterName(String),

    #[error("public counter {counter} depends on {hardware}, which has no block in the catalog")]
    UnresolvedHardwareCounter {
        counter: PublicCounterId,
        hardware: HardwareCounterId,
    },

    #[error("public counter {counter} depends on {hardware}, whose block {block} has zero capacity")]
    ZeroCapacity {
        counter: PublicCounterId,
        hardware: HardwareCounterId,
        block: String,
    },

    #[error("{hardware} is not scheduled for {counter}")]
    NotFound {
        counter: PublicCounterId,
        hardware: HardwareCounterId,
    },

    #[error("public counter {0} is not enabled")]
    CounterNotScheduled(PublicCounterId),

    #[error("no results supplied for pass {pass}")]
    MissingPassResults { pass: usize },

    #[error("pass {pass} results hold {actual} values, expected {expected}")]
    PassResultLength {
        pass: usize,
        expected: usize,
        actual: usize,
    },

    #[error("offset {offset} is outside the {len} results of pass {pass}")]
    OffsetOutOfRange { pass: u32, offset: u32, len: usize },

    #[error("{hardware} cannot be placed: no block in the catalog")]
    UnplaceableHardwareCounter { hardware: HardwareCounterId },

    #[error("{hardware} landed at pass {pass} offset {offset}, beyond the u32 result range")]
    LocationOverflow {
        hardware: HardwareCounterId,
        pass: usize,
        offset: usize,
    },

    #[error("{counter} depends on {hardware}, which was never placed in a pass")]
    UnresolvedDependency {
        counter: PublicCounterId,
        hardware: HardwareCounterId,
    },
}

impl SchedulerError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            SchedulerError::UnknownCounter(_)
            | SchedulerError::UnknownCounterName(_)
            | SchedulerError::UnresolvedHardwareCounter { .. }
            | SchedulerError::ZeroCapacity { .. } => ErrorCategory::InvalidArgument,
            SchedulerError::NotFound { .. } | SchedulerError::CounterNotScheduled(_) => {
                ErrorCategory::NotFound
            }
            SchedulerError::MissingPassResults { .. }
            | SchedulerError::PassResultLength { .. }
            | SchedulerError::OffsetOutOfRange { .. } => ErrorCategory::Results,
            SchedulerError::UnplaceableHardwareCounter { .. }
            | SchedulerError::LocationOverflow { .. }
            | SchedulerError::UnresolvedDependency { .. } => ErrorCategory::Internal,
        }
    }

    pub fn is_invalid_argument(&self) -> bool {
        self.category() == ErrorCategory::InvalidArgument
    }

    pub fn is_not_found(&self) -> bool {
        self.category() == ErrorCategory::NotFound
    }
}

/// Result type for scheduler operations
pub type SchedulerResult<T> = Result<T, SchedulerError>;
