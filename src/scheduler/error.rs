use super::process::ProcessStatus;
use thiserror::Error;

pub type SchedulerResult<T> = Result<T, SchedulerError>;

/// Errors reported by the simulation engine.
///
/// Validation errors are raised before a run touches any process, so a
/// rejected run leaves its `ProcessSet` exactly as it was.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchedulerError {
    #[error("Process id cannot be empty (position {position})")]
    EmptyProcessId { position: usize },

    #[error("Invalid burst time for {id}: {burst_time} must be greater than 0")]
    InvalidBurstTime { id: String, burst_time: u64 },

    #[error("Invalid priority for {id}: {priority} must be greater than 0")]
    InvalidPriority { id: String, priority: u32 },

    #[error("Total burst time overflows the simulated clock at process {0}")]
    TimeOverflow(String),

    #[error("Invalid quantum: {0} must be greater than 0")]
    InvalidQuantum(u64),

    #[error("Process {0} has no priority")]
    MissingPriority(String),

    #[error("Duplicate process id: {0}")]
    DuplicateProcessId(String),

    #[error("Process {id} is {status:?}, not Completed")]
    IncompleteProcess { id: String, status: ProcessStatus },

    #[error("Invalid state transition for {id}: {from:?} -> {to:?}")]
    InvalidTransition {
        id: String,
        from: ProcessStatus,
        to: ProcessStatus,
    },

    #[error("Invalid policy '{0}'. Valid: fcfs, sjf, priority, rr")]
    UnknownPolicy(String),

    #[error("Invalid priority order '{0}'. Valid: lower-first, higher-first")]
    UnknownPriorityOrder(String),
}
