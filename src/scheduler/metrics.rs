use super::{
    error::{SchedulerError, SchedulerResult},
    ProcessSet,
};
use serde::Serialize;

/// Aggregate figures for a completed run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Metrics {
    pub process_count: usize,
    pub average_waiting_time: f64,
    pub average_turnaround_time: f64,
    /// Completion time of the last process.
    pub total_time: u64,
}

impl Metrics {
    /// Fails if any process has not completed. An empty set averages to 0.
    pub fn from_processes(processes: &ProcessSet) -> SchedulerResult<Self> {
        if let Some(pending) = processes.iter().find(|process| !process.is_completed()) {
            return Err(SchedulerError::IncompleteProcess {
                id: pending.id().to_owned(),
                status: pending.status(),
            });
        }

        let process_count = processes.len();
        if process_count == 0 {
            return Ok(Self {
                process_count,
                average_waiting_time: 0.0,
                average_turnaround_time: 0.0,
                total_time: 0,
            });
        }

        // Each time fits in u64, their sum may not
        let total_waiting: u128 = processes.iter().map(|p| u128::from(p.waiting_time())).sum();
        let total_turnaround: u128 = processes
            .iter()
            .map(|p| u128::from(p.turnaround_time()))
            .sum();

        Ok(Self {
            process_count,
            average_waiting_time: total_waiting as f64 / process_count as f64,
            average_turnaround_time: total_turnaround as f64 / process_count as f64,
            total_time: processes
                .iter()
                .map(|p| p.turnaround_time())
                .max()
                .unwrap_or(0),
        })
    }
}
