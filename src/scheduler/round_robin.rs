use super::{
    context::RunContext,
    error::{SchedulerError, SchedulerResult},
    ProcessSet, SchedulingPolicy,
};
use std::collections::VecDeque;
use tracing::trace;

/// Preemptive round robin with a fixed time quantum.
///
/// Processes enter the ready queue in submission order. A process that still
/// has work after its quantum goes to the back of the queue; one that
/// finishes within its quantum leaves the queue for good.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundRobinScheduler {
    quantum: u64,
}

impl RoundRobinScheduler {
    pub fn new(quantum: u64) -> SchedulerResult<Self> {
        if quantum == 0 {
            return Err(SchedulerError::InvalidQuantum(quantum));
        }
        Ok(Self { quantum })
    }

    pub fn quantum(&self) -> u64 {
        self.quantum
    }
}

impl SchedulingPolicy for RoundRobinScheduler {
    const NAME: &'static str = "Round Robin";

    fn validate(&self, processes: &ProcessSet) -> SchedulerResult<()> {
        if self.quantum == 0 {
            return Err(SchedulerError::InvalidQuantum(self.quantum));
        }
        processes.validate(false)
    }

    fn schedule(&self, processes: &mut ProcessSet, context: &mut RunContext) -> SchedulerResult<()> {
        context.admit_all(processes)?;

        // Indices into the set; the set itself is never reordered.
        let mut ready: VecDeque<usize> = (0..processes.len()).collect();

        while let Some(index) = ready.pop_front() {
            let Some(process) = processes.get_mut(index) else {
                continue;
            };

            if !context.dispatch(process, self.quantum)? {
                ready.push_back(index);
            }
            trace!(queued = ready.len(), now = context.now(), "ready queue");
        }
        Ok(())
    }
}
