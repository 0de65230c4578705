use super::{
    clock::SimulationClock,
    error::SchedulerResult,
    process::{Process, ProcessSet, ProcessStatus},
    trace::{DispatchEvent, Trace},
};
use tracing::debug;

/// Per-run simulation state: the clock and the dispatch trace. Every run
/// builds its own, so independent runs never share anything.
#[derive(Debug, Default)]
pub struct RunContext {
    clock: SimulationClock,
    trace: Trace,
}

impl RunContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> u64 {
        self.clock.now()
    }

    pub fn trace(&self) -> &Trace {
        &self.trace
    }

    pub fn into_trace(self) -> Trace {
        self.trace
    }

    /// Put every process of the set in the ready queue.
    pub(crate) fn admit_all(&mut self, processes: &mut ProcessSet) -> SchedulerResult<()> {
        processes
            .iter_mut()
            .try_for_each(|process| process.transition(ProcessStatus::Ready))
    }

    /// Give `process` the CPU for at most `slice` ticks. Returns `true` if
    /// the process completed, otherwise it goes back to `Ready`.
    pub(crate) fn dispatch(&mut self, process: &mut Process, slice: u64) -> SchedulerResult<bool> {
        process.transition(ProcessStatus::Running)?;

        let used = process.execute(slice);
        let start = self.clock.advance(used);
        let completed = process.remaining_time() == 0;

        if completed {
            process.complete(self.clock.now())?;
        } else {
            process.transition(ProcessStatus::Ready)?;
        }

        debug!(
            process = process.id(),
            start,
            end = self.clock.now(),
            remaining = process.remaining_time(),
            completed,
            "dispatch"
        );

        self.trace.push(DispatchEvent {
            process_id: process.id().to_owned(),
            start,
            end: self.clock.now(),
            completed,
        });
        Ok(completed)
    }

    /// Run every process to completion in the set's current order. This is
    /// the whole of FCFS, and the common tail of the sorting policies.
    pub(crate) fn run_to_completion(&mut self, processes: &mut ProcessSet) -> SchedulerResult<()> {
        self.admit_all(processes)?;
        for process in processes.iter_mut() {
            let burst = process.burst_time();
            self.dispatch(process, burst)?;
        }
        Ok(())
    }
}
