use super::{context::RunContext, error::SchedulerResult, ProcessSet, SchedulingPolicy};

/// First-come-first-served: run every process in submission order.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FcfsScheduler;

impl FcfsScheduler {
    pub fn new() -> Self {
        Self
    }
}

impl SchedulingPolicy for FcfsScheduler {
    const NAME: &'static str = "First-Come-First-Served";

    fn validate(&self, processes: &ProcessSet) -> SchedulerResult<()> {
        processes.validate(false)
    }

    fn schedule(&self, processes: &mut ProcessSet, context: &mut RunContext) -> SchedulerResult<()> {
        context.run_to_completion(processes)
    }
}
