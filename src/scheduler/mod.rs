mod clock;
mod context;
mod error;
mod fcfs;
mod metrics;
mod policy;
mod priority;
mod process;
mod round_robin;
mod sjf;
mod trace;

pub use clock::SimulationClock;
pub use context::RunContext;
pub use error::{SchedulerError, SchedulerResult};
pub use fcfs::FcfsScheduler;
pub use metrics::Metrics;
pub use policy::{Policy, PolicyKind};
pub use priority::{PriorityOrder, PriorityScheduler};
pub use process::{Process, ProcessSet, ProcessStatus};
pub use round_robin::RoundRobinScheduler;
pub use sjf::SjfScheduler;
pub use trace::{DispatchEvent, Replay, Trace};

use tracing::{info, warn};

pub trait SchedulingPolicy {
    const NAME: &'static str;

    /// Reject input this policy cannot run. Called before anything is
    /// mutated.
    fn validate(&self, processes: &ProcessSet) -> SchedulerResult<()>;

    /// Drive every process of a validated, freshly reset set to completion.
    fn schedule(&self, processes: &mut ProcessSet, context: &mut RunContext) -> SchedulerResult<()>;

    /// Validate, reset and simulate `processes`, annotating them in place.
    /// Either the whole run happens or the set is left untouched.
    fn run(&self, processes: &mut ProcessSet) -> SchedulerResult<Trace> {
        if let Err(error) = self.validate(processes) {
            warn!(policy = Self::NAME, %error, "rejected process set");
            return Err(error);
        }

        processes.reset();
        let mut context = RunContext::new();
        self.schedule(processes, &mut context)?;

        info!(
            policy = Self::NAME,
            processes = processes.len(),
            dispatches = context.trace().len(),
            total_time = context.now(),
            "simulation complete"
        );
        Ok(context.into_trace())
    }
}
