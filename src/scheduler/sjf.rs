use super::{context::RunContext, error::SchedulerResult, ProcessSet, SchedulingPolicy};

/// Non-preemptive shortest-job-first. Equal bursts keep submission order.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SjfScheduler;

impl SjfScheduler {
    pub fn new() -> Self {
        Self
    }
}

impl SchedulingPolicy for SjfScheduler {
    const NAME: &'static str = "Shortest-Job-First";

    fn validate(&self, processes: &ProcessSet) -> SchedulerResult<()> {
        processes.validate(false)
    }

    fn schedule(&self, processes: &mut ProcessSet, context: &mut RunContext) -> SchedulerResult<()> {
        processes.sort_by(|a, b| a.burst_time().cmp(&b.burst_time()));
        context.run_to_completion(processes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::Process;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_shortest_first() {
        let mut set = ProcessSet::with_processes(vec![
            Process::new("P1", 5),
            Process::new("P2", 3),
            Process::new("P3", 8),
        ]);
        SjfScheduler::new().run(&mut set).unwrap();

        assert_eq!(set.ids(), vec!["P2", "P1", "P3"]);
        let waiting: Vec<_> = set.iter().map(|p| p.waiting_time()).collect();
        let turnaround: Vec<_> = set.iter().map(|p| p.turnaround_time()).collect();
        assert_eq!(waiting, vec![0, 3, 8]);
        assert_eq!(turnaround, vec![3, 8, 16]);
    }

    #[test]
    fn test_ties_keep_submission_order() {
        let mut set = ProcessSet::with_processes(vec![
            Process::new("C", 4),
            Process::new("A", 2),
            Process::new("B", 4),
            Process::new("D", 2),
        ]);
        SjfScheduler::new().run(&mut set).unwrap();
        assert_eq!(set.ids(), vec!["A", "D", "C", "B"]);
    }
}
