use super::error::{SchedulerError, SchedulerResult};
use serde::Serialize;
use std::{cmp::Ordering, collections::HashSet};

/// Lifecycle of a simulated process.
///
/// `New -> Ready -> Running -> Completed`, with `Running -> Ready` allowed
/// for preemption. Nothing ever goes back to `New` except through
/// [`Process::reset`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ProcessStatus {
    New,
    Ready,
    Running,
    Completed,
}

impl ProcessStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::New => "New",
            Self::Ready => "Ready",
            Self::Running => "Running",
            Self::Completed => "Completed",
        }
    }

    pub const fn can_become(&self, next: ProcessStatus) -> bool {
        matches!(
            (self, next),
            (Self::New, Self::Ready)
                | (Self::Ready, Self::Running)
                | (Self::Running, Self::Ready)
                | (Self::Running, Self::Completed)
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Process {
    id: String,
    burst_time: u64,
    priority: Option<u32>,
    remaining_time: u64,
    waiting_time: u64,
    turnaround_time: u64,
    status: ProcessStatus,
}

impl Process {
    pub fn new(id: impl Into<String>, burst_time: u64) -> Self {
        Self {
            id: id.into(),
            burst_time,
            priority: None,
            remaining_time: burst_time,
            waiting_time: 0,
            turnaround_time: 0,
            status: ProcessStatus::New,
        }
    }

    pub fn with_priority(id: impl Into<String>, burst_time: u64, priority: u32) -> Self {
        Self {
            priority: Some(priority),
            ..Process::new(id, burst_time)
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn burst_time(&self) -> u64 {
        self.burst_time
    }

    pub fn priority(&self) -> Option<u32> {
        self.priority
    }

    pub fn remaining_time(&self) -> u64 {
        self.remaining_time
    }

    pub fn waiting_time(&self) -> u64 {
        self.waiting_time
    }

    pub fn turnaround_time(&self) -> u64 {
        self.turnaround_time
    }

    pub fn status(&self) -> ProcessStatus {
        self.status
    }

    pub fn is_completed(&self) -> bool {
        self.status == ProcessStatus::Completed
    }

    /// Restore the creation state so the process can go through another run.
    pub fn reset(&mut self) {
        self.remaining_time = self.burst_time;
        self.waiting_time = 0;
        self.turnaround_time = 0;
        self.status = ProcessStatus::New;
    }

    pub(crate) fn transition(&mut self, next: ProcessStatus) -> SchedulerResult<()> {
        if !self.status.can_become(next) {
            return Err(SchedulerError::InvalidTransition {
                id: self.id.clone(),
                from: self.status,
                to: next,
            });
        }
        self.status = next;
        Ok(())
    }

    /// Consume up to `slice` ticks of the remaining burst and return how many
    /// ticks were actually used.
    pub(crate) fn execute(&mut self, slice: u64) -> u64 {
        let used = slice.min(self.remaining_time);
        self.remaining_time -= used;
        used
    }

    /// Finish the process at simulated time `now`. Arrival is always 0, so
    /// the turnaround time is the completion time.
    pub(crate) fn complete(&mut self, now: u64) -> SchedulerResult<()> {
        self.transition(ProcessStatus::Completed)?;
        self.remaining_time = 0;
        self.turnaround_time = now;
        self.waiting_time = now - self.burst_time;
        Ok(())
    }
}

/// The processes submitted for one simulation run, in submission order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ProcessSet {
    processes: Vec<Process>,
}

impl ProcessSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_processes(processes: Vec<Process>) -> Self {
        Self { processes }
    }

    pub fn push(&mut self, process: Process) {
        self.processes.push(process);
    }

    /// Add a process under the next free `P<n>` id.
    pub fn push_auto(&mut self, burst_time: u64, priority: Option<u32>) -> &Process {
        let id = self.next_auto_id();
        self.processes.push(Process {
            priority,
            ..Process::new(id, burst_time)
        });
        &self.processes[self.processes.len() - 1]
    }

    fn next_auto_id(&self) -> String {
        (self.processes.len() + 1..)
            .map(|n| format!("P{}", n))
            .find(|candidate| self.get(candidate).is_none())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.processes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.processes.is_empty()
    }

    pub fn processes(&self) -> &[Process] {
        &self.processes
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Process> {
        self.processes.iter()
    }

    pub fn get(&self, id: &str) -> Option<&Process> {
        self.processes.iter().find(|process| process.id() == id)
    }

    pub fn ids(&self) -> Vec<&str> {
        self.processes.iter().map(Process::id).collect()
    }

    pub fn is_completed(&self) -> bool {
        self.processes.iter().all(Process::is_completed)
    }

    pub fn reset(&mut self) {
        self.processes.iter_mut().for_each(Process::reset);
    }

    /// Check every process against the input rules. `require_priority` is set
    /// by policies that order by priority.
    ///
    /// The sum of all bursts is the last completion time under every policy,
    /// so it must fit the clock.
    pub fn validate(&self, require_priority: bool) -> SchedulerResult<()> {
        let mut seen = HashSet::with_capacity(self.processes.len());
        let mut total_burst: u64 = 0;

        for (position, process) in self.processes.iter().enumerate() {
            if process.id.trim().is_empty() {
                return Err(SchedulerError::EmptyProcessId { position });
            }
            if process.burst_time == 0 {
                return Err(SchedulerError::InvalidBurstTime {
                    id: process.id.clone(),
                    burst_time: process.burst_time,
                });
            }
            match process.priority {
                Some(0) => {
                    return Err(SchedulerError::InvalidPriority {
                        id: process.id.clone(),
                        priority: 0,
                    })
                }
                None if require_priority => {
                    return Err(SchedulerError::MissingPriority(process.id.clone()))
                }
                _ => {}
            }
            if !seen.insert(process.id.as_str()) {
                return Err(SchedulerError::DuplicateProcessId(process.id.clone()));
            }
            total_burst = total_burst
                .checked_add(process.burst_time)
                .ok_or_else(|| SchedulerError::TimeOverflow(process.id.clone()))?;
        }
        Ok(())
    }

    /// Stable sort, so equal keys keep submission order.
    pub(crate) fn sort_by<F>(&mut self, compare: F)
    where
        F: FnMut(&Process, &Process) -> Ordering,
    {
        self.processes.sort_by(compare);
    }

    pub(crate) fn get_mut(&mut self, index: usize) -> Option<&mut Process> {
        self.processes.get_mut(index)
    }

    pub(crate) fn iter_mut(&mut self) -> std::slice::IterMut<'_, Process> {
        self.processes.iter_mut()
    }
}

impl FromIterator<Process> for ProcessSet {
    fn from_iter<I: IntoIterator<Item = Process>>(iter: I) -> Self {
        Self::with_processes(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a ProcessSet {
    type Item = &'a Process;
    type IntoIter = std::slice::Iter<'a, Process>;

    fn into_iter(self) -> Self::IntoIter {
        self.processes.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_new_process_starts_fresh() {
        let process = Process::new("P1", 5);
        assert_eq!(process.status(), ProcessStatus::New);
        assert_eq!(process.remaining_time(), 5);
        assert_eq!(process.waiting_time(), 0);
        assert_eq!(process.turnaround_time(), 0);
        assert_eq!(process.priority(), None);
    }

    #[test]
    fn test_status_transitions() {
        let mut process = Process::new("P1", 5);
        assert!(process.transition(ProcessStatus::Running).is_err());
        process.transition(ProcessStatus::Ready).unwrap();
        process.transition(ProcessStatus::Running).unwrap();
        process.transition(ProcessStatus::Ready).unwrap();
        process.transition(ProcessStatus::Running).unwrap();
        process.complete(9).unwrap();

        assert_eq!(process.turnaround_time(), 9);
        assert_eq!(process.waiting_time(), 4);
        assert_eq!(process.remaining_time(), 0);

        // Completed is terminal
        assert_eq!(
            process.transition(ProcessStatus::Ready),
            Err(SchedulerError::InvalidTransition {
                id: "P1".to_owned(),
                from: ProcessStatus::Completed,
                to: ProcessStatus::Ready,
            })
        );
    }

    #[test]
    fn test_execute_never_overshoots() {
        let mut process = Process::new("P1", 3);
        assert_eq!(process.execute(2), 2);
        assert_eq!(process.execute(2), 1);
        assert_eq!(process.remaining_time(), 0);
    }

    #[test]
    fn test_reset_restores_creation_state() {
        let mut process = Process::with_priority("P1", 4, 2);
        process.transition(ProcessStatus::Ready).unwrap();
        process.transition(ProcessStatus::Running).unwrap();
        process.execute(4);
        process.complete(10).unwrap();

        process.reset();
        assert_eq!(process, Process::with_priority("P1", 4, 2));
    }

    #[test]
    fn test_auto_ids_skip_taken_names() {
        let mut set = ProcessSet::new();
        set.push(Process::new("P2", 1));
        assert_eq!(set.push_auto(3, None).id(), "P3");
        assert_eq!(set.push_auto(4, Some(1)).id(), "P4");
        assert_eq!(set.ids(), vec!["P2", "P3", "P4"]);
        assert_eq!(set.get("P4").and_then(Process::priority), Some(1));
    }

    #[test]
    fn test_validation() {
        let ok = ProcessSet::with_processes(vec![Process::new("A", 1), Process::new("B", 2)]);
        assert!(ok.validate(false).is_ok());
        assert_eq!(
            ok.validate(true),
            Err(SchedulerError::MissingPriority("A".to_owned()))
        );

        let empty_id = ProcessSet::with_processes(vec![Process::new("A", 1), Process::new(" ", 2)]);
        assert_eq!(
            empty_id.validate(false),
            Err(SchedulerError::EmptyProcessId { position: 1 })
        );

        let zero_burst = ProcessSet::with_processes(vec![Process::new("A", 0)]);
        assert!(matches!(
            zero_burst.validate(false),
            Err(SchedulerError::InvalidBurstTime { .. })
        ));

        let zero_priority = ProcessSet::with_processes(vec![Process::with_priority("A", 1, 0)]);
        assert!(matches!(
            zero_priority.validate(false),
            Err(SchedulerError::InvalidPriority { .. })
        ));

        let duplicate = ProcessSet::with_processes(vec![Process::new("A", 1), Process::new("A", 2)]);
        assert_eq!(
            duplicate.validate(false),
            Err(SchedulerError::DuplicateProcessId("A".to_owned()))
        );

        let overflow = ProcessSet::with_processes(vec![Process::new("A", u64::MAX), Process::new("B", 1)]);
        assert_eq!(
            overflow.validate(false),
            Err(SchedulerError::TimeOverflow("B".to_owned()))
        );

        let at_limit = ProcessSet::with_processes(vec![Process::new("A", u64::MAX - 1), Process::new("B", 1)]);
        assert!(at_limit.validate(false).is_ok());
    }
}
