/*!
 * Run Report
 * Annotated processes, trace and averages of one simulation run
 */

use crate::scheduler::{
    Metrics, Policy, PolicyKind, PriorityOrder, ProcessSet, SchedulerResult, Trace,
};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Serialize)]
pub struct RunReport<'a> {
    pub policy: PolicyKind,
    pub policy_name: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantum: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority_order: Option<PriorityOrder>,
    pub processes: &'a ProcessSet,
    pub trace: &'a Trace,
    pub metrics: Metrics,
}

impl<'a> RunReport<'a> {
    /// `processes` must be the set the policy just ran on.
    pub fn new(policy: &Policy, processes: &'a ProcessSet, trace: &'a Trace) -> SchedulerResult<Self> {
        let priority_order = match policy {
            Policy::Priority(scheduler) => Some(scheduler.order()),
            _ => None,
        };

        Ok(Self {
            policy: policy.kind(),
            policy_name: policy.name(),
            quantum: policy.quantum(),
            priority_order,
            processes,
            trace,
            metrics: Metrics::from_processes(processes)?,
        })
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl fmt::Display for RunReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.policy_name)?;
        if let Some(quantum) = self.quantum {
            write!(f, " (quantum {})", quantum)?;
        }
        if let Some(order) = self.priority_order {
            write!(f, " ({})", order)?;
        }
        writeln!(f)?;

        if self.processes.is_empty() {
            return writeln!(f, "No processes.");
        }

        let id_width = self
            .processes
            .iter()
            .map(|process| process.id().len())
            .max()
            .unwrap_or(0)
            .max(2);

        writeln!(
            f,
            "{:<id_width$}  {:>5}  {:>8}  {:>7}  {:>10}  Status",
            "ID", "Burst", "Priority", "Waiting", "Turnaround"
        )?;
        for process in self.processes {
            let priority = process
                .priority()
                .map_or_else(|| "-".to_owned(), |p| p.to_string());
            writeln!(
                f,
                "{:<id_width$}  {:>5}  {:>8}  {:>7}  {:>10}  {}",
                process.id(),
                process.burst_time(),
                priority,
                process.waiting_time(),
                process.turnaround_time(),
                process.status().as_str()
            )?;
        }

        writeln!(f)?;
        writeln!(f, "Timeline: {}", self.trace.timeline())?;
        writeln!(
            f,
            "Average waiting time: {:.2}",
            self.metrics.average_waiting_time
        )?;
        writeln!(
            f,
            "Average turnaround time: {:.2}",
            self.metrics.average_turnaround_time
        )?;
        writeln!(f, "Total time: {}", self.metrics.total_time)
    }
}
