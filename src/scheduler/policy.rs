use super::{
    error::{SchedulerError, SchedulerResult},
    FcfsScheduler, PriorityOrder, PriorityScheduler, ProcessSet, RoundRobinScheduler,
    SchedulingPolicy, SjfScheduler, Trace,
};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::{fmt, str::FromStr};

/// Policy name without its options, as typed by a user.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum PolicyKind {
    #[default]
    Fcfs,
    Sjf,
    Priority,
    RoundRobin,
}

impl PolicyKind {
    pub const ALL: [PolicyKind; 4] = [Self::Fcfs, Self::Sjf, Self::Priority, Self::RoundRobin];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Fcfs => "fcfs",
            Self::Sjf => "sjf",
            Self::Priority => "priority",
            Self::RoundRobin => "rr",
        }
    }
}

impl FromStr for PolicyKind {
    type Err = SchedulerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "fcfs" | "first-come" | "first_come" => Ok(Self::Fcfs),
            "sjf" | "shortest" | "shortest-job-first" => Ok(Self::Sjf),
            "priority" | "prio" => Ok(Self::Priority),
            "rr" | "round-robin" | "round_robin" | "roundrobin" => Ok(Self::RoundRobin),
            _ => Err(SchedulerError::UnknownPolicy(s.to_owned())),
        }
    }
}

impl fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for PolicyKind {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for PolicyKind {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// A fully configured policy, for callers that pick the algorithm at run
/// time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Policy {
    Fcfs(FcfsScheduler),
    Sjf(SjfScheduler),
    Priority(PriorityScheduler),
    RoundRobin(RoundRobinScheduler),
}

impl Policy {
    /// `quantum` is only read for round robin, where it is required.
    pub fn configure(
        kind: PolicyKind,
        quantum: Option<u64>,
        order: PriorityOrder,
    ) -> SchedulerResult<Self> {
        Ok(match kind {
            PolicyKind::Fcfs => Self::Fcfs(FcfsScheduler::new()),
            PolicyKind::Sjf => Self::Sjf(SjfScheduler::new()),
            PolicyKind::Priority => Self::Priority(PriorityScheduler::with_order(order)),
            PolicyKind::RoundRobin => {
                Self::RoundRobin(RoundRobinScheduler::new(quantum.unwrap_or(0))?)
            }
        })
    }

    pub fn kind(&self) -> PolicyKind {
        match self {
            Self::Fcfs(_) => PolicyKind::Fcfs,
            Self::Sjf(_) => PolicyKind::Sjf,
            Self::Priority(_) => PolicyKind::Priority,
            Self::RoundRobin(_) => PolicyKind::RoundRobin,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Fcfs(_) => FcfsScheduler::NAME,
            Self::Sjf(_) => SjfScheduler::NAME,
            Self::Priority(_) => PriorityScheduler::NAME,
            Self::RoundRobin(_) => RoundRobinScheduler::NAME,
        }
    }

    pub fn quantum(&self) -> Option<u64> {
        match self {
            Self::RoundRobin(scheduler) => Some(scheduler.quantum()),
            _ => None,
        }
    }

    pub fn run(&self, processes: &mut ProcessSet) -> SchedulerResult<Trace> {
        match self {
            Self::Fcfs(scheduler) => scheduler.run(processes),
            Self::Sjf(scheduler) => scheduler.run(processes),
            Self::Priority(scheduler) => scheduler.run(processes),
            Self::RoundRobin(scheduler) => scheduler.run(processes),
        }
    }
}
