use super::{
    context::RunContext,
    error::{SchedulerError, SchedulerResult},
    Process, ProcessSet, SchedulingPolicy,
};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::{cmp::Ordering, fmt, str::FromStr};

/// Which end of the priority scale runs first.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum PriorityOrder {
    /// 1 is the most urgent priority.
    #[default]
    LowerFirst,
    /// The largest value is the most urgent priority.
    HigherFirst,
}

impl PriorityOrder {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::LowerFirst => "lower-first",
            Self::HigherFirst => "higher-first",
        }
    }

    /// `Less` means `a` is dispatched before `b`.
    pub fn compare(&self, a: Option<u32>, b: Option<u32>) -> Ordering {
        match self {
            Self::LowerFirst => a.cmp(&b),
            Self::HigherFirst => b.cmp(&a),
        }
    }
}

impl FromStr for PriorityOrder {
    type Err = SchedulerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "lower-first" | "lower_first" | "lower" | "ascending" => Ok(Self::LowerFirst),
            "higher-first" | "higher_first" | "higher" | "descending" => Ok(Self::HigherFirst),
            _ => Err(SchedulerError::UnknownPriorityOrder(s.to_owned())),
        }
    }
}

impl fmt::Display for PriorityOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for PriorityOrder {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for PriorityOrder {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Non-preemptive priority scheduling.
///
/// Equal priorities go longest burst first, then submission order. This is
/// not the tie-break SJF uses, and existing workloads depend on it.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PriorityScheduler {
    order: PriorityOrder,
}

impl PriorityScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_order(order: PriorityOrder) -> Self {
        Self { order }
    }

    pub fn order(&self) -> PriorityOrder {
        self.order
    }

    fn dispatch_order(&self, a: &Process, b: &Process) -> Ordering {
        self.order
            .compare(a.priority(), b.priority())
            .then_with(|| b.burst_time().cmp(&a.burst_time()))
    }
}

impl SchedulingPolicy for PriorityScheduler {
    const NAME: &'static str = "Priority";

    fn validate(&self, processes: &ProcessSet) -> SchedulerResult<()> {
        processes.validate(true)
    }

    fn schedule(&self, processes: &mut ProcessSet, context: &mut RunContext) -> SchedulerResult<()> {
        processes.sort_by(|a, b| self.dispatch_order(a, b));
        context.run_to_completion(processes)
    }
}
