/*!
 * Simulation Configuration
 * Simulation files, command-line process specs and how they merge
 */

use crate::scheduler::{
    Policy, PolicyKind, PriorityOrder, Process, ProcessSet, SchedulerError,
};
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
    str::FromStr,
};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid process '{0}'. Expected BURST, BURST:PRIORITY, ID=BURST or ID=BURST:PRIORITY")]
    InvalidProcessSpec(String),

    #[error("Round robin needs a quantum")]
    MissingQuantum,

    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Scheduler(#[from] SchedulerError),
}

/// A process as written by the user. Without an id, one is generated when
/// the set is built.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProcessEntry {
    #[serde(default)]
    pub id: Option<String>,
    pub burst_time: u64,
    #[serde(default)]
    pub priority: Option<u32>,
}

impl FromStr for ProcessEntry {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ConfigError::InvalidProcessSpec(s.to_owned());

        let (id, rest) = match s.split_once('=') {
            Some((id, rest)) => (Some(id.trim().to_owned()), rest),
            None => (None, s),
        };
        let (burst, priority) = match rest.split_once(':') {
            Some((burst, priority)) => (burst, Some(priority)),
            None => (rest, None),
        };

        let burst_time = burst.trim().parse().map_err(|_| invalid())?;
        let priority = priority
            .map(|p| p.trim().parse())
            .transpose()
            .map_err(|_| invalid())?;

        Ok(Self {
            id,
            burst_time,
            priority,
        })
    }
}

/// Contents of a JSON simulation file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SimulationFile {
    #[serde(default)]
    pub policy: Option<PolicyKind>,
    #[serde(default)]
    pub quantum: Option<u64>,
    #[serde(default)]
    pub priority_order: Option<PriorityOrder>,
    pub processes: Vec<ProcessEntry>,
}

impl SimulationFile {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_owned(),
            source,
        })?;
        let file: Self = serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_owned(),
            source,
        })?;
        debug!(path = %path.display(), processes = file.processes.len(), "loaded simulation file");
        Ok(file)
    }
}

/// Values given on the command line. They win over the simulation file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub policy: Option<PolicyKind>,
    pub quantum: Option<u64>,
    pub priority_order: Option<PriorityOrder>,
    pub processes: Vec<ProcessEntry>,
}

#[derive(Debug, Clone)]
pub struct SimulationConfig {
    pub policy: Policy,
    pub processes: ProcessSet,
}

impl SimulationConfig {
    pub fn resolve(file: Option<SimulationFile>, overrides: Overrides) -> Result<Self, ConfigError> {
        let file = file.unwrap_or_default();

        let kind = overrides.policy.or(file.policy).unwrap_or_default();
        let quantum = overrides.quantum.or(file.quantum);
        let priority_order = overrides
            .priority_order
            .or(file.priority_order)
            .unwrap_or_default();

        if kind == PolicyKind::RoundRobin && quantum.is_none() {
            return Err(ConfigError::MissingQuantum);
        }
        let policy = Policy::configure(kind, quantum, priority_order)?;

        let entries: Vec<_> = file
            .processes
            .into_iter()
            .chain(overrides.processes)
            .collect();
        let processes = if entries.is_empty() {
            demo_processes()
        } else {
            build_process_set(entries)
        };

        Ok(Self { policy, processes })
    }
}

pub fn build_process_set(entries: impl IntoIterator<Item = ProcessEntry>) -> ProcessSet {
    let mut set = ProcessSet::new();
    for entry in entries {
        match (entry.id, entry.priority) {
            (Some(id), Some(priority)) => {
                set.push(Process::with_priority(id, entry.burst_time, priority))
            }
            (Some(id), None) => set.push(Process::new(id, entry.burst_time)),
            (None, priority) => {
                set.push_auto(entry.burst_time, priority);
            }
        }
    }
    set
}

/// Workload used when no processes are given.
pub fn demo_processes() -> ProcessSet {
    ProcessSet::with_processes(vec![
        Process::with_priority("P1", 5, 2),
        Process::with_priority("P2", 3, 1),
        Process::with_priority("P3", 8, 3),
        Process::with_priority("P4", 6, 2),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn test_process_spec_forms() {
        let entry: ProcessEntry = "7".parse().unwrap();
        assert_eq!(entry, ProcessEntry { id: None, burst_time: 7, priority: None });

        let entry: ProcessEntry = "7:2".parse().unwrap();
        assert_eq!(entry.priority, Some(2));

        let entry: ProcessEntry = "init=4".parse().unwrap();
        assert_eq!(entry.id.as_deref(), Some("init"));
        assert_eq!(entry.burst_time, 4);

        let entry: ProcessEntry = "init=4:1".parse().unwrap();
        assert_eq!(entry.priority, Some(1));

        assert!("abc".parse::<ProcessEntry>().is_err());
        assert!("P1=".parse::<ProcessEntry>().is_err());
        assert!("P1=3:x".parse::<ProcessEntry>().is_err());
        assert!("-3".parse::<ProcessEntry>().is_err());
    }

    #[test]
    fn test_auto_ids_fill_gaps() {
        let set = build_process_set(vec![
            "3".parse().unwrap(),
            "B=2".parse().unwrap(),
            "5:1".parse().unwrap(),
        ]);
        assert_eq!(set.ids(), vec!["P1", "B", "P3"]);
        assert_eq!(set.get("P3").and_then(Process::priority), Some(1));
    }

    #[test]
    fn test_overrides_win_over_file() {
        let file = SimulationFile {
            policy: Some(PolicyKind::Sjf),
            quantum: Some(3),
            priority_order: Some(PriorityOrder::HigherFirst),
            processes: vec!["A=1".parse().unwrap()],
        };
        let overrides = Overrides {
            policy: Some(PolicyKind::RoundRobin),
            quantum: Some(5),
            processes: vec!["B=2".parse().unwrap()],
            ..Overrides::default()
        };

        let config = SimulationConfig::resolve(Some(file), overrides).unwrap();
        assert_eq!(config.policy.kind(), PolicyKind::RoundRobin);
        assert_eq!(config.policy.quantum(), Some(5));
        assert_eq!(config.processes.ids(), vec!["A", "B"]);
    }

    #[test]
    fn test_priority_order_reaches_policy() {
        let file = SimulationFile {
            policy: Some(PolicyKind::Priority),
            priority_order: Some(PriorityOrder::HigherFirst),
            processes: vec!["A=1:1".parse().unwrap()],
            ..SimulationFile::default()
        };
        let config = SimulationConfig::resolve(Some(file), Overrides::default()).unwrap();
        assert!(matches!(
            config.policy,
            Policy::Priority(scheduler) if scheduler.order() == PriorityOrder::HigherFirst
        ));

        let overrides = Overrides {
            policy: Some(PolicyKind::Priority),
            ..Overrides::default()
        };
        let config = SimulationConfig::resolve(None, overrides).unwrap();
        assert!(matches!(
            config.policy,
            Policy::Priority(scheduler) if scheduler.order() == PriorityOrder::LowerFirst
        ));
    }

    #[test]
    fn test_round_robin_without_quantum() {
        let overrides = Overrides {
            policy: Some(PolicyKind::RoundRobin),
            ..Overrides::default()
        };
        assert!(matches!(
            SimulationConfig::resolve(None, overrides),
            Err(ConfigError::MissingQuantum)
        ));

        let overrides = Overrides {
            policy: Some(PolicyKind::RoundRobin),
            quantum: Some(0),
            ..Overrides::default()
        };
        assert!(matches!(
            SimulationConfig::resolve(None, overrides),
            Err(ConfigError::Scheduler(SchedulerError::InvalidQuantum(0)))
        ));
    }

    #[test]
    fn test_defaults_to_demo_workload() {
        let config = SimulationConfig::resolve(None, Overrides::default()).unwrap();
        assert_eq!(config.policy.kind(), PolicyKind::Fcfs);
        assert_eq!(config.processes, demo_processes());
    }

    #[test]
    fn test_load_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
                "policy": "rr",
                "quantum": 2,
                "processes": [
                    {{ "id": "P1", "burst_time": 4 }},
                    {{ "burst_time": 3, "priority": 1 }}
                ]
            }}"#
        )
        .unwrap();

        let loaded = SimulationFile::load(file.path()).unwrap();
        assert_eq!(loaded.policy, Some(PolicyKind::RoundRobin));
        assert_eq!(loaded.quantum, Some(2));
        assert_eq!(loaded.processes.len(), 2);

        let config = SimulationConfig::resolve(Some(loaded), Overrides::default()).unwrap();
        assert_eq!(config.processes.ids(), vec!["P1", "P2"]);
    }

    #[test]
    fn test_load_rejects_unknown_keys() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "processes": [], "speed": 3 }}"#).unwrap();
        assert!(matches!(
            SimulationFile::load(file.path()),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            SimulationFile::load(&dir.path().join("missing.json")),
            Err(ConfigError::Read { .. })
        ));
    }
}
