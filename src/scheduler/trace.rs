use super::process::ProcessStatus;
use serde::Serialize;

/// One stretch of CPU time given to a process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DispatchEvent {
    pub process_id: String,
    pub start: u64,
    pub end: u64,
    /// Whether the process finished at `end`.
    pub completed: bool,
}

impl DispatchEvent {
    pub fn duration(&self) -> u64 {
        self.end - self.start
    }
}

/// Time-ordered dispatch history of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Trace {
    events: Vec<DispatchEvent>,
}

impl Trace {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, event: DispatchEvent) {
        self.events.push(event);
    }

    pub fn events(&self) -> &[DispatchEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DispatchEvent> {
        self.events.iter()
    }

    /// Simulated time at which the last dispatch ended.
    pub fn total_time(&self) -> u64 {
        self.events.last().map_or(0, |event| event.end)
    }

    /// Sum of all dispatch lengths. Equals [`Trace::total_time`] on a single
    /// CPU with every process arriving at time 0.
    pub fn busy_time(&self) -> u64 {
        self.events.iter().map(DispatchEvent::duration).sum()
    }

    pub fn dispatches_of<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a DispatchEvent> {
        self.events.iter().filter(move |event| event.process_id == id)
    }

    /// Compact `id[start-end]` rendering of the whole trace.
    pub fn timeline(&self) -> String {
        self.events
            .iter()
            .map(|event| format!("{}[{}-{}]", event.process_id, event.start, event.end))
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn replay(&self) -> Replay<'_> {
        Replay {
            trace: self,
            cursor: 0,
        }
    }
}

impl<'a> IntoIterator for &'a Trace {
    type Item = &'a DispatchEvent;
    type IntoIter = std::slice::Iter<'a, DispatchEvent>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.iter()
    }
}

/// Restartable cursor that hands out dispatch events one at a time, for
/// front-ends that pace the playback themselves.
#[derive(Debug, Clone)]
pub struct Replay<'a> {
    trace: &'a Trace,
    cursor: usize,
}

impl<'a> Replay<'a> {
    pub fn restart(&mut self) {
        self.cursor = 0;
    }

    /// Number of events replayed so far.
    pub fn position(&self) -> usize {
        self.cursor
    }

    pub fn is_finished(&self) -> bool {
        self.cursor >= self.trace.len()
    }

    /// The most recently replayed event.
    pub fn current(&self) -> Option<&'a DispatchEvent> {
        self.cursor
            .checked_sub(1)
            .and_then(|index| self.trace.events.get(index))
    }

    /// Simulated time reached by the replay.
    pub fn now(&self) -> u64 {
        self.current().map_or(0, |event| event.end)
    }

    /// Status of `id` as of the replay point. Every process is ready from
    /// time 0; the process of the current event is shown running until the
    /// replay moves past it.
    pub fn status_of(&self, id: &str) -> ProcessStatus {
        let replayed = &self.trace.events[..self.cursor.min(self.trace.len())];
        let last = replayed
            .iter()
            .enumerate()
            .rev()
            .find(|(_, event)| event.process_id == id);

        match last {
            None => ProcessStatus::Ready,
            Some((index, event)) => {
                let is_current = index + 1 == self.cursor;
                if is_current && !self.is_finished() {
                    ProcessStatus::Running
                } else if event.completed {
                    ProcessStatus::Completed
                } else {
                    ProcessStatus::Ready
                }
            }
        }
    }
}

impl<'a> Iterator for Replay<'a> {
    type Item = &'a DispatchEvent;

    fn next(&mut self) -> Option<Self::Item> {
        let event = self.trace.events.get(self.cursor)?;
        self.cursor += 1;
        Some(event)
    }
}
