use super::display::{DisplayTerminal, ReplayFrame};
use crate::scheduler::{Metrics, ProcessSet, Replay};
use std::{io, time::Duration};
use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunnerEvent {
    Quit,
    Pause,
    Resume,
    Step,
    Restart,
    Tick,
    None,
}

/// Playback position and pause flag, independent of any terminal.
#[derive(Debug, Clone)]
pub struct ReplayState<'a> {
    replay: Replay<'a>,
    paused: bool,
}

impl<'a> ReplayState<'a> {
    pub fn new(replay: Replay<'a>) -> Self {
        Self {
            replay,
            paused: false,
        }
    }

    pub fn replay(&self) -> &Replay<'a> {
        &self.replay
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    fn step(&mut self) {
        // trace level: anything louder lands on stderr under the TUI
        if let Some(event) = self.replay.next() {
            trace!(
                process = %event.process_id,
                start = event.start,
                end = event.end,
                "replayed dispatch"
            );
        }
    }

    /// Apply one runner event. Returns false if the replay should quit.
    ///
    /// Ticks advance only while playing; `s` advances only while paused.
    pub fn apply(&mut self, event: RunnerEvent) -> bool {
        match event {
            RunnerEvent::Quit => return false,
            RunnerEvent::Pause if !self.paused => self.paused = true,
            RunnerEvent::Resume if self.paused => self.paused = false,
            RunnerEvent::Step if self.paused => self.step(),
            RunnerEvent::Restart => self.replay.restart(),
            RunnerEvent::Tick if !self.paused => self.step(),
            _ => {}
        }
        true
    }
}

/// Plays a finished run back one dispatch per tick.
pub struct ReplayRunner<'a> {
    terminal: DisplayTerminal,
    title: String,
    processes: &'a ProcessSet,
    state: ReplayState<'a>,
    metrics: Metrics,
}

impl<'a> ReplayRunner<'a> {
    pub fn new(
        title: String,
        processes: &'a ProcessSet,
        replay: Replay<'a>,
        metrics: Metrics,
        tick_rate: Duration,
    ) -> Result<Self, io::Error> {
        let terminal = DisplayTerminal::new(tick_rate)?;

        Ok(Self {
            terminal,
            title,
            processes,
            state: ReplayState::new(replay),
            metrics,
        })
    }

    // Returns false if the program should quit
    pub fn run(&mut self) -> Result<bool, io::Error> {
        self.terminal.draw(&ReplayFrame {
            title: &self.title,
            processes: self.processes,
            replay: self.state.replay(),
            metrics: &self.metrics,
            paused: self.state.is_paused(),
        })?;

        let event = self.terminal.get_input();
        Ok(self.state.apply(event))
    }
}
