mod display;
mod runner;

pub use display::{runner_event, DisplayEvent, DisplayTerminal, ReplayFrame};
pub use runner::{ReplayRunner, ReplayState, RunnerEvent};
