/// Simulated time. Only ever moves forward, and only when a policy
/// dispatches a process.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SimulationClock {
    now: u64,
}

impl SimulationClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> u64 {
        self.now
    }

    /// Advance by `ticks`, returning the time at which the advance started.
    pub fn advance(&mut self, ticks: u64) -> u64 {
        let start = self.now;
        self.now += ticks;
        start
    }
}
