/*!
 * CPU scheduling simulator
 * FCFS, SJF, Priority and Round Robin over a simulated clock
 */

pub mod config;
pub mod logging;
pub mod report;
pub mod scheduler;
pub mod terminal;
