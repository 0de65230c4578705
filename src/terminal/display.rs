use super::runner::RunnerEvent;
use crate::scheduler::{Metrics, ProcessSet, ProcessStatus, Replay};
use crossterm::event::{self, Event, KeyCode, KeyEvent};
use std::{
    io::{self, Stdout},
    sync::mpsc::{self, Receiver},
    thread,
    time::{Duration, Instant},
};
use tui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Table, Wrap},
    Terminal,
};

pub enum DisplayEvent {
    Input(KeyEvent),
    Tick,
}

/// Everything one frame needs.
pub struct ReplayFrame<'a, 'r> {
    pub title: &'a str,
    pub processes: &'a ProcessSet,
    pub replay: &'a Replay<'r>,
    pub metrics: &'a Metrics,
    pub paused: bool,
}

pub struct DisplayTerminal {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    input_rx: Receiver<DisplayEvent>,
}

impl DisplayTerminal {
    pub fn new(tick_rate: Duration) -> Result<Self, io::Error> {
        let backend = CrosstermBackend::new(io::stdout());
        let terminal = Terminal::new(backend)?;

        // Raw mode only once nothing else can fail; Drop turns it off again
        crossterm::terminal::enable_raw_mode()?;

        // Input thread; exits once the receiver is gone or the terminal fails
        let (input_tx, input_rx) = mpsc::channel();
        thread::spawn(move || {
            let mut last_tick = Instant::now();
            loop {
                let timeout = tick_rate
                    .checked_sub(last_tick.elapsed())
                    .unwrap_or(Duration::ZERO);

                match event::poll(timeout) {
                    Ok(true) => {
                        if let Ok(Event::Key(key)) = event::read() {
                            if input_tx.send(DisplayEvent::Input(key)).is_err() {
                                break;
                            }
                        }
                    }
                    Ok(false) => {}
                    Err(_) => break,
                }

                if last_tick.elapsed() >= tick_rate {
                    if input_tx.send(DisplayEvent::Tick).is_err() {
                        break;
                    }
                    last_tick = Instant::now();
                }
            }
        });

        Ok(Self { terminal, input_rx })
    }

    pub fn draw(&mut self, frame: &ReplayFrame<'_, '_>) -> Result<(), io::Error> {
        let rows = table_rows(frame.processes, frame.replay);
        let id_width = rows
            .iter()
            .map(|row| row[0].len())
            .max()
            .unwrap_or(0)
            .max(2) as u16;
        let widths = [
            Constraint::Length(id_width),
            Constraint::Length(5),
            Constraint::Length(8),
            Constraint::Length(9),
            Constraint::Length(7),
            Constraint::Length(10),
        ];

        self.terminal.draw(|f| {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .margin(1)
                .constraints([
                    Constraint::Length(3),
                    Constraint::Min(5),
                    Constraint::Length(4),
                    Constraint::Length(3),
                ])
                .split(f.size());

            let current = Paragraph::new(dispatch_line(frame.replay, frame.paused))
                .style(
                    Style::default()
                        .add_modifier(Modifier::BOLD)
                        .fg(Color::LightBlue),
                )
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .title("Current Dispatch")
                        .border_type(BorderType::Rounded),
                );
            f.render_widget(current, chunks[0]);

            let items = rows.iter().map(|row| {
                Row::new(vec![
                    Cell::from(row[0].as_str()).style(Style::default().add_modifier(Modifier::BOLD)),
                    Cell::from(row[1].as_str()),
                    Cell::from(row[2].as_str()),
                    Cell::from(row[3].as_str()),
                    Cell::from(row[4].as_str()),
                    Cell::from(row[5].as_str()),
                ])
            });

            let table = Table::new(items)
                .header(
                    Row::new(vec!["ID", "Burst", "Priority", "Status", "Waiting", "Turnaround"])
                        .style(Style::default().add_modifier(Modifier::BOLD)),
                )
                .widths(&widths)
                .block(Block::default().title(frame.title).borders(Borders::ALL))
                .style(Style::default().fg(Color::LightGreen))
                .column_spacing(2);
            f.render_widget(table, chunks[1]);

            let timeline = Paragraph::new(timeline_line(frame.replay))
                .wrap(Wrap { trim: true })
                .block(Block::default().title("Timeline").borders(Borders::ALL));
            f.render_widget(timeline, chunks[2]);

            let summary = Paragraph::new(summary_line(frame.replay, frame.metrics))
                .block(Block::default().borders(Borders::ALL));
            f.render_widget(summary, chunks[3]);
        })?;
        Ok(())
    }

    pub fn get_input(&self) -> RunnerEvent {
        // A closed channel means the input thread is gone; nothing left to drive
        match self.input_rx.recv() {
            Ok(event) => runner_event(event),
            Err(_) => RunnerEvent::Quit,
        }
    }
}

/// Key bindings of the replay.
pub fn runner_event(event: DisplayEvent) -> RunnerEvent {
    match event {
        DisplayEvent::Input(key) if key.modifiers.is_empty() => match key.code {
            KeyCode::Char('q') => RunnerEvent::Quit,
            KeyCode::Char('p') => RunnerEvent::Pause,
            KeyCode::Char('r') => RunnerEvent::Resume,
            KeyCode::Char('s') => RunnerEvent::Step,
            KeyCode::Char('b') => RunnerEvent::Restart,
            _ => RunnerEvent::None,
        },
        DisplayEvent::Input(_) => RunnerEvent::None,
        DisplayEvent::Tick => RunnerEvent::Tick,
    }
}

impl Drop for DisplayTerminal {
    fn drop(&mut self) {
        let _ = crossterm::terminal::disable_raw_mode();
    }
}

/// Table cells as of the replay point. Metrics only show up once the
/// replay has reached the process's completion.
fn table_rows(processes: &ProcessSet, replay: &Replay<'_>) -> Vec<[String; 6]> {
    processes
        .iter()
        .map(|process| {
            let status = replay.status_of(process.id());
            let (waiting, turnaround) = if status == ProcessStatus::Completed {
                (
                    process.waiting_time().to_string(),
                    process.turnaround_time().to_string(),
                )
            } else {
                ("-".to_owned(), "-".to_owned())
            };

            [
                process.id().to_owned(),
                process.burst_time().to_string(),
                process
                    .priority()
                    .map_or_else(|| "-".to_owned(), |p| p.to_string()),
                status.as_str().to_owned(),
                waiting,
                turnaround,
            ]
        })
        .collect()
}

fn dispatch_line(replay: &Replay<'_>, paused: bool) -> String {
    let line = match replay.current() {
        Some(event) if replay.is_finished() => {
            format!("Replay finished at t={}", event.end)
        }
        Some(event) => format!(
            "{} | {} -> {}{}",
            event.process_id,
            event.start,
            event.end,
            if event.completed { " | completes" } else { "" }
        ),
        None if replay.is_finished() => "No processes to run.".to_owned(),
        None => "Waiting to start.".to_owned(),
    };

    if paused {
        format!("{} [paused]", line)
    } else {
        line
    }
}

fn timeline_line(replay: &Replay<'_>) -> String {
    let mut shown = replay.clone();
    let position = shown.position();
    shown.restart();
    shown
        .take(position)
        .map(|event| format!("{}[{}-{}]", event.process_id, event.start, event.end))
        .collect::<Vec<_>>()
        .join(" ")
}

fn summary_line(replay: &Replay<'_>, metrics: &Metrics) -> String {
    if replay.is_finished() {
        format!(
            "Average waiting: {:.2} | Average turnaround: {:.2} | q quit, b restart",
            metrics.average_waiting_time, metrics.average_turnaround_time
        )
    } else {
        format!(
            "t={} | q quit, p pause, r resume, s step, b restart",
            replay.now()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::{Process, RoundRobinScheduler, SchedulingPolicy};
    use crossterm::event::KeyModifiers;
    use pretty_assertions::assert_eq;

    fn key(c: char) -> DisplayEvent {
        DisplayEvent::Input(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE))
    }

    #[test]
    fn test_key_bindings() {
        assert_eq!(runner_event(key('q')), RunnerEvent::Quit);
        assert_eq!(runner_event(key('p')), RunnerEvent::Pause);
        assert_eq!(runner_event(key('r')), RunnerEvent::Resume);
        assert_eq!(runner_event(key('s')), RunnerEvent::Step);
        assert_eq!(runner_event(key('b')), RunnerEvent::Restart);
        assert_eq!(runner_event(key('x')), RunnerEvent::None);
        assert_eq!(runner_event(DisplayEvent::Tick), RunnerEvent::Tick);

        // Ctrl+q is not q
        let ctrl_q = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::CONTROL);
        assert_eq!(runner_event(DisplayEvent::Input(ctrl_q)), RunnerEvent::None);
    }

    fn scenario() -> (ProcessSet, crate::scheduler::Trace) {
        let mut set = ProcessSet::with_processes(vec![Process::new("P1", 4), Process::new("P2", 3)]);
        let trace = RoundRobinScheduler::new(2).unwrap().run(&mut set).unwrap();
        (set, trace)
    }

    #[test]
    fn test_rows_hide_unfinished_metrics() {
        let (set, trace) = scenario();
        let mut replay = trace.replay();
        replay.next();
        replay.next();
        replay.next();

        // P1's last slice is on the CPU
        let rows = table_rows(&set, &replay);
        assert_eq!(rows[0], ["P1", "4", "-", "Running", "-", "-"].map(String::from));
        assert_eq!(rows[1], ["P2", "3", "-", "Ready", "-", "-"].map(String::from));

        replay.next();
        let rows = table_rows(&set, &replay);
        assert_eq!(rows[0], ["P1", "4", "-", "Completed", "2", "6"].map(String::from));
        assert_eq!(rows[1], ["P2", "3", "-", "Completed", "4", "7"].map(String::from));
    }

    #[test]
    fn test_lines_follow_replay() {
        let (_, trace) = scenario();
        let mut replay = trace.replay();
        assert_eq!(dispatch_line(&replay, false), "Waiting to start.");
        assert_eq!(timeline_line(&replay), "");

        replay.next();
        assert_eq!(dispatch_line(&replay, true), "P1 | 0 -> 2 [paused]");
        assert_eq!(timeline_line(&replay), "P1[0-2]");

        replay.by_ref().for_each(drop);
        assert_eq!(dispatch_line(&replay, false), "Replay finished at t=7");
        assert_eq!(timeline_line(&replay), trace.timeline());
    }
}
