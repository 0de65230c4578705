use anyhow::Context;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use cpu_scheduling_sim::{
    config::{Overrides, ProcessEntry, SimulationConfig, SimulationFile},
    logging,
    report::RunReport,
    scheduler::{PolicyKind, PriorityOrder},
    terminal::ReplayRunner,
};
use crossterm::{
    execute,
    terminal::{Clear, ClearType},
};
use std::{io, path::PathBuf, time::Duration};
use tracing::info;

fn cli() -> Command {
    Command::new("cpu-sched")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Simulate FCFS, SJF, Priority and Round Robin CPU scheduling")
        .arg(
            Arg::new("policy")
                .short('s')
                .long("policy")
                .value_parser(value_parser!(PolicyKind))
                .help("Scheduling policy: fcfs, sjf, priority or rr"),
        )
        .arg(
            Arg::new("quantum")
                .short('q')
                .long("quantum")
                .value_parser(value_parser!(u64))
                .help("Round robin time quantum"),
        )
        .arg(
            Arg::new("process")
                .short('p')
                .long("process")
                .action(ArgAction::Append)
                .value_parser(value_parser!(ProcessEntry))
                .help("Process as BURST, BURST:PRIORITY, ID=BURST or ID=BURST:PRIORITY"),
        )
        .arg(
            Arg::new("input")
                .short('i')
                .long("input")
                .value_parser(value_parser!(PathBuf))
                .help("JSON simulation file"),
        )
        .arg(
            Arg::new("priority-order")
                .long("priority-order")
                .value_parser(value_parser!(PriorityOrder))
                .help("Which priorities run first: lower-first or higher-first"),
        )
        .arg(
            Arg::new("tick-ms")
                .long("tick-ms")
                .value_parser(value_parser!(u64).range(1..))
                .default_value("500")
                .help("Replay speed, milliseconds per dispatch"),
        )
        .arg(
            Arg::new("no-tui")
                .long("no-tui")
                .action(ArgAction::SetTrue)
                .help("Print a text report instead of replaying the run"),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .action(ArgAction::SetTrue)
                .help("Print the run report as JSON (wins over --no-tui)"),
        )
}

fn overrides(matches: &ArgMatches) -> Overrides {
    Overrides {
        policy: matches.get_one::<PolicyKind>("policy").copied(),
        quantum: matches.get_one::<u64>("quantum").copied(),
        priority_order: matches.get_one::<PriorityOrder>("priority-order").copied(),
        processes: matches
            .get_many::<ProcessEntry>("process")
            .map(|entries| entries.cloned().collect())
            .unwrap_or_default(),
    }
}

fn main() -> anyhow::Result<()> {
    logging::init_tracing();
    let matches = cli().get_matches();

    let file = match matches.get_one::<PathBuf>("input") {
        Some(path) => Some(
            SimulationFile::load(path)
                .with_context(|| format!("Failed to load simulation file {}", path.display()))?,
        ),
        None => None,
    };

    let SimulationConfig {
        policy,
        mut processes,
    } = SimulationConfig::resolve(file, overrides(&matches)).context("Invalid configuration")?;

    let trace = policy
        .run(&mut processes)
        .with_context(|| format!("{} simulation failed", policy.name()))?;
    let report = RunReport::new(&policy, &processes, &trace)?;
    info!(
        policy = policy.name(),
        average_waiting = report.metrics.average_waiting_time,
        average_turnaround = report.metrics.average_turnaround_time,
        "run finished"
    );

    if matches.get_flag("json") {
        println!("{}", report.to_json()?);
        return Ok(());
    }
    if matches.get_flag("no-tui") {
        print!("{}", report);
        return Ok(());
    }

    let title = match policy.quantum() {
        Some(quantum) => format!("{} (quantum {})", policy.name(), quantum),
        None => policy.name().to_owned(),
    };
    let tick_rate = Duration::from_millis(matches.get_one::<u64>("tick-ms").copied().unwrap_or(500));

    execute!(io::stdout(), Clear(ClearType::All))?;

    let mut runner = ReplayRunner::new(title, &processes, trace.replay(), report.metrics, tick_rate)
        .context("Failed to set up the terminal")?;
    while runner.run()? {}
    drop(runner);

    execute!(io::stdout(), Clear(ClearType::All))?;
    print!("{}", report);
    Ok(())
}
