//! shiftforge command line: load the roster, run a solver, report and
//! export the schedule.

mod console;
mod driver;
mod loader;

use std::path::PathBuf;
use std::process::ExitCode;

use chrono::NaiveDate;
use clap::{arg, ArgAction, Command};
use owo_colors::OwoColorize;
use tracing_subscriber::EnvFilter;

use shiftforge_core::ScheduleType;
use shiftforge_solver::Algorithm;

use driver::{ExportFormat, RunArgs};

fn cli() -> Command {
    Command::new("shiftforge")
        .about("Automated shift assignment for a student-staffed IT help desk")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("run")
                .about("Run a solver over the loaded roster and report the schedule")
                .arg(
                    arg!(--algorithm <NAME> "Solver to run: GA, SA, CSP or greedy")
                        .default_value("SA"),
                )
                .arg(
                    arg!(--compare "Run every solver and keep the best result")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    arg!(--"schedule-type" <TYPE> "Week calendar: finals or regular")
                        .default_value("finals"),
                )
                .arg(arg!(--seed <N> "Random seed for reproducible runs")
                    .value_parser(clap::value_parser!(u64)))
                .arg(
                    arg!(--"max-time" <SECONDS> "Wall-clock cap overriding solver defaults")
                        .value_parser(clap::value_parser!(u64)),
                )
                .arg(arg!(--export <FORMAT> "Write results: json, csv, shifts or all"))
                .arg(
                    arg!(--"output-dir" <DIR> "Directory for exported files")
                        .default_value("outputs")
                        .value_parser(clap::value_parser!(PathBuf)),
                )
                .arg(
                    arg!(--"show-schedule" "Print the staffing grid and worker hours")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    arg!(--workers <FILE> "Worker records JSON")
                        .default_value("data/workers.json")
                        .value_parser(clap::value_parser!(PathBuf)),
                )
                .arg(
                    arg!(--exams <FILE> "Exam records JSON")
                        .default_value("data/exams.json")
                        .value_parser(clap::value_parser!(PathBuf)),
                )
                .arg(
                    arg!(--"week-start" <DATE> "Monday the week begins on (YYYY-MM-DD)")
                        .value_parser(clap::value_parser!(NaiveDate)),
                )
                .arg(
                    arg!(--config <FILE> "Scheduler configuration TOML")
                        .default_value("shiftforge.toml")
                        .value_parser(clap::value_parser!(PathBuf)),
                ),
        )
}

fn parse_schedule_type(value: &str) -> Result<ScheduleType, String> {
    match value.to_ascii_lowercase().as_str() {
        "finals" => Ok(ScheduleType::Finals),
        "regular" => Ok(ScheduleType::Regular),
        other => Err(format!("unknown schedule type `{other}`")),
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    console::print_banner();

    let matches = cli().get_matches();
    let result = match matches.subcommand() {
        Some(("run", m)) => run_args(m).and_then(driver::run),
        _ => unreachable!("subcommand is required"),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("{} {error:#}", "error:".red().bold());
            ExitCode::FAILURE
        }
    }
}

fn run_args(m: &clap::ArgMatches) -> anyhow::Result<RunArgs> {
    let algorithm: Algorithm = m
        .get_one::<String>("algorithm")
        .expect("defaulted")
        .parse()
        .map_err(anyhow::Error::msg)?;
    let schedule_type = parse_schedule_type(m.get_one::<String>("schedule-type").expect("defaulted"))
        .map_err(anyhow::Error::msg)?;
    let export = m
        .get_one::<String>("export")
        .map(|s| ExportFormat::parse(s))
        .transpose()?;

    Ok(RunArgs {
        algorithm,
        compare: m.get_flag("compare"),
        schedule_type,
        seed: m.get_one::<u64>("seed").copied(),
        max_time: m.get_one::<u64>("max-time").copied(),
        export,
        output_dir: m.get_one::<PathBuf>("output-dir").expect("defaulted").clone(),
        show_schedule: m.get_flag("show-schedule"),
        workers_path: m.get_one::<PathBuf>("workers").expect("defaulted").clone(),
        exams_path: m.get_one::<PathBuf>("exams").expect("defaulted").clone(),
        week_start: m.get_one::<NaiveDate>("week-start").copied(),
        config_path: m.get_one::<PathBuf>("config").expect("defaulted").clone(),
    })
}
