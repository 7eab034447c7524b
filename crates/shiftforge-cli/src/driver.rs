//! Driver: wires the loader, environment, solvers, validator and exporters
//! together for one CLI invocation.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{bail, Context};
use chrono::{Datelike, Days, NaiveDate};
use tracing::info;

use shiftforge_config::SchedulerConfig;
use shiftforge_core::{ScheduleType, SchedulingEnvironment, SlotCatalog};
use shiftforge_export::{
    coalesce, quick_validate, schedule_csv, shift_records, shift_records_json, worker_summary_csv,
    worker_totals, ScheduleDocument,
};
use shiftforge_solver::{solve, Algorithm, SolveOutcome};

use crate::{console, loader};

/// Export formats selectable from the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Csv,
    Shifts,
    All,
}

impl ExportFormat {
    pub fn parse(value: &str) -> anyhow::Result<ExportFormat> {
        match value.to_ascii_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "csv" => Ok(ExportFormat::Csv),
            "shifts" => Ok(ExportFormat::Shifts),
            "all" => Ok(ExportFormat::All),
            other => bail!("unknown export format `{other}`"),
        }
    }
}

/// Everything the `run` subcommand needs.
#[derive(Debug)]
pub struct RunArgs {
    pub algorithm: Algorithm,
    pub compare: bool,
    pub schedule_type: ScheduleType,
    pub seed: Option<u64>,
    pub max_time: Option<u64>,
    pub export: Option<ExportFormat>,
    pub output_dir: PathBuf,
    pub show_schedule: bool,
    pub workers_path: PathBuf,
    pub exams_path: PathBuf,
    pub week_start: Option<NaiveDate>,
    pub config_path: PathBuf,
}

/// Runs one solver (or the full comparison), validates, prints and exports.
pub fn run(args: RunArgs) -> anyhow::Result<()> {
    let mut config = SchedulerConfig::load(&args.config_path).unwrap_or_default();
    if let Some(seed) = args.seed {
        config.random_seed = Some(seed);
    }
    if let Some(max_time) = args.max_time {
        config.max_time_secs = Some(max_time);
    }

    let week_start = match args.week_start {
        Some(date) => date,
        None => next_monday(),
    };
    let workers = loader::load_roster(&args.workers_path, &args.exams_path, week_start)?;
    let catalog = SlotCatalog::for_week(args.schedule_type, week_start, &config.staffing)
        .context("building the slot catalog")?;
    let env = SchedulingEnvironment::new(workers, catalog, config.hours, config.weights)
        .context("building the scheduling environment")?;
    info!(
        slots = env.num_slots(),
        workers = env.num_workers(),
        schedule_type = %args.schedule_type,
        week_start = %week_start,
        "environment ready"
    );

    let seed = config.random_seed.unwrap_or_else(clock_seed);

    let outcome = if args.compare {
        let results: Vec<SolveOutcome> = Algorithm::ALL
            .into_iter()
            .map(|algorithm| solve(algorithm, &env, &config, seed))
            .collect();
        console::print_comparison(&results);
        results
            .into_iter()
            .min_by(|a, b| a.penalty.partial_cmp(&b.penalty).expect("finite penalties"))
            .expect("comparison ran at least one solver")
    } else {
        solve(args.algorithm, &env, &config, seed)
    };

    console::print_outcome(&outcome);
    let report = quick_validate(&env, &outcome.assignment);
    console::print_validation(&report);

    if args.show_schedule {
        console::print_schedule_grid(&env, &outcome.assignment);
        console::print_worker_table(&env, &outcome.assignment);
    }

    if let Some(format) = args.export {
        let written = export(&env, &outcome, format, &args.output_dir)?;
        for path in written {
            println!("  exported {}", path.display());
        }
    }

    Ok(())
}

/// Writes the selected export formats; returns the files written.
fn export(
    env: &SchedulingEnvironment,
    outcome: &SolveOutcome,
    format: ExportFormat,
    output_dir: &Path,
) -> anyhow::Result<Vec<PathBuf>> {
    fs::create_dir_all(output_dir)
        .with_context(|| format!("creating output directory {}", output_dir.display()))?;

    let algorithm = outcome.algorithm.label();
    let mut written = Vec::new();
    let mut write = |name: String, contents: String| -> anyhow::Result<()> {
        let path = output_dir.join(name);
        fs::write(&path, contents).with_context(|| format!("writing {}", path.display()))?;
        written.push(path);
        Ok(())
    };

    if matches!(format, ExportFormat::Json | ExportFormat::All) {
        let document = ScheduleDocument::build(env, outcome);
        write(format!("schedule_{algorithm}.json"), document.to_json()?)?;
    }
    if matches!(format, ExportFormat::Csv | ExportFormat::All) {
        let blocks = coalesce(env, &outcome.assignment);
        write(format!("schedule_{algorithm}.csv"), schedule_csv(&blocks))?;
        let totals = worker_totals(env, &outcome.assignment);
        write(
            format!("workers_{algorithm}.csv"),
            worker_summary_csv(&totals),
        )?;
    }
    if matches!(format, ExportFormat::Shifts | ExportFormat::All) {
        let blocks = coalesce(env, &outcome.assignment);
        let records = shift_records(&blocks, algorithm);
        write(
            format!("shifts_{algorithm}.json"),
            shift_records_json(&records)?,
        )?;
    }

    Ok(written)
}

/// The next Monday strictly after today, the default scheduling week.
fn next_monday() -> NaiveDate {
    let today = chrono::Local::now().date_naive();
    let ahead = 7 - today.weekday().num_days_from_monday();
    today
        .checked_add_days(Days::new(u64::from(ahead)))
        .expect("next week fits the calendar")
}

/// Clock-derived seed when none is configured.
fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn export_format_parsing() {
        assert_eq!(ExportFormat::parse("json").unwrap(), ExportFormat::Json);
        assert_eq!(ExportFormat::parse("ALL").unwrap(), ExportFormat::All);
        assert!(ExportFormat::parse("xml").is_err());
    }

    #[test]
    fn next_monday_is_a_monday_in_the_future() {
        let date = next_monday();
        assert_eq!(date.weekday().num_days_from_monday(), 0);
        assert!(date > chrono::Local::now().date_naive());
    }
}
