//! Colorful console reporting for runs, comparisons and the schedule grid.

use owo_colors::OwoColorize;
use tracing::info;

use shiftforge_core::time::{format_minutes, MINUTES_PER_HOUR};
use shiftforge_core::{ScheduleState, SchedulingEnvironment, ShiftKind, WorkerIx};
use shiftforge_export::ValidationReport;
use shiftforge_solver::SolveOutcome;

/// Package version for the banner.
const VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn print_banner() {
    let banner = r#"
     _     _  __ _    __
 ___| |__ (_)/ _| |_ / _| ___  _ __ __ _  ___
/ __| '_ \| | |_| __| |_ / _ \| '__/ _` |/ _ \
\__ \ | | | |  _| |_|  _| (_) | | | (_| |  __/
|___/_| |_|_|_|  \__|_|  \___/|_|  \__, |\___|
                                   |___/
"#;
    println!("{}", banner.bright_cyan());
    println!(
        "{}",
        format!("        v{VERSION} - help-desk shift assignment").bright_white()
    );
}

/// One-run summary block.
pub fn print_outcome(outcome: &SolveOutcome) {
    println!();
    println!(
        "{} {} finished in {:.2}s",
        "▸".bright_green(),
        outcome.algorithm.to_string().bright_white().bold(),
        outcome.runtime.as_secs_f64(),
    );
    println!(
        "  penalty {}  iterations {}  converged {}  seed {}",
        format!("{:.2}", outcome.penalty).bright_cyan().bold(),
        outcome.iterations,
        if outcome.converged {
            "yes".green().to_string()
        } else {
            "no".yellow().to_string()
        },
        outcome.seed,
    );
}

/// Validation verdict with critical/warning detail, emitted at `info` level
/// so the ambient env filter governs it like every other log line.
pub fn print_validation(report: &ValidationReport) {
    info!(
        event = "validation",
        penalty = report.penalty,
        quality = report.quality.label(),
        all_critical_pass = report.all_critical_pass,
        uncovered = report.gaps.len(),
    );
    for line in report.render_text().lines() {
        if !line.is_empty() {
            info!("{line}");
        }
    }
}

/// Ranked comparison table, best penalty first.
pub fn print_comparison(results: &[SolveOutcome]) {
    let mut order: Vec<usize> = (0..results.len()).collect();
    order.sort_by(|&a, &b| {
        results[a]
            .penalty
            .partial_cmp(&results[b].penalty)
            .expect("penalties are finite")
    });

    println!();
    println!("{}", "ALGORITHM COMPARISON".bright_white().bold());
    println!(
        "{:<8} {:>10} {:>9} {:>11} {:>10}",
        "algo", "penalty", "time", "iterations", "converged"
    );
    for (rank, &i) in order.iter().enumerate() {
        let r = &results[i];
        let line = format!(
            "{:<8} {:>10.2} {:>8.2}s {:>11} {:>10}",
            r.algorithm.label(),
            r.penalty,
            r.runtime.as_secs_f64(),
            r.iterations,
            if r.converged { "yes" } else { "no" },
        );
        if rank == 0 {
            println!("{}", line.bright_green());
        } else {
            println!("{line}");
        }
    }
    let best = &results[order[0]];
    println!(
        "\n{} best algorithm: {}",
        "▸".bright_green(),
        best.algorithm.to_string().bright_white().bold()
    );
}

/// Per-day staffing grid for admin review.
pub fn print_schedule_grid(env: &SchedulingEnvironment, state: &ScheduleState) {
    let names = |slot: usize| -> String {
        let crew: Vec<String> = state
            .assignees(slot)
            .iter()
            .map(|&w| {
                let worker = env.worker(w);
                format!("{} (T{})", worker.name, worker.tier.number())
            })
            .collect();
        if crew.is_empty() {
            "---".into()
        } else {
            crew.join(", ")
        }
    };

    let mut current_date = None;
    let mut hours: Vec<(u32, Option<usize>, Option<usize>)> = Vec::new();

    let mut flush = |date: Option<chrono::NaiveDate>,
                     hours: &mut Vec<(u32, Option<usize>, Option<usize>)>| {
        if let Some(d) = date {
            let day = shiftforge_core::time::DayOfWeek::from_date(d)
                .map(|d| d.name())
                .unwrap_or("?");
            println!("\n{}", format!("{day} {d}").bright_white().bold());
            for &(start, window, remote) in hours.iter() {
                let window_str = window.map(|s| names(s)).unwrap_or_else(|| "---".into());
                let remote_str = remote.map(|s| names(s)).unwrap_or_else(|| "---".into());
                println!(
                    "  {}-{} | Window: {:<28} | Remote: {}",
                    format_minutes(start),
                    format_minutes(start + MINUTES_PER_HOUR),
                    window_str,
                    remote_str,
                );
            }
        }
        hours.clear();
    };

    for slot in env.slots() {
        if current_date != Some(slot.date) {
            flush(current_date, &mut hours);
            current_date = Some(slot.date);
        }
        match hours.last_mut() {
            Some(row) if row.0 == slot.start_minute => match slot.kind {
                ShiftKind::Window => row.1 = Some(slot.index),
                ShiftKind::Remote => row.2 = Some(slot.index),
            },
            _ => {
                let mut row = (slot.start_minute, None, None);
                match slot.kind {
                    ShiftKind::Window => row.1 = Some(slot.index),
                    ShiftKind::Remote => row.2 = Some(slot.index),
                }
                hours.push(row);
            }
        }
    }
    flush(current_date, &mut hours);
}

/// Worker hour table, roster order.
pub fn print_worker_table(env: &SchedulingEnvironment, state: &ScheduleState) {
    println!("\n{}", "WORKER HOURS".bright_white().bold());
    println!("{:<22} {:>7} {:>9} {:>6}", "name", "desired", "assigned", "diff");
    for (ix, worker) in env.workers().iter().enumerate() {
        let hours = state.hours_of(ix as WorkerIx);
        let diff = hours - f64::from(worker.desired_hours);
        let line = format!(
            "{:<22} {:>7} {:>9.1} {:>+6.1}",
            worker.name, worker.desired_hours, hours, diff,
        );
        if !worker.is_active {
            println!("{}", line.bright_black());
        } else if hours == 0.0 {
            println!("{}", line.yellow());
        } else {
            println!("{line}");
        }
    }
}
