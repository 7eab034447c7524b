//! File loader: reads worker and exam record JSON and assembles the roster.

use std::fs;
use std::path::Path;

use anyhow::Context;
use chrono::NaiveDate;
use tracing::{info, warn};

use shiftforge_core::{build_roster, ExamRecord, Worker, WorkerRecord};

/// Loads worker records plus exam records and validates them into a roster.
///
/// `week_start` is the Monday the schedule begins on; exams dated outside
/// that week are flagged during validation. A missing exam file is treated
/// as "no exams" with a warning; a missing worker file is an error.
pub fn load_roster(
    workers_path: &Path,
    exams_path: &Path,
    week_start: NaiveDate,
) -> anyhow::Result<Vec<Worker>> {
    let workers_text = fs::read_to_string(workers_path)
        .with_context(|| format!("reading worker records from {}", workers_path.display()))?;
    let records: Vec<WorkerRecord> = serde_json::from_str(&workers_text)
        .with_context(|| format!("parsing worker records in {}", workers_path.display()))?;

    let exams: Vec<ExamRecord> = if exams_path.exists() {
        let exams_text = fs::read_to_string(exams_path)
            .with_context(|| format!("reading exam records from {}", exams_path.display()))?;
        serde_json::from_str(&exams_text)
            .with_context(|| format!("parsing exam records in {}", exams_path.display()))?
    } else {
        warn!(path = %exams_path.display(), "no exam file found; assuming no exams");
        Vec::new()
    };

    let roster =
        build_roster(&records, &exams, Some(week_start)).context("validating the roster")?;
    info!(
        workers = roster.len(),
        active = roster.iter().filter(|w| w.is_active).count(),
        exams = exams.len(),
        "roster loaded"
    );
    Ok(roster)
}

#[cfg(test)]
mod tests {
    use std::io::Write as _;

    use super::*;

    fn write_temp(name: &str, contents: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("shiftforge-test-{name}"));
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 12, 15).unwrap()
    }

    #[test]
    fn loads_workers_without_exam_file() {
        let workers = write_temp(
            "workers.json",
            r#"[{"id": "u1", "name": "Avery", "position": "Tier 1"}]"#,
        );
        let missing = std::env::temp_dir().join("shiftforge-test-absent.json");

        let roster = load_roster(&workers, &missing, monday()).unwrap();
        assert_eq!(roster.len(), 1);
        assert_eq!(roster[0].desired_hours, 15); // defaulted
        assert!(roster[0].is_active); // defaulted
    }

    #[test]
    fn bad_worker_record_is_an_error() {
        let workers = write_temp(
            "bad-workers.json",
            r#"[{"id": "u1", "name": "Avery", "position": "Wizard"}]"#,
        );
        let missing = std::env::temp_dir().join("shiftforge-test-absent.json");
        assert!(load_roster(&workers, &missing, monday()).is_err());
    }

    #[test]
    fn exams_attach_to_workers() {
        let workers = write_temp(
            "workers-exams.json",
            r#"[{"id": "u1", "name": "Avery", "position": "Tier 2"}]"#,
        );
        let exams = write_temp(
            "exams.json",
            r#"[{"user_id": "u1", "date": "2025-12-15", "start_time": "09:00", "end_time": "11:00"}]"#,
        );

        let roster = load_roster(&workers, &exams, monday()).unwrap();
        assert_eq!(roster[0].busy.len(), 1);
    }
}
