//! CLI entry point: prints the current challenge standings.
//!
//! # Responsibility
//! - Provide a minimal executable over `weighmate_core`.
//! - Keep output deterministic for quick local sanity checks.

use std::process::ExitCode;
use weighmate_core::db::open_db;
use weighmate_core::{calendar, ChallengeService, SqliteParticipantRepository};

const DEFAULT_DB_FILE: &str = "weighmate.sqlite3";

fn main() -> ExitCode {
    let db_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_DB_FILE.to_string());

    match run(&db_path) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("weighmate: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run(db_path: &str) -> Result<(), String> {
    let conn = open_db(db_path).map_err(|err| err.to_string())?;
    let repo = SqliteParticipantRepository::new(&conn);
    let mut service = ChallengeService::new(repo);
    service.load().map_err(|err| err.to_string())?;

    let today = calendar::today();
    let deadline = calendar::submission_deadline_for(today);
    println!(
        "weight challenge (weighmate {}) | deadline {}, {} days left",
        weighmate_core::core_version(),
        calendar::format_date_iso(deadline),
        calendar::days_left(today, deadline)
    );

    let rows = service.leaderboard();
    if rows.is_empty() {
        println!("no participants yet");
        return Ok(());
    }

    for (rank, row) in rows.iter().enumerate() {
        println!(
            "{:>2}. {:<24} {:>5.1}%",
            rank + 1,
            row.name,
            row.progress * 100.0
        );
    }

    Ok(())
}
