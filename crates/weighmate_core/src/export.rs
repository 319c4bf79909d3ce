//! CSV export of a participant's weigh-in history.
//!
//! # Responsibility
//! - Render filtered history entries as CSV for download/sharing.
//!
//! # Invariants
//! - Every value (header included) is double-quoted, internal quotes
//!   doubled.
//! - Header is exactly `participantId,name,date,weight(kg)`.

use crate::calendar::format_date_iso;
use crate::model::entry::WeighIn;
use crate::model::participant::Participant;
use once_cell::sync::Lazy;
use regex::Regex;

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));

/// Renders one participant's (already filtered) entries as CSV.
///
/// One row per entry, rows joined by `\n`, no trailing newline.
pub fn history_csv(participant: &Participant, entries: &[WeighIn]) -> String {
    let mut rows = Vec::with_capacity(entries.len() + 1);
    rows.push(csv_row(&["participantId", "name", "date", "weight(kg)"]));

    let id = participant.id.to_string();
    for entry in entries {
        rows.push(csv_row(&[
            id.as_str(),
            participant.name.as_str(),
            format_date_iso(entry.date).as_str(),
            entry.weight.to_string().as_str(),
        ]));
    }

    rows.join("\n")
}

/// Suggested download file name: `history_<name>.csv` with whitespace runs
/// collapsed to underscores.
pub fn export_file_name(participant_name: &str) -> String {
    let normalized = WHITESPACE_RE.replace_all(participant_name.trim(), "_");
    format!("history_{normalized}.csv")
}

fn csv_row(values: &[&str]) -> String {
    values
        .iter()
        .map(|value| csv_field(value))
        .collect::<Vec<_>>()
        .join(",")
}

fn csv_field(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}
