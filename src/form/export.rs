use std::fs::OpenOptions;
use std::path::Path;

use csv::WriterBuilder;
use tracing::debug;

use crate::error::ScheduleResult;
use crate::form::submission::VoteSubmission;

/// Header written to a new vote sheet; `parser::read_votes` locates columns by these names.
pub const VOTE_SHEET_HEADER: [&str; 6] = ["timestamp", "player_id", "name", "days", "preferences", "submission_type"];

/// Appends a single vote to a CSV vote sheet, writing the header first when
/// the file is new or empty.
pub fn append_vote_to_csv(submission: &VoteSubmission, csv_path: &Path) -> ScheduleResult<()> {
    let needs_header = std::fs::metadata(csv_path).map(|m| m.len() == 0).unwrap_or(true);

    let file = OpenOptions::new().create(true).append(true).open(csv_path)?;
    let mut wtr = WriterBuilder::new().has_headers(false).from_writer(file);

    if needs_header {
        wtr.write_record(VOTE_SHEET_HEADER)?;
    }

    let days = submission
        .days
        .iter()
        .map(|d| d.name())
        .collect::<Vec<_>>()
        .join(", ");
    let preferences = submission
        .preferences
        .iter()
        .map(|p| p.label())
        .collect::<Vec<_>>()
        .join(", ");
    let timestamp = submission.timestamp.to_rfc3339();

    wtr.write_record([
        timestamp.as_str(),
        submission.player_id.as_str(),
        submission.name.as_deref().unwrap_or(""),
        days.as_str(),
        preferences.as_str(),
        submission.submission_type(),
    ])?;

    wtr.flush()?;
    debug!(player_id = %submission.player_id, path = %csv_path.display(), "vote appended");
    Ok(())
}
