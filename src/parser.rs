use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::display::format_player_name;
use crate::error::{ScheduleError, ScheduleResult};
use crate::schedule::{Availability, Day, PlayerId, Preference, Preferences};

/// Everything a vote sheet says about the week: who can play when, their
/// preference flags, and the names to show instead of raw ids.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VoteSheet {
    pub availability: Availability,
    pub preferences: Preferences,
    pub names: HashMap<PlayerId, String>,
}

impl VoteSheet {
    pub fn display_name(&self, player_id: &str) -> String {
        format_player_name(player_id, self.names.get(player_id).map(String::as_str))
    }

    /// Records one vote, replacing any earlier vote by the same player.
    pub fn record(&mut self, player_id: String, name: Option<String>, days: Vec<Day>, preferences: Vec<Preference>) {
        if let Some(name) = name.filter(|n| !n.trim().is_empty()) {
            self.names.insert(player_id.clone(), name.trim().to_string());
        }
        self.preferences.set(player_id.clone(), preferences);
        self.availability.insert(player_id, days);
    }
}

/// Column positions located by header text
struct Columns {
    player_id: usize,
    days: usize,
    name: Option<usize>,
    preferences: Option<usize>,
    submission_type: Option<usize>,
    one_game_only: Option<usize>,
    no_consecutive: Option<usize>,
}

impl Columns {
    fn locate(headers: &StringRecord) -> ScheduleResult<Columns> {
        let lowered: Vec<String> = headers.iter().map(|h| h.trim().to_lowercase()).collect();
        let find = |pred: fn(&str) -> bool| lowered.iter().position(|h| pred(h.as_str()));

        let player_id = find(|h| h.contains("player") && h.contains("id"))
            .or_else(|| find(|h| h == "id"))
            .ok_or_else(|| ScheduleError::InvalidVote("vote sheet has no player id column".into()))?;
        let days = find(|h| h.contains("day") && !h.contains("consecutive"))
            .or_else(|| find(|h| h.contains("available")))
            .ok_or_else(|| ScheduleError::InvalidVote("vote sheet has no days column".into()))?;

        Ok(Columns {
            player_id,
            days,
            name: find(|h| h.contains("name")),
            preferences: find(|h| h.contains("preference")),
            submission_type: find(|h| h.contains("submission") || h.contains("is this form")),
            one_game_only: find(|h| h.contains("one game")),
            no_consecutive: find(|h| h.contains("consecutive")),
        })
    }
}

/// Parses a boolean value from various string representations
fn parse_bool(value: &str) -> bool {
    let lower = value.trim().to_lowercase();
    lower == "yes" || lower == "true" || lower == "1" || lower == "x"
}

fn split_list(value: &str) -> impl Iterator<Item = &str> {
    value.split([',', ';']).map(str::trim).filter(|s| !s.is_empty())
}

/// Parses a comma or semicolon separated list of day names.
fn parse_days(value: &str) -> ScheduleResult<Vec<Day>> {
    Ok(split_list(value)
        .map(str::parse::<Day>)
        .collect::<Result<Vec<_>, _>>()?)
}

/// Parses free-text preference labels, logging and skipping the ones it doesn't know.
fn parse_preferences<'a>(player_id: &str, labels: impl IntoIterator<Item = &'a str>) -> Vec<Preference> {
    labels
        .into_iter()
        .filter_map(|label| {
            let preference = Preference::from_label(label);
            if preference.is_none() && !label.trim().is_empty() {
                warn!(player_id, label, "ignoring unknown preference");
            }
            preference
        })
        .collect()
}

/// Loads a vote sheet, picking the format from the file extension.
pub fn load_vote_sheet<P: AsRef<Path>>(path: P) -> ScheduleResult<VoteSheet> {
    let path = path.as_ref();
    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));
    if is_json {
        load_votes_json(path)
    } else {
        load_votes(path)
    }
}

/// Loads votes from a CSV file
pub fn load_votes<P: AsRef<Path>>(csv_path: P) -> ScheduleResult<VoteSheet> {
    let file = File::open(csv_path)?;
    read_votes(file)
}

/// Reads votes from any CSV source (a file or an uploaded body).
///
/// Columns are located by header text. Rows without a player id are skipped.
/// A player who submits again replaces their earlier vote but keeps their
/// place in line.
pub fn read_votes<R: Read>(source: R) -> ScheduleResult<VoteSheet> {
    let mut reader = ReaderBuilder::new().flexible(true).from_reader(source);
    let headers = reader.headers()?.clone();
    let columns = Columns::locate(&headers)?;

    let mut sheet = VoteSheet::default();
    for (row, result) in reader.records().enumerate() {
        let record = result?;
        let field = |col: Option<usize>| col.and_then(|c| record.get(c)).unwrap_or("").trim();

        let player_id = field(Some(columns.player_id)).to_string();
        if player_id.is_empty() {
            warn!(row = row + 1, "skipping vote without a player id");
            continue;
        }

        let days = parse_days(field(Some(columns.days)))?;

        let mut labels: Vec<&str> = split_list(field(columns.preferences)).collect();
        if parse_bool(field(columns.one_game_only)) {
            labels.push("one game only");
        }
        if parse_bool(field(columns.no_consecutive)) {
            labels.push("no consecutive");
        }
        let preferences = parse_preferences(&player_id, labels);

        let submission_type = field(columns.submission_type).to_lowercase();
        let is_resubmission = submission_type.contains("re-submission") || submission_type.contains("resubmission");
        if sheet.availability.contains(&player_id) {
            if is_resubmission {
                debug!(player_id = %player_id, "re-submission replaces earlier vote");
            } else {
                warn!(player_id = %player_id, "duplicate vote, keeping the latest");
            }
        }

        let name = columns.name.map(|c| field(Some(c)).to_string());
        sheet.record(player_id, name, days, preferences);
    }

    debug!(players = sheet.availability.len(), "vote sheet loaded");
    Ok(sheet)
}

#[derive(Debug, Deserialize)]
struct JsonVoteFile {
    votes: Vec<JsonVote>,
}

#[derive(Debug, Deserialize)]
struct JsonVote {
    player_id: String,
    #[serde(default)]
    name: Option<String>,
    days: Vec<String>,
    #[serde(default)]
    preferences: Vec<String>,
}

/// Loads votes from a JSON document of the form `{"votes": [...]}`.
pub fn load_votes_json<P: AsRef<Path>>(json_path: P) -> ScheduleResult<VoteSheet> {
    let file = File::open(json_path)?;
    read_votes_json(file)
}

pub fn read_votes_json<R: Read>(source: R) -> ScheduleResult<VoteSheet> {
    let document: JsonVoteFile = serde_json::from_reader(source)?;

    let mut sheet = VoteSheet::default();
    for vote in document.votes {
        let player_id = vote.player_id.trim().to_string();
        if player_id.is_empty() {
            warn!("skipping vote without a player id");
            continue;
        }
        let days = vote
            .days
            .iter()
            .map(|d| d.trim().parse::<Day>())
            .collect::<Result<Vec<_>, _>>()?;
        let preferences = parse_preferences(&player_id, vote.preferences.iter().map(String::as_str));
        sheet.record(player_id, vote.name, days, preferences);
    }
    Ok(sheet)
}
