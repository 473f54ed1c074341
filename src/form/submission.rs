use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{ScheduleError, ScheduleResult};
use crate::schedule::{Day, Preference};

/// A validated vote, ready to be stored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoteSubmission {
    pub timestamp: DateTime<Utc>,
    pub player_id: String,
    pub name: Option<String>,
    pub days: Vec<Day>,
    pub preferences: Vec<Preference>,
    pub is_resubmission: bool,
}

impl VoteSubmission {
    pub fn submission_type(&self) -> &'static str {
        if self.is_resubmission {
            "Re-Submission"
        } else {
            "New submission"
        }
    }
}

/// Vote request from the frontend
#[derive(Debug, Clone, Deserialize)]
pub struct VoteSubmissionRequest {
    pub player_id: String,
    #[serde(default)]
    pub name: Option<String>,
    pub days: Vec<String>,
    #[serde(default)]
    pub preferences: Vec<String>,
    #[serde(default)]
    pub resubmission: bool,
}

/// Validates a vote: a player id, at least one canonical day, no day twice,
/// and only known preference labels. Returns the parsed days.
pub fn validate_vote(req: &VoteSubmissionRequest) -> ScheduleResult<Vec<Day>> {
    if req.player_id.trim().is_empty() {
        return Err(ScheduleError::InvalidVote("Player ID is required".to_string()));
    }

    if req.days.is_empty() {
        return Err(ScheduleError::InvalidVote("Pick at least one day".to_string()));
    }

    let mut days = Vec::with_capacity(req.days.len());
    for raw in &req.days {
        let day: Day = raw.parse()?;
        if days.contains(&day) {
            return Err(ScheduleError::InvalidVote(format!("{} was picked twice", day)));
        }
        days.push(day);
    }

    if let Some(unknown) = req.preferences.iter().find(|p| Preference::from_label(p).is_none()) {
        return Err(ScheduleError::InvalidVote(format!("Unknown preference: {}", unknown)));
    }

    Ok(days)
}

impl VoteSubmissionRequest {
    /// Validates the request and stamps it with the submission time.
    pub fn into_submission(self, timestamp: DateTime<Utc>) -> ScheduleResult<VoteSubmission> {
        let days = validate_vote(&self)?;
        let mut preferences: Vec<Preference> = self
            .preferences
            .iter()
            .filter_map(|p| Preference::from_label(p))
            .collect();
        preferences.sort();
        preferences.dedup();

        Ok(VoteSubmission {
            timestamp,
            player_id: self.player_id.trim().to_string(),
            name: self.name.map(|n| n.trim().to_string()).filter(|n| !n.is_empty()),
            days,
            preferences,
            is_resubmission: self.resubmission,
        })
    }
}
