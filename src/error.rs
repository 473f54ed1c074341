use thiserror::Error;

use crate::schedule::Day;

/// A day value outside the seven canonical weekday names.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid day {0:?}: expected one of Monday, Tuesday, Wednesday, Thursday, Friday, Saturday, Sunday")]
pub struct InvalidDayError(pub String);

/// Errors raised around the engine: vote loading, validation and choice resolution.
#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error(transparent)]
    InvalidDay(#[from] InvalidDayError),

    #[error("unknown player: {0}")]
    UnknownPlayer(String),

    #[error("player {player} did not vote for {day}")]
    DayNotAvailable { player: String, day: Day },

    #[error("no double-play opportunity is pending")]
    NoDoublePlayPending,

    #[error("player {player} is not a double-play candidate for {day}")]
    NotAFlexibleCandidate { player: String, day: Day },

    #[error("invalid vote: {0}")]
    InvalidVote(String),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type ScheduleResult<T> = Result<T, ScheduleError>;
