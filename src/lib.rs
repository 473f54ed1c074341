//! Weekly pod assignments for a four-player game group.
//!
//! Players vote for the days they can play; [`optimize`] turns one week of
//! votes into pods of four, flags the decisions only a person can make, and
//! lists the days that almost made it.

pub mod display;
pub mod error;
pub mod form;
pub mod parser;
pub mod schedule;
pub mod web;

pub use display::{format_result, format_result_with, group_pods_by_day};
pub use error::{InvalidDayError, ScheduleError, ScheduleResult};
pub use parser::{load_vote_sheet, load_votes, load_votes_json, VoteSheet};
pub use schedule::{
    optimize, Availability, ChoiceScenario, Day, IncompletePod, OptimizationResult, PlayerId,
    PodAssignment, Preference, Preferences, POD_SIZE,
};
