use std::cmp::{Ordering, Reverse};

use serde::Serialize;

use super::day::Day;
use super::day_index::DayIndex;
use super::types::{Availability, POD_SIZE};

/// Scoring inputs for one day, exposed so callers can show why a day went first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayPriority {
    pub day: Day,
    /// Headcount is a positive multiple of the pod size.
    pub is_complete: bool,
    /// Players who voted for this day only.
    pub unique_players: usize,
    pub total_players: usize,
}

impl DayPriority {
    fn sort_key(&self) -> (bool, usize, usize, Reverse<u32>) {
        (
            self.is_complete,
            self.unique_players,
            self.total_players,
            Reverse(self.day.week_index()),
        )
    }
}

impl Ord for DayPriority {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sort_key().cmp(&other.sort_key())
    }
}

impl PartialOrd for DayPriority {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Players on `day` with nowhere else to go.
pub fn count_unique_players(day: Day, index: &DayIndex, availability: &Availability) -> usize {
    index.get(&day).map_or(0, |players| {
        players
            .iter()
            .filter(|p| availability.days_for(p).len() == 1)
            .count()
    })
}

pub fn is_complete_day(player_count: usize) -> bool {
    player_count > 0 && player_count % POD_SIZE == 0
}

/// Scores every day in the index, highest priority first.
pub fn day_priorities(index: &DayIndex, availability: &Availability) -> Vec<DayPriority> {
    let mut priorities: Vec<DayPriority> = index
        .iter()
        .map(|(&day, players)| DayPriority {
            day,
            is_complete: is_complete_day(players.len()),
            unique_players: count_unique_players(day, index, availability),
            total_players: players.len(),
        })
        .collect();

    // Sort by priority descending (highest first)
    priorities.sort_by(|a, b| b.cmp(a));
    priorities
}

/// Days in the order the assigner should process them.
pub fn prioritize_days(index: &DayIndex, availability: &Availability) -> Vec<Day> {
    day_priorities(index, availability)
        .into_iter()
        .map(|p| p.day)
        .collect()
}
