use std::collections::BTreeMap;

use super::day::Day;
use super::types::{Availability, PlayerId};

/// Day -> players available that day, in vote order.
pub type DayIndex = BTreeMap<Day, Vec<PlayerId>>;

/// Inverts player -> days into day -> players.
pub fn index_by_day(availability: &Availability) -> DayIndex {
    let mut index = DayIndex::new();
    for vote in availability.votes() {
        for &day in &vote.days {
            index.entry(day).or_default().push(vote.player_id.clone());
        }
    }
    index
}

/// Number of players available on `day`.
pub fn headcount(index: &DayIndex, day: Day) -> usize {
    index.get(&day).map_or(0, Vec::len)
}

/// Number of players available on `day`, not counting `player_id`.
pub fn headcount_without(index: &DayIndex, day: Day, player_id: &str) -> usize {
    index
        .get(&day)
        .map_or(0, |players| players.iter().filter(|p| *p != player_id).count())
}
