//! Pod optimization: maximize how many players get at least one game this week.
//!
//! The run is a single pure pass over one availability snapshot:
//!
//! 1. Invert availability into a day -> players index
//! 2. Order days (complete days, then trapped single-day players, then headcount,
//!    then earlier in the week)
//! 3. Reserve critical flexible players for the one day that needs them
//! 4. Greedily form pods of four per day, first voters first
//! 5. Look for a day one short that a double-play volunteer could complete
//! 6. Look for a player needed by two different days' pods
//! 7. Assemble the result, including the days that almost made it
//!
//! Only one choice scenario is surfaced per run. A critical-for-both conflict
//! takes precedence over a double-play opportunity.

use std::collections::BTreeSet;

use tracing::info;

use super::assigner::{assign_pods, AssignmentState};
use super::choice::detect_critical_for_both;
use super::critical::detect_critical_players;
use super::day::Day;
use super::day_index::{index_by_day, DayIndex};
use super::double_play::{detect_double_play, flexible_candidates};
use super::priority::prioritize_days;
use super::types::{Availability, IncompletePod, OptimizationResult, PlayerId, Preferences, POD_SIZE};

/// Assigns players to pods. Inputs are not modified.
pub fn optimize(availability: &Availability, preferences: &Preferences) -> OptimizationResult {
    let index = index_by_day(availability);
    let day_order = prioritize_days(&index, availability);
    let reservations = detect_critical_players(&index, availability);
    let state = assign_pods(&index, &day_order, preferences, reservations);

    let double_play = detect_double_play(&day_order, &index, availability, preferences, &state);
    let critical_for_both = detect_critical_for_both(availability, &index);
    let incomplete_pods = collect_incomplete_pods(&day_order, &index, availability, preferences, &state);

    let players_with_games: BTreeSet<PlayerId> = state.assigned.iter().cloned().collect();
    let players_without_games: BTreeSet<PlayerId> = availability
        .players()
        .filter(|p| !state.is_assigned(p))
        .cloned()
        .collect();

    let result = OptimizationResult {
        pods: state.pods,
        players_with_games,
        players_without_games,
        incomplete_pods,
        choice_required: critical_for_both.or(double_play),
    };

    info!(
        players = availability.len(),
        pods = result.pods.len(),
        with_games = result.players_with_games.len(),
        without_games = result.players_without_games.len(),
        choice_required = result.choice_required.is_some(),
        "pod optimization finished"
    );

    result
}

/// Days that ended with 1-3 stranded players, in priority order, with the
/// players who could double-play to help.
fn collect_incomplete_pods(
    day_order: &[Day],
    index: &DayIndex,
    availability: &Availability,
    preferences: &Preferences,
    state: &AssignmentState,
) -> Vec<IncompletePod> {
    day_order
        .iter()
        .filter_map(|&day| {
            let players = state.unassigned_on(index, day, preferences);
            if players.is_empty() || players.len() >= POD_SIZE {
                return None;
            }
            Some(IncompletePod {
                day,
                needed: POD_SIZE - players.len(),
                players,
                eligible_volunteers: flexible_candidates(day, index, availability, preferences, state),
            })
        })
        .collect()
}
