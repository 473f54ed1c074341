use tracing::debug;

use super::assigner::AssignmentState;
use super::day::Day;
use super::day_index::DayIndex;
use super::types::{Availability, ChoiceScenario, PlayerId, Preference, Preferences, POD_SIZE};

/// Already-assigned flexible players who could play a second game on `day`.
///
/// A candidate holds at least one pod, voted for `day` among two or more days,
/// has not asked for one game only, is not already playing on `day`, and
/// would not break a no-consecutive preference.
pub fn flexible_candidates(
    day: Day,
    index: &DayIndex,
    availability: &Availability,
    preferences: &Preferences,
    state: &AssignmentState,
) -> Vec<PlayerId> {
    index
        .get(&day)
        .into_iter()
        .flatten()
        .filter(|p| state.is_assigned(p))
        .filter(|p| availability.is_flexible(p))
        .filter(|p| !preferences.has(p, Preference::OneGameOnly))
        .filter(|p| !state.plays_on(p, day))
        .filter(|p| state.can_assign(p, day, preferences))
        .cloned()
        .collect()
}

/// Looks for the first day (in priority order) that is exactly one player
/// short of a pod and has someone who could play twice to complete it.
///
/// The volunteer is never picked here; that takes a real person's consent.
pub fn detect_double_play(
    day_order: &[Day],
    index: &DayIndex,
    availability: &Availability,
    preferences: &Preferences,
    state: &AssignmentState,
) -> Option<ChoiceScenario> {
    for &day in day_order {
        let waiting_players = state.unassigned_on(index, day, preferences);
        if waiting_players.len() != POD_SIZE - 1 {
            continue;
        }

        let candidates = flexible_candidates(day, index, availability, preferences, state);
        if candidates.is_empty() {
            continue;
        }

        debug!(day = %day, waiting = ?waiting_players, candidates = ?candidates, "double-play opportunity");
        return Some(ChoiceScenario::DoublePlayNeeded {
            day,
            waiting_players,
            flexible_candidates: candidates,
        });
    }

    None
}
