use std::collections::HashMap;

use tracing::debug;

use super::day::Day;
use super::day_index::{headcount, headcount_without, DayIndex};
use super::types::{Availability, PlayerId, POD_SIZE};

/// Player -> the only day they may be placed on while the reservation holds.
pub type Reservations = HashMap<PlayerId, Day>;

/// Finds flexible players who are the only reason one of their days reaches a full pod.
///
/// A flexible player is reserved for day A when:
/// - day A would drop below the pod size without them
/// - every other day they voted for still has a full pod without them
/// - taking them away (together with everyone already reserved away)
///   does not cost any of those other days a complete pod
///
/// Players are considered in vote order, so earlier voters claim the
/// headroom on a shared day first.
pub fn detect_critical_players(index: &DayIndex, availability: &Availability) -> Reservations {
    let mut reservations = Reservations::new();
    // How many players have been reserved away from each day so far
    let mut reserved_away: HashMap<Day, usize> = HashMap::new();

    for vote in availability.votes().iter().filter(|v| v.days.len() >= 2) {
        let (needing, not_needing): (Vec<Day>, Vec<Day>) = vote
            .days
            .iter()
            .partition(|&&day| headcount_without(index, day, &vote.player_id) < POD_SIZE);

        let [critical_day] = needing.as_slice() else {
            continue;
        };
        if not_needing.is_empty() {
            continue;
        }

        if let Some(&starved) = not_needing
            .iter()
            .find(|&&day| would_lose_pod(index, &reserved_away, day))
        {
            debug!(
                player = %vote.player_id,
                critical_day = %critical_day,
                starved_day = %starved,
                "reservation vetoed, it would cost another day a pod"
            );
            continue;
        }

        debug!(player = %vote.player_id, day = %critical_day, "reserved critical player");
        reservations.insert(vote.player_id.clone(), *critical_day);
        for day in not_needing {
            *reserved_away.entry(day).or_insert(0) += 1;
        }
    }

    reservations
}

/// Whether removing one more player from `day` reduces its number of complete pods.
fn would_lose_pod(index: &DayIndex, reserved_away: &HashMap<Day, usize>, day: Day) -> bool {
    let already_reserved = reserved_away.get(&day).copied().unwrap_or(0);
    let effective = headcount(index, day).saturating_sub(already_reserved);
    let current_pods = effective / POD_SIZE;
    let pods_after = effective.saturating_sub(1) / POD_SIZE;
    pods_after < current_pods
}
