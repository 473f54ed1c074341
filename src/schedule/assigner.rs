use std::collections::{HashMap, HashSet};

use tracing::debug;

use super::critical::Reservations;
use super::day::Day;
use super::day_index::DayIndex;
use super::types::{PlayerId, PodAssignment, Preference, Preferences, POD_SIZE};

/// Checks whether placing `player_id` on `day` respects their preferences,
/// given the days they already hold.
pub fn can_assign_to_day(
    player_id: &str,
    day: Day,
    assigned_days: &HashMap<PlayerId, Vec<Day>>,
    preferences: &Preferences,
) -> bool {
    let held = assigned_days.get(player_id).map_or(&[][..], Vec::as_slice);

    if preferences.has(player_id, Preference::OneGameOnly) && !held.is_empty() {
        return false;
    }

    if preferences.has(player_id, Preference::NoConsecutive)
        && held.iter().any(|assigned| assigned.is_adjacent_to(day))
    {
        return false;
    }

    true
}

/// Working state of one assignment run.
#[derive(Debug, Clone, Default)]
pub struct AssignmentState {
    pub pods: Vec<PodAssignment>,
    pub assigned: HashSet<PlayerId>,
    /// Days each assigned player holds, in assignment order.
    pub assigned_days: HashMap<PlayerId, Vec<Day>>,
    pub reservations: Reservations,
}

impl AssignmentState {
    pub fn new(reservations: Reservations) -> Self {
        Self {
            reservations,
            ..Self::default()
        }
    }

    pub fn is_assigned(&self, player_id: &str) -> bool {
        self.assigned.contains(player_id)
    }

    /// Whether the player already holds a pod on `day`.
    pub fn plays_on(&self, player_id: &str, day: Day) -> bool {
        self.assigned_days
            .get(player_id)
            .is_some_and(|days| days.contains(&day))
    }

    pub fn can_assign(&self, player_id: &str, day: Day, preferences: &Preferences) -> bool {
        can_assign_to_day(player_id, day, &self.assigned_days, preferences)
    }

    fn is_eligible(&self, player_id: &str, day: Day, preferences: &Preferences) -> bool {
        if self.is_assigned(player_id) {
            return false;
        }
        // Reserved for another day
        if self
            .reservations
            .get(player_id)
            .is_some_and(|&reserved_day| reserved_day != day)
        {
            return false;
        }
        self.can_assign(player_id, day, preferences)
    }

    /// Players who can join a new pod on `day` right now, in vote order.
    pub fn eligible_pool(&self, index: &DayIndex, day: Day, preferences: &Preferences) -> Vec<PlayerId> {
        index
            .get(&day)
            .into_iter()
            .flatten()
            .filter(|p| self.is_eligible(p, day, preferences))
            .cloned()
            .collect()
    }

    /// Players on `day` still without a pod, reservations ignored.
    pub fn unassigned_on(&self, index: &DayIndex, day: Day, preferences: &Preferences) -> Vec<PlayerId> {
        index
            .get(&day)
            .into_iter()
            .flatten()
            .filter(|p| !self.is_assigned(p) && self.can_assign(p, day, preferences))
            .cloned()
            .collect()
    }

    fn form_pod(&mut self, day: Day, players: [PlayerId; POD_SIZE]) {
        for player_id in &players {
            self.assigned.insert(player_id.clone());
            self.assigned_days
                .entry(player_id.clone())
                .or_default()
                .push(day);
            // No longer reserved once assigned
            self.reservations.remove(player_id);
        }
        debug!(day = %day, players = ?players, "formed pod");
        self.pods.push(PodAssignment { day, players });
    }

    /// Drops reservations whose target day can no longer reach a full pod.
    fn release_stale_reservations(&mut self, index: &DayIndex) {
        let assigned = &self.assigned;
        self.reservations.retain(|player_id, required_day| {
            let open = index.get(required_day).map_or(0, |players| {
                players.iter().filter(|p| !assigned.contains(*p)).count()
            });
            if open < POD_SIZE {
                debug!(player = %player_id, day = %required_day, "released reservation");
                false
            } else {
                true
            }
        });
    }
}

/// Greedy pass: for each day in priority order, fill pods of four from the
/// eligible pool, first voters first.
pub fn assign_pods(
    index: &DayIndex,
    day_order: &[Day],
    preferences: &Preferences,
    reservations: Reservations,
) -> AssignmentState {
    let mut state = AssignmentState::new(reservations);

    for &day in day_order {
        let mut pool = state.eligible_pool(index, day, preferences);

        while pool.len() >= POD_SIZE {
            let players: [PlayerId; POD_SIZE] = std::array::from_fn(|i| pool[i].clone());
            state.form_pod(day, players);
            pool = state.eligible_pool(index, day, preferences);
        }

        state.release_stale_reservations(index);
    }

    state
}
