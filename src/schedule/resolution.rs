use std::collections::HashMap;

use tracing::info;

use super::assigner::can_assign_to_day;
use super::day::Day;
use super::types::{
    Availability, ChoiceScenario, OptimizationResult, PlayerId, PodAssignment, Preferences, POD_SIZE,
};
use crate::error::{ScheduleError, ScheduleResult};

impl OptimizationResult {
    /// Confirms a double-play volunteer: the waiting players and the volunteer
    /// become a pod on the pending day and the scenario is cleared.
    ///
    /// Volunteers offered for the remaining short days are re-checked against
    /// `preferences`, since the volunteer now holds one more day.
    pub fn accept_volunteer(
        &mut self,
        volunteer: &str,
        preferences: &Preferences,
    ) -> ScheduleResult<PodAssignment> {
        let Some(ChoiceScenario::DoublePlayNeeded {
            day,
            waiting_players,
            flexible_candidates,
        }) = &self.choice_required
        else {
            return Err(ScheduleError::NoDoublePlayPending);
        };
        let day = *day;

        if !flexible_candidates.iter().any(|c| c == volunteer) {
            return Err(ScheduleError::NotAFlexibleCandidate {
                player: volunteer.to_string(),
                day,
            });
        }

        let waiting_players = waiting_players.clone();
        let mut members = waiting_players.clone();
        members.push(volunteer.to_string());
        let players: [PlayerId; POD_SIZE] = members
            .try_into()
            .map_err(|_| ScheduleError::NoDoublePlayPending)?;

        for player_id in &waiting_players {
            self.players_without_games.remove(player_id);
            self.players_with_games.insert(player_id.clone());
        }

        // Newly placed players are no longer stranded anywhere
        self.incomplete_pods.retain(|pod| pod.day != day);
        for pod in &mut self.incomplete_pods {
            pod.players.retain(|p| !waiting_players.contains(p));
            pod.needed = POD_SIZE.saturating_sub(pod.players.len());
        }
        self.incomplete_pods.retain(|pod| !pod.players.is_empty());

        let pod = PodAssignment { day, players };
        info!(day = %day, volunteer, "double-play volunteer accepted");
        self.pods.push(pod.clone());
        self.choice_required = None;

        let held = self.held_days();
        for incomplete in &mut self.incomplete_pods {
            let short_day = incomplete.day;
            incomplete.eligible_volunteers.retain(|p| {
                let plays_that_day = held.get(p).is_some_and(|days| days.contains(&short_day));
                !plays_that_day && can_assign_to_day(p, short_day, &held, preferences)
            });
        }
        Ok(pod)
    }

    /// Days each player holds a pod on, in pod order.
    fn held_days(&self) -> HashMap<PlayerId, Vec<Day>> {
        let mut held: HashMap<PlayerId, Vec<Day>> = HashMap::new();
        for pod in &self.pods {
            for player_id in &pod.players {
                held.entry(player_id.clone()).or_default().push(pod.day);
            }
        }
        held
    }
}

impl Availability {
    /// Resolves a critical-for-both choice: a copy where `player_id` is only
    /// available on `day`. Re-run the optimizer on the result.
    pub fn restrict_player(&self, player_id: &str, day: Day) -> ScheduleResult<Availability> {
        if !self.contains(player_id) {
            return Err(ScheduleError::UnknownPlayer(player_id.to_string()));
        }
        if !self.days_for(player_id).contains(&day) {
            return Err(ScheduleError::DayNotAvailable {
                player: player_id.to_string(),
                day,
            });
        }

        let mut restricted = self.clone();
        restricted.insert(player_id, [day]);
        Ok(restricted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::optimizer::optimize;
    use crate::schedule::types::Preference;

    fn double_play_week() -> Availability {
        [
            ("n8", vec![Day::Monday]),
            ("chris", vec![Day::Monday]),
            ("patrick", vec![Day::Monday, Day::Tuesday, Day::Wednesday]),
            ("eli", vec![Day::Monday, Day::Wednesday]),
            ("chad", vec![Day::Tuesday, Day::Wednesday]),
            ("matt", vec![Day::Tuesday, Day::Wednesday]),
            ("trevor", vec![Day::Wednesday]),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn accepting_a_volunteer_forms_the_pod() {
        let mut result = optimize(&double_play_week(), &Preferences::new());
        let pod = result.accept_volunteer("eli", &Preferences::new()).unwrap();

        assert_eq!(pod.day, Day::Wednesday);
        assert!(pod.contains("eli"));
        assert_eq!(result.pods.len(), 2);
        assert_eq!(result.games_for("eli"), 2);
        assert!(result.players_without_games.is_empty());
        assert_eq!(result.players_with_games.len(), 7);
        assert!(result.choice_required.is_none());
        assert!(result.incomplete_pods.iter().all(|p| p.day != Day::Wednesday));
        // chad and matt were also stranded on Tuesday
        assert!(result.incomplete_pods.iter().all(|p| !p.players.contains(&"chad".to_string())));
    }

    #[test]
    fn accepted_volunteer_is_no_longer_offered_for_a_neighbouring_day() {
        let mut votes: Vec<(String, Vec<Day>)> = (1..=7).map(|i| (format!("a{i}"), vec![Day::Monday])).collect();
        votes.push(("flex".into(), vec![Day::Monday, Day::Wednesday, Day::Thursday]));
        votes.extend((1..=3).map(|i| (format!("b{i}"), vec![Day::Wednesday])));
        votes.extend((1..=2).map(|i| (format!("t{i}"), vec![Day::Thursday])));
        let availability: Availability = votes.into_iter().collect();
        let preferences: Preferences = [("flex", Preference::NoConsecutive)].into_iter().collect();

        let mut result = optimize(&availability, &preferences);
        let thursday = |result: &OptimizationResult| {
            result
                .incomplete_pods
                .iter()
                .find(|pod| pod.day == Day::Thursday)
                .cloned()
                .unwrap()
        };
        assert_eq!(thursday(&result).eligible_volunteers, vec!["flex"]);

        let pod = result.accept_volunteer("flex", &preferences).unwrap();
        assert_eq!(pod.day, Day::Wednesday);
        assert_eq!(result.days_for("flex"), vec![Day::Monday, Day::Wednesday]);

        let thursday = thursday(&result);
        assert_eq!(thursday.players, vec!["t1", "t2"]);
        assert!(thursday.eligible_volunteers.is_empty());
    }

    #[test]
    fn rejects_non_candidates_and_missing_scenarios() {
        let mut result = optimize(&double_play_week(), &Preferences::new());
        assert!(matches!(
            result.accept_volunteer("trevor", &Preferences::new()),
            Err(ScheduleError::NotAFlexibleCandidate { .. })
        ));

        result.accept_volunteer("patrick", &Preferences::new()).unwrap();
        assert!(matches!(
            result.accept_volunteer("eli", &Preferences::new()),
            Err(ScheduleError::NoDoublePlayPending)
        ));
    }

    #[test]
    fn restricting_a_critical_player_resolves_the_choice() {
        let availability: Availability = [
            ("a", vec![Day::Monday, Day::Wednesday]),
            ("b", vec![Day::Monday]),
            ("c", vec![Day::Monday]),
            ("d", vec![Day::Monday]),
            ("e", vec![Day::Wednesday]),
            ("f", vec![Day::Wednesday]),
            ("g", vec![Day::Wednesday]),
        ]
        .into_iter()
        .collect();

        let restricted = availability.restrict_player("a", Day::Wednesday).unwrap();
        assert_eq!(restricted.days_for("a"), &[Day::Wednesday]);
        assert_eq!(availability.days_for("a"), &[Day::Monday, Day::Wednesday]);

        let result = optimize(&restricted, &Preferences::new());
        assert_eq!(result.pods.len(), 1);
        assert_eq!(result.pods[0].day, Day::Wednesday);
        assert!(result.choice_required.is_none());
    }

    #[test]
    fn restricting_checks_player_and_day() {
        let availability: Availability = [("a", vec![Day::Monday])].into_iter().collect();
        assert!(matches!(
            availability.restrict_player("zed", Day::Monday),
            Err(ScheduleError::UnknownPlayer(_))
        ));
        assert!(matches!(
            availability.restrict_player("a", Day::Friday),
            Err(ScheduleError::DayNotAvailable { .. })
        ));
    }
}
