use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::day::Day;
use crate::error::InvalidDayError;

/// Number of players in a pod.
pub const POD_SIZE: usize = 4;

pub type PlayerId = String;

/// Per-player scheduling preference flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Preference {
    /// At most one pod for the whole week.
    OneGameOnly,
    /// Never two pods on neighbouring days.
    NoConsecutive,
}

impl Preference {
    /// Normalizes free-text labels ("one game only", "One_Game_Only", "no consecutive nights", ...)
    pub fn from_label(label: &str) -> Option<Preference> {
        let normalized: String = label
            .trim()
            .to_lowercase()
            .chars()
            .map(|c| if c == '_' || c == '-' { ' ' } else { c })
            .collect();
        let words: Vec<&str> = normalized.split_whitespace().collect();
        match words.as_slice() {
            ["one", "game", "only"] | ["one", "game"] => Some(Preference::OneGameOnly),
            ["no", "consecutive"] | ["no", "consecutive", "nights"] | ["no", "consecutive", "days"] => {
                Some(Preference::NoConsecutive)
            }
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Preference::OneGameOnly => "one_game_only",
            Preference::NoConsecutive => "no_consecutive",
        }
    }
}

/// One player's vote: the days they can play, in the order they voted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerVote {
    pub player_id: PlayerId,
    pub days: Vec<Day>,
}

/// Player availability in vote-insertion order.
///
/// The order of players is the tie-break the assigner uses when filling a pod,
/// so this is an ordered list rather than a hash map.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<PlayerVote>", into = "Vec<PlayerVote>")]
pub struct Availability {
    votes: Vec<PlayerVote>,
}

impl Availability {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a vote. Duplicate days are dropped (first occurrence wins).
    /// A player who votes again keeps their first position in line.
    pub fn insert<I>(&mut self, player_id: impl Into<PlayerId>, days: I)
    where
        I: IntoIterator<Item = Day>,
    {
        let player_id = player_id.into();
        let mut unique_days = Vec::new();
        for day in days {
            if !unique_days.contains(&day) {
                unique_days.push(day);
            }
        }

        match self.votes.iter_mut().find(|v| v.player_id == player_id) {
            Some(existing) => existing.days = unique_days,
            None => self.votes.push(PlayerVote {
                player_id,
                days: unique_days,
            }),
        }
    }

    /// Builds availability from raw day names, failing on the first non-canonical day.
    pub fn parse<P, D, S>(votes: impl IntoIterator<Item = (P, D)>) -> Result<Self, InvalidDayError>
    where
        P: Into<PlayerId>,
        D: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut availability = Self::new();
        for (player_id, days) in votes {
            let days = days
                .into_iter()
                .map(|d| d.as_ref().parse::<Day>())
                .collect::<Result<Vec<_>, _>>()?;
            availability.insert(player_id, days);
        }
        Ok(availability)
    }

    /// Days the player voted for, or an empty slice for unknown players.
    pub fn days_for(&self, player_id: &str) -> &[Day] {
        self.votes
            .iter()
            .find(|v| v.player_id == player_id)
            .map(|v| v.days.as_slice())
            .unwrap_or(&[])
    }

    pub fn contains(&self, player_id: &str) -> bool {
        self.votes.iter().any(|v| v.player_id == player_id)
    }

    /// Available on two or more days.
    pub fn is_flexible(&self, player_id: &str) -> bool {
        self.days_for(player_id).len() >= 2
    }

    pub fn votes(&self) -> &[PlayerVote] {
        &self.votes
    }

    pub fn players(&self) -> impl Iterator<Item = &PlayerId> {
        self.votes.iter().map(|v| &v.player_id)
    }

    pub fn len(&self) -> usize {
        self.votes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.votes.is_empty()
    }
}

impl From<Vec<PlayerVote>> for Availability {
    fn from(votes: Vec<PlayerVote>) -> Self {
        let mut availability = Availability::new();
        for vote in votes {
            availability.insert(vote.player_id, vote.days);
        }
        availability
    }
}

impl From<Availability> for Vec<PlayerVote> {
    fn from(availability: Availability) -> Self {
        availability.votes
    }
}

impl<P: Into<PlayerId>> FromIterator<(P, Vec<Day>)> for Availability {
    fn from_iter<T: IntoIterator<Item = (P, Vec<Day>)>>(iter: T) -> Self {
        let mut availability = Availability::new();
        for (player_id, days) in iter {
            availability.insert(player_id, days);
        }
        availability
    }
}

/// Preference flags per player. Players without an entry have no preferences.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Preferences(BTreeMap<PlayerId, BTreeSet<Preference>>);

impl Preferences {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, player_id: impl Into<PlayerId>, preference: Preference) {
        self.0.entry(player_id.into()).or_default().insert(preference);
    }

    /// Replaces every flag held by the player.
    pub fn set<I>(&mut self, player_id: impl Into<PlayerId>, preferences: I)
    where
        I: IntoIterator<Item = Preference>,
    {
        let flags: BTreeSet<Preference> = preferences.into_iter().collect();
        let player_id = player_id.into();
        if flags.is_empty() {
            self.0.remove(&player_id);
        } else {
            self.0.insert(player_id, flags);
        }
    }

    pub fn has(&self, player_id: &str, preference: Preference) -> bool {
        self.0
            .get(player_id)
            .is_some_and(|flags| flags.contains(&preference))
    }

    pub fn flags(&self, player_id: &str) -> impl Iterator<Item = Preference> + '_ {
        self.0.get(player_id).into_iter().flatten().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<P: Into<PlayerId>> FromIterator<(P, Preference)> for Preferences {
    fn from_iter<T: IntoIterator<Item = (P, Preference)>>(iter: T) -> Self {
        let mut preferences = Preferences::new();
        for (player_id, preference) in iter {
            preferences.add(player_id, preference);
        }
        preferences
    }
}

/// A formed pod: four distinct players on one day, in fill order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PodAssignment {
    pub day: Day,
    pub players: [PlayerId; POD_SIZE],
}

impl PodAssignment {
    pub fn contains(&self, player_id: &str) -> bool {
        self.players.iter().any(|p| p == player_id)
    }
}

/// A day that ended with 1-3 players stranded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncompletePod {
    pub day: Day,
    pub players: Vec<PlayerId>,
    pub needed: usize,
    /// Already-assigned players who could play a second game that day.
    pub eligible_volunteers: Vec<PlayerId>,
}

/// A situation the heuristic leaves to a human decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "scenario", rename_all = "snake_case")]
pub enum ChoiceScenario {
    /// One player is the fourth member of two different days' pods.
    CriticalForBoth {
        player: PlayerId,
        day1: Day,
        day2: Day,
        pod1: Vec<PlayerId>,
        pod2: Vec<PlayerId>,
    },
    /// A day is one player short and assigned flexible players could fill it.
    DoublePlayNeeded {
        day: Day,
        waiting_players: Vec<PlayerId>,
        flexible_candidates: Vec<PlayerId>,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptimizationResult {
    pub pods: Vec<PodAssignment>,
    pub players_with_games: BTreeSet<PlayerId>,
    pub players_without_games: BTreeSet<PlayerId>,
    pub incomplete_pods: Vec<IncompletePod>,
    pub choice_required: Option<ChoiceScenario>,
}

impl OptimizationResult {
    /// Number of pods the player was placed in.
    pub fn games_for(&self, player_id: &str) -> usize {
        self.pods.iter().filter(|pod| pod.contains(player_id)).count()
    }

    pub fn days_for(&self, player_id: &str) -> Vec<Day> {
        self.pods
            .iter()
            .filter(|pod| pod.contains(player_id))
            .map(|pod| pod.day)
            .collect()
    }
}
