use tracing::debug;

use super::day_index::DayIndex;
use super::types::{Availability, ChoiceScenario, POD_SIZE};

/// Finds a player who is the fourth member of two different days' pods.
///
/// Runs on the raw pre-assignment index. Players are scanned in vote order and
/// day pairs in the order the player voted; the first hit is returned.
pub fn detect_critical_for_both(availability: &Availability, index: &DayIndex) -> Option<ChoiceScenario> {
    for vote in availability.votes().iter().filter(|v| v.days.len() >= 2) {
        for (i, &day1) in vote.days.iter().enumerate() {
            for &day2 in &vote.days[i + 1..] {
                let (Some(pod1), Some(pod2)) = (index.get(&day1), index.get(&day2)) else {
                    continue;
                };

                if pod1.len() == POD_SIZE
                    && pod2.len() == POD_SIZE
                    && pod1.contains(&vote.player_id)
                    && pod2.contains(&vote.player_id)
                {
                    debug!(player = %vote.player_id, day1 = %day1, day2 = %day2, "player is critical for both days");
                    return Some(ChoiceScenario::CriticalForBoth {
                        player: vote.player_id.clone(),
                        day1,
                        day2,
                        pod1: pod1.clone(),
                        pod2: pod2.clone(),
                    });
                }
            }
        }
    }

    None
}
