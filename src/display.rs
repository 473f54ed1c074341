use std::collections::BTreeMap;
use std::fs::File;
use std::io::Write;

use crate::schedule::{ChoiceScenario, Day, OptimizationResult, PlayerId, PodAssignment};

/// Groups pods by day, in canonical week order, keeping fill order within a day.
pub fn group_pods_by_day(pods: &[PodAssignment]) -> BTreeMap<Day, Vec<&PodAssignment>> {
    let mut grouped: BTreeMap<Day, Vec<&PodAssignment>> = BTreeMap::new();
    for pod in pods {
        grouped.entry(pod.day).or_default().push(pod);
    }
    grouped
}

/// Formats a player for display: the display name with the id in brackets,
/// or just the id when no name is known.
pub fn format_player_name(player_id: &str, name: Option<&str>) -> String {
    match name {
        Some(name) if !name.trim().is_empty() && name != player_id => {
            format!("{} [{}]", name.trim(), player_id)
        }
        _ => player_id.to_string(),
    }
}

/// Renders a result with player ids as-is.
pub fn format_result(result: &OptimizationResult) -> String {
    format_result_with(result, |player_id| player_id.to_string())
}

/// Renders a result, mapping each player id through `name_of`.
pub fn format_result_with<F>(result: &OptimizationResult, name_of: F) -> String
where
    F: Fn(&str) -> String,
{
    let join = |players: &[PlayerId]| -> String {
        players
            .iter()
            .map(|p| name_of(p))
            .collect::<Vec<_>>()
            .join(", ")
    };

    let mut lines = vec!["**Pod Assignments for This Week**".to_string(), String::new()];

    // An unresolved critical player blocks the whole week
    if let Some(ChoiceScenario::CriticalForBoth {
        player,
        day1,
        day2,
        pod1,
        pod2,
    }) = &result.choice_required
    {
        lines.push("**PLAYER CHOICE REQUIRED**".to_string());
        lines.push(format!(
            "{} is needed for pods on both {} and {}. Please choose which day you prefer to play, or if you can attend both!",
            name_of(player),
            day1,
            day2
        ));
        lines.push(String::new());
        lines.push("**Potential Pods:**".to_string());
        lines.push(format!("**{}:** {}", day1, join(pod1)));
        lines.push(format!("**{}:** {}", day2, join(pod2)));
        lines.push(String::new());
        lines.push("Please respond with your choice!".to_string());
        return lines.join("\n");
    }

    if result.pods.is_empty() {
        lines.push("No pods could be formed this week. Need at least 4 players for one day.".to_string());
    } else {
        for (day, pods) in group_pods_by_day(&result.pods) {
            lines.push(format!("**{}:**", day));
            for (i, pod) in pods.iter().enumerate() {
                lines.push(format!("  Pod {}: {}", i + 1, join(&pod.players)));
            }
            lines.push(String::new());
        }
        lines.push(format!(
            "**Total players with games:** {}",
            result.players_with_games.len()
        ));
    }

    if !result.players_without_games.is_empty() {
        let without: Vec<PlayerId> = result.players_without_games.iter().cloned().collect();
        lines.push(String::new());
        lines.push(format!("**Players without games this week:** {}", join(&without)));
    }

    let mut double_play_day = None;
    if let Some(ChoiceScenario::DoublePlayNeeded {
        day,
        waiting_players,
        flexible_candidates,
    }) = &result.choice_required
    {
        double_play_day = Some(*day);
        lines.push(String::new());
        lines.push("---".to_string());
        lines.push(format!("**Need 1 more player for {}!**", day));
        lines.push(String::new());
        lines.push(format!("Waiting to play: {}", join(waiting_players)));
        lines.push(String::new());
        lines.push("Can any of these players join for a 2nd game?".to_string());
        lines.push(join(flexible_candidates));
    }

    let almost: Vec<_> = result
        .incomplete_pods
        .iter()
        .filter(|pod| Some(pod.day) != double_play_day)
        .collect();
    if !almost.is_empty() {
        lines.push(String::new());
        lines.push("**Almost made it:**".to_string());
        for incomplete in almost {
            lines.push(format!(
                "  {}: {} (need {} more)",
                incomplete.day,
                join(&incomplete.players),
                incomplete.needed
            ));
            if !incomplete.eligible_volunteers.is_empty() {
                lines.push(format!("    ↳ Could play: {}", join(&incomplete.eligible_volunteers)));
            }
        }
    }

    lines.join("\n")
}

/// Writes the formatted result to a file
pub fn write_result_to_file(formatted: &str, filename: &str) -> Result<(), Box<dyn std::error::Error>> {
    let mut file = File::create(filename)?;
    writeln!(file, "{}", formatted)?;
    Ok(())
}

/// Prints a short per-day summary of a result
pub fn print_summary(result: &OptimizationResult) {
    println!("\n=== Pod Summary ===");
    println!("Pods formed: {}", result.pods.len());
    println!("Players with games: {}", result.players_with_games.len());

    if !result.players_without_games.is_empty() {
        println!("⚠️  Players without games ({}):", result.players_without_games.len());
        for player_id in &result.players_without_games {
            println!("  - {}", player_id);
        }
    }

    for (day, pods) in group_pods_by_day(&result.pods) {
        println!("  {} -> {} pod(s)", day, pods.len());
    }
}
