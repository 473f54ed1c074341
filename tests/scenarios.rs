use pod_assignments::{format_result, optimize, Availability, ChoiceScenario, Day, IncompletePod, Preferences};

use Day::*;

fn week(votes: &[(&str, &[Day])]) -> Availability {
    votes
        .iter()
        .map(|(player, days)| (*player, days.to_vec()))
        .collect()
}

#[test]
fn scenario_a_four_players_one_pod() {
    let availability = week(&[("a", &[Monday]), ("b", &[Monday]), ("c", &[Monday]), ("d", &[Monday])]);
    let result = optimize(&availability, &Preferences::new());

    assert_eq!(result.pods.len(), 1);
    assert_eq!(result.pods[0].day, Monday);
    assert_eq!(result.pods[0].players, ["a", "b", "c", "d"].map(String::from));
    assert!(result.players_without_games.is_empty());
    assert!(result.choice_required.is_none());
}

#[test]
fn scenario_b_three_players_almost_made_it() {
    let availability = week(&[("a", &[Monday]), ("b", &[Monday]), ("c", &[Monday])]);
    let result = optimize(&availability, &Preferences::new());

    assert!(result.pods.is_empty());
    assert_eq!(
        result.incomplete_pods,
        vec![IncompletePod {
            day: Monday,
            players: vec!["a".into(), "b".into(), "c".into()],
            needed: 1,
            eligible_volunteers: vec![],
        }]
    );
    assert_eq!(result.players_without_games.len(), 3);

    let text = format_result(&result);
    assert!(text.contains("No pods could be formed this week"));
    assert!(text.contains("  Monday: a, b, c (need 1 more)"));
}

#[test]
fn scenario_c_player_critical_for_both_days() {
    let availability = week(&[
        ("a", &[Monday, Wednesday]),
        ("b", &[Monday]),
        ("c", &[Monday]),
        ("d", &[Monday]),
        ("e", &[Wednesday]),
        ("f", &[Wednesday]),
        ("g", &[Wednesday]),
    ]);
    let result = optimize(&availability, &Preferences::new());

    match result.choice_required {
        Some(ChoiceScenario::CriticalForBoth { player, day1, day2, pod1, pod2 }) => {
            assert_eq!(player, "a");
            assert_eq!((day1, day2), (Monday, Wednesday));
            assert_eq!(pod1, vec!["a", "b", "c", "d"]);
            assert_eq!(pod2, vec!["a", "e", "f", "g"]);
        }
        other => panic!("expected a critical-for-both choice, got {:?}", other),
    }
}

#[test]
fn scenario_d_veto_keeps_monday_whole() {
    let availability = week(&[
        ("p1", &[Monday, Tuesday]),
        ("p2", &[Monday, Tuesday]),
        ("p3", &[Monday, Tuesday]),
        ("p4", &[Monday, Wednesday]),
        ("p5", &[Monday, Wednesday]),
        ("p6", &[Monday, Wednesday]),
        ("p7", &[Monday, Thursday]),
        ("p8", &[Monday, Thursday]),
    ]);
    let result = optimize(&availability, &Preferences::new());

    assert_eq!(result.pods.len(), 2);
    assert!(result.pods.iter().all(|pod| pod.day == Monday));
    assert_eq!(result.players_with_games.len(), 8);
    assert!(result.players_without_games.is_empty());
}

#[test]
fn scenario_e_double_play_needed() {
    let availability = week(&[
        ("n8", &[Monday]),
        ("chris", &[Monday]),
        ("patrick", &[Monday, Tuesday, Wednesday]),
        ("eli", &[Monday, Wednesday]),
        ("chad", &[Tuesday, Wednesday]),
        ("matt", &[Tuesday, Wednesday]),
        ("trevor", &[Wednesday]),
    ]);
    let result = optimize(&availability, &Preferences::new());

    assert_eq!(result.pods.len(), 1);
    assert_eq!(result.pods[0].players, ["n8", "chris", "patrick", "eli"].map(String::from));
    assert_eq!(
        result.choice_required,
        Some(ChoiceScenario::DoublePlayNeeded {
            day: Wednesday,
            waiting_players: vec!["chad".into(), "matt".into(), "trevor".into()],
            flexible_candidates: vec!["patrick".into(), "eli".into()],
        })
    );
}

#[test]
fn two_separate_days() {
    let availability = week(&[
        ("alice", &[Monday]),
        ("bob", &[Monday]),
        ("charlie", &[Monday]),
        ("dave", &[Monday]),
        ("eve", &[Wednesday]),
        ("frank", &[Wednesday]),
        ("grace", &[Wednesday]),
        ("henry", &[Wednesday]),
    ]);
    let result = optimize(&availability, &Preferences::new());
    assert_eq!(result.pods.len(), 2);
    assert_eq!(result.players_with_games.len(), 8);
}

#[test]
fn flexible_player_is_reserved_for_the_short_day() {
    let availability = week(&[
        ("alice", &[Monday, Wednesday]),
        ("bob", &[Monday]),
        ("charlie", &[Monday]),
        ("dave", &[Wednesday]),
        ("eve", &[Wednesday]),
        ("frank", &[Wednesday]),
        ("grace", &[Monday]),
        ("henry", &[Wednesday]),
    ]);
    let result = optimize(&availability, &Preferences::new());

    assert_eq!(result.pods.len(), 2);
    assert_eq!(result.days_for("alice"), vec![Monday]);
    assert!(result.players_without_games.is_empty());
}

#[test]
fn multiple_overlapping_players() {
    let availability = week(&[
        ("alice", &[Monday, Tuesday]),
        ("bob", &[Monday, Tuesday]),
        ("charlie", &[Monday, Wednesday]),
        ("dave", &[Monday, Wednesday]),
        ("eve", &[Monday]),
        ("frank", &[Tuesday]),
        ("grace", &[Tuesday]),
        ("henry", &[Wednesday]),
        ("iris", &[Wednesday]),
    ]);
    let result = optimize(&availability, &Preferences::new());

    assert_eq!(result.pods.len(), 2);
    assert_eq!(result.players_with_games.len(), 8);
    assert_eq!(result.players_without_games.iter().collect::<Vec<_>>(), vec!["eve"]);
    assert_eq!(
        result.incomplete_pods,
        vec![IncompletePod {
            day: Monday,
            players: vec!["eve".into()],
            needed: 3,
            eligible_volunteers: vec!["alice".into(), "bob".into(), "charlie".into(), "dave".into()],
        }]
    );
}

#[test]
fn uneven_distribution() {
    let mut votes: Vec<(String, Vec<Day>)> = (1..=8).map(|i| (format!("p{}", i), vec![Monday])).collect();
    votes.push(("p9".into(), vec![Tuesday]));
    votes.push(("p10".into(), vec![Tuesday]));
    let availability: Availability = votes.into_iter().collect();
    let result = optimize(&availability, &Preferences::new());

    assert_eq!(result.pods.len(), 2);
    assert_eq!(result.players_with_games.len(), 8);
    assert_eq!(result.players_without_games.len(), 2);
}

#[test]
fn three_days_with_overlaps() {
    let availability = week(&[
        ("alice", &[Monday, Tuesday]),
        ("bob", &[Monday, Wednesday]),
        ("charlie", &[Monday, Wednesday]),
        ("dave", &[Monday]),
        ("eve", &[Monday]),
        ("frank", &[Tuesday]),
        ("grace", &[Tuesday]),
        ("henry", &[Tuesday]),
        ("iris", &[Wednesday]),
        ("jane", &[Wednesday]),
    ]);
    let result = optimize(&availability, &Preferences::new());

    assert_eq!(result.pods.len(), 2);
    assert_eq!(result.players_with_games.len(), 8);
    assert_eq!(result.players_without_games.iter().collect::<Vec<_>>(), vec!["dave", "eve"]);
}

#[test]
fn super_flexible_player_must_choose() {
    let availability = week(&[
        ("superflex", &[Monday, Tuesday, Wednesday]),
        ("alice", &[Monday]),
        ("bob", &[Monday]),
        ("charlie", &[Monday]),
        ("dave", &[Tuesday]),
        ("eve", &[Tuesday]),
        ("frank", &[Tuesday]),
        ("grace", &[Wednesday]),
        ("henry", &[Wednesday]),
        ("iris", &[Wednesday]),
    ]);
    let result = optimize(&availability, &Preferences::new());

    assert!(matches!(
        result.choice_required,
        Some(ChoiceScenario::CriticalForBoth { ref player, .. }) if player == "superflex"
    ));
}

#[test]
fn exact_multiples_and_all_short() {
    let full: Availability = (1..=12)
        .map(|i| (format!("p{}", i), vec![[Monday, Tuesday, Wednesday][(i - 1) / 4]]))
        .collect();
    let result = optimize(&full, &Preferences::new());
    assert_eq!(result.pods.len(), 3);
    assert!(result.players_without_games.is_empty());

    let short: Availability = (1..=9)
        .map(|i| (format!("p{}", i), vec![[Monday, Tuesday, Wednesday][(i - 1) / 3]]))
        .collect();
    let result = optimize(&short, &Preferences::new());
    assert!(result.pods.is_empty());
    assert_eq!(result.players_without_games.len(), 9);
    assert_eq!(result.incomplete_pods.len(), 3);
    assert!(result.choice_required.is_none());
}

#[test]
fn everyone_flexible() {
    let availability: Availability = (1..=8)
        .map(|i| (format!("p{}", i), vec![Monday, Tuesday, Wednesday]))
        .collect();
    let result = optimize(&availability, &Preferences::new());

    assert_eq!(result.pods.len(), 2);
    assert_eq!(result.players_with_games.len(), 8);
}

#[test]
fn bridge_player_completes_one_day() {
    let availability = week(&[
        ("bridge", &[Monday, Tuesday]),
        ("alice", &[Monday]),
        ("bob", &[Monday]),
        ("charlie", &[Monday]),
        ("dave", &[Tuesday]),
        ("eve", &[Tuesday]),
        ("frank", &[Tuesday]),
    ]);
    let result = optimize(&availability, &Preferences::new());

    assert_eq!(result.pods.len(), 1);
    assert_eq!(result.players_with_games.len(), 4);
    assert_eq!(result.players_without_games.len(), 3);
    assert!(matches!(
        result.choice_required,
        Some(ChoiceScenario::CriticalForBoth { ref player, .. }) if player == "bridge"
    ));
}

#[test]
fn cascading_overflow() {
    let availability: Availability = (1..=18)
        .map(|i| {
            let day = match i {
                1..=7 => Monday,
                8..=13 => Tuesday,
                _ => Wednesday,
            };
            (format!("p{}", i), vec![day])
        })
        .collect();
    let result = optimize(&availability, &Preferences::new());

    assert_eq!(result.pods.len(), 3);
    assert_eq!(result.players_with_games.len(), 12);
    assert_eq!(result.players_without_games.len(), 6);
}

#[test]
fn choice_resolution_round_trip() {
    let availability = week(&[
        ("bridge", &[Monday, Tuesday]),
        ("alice", &[Monday]),
        ("bob", &[Monday]),
        ("charlie", &[Monday]),
        ("dave", &[Tuesday]),
        ("eve", &[Tuesday]),
        ("frank", &[Tuesday]),
    ]);
    let restricted = availability.restrict_player("bridge", Tuesday).unwrap();
    let result = optimize(&restricted, &Preferences::new());

    assert_eq!(result.pods.len(), 1);
    assert_eq!(result.pods[0].day, Tuesday);
    assert!(result.choice_required.is_none());
    assert_eq!(
        result.players_without_games.iter().collect::<Vec<_>>(),
        vec!["alice", "bob", "charlie"]
    );
}
