use std::collections::BTreeMap;

use itertools::Itertools;
use tracing::debug;

use super::Schedule;
use crate::model::{MatchRecord, MatchStatus, TeamNumber, TeamView};

/// Build the view of one team's matches from an already-inferred schedule.
///
/// A match is included when the team appears on either alliance. Completed
/// matches go to the completed list in schedule order; everything else is
/// grouped by phase and ordered by match number within each group. Only the
/// inferred status is consulted.
pub fn build_team_view(schedule: &Schedule, team: &TeamNumber) -> TeamView {
    let (mut completed, active): (Vec<MatchRecord>, Vec<MatchRecord>) = schedule
        .matches()
        .iter()
        .filter(|m| m.involves(team))
        .cloned()
        .partition(|m| m.status == MatchStatus::Completed);

    completed.sort_by(|a, b| a.label.cmp_schedule(&b.label));

    let active: BTreeMap<String, Vec<MatchRecord>> = active
        .into_iter()
        .into_group_map_by(|m| m.phase().to_string())
        .into_iter()
        .map(|(phase, mut matches)| {
            matches.sort_by_key(MatchRecord::number);
            (phase, matches)
        })
        .collect();

    debug!(
        team = %team,
        phases = active.len(),
        completed = completed.len(),
        "built team view"
    );

    TeamView {
        event_key: schedule.event_key().to_string(),
        team: team.clone(),
        now_queuing: schedule.now_queuing().map(str::to_string),
        active,
        completed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::EventSnapshot;
    use crate::pipeline::tests::{record, record_with_teams};

    fn schedule(matches: Vec<MatchRecord>) -> Schedule {
        Schedule::prepare(&EventSnapshot::new("2025miket", None, matches))
    }

    fn team(raw: &str) -> TeamNumber {
        TeamNumber::from_raw(raw).unwrap()
    }

    #[test]
    fn test_filter_by_either_alliance() {
        let scheduled = MatchStatus::Scheduled;
        let schedule = schedule(vec![
            record_with_teams("Qualification 1", scheduled, &["1", "2", "3"], &["4", "254", "6"]),
            record_with_teams("Qualification 2", scheduled, &["254", "8", "9"], &["10", "11"]),
            record_with_teams("Qualification 3", scheduled, &["13", "14"], &["16", "17", "18"]),
        ]);

        let plain = build_team_view(&schedule, &team("254"));
        let prefixed = build_team_view(&schedule, &team("frc254"));
        assert_eq!(plain.match_count(), 2);
        assert_eq!(plain.active, prefixed.active);
        assert_eq!(plain.completed, prefixed.completed);

        let other = build_team_view(&schedule, &team("99"));
        assert!(other.is_empty());
    }

    #[test]
    fn test_team_match_is_exact() {
        let schedule = schedule(vec![record_with_teams(
            "Qualification 1",
            MatchStatus::Scheduled,
            &["2540", "1", "2"],
            &["25", "3", "4"],
        )]);
        assert!(build_team_view(&schedule, &team("254")).is_empty());
    }

    #[test]
    fn test_partition_and_grouping() {
        let schedule = schedule(vec![
            record("Qualification 10", MatchStatus::Scheduled),
            record("Playoff 2", MatchStatus::Scheduled),
            record("Qualification 2", MatchStatus::OnDeck),
            record("Qualification 1", MatchStatus::Completed),
            record("Practice 4", MatchStatus::Completed),
            record("Playoff 1", MatchStatus::Queuing),
        ]);
        let view = build_team_view(&schedule, &team("254"));

        assert_eq!(view.active.keys().collect_vec(), vec!["Playoff", "Qualification"]);
        let qual = view.active["Qualification"]
            .iter()
            .map(|m| m.label.as_str())
            .collect_vec();
        assert_eq!(qual, vec!["Qualification 2", "Qualification 10"]);

        let completed = view
            .completed
            .iter()
            .map(|m| m.label.as_str())
            .collect_vec();
        assert_eq!(completed, vec!["Practice 4", "Qualification 1"]);
    }

    #[test]
    fn test_no_completed_in_active_groups() {
        let schedule = schedule(vec![
            record("Qualification 1", MatchStatus::OnField),
            record("Qualification 2", MatchStatus::OnField),
            record("Qualification 3", MatchStatus::OnField),
            record("Qualification 4", MatchStatus::Completed),
            record("Qualification 5", MatchStatus::Scheduled),
        ]);
        let view = build_team_view(&schedule, &team("254"));
        assert!(view
            .active
            .values()
            .flatten()
            .all(|m| m.status != MatchStatus::Completed));
        assert_eq!(view.completed.len(), 3);
    }
}
