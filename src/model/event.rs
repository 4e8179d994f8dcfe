use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::match_record::{status_text, MatchLabel, MatchRecord, MatchStatus};
use crate::error::Result;

/// Event payload as returned by the Nexus API.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NexusEvent {
    #[serde(default)]
    pub now_queuing: Option<String>,
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    pub data_as_of_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub matches: Vec<NexusMatch>,
}

/// A single match as returned by the Nexus API.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NexusMatch {
    pub label: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub red_teams: Option<Vec<Option<String>>>,
    #[serde(default)]
    pub blue_teams: Option<Vec<Option<String>>>,
    #[serde(default)]
    pub times: NexusMatchTimes,
    #[serde(default)]
    pub break_after: Option<String>,
}

/// Match times in epoch milliseconds.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NexusMatchTimes {
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    pub scheduled_start_time: Option<DateTime<Utc>>,
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    pub estimated_start_time: Option<DateTime<Utc>>,
}

impl TryFrom<NexusMatch> for MatchRecord {
    type Error = crate::error::Error;

    fn try_from(raw: NexusMatch) -> Result<Self> {
        Ok(MatchRecord {
            label: MatchLabel::parse(&raw.label)?,
            status: MatchStatus::from_upstream(raw.status.as_deref()),
            status_text: status_text(raw.status.as_deref()),
            red_teams: roster(raw.red_teams),
            blue_teams: roster(raw.blue_teams),
            scheduled_start_time: raw.times.scheduled_start_time,
            estimated_start_time: raw.times.estimated_start_time,
            break_after: raw.break_after.filter(|b| !b.trim().is_empty()),
        })
    }
}

// Undecided playoff seats come through as nulls.
fn roster(teams: Option<Vec<Option<String>>>) -> Vec<String> {
    teams.into_iter().flatten().flatten().collect()
}

/// One fetched view of an event. Never mutated after construction; every
/// fetch produces a fresh snapshot.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventSnapshot {
    event_key: String,
    now_queuing: Option<String>,
    data_as_of: Option<DateTime<Utc>>,
    matches: Vec<MatchRecord>,
}

impl EventSnapshot {
    pub fn new(
        event_key: impl Into<String>,
        now_queuing: Option<String>,
        matches: Vec<MatchRecord>,
    ) -> Self {
        Self {
            event_key: event_key.into(),
            now_queuing: now_queuing.filter(|q| !q.trim().is_empty()),
            data_as_of: None,
            matches,
        }
    }

    /// Build a snapshot from an upstream payload. Fails as a whole on the
    /// first malformed label rather than dropping matches.
    pub fn from_nexus(event_key: impl Into<String>, event: NexusEvent) -> Result<Self> {
        let matches = event
            .matches
            .into_iter()
            .map(MatchRecord::try_from)
            .collect::<Result<Vec<_>>>()?;
        let mut snapshot = Self::new(event_key, event.now_queuing, matches);
        snapshot.data_as_of = event.data_as_of_time;
        Ok(snapshot)
    }

    pub fn event_key(&self) -> &str {
        &self.event_key
    }

    pub fn now_queuing(&self) -> Option<&str> {
        self.now_queuing.as_deref()
    }

    pub fn data_as_of(&self) -> Option<DateTime<Utc>> {
        self.data_as_of
    }

    pub fn matches(&self) -> &[MatchRecord] {
        &self.matches
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    const EVENT_JSON: &str = r#"{
        "eventKey": "2025miket",
        "dataAsOfTime": 1743265200000,
        "nowQueuing": "Qualification 3",
        "matches": [
            {
                "label": "Qualification 1",
                "status": "On field",
                "redTeams": ["1114", "2056", "4039"],
                "blueTeams": ["254", "1678", "118"],
                "times": { "scheduledStartTime": 1743264000000, "estimatedStartTime": 1743264060000 },
                "breakAfter": null
            },
            {
                "label": "Playoff 1",
                "status": null,
                "redTeams": [null, "254", null],
                "blueTeams": null,
                "times": {},
                "breakAfter": "Lunch"
            }
        ]
    }"#;

    #[test]
    fn test_from_nexus() {
        let event: NexusEvent = serde_json::from_str(EVENT_JSON).unwrap();
        let snapshot = EventSnapshot::from_nexus("2025miket", event).unwrap();

        assert_eq!(snapshot.event_key(), "2025miket");
        assert_eq!(snapshot.now_queuing(), Some("Qualification 3"));
        assert!(snapshot.data_as_of().is_some());
        assert_eq!(snapshot.matches().len(), 2);

        let q1 = &snapshot.matches()[0];
        assert_eq!(q1.status, MatchStatus::OnField);
        assert_eq!(q1.status_text, "On field");
        assert_eq!(q1.blue_teams, vec!["254", "1678", "118"]);
        assert_eq!(
            q1.scheduled_start_time.map(|t| t.timestamp_millis()),
            Some(1743264000000)
        );

        let p1 = &snapshot.matches()[1];
        assert_eq!(p1.status, MatchStatus::Scheduled);
        assert_eq!(p1.status_text, "Scheduled");
        assert_eq!(p1.red_teams, vec!["254"]);
        assert!(p1.blue_teams.is_empty());
        assert_eq!(p1.break_after.as_deref(), Some("Lunch"));
    }

    #[test]
    fn test_from_nexus_malformed_label() {
        let event = NexusEvent {
            matches: vec![NexusMatch {
                label: "Practice X".to_string(),
                ..Default::default()
            }],
            ..Default::default()
        };
        let err = EventSnapshot::from_nexus("2025miket", event).unwrap_err();
        assert!(matches!(err, Error::MalformedLabel { ref label, .. } if label == "Practice X"));
    }

    #[test]
    fn test_blank_now_queuing_is_absent() {
        let snapshot = EventSnapshot::new("2025miket", Some("  ".to_string()), vec![]);
        assert_eq!(snapshot.now_queuing(), None);
    }
}
