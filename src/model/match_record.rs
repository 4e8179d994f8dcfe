use std::cmp::Ordering;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use strum_macros::EnumString;

use super::team::TeamNumber;
use crate::error::{Error, LabelReason, Result};

/// A match label of the form `<Phase> <Number>`, e.g. `Qualification 12`.
///
/// The phase is everything before the first space and the number is the
/// remainder parsed as an integer. Labels are unique within a snapshot, so
/// [`MatchLabel::cmp_schedule`] is a total order over one event's matches.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MatchLabel {
    text: String,
    phase: String,
    number: u32,
}

impl MatchLabel {
    pub fn parse(text: &str) -> Result<Self> {
        let malformed = |reason| Error::MalformedLabel {
            label: text.to_string(),
            reason,
        };

        let (phase, number) = text
            .split_once(' ')
            .ok_or_else(|| malformed(LabelReason::MissingSeparator))?;
        if phase.is_empty() {
            return Err(malformed(LabelReason::EmptyPhase));
        }
        let number = number
            .trim()
            .parse::<u32>()
            .map_err(|e| malformed(LabelReason::InvalidNumber(e)))?;

        Ok(Self {
            text: text.to_string(),
            phase: phase.to_string(),
            number,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn phase(&self) -> &str {
        &self.phase
    }

    pub fn number(&self) -> u32 {
        self.number
    }

    /// Phase ascending (byte-wise), then match number ascending.
    pub fn cmp_schedule(&self, other: &Self) -> Ordering {
        self.phase
            .cmp(&other.phase)
            .then(self.number.cmp(&other.number))
    }
}

impl fmt::Display for MatchLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl Serialize for MatchLabel {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.text)
    }
}

/// Normalized match status.
///
/// Parsing accepts the upstream free text case-insensitively; `Display`
/// yields the canonical upstream spelling.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    EnumString,
    strum_macros::Display,
    strum_macros::AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(ascii_case_insensitive)]
pub enum MatchStatus {
    #[default]
    #[strum(serialize = "Scheduled")]
    Scheduled,
    #[strum(serialize = "Queuing soon", to_string = "Now queuing")]
    Queuing,
    #[strum(serialize = "On deck")]
    OnDeck,
    #[strum(serialize = "On field")]
    OnField,
    #[strum(serialize = "Completed")]
    Completed,
    #[strum(serialize = "Unknown")]
    Unknown,
}

impl MatchStatus {
    /// Map upstream status text. A missing or blank status means the match
    /// has not been called yet; unrecognized text maps to `Unknown`.
    pub fn from_upstream(text: Option<&str>) -> Self {
        match text.map(str::trim) {
            None | Some("") => MatchStatus::Scheduled,
            Some(text) => text.parse().unwrap_or(MatchStatus::Unknown),
        }
    }
}

/// Which side of the field a team plays on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, strum_macros::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Alliance {
    Red,
    Blue,
}

/// A single scheduled match in an event.
///
/// `status` drives ordering and inference decisions. `status_text` is the
/// trimmed upstream wording, which is what gets displayed and fingerprinted;
/// keep the two in step with [`MatchRecord::set_status`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchRecord {
    pub label: MatchLabel,
    pub status: MatchStatus,
    pub status_text: String,
    pub red_teams: Vec<String>,
    pub blue_teams: Vec<String>,
    pub scheduled_start_time: Option<DateTime<Utc>>,
    pub estimated_start_time: Option<DateTime<Utc>>,
    pub break_after: Option<String>,
}

impl MatchRecord {
    pub fn phase(&self) -> &str {
        self.label.phase()
    }

    pub fn number(&self) -> u32 {
        self.label.number()
    }

    /// Exact, case-sensitive roster lookup. Red wins if a team is somehow
    /// listed on both alliances.
    pub fn alliance_of(&self, team: &TeamNumber) -> Option<Alliance> {
        if self.red_teams.iter().any(|t| t == team.as_str()) {
            Some(Alliance::Red)
        } else if self.blue_teams.iter().any(|t| t == team.as_str()) {
            Some(Alliance::Blue)
        } else {
            None
        }
    }

    pub fn involves(&self, team: &TeamNumber) -> bool {
        self.alliance_of(team).is_some()
    }

    /// Override the status, replacing the upstream wording with the
    /// canonical one.
    pub fn set_status(&mut self, status: MatchStatus) {
        self.status = status;
        self.status_text = status.to_string();
    }
}

/// Trimmed upstream status text; a missing or blank status reads as the
/// canonical spelling of `Scheduled`.
pub fn status_text(text: Option<&str>) -> String {
    match text.map(str::trim) {
        None | Some("") => MatchStatus::Scheduled.to_string(),
        Some(text) => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_label() {
        let label = MatchLabel::parse("Qualification 12").unwrap();
        assert_eq!(label.phase(), "Qualification");
        assert_eq!(label.number(), 12);
        assert_eq!(label.as_str(), "Qualification 12");
    }

    #[test]
    fn test_parse_label_rejects_malformed() {
        let err = MatchLabel::parse("Qualification").unwrap_err();
        assert!(matches!(
            err,
            Error::MalformedLabel {
                reason: LabelReason::MissingSeparator,
                ..
            }
        ));

        let err = MatchLabel::parse("Playoff 1-2").unwrap_err();
        assert!(matches!(
            err,
            Error::MalformedLabel {
                reason: LabelReason::InvalidNumber(_),
                ..
            }
        ));

        let err = MatchLabel::parse(" 4").unwrap_err();
        assert!(matches!(
            err,
            Error::MalformedLabel {
                reason: LabelReason::EmptyPhase,
                ..
            }
        ));
    }

    #[test]
    fn test_cmp_schedule_is_numeric() {
        let q2 = MatchLabel::parse("Qualification 2").unwrap();
        let q10 = MatchLabel::parse("Qualification 10").unwrap();
        let p1 = MatchLabel::parse("Playoff 1").unwrap();
        assert_eq!(q2.cmp_schedule(&q10), Ordering::Less);
        assert_eq!(p1.cmp_schedule(&q2), Ordering::Less);
    }

    #[test]
    fn test_status_from_upstream() {
        assert_eq!(
            MatchStatus::from_upstream(Some("On field")),
            MatchStatus::OnField
        );
        assert_eq!(
            MatchStatus::from_upstream(Some("  on deck ")),
            MatchStatus::OnDeck
        );
        assert_eq!(
            MatchStatus::from_upstream(Some("Queuing soon")),
            MatchStatus::Queuing
        );
        assert_eq!(
            MatchStatus::from_upstream(Some("Now queuing")),
            MatchStatus::Queuing
        );
        assert_eq!(MatchStatus::from_upstream(None), MatchStatus::Scheduled);
        assert_eq!(MatchStatus::from_upstream(Some("")), MatchStatus::Scheduled);
        assert_eq!(
            MatchStatus::from_upstream(Some("Field reset")),
            MatchStatus::Unknown
        );
    }

    #[test]
    fn test_status_display_is_upstream_spelling() {
        assert_eq!(MatchStatus::OnField.to_string(), "On field");
        assert_eq!(MatchStatus::Queuing.to_string(), "Now queuing");
        assert_eq!(MatchStatus::Completed.to_string(), "Completed");
    }

    #[test]
    fn test_alliance_of() {
        let record = MatchRecord {
            label: MatchLabel::parse("Qualification 1").unwrap(),
            status: MatchStatus::Scheduled,
            status_text: "Scheduled".to_string(),
            red_teams: vec!["1114".into(), "2056".into(), "4039".into()],
            blue_teams: vec!["254".into(), "1678".into(), "118".into()],
            scheduled_start_time: None,
            estimated_start_time: None,
            break_after: None,
        };
        let team = |raw| TeamNumber::from_raw(raw).unwrap();
        assert_eq!(record.alliance_of(&team("frc254")), Some(Alliance::Blue));
        assert_eq!(record.alliance_of(&team("2056")), Some(Alliance::Red));
        assert_eq!(record.alliance_of(&team("99")), None);
        assert!(!record.involves(&team("25")));
    }

    #[test]
    fn test_status_text_keeps_upstream_wording() {
        assert_eq!(status_text(Some(" Queuing soon ")), "Queuing soon");
        assert_eq!(status_text(Some("Field reset")), "Field reset");
        assert_eq!(status_text(None), "Scheduled");
        assert_eq!(status_text(Some("  ")), "Scheduled");
    }
}
