use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::match_record::MatchRecord;
use super::team::TeamNumber;

/// One team's matches at one event, recomputed per request.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamView {
    pub event_key: String,
    pub team: TeamNumber,
    pub now_queuing: Option<String>,
    /// Matches not yet completed, grouped by phase and ordered by number.
    pub active: BTreeMap<String, Vec<MatchRecord>>,
    /// Completed matches in schedule order.
    pub completed: Vec<MatchRecord>,
}

impl TeamView {
    pub fn is_empty(&self) -> bool {
        self.active.is_empty() && self.completed.is_empty()
    }

    pub fn match_count(&self) -> usize {
        self.active.values().map(Vec::len).sum::<usize>() + self.completed.len()
    }
}

/// A team view plus the fingerprint of the schedule it was built from. Pages
/// poll against that fingerprint, so any change after the fetch is caught.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamPage {
    pub view: TeamView,
    pub fingerprint: Fingerprint,
    pub fetched_at: DateTime<Utc>,
}

/// Hex digest identifying the client-visible state of an event.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fingerprint(String);

impl Fingerprint {
    pub(crate) fn from_digest(digest: &[u8]) -> Self {
        Self(hex::encode(digest))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First eight hex digits, for display.
    pub fn short(&self) -> &str {
        self.0.get(..8).unwrap_or(&self.0)
    }

    /// Compare against the fingerprint a client last saw. Without a previous
    /// value the current one becomes the baseline and nothing has changed.
    pub fn compare(&self, previous: Option<&str>, now: DateTime<Utc>) -> Comparison {
        let changed = match previous.map(str::trim) {
            None | Some("") => false,
            Some(previous) => previous != self.0,
        };
        Comparison {
            changed,
            fingerprint: self.clone(),
            timestamp: now.timestamp_millis(),
        }
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Result of a fingerprint check. `timestamp` is epoch milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comparison {
    pub changed: bool,
    pub fingerprint: Fingerprint,
    pub timestamp: i64,
}
