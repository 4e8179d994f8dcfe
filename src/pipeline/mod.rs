//! The pure transform pipeline: normalize, infer statuses, then either build a
//! team view or fingerprint the schedule.

mod fingerprint;
mod inference;
mod normalize;
mod team_view;

pub use fingerprint::fingerprint;
pub use inference::infer_statuses;
pub use normalize::normalize;
pub use team_view::build_team_view;

use crate::model::{EventSnapshot, MatchRecord};

/// A snapshot's matches in schedule order with stale statuses corrected.
///
/// Only constructible through [`Schedule::prepare`], so every consumer sees
/// the inferred statuses.
#[derive(Debug, Clone)]
pub struct Schedule {
    event_key: String,
    now_queuing: Option<String>,
    matches: Vec<MatchRecord>,
}

impl Schedule {
    pub fn prepare(snapshot: &EventSnapshot) -> Self {
        let sorted = normalize(snapshot.matches());
        Self {
            event_key: snapshot.event_key().to_string(),
            now_queuing: snapshot.now_queuing().map(str::to_string),
            matches: infer_statuses(&sorted),
        }
    }

    pub fn event_key(&self) -> &str {
        &self.event_key
    }

    pub fn now_queuing(&self) -> Option<&str> {
        self.now_queuing.as_deref()
    }

    pub fn matches(&self) -> &[MatchRecord] {
        &self.matches
    }
}
