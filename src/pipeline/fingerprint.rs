use itertools::Itertools;
use md5::{Digest, Md5};
use serde::Serialize;

use super::Schedule;
use crate::error::Result;
use crate::model::Fingerprint;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FingerprintInput<'a> {
    now_queuing: Option<&'a str>,
    match_statuses: Vec<StatusDescriptor>,
}

#[derive(Serialize)]
struct StatusDescriptor {
    id: String,
    status: String,
}

/// Digest the client-visible state of a schedule: the now-queuing label and
/// each match's status text (upstream wording, or `Completed` where inferred),
/// keyed by label and sorted by key. Times, rosters and record order do not
/// contribute.
pub fn fingerprint(schedule: &Schedule) -> Result<Fingerprint> {
    let match_statuses = schedule
        .matches()
        .iter()
        .map(|m| StatusDescriptor {
            id: m.label.as_str().split_whitespace().join("-"),
            status: m.status_text.trim().to_string(),
        })
        .sorted_by(|a, b| a.id.cmp(&b.id).then_with(|| a.status.cmp(&b.status)))
        .collect_vec();

    let input = FingerprintInput {
        now_queuing: schedule.now_queuing(),
        match_statuses,
    };
    let bytes = serde_json::to_vec(&input)?;
    Ok(Fingerprint::from_digest(&Md5::digest(&bytes)))
}
