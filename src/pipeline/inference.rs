use tracing::debug;

use crate::model::{MatchRecord, MatchStatus};

/// Correct stale "on field" markers over a schedule-ordered match list.
///
/// Only the last `OnField` match in schedule order stays on the field; every
/// earlier `OnField` match is marked `Completed`. All other statuses pass
/// through unchanged, upstream wording included. Returns a new list.
pub fn infer_statuses(sorted: &[MatchRecord]) -> Vec<MatchRecord> {
    let last_on_field = sorted
        .iter()
        .rposition(|m| m.status == MatchStatus::OnField);

    let mut corrected = 0usize;
    let inferred: Vec<MatchRecord> = sorted
        .iter()
        .enumerate()
        .map(|(i, m)| {
            let mut m = m.clone();
            if m.status == MatchStatus::OnField && last_on_field.is_some_and(|last| i < last) {
                m.set_status(MatchStatus::Completed);
                corrected += 1;
            }
            m
        })
        .collect();

    if corrected > 0 {
        debug!(corrected, "marked stale on-field matches completed");
    }
    inferred
}
