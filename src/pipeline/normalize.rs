use itertools::Itertools;

use crate::model::MatchRecord;

/// Return the matches in schedule order: phase ascending, then match number
/// ascending. The sort is stable and the input is left untouched.
pub fn normalize(matches: &[MatchRecord]) -> Vec<MatchRecord> {
    matches
        .iter()
        .cloned()
        .sorted_by(|a, b| a.label.cmp_schedule(&b.label))
        .collect_vec()
}
