//! Pure statistics: percentile ranking, scoring, top-K bucket sorting.
//!
//! Everything here operates on in-memory snapshots; persistence and
//! atomicity live behind the [`crate::store::DailyStore`] trait.

use std::collections::HashMap;

use crate::constants::REVEAL_LEVELS;
use crate::types::{DailyHistogram, GuessCount, Percentile};

/// Clamp a player-supplied reveal count to a histogram index in `[0, 9]`.
pub fn clamp_reveal(revealed: i64) -> usize {
    revealed.clamp(1, REVEAL_LEVELS as i64) as usize - 1
}

/// "Top %" rank of an outcome against a histogram snapshot.
///
/// percentile = floor(100 * strictly_worse / total). Strictly worse than a
/// correct solve at reveal r: every solver who needed more than r reveals,
/// plus every failure. A failure outranks nobody, so failures are always
/// the 0th percentile even when other failures exist; that is a product
/// decision, preserved as-is.
///
/// Call this on the post-bump snapshot: `total` must include the outcome
/// being ranked.
pub fn percentile_for_reveal(hist: &DailyHistogram, revealed: i64, correct: bool) -> Percentile {
    let idx = clamp_reveal(revealed);
    let total = hist.total();
    let worse_strict = if correct {
        hist.solves[idx + 1..].iter().sum::<u64>() + hist.fail
    } else {
        0
    };
    let percentile = if total > 0 {
        (worse_strict * 100 / total) as u32
    } else {
        0
    };
    Percentile { percentile, total }
}

/// Daily score: 10 points for a first-clue solve down to 1 for the tenth,
/// 0 on failure.
pub fn daily_score(revealed: i64, correct: bool) -> u32 {
    if correct {
        (REVEAL_LEVELS - clamp_reveal(revealed)) as u32
    } else {
        0
    }
}

/// Sort one reveal bucket into a top-K listing: count descending, ties
/// lexical ascending, truncated to `limit`.
pub fn top_guesses_from_bucket(bucket: &HashMap<String, u64>, limit: usize) -> Vec<GuessCount> {
    let mut entries: Vec<GuessCount> = bucket
        .iter()
        .map(|(key, &count)| GuessCount {
            key: key.clone(),
            count,
        })
        .collect();
    entries.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.key.cmp(&b.key)));
    entries.truncate(limit);
    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_reveal() {
        assert_eq!(clamp_reveal(-5), 0);
        assert_eq!(clamp_reveal(0), 0);
        assert_eq!(clamp_reveal(1), 0);
        assert_eq!(clamp_reveal(10), 9);
        assert_eq!(clamp_reveal(99), 9);
    }

    #[test]
    fn test_percentile_scenario() {
        // Two solves at reveal 3, one failure.
        let hist = DailyHistogram {
            solves: [0, 0, 2, 0, 0, 0, 0, 0, 0, 0],
            fail: 1,
        };
        let p = percentile_for_reveal(&hist, 3, true);
        // strictly worse = solves beyond reveal 3 (0) + fails (1); floor(100/3)
        assert_eq!(p.percentile, 33);
        assert_eq!(p.total, 3);
    }

    #[test]
    fn test_failure_is_zeroth_percentile() {
        let hist = DailyHistogram {
            solves: [5, 0, 0, 0, 0, 0, 0, 0, 0, 0],
            fail: 3,
        };
        assert_eq!(percentile_for_reveal(&hist, 10, false).percentile, 0);
    }

    #[test]
    fn test_best_solver_gets_max_percentile() {
        let hist = DailyHistogram {
            solves: [1, 2, 3, 0, 0, 0, 0, 0, 0, 0],
            fail: 4,
        };
        // reveal-1 solver outranks 2 + 3 + 4 = 9 of 10
        assert_eq!(percentile_for_reveal(&hist, 1, true).percentile, 90);
    }

    #[test]
    fn test_empty_histogram() {
        let p = percentile_for_reveal(&DailyHistogram::zero(), 5, true);
        assert_eq!(p.percentile, 0);
        assert_eq!(p.total, 0);
    }

    #[test]
    fn test_daily_score() {
        assert_eq!(daily_score(1, true), 10);
        assert_eq!(daily_score(10, true), 1);
        assert_eq!(daily_score(3, true), 8);
        assert_eq!(daily_score(3, false), 0);
        assert_eq!(daily_score(0, true), 10);
    }

    #[test]
    fn test_top_guesses_sorted_and_truncated() {
        let mut bucket = HashMap::new();
        bucket.insert("matrix".to_string(), 3);
        bucket.insert("blade runner".to_string(), 5);
        bucket.insert("alien".to_string(), 3);
        bucket.insert("dune".to_string(), 1);
        let top = top_guesses_from_bucket(&bucket, 3);
        assert_eq!(top.len(), 3);
        assert_eq!(top[0].key, "blade runner");
        // Equal counts tie-break lexically
        assert_eq!(top[1].key, "alien");
        assert_eq!(top[2].key, "matrix");
    }
}
