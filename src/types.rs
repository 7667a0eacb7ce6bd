use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::constants::REVEAL_LEVELS;

/// One catalog entry: a movie with its ten ordered emoji clues.
///
/// `imdb_rank` and `imdb_id` are provenance fields carried by the catalog
/// build; the game itself only needs id, title, year and clues.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Puzzle {
    pub id: u32,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<u16>,
    pub emoji_clues: [String; REVEAL_LEVELS],
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub imdb_rank: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub imdb_id: Option<String>,
}

/// Per-day aggregate outcome counts.
///
/// `solves[i]` counts players who solved after revealing `i + 1` clues;
/// `fail` counts players who gave up. Cells only ever increment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyHistogram {
    pub solves: [u64; REVEAL_LEVELS],
    pub fail: u64,
}

impl DailyHistogram {
    pub fn zero() -> Self {
        Self {
            solves: [0; REVEAL_LEVELS],
            fail: 0,
        }
    }

    /// Total recorded outcomes (solves at every level plus failures).
    pub fn total(&self) -> u64 {
        self.solves.iter().sum::<u64>() + self.fail
    }
}

impl Default for DailyHistogram {
    fn default() -> Self {
        Self::zero()
    }
}

/// One entry in a top-guesses listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuessCount {
    pub key: String,
    pub count: u64,
}

/// Result of a percentile computation against a histogram snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Percentile {
    pub percentile: u32,
    pub total: u64,
}

/// On-disk bundle for the file backend: histogram plus per-reveal guess
/// frequency buckets. Older files may lack `guesses`; serde backfills.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DailyStatsBundle {
    #[serde(default)]
    pub solves: [u64; REVEAL_LEVELS],
    #[serde(default)]
    pub fail: u64,
    #[serde(default)]
    pub guesses: [HashMap<String, u64>; REVEAL_LEVELS],
}

impl DailyStatsBundle {
    pub fn histogram(&self) -> DailyHistogram {
        DailyHistogram {
            solves: self.solves,
            fail: self.fail,
        }
    }
}
