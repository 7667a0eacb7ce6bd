//! Game constants shared across the daily-selection and stats modules.

/// Number of emoji clues per puzzle; also the number of reveal levels (1..=10).
pub const REVEAL_LEVELS: usize = 10;

/// Default number of entries returned by the top-guesses endpoint.
pub const DEFAULT_GUESS_LIMIT: usize = 10;

/// HMAC key used when no daily secret is configured (dev mode).
pub const DEV_SECRET: &str = "dev-secret";

/// Default catalog location relative to the working directory.
pub const CATALOG_PATH: &str = "data/puzzles.json";
