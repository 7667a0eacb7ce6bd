//! Pluggable per-day storage: the daily pin plus aggregate statistics.
//!
//! One trait, two implementations — the Upstash-style remote KV store
//! ([`crate::kv_store::KvStore`]) and the local file store
//! ([`crate::file_store::FileStore`]) — selected once at startup and never
//! branched on per-call in business logic.
//!
//! Failure semantics: reads degrade to "absent"/zero, writes are
//! best-effort. A stats-backend outage must never break the guess/reveal
//! loop, so only the administrative `force_set_pin` surfaces errors.

use std::sync::Arc;

use async_trait::async_trait;

use crate::env_config::ServerConfig;
use crate::error::GameError;
use crate::file_store::FileStore;
use crate::kv_store::KvStore;
use crate::types::{DailyHistogram, GuessCount};

#[async_trait]
pub trait DailyStore: Send + Sync {
    /// Pinned puzzle id for `day`, if any. Backend trouble reads as absent;
    /// the caller recomputes via the selector, which is idempotent.
    async fn get_pin(&self, day: &str) -> Option<u32>;

    /// Pin `id` for `day` unless something is already pinned. First writer
    /// wins; returns whatever value ends up pinned. Concurrent writers all
    /// compute the same id, so even a racy double-write is benign.
    async fn set_pin_if_absent(&self, day: &str, id: u32) -> u32;

    /// Local-development override of a day's pin. The remote backend always
    /// refuses with [`GameError::Forbidden`]; it must never silently
    /// overwrite a shared pin.
    async fn force_set_pin(&self, day: &str, id: u32) -> Result<u32, GameError>;

    /// Histogram snapshot for `day`; zero histogram when nothing is
    /// recorded or the backend is unreachable.
    async fn load_histogram(&self, day: &str) -> DailyHistogram;

    /// Atomically increment exactly one cell — `solves[reveal-1]` when
    /// `correct`, else `fail` — and return the post-update snapshot.
    /// `revealed` is clamped to `[1, 10]`.
    async fn bump_histogram(&self, day: &str, revealed: i64, correct: bool) -> DailyHistogram;

    /// Count one occurrence of `normalized_guess` in the reveal bucket.
    /// Best-effort; a dropped increment is an acceptable degradation.
    async fn record_guess(&self, day: &str, revealed: i64, normalized_guess: &str);

    /// Top guesses at exactly this reveal level, count descending, at most
    /// `limit` entries.
    async fn top_guesses(&self, day: &str, revealed: i64, limit: usize) -> Vec<GuessCount>;
}

/// Pick the backend once at startup: remote KV when credentials are
/// configured and the file override is unset, otherwise local files.
pub fn select_store(config: &ServerConfig) -> Arc<dyn DailyStore> {
    if config.has_kv() {
        // has_kv() guarantees both are present
        let url = config.kv_url.clone().unwrap_or_default();
        let token = config.kv_token.clone().unwrap_or_default();
        println!("Stats backend: remote KV at {}", url);
        Arc::new(KvStore::new(url, token))
    } else {
        println!("Stats backend: local files under {}", config.var_dir.display());
        Arc::new(FileStore::new(config.var_dir.clone()))
    }
}
