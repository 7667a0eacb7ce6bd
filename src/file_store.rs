//! Local file backend: one JSON record per day for the pin
//! (`var/daily/{day}.json`) and one for the histogram + guess buckets
//! bundle (`var/stats/{day}.json`).
//!
//! Whole-file read-modify-write, serialized behind a single async mutex.
//! Safe only under a single-process deployment; multi-replica production
//! must use the remote KV backend. The pin path tolerates the narrow
//! read-check-then-write race: concurrent pinners compute the same id, so
//! a double write is idempotent.

use std::collections::HashMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use async_trait::async_trait;

use crate::error::GameError;
use crate::stats::{clamp_reveal, top_guesses_from_bucket};
use crate::store::DailyStore;
use crate::types::{DailyHistogram, DailyStatsBundle, GuessCount};

#[derive(Serialize, Deserialize)]
struct PinRecord {
    id: u32,
}

pub struct FileStore {
    daily_dir: PathBuf,
    stats_dir: PathBuf,
    /// Serializes stats read-modify-write cycles and pin writes.
    write_lock: Mutex<()>,
}

impl FileStore {
    pub fn new(var_dir: impl Into<PathBuf>) -> Self {
        let var_dir = var_dir.into();
        Self {
            daily_dir: var_dir.join("daily"),
            stats_dir: var_dir.join("stats"),
            write_lock: Mutex::new(()),
        }
    }

    fn pin_path(&self, day: &str) -> PathBuf {
        self.daily_dir.join(format!("{day}.json"))
    }

    fn stats_path(&self, day: &str) -> PathBuf {
        self.stats_dir.join(format!("{day}.json"))
    }

    async fn read_pin(&self, day: &str) -> Option<u32> {
        let raw = tokio::fs::read_to_string(self.pin_path(day)).await.ok()?;
        let record: PinRecord = serde_json::from_str(&raw).ok()?;
        Some(record.id)
    }

    async fn write_pin(&self, day: &str, id: u32) -> std::io::Result<()> {
        tokio::fs::create_dir_all(&self.daily_dir).await?;
        let raw = serde_json::to_string(&PinRecord { id }).unwrap_or_default();
        tokio::fs::write(self.pin_path(day), raw).await
    }

    /// Read the day's bundle, falling back to an empty one on any error
    /// (missing file, unreadable JSON, wrong shape).
    async fn read_bundle(&self, day: &str) -> DailyStatsBundle {
        match tokio::fs::read_to_string(self.stats_path(day)).await {
            Ok(raw) => serde_json::from_str(&raw).unwrap_or_default(),
            Err(_) => DailyStatsBundle::default(),
        }
    }

    async fn write_bundle(&self, day: &str, bundle: &DailyStatsBundle) {
        if let Err(e) = tokio::fs::create_dir_all(&self.stats_dir).await {
            eprintln!("stats dir create failed: {e}");
            return;
        }
        let raw = serde_json::to_string(bundle).unwrap_or_default();
        if let Err(e) = tokio::fs::write(self.stats_path(day), raw).await {
            eprintln!("stats write failed for {day}: {e}");
        }
    }
}

#[async_trait]
impl DailyStore for FileStore {
    async fn get_pin(&self, day: &str) -> Option<u32> {
        self.read_pin(day).await
    }

    async fn set_pin_if_absent(&self, day: &str, id: u32) -> u32 {
        let _guard = self.write_lock.lock().await;
        if let Some(existing) = self.read_pin(day).await {
            return existing;
        }
        if let Err(e) = self.write_pin(day, id).await {
            eprintln!("pin write failed for {day}: {e}");
        }
        id
    }

    async fn force_set_pin(&self, day: &str, id: u32) -> Result<u32, GameError> {
        let _guard = self.write_lock.lock().await;
        self.write_pin(day, id)
            .await
            .map_err(|e| GameError::BackendUnavailable(e.to_string()))?;
        Ok(id)
    }

    async fn load_histogram(&self, day: &str) -> DailyHistogram {
        self.read_bundle(day).await.histogram()
    }

    async fn bump_histogram(&self, day: &str, revealed: i64, correct: bool) -> DailyHistogram {
        let _guard = self.write_lock.lock().await;
        let mut bundle = self.read_bundle(day).await;
        if correct {
            bundle.solves[clamp_reveal(revealed)] += 1;
        } else {
            bundle.fail += 1;
        }
        self.write_bundle(day, &bundle).await;
        bundle.histogram()
    }

    async fn record_guess(&self, day: &str, revealed: i64, normalized_guess: &str) {
        let _guard = self.write_lock.lock().await;
        let mut bundle = self.read_bundle(day).await;
        let bucket: &mut HashMap<String, u64> = &mut bundle.guesses[clamp_reveal(revealed)];
        *bucket.entry(normalized_guess.to_string()).or_insert(0) += 1;
        self.write_bundle(day, &bundle).await;
    }

    async fn top_guesses(&self, day: &str, revealed: i64, limit: usize) -> Vec<GuessCount> {
        let bundle = self.read_bundle(day).await;
        top_guesses_from_bucket(&bundle.guesses[clamp_reveal(revealed)], limit)
    }
}
