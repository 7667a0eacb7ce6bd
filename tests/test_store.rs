//! File-backend behavior: pin semantics, histogram bumps, guess buckets.
//!
//! Each test gets its own temp directory, so tests are independent and can
//! run in parallel.

use std::sync::Arc;

use tempfile::TempDir;

use framemoji::file_store::FileStore;
use framemoji::stats::percentile_for_reveal;
use framemoji::store::DailyStore;
use framemoji::types::DailyHistogram;

fn store() -> (TempDir, FileStore) {
    let dir = TempDir::new().unwrap();
    let store = FileStore::new(dir.path().join("var"));
    (dir, store)
}

// ── Pin ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn pin_absent_until_set() {
    let (_dir, store) = store();
    assert_eq!(store.get_pin("2024-01-01").await, None);
}

#[tokio::test]
async fn pin_first_writer_wins() {
    let (_dir, store) = store();
    assert_eq!(store.set_pin_if_absent("2024-01-01", 10).await, 10);
    // A later writer with a different id does not overwrite.
    assert_eq!(store.set_pin_if_absent("2024-01-01", 20).await, 10);
    assert_eq!(store.get_pin("2024-01-01").await, Some(10));
}

#[tokio::test]
async fn pin_stable_once_set() {
    let (_dir, store) = store();
    store.set_pin_if_absent("2024-01-01", 42).await;
    for _ in 0..5 {
        assert_eq!(store.get_pin("2024-01-01").await, Some(42));
    }
    // Other days are unaffected.
    assert_eq!(store.get_pin("2024-01-02").await, None);
}

#[tokio::test]
async fn pin_concurrent_writers_idempotent() {
    let (_dir, store) = store();
    let store = Arc::new(store);
    let mut handles = Vec::new();
    for _ in 0..16 {
        let s = Arc::clone(&store);
        handles.push(tokio::spawn(async move {
            s.set_pin_if_absent("2024-05-05", 7).await
        }));
    }
    for h in handles {
        assert_eq!(h.await.unwrap(), 7);
    }
    assert_eq!(store.get_pin("2024-05-05").await, Some(7));
}

#[tokio::test]
async fn force_set_overrides_existing_pin() {
    let (_dir, store) = store();
    store.set_pin_if_absent("2024-01-01", 10).await;
    let pinned = store.force_set_pin("2024-01-01", 99).await.unwrap();
    assert_eq!(pinned, 99);
    assert_eq!(store.get_pin("2024-01-01").await, Some(99));
}

#[tokio::test]
async fn corrupt_pin_file_reads_as_absent() {
    let (dir, store) = store();
    let daily = dir.path().join("var").join("daily");
    std::fs::create_dir_all(&daily).unwrap();
    std::fs::write(daily.join("2024-01-01.json"), "not json").unwrap();
    assert_eq!(store.get_pin("2024-01-01").await, None);
}

// ── Histogram ───────────────────────────────────────────────────────

#[tokio::test]
async fn histogram_zero_when_empty() {
    let (_dir, store) = store();
    assert_eq!(
        store.load_histogram("2024-06-01").await,
        DailyHistogram::zero()
    );
}

#[tokio::test]
async fn histogram_bump_scenario() {
    let (_dir, store) = store();
    let day = "2024-06-01";
    store.bump_histogram(day, 3, true).await;
    store.bump_histogram(day, 3, true).await;
    let hist = store.bump_histogram(day, 1, false).await;

    assert_eq!(hist.solves, [0, 0, 2, 0, 0, 0, 0, 0, 0, 0]);
    assert_eq!(hist.fail, 1);
    assert_eq!(hist.total(), 3);

    // Ranking a reveal-3 solve against this snapshot: one strictly-worse
    // outcome (the failure) out of three.
    let p = percentile_for_reveal(&hist, 3, true);
    assert_eq!(p.percentile, 33);
    assert_eq!(p.total, 3);
}

#[tokio::test]
async fn histogram_reveal_clamped() {
    let (_dir, store) = store();
    let hist = store.bump_histogram("2024-06-02", 0, true).await;
    assert_eq!(hist.solves[0], 1);
    let hist = store.bump_histogram("2024-06-02", 42, true).await;
    assert_eq!(hist.solves[9], 1);
}

#[tokio::test]
async fn histogram_sum_equals_bump_count() {
    let (_dir, store) = store();
    let day = "2024-07-01";
    let mut last = DailyHistogram::zero();
    for i in 0..30i64 {
        last = store.bump_histogram(day, (i % 10) + 1, i % 4 != 0).await;
    }
    assert_eq!(last.total(), 30);
    assert_eq!(store.load_histogram(day).await.total(), 30);
}

#[tokio::test]
async fn histogram_concurrent_bumps_not_lost() {
    let (_dir, store) = store();
    let store = Arc::new(store);
    let mut handles = Vec::new();
    for _ in 0..20 {
        let s = Arc::clone(&store);
        handles.push(tokio::spawn(async move {
            s.bump_histogram("2024-07-02", 5, true).await;
        }));
    }
    for h in handles {
        h.await.unwrap();
    }
    let hist = store.load_histogram("2024-07-02").await;
    assert_eq!(hist.solves[4], 20);
}

#[tokio::test]
async fn corrupt_stats_file_reads_as_zero() {
    let (dir, store) = store();
    let stats = dir.path().join("var").join("stats");
    std::fs::create_dir_all(&stats).unwrap();
    std::fs::write(stats.join("2024-06-01.json"), "{broken").unwrap();
    assert_eq!(
        store.load_histogram("2024-06-01").await,
        DailyHistogram::zero()
    );
}

#[tokio::test]
async fn stats_file_without_guess_buckets_still_parses() {
    // Older bundles predate the guesses field; serde backfills it.
    let (dir, store) = store();
    let stats = dir.path().join("var").join("stats");
    std::fs::create_dir_all(&stats).unwrap();
    std::fs::write(
        stats.join("2024-06-03.json"),
        r#"{"solves":[1,0,0,0,0,0,0,0,0,0],"fail":2}"#,
    )
    .unwrap();
    let hist = store.load_histogram("2024-06-03").await;
    assert_eq!(hist.solves[0], 1);
    assert_eq!(hist.fail, 2);
    assert!(store.top_guesses("2024-06-03", 1, 10).await.is_empty());
}

// ── Guess buckets ───────────────────────────────────────────────────

#[tokio::test]
async fn guesses_scoped_to_reveal_bucket() {
    let (_dir, store) = store();
    let day = "2024-08-01";
    store.record_guess(day, 2, "matrix").await;
    store.record_guess(day, 2, "matrix").await;
    store.record_guess(day, 2, "blade runner").await;
    store.record_guess(day, 3, "alien").await;

    let top = store.top_guesses(day, 2, 10).await;
    assert_eq!(top.len(), 2);
    assert_eq!(top[0].key, "matrix");
    assert_eq!(top[0].count, 2);
    assert_eq!(top[1].key, "blade runner");

    let top3 = store.top_guesses(day, 3, 10).await;
    assert_eq!(top3.len(), 1);
    assert_eq!(top3[0].key, "alien");
}

#[tokio::test]
async fn guesses_limit_respected() {
    let (_dir, store) = store();
    let day = "2024-08-02";
    for g in ["a", "b", "c", "d", "e"] {
        store.record_guess(day, 1, g).await;
    }
    assert_eq!(store.top_guesses(day, 1, 3).await.len(), 3);
    assert_eq!(store.top_guesses(day, 1, 0).await.len(), 0);
}
