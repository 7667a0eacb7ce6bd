//! Remote KV backend over the Upstash/Vercel KV REST protocol.
//!
//! Every command is a GET against `{url}/{cmd}/{args...}` with a bearer
//! token, answering `{"result": ...}`. The application never does
//! read-modify-write against this backend: increments go through the
//! server-side atomic `HINCRBY`/`ZINCRBY`, and the pin uses `SETNX`, so
//! concurrent requests cannot lose updates.
//!
//! Key schema (fixed; no runtime type probing):
//! - `framemoji:{day}:puzzle`      — plain string, pinned puzzle id
//! - `framemoji:{day}:solves`      — hash, fields `r1`..`r10` and `fail`
//! - `framemoji:{day}:guesses:r{r}` — sorted set, member = normalized guess

use async_trait::async_trait;
use serde_json::Value;

use crate::constants::REVEAL_LEVELS;
use crate::error::GameError;
use crate::stats::clamp_reveal;
use crate::store::DailyStore;
use crate::types::{DailyHistogram, GuessCount};

pub struct KvStore {
    client: reqwest::Client,
    url: String,
    token: String,
}

/// Percent-encode a single path segment (everything except unreserved
/// characters), since keys contain `:` and guess members contain spaces.
fn encode_component(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for b in s.bytes() {
        match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(b as char)
            }
            _ => out.push_str(&format!("%{b:02X}")),
        }
    }
    out
}

/// Upstash returns counters as either JSON numbers or decimal strings.
fn value_as_u64(v: &Value) -> u64 {
    match v {
        Value::Number(n) => n.as_u64().unwrap_or(0),
        Value::String(s) => s.parse().unwrap_or(0),
        _ => 0,
    }
}

fn pin_key(day: &str) -> String {
    format!("framemoji:{day}:puzzle")
}

fn solves_key(day: &str) -> String {
    format!("framemoji:{day}:solves")
}

fn guesses_key(day: &str, reveal: usize) -> String {
    format!("framemoji:{day}:guesses:r{reveal}")
}

impl KvStore {
    pub fn new(url: String, token: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.trim_end_matches('/').to_string(),
            token,
        }
    }

    /// Run one REST command; returns the `result` field.
    async fn command(&self, path: &str) -> Result<Value, reqwest::Error> {
        let body: Value = self
            .client
            .get(format!("{}{}", self.url, path))
            .bearer_auth(&self.token)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(body.get("result").cloned().unwrap_or(Value::Null))
    }
}

#[async_trait]
impl DailyStore for KvStore {
    async fn get_pin(&self, day: &str) -> Option<u32> {
        let path = format!("/get/{}", encode_component(&pin_key(day)));
        match self.command(&path).await {
            Ok(Value::Null) => None,
            Ok(v) => u32::try_from(value_as_u64(&v)).ok(),
            Err(e) => {
                eprintln!("KV get_pin failed for {day}: {e}");
                None
            }
        }
    }

    async fn set_pin_if_absent(&self, day: &str, id: u32) -> u32 {
        let path = format!(
            "/setnx/{}/{}",
            encode_component(&pin_key(day)),
            encode_component(&id.to_string())
        );
        if let Err(e) = self.command(&path).await {
            eprintln!("KV setnx failed for {day}: {e}");
        }
        // Return whatever ended up pinned, ours or a concurrent writer's.
        self.get_pin(day).await.unwrap_or(id)
    }

    async fn force_set_pin(&self, _day: &str, _id: u32) -> Result<u32, GameError> {
        // Local-development escape hatch only; never overwrite a shared pin.
        Err(GameError::Forbidden)
    }

    async fn load_histogram(&self, day: &str) -> DailyHistogram {
        let path = format!("/hgetall/{}", encode_component(&solves_key(day)));
        let result = match self.command(&path).await {
            Ok(v) => v,
            Err(e) => {
                eprintln!("KV hgetall failed for {day}: {e}");
                return DailyHistogram::zero();
            }
        };
        // Flat [field, value, field, value, ...] array.
        let mut hist = DailyHistogram::zero();
        if let Value::Array(pairs) = result {
            for chunk in pairs.chunks_exact(2) {
                let field = chunk[0].as_str().unwrap_or_default();
                let count = value_as_u64(&chunk[1]);
                if field == "fail" {
                    hist.fail = count;
                } else if let Some(r) = field.strip_prefix('r').and_then(|s| s.parse::<usize>().ok())
                {
                    if (1..=REVEAL_LEVELS).contains(&r) {
                        hist.solves[r - 1] = count;
                    }
                }
            }
        }
        hist
    }

    async fn bump_histogram(&self, day: &str, revealed: i64, correct: bool) -> DailyHistogram {
        let field = if correct {
            format!("r{}", clamp_reveal(revealed) + 1)
        } else {
            "fail".to_string()
        };
        let path = format!(
            "/hincrby/{}/{}/1",
            encode_component(&solves_key(day)),
            encode_component(&field)
        );
        if let Err(e) = self.command(&path).await {
            eprintln!("KV hincrby failed for {day}: {e}");
        }
        self.load_histogram(day).await
    }

    async fn record_guess(&self, day: &str, revealed: i64, normalized_guess: &str) {
        let key = guesses_key(day, clamp_reveal(revealed) + 1);
        let path = format!(
            "/zincrby/{}/1/{}",
            encode_component(&key),
            encode_component(normalized_guess)
        );
        if let Err(e) = self.command(&path).await {
            eprintln!("KV zincrby failed for {day}: {e}");
        }
    }

    async fn top_guesses(&self, day: &str, revealed: i64, limit: usize) -> Vec<GuessCount> {
        if limit == 0 {
            return Vec::new();
        }
        let key = guesses_key(day, clamp_reveal(revealed) + 1);
        let end = limit - 1;
        let path = format!(
            "/zrevrange/{}/0/{}?withscores=true",
            encode_component(&key),
            end
        );
        let result = match self.command(&path).await {
            Ok(v) => v,
            Err(e) => {
                eprintln!("KV zrevrange failed for {day}: {e}");
                return Vec::new();
            }
        };
        let mut out = Vec::new();
        if let Value::Array(pairs) = result {
            for chunk in pairs.chunks_exact(2) {
                out.push(GuessCount {
                    key: chunk[0].as_str().unwrap_or_default().to_string(),
                    count: value_as_u64(&chunk[1]),
                });
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_component() {
        assert_eq!(encode_component("framemoji:2024-01-01:puzzle"), "framemoji%3A2024-01-01%3Apuzzle");
        assert_eq!(encode_component("blade runner"), "blade%20runner");
        assert_eq!(encode_component("abc-_.~123"), "abc-_.~123");
    }

    #[test]
    fn test_value_as_u64() {
        assert_eq!(value_as_u64(&serde_json::json!(7)), 7);
        assert_eq!(value_as_u64(&serde_json::json!("12")), 12);
        assert_eq!(value_as_u64(&Value::Null), 0);
    }
}
