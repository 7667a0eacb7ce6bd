//! Deterministic daily puzzle selection.
//!
//! A secret-keyed pseudorandom permutation picks one catalog entry per UTC
//! day: catalog positions are sorted by `HMAC-SHA256(secret, id)` and the
//! day number indexes the permutation modulo the catalog size. The
//! permutation depends only on the ids, so appending new puzzles never
//! reshuffles the order of existing ones; the pin layer (not this module)
//! is what keeps an already-observed day stable when the catalog count
//! changes.

use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::date_key::day_number;

type HmacSha256 = Hmac<Sha256>;

/// Raw HMAC-SHA256 of `msg` keyed by `secret`. Byte order of the MAC is
/// the same as lexicographic order of its hex digest, so the permutation
/// sorts on the raw bytes directly.
fn keyed_digest(secret: &str, msg: &str) -> [u8; 32] {
    // HMAC accepts keys of any length
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).expect("hmac key");
    mac.update(msg.as_bytes());
    mac.finalize().into_bytes().into()
}

/// Index into `ids` chosen for `date_key`. Deterministic forever for fixed
/// inputs, across processes and machines.
///
/// Ties on the digest (practically impossible) break by id, then original
/// position. An empty slice yields 0; callers must never select from an
/// empty catalog in production. A malformed date key counts as day 0.
pub fn select_daily_index(secret: &str, date_key: &str, ids: &[u32]) -> usize {
    let n = ids.len();
    if n == 0 {
        return 0;
    }
    let day = day_number(date_key).unwrap_or(0);

    let mut order: Vec<([u8; 32], u32, usize)> = ids
        .iter()
        .enumerate()
        .map(|(pos, &id)| (keyed_digest(secret, &id.to_string()), id, pos))
        .collect();
    order.sort();

    let pick = day.rem_euclid(n as i64) as usize;
    order[pick].2
}
