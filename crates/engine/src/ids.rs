//! Client-side identifiers.
//!
//! Ids are opaque: a millisecond timestamp followed by a short random base-36
//! suffix, so two ids minted in the same millisecond still differ.

use chrono::Utc;
use rand::Rng;

const SUFFIX_LEN: usize = 6;
const ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

pub fn new_id() -> String {
    new_id_with(&mut rand::rng(), Utc::now().timestamp_millis())
}

pub(crate) fn new_id_with<R: Rng + ?Sized>(rng: &mut R, millis: i64) -> String {
    let suffix: String = (0..SUFFIX_LEN)
        .map(|_| char::from(ALPHABET[rng.random_range(0..ALPHABET.len())]))
        .collect();
    format!("{millis}{suffix}")
}
