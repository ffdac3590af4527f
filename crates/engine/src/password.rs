//! Random password generator and a rough strength score.

use std::fmt;
use std::ops::RangeInclusive;

use rand::Rng;

use crate::{EngineError, ResultEngine};

pub const LENGTH_RANGE: RangeInclusive<usize> = 4..=128;
pub const DEFAULT_LENGTH: usize = 16;

const UPPER: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const UPPER_CLEAR: &str = "ABCDEFGHJKMNPQRSTUVWXYZ";
const LOWER: &str = "abcdefghijklmnopqrstuvwxyz";
const LOWER_CLEAR: &str = "abcdefghjkmnpqrstuvwxyz";
const DIGITS: &str = "0123456789";
const DIGITS_CLEAR: &str = "23456789";
pub const SYMBOLS: &str = "!@#$%^&*()_+-=[]{}|;:,.<>?";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PasswordOptions {
    pub length: usize,
    pub uppercase: bool,
    pub lowercase: bool,
    pub digits: bool,
    pub symbols: bool,
    /// Leave out look-alike characters such as `I`, `l`, `O` and `0`.
    pub avoid_similar: bool,
}

impl Default for PasswordOptions {
    fn default() -> Self {
        Self {
            length: DEFAULT_LENGTH,
            uppercase: true,
            lowercase: true,
            digits: true,
            symbols: true,
            avoid_similar: true,
        }
    }
}

impl PasswordOptions {
    fn alphabet(&self) -> Vec<char> {
        let pick = |clear: &'static str, full: &'static str| {
            if self.avoid_similar { clear } else { full }
        };
        [
            (self.uppercase, pick(UPPER_CLEAR, UPPER)),
            (self.lowercase, pick(LOWER_CLEAR, LOWER)),
            (self.digits, pick(DIGITS_CLEAR, DIGITS)),
            (self.symbols, SYMBOLS),
        ]
        .into_iter()
        .filter(|(enabled, _)| *enabled)
        .flat_map(|(_, set)| set.chars())
        .collect()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Strength {
    Weak,
    Medium,
    Strong,
    VeryStrong,
}

impl Strength {
    /// Share of a full meter, for gauges.
    pub fn percent(self) -> u16 {
        match self {
            Self::Weak => 25,
            Self::Medium => 50,
            Self::Strong => 75,
            Self::VeryStrong => 100,
        }
    }
}

impl fmt::Display for Strength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Weak => "weak",
            Self::Medium => "medium",
            Self::Strong => "strong",
            Self::VeryStrong => "very strong",
        };
        f.write_str(label)
    }
}

pub fn generate(options: &PasswordOptions) -> ResultEngine<String> {
    generate_with(&mut rand::rng(), options)
}

pub fn generate_with<R: Rng + ?Sized>(rng: &mut R, options: &PasswordOptions) -> ResultEngine<String> {
    if !LENGTH_RANGE.contains(&options.length) {
        return Err(EngineError::Validation(format!(
            "password length must be between {} and {}",
            LENGTH_RANGE.start(),
            LENGTH_RANGE.end()
        )));
    }
    let alphabet = options.alphabet();
    if alphabet.is_empty() {
        return Err(EngineError::Validation(
            "select at least one character class".to_string(),
        ));
    }
    Ok((0..options.length)
        .map(|_| alphabet[rng.random_range(0..alphabet.len())])
        .collect())
}

pub fn strength(password: &str) -> Strength {
    let len = password.chars().count();
    let checks = [
        len >= 8,
        len >= 12,
        len >= 16,
        password.chars().any(|c| c.is_ascii_lowercase()),
        password.chars().any(|c| c.is_ascii_uppercase()),
        password.chars().any(|c| c.is_ascii_digit()),
        password.chars().any(|c| SYMBOLS.contains(c)),
    ];
    match checks.iter().filter(|passed| **passed).count() {
        0..=2 => Strength::Weak,
        3..=4 => Strength::Medium,
        5..=6 => Strength::Strong,
        _ => Strength::VeryStrong,
    }
}
