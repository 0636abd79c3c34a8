//! Mirror-code generation.
//!
//! A mirror code is three decimal digits followed by the same digits
//! reversed (`345` → `345543`). There are exactly [`CODE_SPACE`] of them, so
//! uniqueness against previously issued codes is handled by bounded
//! rejection sampling: draw, test against the existing set, retry up to
//! `max_attempts` times, then give up with [`Generation::Exhausted`].
//!
//! The generator owns no storage. Callers persist an accepted code
//! themselves and must serialize check-then-insert if several writers share
//! the same set.

use std::collections::{BTreeSet, HashSet};
use std::hash::BuildHasher;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Length of every mirror code.
pub const CODE_LEN: usize = 6;

/// Number of distinct mirror codes (three free digits).
pub const CODE_SPACE: usize = 1000;

/// Retry budget used when none is configured.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 100;

// ── Random digits ─────────────────────────────────────────────────────

/// Supplier of uniformly distributed decimal digits.
pub trait RandomSource {
    /// Next digit in `0..=9`.
    fn next_digit(&mut self) -> u8;
}

/// [`RandomSource`] backed by any `rand` generator.
#[derive(Debug, Clone)]
pub struct RngSource<R> {
    rng: R,
}

impl<R: Rng> RngSource<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RngSource<StdRng> {
    /// OS-seeded generator that can move between threads.
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }
}

impl<R: Rng> RandomSource for RngSource<R> {
    fn next_digit(&mut self) -> u8 {
        self.rng.gen_range(0..10)
    }
}

/// Replays a fixed digit sequence, cycling once it runs out.
///
/// Lets tests pin the exact candidates a generator will try.
#[derive(Debug, Clone)]
pub struct ScriptedSource {
    digits: Vec<u8>,
    draws: usize,
}

impl ScriptedSource {
    /// Digits above 9 are reduced modulo 10.
    pub fn new(digits: impl IntoIterator<Item = u8>) -> Self {
        Self {
            digits: digits.into_iter().map(|d| d % 10).collect(),
            draws: 0,
        }
    }

    /// How many digits have been drawn so far.
    pub fn draws(&self) -> usize {
        self.draws
    }
}

impl RandomSource for ScriptedSource {
    fn next_digit(&mut self) -> u8 {
        if self.digits.is_empty() {
            self.draws += 1;
            return 0;
        }
        let digit = self.digits[self.draws % self.digits.len()];
        self.draws += 1;
        digit
    }
}

// ── Existing codes ────────────────────────────────────────────────────

/// Membership test over previously accepted codes.
///
/// Implemented for sets and for plain slices/vectors, so a raw collection
/// that happens to hold duplicates works just as well as a set.
pub trait ExistingCodes {
    fn contains_code(&self, code: &str) -> bool;
}

impl<S: BuildHasher> ExistingCodes for HashSet<String, S> {
    fn contains_code(&self, code: &str) -> bool {
        self.contains(code)
    }
}

impl ExistingCodes for BTreeSet<String> {
    fn contains_code(&self, code: &str) -> bool {
        self.contains(code)
    }
}

impl<T: AsRef<str>> ExistingCodes for [T] {
    fn contains_code(&self, code: &str) -> bool {
        self.iter().any(|c| c.as_ref() == code)
    }
}

impl<T: AsRef<str>> ExistingCodes for Vec<T> {
    fn contains_code(&self, code: &str) -> bool {
        self.as_slice().contains_code(code)
    }
}

// ── Generation ────────────────────────────────────────────────────────

/// Outcome of a generation attempt. `Exhausted` is an expected result, not
/// an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "code", rename_all = "snake_case")]
pub enum Generation {
    Accepted(String),
    Exhausted,
}

impl Generation {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted(_))
    }

    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Accepted(code) => Some(code),
            Self::Exhausted => None,
        }
    }

    pub fn into_code(self) -> Option<String> {
        match self {
            Self::Accepted(code) => Some(code),
            Self::Exhausted => None,
        }
    }
}

/// Rejection sampler with a configurable retry budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MirrorGenerator {
    max_attempts: u32,
}

impl Default for MirrorGenerator {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

impl MirrorGenerator {
    pub fn with_max_attempts(max_attempts: u32) -> Self {
        Self { max_attempts }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn generate<E, S>(&self, existing: &E, source: &mut S) -> Generation
    where
        E: ExistingCodes + ?Sized,
        S: RandomSource + ?Sized,
    {
        generate(existing, self.max_attempts, source)
    }
}

/// Draw up to `max_attempts` candidates and return the first one not in
/// `existing`. Zero attempts draws nothing and reports `Exhausted`.
pub fn generate<E, S>(existing: &E, max_attempts: u32, source: &mut S) -> Generation
where
    E: ExistingCodes + ?Sized,
    S: RandomSource + ?Sized,
{
    for _ in 0..max_attempts {
        let (d1, d2, d3) = (source.next_digit(), source.next_digit(), source.next_digit());
        let candidate = mirror_from_digits(d1, d2, d3);
        if !existing.contains_code(&candidate) {
            return Generation::Accepted(candidate);
        }
    }
    Generation::Exhausted
}

/// `(3, 4, 5)` → `"345543"`.
pub fn mirror_from_digits(d1: u8, d2: u8, d3: u8) -> String {
    [d1, d2, d3, d3, d2, d1]
        .iter()
        .map(|d| char::from(b'0' + d % 10))
        .collect()
}

pub fn is_mirror_code(code: &str) -> bool {
    let bytes = code.as_bytes();
    bytes.len() == CODE_LEN
        && bytes.iter().all(u8::is_ascii_digit)
        && bytes[..3].iter().eq(bytes[3..].iter().rev())
}

/// Every mirror code, `000000` through `999999`, in ascending order.
pub fn all_codes() -> impl Iterator<Item = String> {
    (0..CODE_SPACE).map(|n| {
        mirror_from_digits((n / 100) as u8, (n / 10 % 10) as u8, (n % 10) as u8)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_space() -> HashSet<String> {
        all_codes().collect()
    }

    #[test]
    fn test_accepted_code_is_six_digit_mirror() {
        let mut source = RngSource::new(StdRng::seed_from_u64(7));
        let existing: HashSet<String> = HashSet::new();
        for _ in 0..200 {
            let code = generate(&existing, 100, &mut source)
                .into_code()
                .expect("empty set always accepts");
            assert_eq!(code.len(), 6);
            assert!(code.chars().all(|c| c.is_ascii_digit()));
            let rev: String = code[3..].chars().rev().collect();
            assert_eq!(&code[..3], rev);
        }
    }

    #[test]
    fn test_full_space_is_always_exhausted() {
        let existing = full_space();
        assert_eq!(existing.len(), CODE_SPACE);
        let mut source = RngSource::new(StdRng::seed_from_u64(1));
        for attempts in [1, 5, 100, 2000] {
            assert_eq!(generate(&existing, attempts, &mut source), Generation::Exhausted);
        }
    }

    #[test]
    fn test_empty_set_accepts_on_first_draw() {
        let mut source = ScriptedSource::new([9, 0, 1]);
        let result = generate(&Vec::<String>::new(), 1, &mut source);
        assert_eq!(result, Generation::Accepted("901109".to_string()));
        assert_eq!(source.draws(), 3);
    }

    #[test]
    fn test_scripted_draws_give_exact_candidate() {
        let mut source = ScriptedSource::new([3, 4, 5]);
        let result = MirrorGenerator::default().generate(&BTreeSet::<String>::new(), &mut source);
        assert_eq!(result.code(), Some("345543"));
    }

    #[test]
    fn test_collision_retries_until_free_code() {
        let existing: HashSet<String> = ["345543".to_string()].into_iter().collect();
        let mut source = ScriptedSource::new([3, 4, 5, 1, 2, 3]);
        let result = generate(&existing, 100, &mut source);
        assert_eq!(result, Generation::Accepted("123321".to_string()));
        // two attempts, three digits each
        assert_eq!(source.draws(), 6);
    }

    #[test]
    fn test_zero_attempts_draws_nothing() {
        let mut source = ScriptedSource::new([1, 2, 3]);
        let result = generate(&Vec::<String>::new(), 0, &mut source);
        assert_eq!(result, Generation::Exhausted);
        assert_eq!(source.draws(), 0);
    }

    #[test]
    fn test_budget_exhausted_when_every_draw_collides() {
        let existing = vec!["111111", "111111"];
        let mut source = ScriptedSource::new([1]);
        let result = MirrorGenerator::with_max_attempts(4).generate(&existing, &mut source);
        assert_eq!(result, Generation::Exhausted);
        assert_eq!(source.draws(), 12);
    }

    #[test]
    fn test_generate_does_not_mutate_existing() {
        let existing: HashSet<String> = ["345543".to_string()].into_iter().collect();
        let first = generate(&existing, 10, &mut ScriptedSource::new([3, 4, 5, 6, 7, 8]));
        let second = generate(&existing, 10, &mut ScriptedSource::new([3, 4, 5, 6, 7, 8]));
        assert_eq!(first, second);
        assert_eq!(first.code(), Some("678876"));
        assert_eq!(existing.len(), 1);
    }

    #[test]
    fn test_seeded_rng_is_deterministic() {
        let existing: HashSet<String> = HashSet::new();
        let a = generate(&existing, 1, &mut RngSource::new(StdRng::seed_from_u64(42)));
        let b = generate(&existing, 1, &mut RngSource::new(StdRng::seed_from_u64(42)));
        assert_eq!(a, b);
    }

    #[test]
    fn test_leading_zeros_preserved() {
        assert_eq!(mirror_from_digits(0, 0, 7), "007700");
        assert!(is_mirror_code("007700"));
    }

    #[test]
    fn test_is_mirror_code_rejects_malformed() {
        assert!(is_mirror_code("123321"));
        assert!(!is_mirror_code("123123"));
        assert!(!is_mirror_code("12321"));
        assert!(!is_mirror_code("12a a21"));
        assert!(!is_mirror_code("1233210"));
    }

    #[test]
    fn test_all_codes_covers_space() {
        let codes: Vec<String> = all_codes().collect();
        assert_eq!(codes.len(), CODE_SPACE);
        assert_eq!(codes.first().map(String::as_str), Some("000000"));
        assert_eq!(codes.last().map(String::as_str), Some("999999"));
        assert!(codes.iter().all(|c| is_mirror_code(c)));
    }

    #[test]
    fn test_generation_serializes_tagged() {
        let json = serde_json::to_string(&Generation::Accepted("123321".into())).unwrap();
        assert_eq!(json, r#"{"status":"accepted","code":"123321"}"#);
        let json = serde_json::to_string(&Generation::Exhausted).unwrap();
        assert_eq!(json, r#"{"status":"exhausted"}"#);
    }
}
