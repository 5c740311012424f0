//! Typed identifiers for referendum entities
//!
//! Questions are identified by a small integer, effects by a typed string
//! wrapper. Pairwise interactions are keyed by a canonical ordered pair of
//! question identifiers instead of composite string keys, so table lookups
//! carry compile-time shape guarantees.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::QUESTION_COUNT;

/// One of the five referendum questions, 1-based.
///
/// Displays as `Q1`..`Q5`. Deserialization rejects numbers outside the
/// ballot, so a loaded table set cannot smuggle in an out-of-range id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct QuestionId(pub u8);

impl QuestionId {
    /// All question ids in ballot order.
    pub fn all() -> impl Iterator<Item = QuestionId> {
        (1..=QUESTION_COUNT as u8).map(QuestionId)
    }

    /// Whether the id denotes one of the five ballot questions.
    pub fn in_range(&self) -> bool {
        self.0 >= 1 && self.0 as usize <= QUESTION_COUNT
    }

    /// Zero-based index into a vote vector.
    pub fn index(&self) -> usize {
        (self.0 - 1) as usize
    }

    /// Build from a zero-based vote-vector index.
    pub fn from_index(index: usize) -> Self {
        Self(index as u8 + 1)
    }
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Q{}", self.0)
    }
}

impl<'de> Deserialize<'de> for QuestionId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let n = u8::deserialize(deserializer)?;
        let id = Self(n);
        if !id.in_range() {
            return Err(serde::de::Error::custom(format!(
                "question number out of range: {n}"
            )));
        }
        Ok(id)
    }
}

impl FromStr for QuestionId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .strip_prefix('Q')
            .ok_or_else(|| format!("question id must look like Q1..Q5, got {s:?}"))?;
        let n: u8 = digits
            .parse()
            .map_err(|_| format!("question id must look like Q1..Q5, got {s:?}"))?;
        if n == 0 || n as usize > QUESTION_COUNT {
            return Err(format!("question number out of range: {s:?}"));
        }
        Ok(Self(n))
    }
}

/// Identifier of a causal effect node.
///
/// Also names synthetic chain placeholders (`labor_shortage`) and emergence
/// trigger tokens (`Q1_yes`), which are symbolic and not required to resolve
/// to a built node.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EffectId(pub String);

impl fmt::Display for EffectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for EffectId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl EffectId {
    /// Trigger token for an emergence condition, e.g. `Q1_yes`.
    pub fn trigger_token(question: QuestionId, expected_yes: bool) -> Self {
        let suffix = if expected_yes { "yes" } else { "no" };
        Self(format!("{question}_{suffix}"))
    }
}

/// Canonical unordered pair of questions.
///
/// Always stored with `lo < hi`, so `(Q2, Q1)` and `(Q1, Q2)` key the same
/// interaction profile. Serializes as `"Q1-Q2"` for use as a JSON map key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QuestionPair {
    lo: QuestionId,
    hi: QuestionId,
}

impl QuestionPair {
    /// Create a canonical pair. Order of arguments is irrelevant.
    pub fn new(a: QuestionId, b: QuestionId) -> Self {
        if a <= b {
            Self { lo: a, hi: b }
        } else {
            Self { lo: b, hi: a }
        }
    }

    pub fn lo(&self) -> QuestionId {
        self.lo
    }

    pub fn hi(&self) -> QuestionId {
        self.hi
    }

    /// All unordered pairs in iteration order (Q1-Q2, Q1-Q3, .., Q4-Q5).
    pub fn all() -> impl Iterator<Item = QuestionPair> {
        (1..=QUESTION_COUNT as u8).flat_map(move |i| {
            (i + 1..=QUESTION_COUNT as u8)
                .map(move |j| QuestionPair::new(QuestionId(i), QuestionId(j)))
        })
    }
}

impl fmt::Display for QuestionPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.lo, self.hi)
    }
}

impl FromStr for QuestionPair {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (a, b) = s
            .split_once('-')
            .ok_or_else(|| format!("pair key must look like Q1-Q2, got {s:?}"))?;
        Ok(Self::new(a.parse()?, b.parse()?))
    }
}

impl Serialize for QuestionPair {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for QuestionPair {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
