//! Vote vector
//!
//! The single input every computation is a pure function of: an ordered
//! sequence of five yes/no answers, index 0..4 mapping to Q1..Q5.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use cascade_tables::{QuestionId, QUESTION_COUNT};

use crate::error::{Error, Result};

/// An ordered vector of five yes/no votes. Never mutated, only read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Votes([bool; QUESTION_COUNT]);

impl Votes {
    pub fn new(votes: [bool; QUESTION_COUNT]) -> Self {
        Self(votes)
    }

    /// Build from a slice, enforcing the exact-length contract.
    pub fn from_slice(votes: &[bool]) -> Result<Self> {
        let array: [bool; QUESTION_COUNT] =
            votes.try_into().map_err(|_| Error::InvalidVoteCount {
                expected: QUESTION_COUNT,
                actual: votes.len(),
            })?;
        Ok(Self(array))
    }

    /// The answer for one question. The id must be on the ballot; table
    /// data of unknown provenance should go through [`get`](Self::get).
    pub fn is_yes(&self, question: QuestionId) -> bool {
        self.0[question.index()]
    }

    /// The answer for one question, or `None` for an id outside the ballot.
    pub fn get(&self, question: QuestionId) -> Option<bool> {
        if question.in_range() {
            Some(self.0[question.index()])
        } else {
            None
        }
    }

    /// Number of yes votes.
    pub fn yes_count(&self) -> usize {
        self.0.iter().filter(|v| **v).count()
    }

    /// The raw pattern.
    pub fn pattern(&self) -> [bool; QUESTION_COUNT] {
        self.0
    }

    /// Binary string form, e.g. `10110`.
    pub fn binary(&self) -> String {
        self.0
            .iter()
            .map(|v| if *v { '1' } else { '0' })
            .collect()
    }

    /// Iterate `(question, answer)` in ballot order.
    pub fn iter(&self) -> impl Iterator<Item = (QuestionId, bool)> + '_ {
        QuestionId::all().map(move |q| (q, self.is_yes(q)))
    }
}

impl fmt::Display for Votes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.binary())
    }
}

impl FromStr for Votes {
    type Err = Error;

    /// Parse a `0`/`1` pattern such as `10110`.
    fn from_str(s: &str) -> Result<Self> {
        if s.chars().count() != QUESTION_COUNT {
            return Err(Error::InvalidVotePattern {
                pattern: s.to_string(),
                reason: format!("expected {QUESTION_COUNT} characters"),
            });
        }
        let mut votes = [false; QUESTION_COUNT];
        for (i, c) in s.chars().enumerate() {
            votes[i] = match c {
                '1' => true,
                '0' => false,
                other => {
                    return Err(Error::InvalidVotePattern {
                        pattern: s.to_string(),
                        reason: format!("unexpected character {other:?}"),
                    })
                }
            };
        }
        Ok(Self(votes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display() {
        let votes: Votes = "10110".parse().unwrap();
        assert_eq!(votes.to_string(), "10110");
        assert_eq!(votes.yes_count(), 3);
        assert!(votes.is_yes(QuestionId(1)));
        assert!(!votes.is_yes(QuestionId(2)));
    }

    #[test]
    fn test_parse_rejects_bad_patterns() {
        assert!("1011".parse::<Votes>().is_err());
        assert!("101101".parse::<Votes>().is_err());
        assert!("10x10".parse::<Votes>().is_err());
    }

    #[test]
    fn test_get_rejects_out_of_range_ids() {
        let votes: Votes = "10110".parse().unwrap();
        assert_eq!(votes.get(QuestionId(1)), Some(true));
        assert_eq!(votes.get(QuestionId(2)), Some(false));
        assert_eq!(votes.get(QuestionId(0)), None);
        assert_eq!(votes.get(QuestionId(9)), None);
    }

    #[test]
    fn test_from_slice_enforces_length() {
        assert!(Votes::from_slice(&[true, false, true]).is_err());
        assert!(Votes::from_slice(&[true; 6]).is_err());
        assert!(Votes::from_slice(&[true; 5]).is_ok());
    }
}
