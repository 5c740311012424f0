//! Scenario classification
//!
//! Matches a vote vector to its nearest canonical archetype and derives
//! stakeholder recommendations from independent rule checks.

use serde::{Deserialize, Serialize};
use tracing::trace;

use cascade_tables::{Archetype, QuestionId, ReferenceTables};

use crate::effects::ThirdOrder;
use crate::votes::Votes;

/// Systemic risk above which businesses should prepare contingencies.
const CONTINGENCY_RISK_THRESHOLD: f64 = 0.6;
/// Systemic risk above which investors should hedge.
const HEDGE_RISK_THRESHOLD: f64 = 0.7;
/// Yes votes at which cross-ministry coordination becomes necessary.
const TASK_FORCE_YES_COUNT: usize = 3;

/// Number of positions where a vote vector differs from a pattern.
pub fn hamming(votes: Votes, pattern: &[bool; 5]) -> u32 {
    votes
        .iter()
        .zip(pattern.iter())
        .filter(|((_, a), b)| *a != **b)
        .count() as u32
}

/// The archetype nearest to a vote vector, with its distance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchetypeMatch {
    pub archetype: Archetype,
    pub distance: u32,
}

/// Find the archetype minimizing Hamming distance.
///
/// Ties keep the earlier table entry; only a strictly smaller distance
/// replaces the current best.
pub fn nearest_archetype(tables: &ReferenceTables, votes: Votes) -> ArchetypeMatch {
    let mut best: Option<ArchetypeMatch> = None;

    for archetype in &tables.archetypes {
        let distance = hamming(votes, &archetype.pattern);
        let better = match &best {
            Some(b) => distance < b.distance,
            None => true,
        };
        if better {
            best = Some(ArchetypeMatch {
                archetype: archetype.clone(),
                distance,
            });
        }
    }

    let matched = best.unwrap_or_else(|| ArchetypeMatch {
        archetype: Archetype {
            name: "Unclassified".to_string(),
            pattern: [false; 5],
            stability: 0.0,
            transformation: 0.0,
            risk: 0.0,
            opportunity: 0.0,
        },
        distance: 5,
    });
    trace!(archetype = %matched.archetype.name, distance = matched.distance, "archetype matched");
    matched
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Priority {
    High,
    Critical,
}

/// One actionable recommendation for a stakeholder group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub priority: Priority,
    pub action: String,
    pub timeline: String,
    pub note: String,
}

impl Recommendation {
    fn new(priority: Priority, action: &str, timeline: &str, note: &str) -> Self {
        Self {
            priority,
            action: action.to_string(),
            timeline: timeline.to_string(),
            note: note.to_string(),
        }
    }
}

/// Recommendations per stakeholder group. Rules fire independently; a group
/// may receive several or none.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Recommendations {
    pub businesses: Vec<Recommendation>,
    pub workers: Vec<Recommendation>,
    pub policymakers: Vec<Recommendation>,
    pub investors: Vec<Recommendation>,
}

/// Derive stakeholder recommendations from the votes and third-order
/// effects.
pub fn recommendations(votes: Votes, third: &ThirdOrder) -> Recommendations {
    let mut recs = Recommendations::default();

    if votes.is_yes(QuestionId(1)) || votes.is_yes(QuestionId(2)) {
        recs.businesses.push(Recommendation::new(
            Priority::High,
            "Review and update employment contracts",
            "3 months",
            "Medium cost",
        ));
    }
    if third.systemic_risk > CONTINGENCY_RISK_THRESHOLD {
        recs.businesses.push(Recommendation::new(
            Priority::Critical,
            "Prepare contingency plans for multiple scenarios",
            "Immediate",
            "High cost",
        ));
    }

    if votes.is_yes(QuestionId(3)) {
        recs.workers.push(Recommendation::new(
            Priority::High,
            "Document all employment conditions",
            "1 month",
            "Protection against arbitrary contracts",
        ));
    }

    if votes.yes_count() >= TASK_FORCE_YES_COUNT {
        recs.policymakers.push(Recommendation::new(
            Priority::Critical,
            "Establish inter-ministerial task force",
            "Within 1 week of results",
            "Very high complexity",
        ));
    }

    if third.systemic_risk > HEDGE_RISK_THRESHOLD {
        recs.investors.push(Recommendation::new(
            Priority::High,
            "Hedge against market volatility",
            "Before referendum date",
            "Put options, safe haven assets",
        ));
    }

    recs
}
