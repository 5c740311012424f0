//! Effect calculator
//!
//! Derives first-order (direct), second-order (pairwise) and third-order
//! (emergent) effects from a vote vector and the reference tables. All
//! functions here are pure and deterministic; the thresholds are fixed
//! design constants and must not drift.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use cascade_tables::{
    InteractionKind, QuestionId, QuestionPair, ReferenceTables, TriggerPattern, QUESTION_COUNT,
};

use crate::votes::Votes;

/// Synergy above which a reinforcing pair records a cascade candidate.
const CASCADE_SYNERGY_THRESHOLD: f64 = 0.7;
/// Yes-vote count at which systemic risk switches to the quadratic regime.
const RISK_REGIME_YES_COUNT: usize = 4;
/// Systemic risk above which a tipping point is flagged.
const RISK_TIPPING_THRESHOLD: f64 = 0.7;
/// Accumulated conflict above which a tipping point is flagged.
const CONFLICT_TIPPING_THRESHOLD: f64 = 1.5;

/// Direct consequences of the active votes, one accumulator per dimension.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FirstOrder {
    pub economic: f64,
    pub social: f64,
    pub political: f64,
    pub institutional: f64,
}

/// A cascade candidate between two strongly reinforcing questions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Cascade {
    pub source: QuestionId,
    pub target: QuestionId,
    pub strength: f64,
}

/// Accumulated pairwise interactions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SecondOrder {
    pub synergies: f64,
    pub conflicts: f64,
    pub cascades: Vec<Cascade>,
}

/// An emergent behavior detected by pattern matching the vote vector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmergentBehavior {
    pub kind: String,
    pub probability: f64,
    pub impact: String,
}

/// A flagged tipping point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TippingPoint {
    pub trigger: String,
    pub threshold: f64,
    pub consequence: String,
}

/// Systemic, multi-question effects.
///
/// `systemic_risk` here is the raw third-order signal and is deliberately
/// uncapped (all-yes with high conflict exceeds 1); only the graph-level
/// metric clamps to [0, 1].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ThirdOrder {
    pub systemic_risk: f64,
    pub transformation_potential: f64,
    pub emergent_behaviors: Vec<EmergentBehavior>,
    pub tipping_points: Vec<TippingPoint>,
}

/// Accumulate direct effects of every yes vote.
///
/// Political contribution discounts by the question's resistance factor;
/// institutional contribution is half the weight.
pub fn first_order(tables: &ReferenceTables, votes: Votes) -> FirstOrder {
    let mut effects = FirstOrder::default();

    for (id, yes) in votes.iter() {
        if !yes {
            continue;
        }
        let q = tables.question(id);
        effects.economic += q.economic_multiplier * q.weight;
        effects.social += q.social_multiplier * q.weight;
        effects.political += q.weight * (1.0 - q.resistance_factor);
        effects.institutional += q.weight * 0.5;
    }

    effects
}

/// Accumulate synergy and conflict over every pair with both votes yes.
///
/// The sum is commutative, so the result is independent of pair iteration
/// order. A pair missing from the interaction table is a dataset gap: it is
/// logged and skipped rather than aborting the analysis.
pub fn second_order(tables: &ReferenceTables, votes: Votes) -> SecondOrder {
    let mut effects = SecondOrder::default();

    for i in 0..QUESTION_COUNT {
        for j in i + 1..QUESTION_COUNT {
            let a = QuestionId::from_index(i);
            let b = QuestionId::from_index(j);
            if !(votes.is_yes(a) && votes.is_yes(b)) {
                continue;
            }

            let pair = QuestionPair::new(a, b);
            let Some(profile) = tables.interaction(pair) else {
                warn!(%pair, "no interaction profile, pair skipped");
                continue;
            };

            effects.synergies += profile.synergy;
            effects.conflicts += profile.conflict;

            if profile.kind == InteractionKind::Reinforcing
                && profile.synergy > CASCADE_SYNERGY_THRESHOLD
            {
                effects.cascades.push(Cascade {
                    source: a,
                    target: b,
                    strength: profile.synergy,
                });
            }
        }
    }

    effects
}

/// Derive systemic effects from the lower orders.
pub fn third_order(
    tables: &ReferenceTables,
    votes: Votes,
    first: &FirstOrder,
    second: &SecondOrder,
) -> ThirdOrder {
    let yes_count = votes.yes_count();
    let yes_share = yes_count as f64 / QUESTION_COUNT as f64;

    // Near-unanimous outcomes jump to a quadratic, conflict-amplified regime.
    let systemic_risk = if yes_count >= RISK_REGIME_YES_COUNT {
        yes_share.powi(2) * (1.0 + second.conflicts)
    } else {
        yes_share * 0.3
    };

    let transformation_potential =
        (first.economic + first.social) / 2.0 * (1.0 + second.synergies - second.conflicts);

    let emergent_behaviors = tables
        .behavior_rules
        .iter()
        .filter(|rule| trigger_matches(&rule.trigger, votes))
        .map(|rule| EmergentBehavior {
            kind: rule.kind.clone(),
            probability: rule.probability,
            impact: rule.impact.clone(),
        })
        .collect::<Vec<_>>();

    let mut tipping_points = Vec::new();
    if systemic_risk > RISK_TIPPING_THRESHOLD {
        tipping_points.push(TippingPoint {
            trigger: "High systemic risk".to_string(),
            threshold: systemic_risk,
            consequence: "Potential economic recession".to_string(),
        });
    }
    if second.conflicts > CONFLICT_TIPPING_THRESHOLD {
        tipping_points.push(TippingPoint {
            trigger: "Internal contradictions".to_string(),
            threshold: second.conflicts,
            consequence: "Implementation paralysis".to_string(),
        });
    }

    debug!(
        yes_count,
        systemic_risk,
        behaviors = emergent_behaviors.len(),
        "third-order effects derived"
    );

    ThirdOrder {
        systemic_risk,
        transformation_potential,
        emergent_behaviors,
        tipping_points,
    }
}

fn trigger_matches(pattern: &TriggerPattern, votes: Votes) -> bool {
    // out-of-range question ids are a table-data fault: the rule never fires
    let answer = |question: QuestionId| match votes.get(question) {
        Some(yes) => Some(yes),
        None => {
            warn!(%question, "out-of-range question in behavior trigger, rule skipped");
            None
        }
    };
    match pattern {
        TriggerPattern::AllOf(conditions) => conditions
            .iter()
            .all(|c| answer(c.question) == Some(c.expected_yes)),
        TriggerPattern::ExactYesCountWith {
            yes_count,
            question,
        } => votes.yes_count() == *yes_count as usize && answer(*question) == Some(true),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cascade_tables::ReferenceTables;

    fn tables() -> ReferenceTables {
        ReferenceTables::builtin()
    }

    #[test]
    fn test_all_no_is_zero() {
        let tables = tables();
        let votes: Votes = "00000".parse().unwrap();

        let first = first_order(&tables, votes);
        assert_eq!(first, FirstOrder::default());

        let second = second_order(&tables, votes);
        assert_eq!(second.synergies, 0.0);
        assert_eq!(second.conflicts, 0.0);
        assert!(second.cascades.is_empty());

        let third = third_order(&tables, votes, &first, &second);
        assert_eq!(third.systemic_risk, 0.0);
        assert!(third.tipping_points.is_empty());
    }

    #[test]
    fn test_first_order_single_question() {
        let tables = tables();
        let votes: Votes = "10000".parse().unwrap();
        let first = first_order(&tables, votes);

        // Q1: weight 0.25, econ 1.8, social 2.1, resistance 0.7
        assert!((first.economic - 1.8 * 0.25).abs() < 1e-12);
        assert!((first.social - 2.1 * 0.25).abs() < 1e-12);
        assert!((first.political - 0.25 * 0.3).abs() < 1e-12);
        assert!((first.institutional - 0.125).abs() < 1e-12);
    }

    #[test]
    fn test_second_order_all_yes_sums() {
        let tables = tables();
        let votes: Votes = "11111".parse().unwrap();
        let second = second_order(&tables, votes);

        // Sums over all ten pairs of the builtin interaction matrix
        assert!((second.synergies - 4.2).abs() < 1e-9);
        assert!((second.conflicts - 2.9).abs() < 1e-9);

        // Only Q1-Q2 is reinforcing with synergy strictly above 0.7
        assert_eq!(second.cascades.len(), 1);
        assert_eq!(second.cascades[0].source, QuestionId(1));
        assert_eq!(second.cascades[0].target, QuestionId(2));
    }

    #[test]
    fn test_third_order_risk_regimes() {
        let tables = tables();

        // Below the regime switch: linear in yes share
        let votes: Votes = "10100".parse().unwrap();
        let first = first_order(&tables, votes);
        let second = second_order(&tables, votes);
        let third = third_order(&tables, votes, &first, &second);
        assert!((third.systemic_risk - (2.0 / 5.0) * 0.3).abs() < 1e-12);

        // All yes: quadratic regime, raw risk exceeds 1
        let votes: Votes = "11111".parse().unwrap();
        let first = first_order(&tables, votes);
        let second = second_order(&tables, votes);
        let third = third_order(&tables, votes, &first, &second);
        assert!((third.systemic_risk - (1.0 + second.conflicts)).abs() < 1e-9);
        assert!(third.systemic_risk > 1.0);
        assert_eq!(third.tipping_points.len(), 2);
    }

    #[test]
    fn test_behavior_rules_fire_on_patterns() {
        let tables = tables();

        let votes: Votes = "11100".parse().unwrap();
        let first = first_order(&tables, votes);
        let second = second_order(&tables, votes);
        let third = third_order(&tables, votes, &first, &second);
        assert!(third
            .emergent_behaviors
            .iter()
            .any(|b| b.kind == "labor_market_rigidity"));

        // Q5 yes with Q1 and Q2 no
        let votes: Votes = "00001".parse().unwrap();
        let first = first_order(&tables, votes);
        let second = second_order(&tables, votes);
        let third = third_order(&tables, votes, &first, &second);
        assert!(third
            .emergent_behaviors
            .iter()
            .any(|b| b.kind == "immigration_arbitrage"));

        // Exactly three yes votes including Q4
        let votes: Votes = "10110".parse().unwrap();
        let first = first_order(&tables, votes);
        let second = second_order(&tables, votes);
        let third = third_order(&tables, votes, &first, &second);
        assert!(third
            .emergent_behaviors
            .iter()
            .any(|b| b.kind == "compliance_industrial_complex"));
    }

    #[test]
    fn test_behavior_rule_with_bad_question_never_fires() {
        let mut tables = tables();
        if let TriggerPattern::AllOf(conditions) = &mut tables.behavior_rules[0].trigger {
            conditions[0].question = QuestionId(9);
        }

        // the corrupted rule is skipped instead of panicking on lookup
        let votes: Votes = "11100".parse().unwrap();
        let first = first_order(&tables, votes);
        let second = second_order(&tables, votes);
        let third = third_order(&tables, votes, &first, &second);
        assert!(!third
            .emergent_behaviors
            .iter()
            .any(|b| b.kind == "labor_market_rigidity"));
    }

    #[test]
    fn test_pair_sums_independent_of_iteration_order() {
        let tables = tables();
        let votes: Votes = "11011".parse().unwrap();
        let second = second_order(&tables, votes);

        // accumulate the same pairs in reverse order
        let mut synergies = 0.0;
        let mut conflicts = 0.0;
        for pair in QuestionPair::all().collect::<Vec<_>>().into_iter().rev() {
            if votes.is_yes(pair.lo()) && votes.is_yes(pair.hi()) {
                let profile = tables.interaction(pair).unwrap();
                synergies += profile.synergy;
                conflicts += profile.conflict;
            }
        }
        assert!((second.synergies - synergies).abs() < 1e-12);
        assert!((second.conflicts - conflicts).abs() < 1e-12);
    }

    #[test]
    fn test_missing_pair_profile_is_skipped() {
        let mut tables = tables();
        tables
            .interactions
            .shift_remove(&QuestionPair::new(QuestionId(1), QuestionId(2)));

        let votes: Votes = "11000".parse().unwrap();
        let second = second_order(&tables, votes);

        // The missing pair contributes nothing instead of aborting
        assert_eq!(second.synergies, 0.0);
        assert_eq!(second.conflicts, 0.0);
    }
}
