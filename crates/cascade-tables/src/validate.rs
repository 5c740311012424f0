//! Configuration-integrity checks
//!
//! A rule that references a missing table entry is a dataset fault, not a
//! runtime user error. Gaps are reported (and logged by the engine) so the
//! affected rule can be skipped instead of aborting an analysis.

use std::collections::BTreeSet;

use tracing::warn;

use crate::ids::{EffectId, QuestionId, QuestionPair};
use crate::schema::{ReferenceTables, TriggerPattern};

/// A single configuration gap found in a table set.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigGap {
    #[error("no interaction profile for {pair}")]
    MissingPairProfile { pair: QuestionPair },

    // The field is not named `source`: thiserror reserves that name for the
    // error-chain cause and would require `EffectId: std::error::Error`.
    #[error("interaction rule {rule} names unknown source effect {effect}")]
    UnknownInteractionSource { rule: EffectId, effect: EffectId },

    #[error("emergent rule {rule} has an empty trigger")]
    EmptyTrigger { rule: String },

    #[error("probability {value} out of range for {id}")]
    ProbabilityOutOfRange { id: EffectId, value: f64 },

    #[error("weight {value} out of range for {question}")]
    WeightOutOfRange { question: QuestionId, value: f64 },

    #[error("rule {rule} names out-of-range question {question}")]
    QuestionOutOfRange { rule: String, question: QuestionId },
}

impl ReferenceTables {
    /// Check the table set for internal consistency.
    ///
    /// Returns every gap found; an empty vector means the dataset is clean.
    pub fn validate(&self) -> Vec<ConfigGap> {
        let mut gaps = Vec::new();

        for question in &self.questions {
            if !(0.0..=1.0).contains(&question.weight) {
                gaps.push(ConfigGap::WeightOutOfRange {
                    question: question.id,
                    value: question.weight,
                });
            }
        }

        for pair in QuestionPair::all() {
            if self.interaction(pair).is_none() {
                gaps.push(ConfigGap::MissingPairProfile { pair });
            }
        }

        let known: BTreeSet<&EffectId> = self.immediate_effect_ids().collect();
        for rule in &self.interaction_rules {
            for question in [rule.pair.lo(), rule.pair.hi()] {
                if !question.in_range() {
                    gaps.push(ConfigGap::QuestionOutOfRange {
                        rule: rule.id.to_string(),
                        question,
                    });
                }
            }
            for source in &rule.sources {
                if !known.contains(source) {
                    gaps.push(ConfigGap::UnknownInteractionSource {
                        rule: rule.id.clone(),
                        effect: source.clone(),
                    });
                }
            }
        }

        for rule in &self.emergent_rules {
            if rule.trigger.is_empty() {
                gaps.push(ConfigGap::EmptyTrigger {
                    rule: rule.name.clone(),
                });
            }
            for condition in &rule.trigger {
                if !condition.question.in_range() {
                    gaps.push(ConfigGap::QuestionOutOfRange {
                        rule: rule.name.clone(),
                        question: condition.question,
                    });
                }
            }
            for effect in &rule.effects {
                if !(0.0..=1.0).contains(&effect.probability) {
                    gaps.push(ConfigGap::ProbabilityOutOfRange {
                        id: effect.id.clone(),
                        value: effect.probability,
                    });
                }
            }
        }

        for rule in &self.behavior_rules {
            let questions: Vec<QuestionId> = match &rule.trigger {
                TriggerPattern::AllOf(conditions) => {
                    conditions.iter().map(|c| c.question).collect()
                }
                TriggerPattern::ExactYesCountWith { question, .. } => vec![*question],
            };
            for question in questions {
                if !question.in_range() {
                    gaps.push(ConfigGap::QuestionOutOfRange {
                        rule: rule.kind.clone(),
                        question,
                    });
                }
            }
        }

        gaps
    }

    /// Run [`validate`](Self::validate) and log each gap as a warning.
    pub fn log_gaps(&self) -> usize {
        let gaps = self.validate();
        for gap in &gaps {
            warn!(%gap, "reference table gap");
        }
        gaps.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtin::builtin;
    use crate::schema::PairCondition;

    #[test]
    fn test_missing_pair_is_reported() {
        let mut tables = builtin();
        let removed = QuestionPair::new(QuestionId(1), QuestionId(2));
        tables.interactions.shift_remove(&removed);

        let gaps = tables.validate();
        assert!(gaps.contains(&ConfigGap::MissingPairProfile { pair: removed }));
    }

    #[test]
    fn test_unknown_source_is_reported() {
        let mut tables = builtin();
        tables.interaction_rules.push(crate::InteractionRule {
            id: "I_BAD_1".into(),
            pair: QuestionPair::new(QuestionId(1), QuestionId(2)),
            condition: PairCondition::BothYes,
            label: "broken".to_string(),
            magnitude: 0.1,
            threshold: 0.5,
            sources: vec!["Q9_E9".into()],
        });

        let gaps = tables.validate();
        let gap = gaps
            .iter()
            .find(|g| matches!(
                g,
                ConfigGap::UnknownInteractionSource { rule, .. } if rule.0 == "I_BAD_1"
            ))
            .unwrap();
        assert_eq!(
            *gap,
            ConfigGap::UnknownInteractionSource {
                rule: "I_BAD_1".into(),
                effect: "Q9_E9".into(),
            }
        );
        assert_eq!(
            gap.to_string(),
            "interaction rule I_BAD_1 names unknown source effect Q9_E9"
        );
    }

    #[test]
    fn test_out_of_range_question_is_reported() {
        let mut tables = builtin();
        tables.emergent_rules[0].trigger[0].question = QuestionId(9);

        let gaps = tables.validate();
        assert!(gaps.contains(&ConfigGap::QuestionOutOfRange {
            rule: tables.emergent_rules[0].name.clone(),
            question: QuestionId(9),
        }));
    }

    #[test]
    fn test_bad_probability_is_reported() {
        let mut tables = builtin();
        tables.emergent_rules[0].effects[0].probability = 1.7;

        let gaps = tables.validate();
        assert!(gaps
            .iter()
            .any(|g| matches!(g, ConfigGap::ProbabilityOutOfRange { .. })));
    }
}
