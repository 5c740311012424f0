//! Table schema
//!
//! The shapes of every reference table, independent of any concrete dataset.
//! All types derive serde so a complete table set can be loaded from JSON
//! and swapped per-country or per-referendum.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::ids::{EffectId, QuestionId, QuestionPair};

/// Broad category of a causal effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectCategory {
    Economic,
    Social,
    Administrative,
    Political,
}

/// A first-order effect template: the immediate consequence of one question
/// passing, before any interaction with other questions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImmediateEffect {
    pub id: EffectId,
    pub label: String,
    /// Signed strength, roughly -1..1.
    pub magnitude: f64,
    /// Months before the effect starts activating.
    pub latency_months: u32,
    pub category: EffectCategory,
}

/// One referendum question with its scoring attributes and the immediate
/// effects it triggers when it passes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: QuestionId,
    pub name: String,
    /// Relative weight, 0..1; weights sum to roughly 1 across questions.
    pub weight: f64,
    pub affected_population: u64,
    pub economic_multiplier: f64,
    pub social_multiplier: f64,
    pub implementation_lag_months: u32,
    /// Expected institutional resistance, 0..1.
    pub resistance_factor: f64,
    pub immediate_effects: Vec<ImmediateEffect>,
}

/// Qualitative classification of a pairwise interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionKind {
    Reinforcing,
    Moderate,
    Neutral,
    Conflicting,
    HighlyConflicting,
}

/// Synergy/conflict coefficients for one question pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PairProfile {
    pub synergy: f64,
    pub conflict: f64,
    pub kind: InteractionKind,
}

/// Vote condition a second-order rule binds to.
///
/// The pair's questions are taken in canonical order, so `FirstYesSecondNo`
/// reads "lower-numbered question yes, higher-numbered no".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PairCondition {
    BothYes,
    BothNo,
    FirstYesSecondNo,
    FirstNoSecondYes,
}

/// A second-order interaction rule: when its pair condition matches the vote
/// vector it injects a new effect node amplified by its source effects.
///
/// Sources are structured identifiers, not parsed out of the label text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionRule {
    pub id: EffectId,
    pub pair: QuestionPair,
    pub condition: PairCondition,
    pub label: String,
    pub magnitude: f64,
    pub threshold: f64,
    /// First-order effects whose presence drives this interaction.
    pub sources: Vec<EffectId>,
}

/// A single `(question, expected answer)` condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteCondition {
    pub question: QuestionId,
    pub expected_yes: bool,
}

/// Multi-dimensional impact of an emergent phenomenon.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImpactVector {
    pub economic: f64,
    pub social: f64,
    pub political: f64,
}

/// One effect emitted by a triggered emergent rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmergentEffect {
    pub id: EffectId,
    pub label: String,
    pub description: String,
    pub probability: f64,
    pub impact: ImpactVector,
}

/// A third-order phenomenon triggered only when every listed vote condition
/// holds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmergentRule {
    pub name: String,
    pub trigger: Vec<VoteCondition>,
    pub effects: Vec<EmergentEffect>,
}

/// Vote sub-pattern a behavior rule matches against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerPattern {
    /// Every listed condition must hold.
    AllOf(Vec<VoteCondition>),
    /// Exactly `yes_count` yes votes overall, with `question` among them.
    ExactYesCountWith { yes_count: u8, question: QuestionId },
}

/// Aggregate-level emergent behavior detected by the effect calculator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BehaviorRule {
    pub kind: String,
    pub trigger: TriggerPattern,
    pub probability: f64,
    /// Narrative consequence, surfaced verbatim in results.
    pub impact: String,
}

/// A predefined propagation chain through named effects.
///
/// Later entries are synthetic downstream phenomena that have no first-order
/// node of their own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainTemplate {
    pub name: String,
    pub nodes: Vec<EffectId>,
    pub amplification: f64,
    pub damping: f64,
    pub time_constant_months: f64,
}

/// Stability class of a feedback loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoopKind {
    Reinforcing,
    Balancing,
}

/// A canonical feedback loop documented in the dataset.
///
/// Loop detection in the engine is graph-driven; these templates describe the
/// known loops of the domain for dataset consumers and validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoopTemplate {
    pub name: String,
    pub nodes: Vec<EffectId>,
    pub nominal_gain: f64,
    pub delay_months: f64,
    pub kind: LoopKind,
}

/// A named canonical vote pattern with precomputed scenario scores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Archetype {
    pub name: String,
    pub pattern: [bool; 5],
    pub stability: f64,
    pub transformation: f64,
    pub risk: f64,
    pub opportunity: f64,
}

/// Baseline macro-state variables, perturbed by the Monte Carlo estimator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MacroState {
    /// Billions EUR.
    pub gdp_baseline: f64,
    pub employment_rate: f64,
    pub investment_confidence: f64,
    pub social_cohesion: f64,
    pub political_stability: f64,
    pub institutional_capacity: f64,
}

/// Monte Carlo defaults.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct McParams {
    pub default_runs: usize,
    /// Relative jitter width; 0.2 means each variable moves by up to ±10%.
    pub variance: f64,
    pub external_shocks: f64,
}

/// A curated vote sequence through the decision space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriticalPath {
    pub name: String,
    pub sequence: [bool; 5],
    pub rationale: String,
    pub risk: String,
    pub reward: String,
}

/// The complete, immutable table set consumed by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceTables {
    pub questions: [Question; 5],
    pub interactions: IndexMap<QuestionPair, PairProfile>,
    pub interaction_rules: Vec<InteractionRule>,
    pub emergent_rules: Vec<EmergentRule>,
    pub behavior_rules: Vec<BehaviorRule>,
    pub chains: Vec<ChainTemplate>,
    pub loop_templates: Vec<LoopTemplate>,
    pub archetypes: Vec<Archetype>,
    pub critical_paths: Vec<CriticalPath>,
    pub macro_baseline: MacroState,
    pub mc: McParams,
}

impl ReferenceTables {
    /// Look up a question definition.
    pub fn question(&self, id: QuestionId) -> &Question {
        &self.questions[id.index()]
    }

    /// Look up the interaction profile for a pair, if configured.
    pub fn interaction(&self, pair: QuestionPair) -> Option<&PairProfile> {
        self.interactions.get(&pair)
    }

    /// Iterate every first-order effect id across all questions.
    pub fn immediate_effect_ids(&self) -> impl Iterator<Item = &EffectId> {
        self.questions
            .iter()
            .flat_map(|q| q.immediate_effects.iter().map(|e| &e.id))
    }

    /// Load an alternate table set from JSON.
    pub fn from_json_str(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tables_json_roundtrip() {
        let tables = crate::builtin::builtin();
        let json = serde_json::to_string(&tables).unwrap();
        let back = ReferenceTables::from_json_str(&json).unwrap();
        assert_eq!(back, tables);
    }
}
