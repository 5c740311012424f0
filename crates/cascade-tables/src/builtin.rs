//! Builtin dataset: the 2025 Italian referendum
//!
//! Five labor/citizenship questions with the sourced weights, multipliers and
//! interaction coefficients of the reference analysis. Magnitudes are signed
//! and roughly -1..1; latencies, lags and time constants are months.

use indexmap::IndexMap;

use crate::ids::{EffectId, QuestionId, QuestionPair};
use crate::schema::*;

fn effect(
    id: &str,
    label: &str,
    magnitude: f64,
    latency_months: u32,
    category: EffectCategory,
) -> ImmediateEffect {
    ImmediateEffect {
        id: id.into(),
        label: label.to_string(),
        magnitude,
        latency_months,
        category,
    }
}

fn pair(a: u8, b: u8) -> QuestionPair {
    QuestionPair::new(QuestionId(a), QuestionId(b))
}

fn profile(synergy: f64, conflict: f64, kind: InteractionKind) -> PairProfile {
    PairProfile {
        synergy,
        conflict,
        kind,
    }
}

fn cond(question: u8, expected_yes: bool) -> VoteCondition {
    VoteCondition {
        question: QuestionId(question),
        expected_yes,
    }
}

fn questions() -> [Question; 5] {
    [
        Question {
            id: QuestionId(1),
            name: "Jobs Act - Reintegro".to_string(),
            weight: 0.25,
            affected_population: 3_500_000,
            economic_multiplier: 1.8,
            social_multiplier: 2.1,
            implementation_lag_months: 6,
            resistance_factor: 0.7,
            immediate_effects: vec![
                effect(
                    "Q1_E1",
                    "Aumento costi licenziamento",
                    0.8,
                    0,
                    EffectCategory::Economic,
                ),
                effect(
                    "Q1_E2",
                    "Riduzione assunzioni tempo indeterminato",
                    -0.6,
                    3,
                    EffectCategory::Economic,
                ),
                effect(
                    "Q1_E3",
                    "Maggiore sicurezza lavoratori insider",
                    0.7,
                    1,
                    EffectCategory::Social,
                ),
            ],
        },
        Question {
            id: QuestionId(2),
            name: "PMI - Indennizzo".to_string(),
            weight: 0.20,
            affected_population: 3_700_000,
            economic_multiplier: 1.3,
            social_multiplier: 1.5,
            implementation_lag_months: 3,
            resistance_factor: 0.4,
            immediate_effects: vec![
                effect(
                    "Q2_E1",
                    "Aumento rischio finanziario PMI",
                    0.5,
                    0,
                    EffectCategory::Economic,
                ),
                effect(
                    "Q2_E2",
                    "Maggiore tutela lavoratori PMI",
                    0.6,
                    1,
                    EffectCategory::Social,
                ),
            ],
        },
        Question {
            id: QuestionId(3),
            name: "Contratti - Causale".to_string(),
            weight: 0.20,
            affected_population: 2_600_000,
            economic_multiplier: 1.5,
            social_multiplier: 1.8,
            implementation_lag_months: 9,
            resistance_factor: 0.6,
            immediate_effects: vec![
                effect(
                    "Q3_E1",
                    "Complessità amministrativa contratti",
                    0.7,
                    0,
                    EffectCategory::Administrative,
                ),
                effect(
                    "Q3_E2",
                    "Riduzione contratti a termine",
                    -0.5,
                    6,
                    EffectCategory::Economic,
                ),
            ],
        },
        Question {
            id: QuestionId(4),
            name: "Sicurezza - Solidale".to_string(),
            weight: 0.15,
            affected_population: 15_000_000,
            economic_multiplier: 1.2,
            social_multiplier: 1.1,
            implementation_lag_months: 12,
            resistance_factor: 0.3,
            immediate_effects: vec![
                effect(
                    "Q4_E1",
                    "Aumento investimenti sicurezza",
                    0.6,
                    3,
                    EffectCategory::Economic,
                ),
                effect(
                    "Q4_E2",
                    "Riduzione subappalti",
                    -0.4,
                    6,
                    EffectCategory::Economic,
                ),
            ],
        },
        Question {
            id: QuestionId(5),
            name: "Cittadinanza - 5 anni".to_string(),
            weight: 0.20,
            affected_population: 1_200_000,
            economic_multiplier: 0.8,
            social_multiplier: 2.5,
            implementation_lag_months: 3,
            resistance_factor: 0.8,
            immediate_effects: vec![
                effect(
                    "Q5_E1",
                    "Aumento richieste cittadinanza",
                    0.9,
                    0,
                    EffectCategory::Social,
                ),
                effect(
                    "Q5_E2",
                    "Maggiore integrazione sociale",
                    0.5,
                    12,
                    EffectCategory::Social,
                ),
            ],
        },
    ]
}

fn interactions() -> IndexMap<QuestionPair, PairProfile> {
    use InteractionKind::*;
    IndexMap::from([
        (pair(1, 2), profile(0.8, 0.1, Reinforcing)),
        (pair(1, 3), profile(0.7, 0.2, Reinforcing)),
        (pair(1, 4), profile(0.4, 0.1, Neutral)),
        (pair(1, 5), profile(0.1, 0.6, Conflicting)),
        (pair(2, 3), profile(0.5, 0.2, Moderate)),
        (pair(2, 4), profile(0.6, 0.1, Moderate)),
        (pair(2, 5), profile(0.2, 0.5, Conflicting)),
        (pair(3, 4), profile(0.5, 0.1, Moderate)),
        (pair(3, 5), profile(0.1, 0.8, HighlyConflicting)),
        (pair(4, 5), profile(0.3, 0.2, Neutral)),
    ])
}

fn interaction_rules() -> Vec<InteractionRule> {
    vec![
        InteractionRule {
            id: "I_Q1Q2_1".into(),
            pair: pair(1, 2),
            condition: PairCondition::BothYes,
            label: "Paralisi assunzioni totale".to_string(),
            magnitude: -0.8,
            threshold: 0.7,
            sources: vec!["Q1_E2".into(), "Q2_E1".into()],
        },
        InteractionRule {
            id: "I_Q1Q3_1".into(),
            pair: pair(1, 3),
            condition: PairCondition::BothYes,
            label: "Shift massiccio verso partite IVA".to_string(),
            magnitude: 0.9,
            threshold: 0.6,
            sources: vec!["Q1_E2".into(), "Q3_E2".into()],
        },
        InteractionRule {
            id: "I_Q3Q5_1".into(),
            pair: pair(3, 5),
            condition: PairCondition::FirstYesSecondNo,
            label: "Discriminazione pre-cittadinanza".to_string(),
            magnitude: -0.7,
            threshold: 0.5,
            sources: vec!["Q3_E1".into()],
        },
        InteractionRule {
            id: "I_Q1Q4_1".into(),
            pair: pair(1, 4),
            condition: PairCondition::BothYes,
            label: "Internalizzazione forzata".to_string(),
            magnitude: 0.6,
            threshold: 0.6,
            sources: vec!["Q4_E2".into(), "Q1_E1".into()],
        },
        InteractionRule {
            id: "I_Q2Q4_1".into(),
            pair: pair(2, 4),
            condition: PairCondition::BothYes,
            label: "Crisi liquidità PMI subappaltatrici".to_string(),
            magnitude: -0.8,
            threshold: 0.7,
            sources: vec!["Q2_E1".into(), "Q4_E1".into()],
        },
    ]
}

fn emergent_rules() -> Vec<EmergentRule> {
    vec![
        EmergentRule {
            name: "labor_fortress".to_string(),
            trigger: vec![cond(1, true), cond(2, true), cond(3, true)],
            effects: vec![EmergentEffect {
                id: "EM_LF_1".into(),
                label: "Economia duale estrema".to_string(),
                description: "Separazione totale insider/outsider".to_string(),
                probability: 0.8,
                impact: ImpactVector {
                    economic: -0.7,
                    social: -0.9,
                    political: -0.6,
                },
            }],
        },
        EmergentRule {
            name: "inclusive_flexibility".to_string(),
            trigger: vec![cond(1, false), cond(2, true), cond(5, true)],
            effects: vec![EmergentEffect {
                id: "EM_IF_1".into(),
                label: "Hub innovazione mediterraneo".to_string(),
                description: "Attrazione talenti + flessibilità".to_string(),
                probability: 0.6,
                impact: ImpactVector {
                    economic: 0.8,
                    social: 0.7,
                    political: 0.5,
                },
            }],
        },
        EmergentRule {
            name: "regulatory_chaos".to_string(),
            trigger: vec![cond(1, true), cond(3, true), cond(4, true)],
            effects: vec![EmergentEffect {
                id: "EM_RC_1".into(),
                label: "Paralisi normativa".to_string(),
                description: "Impossibilità implementazione simultanea".to_string(),
                probability: 0.9,
                impact: ImpactVector {
                    economic: -0.6,
                    social: -0.4,
                    political: -0.8,
                },
            }],
        },
    ]
}

fn behavior_rules() -> Vec<BehaviorRule> {
    vec![
        BehaviorRule {
            kind: "labor_market_rigidity".to_string(),
            trigger: TriggerPattern::AllOf(vec![cond(1, true), cond(2, true), cond(3, true)]),
            probability: 0.8,
            impact: "Massive shift to gig economy".to_string(),
        },
        BehaviorRule {
            kind: "immigration_arbitrage".to_string(),
            trigger: TriggerPattern::AllOf(vec![cond(5, true), cond(1, false), cond(2, false)]),
            probability: 0.7,
            impact: "Preferential hiring of pre-citizenship immigrants".to_string(),
        },
        BehaviorRule {
            kind: "compliance_industrial_complex".to_string(),
            trigger: TriggerPattern::ExactYesCountWith {
                yes_count: 3,
                question: QuestionId(4),
            },
            probability: 0.6,
            impact: "New sector emergence for regulatory compliance".to_string(),
        },
    ]
}

fn chains() -> Vec<ChainTemplate> {
    vec![
        ChainTemplate {
            name: "assunzioni_collapse".to_string(),
            nodes: vec![
                "Q1_E2".into(),
                "Q3_E2".into(),
                "labor_shortage".into(),
                "wage_inflation".into(),
                "competitiveness_loss".into(),
            ],
            amplification: 1.5,
            damping: 0.1,
            time_constant_months: 12.0,
        },
        ChainTemplate {
            name: "pmi_extinction".to_string(),
            nodes: vec![
                "Q2_E1".into(),
                "Q4_E1".into(),
                "pmi_bankruptcy".into(),
                "market_concentration".into(),
                "oligopoly".into(),
            ],
            amplification: 1.3,
            damping: 0.2,
            time_constant_months: 24.0,
        },
        ChainTemplate {
            name: "integration_boost".to_string(),
            nodes: vec![
                "Q5_E1".into(),
                "Q5_E2".into(),
                "entrepreneurship_immigrant".into(),
                "innovation".into(),
                "gdp_growth".into(),
            ],
            amplification: 1.2,
            damping: 0.3,
            time_constant_months: 36.0,
        },
    ]
}

fn loop_templates() -> Vec<LoopTemplate> {
    vec![
        LoopTemplate {
            name: "negative_employment".to_string(),
            nodes: vec![
                "Q1_E2".into(),
                "unemployment".into(),
                "social_tension".into(),
                "political_pressure".into(),
                "Q1_reversal".into(),
            ],
            nominal_gain: -0.8,
            delay_months: 18.0,
            kind: LoopKind::Balancing,
        },
        LoopTemplate {
            name: "positive_exodus".to_string(),
            nodes: vec![
                "Q1_E3".into(),
                "youth_unemployment".into(),
                "brain_drain".into(),
                "innovation_loss".into(),
                "more_rigidity".into(),
            ],
            nominal_gain: 1.2,
            delay_months: 24.0,
            kind: LoopKind::Reinforcing,
        },
    ]
}

fn archetype(
    name: &str,
    pattern: [bool; 5],
    stability: f64,
    transformation: f64,
    risk: f64,
    opportunity: f64,
) -> Archetype {
    Archetype {
        name: name.to_string(),
        pattern,
        stability,
        transformation,
        risk,
        opportunity,
    }
}

const Y: bool = true;
const N: bool = false;

fn archetypes() -> Vec<Archetype> {
    vec![
        archetype("Status Quo Inerziale", [N, N, N, N, N], 0.9, 0.1, 0.3, 0.2),
        archetype("Shock Sistemico Totale", [Y, Y, Y, Y, Y], 0.1, 0.9, 0.9, 0.5),
        archetype("Fortezza del Lavoro", [Y, Y, Y, Y, N], 0.3, 0.7, 0.8, 0.3),
        archetype("Apertura Minimalista", [N, N, N, N, Y], 0.8, 0.2, 0.2, 0.4),
        archetype("Riforma Strategica", [Y, N, Y, N, Y], 0.6, 0.5, 0.4, 0.7),
        archetype("Capitalismo Inclusivo", [N, Y, N, Y, Y], 0.7, 0.4, 0.3, 0.8),
    ]
}

fn critical_paths() -> Vec<CriticalPath> {
    vec![
        CriticalPath {
            name: "Maximum Worker Protection".to_string(),
            sequence: [Y, Y, Y, Y, N],
            rationale: "All labor protections without immigration".to_string(),
            risk: "Very High".to_string(),
            reward: "Strong labor rights".to_string(),
        },
        CriticalPath {
            name: "Strategic Balance".to_string(),
            sequence: [Y, N, Y, N, Y],
            rationale: "Key reforms with manageable implementation".to_string(),
            risk: "Medium".to_string(),
            reward: "Sustainable change".to_string(),
        },
        CriticalPath {
            name: "Inclusive Flexibility".to_string(),
            sequence: [N, Y, N, Y, Y],
            rationale: "Maintain flexibility while improving safety and inclusion".to_string(),
            risk: "Low-Medium".to_string(),
            reward: "Economic dynamism".to_string(),
        },
    ]
}

/// The builtin 2025 referendum table set.
pub fn builtin() -> ReferenceTables {
    ReferenceTables {
        questions: questions(),
        interactions: interactions(),
        interaction_rules: interaction_rules(),
        emergent_rules: emergent_rules(),
        behavior_rules: behavior_rules(),
        chains: chains(),
        loop_templates: loop_templates(),
        archetypes: archetypes(),
        critical_paths: critical_paths(),
        macro_baseline: MacroState {
            gdp_baseline: 2107.7,
            employment_rate: 0.617,
            investment_confidence: 0.7,
            social_cohesion: 0.6,
            political_stability: 0.65,
            institutional_capacity: 0.55,
        },
        mc: McParams {
            default_runs: 1000,
            variance: 0.2,
            external_shocks: 0.1,
        },
    }
}

impl ReferenceTables {
    /// Convenience alias for [`builtin`].
    pub fn builtin() -> Self {
        builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_weights_sum_to_one() {
        let sum: f64 = builtin().questions.iter().map(|q| q.weight).sum();
        assert!((sum - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_builtin_covers_every_pair() {
        let tables = builtin();
        for pair in QuestionPair::all() {
            assert!(tables.interaction(pair).is_some(), "missing {pair}");
        }
    }

    #[test]
    fn test_builtin_validates_clean() {
        assert!(builtin().validate().is_empty());
    }

    #[test]
    fn test_builtin_has_no_gaps_in_rule_sources() {
        let tables = builtin();
        let known: Vec<_> = tables.immediate_effect_ids().cloned().collect();
        for rule in &tables.interaction_rules {
            for source in &rule.sources {
                assert!(known.contains(source), "{} names unknown {source}", rule.id);
            }
        }
    }
}
