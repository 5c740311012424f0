//! Analysis facade
//!
//! Ties the calculators together behind one entry point. An [`Engine`]
//! holds only the read-only reference tables; every analysis call builds
//! its own result values, so engines are freely shareable across threads.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use cascade_tables::{CriticalPath, QuestionId, ReferenceTables};

use crate::effects::{first_order, second_order, third_order, FirstOrder, SecondOrder, ThirdOrder};
use crate::error::{Error, Result};
use crate::montecarlo::{run_monte_carlo, UncertaintyStats};
use crate::network::{build_network, Network};
use crate::rng::RngStream;
use crate::scenario::{nearest_archetype, recommendations, ArchetypeMatch, Recommendations};
use crate::timeline::{network_time_series, project_timeline, NetworkSnapshot, TimelinePoint};
use crate::votes::Votes;

/// Default projection horizon in months.
pub const DEFAULT_MONTHS: u32 = 60;
/// Default Monte Carlo trial count.
pub const DEFAULT_ITERATIONS: usize = 100;
/// Default root seed.
pub const DEFAULT_SEED: u64 = 0x0CA5_CADE;

/// Tunable parameters of one analysis run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisOptions {
    pub months: u32,
    pub iterations: usize,
    pub seed: u64,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            months: DEFAULT_MONTHS,
            iterations: DEFAULT_ITERATIONS,
            seed: DEFAULT_SEED,
        }
    }
}

impl AnalysisOptions {
    fn validate(&self) -> Result<()> {
        if self.months < 1 {
            return Err(Error::InvalidHorizon);
        }
        if self.iterations < 1 {
            return Err(Error::InvalidIterations);
        }
        Ok(())
    }
}

/// The full analysis bundle for one vote vector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub votes: Votes,
    pub binary: String,
    pub archetype: ArchetypeMatch,
    /// Total population touched by the questions that passed.
    pub affected_population: u64,
    pub first_order: FirstOrder,
    pub second_order: SecondOrder,
    pub third_order: ThirdOrder,
    pub uncertainty: UncertaintyStats,
    pub timeline: Vec<TimelinePoint>,
    pub recommendations: Recommendations,
}

/// Stateless analysis engine over a fixed table set.
#[derive(Debug, Clone)]
pub struct Engine {
    tables: ReferenceTables,
}

impl Engine {
    /// Wrap a table set, logging any configuration gaps. Gaps degrade the
    /// affected rules at analysis time; they do not fail construction.
    pub fn new(tables: ReferenceTables) -> Self {
        let gaps = tables.log_gaps();
        info!(gaps, "engine initialized");
        Self { tables }
    }

    /// Engine over the built-in Italian referendum dataset.
    pub fn builtin() -> Self {
        Self::new(ReferenceTables::builtin())
    }

    pub fn tables(&self) -> &ReferenceTables {
        &self.tables
    }

    /// Full analysis with default options.
    pub fn analyze(&self, votes: Votes) -> Result<ScenarioResult> {
        self.analyze_with(votes, AnalysisOptions::default())
    }

    /// Full analysis bundle: effects, archetype, uncertainty, timeline and
    /// recommendations.
    #[instrument(skip(self), fields(votes = %votes))]
    pub fn analyze_with(&self, votes: Votes, options: AnalysisOptions) -> Result<ScenarioResult> {
        options.validate()?;

        let first = first_order(&self.tables, votes);
        let second = second_order(&self.tables, votes);
        let third = third_order(&self.tables, votes, &first, &second);

        let mut rng = RngStream::derive(options.seed, "montecarlo");
        let uncertainty = run_monte_carlo(&self.tables, votes, options.iterations, &mut rng);
        let timeline = project_timeline(&first, &second, &third, options.months);

        let affected_population = votes
            .iter()
            .filter(|(_, yes)| *yes)
            .map(|(q, _)| self.tables.question(q).affected_population)
            .sum();

        debug!(
            systemic_risk = third.systemic_risk,
            affected_population, "analysis complete"
        );

        Ok(ScenarioResult {
            binary: votes.binary(),
            archetype: nearest_archetype(&self.tables, votes),
            affected_population,
            recommendations: recommendations(votes, &third),
            uncertainty,
            timeline,
            first_order: first,
            second_order: second,
            third_order: third,
            votes,
        })
    }

    /// Graph-only view of one vote vector.
    pub fn causal_network(&self, votes: Votes) -> Network {
        build_network(&self.tables, votes)
    }

    /// Month-by-month evolution of the causal network.
    pub fn network_time_series(&self, votes: Votes, months: u32) -> Result<Vec<NetworkSnapshot>> {
        if months < 1 {
            return Err(Error::InvalidHorizon);
        }
        let network = build_network(&self.tables, votes);
        Ok(network_time_series(&network, months))
    }

    /// Standalone uncertainty estimation.
    pub fn monte_carlo(
        &self,
        votes: Votes,
        iterations: usize,
        seed: u64,
    ) -> Result<UncertaintyStats> {
        if iterations < 1 {
            return Err(Error::InvalidIterations);
        }
        let mut rng = RngStream::derive(seed, "montecarlo");
        Ok(run_monte_carlo(&self.tables, votes, iterations, &mut rng))
    }

    /// Degree centrality of each question over the interaction table: the
    /// sum of synergy and conflict mass on every pair it participates in.
    pub fn question_centrality(&self) -> IndexMap<QuestionId, f64> {
        let mut centrality: IndexMap<QuestionId, f64> =
            QuestionId::all().map(|q| (q, 0.0)).collect();

        for (pair, profile) in &self.tables.interactions {
            let mass = profile.synergy + profile.conflict;
            for q in [pair.lo(), pair.hi()] {
                if let Some(value) = centrality.get_mut(&q) {
                    *value += mass;
                }
            }
        }

        centrality
    }

    /// Curated vote sequences through the decision space.
    pub fn critical_paths(&self) -> &[CriticalPath] {
        &self.tables.critical_paths
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn votes(pattern: &str) -> Votes {
        pattern.parse().unwrap()
    }

    #[test]
    fn test_invalid_options_rejected() {
        let engine = Engine::builtin();
        let bad_months = AnalysisOptions {
            months: 0,
            ..AnalysisOptions::default()
        };
        assert!(matches!(
            engine.analyze_with(votes("10000"), bad_months),
            Err(Error::InvalidHorizon)
        ));

        let bad_iterations = AnalysisOptions {
            iterations: 0,
            ..AnalysisOptions::default()
        };
        assert!(matches!(
            engine.analyze_with(votes("10000"), bad_iterations),
            Err(Error::InvalidIterations)
        ));

        assert!(matches!(
            engine.monte_carlo(votes("10000"), 0, 1),
            Err(Error::InvalidIterations)
        ));
        assert!(matches!(
            engine.network_time_series(votes("10000"), 0),
            Err(Error::InvalidHorizon)
        ));
    }

    #[test]
    fn test_affected_population_sums_yes_questions() {
        let engine = Engine::builtin();
        let result = engine.analyze(votes("10001")).unwrap();
        // Q1 (3.5M) + Q5 (1.2M)
        assert_eq!(result.affected_population, 4_700_000);

        let result = engine.analyze(votes("00000")).unwrap();
        assert_eq!(result.affected_population, 0);
    }

    #[test]
    fn test_centrality_counts_both_endpoints() {
        let engine = Engine::builtin();
        let centrality = engine.question_centrality();
        assert_eq!(centrality.len(), 5);

        // every pair contributes its mass to exactly two questions
        let total: f64 = centrality.values().sum();
        let pair_mass: f64 = engine
            .tables()
            .interactions
            .values()
            .map(|p| p.synergy + p.conflict)
            .sum();
        assert!((total - 2.0 * pair_mass).abs() < 1e-9);
    }

    #[test]
    fn test_timeline_length_follows_options() {
        let engine = Engine::builtin();
        let options = AnalysisOptions {
            months: 24,
            iterations: 10,
            seed: 1,
        };
        let result = engine.analyze_with(votes("10110"), options).unwrap();
        assert_eq!(result.timeline.len(), 25);
    }
}
