//! Cascade Engine
//!
//! Causal propagation and scenario scoring for a five-question referendum.
//! A vote vector is expanded into first-order effects, pairwise
//! interactions, emergent phenomena and a causal network with feedback
//! loops, then projected over a monthly horizon and stress-tested with a
//! seeded Monte Carlo perturbation.
//!
//! Everything is a pure function of the vote vector and the injected
//! [`cascade_tables::ReferenceTables`]; the only randomness is the Monte
//! Carlo estimator, driven by an explicit seed for reproducible runs.
//!
//! ```
//! use cascade_engine::{Engine, Votes};
//!
//! let engine = Engine::builtin();
//! let votes: Votes = "10110".parse().unwrap();
//! let result = engine.analyze(votes).unwrap();
//! assert_eq!(result.binary, "10110");
//! ```

pub mod analysis;
pub mod effects;
pub mod error;
pub mod metrics;
pub mod montecarlo;
pub mod network;
pub mod rng;
pub mod scenario;
pub mod timeline;
pub mod votes;

pub use analysis::{AnalysisOptions, Engine, ScenarioResult};
pub use effects::{
    first_order, second_order, third_order, Cascade, EmergentBehavior, FirstOrder, SecondOrder,
    ThirdOrder, TippingPoint,
};
pub use error::{Error, Result};
pub use metrics::NetworkMetrics;
pub use montecarlo::{run_monte_carlo, MetricStats, UncertaintyStats};
pub use network::{
    build_network, CausalEdge, EdgeKind, EffectNode, FeedbackLoop, LoopStability, Network,
    NodeKind,
};
pub use rng::RngStream;
pub use scenario::{
    nearest_archetype, recommendations, ArchetypeMatch, Priority, Recommendation, Recommendations,
};
pub use timeline::{network_time_series, project_timeline, NetworkSnapshot, TimelinePoint};
pub use votes::Votes;
