//! Graph-level scoring
//!
//! Scalar summaries of a built network. The weights and normalization
//! constants are fixed design parameters.

use serde::{Deserialize, Serialize};

use crate::network::{CausalEdge, EffectNode, FeedbackLoop, LoopStability};

const COMPLEXITY_NORM: f64 = 100.0;
const INSTABILITY_NORM: f64 = 10.0;
const COMPLEXITY_WEIGHT: f64 = 0.3;
const INSTABILITY_WEIGHT: f64 = 0.4;
const SPEED_WEIGHT: f64 = 0.3;

/// Scalar metrics over one network.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NetworkMetrics {
    /// `|nodes| + 0.5*|edges| + 2*|loops|`.
    pub complexity: f64,
    /// Summed gain of reinforcing loops.
    pub instability: f64,
    /// Inverse of the mean delay over delayed edges; 1 when none carry a
    /// delay.
    pub propagation_speed: f64,
    /// Weighted blend of the above, clamped to `[0, 1]`. Unlike the raw
    /// third-order risk, this value never exceeds 1.
    pub systemic_risk: f64,
}

impl NetworkMetrics {
    pub fn score(nodes: &[EffectNode], edges: &[CausalEdge], loops: &[FeedbackLoop]) -> Self {
        let complexity = nodes.len() as f64 + 0.5 * edges.len() as f64 + 2.0 * loops.len() as f64;

        let instability: f64 = loops
            .iter()
            .filter(|l| l.stability == LoopStability::Reinforcing)
            .map(|l| l.gain)
            .sum();

        let delays: Vec<f64> = edges.iter().filter_map(|e| e.delay_months).collect();
        let propagation_speed = if delays.is_empty() {
            1.0
        } else {
            delays.len() as f64 / delays.iter().sum::<f64>()
        };

        let systemic_risk = (COMPLEXITY_WEIGHT * complexity / COMPLEXITY_NORM
            + INSTABILITY_WEIGHT * instability / INSTABILITY_NORM
            + SPEED_WEIGHT * propagation_speed)
            .min(1.0);

        Self {
            complexity,
            instability,
            propagation_speed,
            systemic_risk,
        }
    }
}
