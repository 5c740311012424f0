//! Time projection
//!
//! Two complementary projections over a monthly horizon: a network-level
//! evolution that activates nodes and edges as their latencies and delays
//! elapse, and an aggregate projection that applies per-class exponential
//! decay to the scalar effect totals.

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use cascade_tables::EffectId;

use crate::effects::{FirstOrder, SecondOrder, ThirdOrder};
use crate::network::Network;

/// Months until a node reaches ~63% activation.
const NODE_ACTIVATION_TAU: f64 = 6.0;
/// Months until an edge reaches ~63% of its weight.
const EDGE_ACTIVATION_TAU: f64 = 12.0;

const IMMEDIATE_TAU: f64 = 6.0;
const MEDIUM_TAU: f64 = 24.0;
const LONG_TAU: f64 = 60.0;
const EMPLOYMENT_TAU: f64 = 18.0;
const STABILITY_TAU: f64 = 36.0;
const IMPLEMENTATION_TAU: f64 = 12.0;

/// A node that has started activating by some month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeActivation {
    pub id: EffectId,
    /// `1 - e^(-(t - latency) / 6)`, in `[0, 1)`.
    pub activation: f64,
}

/// An edge that has started transmitting by some month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeActivation {
    pub source: EffectId,
    pub target: EffectId,
    /// `weight * (1 - e^(-(t - delay) / 12))`.
    pub strength: f64,
}

/// Per-snapshot graph metrics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SnapshotMetrics {
    /// Active nodes plus half the active edges.
    pub active_complexity: f64,
    /// Sum of node activation levels.
    pub total_activation: f64,
    /// Active edges over possible undirected node pairs. With fewer than
    /// two active nodes this degenerates to the raw edge count.
    pub density: f64,
}

/// Network state at one month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkSnapshot {
    pub month: u32,
    pub active_nodes: Vec<NodeActivation>,
    pub active_edges: Vec<EdgeActivation>,
    pub metrics: SnapshotMetrics,
}

/// Evolve a built network month by month, from 0 through `months` inclusive.
#[instrument(skip(network), fields(nodes = network.nodes.len(), months))]
pub fn network_time_series(network: &Network, months: u32) -> Vec<NetworkSnapshot> {
    let mut series = Vec::with_capacity(months as usize + 1);

    for month in 0..=months {
        let t = month as f64;

        let active_nodes: Vec<NodeActivation> = network
            .nodes
            .iter()
            .filter(|node| node.latency_months() as f64 <= t)
            .map(|node| NodeActivation {
                id: node.id.clone(),
                activation: 1.0 - (-(t - node.latency_months() as f64) / NODE_ACTIVATION_TAU).exp(),
            })
            .collect();

        let active_edges: Vec<EdgeActivation> = network
            .edges
            .iter()
            .filter(|edge| edge.delay_months.unwrap_or(0.0) <= t)
            .map(|edge| {
                let delay = edge.delay_months.unwrap_or(0.0);
                EdgeActivation {
                    source: edge.source.clone(),
                    target: edge.target.clone(),
                    strength: edge.weight * (1.0 - (-(t - delay) / EDGE_ACTIVATION_TAU).exp()),
                }
            })
            .collect();

        let metrics = snapshot_metrics(&active_nodes, &active_edges);
        series.push(NetworkSnapshot {
            month,
            active_nodes,
            active_edges,
            metrics,
        });
    }

    debug!(snapshots = series.len(), "network time series projected");
    series
}

fn snapshot_metrics(nodes: &[NodeActivation], edges: &[EdgeActivation]) -> SnapshotMetrics {
    let n = nodes.len() as f64;
    let pairs = n * (n - 1.0) / 2.0;
    let density = if pairs > 0.0 {
        edges.len() as f64 / pairs
    } else {
        edges.len() as f64
    };

    SnapshotMetrics {
        active_complexity: n + 0.5 * edges.len() as f64,
        total_activation: nodes.iter().map(|a| a.activation).sum(),
        density,
    }
}

/// Aggregate projection for one month.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimelinePoint {
    pub month: u32,
    pub gdp_impact: f64,
    pub employment_impact: f64,
    pub stability_index: f64,
    /// `1 - e^(-t/12)`, strictly increasing.
    pub implementation_progress: f64,
}

/// Project the scalar effect totals over a monthly horizon.
///
/// Three decay classes drive the GDP impact: first-order economic effects
/// fade fastest, the pairwise synergy/conflict balance on a medium horizon,
/// and transformation potential slowest.
#[instrument(skip(first, second, third))]
pub fn project_timeline(
    first: &FirstOrder,
    second: &SecondOrder,
    third: &ThirdOrder,
    months: u32,
) -> Vec<TimelinePoint> {
    (0..=months)
        .map(|month| {
            let t = month as f64;
            let immediate = first.economic * (-t / IMMEDIATE_TAU).exp();
            let medium = (second.synergies - second.conflicts) * (-t / MEDIUM_TAU).exp();
            let long = third.transformation_potential * (-t / LONG_TAU).exp();

            TimelinePoint {
                month,
                gdp_impact: immediate + medium + long,
                employment_impact: (first.social - second.conflicts) * (-t / EMPLOYMENT_TAU).exp(),
                stability_index: 1.0 - third.systemic_risk * (1.0 - (-t / STABILITY_TAU).exp()),
                implementation_progress: 1.0 - (-t / IMPLEMENTATION_TAU).exp(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::{first_order, second_order, third_order};
    use crate::network::build_network;
    use cascade_tables::ReferenceTables;

    fn tables() -> ReferenceTables {
        ReferenceTables::builtin()
    }

    fn series(pattern: &str, months: u32) -> Vec<NetworkSnapshot> {
        let network = build_network(&tables(), pattern.parse().unwrap());
        network_time_series(&network, months)
    }

    #[test]
    fn test_series_covers_horizon_inclusive() {
        let series = series("10000", 24);
        assert_eq!(series.len(), 25);
        assert_eq!(series[0].month, 0);
        assert_eq!(series[24].month, 24);
    }

    #[test]
    fn test_nodes_activate_after_latency() {
        let series = series("10000", 6);

        // Q1_E2 carries a 3-month latency and starts at zero activation
        let at = |month: usize, id: &str| {
            series[month]
                .active_nodes
                .iter()
                .find(|n| n.id == id.into())
                .map(|n| n.activation)
        };

        assert_eq!(at(2, "Q1_E2"), None);
        assert!((at(3, "Q1_E2").unwrap()).abs() < 1e-12);
        assert!(at(4, "Q1_E2").unwrap() > 0.0);

        // zero-latency node activates from month 0
        assert!((at(0, "Q1_E1").unwrap()).abs() < 1e-12);
        assert!((at(6, "Q1_E1").unwrap() - (1.0 - (-1.0f64).exp())).abs() < 1e-12);
    }

    #[test]
    fn test_node_activation_monotonic() {
        let series = series("11111", 60);
        for window in series.windows(2) {
            assert!(window[1].metrics.total_activation >= window[0].metrics.total_activation);
        }
    }

    #[test]
    fn test_density_guard_without_node_pairs() {
        // empty network: no nodes, no edges, density falls back to edge count
        let series = series("00000", 3);
        assert_eq!(series[0].metrics.density, 0.0);
        assert_eq!(series[0].metrics.active_complexity, 0.0);
    }

    fn aggregate(pattern: &str, months: u32) -> Vec<TimelinePoint> {
        let t = tables();
        let votes = pattern.parse().unwrap();
        let first = first_order(&t, votes);
        let second = second_order(&t, votes);
        let third = third_order(&t, votes, &first, &second);
        project_timeline(&first, &second, &third, months)
    }

    #[test]
    fn test_implementation_progress_strictly_increasing() {
        let timeline = aggregate("10110", 60);
        for window in timeline.windows(2) {
            assert!(window[1].implementation_progress > window[0].implementation_progress);
        }
        assert_eq!(timeline[0].implementation_progress, 0.0);
    }

    #[test]
    fn test_gdp_impact_decays_toward_zero() {
        let timeline = aggregate("10000", 600);
        let first = timeline[0].gdp_impact;
        let last = timeline[600].gdp_impact;
        assert!(first > 0.0);
        assert!(last.abs() < first.abs() * 0.01);
    }

    #[test]
    fn test_stability_starts_at_one_and_declines_with_risk() {
        let timeline = aggregate("11111", 60);
        assert_eq!(timeline[0].stability_index, 1.0);
        // all-yes risk exceeds 1, so stability drops below zero eventually
        assert!(timeline[60].stability_index < timeline[0].stability_index);
    }

    #[test]
    fn test_all_no_aggregate_is_flat_zero_impact() {
        let timeline = aggregate("00000", 12);
        for point in &timeline {
            assert_eq!(point.gdp_impact, 0.0);
            assert_eq!(point.employment_impact, 0.0);
            assert_eq!(point.stability_index, 1.0);
        }
    }
}
