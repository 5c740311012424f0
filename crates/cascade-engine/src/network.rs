//! Causal network builder
//!
//! Assembles the directed graph of effect nodes and causal edges for one
//! vote vector: first-order nodes, interaction nodes with amplification
//! edges, emergent nodes with emergence edges, causal-chain overlays, and
//! detected feedback loops. The network is a pure function of (votes,
//! tables); no randomness enters here.

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, trace, warn};

use cascade_tables::{
    ChainTemplate, EffectCategory, EffectId, ImpactVector, PairCondition, QuestionId,
    ReferenceTables,
};

use crate::metrics::NetworkMetrics;
use crate::votes::Votes;

/// Shape of the per-step chain-edge delay falloff.
const CHAIN_DELAY_FALLOFF: f64 = 0.3;
/// Minimum number of present template nodes for a chain to activate.
const CHAIN_MIN_ACTIVE: usize = 2;

/// What kind of effect a node represents, with the variant-specific payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "order")]
pub enum NodeKind {
    /// Immediate consequence of one question passing.
    FirstOrder {
        question: QuestionId,
        magnitude: f64,
        latency_months: u32,
        category: EffectCategory,
    },
    /// Pairwise interaction effect amplified by its source effects.
    Interaction {
        magnitude: f64,
        sources: Vec<EffectId>,
    },
    /// Multi-question emergent phenomenon.
    Emergent {
        description: String,
        probability: f64,
        impact: ImpactVector,
    },
}

/// A discrete causal event in the network.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectNode {
    pub id: EffectId,
    pub label: String,
    #[serde(flatten)]
    pub kind: NodeKind,
}

impl EffectNode {
    /// Months before this node starts activating. Interaction and emergent
    /// nodes activate immediately.
    pub fn latency_months(&self) -> u32 {
        match &self.kind {
            NodeKind::FirstOrder { latency_months, .. } => *latency_months,
            NodeKind::Interaction { .. } | NodeKind::Emergent { .. } => 0,
        }
    }
}

/// Relation type of a causal edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeKind {
    Amplification,
    Emergence,
    CausalChain,
}

/// Directed relation between two effect identifiers.
///
/// Sources and targets may be synthetic (chain placeholders, trigger
/// tokens) and are not required to resolve to a built node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CausalEdge {
    pub source: EffectId,
    pub target: EffectId,
    pub kind: EdgeKind,
    pub weight: f64,
    pub delay_months: Option<f64>,
}

/// Stability classification of a detected loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoopStability {
    Reinforcing,
    Balancing,
}

/// A feedback cycle found by traversing edges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackLoop {
    pub nodes: Vec<EffectId>,
    /// Product of the traversed edge weights.
    pub gain: f64,
    /// Sum of the traversed edge delays.
    pub delay_months: f64,
    pub stability: LoopStability,
}

/// One analysis result: nodes, edges, detected loops and graph metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Network {
    pub nodes: Vec<EffectNode>,
    pub edges: Vec<CausalEdge>,
    pub loops: Vec<FeedbackLoop>,
    pub metrics: NetworkMetrics,
}

impl Network {
    /// Look up a node by id.
    pub fn node(&self, id: &EffectId) -> Option<&EffectNode> {
        self.nodes.iter().find(|n| &n.id == id)
    }

    pub fn contains_node(&self, id: &EffectId) -> bool {
        self.node(id).is_some()
    }
}

/// Build the full causal network for a vote vector.
#[instrument(skip(tables), fields(votes = %votes))]
pub fn build_network(tables: &ReferenceTables, votes: Votes) -> Network {
    let mut nodes: Vec<EffectNode> = Vec::new();
    let mut edges: Vec<CausalEdge> = Vec::new();
    let mut seen: IndexSet<EffectId> = IndexSet::new();

    push_first_order(tables, votes, &mut nodes, &mut seen);
    apply_interaction_rules(tables, votes, &mut nodes, &mut edges, &mut seen);
    apply_emergent_rules(tables, votes, &mut nodes, &mut edges, &mut seen);
    overlay_chains(tables, &seen, &mut edges);

    let loops = detect_loops(&nodes, &edges);
    let metrics = NetworkMetrics::score(&nodes, &edges, &loops);

    debug!(
        nodes = nodes.len(),
        edges = edges.len(),
        loops = loops.len(),
        "network built"
    );

    Network {
        nodes,
        edges,
        loops,
        metrics,
    }
}

fn push_node(node: EffectNode, nodes: &mut Vec<EffectNode>, seen: &mut IndexSet<EffectId>) {
    if !seen.insert(node.id.clone()) {
        warn!(id = %node.id, "duplicate node id, skipped");
        return;
    }
    nodes.push(node);
}

fn push_first_order(
    tables: &ReferenceTables,
    votes: Votes,
    nodes: &mut Vec<EffectNode>,
    seen: &mut IndexSet<EffectId>,
) {
    for (question, yes) in votes.iter() {
        if !yes {
            continue;
        }
        for effect in &tables.question(question).immediate_effects {
            push_node(
                EffectNode {
                    id: effect.id.clone(),
                    label: effect.label.clone(),
                    kind: NodeKind::FirstOrder {
                        question,
                        magnitude: effect.magnitude,
                        latency_months: effect.latency_months,
                        category: effect.category,
                    },
                },
                nodes,
                seen,
            );
        }
    }
}

/// `None` when either question is off the ballot, a table-data fault the
/// caller logs and skips.
fn condition_holds(
    condition: PairCondition,
    votes: Votes,
    lo: QuestionId,
    hi: QuestionId,
) -> Option<bool> {
    let (a, b) = (votes.get(lo)?, votes.get(hi)?);
    Some(match condition {
        PairCondition::BothYes => a && b,
        PairCondition::BothNo => !a && !b,
        PairCondition::FirstYesSecondNo => a && !b,
        PairCondition::FirstNoSecondYes => !a && b,
    })
}

fn apply_interaction_rules(
    tables: &ReferenceTables,
    votes: Votes,
    nodes: &mut Vec<EffectNode>,
    edges: &mut Vec<CausalEdge>,
    seen: &mut IndexSet<EffectId>,
) {
    for rule in &tables.interaction_rules {
        match condition_holds(rule.condition, votes, rule.pair.lo(), rule.pair.hi()) {
            Some(true) => {}
            Some(false) => continue,
            None => {
                warn!(rule = %rule.id, pair = %rule.pair, "out-of-range question, rule skipped");
                continue;
            }
        }
        trace!(rule = %rule.id, "interaction rule active");

        push_node(
            EffectNode {
                id: rule.id.clone(),
                label: rule.label.clone(),
                kind: NodeKind::Interaction {
                    magnitude: rule.magnitude,
                    sources: rule.sources.clone(),
                },
            },
            nodes,
            seen,
        );

        for source in &rule.sources {
            edges.push(CausalEdge {
                source: source.clone(),
                target: rule.id.clone(),
                kind: EdgeKind::Amplification,
                weight: rule.magnitude.abs(),
                delay_months: None,
            });
        }
    }
}

fn apply_emergent_rules(
    tables: &ReferenceTables,
    votes: Votes,
    nodes: &mut Vec<EffectNode>,
    edges: &mut Vec<CausalEdge>,
    seen: &mut IndexSet<EffectId>,
) {
    for rule in &tables.emergent_rules {
        let mut triggered = !rule.trigger.is_empty();
        for condition in &rule.trigger {
            match votes.get(condition.question) {
                Some(yes) => triggered &= yes == condition.expected_yes,
                None => {
                    warn!(
                        rule = %rule.name,
                        question = %condition.question,
                        "out-of-range question in trigger, rule skipped"
                    );
                    triggered = false;
                }
            }
            if !triggered {
                break;
            }
        }
        if !triggered {
            continue;
        }
        trace!(rule = %rule.name, "emergent rule triggered");

        for effect in &rule.effects {
            push_node(
                EffectNode {
                    id: effect.id.clone(),
                    label: effect.label.clone(),
                    kind: NodeKind::Emergent {
                        description: effect.description.clone(),
                        probability: effect.probability,
                        impact: effect.impact,
                    },
                },
                nodes,
                seen,
            );

            for condition in &rule.trigger {
                edges.push(CausalEdge {
                    source: EffectId::trigger_token(condition.question, condition.expected_yes),
                    target: effect.id.clone(),
                    kind: EdgeKind::Emergence,
                    weight: effect.probability,
                    delay_months: None,
                });
            }
        }
    }
}

/// Chain strength given how many of its template nodes are present.
fn chain_strength(chain: &ChainTemplate, active: usize) -> f64 {
    chain.amplification.powi(active as i32 - 1) * (1.0 - chain.damping * active as f64)
}

fn overlay_chains(tables: &ReferenceTables, seen: &IndexSet<EffectId>, edges: &mut Vec<CausalEdge>) {
    for chain in &tables.chains {
        let active = chain.nodes.iter().filter(|id| seen.contains(*id)).count();
        if active < CHAIN_MIN_ACTIVE {
            continue;
        }

        let strength = chain_strength(chain, active);
        trace!(chain = %chain.name, active, strength, "chain active");

        // Edges span the full template so downstream placeholders stay
        // linked, not only the nodes currently present.
        for (step, link) in chain.nodes.windows(2).enumerate() {
            edges.push(CausalEdge {
                source: link[0].clone(),
                target: link[1].clone(),
                kind: EdgeKind::CausalChain,
                weight: strength,
                delay_months: Some(
                    chain.time_constant_months * (-(step as f64) * CHAIN_DELAY_FALLOFF).exp(),
                ),
            });
        }
    }
}

/// Best-effort feedback-loop detection.
///
/// One depth-first pass per unvisited node; the first repeated id on the
/// current path closes a cycle. This finds at most one cycle per starting
/// node and is not an exhaustive cycle enumeration.
pub fn detect_loops(nodes: &[EffectNode], edges: &[CausalEdge]) -> Vec<FeedbackLoop> {
    let mut adjacency: IndexMap<&EffectId, Vec<&CausalEdge>> = IndexMap::new();
    for edge in edges {
        adjacency.entry(&edge.source).or_default().push(edge);
    }

    let mut loops = Vec::new();
    let mut visited: IndexSet<EffectId> = IndexSet::new();

    for node in nodes {
        if visited.contains(&node.id) {
            continue;
        }
        let mut path = Vec::new();
        if let Some(cycle) = find_cycle(&node.id, &adjacency, &mut visited, &mut path) {
            loops.push(analyze_loop(cycle, edges));
        }
    }

    loops
}

fn find_cycle(
    id: &EffectId,
    adjacency: &IndexMap<&EffectId, Vec<&CausalEdge>>,
    visited: &mut IndexSet<EffectId>,
    path: &mut Vec<EffectId>,
) -> Option<Vec<EffectId>> {
    if let Some(pos) = path.iter().position(|p| p == id) {
        return Some(path[pos..].to_vec());
    }

    visited.insert(id.clone());
    path.push(id.clone());

    if let Some(outgoing) = adjacency.get(id) {
        for edge in outgoing {
            if let Some(cycle) = find_cycle(&edge.target, adjacency, visited, path) {
                return Some(cycle);
            }
        }
    }

    path.pop();
    None
}

fn analyze_loop(cycle: Vec<EffectId>, edges: &[CausalEdge]) -> FeedbackLoop {
    let mut gain = 1.0;
    let mut delay_months = 0.0;

    for i in 0..cycle.len() {
        let source = &cycle[i];
        let target = &cycle[(i + 1) % cycle.len()];
        if let Some(edge) = edges
            .iter()
            .find(|e| &e.source == source && &e.target == target)
        {
            gain *= edge.weight;
            delay_months += edge.delay_months.unwrap_or(0.0);
        }
    }

    let stability = if gain > 1.0 {
        LoopStability::Reinforcing
    } else {
        LoopStability::Balancing
    };

    FeedbackLoop {
        nodes: cycle,
        gain,
        delay_months,
        stability,
    }
}
