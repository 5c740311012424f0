//! Cascade Reference Tables
//!
//! Immutable configuration for the referendum cascade engine: question
//! definitions, pairwise interaction profiles, emergent-phenomena rules,
//! causal-chain templates, feedback-loop templates, scenario archetypes and
//! the macro-state baseline.
//!
//! The schema (this crate's types) is separate from the data (the builtin
//! dataset or any JSON-loaded replacement), so table contents can be swapped
//! per-referendum without touching engine logic. Tables are loaded once and
//! injected into the engine as a read-only value.

pub mod builtin;
pub mod ids;
pub mod schema;
pub mod validate;

pub use ids::{EffectId, QuestionId, QuestionPair};
pub use schema::{
    Archetype, BehaviorRule, ChainTemplate, CriticalPath, EffectCategory, EmergentEffect,
    EmergentRule, ImmediateEffect, ImpactVector, InteractionKind, InteractionRule, LoopKind,
    LoopTemplate, MacroState, McParams, PairCondition, PairProfile, Question, ReferenceTables,
    TriggerPattern, VoteCondition,
};
pub use validate::ConfigGap;

/// Number of referendum questions. The entire engine is shaped around
/// exactly five yes/no items.
pub const QUESTION_COUNT: usize = 5;

/// Errors raised while loading a table set.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to parse reference tables: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Result type for table loading.
pub type Result<T> = std::result::Result<T, Error>;
