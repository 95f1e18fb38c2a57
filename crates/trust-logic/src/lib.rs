//! Trust-or-Betray game logic
//!
//! Core of an iterated, multi-agent Prisoner's Dilemma. Every round each agent
//! trusts or betrays; one of two payoff models turns the round into scores:
//! - the classic fixed two-player table, accumulated over the session
//! - a normalized N-player payoff shaped by a punishment-reduction curve

mod curve;
mod decision;
mod game;
mod normalized;
mod pairwise;
mod random;
mod strategy;

pub use curve::{CurveError, CurveKind, PunishmentCurve, DEFAULT_CURVATURE};
pub use decision::{parse_decision, Decision, Dialect};
pub use game::{Game, GameConfigError, GameError, PayoffModel, Play, RoundResult, RoundScores};
pub use normalized::{compute_scores, score_decision, ScoringError};
pub use pairwise::{score_pair, RunningScore};
pub use random::agent_rng;
pub use strategy::{
    Agent, AgentError, AgentKind, AlwaysBetray, AlwaysTrust, Interactive, UniformRandom,
    UnknownAgentKind,
};
