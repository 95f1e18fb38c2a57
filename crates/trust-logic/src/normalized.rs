//! Normalized multi-agent scoring
//!
//! Each agent scores in `[0, 1]`:
//! - nobody betrays: everyone gets the baseline `k(0)`
//! - everybody betrays: everyone gets `1/p`
//! - otherwise betrayers get nothing and each truster gets `k(b) / (p - b)`

use thiserror::Error;

use crate::curve::PunishmentCurve;
use crate::decision::Decision;

#[derive(Debug, Error, PartialEq)]
pub enum ScoringError {
    #[error("cannot score a round with no decisions")]
    NoPlayers,

    #[error("round has {decisions} decisions but the curve was built for {players} players")]
    PlayerCountMismatch { decisions: usize, players: usize },

    #[error("invalid scoring input: {betrayals} betrayals among {players} players ({decision:?})")]
    InvalidArgument {
        players: usize,
        betrayals: usize,
        decision: Decision,
    },
}

/// Score a single decision given the round's player and betrayal counts.
pub fn score_decision(
    players: usize,
    betrayals: usize,
    decision: Decision,
    curve: &PunishmentCurve,
) -> Result<f64, ScoringError> {
    if players == 0 || betrayals > players {
        return Err(ScoringError::InvalidArgument { players, betrayals, decision });
    }

    let score = if betrayals == 0 {
        curve.coefficient(0)
    } else if betrayals == players {
        1.0 / players as f64
    } else if decision.is_betray() {
        0.0
    } else {
        curve.coefficient(betrayals) / (players - betrayals) as f64
    };
    Ok(score)
}

/// Score a whole round. Scores come back in the order of `decisions`.
pub fn compute_scores(
    decisions: &[Decision],
    curve: &PunishmentCurve,
) -> Result<Vec<f64>, ScoringError> {
    let players = decisions.len();
    if players == 0 {
        return Err(ScoringError::NoPlayers);
    }
    if players != curve.players() {
        return Err(ScoringError::PlayerCountMismatch {
            decisions: players,
            players: curve.players(),
        });
    }

    let betrayals = decisions.iter().filter(|d| d.is_betray()).count();
    decisions
        .iter()
        .map(|&d| score_decision(players, betrayals, d, curve))
        .collect()
}
