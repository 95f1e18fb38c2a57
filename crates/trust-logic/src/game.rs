//! Round execution engine

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::curve::{CurveError, CurveKind, PunishmentCurve};
use crate::decision::Decision;
use crate::normalized::{compute_scores, ScoringError};
use crate::pairwise::RunningScore;
use crate::strategy::{Agent, AgentError};

/// Which payoff model a game is scored with
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "model", rename_all = "snake_case")]
pub enum PayoffModel {
    /// Fixed two-player table, accumulated over the session
    Pairwise,
    /// Per-round normalized payoffs shaped by a punishment curve
    Normalized { curve: CurveKind, curvature: f64 },
}

/// One agent's move in a round
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Play {
    pub agent: String,
    pub decision: Decision,
}

/// Scores of a single round
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "model", rename_all = "snake_case")]
pub enum RoundScores {
    Pairwise { deltas: [u32; 2], totals: RunningScore },
    Normalized { scores: Vec<f64> },
}

/// Result of a single round
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoundResult {
    pub round: u64,
    pub plays: Vec<Play>,
    pub scores: RoundScores,
}

#[derive(Debug, Error, PartialEq)]
pub enum GameConfigError {
    #[error("the pairwise table needs exactly 2 agents, got {0}")]
    PairwiseAgentCount(usize),

    #[error("normalized scoring needs at least 2 agents, got {0}")]
    NormalizedAgentCount(usize),

    #[error(transparent)]
    Curve(#[from] CurveError),
}

#[derive(Debug, Error)]
pub enum GameError {
    #[error("agent {agent} could not decide")]
    Agent {
        agent: String,
        #[source]
        source: AgentError,
    },

    #[error(transparent)]
    Scoring(#[from] ScoringError),
}

enum Scoring {
    Pairwise(RunningScore),
    Normalized(PunishmentCurve),
}

/// A session: a fixed line-up of agents bound to one payoff model
pub struct Game {
    agents: Vec<Box<dyn Agent>>,
    labels: Vec<String>,
    scoring: Scoring,
    round: u64,
}

impl Game {
    /// Bind `model` to the line-up.
    ///
    /// The normalized model builds its curve for exactly `agents.len()`
    /// players.
    pub fn new(agents: Vec<Box<dyn Agent>>, model: PayoffModel) -> Result<Self, GameConfigError> {
        let scoring = match model {
            PayoffModel::Pairwise => {
                if agents.len() != 2 {
                    return Err(GameConfigError::PairwiseAgentCount(agents.len()));
                }
                Scoring::Pairwise(RunningScore::new())
            }
            PayoffModel::Normalized { curve, curvature } => {
                if agents.len() < 2 {
                    return Err(GameConfigError::NormalizedAgentCount(agents.len()));
                }
                Scoring::Normalized(PunishmentCurve::new(curve, agents.len(), curvature)?)
            }
        };

        let labels = label_agents(&agents);
        info!(agents = ?labels, ?model, "game configured");

        Ok(Self { agents, labels, scoring, round: 0 })
    }

    /// Display labels, in line-up order. Repeated names get a number.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Totals so far, for pairwise games
    pub fn running_score(&self) -> Option<RunningScore> {
        match &self.scoring {
            Scoring::Pairwise(score) => Some(*score),
            Scoring::Normalized(_) => None,
        }
    }

    /// Curve in use, for normalized games
    pub fn curve(&self) -> Option<&PunishmentCurve> {
        match &self.scoring {
            Scoring::Pairwise(_) => None,
            Scoring::Normalized(curve) => Some(curve),
        }
    }

    pub fn rounds_played(&self) -> u64 {
        self.round
    }

    /// Collect one decision from every agent, in order, then score them
    pub fn play_round(&mut self) -> Result<RoundResult, GameError> {
        let mut decisions = Vec::with_capacity(self.agents.len());
        for (agent, label) in self.agents.iter_mut().zip(&self.labels) {
            let decision = agent.decide().map_err(|source| GameError::Agent {
                agent: label.clone(),
                source,
            })?;
            decisions.push(decision);
        }

        let scores = match &mut self.scoring {
            Scoring::Pairwise(totals) => {
                let (mine, yours) = totals.record(decisions[0], decisions[1]);
                RoundScores::Pairwise { deltas: [mine, yours], totals: *totals }
            }
            Scoring::Normalized(curve) => RoundScores::Normalized {
                scores: compute_scores(&decisions, curve)?,
            },
        };

        self.round += 1;
        debug!(round = self.round, ?decisions, ?scores, "round complete");

        let plays = self
            .labels
            .iter()
            .zip(decisions)
            .map(|(agent, decision)| Play { agent: agent.clone(), decision })
            .collect();

        Ok(RoundResult { round: self.round, plays, scores })
    }
}

impl fmt::Debug for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Game")
            .field("agents", &self.labels)
            .field("round", &self.round)
            .finish_non_exhaustive()
    }
}

fn label_agents(agents: &[Box<dyn Agent>]) -> Vec<String> {
    agents
        .iter()
        .enumerate()
        .map(|(i, agent)| {
            let name = agent.name();
            if agents.iter().filter(|a| a.name() == name).count() == 1 {
                return name.to_string();
            }
            let n = agents[..i].iter().filter(|a| a.name() == name).count() + 1;
            format!("{} {}", name, n)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::DEFAULT_CURVATURE;
    use crate::decision::Dialect;
    use crate::strategy::{AlwaysBetray, AlwaysTrust, Interactive};
    use std::io::Cursor;
    use Decision::{Betray, Trust};

    /// Plays a fixed sequence of decisions
    struct Scripted {
        moves: Vec<Decision>,
        next: usize,
    }

    impl Scripted {
        fn boxed(moves: &[Decision]) -> Box<dyn Agent> {
            Box::new(Self { moves: moves.to_vec(), next: 0 })
        }
    }

    impl Agent for Scripted {
        fn decide(&mut self) -> Result<Decision, AgentError> {
            let m = self.moves[self.next % self.moves.len()];
            self.next += 1;
            Ok(m)
        }

        fn name(&self) -> &str {
            "Scripted"
        }
    }

    fn linear() -> PayoffModel {
        PayoffModel::Normalized { curve: CurveKind::Linear, curvature: DEFAULT_CURVATURE }
    }

    #[test]
    fn test_pairwise_game_accumulates() {
        let agents = vec![
            Scripted::boxed(&[Trust, Betray]),
            Box::new(AlwaysTrust) as Box<dyn Agent>,
        ];
        let mut game = Game::new(agents, PayoffModel::Pairwise).unwrap();

        let r1 = game.play_round().unwrap();
        assert_eq!(r1.round, 1);
        assert_eq!(
            r1.scores,
            RoundScores::Pairwise { deltas: [1, 1], totals: RunningScore { mine: 1, yours: 1 } }
        );

        let r2 = game.play_round().unwrap();
        assert_eq!(r2.round, 2);
        assert_eq!(r2.plays[0].decision, Betray);
        assert_eq!(
            r2.scores,
            RoundScores::Pairwise { deltas: [0, 3], totals: RunningScore { mine: 1, yours: 4 } }
        );
        assert_eq!(game.running_score(), Some(RunningScore { mine: 1, yours: 4 }));
        assert_eq!(game.rounds_played(), 2);
    }

    #[test]
    fn test_normalized_game_scores_in_order() {
        let agents = vec![
            Box::new(AlwaysTrust) as Box<dyn Agent>,
            Box::new(AlwaysBetray),
            Box::new(AlwaysTrust),
        ];
        let mut game = Game::new(agents, linear()).unwrap();
        assert_eq!(game.curve().map(|c| c.players()), Some(3));
        assert_eq!(game.running_score(), None);

        let result = game.play_round().unwrap();
        let decisions: Vec<Decision> = result.plays.iter().map(|p| p.decision).collect();
        assert_eq!(decisions, [Trust, Betray, Trust]);

        match result.scores {
            RoundScores::Normalized { scores } => {
                assert!((scores[0] - 1.0 / 3.0).abs() < 1e-12);
                assert_eq!(scores[1], 0.0);
                assert!((scores[2] - 1.0 / 3.0).abs() < 1e-12);
            }
            other => panic!("unexpected scores {:?}", other),
        }
    }

    #[test]
    fn test_pairwise_requires_two_agents() {
        let agents = vec![
            Box::new(AlwaysTrust) as Box<dyn Agent>,
            Box::new(AlwaysTrust),
            Box::new(AlwaysTrust),
        ];
        assert_eq!(
            Game::new(agents, PayoffModel::Pairwise).err(),
            Some(GameConfigError::PairwiseAgentCount(3))
        );
    }

    #[test]
    fn test_normalized_requires_two_agents() {
        let agents = vec![Box::new(AlwaysTrust) as Box<dyn Agent>];
        assert_eq!(
            Game::new(agents, linear()).err(),
            Some(GameConfigError::NormalizedAgentCount(1))
        );
    }

    #[test]
    fn test_invalid_curve_stops_the_game() {
        let agents: Vec<Box<dyn Agent>> = (0..5)
            .map(|_| Box::new(AlwaysTrust) as Box<dyn Agent>)
            .collect();
        let model = PayoffModel::Normalized { curve: CurveKind::Quadratic, curvature: 0.2 };
        assert!(matches!(
            Game::new(agents, model),
            Err(GameConfigError::Curve(CurveError::PayoffOutOfRange { .. }))
        ));
    }

    #[test]
    fn test_agent_failure_names_the_agent() {
        let human = Interactive::new(Cursor::new(Vec::new()), Vec::new(), Dialect::Trust);
        let agents = vec![Box::new(AlwaysTrust) as Box<dyn Agent>, Box::new(human)];
        let mut game = Game::new(agents, PayoffModel::Pairwise).unwrap();

        match game.play_round() {
            Err(GameError::Agent { agent, source: AgentError::InputClosed }) => {
                assert_eq!(agent, "Human")
            }
            other => panic!("unexpected result {:?}", other.map(|r| r.round)),
        }
        assert_eq!(game.rounds_played(), 0);
        assert_eq!(game.running_score(), Some(RunningScore::default()));
    }

    #[test]
    fn test_repeated_names_are_numbered() {
        let agents = vec![
            Box::new(AlwaysTrust) as Box<dyn Agent>,
            Box::new(AlwaysBetray),
            Box::new(AlwaysTrust),
            Box::new(AlwaysTrust),
        ];
        let game = Game::new(agents, linear()).unwrap();
        assert_eq!(game.labels(), ["Fool 1", "Traitor", "Fool 2", "Fool 3"]);
    }

    #[test]
    fn test_round_result_serializes() {
        let agents = vec![Box::new(AlwaysBetray) as Box<dyn Agent>, Box::new(AlwaysTrust)];
        let mut game = Game::new(agents, PayoffModel::Pairwise).unwrap();
        let result = game.play_round().unwrap();

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["round"], 1);
        assert_eq!(json["plays"][0]["agent"], "Traitor");
        assert_eq!(json["plays"][0]["decision"], "betray");
        assert_eq!(json["scores"]["model"], "pairwise");
        assert_eq!(json["scores"]["deltas"][1], 3);

        let back: RoundResult = serde_json::from_value(json).unwrap();
        assert_eq!(back, result);
    }
}
