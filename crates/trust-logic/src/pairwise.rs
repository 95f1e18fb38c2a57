//! Fixed two-player payoff table with running totals

use serde::{Deserialize, Serialize};

use crate::decision::Decision;

/// Payoff table for the classic two-player game
/// Returns (mine, yours)
pub fn score_pair(mine: Decision, yours: Decision) -> (u32, u32) {
    match (mine, yours) {
        (Decision::Trust, Decision::Trust) => (1, 1),
        (Decision::Trust, Decision::Betray) => (3, 0),
        (Decision::Betray, Decision::Trust) => (0, 3),
        (Decision::Betray, Decision::Betray) => (2, 2),
    }
}

/// Session-lifetime totals for the two-player table
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunningScore {
    pub mine: u64,
    pub yours: u64,
}

impl RunningScore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Score one round, add it to the totals and return the deltas
    pub fn record(&mut self, mine: Decision, yours: Decision) -> (u32, u32) {
        let (mine_delta, yours_delta) = score_pair(mine, yours);
        self.mine = self.mine.saturating_add(u64::from(mine_delta));
        self.yours = self.yours.saturating_add(u64::from(yours_delta));
        (mine_delta, yours_delta)
    }
}
