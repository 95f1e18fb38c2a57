//! Punishment-reduction curves
//!
//! A curve maps the number of betrayers in a round to the size of the payoff
//! pool `k(b)` that the remaining trusters share. Every curve starts at the
//! baseline `k0 = 1/P` when nobody betrays.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Curvature used by the quadratic curve unless configured otherwise
pub const DEFAULT_CURVATURE: f64 = 0.2;

/// Curve shape, as named in configuration
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CurveKind {
    #[default]
    Linear,
    Quadratic,
}

#[derive(Debug, Error, PartialEq)]
pub enum CurveError {
    #[error("a punishment curve needs at least one player")]
    NoPlayers,

    #[error("curvature must be finite, got {0}")]
    InvalidCurvature(f64),

    #[error(
        "{kind:?} curve with {players} players and curvature {curvature} gives trusters \
         {payoff} at {betrayals} betrayals, outside (0, 1]"
    )]
    PayoffOutOfRange {
        kind: CurveKind,
        players: usize,
        curvature: f64,
        betrayals: usize,
        payoff: f64,
    },
}

/// A punishment curve bound to a player count
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PunishmentCurve {
    kind: CurveKind,
    players: usize,
    curvature: f64,
}

impl PunishmentCurve {
    /// Build and validate a curve for `players` agents.
    ///
    /// Rejects shapes whose truster payoff `k(b) / (P - b)` leaves `(0, 1]`
    /// for some `0 < b < P`. The quadratic formula does this at larger `P`.
    /// `curvature` only applies to the quadratic curve; linear curves store 0.
    pub fn new(kind: CurveKind, players: usize, curvature: f64) -> Result<Self, CurveError> {
        if players == 0 {
            return Err(CurveError::NoPlayers);
        }
        let curvature = match kind {
            CurveKind::Linear => 0.0,
            CurveKind::Quadratic if curvature.is_finite() => curvature,
            CurveKind::Quadratic => return Err(CurveError::InvalidCurvature(curvature)),
        };

        let curve = Self { kind, players, curvature };
        for betrayals in 1..players {
            let payoff = curve.coefficient(betrayals) / (players - betrayals) as f64;
            if !(payoff > 0.0 && payoff <= 1.0) {
                return Err(CurveError::PayoffOutOfRange {
                    kind,
                    players,
                    curvature,
                    betrayals,
                    payoff,
                });
            }
        }
        Ok(curve)
    }

    pub fn linear(players: usize) -> Result<Self, CurveError> {
        Self::new(CurveKind::Linear, players, 0.0)
    }

    pub fn quadratic(players: usize, curvature: f64) -> Result<Self, CurveError> {
        Self::new(CurveKind::Quadratic, players, curvature)
    }

    pub fn kind(&self) -> CurveKind {
        self.kind
    }

    pub fn players(&self) -> usize {
        self.players
    }

    pub fn curvature(&self) -> f64 {
        self.curvature
    }

    /// Payoff when nobody betrays: `1/P`
    pub fn baseline(&self) -> f64 {
        1.0 / self.players as f64
    }

    /// Pool coefficient `k(b)` for `betrayals` betrayers
    pub fn coefficient(&self, betrayals: usize) -> f64 {
        let k0 = self.baseline();
        if betrayals == 0 {
            return k0;
        }

        let b = betrayals as f64;
        let p = self.players as f64;
        match self.kind {
            // Exactly 1 at b = P - 1; rounding can overshoot by an ulp
            CurveKind::Linear => ((1.0 - k0) * b / (p - 1.0) + k0).min(1.0),
            CurveKind::Quadratic => {
                let a = self.curvature;
                a * b * b + (1.0 - k0) * b / p - a * (p - 1.0) * b + k0
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-12;

    #[test]
    fn test_baseline_is_one_over_players() {
        for players in 1..=6 {
            let curve = PunishmentCurve::linear(players).unwrap();
            assert!((curve.coefficient(0) - 1.0 / players as f64).abs() < EPS);
            assert_eq!(curve.coefficient(0), curve.baseline());
        }
    }

    #[test]
    fn test_quadratic_baseline_matches_linear() {
        for players in 2..=4 {
            let linear = PunishmentCurve::linear(players).unwrap();
            let quadratic = PunishmentCurve::quadratic(players, DEFAULT_CURVATURE).unwrap();
            assert_eq!(linear.coefficient(0), quadratic.coefficient(0));
        }
    }

    #[test]
    fn test_linear_endpoints() {
        let curve = PunishmentCurve::linear(3).unwrap();
        assert!((curve.coefficient(1) - 2.0 / 3.0).abs() < EPS);
        // Reaches a full pool when all but one betray
        assert!((curve.coefficient(2) - 1.0).abs() < EPS);

        let curve = PunishmentCurve::linear(10).unwrap();
        assert!((curve.coefficient(9) - 1.0).abs() < EPS);
    }

    #[test]
    fn test_linear_is_monotonic() {
        let curve = PunishmentCurve::linear(8).unwrap();
        for b in 1..8 {
            assert!(curve.coefficient(b) > curve.coefficient(b - 1));
        }
    }

    #[test]
    fn test_quadratic_values() {
        // P = 3, k0 = 1/3, a = 0.2
        let curve = PunishmentCurve::quadratic(3, 0.2).unwrap();
        let k1 = 0.2 + (2.0 / 3.0) / 3.0 - 0.2 * 2.0 + 1.0 / 3.0;
        let k2 = 0.2 * 4.0 + (2.0 / 3.0) * 2.0 / 3.0 - 0.2 * 2.0 * 2.0 + 1.0 / 3.0;
        assert!((curve.coefficient(1) - k1).abs() < EPS);
        assert!((curve.coefficient(2) - k2).abs() < EPS);
    }

    #[test]
    fn test_zero_curvature_quadratic_is_positive() {
        let curve = PunishmentCurve::quadratic(6, 0.0).unwrap();
        for b in 1..6 {
            assert!(curve.coefficient(b) > 0.0);
        }
    }

    #[test]
    fn test_single_player_curve() {
        let curve = PunishmentCurve::linear(1).unwrap();
        assert_eq!(curve.coefficient(0), 1.0);
    }

    #[test]
    fn test_rejects_no_players() {
        assert_eq!(PunishmentCurve::linear(0), Err(CurveError::NoPlayers));
    }

    #[test]
    fn test_rejects_non_finite_curvature() {
        assert!(matches!(
            PunishmentCurve::quadratic(3, f64::NAN),
            Err(CurveError::InvalidCurvature(_))
        ));
        assert!(matches!(
            PunishmentCurve::quadratic(3, f64::INFINITY),
            Err(CurveError::InvalidCurvature(_))
        ));
    }

    #[test]
    fn test_rejects_quadratic_that_goes_negative() {
        // k(1) = 0.2 + 0.16 - 0.8 + 0.2 < 0
        let err = PunishmentCurve::quadratic(5, 0.2).unwrap_err();
        match err {
            CurveError::PayoffOutOfRange { players, betrayals, payoff, .. } => {
                assert_eq!(players, 5);
                assert_eq!(betrayals, 1);
                assert!(payoff < 0.0);
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_linear_accepts_any_player_count() {
        for players in 1..=50 {
            assert!(PunishmentCurve::linear(players).is_ok(), "P = {}", players);
        }
    }

    #[test]
    fn test_linear_full_pool_is_exactly_one() {
        // (1 - 1/37) * 36 / 36 + 1/37 rounds to 1.0000000000000002 unclamped
        let curve = PunishmentCurve::linear(37).unwrap();
        assert_eq!(curve.coefficient(36), 1.0);

        for players in 2..=200 {
            let curve = PunishmentCurve::linear(players).unwrap();
            assert!(curve.coefficient(players - 1) <= 1.0, "P = {}", players);
        }
    }

    #[test]
    fn test_linear_ignores_curvature() {
        let curve = PunishmentCurve::new(CurveKind::Linear, 3, 0.7).unwrap();
        assert_eq!(curve.curvature(), 0.0);
        assert_eq!(curve, PunishmentCurve::linear(3).unwrap());

        let curve = PunishmentCurve::new(CurveKind::Linear, 3, f64::NAN).unwrap();
        assert_eq!(curve.curvature(), 0.0);
        assert_eq!(PunishmentCurve::linear(4).unwrap().curvature(), 0.0);
    }
}
