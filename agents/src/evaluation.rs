use mancala_core::{Board, Pit, Side};
use serde::{Deserialize, Serialize};

use crate::position::Position;

/// Score of a position the perspective player has won.
pub const WIN_SCORE: f64 = 100.0;
/// Score of a position the perspective player has lost.
pub const LOSS_SCORE: f64 = 0.0;
/// Score of an undecided, balanced position.
pub const NEUTRAL_SCORE: f64 = 50.0;

/// Static evaluation of a position from a fixed player's point of view.
///
/// Must be defined for every reachable position, terminal ones included, and
/// grow with how good the position is for `perspective`.
pub trait Evaluator<P: Position> {
    fn score(&self, board: &P, perspective: Side) -> f64;
}

impl<P, F> Evaluator<P> for F
where
    P: Position,
    F: Fn(&P, Side) -> f64,
{
    fn score(&self, board: &P, perspective: Side) -> f64 {
        self(board, perspective)
    }
}

/// Win/loss detector: 100 for a win, 0 for a loss, 50 otherwise.
#[derive(Debug, Clone, Copy, Default)]
pub struct BaselineEvaluator;

impl<P: Position> Evaluator<P> for BaselineEvaluator {
    fn score(&self, board: &P, perspective: Side) -> f64 {
        if board.has_won(perspective) {
            WIN_SCORE
        } else if board.has_won(perspective.opponent()) {
            LOSS_SCORE
        } else {
            NEUTRAL_SCORE
        }
    }
}

/// Weights of the Mancala heuristic blend.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeuristicWeights {
    /// Stones already in the store
    pub banked: f64,
    /// Stones still on the player's row
    pub in_play: f64,
    /// Stones the next sowings would hand to the other row
    pub exposure: f64,
    /// Largest capture available on the next move
    pub capture: f64,
    /// Blend value mapped to about three quarters of the way to a win
    pub scale: f64,
}

impl Default for HeuristicWeights {
    fn default() -> Self {
        Self {
            banked: 2.0,
            in_play: 1.0,
            exposure: 0.5,
            capture: 0.5,
            scale: 24.0,
        }
    }
}

/// Per-player features the heuristic compares.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SideFeatures {
    pub banked: f64,
    pub in_play: f64,
    pub exposure: f64,
    pub capture: f64,
}

impl SideFeatures {
    pub fn measure(board: &Board, side: Side) -> Self {
        let mut exposure = 0;
        let mut capture = 0;
        for preview in Pit::all().filter_map(|pit| board.preview(side, pit)) {
            exposure += preview.stones_to_opponent;
            capture = capture.max(preview.capture);
        }

        Self {
            banked: f64::from(board.store(side)),
            in_play: f64::from(board.stones_in_play(side)),
            exposure: f64::from(exposure),
            capture: f64::from(capture),
        }
    }
}

/// Mancala heuristic.
///
/// Decided games (including a store holding more than half of all stones,
/// which can no longer be caught) score exactly [`WIN_SCORE`] or
/// [`LOSS_SCORE`]. Everything else is a weighted difference of
/// [`SideFeatures`] squashed into the range 1..=99, so a detected
/// win always outranks any blended score.
#[derive(Debug, Clone, Copy, Default)]
pub struct MancalaEvaluator {
    weights: HeuristicWeights,
}

impl MancalaEvaluator {
    pub fn new(weights: HeuristicWeights) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> &HeuristicWeights {
        &self.weights
    }

    /// Weighted feature difference before squashing; positive favours `perspective`.
    pub fn blend(&self, board: &Board, perspective: Side) -> f64 {
        let own = SideFeatures::measure(board, perspective);
        let theirs = SideFeatures::measure(board, perspective.opponent());
        let w = &self.weights;

        w.banked * (own.banked - theirs.banked) + w.in_play * (own.in_play - theirs.in_play)
            - w.exposure * (own.exposure - theirs.exposure)
            + w.capture * (own.capture - theirs.capture)
    }

    fn clinched(board: &Board, side: Side) -> bool {
        board.has_won(side) || u32::from(board.store(side)) > board.total_stones() / 2
    }
}

impl Evaluator<Board> for MancalaEvaluator {
    fn score(&self, board: &Board, perspective: Side) -> f64 {
        if Self::clinched(board, perspective) {
            return WIN_SCORE;
        }
        if Self::clinched(board, perspective.opponent()) {
            return LOSS_SCORE;
        }

        let scale = if self.weights.scale > 0.0 {
            self.weights.scale
        } else {
            HeuristicWeights::default().scale
        };
        let spread = (WIN_SCORE - NEUTRAL_SCORE) - 1.0;
        NEUTRAL_SCORE + spread * (self.blend(board, perspective) / scale).tanh()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mancala_core::PITS;

    #[test]
    fn test_baseline_scores() {
        let evaluator = BaselineEvaluator;
        let won = Board::from_parts([0; PITS], 30, [0; PITS], 18);
        assert_eq!(evaluator.score(&won, Side::One), WIN_SCORE);
        assert_eq!(evaluator.score(&won, Side::Two), LOSS_SCORE);
        assert_eq!(evaluator.score(&Board::new(), Side::One), NEUTRAL_SCORE);

        let drawn = Board::from_parts([0; PITS], 24, [0; PITS], 24);
        assert_eq!(evaluator.score(&drawn, Side::One), NEUTRAL_SCORE);
    }

    #[test]
    fn test_closure_evaluator() {
        let evaluator = |board: &Board, side: Side| f64::from(board.store(side));
        let board = Board::from_parts([1; PITS], 7, [1; PITS], 3);
        assert_eq!(evaluator.score(&board, Side::One), 7.0);
        assert_eq!(evaluator.score(&board, Side::Two), 3.0);
    }

    #[test]
    fn test_start_is_neutral() {
        let evaluator = MancalaEvaluator::default();
        let board = Board::new();
        assert_eq!(evaluator.score(&board, Side::One), NEUTRAL_SCORE);
        assert_eq!(evaluator.score(&board, Side::Two), NEUTRAL_SCORE);
    }

    #[test]
    fn test_win_dominates_blend() {
        let evaluator = MancalaEvaluator::default();

        // Finished game won by player 1
        let won = Board::from_parts([0; PITS], 26, [0; PITS], 22);
        assert_eq!(evaluator.score(&won, Side::One), WIN_SCORE);
        assert_eq!(evaluator.score(&won, Side::Two), LOSS_SCORE);

        // Player 2 has clinched more than half the stones mid-game
        let clinched = Board::from_parts([6, 6, 6, 6, 0, 0], 0, [0, 0, 0, 0, 0, 1], 26);
        assert_eq!(evaluator.score(&clinched, Side::Two), WIN_SCORE);
        assert_eq!(evaluator.score(&clinched, Side::One), LOSS_SCORE);
    }

    #[test]
    fn test_blend_stays_inside_win_loss_bounds() {
        let weights = HeuristicWeights {
            banked: 100.0,
            ..HeuristicWeights::default()
        };
        let evaluator = MancalaEvaluator::new(weights);
        let lopsided = Board::from_parts([1, 0, 0, 0, 0, 0], 24, [0, 0, 0, 0, 0, 23], 0);

        let own = evaluator.score(&lopsided, Side::One);
        let theirs = evaluator.score(&lopsided, Side::Two);
        assert!(own > NEUTRAL_SCORE && own < WIN_SCORE);
        assert!(theirs < NEUTRAL_SCORE && theirs > LOSS_SCORE);
    }

    #[test]
    fn test_score_is_zero_sum_around_neutral() {
        let evaluator = MancalaEvaluator::default();
        let board = Board::from_parts([2, 1, 0, 1, 2, 3], 5, [1, 1, 1, 6, 2, 3], 7);
        let one = evaluator.score(&board, Side::One);
        let two = evaluator.score(&board, Side::Two);
        assert!((one + two - 2.0 * NEUTRAL_SCORE).abs() < 1e-9);
    }

    #[test]
    fn test_features() {
        let board = Board::from_parts([2, 1, 0, 1, 2, 9], 4, [1, 1, 1, 7, 1, 1], 0);
        let features = SideFeatures::measure(&board, Side::One);
        assert_eq!(features.banked, 4.0);
        assert_eq!(features.in_play, 15.0);
        // Only pit 6 reaches the other row
        assert_eq!(features.exposure, 6.0);
        // Pit 1 lands in empty pit 3 opposite seven stones
        assert_eq!(features.capture, 7.0);
    }

    #[test]
    fn test_capture_threat_is_rewarded() {
        let evaluator = MancalaEvaluator::default();
        let threat = Board::from_parts([2, 1, 0, 1, 2, 3], 0, [1, 1, 1, 6, 2, 3], 0);
        let quiet = Board::from_parts([2, 1, 1, 1, 2, 2], 0, [1, 1, 1, 6, 2, 3], 0);
        let threatening = evaluator.score(&threat, Side::One);
        assert!(threatening > evaluator.score(&quiet, Side::One));
    }

    #[test]
    fn test_largest_starting_position_scores_neutral() {
        let board = Board::with_stones(mancala_core::MAX_STARTING_STONES);
        let evaluator = MancalaEvaluator::default();
        assert_eq!(evaluator.score(&board, Side::One), NEUTRAL_SCORE);
        assert_eq!(evaluator.score(&board, Side::Two), NEUTRAL_SCORE);
    }
}
