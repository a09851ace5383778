//! The "custom" policy: iterative-deepening alpha-beta under a wall-clock budget.
//!
//! Unlike [`crate::AlphaBeta`] this search follows Mancala's extra-turn rule
//! (the mover keeps the turn after ending in their own store), orders moves by
//! their static score and stops when the budget runs out. An iteration that
//! is interrupted is thrown away; the last completed depth decides.

use std::time::{Duration, Instant};

use mancala_core::{Board, Pit, Side};
use tracing::{debug, info};

use crate::evaluation::{Evaluator, MancalaEvaluator, LOSS_SCORE, NEUTRAL_SCORE, WIN_SCORE};
use crate::search::{SearchResult, SearchStats};
use crate::{Agent, AgentError};

/// Per-decision budget of the custom player.
pub const DEFAULT_BUDGET: Duration = Duration::from_secs(10);
pub const DEFAULT_MAX_DEPTH: u8 = 32;
const TIME_CHECK_INTERVAL: u64 = 256; // Check the clock every 256 nodes
const ORDERING_MIN_DEPTH: u8 = 2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeepeningResult {
    pub result: SearchResult<Pit>,
    /// Deepest fully searched iteration (0 when only the fallback move is known)
    pub depth: u8,
    /// The budget ran out before `max_depth` was reached
    pub stopped: bool,
    pub stats: SearchStats,
}

pub struct DeepeningSearch<'e, E> {
    evaluator: &'e E,
    deadline: Instant,
    stats: SearchStats,
    stopped: bool,
}

impl<'e, E: Evaluator<Board>> DeepeningSearch<'e, E> {
    pub fn new(evaluator: &'e E, budget: Duration) -> Self {
        Self {
            evaluator,
            deadline: Instant::now() + budget,
            stats: SearchStats::default(),
            stopped: false,
        }
    }

    fn should_stop(&mut self) -> bool {
        if self.stopped {
            return true;
        }
        if self.stats.nodes % TIME_CHECK_INTERVAL == 0 && Instant::now() >= self.deadline {
            self.stopped = true;
        }
        self.stopped
    }

    fn evaluate(&mut self, board: &Board, perspective: Side) -> f64 {
        self.stats.evaluations += 1;
        self.evaluator.score(board, perspective)
    }

    /// Deepens from one ply up to `max_depth` until the budget is spent or
    /// the game is decided.
    pub fn search(&mut self, board: &Board, side: Side, max_depth: u8) -> DeepeningResult {
        let moves = board.legal_moves(side);
        let Some(&first) = moves.first() else {
            return DeepeningResult {
                result: SearchResult::no_move(),
                depth: 0,
                stopped: false,
                stats: self.stats,
            };
        };

        let mut best = SearchResult {
            score: self.evaluate(board, side),
            best_move: Some(first),
        };
        let mut completed = 0;

        for depth in 1..=max_depth.max(1) {
            // Always finish one ply, whatever the budget.
            if depth > 1 && Instant::now() >= self.deadline {
                self.stopped = true;
                break;
            }

            let iteration = self.root(board, side, depth, best.best_move);
            if self.stopped {
                break;
            }
            best = iteration;
            completed = depth;
            debug!(
                depth,
                score = best.score,
                nodes = self.stats.nodes,
                "iteration complete"
            );

            if best.score >= WIN_SCORE || best.score <= LOSS_SCORE {
                break;
            }
        }

        DeepeningResult {
            result: best,
            depth: completed,
            stopped: self.stopped,
            stats: self.stats,
        }
    }

    fn root(
        &mut self,
        board: &Board,
        side: Side,
        depth: u8,
        pv_move: Option<Pit>,
    ) -> SearchResult<Pit> {
        let moves = self.ordered_moves(board, side, depth, pv_move);
        let mut alpha = f64::NEG_INFINITY;
        let mut best = SearchResult {
            score: f64::NEG_INFINITY,
            best_move: moves.first().copied(),
        };

        for pit in moves {
            let Ok(outcome) = board.play(side, pit) else {
                continue;
            };
            let next = if outcome.extra_turn { side } else { side.opponent() };
            let score = self.value(&outcome.board, next, depth - 1, side, alpha, f64::INFINITY);
            if self.stopped {
                break;
            }
            if score > best.score {
                best = SearchResult {
                    score,
                    best_move: Some(pit),
                };
            }
            alpha = alpha.max(best.score);
        }
        best
    }

    fn value(
        &mut self,
        board: &Board,
        mover: Side,
        depth: u8,
        perspective: Side,
        mut alpha: f64,
        mut beta: f64,
    ) -> f64 {
        self.stats.nodes += 1;
        if self.should_stop() {
            return NEUTRAL_SCORE;
        }
        if depth == 0 || board.is_game_over() {
            return self.evaluate(board, perspective);
        }

        let maximizing = mover == perspective;
        let mut value = if maximizing {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };

        for pit in self.ordered_moves(board, mover, depth, None) {
            let Ok(outcome) = board.play(mover, pit) else {
                continue;
            };
            let next = if outcome.extra_turn {
                mover
            } else {
                mover.opponent()
            };
            let score = self.value(&outcome.board, next, depth - 1, perspective, alpha, beta);
            if self.stopped {
                return value;
            }

            if maximizing {
                value = value.max(score);
                alpha = alpha.max(value);
            } else {
                value = value.min(score);
                beta = beta.min(value);
            }
            if alpha >= beta {
                self.stats.cutoffs += 1;
                break;
            }
        }
        value
    }

    /// Best-looking moves first, judged by the mover's static score of the
    /// resulting position. The previous iteration's choice leads at the root.
    fn ordered_moves(
        &mut self,
        board: &Board,
        mover: Side,
        depth: u8,
        pv_move: Option<Pit>,
    ) -> Vec<Pit> {
        let mut moves = board.legal_moves(mover);
        if depth >= ORDERING_MIN_DEPTH {
            let mut scored: Vec<(Pit, f64)> = moves
                .iter()
                .map(|&pit| (pit, self.evaluator.score(&board.apply_move(mover, pit), mover)))
                .collect();
            scored.sort_by(|a, b| b.1.total_cmp(&a.1));
            moves = scored.into_iter().map(|(pit, _)| pit).collect();
        }

        if let Some(pv) = pv_move {
            if let Some(index) = moves.iter().position(|&pit| pit == pv) {
                moves[..=index].rotate_right(1);
            }
        }
        moves
    }
}

pub struct CustomAgent<E = MancalaEvaluator> {
    name: String,
    budget: Duration,
    max_depth: u8,
    evaluator: E,
}

impl CustomAgent<MancalaEvaluator> {
    pub fn new(budget: Duration) -> Self {
        Self::with_evaluator(budget, DEFAULT_MAX_DEPTH, MancalaEvaluator::default())
    }
}

impl<E> CustomAgent<E> {
    pub fn with_evaluator(budget: Duration, max_depth: u8, evaluator: E) -> Self {
        CustomAgent {
            name: format!("Custom(time={}ms)", budget.as_millis()),
            budget,
            max_depth,
            evaluator,
        }
    }
}

impl<E: Evaluator<Board>> Agent for CustomAgent<E> {
    fn best_move(&mut self, board: &Board, side: Side) -> Result<Option<Pit>, AgentError> {
        let mut search = DeepeningSearch::new(&self.evaluator, self.budget);
        let outcome = search.search(board, side, self.max_depth);

        if let Some(pit) = outcome.result.best_move {
            info!(
                player = %side,
                pit = %pit,
                score = outcome.result.score,
                depth = outcome.depth,
                nodes = outcome.stats.nodes,
                stopped = outcome.stopped,
                "chose move"
            );
        }
        Ok(outcome.result.best_move)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mancala_core::PITS;

    #[test]
    fn test_finds_clinching_move_at_depth_one() {
        let board = Board::from_parts([1, 0, 0, 0, 0, 1], 24, [1; PITS], 17);
        let evaluator = MancalaEvaluator::default();
        let mut search = DeepeningSearch::new(&evaluator, DEFAULT_BUDGET);
        let outcome = search.search(&board, Side::One, 8);

        assert_eq!(outcome.result.score, WIN_SCORE);
        assert_eq!(outcome.depth, 1);
        assert!(!outcome.stopped);
        assert!(board.is_legal(Side::One, outcome.result.best_move.unwrap()));
    }

    #[test]
    fn test_zero_budget_still_completes_one_ply() {
        let board = Board::new();
        let evaluator = MancalaEvaluator::default();
        let mut search = DeepeningSearch::new(&evaluator, Duration::ZERO);
        let outcome = search.search(&board, Side::One, 10);

        assert_eq!(outcome.depth, 1);
        assert!(outcome.stopped);
        assert!(board.is_legal(Side::One, outcome.result.best_move.unwrap()));
    }

    #[test]
    fn test_respects_max_depth() {
        let board = Board::new();
        let evaluator = MancalaEvaluator::default();
        let mut search = DeepeningSearch::new(&evaluator, DEFAULT_BUDGET);
        let outcome = search.search(&board, Side::Two, 3);

        assert_eq!(outcome.depth, 3);
        assert!(!outcome.stopped);
        assert!(outcome.stats.nodes > 0);
    }

    #[test]
    fn test_no_moves() {
        let board = Board::from_parts([0; PITS], 24, [0; PITS], 24);
        let evaluator = MancalaEvaluator::default();
        let mut search = DeepeningSearch::new(&evaluator, DEFAULT_BUDGET);
        let outcome = search.search(&board, Side::One, 4);
        assert!(outcome.result.is_no_move());

        let mut agent = CustomAgent::new(Duration::from_millis(50));
        assert_eq!(agent.best_move(&board, Side::One).unwrap(), None);
    }

    #[test]
    fn test_pv_move_searched_first() {
        let board = Board::new();
        let evaluator = MancalaEvaluator::default();
        let mut search = DeepeningSearch::new(&evaluator, DEFAULT_BUDGET);
        let pv = Pit::new(4).unwrap();
        let moves = search.ordered_moves(&board, Side::One, 1, Some(pv));
        assert_eq!(moves[0], pv);
        assert_eq!(moves.len(), PITS);
    }

    #[test]
    fn test_agent_plays_legal_move() {
        let board = Board::from_parts([2, 1, 0, 1, 2, 3], 5, [1, 1, 1, 6, 2, 3], 7);
        let mut agent = CustomAgent::with_evaluator(
            Duration::from_millis(200),
            4,
            MancalaEvaluator::default(),
        );
        let pit = agent.best_move(&board, Side::One).unwrap().unwrap();
        assert!(board.is_legal(Side::One, pit));
        assert_eq!(agent.name(), "Custom(time=200ms)");
    }

    #[test]
    fn test_unscorable_positions_still_yield_a_move() {
        let board = Board::new();
        let evaluator = |_: &Board, _: Side| f64::NAN;
        let outcome = DeepeningSearch::new(&evaluator, DEFAULT_BUDGET).search(&board, Side::One, 3);
        let pit = outcome.result.best_move.unwrap();
        assert!(board.is_legal(Side::One, pit));
    }
}
