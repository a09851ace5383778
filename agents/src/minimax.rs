use mancala_core::{Board, Pit, Side};
use tracing::{debug, info};

use crate::evaluation::{Evaluator, MancalaEvaluator};
use crate::position::Position;
use crate::search::{SearchResult, SearchStats};
use crate::{Agent, AgentError};

/// Plain depth-limited minimax.
///
/// `perspective` is fixed at the root and handed unchanged through the
/// recursion; only the side whose moves are enumerated alternates.
pub struct Minimax<'e, E> {
    evaluator: &'e E,
    stats: SearchStats,
}

impl<'e, E> Minimax<'e, E> {
    pub fn new(evaluator: &'e E) -> Self {
        Self {
            evaluator,
            stats: SearchStats::default(),
        }
    }

    pub fn stats(&self) -> SearchStats {
        self.stats
    }

    fn evaluate<P>(&mut self, board: &P, perspective: Side) -> f64
    where
        P: Position,
        E: Evaluator<P>,
    {
        self.stats.evaluations += 1;
        self.evaluator.score(board, perspective)
    }

    /// Chooses the best move for `side` looking `depth` plies ahead.
    ///
    /// At depth 0 the current position is evaluated once and paired with the
    /// first legal move, without comparing alternatives. Ties keep the
    /// earliest move in enumeration order.
    pub fn choose_move<P>(&mut self, board: &P, side: Side, depth: u8) -> SearchResult<P::Move>
    where
        P: Position,
        E: Evaluator<P>,
    {
        self.stats.nodes += 1;

        if board.is_game_over() {
            return SearchResult::no_move();
        }
        let moves = board.legal_moves(side);
        let Some(&first) = moves.first() else {
            return SearchResult::no_move();
        };

        if depth == 0 {
            return SearchResult {
                score: self.evaluate(board, side),
                best_move: Some(first),
            };
        }

        let mut best = SearchResult {
            score: f64::NEG_INFINITY,
            best_move: Some(first),
        };
        for mv in moves {
            let next = board.apply_move(side, mv);
            let score = self.min_value(&next, side.opponent(), depth - 1, side);
            if score > best.score {
                best = SearchResult {
                    score,
                    best_move: Some(mv),
                };
            }
        }

        debug!(
            depth,
            score = best.score,
            nodes = self.stats.nodes,
            "minimax root complete"
        );
        best
    }

    /// Value of a position where `mover` is the maximizing side.
    pub fn max_value<P>(&mut self, board: &P, mover: Side, depth: u8, perspective: Side) -> f64
    where
        P: Position,
        E: Evaluator<P>,
    {
        self.stats.nodes += 1;

        if board.is_game_over() || depth == 0 {
            return self.evaluate(board, perspective);
        }
        let moves = board.legal_moves(mover);
        if moves.is_empty() {
            return self.evaluate(board, perspective);
        }

        let mut value = f64::NEG_INFINITY;
        for mv in moves {
            let next = board.apply_move(mover, mv);
            let score = self.min_value(&next, mover.opponent(), depth - 1, perspective);
            if score > value {
                value = score;
            }
        }
        value
    }

    /// Value of a position where `mover` is the minimizing side.
    pub fn min_value<P>(&mut self, board: &P, mover: Side, depth: u8, perspective: Side) -> f64
    where
        P: Position,
        E: Evaluator<P>,
    {
        self.stats.nodes += 1;

        if board.is_game_over() || depth == 0 {
            return self.evaluate(board, perspective);
        }
        let moves = board.legal_moves(mover);
        if moves.is_empty() {
            return self.evaluate(board, perspective);
        }

        let mut value = f64::INFINITY;
        for mv in moves {
            let next = board.apply_move(mover, mv);
            let score = self.max_value(&next, mover.opponent(), depth - 1, perspective);
            if score < value {
                value = score;
            }
        }
        value
    }
}

/// Runs a plain minimax search from `board` for `side`.
pub fn minimax_move<P, E>(board: &P, side: Side, depth: u8, evaluator: &E) -> SearchResult<P::Move>
where
    P: Position,
    E: Evaluator<P>,
{
    Minimax::new(evaluator).choose_move(board, side, depth)
}

pub struct MinimaxAgent<E = MancalaEvaluator> {
    name: String,
    depth: u8,
    evaluator: E,
}

impl MinimaxAgent<MancalaEvaluator> {
    pub fn new(depth: u8) -> Self {
        Self::with_evaluator(depth, MancalaEvaluator::default())
    }
}

impl<E> MinimaxAgent<E> {
    pub fn with_evaluator(depth: u8, evaluator: E) -> Self {
        MinimaxAgent {
            name: format!("Minimax(depth={})", depth),
            depth,
            evaluator,
        }
    }
}

impl<E: Evaluator<Board>> Agent for MinimaxAgent<E> {
    fn best_move(&mut self, board: &Board, side: Side) -> Result<Option<Pit>, AgentError> {
        let mut search = Minimax::new(&self.evaluator);
        let result = search.choose_move(board, side, self.depth);
        let stats = search.stats();

        if let Some(pit) = result.best_move {
            info!(
                player = %side,
                pit = %pit,
                score = result.score,
                nodes = stats.nodes,
                "chose move"
            );
        }
        Ok(result.best_move)
    }

    fn name(&self) -> &str {
        &self.name
    }
}
