use mancala_core::{Board, Pit, Side};
use tracing::{debug, info, trace};

use crate::evaluation::{Evaluator, MancalaEvaluator};
use crate::position::Position;
use crate::search::{BoundCallback, BoundUpdate, NodeKind, SearchResult, SearchStats};
use crate::{Agent, AgentError};

/// Minimax with alpha-beta pruning.
///
/// Returns exactly what [`crate::Minimax`] returns for the same input,
/// including tie-breaks; pruning only skips subtrees that cannot change the
/// root decision.
pub struct AlphaBeta<'e, 'c, E> {
    evaluator: &'e E,
    stats: SearchStats,
    on_bound: Option<BoundCallback<'c>>,
}

impl<'e, 'c, E> AlphaBeta<'e, 'c, E> {
    pub fn new(evaluator: &'e E) -> Self {
        Self {
            evaluator,
            stats: SearchStats::default(),
            on_bound: None,
        }
    }

    /// Installs an observer called after every child of every node.
    pub fn with_bound_callback(mut self, callback: BoundCallback<'c>) -> Self {
        self.on_bound = Some(callback);
        self
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

    fn report(&mut self, update: BoundUpdate) {
        if let Some(callback) = self.on_bound.as_mut() {
            callback(&update);
        }
    }

    /// Chooses the best move for `side` looking `depth` plies ahead.
    ///
    /// The root tightens alpha after every child so later siblings search a
    /// narrower window, but never cuts off itself.
    pub fn choose_move<P>(&mut self, board: &P, side: Side, depth: u8) -> SearchResult<P::Move>
    where
        P: Position,
        E: Evaluator<P>,
    {
        let node = self.stats.nodes;
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

        let mut alpha = f64::NEG_INFINITY;
        let beta = f64::INFINITY;
        let mut best = SearchResult {
            score: f64::NEG_INFINITY,
            best_move: Some(first),
        };

        for mv in moves {
            let next = board.apply_move(side, mv);
            let score = self.min_value(&next, side.opponent(), depth - 1, side, alpha, beta);
            if score > best.score {
                best = SearchResult {
                    score,
                    best_move: Some(mv),
                };
            }
            alpha = alpha.max(best.score);
            self.report(BoundUpdate {
                node,
                kind: NodeKind::Max,
                depth,
                alpha,
                beta,
                value: best.score,
            });
        }

        debug!(
            depth,
            score = best.score,
            nodes = self.stats.nodes,
            cutoffs = self.stats.cutoffs,
            "alpha-beta root complete"
        );
        best
    }

    /// Value of a position where `mover` maximizes, searched inside `(alpha, beta)`.
    pub fn max_value<P>(
        &mut self,
        board: &P,
        mover: Side,
        depth: u8,
        perspective: Side,
        alpha: f64,
        beta: f64,
    ) -> f64
    where
        P: Position,
        E: Evaluator<P>,
    {
        let node = self.stats.nodes;
        self.stats.nodes += 1;

        if board.is_game_over() || depth == 0 {
            return self.evaluate(board, perspective);
        }
        let moves = board.legal_moves(mover);
        if moves.is_empty() {
            return self.evaluate(board, perspective);
        }

        let mut value = f64::NEG_INFINITY;
        let mut a = alpha;
        let b = beta;
        for mv in moves {
            let next = board.apply_move(mover, mv);
            let score = self.min_value(&next, mover.opponent(), depth - 1, perspective, a, b);
            if score > value {
                value = score;
            }
            a = a.max(value);
            self.report(BoundUpdate {
                node,
                kind: NodeKind::Max,
                depth,
                alpha: a,
                beta: b,
                value,
            });
            // The minimizing parent already has something no worse than `beta`.
            if a >= beta {
                self.stats.cutoffs += 1;
                trace!(depth, alpha = a, beta, "beta cutoff");
                break;
            }
        }
        value
    }

    /// Value of a position where `mover` minimizes, searched inside `(alpha, beta)`.
    pub fn min_value<P>(
        &mut self,
        board: &P,
        mover: Side,
        depth: u8,
        perspective: Side,
        alpha: f64,
        beta: f64,
    ) -> f64
    where
        P: Position,
        E: Evaluator<P>,
    {
        let node = self.stats.nodes;
        self.stats.nodes += 1;

        if board.is_game_over() || depth == 0 {
            return self.evaluate(board, perspective);
        }
        let moves = board.legal_moves(mover);
        if moves.is_empty() {
            return self.evaluate(board, perspective);
        }

        let mut value = f64::INFINITY;
        let a = alpha;
        let mut b = beta;
        for mv in moves {
            let next = board.apply_move(mover, mv);
            let score = self.max_value(&next, mover.opponent(), depth - 1, perspective, a, b);
            if score < value {
                value = score;
            }
            b = b.min(value);
            self.report(BoundUpdate {
                node,
                kind: NodeKind::Min,
                depth,
                alpha: a,
                beta: b,
                value,
            });
            // The maximizing parent already has something no worse than `alpha`.
            if b <= alpha {
                self.stats.cutoffs += 1;
                trace!(depth, alpha, beta = b, "alpha cutoff");
                break;
            }
        }
        value
    }
}

/// Runs an alpha-beta search from `board` for `side`.
pub fn alpha_beta_move<P, E>(
    board: &P,
    side: Side,
    depth: u8,
    evaluator: &E,
) -> SearchResult<P::Move>
where
    P: Position,
    E: Evaluator<P>,
{
    AlphaBeta::new(evaluator).choose_move(board, side, depth)
}

pub struct AlphaBetaAgent<E = MancalaEvaluator> {
    name: String,
    depth: u8,
    evaluator: E,
}

impl AlphaBetaAgent<MancalaEvaluator> {
    pub fn new(depth: u8) -> Self {
        Self::with_evaluator(depth, MancalaEvaluator::default())
    }
}

impl<E> AlphaBetaAgent<E> {
    pub fn with_evaluator(depth: u8, evaluator: E) -> Self {
        AlphaBetaAgent {
            name: format!("AlphaBeta(depth={})", depth),
            depth,
            evaluator,
        }
    }
}

impl<E: Evaluator<Board>> Agent for AlphaBetaAgent<E> {
    fn best_move(&mut self, board: &Board, side: Side) -> Result<Option<Pit>, AgentError> {
        let mut search = AlphaBeta::new(&self.evaluator);
        let result = search.choose_move(board, side, self.depth);
        let stats = search.stats();

        if let Some(pit) = result.best_move {
            info!(
                player = %side,
                pit = %pit,
                score = result.score,
                nodes = stats.nodes,
                cutoffs = stats.cutoffs,
                "chose move"
            );
        }
        Ok(result.best_move)
    }

    fn name(&self) -> &str {
        &self.name
    }
}
