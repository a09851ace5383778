use std::fmt;

use mancala_core::{Board, Pit, Side};

/// The game-state capability the search engines consume.
///
/// Implementations must treat positions as values: `apply_move` returns a new
/// position and leaves `self` untouched, so sibling branches never observe
/// each other's moves.
pub trait Position: Sized {
    type Move: Copy + PartialEq + fmt::Debug + fmt::Display;

    /// Legal moves for `side`, in search and tie-break order.
    fn legal_moves(&self, side: Side) -> Vec<Self::Move>;

    fn apply_move(&self, side: Side, mv: Self::Move) -> Self;

    fn is_game_over(&self) -> bool;

    fn has_won(&self, side: Side) -> bool;
}

impl Position for Board {
    type Move = Pit;

    fn legal_moves(&self, side: Side) -> Vec<Pit> {
        Board::legal_moves(self, side)
    }

    fn apply_move(&self, side: Side, mv: Pit) -> Self {
        Board::apply_move(self, side, mv)
    }

    fn is_game_over(&self) -> bool {
        Board::is_game_over(self)
    }

    fn has_won(&self, side: Side) -> bool {
        Board::has_won(self, side)
    }
}
