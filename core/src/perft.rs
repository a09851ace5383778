use crate::board::Board;
use crate::types::{Pit, Side};

/// Counts leaf positions of the move tree to the given depth.
///
/// Turns strictly alternate (extra turns are not followed), which is the tree
/// the minimax engines walk. Finished games count as a single leaf.
pub fn perft(board: &Board, side: Side, depth: u8) -> u64 {
    if depth == 0 {
        return 1;
    }

    let moves = board.legal_moves(side);
    if moves.is_empty() {
        return 1;
    }

    if depth == 1 {
        return moves.len() as u64;
    }

    moves
        .iter()
        .map(|&pit| perft(&board.apply_move(side, pit), side.opponent(), depth - 1))
        .sum()
}

/// Perft broken down by root move.
pub fn perft_divide(board: &Board, side: Side, depth: u8) -> Vec<(Pit, u64)> {
    board
        .legal_moves(side)
        .into_iter()
        .map(|pit| {
            let nodes = if depth <= 1 {
                1
            } else {
                perft(&board.apply_move(side, pit), side.opponent(), depth - 1)
            };
            (pit, nodes)
        })
        .collect()
}
