//! Game host: alternates two agents over a board until the game ends.

use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use mancala_agents::Agent;
use mancala_core::{Board, Pit, Side};
use tracing::{debug, info, warn};

/// A move as it happened during a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayedMove {
    pub side: Side,
    pub pit: Pit,
    pub elapsed: Duration,
    pub extra_turn: bool,
    pub captured: u16,
}

#[derive(Debug, Clone)]
pub struct GameRecord {
    pub moves: Vec<PlayedMove>,
    pub board: Board,
    pub winner: Option<Side>,
}

pub struct GameHost {
    players: [Box<dyn Agent>; 2],
    move_budget: Duration,
}

impl GameHost {
    pub fn new(player1: Box<dyn Agent>, player2: Box<dyn Agent>, move_budget: Duration) -> Self {
        Self {
            players: [player1, player2],
            move_budget,
        }
    }

    pub fn player_name(&self, side: Side) -> &str {
        self.players[side.index()].name()
    }

    /// Plays from `start` with Player 1 to move. A move that ends in the
    /// mover's store grants another move. `on_move` sees the board after
    /// every move.
    pub fn play<F>(&mut self, start: Board, mut on_move: F) -> Result<GameRecord>
    where
        F: FnMut(&Board, &PlayedMove),
    {
        let mut board = start;
        let mut side = Side::One;
        let mut moves = Vec::new();

        info!(
            player1 = self.player_name(Side::One),
            player2 = self.player_name(Side::Two),
            "starting game"
        );

        while !board.is_game_over() {
            let agent = &mut self.players[side.index()];
            let started = Instant::now();
            let choice = agent.best_move(&board, side);
            let choice = choice.with_context(|| {
                format!("player {side} ({}) failed to choose a move", agent.name())
            })?;
            let elapsed = started.elapsed();

            let Some(pit) = choice else {
                debug!(player = %side, "no legal move");
                break;
            };

            if elapsed > self.move_budget {
                warn!(
                    player = %side,
                    agent = agent.name(),
                    elapsed_ms = elapsed.as_millis() as u64,
                    budget_ms = self.move_budget.as_millis() as u64,
                    "move exceeded its time budget"
                );
            }

            let outcome = board
                .play(side, pit)
                .with_context(|| format!("{} chose an illegal move", agent.name()))?;

            let played = PlayedMove {
                side,
                pit,
                elapsed,
                extra_turn: outcome.extra_turn,
                captured: outcome.captured,
            };
            info!(
                player = %side,
                pit = %pit,
                elapsed_ms = elapsed.as_millis() as u64,
                extra_turn = outcome.extra_turn,
                captured = outcome.captured,
                "move played"
            );

            board = outcome.board;
            moves.push(played);
            on_move(&board, &played);

            if !outcome.extra_turn {
                side = side.opponent();
            }
        }

        let winner = board.winner();
        info!(
            moves = moves.len(),
            player1_store = board.store(Side::One),
            player2_store = board.store(Side::Two),
            winner = ?winner.map(|side| side.number()),
            "game over"
        );

        Ok(GameRecord { moves, board, winner })
    }
}
