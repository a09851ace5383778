use std::fmt;

use thiserror::Error;

use crate::types::{Pit, Side, PITS, STARTING_STONES};

/// Full state of a Kalah board: one row of pits and one store per player.
///
/// The board is a small `Copy` value, so every position handed out by
/// [`Board::play`] or [`Board::apply_move`] is independent of the one it came
/// from.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct Board {
    rows: [[u16; PITS]; 2],
    stores: [u16; 2],
}

/// Where the last stone of a sowing comes to rest, seen from the mover.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Landing {
    /// A pit on the mover's own row (0-based index).
    OwnPit(usize),
    /// The mover's store.
    Store,
    /// A pit on the opponent's row (0-based index, in the opponent's numbering).
    OpponentPit(usize),
}

/// Result of playing a legal move.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct MoveOutcome {
    pub board: Board,
    /// The last stone landed in the mover's store and the game is not over.
    pub extra_turn: bool,
    /// Stones taken from the opponent's opposite pit by a capture.
    pub captured: u16,
}

/// What sowing a pit would do, without committing to the move.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct SowPreview {
    pub landing: Landing,
    /// Stones that would be dropped on the opponent's row.
    pub stones_to_opponent: u16,
    /// Stones a capture would take from the opposite pit (0 without a capture).
    pub capture: u16,
    pub extra_turn: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("pit {pit} is not a legal move for player {side}")]
pub struct IllegalMove {
    pub side: Side,
    pub pit: Pit,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// Standard starting position with four stones per pit.
    pub const fn new() -> Self {
        Self::with_stones(STARTING_STONES)
    }

    /// Starting position with `stones` in every pit. Play stays exact up to
    /// [`MAX_STARTING_STONES`](crate::MAX_STARTING_STONES).
    pub const fn with_stones(stones: u16) -> Self {
        Self {
            rows: [[stones; PITS]; 2],
            stores: [0, 0],
        }
    }

    pub const fn from_parts(
        one_pits: [u16; PITS],
        one_store: u16,
        two_pits: [u16; PITS],
        two_store: u16,
    ) -> Self {
        Self {
            rows: [one_pits, two_pits],
            stores: [one_store, two_store],
        }
    }

    pub fn pits(&self, side: Side) -> &[u16; PITS] {
        &self.rows[side.index()]
    }

    pub fn store(&self, side: Side) -> u16 {
        self.stores[side.index()]
    }

    /// Stones still on the side's row.
    pub fn stones_in_play(&self, side: Side) -> u32 {
        let row = &self.rows[side.index()];
        row.iter().copied().map(u32::from).sum()
    }

    pub fn total_stones(&self) -> u32 {
        let banked: u32 = self.stores.iter().copied().map(u32::from).sum();
        banked + self.stones_in_play(Side::One) + self.stones_in_play(Side::Two)
    }

    /// The game ends as soon as either row is empty.
    pub fn is_game_over(&self) -> bool {
        self.rows.iter().any(|row| row.iter().all(|&s| s == 0))
    }

    /// True once the game is over and `side` banked strictly more stones.
    pub fn has_won(&self, side: Side) -> bool {
        self.is_game_over() && self.final_store(side) > self.final_store(side.opponent())
    }

    /// Winner of a finished game, `None` for a draw or an unfinished game.
    pub fn winner(&self) -> Option<Side> {
        Side::ALL.into_iter().find(|&side| self.has_won(side))
    }

    /// Store count once remaining stones are swept to their owner.
    fn final_store(&self, side: Side) -> u32 {
        u32::from(self.store(side)) + self.stones_in_play(side)
    }

    pub fn is_legal(&self, side: Side, pit: Pit) -> bool {
        !self.is_game_over() && self.rows[side.index()][pit.index()] > 0
    }

    /// Legal moves in ascending pit order. Empty once the game is over.
    pub fn legal_moves(&self, side: Side) -> Vec<Pit> {
        if self.is_game_over() {
            return Vec::new();
        }
        Pit::all()
            .filter(|pit| self.rows[side.index()][pit.index()] > 0)
            .collect()
    }

    /// Plays a move and reports extra turns and captures.
    pub fn play(&self, side: Side, pit: Pit) -> Result<MoveOutcome, IllegalMove> {
        if !self.is_legal(side, pit) {
            return Err(IllegalMove { side, pit });
        }

        let (mut board, landing, _) = self.sow(side, pit);
        let mut extra_turn = false;
        let mut captured = 0;

        match landing {
            Landing::Store => extra_turn = true,
            Landing::OwnPit(index) if board.rows[side.index()][index] == 1 => {
                let opposite = PITS - 1 - index;
                let opp = side.opponent().index();
                captured = board.rows[opp][opposite];
                board.rows[opp][opposite] = 0;
                board.rows[side.index()][index] = 0;
                board.stores[side.index()] += captured + 1;
            }
            _ => {}
        }

        if board.is_game_over() {
            board.sweep();
            extra_turn = false;
        }

        Ok(MoveOutcome {
            board,
            extra_turn,
            captured,
        })
    }

    /// Returns the position after `side` plays `pit`.
    ///
    /// # Panics
    ///
    /// Panics if the move is illegal. Callers are expected to pick from
    /// [`Board::legal_moves`]; use [`Board::play`] for unchecked input.
    pub fn apply_move(&self, side: Side, pit: Pit) -> Board {
        match self.play(side, pit) {
            Ok(outcome) => outcome.board,
            Err(err) => panic!("{err}"),
        }
    }

    /// Describes the sowing from `pit` without playing it. `None` for an empty pit.
    pub fn preview(&self, side: Side, pit: Pit) -> Option<SowPreview> {
        if self.rows[side.index()][pit.index()] == 0 {
            return None;
        }

        let (board, landing, stones_to_opponent) = self.sow(side, pit);
        let capture = match landing {
            Landing::OwnPit(index) if board.rows[side.index()][index] == 1 => {
                board.rows[side.opponent().index()][PITS - 1 - index]
            }
            _ => 0,
        };

        Some(SowPreview {
            landing,
            stones_to_opponent,
            capture,
            extra_turn: landing == Landing::Store,
        })
    }

    // Distributes the stones of `pit` one by one around the ring formed by the
    // mover's pits, the mover's store and the opponent's pits.
    fn sow(&self, side: Side, pit: Pit) -> (Board, Landing, u16) {
        let own = side.index();
        let opp = side.opponent().index();
        let mut board = *self;

        let mut stones = board.rows[own][pit.index()];
        board.rows[own][pit.index()] = 0;

        const RING: usize = 2 * PITS + 1;
        let mut position = pit.index();
        let mut landing = Landing::OwnPit(pit.index());
        let mut to_opponent = 0;

        while stones > 0 {
            position = (position + 1) % RING;
            landing = match position {
                p if p < PITS => {
                    board.rows[own][p] += 1;
                    Landing::OwnPit(p)
                }
                PITS => {
                    board.stores[own] += 1;
                    Landing::Store
                }
                p => {
                    let index = p - PITS - 1;
                    board.rows[opp][index] += 1;
                    to_opponent += 1;
                    Landing::OpponentPit(index)
                }
            };
            stones -= 1;
        }

        (board, landing, to_opponent)
    }

    fn sweep(&mut self) {
        for side in Side::ALL {
            let i = side.index();
            self.stores[i] += self.rows[i].iter().sum::<u16>();
            self.rows[i] = [0; PITS];
        }
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let two = self.pits(Side::Two);
        let one = self.pits(Side::One);

        writeln!(f, "Player 2")?;
        write!(f, "    ")?;
        for pit in (1..=PITS).rev() {
            write!(f, "{:>4}", pit)?;
        }
        writeln!(f)?;
        write!(f, "    ")?;
        for stones in two.iter().rev() {
            write!(f, "{:>4}", stones)?;
        }
        writeln!(f)?;
        writeln!(
            f,
            "{:>4}{}{:>4}",
            self.store(Side::Two),
            " ".repeat(4 * PITS),
            self.store(Side::One)
        )?;
        write!(f, "    ")?;
        for stones in one.iter() {
            write!(f, "{:>4}", stones)?;
        }
        writeln!(f)?;
        write!(f, "    ")?;
        for pit in 1..=PITS {
            write!(f, "{:>4}", pit)?;
        }
        writeln!(f)?;
        write!(f, "Player 1")
    }
}
