//! Compact text notation for board positions.
//!
//! Format: `<player 1 pits>|<player 1 store>|<player 2 pits>|<player 2 store>`
//! with pits comma-separated in pit order, e.g. the starting position
//! `4,4,4,4,4,4|0|4,4,4,4,4,4|0`.

use thiserror::Error;

use crate::board::Board;
use crate::types::{Side, MAX_TOTAL_STONES, PITS};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotationError {
    #[error("invalid position format: expected 4 '|'-separated fields, got {0}")]
    FieldCount(usize),
    #[error("invalid row: expected {expected} pits, got {0}", expected = PITS)]
    PitCount(usize),
    #[error("invalid number: {0}")]
    InvalidNumber(String),
    #[error("position holds {0} stones, more than the limit of {max}", max = MAX_TOTAL_STONES)]
    TooManyStones(u32),
}

/// Well-known positions.
pub mod positions {
    pub const STARTING: &str = "4,4,4,4,4,4|0|4,4,4,4,4,4|0";
    /// Player 1 can capture six stones with pit 1.
    pub const CAPTURE: &str = "2,1,0,1,2,3|5|1,1,1,6,2,3|7";
    pub const ENDGAME: &str = "0,0,0,0,1,1|20|0,0,2,0,0,1|23";
}

impl Board {
    /// Parses a position in the compact notation.
    pub fn from_notation(text: &str) -> Result<Self, NotationError> {
        let fields: Vec<&str> = text.trim().split('|').collect();
        if fields.len() != 4 {
            return Err(NotationError::FieldCount(fields.len()));
        }

        let one = parse_row(fields[0])?;
        let one_store = parse_number(fields[1])?;
        let two = parse_row(fields[2])?;
        let two_store = parse_number(fields[3])?;

        let board = Board::from_parts(one, one_store, two, two_store);
        if board.total_stones() > MAX_TOTAL_STONES {
            return Err(NotationError::TooManyStones(board.total_stones()));
        }
        Ok(board)
    }

    /// Formats the position in the compact notation.
    pub fn to_notation(&self) -> String {
        let row = |side: Side| {
            self.pits(side)
                .iter()
                .map(|stones| stones.to_string())
                .collect::<Vec<_>>()
                .join(",")
        };
        format!(
            "{}|{}|{}|{}",
            row(Side::One),
            self.store(Side::One),
            row(Side::Two),
            self.store(Side::Two)
        )
    }
}

fn parse_row(field: &str) -> Result<[u16; PITS], NotationError> {
    let values = field
        .split(',')
        .map(parse_number)
        .collect::<Result<Vec<_>, _>>()?;

    values
        .try_into()
        .map_err(|values: Vec<u16>| NotationError::PitCount(values.len()))
}

fn parse_number(field: &str) -> Result<u16, NotationError> {
    let field = field.trim();
    field
        .parse::<u16>()
        .map_err(|_| NotationError::InvalidNumber(field.to_string()))
}
