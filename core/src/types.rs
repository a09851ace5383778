use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Number of pits on each player's row.
pub const PITS: usize = 6;

/// Stones placed in every pit at the start of a standard game.
pub const STARTING_STONES: u16 = 4;

/// Most stones a position may hold in total; any pit or store can then
/// collect every stone without overflowing.
pub const MAX_TOTAL_STONES: u32 = u16::MAX as u32;

/// Largest starting pit count whose total stays within [`MAX_TOTAL_STONES`].
pub const MAX_STARTING_STONES: u16 = u16::MAX / (2 * PITS as u16);

/// Represents one of the two players.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub enum Side {
    One,
    Two,
}

impl Side {
    pub const ALL: [Side; 2] = [Side::One, Side::Two];

    /// Returns the other player.
    pub const fn opponent(self) -> Self {
        match self {
            Side::One => Side::Two,
            Side::Two => Side::One,
        }
    }

    /// Player number as printed to users (1 or 2).
    pub const fn number(self) -> u8 {
        match self {
            Side::One => 1,
            Side::Two => 2,
        }
    }

    /// Index into per-side arrays.
    pub const fn index(self) -> usize {
        match self {
            Side::One => 0,
            Side::Two => 1,
        }
    }

    pub const fn from_number(number: u8) -> Option<Self> {
        match number {
            1 => Some(Side::One),
            2 => Some(Side::Two),
            _ => None,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.number())
    }
}

/// A move: the 1-based number of a pit on the mover's own row.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct Pit(u8);

impl Pit {
    /// Creates a pit from its 1-based number, if it is on the board.
    pub const fn new(number: u8) -> Option<Self> {
        if number >= 1 && number as usize <= PITS {
            Some(Pit(number))
        } else {
            None
        }
    }

    /// Creates a pit from its 0-based row index.
    pub const fn from_index(index: usize) -> Option<Self> {
        if index < PITS {
            Some(Pit(index as u8 + 1))
        } else {
            None
        }
    }

    pub const fn number(self) -> u8 {
        self.0
    }

    pub const fn index(self) -> usize {
        self.0 as usize - 1
    }

    /// All pits in ascending order.
    pub fn all() -> impl DoubleEndedIterator<Item = Pit> {
        (1..=PITS as u8).map(Pit)
    }
}

impl fmt::Display for Pit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid pit '{input}': expected a number from 1 to {max}", max = PITS)]
pub struct PitParseError {
    pub input: String,
}

impl FromStr for Pit {
    type Err = PitParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        trimmed
            .parse::<u8>()
            .ok()
            .and_then(Pit::new)
            .ok_or_else(|| PitParseError {
                input: trimmed.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_side_opponent() {
        assert_eq!(Side::One.opponent(), Side::Two);
        assert_eq!(Side::Two.opponent(), Side::One);
        assert_eq!(Side::One.opponent().opponent(), Side::One);
    }

    #[test]
    fn test_side_numbers() {
        assert_eq!(Side::One.number(), 1);
        assert_eq!(Side::Two.number(), 2);
        assert_eq!(Side::from_number(2), Some(Side::Two));
        assert_eq!(Side::from_number(3), None);
        assert_eq!(Side::Two.to_string(), "2");
    }

    #[test]
    fn test_pit_bounds() {
        assert!(Pit::new(0).is_none());
        assert!(Pit::new(7).is_none());
        assert_eq!(Pit::new(1).unwrap().index(), 0);
        assert_eq!(Pit::from_index(5).unwrap().number(), 6);
        assert!(Pit::from_index(6).is_none());
        assert_eq!(Pit::all().count(), PITS);
    }

    #[test]
    fn test_pit_parse() {
        assert_eq!(" 3 ".parse::<Pit>().unwrap(), Pit::new(3).unwrap());
        let err = "9".parse::<Pit>().unwrap_err();
        assert_eq!(err.input, "9");
        assert!("abc".parse::<Pit>().is_err());
        assert!("".parse::<Pit>().is_err());
    }
}
