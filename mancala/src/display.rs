//! Terminal rendering of the board.

use std::io::{self, Write};

use crossterm::{
    style::{Attribute, Color as TermColor, Print, ResetColor, SetAttribute, SetForegroundColor},
    QueueableCommand,
};
use mancala_core::{Board, Pit, Side, PITS};

const CELL: usize = 4;

fn side_colour(side: Side) -> TermColor {
    match side {
        Side::One => TermColor::Cyan,
        Side::Two => TermColor::Magenta,
    }
}

/// Writes the board with Player 2's row on top, pits numbered from each
/// player's left. The pit played last is highlighted when `colour` is set.
pub struct BoardView<'a> {
    board: &'a Board,
    last_move: Option<(Side, Pit)>,
    colour: bool,
}

impl<'a> BoardView<'a> {
    pub fn new(board: &'a Board) -> Self {
        Self {
            board,
            last_move: None,
            colour: true,
        }
    }

    pub fn last_move(mut self, side: Side, pit: Pit) -> Self {
        self.last_move = Some((side, pit));
        self
    }

    pub fn colour(mut self, colour: bool) -> Self {
        self.colour = colour;
        self
    }

    pub fn render<W: Write>(&self, out: &mut W) -> io::Result<()> {
        self.label(out, Side::Two)?;
        self.numbers(out, Pit::all().rev())?;
        self.row(out, Side::Two, Pit::all().rev())?;

        self.store(out, Side::Two)?;
        out.queue(Print(" ".repeat(CELL * PITS)))?;
        self.store(out, Side::One)?;
        out.queue(Print("\n"))?;

        self.row(out, Side::One, Pit::all())?;
        self.numbers(out, Pit::all())?;
        self.label(out, Side::One)?;
        out.flush()
    }

    fn label<W: Write>(&self, out: &mut W, side: Side) -> io::Result<()> {
        if self.colour {
            out.queue(SetForegroundColor(side_colour(side)))?;
            out.queue(Print(format!("Player {side}")))?;
            out.queue(ResetColor)?;
        } else {
            out.queue(Print(format!("Player {side}")))?;
        }
        out.queue(Print("\n"))?;
        Ok(())
    }

    fn numbers<W: Write>(&self, out: &mut W, pits: impl Iterator<Item = Pit>) -> io::Result<()> {
        out.queue(Print(" ".repeat(CELL)))?;
        if self.colour {
            out.queue(SetAttribute(Attribute::Dim))?;
        }
        for pit in pits {
            out.queue(Print(format!("{:>CELL$}", pit.number())))?;
        }
        if self.colour {
            out.queue(SetAttribute(Attribute::Reset))?;
        }
        out.queue(Print("\n"))?;
        Ok(())
    }

    fn row<W: Write>(
        &self,
        out: &mut W,
        side: Side,
        pits: impl Iterator<Item = Pit>,
    ) -> io::Result<()> {
        out.queue(Print(" ".repeat(CELL)))?;
        let stones = self.board.pits(side);
        for pit in pits {
            let highlighted = self.last_move == Some((side, pit));
            let colour = if highlighted { Some(TermColor::Yellow) } else { None };
            self.cell(out, stones[pit.index()], colour, highlighted)?;
        }
        out.queue(Print("\n"))?;
        Ok(())
    }

    fn store<W: Write>(&self, out: &mut W, side: Side) -> io::Result<()> {
        let stones = self.board.store(side);
        self.cell(out, stones, Some(side_colour(side)), true)
    }

    fn cell<W: Write>(
        &self,
        out: &mut W,
        value: u16,
        colour: Option<TermColor>,
        bold: bool,
    ) -> io::Result<()> {
        let text = format!("{value:>CELL$}");
        match colour {
            Some(colour) if self.colour => {
                out.queue(SetForegroundColor(colour))?;
                if bold {
                    out.queue(SetAttribute(Attribute::Bold))?;
                }
                out.queue(Print(text))?;
                out.queue(SetAttribute(Attribute::Reset))?;
                out.queue(ResetColor)?;
            }
            _ => {
                out.queue(Print(text))?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(view: BoardView<'_>) -> String {
        let mut out = Vec::new();
        view.render(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_plain_render_matches_board_display() {
        let board = Board::from_parts([1, 2, 3, 4, 5, 6], 10, [6, 5, 4, 3, 2, 1], 7);
        let text = render(BoardView::new(&board).colour(false));

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 7);
        assert_eq!(lines[0], "Player 2");
        assert_eq!(lines[1], board.to_string().lines().nth(1).unwrap());
        assert_eq!(lines[2], "       1   2   3   4   5   6");
        assert_eq!(lines[4], "       1   2   3   4   5   6");
        assert_eq!(lines[6], "Player 1");
        assert!(lines[3].ends_with("  10"));
        assert!(!text.contains('\u{1b}'));
    }

    #[test]
    fn test_colour_render_highlights_last_move() {
        let board = Board::new();
        let plain = render(BoardView::new(&board).colour(false));
        let pit = Pit::new(3).unwrap();
        let coloured = render(BoardView::new(&board).last_move(Side::One, pit));

        assert!(coloured.contains('\u{1b}'));
        assert_ne!(plain, coloured);
    }
}
