use std::io::{self, BufRead, Stdin, Stdout, Write};

use mancala_core::{Board, Pit, Side};

use crate::{Agent, AgentError};

const PROMPT: &str = "Please enter your move: ";

/// Line-oriented move input.
pub trait LineSource {
    /// Appends the next line to `buf`, returning the bytes read (0 at EOF).
    fn read_line(&mut self, buf: &mut String) -> io::Result<usize>;
}

impl<T: BufRead> LineSource for T {
    fn read_line(&mut self, buf: &mut String) -> io::Result<usize> {
        BufRead::read_line(self, buf)
    }
}

/// The process stdin, locked only for the duration of each read so several
/// agents can share the terminal.
pub struct TerminalInput(Stdin);

impl LineSource for TerminalInput {
    fn read_line(&mut self, buf: &mut String) -> io::Result<usize> {
        self.0.read_line(buf)
    }
}

/// Reads moves from a line-oriented input, re-prompting until a legal pit
/// number is entered.
pub struct HumanAgent<R, W> {
    name: String,
    input: R,
    output: W,
}

impl HumanAgent<TerminalInput, Stdout> {
    /// Agent reading from the terminal.
    pub fn stdio() -> Self {
        Self::new(TerminalInput(io::stdin()), io::stdout())
    }
}

impl<R: LineSource, W: Write> HumanAgent<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            name: "Human".to_string(),
            input,
            output,
        }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    fn prompt(&mut self) -> io::Result<()> {
        write!(self.output, "{PROMPT}")?;
        self.output.flush()
    }
}

impl<R: LineSource, W: Write> Agent for HumanAgent<R, W> {
    fn best_move(&mut self, board: &Board, side: Side) -> Result<Option<Pit>, AgentError> {
        if board.legal_moves(side).is_empty() {
            return Ok(None);
        }

        self.prompt()?;
        loop {
            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                return Err(AgentError::InputClosed);
            }

            let text = line.trim();
            match text.parse::<Pit>() {
                Ok(pit) if board.is_legal(side, pit) => return Ok(Some(pit)),
                _ => {
                    writeln!(self.output, "{text} is not valid")?;
                    self.prompt()?;
                }
            }
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}
