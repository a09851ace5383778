pub mod alphabeta;
pub mod custom;
pub mod evaluation;
pub mod human;
pub mod minimax;
pub mod policy;
pub mod position;
pub mod random;
pub mod search;

#[cfg(test)]
mod testing;

use mancala_core::{Board, Pit, Side};

/// Core trait for Mancala agents
pub trait Agent {
    /// Choose a move for `side`. `Ok(None)` means there is no legal move.
    fn best_move(&mut self, board: &Board, side: Side) -> Result<Option<Pit>, AgentError>;

    /// Get the agent's name
    fn name(&self) -> &str;
}

pub use alphabeta::{alpha_beta_move, AlphaBeta, AlphaBetaAgent};
pub use custom::{CustomAgent, DeepeningSearch, DEFAULT_BUDGET};
pub use evaluation::*;
pub use human::HumanAgent;
pub use minimax::{minimax_move, Minimax, MinimaxAgent};
pub use policy::{build_agent, AgentError, EvaluatorKind, Policy, PolicyKind};
pub use position::Position;
pub use random::RandomAgent;
pub use search::*;
