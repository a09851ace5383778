use mancala_core::{Board, Pit, Side};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::info;

use crate::{Agent, AgentError};

/// Picks uniformly among the legal moves.
pub struct RandomAgent {
    name: String,
    rng: StdRng,
}

impl RandomAgent {
    pub fn new() -> Self {
        RandomAgent {
            name: "Random".to_string(),
            rng: StdRng::from_entropy(),
        }
    }

    /// Reproducible agent for tests and replays.
    pub fn with_seed(seed: u64) -> Self {
        RandomAgent {
            name: format!("Random(seed={})", seed),
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomAgent {
    fn default() -> Self {
        Self::new()
    }
}

impl Agent for RandomAgent {
    fn best_move(&mut self, board: &Board, side: Side) -> Result<Option<Pit>, AgentError> {
        let moves = board.legal_moves(side);
        let choice = moves.choose(&mut self.rng).copied();
        if let Some(pit) = choice {
            info!(player = %side, pit = %pit, "chose move");
        }
        Ok(choice)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mancala_core::PITS;

    #[test]
    fn test_only_legal_moves() {
        let board = Board::from_parts([0, 3, 0, 0, 1, 0], 10, [2; PITS], 10);
        let mut agent = RandomAgent::with_seed(42);
        for _ in 0..50 {
            let pit = agent.best_move(&board, Side::One).unwrap().unwrap();
            assert!(pit.number() == 2 || pit.number() == 5);
        }
    }

    #[test]
    fn test_same_seed_same_choices() {
        let board = Board::new();
        let mut first = RandomAgent::with_seed(12345);
        let mut second = RandomAgent::with_seed(12345);
        for _ in 0..20 {
            assert_eq!(
                first.best_move(&board, Side::Two).unwrap(),
                second.best_move(&board, Side::Two).unwrap()
            );
        }
    }

    #[test]
    fn test_no_moves_when_game_over() {
        let board = Board::from_parts([0; PITS], 24, [0; PITS], 24);
        let mut agent = RandomAgent::new();
        assert_eq!(agent.best_move(&board, Side::One).unwrap(), None);
    }
}
