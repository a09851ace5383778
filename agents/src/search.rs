//! Types shared by the search engines.

/// Score reported alongside the "no move" sentinel.
pub const NO_MOVE_SCORE: f64 = -1.0;

/// Outcome of a root search: the backed-up value and the move that earns it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchResult<M> {
    pub score: f64,
    pub best_move: Option<M>,
}

impl<M> SearchResult<M> {
    /// The `(-1, -1)` sentinel: the game is over or the side cannot move.
    pub fn no_move() -> Self {
        Self {
            score: NO_MOVE_SCORE,
            best_move: None,
        }
    }

    pub fn is_no_move(&self) -> bool {
        self.best_move.is_none()
    }
}

/// Counters collected while searching.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Positions visited, root included
    pub nodes: u64,
    /// Calls into the evaluator
    pub evaluations: u64,
    /// Move loops abandoned by alpha-beta
    pub cutoffs: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Max,
    Min,
}

/// Local bounds of an alpha-beta node after one of its children was searched.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundUpdate {
    /// Visit number of the node, unique within one search
    pub node: u64,
    pub kind: NodeKind,
    /// Remaining depth at the node
    pub depth: u8,
    pub alpha: f64,
    pub beta: f64,
    /// Best value found at the node so far
    pub value: f64,
}

/// Observer for alpha-beta bound updates.
pub type BoundCallback<'c> = Box<dyn FnMut(&BoundUpdate) + 'c>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_move_sentinel() {
        let result: SearchResult<u8> = SearchResult::no_move();
        assert!(result.is_no_move());
        assert_eq!(result.score, -1.0);

        let found = SearchResult {
            score: 12.5,
            best_move: Some(3u8),
        };
        assert!(!found.is_no_move());
    }
}
