//! Explicit game trees for exercising the search engines.

use std::cell::RefCell;

use mancala_core::Side;
use rand::Rng;

use crate::evaluation::{Evaluator, NEUTRAL_SCORE};
use crate::position::Position;

#[derive(Debug, Clone)]
enum Node {
    Leaf(f64),
    Branch { children: Vec<usize>, value: f64 },
}

/// A game tree whose leaves carry their evaluation.
#[derive(Debug, Clone, Default)]
pub(crate) struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn leaf(&mut self, value: f64) -> usize {
        self.nodes.push(Node::Leaf(value));
        self.nodes.len() - 1
    }

    /// Interior node with the neutral static value.
    pub fn branch(&mut self, children: Vec<usize>) -> usize {
        self.branch_valued(children, NEUTRAL_SCORE)
    }

    /// Interior node evaluated as `value` when the depth runs out on it.
    pub fn branch_valued(&mut self, children: Vec<usize>, value: f64) -> usize {
        self.nodes.push(Node::Branch { children, value });
        self.nodes.len() - 1
    }

    /// Random tree with values drawn from a handful of integers so ties are common.
    pub fn random(rng: &mut impl Rng, depth: u8, max_children: usize) -> (Self, usize) {
        let mut tree = Self::new();
        let root = tree.grow(rng, depth, max_children);
        (tree, root)
    }

    fn grow(&mut self, rng: &mut impl Rng, depth: u8, max_children: usize) -> usize {
        let value = f64::from(rng.gen_range(0u8..=10) * 10);
        if depth == 0 || rng.gen_bool(0.15) {
            return self.leaf(value);
        }
        let count = rng.gen_range(1..=max_children);
        let children = (0..count)
            .map(|_| self.grow(rng, depth - 1, max_children))
            .collect();
        self.branch_valued(children, value)
    }

    pub fn at(&self, node: usize) -> TreePosition<'_> {
        TreePosition { tree: self, node }
    }

    fn value(&self, node: usize) -> f64 {
        match &self.nodes[node] {
            Node::Leaf(value) => *value,
            Node::Branch { value, .. } => *value,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct TreePosition<'t> {
    tree: &'t Tree,
    pub node: usize,
}

impl Position for TreePosition<'_> {
    /// Index of the child, in enumeration order
    type Move = usize;

    fn legal_moves(&self, _side: Side) -> Vec<usize> {
        match &self.tree.nodes[self.node] {
            Node::Leaf(_) => Vec::new(),
            Node::Branch { children, .. } => (0..children.len()).collect(),
        }
    }

    fn apply_move(&self, _side: Side, mv: usize) -> Self {
        match &self.tree.nodes[self.node] {
            Node::Branch { children, .. } => TreePosition {
                tree: self.tree,
                node: children[mv],
            },
            Node::Leaf(_) => panic!("no moves from a leaf"),
        }
    }

    fn is_game_over(&self) -> bool {
        matches!(self.tree.nodes[self.node], Node::Leaf(_))
    }

    fn has_won(&self, _side: Side) -> bool {
        false
    }
}

/// Reads node values and records which nodes were evaluated.
#[derive(Debug, Default)]
pub(crate) struct TreeEvaluator {
    pub evaluated: RefCell<Vec<usize>>,
}

impl TreeEvaluator {
    pub fn was_evaluated(&self, node: usize) -> bool {
        self.evaluated.borrow().contains(&node)
    }
}

impl<'t> Evaluator<TreePosition<'t>> for TreeEvaluator {
    fn score(&self, board: &TreePosition<'t>, _perspective: Side) -> f64 {
        self.evaluated.borrow_mut().push(board.node);
        board.tree.value(board.node)
    }
}
