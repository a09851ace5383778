//! Strategy dispatch: turns a configured policy into an [`Agent`].

use std::fmt;
use std::io;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::alphabeta::AlphaBetaAgent;
use crate::custom::{CustomAgent, DEFAULT_BUDGET, DEFAULT_MAX_DEPTH};
use crate::evaluation::{BaselineEvaluator, HeuristicWeights, MancalaEvaluator};
use crate::human::HumanAgent;
use crate::minimax::MinimaxAgent;
use crate::random::RandomAgent;
use crate::Agent;

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("unknown policy mode '{0}' (expected human, random, minimax, alphabeta or custom)")]
    UnknownPolicy(String),
    #[error("unknown evaluator '{0}' (expected baseline or heuristic)")]
    UnknownEvaluator(String),
    #[error("input closed before a move was entered")]
    InputClosed,
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// How a player selects moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PolicyKind {
    Human,
    Random,
    Minimax,
    AlphaBeta,
    Custom,
}

impl FromStr for PolicyKind {
    type Err = AgentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "human" => Ok(PolicyKind::Human),
            "random" => Ok(PolicyKind::Random),
            "minimax" => Ok(PolicyKind::Minimax),
            "alphabeta" | "alpha-beta" | "abprune" => Ok(PolicyKind::AlphaBeta),
            "custom" => Ok(PolicyKind::Custom),
            _ => Err(AgentError::UnknownPolicy(s.to_string())),
        }
    }
}

impl fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PolicyKind::Human => "human",
            PolicyKind::Random => "random",
            PolicyKind::Minimax => "minimax",
            PolicyKind::AlphaBeta => "alphabeta",
            PolicyKind::Custom => "custom",
        };
        f.write_str(name)
    }
}

/// Static evaluator used by the minimax-family policies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EvaluatorKind {
    /// 100 / 0 / 50 win detection only
    Baseline,
    #[default]
    Heuristic,
}

impl FromStr for EvaluatorKind {
    type Err = AgentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "baseline" => Ok(EvaluatorKind::Baseline),
            "heuristic" | "mancala" => Ok(EvaluatorKind::Heuristic),
            _ => Err(AgentError::UnknownEvaluator(s.to_string())),
        }
    }
}

impl fmt::Display for EvaluatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            EvaluatorKind::Baseline => "baseline",
            EvaluatorKind::Heuristic => "heuristic",
        })
    }
}

/// A fully specified policy; each mode carries only what it uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Policy {
    Human,
    Random { seed: Option<u64> },
    Minimax { ply: u8 },
    AlphaBeta { ply: u8 },
    Custom { budget: Duration, max_ply: u8 },
}

impl Policy {
    /// Builds a policy from loosely configured settings, ignoring the ones
    /// the mode has no use for.
    pub fn from_kind(
        kind: PolicyKind,
        ply: u8,
        seed: Option<u64>,
        budget: Option<Duration>,
    ) -> Self {
        match kind {
            PolicyKind::Human => Policy::Human,
            PolicyKind::Random => Policy::Random { seed },
            PolicyKind::Minimax => Policy::Minimax { ply },
            PolicyKind::AlphaBeta => Policy::AlphaBeta { ply },
            PolicyKind::Custom => Policy::Custom {
                budget: budget.unwrap_or(DEFAULT_BUDGET),
                max_ply: if ply == 0 { DEFAULT_MAX_DEPTH } else { ply },
            },
        }
    }

    pub fn kind(&self) -> PolicyKind {
        match self {
            Policy::Human => PolicyKind::Human,
            Policy::Random { .. } => PolicyKind::Random,
            Policy::Minimax { .. } => PolicyKind::Minimax,
            Policy::AlphaBeta { .. } => PolicyKind::AlphaBeta,
            Policy::Custom { .. } => PolicyKind::Custom,
        }
    }
}

/// Creates the agent for a policy.
pub fn build_agent(
    policy: &Policy,
    evaluator: EvaluatorKind,
    weights: HeuristicWeights,
) -> Box<dyn Agent> {
    let heuristic = MancalaEvaluator::new(weights);
    match (*policy, evaluator) {
        (Policy::Human, _) => Box::new(HumanAgent::stdio()),
        (Policy::Random { seed: Some(seed) }, _) => Box::new(RandomAgent::with_seed(seed)),
        (Policy::Random { seed: None }, _) => Box::new(RandomAgent::new()),
        (Policy::Minimax { ply }, EvaluatorKind::Baseline) => {
            Box::new(MinimaxAgent::with_evaluator(ply, BaselineEvaluator))
        }
        (Policy::Minimax { ply }, EvaluatorKind::Heuristic) => {
            Box::new(MinimaxAgent::with_evaluator(ply, heuristic))
        }
        (Policy::AlphaBeta { ply }, EvaluatorKind::Baseline) => {
            Box::new(AlphaBetaAgent::with_evaluator(ply, BaselineEvaluator))
        }
        (Policy::AlphaBeta { ply }, EvaluatorKind::Heuristic) => {
            Box::new(AlphaBetaAgent::with_evaluator(ply, heuristic))
        }
        (Policy::Custom { budget, max_ply }, EvaluatorKind::Baseline) => {
            Box::new(CustomAgent::with_evaluator(
                budget,
                max_ply,
                BaselineEvaluator,
            ))
        }
        (Policy::Custom { budget, max_ply }, EvaluatorKind::Heuristic) => {
            Box::new(CustomAgent::with_evaluator(budget, max_ply, heuristic))
        }
    }
}
