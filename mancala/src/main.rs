mod config;
mod display;
mod game;

use std::io::{self, Write};
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use crossterm::tty::IsTty;
use mancala_agents::{
    build_agent, AlphaBeta, BaselineEvaluator, DeepeningSearch, Evaluator, EvaluatorKind, Minimax,
    MancalaEvaluator, SearchResult, SearchStats, SideFeatures,
};
use mancala_core::{perft, perft_divide, positions, Board, Pit, Side, MAX_STARTING_STONES};
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, reload, EnvFilter, Registry};

use crate::config::MancalaConfig;
use crate::display::BoardView;
use crate::game::GameHost;

#[derive(Parser, Debug)]
#[command(name = "mancala", version, about = "Kalah with minimax and alpha-beta players")]
struct Cli {
    /// Path to mancala.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, env = "MANCALA_LOG_LEVEL")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Play a game between two configured players
    Play {
        /// Policy of player 1 (human, random, minimax, alphabeta, custom)
        #[arg(long)]
        player1: Option<String>,
        /// Policy of player 2
        #[arg(long)]
        player2: Option<String>,
        #[arg(long)]
        ply1: Option<u8>,
        #[arg(long)]
        ply2: Option<u8>,
        #[arg(long)]
        seed1: Option<u64>,
        #[arg(long)]
        seed2: Option<u64>,
        /// Stones per pit at the start
        #[arg(
            long,
            value_parser = clap::value_parser!(u16).range(1..=i64::from(MAX_STARTING_STONES))
        )]
        stones: Option<u16>,
        /// Disable coloured output
        #[arg(long)]
        plain: bool,
    },
    /// Search a single position and report the chosen move
    Search {
        #[arg(long, default_value = positions::STARTING)]
        position: String,
        /// Side to move (1 or 2)
        #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u8).range(1..=2))]
        player: u8,
        #[arg(long, default_value_t = 6)]
        depth: u8,
        #[arg(long, value_enum, default_value_t = Algorithm::AlphaBeta)]
        algorithm: Algorithm,
        #[arg(long, default_value = "heuristic")]
        evaluator: EvaluatorKind,
        /// Time budget of the custom search in milliseconds
        #[arg(long, default_value_t = 10_000)]
        time_ms: u64,
    },
    /// Print static evaluations of a position
    Eval {
        #[arg(long, default_value = positions::STARTING)]
        position: String,
    },
    /// Count leaf positions of the move tree
    Perft {
        depth: u8,
        #[arg(long, default_value = positions::STARTING)]
        position: String,
        #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u8).range(1..=2))]
        player: u8,
        /// Break the count down by first move
        #[arg(long)]
        divide: bool,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Algorithm {
    Minimax,
    #[value(name = "alphabeta", alias = "alpha-beta")]
    AlphaBeta,
    /// Iterative deepening under a time budget
    Custom,
}

/// Installs the subscriber before anything logs. `RUST_LOG` wins over
/// `--log-level`, which wins over the configured level.
fn init_tracing(level: Option<&str>) -> reload::Handle<EnvFilter, Registry> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::new(level.unwrap_or("info")),
    };
    let (filter, handle) = reload::Layer::new(filter);
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(io::stderr))
        .init();
    handle
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let env_filter = std::env::var_os(EnvFilter::DEFAULT_ENV).is_some();
    let log_filter = init_tracing(cli.log_level.as_deref());

    let config = match &cli.config {
        Some(path) => config::load_required(path)?,
        None => config::load_config(),
    };
    config.validate()?;
    if cli.log_level.is_none() && !env_filter {
        log_filter
            .reload(EnvFilter::new(&config.game.log_level))
            .context("failed to apply the configured log level")?;
    }

    match cli.command {
        Command::Play {
            player1,
            player2,
            ply1,
            ply2,
            seed1,
            seed2,
            stones,
            plain,
        } => {
            let mut config = config;
            if let Some(policy) = player1 {
                config.player1.policy = policy;
            }
            if let Some(policy) = player2 {
                config.player2.policy = policy;
            }
            if let Some(ply) = ply1 {
                config.player1.ply = ply;
            }
            if let Some(ply) = ply2 {
                config.player2.ply = ply;
            }
            config.player1.seed = seed1.or(config.player1.seed);
            config.player2.seed = seed2.or(config.player2.seed);
            if let Some(stones) = stones {
                config.game.stones = stones;
            }
            config.validate()?;
            play(&config, !plain && io::stdout().is_tty())
        }
        Command::Search {
            position,
            player,
            depth,
            algorithm,
            evaluator,
            time_ms,
        } => {
            let board = parse_position(&position)?;
            let side = parse_side(player)?;
            let budget = Duration::from_millis(time_ms);
            let report = match evaluator {
                EvaluatorKind::Baseline => {
                    search(&board, side, depth, algorithm, budget, &BaselineEvaluator)
                }
                EvaluatorKind::Heuristic => {
                    let heuristic = MancalaEvaluator::new(config.weights);
                    search(&board, side, depth, algorithm, budget, &heuristic)
                }
            };
            print_search_report(&report);
            Ok(())
        }
        Command::Eval { position } => {
            let board = parse_position(&position)?;
            print_evaluation(&board, &config);
            Ok(())
        }
        Command::Perft {
            depth,
            position,
            player,
            divide,
        } => {
            let board = parse_position(&position)?;
            let side = parse_side(player)?;
            run_perft(&board, side, depth, divide);
            Ok(())
        }
    }
}

fn parse_position(text: &str) -> Result<Board> {
    Board::from_notation(text).with_context(|| format!("invalid position '{text}'"))
}

fn parse_side(number: u8) -> Result<Side> {
    Side::from_number(number).with_context(|| format!("player must be 1 or 2, got {number}"))
}

fn play(config: &MancalaConfig, colour: bool) -> Result<()> {
    let players = [&config.player1, &config.player2];
    let mut agents = Vec::with_capacity(2);
    for (side, player) in Side::ALL.into_iter().zip(players) {
        let policy = player
            .policy()
            .with_context(|| format!("invalid policy for player {side}"))?;
        let evaluator = player
            .evaluator()
            .with_context(|| format!("invalid evaluator for player {side}"))?;
        agents.push(build_agent(&policy, evaluator, config.weights));
    }
    let player2 = agents.pop().context("missing agent for player 2")?;
    let player1 = agents.pop().context("missing agent for player 1")?;

    let mut host = GameHost::new(player1, player2, config.game.move_budget());
    println!(
        "Player 1: {}\nPlayer 2: {}\n",
        host.player_name(Side::One),
        host.player_name(Side::Two)
    );

    let start = Board::with_stones(config.game.stones);
    let mut stdout = io::stdout();
    BoardView::new(&start).colour(colour).render(&mut stdout)?;
    println!();

    let record = host.play(start, |board, played| {
        if played.captured > 0 {
            println!(
                "Player {} plays pit {} and captures {}",
                played.side, played.pit, played.captured
            );
        } else {
            println!("Player {} plays pit {}", played.side, played.pit);
        }
        if let Err(e) = BoardView::new(board)
            .last_move(played.side, played.pit)
            .colour(colour)
            .render(&mut stdout)
        {
            warn!("failed to draw board: {e}");
        }
        if played.extra_turn && !board.is_game_over() {
            println!("Player {} moves again", played.side);
        }
        println!();
    })?;

    let one = record.board.store(Side::One);
    let two = record.board.store(Side::Two);
    let moves = record.moves.len();
    match record.winner {
        Some(side) => println!("Player {side} wins {one}-{two} after {moves} moves"),
        None => println!("Draw {one}-{two} after {moves} moves"),
    }
    let thinking: Duration = record.moves.iter().map(|m| m.elapsed).sum();
    let total_ms = thinking.as_millis() as u64;
    info!(total_ms, "total decision time");
    io::stdout().flush()?;
    Ok(())
}

struct SearchReport {
    algorithm: Algorithm,
    result: SearchResult<Pit>,
    stats: SearchStats,
    depth: u8,
    elapsed: Duration,
}

fn search<E: Evaluator<Board>>(
    board: &Board,
    side: Side,
    depth: u8,
    algorithm: Algorithm,
    budget: Duration,
    evaluator: &E,
) -> SearchReport {
    let start = Instant::now();
    let (result, stats, depth) = match algorithm {
        Algorithm::Minimax => {
            let mut minimax = Minimax::new(evaluator);
            let result = minimax.choose_move(board, side, depth);
            (result, minimax.stats(), depth)
        }
        Algorithm::AlphaBeta => {
            let mut alpha_beta = AlphaBeta::new(evaluator);
            let result = alpha_beta.choose_move(board, side, depth);
            (result, alpha_beta.stats(), depth)
        }
        Algorithm::Custom => {
            let outcome = DeepeningSearch::new(evaluator, budget).search(board, side, depth);
            (outcome.result, outcome.stats, outcome.depth)
        }
    };

    SearchReport {
        algorithm,
        result,
        stats,
        depth,
        elapsed: start.elapsed(),
    }
}

fn print_search_report(report: &SearchReport) {
    let secs = report.elapsed.as_secs_f64();
    println!("Algorithm: {:?}", report.algorithm);
    match report.result.best_move {
        Some(pit) => println!("Best move: pit {pit}"),
        None => println!("Best move: none (game over)"),
    }
    println!("Score: {:.2}", report.result.score);
    println!("Depth: {}", report.depth);
    println!("Nodes: {}", report.stats.nodes);
    println!("Evaluations: {}", report.stats.evaluations);
    println!("Cutoffs: {}", report.stats.cutoffs);
    println!("Time: {:.3}s", secs);
    if secs > 0.0 {
        println!("NPS: {:.0}", report.stats.nodes as f64 / secs);
    }
}

fn print_evaluation(board: &Board, config: &MancalaConfig) {
    let heuristic = MancalaEvaluator::new(config.weights);
    println!("{board}\n");
    println!("Notation: {}", board.to_notation());
    println!("Game over: {}", board.is_game_over());
    for side in Side::ALL {
        let features = SideFeatures::measure(board, side);
        println!();
        println!("Player {side}");
        println!("  Baseline:  {:.2}", BaselineEvaluator.score(board, side));
        println!("  Heuristic: {:.2}", heuristic.score(board, side));
        println!("  Blend:     {:.2}", heuristic.blend(board, side));
        println!(
            "  Banked {} / in play {} / exposure {} / capture {}",
            features.banked, features.in_play, features.exposure, features.capture
        );
    }
}

fn run_perft(board: &Board, side: Side, depth: u8, divide: bool) {
    let start = Instant::now();
    let nodes: u64 = if divide {
        let counts = perft_divide(board, side, depth);
        for (pit, count) in &counts {
            println!("{pit}: {count}");
        }
        counts.iter().map(|(_, count)| count).sum()
    } else {
        perft(board, side, depth)
    };
    let elapsed = start.elapsed();
    println!("\nNodes: {nodes}");
    println!("Time: {:.3}s", elapsed.as_secs_f64());
}
