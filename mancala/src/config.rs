//! Configuration for the mancala host.
//!
//! Settings are loaded with the following priority (highest to lowest):
//! 1. Command-line flags
//! 2. Environment variables (`MANCALA_<SECTION>_<KEY>`)
//! 3. mancala.toml
//! 4. Built-in defaults
//!
//! ```text
//! MANCALA_GAME_STONES=3
//! MANCALA_PLAYER1_POLICY=minimax
//! MANCALA_PLAYER2_PLY=6
//! MANCALA_WEIGHTS_CAPTURE=1.5
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{ensure, Context, Result};
use mancala_agents::{AgentError, EvaluatorKind, HeuristicWeights, Policy, PolicyKind};
use mancala_core::MAX_STARTING_STONES;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Standard locations to search for mancala.toml
pub const CONFIG_SEARCH_PATHS: &[&str] = &["mancala.toml", "../mancala.toml"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MancalaConfig {
    pub game: GameSection,
    pub player1: PlayerSection,
    pub player2: PlayerSection,
    pub weights: HeuristicWeights,
}

impl Default for MancalaConfig {
    fn default() -> Self {
        Self {
            game: GameSection::default(),
            player1: PlayerSection {
                policy: "human".to_string(),
                ..PlayerSection::default()
            },
            player2: PlayerSection::default(),
            weights: HeuristicWeights::default(),
        }
    }
}

impl MancalaConfig {
    /// Rejects values that would break a game instead of being ignored.
    pub fn validate(&self) -> Result<()> {
        ensure!(
            (1..=MAX_STARTING_STONES).contains(&self.game.stones),
            "game.stones must be between 1 and {MAX_STARTING_STONES}, got {}",
            self.game.stones
        );
        ensure!(
            self.game.move_budget_secs.is_finite() && self.game.move_budget_secs >= 0.0,
            "game.move_budget_secs must be a non-negative number, got {}",
            self.game.move_budget_secs
        );

        let w = &self.weights;
        for (name, value) in [
            ("banked", w.banked),
            ("in_play", w.in_play),
            ("exposure", w.exposure),
            ("capture", w.capture),
            ("scale", w.scale),
        ] {
            ensure!(
                value.is_finite(),
                "weights.{name} must be finite, got {value}"
            );
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameSection {
    /// Stones per pit at the start
    pub stones: u16,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Decisions slower than this are reported
    pub move_budget_secs: f64,
}

impl Default for GameSection {
    fn default() -> Self {
        Self {
            stones: mancala_core::STARTING_STONES,
            log_level: "info".to_string(),
            move_budget_secs: 10.0,
        }
    }
}

impl GameSection {
    pub fn move_budget(&self) -> Duration {
        Duration::try_from_secs_f64(self.move_budget_secs).unwrap_or(mancala_agents::DEFAULT_BUDGET)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerSection {
    /// human, random, minimax, alphabeta or custom
    pub policy: String,
    /// Search depth in plies
    pub ply: u8,
    /// baseline or heuristic
    pub evaluator: String,
    /// Seed for the random policy
    pub seed: Option<u64>,
    /// Time budget of the custom policy
    pub budget_secs: Option<f64>,
}

impl Default for PlayerSection {
    fn default() -> Self {
        Self {
            policy: "alphabeta".to_string(),
            ply: 4,
            evaluator: "heuristic".to_string(),
            seed: None,
            budget_secs: None,
        }
    }
}

impl PlayerSection {
    pub fn policy(&self) -> Result<Policy, AgentError> {
        let kind: PolicyKind = self.policy.parse()?;
        let budget = self.budget_secs.and_then(|secs| Duration::try_from_secs_f64(secs).ok());
        Ok(Policy::from_kind(kind, self.ply, self.seed, budget))
    }

    pub fn evaluator(&self) -> Result<EvaluatorKind, AgentError> {
        self.evaluator.parse()
    }
}

/// Load the configuration.
///
/// Searches for mancala.toml in the following order:
/// 1. Path specified by the MANCALA_CONFIG environment variable
/// 2. Current directory
/// 3. Parent directory
///
/// Environment overrides are applied on top.
pub fn load_config() -> MancalaConfig {
    if let Ok(path) = std::env::var("MANCALA_CONFIG") {
        let path = PathBuf::from(&path);
        if path.exists() {
            info!("Loading config from MANCALA_CONFIG: {}", path.display());
            return load_from_path(&path);
        }
        let shown = path.display();
        warn!("MANCALA_CONFIG={shown} not found, searching defaults");
    }

    for path_str in CONFIG_SEARCH_PATHS {
        let path = PathBuf::from(path_str);
        if path.exists() {
            info!("Loading config from {}", path.display());
            return load_from_path(&path);
        }
    }

    debug!("No mancala.toml found, using built-in defaults");
    apply_env_overrides(MancalaConfig::default())
}

/// Load configuration from a specific path, falling back to defaults when
/// the file cannot be read or parsed.
pub fn load_from_path(path: &Path) -> MancalaConfig {
    match std::fs::read_to_string(path) {
        Ok(content) => match parse_config(&content) {
            Ok(config) => apply_env_overrides(config),
            Err(e) => {
                warn!("Failed to parse {}: {}, using defaults", path.display(), e);
                apply_env_overrides(MancalaConfig::default())
            }
        },
        Err(e) => {
            warn!("Failed to read {}: {}, using defaults", path.display(), e);
            apply_env_overrides(MancalaConfig::default())
        }
    }
}

/// Load configuration from a path named on the command line. Unlike the
/// search in [`load_config`], a missing or malformed file is an error.
pub fn load_required(path: &Path) -> Result<MancalaConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let config = parse_config(&content)
        .with_context(|| format!("failed to parse config {}", path.display()))?;
    info!("Loaded config from {}", path.display());
    Ok(apply_env_overrides(config))
}

pub fn parse_config(content: &str) -> Result<MancalaConfig, toml::de::Error> {
    toml::from_str(content)
}

/// Macro to reduce override boilerplate
macro_rules! override_field {
    // String field
    ($lookup:expr, $config:expr, $section:ident . $field:ident, $key:expr) => {
        if let Some(v) = $lookup($key) {
            $config.$section.$field = v;
        }
    };
    // Parseable field
    ($lookup:expr, $config:expr, $section:ident . $field:ident, $key:expr, parse) => {
        if let Some(v) = $lookup($key).and_then(|s| s.parse().ok()) {
            $config.$section.$field = v;
        }
    };
    // Optional parseable field
    ($lookup:expr, $config:expr, $section:ident . $field:ident, $key:expr, optional_parse) => {
        if let Some(v) = $lookup($key).and_then(|s| s.parse().ok()) {
            $config.$section.$field = Some(v);
        }
    };
}

/// Apply environment variable overrides to a configuration.
pub fn apply_env_overrides(config: MancalaConfig) -> MancalaConfig {
    apply_overrides(config, |key| std::env::var(key).ok())
}

/// Apply `MANCALA_<SECTION>_<KEY>` overrides read through `lookup`.
pub fn apply_overrides<F>(mut config: MancalaConfig, lookup: F) -> MancalaConfig
where
    F: Fn(&str) -> Option<String>,
{
    override_field!(lookup, config, game.stones, "MANCALA_GAME_STONES", parse);
    override_field!(lookup, config, game.log_level, "MANCALA_GAME_LOG_LEVEL");
    override_field!(
        lookup,
        config,
        game.move_budget_secs,
        "MANCALA_GAME_MOVE_BUDGET_SECS",
        parse
    );

    override_field!(lookup, config, player1.policy, "MANCALA_PLAYER1_POLICY");
    override_field!(lookup, config, player1.ply, "MANCALA_PLAYER1_PLY", parse);
    override_field!(
        lookup,
        config,
        player1.evaluator,
        "MANCALA_PLAYER1_EVALUATOR"
    );
    override_field!(
        lookup,
        config,
        player1.seed,
        "MANCALA_PLAYER1_SEED",
        optional_parse
    );
    override_field!(
        lookup,
        config,
        player1.budget_secs,
        "MANCALA_PLAYER1_BUDGET_SECS",
        optional_parse
    );

    override_field!(lookup, config, player2.policy, "MANCALA_PLAYER2_POLICY");
    override_field!(lookup, config, player2.ply, "MANCALA_PLAYER2_PLY", parse);
    override_field!(
        lookup,
        config,
        player2.evaluator,
        "MANCALA_PLAYER2_EVALUATOR"
    );
    override_field!(
        lookup,
        config,
        player2.seed,
        "MANCALA_PLAYER2_SEED",
        optional_parse
    );
    override_field!(
        lookup,
        config,
        player2.budget_secs,
        "MANCALA_PLAYER2_BUDGET_SECS",
        optional_parse
    );

    override_field!(
        lookup,
        config,
        weights.banked,
        "MANCALA_WEIGHTS_BANKED",
        parse
    );
    override_field!(
        lookup,
        config,
        weights.in_play,
        "MANCALA_WEIGHTS_IN_PLAY",
        parse
    );
    override_field!(
        lookup,
        config,
        weights.exposure,
        "MANCALA_WEIGHTS_EXPOSURE",
        parse
    );
    override_field!(
        lookup,
        config,
        weights.capture,
        "MANCALA_WEIGHTS_CAPTURE",
        parse
    );
    override_field!(
        lookup,
        config,
        weights.scale,
        "MANCALA_WEIGHTS_SCALE",
        parse
    );

    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let config = MancalaConfig::default();
        assert_eq!(config.game.stones, 4);
        assert_eq!(config.player1.policy, "human");
        assert_eq!(config.player2.policy, "alphabeta");
        let policy = config.player2.policy().unwrap();
        assert_eq!(policy, Policy::AlphaBeta { ply: 4 });
        assert_eq!(config.game.move_budget(), Duration::from_secs(10));
    }

    #[test]
    fn test_parse_partial_file() {
        let config = parse_config(
            r#"
            [game]
            stones = 3

            [player1]
            policy = "random"
            seed = 7

            [player2]
            policy = "custom"
            budget_secs = 1.5

            [weights]
            capture = 2.0
            "#,
        )
        .unwrap();

        assert_eq!(config.game.stones, 3);
        assert_eq!(config.game.log_level, "info");
        let policy = config.player1.policy().unwrap();
        assert_eq!(policy, Policy::Random { seed: Some(7) });
        assert_eq!(
            config.player2.policy().unwrap(),
            Policy::Custom {
                budget: Duration::from_millis(1500),
                max_ply: 4
            }
        );
        assert_eq!(config.weights.capture, 2.0);
        assert_eq!(config.weights.banked, HeuristicWeights::default().banked);
    }

    #[test]
    fn test_unknown_policy_is_reported() {
        let config = parse_config("[player2]\npolicy = \"oracle\"\n").unwrap();
        assert!(matches!(
            config.player2.policy(),
            Err(AgentError::UnknownPolicy(_))
        ));
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("MANCALA_GAME_STONES", "5"),
            ("MANCALA_PLAYER1_POLICY", "minimax"),
            ("MANCALA_PLAYER1_PLY", "6"),
            ("MANCALA_PLAYER2_SEED", "11"),
            ("MANCALA_PLAYER2_PLY", "not-a-number"),
            ("MANCALA_WEIGHTS_EXPOSURE", "0.25"),
        ]);
        let config = apply_overrides(MancalaConfig::default(), |key| {
            vars.get(key).map(|v| v.to_string())
        });

        assert_eq!(config.game.stones, 5);
        let policy = config.player1.policy().unwrap();
        assert_eq!(policy, Policy::Minimax { ply: 6 });
        assert_eq!(config.player2.seed, Some(11));
        // Unparseable values are ignored
        assert_eq!(config.player2.ply, 4);
        assert_eq!(config.weights.exposure, 0.25);
    }

    #[test]
    fn test_load_from_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("mancala.toml");
        std::fs::write(&path, "[player2]\nply = 7\nevaluator = \"baseline\"\n").unwrap();

        let config = load_from_path(&path);
        assert_eq!(config.player2.ply, 7);
        assert_eq!(config.player2.evaluator().unwrap(), EvaluatorKind::Baseline);

        std::fs::write(&path, "this is not toml = = =").unwrap();
        let fallback = load_from_path(&path);
        assert_eq!(fallback.player2.ply, PlayerSection::default().ply);

        let missing = load_from_path(&dir.path().join("missing.toml"));
        assert_eq!(missing.game.stones, 4);
    }

    #[test]
    fn test_load_required_reports_bad_files() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("mancala.toml");

        let err = load_required(&path).unwrap_err();
        assert!(format!("{err:#}").contains("failed to read config"));

        std::fs::write(&path, "[game\nstones = 3\n").unwrap();
        let err = load_required(&path).unwrap_err();
        assert!(format!("{err:#}").contains("failed to parse config"));

        std::fs::write(&path, "[game]\nstones = 3\n").unwrap();
        assert_eq!(load_required(&path).unwrap().game.stones, 3);
    }

    #[test]
    fn test_validate() {
        assert!(MancalaConfig::default().validate().is_ok());

        let mut config = MancalaConfig::default();
        config.game.stones = MAX_STARTING_STONES;
        assert!(config.validate().is_ok());

        let oversized = apply_overrides(MancalaConfig::default(), |key| {
            (key == "MANCALA_GAME_STONES").then(|| "6000".to_string())
        });
        assert_eq!(oversized.game.stones, 6000);
        assert!(oversized.validate().is_err());

        config.game.stones = 0;
        assert!(config.validate().is_err());

        let unscorable = apply_overrides(MancalaConfig::default(), |key| {
            (key == "MANCALA_WEIGHTS_CAPTURE").then(|| "NaN".to_string())
        });
        assert!(unscorable.weights.capture.is_nan());
        let err = unscorable.validate().unwrap_err();
        assert!(err.to_string().contains("weights.capture"));
    }
}
