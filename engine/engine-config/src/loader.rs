//! Configuration loading logic.
//!
//! Picks a config file, parses it, and layers `BOOP_*` environment
//! variables on top.

use std::fmt;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::CentralConfig;

/// Environment variable naming an explicit config file.
pub const CONFIG_PATH_ENV: &str = "BOOP_CONFIG";

/// Standard locations to search for config.toml
pub const CONFIG_SEARCH_PATHS: &[&str] = &[
    "config.toml",    // Current directory
    "../config.toml", // Parent directory (when running from a crate directory)
];

/// Where a loaded configuration came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// File named by `BOOP_CONFIG`
    EnvPath(PathBuf),
    /// First hit in [`CONFIG_SEARCH_PATHS`]
    SearchPath(PathBuf),
    /// Nothing found, built-in defaults
    Defaults,
}

impl ConfigSource {
    pub fn path(&self) -> Option<&Path> {
        match self {
            ConfigSource::EnvPath(p) | ConfigSource::SearchPath(p) => Some(p),
            ConfigSource::Defaults => None,
        }
    }
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigSource::EnvPath(p) => write!(f, "{}={}", CONFIG_PATH_ENV, p.display()),
            ConfigSource::SearchPath(p) => write!(f, "{}", p.display()),
            ConfigSource::Defaults => f.write_str("built-in defaults"),
        }
    }
}

/// Decide which file to read.
///
/// A `BOOP_CONFIG` path wins when it exists; otherwise the search paths are
/// tried in order.
pub fn locate_config() -> ConfigSource {
    if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
        let path = PathBuf::from(path);
        if path.exists() {
            return ConfigSource::EnvPath(path);
        }
        warn!(
            path = %path.display(),
            "{} points at a missing file, searching defaults", CONFIG_PATH_ENV
        );
    }

    CONFIG_SEARCH_PATHS
        .iter()
        .map(PathBuf::from)
        .find(|p| p.exists())
        .map(ConfigSource::SearchPath)
        .unwrap_or(ConfigSource::Defaults)
}

/// Load the central configuration, env overrides included.
pub fn load_config() -> CentralConfig {
    load_config_with_source().0
}

/// Like [`load_config`], also reporting where the file came from.
pub fn load_config_with_source() -> (CentralConfig, ConfigSource) {
    let source = locate_config();
    let config = match source.path() {
        Some(path) => {
            info!(source = %source, "Loading config");
            load_from_path(path)
        }
        None => {
            debug!("No config.toml found, using built-in defaults");
            apply_env_overrides(CentralConfig::default())
        }
    };
    (config, source)
}

/// Parse TOML text. Missing sections and keys take their defaults.
pub fn parse_config(text: &str) -> Result<CentralConfig, toml::de::Error> {
    toml::from_str(text)
}

/// Load configuration from a specific path.
///
/// Unreadable or malformed files fall back to the defaults with a warning.
pub fn load_from_path(path: &Path) -> CentralConfig {
    let parsed = std::fs::read_to_string(path)
        .map_err(|e| e.to_string())
        .and_then(|text| parse_config(&text).map_err(|e| e.to_string()));

    let config = parsed.unwrap_or_else(|e| {
        warn!(path = %path.display(), error = %e, "Bad config file, using defaults");
        CentralConfig::default()
    });
    apply_env_overrides(config)
}

/// Macro to reduce env override boilerplate
macro_rules! env_override {
    // String field
    ($config:expr, $section:ident . $field:ident, $key:expr) => {
        if let Ok(v) = std::env::var($key) {
            $config.$section.$field = v;
        }
    };
    // Parseable field (u32, f64, bool, etc.)
    ($config:expr, $section:ident . $field:ident, $key:expr, parse) => {
        if let Ok(raw) = std::env::var($key) {
            match raw.parse() {
                Ok(v) => $config.$section.$field = v,
                Err(_) => warn!(key = $key, value = %raw, "Ignoring unparseable override"),
            }
        }
    };
}

/// Apply environment variable overrides to a configuration.
///
/// Environment variables follow the pattern: BOOP_<SECTION>_<KEY>
/// Values that fail to parse are logged and ignored.
pub fn apply_env_overrides(mut config: CentralConfig) -> CentralConfig {
    env_override!(config, common.seed, "BOOP_COMMON_SEED", parse);

    env_override!(config, game.kittens, "BOOP_GAME_KITTENS", parse);
    env_override!(config, game.cats, "BOOP_GAME_CATS", parse);
    env_override!(config, game.graduation_policy, "BOOP_GAME_GRADUATION_POLICY");
    env_override!(config, game.max_plies, "BOOP_GAME_MAX_PLIES", parse);

    env_override!(config, mcts.num_simulations, "BOOP_MCTS_NUM_SIMULATIONS", parse);
    env_override!(config, mcts.c_puct, "BOOP_MCTS_C_PUCT", parse);
    env_override!(config, mcts.temperature, "BOOP_MCTS_TEMPERATURE", parse);
    env_override!(config, mcts.temp_threshold, "BOOP_MCTS_TEMP_THRESHOLD", parse);
    env_override!(config, mcts.dirichlet_alpha, "BOOP_MCTS_DIRICHLET_ALPHA", parse);
    env_override!(config, mcts.dirichlet_weight, "BOOP_MCTS_DIRICHLET_WEIGHT", parse);
    env_override!(config, mcts.prior_tolerance, "BOOP_MCTS_PRIOR_TOLERANCE", parse);
    env_override!(config, mcts.uniform_fallback, "BOOP_MCTS_UNIFORM_FALLBACK", parse);

    config
}
