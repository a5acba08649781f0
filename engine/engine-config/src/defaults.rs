//! Default configuration values loaded from config.defaults.toml.
//!
//! The shared TOML file is embedded at compile time so every binary and
//! test run starts from the same numbers.

use once_cell::sync::Lazy;
use serde::Deserialize;

/// The embedded defaults TOML file (loaded at compile time)
const DEFAULTS_TOML: &str = include_str!("../../../config.defaults.toml");

/// Parsed defaults structure (parsed once at first use)
static DEFAULTS: Lazy<DefaultsConfig> = Lazy::new(|| {
    toml::from_str(DEFAULTS_TOML).expect("config.defaults.toml should be valid TOML")
});

// ============================================================================
// Internal structs for parsing config.defaults.toml
// ============================================================================

#[derive(Debug, Deserialize)]
struct DefaultsConfig {
    common: CommonDefaults,
    game: GameDefaults,
    mcts: MctsDefaults,
}

#[derive(Debug, Deserialize)]
struct CommonDefaults {
    seed: u64,
}

#[derive(Debug, Deserialize)]
struct GameDefaults {
    kittens: u8,
    cats: u8,
    graduation_policy: String,
    max_plies: u32,
}

#[derive(Debug, Deserialize)]
struct MctsDefaults {
    num_simulations: u32,
    c_puct: f64,
    temperature: f64,
    temp_threshold: u32,
    dirichlet_alpha: f64,
    dirichlet_weight: f64,
    prior_tolerance: f64,
    uniform_fallback: bool,
}

// ============================================================================
// Public accessor functions
// ============================================================================

// Common
pub fn seed() -> u64 {
    DEFAULTS.common.seed
}

// Game
pub fn kittens() -> u8 {
    DEFAULTS.game.kittens
}
pub fn cats() -> u8 {
    DEFAULTS.game.cats
}
pub fn graduation_policy() -> &'static str {
    &DEFAULTS.game.graduation_policy
}
pub fn max_plies() -> u32 {
    DEFAULTS.game.max_plies
}

// MCTS
pub fn num_simulations() -> u32 {
    DEFAULTS.mcts.num_simulations
}
pub fn c_puct() -> f64 {
    DEFAULTS.mcts.c_puct
}
pub fn temperature() -> f64 {
    DEFAULTS.mcts.temperature
}
pub fn temp_threshold() -> u32 {
    DEFAULTS.mcts.temp_threshold
}
pub fn dirichlet_alpha() -> f64 {
    DEFAULTS.mcts.dirichlet_alpha
}
pub fn dirichlet_weight() -> f64 {
    DEFAULTS.mcts.dirichlet_weight
}
pub fn prior_tolerance() -> f64 {
    DEFAULTS.mcts.prior_tolerance
}
pub fn uniform_fallback() -> bool {
    DEFAULTS.mcts.uniform_fallback
}
