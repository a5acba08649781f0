//! Configuration struct definitions.
//!
//! All config structs with serde deserialization support and default values.

use crate::defaults;
use serde::Deserialize;

// ============================================================================
// Serde default functions (required for #[serde(default = "...")])
// These call the accessor functions from defaults module
// ============================================================================

fn d_seed() -> u64 {
    defaults::seed()
}
fn d_kittens() -> u8 {
    defaults::kittens()
}
fn d_cats() -> u8 {
    defaults::cats()
}
fn d_graduation_policy() -> String {
    defaults::graduation_policy().into()
}
fn d_max_plies() -> u32 {
    defaults::max_plies()
}
fn d_num_sims() -> u32 {
    defaults::num_simulations()
}
fn d_c_puct() -> f64 {
    defaults::c_puct()
}
fn d_temperature() -> f64 {
    defaults::temperature()
}
fn d_temp_threshold() -> u32 {
    defaults::temp_threshold()
}
fn d_dirichlet_alpha() -> f64 {
    defaults::dirichlet_alpha()
}
fn d_dirichlet_weight() -> f64 {
    defaults::dirichlet_weight()
}
fn d_prior_tolerance() -> f64 {
    defaults::prior_tolerance()
}
fn d_uniform_fallback() -> bool {
    defaults::uniform_fallback()
}

// ============================================================================
// Configuration Structs
// ============================================================================

/// Root configuration structure matching config.toml
#[derive(Debug, Deserialize, Default, Clone)]
pub struct CentralConfig {
    #[serde(default)]
    pub common: CommonConfig,
    #[serde(default)]
    pub game: GameConfig,
    #[serde(default)]
    pub mcts: MctsConfig,
}

/// Common configuration shared by all components
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct CommonConfig {
    /// Seed for every RNG a run creates (choosers, Dirichlet noise)
    #[serde(default = "d_seed")]
    pub seed: u64,
}

impl Default for CommonConfig {
    fn default() -> Self {
        Self {
            seed: defaults::seed(),
        }
    }
}

/// Boop rule variant
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct GameConfig {
    /// Kittens each player starts with in their pool
    #[serde(default = "d_kittens")]
    pub kittens: u8,
    /// Cats each player holds in reserve until kittens graduate
    #[serde(default = "d_cats")]
    pub cats: u8,
    /// "promote_kittens" or "release_three_cats"
    #[serde(default = "d_graduation_policy")]
    pub graduation_policy: String,
    /// Draw after this many plies (0 = unlimited)
    #[serde(default = "d_max_plies")]
    pub max_plies: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            kittens: defaults::kittens(),
            cats: defaults::cats(),
            graduation_policy: defaults::graduation_policy().into(),
            max_plies: defaults::max_plies(),
        }
    }
}

/// MCTS (Monte Carlo Tree Search) configuration
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct MctsConfig {
    #[serde(default = "d_num_sims")]
    pub num_simulations: u32,
    #[serde(default = "d_c_puct")]
    pub c_puct: f64,
    #[serde(default = "d_temperature")]
    pub temperature: f64,
    /// Ply after which move selection switches to greedy
    #[serde(default = "d_temp_threshold")]
    pub temp_threshold: u32,
    #[serde(default = "d_dirichlet_alpha")]
    pub dirichlet_alpha: f64,
    /// Set to 0 to disable root noise
    #[serde(default = "d_dirichlet_weight")]
    pub dirichlet_weight: f64,
    /// Allowed deviation of legal prior mass from 1.0
    #[serde(default = "d_prior_tolerance")]
    pub prior_tolerance: f64,
    /// Substitute uniform priors when the evaluator breaks its contract
    #[serde(default = "d_uniform_fallback")]
    pub uniform_fallback: bool,
}

impl Default for MctsConfig {
    fn default() -> Self {
        Self {
            num_simulations: defaults::num_simulations(),
            c_puct: defaults::c_puct(),
            temperature: defaults::temperature(),
            temp_threshold: defaults::temp_threshold(),
            dirichlet_alpha: defaults::dirichlet_alpha(),
            dirichlet_weight: defaults::dirichlet_weight(),
            prior_tolerance: defaults::prior_tolerance(),
            uniform_fallback: defaults::uniform_fallback(),
        }
    }
}
