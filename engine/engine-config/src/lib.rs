//! Centralized configuration loading from config.toml.
//!
//! This crate provides configuration structs and loading logic shared
//! by the Boop rules and the search.
//!
//! # Configuration Priority
//!
//! Settings are loaded with the following priority (highest to lowest):
//! 1. Environment variables (`BOOP_<SECTION>_<KEY>`)
//! 2. config.toml file (`BOOP_CONFIG`, then `config.toml`, then `../config.toml`)
//! 3. Built-in defaults embedded from `config.defaults.toml`
//!
//! # Environment Variable Override Pattern
//!
//! ```text
//! BOOP_<SECTION>_<KEY>=value
//!
//! Examples:
//!     BOOP_COMMON_SEED=7
//!     BOOP_GAME_GRADUATION_POLICY=release_three_cats
//!     BOOP_GAME_MAX_PLIES=0
//!     BOOP_MCTS_NUM_SIMULATIONS=200
//! ```

mod defaults;
mod loader;
mod structs;

pub use defaults::*;
pub use loader::{
    apply_env_overrides, load_config, load_config_with_source, load_from_path, locate_config,
    parse_config, ConfigSource, CONFIG_PATH_ENV, CONFIG_SEARCH_PATHS,
};
pub use structs::*;
