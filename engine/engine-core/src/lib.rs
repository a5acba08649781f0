//! Core traits and types for the Boop game engine
//!
//! This crate provides the game-agnostic abstractions search is built on:
//! - `Game`: Typed trait implemented by each game
//! - `Outcome`: Result of a finished game
//! - `MoveChooser`: Common interface for anything that picks moves
//! - `GameMetadata`: Display and sizing information for frontends and trainers

pub mod chooser;
pub mod game_utils;
pub mod metadata;
pub mod typed;

// Re-export main types for convenience
pub use chooser::{ChooserError, MoveChooser, RandomChooser};
pub use metadata::GameMetadata;
pub use typed::{
    ActionSpace, Capabilities, DecodeError, EncodeError, Encoding, EngineId, Game, Outcome,
};
