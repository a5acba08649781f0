//! Typed Game trait shared by game implementations and search
//!
//! Games implement this trait with strongly-typed state and action types.
//! Search code (MCTS, heuristic choosers, match drivers) is written against
//! the trait only, so it never needs to know a game's rules.

use std::fmt;
use std::hash::Hash;

use serde::{Deserialize, Serialize};

use crate::metadata::GameMetadata;

/// Engine identification information
#[derive(Debug, Clone, PartialEq)]
pub struct EngineId {
    pub env_id: String,
    pub build_id: String,
}

/// Encoding format specifications
#[derive(Debug, Clone, PartialEq)]
pub struct Encoding {
    pub state: String,
    pub action: String,
    pub obs: String,
    pub schema_version: u32,
}

/// Action space variants
#[derive(Debug, Clone, PartialEq)]
pub enum ActionSpace {
    Discrete(u32),
    MultiDiscrete(Vec<u32>),
}

impl ActionSpace {
    /// Total number of flat action indices in this space.
    pub fn cardinality(&self) -> usize {
        match self {
            ActionSpace::Discrete(n) => *n as usize,
            ActionSpace::MultiDiscrete(nvec) => nvec.iter().map(|&n| n as usize).product(),
        }
    }
}

/// Game capabilities and configuration
#[derive(Debug, Clone, PartialEq)]
pub struct Capabilities {
    pub id: EngineId,
    pub encoding: Encoding,
    pub max_horizon: u32,
    pub action_space: ActionSpace,
    pub preferred_batch: u32,
}

/// Final result of a finished game.
///
/// Players are numbered 1 and 2, matching `Game::current_player`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Win(u8),
    Draw,
}

impl Outcome {
    /// Winning player, if any.
    pub fn winner(self) -> Option<u8> {
        match self {
            Outcome::Win(player) => Some(player),
            Outcome::Draw => None,
        }
    }
}

/// Main trait for two-player, deterministic, alternating-turn games.
///
/// States are values: `apply` never mutates its input, so callers (search
/// trees in particular) may keep any number of earlier snapshots alive.
///
/// # Type Parameters
///
/// * `State` - Full game snapshot; `Clone` must be a cheap, deep copy
/// * `Action` - Small `Copy` move description
/// * `Obs` - Network-facing observation, usually contiguous f32 arrays
pub trait Game: Send + Sync + fmt::Debug + 'static {
    /// Game state type - cloned once per simulated ply, keep it flat
    type State: Clone + fmt::Debug + Send + Sync + 'static;

    /// Action type - should be small and Copy
    type Action: Copy + Eq + Hash + fmt::Debug + fmt::Display + Send + Sync + 'static;

    /// Observation type - often contiguous arrays of f32
    type Obs: Send + Sync + 'static;

    /// Error returned when an action cannot be applied
    type Error: std::error::Error + Send + Sync + 'static;

    /// Get engine identification information
    fn engine_id(&self) -> EngineId;

    /// Get game capabilities and configuration
    fn capabilities(&self) -> Capabilities;

    /// Get game metadata for UI and configuration
    fn metadata(&self) -> GameMetadata;

    /// Number of flat action indices (size of policy vectors).
    fn num_actions(&self) -> usize {
        self.capabilities().action_space.cardinality()
    }

    /// Fresh initial state.
    fn initial_state(&self) -> Self::State;

    /// Player to move in `state` (1 or 2).
    fn current_player(&self, state: &Self::State) -> u8;

    /// Plies played to reach `state`. Games without a ply counter keep the
    /// default of 0, which leaves temperature schedules on their opening value.
    fn ply(&self, _state: &Self::State) -> u32 {
        0
    }

    /// Outcome of a finished game, `None` while the game is still running.
    fn outcome(&self, state: &Self::State) -> Option<Outcome>;

    /// Whether no further action can be applied.
    fn is_terminal(&self, state: &Self::State) -> bool {
        self.outcome(state).is_some()
    }

    /// Append every legal action for the player to move to `out`, in
    /// ascending action-index order. Appends nothing for terminal states.
    fn legal_actions(&self, state: &Self::State, out: &mut Vec<Self::Action>);

    /// Apply `action` to `state`, returning the fully resolved successor.
    fn apply(&self, state: &Self::State, action: Self::Action) -> Result<Self::State, Self::Error>;

    /// Stable index of an action in `0..num_actions()`.
    fn action_index(&self, action: Self::Action) -> usize;

    /// Inverse of `action_index`.
    fn action_from_index(&self, index: usize) -> Option<Self::Action>;

    /// Build the network observation for `state`.
    fn observe(&self, state: &Self::State) -> Self::Obs;

    // Encoding/Decoding hooks for serialization

    /// Encode state to bytes
    fn encode_state(state: &Self::State, out: &mut Vec<u8>) -> Result<(), EncodeError>;

    /// Decode state from bytes
    fn decode_state(buf: &[u8]) -> Result<Self::State, DecodeError>;

    /// Encode action to bytes
    fn encode_action(action: &Self::Action, out: &mut Vec<u8>) -> Result<(), EncodeError>;

    /// Decode action from bytes
    fn decode_action(buf: &[u8]) -> Result<Self::Action, DecodeError>;

    /// Encode observation to bytes
    fn encode_obs(obs: &Self::Obs, out: &mut Vec<u8>) -> Result<(), EncodeError>;
}

/// Error type for encoding operations
#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
    #[error("Failed to encode data: {0}")]
    SerializationError(String),
    #[error("Buffer too small, needed {needed} bytes but got {available}")]
    BufferTooSmall { needed: usize, available: usize },
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

/// Error type for decoding operations
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("Failed to decode data: {0}")]
    DeserializationError(String),
    #[error("Invalid buffer length: expected {expected} but got {actual}")]
    InvalidLength { expected: usize, actual: usize },
    #[error("Corrupted data: {0}")]
    CorruptedData(String),
    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}
