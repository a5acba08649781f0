//! Boop for the engine framework
//!
//! Two players take turns placing kittens and cats on a 6x6 bed. A placed
//! piece pushes ("boops") its neighbours one cell away, three of a kind in
//! a row graduate, and three cats in a row win.
//!
//! # Usage
//!
//! ```rust
//! use engine_core::Game;
//! use games_boop::{Action, Boop};
//!
//! let game = Boop::standard();
//! let state = game.initial_state();
//! let next = game.apply(&state, Action::kitten(2, 2)).unwrap();
//! assert_eq!(game.current_player(&next), 2);
//! ```

pub mod action;
pub mod board;
pub mod boop;
pub mod codec;
pub mod controller;
pub mod error;
pub mod graduation;
pub mod observation;
pub mod record;
pub mod rules;
pub mod state;
pub mod strategy;
pub mod win;

pub use action::{Action, NUM_ACTIONS};
pub use board::{Board, Piece, PieceKind, Player, Position};
pub use boop::{BoopOutcome, Push};
pub use controller::{TurnPhase, TurnReport};
pub use error::{GameError, IllegalReason, RecordError, RulesError, SetupError};
pub use graduation::Graduation;
pub use observation::{Observation, OBS_SIZE};
pub use record::{play_game, GameRecord};
pub use rules::{GraduationPolicy, Rules};
pub use state::{DrawReason, GameState, GameStateBuilder, Status, Supply};
pub use strategy::{AggressiveChooser, DefensiveChooser, GreedyChooser, SmartChooser};
pub use win::WinKind;

use engine_config::GameConfig;
use engine_core::typed::{
    ActionSpace, Capabilities, DecodeError, EncodeError, Encoding, EngineId, Game, Outcome,
};
use engine_core::{game_utils, GameMetadata};

/// Boop game implementation
#[derive(Debug, Clone, Copy, Default)]
pub struct Boop {
    rules: Rules,
}

impl Boop {
    /// Create a game with the given rule set
    pub fn new(rules: Rules) -> Self {
        Self { rules }
    }

    /// Standard rules: 8 kittens, 8 cats, kittens promote, 200 ply cap
    pub fn standard() -> Self {
        Self::new(Rules::standard())
    }

    /// Build from the `[game]` section of the central config
    pub fn from_config(config: &GameConfig) -> Result<Self, RulesError> {
        Rules::try_from(config).map(Self::new)
    }

    pub fn rules(&self) -> &Rules {
        &self.rules
    }
}

impl Game for Boop {
    type State = GameState;
    type Action = Action;
    type Obs = Observation;
    type Error = GameError;

    fn engine_id(&self) -> EngineId {
        EngineId {
            env_id: "boop".to_string(),
            build_id: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities {
            id: self.engine_id(),
            encoding: Encoding {
                state: "boop_state:v1".to_string(),
                action: "discrete_placement:v1".to_string(),
                obs: format!("f32x{}:v1", OBS_SIZE),
                schema_version: codec::SCHEMA_VERSION as u32,
            },
            max_horizon: match self.rules.max_plies {
                0 => u32::MAX,
                n => n,
            },
            action_space: ActionSpace::Discrete(NUM_ACTIONS as u32),
            preferred_batch: 64,
        }
    }

    fn metadata(&self) -> GameMetadata {
        GameMetadata::new("boop", "Boop")
            .with_board(board::SIZE, board::SIZE)
            .with_board_type("grid_pieces")
            .with_actions(NUM_ACTIONS)
            .with_observation(OBS_SIZE, observation::LEGAL_MASK_OFFSET)
            .with_players(
                2,
                vec!["Player 1".to_string(), "Player 2".to_string()],
                vec!['K', 'k'],
            )
            .with_description("Boop your opponent's kittens off the bed and line up three cats!")
    }

    fn num_actions(&self) -> usize {
        NUM_ACTIONS
    }

    fn initial_state(&self) -> GameState {
        GameState::new(self.rules)
    }

    fn current_player(&self, state: &GameState) -> u8 {
        state.to_move().number()
    }

    fn ply(&self, state: &GameState) -> u32 {
        state.ply()
    }

    fn outcome(&self, state: &GameState) -> Option<Outcome> {
        state.outcome()
    }

    fn legal_actions(&self, state: &GameState, out: &mut Vec<Action>) {
        state.legal_moves_into(out);
    }

    fn apply(&self, state: &GameState, action: Action) -> Result<GameState, GameError> {
        state.apply_move(action)
    }

    fn action_index(&self, action: Action) -> usize {
        action.index()
    }

    fn action_from_index(&self, index: usize) -> Option<Action> {
        Action::from_index(index)
    }

    fn observe(&self, state: &GameState) -> Observation {
        Observation::from_state(state)
    }

    fn encode_state(state: &GameState, out: &mut Vec<u8>) -> Result<(), EncodeError> {
        codec::encode_state(state, out)
    }

    fn decode_state(buf: &[u8]) -> Result<GameState, DecodeError> {
        codec::decode_state(buf)
    }

    fn encode_action(action: &Action, out: &mut Vec<u8>) -> Result<(), EncodeError> {
        // Encode as u32 in little-endian format (4 bytes)
        out.extend_from_slice(&(action.index() as u32).to_le_bytes());
        Ok(())
    }

    fn decode_action(buf: &[u8]) -> Result<Action, DecodeError> {
        let bytes: [u8; 4] = buf.try_into().map_err(|_| DecodeError::InvalidLength {
            expected: 4,
            actual: buf.len(),
        })?;
        let index = u32::from_le_bytes(bytes);
        Action::from_index(index as usize).ok_or_else(|| {
            DecodeError::CorruptedData(format!("Invalid action index: {}", index))
        })
    }

    fn encode_obs(obs: &Observation, out: &mut Vec<u8>) -> Result<(), EncodeError> {
        game_utils::encode_f32_slices(
            out,
            [
                &obs.board_view[..],
                &obs.legal_moves[..],
                &obs.current_player[..],
                &obs.pools[..],
            ],
        );
        Ok(())
    }
}
