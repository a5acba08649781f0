//! Game metadata for UI and configuration
//!
//! This module provides display-oriented metadata about games that can be
//! used by frontends, match drivers, and trainers to configure themselves.

use serde::{Deserialize, Serialize};

/// Metadata about a game for UI display and configuration
///
/// This struct contains all the information needed to:
/// - Display the game in a UI (board dimensions, player symbols)
/// - Size policy and value heads (obs_size, num_actions)
/// - Parse observations correctly (legal_mask_offset)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameMetadata {
    /// Environment identifier (e.g., "boop")
    pub env_id: String,

    /// Human-readable display name
    pub display_name: String,

    /// Board width in cells
    pub board_width: usize,

    /// Board height in cells
    pub board_height: usize,

    /// Number of possible actions
    pub num_actions: usize,

    /// Size of observation vector (number of f32 values)
    pub obs_size: usize,

    /// Offset in observation where legal moves mask starts
    /// (index of first legal move indicator in the obs array)
    pub legal_mask_offset: usize,

    /// Number of players (typically 2)
    pub player_count: usize,

    /// Display names for each player
    pub player_names: Vec<String>,

    /// Single-character symbols for each player
    pub player_symbols: Vec<char>,

    /// Brief description of the game rules for UI tooltips
    pub description: String,

    /// Board rendering type for the frontend
    /// - "grid": clicks place pieces directly on a cell
    /// - "grid_pieces": like "grid", but the player also picks a piece kind
    pub board_type: String,
}

impl GameMetadata {
    /// Create a new GameMetadata with required fields
    pub fn new(env_id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            env_id: env_id.into(),
            display_name: display_name.into(),
            board_width: 0,
            board_height: 0,
            num_actions: 0,
            obs_size: 0,
            legal_mask_offset: 0,
            player_count: 2,
            player_names: vec!["Player 1".to_string(), "Player 2".to_string()],
            player_symbols: vec!['1', '2'],
            description: String::new(),
            board_type: "grid".to_string(),
        }
    }

    /// Builder method for board dimensions
    pub fn with_board(mut self, width: usize, height: usize) -> Self {
        self.board_width = width;
        self.board_height = height;
        self
    }

    /// Builder method for action count
    pub fn with_actions(mut self, num_actions: usize) -> Self {
        self.num_actions = num_actions;
        self
    }

    /// Builder method for observation size and legal mask offset
    pub fn with_observation(mut self, obs_size: usize, legal_mask_offset: usize) -> Self {
        self.obs_size = obs_size;
        self.legal_mask_offset = legal_mask_offset;
        self
    }

    /// Builder method for player information
    pub fn with_players(mut self, count: usize, names: Vec<String>, symbols: Vec<char>) -> Self {
        self.player_count = count;
        self.player_names = names;
        self.player_symbols = symbols;
        self
    }

    /// Builder method for description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Builder method for board type
    pub fn with_board_type(mut self, board_type: impl Into<String>) -> Self {
        self.board_type = board_type.into();
        self
    }

    /// Get the total number of board cells
    pub fn board_size(&self) -> usize {
        self.board_width * self.board_height
    }

    /// Extract the legal moves mask from observation bytes.
    ///
    /// The observation contains f32 values where indices starting at
    /// `legal_mask_offset` are the legal moves (1.0 = legal, 0.0 = illegal).
    ///
    /// Returns an all-legal mask if the observation is too short. Action
    /// spaces wider than 64 are common (Boop has 72), so the mask is a
    /// `Vec<bool>` rather than packed bits.
    pub fn extract_legal_mask(&self, obs: &[u8]) -> Vec<bool> {
        let legal_start_byte = self.legal_mask_offset * 4;
        let legal_end_byte = legal_start_byte + self.num_actions * 4;

        if obs.len() < legal_end_byte {
            return vec![true; self.num_actions];
        }

        obs[legal_start_byte..legal_end_byte]
            .chunks_exact(4)
            .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]) > 0.5)
            .collect()
    }

    /// Extract legal move indices from observation bytes.
    pub fn extract_legal_moves(&self, obs: &[u8]) -> Vec<usize> {
        self.extract_legal_mask(obs)
            .into_iter()
            .enumerate()
            .filter_map(|(i, legal)| legal.then_some(i))
            .collect()
    }

    /// Check if a specific action is legal given the observation bytes.
    pub fn is_action_legal(&self, obs: &[u8], action: usize) -> bool {
        if action >= self.num_actions {
            return false;
        }
        self.extract_legal_mask(obs)[action]
    }
}
