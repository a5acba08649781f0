//! Shared utilities for two-player game implementations
//!
//! Common functionality used by game implementations and search code so
//! reward conventions stay consistent everywhere.

use crate::typed::Outcome;

/// The other player in a two-player game (1 <-> 2).
#[inline]
pub fn opponent(player: u8) -> u8 {
    3 - player
}

/// Calculate reward for a two-player zero-sum game.
///
/// Returns the reward of `outcome` from the perspective of `player`.
///
/// # Returns
/// * `1.0` if `player` won
/// * `-1.0` if `player` lost
/// * `0.0` for draws or ongoing games
///
/// # Example
/// ```
/// use engine_core::game_utils::calculate_reward;
/// use engine_core::Outcome;
///
/// assert_eq!(calculate_reward(Some(Outcome::Win(1)), 1), 1.0);
/// assert_eq!(calculate_reward(Some(Outcome::Win(1)), 2), -1.0);
/// assert_eq!(calculate_reward(Some(Outcome::Draw), 1), 0.0);
/// assert_eq!(calculate_reward(None, 1), 0.0);
/// ```
#[inline]
pub fn calculate_reward(outcome: Option<Outcome>, player: u8) -> f32 {
    match outcome {
        Some(Outcome::Win(winner)) if winner == player => 1.0,
        Some(Outcome::Win(_)) => -1.0,
        Some(Outcome::Draw) | None => 0.0,
    }
}

/// Encode multiple f32 slices to bytes in little-endian format.
///
/// This is a common pattern for encoding observations that consist of
/// multiple float arrays (board planes, legal moves, current player).
///
/// # Example
/// ```
/// use engine_core::game_utils::encode_f32_slices;
///
/// let board = [1.0f32, 0.0, 0.0];
/// let legal = [1.0f32, 1.0, 1.0];
/// let player = [1.0f32, 0.0];
///
/// let mut buf = Vec::new();
/// encode_f32_slices(&mut buf, [&board[..], &legal[..], &player[..]]);
///
/// // Should be 8 floats * 4 bytes = 32 bytes
/// assert_eq!(buf.len(), 32);
/// ```
pub fn encode_f32_slices<'a>(out: &mut Vec<u8>, slices: impl IntoIterator<Item = &'a [f32]>) {
    for slice in slices {
        for &value in slice {
            out.extend_from_slice(&value.to_le_bytes());
        }
    }
}

/// Decode little-endian f32 values, the inverse of [`encode_f32_slices`].
///
/// Returns `None` if the buffer length is not a multiple of four.
pub fn decode_f32s(buf: &[u8]) -> Option<Vec<f32>> {
    if buf.len() % 4 != 0 {
        return None;
    }
    Some(
        buf.chunks_exact(4)
            .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
            .collect(),
    )
}
