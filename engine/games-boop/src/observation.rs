//! Network-facing observation
//!
//! Layout (222 f32 values, all from the point of view of the player to move):
//! ```text
//! [  0.. 36) own kittens
//! [ 36.. 72) own cats
//! [ 72..108) opponent kittens
//! [108..144) opponent cats
//! [144..216) legal action mask, indexed like `Action::index`
//! [216..218) current player one-hot [is_player_one, is_player_two]
//! [218..222) pools: own kittens, own cats, opponent kittens, opponent cats,
//!            each divided by the allotment of that kind
//! ```

use crate::action::NUM_ACTIONS;
use crate::board::{PieceKind, Player, CELLS};
use crate::state::GameState;

pub const PLANES: usize = 4;
pub const BOARD_VIEW_SIZE: usize = PLANES * CELLS; // 144
pub const LEGAL_MASK_OFFSET: usize = BOARD_VIEW_SIZE;
pub const OBS_SIZE: usize = BOARD_VIEW_SIZE + NUM_ACTIONS + 2 + 4; // 222

#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub board_view: [f32; BOARD_VIEW_SIZE],
    pub legal_moves: [f32; NUM_ACTIONS],
    pub current_player: [f32; 2],
    pub pools: [f32; 4],
}

impl Observation {
    pub fn from_state(state: &GameState) -> Self {
        let me = state.to_move();
        let mut board_view = [0.0; BOARD_VIEW_SIZE];
        for (pos, piece) in state.board().pieces() {
            let plane = match (piece.owner == me, piece.kind) {
                (true, PieceKind::Kitten) => 0,
                (true, PieceKind::Cat) => 1,
                (false, PieceKind::Kitten) => 2,
                (false, PieceKind::Cat) => 3,
            };
            board_view[plane * CELLS + pos.index()] = 1.0;
        }

        let mut legal_moves = [0.0; NUM_ACTIONS];
        for action in state.legal_moves() {
            legal_moves[action.index()] = 1.0;
        }

        let mut current_player = [0.0; 2];
        current_player[me.index()] = 1.0;

        let rules = state.rules();
        let share = |player: Player, kind: PieceKind| {
            let allotment = rules.allotment(kind);
            if allotment == 0 {
                0.0
            } else {
                state.supply(player).pool(kind) as f32 / allotment as f32
            }
        };
        let them = me.opponent();
        let pools = [
            share(me, PieceKind::Kitten),
            share(me, PieceKind::Cat),
            share(them, PieceKind::Kitten),
            share(them, PieceKind::Cat),
        ];

        Self {
            board_view,
            legal_moves,
            current_player,
            pools,
        }
    }

    /// Flattened view in the documented layout
    pub fn to_vec(&self) -> Vec<f32> {
        let mut out = Vec::with_capacity(OBS_SIZE);
        out.extend_from_slice(&self.board_view);
        out.extend_from_slice(&self.legal_moves);
        out.extend_from_slice(&self.current_player);
        out.extend_from_slice(&self.pools);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::Action;

    #[test]
    fn test_opening_observation() {
        let obs = Observation::from_state(&GameState::default());

        assert!(obs.board_view.iter().all(|&v| v == 0.0));
        assert_eq!(obs.legal_moves[..CELLS].iter().sum::<f32>(), 36.0);
        assert_eq!(obs.legal_moves[CELLS..].iter().sum::<f32>(), 0.0);
        assert_eq!(obs.current_player, [1.0, 0.0]);
        assert_eq!(obs.pools, [1.0, 0.0, 1.0, 0.0]);
        assert_eq!(obs.to_vec().len(), OBS_SIZE);
    }

    #[test]
    fn test_planes_are_relative_to_mover() {
        let state = GameState::default()
            .apply_move(Action::kitten(0, 0))
            .unwrap();
        let obs = Observation::from_state(&state);

        // Player two to move, so player one's kitten is in the opponent plane
        assert_eq!(obs.current_player, [0.0, 1.0]);
        assert_eq!(obs.board_view[2 * CELLS], 1.0);
        assert_eq!(obs.board_view[0], 0.0);
        assert_eq!(obs.legal_moves[0], 0.0);
        assert_eq!(obs.pools[2], 7.0 / 8.0);
    }
}
