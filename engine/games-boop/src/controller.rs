//! Turn controller
//!
//! A move runs through `AwaitingMove -> Resolving -> Graduating -> WinCheck`
//! and ends in `NextTurn` or `Terminal`. All legality checks happen before
//! the copy is made, so a rejected move leaves nothing behind and callers
//! only ever see fully resolved states.

use tracing::trace;

use crate::action::Action;
use crate::boop::{self, BoopOutcome};
use crate::board::{Piece, PieceKind, Player, Position};
use crate::error::{GameError, IllegalReason};
use crate::graduation::{self, Graduation};
use crate::state::{DrawReason, GameState, Status};
use crate::win::{self, WinKind};

/// Phases of a single turn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnPhase {
    AwaitingMove,
    Resolving,
    Graduating,
    WinCheck,
    NextTurn,
    Terminal,
}

/// Everything that happened while resolving one move
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnReport {
    pub player: Player,
    pub action: Action,
    pub boops: BoopOutcome,
    pub graduations: Vec<Graduation>,
    pub win: Option<WinKind>,
    pub status: Status,
}

impl GameState {
    /// Phase the controller is waiting in for this state
    pub fn phase(&self) -> TurnPhase {
        if self.is_terminal() {
            TurnPhase::Terminal
        } else {
            TurnPhase::AwaitingMove
        }
    }

    /// All legal placements for the player to move, in ascending action
    /// index order (every kitten placement, then every cat placement).
    pub fn legal_moves(&self) -> Vec<Action> {
        let mut out = Vec::new();
        self.legal_moves_into(&mut out);
        out
    }

    /// Append legal placements to `out`; appends nothing once terminal.
    pub fn legal_moves_into(&self, out: &mut Vec<Action>) {
        if self.is_terminal() {
            return;
        }
        let supply = self.supply(self.to_move);
        for kind in PieceKind::BOTH {
            if supply.pool(kind) == 0 {
                continue;
            }
            out.extend(
                Position::all()
                    .filter(|&pos| self.board.is_empty_at(pos))
                    .map(|pos| Action::new(pos, kind)),
            );
        }
    }

    /// Whether the player to move can place anything
    pub fn has_legal_move(&self) -> bool {
        let supply = self.supply(self.to_move);
        let has_piece = PieceKind::BOTH.iter().any(|&k| supply.pool(k) > 0);
        !self.is_terminal() && has_piece && !self.board.is_full()
    }

    pub fn is_legal(&self, action: Action) -> bool {
        self.check_legal(action).is_ok()
    }

    fn check_legal(&self, action: Action) -> Result<(), GameError> {
        if self.is_terminal() {
            return Err(GameError::GameOver);
        }
        let reason = if !self.board.is_empty_at(action.pos) {
            IllegalReason::CellOccupied
        } else if self.supply(self.to_move).pool(action.kind) == 0 {
            IllegalReason::EmptyPool(action.kind)
        } else {
            return Ok(());
        };
        Err(GameError::IllegalMove { action, reason })
    }

    /// Apply `action` for the player to move.
    pub fn apply_move(&self, action: Action) -> Result<GameState, GameError> {
        self.play(action).map(|(next, _)| next)
    }

    /// Apply `action` on behalf of `player`, rejecting out-of-turn moves.
    pub fn apply_move_for(&self, player: Player, action: Action) -> Result<GameState, GameError> {
        if self.is_terminal() {
            return Err(GameError::GameOver);
        }
        if player != self.to_move {
            return Err(GameError::IllegalMove {
                action,
                reason: IllegalReason::NotYourTurn,
            });
        }
        self.apply_move(action)
    }

    /// Apply `action` and report what happened along the way.
    pub fn play(&self, action: Action) -> Result<(GameState, TurnReport), GameError> {
        self.check_legal(action)?;

        let player = self.to_move;
        let mut next = self.clone();

        trace!(phase = ?TurnPhase::Resolving, ply = self.ply, %action, "Placing piece");
        let drawn = next.supply_mut(player).take_from_pool(action.kind);
        debug_assert!(drawn, "legality check guarantees a piece in the pool");
        next.board.set(action.pos, Some(Piece::new(player, action.kind)));
        let boops = boop::resolve(&mut next.board, &mut next.supplies, action.pos);

        trace!(phase = ?TurnPhase::Graduating, ply = self.ply, pushes = boops.moved_count());
        let policy = next.rules.graduation;
        let graduations = graduation::graduate(
            &mut next.board,
            &mut next.supplies[player.index()],
            player,
            policy,
        );

        trace!(phase = ?TurnPhase::WinCheck, ply = self.ply, lines = graduations.len());
        let win = win::check_win(&next.board, player, &next.rules);

        next.ply = next.ply.saturating_add(1);
        next.to_move = player.opponent();
        next.status = match win {
            Some(_) => Status::Won(player),
            None if next.rules.max_plies > 0 && next.ply >= next.rules.max_plies => {
                Status::Drawn(DrawReason::PlyLimit)
            }
            None if !next.has_legal_move() => Status::Drawn(DrawReason::NoLegalMoves),
            None => Status::Ongoing,
        };
        trace!(phase = ?next.phase(), ply = next.ply, status = ?next.status, "Turn resolved");

        next.assert_conserved();

        let report = TurnReport {
            player,
            action,
            boops,
            graduations,
            win,
            status: next.status,
        };
        Ok((next, report))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::Rules;
    use crate::state::GameStateBuilder;

    #[test]
    fn test_opening_legal_moves() {
        let state = GameState::default();
        let moves = state.legal_moves();

        // Only kittens are in the pool at the start
        assert_eq!(moves.len(), 36);
        assert!(moves.iter().all(|a| a.kind == PieceKind::Kitten));
        let indices: Vec<usize> = moves.iter().map(|a| a.index()).collect();
        assert_eq!(indices, (0..36).collect::<Vec<_>>());
    }

    #[test]
    fn test_legal_moves_ascending_with_cats() {
        let state = GameStateBuilder::new(Rules::default())
            .promote(Player::One, 1)
            .place(Position::at(0, 0), Player::Two, PieceKind::Kitten)
            .build()
            .unwrap();
        let indices: Vec<usize> = state.legal_moves().iter().map(|a| a.index()).collect();

        assert_eq!(indices.len(), 70);
        assert!(indices.windows(2).all(|w| w[0] < w[1]));
        assert!(!indices.contains(&0) && !indices.contains(&36));
    }

    #[test]
    fn test_apply_switches_turn_and_counts_ply() {
        let state = GameState::default();
        let next = state.apply_move(Action::kitten(2, 2)).unwrap();

        assert_eq!(next.to_move(), Player::Two);
        assert_eq!(next.ply(), 1);
        assert_eq!(next.supply(Player::One).pool(PieceKind::Kitten), 7);
        // Original snapshot is untouched
        assert_eq!(state.ply(), 0);
        assert!(state.board().is_empty_at(Position::at(2, 2)));
    }

    #[test]
    fn test_occupied_cell_rejected() {
        let state = GameState::default()
            .apply_move(Action::kitten(2, 2))
            .unwrap();
        let err = state.apply_move(Action::kitten(2, 2)).unwrap_err();
        assert_eq!(
            err,
            GameError::IllegalMove {
                action: Action::kitten(2, 2),
                reason: IllegalReason::CellOccupied
            }
        );
    }

    #[test]
    fn test_empty_pool_rejected() {
        let err = GameState::default()
            .apply_move(Action::cat(0, 0))
            .unwrap_err();
        assert_eq!(
            err,
            GameError::IllegalMove {
                action: Action::cat(0, 0),
                reason: IllegalReason::EmptyPool(PieceKind::Cat)
            }
        );
    }

    #[test]
    fn test_out_of_turn_rejected() {
        let state = GameState::default();
        let err = state
            .apply_move_for(Player::Two, Action::kitten(0, 0))
            .unwrap_err();
        assert!(matches!(
            err,
            GameError::IllegalMove {
                reason: IllegalReason::NotYourTurn,
                ..
            }
        ));
        assert!(state.apply_move_for(Player::One, Action::kitten(0, 0)).is_ok());
    }

    #[test]
    fn test_ply_limit_draw() {
        let rules = Rules::default().with_max_plies(2);
        let state = GameState::new(rules)
            .apply_move(Action::kitten(0, 0))
            .unwrap()
            .apply_move(Action::kitten(5, 5))
            .unwrap();

        assert_eq!(state.status(), Status::Drawn(DrawReason::PlyLimit));
        assert_eq!(state.phase(), TurnPhase::Terminal);
        assert!(state.legal_moves().is_empty());
        assert_eq!(
            state.apply_move(Action::kitten(3, 3)),
            Err(GameError::GameOver)
        );
    }

    #[test]
    fn test_ply_counter_saturates() {
        let rules = Rules::default().with_max_plies(0);
        let state = GameStateBuilder::new(rules)
            .ply(u32::MAX)
            .build()
            .unwrap();
        let mut bytes = Vec::new();
        crate::codec::encode_state(&state, &mut bytes).unwrap();
        let decoded = crate::codec::decode_state(&bytes).unwrap();

        let next = decoded.apply_move(Action::kitten(2, 2)).unwrap();
        assert_eq!(next.ply(), u32::MAX);
        assert_eq!(next.status(), Status::Ongoing);
    }

    #[test]
    fn test_no_legal_moves_draw() {
        // Player two's only kitten is already on the board
        let rules = Rules::default().with_pieces(1, 0).with_max_plies(0);
        let state = GameStateBuilder::new(rules)
            .place(Position::at(5, 5), Player::Two, PieceKind::Kitten)
            .build()
            .unwrap();
        let (next, report) = state.play(Action::kitten(0, 0)).unwrap();

        assert_eq!(report.status, Status::Drawn(DrawReason::NoLegalMoves));
        assert!(next.is_terminal());
        assert_eq!(next.winner(), None);
    }

    #[test]
    fn test_report_lists_pushes() {
        let state = GameState::default()
            .apply_move(Action::kitten(2, 2))
            .unwrap();
        let (next, report) = state.play(Action::kitten(2, 3)).unwrap();

        assert_eq!(report.player, Player::Two);
        assert_eq!(report.boops.moved_count(), 1);
        assert_eq!(
            next.board().get(Position::at(2, 1)).map(|p| p.owner),
            Some(Player::One)
        );
    }
}
