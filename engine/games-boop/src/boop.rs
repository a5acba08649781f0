//! Boop resolution: how a placed piece pushes its neighbours
//!
//! Each of the eight neighbours of the placed piece is pushed one cell
//! directly away from it:
//! - a kitten never moves a cat
//! - a piece pushed off the edge goes back to its owner's pool
//! - a push into an occupied cell is blocked and nothing moves
//!
//! Destinations are two cells from the placed piece and neighbours are one
//! cell away, so no push can land on or vacate another push's destination.
//! Resolving the directions in sequence therefore gives the same result as
//! resolving them simultaneously, and nothing chains.

use crate::board::{Board, Piece, PieceKind, Position, DIRECTIONS};
use crate::state::Supply;

/// What happened to one neighbour
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Push {
    /// Slid one cell away from the placed piece
    Moved { from: Position, to: Position },
    /// Pushed off the board and returned to its owner's pool
    Ejected { from: Position, piece: Piece },
    /// Destination occupied; piece stays put
    Blocked { at: Position },
    /// A kitten cannot move a cat
    Resisted { at: Position },
}

impl Push {
    /// Cell the neighbour occupied before the push
    pub fn origin(&self) -> Position {
        match *self {
            Push::Moved { from, .. } | Push::Ejected { from, .. } => from,
            Push::Blocked { at } | Push::Resisted { at } => at,
        }
    }
}

/// All pushes caused by one placement, in `DIRECTIONS` order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BoopOutcome {
    pushes: [Option<Push>; 8],
}

impl BoopOutcome {
    pub fn iter(&self) -> impl Iterator<Item = &Push> {
        self.pushes.iter().flatten()
    }

    pub fn ejected(&self) -> impl Iterator<Item = Piece> + '_ {
        self.iter().filter_map(|p| match *p {
            Push::Ejected { piece, .. } => Some(piece),
            _ => None,
        })
    }

    pub fn moved_count(&self) -> usize {
        self.iter()
            .filter(|p| matches!(p, Push::Moved { .. } | Push::Ejected { .. }))
            .count()
    }
}

/// Resolve the pushes of the piece already sitting at `placed`.
///
/// Ejected pieces are credited back to their owner's pool in `supplies`.
///
/// # Panics
/// If `placed` is empty.
pub(crate) fn resolve(board: &mut Board, supplies: &mut [Supply; 2], placed: Position) -> BoopOutcome {
    let pusher = match board.get(placed) {
        Some(piece) => piece,
        None => panic!("boop resolved from empty cell {}", placed),
    };

    let mut outcome = BoopOutcome::default();
    for (slot, &(dr, dc)) in outcome.pushes.iter_mut().zip(DIRECTIONS.iter()) {
        let Some(from) = placed.offset(dr, dc) else {
            continue;
        };
        let Some(target) = board.get(from) else {
            continue;
        };

        if pusher.kind == PieceKind::Kitten && target.kind == PieceKind::Cat {
            *slot = Some(Push::Resisted { at: from });
            continue;
        }

        *slot = Some(match from.offset(dr, dc) {
            None => {
                board.set(from, None);
                supplies[target.owner.index()].return_to_pool(target.kind);
                Push::Ejected {
                    from,
                    piece: target,
                }
            }
            Some(to) if !board.is_empty_at(to) => Push::Blocked { at: from },
            Some(to) => {
                let piece = board.take(from);
                board.set(to, piece);
                Push::Moved { from, to }
            }
        });
    }
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Player;
    use crate::rules::Rules;
    use crate::state::GameStateBuilder;

    fn kitten(owner: Player) -> Piece {
        Piece::new(owner, PieceKind::Kitten)
    }

    fn cat(owner: Player) -> Piece {
        Piece::new(owner, PieceKind::Cat)
    }

    /// Build from a diagram, then resolve a boop from `placed`.
    fn boop_from(diagram: &str, placed: Position) -> (Board, [Supply; 2], BoopOutcome) {
        let state = GameStateBuilder::new(Rules::default())
            .diagram(diagram)
            .build()
            .unwrap();
        let mut board = state.board;
        let mut supplies = state.supplies;
        let outcome = resolve(&mut board, &mut supplies, placed);
        (board, supplies, outcome)
    }

    #[test]
    fn test_cat_pushes_kitten_into_empty_cell() {
        let (board, _, outcome) = boop_from(
            ". . . . . .
             . . . . . .
             . . C k . .
             . . . . . .
             . . . . . .
             . . . . . .",
            Position::at(2, 2),
        );
        assert_eq!(board.get(Position::at(2, 4)), Some(kitten(Player::Two)));
        assert!(board.is_empty_at(Position::at(2, 3)));
        assert_eq!(outcome.moved_count(), 1);
    }

    #[test]
    fn test_push_blocked_by_occupied_destination() {
        let (board, _, outcome) = boop_from(
            ". . . . . .
             . . . . . .
             . . C k K .
             . . . . . .
             . . . . . .
             . . . . . .",
            Position::at(2, 2),
        );
        assert_eq!(board.get(Position::at(2, 3)), Some(kitten(Player::Two)));
        assert_eq!(board.get(Position::at(2, 4)), Some(kitten(Player::One)));
        assert_eq!(
            outcome.iter().copied().collect::<Vec<_>>(),
            vec![Push::Blocked {
                at: Position::at(2, 3)
            }]
        );
    }

    #[test]
    fn test_kitten_cannot_move_cat() {
        let (board, _, outcome) = boop_from(
            ". . . . . .
             . c . . . .
             . . K . . .
             . . . . . .
             . . . . . .
             . . . . . .",
            Position::at(2, 2),
        );
        assert_eq!(board.get(Position::at(1, 1)), Some(cat(Player::Two)));
        assert!(matches!(
            outcome.iter().next(),
            Some(Push::Resisted { .. })
        ));
    }

    #[test]
    fn test_edge_push_returns_piece_to_pool() {
        let (board, supplies, outcome) = boop_from(
            "k K . . . .
             . . . . . .
             . . . . . .
             . . . . . .
             . . . . . .
             . . . . . .",
            Position::at(0, 1),
        );
        assert!(board.is_empty_at(Position::at(0, 0)));
        assert_eq!(
            outcome.ejected().collect::<Vec<_>>(),
            vec![kitten(Player::Two)]
        );
        // Builder drew one kitten, the ejection gave it back
        assert_eq!(supplies[Player::Two.index()].pool(PieceKind::Kitten), 8);
    }

    #[test]
    fn test_pushes_all_eight_directions() {
        let (board, _, outcome) = boop_from(
            ". . . . . .
             . k k k . .
             . k C k . .
             . k k k . .
             . . . . . .
             . . . . . .",
            Position::at(2, 2),
        );
        assert_eq!(outcome.moved_count(), 8);
        for (dr, dc) in DIRECTIONS {
            let to = Position::at(2, 2)
                .offset(dr * 2, dc * 2)
                .unwrap();
            assert_eq!(board.get(to), Some(kitten(Player::Two)), "at {}", to);
        }
        assert_eq!(board.get(Position::at(2, 2)), Some(cat(Player::One)));
        assert_eq!(board.occupied(), 9);
    }

    #[test]
    fn test_own_pieces_are_booped_too() {
        let (board, _, _) = boop_from(
            ". . . . . .
             . . . . . .
             . . K K . .
             . . . . . .
             . . . . . .
             . . . . . .",
            Position::at(2, 2),
        );
        assert_eq!(board.get(Position::at(2, 4)), Some(kitten(Player::One)));
        assert!(board.is_empty_at(Position::at(2, 3)));
    }

    #[test]
    fn test_placed_piece_never_moves() {
        let (board, _, outcome) = boop_from(
            "C k . . . .
             k k . . . .
             . . . . . .
             . . . . . .
             . . . . . .
             . . . . . .",
            Position::at(0, 0),
        );
        assert_eq!(board.get(Position::at(0, 0)), Some(cat(Player::One)));
        assert!(outcome.iter().all(|p| p.origin() != Position::at(0, 0)));
    }
}
