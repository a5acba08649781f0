//! Graduation: resolving lines of three
//!
//! A line qualifies when all three cells hold the mover's pieces and at
//! least one is a kitten. Three cats in a row is a win and never graduates.
//! Candidates are taken in `TRIOS` order and accepted only if disjoint from
//! lines already accepted this turn. Removal only empties cells, so there
//! is no rescan.

use crate::board::{Board, PieceKind, Player, Position, TRIOS};
use crate::rules::GraduationPolicy;
use crate::state::Supply;

/// One graduated line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Graduation {
    pub cells: [Position; 3],
    pub kittens: u8,
    pub cats: u8,
    /// Cats moved from reserve to pool by this line
    pub released: u8,
}

/// Find the disjoint qualifying lines for `player` without touching the board.
pub fn find_lines(board: &Board, player: Player) -> Vec<[Position; 3]> {
    let mut used = 0u64;
    let mut lines = Vec::new();
    for trio in TRIOS {
        let mask = trio.iter().fold(0u64, |m, &c| m | (1u64 << c));
        if used & mask != 0 {
            continue;
        }
        let mut kittens = 0;
        let mut owned = 0;
        for &cell in &trio {
            if let Some(piece) = board.cell(cell as usize) {
                if piece.owner == player {
                    owned += 1;
                    if piece.kind == PieceKind::Kitten {
                        kittens += 1;
                    }
                }
            }
        }
        if owned == 3 && kittens > 0 {
            used |= mask;
            lines.push(trio.map(|c| Position::of_cell(c as usize)));
        }
    }
    lines
}

/// Graduate every qualifying line of `player`, crediting `supply` per
/// `policy`. Returns the lines resolved, in scan order.
pub(crate) fn graduate(
    board: &mut Board,
    supply: &mut Supply,
    player: Player,
    policy: GraduationPolicy,
) -> Vec<Graduation> {
    find_lines(board, player)
        .into_iter()
        .map(|cells| {
            let mut kittens = 0u8;
            let mut cats = 0u8;
            for pos in cells {
                match board.take(pos).map(|p| p.kind) {
                    Some(PieceKind::Kitten) => {
                        kittens += 1;
                        supply.retire(PieceKind::Kitten);
                    }
                    Some(PieceKind::Cat) => {
                        cats += 1;
                        supply.return_to_pool(PieceKind::Cat);
                    }
                    None => unreachable!("graduated line has an empty cell"),
                }
            }
            let released = match policy {
                GraduationPolicy::PromoteKittens => supply.release_cats(kittens),
                GraduationPolicy::ReleaseThreeCats if supply.reserve(PieceKind::Cat) >= 3 => {
                    supply.release_cats(3)
                }
                GraduationPolicy::ReleaseThreeCats => 0,
            };
            Graduation {
                cells,
                kittens,
                cats,
                released,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::Rules;
    use crate::state::{GameState, GameStateBuilder};

    fn setup(rules: Rules, diagram: &str) -> GameState {
        GameStateBuilder::new(rules)
            .diagram(diagram)
            .build()
            .unwrap()
    }

    fn run(state: &mut GameState, player: Player) -> Vec<Graduation> {
        let policy = state.rules.graduation;
        let supply = &mut state.supplies[player.index()];
        graduate(&mut state.board, supply, player, policy)
    }

    #[test]
    fn test_kitten_line_promotes() {
        let mut state = setup(
            Rules::default(),
            "K K K . . .
             . . . . . .
             . . . . . .
             . . . . . .
             . . . . . .
             . . . . . .",
        );
        let grads = run(&mut state, Player::One);

        assert_eq!(grads.len(), 1);
        assert_eq!(grads[0].kittens, 3);
        assert_eq!(grads[0].released, 3);
        assert_eq!(state.board.occupied(), 0);

        let supply = state.supply(Player::One);
        assert_eq!(supply.pool(PieceKind::Kitten), 5);
        assert_eq!(supply.removed(PieceKind::Kitten), 3);
        assert_eq!(supply.pool(PieceKind::Cat), 3);
        assert_eq!(supply.reserve(PieceKind::Cat), 5);
        assert!(state.check_conservation().is_ok());
    }

    #[test]
    fn test_mixed_line_returns_cats() {
        let mut state = setup(
            Rules::default(),
            ". . . . . .
             . C . . . .
             . K . . . .
             . C . . . .
             . . . . . .
             . . . . . .",
        );
        let grads = run(&mut state, Player::One);

        assert_eq!(grads.len(), 1);
        assert_eq!((grads[0].kittens, grads[0].cats, grads[0].released), (1, 2, 1));
        // Two cats from reserve via builder, both back in pool, plus one released
        let supply = state.supply(Player::One);
        assert_eq!(supply.pool(PieceKind::Cat), 3);
        assert_eq!(supply.reserve(PieceKind::Cat), 5);
        assert!(state.check_conservation().is_ok());
    }

    #[test]
    fn test_pure_cat_line_is_not_graduated() {
        let board_text = "C C C . . .
             . . . . . .
             . . . . . .
             . . . . . .
             . . . . . .
             . . . . . .";
        let mut state = setup(Rules::default(), board_text);
        assert!(run(&mut state, Player::One).is_empty());
        assert_eq!(state.board.occupied(), 3);
    }

    #[test]
    fn test_opponent_line_untouched() {
        let mut state = setup(
            Rules::default(),
            "k k k . . .
             . . . . . .
             . . . . . .
             . . . . . .
             . . . . . .
             . . . . . .",
        );
        assert!(run(&mut state, Player::One).is_empty());
        assert_eq!(state.board.occupied(), 3);
    }

    #[test]
    fn test_four_in_a_row_graduates_first_three() {
        let mut state = setup(
            Rules::default(),
            "K K K K . .
             . . . . . .
             . . . . . .
             . . . . . .
             . . . . . .
             . . . . . .",
        );
        let grads = run(&mut state, Player::One);

        assert_eq!(grads.len(), 1);
        assert_eq!(
            grads[0].cells,
            [Position::at(0, 0), Position::at(0, 1), Position::at(0, 2)]
        );
        assert_eq!(state.board.occupied(), 1);
        assert!(!state.board.is_empty_at(Position::at(0, 3)));
    }

    #[test]
    fn test_disjoint_lines_all_resolve() {
        let mut state = setup(
            Rules::default(),
            "K K K . . .
             . . . . . .
             . . . K . .
             . . . K . .
             . . . K . .
             . . . . . .",
        );
        let grads = run(&mut state, Player::One);
        assert_eq!(grads.len(), 2);
        assert_eq!(state.board.occupied(), 0);
        assert_eq!(state.supply(Player::One).removed(PieceKind::Kitten), 6);
    }

    #[test]
    fn test_release_three_cats_policy() {
        let rules = Rules::default().with_graduation(GraduationPolicy::ReleaseThreeCats);
        let mut state = setup(
            rules,
            "K K C . . .
             . . . . . .
             . . . . . .
             . . . . . .
             . . . . . .
             . . . . . .",
        );
        let grads = run(&mut state, Player::One);

        assert_eq!(grads[0].released, 3);
        let supply = state.supply(Player::One);
        assert_eq!(supply.removed(PieceKind::Kitten), 2);
        // One cat returned plus three released
        assert_eq!(supply.pool(PieceKind::Cat), 4);
        assert_eq!(supply.reserve(PieceKind::Cat), 4);
    }

    #[test]
    fn test_release_three_cats_needs_three_in_reserve() {
        let rules = Rules::default()
            .with_graduation(GraduationPolicy::ReleaseThreeCats)
            .with_pieces(8, 2);
        let mut state = setup(
            rules,
            "K K K . . .
             . . . . . .
             . . . . . .
             . . . . . .
             . . . . . .
             . . . . . .",
        );
        let grads = run(&mut state, Player::One);

        assert_eq!(grads[0].released, 0);
        assert_eq!(state.supply(Player::One).reserve(PieceKind::Cat), 2);
        assert!(state.check_conservation().is_ok());
    }
}
