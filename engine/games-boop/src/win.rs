//! Win detection, run after boops and graduation

use crate::board::{Board, Piece, PieceKind, Player, TRIOS};
use crate::rules::Rules;

/// How a game was won
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WinKind {
    /// Three of the player's cats in a line
    ThreeCats,
    /// All the player's pieces in play are cats on the board
    AllCats,
}

/// Check whether `player` has won on `board`. Only the mover is checked.
pub fn check_win(board: &Board, player: Player, rules: &Rules) -> Option<WinKind> {
    let cat = Some(Piece::new(player, PieceKind::Cat));
    let three_cats = TRIOS
        .iter()
        .any(|trio| trio.iter().all(|&c| board.cell(c as usize) == cat));
    if three_cats {
        return Some(WinKind::ThreeCats);
    }

    let cats_on_board = board.count(player, PieceKind::Cat);
    if cats_on_board >= rules.kittens as usize && board.count(player, PieceKind::Kitten) == 0 {
        return Some(WinKind::AllCats);
    }
    None
}
