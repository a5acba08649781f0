//! Heuristic move choosers
//!
//! Each chooser scores every legal placement by looking one ply ahead (two
//! for the opponent-threat check) and picks the best, breaking ties with a
//! seeded RNG so games are reproducible.

use engine_core::chooser::legal_or_err;
use engine_core::{ChooserError, MoveChooser};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

use crate::action::Action;
use crate::board::{Board, PieceKind, Player, Position, TRIOS};
use crate::state::GameState;
use crate::Boop;

/// Scores within this distance of the best are treated as ties
const TIE_EPSILON: f32 = 1e-4;

/// Apply a move the caller already knows is legal
fn successor(state: &GameState, action: Action) -> Option<GameState> {
    state.apply_move(action).ok()
}

fn wins_for(state: &GameState, player: Player) -> bool {
    state.winner() == Some(player)
}

/// Whether the player to move in `state` has a move that wins on the spot
fn has_winning_reply(state: &GameState) -> bool {
    let player = state.to_move();
    state
        .legal_moves()
        .into_iter()
        .filter_map(|a| successor(state, a))
        .any(|next| wins_for(&next, player))
}

/// Trios holding two of `player`'s pieces and one empty cell
fn open_twos(board: &Board, player: Player) -> usize {
    TRIOS
        .iter()
        .filter(|trio| {
            let mut owned = 0;
            let mut empty = 0;
            for &cell in trio.iter() {
                match board.cell(cell as usize) {
                    Some(piece) if piece.owner == player => owned += 1,
                    Some(_) => {}
                    None => empty += 1,
                }
            }
            owned == 2 && empty == 1
        })
        .count()
}

/// Trios holding two of `player`'s cats and one empty cell
fn open_cat_twos(board: &Board, player: Player) -> usize {
    TRIOS
        .iter()
        .filter(|trio| {
            let mut cats = 0;
            let mut empty = 0;
            for &cell in trio.iter() {
                match board.cell(cell as usize) {
                    Some(piece) if piece.owner == player && piece.kind == PieceKind::Cat => {
                        cats += 1
                    }
                    Some(_) => {}
                    None => empty += 1,
                }
            }
            cats == 2 && empty == 1
        })
        .count()
}

/// Trios fully owned by `player`
fn complete_trios(board: &Board, player: Player) -> usize {
    TRIOS
        .iter()
        .filter(|trio| {
            trio.iter().all(|&cell| {
                board
                    .cell(cell as usize)
                    .is_some_and(|piece| piece.owner == player)
            })
        })
        .count()
}

fn pieces_on_board(board: &Board, player: Player) -> usize {
    PieceKind::BOTH
        .iter()
        .map(|&kind| board.count(player, kind))
        .sum()
}

/// `player`'s pieces within two cells of `pos` along the four line axes
fn line_neighbours(board: &Board, pos: Position, player: Player) -> usize {
    const AXES: [(i8, i8); 4] = [(0, 1), (1, 0), (1, 1), (1, -1)];
    AXES.iter()
        .flat_map(|&(dr, dc)| [-2, -1, 1, 2].map(|k| pos.offset(dr * k, dc * k)))
        .flatten()
        .filter(|&p| board.get(p).is_some_and(|piece| piece.owner == player))
        .count()
}

fn centre_bonus(action: Action) -> f32 {
    (7.0 - action.pos.centre_distance()) * 10.0
}

fn pick_best(rng: &mut ChaCha20Rng, scored: &[(Action, f32)]) -> Option<Action> {
    let best = scored
        .iter()
        .map(|&(_, s)| s)
        .fold(f32::NEG_INFINITY, f32::max);
    let ties: Vec<Action> = scored
        .iter()
        .filter(|&&(_, s)| s >= best - TIE_EPSILON)
        .map(|&(a, _)| a)
        .collect();
    ties.choose(rng).copied()
}

/// Plays a winning move when one exists, avoids handing the opponent a
/// win, and otherwise favours cats, the centre and open lines.
#[derive(Debug)]
pub struct GreedyChooser {
    rng: ChaCha20Rng,
}

impl GreedyChooser {
    pub fn new() -> Self {
        Self {
            rng: ChaCha20Rng::from_entropy(),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: ChaCha20Rng::seed_from_u64(seed),
        }
    }

    fn score(state: &GameState, action: Action) -> f32 {
        let me = state.to_move();
        let Some(next) = successor(state, action) else {
            return f32::NEG_INFINITY;
        };
        if wins_for(&next, me) {
            return 10_000.0;
        }

        let mut score = 0.0;
        if has_winning_reply(&next) {
            score -= 5_000.0;
        }
        if action.kind == PieceKind::Cat {
            score += 100.0;
        }
        score += centre_bonus(action);
        score += open_twos(next.board(), me) as f32 * 200.0;
        score += next.board().count(me, PieceKind::Cat) as f32 * 15.0;
        score
    }
}

impl Default for GreedyChooser {
    fn default() -> Self {
        Self::new()
    }
}

impl MoveChooser<Boop> for GreedyChooser {
    fn name(&self) -> &str {
        "greedy"
    }

    fn choose(&mut self, game: &Boop, state: &GameState) -> Result<Action, ChooserError> {
        let scored: Vec<(Action, f32)> = legal_or_err(game, state)?
            .into_iter()
            .map(|a| (a, Self::score(state, a)))
            .collect();
        pick_best(&mut self.rng, &scored).ok_or(ChooserError::NoLegalActions)
    }
}

/// Plays for safety: blocks the opponent's lines, boops their pieces off
/// the bed and keeps its own pieces away from the rim.
#[derive(Debug)]
pub struct DefensiveChooser {
    rng: ChaCha20Rng,
}

impl DefensiveChooser {
    pub fn new() -> Self {
        Self {
            rng: ChaCha20Rng::from_entropy(),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: ChaCha20Rng::seed_from_u64(seed),
        }
    }

    fn score(state: &GameState, action: Action) -> f32 {
        let me = state.to_move();
        let them = me.opponent();
        let Some(next) = successor(state, action) else {
            return f32::NEG_INFINITY;
        };
        if wins_for(&next, me) {
            return 10_000.0;
        }

        let mut score = 0.0;
        if has_winning_reply(&next) {
            score -= 5_000.0;
        }
        let booped_off = pieces_on_board(state.board(), them)
            .saturating_sub(pieces_on_board(next.board(), them));
        score += booped_off as f32 * 300.0;
        score -= complete_trios(next.board(), them) as f32 * 400.0;
        score += action.pos.edge_distance() as f32 * 20.0;
        if action.kind == PieceKind::Cat {
            score += 150.0;
        }
        score += line_neighbours(state.board(), action.pos, them) as f32 * 100.0;
        score
    }
}

impl Default for DefensiveChooser {
    fn default() -> Self {
        Self::new()
    }
}

impl MoveChooser<Boop> for DefensiveChooser {
    fn name(&self) -> &str {
        "defensive"
    }

    fn choose(&mut self, game: &Boop, state: &GameState) -> Result<Action, ChooserError> {
        let scored: Vec<(Action, f32)> = legal_or_err(game, state)?
            .into_iter()
            .map(|a| (a, Self::score(state, a)))
            .collect();
        pick_best(&mut self.rng, &scored).ok_or(ChooserError::NoLegalActions)
    }
}

/// Races for three cats: places cats whenever it can, builds two-cat lines
/// and graduates kittens as fast as possible. Ignores the opponent.
#[derive(Debug)]
pub struct AggressiveChooser {
    rng: ChaCha20Rng,
}

impl AggressiveChooser {
    pub fn new() -> Self {
        Self {
            rng: ChaCha20Rng::from_entropy(),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: ChaCha20Rng::seed_from_u64(seed),
        }
    }

    fn score(state: &GameState, action: Action) -> f32 {
        let me = state.to_move();
        let Some(next) = successor(state, action) else {
            return f32::NEG_INFINITY;
        };
        if wins_for(&next, me) {
            return 10_000.0;
        }

        let board = next.board();
        let mut score = 0.0;
        if action.kind == PieceKind::Cat {
            score += 200.0;
        }
        score += board.count(me, PieceKind::Cat) as f32 * 100.0;
        score += open_cat_twos(board, me) as f32 * 400.0;
        // Kittens retired this turn are kittens that graduated
        let graduated = next
            .supply(me)
            .removed(PieceKind::Kitten)
            .saturating_sub(state.supply(me).removed(PieceKind::Kitten));
        score += graduated as f32 * 300.0;
        if (2..=3).contains(&action.pos.row()) && (2..=3).contains(&action.pos.col()) {
            score += 50.0;
        }
        score
    }
}

impl Default for AggressiveChooser {
    fn default() -> Self {
        Self::new()
    }
}

impl MoveChooser<Boop> for AggressiveChooser {
    fn name(&self) -> &str {
        "aggressive"
    }

    fn choose(&mut self, game: &Boop, state: &GameState) -> Result<Action, ChooserError> {
        let scored: Vec<(Action, f32)> = legal_or_err(game, state)?
            .into_iter()
            .map(|a| (a, Self::score(state, a)))
            .collect();
        pick_best(&mut self.rng, &scored).ok_or(ChooserError::NoLegalActions)
    }
}

/// Wins when it can, then only considers moves that leave the opponent
/// without an immediate win, then balances board presence and safety.
#[derive(Debug)]
pub struct SmartChooser {
    rng: ChaCha20Rng,
}

impl SmartChooser {
    pub fn new() -> Self {
        Self {
            rng: ChaCha20Rng::from_entropy(),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: ChaCha20Rng::seed_from_u64(seed),
        }
    }

    fn score(me: Player, action: Action, next: &GameState) -> f32 {
        let board = next.board();
        let mut score = board.count(me, PieceKind::Cat) as f32 * 50.0;
        score += open_twos(board, me) as f32 * 250.0;
        // Pieces away from the rim are harder to boop off
        score += action.pos.edge_distance() as f32 * 15.0;
        score += centre_bonus(action);
        if action.kind == PieceKind::Cat {
            score += 80.0;
        }
        score
    }
}

impl Default for SmartChooser {
    fn default() -> Self {
        Self::new()
    }
}

impl MoveChooser<Boop> for SmartChooser {
    fn name(&self) -> &str {
        "smart"
    }

    fn choose(&mut self, game: &Boop, state: &GameState) -> Result<Action, ChooserError> {
        let me = state.to_move();
        let candidates: Vec<(Action, GameState)> = legal_or_err(game, state)?
            .into_iter()
            .filter_map(|a| successor(state, a).map(|next| (a, next)))
            .collect();

        let winning: Vec<(Action, f32)> = candidates
            .iter()
            .filter(|(_, next)| wins_for(next, me))
            .map(|&(a, _)| (a, 0.0))
            .collect();
        if !winning.is_empty() {
            return pick_best(&mut self.rng, &winning).ok_or(ChooserError::NoLegalActions);
        }

        let safe: Vec<&(Action, GameState)> = candidates
            .iter()
            .filter(|(_, next)| !has_winning_reply(next))
            .collect();
        let pool: Vec<&(Action, GameState)> = if safe.is_empty() {
            candidates.iter().collect()
        } else {
            safe
        };

        let scored: Vec<(Action, f32)> = pool
            .into_iter()
            .map(|(a, next)| (*a, Self::score(me, *a, next)))
            .collect();
        pick_best(&mut self.rng, &scored).ok_or(ChooserError::NoLegalActions)
    }
}
