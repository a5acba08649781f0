//! Stable binary encoding of `GameState`
//!
//! Layout (62 bytes):
//! ```text
//! [0]       schema version (1)
//! [1..37)   cells: 0 empty, 1 P1 kitten, 2 P1 cat, 3 P2 kitten, 4 P2 cat
//! [37..49)  supplies, per player: pool k/c, reserve k/c, removed k/c
//! [49]      player to move (1 or 2)
//! [50]      status: 0 ongoing, 1/2 won by that player,
//!           3 drawn (no legal moves), 4 drawn (ply limit)
//! [51..55)  ply, u32 little-endian
//! [55..62)  rules: kittens, cats, policy (0 promote, 1 release three),
//!           max_plies u32 little-endian
//! ```

use engine_core::{DecodeError, EncodeError};

use crate::board::{Board, Piece, PieceKind, Player, Position, CELLS};
use crate::rules::{GraduationPolicy, Rules};
use crate::state::{DrawReason, GameState, Status, Supply};

pub const SCHEMA_VERSION: u8 = 1;
pub const STATE_BYTES: usize = 62;

const CELLS_AT: usize = 1;
const SUPPLY_AT: usize = CELLS_AT + CELLS;
const TO_MOVE_AT: usize = SUPPLY_AT + 12;
const STATUS_AT: usize = TO_MOVE_AT + 1;
const PLY_AT: usize = STATUS_AT + 1;
const RULES_AT: usize = PLY_AT + 4;

fn cell_code(cell: Option<Piece>) -> u8 {
    match cell {
        None => 0,
        Some(piece) => 1 + piece.owner.index() as u8 * 2 + piece.kind.index() as u8,
    }
}

fn cell_from_code(code: u8) -> Option<Option<Piece>> {
    let owner = match code {
        0 => return Some(None),
        1 | 2 => Player::One,
        3 | 4 => Player::Two,
        _ => return None,
    };
    let kind = if code % 2 == 1 {
        PieceKind::Kitten
    } else {
        PieceKind::Cat
    };
    Some(Some(Piece::new(owner, kind)))
}

fn status_code(status: Status) -> u8 {
    match status {
        Status::Ongoing => 0,
        Status::Won(player) => player.number(),
        Status::Drawn(DrawReason::NoLegalMoves) => 3,
        Status::Drawn(DrawReason::PlyLimit) => 4,
    }
}

pub fn encode_state(state: &GameState, out: &mut Vec<u8>) -> Result<(), EncodeError> {
    out.reserve(STATE_BYTES);
    out.push(SCHEMA_VERSION);
    out.extend((0..CELLS).map(|i| cell_code(state.board.cell(i))));
    for player in Player::BOTH {
        let supply = state.supply(player);
        for kind in PieceKind::BOTH {
            out.push(supply.pool(kind));
        }
        for kind in PieceKind::BOTH {
            out.push(supply.reserve(kind));
        }
        for kind in PieceKind::BOTH {
            out.push(supply.removed(kind));
        }
    }
    out.push(state.to_move.number());
    out.push(status_code(state.status));
    out.extend_from_slice(&state.ply.to_le_bytes());
    let rules = &state.rules;
    out.push(rules.kittens);
    out.push(rules.cats);
    out.push(match rules.graduation {
        GraduationPolicy::PromoteKittens => 0,
        GraduationPolicy::ReleaseThreeCats => 1,
    });
    out.extend_from_slice(&rules.max_plies.to_le_bytes());
    Ok(())
}

fn read_u32(buf: &[u8], at: usize) -> u32 {
    u32::from_le_bytes([buf[at], buf[at + 1], buf[at + 2], buf[at + 3]])
}

pub fn decode_state(buf: &[u8]) -> Result<GameState, DecodeError> {
    if buf.len() != STATE_BYTES {
        return Err(DecodeError::InvalidLength {
            expected: STATE_BYTES,
            actual: buf.len(),
        });
    }
    if buf[0] != SCHEMA_VERSION {
        return Err(DecodeError::UnsupportedVersion {
            version: buf[0] as u32,
        });
    }

    let mut board = Board::empty();
    for (i, &code) in buf[CELLS_AT..SUPPLY_AT].iter().enumerate() {
        let cell = cell_from_code(code).ok_or_else(|| {
            DecodeError::CorruptedData(format!("Invalid board cell {}: {}", i, code))
        })?;
        board.set(Position::of_cell(i), cell);
    }

    let mut supplies = [Supply::default(); 2];
    for (p, supply) in supplies.iter_mut().enumerate() {
        let b = &buf[SUPPLY_AT + p * 6..SUPPLY_AT + p * 6 + 6];
        *supply = Supply::from_counts([b[0], b[1]], [b[2], b[3]], [b[4], b[5]]);
    }

    let to_move = Player::from_number(buf[TO_MOVE_AT]).ok_or_else(|| {
        DecodeError::CorruptedData(format!("Invalid player to move: {}", buf[TO_MOVE_AT]))
    })?;

    let status = match buf[STATUS_AT] {
        0 => Status::Ongoing,
        1 => Status::Won(Player::One),
        2 => Status::Won(Player::Two),
        3 => Status::Drawn(DrawReason::NoLegalMoves),
        4 => Status::Drawn(DrawReason::PlyLimit),
        other => {
            return Err(DecodeError::CorruptedData(format!(
                "Invalid status: {}",
                other
            )))
        }
    };

    let graduation = match buf[RULES_AT + 2] {
        0 => GraduationPolicy::PromoteKittens,
        1 => GraduationPolicy::ReleaseThreeCats,
        other => {
            return Err(DecodeError::CorruptedData(format!(
                "Invalid graduation policy: {}",
                other
            )))
        }
    };
    let rules = Rules {
        kittens: buf[RULES_AT],
        cats: buf[RULES_AT + 1],
        graduation,
        max_plies: read_u32(buf, RULES_AT + 3),
    };
    rules
        .validate()
        .map_err(|e| DecodeError::CorruptedData(e.to_string()))?;

    let state = GameState {
        board,
        supplies,
        to_move,
        status,
        ply: read_u32(buf, PLY_AT),
        rules,
    };
    state
        .check_conservation()
        .map_err(DecodeError::CorruptedData)?;
    Ok(state)
}
