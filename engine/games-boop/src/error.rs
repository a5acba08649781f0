//! Error types for the Boop engine

use engine_core::{ChooserError, Outcome};

use crate::action::Action;
use crate::board::{PieceKind, Player, Position};

/// Why a placement was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IllegalReason {
    CellOccupied,
    EmptyPool(PieceKind),
    NotYourTurn,
}

impl std::fmt::Display for IllegalReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IllegalReason::CellOccupied => write!(f, "cell is occupied"),
            IllegalReason::EmptyPool(kind) => write!(f, "no {} left in pool", kind),
            IllegalReason::NotYourTurn => write!(f, "not this player's turn"),
        }
    }
}

/// Errors from applying a move
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    #[error("Illegal move {action}: {reason}")]
    IllegalMove {
        action: Action,
        reason: IllegalReason,
    },
    #[error("Game is over")]
    GameOver,
}

/// Errors from building a position by hand
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SetupError {
    #[error("Cell {0} is already occupied")]
    CellOccupied(Position),
    #[error("{player} has no {kind} left to place")]
    Exhausted { player: Player, kind: PieceKind },
    #[error("Invalid diagram: {0}")]
    Diagram(String),
    #[error(transparent)]
    Rules(#[from] RulesError),
}

/// Errors from invalid rule settings
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RulesError {
    #[error("Each player needs at least one kitten")]
    NoKittens,
    #[error("{kittens} kittens per player cannot fit on a 36-cell board")]
    TooManyKittens { kittens: u8 },
    #[error("Unknown graduation policy: {0}")]
    UnknownPolicy(String),
}

/// Errors from recording, replaying or playing out games
#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    #[error("Move {ply} could not be replayed: {source}")]
    Replay {
        ply: usize,
        #[source]
        source: GameError,
    },
    #[error("Chooser {name} picked an illegal move at ply {ply}: {source}")]
    IllegalChoice {
        name: String,
        ply: u32,
        #[source]
        source: GameError,
    },
    #[error("Recorded outcome {recorded:?} does not match replayed outcome {replayed:?}")]
    OutcomeMismatch {
        recorded: Option<Outcome>,
        replayed: Option<Outcome>,
    },
    #[error("Chooser {name} failed: {source}")]
    Chooser {
        name: String,
        #[source]
        source: ChooserError,
    },
    #[error("Invalid record JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Rules(#[from] RulesError),
}
