//! Placement actions and their flat index encoding
//!
//! Index layout: `row * 6 + col` places a kitten, `36 + row * 6 + col`
//! places a cat.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::board::{PieceKind, Position, CELLS};

/// Size of the flat action space
pub const NUM_ACTIONS: usize = CELLS * 2; // 72

/// Place a piece of `kind` on `pos`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Action {
    pub pos: Position,
    pub kind: PieceKind,
}

impl Action {
    pub fn new(pos: Position, kind: PieceKind) -> Self {
        Self { pos, kind }
    }

    pub fn kitten(row: usize, col: usize) -> Self {
        Self::new(Position::at(row, col), PieceKind::Kitten)
    }

    pub fn cat(row: usize, col: usize) -> Self {
        Self::new(Position::at(row, col), PieceKind::Cat)
    }

    #[inline]
    pub fn index(self) -> usize {
        match self.kind {
            PieceKind::Kitten => self.pos.index(),
            PieceKind::Cat => CELLS + self.pos.index(),
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        if index < CELLS {
            Position::from_index(index).map(|pos| Self::new(pos, PieceKind::Kitten))
        } else {
            Position::from_index(index.checked_sub(CELLS)?).map(|pos| Self::new(pos, PieceKind::Cat))
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.kind, self.pos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_layout() {
        assert_eq!(Action::kitten(0, 0).index(), 0);
        assert_eq!(Action::kitten(5, 5).index(), 35);
        assert_eq!(Action::cat(0, 0).index(), 36);
        assert_eq!(Action::cat(2, 3).index(), 36 + 15);
        assert_eq!(Action::cat(5, 5).index(), 71);
    }

    #[test]
    fn test_from_index_covers_space() {
        for i in 0..NUM_ACTIONS {
            let action = Action::from_index(i).unwrap();
            assert_eq!(action.index(), i);
        }
        assert_eq!(Action::from_index(NUM_ACTIONS), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(Action::cat(1, 4).to_string(), "cat@(1,4)");
        assert_eq!(Action::kitten(0, 2).to_string(), "kitten@(0,2)");
    }

    #[test]
    fn test_json_shape() {
        let json = serde_json::to_string(&Action::kitten(2, 3)).unwrap();
        assert_eq!(json, r#"{"pos":{"row":2,"col":3},"kind":"kitten"}"#);
    }
}
