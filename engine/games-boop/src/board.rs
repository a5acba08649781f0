//! Board geometry and piece representation
//!
//! The board is a flat, row-major array of 36 cells:
//! ```text
//! Row 0: [ 0][ 1][ 2][ 3][ 4][ 5]
//! Row 1: [ 6][ 7][ 8][ 9][10][11]
//! Row 2: [12][13][14][15][16][17]
//! Row 3: [18][19][20][21][22][23]
//! Row 4: [24][25][26][27][28][29]
//! Row 5: [30][31][32][33][34][35]
//!         Col 0  1  2  3  4  5
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

/// Board side length
pub const SIZE: usize = 6;
/// Number of cells on the board
pub const CELLS: usize = SIZE * SIZE; // 36

/// The eight neighbour offsets as (row delta, col delta)
pub const DIRECTIONS: [(i8, i8); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Number of three-cell runs on a 6x6 board
pub const NUM_TRIOS: usize = 80;

/// Every run of three cells along the four line directions, as cell
/// indices. Ordered horizontal, vertical, diagonal, anti-diagonal, and
/// row-major by starting cell within each direction.
pub const TRIOS: [[u8; 3]; NUM_TRIOS] = build_trios();

const fn build_trios() -> [[u8; 3]; NUM_TRIOS] {
    let dirs: [(i32, i32); 4] = [(0, 1), (1, 0), (1, 1), (1, -1)];
    let size = SIZE as i32;
    let mut out = [[0u8; 3]; NUM_TRIOS];
    let mut n = 0;
    let mut d = 0;
    while d < dirs.len() {
        let (dr, dc) = dirs[d];
        let mut row = 0;
        while row < size {
            let mut col = 0;
            while col < size {
                let end_row = row + 2 * dr;
                let end_col = col + 2 * dc;
                if end_row >= 0 && end_row < size && end_col >= 0 && end_col < size {
                    out[n] = [
                        (row * size + col) as u8,
                        ((row + dr) * size + col + dc) as u8,
                        (end_row * size + end_col) as u8,
                    ];
                    n += 1;
                }
                col += 1;
            }
            row += 1;
        }
        d += 1;
    }
    out
}

/// One of the two players
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Player {
    One,
    Two,
}

impl Player {
    pub const BOTH: [Player; 2] = [Player::One, Player::Two];

    /// Player number as used by `engine_core` (1 or 2)
    pub fn number(self) -> u8 {
        match self {
            Player::One => 1,
            Player::Two => 2,
        }
    }

    pub fn from_number(n: u8) -> Option<Self> {
        match n {
            1 => Some(Player::One),
            2 => Some(Player::Two),
            _ => None,
        }
    }

    pub fn opponent(self) -> Self {
        match self {
            Player::One => Player::Two,
            Player::Two => Player::One,
        }
    }

    #[inline]
    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "player {}", self.number())
    }
}

/// Piece kinds. Cats are heavier than kittens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PieceKind {
    Kitten,
    Cat,
}

impl PieceKind {
    pub const BOTH: [PieceKind; 2] = [PieceKind::Kitten, PieceKind::Cat];

    #[inline]
    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PieceKind::Kitten => write!(f, "kitten"),
            PieceKind::Cat => write!(f, "cat"),
        }
    }
}

/// A piece on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    pub owner: Player,
    pub kind: PieceKind,
}

impl Piece {
    pub fn new(owner: Player, kind: PieceKind) -> Self {
        Self { owner, kind }
    }

    /// Diagram symbol: uppercase for player one, lowercase for player two.
    pub fn symbol(self) -> char {
        let c = match self.kind {
            PieceKind::Kitten => 'K',
            PieceKind::Cat => 'C',
        };
        match self.owner {
            Player::One => c,
            Player::Two => c.to_ascii_lowercase(),
        }
    }

    pub fn from_symbol(c: char) -> Option<Self> {
        let kind = match c.to_ascii_uppercase() {
            'K' => PieceKind::Kitten,
            'C' => PieceKind::Cat,
            _ => return None,
        };
        let owner = if c.is_ascii_uppercase() {
            Player::One
        } else {
            Player::Two
        };
        Some(Self { owner, kind })
    }
}

/// A cell on the 6x6 board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    row: u8,
    col: u8,
}

impl Position {
    /// Checked constructor
    pub fn new(row: usize, col: usize) -> Option<Self> {
        (row < SIZE && col < SIZE).then(|| Self {
            row: row as u8,
            col: col as u8,
        })
    }

    /// Constructor for positions known to be on the board.
    ///
    /// # Panics
    /// If `row` or `col` is outside 0..6.
    pub const fn at(row: usize, col: usize) -> Self {
        assert!(row < SIZE && col < SIZE, "position off the board");
        Self {
            row: row as u8,
            col: col as u8,
        }
    }

    /// Position of a cell index known to be on the board.
    #[inline]
    pub(crate) const fn of_cell(index: usize) -> Self {
        Self::at(index / SIZE, index % SIZE)
    }

    pub fn from_index(index: usize) -> Option<Self> {
        (index < CELLS).then(|| Self {
            row: (index / SIZE) as u8,
            col: (index % SIZE) as u8,
        })
    }

    #[inline]
    pub fn row(self) -> usize {
        self.row as usize
    }

    #[inline]
    pub fn col(self) -> usize {
        self.col as usize
    }

    #[inline]
    pub fn index(self) -> usize {
        self.row as usize * SIZE + self.col as usize
    }

    /// Neighbouring cell in direction `(dr, dc)`, or `None` off the edge.
    #[inline]
    pub fn offset(self, dr: i8, dc: i8) -> Option<Self> {
        let row = self.row as i8 + dr;
        let col = self.col as i8 + dc;
        if (0..SIZE as i8).contains(&row) && (0..SIZE as i8).contains(&col) {
            Some(Self {
                row: row as u8,
                col: col as u8,
            })
        } else {
            None
        }
    }

    /// Manhattan distance from the board centre (2.5, 2.5)
    pub fn centre_distance(self) -> f32 {
        (self.row as f32 - 2.5).abs() + (self.col as f32 - 2.5).abs()
    }

    /// Steps to the nearest edge (0 on the rim, 2 in the centre block)
    pub fn edge_distance(self) -> usize {
        let last = SIZE - 1;
        self.row().min(self.col()).min(last - self.row()).min(last - self.col())
    }

    /// All 36 positions in index order
    pub fn all() -> impl Iterator<Item = Position> {
        (0..CELLS).filter_map(Position::from_index)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.row, self.col)
    }
}

/// Fixed-size board; `Copy` so snapshots never share storage.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Board {
    cells: [Option<Piece>; CELLS],
}

impl Board {
    pub fn empty() -> Self {
        Self {
            cells: [None; CELLS],
        }
    }

    #[inline]
    pub fn get(&self, pos: Position) -> Option<Piece> {
        self.cells[pos.index()]
    }

    #[inline]
    pub fn is_empty_at(&self, pos: Position) -> bool {
        self.cells[pos.index()].is_none()
    }

    #[inline]
    pub(crate) fn set(&mut self, pos: Position, piece: Option<Piece>) {
        self.cells[pos.index()] = piece;
    }

    #[inline]
    pub(crate) fn take(&mut self, pos: Position) -> Option<Piece> {
        self.cells[pos.index()].take()
    }

    /// Piece at a raw cell index
    #[inline]
    pub fn cell(&self, index: usize) -> Option<Piece> {
        self.cells[index]
    }

    /// Occupied cells in index order
    pub fn pieces(&self) -> impl Iterator<Item = (Position, Piece)> + '_ {
        self.cells.iter().enumerate().filter_map(|(i, cell)| {
            cell.and_then(|piece| Position::from_index(i).map(|pos| (pos, piece)))
        })
    }

    /// Number of `owner`'s pieces of `kind` on the board
    pub fn count(&self, owner: Player, kind: PieceKind) -> usize {
        let target = Some(Piece::new(owner, kind));
        self.cells.iter().filter(|&&c| c == target).count()
    }

    pub fn occupied(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|c| c.is_some())
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..SIZE {
            for col in 0..SIZE {
                let c = self.cells[row * SIZE + col].map_or('.', Piece::symbol);
                write!(f, "{}", c)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f)?;
        fmt::Display::fmt(self, f)
    }
}
