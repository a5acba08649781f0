//! Game state snapshot and position builder

use engine_core::Outcome;

use crate::board::{Board, Piece, PieceKind, Player, Position, SIZE};
use crate::error::SetupError;
use crate::rules::Rules;

/// Where one player's off-board pieces are, per kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Supply {
    pool: [u8; 2],
    reserve: [u8; 2],
    removed: [u8; 2],
}

impl Supply {
    /// Opening supply: all kittens in the pool, all cats in reserve.
    pub fn opening(rules: &Rules) -> Self {
        Self {
            pool: [rules.kittens, 0],
            reserve: [0, rules.cats],
            removed: [0, 0],
        }
    }

    pub(crate) fn from_counts(pool: [u8; 2], reserve: [u8; 2], removed: [u8; 2]) -> Self {
        Self {
            pool,
            reserve,
            removed,
        }
    }

    /// Pieces available to place
    #[inline]
    pub fn pool(&self, kind: PieceKind) -> u8 {
        self.pool[kind.index()]
    }

    /// Pieces waiting to be released into the pool
    #[inline]
    pub fn reserve(&self, kind: PieceKind) -> u8 {
        self.reserve[kind.index()]
    }

    /// Pieces permanently out of the game
    #[inline]
    pub fn removed(&self, kind: PieceKind) -> u8 {
        self.removed[kind.index()]
    }

    pub(crate) fn take_from_pool(&mut self, kind: PieceKind) -> bool {
        let slot = &mut self.pool[kind.index()];
        if *slot == 0 {
            return false;
        }
        *slot -= 1;
        true
    }

    pub(crate) fn return_to_pool(&mut self, kind: PieceKind) {
        self.pool[kind.index()] += 1;
    }

    pub(crate) fn retire(&mut self, kind: PieceKind) {
        self.removed[kind.index()] += 1;
    }

    /// Move up to `n` cats from reserve to pool, returning how many moved.
    pub(crate) fn release_cats(&mut self, n: u8) -> u8 {
        let cat = PieceKind::Cat.index();
        let moved = self.reserve[cat].min(n);
        self.reserve[cat] -= moved;
        self.pool[cat] += moved;
        moved
    }

    pub(crate) fn take_from_reserve(&mut self, kind: PieceKind) -> bool {
        let slot = &mut self.reserve[kind.index()];
        if *slot == 0 {
            return false;
        }
        *slot -= 1;
        true
    }

    /// Off-board total of `kind` (pool + reserve + removed)
    pub fn off_board(&self, kind: PieceKind) -> usize {
        let i = kind.index();
        self.pool[i] as usize + self.reserve[i] as usize + self.removed[i] as usize
    }
}

/// Why a game ended without a winner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DrawReason {
    /// The player to move had nothing to place
    NoLegalMoves,
    /// The ply cap was reached
    PlyLimit,
}

/// Game status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    Ongoing,
    Won(Player),
    Drawn(DrawReason),
}

impl Status {
    pub fn is_terminal(self) -> bool {
        !matches!(self, Status::Ongoing)
    }
}

/// Complete, self-contained Boop position.
///
/// Every field is inline, so `clone` is a flat copy of roughly a hundred
/// bytes with no heap traffic. Moves produce new states and never touch
/// the one they were applied to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GameState {
    pub(crate) board: Board,
    pub(crate) supplies: [Supply; 2],
    pub(crate) to_move: Player,
    pub(crate) status: Status,
    pub(crate) ply: u32,
    pub(crate) rules: Rules,
}

impl GameState {
    /// Opening position for `rules`
    pub fn new(rules: Rules) -> Self {
        let supply = Supply::opening(&rules);
        Self {
            board: Board::empty(),
            supplies: [supply, supply],
            to_move: Player::One,
            status: Status::Ongoing,
            ply: 0,
            rules,
        }
    }

    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[inline]
    pub fn supply(&self, player: Player) -> &Supply {
        &self.supplies[player.index()]
    }

    #[inline]
    pub(crate) fn supply_mut(&mut self, player: Player) -> &mut Supply {
        &mut self.supplies[player.index()]
    }

    #[inline]
    pub fn to_move(&self) -> Player {
        self.to_move
    }

    #[inline]
    pub fn status(&self) -> Status {
        self.status
    }

    /// Plies applied since the opening position
    #[inline]
    pub fn ply(&self) -> u32 {
        self.ply
    }

    #[inline]
    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    #[inline]
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    pub fn winner(&self) -> Option<Player> {
        match self.status {
            Status::Won(player) => Some(player),
            _ => None,
        }
    }

    /// Result in the engine-wide representation, `None` while ongoing
    pub fn outcome(&self) -> Option<Outcome> {
        match self.status {
            Status::Ongoing => None,
            Status::Won(player) => Some(Outcome::Win(player.number())),
            Status::Drawn(_) => Some(Outcome::Draw),
        }
    }

    /// Check that every piece of every player is accounted for exactly
    /// once across pool, board, reserve and removed.
    pub fn check_conservation(&self) -> Result<(), String> {
        for player in Player::BOTH {
            let supply = self.supply(player);
            for kind in PieceKind::BOTH {
                let total = supply.off_board(kind) + self.board.count(player, kind);
                let expected = self.rules.allotment(kind) as usize;
                if total != expected {
                    return Err(format!(
                        "{} has {} {}s accounted for, expected {}",
                        player, total, kind, expected
                    ));
                }
            }
        }
        Ok(())
    }

    /// Panic if piece conservation does not hold.
    #[inline]
    pub(crate) fn assert_conserved(&self) {
        if let Err(msg) = self.check_conservation() {
            panic!("piece conservation violated: {msg}\n{:?}", self.board);
        }
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(Rules::default())
    }
}

/// Hand-built positions for tests, puzzles and analysis.
///
/// Kittens placed on the board come out of the owner's pool. Cats come out
/// of the pool when it has any, otherwise out of the reserve.
#[derive(Debug, Clone)]
pub struct GameStateBuilder {
    state: GameState,
    error: Option<SetupError>,
}

impl GameStateBuilder {
    pub fn new(rules: Rules) -> Self {
        Self {
            state: GameState::new(rules),
            error: None,
        }
    }

    /// Put a piece on the board
    pub fn place(mut self, pos: Position, owner: Player, kind: PieceKind) -> Self {
        if self.error.is_some() {
            return self;
        }
        if !self.state.board.is_empty_at(pos) {
            self.error = Some(SetupError::CellOccupied(pos));
            return self;
        }
        let supply = self.state.supply_mut(owner);
        let drawn = supply.take_from_pool(kind)
            || (kind == PieceKind::Cat && supply.take_from_reserve(kind));
        if !drawn {
            self.error = Some(SetupError::Exhausted {
                player: owner,
                kind,
            });
            return self;
        }
        self.state.board.set(pos, Some(Piece::new(owner, kind)));
        self
    }

    /// Place pieces from a 6-line diagram: `.` empty, `K`/`C` player one,
    /// `k`/`c` player two. Whitespace inside a line is ignored.
    pub fn diagram(mut self, text: &str) -> Self {
        let rows: Vec<Vec<char>> = text
            .lines()
            .map(|l| l.chars().filter(|c| !c.is_whitespace()).collect::<Vec<_>>())
            .filter(|r| !r.is_empty())
            .collect();
        if rows.len() != SIZE || rows.iter().any(|r| r.len() != SIZE) {
            self.error = Some(SetupError::Diagram(format!(
                "expected 6 rows of 6 cells, got {} rows",
                rows.len()
            )));
            return self;
        }
        for (r, row) in rows.iter().enumerate() {
            for (c, &ch) in row.iter().enumerate() {
                if ch == '.' {
                    continue;
                }
                match Piece::from_symbol(ch) {
                    Some(piece) => {
                        self = self.place(Position::at(r, c), piece.owner, piece.kind);
                    }
                    None => {
                        self.error = Some(SetupError::Diagram(format!(
                            "unknown symbol {:?} at ({},{})",
                            ch, r, c
                        )));
                        return self;
                    }
                }
            }
        }
        self
    }

    /// Account for `n` earlier graduated kittens: retire `n` kittens from
    /// the pool and release `n` cats from the reserve into the pool.
    pub fn promote(mut self, player: Player, n: u8) -> Self {
        if self.error.is_some() {
            return self;
        }
        let supply = self.state.supply_mut(player);
        for _ in 0..n {
            if !supply.take_from_pool(PieceKind::Kitten) {
                self.error = Some(SetupError::Exhausted {
                    player,
                    kind: PieceKind::Kitten,
                });
                return self;
            }
            supply.retire(PieceKind::Kitten);
            if supply.release_cats(1) == 0 {
                self.error = Some(SetupError::Exhausted {
                    player,
                    kind: PieceKind::Cat,
                });
                return self;
            }
        }
        self
    }

    pub fn to_move(mut self, player: Player) -> Self {
        self.state.to_move = player;
        self
    }

    pub fn ply(mut self, ply: u32) -> Self {
        self.state.ply = ply;
        self
    }

    pub fn build(self) -> Result<GameState, SetupError> {
        self.state.rules.validate()?;
        match self.error {
            Some(err) => Err(err),
            None => {
                self.state.assert_conserved();
                Ok(self.state)
            }
        }
    }
}
