//! Move selection strategies
//!
//! A `MoveChooser` picks the next action for whichever player is to move.
//! Heuristic players, random baselines, and MCTS all implement it so match
//! drivers can pit any two of them against each other.

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

use crate::typed::Game;

/// Errors raised while choosing a move
#[derive(Debug, thiserror::Error)]
pub enum ChooserError {
    #[error("No legal actions available")]
    NoLegalActions,
    #[error("Game is already over")]
    GameOver,
    #[error("Search failed: {0}")]
    Search(String),
}

/// Trait for move selection strategies.
pub trait MoveChooser<G: Game>: Send {
    /// Short label used in logs and match summaries
    fn name(&self) -> &str;

    /// Choose an action for the player to move in `state`.
    fn choose(&mut self, game: &G, state: &G::State) -> Result<G::Action, ChooserError>;
}

/// Collect legal actions, failing for finished games or empty move lists.
pub fn legal_or_err<G: Game>(game: &G, state: &G::State) -> Result<Vec<G::Action>, ChooserError> {
    if game.is_terminal(state) {
        return Err(ChooserError::GameOver);
    }
    let mut actions = Vec::new();
    game.legal_actions(state, &mut actions);
    if actions.is_empty() {
        return Err(ChooserError::NoLegalActions);
    }
    Ok(actions)
}

/// Chooser that picks uniformly among legal actions.
#[derive(Debug)]
pub struct RandomChooser {
    rng: ChaCha20Rng,
}

impl RandomChooser {
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
}

impl Default for RandomChooser {
    fn default() -> Self {
        Self::new()
    }
}

impl<G: Game> MoveChooser<G> for RandomChooser {
    fn name(&self) -> &str {
        "random"
    }

    fn choose(&mut self, game: &G, state: &G::State) -> Result<G::Action, ChooserError> {
        let actions = legal_or_err(game, state)?;
        actions
            .choose(&mut self.rng)
            .copied()
            .ok_or(ChooserError::NoLegalActions)
    }
}
