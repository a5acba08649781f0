//! Evaluator trait for position evaluation.
//!
//! The evaluator provides policy (action probabilities) and value estimates
//! for game states. In AlphaZero, this is a neural network. For testing,
//! we provide a uniform evaluator and a random-rollout evaluator.
//!
//! Evaluators are shared read-only between searches, so `evaluate` takes
//! `&self` and implementations must be `Send + Sync`.

use std::sync::Mutex;

use engine_core::game_utils::calculate_reward;
use engine_core::Game;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use thiserror::Error;

/// Errors that can occur during evaluation.
#[derive(Debug, Error)]
pub enum EvaluatorError {
    #[error("Evaluation failed: {0}")]
    EvaluationFailed(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),
}

/// Ways an evaluation can break its contract with the search.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ContractViolation {
    #[error("policy has {actual} entries, expected {expected}")]
    PolicyLength { expected: usize, actual: usize },

    #[error("prior {prior} for action {index} is negative or not finite")]
    InvalidPrior { index: usize, prior: f32 },

    #[error("prior {prior} assigned to illegal action {index}")]
    IllegalMass { index: usize, prior: f32 },

    #[error("legal priors sum to {sum}, expected 1.0")]
    PriorSum { sum: f32 },

    #[error("value {value} is outside [-1, 1]")]
    InvalidValue { value: f32 },
}

/// Result of evaluating a game state.
#[derive(Debug, Clone, PartialEq)]
pub struct EvalResult {
    /// Policy: probability distribution over actions.
    /// Index i corresponds to `Game::action_index` i. Illegal actions must
    /// be exactly 0.0 and legal actions must sum to 1.0.
    pub policy: Vec<f32>,

    /// Value estimate for the player to move.
    /// Range: -1.0 (certain loss) to +1.0 (certain win).
    pub value: f32,
}

impl EvalResult {
    /// Uniform priors over `legal` (indices) with a neutral value.
    pub fn uniform(num_actions: usize, legal: &[usize]) -> Self {
        let mut policy = vec![0.0; num_actions];
        if !legal.is_empty() {
            let prob = 1.0 / legal.len() as f32;
            for &i in legal {
                policy[i] = prob;
            }
        }
        Self { policy, value: 0.0 }
    }

    /// Check this result against the legal action indices of the state it
    /// was produced for.
    pub fn validate(&self, legal_mask: &[bool], tolerance: f32) -> Result<(), ContractViolation> {
        if self.policy.len() != legal_mask.len() {
            return Err(ContractViolation::PolicyLength {
                expected: legal_mask.len(),
                actual: self.policy.len(),
            });
        }
        if !self.value.is_finite() || !(-1.0..=1.0).contains(&self.value) {
            return Err(ContractViolation::InvalidValue { value: self.value });
        }

        let mut sum = 0.0f32;
        for (index, (&prior, &legal)) in self.policy.iter().zip(legal_mask).enumerate() {
            if !prior.is_finite() || prior < 0.0 {
                return Err(ContractViolation::InvalidPrior { index, prior });
            }
            if !legal && prior > 0.0 {
                return Err(ContractViolation::IllegalMass { index, prior });
            }
            sum += prior;
        }
        if (sum - 1.0).abs() > tolerance {
            return Err(ContractViolation::PriorSum { sum });
        }
        Ok(())
    }
}

/// Trait for position evaluators.
///
/// Implementations could be:
/// - UniformEvaluator: Returns uniform policy (for testing)
/// - RolloutEvaluator: Random rollouts to terminal state
/// - A neural network wrapper supplied by the training side
pub trait Evaluator<G: Game>: Send + Sync {
    /// Evaluate a non-terminal state.
    ///
    /// # Arguments
    /// * `game` - Game rules
    /// * `state` - State to evaluate
    /// * `legal` - Legal actions in `state`, in ascending index order
    ///
    /// # Returns
    /// Policy over all `game.num_actions()` indices and a value estimate
    fn evaluate(
        &self,
        game: &G,
        state: &G::State,
        legal: &[G::Action],
    ) -> Result<EvalResult, EvaluatorError>;
}

/// Uniform evaluator that assigns equal probability to all legal moves.
/// Value is always 0.0 (neutral). Useful for testing MCTS without a model.
#[derive(Debug, Clone, Default)]
pub struct UniformEvaluator;

impl UniformEvaluator {
    pub fn new() -> Self {
        Self
    }
}

impl<G: Game> Evaluator<G> for UniformEvaluator {
    fn evaluate(
        &self,
        game: &G,
        _state: &G::State,
        legal: &[G::Action],
    ) -> Result<EvalResult, EvaluatorError> {
        let indices: Vec<usize> = legal.iter().map(|&a| game.action_index(a)).collect();
        Ok(EvalResult::uniform(game.num_actions(), &indices))
    }
}

/// Random rollout evaluator: uniform priors, and the value is the result
/// of one random playout to the end of the game (or `max_depth` plies).
#[derive(Debug)]
pub struct RolloutEvaluator {
    rng: Mutex<ChaCha20Rng>,
    max_depth: u32,
}

impl RolloutEvaluator {
    pub fn new(seed: u64, max_depth: u32) -> Self {
        Self {
            rng: Mutex::new(ChaCha20Rng::seed_from_u64(seed)),
            max_depth,
        }
    }

    /// Play random moves from `start` and score the result for the player
    /// to move in `start`.
    fn rollout<G: Game>(&self, game: &G, start: &G::State) -> Result<f32, EvaluatorError> {
        let player = game.current_player(start);
        let mut rng = self
            .rng
            .lock()
            .map_err(|_| EvaluatorError::EvaluationFailed("rollout rng poisoned".to_string()))?;

        let mut state = start.clone();
        let mut actions = Vec::new();
        for _ in 0..self.max_depth {
            actions.clear();
            game.legal_actions(&state, &mut actions);
            let Some(&action) = actions.choose(&mut *rng) else {
                break;
            };
            state = game
                .apply(&state, action)
                .map_err(|e| EvaluatorError::InvalidState(e.to_string()))?;
        }
        Ok(calculate_reward(game.outcome(&state), player))
    }
}

impl Default for RolloutEvaluator {
    fn default() -> Self {
        Self::new(0, 200)
    }
}

impl<G: Game> Evaluator<G> for RolloutEvaluator {
    fn evaluate(
        &self,
        game: &G,
        state: &G::State,
        legal: &[G::Action],
    ) -> Result<EvalResult, EvaluatorError> {
        let indices: Vec<usize> = legal.iter().map(|&a| game.action_index(a)).collect();
        let mut result = EvalResult::uniform(game.num_actions(), &indices);
        result.value = self.rollout(game, state)?;
        Ok(result)
    }
}
