//! Monte Carlo Tree Search (MCTS) implementation for AlphaZero-style game playing.
//!
//! This crate provides a game-agnostic MCTS implementation that works with any
//! game implementing the `engine-core` [`Game`](engine_core::Game) trait.
//!
//! # Overview
//!
//! MCTS is a search algorithm that builds a search tree by running simulations.
//! Each simulation consists of four phases:
//!
//! 1. **Selection**: Traverse the tree using UCB (Upper Confidence Bound) to
//!    balance exploration and exploitation
//! 2. **Expansion**: When reaching a leaf, expand it by adding children for
//!    each legal action. Child states are built the first time a
//!    simulation enters them.
//! 3. **Evaluation**: Use a policy/value evaluator to estimate the value of
//!    the new state, or the real result when the game is over
//! 4. **Backpropagation**: Update visit counts and value estimates along the
//!    path from leaf to root, flipping sign every ply
//!
//! # Usage
//!
//! ```
//! use engine_core::Game;
//! use games_boop::Boop;
//! use mcts::{run_mcts, MctsConfig, UniformEvaluator};
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha20Rng;
//!
//! let game = Boop::standard();
//! let evaluator = UniformEvaluator::new();
//! let config = MctsConfig::for_testing();
//!
//! let mut rng = ChaCha20Rng::seed_from_u64(42);
//! let result = run_mcts(&game, &evaluator, config, game.initial_state(), &mut rng).unwrap();
//!
//! assert!(result.action.is_some());
//! assert_eq!(result.visits.iter().sum::<u32>(), 50);
//! ```
//!
//! # Configuration
//!
//! The [`MctsConfig`] struct controls search behavior:
//!
//! - `num_simulations`: Number of simulations per search (default: 800)
//! - `c_puct`: Exploration constant for UCB (default: 1.5)
//! - `dirichlet_alpha` / `dirichlet_weight`: Root noise for self-play
//! - `temperature`: Temperature for action selection (1.0 = proportional, 0.0 = greedy)
//! - `uniform_fallback`: Opt-in replacement of bad evaluator output
//!
//! # Evaluators
//!
//! The search requires an [`Evaluator`] to estimate policy and value:
//!
//! - [`UniformEvaluator`]: Returns uniform policy over legal moves (for testing)
//! - [`RolloutEvaluator`]: Uniform policy, value from one random playout
//! - Custom evaluators can wrap a trained network
//!
//! Evaluator output is checked on every call. Priors on illegal moves,
//! priors that do not sum to one, or values outside [-1, 1] abort the
//! search with [`SearchError::EvaluatorContractViolation`].

pub mod chooser;
pub mod config;
pub mod evaluator;
pub mod node;
pub mod search;
pub mod tree;

// Re-export main types
pub use chooser::MctsChooser;
pub use config::MctsConfig;
pub use evaluator::{
    ContractViolation, EvalResult, Evaluator, EvaluatorError, RolloutEvaluator, UniformEvaluator,
};
pub use node::{MctsNode, NodeId};
pub use search::{
    run_mcts, search, CancelToken, MctsSearch, SearchError, SearchResult, SearchStats,
};
pub use tree::{MctsTree, TreeStats};
