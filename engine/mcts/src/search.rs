//! MCTS search implementation.
//!
//! Implements the core MCTS algorithm:
//! 1. Selection: Traverse tree using UCB to find a leaf
//! 2. Expansion: Add children to the leaf using policy prior
//! 3. Evaluation: Get value estimate from evaluator (or the real result at
//!    a finished game)
//! 4. Backpropagation: Update statistics along the path
//!
//! One simulation always completes before the next begins. Stopping is only
//! checked between simulations, so the tree is consistent whenever the
//! caller looks at it.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use engine_core::game_utils::calculate_reward;
use engine_core::{Game, Outcome};
use rand::Rng;
use rand_chacha::ChaCha20Rng;
use thiserror::Error;
use tracing::{debug, trace, warn};

use crate::config::MctsConfig;
use crate::evaluator::{ContractViolation, EvalResult, Evaluator, EvaluatorError};
use crate::node::NodeId;
use crate::tree::MctsTree;

/// Errors that can occur during MCTS search.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Evaluator error: {0}")]
    Evaluator(#[from] EvaluatorError),

    #[error("Evaluator contract violation: {0}")]
    EvaluatorContractViolation(ContractViolation),

    #[error("No legal moves available")]
    NoLegalMoves,

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Invalid search config: {0}")]
    InvalidConfig(String),

    #[error("Game error: {0}")]
    Game(String),
}

/// Shared stop flag, checked between simulations.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Counters collected while searching.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Completed simulations
    pub simulations: u32,
    /// Evaluator calls, root expansion included
    pub evaluations: u32,
    /// Child states built by cloning and applying a move
    pub state_clones: u32,
    /// Simulations that ended on a finished game
    pub terminal_hits: u32,
    /// Evaluations replaced by uniform priors
    pub fallbacks: u32,
    /// Deepest leaf reached
    pub max_depth: u32,
    /// Wall time spent searching, in microseconds
    pub elapsed_us: u64,
}

/// Result of an MCTS search.
#[derive(Debug, Clone)]
pub struct SearchResult<A> {
    /// Chosen action, `None` when the root is a finished game
    pub action: Option<A>,

    /// Visit distribution over all action indices (sums to 1 once any
    /// simulation has run)
    pub policy: Vec<f32>,

    /// Raw visit counts per action index
    pub visits: Vec<u32>,

    /// Mean value at the root for the player to move
    pub value: f32,

    /// Result of the game when the root is already finished
    pub outcome: Option<Outcome>,

    pub stats: SearchStats,
}

/// MCTS search state.
pub struct MctsSearch<'a, G: Game, E: Evaluator<G> + ?Sized> {
    game: &'a G,
    evaluator: &'a E,
    config: MctsConfig,
    tree: MctsTree<G>,
    stats: SearchStats,
    cancel: Option<CancelToken>,
    /// Policy vector length, read from the game once
    num_actions: usize,
}

impl<'a, G: Game, E: Evaluator<G> + ?Sized> MctsSearch<'a, G, E> {
    /// Create a new MCTS search from the given game state.
    ///
    /// A live root is evaluated and expanded here, which does not count as
    /// a simulation; root noise is mixed in afterwards if configured. A
    /// finished root is left untouched.
    pub fn new(
        game: &'a G,
        evaluator: &'a E,
        config: MctsConfig,
        root: G::State,
        rng: &mut ChaCha20Rng,
    ) -> Result<Self, SearchError> {
        validate_config(&config)?;

        let root_value = terminal_reward(game, &root);
        if root_value.is_none() {
            let mut legal = Vec::new();
            game.legal_actions(&root, &mut legal);
            if legal.is_empty() {
                return Err(SearchError::NoLegalMoves);
            }
        }

        let mut search = Self {
            game,
            evaluator,
            config,
            tree: MctsTree::new(root, root_value),
            stats: SearchStats::default(),
            cancel: None,
            num_actions: game.num_actions(),
        };

        if root_value.is_none() {
            let start = Instant::now();
            let root_id = search.tree.root();
            search.expand(root_id)?;
            if search.config.uses_noise() {
                search.add_dirichlet_noise(rng)?;
            }
            search.stats.elapsed_us += start.elapsed().as_micros() as u64;
        }

        Ok(search)
    }

    /// Stop early once `token` is cancelled.
    pub fn with_cancel(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Whether the root is a finished game.
    pub fn is_finished(&self) -> bool {
        self.tree.get(self.tree.root()).is_terminal()
    }

    /// Run up to `n` more simulations. Returns how many completed, which is
    /// fewer than `n` only after cancellation.
    pub fn step(&mut self, n: u32) -> Result<u32, SearchError> {
        if self.is_finished() {
            return Ok(0);
        }

        let start = Instant::now();
        let mut done = 0;
        let outcome = loop {
            if done == n {
                break Ok(());
            }
            if self.cancel.as_ref().is_some_and(CancelToken::is_cancelled) {
                debug!(completed = done, requested = n, "MCTS search cancelled");
                break Ok(());
            }
            if let Err(e) = self.simulate() {
                break Err(e);
            }
            done += 1;
        };
        self.stats.elapsed_us += start.elapsed().as_micros() as u64;
        outcome.map(|()| done)
    }

    /// Run the configured number of simulations and pick a move.
    pub fn run(&mut self, rng: &mut ChaCha20Rng) -> Result<SearchResult<G::Action>, SearchError> {
        self.step(self.config.num_simulations)?;
        let result = self.result(rng)?;
        debug!(
            simulations = self.stats.simulations,
            evaluations = self.stats.evaluations,
            state_clones = self.stats.state_clones,
            terminal_hits = self.stats.terminal_hits,
            fallbacks = self.stats.fallbacks,
            max_depth = self.stats.max_depth,
            elapsed_us = self.stats.elapsed_us,
            value = result.value,
            "MCTS search complete"
        );
        Ok(result)
    }

    /// Pick a move from the visit counts gathered so far.
    ///
    /// Temperature 0 takes the most visited action (lowest index on ties);
    /// otherwise actions are sampled proportionally to N^(1/T). Before any
    /// simulation has run the highest prior wins.
    pub fn result(&self, rng: &mut ChaCha20Rng) -> Result<SearchResult<G::Action>, SearchError> {
        let root = self.tree.get(self.tree.root());
        let num_actions = self.num_actions;

        if let Some(value) = root.terminal_value {
            let outcome = root.state.as_ref().and_then(|s| self.game.outcome(s));
            return Ok(SearchResult {
                action: None,
                policy: vec![0.0; num_actions],
                visits: vec![0; num_actions],
                value,
                outcome,
                stats: self.stats,
            });
        }

        let mut visits = vec![0u32; num_actions];
        for (action, n) in self.tree.root_visits() {
            visits[self.game.action_index(action)] = n;
        }
        let policy = self.tree.root_policy(self.game);

        let action = if self.stats.simulations == 0 {
            self.highest_prior()
        } else if self.config.temperature < 1e-6 {
            self.tree.best_action().map(|(a, _)| a)
        } else {
            let weights = temperature_weights(&visits, self.config.temperature);
            sample_index(&weights, rng).and_then(|i| self.game.action_from_index(i))
        };
        let action = action.ok_or(SearchError::NoLegalMoves)?;

        Ok(SearchResult {
            action: Some(action),
            policy,
            visits,
            value: root.mean_value(),
            outcome: None,
            stats: self.stats,
        })
    }

    /// Counters so far.
    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }

    /// Get the search tree (for inspection/debugging).
    pub fn tree(&self) -> &MctsTree<G> {
        &self.tree
    }

    /// Run a single simulation (select -> expand -> evaluate -> backpropagate).
    fn simulate(&mut self) -> Result<(), SearchError> {
        let leaf_id = self.select()?;
        let leaf = self.tree.get(leaf_id);
        let depth = leaf.depth;
        let terminal = leaf.terminal_value;

        let value = match terminal {
            Some(value) => {
                self.stats.terminal_hits += 1;
                value
            }
            None => self.expand(leaf_id)?,
        };

        self.tree.backpropagate(leaf_id, value);
        self.stats.simulations += 1;
        self.stats.max_depth = self.stats.max_depth.max(depth);

        trace!(leaf = leaf_id.0, depth, value, "MCTS simulation complete");
        Ok(())
    }

    /// Descend from the root by UCB until a leaf, materialising child
    /// states on first entry.
    fn select(&mut self) -> Result<NodeId, SearchError> {
        let mut current = self.tree.root();

        while !self.tree.get(current).is_leaf() {
            let child = self
                .tree
                .select_child(current, self.config.c_puct)
                .ok_or_else(|| SearchError::InvalidState("expanded node without children".into()))?;
            if !self.tree.get(child).is_materialised() {
                self.materialise(child)?;
            }
            current = child;
        }

        Ok(current)
    }

    /// Build a child's state by applying its action to the parent state.
    fn materialise(&mut self, child_id: NodeId) -> Result<(), SearchError> {
        let child = self.tree.get(child_id);
        let action = child
            .action
            .ok_or_else(|| SearchError::InvalidState("child without action".into()))?;
        let parent_state = self
            .tree
            .get(child.parent)
            .state
            .as_ref()
            .ok_or_else(|| SearchError::InvalidState("parent state missing".into()))?;

        let state = self
            .game
            .apply(parent_state, action)
            .map_err(|e| SearchError::Game(e.to_string()))?;
        let terminal = terminal_reward(self.game, &state);

        let child = self.tree.get_mut(child_id);
        child.state = Some(state);
        child.terminal_value = terminal;
        self.stats.state_clones += 1;
        Ok(())
    }

    /// Evaluate a live node and add one child per legal action.
    /// Returns the evaluator's value for backpropagation.
    fn expand(&mut self, node_id: NodeId) -> Result<f32, SearchError> {
        let node = self.tree.get(node_id);
        let state = node
            .state
            .as_ref()
            .ok_or_else(|| SearchError::InvalidState("expanding unvisited node".into()))?;

        let mut legal = Vec::new();
        self.game.legal_actions(state, &mut legal);
        if legal.is_empty() {
            return Err(SearchError::InvalidState(
                "live state without legal actions".into(),
            ));
        }

        let eval = self.evaluator.evaluate(self.game, state, &legal)?;
        self.stats.evaluations += 1;
        let eval = self.check_contract(eval, &legal)?;

        for &action in &legal {
            let prior = eval.policy[self.game.action_index(action)];
            self.tree.add_child(node_id, action, prior);
        }

        Ok(eval.value)
    }

    /// Reject evaluator output that breaks its contract, or swap it for
    /// uniform priors when the fallback is enabled.
    fn check_contract(
        &mut self,
        eval: EvalResult,
        legal: &[G::Action],
    ) -> Result<EvalResult, SearchError> {
        let num_actions = self.num_actions;
        let indices: Vec<usize> = legal.iter().map(|&a| self.game.action_index(a)).collect();
        let mut mask = vec![false; num_actions];
        for &i in &indices {
            mask[i] = true;
        }

        match eval.validate(&mask, self.config.prior_tolerance) {
            Ok(()) => Ok(eval),
            Err(violation) if self.config.uniform_fallback => {
                warn!(%violation, "Evaluator broke its contract, using uniform priors");
                self.stats.fallbacks += 1;
                Ok(EvalResult::uniform(num_actions, &indices))
            }
            Err(violation) => Err(SearchError::EvaluatorContractViolation(violation)),
        }
    }

    /// Add Dirichlet noise to root node priors for exploration.
    fn add_dirichlet_noise(&mut self, rng: &mut ChaCha20Rng) -> Result<(), SearchError> {
        let root_id = self.tree.root();
        let children = self.tree.get(root_id).children.clone();
        if children.is_empty() {
            return Ok(());
        }

        let noise = dirichlet_noise(children.len(), self.config.dirichlet_alpha, rng)?;

        // Mix noise with existing priors
        let eps = self.config.dirichlet_weight;
        for (child_id, n) in children.into_iter().zip(noise) {
            let child = self.tree.get_mut(child_id);
            child.prior = (1.0 - eps) * child.prior + eps * n;
        }
        Ok(())
    }

    fn highest_prior(&self) -> Option<G::Action> {
        let root = self.tree.get(self.tree.root());
        let mut best: Option<(G::Action, f32)> = None;
        for &id in &root.children {
            let child = self.tree.get(id);
            let Some(action) = child.action else { continue };
            match best {
                Some((_, p)) if child.prior <= p => {}
                _ => best = Some((action, child.prior)),
            }
        }
        best.map(|(a, _)| a)
    }
}

fn validate_config(config: &MctsConfig) -> Result<(), SearchError> {
    if !config.c_puct.is_finite() || config.c_puct < 0.0 {
        return Err(SearchError::InvalidConfig(format!(
            "c_puct must be finite and non-negative, got {}",
            config.c_puct
        )));
    }
    if !config.temperature.is_finite() || config.temperature < 0.0 {
        return Err(SearchError::InvalidConfig(format!(
            "temperature must be finite and non-negative, got {}",
            config.temperature
        )));
    }
    if !(0.0..=1.0).contains(&config.dirichlet_weight) {
        return Err(SearchError::InvalidConfig(format!(
            "dirichlet_weight must be within [0, 1], got {}",
            config.dirichlet_weight
        )));
    }
    Ok(())
}

/// Reward of a finished game for the player to move in it.
fn terminal_reward<G: Game>(game: &G, state: &G::State) -> Option<f32> {
    game.outcome(state)
        .map(|o| calculate_reward(Some(o), game.current_player(state)))
}

/// Sampling weights (N / N_max)^(1/T); zero-visit actions stay at 0.
fn temperature_weights(visits: &[u32], temperature: f32) -> Vec<f32> {
    let max = visits.iter().copied().max().unwrap_or(0);
    if max == 0 {
        return vec![0.0; visits.len()];
    }
    let exponent = 1.0 / temperature;
    visits
        .iter()
        .map(|&n| {
            if n == 0 {
                0.0
            } else {
                (n as f32 / max as f32).powf(exponent)
            }
        })
        .collect()
}

/// Sample an index proportionally to unnormalised `weights`.
fn sample_index(weights: &[f32], rng: &mut ChaCha20Rng) -> Option<usize> {
    let total: f32 = weights.iter().sum();
    if total <= 0.0 {
        return None;
    }

    let r: f32 = rng.gen::<f32>() * total;
    let mut cumsum = 0.0;
    for (i, &w) in weights.iter().enumerate() {
        cumsum += w;
        if r < cumsum {
            return Some(i);
        }
    }

    // Fallback to last non-zero weight (handles floating point issues)
    weights.iter().rposition(|&w| w > 0.0)
}

/// Generate Dirichlet-distributed noise using Gamma variates.
fn dirichlet_noise(n: usize, alpha: f32, rng: &mut ChaCha20Rng) -> Result<Vec<f32>, SearchError> {
    use rand_distr::{Distribution, Gamma};

    let gamma = Gamma::new(alpha as f64, 1.0)
        .map_err(|e| SearchError::InvalidConfig(format!("dirichlet_alpha {alpha}: {e}")))?;
    let mut samples: Vec<f32> = (0..n).map(|_| gamma.sample(rng) as f32).collect();

    // Normalize
    let sum: f32 = samples.iter().sum();
    if sum > 0.0 {
        for s in &mut samples {
            *s /= sum;
        }
    } else {
        samples.fill(1.0 / n as f32);
    }

    Ok(samples)
}

/// Run a single search from `root` without root noise.
///
/// Returns the chosen action and the root visit distribution together with
/// the rest of the search result.
pub fn search<G: Game, E: Evaluator<G> + ?Sized>(
    game: &G,
    root: &G::State,
    budget: u32,
    evaluator: &E,
    c_puct: f32,
    temperature: f32,
    rng: &mut ChaCha20Rng,
) -> Result<SearchResult<G::Action>, SearchError> {
    let config = MctsConfig::for_evaluation()
        .with_simulations(budget)
        .with_c_puct(c_puct)
        .with_temperature(temperature);
    MctsSearch::new(game, evaluator, config, root.clone(), rng)?.run(rng)
}

/// Convenience function to run a configured MCTS search.
pub fn run_mcts<G: Game, E: Evaluator<G> + ?Sized>(
    game: &G,
    evaluator: &E,
    config: MctsConfig,
    root: G::State,
    rng: &mut ChaCha20Rng,
) -> Result<SearchResult<G::Action>, SearchError> {
    MctsSearch::new(game, evaluator, config, root, rng)?.run(rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluator::UniformEvaluator;
    use games_boop::{Action, Boop, GameState, GameStateBuilder, PieceKind, Player, Position, Rules};
    use rand::SeedableRng;

    /// Player One has cats at (0,0) and (0,1) and a cat in the pool, so a
    /// cat at (0,2) is the only immediate win.
    fn cat_threat() -> GameState {
        GameStateBuilder::new(Rules::default())
            .promote(Player::One, 3)
            .place(Position::at(0, 0), Player::One, PieceKind::Cat)
            .place(Position::at(0, 1), Player::One, PieceKind::Cat)
            .place(Position::at(5, 5), Player::Two, PieceKind::Kitten)
            .build()
            .unwrap()
    }

    #[test]
    fn test_mcts_basic_search() {
        let game = Boop::standard();
        let evaluator = UniformEvaluator::new();
        let config = MctsConfig::for_testing();

        let mut rng = ChaCha20Rng::seed_from_u64(42);
        let result = run_mcts(&game, &evaluator, config, game.initial_state(), &mut rng).unwrap();

        // Only kittens are available in the opening
        assert!(game.action_index(result.action.unwrap()) < 36);

        let sum: f32 = result.policy.iter().sum();
        assert!((sum - 1.0).abs() < 0.01);
        assert_eq!(result.visits.iter().sum::<u32>(), 50);
        assert_eq!(result.stats.simulations, 50);
        // Root expansion plus one evaluation per new leaf
        assert!(result.stats.evaluations >= 1);
        assert!(result.outcome.is_none());
    }

    #[test]
    fn test_mcts_winning_move_has_positive_value() {
        let game = Boop::standard();
        let evaluator = UniformEvaluator::new();
        let config = MctsConfig::for_testing()
            .with_simulations(800)
            .with_temperature(0.0);

        let mut rng = ChaCha20Rng::seed_from_u64(42);
        let mut search =
            MctsSearch::new(&game, &evaluator, config, cat_threat(), &mut rng).unwrap();
        let result = search.run(&mut rng).unwrap();

        let winning = Action::cat(0, 2);
        let tree = search.tree();
        let root = tree.get(tree.root());
        let winning_child = root
            .children
            .iter()
            .map(|&id| tree.get(id))
            .find(|c| c.action == Some(winning))
            .expect("child for the winning cat");

        // The opponent is to move in a lost game
        assert_eq!(winning_child.terminal_value, Some(-1.0));
        assert!(winning_child.visit_count > 0);

        assert_eq!(result.action, Some(winning));
        assert!(result.value > 0.0, "root value {}", result.value);
        assert!(result.policy[game.action_index(winning)] > 0.5);
    }

    #[test]
    fn test_children_are_lazy() {
        let game = Boop::standard();
        let evaluator = UniformEvaluator::new();
        let mut rng = ChaCha20Rng::seed_from_u64(1);
        let mut search = MctsSearch::new(
            &game,
            &evaluator,
            MctsConfig::for_testing(),
            game.initial_state(),
            &mut rng,
        )
        .unwrap();

        // Root expanded, nothing built below it yet
        assert_eq!(search.tree().len(), 37);
        assert_eq!(search.tree().stats().materialised_nodes, 1);
        assert_eq!(search.stats().state_clones, 0);

        search.step(5).unwrap();
        let clones = search.stats().state_clones as usize;
        assert_eq!(clones, search.tree().stats().materialised_nodes - 1);
        // Each opening simulation enters one fresh root child
        assert_eq!(clones, 5);
    }

    #[test]
    fn test_terminal_root_is_not_expanded() {
        let game = Boop::standard();
        let state = game.apply(&cat_threat(), Action::cat(0, 2)).unwrap();
        let evaluator = UniformEvaluator::new();
        let mut rng = ChaCha20Rng::seed_from_u64(0);

        let result = search(&game, &state, 100, &evaluator, 1.5, 0.0, &mut rng).unwrap();
        assert_eq!(result.action, None);
        assert_eq!(result.outcome, Some(Outcome::Win(1)));
        assert_eq!(result.stats.evaluations, 0);
        assert_eq!(result.stats.simulations, 0);
        assert!((result.value - (-1.0)).abs() < 1e-6);
    }

    #[test]
    fn test_result_before_any_simulation_uses_prior() {
        let game = Boop::standard();
        let evaluator = UniformEvaluator::new();
        let mut rng = ChaCha20Rng::seed_from_u64(0);
        let search = MctsSearch::new(
            &game,
            &evaluator,
            MctsConfig::for_testing(),
            game.initial_state(),
            &mut rng,
        )
        .unwrap();

        // Uniform priors tie, lowest index wins
        let result = search.result(&mut rng).unwrap();
        assert_eq!(result.action, Some(Action::kitten(0, 0)));
        assert!(result.policy.iter().all(|&p| p == 0.0));
    }

    #[test]
    fn test_cancel_stops_between_simulations() {
        let game = Boop::standard();
        let evaluator = UniformEvaluator::new();
        let mut rng = ChaCha20Rng::seed_from_u64(0);
        let token = CancelToken::new();
        let mut search = MctsSearch::new(
            &game,
            &evaluator,
            MctsConfig::for_testing(),
            game.initial_state(),
            &mut rng,
        )
        .unwrap()
        .with_cancel(token.clone());

        assert_eq!(search.step(10).unwrap(), 10);
        token.cancel();
        assert_eq!(search.step(10).unwrap(), 0);

        let result = search.result(&mut rng).unwrap();
        assert_eq!(result.visits.iter().sum::<u32>(), 10);
        assert!(result.action.is_some());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let game = Boop::standard();
        let evaluator = UniformEvaluator::new();
        let mut rng = ChaCha20Rng::seed_from_u64(0);
        let config = MctsConfig::for_testing().with_temperature(-1.0);
        let err = MctsSearch::new(&game, &evaluator, config, game.initial_state(), &mut rng)
            .err()
            .unwrap();
        assert!(matches!(err, SearchError::InvalidConfig(_)));
    }

    #[test]
    fn test_sample_index() {
        let mut rng = ChaCha20Rng::seed_from_u64(42);
        let weights = vec![0.0, 0.5, 0.3, 0.2, 0.0];

        // Sample many times and check distribution
        let mut counts = [0u32; 5];
        for _ in 0..1000 {
            counts[sample_index(&weights, &mut rng).unwrap()] += 1;
        }

        // Action 0 and 4 should never be selected
        assert_eq!(counts[0], 0);
        assert_eq!(counts[4], 0);

        // Action 1 should be most common (~500), action 2 (~300), action 3 (~200)
        assert!(counts[1] > counts[2]);
        assert!(counts[2] > counts[3]);

        assert_eq!(sample_index(&[0.0, 0.0], &mut rng), None);
    }

    #[test]
    fn test_temperature_weights() {
        let w = temperature_weights(&[0, 10, 5], 1.0);
        assert_eq!(w, vec![0.0, 1.0, 0.5]);

        // Low temperature sharpens without overflowing
        let w = temperature_weights(&[0, 1000, 999], 0.01);
        assert!(w.iter().all(|x| x.is_finite()));
        assert!((w[1] - 1.0).abs() < 1e-6);
        assert!(w[2] < 1.0);
    }

    #[test]
    fn test_dirichlet_noise() {
        let mut rng = ChaCha20Rng::seed_from_u64(42);
        let noise = dirichlet_noise(5, 0.3, &mut rng).unwrap();

        // Should sum to 1.0
        let sum: f32 = noise.iter().sum();
        assert!((sum - 1.0).abs() < 0.01);

        // All values should be positive
        for &n in &noise {
            assert!(n >= 0.0);
        }

        assert!(dirichlet_noise(5, -1.0, &mut rng).is_err());
    }
}
