//! MCTS-backed move chooser.

use engine_config::CentralConfig;
use engine_core::chooser::legal_or_err;
use engine_core::{ChooserError, Game, MoveChooser};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use tracing::trace;

use crate::config::MctsConfig;
use crate::evaluator::Evaluator;
use crate::search::MctsSearch;

/// Plays the move MCTS picks with the given evaluator.
///
/// The configured temperature applies for the first `temp_threshold` plies
/// of a game; after that the most visited move is played.
#[derive(Debug)]
pub struct MctsChooser<E> {
    evaluator: E,
    config: MctsConfig,
    rng: ChaCha20Rng,
}

impl<E> MctsChooser<E> {
    pub fn new(evaluator: E, config: MctsConfig) -> Self {
        Self {
            evaluator,
            config,
            rng: ChaCha20Rng::from_entropy(),
        }
    }

    pub fn with_seed(evaluator: E, config: MctsConfig, seed: u64) -> Self {
        Self {
            evaluator,
            config,
            rng: ChaCha20Rng::seed_from_u64(seed),
        }
    }

    /// Build from the `[mcts]` section, seeded with `common.seed`.
    pub fn from_config(evaluator: E, config: &CentralConfig) -> Self {
        Self::with_seed(evaluator, MctsConfig::from(&config.mcts), config.common.seed)
    }

    pub fn config(&self) -> &MctsConfig {
        &self.config
    }

    /// Config for a search at `ply`.
    fn config_at(&self, ply: u32) -> MctsConfig {
        if ply < self.config.temp_threshold {
            self.config.clone()
        } else {
            self.config.clone().with_temperature(0.0)
        }
    }
}

impl<G, E> MoveChooser<G> for MctsChooser<E>
where
    G: Game,
    E: Evaluator<G>,
{
    fn name(&self) -> &str {
        "mcts"
    }

    fn choose(&mut self, game: &G, state: &G::State) -> Result<G::Action, ChooserError> {
        legal_or_err(game, state)?;

        let ply = game.ply(state);
        let config = self.config_at(ply);
        let mut search = MctsSearch::new(game, &self.evaluator, config, state.clone(), &mut self.rng)
            .map_err(|e| ChooserError::Search(e.to_string()))?;
        let result = search
            .run(&mut self.rng)
            .map_err(|e| ChooserError::Search(e.to_string()))?;

        let action = result.action.ok_or(ChooserError::NoLegalActions)?;
        trace!(ply, action = %action, value = result.value, "MCTS chose move");
        Ok(action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluator::UniformEvaluator;
    use games_boop::{Action, Boop, GameStateBuilder, PieceKind, Player, Position, Rules};

    #[test]
    fn test_temperature_only_before_threshold() {
        let chooser = MctsChooser::with_seed(
            UniformEvaluator::new(),
            MctsConfig::for_testing()
                .with_temperature(1.0)
                .with_temp_threshold(4),
            0,
        );
        assert!((chooser.config_at(3).temperature - 1.0).abs() < 1e-6);
        assert!(chooser.config_at(4).temperature.abs() < 1e-6);
    }

    #[test]
    fn test_from_config_uses_common_seed() {
        let game = Boop::standard();
        let state = game.initial_state();
        let mut config = CentralConfig::default();
        config.mcts.num_simulations = 32;

        let pick = |config: &CentralConfig| {
            MctsChooser::from_config(UniformEvaluator::new(), config)
                .choose(&game, &state)
                .unwrap()
        };
        config.common.seed = 17;
        let first = pick(&config);
        assert_eq!(pick(&config), first);

        let chooser = MctsChooser::from_config(UniformEvaluator::new(), &config);
        assert_eq!(chooser.config().num_simulations, 32);
        assert!(chooser.config().uses_noise());
    }

    #[test]
    fn test_chooser_takes_immediate_win() {
        let state = GameStateBuilder::new(Rules::default())
            .promote(Player::One, 3)
            .place(Position::at(0, 0), Player::One, PieceKind::Cat)
            .place(Position::at(0, 1), Player::One, PieceKind::Cat)
            .place(Position::at(5, 5), Player::Two, PieceKind::Kitten)
            .ply(40)
            .build()
            .unwrap();

        let mut chooser = MctsChooser::with_seed(
            UniformEvaluator::new(),
            MctsConfig::for_testing().with_simulations(400),
            9,
        );
        let action = chooser.choose(&Boop::standard(), &state).unwrap();
        assert_eq!(action, Action::cat(0, 2));
    }

    #[test]
    fn test_chooser_rejects_finished_game() {
        let game = Boop::standard();
        let state = GameStateBuilder::new(Rules::default())
            .promote(Player::One, 3)
            .place(Position::at(0, 0), Player::One, PieceKind::Cat)
            .place(Position::at(0, 1), Player::One, PieceKind::Cat)
            .build()
            .unwrap();
        let finished = game.apply(&state, Action::cat(0, 2)).unwrap();

        let mut chooser = MctsChooser::with_seed(UniformEvaluator::new(), MctsConfig::for_testing(), 0);
        assert!(matches!(
            chooser.choose(&game, &finished),
            Err(ChooserError::GameOver)
        ));
    }
}
