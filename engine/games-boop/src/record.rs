//! Game records, replay and the match driver

use engine_core::{Game, MoveChooser, Outcome};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::action::Action;
use crate::board::Player;
use crate::error::RecordError;
use crate::rules::Rules;
use crate::state::{DrawReason, GameState, Status};
use crate::Boop;

/// Everything needed to reproduce a finished (or abandoned) game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRecord {
    pub rules: Rules,
    pub actions: Vec<Action>,
    /// Outcome observed when the record was written, `None` if unfinished
    pub outcome: Option<Outcome>,
}

impl GameRecord {
    pub fn new(rules: Rules) -> Self {
        Self {
            rules,
            actions: Vec::new(),
            outcome: None,
        }
    }

    pub fn push(&mut self, action: Action) {
        self.actions.push(action);
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Replay every action from the opening position and return the final
    /// state. Fails if an action is illegal or the outcome does not match.
    pub fn replay(&self) -> Result<GameState, RecordError> {
        self.rules.validate()?;
        let final_state = self.actions.iter().enumerate().try_fold(
            GameState::new(self.rules),
            |state, (ply, &action)| {
                state
                    .apply_move(action)
                    .map_err(|source| RecordError::Replay { ply, source })
            },
        )?;

        let replayed = final_state.outcome();
        if replayed != self.outcome {
            return Err(RecordError::OutcomeMismatch {
                recorded: self.outcome,
                replayed,
            });
        }
        Ok(final_state)
    }

    pub fn to_json(&self) -> Result<String, RecordError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, RecordError> {
        let record: GameRecord = serde_json::from_str(json)?;
        record.rules.validate()?;
        Ok(record)
    }
}

/// Play `first` (player one) against `second` (player two) until the game
/// ends and return the record.
pub fn play_game<'a>(
    game: &Boop,
    first: &'a mut dyn MoveChooser<Boop>,
    second: &'a mut dyn MoveChooser<Boop>,
) -> Result<GameRecord, RecordError> {
    let mut state = game.initial_state();
    let mut record = GameRecord::new(*game.rules());

    while !game.is_terminal(&state) {
        let chooser = match state.to_move() {
            Player::One => &mut *first,
            Player::Two => &mut *second,
        };
        let action = match chooser.choose(game, &state) {
            Ok(action) => action,
            Err(source) => {
                return Err(RecordError::Chooser {
                    name: chooser.name().to_string(),
                    source,
                })
            }
        };

        state = match game.apply(&state, action) {
            Ok(next) => next,
            Err(source) => {
                return Err(RecordError::IllegalChoice {
                    name: chooser.name().to_string(),
                    ply: state.ply(),
                    source,
                })
            }
        };
        debug!(ply = state.ply(), chooser = chooser.name(), %action, "Applied move");
        record.push(action);
    }

    if state.status() == Status::Drawn(DrawReason::PlyLimit) {
        warn!(
            plies = state.ply(),
            first = first.name(),
            second = second.name(),
            "Game hit the ply limit without a winner"
        );
    }
    record.outcome = game.outcome(&state);
    debug!(outcome = ?record.outcome, plies = record.len(), "Game finished");
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RulesError;
    use engine_core::{ChooserError, RandomChooser};

    /// Always plays the lowest legal action index
    struct FirstLegal;

    impl MoveChooser<Boop> for FirstLegal {
        fn name(&self) -> &str {
            "first-legal"
        }

        fn choose(&mut self, _game: &Boop, state: &GameState) -> Result<Action, ChooserError> {
            state
                .legal_moves()
                .first()
                .copied()
                .ok_or(ChooserError::NoLegalActions)
        }
    }

    /// Tries the same cell forever
    struct Stubborn;

    impl MoveChooser<Boop> for Stubborn {
        fn name(&self) -> &str {
            "stubborn"
        }

        fn choose(&mut self, _game: &Boop, _state: &GameState) -> Result<Action, ChooserError> {
            Ok(Action::kitten(0, 0))
        }
    }

    #[test]
    fn test_play_game_reaches_terminal_and_replays() {
        let game = Boop::standard();
        let record = play_game(
            &game,
            &mut RandomChooser::with_seed(1),
            &mut RandomChooser::with_seed(2),
        )
        .unwrap();

        assert!(record.outcome.is_some());
        assert!(!record.is_empty());
        let state = record.replay().unwrap();
        assert!(state.is_terminal());
        assert_eq!(state.ply() as usize, record.len());
    }

    #[test]
    fn test_seeded_games_are_reproducible() {
        let game = Boop::standard();
        let a = play_game(
            &game,
            &mut RandomChooser::with_seed(9),
            &mut RandomChooser::with_seed(10),
        )
        .unwrap();
        let b = play_game(
            &game,
            &mut RandomChooser::with_seed(9),
            &mut RandomChooser::with_seed(10),
        )
        .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_play_game_with_unrelated_borrows() {
        let game = Boop::new(Rules::default().with_max_plies(12));
        let mut first = FirstLegal;
        let record = {
            let mut second = RandomChooser::with_seed(4);
            play_game(&game, &mut first, &mut second).unwrap()
        };
        // `first` outlives `second` and is still usable afterwards
        assert_eq!(first.name(), "first-legal");
        assert_eq!(record.actions[0], Action::kitten(0, 0));
        assert!(record.replay().unwrap().is_terminal());
    }

    #[test]
    fn test_ply_limit_ends_game() {
        let game = Boop::new(Rules::default().with_max_plies(6));
        let record = play_game(&game, &mut FirstLegal, &mut FirstLegal).unwrap();

        assert!(record.len() <= 6);
        assert!(record.replay().is_ok());
    }

    #[test]
    fn test_illegal_choice_reported() {
        let game = Boop::standard();
        let err = play_game(&game, &mut Stubborn, &mut Stubborn).unwrap_err();
        match err {
            RecordError::IllegalChoice { name, ply, .. } => {
                assert_eq!(name, "stubborn");
                assert_eq!(ply, 1);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_json_roundtrip() {
        let mut record = GameRecord::new(Rules::default());
        record.push(Action::kitten(2, 2));
        record.push(Action::kitten(3, 3));

        let json = record.to_json().unwrap();
        let back = GameRecord::from_json(&json).unwrap();
        assert_eq!(back, record);
        assert!(back.replay().is_ok());
    }

    #[test]
    fn test_replay_detects_illegal_action() {
        let mut record = GameRecord::new(Rules::default());
        record.push(Action::kitten(2, 2));
        record.push(Action::kitten(2, 2));

        assert!(matches!(
            record.replay(),
            Err(RecordError::Replay { ply: 1, .. })
        ));
    }

    #[test]
    fn test_replay_detects_outcome_mismatch() {
        let mut record = GameRecord::new(Rules::default());
        record.push(Action::kitten(2, 2));
        record.outcome = Some(Outcome::Draw);

        assert!(matches!(
            record.replay(),
            Err(RecordError::OutcomeMismatch { .. })
        ));
    }

    #[test]
    fn test_from_json_rejects_bad_rules() {
        let json = r#"{"rules":{"kittens":0,"cats":8,"graduation":"promote_kittens","max_plies":200},"actions":[],"outcome":null}"#;
        assert!(matches!(
            GameRecord::from_json(json),
            Err(RecordError::Rules(RulesError::NoKittens))
        ));
    }
}
