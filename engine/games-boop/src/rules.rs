//! Rule variants

use std::fmt;
use std::str::FromStr;

use engine_config::GameConfig;
use serde::{Deserialize, Serialize};

use crate::board::{PieceKind, CELLS};
use crate::error::RulesError;

/// What happens to the pieces of a graduated line.
///
/// Graduated pieces always leave the board. Cats go back to the pool.
/// Kittens leave the game for good, and the policy decides how many cats
/// come out of the reserve in exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GraduationPolicy {
    /// One cat leaves the reserve for every kitten retired
    #[default]
    PromoteKittens,
    /// Three cats leave the reserve per line, if three are still there
    ReleaseThreeCats,
}

impl GraduationPolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            GraduationPolicy::PromoteKittens => "promote_kittens",
            GraduationPolicy::ReleaseThreeCats => "release_three_cats",
        }
    }
}

impl fmt::Display for GraduationPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GraduationPolicy {
    type Err = RulesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "promote_kittens" => Ok(GraduationPolicy::PromoteKittens),
            "release_three_cats" => Ok(GraduationPolicy::ReleaseThreeCats),
            other => Err(RulesError::UnknownPolicy(other.to_string())),
        }
    }
}

/// Per-game rule settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rules {
    /// Kittens per player, all starting in the pool. Also the number of
    /// cats a player must have on the board for the all-cats win.
    pub kittens: u8,
    /// Cats per player, all starting in the reserve
    pub cats: u8,
    pub graduation: GraduationPolicy,
    /// Draw once this many plies have been played (0 = unlimited)
    pub max_plies: u32,
}

impl Rules {
    pub const fn standard() -> Self {
        Self {
            kittens: 8,
            cats: 8,
            graduation: GraduationPolicy::PromoteKittens,
            max_plies: 200,
        }
    }

    pub fn with_graduation(mut self, graduation: GraduationPolicy) -> Self {
        self.graduation = graduation;
        self
    }

    pub fn with_max_plies(mut self, max_plies: u32) -> Self {
        self.max_plies = max_plies;
        self
    }

    pub fn with_pieces(mut self, kittens: u8, cats: u8) -> Self {
        self.kittens = kittens;
        self.cats = cats;
        self
    }

    pub fn validate(&self) -> Result<(), RulesError> {
        if self.kittens == 0 {
            return Err(RulesError::NoKittens);
        }
        if self.kittens as usize * 2 > CELLS {
            return Err(RulesError::TooManyKittens {
                kittens: self.kittens,
            });
        }
        Ok(())
    }

    /// Total allotment of `kind` per player
    pub fn allotment(&self, kind: PieceKind) -> u8 {
        match kind {
            PieceKind::Kitten => self.kittens,
            PieceKind::Cat => self.cats,
        }
    }
}

impl Default for Rules {
    fn default() -> Self {
        Self::standard()
    }
}

impl TryFrom<&GameConfig> for Rules {
    type Error = RulesError;

    fn try_from(config: &GameConfig) -> Result<Self, Self::Error> {
        let rules = Rules {
            kittens: config.kittens,
            cats: config.cats,
            graduation: config.graduation_policy.parse()?,
            max_plies: config.max_plies,
        };
        rules.validate()?;
        Ok(rules)
    }
}
