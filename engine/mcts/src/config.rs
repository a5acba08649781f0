//! MCTS configuration parameters.

/// Configuration for Monte Carlo Tree Search.
#[derive(Debug, Clone, PartialEq)]
pub struct MctsConfig {
    /// Number of simulations to run per search.
    pub num_simulations: u32,

    /// Exploration constant for UCB formula (c_puct in AlphaZero).
    /// Higher values encourage exploration, lower values favor exploitation.
    pub c_puct: f32,

    /// Dirichlet noise alpha for root node exploration.
    /// Set to 0.0 to disable noise (for evaluation/inference).
    pub dirichlet_alpha: f32,

    /// Fraction of prior that comes from Dirichlet noise at root.
    /// 0.25 means 75% prior + 25% noise.
    pub dirichlet_weight: f32,

    /// Temperature for action selection after search.
    /// 1.0 = sample proportional to visit counts
    /// 0.0 = always pick most-visited (argmax)
    pub temperature: f32,

    /// Plies after which `MctsChooser` switches to greedy selection.
    pub temp_threshold: u32,

    /// Allowed distance of the legal prior sum from 1.0.
    pub prior_tolerance: f32,

    /// Replace evaluator output that breaks its contract with uniform
    /// priors and a zero value instead of failing the search.
    pub uniform_fallback: bool,
}

impl Default for MctsConfig {
    fn default() -> Self {
        Self {
            num_simulations: 800,
            c_puct: 1.5,
            dirichlet_alpha: 0.3,
            dirichlet_weight: 0.25,
            temperature: 1.0,
            temp_threshold: 30,
            prior_tolerance: 1e-3,
            uniform_fallback: false,
        }
    }
}

impl From<&engine_config::MctsConfig> for MctsConfig {
    fn from(config: &engine_config::MctsConfig) -> Self {
        Self {
            num_simulations: config.num_simulations,
            c_puct: config.c_puct as f32,
            dirichlet_alpha: config.dirichlet_alpha as f32,
            dirichlet_weight: config.dirichlet_weight as f32,
            temperature: config.temperature as f32,
            temp_threshold: config.temp_threshold,
            prior_tolerance: config.prior_tolerance as f32,
            uniform_fallback: config.uniform_fallback,
        }
    }
}

impl MctsConfig {
    /// Create config for training (with exploration noise).
    pub fn for_training() -> Self {
        Self::default()
    }

    /// Create config for evaluation/inference (no noise, greedy selection).
    pub fn for_evaluation() -> Self {
        Self {
            dirichlet_alpha: 0.0, // No noise
            dirichlet_weight: 0.0,
            temperature: 0.0, // Greedy
            temp_threshold: 0,
            ..Self::default()
        }
    }

    /// Create a fast config for testing.
    pub fn for_testing() -> Self {
        Self {
            num_simulations: 50,
            ..Self::for_evaluation()
        }
    }

    /// Builder pattern: set number of simulations.
    pub fn with_simulations(mut self, n: u32) -> Self {
        self.num_simulations = n;
        self
    }

    /// Builder pattern: set c_puct exploration constant.
    pub fn with_c_puct(mut self, c: f32) -> Self {
        self.c_puct = c;
        self
    }

    /// Builder pattern: set temperature.
    pub fn with_temperature(mut self, t: f32) -> Self {
        self.temperature = t;
        self
    }

    /// Builder pattern: set the greedy cut-over ply.
    pub fn with_temp_threshold(mut self, plies: u32) -> Self {
        self.temp_threshold = plies;
        self
    }

    /// Builder pattern: set root noise (alpha 0.0 disables it).
    pub fn with_dirichlet(mut self, alpha: f32, weight: f32) -> Self {
        self.dirichlet_alpha = alpha;
        self.dirichlet_weight = weight;
        self
    }

    /// Builder pattern: set the prior-sum tolerance.
    pub fn with_prior_tolerance(mut self, tolerance: f32) -> Self {
        self.prior_tolerance = tolerance;
        self
    }

    /// Builder pattern: opt in to the uniform fallback.
    pub fn with_uniform_fallback(mut self, enabled: bool) -> Self {
        self.uniform_fallback = enabled;
        self
    }

    /// Whether root noise is applied.
    pub fn uses_noise(&self) -> bool {
        self.dirichlet_alpha > 0.0 && self.dirichlet_weight > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = MctsConfig::default();
        assert_eq!(config.num_simulations, 800);
        assert!((config.c_puct - 1.5).abs() < 1e-6);
        assert!(config.uses_noise());
        assert!(!config.uniform_fallback);
    }

    #[test]
    fn test_builder_pattern() {
        let config = MctsConfig::default()
            .with_simulations(100)
            .with_temperature(0.5)
            .with_dirichlet(0.0, 0.25)
            .with_uniform_fallback(true);

        assert_eq!(config.num_simulations, 100);
        assert!((config.temperature - 0.5).abs() < 1e-6);
        assert!(!config.uses_noise());
        assert!(config.uniform_fallback);
    }

    #[test]
    fn test_evaluation_config() {
        let config = MctsConfig::for_evaluation();
        assert!((config.dirichlet_alpha).abs() < 1e-6);
        assert!((config.temperature).abs() < 1e-6);
        assert_eq!(MctsConfig::for_testing().num_simulations, 50);
    }

    #[test]
    fn test_from_central_config() {
        let mut central = engine_config::MctsConfig::default();
        central.num_simulations = 64;
        central.c_puct = 2.0;
        central.uniform_fallback = true;

        let config = MctsConfig::from(&central);
        assert_eq!(config.num_simulations, 64);
        assert!((config.c_puct - 2.0).abs() < 1e-6);
        assert!(config.uniform_fallback);
        assert_eq!(config.temp_threshold, central.temp_threshold);
    }
}
