use mdi_cc::transition::{StateTransition, DEFAULT_STATE_TRANSITIONS};
use serde::{Deserialize, Serialize};

use crate::defaults;

/// Configuration for `Engine.update`
///
/// Sets the number of iterations, the burn-in fraction, the thinning
/// interval, and the transitions.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct EngineUpdateConfig {
    /// Number of iterations to run each chain.
    pub n_iters: usize,
    /// Fraction of iterations discarded before samples are retained.
    #[serde(default = "default_burn_in")]
    pub burn_in: f64,
    /// Retain a sample every `save_every` post-burn-in iterations.
    #[serde(default = "default_save_every")]
    pub save_every: usize,
    /// Which transitions to run
    pub transitions: Vec<StateTransition>,
}

fn default_burn_in() -> f64 {
    defaults::DEFAULT_BURN_IN
}

fn default_save_every() -> usize {
    defaults::DEFAULT_SAVE_EVERY
}

impl EngineUpdateConfig {
    pub fn new() -> Self {
        Self {
            n_iters: 1,
            burn_in: defaults::DEFAULT_BURN_IN,
            save_every: defaults::DEFAULT_SAVE_EVERY,
            transitions: Vec::new(),
        }
    }

    pub fn with_default_transitions() -> Self {
        Self::new().default_transitions()
    }

    #[must_use]
    pub fn default_transitions(mut self) -> Self {
        self.transitions = DEFAULT_STATE_TRANSITIONS.into();
        self
    }

    #[must_use]
    pub fn transitions(mut self, transitions: Vec<StateTransition>) -> Self {
        self.transitions.extend(transitions);
        self
    }

    #[must_use]
    pub fn transition(mut self, transition: StateTransition) -> Self {
        self.transitions.push(transition);
        self
    }

    #[must_use]
    pub fn n_iters(mut self, n_iters: usize) -> Self {
        self.n_iters = n_iters;
        self
    }

    /// Set the burn-in fraction. Must be in [0, 1).
    #[must_use]
    pub fn burn_in(mut self, burn_in: f64) -> Self {
        assert!((0.0..1.0).contains(&burn_in), "burn_in must be in [0, 1)");
        self.burn_in = burn_in;
        self
    }

    /// Set the thinning interval
    #[must_use]
    pub fn save_every(mut self, save_every: usize) -> Self {
        assert!(save_every > 0, "save_every must be at least 1");
        self.save_every = save_every;
        self
    }

    /// The number of iterations discarded as burn-in
    pub fn n_burn_in(&self) -> usize {
        (self.n_iters as f64 * self.burn_in).floor() as usize
    }
}

impl Default for EngineUpdateConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn n_burn_in_is_a_fraction_of_n_iters() {
        let config = EngineUpdateConfig::with_default_transitions()
            .n_iters(1000)
            .burn_in(0.2);
        assert_eq!(config.n_burn_in(), 200);
    }

    #[test]
    fn config_round_trips_through_yaml() {
        let config = EngineUpdateConfig::with_default_transitions()
            .n_iters(500)
            .burn_in(0.1)
            .save_every(5);

        let yaml = serde_yaml::to_string(&config).unwrap();
        let back: EngineUpdateConfig =
            serde_yaml::from_str(&yaml).unwrap();

        assert_eq!(config, back);
    }

    #[test]
    #[should_panic]
    fn full_burn_in_is_rejected() {
        let _config = EngineUpdateConfig::new().burn_in(1.0);
    }
}
