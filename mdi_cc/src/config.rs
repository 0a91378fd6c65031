use crate::transition::{StateTransition, DEFAULT_STATE_TRANSITIONS};
use serde::{Deserialize, Serialize};

/// Configuration for `State.update`
///
/// Sets the number of iterations and the transitions to run.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct StateUpdateConfig {
    /// Maximum number of iterations to run.
    pub n_iters: usize,
    /// Which transitions to run
    pub transitions: Vec<StateTransition>,
}

impl StateUpdateConfig {
    pub fn new() -> Self {
        StateUpdateConfig {
            n_iters: 1,
            transitions: DEFAULT_STATE_TRANSITIONS.into(),
        }
    }
}

impl Default for StateUpdateConfig {
    fn default() -> Self {
        StateUpdateConfig::new()
    }
}
