//! Callbacks for monitoring engine updates
use indicatif::{ProgressBar, ProgressStyle};
use mdi_cc::state::State;

use super::Chain;
use crate::config::EngineUpdateConfig;

/// Custom update handler for `Engine.update`.
///
/// Handlers are cloned into each chain's worker, so shared state must be
/// behind something like an `Arc`.
pub trait UpdateHandler: Clone + Send + Sync {
    /// Called before any chain starts updating
    fn global_init(&mut self, _config: &EngineUpdateConfig, _chains: &[Chain]) {
    }

    /// Called after each iteration of a chain
    fn chain_updated(&mut self, _chain_id: usize, _state: &State) {}

    /// Called when a chain aborts on a numerical error
    fn chain_failed(&mut self, _chain_id: usize, _chain: &Chain) {}

    /// Called when a chain finishes its configured iterations
    fn chain_complete(&mut self, _chain_id: usize, _chain: &Chain) {}

    /// Return `true` to ask every chain to stop at its next iteration
    /// boundary
    fn stop_engine(&self) -> bool {
        false
    }

    /// Called once after all chains have stopped
    fn finalize(&mut self) {}
}

/// No-op update handler
impl UpdateHandler for () {}

/// Renders a progress bar across all chains' iterations
#[derive(Clone)]
pub struct ProgressBarHandler {
    bar: ProgressBar,
}

impl Default for ProgressBarHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressBarHandler {
    pub fn new() -> Self {
        let bar = ProgressBar::new(0);
        bar.set_style(
            ProgressStyle::with_template(
                "{spinner:.green} [{elapsed_precise}] [{wide_bar}] {pos}/{len}",
            )
            .unwrap(),
        );
        Self { bar }
    }
}

impl UpdateHandler for ProgressBarHandler {
    fn global_init(&mut self, config: &EngineUpdateConfig, chains: &[Chain]) {
        self.bar
            .set_length((config.n_iters * chains.len()) as u64);
    }

    fn chain_updated(&mut self, _chain_id: usize, _state: &State) {
        self.bar.inc(1);
    }

    fn finalize(&mut self) {
        self.bar.finish_and_clear();
    }
}
