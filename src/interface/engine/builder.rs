use mdi_cc::builders::{StateBuilder, ViewConfig};
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256Plus;

use super::error::NewEngineError;
use super::{Chain, Engine};
use crate::defaults;

/// Builds an `Engine` from per-view data and configuration
///
/// # Example
///
/// ```rust
/// use mdi::{Builder, ViewConfig, ViewData};
///
/// let col: Vec<f64> = (0..20).map(|i| f64::from(i % 2)).collect();
/// let engine = Builder::new()
///     .view(ViewConfig::new(ViewData::Continuous(vec![col]), 3))
///     .with_n_chains(2)
///     .with_seed(1337)
///     .build()
///     .unwrap();
///
/// assert_eq!(engine.n_chains(), 2);
/// ```
#[derive(Clone, Debug)]
pub struct Builder {
    views: Vec<ViewConfig>,
    n_chains: usize,
    seed: Option<u64>,
}

impl Default for Builder {
    fn default() -> Self {
        Self::new()
    }
}

impl Builder {
    pub fn new() -> Self {
        Builder {
            views: Vec::new(),
            n_chains: defaults::DEFAULT_N_CHAINS,
            seed: None,
        }
    }

    /// Add a view
    #[must_use]
    pub fn view(mut self, config: ViewConfig) -> Self {
        self.views.push(config);
        self
    }

    /// Add several views
    #[must_use]
    pub fn views(mut self, mut configs: Vec<ViewConfig>) -> Self {
        self.views.append(&mut configs);
        self
    }

    /// Set the number of independent chains
    #[must_use]
    pub fn with_n_chains(mut self, n_chains: usize) -> Self {
        self.n_chains = n_chains;
        self
    }

    /// Set the RNG seed
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the RNG seed from another RNG
    #[must_use]
    pub fn seed_from_rng<R: Rng>(mut self, rng: &mut R) -> Self {
        self.seed = Some(rng.next_u64());
        self
    }

    /// Build the engine. Every chain gets its own copy of the data and its
    /// own starting state.
    pub fn build(self) -> Result<Engine, NewEngineError> {
        if self.n_chains == 0 {
            return Err(NewEngineError::ZeroChainsRequested);
        }

        let seed = self
            .seed
            .unwrap_or_else(|| rand::thread_rng().gen::<u64>());
        let mut rng = Xoshiro256Plus::seed_from_u64(seed);

        let chains: Vec<Chain> = (0..self.n_chains)
            .map(|_| {
                StateBuilder::new()
                    .views(self.views.clone())
                    .seed_from_rng(&mut rng)
                    .build()
                    .map(Chain::new)
            })
            .collect::<Result<Vec<Chain>, _>>()?;

        Ok(Engine {
            chain_ids: (0..chains.len()).collect(),
            chains,
            rng,
        })
    }
}
