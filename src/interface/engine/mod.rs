mod builder;
pub mod error;
pub mod update_handler;

pub use builder::Builder;

use std::path::Path;
use std::time::{Duration, Instant};

use mdi_cc::error::StateError;
use mdi_cc::state::State;
use mdi_stats::defaults::PHI_ACCEPTANCE_RANGE;
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256Plus;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::EngineUpdateConfig;
use crate::metadata::{self, SerializedType};
use update_handler::UpdateHandler;

/// Where a chain sits in its run
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Eq, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum ChainPhase {
    /// Built but not yet stepped
    Initializing,
    /// Iterating, samples discarded
    BurnIn,
    /// Iterating, samples retained on thinning boundaries
    Collecting,
    /// Finished the configured number of iterations
    Done,
    /// Aborted by a numerical error; excluded from summaries
    Failed,
}

/// One retained posterior sample
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct StateSample {
    /// Allocation vector of every view
    pub allocations: Vec<Vec<usize>>,
    /// Concordance parameters in view-pair order
    pub phis: Vec<f64>,
}

/// An independent MCMC chain: a state plus its retained samples
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Chain {
    pub state: State,
    pub samples: Vec<StateSample>,
    /// Total wall-clock time spent iterating this chain
    pub duration: Duration,
    pub phase: ChainPhase,
    /// The numerical error that aborted this chain, if any
    pub failure: Option<StateError>,
}

impl Chain {
    pub fn new(state: State) -> Self {
        Chain {
            state,
            samples: Vec::new(),
            duration: Duration::default(),
            phase: ChainPhase::Initializing,
            failure: None,
        }
    }
}

/// A non-fatal warning about sampler health
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub enum ConvergenceWarning {
    /// A pair's Metropolis acceptance rate is outside the healthy range
    PhiAcceptanceOutOfRange {
        chain_id: usize,
        pair_ix: usize,
        rate: f64,
    },
}

impl std::fmt::Display for ConvergenceWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::PhiAcceptanceOutOfRange {
                chain_id,
                pair_ix,
                rate,
            } => write!(
                f,
                "chain {}: phi acceptance rate {:.3} for pair {} is \
                 outside the healthy range",
                chain_id, rate, pair_ix
            ),
        }
    }
}

/// The engine runs chains in parallel
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Engine {
    /// Vector of independent chains
    pub chains: Vec<Chain>,
    pub chain_ids: Vec<usize>,
    pub rng: Xoshiro256Plus,
}

impl Engine {
    /// The number of chains
    #[inline]
    pub fn n_chains(&self) -> usize {
        self.chains.len()
    }

    /// The number of views
    #[inline]
    pub fn n_views(&self) -> usize {
        self.chains
            .first()
            .map_or(0, |chain| chain.state.n_views())
    }

    /// The number of items, shared by every view
    #[inline]
    pub fn n_rows(&self) -> usize {
        self.chains.first().map_or(0, |chain| chain.state.n_rows())
    }

    /// The number of chains aborted by numerical errors
    pub fn n_failed_chains(&self) -> usize {
        self.chains
            .iter()
            .filter(|chain| chain.failure.is_some())
            .count()
    }

    /// Run each chain for `n_iters` iterations using the default
    /// transitions, burn-in, and thinning.
    pub fn run(&mut self, n_iters: usize) {
        let config = EngineUpdateConfig::new()
            .default_transitions()
            .n_iters(n_iters);

        self.update(config, ());
    }

    /// Run each chain according to the config.
    ///
    /// Chains are independent units of work and run as parallel tasks; a
    /// chain that hits a numerical error records the failure and stops,
    /// leaving the other chains unaffected.
    pub fn update<U>(&mut self, config: EngineUpdateConfig, update_handler: U)
    where
        U: UpdateHandler,
    {
        assert!(!config.transitions.is_empty());

        let mut update_handler = update_handler;
        update_handler.global_init(&config, &self.chains);

        let mut trngs: Vec<Xoshiro256Plus> = (0..self.n_chains())
            .map(|_| Xoshiro256Plus::from_rng(&mut self.rng).unwrap())
            .collect();

        let mut update_handlers: Vec<U> = (0..self.n_chains())
            .map(|_| update_handler.clone())
            .collect();

        let n_burn_in = config.n_burn_in();

        // rayon has a hard time doing self.chains.par_iter().zip(..), so we
        // drain the chains and rebuild the vector
        self.chains = self
            .chains
            .par_drain(..)
            .zip(trngs.par_iter_mut())
            .zip(update_handlers.par_iter_mut())
            .zip(self.chain_ids.par_iter())
            .map(|(((chain, trng), handler), &chain_id)| {
                update_chain(
                    chain, chain_id, &config, n_burn_in, trng, handler,
                )
            })
            .collect();

        update_handler.finalize();
    }

    /// Scan the recorded diagnostics for signs of poor mixing. Warnings are
    /// reported, never fatal.
    pub fn convergence_warnings(&self) -> Vec<ConvergenceWarning> {
        let (lo, hi) = PHI_ACCEPTANCE_RANGE;
        self.chains
            .iter()
            .zip(self.chain_ids.iter())
            .filter(|(chain, _)| chain.failure.is_none())
            .flat_map(|(chain, &chain_id)| {
                chain
                    .state
                    .links
                    .acceptance_rates()
                    .into_iter()
                    .enumerate()
                    .filter(move |(_, rate)| {
                        rate.is_finite() && (*rate < lo || *rate > hi)
                    })
                    .map(move |(pair_ix, rate)| {
                        ConvergenceWarning::PhiAcceptanceOutOfRange {
                            chain_id,
                            pair_ix,
                            rate,
                        }
                    })
            })
            .collect()
    }

    /// Save the engine to a metadata file
    pub fn save<P: AsRef<Path>>(
        &self,
        path: P,
        ser_type: SerializedType,
    ) -> Result<(), metadata::Error> {
        metadata::save_engine(self, path, ser_type)
    }

    /// Load an engine from a metadata file
    pub fn load<P: AsRef<Path>>(
        path: P,
        ser_type: SerializedType,
    ) -> Result<Self, metadata::Error> {
        metadata::load_engine(path, ser_type)
    }
}

fn update_chain<U: UpdateHandler>(
    mut chain: Chain,
    chain_id: usize,
    config: &EngineUpdateConfig,
    n_burn_in: usize,
    trng: &mut Xoshiro256Plus,
    handler: &mut U,
) -> Chain {
    // a chain that failed in an earlier update stays failed
    if chain.failure.is_some() {
        return chain;
    }

    let start = Instant::now();
    chain.phase = if n_burn_in > 0 {
        ChainPhase::BurnIn
    } else {
        ChainPhase::Collecting
    };

    for iter in 0..config.n_iters {
        if let Err(err) = chain.state.step(&config.transitions, trng) {
            chain.failure = Some(err);
            chain.phase = ChainPhase::Failed;
            handler.chain_failed(chain_id, &chain);
            break;
        }
        chain.state.push_diagnostics();

        if iter >= n_burn_in {
            chain.phase = ChainPhase::Collecting;
            if (iter - n_burn_in) % config.save_every == 0 {
                chain.samples.push(StateSample {
                    allocations: chain.state.allocations(),
                    phis: chain.state.phis(),
                });
            }
        }

        handler.chain_updated(chain_id, &chain.state);
        if handler.stop_engine() {
            break;
        }
    }

    if chain.failure.is_none() {
        chain.phase = ChainPhase::Done;
        handler.chain_complete(chain_id, &chain);
    }
    chain.duration += start.elapsed();
    chain
}
