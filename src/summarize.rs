//! Aggregates retained samples across chains into posterior summaries
use mdi_stats::psm::{expected_ari, psm};
use mdi_utils::Matrix;
use thiserror::Error;

use crate::interface::Engine;

/// The posterior summary of one view
#[derive(Clone, Debug)]
pub struct ViewSummary {
    /// Co-clustering frequency over the retained samples. Symmetric, unit
    /// diagonal, entries in [0, 1].
    pub psm: Matrix<f64>,
    /// The sampled partition maximizing the posterior expected adjusted
    /// Rand index against the PSM
    pub point_estimate: Vec<usize>,
}

/// Posterior summaries pooled over the surviving chains
#[derive(Clone, Debug)]
pub struct MdiSummary {
    /// One summary per view
    pub views: Vec<ViewSummary>,
    /// Pooled phi samples, one trace per view pair, for external
    /// diagnostics
    pub phis: Vec<Vec<f64>>,
    /// The number of chains excluded because they aborted on a numerical
    /// error
    pub n_failed_chains: usize,
    /// The number of retained samples pooled across surviving chains
    pub n_samples: usize,
}

#[derive(Clone, Debug, Error, PartialEq)]
pub enum SummarizeError {
    #[error("No retained samples in any surviving chain")]
    NoSamples,
}

/// Build per-view posterior similarity matrices and point estimates from
/// every surviving chain's retained samples.
///
/// Co-clustering frequencies are label-invariant, so the label-switching
/// inherent to mixture sampling does not disturb the summary. Failed chains
/// are skipped and surfaced through `n_failed_chains`.
pub fn summarize(engine: &Engine) -> Result<MdiSummary, SummarizeError> {
    let n_failed_chains = engine.n_failed_chains();

    let samples: Vec<&crate::StateSample> = engine
        .chains
        .iter()
        .filter(|chain| chain.failure.is_none())
        .flat_map(|chain| chain.samples.iter())
        .collect();

    if samples.is_empty() {
        return Err(SummarizeError::NoSamples);
    }

    let n_views = engine.n_views();
    let views: Vec<ViewSummary> = (0..n_views)
        .map(|view_ix| {
            let allocations: Vec<Vec<usize>> = samples
                .iter()
                .map(|sample| sample.allocations[view_ix].clone())
                .collect();

            let mat = psm(&allocations);

            let point_estimate = allocations
                .iter()
                .map(|asgn| (expected_ari(asgn, &mat), asgn))
                .max_by(|(score_a, _), (score_b, _)| {
                    score_a.partial_cmp(score_b).unwrap()
                })
                .map(|(_, asgn)| asgn.clone())
                .unwrap();

            ViewSummary {
                psm: mat,
                point_estimate,
            }
        })
        .collect();

    let n_pairs = samples[0].phis.len();
    let phis: Vec<Vec<f64>> = (0..n_pairs)
        .map(|pair_ix| {
            samples.iter().map(|sample| sample.phis[pair_ix]).collect()
        })
        .collect();

    Ok(MdiSummary {
        views,
        phis,
        n_failed_chains,
        n_samples: samples.len(),
    })
}
