//! Conjugate prior constructors for MDI features
use crate::defaults;
use crate::rv::dist::{Gamma, NormalInvChiSquared, SymmetricDirichlet};
use mdi_utils::{mean, var};

/// A weakly-informative Normal-Inverse-Chi-Squared prior centered on the
/// column's empirical moments.
///
/// The prior carries one pseudo-observation for both the mean and the
/// variance, so the data dominate after the first sweep. Zero-variance
/// columns get a floored prior variance instead of a degenerate one.
pub fn nix_from_data(xs: &[f64]) -> NormalInvChiSquared {
    let m = mean(xs);
    let s2 = var(xs).max(defaults::MIN_PRIOR_VARIANCE);
    NormalInvChiSquared::new_unchecked(m, 1.0, 1.0, s2)
}

/// The symmetric Dirichlet prior for a categorical feature with `n_levels`
/// levels
pub fn csd(n_levels: usize) -> SymmetricDirichlet {
    SymmetricDirichlet::new(defaults::CATEGORICAL_PRIOR_ALPHA, n_levels)
        .unwrap()
}

/// The Gamma prior on a view-pair concordance parameter
pub fn phi_prior() -> Gamma {
    Gamma::new(defaults::PHI_PRIOR_SHAPE, defaults::PHI_PRIOR_RATE).unwrap()
}
