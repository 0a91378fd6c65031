//! Default constants for the MDI samplers

/// Symmetric Dirichlet concentration over a view's component weights. The
/// per-component pseudo-count is `WEIGHTS_ALPHA / k`.
pub const WEIGHTS_ALPHA: f64 = 1.0;

/// Symmetric Dirichlet prior concentration for categorical features
pub const CATEGORICAL_PRIOR_ALPHA: f64 = 0.5;

/// Lower bound on the prior variance derived from a data column
pub const MIN_PRIOR_VARIANCE: f64 = 1e-6;

/// Lower bound on a continuous component's standard deviation. Posterior
/// draws below this are floored rather than allowed to degenerate.
pub const SIGMA_FLOOR: f64 = 1e-4;

/// Shape of the Gamma prior on the view-pair concordance parameter phi
pub const PHI_PRIOR_SHAPE: f64 = 1.0;

/// Rate of the Gamma prior on the view-pair concordance parameter phi
pub const PHI_PRIOR_RATE: f64 = 0.2;

/// Standard deviation of the reflected random-walk proposal for phi
pub const PHI_PROPOSAL_STEP: f64 = 1.0;

/// Number of Metropolis steps per phi per sampler iteration
pub const PHI_MH_STEPS: usize = 1;

/// Acceptance rates outside this range trigger a convergence warning
pub const PHI_ACCEPTANCE_RANGE: (f64, f64) = (0.1, 0.9);
