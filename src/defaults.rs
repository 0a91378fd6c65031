//! Default engine parameters

/// The default number of independent chains in an `Engine`
pub const DEFAULT_N_CHAINS: usize = 4;

/// The default fraction of iterations discarded as burn-in
pub const DEFAULT_BURN_IN: f64 = 0.2;

/// The default thinning interval: retain every n<sup>th</sup> post-burn-in
/// sample
pub const DEFAULT_SAVE_EVERY: usize = 1;
