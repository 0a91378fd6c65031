use rand::Rng;

/// Information from the last step of a Metropolis-Hastings (MH) update
pub struct MhResult<T> {
    /// The final value of the Markov chain
    pub x: T,
    /// The final score value of x. This function will depend on what type of
    /// sampler is being used.
    pub score_x: f64,
    /// The number of accepted proposals
    pub n_accepted: usize,
}

/// Symmetric random walk MCMC
///
/// # Arguments
/// - x_start: the starting value
/// - score_fn: the score function. For Bayesian inference: f(x|θ)π(θ)
/// - walk_fn: a symmetric transition function q(x -> x') = q(x' -> x). Should
///   enforce the domain bounds.
/// - n_iters: the number of MH steps
/// - rng: The random number generator
pub fn mh_symrw<T, F, Q, R>(
    x_start: T,
    score_fn: F,
    walk_fn: Q,
    n_iters: usize,
    rng: &mut R,
) -> MhResult<T>
where
    F: Fn(&T) -> f64,
    Q: Fn(&T, &mut R) -> T,
    R: Rng,
{
    let mut x = x_start;
    let mut fx = score_fn(&x);
    let mut n_accepted: usize = 0;

    for _ in 0..n_iters {
        let y = walk_fn(&x, rng);
        let fy = score_fn(&y);

        assert!(fy.is_finite(), "Non finite proposal likelihood");

        let r: f64 = rng.gen::<f64>();
        if r.ln() < fy - fx {
            x = y;
            fx = fy;
            n_accepted += 1;
        }
    }

    MhResult {
        x,
        score_x: fx,
        n_accepted,
    }
}
