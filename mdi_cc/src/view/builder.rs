use mdi_stats::defaults;
use mdi_stats::partition;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256Plus;

use crate::feature::{ColModel, Feature};
use crate::view::View;

/// Builds a `View` from features and a starting allocation.
///
/// Configuration validation belongs to the state builder; misuse here is a
/// programming error and panics.
#[derive(Clone, Debug)]
pub struct Builder {
    n_rows: usize,
    k: usize,
    ftrs: Vec<ColModel>,
    alpha: f64,
    fixed: Option<Vec<bool>>,
    asgn: Option<Vec<usize>>,
    seed: Option<u64>,
}

impl Builder {
    /// Start building a view with `n_rows` rows and `k` components
    pub fn new(n_rows: usize, k: usize) -> Self {
        Builder {
            n_rows,
            k,
            ftrs: Vec::new(),
            alpha: defaults::WEIGHTS_ALPHA,
            fixed: None,
            asgn: None,
            seed: None,
        }
    }

    /// Set the features
    #[must_use]
    pub fn features(mut self, ftrs: Vec<ColModel>) -> Self {
        self.ftrs = ftrs;
        self
    }

    /// Set the weight concentration
    #[must_use]
    pub fn alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    /// Mark items whose allocation never changes
    #[must_use]
    pub fn fixed_mask(mut self, fixed: Vec<bool>) -> Self {
        self.fixed = Some(fixed);
        self
    }

    /// Set the starting allocation
    #[must_use]
    pub fn with_asgn(mut self, asgn: Vec<usize>) -> Self {
        self.asgn = Some(asgn);
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

    /// Build the `View`. Draws component parameters from the prior, then
    /// conditions them on the starting allocation.
    pub fn build(self) -> View {
        assert!(self.k >= 1, "A view needs at least one component");
        assert!(!self.ftrs.is_empty(), "A view needs at least one feature");
        assert!(
            self.ftrs.iter().all(|ftr| ftr.len() == self.n_rows),
            "Feature row counts do not match the view"
        );

        let seed = self
            .seed
            .unwrap_or_else(|| rand::thread_rng().gen::<u64>());
        let mut rng = Xoshiro256Plus::seed_from_u64(seed);

        let asgn = {
            let mut part_builder =
                partition::Builder::new(self.n_rows, self.k)
                    .seed_from_rng(&mut rng);
            if let Some(asgn_vec) = self.asgn {
                part_builder = part_builder.with_asgn(asgn_vec);
            }
            part_builder.build().expect("invalid starting allocation")
        };

        let fixed = self.fixed.unwrap_or_else(|| vec![false; self.n_rows]);
        assert_eq!(
            fixed.len(),
            self.n_rows,
            "Fixed mask length does not match the view"
        );

        let weights = vec![1.0 / self.k as f64; self.k];

        let mut view = View {
            ftrs: self.ftrs,
            asgn,
            weights,
            fixed,
            alpha: self.alpha,
        };

        let k = self.k;
        view.ftrs
            .iter_mut()
            .for_each(|ftr| ftr.init_components(k, &mut rng));
        view.update_components(&mut rng);
        view.resample_weights(&mut rng);

        view
    }
}
