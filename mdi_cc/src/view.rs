use mdi_stats::rv::dist::Dirichlet;
use mdi_stats::rv::traits::Rv;
use mdi_stats::Partition;
use mdi_utils::{Matrix, Shape};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::constrain::RowConstrainer;
use crate::error::ViewError;
use crate::feature::{ColModel, Component, Feature};
use crate::massflip;

mod builder;

pub use builder::Builder;

/// One view of the data: a finite mixture over the items
///
/// The mixture is overfitted on purpose: the number of components is fixed
/// at configuration time and components are allowed to sit empty, which
/// stands in for an unbounded model without any birth/death moves.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct View {
    /// The feature columns of this view
    pub ftrs: Vec<ColModel>,
    /// The allocation of items to components
    pub asgn: Partition,
    /// The weights of each component
    pub weights: Vec<f64>,
    /// Items marked `true` keep their allocation for the life of the chain
    pub fixed: Vec<bool>,
    /// Symmetric Dirichlet concentration over the component weights
    pub alpha: f64,
}

impl View {
    /// The number of items in the `View`
    #[inline]
    pub fn n_rows(&self) -> usize {
        self.asgn.len()
    }

    /// The number of feature columns in the `View`
    #[inline]
    pub fn n_cols(&self) -> usize {
        self.ftrs.len()
    }

    /// The number of mixture components. Fixed for the life of the view.
    #[inline]
    pub fn k(&self) -> usize {
        self.asgn.k
    }

    /// The number of components with at least one allocated item
    #[inline]
    pub fn n_occupied(&self) -> usize {
        self.asgn.n_occupied()
    }

    /// Resample the component weights from their Dirichlet conditional over
    /// the occupancy counts
    pub fn resample_weights(&mut self, mut rng: &mut impl Rng) {
        if self.k() == 1 {
            self.weights = vec![1.0];
            return;
        }

        let alpha_k = self.alpha / self.k() as f64;
        let dirvec: Vec<f64> = self
            .asgn
            .counts
            .iter()
            .map(|&ct| ct as f64 + alpha_k)
            .collect();

        let dir = Dirichlet::new(dirvec).unwrap();
        self.weights = dir.draw(&mut rng)
    }

    /// One Gibbs sweep over the unfixed items.
    ///
    /// Builds a k-by-n matrix of un-normalized log conditionals (ln weight
    /// plus the feature log likelihoods plus the cross-view constraint),
    /// then draws new labels for every row at once. Fixed items keep their
    /// labels. Afterwards the counts, sufficient statistics, and component
    /// parameters are refreshed.
    pub fn reassign(
        &mut self,
        constrainer: &impl RowConstrainer,
        mut rng: &mut impl Rng,
    ) -> Result<(), ViewError> {
        use rayon::prelude::*;

        self.resample_weights(&mut rng);

        let n_rows = self.n_rows();
        let ln_weights: Vec<f64> =
            self.weights.iter().map(|&w| w.ln()).collect();
        let mut logps = Matrix::vtile(ln_weights, n_rows);

        logps.par_rows_mut().enumerate().for_each(|(z, logp)| {
            self.ftrs.iter().for_each(|ftr| {
                ftr.accum_score(logp, z);
            });
            logp.iter_mut().enumerate().for_each(|(row_ix, p)| {
                *p += constrainer.ln_constraint(row_ix, z);
            });
        });

        if logps
            .raw_values()
            .iter()
            .any(|p| p.is_nan() || *p == f64::INFINITY)
        {
            return Err(ViewError::NonFiniteScore);
        }

        // Implicit transpose does not change the memory layout, just the
        // indexing.
        let logps = logps.implicit_transpose();
        debug_assert_eq!(logps.n_rows(), n_rows);

        let mut new_asgn = massflip::massflip(&logps, &mut rng);

        new_asgn
            .iter_mut()
            .zip(self.fixed.iter().zip(self.asgn.asgn.iter()))
            .for_each(|(z_new, (&is_fixed, &z_old))| {
                if is_fixed {
                    *z_new = z_old;
                }
            });

        self.asgn.set_asgn(new_asgn).expect("new asgn is invalid");

        self.update_components(&mut rng);
        debug_assert!(self.asgn.validate().is_valid());
        Ok(())
    }

    /// Redraw every component's parameters conditional on the current
    /// allocation
    #[inline]
    pub fn update_components(&mut self, mut rng: &mut impl Rng) {
        let asgn = &self.asgn;
        self.ftrs
            .iter_mut()
            .for_each(|ftr| ftr.update_components(asgn, &mut rng));
    }

    /// The log likelihood of the data in this view given the current
    /// allocation, weights, and component parameters
    pub fn score(&self) -> f64 {
        let ln_weights: f64 =
            self.asgn.iter().map(|&z| self.weights[z].ln()).sum();
        self.ftrs
            .iter()
            .fold(ln_weights, |acc, ftr| acc + ftr.score(&self.asgn))
    }

    /// The current parameters of component `z` of the feature at `col_ix`
    #[inline]
    pub fn component(&self, col_ix: usize, z: usize) -> Component {
        self.ftrs[col_ix].component(z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use mdi_stats::prior;
    use mdi_stats::rv::dist::Gaussian;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256Plus;

    use crate::feature::Column;

    fn gen_col<R: Rng>(id: usize, n: usize, mut rng: &mut R) -> ColModel {
        let gauss = Gaussian::new(0.0, 1.0).unwrap();
        let data_vec: Vec<f64> = (0..n).map(|_| gauss.draw(&mut rng)).collect();
        let prior = prior::nix_from_data(&data_vec);

        let ftr = Column::new(id, data_vec, prior);
        ColModel::Continuous(ftr)
    }

    fn gen_gauss_view<R: Rng>(n: usize, k: usize, mut rng: &mut R) -> View {
        let features: Vec<ColModel> = vec![
            gen_col(0, n, &mut rng),
            gen_col(1, n, &mut rng),
            gen_col(2, n, &mut rng),
            gen_col(3, n, &mut rng),
        ];

        Builder::new(n, k)
            .features(features)
            .seed_from_rng(&mut rng)
            .build()
    }

    #[test]
    fn seeding_view_works() {
        let view_1 = {
            let mut rng = Xoshiro256Plus::seed_from_u64(1338);
            gen_gauss_view(1000, 5, &mut rng)
        };

        let view_2 = {
            let mut rng = Xoshiro256Plus::seed_from_u64(1338);
            gen_gauss_view(1000, 5, &mut rng)
        };

        assert_eq!(view_1.asgn.asgn, view_2.asgn.asgn);
    }

    #[test]
    fn weights_sum_to_one_after_resample() {
        let mut rng = Xoshiro256Plus::seed_from_u64(1337);
        let mut view = gen_gauss_view(100, 6, &mut rng);

        for _ in 0..10 {
            view.resample_weights(&mut rng);
            assert_eq!(view.weights.len(), 6);
            let sum: f64 = view.weights.iter().sum();
            assert!((sum - 1.0).abs() < 1e-10);
            assert!(view.weights.iter().all(|&w| w >= 0.0));
        }
    }

    #[test]
    fn reassign_keeps_labels_in_bounds_and_k_fixed() {
        let mut rng = Xoshiro256Plus::seed_from_u64(1337);
        let mut view = gen_gauss_view(50, 4, &mut rng);

        for _ in 0..20 {
            view.reassign(&(), &mut rng).unwrap();
            assert_eq!(view.k(), 4);
            assert!(view.asgn.iter().all(|&z| z < 4));
            assert!(view.asgn.validate().is_valid());
        }
    }

    #[test]
    fn reassign_never_moves_fixed_items() {
        let mut rng = Xoshiro256Plus::seed_from_u64(1337);
        let n = 30;
        let ftrs = vec![gen_col(0, n, &mut rng)];

        let labels: Vec<usize> = (0..n).map(|i| i % 3).collect();
        let fixed: Vec<bool> = (0..n).map(|i| i < 10).collect();

        let mut view = Builder::new(n, 3)
            .features(ftrs)
            .with_asgn(labels.clone())
            .fixed_mask(fixed)
            .seed_from_rng(&mut rng)
            .build();

        for _ in 0..20 {
            view.reassign(&(), &mut rng).unwrap();
            for i in 0..10 {
                assert_eq!(view.asgn.asgn[i], labels[i]);
            }
        }
    }

    #[test]
    fn empty_components_persist() {
        let mut rng = Xoshiro256Plus::seed_from_u64(1337);
        // way more components than structure in the data
        let mut view = gen_gauss_view(10, 8, &mut rng);

        for _ in 0..10 {
            view.reassign(&(), &mut rng).unwrap();
            assert_eq!(view.k(), 8);
            assert!(view.ftrs.iter().all(|ftr| ftr.k() == 8));
        }
    }

    #[test]
    fn score_is_finite() {
        let mut rng = Xoshiro256Plus::seed_from_u64(1337);
        let mut view = gen_gauss_view(50, 4, &mut rng);

        for _ in 0..5 {
            view.reassign(&(), &mut rng).unwrap();
            assert!(view.score().is_finite());
        }
    }
}
