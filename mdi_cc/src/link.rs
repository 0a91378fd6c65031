//! Pairwise view-concordance parameters and their Metropolis updates
use itertools::Itertools;
use mdi_stats::defaults;
use mdi_stats::mh::mh_symrw;
use mdi_stats::prior::phi_prior;
use mdi_stats::rv::dist::{Gamma, Gaussian};
use mdi_stats::rv::traits::Rv;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::constrain::RowConstrainer;
use crate::view::View;

/// The index of the unordered pair (m, l) in upper-triangle order
#[inline]
pub fn pair_ix(m: usize, l: usize, n_views: usize) -> usize {
    assert!(m != l, "A view is not paired with itself");
    let (a, b) = if m < l { (m, l) } else { (l, m) };
    assert!(b < n_views);
    a * (2 * n_views - a - 1) / 2 + (b - a - 1)
}

/// Concordance parameters linking every unordered pair of views.
///
/// Each pair carries a non-negative scalar phi. The factor
/// (1 + phi · 1\[c<sub>n</sub><sup>(m)</sup> = c<sub>n</sub><sup>(l)</sup>\])
/// multiplies the allocation conditional of every item, so phi = 0 makes the
/// pair's allocations independent.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ViewLinks {
    n_views: usize,
    phis: Vec<f64>,
    prior: Gamma,
    proposal_step: f64,
    mh_steps: usize,
    /// Accepted phi proposals, per pair
    pub n_accepted: Vec<usize>,
    /// Attempted phi proposals, per pair
    pub n_proposed: Vec<usize>,
}

impl ViewLinks {
    /// Create links for `n_views` views with phis drawn from the prior
    pub fn new<R: Rng>(n_views: usize, mut rng: &mut R) -> Self {
        let n_pairs = n_views * n_views.saturating_sub(1) / 2;
        let prior = phi_prior();
        let phis: Vec<f64> =
            (0..n_pairs).map(|_| prior.draw(&mut rng)).collect();

        ViewLinks {
            n_views,
            phis,
            prior,
            proposal_step: defaults::PHI_PROPOSAL_STEP,
            mh_steps: defaults::PHI_MH_STEPS,
            n_accepted: vec![0; n_pairs],
            n_proposed: vec![0; n_pairs],
        }
    }

    #[inline]
    pub fn n_views(&self) -> usize {
        self.n_views
    }

    #[inline]
    pub fn n_pairs(&self) -> usize {
        self.phis.len()
    }

    /// The concordance parameter for the pair (m, l)
    #[inline]
    pub fn phi(&self, m: usize, l: usize) -> f64 {
        self.phis[pair_ix(m, l, self.n_views)]
    }

    /// All phis in upper-triangle pair order
    #[inline]
    pub fn phis(&self) -> &[f64] {
        &self.phis
    }

    /// Overwrite the concordance parameter for the pair (m, l)
    pub fn set_phi(&mut self, m: usize, l: usize, phi: f64) {
        assert!(phi >= 0.0, "phi must be non-negative");
        self.phis[pair_ix(m, l, self.n_views)] = phi;
    }

    /// ln(1 + phi) for the pair (m, l): the additive log factor an item
    /// earns by agreeing across the pair
    #[inline]
    pub fn ln_factor(&self, m: usize, l: usize) -> f64 {
        (1.0 + self.phi(m, l)).ln()
    }

    /// Per-pair Metropolis acceptance rates. NaN for pairs that have not
    /// been updated yet.
    pub fn acceptance_rates(&self) -> Vec<f64> {
        self.n_accepted
            .iter()
            .zip(self.n_proposed.iter())
            .map(|(&acc, &prop)| {
                if prop == 0 {
                    f64::NAN
                } else {
                    acc as f64 / prop as f64
                }
            })
            .collect()
    }

    /// One Metropolis update of every phi conditional on the current
    /// allocations.
    ///
    /// The conditional for a pair decomposes as a product over items because
    /// items are independent given the allocations: each agreeing item
    /// contributes (1 + phi), and every item pays the per-item normalizer
    /// (1 + phi·kappa), where kappa is the chance-agreement mass under the
    /// current component weights.
    pub fn update<R: Rng>(&mut self, views: &[View], rng: &mut R) {
        assert_eq!(views.len(), self.n_views);

        for (m, l) in (0..self.n_views).tuple_combinations() {
            let ix = pair_ix(m, l, self.n_views);

            let n = views[m].n_rows() as f64;
            let n_agree = views[m]
                .asgn
                .iter()
                .zip(views[l].asgn.iter())
                .filter(|(zm, zl)| zm == zl)
                .count() as f64;

            let kappa: f64 = views[m]
                .weights
                .iter()
                .zip(views[l].weights.iter())
                .map(|(wm, wl)| wm * wl)
                .sum();

            let prior = self.prior.clone();
            let score_fn = |phi: &f64| {
                n_agree.mul_add(
                    (1.0 + phi).ln(),
                    -n * phi.mul_add(kappa, 1.0).ln(),
                ) + prior.ln_f(phi)
            };

            let step = self.proposal_step;
            let walk_fn = |phi: &f64, r: &mut R| {
                // reflection at zero keeps the walk symmetric
                let eps: f64 = Gaussian::new_unchecked(0.0, step).draw(r);
                (phi + eps).abs()
            };

            let res = mh_symrw(
                self.phis[ix],
                score_fn,
                walk_fn,
                self.mh_steps,
                rng,
            );

            self.phis[ix] = res.x;
            self.n_accepted[ix] += res.n_accepted;
            self.n_proposed[ix] += self.mh_steps;
        }
    }
}

/// The cross-view constraint for one view's Gibbs sweep.
///
/// Holds a snapshot of the other views' allocations, so the owning view can
/// be mutated while the constraint is alive.
#[derive(Clone, Debug)]
pub struct LinkConstrainer {
    factors: Vec<(f64, Vec<usize>)>,
}

impl LinkConstrainer {
    pub fn new(links: &ViewLinks, view_ix: usize, views: &[View]) -> Self {
        let factors = views
            .iter()
            .enumerate()
            .filter(|(l, _)| *l != view_ix)
            .map(|(l, view)| {
                (links.ln_factor(view_ix, l), view.asgn.asgn.clone())
            })
            .collect();

        LinkConstrainer { factors }
    }
}

impl RowConstrainer for LinkConstrainer {
    fn ln_constraint(&self, row_ix: usize, z: usize) -> f64 {
        self.factors
            .iter()
            .map(|(ln_factor, asgn)| {
                if asgn[row_ix] == z {
                    *ln_factor
                } else {
                    0.0
                }
            })
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::*;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256Plus;

    use crate::feature::{ColModel, Column};
    use mdi_stats::prior;

    #[test]
    fn pair_ix_enumerates_the_upper_triangle() {
        // three views: (0,1) (0,2) (1,2)
        assert_eq!(pair_ix(0, 1, 3), 0);
        assert_eq!(pair_ix(0, 2, 3), 1);
        assert_eq!(pair_ix(1, 2, 3), 2);
        // order of the pair does not matter
        assert_eq!(pair_ix(2, 1, 3), 2);
        // four views: six pairs
        assert_eq!(pair_ix(0, 1, 4), 0);
        assert_eq!(pair_ix(2, 3, 4), 5);
    }

    #[test]
    #[should_panic]
    fn pair_ix_rejects_self_pairs() {
        pair_ix(1, 1, 3);
    }

    #[test]
    fn ln_factor_matches_phi() {
        let mut rng = Xoshiro256Plus::seed_from_u64(1337);
        let mut links = ViewLinks::new(2, &mut rng);
        links.set_phi(0, 1, 3.0);

        assert_relative_eq!(
            links.ln_factor(0, 1),
            4.0_f64.ln(),
            epsilon = 1e-12
        );
    }

    fn gen_view<R: Rng>(labels: &[usize], k: usize, rng: &mut R) -> View {
        use crate::view::Builder;
        use mdi_stats::rv::dist::Gaussian;

        let n = labels.len();
        let gauss = Gaussian::new(0.0, 1.0).unwrap();
        let data: Vec<f64> = (0..n).map(|_| gauss.draw(rng)).collect();
        let col = Column::new(0, data.clone(), prior::nix_from_data(&data));

        Builder::new(n, k)
            .features(vec![ColModel::Continuous(col)])
            .with_asgn(labels.to_vec())
            .seed_from_rng(rng)
            .build()
    }

    #[test]
    fn phi_stays_non_negative() {
        let mut rng = Xoshiro256Plus::seed_from_u64(1337);
        let labels_a: Vec<usize> = (0..40).map(|i| i % 3).collect();
        let labels_b: Vec<usize> = (0..40).map(|i| (i + 1) % 3).collect();

        let views =
            vec![gen_view(&labels_a, 3, &mut rng), gen_view(&labels_b, 3, &mut rng)];
        let mut links = ViewLinks::new(2, &mut rng);

        for _ in 0..200 {
            links.update(&views, &mut rng);
            assert!(links.phi(0, 1) >= 0.0);
        }
        assert_eq!(links.n_proposed[0], 200 * defaults::PHI_MH_STEPS);
    }

    #[test]
    fn agreement_drives_phi_above_independence() {
        let mut rng = Xoshiro256Plus::seed_from_u64(1337);
        let labels: Vec<usize> = (0..60).map(|i| i % 3).collect();
        let shifted: Vec<usize> = (0..60).map(|i| (i / 20) % 3).collect();

        let agree_views =
            vec![gen_view(&labels, 3, &mut rng), gen_view(&labels, 3, &mut rng)];
        let indep_views =
            vec![gen_view(&labels, 3, &mut rng), gen_view(&shifted, 3, &mut rng)];

        let mut links_agree = ViewLinks::new(2, &mut rng);
        let mut links_indep = ViewLinks::new(2, &mut rng);

        let mut phi_agree = 0.0;
        let mut phi_indep = 0.0;
        let n_iters = 500;
        for _ in 0..n_iters {
            links_agree.update(&agree_views, &mut rng);
            links_indep.update(&indep_views, &mut rng);
            phi_agree += links_agree.phi(0, 1);
            phi_indep += links_indep.phi(0, 1);
        }
        phi_agree /= n_iters as f64;
        phi_indep /= n_iters as f64;

        assert!(phi_agree > phi_indep);
        assert!(phi_indep < 2.0);
    }

    #[test]
    fn constrainer_rewards_agreement_only() {
        let mut rng = Xoshiro256Plus::seed_from_u64(1337);
        let labels_a: Vec<usize> = vec![0, 1, 2, 0];
        let labels_b: Vec<usize> = vec![0, 2, 2, 1];

        let views =
            vec![gen_view(&labels_a, 3, &mut rng), gen_view(&labels_b, 3, &mut rng)];
        let mut links = ViewLinks::new(2, &mut rng);
        links.set_phi(0, 1, 1.5);

        let constrainer = LinkConstrainer::new(&links, 0, &views);

        // item 0 in view 1 sits in component 0
        assert_relative_eq!(
            constrainer.ln_constraint(0, 0),
            2.5_f64.ln(),
            epsilon = 1e-12
        );
        assert_relative_eq!(
            constrainer.ln_constraint(0, 1),
            0.0,
            epsilon = 1e-12
        );
    }
}
