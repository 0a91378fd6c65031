//! Defines the `Feature` trait for the columns of a view
use enum_dispatch::enum_dispatch;
use mdi_stats::rv::dist::{
    Categorical, Gaussian, NormalInvChiSquared, SymmetricDirichlet,
};
use mdi_stats::Partition;
use rand::Rng;

use super::Component;
use crate::feature::{ColModel, Column};

/// A partitioned column of data in one view
#[enum_dispatch(ColModel)]
pub trait Feature {
    /// The feature ID
    fn id(&self) -> usize;

    /// The number of rows
    fn len(&self) -> usize;
    /// Whether len is zero
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
    /// The number of components
    fn k(&self) -> usize;

    /// Score each datum under component `z` and add to the corresponding
    /// entries in `scores`
    fn accum_score(&self, scores: &mut [f64], z: usize);
    /// Draw `k` components from the prior
    fn init_components(&mut self, k: usize, rng: &mut impl Rng);
    /// Rebuild each component's sufficient statistic from the allocation and
    /// redraw its parameters from the conditional posterior,
    /// f(θ|x<sub>z</sub>). Components with no allocated items draw from the
    /// prior alone.
    fn update_components(&mut self, asgn: &Partition, rng: &mut impl Rng);
    /// The log likelihood of the datum at `row_ix` under the component at
    /// index `z`
    fn ln_f_at(&self, row_ix: usize, z: usize) -> f64;
    /// The log likelihood of the column under the current components and
    /// the allocation
    fn score(&self, asgn: &Partition) -> f64;
    /// The current parameters of the component at index `z`
    fn component(&self, z: usize) -> Component;
}
