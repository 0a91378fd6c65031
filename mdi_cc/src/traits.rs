use std::fmt::Debug;

use mdi_stats::defaults;
use mdi_stats::rv::data::{CategoricalSuffStat, GaussianSuffStat};
use mdi_stats::rv::dist::{
    Categorical, Gaussian, NormalInvChiSquared, SymmetricDirichlet,
};
use mdi_stats::rv::traits::{ConjugatePrior, HasSuffStat, Rv};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::feature::Component;

/// Score accumulation for the finite row-reassignment kernel.
///
/// Adds the log likelihood of each datum in a column to the corresponding
/// entry of an existing score slice.
pub trait AccumScore<X: Clone>: Rv<X> + Sync {
    fn accum_score(&self, scores: &mut [f64], xs: &[X]) {
        scores.iter_mut().zip(xs.iter()).for_each(|(score, x)| {
            *score += self.ln_f(x);
        });
    }
}

impl AccumScore<f64> for Gaussian {}
impl AccumScore<u8> for Categorical {}

/// An MDI-ready datum.
pub trait MdiDatum:
    Sync + Serialize + DeserializeOwned + Default + Clone + Debug
{
}

impl<X> MdiDatum for X where
    X: Sync + Serialize + DeserializeOwned + Default + Clone + Debug
{
}

/// An MDI-ready sufficient statistic.
pub trait MdiStat:
    Sync + Serialize + DeserializeOwned + Debug + Clone + PartialEq
{
}

impl<X> MdiStat for X where
    X: Sync + Serialize + DeserializeOwned + Debug + Clone + PartialEq
{
}

/// An MDI-ready likelihood function, f(x).
pub trait MdiLikelihood<X: MdiDatum>:
    Rv<X>
    + AccumScore<X>
    + HasSuffStat<X>
    + Serialize
    + DeserializeOwned
    + Sync
    + Into<Component>
    + Clone
    + Debug
    + PartialEq
{
}

impl<X, Fx> MdiLikelihood<X> for Fx
where
    X: MdiDatum,
    Fx: Rv<X>
        + AccumScore<X>
        + HasSuffStat<X>
        + Serialize
        + DeserializeOwned
        + Sync
        + Into<Component>
        + Clone
        + Debug
        + PartialEq,
    Fx::Stat: MdiStat,
{
}

/// An MDI-ready prior π(f)
pub trait MdiPrior<X: MdiDatum, Fx: MdiLikelihood<X>>:
    ConjugatePrior<X, Fx> + Serialize + DeserializeOwned + Sync + Clone + Debug
{
    /// Create an empty sufficient statistic for a component
    fn empty_suffstat(&self) -> Fx::Stat;
    /// Clamp a posterior draw away from a degenerate parameterization
    fn floor_component(&self, fx: Fx) -> Fx;
}

impl MdiPrior<f64, Gaussian> for NormalInvChiSquared {
    fn empty_suffstat(&self) -> GaussianSuffStat {
        GaussianSuffStat::new()
    }

    fn floor_component(&self, fx: Gaussian) -> Gaussian {
        if fx.sigma() < defaults::SIGMA_FLOOR {
            Gaussian::new_unchecked(fx.mu(), defaults::SIGMA_FLOOR)
        } else {
            fx
        }
    }
}

impl MdiPrior<u8, Categorical> for SymmetricDirichlet {
    fn empty_suffstat(&self) -> CategoricalSuffStat {
        CategoricalSuffStat::new(self.k())
    }

    fn floor_component(&self, fx: Categorical) -> Categorical {
        fx
    }
}
