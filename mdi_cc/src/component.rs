//! Conjugate component data structure
use mdi_stats::rv::data::DataOrSuffStat;
use mdi_stats::rv::traits::{Rv, SuffStat};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::traits::{AccumScore, MdiDatum, MdiLikelihood, MdiStat};

/// Maintains a component model and a sufficient statistic capturing the data
/// assigned to the component.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(bound(deserialize = "Fx: serde::de::DeserializeOwned, \
                             Fx::Stat: serde::de::DeserializeOwned"))]
pub struct ConjugateComponent<X, Fx>
where
    X: MdiDatum,
    Fx: MdiLikelihood<X>,
    Fx::Stat: MdiStat,
{
    pub fx: Fx,
    pub stat: Fx::Stat,
}

impl<X, Fx> ConjugateComponent<X, Fx>
where
    X: MdiDatum,
    Fx: MdiLikelihood<X>,
    Fx::Stat: MdiStat,
{
    /// Create a new ConjugateComponent from parameters and the statistic of
    /// the observations assigned to it
    #[inline]
    pub fn new(fx: Fx, stat: Fx::Stat) -> Self {
        ConjugateComponent { fx, stat }
    }

    /// Return the observations
    #[inline]
    pub fn obs(&self) -> DataOrSuffStat<'_, X, Fx> {
        DataOrSuffStat::SuffStat(&self.stat)
    }

    /// The number of observations in this component
    #[inline]
    pub fn n(&self) -> usize {
        self.stat.n()
    }

    #[inline]
    pub fn observe(&mut self, x: &X) {
        self.stat.observe(x);
    }

    #[inline]
    pub fn forget(&mut self, x: &X) {
        self.stat.forget(x);
    }

    #[inline]
    pub fn ln_f(&self, x: &X) -> f64 {
        self.fx.ln_f(x)
    }

    #[inline]
    pub fn draw<R: Rng>(&self, rng: &mut R) -> X {
        self.fx.draw(rng)
    }

    /// Score a whole data column under this component's parameters
    #[inline]
    pub fn accum_score(&self, scores: &mut [f64], xs: &[X]) {
        self.fx.accum_score(scores, xs)
    }
}
