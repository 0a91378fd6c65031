use enum_dispatch::enum_dispatch;
use mdi_stats::rv::data::DataOrSuffStat;
use mdi_stats::rv::dist::{
    Categorical, Gaussian, NormalInvChiSquared, SymmetricDirichlet,
};
use mdi_stats::rv::traits::{Rv, SuffStat};
use mdi_stats::Partition;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::component::ConjugateComponent;
use crate::feature::{Component, FType, Feature};
use crate::traits::{MdiDatum, MdiLikelihood, MdiPrior, MdiStat};

/// A partitioned column of data
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(bound(deserialize = "X: serde::de::DeserializeOwned, \
                             Fx: serde::de::DeserializeOwned, \
                             Fx::Stat: serde::de::DeserializeOwned, \
                             Pr: serde::de::DeserializeOwned"))]
pub struct Column<X, Fx, Pr>
where
    X: MdiDatum,
    Fx: MdiLikelihood<X>,
    Pr: MdiPrior<X, Fx>,
    Fx::Stat: MdiStat,
{
    pub id: usize,
    pub data: Vec<X>,
    pub components: Vec<ConjugateComponent<X, Fx>>,
    pub prior: Pr,
}

#[enum_dispatch]
#[derive(Serialize, Deserialize, Clone, Debug)]
pub enum ColModel {
    Continuous(Column<f64, Gaussian, NormalInvChiSquared>),
    Categorical(Column<u8, Categorical, SymmetricDirichlet>),
}

impl ColModel {
    pub fn ftype(&self) -> FType {
        match self {
            Self::Continuous(_) => FType::Continuous,
            Self::Categorical(_) => FType::Categorical,
        }
    }
}

impl<X, Fx, Pr> Column<X, Fx, Pr>
where
    X: MdiDatum,
    Fx: MdiLikelihood<X>,
    Pr: MdiPrior<X, Fx>,
    Fx::Stat: MdiStat,
{
    pub fn new(id: usize, data: Vec<X>, prior: Pr) -> Self {
        Column {
            id,
            data,
            components: Vec::new(),
            prior,
        }
    }

    pub fn components(&self) -> &Vec<ConjugateComponent<X, Fx>> {
        &self.components
    }
}

impl<X, Fx, Pr> Feature for Column<X, Fx, Pr>
where
    X: MdiDatum,
    Fx: MdiLikelihood<X>,
    Pr: MdiPrior<X, Fx>,
    Fx::Stat: MdiStat,
{
    #[inline]
    fn id(&self) -> usize {
        self.id
    }

    #[inline]
    fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    fn k(&self) -> usize {
        self.components.len()
    }

    #[inline]
    fn accum_score(&self, scores: &mut [f64], z: usize) {
        self.components[z].accum_score(scores, &self.data);
    }

    #[inline]
    fn init_components(&mut self, k: usize, mut rng: &mut impl Rng) {
        self.components = (0..k)
            .map(|_| {
                ConjugateComponent::new(
                    self.prior.draw(&mut rng),
                    self.prior.empty_suffstat(),
                )
            })
            .collect();
    }

    fn update_components(&mut self, asgn: &Partition, rng: &mut impl Rng) {
        let mut stats: Vec<Fx::Stat> =
            (0..asgn.k).map(|_| self.prior.empty_suffstat()).collect();

        self.data.iter().zip(asgn.iter()).for_each(|(x, &z)| {
            stats[z].observe(x);
        });

        self.components = stats
            .drain(..)
            .map(|stat| {
                let fx = if stat.n() == 0 {
                    // empty-component policy: resample from the prior alone
                    self.prior.draw(rng)
                } else {
                    let x = DataOrSuffStat::SuffStat(&stat);
                    self.prior.posterior(&x).draw(rng)
                };
                ConjugateComponent::new(
                    self.prior.floor_component(fx),
                    stat,
                )
            })
            .collect();
    }

    #[inline]
    fn ln_f_at(&self, row_ix: usize, z: usize) -> f64 {
        self.components[z].ln_f(&self.data[row_ix])
    }

    #[inline]
    fn score(&self, asgn: &Partition) -> f64 {
        self.data
            .iter()
            .zip(asgn.iter())
            .fold(0.0, |acc, (x, &z)| acc + self.components[z].ln_f(x))
    }

    #[inline]
    fn component(&self, z: usize) -> Component {
        self.components[z].fx.clone().into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mdi_stats::prior;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256Plus;

    fn gauss_column() -> Column<f64, Gaussian, NormalInvChiSquared> {
        let data = vec![-2.1, -1.9, -2.0, 2.0, 1.9, 2.1];
        let prior = prior::nix_from_data(&data);
        Column::new(0, data, prior)
    }

    #[test]
    fn init_components_draws_k_from_the_prior() {
        let mut rng = Xoshiro256Plus::seed_from_u64(1337);
        let mut col = gauss_column();

        col.init_components(4, &mut rng);

        assert_eq!(col.k(), 4);
        assert!(col.components.iter().all(|cpnt| cpnt.n() == 0));
    }

    #[test]
    fn update_components_tracks_the_allocation() {
        let mut rng = Xoshiro256Plus::seed_from_u64(1337);
        let mut col = gauss_column();
        col.init_components(3, &mut rng);

        let asgn =
            Partition::from_vec(vec![0, 0, 0, 1, 1, 1], 3).unwrap();
        col.update_components(&asgn, &mut rng);

        assert_eq!(col.components[0].n(), 3);
        assert_eq!(col.components[1].n(), 3);
        // the third component is empty but persists
        assert_eq!(col.components[2].n(), 0);
        assert_eq!(col.k(), 3);
    }

    #[test]
    fn posterior_draws_land_near_the_allocated_data() {
        let mut rng = Xoshiro256Plus::seed_from_u64(1337);
        let mut col = gauss_column();
        col.init_components(2, &mut rng);

        let asgn =
            Partition::from_vec(vec![0, 0, 0, 1, 1, 1], 2).unwrap();

        // posterior concentrates quickly with repeated conditioning
        let mus: Vec<f64> = (0..50)
            .map(|_| {
                col.update_components(&asgn, &mut rng);
                match col.component(0) {
                    Component::Continuous(gauss) => gauss.mu(),
                    _ => panic!("not a gaussian component"),
                }
            })
            .collect();
        let mean_mu = mdi_utils::mean(&mus);

        assert!((mean_mu + 2.0).abs() < 0.5);
    }

    #[test]
    fn score_is_finite_under_any_allocation() {
        let mut rng = Xoshiro256Plus::seed_from_u64(42);
        let mut col = gauss_column();
        col.init_components(3, &mut rng);

        let asgn =
            Partition::from_vec(vec![2, 0, 1, 1, 0, 2], 3).unwrap();
        col.update_components(&asgn, &mut rng);

        assert!(col.score(&asgn).is_finite());
    }

    #[test]
    fn categorical_column_components_have_data_levels() {
        let mut rng = Xoshiro256Plus::seed_from_u64(7);
        let data: Vec<u8> = vec![0, 1, 2, 2, 1, 0];
        let mut col: Column<u8, Categorical, SymmetricDirichlet> =
            Column::new(0, data, prior::csd(3));

        col.init_components(2, &mut rng);
        let asgn =
            Partition::from_vec(vec![0, 0, 0, 1, 1, 1], 2).unwrap();
        col.update_components(&asgn, &mut rng);

        match col.component(0) {
            Component::Categorical(cat) => {
                // all three observed levels have support
                for x in 0..3_u8 {
                    assert!(cat.ln_f(&x).is_finite());
                }
            }
            _ => panic!("not a categorical component"),
        }
    }
}
