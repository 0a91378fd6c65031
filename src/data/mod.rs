//! Synthetic multi-view data with known ground-truth labels
use mdi_cc::data::ViewData;
use mdi_cc::feature::FType;
use mdi_stats::rv::dist::{Categorical, Gaussian};
use mdi_stats::rv::traits::Rv;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256Plus;
use serde::{Deserialize, Serialize};

/// The shape of one synthetic view
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ViewSpec {
    pub ftype: FType,
    pub n_features: usize,
    /// For continuous views: the spacing of adjacent cluster means in units
    /// of the (unit) component standard deviation. For categorical views:
    /// the probability mass on a cluster's preferred level, with the rest
    /// spread uniformly. Must be in (0, 1) for categorical views.
    pub separation: f64,
}

impl ViewSpec {
    pub fn continuous(n_features: usize, separation: f64) -> Self {
        ViewSpec {
            ftype: FType::Continuous,
            n_features,
            separation,
        }
    }

    pub fn categorical(n_features: usize, separation: f64) -> Self {
        assert!(
            (0.0..1.0).contains(&separation),
            "categorical separation is a probability"
        );
        ViewSpec {
            ftype: FType::Categorical,
            n_features,
            separation,
        }
    }
}

/// How the views' ground-truth labels relate to each other
#[derive(Clone, Copy, Debug, Serialize, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum LabelLinkage {
    /// Every view uses the same labels
    Shared,
    /// Each view gets an independent permutation of the label vector, so
    /// cluster sizes match but the structure is unrelated across views
    Independent,
}

/// Configuration for the synthetic data generator
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct DataGenConfig {
    pub n_rows: usize,
    pub n_clusters: usize,
    pub views: Vec<ViewSpec>,
    pub linkage: LabelLinkage,
    pub seed: Option<u64>,
}

/// A generated multi-view dataset with its ground truth
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SyntheticData {
    pub views: Vec<ViewData>,
    /// Ground-truth labels, one vector per view
    pub labels: Vec<Vec<usize>>,
}

/// Generate a synthetic multi-view dataset.
///
/// Cluster sizes are balanced up to rounding. All randomness flows from the
/// configured seed; two calls with the same config produce the same data.
pub fn generate(config: &DataGenConfig) -> SyntheticData {
    assert!(config.n_rows > 0, "n_rows must be positive");
    assert!(config.n_clusters > 0, "n_clusters must be positive");
    assert!(!config.views.is_empty(), "at least one view is required");

    let seed = config
        .seed
        .unwrap_or_else(|| rand::thread_rng().gen::<u64>());
    let mut rng = Xoshiro256Plus::seed_from_u64(seed);

    let base_labels: Vec<usize> = {
        let mut labels: Vec<usize> =
            (0..config.n_rows).map(|i| i % config.n_clusters).collect();
        labels.shuffle(&mut rng);
        labels
    };

    let labels: Vec<Vec<usize>> = config
        .views
        .iter()
        .map(|_| match config.linkage {
            LabelLinkage::Shared => base_labels.clone(),
            LabelLinkage::Independent => {
                let mut shuffled = base_labels.clone();
                shuffled.shuffle(&mut rng);
                shuffled
            }
        })
        .collect();

    let views: Vec<ViewData> = config
        .views
        .iter()
        .zip(labels.iter())
        .map(|(spec, view_labels)| {
            gen_view(spec, config.n_clusters, view_labels, &mut rng)
        })
        .collect();

    SyntheticData { views, labels }
}

/// A supervision mask fixing roughly `fraction` of the items, for
/// semi-supervised runs that pin a subset of the ground-truth labels
pub fn supervision_mask<R: Rng>(
    n_rows: usize,
    fraction: f64,
    rng: &mut R,
) -> Vec<bool> {
    assert!(
        (0.0..=1.0).contains(&fraction),
        "fraction must be in [0, 1]"
    );
    (0..n_rows).map(|_| rng.gen::<f64>() < fraction).collect()
}

fn gen_view<R: Rng>(
    spec: &ViewSpec,
    n_clusters: usize,
    labels: &[usize],
    mut rng: &mut R,
) -> ViewData {
    match spec.ftype {
        FType::Continuous => {
            let components: Vec<Gaussian> = (0..n_clusters)
                .map(|z| {
                    Gaussian::new_unchecked(z as f64 * spec.separation, 1.0)
                })
                .collect();

            let cols: Vec<Vec<f64>> = (0..spec.n_features)
                .map(|_| {
                    labels
                        .iter()
                        .map(|&z| components[z].draw(&mut rng))
                        .collect()
                })
                .collect();

            ViewData::Continuous(cols)
        }
        FType::Categorical => {
            let n_levels = n_clusters;
            let spread =
                (1.0 - spec.separation) / (n_levels as f64 - 1.0).max(1.0);
            let components: Vec<Categorical> = (0..n_clusters)
                .map(|z| {
                    let weights: Vec<f64> = (0..n_levels)
                        .map(|level| {
                            if level == z {
                                spec.separation
                            } else {
                                spread
                            }
                        })
                        .collect();
                    Categorical::new(&weights).unwrap()
                })
                .collect();

            let cols: Vec<Vec<u8>> = (0..spec.n_features)
                .map(|_| {
                    labels
                        .iter()
                        .map(|&z| components[z].draw(&mut rng))
                        .collect()
                })
                .collect();

            ViewData::Categorical(cols)
        }
    }
}
