//! Builds sampler states from raw view data, with all configuration
//! validation up front
use std::collections::HashSet;

use mdi_stats::{defaults, prior};
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256Plus;

use crate::data::ViewData;
use crate::error::ConfigError;
use crate::feature::{ColModel, Column};
use crate::link::ViewLinks;
use crate::state::State;
use crate::view;
use crate::view::View;

/// Configuration of one view of a state
#[derive(Clone, Debug)]
pub struct ViewConfig {
    pub data: ViewData,
    /// The fixed number of mixture components
    pub k: usize,
    /// Symmetric Dirichlet concentration over the component weights
    pub alpha: f64,
    /// Items marked `true` keep their initial label for the whole chain
    pub fixed: Option<Vec<bool>>,
    /// Initial labels. Required when any item is fixed.
    pub labels: Option<Vec<usize>>,
}

impl ViewConfig {
    pub fn new(data: ViewData, k: usize) -> Self {
        ViewConfig {
            data,
            k,
            alpha: defaults::WEIGHTS_ALPHA,
            fixed: None,
            labels: None,
        }
    }

    #[must_use]
    pub fn alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    #[must_use]
    pub fn fixed_mask(mut self, fixed: Vec<bool>) -> Self {
        self.fixed = Some(fixed);
        self
    }

    #[must_use]
    pub fn labels(mut self, labels: Vec<usize>) -> Self {
        self.labels = Some(labels);
        self
    }
}

/// Builds a `State` from per-view data and configuration.
///
/// All configuration errors surface here, before any sampler iteration.
#[derive(Clone, Debug)]
pub struct StateBuilder {
    views: Vec<ViewConfig>,
    seed: Option<u64>,
}

impl Default for StateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl StateBuilder {
    pub fn new() -> Self {
        StateBuilder {
            views: Vec::new(),
            seed: None,
        }
    }

    /// Add a view
    #[must_use]
    pub fn view(mut self, config: ViewConfig) -> Self {
        self.views.push(config);
        self
    }

    /// Add several views
    #[must_use]
    pub fn views(mut self, mut configs: Vec<ViewConfig>) -> Self {
        self.views.append(&mut configs);
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

    pub fn build(self) -> Result<State, ConfigError> {
        if self.views.is_empty() {
            return Err(ConfigError::NoViews);
        }

        let n_rows = self.views[0].data.n_rows();
        if n_rows == 0 {
            return Err(ConfigError::NoRows);
        }

        for (view_ix, config) in self.views.iter().enumerate() {
            validate_view_config(view_ix, n_rows, config)?;
        }

        let seed = self
            .seed
            .unwrap_or_else(|| rand::thread_rng().gen::<u64>());
        let mut rng = Xoshiro256Plus::seed_from_u64(seed);

        let n_views = self.views.len();
        let views: Vec<View> = self
            .views
            .into_iter()
            .map(|config| build_view(n_rows, config, &mut rng))
            .collect();

        let links = ViewLinks::new(n_views, &mut rng);

        Ok(State::new(views, links))
    }
}

fn validate_view_config(
    view_ix: usize,
    n_rows: usize,
    config: &ViewConfig,
) -> Result<(), ConfigError> {
    let data_rows = config.data.n_rows();
    if data_rows != n_rows {
        return Err(ConfigError::RowCountMismatch {
            view_ix,
            n_rows: data_rows,
            expected: n_rows,
        });
    }

    if config.data.n_cols() == 0 {
        return Err(ConfigError::NoFeatures { view_ix });
    }

    for col_ix in 0..config.data.n_cols() {
        let col_rows = config.data.col_len(col_ix);
        if col_rows != n_rows {
            return Err(ConfigError::FeatureRowMismatch {
                view_ix,
                col_ix,
                n_rows: col_rows,
                expected: n_rows,
            });
        }
    }

    if config.k == 0 {
        return Err(ConfigError::ZeroComponents { view_ix });
    }

    if let Some(fixed) = &config.fixed {
        if fixed.len() != n_rows {
            return Err(ConfigError::MaskLengthMismatch {
                view_ix,
                mask_len: fixed.len(),
                n_rows,
            });
        }

        let any_fixed = fixed.iter().any(|&is_fixed| is_fixed);
        if any_fixed && config.labels.is_none() {
            return Err(ConfigError::FixedEntriesRequireLabels { view_ix });
        }
    }

    if let Some(labels) = &config.labels {
        if labels.len() != n_rows {
            return Err(ConfigError::LabelsLengthMismatch {
                view_ix,
                labels_len: labels.len(),
                n_rows,
            });
        }

        // the fixed classes must fit inside k before the bounds check so
        // that an undersized k is reported as such
        if let Some(fixed) = &config.fixed {
            let classes: HashSet<usize> = labels
                .iter()
                .zip(fixed.iter())
                .filter(|(_, &is_fixed)| is_fixed)
                .map(|(&label, _)| label)
                .collect();
            if classes.len() > config.k {
                return Err(ConfigError::TooManyFixedClasses {
                    view_ix,
                    n_classes: classes.len(),
                    k: config.k,
                });
            }
        }

        if let Some(&label) =
            labels.iter().find(|&&label| label >= config.k)
        {
            return Err(ConfigError::LabelOutOfBounds {
                view_ix,
                label,
                k: config.k,
            });
        }
    }

    Ok(())
}

fn build_view<R: Rng>(
    n_rows: usize,
    config: ViewConfig,
    mut rng: &mut R,
) -> View {
    let ftrs: Vec<ColModel> = match config.data {
        ViewData::Continuous(cols) => cols
            .into_iter()
            .enumerate()
            .map(|(id, col)| {
                let nix = prior::nix_from_data(&col);
                ColModel::Continuous(Column::new(id, col, nix))
            })
            .collect(),
        ViewData::Categorical(cols) => cols
            .into_iter()
            .enumerate()
            .map(|(id, col)| {
                let n_levels = col
                    .iter()
                    .max()
                    .map_or(2, |&max| usize::from(max) + 1)
                    .max(2);
                let csd = prior::csd(n_levels);
                ColModel::Categorical(Column::new(id, col, csd))
            })
            .collect(),
    };

    let mut builder = view::Builder::new(n_rows, config.k)
        .features(ftrs)
        .alpha(config.alpha)
        .seed_from_rng(&mut rng);

    if let Some(labels) = config.labels {
        builder = builder.with_asgn(labels);
    }
    if let Some(fixed) = config.fixed {
        builder = builder.fixed_mask(fixed);
    }

    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gauss_data(n: usize) -> ViewData {
        ViewData::Continuous(vec![(0..n).map(|i| i as f64).collect()])
    }

    #[test]
    fn no_views_is_a_config_error() {
        let res = StateBuilder::new().build();
        assert_eq!(res.unwrap_err(), ConfigError::NoViews);
    }

    #[test]
    fn row_count_mismatch_is_a_config_error() {
        let res = StateBuilder::new()
            .view(ViewConfig::new(gauss_data(10), 3))
            .view(ViewConfig::new(gauss_data(11), 3))
            .build();

        assert_eq!(
            res.unwrap_err(),
            ConfigError::RowCountMismatch {
                view_ix: 1,
                n_rows: 11,
                expected: 10
            }
        );
    }

    #[test]
    fn ragged_features_are_a_config_error() {
        let data = ViewData::Continuous(vec![
            vec![0.0, 1.0, 2.0],
            vec![0.0, 1.0],
        ]);
        let res = StateBuilder::new()
            .view(ViewConfig::new(data, 2))
            .build();

        assert!(matches!(
            res.unwrap_err(),
            ConfigError::FeatureRowMismatch { view_ix: 0, col_ix: 1, .. }
        ));
    }

    #[test]
    fn zero_components_is_a_config_error() {
        let res = StateBuilder::new()
            .view(ViewConfig::new(gauss_data(10), 0))
            .build();

        assert_eq!(
            res.unwrap_err(),
            ConfigError::ZeroComponents { view_ix: 0 }
        );
    }

    #[test]
    fn fixed_without_labels_is_a_config_error() {
        let res = StateBuilder::new()
            .view(
                ViewConfig::new(gauss_data(4), 2)
                    .fixed_mask(vec![true, false, false, false]),
            )
            .build();

        assert_eq!(
            res.unwrap_err(),
            ConfigError::FixedEntriesRequireLabels { view_ix: 0 }
        );
    }

    #[test]
    fn more_fixed_classes_than_components_is_a_config_error() {
        let res = StateBuilder::new()
            .view(
                ViewConfig::new(gauss_data(4), 2)
                    .fixed_mask(vec![true, true, true, false])
                    .labels(vec![0, 1, 2, 0]),
            )
            .build();

        assert_eq!(
            res.unwrap_err(),
            ConfigError::TooManyFixedClasses {
                view_ix: 0,
                n_classes: 3,
                k: 2
            }
        );
    }

    #[test]
    fn out_of_bounds_label_is_a_config_error() {
        let res = StateBuilder::new()
            .view(ViewConfig::new(gauss_data(4), 2).labels(vec![0, 1, 2, 0]))
            .build();

        assert_eq!(
            res.unwrap_err(),
            ConfigError::LabelOutOfBounds {
                view_ix: 0,
                label: 2,
                k: 2
            }
        );
    }

    #[test]
    fn builds_a_state_with_the_requested_shape() {
        let col_b: Vec<u8> = vec![0, 1, 1, 0, 1, 0, 0, 1, 1, 0];
        let state = StateBuilder::new()
            .view(ViewConfig::new(gauss_data(10), 3))
            .view(ViewConfig::new(ViewData::Categorical(vec![col_b]), 5))
            .with_seed(1337)
            .build()
            .unwrap();

        assert_eq!(state.n_views(), 2);
        assert_eq!(state.n_rows(), 10);
        assert_eq!(state.views[0].k(), 3);
        assert_eq!(state.views[1].k(), 5);
        assert_eq!(state.links.n_pairs(), 1);
        assert!(state.loglike.is_finite());

        use crate::feature::Feature;
        for view in &state.views {
            for (col_ix, ftr) in view.ftrs.iter().enumerate() {
                assert_eq!(ftr.id(), col_ix);
            }
        }
    }

    #[test]
    fn seeded_builds_are_identical() {
        let state_1 = StateBuilder::new()
            .view(ViewConfig::new(gauss_data(20), 4))
            .with_seed(451)
            .build()
            .unwrap();
        let state_2 = StateBuilder::new()
            .view(ViewConfig::new(gauss_data(20), 4))
            .with_seed(451)
            .build()
            .unwrap();

        assert_eq!(state_1.allocations(), state_2.allocations());
    }
}
