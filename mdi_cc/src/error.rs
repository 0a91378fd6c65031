use thiserror::Error;

/// Fatal configuration problems. All of these are raised at state
/// construction, before any sampler iteration runs.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("No views supplied")]
    NoViews,
    #[error("Views have no rows")]
    NoRows,
    #[error("View {view_ix} has no features")]
    NoFeatures { view_ix: usize },
    #[error(
        "View {view_ix} has {n_rows} rows but view 0 has {expected} rows"
    )]
    RowCountMismatch {
        view_ix: usize,
        n_rows: usize,
        expected: usize,
    },
    #[error(
        "View {view_ix}: feature {col_ix} has {n_rows} rows but the view \
         has {expected} rows"
    )]
    FeatureRowMismatch {
        view_ix: usize,
        col_ix: usize,
        n_rows: usize,
        expected: usize,
    },
    #[error("View {view_ix}: the number of components must be at least 1")]
    ZeroComponents { view_ix: usize },
    #[error(
        "View {view_ix}: fixed mask has {mask_len} entries but the view has \
         {n_rows} rows"
    )]
    MaskLengthMismatch {
        view_ix: usize,
        mask_len: usize,
        n_rows: usize,
    },
    #[error(
        "View {view_ix}: initial labels have {labels_len} entries but the \
         view has {n_rows} rows"
    )]
    LabelsLengthMismatch {
        view_ix: usize,
        labels_len: usize,
        n_rows: usize,
    },
    #[error("View {view_ix}: fixed entries require initial labels")]
    FixedEntriesRequireLabels { view_ix: usize },
    #[error(
        "View {view_ix}: {n_classes} distinct fixed labels exceed {k} \
         components"
    )]
    TooManyFixedClasses {
        view_ix: usize,
        n_classes: usize,
        k: usize,
    },
    #[error(
        "View {view_ix}: initial label {label} is out of bounds for {k} \
         components"
    )]
    LabelOutOfBounds {
        view_ix: usize,
        label: usize,
        k: usize,
    },
}

/// Numerical failure inside a view sweep
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ViewError {
    #[error("Non-finite allocation score")]
    NonFiniteScore,
}

/// Numerical failure that aborts the owning chain. Other chains are
/// unaffected; there are no retries.
#[derive(Clone, Debug, Error, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum StateError {
    #[error("Non-finite allocation score in view {view_ix}")]
    NonFiniteScore { view_ix: usize },
    #[error("Non-finite joint log likelihood")]
    NonFiniteLoglike,
}
