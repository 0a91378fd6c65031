//! Dense per-view observation data
use serde::{Deserialize, Serialize};

use crate::feature::FType;

/// The observations for one view, stored as feature columns. Every column
/// must have the same length (the number of items, shared across views).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub enum ViewData {
    /// Real-valued feature columns
    Continuous(Vec<Vec<f64>>),
    /// Categorical feature columns of level codes. The number of levels is
    /// taken to be one more than the largest observed code (at least two).
    Categorical(Vec<Vec<u8>>),
}

impl ViewData {
    pub fn ftype(&self) -> FType {
        match self {
            Self::Continuous(..) => FType::Continuous,
            Self::Categorical(..) => FType::Categorical,
        }
    }

    /// The number of feature columns
    pub fn n_cols(&self) -> usize {
        match self {
            Self::Continuous(cols) => cols.len(),
            Self::Categorical(cols) => cols.len(),
        }
    }

    /// The number of rows in the first column, or zero if there are no
    /// columns
    pub fn n_rows(&self) -> usize {
        match self {
            Self::Continuous(cols) => {
                cols.first().map_or(0, |col| col.len())
            }
            Self::Categorical(cols) => {
                cols.first().map_or(0, |col| col.len())
            }
        }
    }

    /// The length of the column at `col_ix`
    pub fn col_len(&self, col_ix: usize) -> usize {
        match self {
            Self::Continuous(cols) => cols[col_ix].len(),
            Self::Categorical(cols) => cols[col_ix].len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shape_accessors() {
        let data = ViewData::Continuous(vec![vec![0.1, 0.2], vec![0.3, 0.4]]);

        assert_eq!(data.ftype(), FType::Continuous);
        assert_eq!(data.n_cols(), 2);
        assert_eq!(data.n_rows(), 2);
    }

    #[test]
    fn empty_view_has_zero_rows() {
        let data = ViewData::Categorical(vec![]);
        assert_eq!(data.n_rows(), 0);
        assert_eq!(data.n_cols(), 0);
    }
}
