//! Data structures for fixed-size partitions of items into mixture components
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Validates partitions if the `MDI_NOCHECK` is not set to `"1"`.
#[macro_export]
macro_rules! validate_partition {
    ($part:expr) => {{
        let validate_part: bool = match option_env!("MDI_NOCHECK") {
            Some(value) => value != "1",
            None => true,
        };
        if validate_part {
            $part.validate().is_valid()
        } else {
            true
        }
    }};
}

/// An allocation of `n` items to `k` mixture components.
///
/// Unlike a partition under a Dirichlet-process prior, `k` is fixed for the
/// life of the partition and components are allowed to sit empty. The
/// overfitted-mixture samplers rely on empty components persisting, so a
/// count of zero is a valid state here.
#[derive(Serialize, Deserialize, PartialEq, Eq, Debug, Clone)]
pub struct Partition {
    /// The allocation vector. `asgn[i]` is the component index of the
    /// i<sup>th</sup> item.
    pub asgn: Vec<usize>,
    /// The number of items allocated to each component. May contain zeros.
    pub counts: Vec<usize>,
    /// The number of components. Never changes.
    pub k: usize,
}

/// The possible ways a partition can go wrong with incorrect bookkeeping
#[derive(Serialize, Deserialize, Eq, PartialEq, Debug, Clone)]
pub struct PartitionDiagnostics {
    /// Every entry in `asgn` should be less than `k`
    labels_in_bounds: bool,
    /// `counts` should have an entry for every component
    counts_len_is_k: bool,
    /// The sum of `counts` should be the number of items
    sum_counts_cmp_n: bool,
    /// The component indices in the allocation vector match those in
    /// `counts`.
    asgn_agrees_with_counts: bool,
}

#[derive(Debug, Error, PartialEq)]
pub enum PartitionError {
    #[error("The partition must have at least one component")]
    ZeroComponents,
    #[error("One or more allocation entries is k or greater")]
    LabelOutOfBounds,
    #[error(
        "The length of the counts does not equal the number of components"
    )]
    CountsLengthIsNotK,
    #[error("The sum of counts does not equal the number of items")]
    SumCountsNotEqualToPartitionLength,
    #[error("The counts do not agree with the allocation vector")]
    PartitionAndCountsDisagree,
    #[error("Attempting to set a partition with a different-length allocation")]
    NewPartitionLengthMismatch,
}

impl PartitionDiagnostics {
    pub fn new(part: &Partition) -> Self {
        PartitionDiagnostics {
            labels_in_bounds: part.asgn.iter().all(|&z| z < part.k),
            counts_len_is_k: part.counts.len() == part.k,
            sum_counts_cmp_n: {
                let n: usize = part.counts.iter().sum();
                n == part.asgn.len()
            },
            asgn_agrees_with_counts: {
                let mut all = true;
                for (z, &count) in part.counts.iter().enumerate() {
                    let z_count =
                        part.asgn.iter().filter(|&&zi| zi == z).count();
                    all = all && (z_count == count)
                }
                all
            },
        }
    }

    /// `true` if none of diagnostics was violated
    pub fn is_valid(&self) -> bool {
        self.labels_in_bounds
            && self.counts_len_is_k
            && self.sum_counts_cmp_n
            && self.asgn_agrees_with_counts
    }

    fn labels_in_bounds(&self) -> Result<(), PartitionError> {
        if self.labels_in_bounds {
            Ok(())
        } else {
            Err(PartitionError::LabelOutOfBounds)
        }
    }

    fn counts_len_is_k(&self) -> Result<(), PartitionError> {
        if self.counts_len_is_k {
            Ok(())
        } else {
            Err(PartitionError::CountsLengthIsNotK)
        }
    }

    fn sum_counts_cmp_n(&self) -> Result<(), PartitionError> {
        if self.sum_counts_cmp_n {
            Ok(())
        } else {
            Err(PartitionError::SumCountsNotEqualToPartitionLength)
        }
    }

    fn asgn_agrees_with_counts(&self) -> Result<(), PartitionError> {
        if self.asgn_agrees_with_counts {
            Ok(())
        } else {
            Err(PartitionError::PartitionAndCountsDisagree)
        }
    }

    pub fn emit_error(&self) -> Result<(), PartitionError> {
        let mut results = vec![
            self.labels_in_bounds(),
            self.counts_len_is_k(),
            self.sum_counts_cmp_n(),
            self.asgn_agrees_with_counts(),
        ];
        results.drain(..).collect()
    }
}

impl Partition {
    /// Build a partition from an allocation vector. All entries must be less
    /// than `k`.
    pub fn from_vec(
        asgn: Vec<usize>,
        k: usize,
    ) -> Result<Self, PartitionError> {
        if k == 0 {
            return Err(PartitionError::ZeroComponents);
        }

        if asgn.iter().any(|&z| z >= k) {
            return Err(PartitionError::LabelOutOfBounds);
        }

        let mut counts: Vec<usize> = vec![0; k];
        for &z in &asgn {
            counts[z] += 1;
        }

        Ok(Partition { asgn, counts, k })
    }

    /// Replace the allocation vector
    pub fn set_asgn(
        &mut self,
        asgn: Vec<usize>,
    ) -> Result<(), PartitionError> {
        if asgn.len() != self.asgn.len() {
            return Err(PartitionError::NewPartitionLengthMismatch);
        }

        if asgn.iter().any(|&z| z >= self.k) {
            return Err(PartitionError::LabelOutOfBounds);
        }

        let mut counts: Vec<usize> = vec![0; self.k];
        for &z in &asgn {
            counts[z] += 1;
        }

        self.asgn = asgn;
        self.counts = counts;

        if validate_partition!(self) {
            Ok(())
        } else {
            self.validate().emit_error()
        }
    }

    /// Move the item at `ix` to component `z_new`, keeping counts current
    pub fn reassign(&mut self, ix: usize, z_new: usize) {
        assert!(z_new < self.k, "z_new ({}) >= k ({})", z_new, self.k);
        let z_old = self.asgn[ix];
        if z_old == z_new {
            return;
        }
        self.counts[z_old] -= 1;
        self.counts[z_new] += 1;
        self.asgn[ix] = z_new;
    }

    /// Create an iterator over the allocation vector
    pub fn iter(&self) -> impl Iterator<Item = &usize> {
        self.asgn.iter()
    }

    pub fn len(&self) -> usize {
        self.asgn.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The number of components with at least one item
    pub fn n_occupied(&self) -> usize {
        self.counts.iter().filter(|&&ct| ct > 0).count()
    }

    /// Empirical component weights, counts / n
    pub fn weights(&self) -> Vec<f64> {
        let n = self.len() as f64;
        self.counts.iter().map(|&ct| ct as f64 / n).collect()
    }

    /// Validates the partition
    pub fn validate(&self) -> PartitionDiagnostics {
        PartitionDiagnostics::new(self)
    }
}

/// Constructs `Partition`s of `n` items over `k` components
#[derive(Clone, Debug)]
pub struct Builder {
    n: usize,
    k: usize,
    asgn: Option<Vec<usize>>,
    seed: Option<u64>,
}

impl Builder {
    /// A partition of `n` items over `k` components, drawn uniformly unless
    /// `flat` or `with_asgn` say otherwise.
    pub fn new(n: usize, k: usize) -> Self {
        Builder {
            n,
            k,
            asgn: None,
            seed: None,
        }
    }

    /// Start from a caller-supplied allocation vector
    #[must_use]
    pub fn with_asgn(mut self, asgn: Vec<usize>) -> Self {
        self.asgn = Some(asgn);
        self
    }

    /// Put everything in component zero
    #[must_use]
    pub fn flat(mut self) -> Self {
        self.asgn = Some(vec![0; self.n]);
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

    pub fn build(self) -> Result<Partition, PartitionError> {
        if self.k == 0 {
            return Err(PartitionError::ZeroComponents);
        }

        let asgn = match self.asgn {
            Some(asgn) => {
                if asgn.len() != self.n {
                    return Err(PartitionError::NewPartitionLengthMismatch);
                }
                asgn
            }
            None => {
                use rand::SeedableRng;
                use rand_xoshiro::Xoshiro256Plus;
                let seed = self
                    .seed
                    .unwrap_or_else(|| rand::thread_rng().gen::<u64>());
                let mut rng = Xoshiro256Plus::seed_from_u64(seed);
                (0..self.n).map(|_| rng.gen_range(0..self.k)).collect()
            }
        };

        Partition::from_vec(asgn, self.k)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_vec_counts_and_k() {
        let part = Partition::from_vec(vec![0, 1, 2, 0, 1, 0], 4).unwrap();
        assert_eq!(part.k, 4);
        assert_eq!(part.counts, vec![3, 2, 1, 0]);
        assert_eq!(part.n_occupied(), 3);
    }

    #[test]
    fn from_vec_rejects_out_of_bounds_label() {
        let res = Partition::from_vec(vec![0, 1, 4], 3);
        assert_eq!(res.unwrap_err(), PartitionError::LabelOutOfBounds);
    }

    #[test]
    fn from_vec_rejects_zero_components() {
        let res = Partition::from_vec(vec![], 0);
        assert_eq!(res.unwrap_err(), PartitionError::ZeroComponents);
    }

    #[test]
    fn zero_counts_are_valid() {
        let part = Partition {
            asgn: vec![0, 0, 2, 2],
            counts: vec![2, 0, 2],
            k: 3,
        };
        assert!(part.validate().is_valid());
    }

    #[test]
    fn bad_counts_fail_validation() {
        let part = Partition {
            asgn: vec![1, 1, 0, 0],
            counts: vec![2, 3],
            k: 2,
        };

        let diagnostic = part.validate();

        assert!(!diagnostic.is_valid());
        assert!(diagnostic.labels_in_bounds);
        assert!(diagnostic.counts_len_is_k);
        assert!(!diagnostic.sum_counts_cmp_n);
        assert!(!diagnostic.asgn_agrees_with_counts);
    }

    #[test]
    fn out_of_bounds_label_fails_validation() {
        let part = Partition {
            asgn: vec![0, 3, 1, 1],
            counts: vec![1, 2, 0],
            k: 3,
        };

        let diagnostic = part.validate();

        assert!(!diagnostic.is_valid());
        assert!(!diagnostic.labels_in_bounds);
        assert!(diagnostic.counts_len_is_k);
        assert!(diagnostic.sum_counts_cmp_n);
    }

    #[test]
    fn short_counts_fails_validation() {
        let part = Partition {
            asgn: vec![1, 1, 0, 0],
            counts: vec![2, 2],
            k: 3,
        };

        let diagnostic = part.validate();

        assert!(!diagnostic.is_valid());
        assert!(!diagnostic.counts_len_is_k);
        assert!(diagnostic.labels_in_bounds);
    }

    #[test]
    fn reassign_moves_counts() {
        let mut part = Partition::from_vec(vec![0, 1, 1, 2], 3).unwrap();

        part.reassign(0, 2);

        assert_eq!(part.asgn, vec![2, 1, 1, 2]);
        assert_eq!(part.counts, vec![0, 2, 2]);
        assert!(part.validate().is_valid());
    }

    #[test]
    fn reassign_to_same_component_is_a_no_op() {
        let mut part = Partition::from_vec(vec![0, 1, 1, 2], 3).unwrap();
        part.reassign(1, 1);
        assert_eq!(part.counts, vec![1, 2, 1]);
    }

    #[test]
    fn set_asgn_recounts() {
        let mut part = Partition::from_vec(vec![0, 1, 1, 2], 3).unwrap();

        part.set_asgn(vec![2, 2, 2, 2]).unwrap();

        assert_eq!(part.counts, vec![0, 0, 4]);
        assert!(part.validate().is_valid());
    }

    #[test]
    fn set_asgn_rejects_length_mismatch() {
        let mut part = Partition::from_vec(vec![0, 1, 1, 2], 3).unwrap();
        let res = part.set_asgn(vec![0, 1]);
        assert_eq!(
            res.unwrap_err(),
            PartitionError::NewPartitionLengthMismatch
        );
    }

    #[test]
    fn weights_sum_to_one() {
        let part = Partition::from_vec(vec![0, 1, 2, 0, 1, 0], 4).unwrap();
        let weights = part.weights();

        assert_eq!(weights.len(), 4);
        assert!((weights.iter().sum::<f64>() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn built_partition_is_valid() {
        for _ in 0..100 {
            let part = Builder::new(50, 6).build().unwrap();
            assert_eq!(part.len(), 50);
            assert!(part.validate().is_valid());
        }
    }

    #[test]
    fn flat_partition() {
        let part = Builder::new(50, 4).flat().build().unwrap();

        assert_eq!(part.k, 4);
        assert_eq!(part.counts, vec![50, 0, 0, 0]);
        assert!(part.asgn.iter().all(|&z| z == 0));
        assert!(part.validate().is_valid());
    }

    #[test]
    fn manual_seed_control_works() {
        let part_1 = Builder::new(25, 5).with_seed(17_834_795).build();
        let part_2 = Builder::new(25, 5).with_seed(17_834_795).build();
        assert_eq!(part_1, part_2);
    }
}
