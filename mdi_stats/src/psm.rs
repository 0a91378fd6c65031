//! Posterior similarity matrices and partition scoring against them
use itertools::iproduct;
use mdi_utils::{Matrix, Shape};

/// Build the posterior similarity matrix from retained allocation samples.
///
/// Entry (i, j) is the fraction of samples in which items i and j share a
/// component. The result is symmetric with a unit diagonal, and co-clustering
/// frequency is invariant to component relabeling across samples.
///
/// # Panics
/// Panics if `samples` is empty or the samples have unequal lengths.
pub fn psm(samples: &[Vec<usize>]) -> Matrix<f64> {
    assert!(!samples.is_empty(), "No allocation samples");
    let n = samples[0].len();
    assert!(
        samples.iter().all(|asgn| asgn.len() == n),
        "Allocation samples differ in length"
    );

    let s = samples.len() as f64;
    let mut values = vec![0.0; n * n];

    for asgn in samples {
        for (i, &zi) in asgn.iter().enumerate() {
            // strict upper triangle; diagonal is set at the end
            for j in (i + 1)..n {
                if zi == asgn[j] {
                    values[n * i + j] += 1.0;
                }
            }
        }
    }

    for (i, j) in iproduct!(0..n, 0..n) {
        if i < j {
            values[n * i + j] /= s;
            values[n * j + i] = values[n * i + j];
        } else if i == j {
            values[n * i + j] = 1.0;
        }
    }

    Matrix::from_raw_parts(values, n)
}

/// The posterior expected adjusted Rand index of a candidate partition
/// against a posterior similarity matrix (Fritsch & Ickstadt's PEAR).
///
/// Maximizing this over candidate partitions drawn from the samples gives a
/// label-invariant point estimate of the clustering.
pub fn expected_ari(asgn: &[usize], psm: &Matrix<f64>) -> f64 {
    let n = asgn.len();
    assert_eq!(psm.n_rows(), n, "Partition does not match PSM size");

    let t = (n * (n - 1)) as f64 / 2.0;
    let mut sum_ind = 0.0;
    let mut sum_psm = 0.0;
    let mut sum_both = 0.0;

    for i in 0..n {
        for j in (i + 1)..n {
            let p = psm[(i, j)];
            sum_psm += p;
            if asgn[i] == asgn[j] {
                sum_ind += 1.0;
                sum_both += p;
            }
        }
    }

    let expected = sum_ind * sum_psm / t;
    let denom = 0.5 * (sum_ind + sum_psm) - expected;

    if denom == 0.0 {
        1.0
    } else {
        (sum_both - expected) / denom
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::*;

    fn demo_samples() -> Vec<Vec<usize>> {
        vec![
            vec![0, 0, 1, 1],
            vec![0, 0, 1, 1],
            vec![1, 1, 0, 0],
            vec![0, 1, 1, 1],
        ]
    }

    #[test]
    fn psm_is_symmetric_with_unit_diagonal() {
        let mat = psm(&demo_samples());

        for i in 0..4 {
            assert_relative_eq!(mat[(i, i)], 1.0, epsilon = 1e-12);
            for j in 0..4 {
                assert_relative_eq!(
                    mat[(i, j)],
                    mat[(j, i)],
                    epsilon = 1e-12
                );
                assert!((0.0..=1.0).contains(&mat[(i, j)]));
            }
        }
    }

    #[test]
    fn psm_counts_co_clustering_fraction() {
        let mat = psm(&demo_samples());

        // items 0 and 1 share a component in 3 of 4 samples
        assert_relative_eq!(mat[(0, 1)], 0.75, epsilon = 1e-12);
        // items 0 and 2 never share a component
        assert_relative_eq!(mat[(0, 2)], 0.0, epsilon = 1e-12);
        // items 2 and 3 always share a component
        assert_relative_eq!(mat[(2, 3)], 1.0, epsilon = 1e-12);
    }

    #[test]
    fn expected_ari_of_consensus_partition_is_one() {
        let samples = vec![vec![0, 0, 1, 1]; 8];
        let mat = psm(&samples);

        assert_relative_eq!(
            expected_ari(&[0, 0, 1, 1], &mat),
            1.0,
            epsilon = 1e-12
        );
        assert_relative_eq!(
            expected_ari(&[1, 1, 0, 0], &mat),
            1.0,
            epsilon = 1e-12
        );
    }

    #[test]
    fn expected_ari_prefers_the_dominant_partition() {
        let mat = psm(&demo_samples());

        let good = expected_ari(&[0, 0, 1, 1], &mat);
        let bad = expected_ari(&[0, 1, 0, 1], &mat);

        assert!(good > bad);
    }
}
