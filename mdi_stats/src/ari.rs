//! Chance-corrected agreement between two partitions of the same items

#[inline]
fn comb2(n: usize) -> f64 {
    (n * n.saturating_sub(1)) as f64 / 2.0
}

/// The Adjusted Rand Index between two label vectors.
///
/// Labels are compared only through co-membership, so the index is invariant
/// to relabeling. Identical partitions score 1; independent partitions score
/// 0 in expectation; anti-correlated partitions can go negative.
///
/// # Panics
/// Panics if the label vectors have different lengths or are empty.
///
/// # Example
///
/// ```rust
/// # use mdi_stats::ari;
/// let a: Vec<usize> = vec![0, 0, 1, 1];
/// let b: Vec<usize> = vec![1, 1, 0, 0];
///
/// assert!((ari(&a, &b) - 1.0).abs() < 1e-12);
/// ```
pub fn ari(a: &[usize], b: &[usize]) -> f64 {
    assert_eq!(a.len(), b.len(), "Label vectors differ in length");
    assert!(!a.is_empty(), "Empty label vectors");

    let n = a.len();
    let ka = a.iter().max().unwrap() + 1;
    let kb = b.iter().max().unwrap() + 1;

    // contingency table and marginals
    let mut table = vec![0_usize; ka * kb];
    let mut rows = vec![0_usize; ka];
    let mut cols = vec![0_usize; kb];
    a.iter().zip(b.iter()).for_each(|(&za, &zb)| {
        table[za * kb + zb] += 1;
        rows[za] += 1;
        cols[zb] += 1;
    });

    let sum_table: f64 = table.iter().map(|&ct| comb2(ct)).sum();
    let sum_rows: f64 = rows.iter().map(|&ct| comb2(ct)).sum();
    let sum_cols: f64 = cols.iter().map(|&ct| comb2(ct)).sum();

    let expected = sum_rows * sum_cols / comb2(n);
    let denom = 0.5 * (sum_rows + sum_cols) - expected;

    if denom == 0.0 {
        // both partitions are the same trivial partition
        1.0
    } else {
        (sum_table - expected) / denom
    }
}
