/// The mean of `xs`
#[inline]
pub fn mean(xs: &[f64]) -> f64 {
    assert!(!xs.is_empty(), "Empty container");
    xs.iter().sum::<f64>() / xs.len() as f64
}

/// The (population) variance of `xs`
#[inline]
pub fn var(xs: &[f64]) -> f64 {
    let m = mean(xs);
    let sum_sq = xs.iter().map(|x| (x - m) * (x - m)).sum::<f64>();
    sum_sq / xs.len() as f64
}

/// Bins the entries in `xs` into `k` bins.
///
/// # Example
///
/// ```rust
/// # use mdi_utils::bincount;
/// let xs: Vec<usize> = vec![0, 0, 1, 2, 2, 2, 3];
///
/// assert_eq!(bincount(&xs, 4), vec![2, 1, 3, 1]);
/// ```
#[inline]
pub fn bincount<T>(xs: &[T], k: usize) -> Vec<usize>
where
    T: Clone + Into<usize>,
{
    let mut counts = vec![0; k];
    xs.iter().for_each(|x| {
        let ix: usize = (*x).clone().into();
        counts[ix] += 1;
    });
    counts
}

/// Returns the index of the largest element in xs.
///
/// If there are multiple largest elements, returns the index of the first.
#[inline]
pub fn argmax<T: PartialOrd>(xs: &[T]) -> usize {
    assert!(!xs.is_empty(), "Empty container");

    if xs.len() == 1 {
        return 0;
    }

    let mut max_ix: usize = 0;
    let mut max = &xs[0];
    for (ix, x) in xs.iter().enumerate().skip(1) {
        if x > max {
            max_ix = ix;
            max = x;
        }
    }
    max_ix
}

/// Numerically stable `log(sum(exp(xs)))`
#[inline]
pub fn logsumexp(xs: &[f64]) -> f64 {
    assert!(!xs.is_empty(), "Empty container");

    if xs.len() == 1 {
        return xs[0];
    }

    let maxval = xs.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    if maxval.is_infinite() {
        return maxval;
    }
    xs.iter().map(|x| (x - maxval).exp()).sum::<f64>().ln() + maxval
}
