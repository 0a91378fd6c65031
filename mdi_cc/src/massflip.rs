use std::ops::Index;

use mdi_utils::Shape;
use rand::Rng;
use rayon::prelude::*;

/// Draw n categorical indices in {0,..,k-1} from an n-by-k matrix of
/// un-normalized log probabilities.
///
/// Automatically chooses whether to use serial or parallel computing.
pub fn massflip<M>(logps: M, mut rng: &mut impl Rng) -> Vec<usize>
where
    M: Index<(usize, usize), Output = f64> + Shape + Sync,
{
    massflip_mat_par(logps, &mut rng)
}

pub fn massflip_mat<M, R>(logps: M, rng: &mut R) -> Vec<usize>
where
    R: Rng,
    M: Index<(usize, usize), Output = f64> + Shape + Sync,
{
    let n_rows = logps.n_rows();
    let n_cols = logps.n_cols();

    if n_cols == 1 {
        return vec![0; n_rows];
    }

    (0..n_rows)
        .map(|i| {
            let u: f64 = rng.gen::<f64>();
            flip_row(&logps, i, n_cols, u)
        })
        .collect()
}

pub fn massflip_mat_par<M, R>(logps: M, rng: &mut R) -> Vec<usize>
where
    R: Rng,
    M: Index<(usize, usize), Output = f64> + Shape + Sync,
{
    let n_rows = logps.n_rows();
    let n_cols = logps.n_cols();

    if n_cols == 1 {
        return vec![0; n_rows];
    }

    // draw the uniform variates serially so the RNG state stays sequential
    let rs: Vec<f64> = (0..n_rows).map(|_| rng.gen::<f64>()).collect();

    rs.par_iter()
        .enumerate()
        .map(|(i, &u)| flip_row(&logps, i, n_cols, u))
        .collect()
}

fn flip_row<M>(logps: &M, i: usize, n_cols: usize, u: f64) -> usize
where
    M: Index<(usize, usize), Output = f64>,
{
    let logp0 = logps[(i, 0)];
    let mut ps: Vec<f64> = Vec::with_capacity(n_cols);
    ps.push(logp0);

    let maxval = (1..n_cols).fold(logp0, |max, j| {
        let logp = logps[(i, j)];
        ps.push(logp);
        if logp > max {
            logp
        } else {
            max
        }
    });

    ps[0] = (logp0 - maxval).exp();
    (1..n_cols).for_each(|j| {
        let p = (ps[j] - maxval).exp() + ps[j - 1];
        ps[j] = p;
    });

    let r: f64 = u * ps[n_cols - 1];

    ps.iter().fold(0_usize, |acc, p| acc + (*p < r) as usize)
}
