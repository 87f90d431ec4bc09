//! Singular values and right singular vectors via the Gram matrix
//!
//! For a term-sentence matrix `A` (m × n), the eigenvectors of `AᵀA` are the
//! right singular vectors of `A` and its eigenvalues are the squared
//! singular values. `AᵀA` is n × n with n = number of sentences, which stays
//! small for a pasted passage, so cyclic Jacobi rotations are plenty.

/// Stop sweeping once the off-diagonal mass drops below this
const OFF_DIAGONAL_EPS: f64 = 1e-22;

/// Safety cap on Jacobi sweeps (convergence is quadratic, so this is never hit
/// for well-formed input)
const MAX_SWEEPS: usize = 100;

/// Right singular decomposition of a matrix
#[derive(Debug, Clone)]
pub struct RightSvd {
    /// Singular values, descending
    pub sigma: Vec<f64>,
    /// `v[k][j]`: component `j` of the right singular vector paired with `sigma[k]`
    pub v: Vec<Vec<f64>>,
}

/// Decompose a row-major `rows × cols` matrix.
///
/// Returns `min(rows, cols)` singular values, matching a thin SVD.
pub fn right_svd(matrix: &[Vec<f64>]) -> RightSvd {
    let rows = matrix.len();
    let cols = matrix.first().map_or(0, Vec::len);

    // Gram matrix AᵀA
    let mut gram = vec![vec![0.0; cols]; cols];
    for i in 0..cols {
        for j in i..cols {
            let dot: f64 = matrix.iter().map(|row| row[i] * row[j]).sum();
            gram[i][j] = dot;
            gram[j][i] = dot;
        }
    }

    let (eigenvalues, eigenvectors) = symmetric_eigen(gram);

    let mut order: Vec<usize> = (0..cols).collect();
    order.sort_by(|&a, &b| eigenvalues[b].total_cmp(&eigenvalues[a]));
    order.truncate(rows.min(cols));

    let sigma = order
        .iter()
        .map(|&k| eigenvalues[k].max(0.0).sqrt())
        .collect();
    let v = order
        .iter()
        .map(|&k| (0..cols).map(|j| eigenvectors[j][k]).collect())
        .collect();

    RightSvd { sigma, v }
}

/// Eigen-decomposition of a symmetric matrix by cyclic Jacobi rotations.
///
/// Returns the eigenvalues and a matrix whose column `k` is the unit
/// eigenvector for eigenvalue `k`.
pub fn symmetric_eigen(mut a: Vec<Vec<f64>>) -> (Vec<f64>, Vec<Vec<f64>>) {
    let n = a.len();
    let mut v: Vec<Vec<f64>> = (0..n)
        .map(|i| (0..n).map(|j| if i == j { 1.0 } else { 0.0 }).collect())
        .collect();

    for _ in 0..MAX_SWEEPS {
        let off: f64 = (0..n)
            .flat_map(|p| (0..n).filter(move |&q| q != p).map(move |q| (p, q)))
            .map(|(p, q)| a[p][q] * a[p][q])
            .sum();
        if off < OFF_DIAGONAL_EPS {
            break;
        }

        for p in 0..n {
            for q in (p + 1)..n {
                if a[p][q] == 0.0 {
                    continue;
                }

                let theta = (a[q][q] - a[p][p]) / (2.0 * a[p][q]);
                let t = if theta == 0.0 {
                    1.0
                } else {
                    theta.signum() / (theta.abs() + (theta * theta + 1.0).sqrt())
                };
                let c = 1.0 / (t * t + 1.0).sqrt();
                let s = t * c;

                for row in a.iter_mut() {
                    let (akp, akq) = (row[p], row[q]);
                    row[p] = c * akp - s * akq;
                    row[q] = s * akp + c * akq;
                }
                for k in 0..n {
                    let (apk, aqk) = (a[p][k], a[q][k]);
                    a[p][k] = c * apk - s * aqk;
                    a[q][k] = s * apk + c * aqk;
                }
                for row in v.iter_mut() {
                    let (vkp, vkq) = (row[p], row[q]);
                    row[p] = c * vkp - s * vkq;
                    row[q] = s * vkp + c * vkq;
                }
            }
        }
    }

    let eigenvalues = (0..n).map(|i| a[i][i]).collect();
    (eigenvalues, v)
}
