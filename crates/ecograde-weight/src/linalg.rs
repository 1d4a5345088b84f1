//! Small dense statistics and linear-algebra kernels shared by the weighting
//! methods. Matrices are square `Vec<Vec<f64>>` of the indicator count.

const JACOBI_MAX_SWEEPS: usize = 100;
const JACOBI_TOLERANCE: f64 = 1e-22;
const PIVOT_RELATIVE_TOLERANCE: f64 = 1e-12;

#[allow(clippy::cast_precision_loss)]
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation (divides by `n`).
#[allow(clippy::cast_precision_loss)]
pub fn population_std(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    (values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64).sqrt()
}

/// Pearson correlation of two series; 0 when either is constant, `None`
/// when the lengths differ.
pub fn pearson(a: &[f64], b: &[f64]) -> Option<f64> {
    if a.len() != b.len() {
        return None;
    }
    let (ma, mb) = (mean(a), mean(b));
    let (num, da, db) = a.iter().zip(b).fold((0.0, 0.0, 0.0), |(num, da, db), (x, y)| {
        let (dx, dy) = (x - ma, y - mb);
        (dx.mul_add(dy, num), dx.mul_add(dx, da), dy.mul_add(dy, db))
    });
    if da == 0.0 || db == 0.0 {
        return Some(0.0);
    }
    Some(num / (da * db).sqrt())
}

/// Correlation matrix over `columns`. With `unit_diagonal` the diagonal is
/// forced to 1 even for constant columns. `None` for ragged columns.
pub fn correlation_matrix(columns: &[&[f64]], unit_diagonal: bool) -> Option<Vec<Vec<f64>>> {
    columns
        .iter()
        .enumerate()
        .map(|(j, a)| {
            columns
                .iter()
                .enumerate()
                .map(|(k, b)| {
                    if unit_diagonal && j == k {
                        Some(1.0)
                    } else {
                        pearson(a, b)
                    }
                })
                .collect()
        })
        .collect()
}

fn entry(matrix: &[Vec<f64>], i: usize, j: usize) -> f64 {
    matrix.get(i).and_then(|row| row.get(j)).copied().unwrap_or_default()
}

/// Applies the plane rotation `(c, s)` to positions `p < q` of `values`.
fn rotate_entries(values: &mut [f64], p: usize, q: usize, c: f64, s: f64) {
    let (head, tail) = values.split_at_mut(q);
    if let (Some(x), Some(y)) = (head.get_mut(p), tail.first_mut()) {
        let (xp, yq) = (*x, *y);
        *x = c.mul_add(xp, -s * yq);
        *y = s.mul_add(xp, c * yq);
    }
}

/// Applies the plane rotation `(c, s)` to rows `p < q` of `matrix`.
fn rotate_rows(matrix: &mut [Vec<f64>], p: usize, q: usize, c: f64, s: f64) {
    let (head, tail) = matrix.split_at_mut(q);
    if let (Some(row_p), Some(row_q)) = (head.get_mut(p), tail.first_mut()) {
        for (x, y) in row_p.iter_mut().zip(row_q.iter_mut()) {
            let (xp, yq) = (*x, *y);
            *x = c.mul_add(xp, -s * yq);
            *y = s.mul_add(xp, c * yq);
        }
    }
}

/// Eigen-decomposition of a symmetric matrix by cyclic Jacobi rotations.
///
/// Returns the eigenvalues in diagonal order and the eigenvector matrix whose
/// column `k` pairs with eigenvalue `k`, or `None` when `matrix` is not
/// square.
pub fn symmetric_eigen(matrix: &[Vec<f64>]) -> Option<(Vec<f64>, Vec<Vec<f64>>)> {
    let n = matrix.len();
    if matrix.iter().any(|row| row.len() != n) {
        return None;
    }
    let mut a = matrix.to_vec();
    let mut v: Vec<Vec<f64>> = (0..n)
        .map(|i| (0..n).map(|j| if i == j { 1.0 } else { 0.0 }).collect())
        .collect();

    for sweep in 0..JACOBI_MAX_SWEEPS {
        let off: f64 = a
            .iter()
            .enumerate()
            .flat_map(|(i, row)| row.iter().enumerate().filter(move |(j, _)| *j != i))
            .map(|(_, x)| x * x)
            .sum();
        if off < JACOBI_TOLERANCE {
            tracing::trace!(sweep, "jacobi converged");
            break;
        }
        for p in 0..n.saturating_sub(1) {
            for q in p + 1..n {
                let apq = entry(&a, p, q);
                if apq.abs() < f64::MIN_POSITIVE {
                    continue;
                }
                let theta = (entry(&a, q, q) - entry(&a, p, p)) / (2.0 * apq);
                let t = theta.signum() / (theta.abs() + theta.mul_add(theta, 1.0).sqrt());
                let c = 1.0 / t.mul_add(t, 1.0).sqrt();
                let s = t * c;
                for row in &mut a {
                    rotate_entries(row, p, q, c, s);
                }
                rotate_rows(&mut a, p, q, c, s);
                for row in &mut v {
                    rotate_entries(row, p, q, c, s);
                }
            }
        }
    }

    let values = (0..n).map(|i| entry(&a, i, i)).collect();
    Some((values, v))
}

/// Coefficient of determination of an OLS fit of `response` on `regressors`
/// plus an intercept, via Householder QR.
///
/// `None` marks a degenerate fit: no more samples than parameters, a
/// rank-deficient design, or a constant response.
pub fn r_squared(response: &[f64], regressors: &[&[f64]]) -> Option<f64> {
    let m = response.len();
    let n = regressors.len() + 1;
    if m <= n || regressors.iter().any(|c| c.len() != m) {
        return None;
    }

    // column-major design [1, X]
    let mut r: Vec<Vec<f64>> = std::iter::once(vec![1.0; m])
        .chain(regressors.iter().map(|c| c.to_vec()))
        .collect();
    let mut b = response.to_vec();

    for k in 0..n {
        let mut h = r.get(k)?.get(k..)?.to_vec();
        let norm = h.iter().map(|x| x * x).sum::<f64>().sqrt();
        if norm == 0.0 {
            return None;
        }
        let pivot = h.first_mut()?;
        let alpha = if *pivot > 0.0 { -norm } else { norm };
        *pivot -= alpha;
        let hh: f64 = h.iter().map(|x| x * x).sum();
        if hh == 0.0 {
            continue;
        }
        for column in r.iter_mut().skip(k) {
            reflect(&h, hh, column.get_mut(k..)?);
        }
        reflect(&h, hh, b.get_mut(k..)?);
    }

    let pivots: Vec<f64> = r
        .iter()
        .enumerate()
        .map(|(i, column)| column.get(i).copied().unwrap_or_default().abs())
        .collect();
    let largest = pivots.iter().copied().fold(0.0, f64::max);
    if pivots.iter().any(|p| *p <= PIVOT_RELATIVE_TOLERANCE * largest) {
        return None;
    }

    let ssr: f64 = b.get(n..)?.iter().map(|x| x * x).sum();
    let my = mean(response);
    let sst: f64 = response.iter().map(|y| (y - my).powi(2)).sum();
    if sst == 0.0 {
        return None;
    }
    Some(1.0 - ssr / sst)
}

/// `target -= 2 (h . target) / (h . h) * h` over the trailing block.
fn reflect(h: &[f64], hh: f64, target: &mut [f64]) {
    let d: f64 = h.iter().zip(target.iter()).map(|(x, y)| x * y).sum();
    let factor = 2.0 * d / hh;
    for (t, x) in target.iter_mut().zip(h) {
        *t -= factor * x;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() < tol
    }

    #[test]
    fn population_statistics() {
        let v = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert!(close(mean(&v), 5.0, 1e-12));
        assert!(close(population_std(&v), 2.0, 1e-12));
        let r = pearson(&[1.0, 2.0, 3.0], &[3.0, 2.0, 1.0]).unwrap_or(f64::NAN);
        assert!(close(r, -1.0, 1e-12));
        assert_eq!(pearson(&[1.0, 1.0, 1.0], &[3.0, 2.0, 1.0]), Some(0.0));
    }

    #[test]
    fn pearson_refuses_unequal_lengths() {
        assert_eq!(pearson(&[1.0, 2.0, 3.0, 100.0], &[1.0, 2.0, 3.0]), None);
        let ragged: [&[f64]; 2] = [&[1.0, 2.0, 3.0], &[1.0, 2.0]];
        assert_eq!(correlation_matrix(&ragged, true), None);
    }

    #[test]
    fn jacobi_recovers_known_spectrum() {
        let m = vec![
            vec![2.0, 1.0, 0.0],
            vec![1.0, 2.0, 0.0],
            vec![0.0, 0.0, 5.0],
        ];
        let (values, vectors) =
            symmetric_eigen(&m).unwrap_or_else(|| panic!("square input must decompose"));
        let mut sorted = values.clone();
        sorted.sort_by(f64::total_cmp);
        for (got, want) in sorted.iter().zip([1.0, 3.0, 5.0]) {
            assert!(close(*got, want, 1e-10), "{got} vs {want}");
        }

        for (k, &lambda) in values.iter().enumerate() {
            for (i, row) in m.iter().enumerate() {
                let mv: f64 = row
                    .iter()
                    .zip(&vectors)
                    .map(|(mij, vj)| mij * vj.get(k).copied().unwrap_or_default())
                    .sum();
                assert!(close(mv, lambda * entry(&vectors, i, k), 1e-9));
            }
        }
    }

    #[test]
    fn jacobi_rejects_non_square_input() {
        assert_eq!(symmetric_eigen(&[vec![1.0], vec![2.0]]), None);
        assert_eq!(symmetric_eigen(&[vec![1.0, 0.0], vec![0.0]]), None);
        assert_eq!(symmetric_eigen(&[]), Some((Vec::new(), Vec::new())));
    }

    #[test]
    fn r_squared_of_exact_linear_fit_is_one() {
        let x1 = [1.0, 2.0, 3.0, 4.0, 5.0];
        let x2 = [2.0, 1.0, 4.0, 3.0, 6.0];
        let y: Vec<f64> = x1
            .iter()
            .zip(&x2)
            .map(|(a, b)| 0.5 + 2.0 * a - b)
            .collect();
        let r2 = r_squared(&y, &[&x1, &x2]).unwrap_or(f64::NAN);
        assert!(close(r2, 1.0, 1e-10));
    }

    #[test]
    fn r_squared_flags_degenerate_designs() {
        let x = [1.0, 2.0, 3.0];
        assert_eq!(r_squared(&[1.0, 2.0], &[&[1.0, 2.0]]), None);
        assert_eq!(r_squared(&[4.0, 4.0, 4.0], &[&x]), None);
        let x4 = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(r_squared(&[1.0, 3.0, 2.0, 5.0], &[&x4, &x4]), None);
        assert_eq!(r_squared(&[1.0, 3.0, 2.0, 5.0], &[&x]), None);
    }
}
