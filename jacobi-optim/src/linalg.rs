//! Dense solves for the Newton step, on row-major `Vec<Vec<F>>` matrices.

use num_traits::Float;

/// In-place LU factors of a square matrix (unit-diagonal `L` below the
/// diagonal, `U` on and above) with the row permutation.
pub struct LuFactors<F> {
    lu: Vec<Vec<F>>,
    perm: Vec<usize>,
}

/// Pivots below `n · ε · max|aᵢⱼ|` count as zero, so the test follows the
/// scale of the matrix rather than an absolute cutoff.
fn singular_threshold<F: Float>(a: &[Vec<F>]) -> F {
    let scale = a
        .iter()
        .flatten()
        .fold(F::zero(), |m, &x| m.max(x.abs()));
    let n = F::from(a.len()).unwrap_or_else(F::one);
    n * F::epsilon() * scale
}

/// Factorize an `n × n` matrix with partial pivoting.
///
/// Returns `None` when a pivot is numerically zero relative to the largest
/// entry of `a`, or when `a` is all zeros.
pub fn lu_factor<F: Float>(a: &[Vec<F>]) -> Option<LuFactors<F>> {
    let n = a.len();
    debug_assert!(a.iter().all(|row| row.len() == n));

    let mut lu = a.to_vec();
    let mut perm: Vec<usize> = (0..n).collect();
    let eps = singular_threshold(a);

    for col in 0..n {
        let pivot_row = (col..n)
            .max_by(|&i, &j| {
                lu[i][col]
                    .abs()
                    .partial_cmp(&lu[j][col].abs())
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .unwrap_or(col);
        if lu[pivot_row][col].abs() <= eps {
            return None;
        }
        lu.swap(col, pivot_row);
        perm.swap(col, pivot_row);

        let (upper, lower) = lu.split_at_mut(col + 1);
        let pivot = &upper[col];
        for row in lower.iter_mut() {
            let factor = row[col] / pivot[col];
            row[col] = factor;
            for j in (col + 1)..n {
                row[j] = row[j] - factor * pivot[j];
            }
        }
    }

    Some(LuFactors { lu, perm })
}

impl<F: Float> LuFactors<F> {
    /// Solve `A x = b` with the stored factors.
    pub fn solve(&self, b: &[F]) -> Vec<F> {
        let n = self.lu.len();
        debug_assert_eq!(b.len(), n);

        let mut y: Vec<F> = self.perm.iter().map(|&p| b[p]).collect();
        for i in 1..n {
            let s = (0..i).fold(y[i], |s, j| s - self.lu[i][j] * y[j]);
            y[i] = s;
        }
        for i in (0..n).rev() {
            let s = ((i + 1)..n).fold(y[i], |s, j| s - self.lu[i][j] * y[j]);
            y[i] = s / self.lu[i][i];
        }
        y
    }
}

/// Solve the square system `A x = b`. `None` if `A` is singular.
pub fn lu_solve<F: Float>(a: &[Vec<F>], b: &[F]) -> Option<Vec<F>> {
    Some(lu_factor(a)?.solve(b))
}

/// `Aᵀ`.
pub fn transpose<F: Float>(a: &[Vec<F>]) -> Vec<Vec<F>> {
    let ncols = a.first().map_or(0, Vec::len);
    (0..ncols).map(|j| a.iter().map(|row| row[j]).collect()).collect()
}

/// `A B`.
pub fn matmul<F: Float>(a: &[Vec<F>], b: &[Vec<F>]) -> Vec<Vec<F>> {
    let bt = transpose(b);
    a.iter()
        .map(|row| bt.iter().map(|col| dot(row, col)).collect())
        .collect()
}

/// `A v`.
pub fn matvec<F: Float>(a: &[Vec<F>], v: &[F]) -> Vec<F> {
    a.iter().map(|row| dot(row, v)).collect()
}

fn dot<F: Float>(a: &[F], b: &[F]) -> F {
    a.iter().zip(b).fold(F::zero(), |s, (&x, &y)| s + x * y)
}

/// Least-squares solution of `J Δ = r` for a `k × n` matrix `J`.
///
/// A 1 × 1 system reduces to `r / j`, and fails only for `j == 0`.
/// Square (`k = n`): LU on `J` itself.
/// Overdetermined (`k > n`): normal equations `JᵀJ Δ = Jᵀr`.
/// Underdetermined (`k < n`): the minimum-norm solution `Δ = Jᵀ (J Jᵀ)⁻¹ r`.
/// `None` when the system is rank deficient.
pub fn least_squares<F: Float>(j: &[Vec<F>], r: &[F]) -> Option<Vec<F>> {
    let k = j.len();
    let n = j.first().map_or(0, Vec::len);
    match (k, n) {
        (1, 1) => {
            let d = j[0][0];
            (d != F::zero()).then(|| vec![r[0] / d])
        }
        _ if k == n => lu_solve(j, r),
        _ if k > n => {
            let jt = transpose(j);
            lu_solve(&matmul(&jt, j), &matvec(&jt, r))
        }
        _ => {
            let jt = transpose(j);
            let y = lu_solve(&matmul(j, &jt), r)?;
            Some(matvec(&jt, &y))
        }
    }
}
