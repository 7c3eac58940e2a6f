use num_traits::Float;

/// Euclidean norm.
pub fn norm<F: Float>(v: &[F]) -> F {
    v.iter().fold(F::zero(), |s, &x| s + x * x).sqrt()
}

/// `true` once `‖residual‖ < tol`.
pub fn converged<F: Float>(residual: &[F], tol: F) -> bool {
    norm(residual) < tol
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn norm_and_threshold() {
        assert_eq!(norm(&[3.0_f64, 4.0]), 5.0);
        assert_eq!(norm::<f64>(&[]), 0.0);
        assert!(converged(&[1e-6_f64, -1e-6], 1e-5));
        assert!(!converged(&[5.0_f64], 1e-5));
    }
}
