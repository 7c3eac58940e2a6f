//! ndarray adapters for driver results.
//!
//! [`Value`] and [`Derivative`] convert into dynamic-dimension arrays whose
//! shape follows the normalization rules: 0-d for scalars, 1-d for vectors,
//! 2-d (outputs × inputs) for Jacobians.

use ndarray::{Array1, Array2, ArrayD, IxDyn, ShapeError};

use crate::evaluation::{Derivative, Value};
use crate::float::Float;

impl<F: Float> Value<F> {
    pub fn to_ndarray(&self) -> ArrayD<F> {
        match self {
            Value::Scalar(v) => ArrayD::from_elem(IxDyn(&[]), *v),
            Value::Vector(v) => Array1::from_vec(v.clone()).into_dyn(),
        }
    }
}

impl<F: Float> Derivative<F> {
    /// Fails only when the rows of a Jacobian have unequal lengths.
    pub fn to_ndarray(&self) -> Result<ArrayD<F>, ShapeError> {
        match self {
            Derivative::Scalar(v) => Ok(ArrayD::from_elem(IxDyn(&[]), *v)),
            Derivative::Vector(v) => Ok(Array1::from_vec(v.clone()).into_dyn()),
            Derivative::Matrix(rows) => {
                let ncols = rows.first().map_or(0, Vec::len);
                let flat: Vec<F> = rows.iter().flatten().copied().collect();
                Ok(Array2::from_shape_vec((rows.len(), ncols), flat)?.into_dyn())
            }
        }
    }
}
