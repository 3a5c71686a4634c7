//! Shape classification for binary operations

use super::arithmetic::broadcast_shape;
use super::operand::Operand;
use crate::error::{Error, Result};
use crate::tensor::Shape;

/// How the two operands of a binary operation pair up
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Case {
    /// Both sides are scalars; the result is a 0-d scalar
    ScalarScalar,
    /// Scalar on the left, repeated over every element of the right tensor
    ScalarTensor,
    /// Scalar on the right, repeated over every element of the left tensor
    TensorScalar,
    /// Two tensors, broadcast against each other
    TensorTensor,
}

/// Result of [`classify`]: the case and the output shape
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Classification {
    /// Which pairing applies
    pub case: Case,
    /// Shape of the result
    pub shape: Shape,
}

/// Classify two operands and compute the result shape
///
/// Loose scalars and one-element tensors are scalars. A scalar against a tensor
/// takes the tensor's shape, two scalars give a 0-d result, and two tensors
/// broadcast from the right. Operand order is kept as given.
///
/// # Errors
///
/// `BroadcastError` if two tensors cannot be broadcast together.
pub fn classify(lhs: Operand<'_>, rhs: Operand<'_>) -> Result<Classification> {
    let (case, shape) = match (lhs.is_scalar(), rhs.is_scalar()) {
        (true, true) => (Case::ScalarScalar, Shape::new()),
        (true, false) => (Case::ScalarTensor, Shape::from(rhs.shape())),
        (false, true) => (Case::TensorScalar, Shape::from(lhs.shape())),
        (false, false) => {
            let shape = broadcast_shape(lhs.shape(), rhs.shape())
                .ok_or_else(|| Error::broadcast(lhs.shape(), rhs.shape()))?;
            (Case::TensorTensor, Shape::from(shape))
        }
    };
    Ok(Classification { case, shape })
}
