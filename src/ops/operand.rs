//! Operands: the scalar/tensor duality accepted by every binary operation

use crate::dtype::{DType, Scalar};
use crate::engine::EngineRef;
use crate::tensor::Tensor;

/// One side of a binary operation
///
/// Either a loose scalar or a borrowed tensor. Built with `From` from any
/// numeric primitive, a [`Scalar`] or a `&Tensor`, so entry points accept
/// `add(&t, 2.0)` as readily as `add(&a, &b)`.
#[derive(Clone, Copy, Debug)]
pub enum Operand<'a> {
    /// A loose, language-native value
    Scalar(Scalar),
    /// A tensor
    Tensor(&'a Tensor),
}

impl<'a> Operand<'a> {
    /// Element type of this operand
    pub fn dtype(&self) -> DType {
        match self {
            Self::Scalar(s) => s.dtype(),
            Self::Tensor(t) => t.dtype(),
        }
    }

    /// Shape of this operand (empty for loose scalars)
    pub fn shape(&self) -> &'a [usize] {
        match *self {
            Self::Scalar(_) => &[],
            Self::Tensor(t) => t.shape(),
        }
    }

    /// Whether this operand classifies as a scalar
    ///
    /// Loose scalars and tensors holding exactly one element do.
    pub fn is_scalar(&self) -> bool {
        match self {
            Self::Scalar(_) => true,
            Self::Tensor(t) => t.is_scalar_like(),
        }
    }

    /// The engine this operand is bound to (loose scalars have none)
    pub fn engine(&self) -> Option<&'a EngineRef> {
        match *self {
            Self::Scalar(_) => None,
            Self::Tensor(t) => Some(t.engine()),
        }
    }
}

impl<'a> From<&'a Tensor> for Operand<'a> {
    fn from(tensor: &'a Tensor) -> Self {
        Self::Tensor(tensor)
    }
}

impl<'a> From<&'a mut Tensor> for Operand<'a> {
    fn from(tensor: &'a mut Tensor) -> Self {
        Self::Tensor(tensor)
    }
}

impl From<Scalar> for Operand<'_> {
    fn from(value: Scalar) -> Self {
        Self::Scalar(value)
    }
}

macro_rules! impl_operand_from_primitive {
    ($($t:ty),* $(,)?) => {
        $(
            impl From<$t> for Operand<'_> {
                #[inline]
                fn from(value: $t) -> Self {
                    Self::Scalar(Scalar::from(value))
                }
            }
        )*
    };
}

impl_operand_from_primitive!(f64, f32, i64, i32, i16, i8, u64, u32, u16, u8, bool);
