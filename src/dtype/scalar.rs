//! Loose scalar values

use super::{DType, Element, can_cast_safely};
use crate::error::{Error, Result};
use std::fmt;

/// A single value tagged with its dtype
///
/// This is the "loose" scalar representation: a language-native number that
/// is not boxed in a [`Tensor`](crate::tensor::Tensor). Binary operations accept
/// it on either side.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Scalar {
    /// 64-bit float
    F64(f64),
    /// 32-bit float
    F32(f32),
    /// 64-bit signed integer
    I64(i64),
    /// 32-bit signed integer
    I32(i32),
    /// 16-bit signed integer
    I16(i16),
    /// 8-bit signed integer
    I8(i8),
    /// 64-bit unsigned integer
    U64(u64),
    /// 32-bit unsigned integer
    U32(u32),
    /// 16-bit unsigned integer
    U16(u16),
    /// 8-bit unsigned integer
    U8(u8),
    /// Boolean
    Bool(bool),
}

impl Scalar {
    /// The dtype of this value
    pub const fn dtype(self) -> DType {
        match self {
            Self::F64(_) => DType::F64,
            Self::F32(_) => DType::F32,
            Self::I64(_) => DType::I64,
            Self::I32(_) => DType::I32,
            Self::I16(_) => DType::I16,
            Self::I8(_) => DType::I8,
            Self::U64(_) => DType::U64,
            Self::U32(_) => DType::U32,
            Self::U16(_) => DType::U16,
            Self::U8(_) => DType::U8,
            Self::Bool(_) => DType::Bool,
        }
    }

    /// Convert to f64 (`true` is 1.0)
    pub fn to_f64(self) -> f64 {
        match self {
            Self::F64(v) => v,
            Self::F32(v) => v as f64,
            Self::I64(v) => v as f64,
            Self::I32(v) => v as f64,
            Self::I16(v) => v as f64,
            Self::I8(v) => v as f64,
            Self::U64(v) => v as f64,
            Self::U32(v) => v as f64,
            Self::U16(v) => v as f64,
            Self::U8(v) => v as f64,
            Self::Bool(v) => {
                if v {
                    1.0
                } else {
                    0.0
                }
            }
        }
    }

    /// Extract the value as `T`, if this scalar holds exactly that type
    pub fn to<T: Element>(self) -> Option<T> {
        T::from_scalar(self)
    }

    /// Widen this value into `dtype`
    ///
    /// Only lossless casts (see [`can_cast_safely`]) are allowed; every such
    /// cast round-trips exactly through f64.
    pub fn cast(self, dtype: DType) -> Result<Self> {
        if self.dtype() == dtype {
            return Ok(self);
        }
        if self.dtype().is_bool() || !can_cast_safely(self.dtype(), dtype) {
            return Err(Error::DTypeMismatch {
                lhs: self.dtype(),
                rhs: dtype,
            });
        }
        let v = self.to_f64();
        crate::dispatch_dtype!(dtype, T => {
            Ok(T::from_f64(v).into_scalar())
        }, "cast")
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::F64(v) => write!(f, "{v}"),
            Self::F32(v) => write!(f, "{v}"),
            Self::I64(v) => write!(f, "{v}"),
            Self::I32(v) => write!(f, "{v}"),
            Self::I16(v) => write!(f, "{v}"),
            Self::I8(v) => write!(f, "{v}"),
            Self::U64(v) => write!(f, "{v}"),
            Self::U32(v) => write!(f, "{v}"),
            Self::U16(v) => write!(f, "{v}"),
            Self::U8(v) => write!(f, "{v}"),
            Self::Bool(v) => write!(f, "{v}"),
        }
    }
}

macro_rules! impl_scalar_from {
    ($($t:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$t> for Scalar {
                #[inline]
                fn from(v: $t) -> Self {
                    Self::$variant(v)
                }
            }
        )*
    };
}

impl_scalar_from!(
    f64 => F64,
    f32 => F32,
    i64 => I64,
    i32 => I32,
    i16 => I16,
    i8 => I8,
    u64 => U64,
    u32 => U32,
    u16 => U16,
    u8 => U8,
    bool => Bool,
);

/// Neutral seed value for an accumulator of the given dtype
///
/// Returns `seed` converted to `dtype`. A seed of 1 gives the multiplicative
/// identity; other seeds are used to stress accumulation paths with a value
/// that does not hide mistakes. Seeds that do not fit the dtype fall back to 1.
/// For `Bool` this is `seed != 0`.
pub fn identity_value(seed: i64, dtype: DType) -> Scalar {
    fn numeric<T: Element>(seed: i64) -> Scalar {
        num_traits::cast::<i64, T>(seed)
            .unwrap_or_else(T::one)
            .into_scalar()
    }

    let value: Result<Scalar> = crate::dispatch_dtype!(dtype, T => {
        Ok(numeric::<T>(seed))
    }, "identity_value");
    value.unwrap_or(Scalar::Bool(seed != 0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_dtype() {
        assert_eq!(Scalar::from(2.0f64).dtype(), DType::F64);
        assert_eq!(Scalar::from(2u16).dtype(), DType::U16);
        assert_eq!(Scalar::from(true).dtype(), DType::Bool);
    }

    #[test]
    fn test_scalar_cast() {
        assert_eq!(Scalar::F32(1.5).cast(DType::F64), Ok(Scalar::F64(1.5)));
        assert_eq!(Scalar::U8(200).cast(DType::I16), Ok(Scalar::I16(200)));
        assert!(Scalar::F64(1.5).cast(DType::F32).is_err());
        assert!(Scalar::Bool(true).cast(DType::I32).is_err());
    }

    #[test]
    fn test_identity_value() {
        assert_eq!(identity_value(1, DType::F64), Scalar::F64(1.0));
        assert_eq!(identity_value(100, DType::F32), Scalar::F32(100.0));
        assert_eq!(identity_value(100, DType::U8), Scalar::U8(100));
        assert_eq!(identity_value(100, DType::Bool), Scalar::Bool(true));
        // does not fit in i8
        assert_eq!(identity_value(1000, DType::I8), Scalar::I8(1));
        assert_eq!(identity_value(-3, DType::U32), Scalar::U32(1));
    }
}
