//! Storage: typed, exclusively owned backing buffers

use crate::dispatch_dtype;
use crate::dtype::{DType, Element, Scalar, can_cast_safely};
use crate::error::{Error, Result};
use num_traits::Zero;

/// Typed backing buffer of a tensor
///
/// One variant per [`DType`]. A tensor owns its storage exclusively and the
/// storage length always equals the tensor's element count.
#[derive(Clone, Debug, PartialEq)]
pub enum Storage {
    /// 64-bit floats
    F64(Vec<f64>),
    /// 32-bit floats
    F32(Vec<f32>),
    /// 64-bit signed integers
    I64(Vec<i64>),
    /// 32-bit signed integers
    I32(Vec<i32>),
    /// 16-bit signed integers
    I16(Vec<i16>),
    /// 8-bit signed integers
    I8(Vec<i8>),
    /// 64-bit unsigned integers
    U64(Vec<u64>),
    /// 32-bit unsigned integers
    U32(Vec<u32>),
    /// 16-bit unsigned integers
    U16(Vec<u16>),
    /// 8-bit unsigned integers
    U8(Vec<u8>),
    /// Booleans
    Bool(Vec<bool>),
}

/// Evaluate `$body` with `$v` bound to the inner vector, whatever its type
macro_rules! with_vec {
    ($storage:expr, $v:ident => $body:expr) => {
        match $storage {
            Storage::F64($v) => $body,
            Storage::F32($v) => $body,
            Storage::I64($v) => $body,
            Storage::I32($v) => $body,
            Storage::I16($v) => $body,
            Storage::I8($v) => $body,
            Storage::U64($v) => $body,
            Storage::U32($v) => $body,
            Storage::U16($v) => $body,
            Storage::U8($v) => $body,
            Storage::Bool($v) => $body,
        }
    };
}

macro_rules! paired_variants {
    ($storage:expr, $scalar:expr, ($v:ident, $x:ident) => $body:expr; $($variant:ident),*) => {
        match ($storage, $scalar) {
            $((Storage::$variant($v), Scalar::$variant($x)) => $body,)*
            (s, x) => Err(Error::DTypeMismatch {
                lhs: s.dtype(),
                rhs: x.dtype(),
            }),
        }
    };
}

macro_rules! repeated {
    ($scalar:expr, $len:expr; $($variant:ident),*) => {
        match $scalar {
            $(Scalar::$variant(x) => Storage::$variant(vec![x; $len]),)*
        }
    };
}

impl Storage {
    /// Element type of this buffer
    pub fn dtype(&self) -> DType {
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

    /// Number of elements
    #[inline]
    pub fn len(&self) -> usize {
        with_vec!(self, v => v.len())
    }

    /// Whether the buffer holds no elements
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Zero-filled buffer (`false` for `Bool`)
    pub fn zeros(dtype: DType, len: usize) -> Self {
        let numeric: Result<Self> = dispatch_dtype!(dtype, T => {
            Ok(T::into_storage(vec![T::zero(); len]))
        }, "zeros");
        numeric.unwrap_or_else(|_| Self::Bool(vec![false; len]))
    }

    /// Buffer of `len` copies of `value`
    pub fn filled(value: Scalar, len: usize) -> Self {
        repeated!(value, len; F64, F32, I64, I32, I16, I8, U64, U32, U16, U8, Bool)
    }

    /// One-element buffer holding `value`
    pub fn from_scalar(value: Scalar) -> Self {
        Self::filled(value, 1)
    }

    /// Convert f64 values into a buffer of `dtype`
    ///
    /// Integers saturate, `Bool` maps non-zero to `true`.
    pub fn from_f64s(dtype: DType, values: &[f64]) -> Self {
        let numeric: Result<Self> = dispatch_dtype!(dtype, T => {
            Ok(T::into_storage(values.iter().map(|&v| T::from_f64(v)).collect()))
        }, "from_f64s");
        numeric.unwrap_or_else(|_| Self::Bool(values.iter().map(|&v| v != 0.0).collect()))
    }

    /// `[start, end)` counted up in steps of one, as `dtype`
    pub fn range(dtype: DType, start: i64, end: i64) -> Self {
        let values: Vec<f64> = (start..end).map(|v| v as f64).collect();
        Self::from_f64s(dtype, &values)
    }

    /// Element at `index`
    pub fn get(&self, index: usize) -> Option<Scalar> {
        with_vec!(self, v => v.get(index).map(|&x| Scalar::from(x)))
    }

    /// Typed view of the contents
    #[inline]
    pub fn as_slice<T: Element>(&self) -> Option<&[T]> {
        T::slice(self)
    }

    /// Overwrite every element with `value`
    ///
    /// `value` is widened to this buffer's dtype first; lossy casts are a
    /// dtype mismatch.
    pub fn fill(&mut self, value: Scalar) -> Result<()> {
        let value = value.cast(self.dtype())?;
        paired_variants!(self, value, (v, x) => {
            v.fill(x);
            Ok(())
        }; F64, F32, I64, I32, I16, I8, U64, U32, U16, U8, Bool)
    }

    /// Widen into `dtype`
    ///
    /// Only lossless casts are allowed; the result compares equal element-wise.
    pub fn cast(&self, dtype: DType) -> Result<Self> {
        let from = self.dtype();
        if from == dtype {
            return Ok(self.clone());
        }
        if from.is_bool() || !can_cast_safely(from, dtype) {
            return Err(Error::DTypeMismatch {
                lhs: from,
                rhs: dtype,
            });
        }
        let values: Vec<f64> = dispatch_dtype!(from, S => {
            Ok(S::slice(self)
                .map(|s| s.iter().map(|v| v.to_f64()).collect())
                .unwrap_or_default())
        }, "cast")?;
        Ok(Self::from_f64s(dtype, &values))
    }
}

impl<T: Element> From<Vec<T>> for Storage {
    fn from(data: Vec<T>) -> Self {
        T::into_storage(data)
    }
}

impl From<Vec<bool>> for Storage {
    fn from(data: Vec<bool>) -> Self {
        Self::Bool(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zeros_and_len() {
        let s = Storage::zeros(DType::I16, 4);
        assert_eq!(s.len(), 4);
        assert_eq!(s.dtype(), DType::I16);
        assert_eq!(s.as_slice::<i16>(), Some(&[0i16; 4][..]));
        assert_eq!(Storage::zeros(DType::Bool, 2), Storage::Bool(vec![false, false]));
    }

    #[test]
    fn test_fill_widens() {
        let mut s = Storage::zeros(DType::F64, 3);
        s.fill(Scalar::F32(2.5)).unwrap();
        assert_eq!(s, Storage::F64(vec![2.5; 3]));

        let mut s = Storage::zeros(DType::F32, 3);
        assert!(s.fill(Scalar::F64(2.5)).is_err());
    }

    #[test]
    fn test_filled_keeps_value_dtype() {
        assert_eq!(Storage::filled(Scalar::I8(-3), 3), Storage::I8(vec![-3; 3]));
        assert_eq!(Storage::filled(Scalar::Bool(true), 2), Storage::Bool(vec![true, true]));
        assert_eq!(Storage::filled(Scalar::F32(1.5), 0).len(), 0);
        assert_eq!(Storage::from_scalar(Scalar::U64(9)), Storage::U64(vec![9]));
    }

    #[test]
    fn test_range() {
        assert_eq!(Storage::range(DType::U8, 0, 4), Storage::U8(vec![0, 1, 2, 3]));
        assert_eq!(Storage::range(DType::F32, 1, 3), Storage::F32(vec![1.0, 2.0]));
    }

    #[test]
    fn test_cast() {
        let s = Storage::I32(vec![-1, 7]);
        assert_eq!(s.cast(DType::F64).unwrap(), Storage::F64(vec![-1.0, 7.0]));
        assert_eq!(s.cast(DType::I64).unwrap(), Storage::I64(vec![-1, 7]));
        assert!(s.cast(DType::I16).is_err());
        assert!(Storage::Bool(vec![true]).cast(DType::U8).is_err());
    }

    #[test]
    fn test_get() {
        let s = Storage::from(vec![1u32, 2]);
        assert_eq!(s.get(1), Some(Scalar::U32(2)));
        assert_eq!(s.get(2), None);
    }
}
