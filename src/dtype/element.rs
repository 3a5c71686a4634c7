//! Element trait for mapping Rust types to DType

use super::{DType, Scalar};
use crate::tensor::Storage;
use num_traits::{CheckedDiv, CheckedRem, Float, NumCast, One, WrappingAdd, WrappingMul, WrappingSub, Zero};
use std::fmt;

/// Trait for types that can be elements of an arithmetic tensor
///
/// This trait connects Rust's type system to numarith's runtime dtype system.
/// It's implemented for the ten numeric primitives; `bool` is storable but is not
/// an `Element`, so arithmetic on it is rejected before any kernel runs.
///
/// The `elem_*` methods are the per-element kernel primitives every engine is
/// built from:
/// - integers wrap on overflow for `add`, `sub`, `mul` and `mul_add`
/// - `div`, `rem` and `pow` return `None` on a domain violation (division or
///   remainder by zero, `MIN / -1`, negative or oversized integer exponent)
/// - floats follow IEEE 754; `rem` is the truncating remainder (sign of the
///   dividend) and `mul_add` rounds once
pub trait Element:
    Copy
    + Send
    + Sync
    + 'static
    + PartialOrd
    + Default
    + fmt::Debug
    + NumCast
    + Zero
    + One
{
    /// The corresponding DType for this Rust type
    const DTYPE: DType;

    /// Convert to f64
    fn to_f64(self) -> f64;

    /// Convert from f64 (saturating for integers)
    fn from_f64(v: f64) -> Self;

    /// `self + rhs`
    fn elem_add(self, rhs: Self) -> Self;

    /// `self - rhs`
    fn elem_sub(self, rhs: Self) -> Self;

    /// `self * rhs`
    fn elem_mul(self, rhs: Self) -> Self;

    /// `self / rhs`
    fn elem_div(self, rhs: Self) -> Option<Self>;

    /// Truncating remainder of `self / rhs`
    fn elem_rem(self, rhs: Self) -> Option<Self>;

    /// `self` raised to `rhs`
    fn elem_pow(self, rhs: Self) -> Option<Self>;

    /// `self * x + acc`
    fn elem_mul_add(self, x: Self, acc: Self) -> Self;

    /// Borrow the typed contents of a storage, if it holds this type
    fn slice(storage: &Storage) -> Option<&[Self]>;

    /// Mutably borrow the typed contents of a storage, if it holds this type
    fn slice_mut(storage: &mut Storage) -> Option<&mut [Self]>;

    /// Wrap a vector into a storage
    fn into_storage(data: Vec<Self>) -> Storage;

    /// Box this value as a loose scalar
    fn into_scalar(self) -> Scalar;

    /// Unbox a loose scalar of exactly this type
    fn from_scalar(scalar: Scalar) -> Option<Self>;
}

macro_rules! impl_storage_links {
    ($t:ty, $variant:ident) => {
        #[inline]
        fn slice(storage: &Storage) -> Option<&[Self]> {
            match storage {
                Storage::$variant(v) => Some(v.as_slice()),
                _ => None,
            }
        }

        #[inline]
        fn slice_mut(storage: &mut Storage) -> Option<&mut [Self]> {
            match storage {
                Storage::$variant(v) => Some(v.as_mut_slice()),
                _ => None,
            }
        }

        #[inline]
        fn into_storage(data: Vec<Self>) -> Storage {
            Storage::$variant(data)
        }

        #[inline]
        fn into_scalar(self) -> Scalar {
            Scalar::$variant(self)
        }

        #[inline]
        fn from_scalar(scalar: Scalar) -> Option<Self> {
            match scalar {
                Scalar::$variant(v) => Some(v),
                _ => None,
            }
        }
    };
}

macro_rules! impl_float_element {
    ($t:ty, $variant:ident) => {
        impl Element for $t {
            const DTYPE: DType = DType::$variant;

            #[inline]
            fn to_f64(self) -> f64 {
                self as f64
            }

            #[inline]
            fn from_f64(v: f64) -> Self {
                v as $t
            }

            #[inline]
            fn elem_add(self, rhs: Self) -> Self {
                self + rhs
            }

            #[inline]
            fn elem_sub(self, rhs: Self) -> Self {
                self - rhs
            }

            #[inline]
            fn elem_mul(self, rhs: Self) -> Self {
                self * rhs
            }

            #[inline]
            fn elem_div(self, rhs: Self) -> Option<Self> {
                Some(self / rhs)
            }

            #[inline]
            fn elem_rem(self, rhs: Self) -> Option<Self> {
                Some(self % rhs)
            }

            #[inline]
            fn elem_pow(self, rhs: Self) -> Option<Self> {
                Some(Float::powf(self, rhs))
            }

            #[inline]
            fn elem_mul_add(self, x: Self, acc: Self) -> Self {
                Float::mul_add(self, x, acc)
            }

            impl_storage_links!($t, $variant);
        }
    };
}

macro_rules! impl_int_element {
    ($t:ty, $variant:ident) => {
        impl Element for $t {
            const DTYPE: DType = DType::$variant;

            #[inline]
            fn to_f64(self) -> f64 {
                self as f64
            }

            #[inline]
            fn from_f64(v: f64) -> Self {
                v as $t
            }

            #[inline]
            fn elem_add(self, rhs: Self) -> Self {
                WrappingAdd::wrapping_add(&self, &rhs)
            }

            #[inline]
            fn elem_sub(self, rhs: Self) -> Self {
                WrappingSub::wrapping_sub(&self, &rhs)
            }

            #[inline]
            fn elem_mul(self, rhs: Self) -> Self {
                WrappingMul::wrapping_mul(&self, &rhs)
            }

            #[inline]
            fn elem_div(self, rhs: Self) -> Option<Self> {
                CheckedDiv::checked_div(&self, &rhs)
            }

            #[inline]
            fn elem_rem(self, rhs: Self) -> Option<Self> {
                CheckedRem::checked_rem(&self, &rhs)
            }

            #[inline]
            fn elem_pow(self, rhs: Self) -> Option<Self> {
                u32::try_from(rhs).ok().map(|exp| self.wrapping_pow(exp))
            }

            #[inline]
            fn elem_mul_add(self, x: Self, acc: Self) -> Self {
                self.elem_mul(x).elem_add(acc)
            }

            impl_storage_links!($t, $variant);
        }
    };
}

impl_float_element!(f64, F64);
impl_float_element!(f32, F32);
impl_int_element!(i64, I64);
impl_int_element!(i32, I32);
impl_int_element!(i16, I16);
impl_int_element!(i8, I8);
impl_int_element!(u64, U64);
impl_int_element!(u32, U32);
impl_int_element!(u16, U16);
impl_int_element!(u8, U8);
