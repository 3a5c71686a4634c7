//! Element types
//!
//! [`DType`] is the runtime tag carried by every tensor and scalar. The
//! [`Element`] trait ties each numeric Rust primitive to its tag, [`Scalar`]
//! is a loose tagged value, and [`promote`] decides the result dtype of a
//! binary operation.

mod dispatch;
mod element;
mod promotion;
mod scalar;

pub use element::Element;
pub use promotion::{can_cast_safely, promote};
pub use scalar::{Scalar, identity_value};

use std::fmt;

/// Broad family a [`DType`] belongs to
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum DTypeKind {
    /// IEEE 754 floating point
    Float,
    /// Two's complement integer
    SignedInt,
    /// Unsigned integer
    UnsignedInt,
    /// Truth value, storable but never arithmetic
    Bool,
}

macro_rules! dtype_table {
    ($($(#[$doc:meta])* $variant:ident = $disc:literal, $name:literal, $bytes:literal, $kind:ident;)*) => {
        /// Element type of a tensor or scalar
        ///
        /// Discriminants group the families: floats from 0, signed integers
        /// from 10, unsigned integers from 20, `Bool` at 30. They double as
        /// bit positions in [`DTypeSet`].
        #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
        #[repr(u8)]
        pub enum DType {
            $($(#[$doc])* $variant = $disc,)*
        }

        impl DType {
            /// Every dtype, floats first
            pub const ALL: [DType; 11] = [$(Self::$variant),*];

            /// Width of one element in bytes
            #[inline]
            pub const fn size_in_bytes(self) -> usize {
                match self {
                    $(Self::$variant => $bytes,)*
                }
            }

            /// Lowercase Rust-style name, e.g. `"f32"`
            pub const fn short_name(self) -> &'static str {
                match self {
                    $(Self::$variant => $name,)*
                }
            }

            /// The family this dtype belongs to
            #[inline]
            pub const fn kind(self) -> DTypeKind {
                match self {
                    $(Self::$variant => DTypeKind::$kind,)*
                }
            }
        }
    };
}

dtype_table! {
    /// `f64`
    F64 = 0, "f64", 8, Float;
    /// `f32`
    F32 = 1, "f32", 4, Float;
    /// `i64`
    I64 = 10, "i64", 8, SignedInt;
    /// `i32`
    I32 = 11, "i32", 4, SignedInt;
    /// `i16`
    I16 = 12, "i16", 2, SignedInt;
    /// `i8`
    I8 = 13, "i8", 1, SignedInt;
    /// `u64`
    U64 = 20, "u64", 8, UnsignedInt;
    /// `u32`
    U32 = 21, "u32", 4, UnsignedInt;
    /// `u16`
    U16 = 22, "u16", 2, UnsignedInt;
    /// `u8`
    U8 = 23, "u8", 1, UnsignedInt;
    /// `bool`
    Bool = 30, "bool", 1, Bool;
}

impl DType {
    /// `F64` or `F32`
    #[inline]
    pub const fn is_float(self) -> bool {
        matches!(self.kind(), DTypeKind::Float)
    }

    /// Any signed or unsigned integer
    #[inline]
    pub const fn is_int(self) -> bool {
        matches!(self.kind(), DTypeKind::SignedInt | DTypeKind::UnsignedInt)
    }

    /// `Bool`
    #[inline]
    pub const fn is_bool(self) -> bool {
        matches!(self.kind(), DTypeKind::Bool)
    }

    /// Every dtype arithmetic accepts: floats and integers
    #[inline]
    pub const fn is_numeric(self) -> bool {
        !self.is_bool()
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

/// A set of dtypes, one bit per [`DType`] discriminant
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct DTypeSet {
    bits: u64,
}

impl DTypeSet {
    /// No dtypes
    pub const EMPTY: Self = Self { bits: 0 };
    /// `F64` and `F32`
    pub const FLOATS: Self = Self::of_kind(DTypeKind::Float);
    /// The four signed integer widths
    pub const SIGNED_INTS: Self = Self::of_kind(DTypeKind::SignedInt);
    /// The four unsigned integer widths
    pub const UNSIGNED_INTS: Self = Self::of_kind(DTypeKind::UnsignedInt);
    /// Every integer
    pub const INTS: Self = Self::SIGNED_INTS.union(Self::UNSIGNED_INTS);
    /// What arithmetic operations accept
    pub const NUMERIC: Self = Self::FLOATS.union(Self::INTS);
    /// Every dtype, `Bool` included
    pub const ALL: Self = Self::NUMERIC.with(DType::Bool);

    const fn of_kind(kind: DTypeKind) -> Self {
        let mut set = Self::EMPTY;
        let mut i = 0;
        while i < DType::ALL.len() {
            let dtype = DType::ALL[i];
            if dtype.kind() as u8 == kind as u8 {
                set = set.with(dtype);
            }
            i += 1;
        }
        set
    }

    /// The set holding only `dtype`
    #[inline]
    pub const fn single(dtype: DType) -> Self {
        Self::EMPTY.with(dtype)
    }

    /// This set plus `dtype`
    #[inline]
    pub const fn with(self, dtype: DType) -> Self {
        Self {
            bits: self.bits | (1 << dtype as u8),
        }
    }

    /// Membership test
    #[inline]
    pub const fn contains(self, dtype: DType) -> bool {
        (self.bits >> dtype as u8) & 1 == 1
    }

    /// Members of either set
    #[inline]
    pub const fn union(self, other: Self) -> Self {
        Self {
            bits: self.bits | other.bits,
        }
    }

    /// Members of both sets
    #[inline]
    pub const fn intersection(self, other: Self) -> Self {
        Self {
            bits: self.bits & other.bits,
        }
    }

    /// Whether no dtype is a member
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.bits == 0
    }

    /// Iterate over the members, in [`DType::ALL`] order
    pub fn iter(self) -> impl Iterator<Item = DType> {
        DType::ALL.into_iter().filter(move |&dt| self.contains(dt))
    }
}

impl FromIterator<DType> for DTypeSet {
    fn from_iter<I: IntoIterator<Item = DType>>(iter: I) -> Self {
        iter.into_iter().fold(Self::EMPTY, Self::with)
    }
}
