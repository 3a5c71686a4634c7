//! Type promotion rules for binary operations

use super::DType;

/// Promote two dtypes to a common dtype for binary operations
///
/// Only lossless widening is allowed: the pair promotes to whichever side the
/// other casts into without data loss. Returns `None` when neither side widens
/// into the other (e.g. `I64` with `F64`, or anything with `Bool`).
pub fn promote(lhs: DType, rhs: DType) -> Option<DType> {
    if lhs == rhs {
        return if lhs.is_numeric() { Some(lhs) } else { None };
    }
    if can_cast_safely(lhs, rhs) {
        Some(rhs)
    } else if can_cast_safely(rhs, lhs) {
        Some(lhs)
    } else {
        None
    }
}

/// Check if a dtype can be safely cast to another without data loss
pub fn can_cast_safely(from: DType, to: DType) -> bool {
    use DType::*;

    if from == to {
        return true;
    }

    match (from, to) {
        // Floats can always accept wider floats
        (F32, F64) => true,

        // Integers to floats, only where every value is exactly representable
        (I8 | U8 | I16 | U16, F32 | F64) => true,
        (I32 | U32, F64) => true,

        // Integer widening
        (I8, I16 | I32 | I64) => true,
        (I16, I32 | I64) => true,
        (I32, I64) => true,
        (U8, U16 | U32 | U64 | I16 | I32 | I64) => true,
        (U16, U32 | U64 | I32 | I64) => true,
        (U32, U64 | I64) => true,

        _ => false,
    }
}
