//! Arithmetic operation kinds and broadcasting helpers

use crate::dtype::DTypeSet;
use crate::engine::Capability;
use std::fmt;

/// Compute the output shape for binary operations with broadcasting
///
/// Dimensions are aligned from the right; a dimension of size 1 stretches to
/// match the other side. Returns None if the shapes are incompatible for
/// broadcasting.
pub fn broadcast_shape(a: &[usize], b: &[usize]) -> Option<Vec<usize>> {
    let max_ndim = a.len().max(b.len());
    let mut result = Vec::with_capacity(max_ndim);

    // Iterate from right to left
    for i in 0..max_ndim {
        let a_dim = if i < a.len() { a[a.len() - 1 - i] } else { 1 };
        let b_dim = if i < b.len() { b[b.len() - 1 - i] } else { 1 };

        if a_dim == b_dim {
            result.push(a_dim);
        } else if a_dim == 1 {
            result.push(b_dim);
        } else if b_dim == 1 {
            result.push(a_dim);
        } else {
            return None; // Incompatible shapes
        }
    }

    result.reverse();
    Some(result)
}

/// Binary operation kind
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    /// Addition: a + b
    Add,
    /// Subtraction: a - b
    Sub,
    /// Multiplication: a * b
    Mul,
    /// Division: a / b
    Div,
    /// Truncating remainder: a % b, with the sign of a
    Mod,
    /// Power: a^b
    Pow,
}

impl BinaryOp {
    /// Every binary operation
    pub const ALL: [BinaryOp; 6] = [
        Self::Add,
        Self::Sub,
        Self::Mul,
        Self::Div,
        Self::Mod,
        Self::Pow,
    ];

    /// Operation name used in errors and logs
    pub const fn name(self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Sub => "sub",
            Self::Mul => "mul",
            Self::Div => "div",
            Self::Mod => "mod",
            Self::Pow => "pow",
        }
    }

    /// Engine capability that executes this operation
    pub const fn capability(self) -> Capability {
        match self {
            Self::Add => Capability::Adder,
            Self::Sub => Capability::Subtracter,
            Self::Mul => Capability::Multiplier,
            Self::Div => Capability::Divider,
            Self::Mod => Capability::Moduler,
            Self::Pow => Capability::Power,
        }
    }

    /// Whether swapping the operands leaves the result unchanged
    pub const fn is_commutative(self) -> bool {
        matches!(self, Self::Add | Self::Mul)
    }

    /// Element types this operation accepts
    pub const fn supported_dtypes(self) -> DTypeSet {
        DTypeSet::NUMERIC
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
