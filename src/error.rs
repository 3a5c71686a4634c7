//! Error types for numarith

use crate::dtype::DType;
use thiserror::Error;

/// Result type alias using numarith's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in numarith operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Shape mismatch in an operation
    #[error("Shape mismatch: expected {expected:?}, got {got:?}")]
    ShapeMismatch {
        /// Expected shape
        expected: Vec<usize>,
        /// Actual shape
        got: Vec<usize>,
    },

    /// Shapes cannot be broadcast together
    #[error("Cannot broadcast shapes {lhs:?} and {rhs:?}")]
    BroadcastError {
        /// Left-hand side shape
        lhs: Vec<usize>,
        /// Right-hand side shape
        rhs: Vec<usize>,
    },

    /// Unsupported dtype for an operation
    #[error("Unsupported dtype {dtype:?} for operation '{op}'")]
    UnsupportedDType {
        /// The unsupported dtype
        dtype: DType,
        /// The operation name
        op: &'static str,
    },

    /// DType mismatch between operands
    #[error("DType mismatch: {lhs:?} vs {rhs:?}")]
    DTypeMismatch {
        /// Left-hand side dtype
        lhs: DType,
        /// Right-hand side dtype
        rhs: DType,
    },

    /// The executing engine lacks the capability an operation needs
    #[error("Engine '{engine}' does not support operation '{op}'")]
    UnsupportedOperation {
        /// Name of the engine that was asked
        engine: &'static str,
        /// The operation name
        op: &'static str,
    },

    /// A numeric kernel rejected its input (e.g. integer division by zero)
    #[error("Arithmetic domain error in '{op}' on {dtype:?}: {reason}")]
    ArithmeticDomain {
        /// The operation name
        op: &'static str,
        /// Element type the kernel ran on
        dtype: DType,
        /// What went wrong
        reason: &'static str,
    },

    /// Invalid argument provided to an operation
    #[error("Invalid argument '{arg}': {reason}")]
    InvalidArgument {
        /// The argument name
        arg: &'static str,
        /// Reason for invalidity
        reason: String,
    },
}

/// Coarse classification of [`Error`] values.
///
/// Callers that only care about which contract was violated match on this
/// instead of the individual variants.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Operand dtypes are incompatible, or outside the operation's supported set
    TypeMismatch,
    /// Shapes cannot be broadcast, or a target has the wrong shape
    ShapeMismatch,
    /// The engine lacks a required capability
    UnsupportedOperation,
    /// Passed through from a numeric kernel
    ArithmeticDomain,
    /// API misuse
    InvalidArgument,
}

impl Error {
    /// Which contract this error reports a violation of
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::DTypeMismatch { .. } | Self::UnsupportedDType { .. } => ErrorKind::TypeMismatch,
            Self::ShapeMismatch { .. } | Self::BroadcastError { .. } => ErrorKind::ShapeMismatch,
            Self::UnsupportedOperation { .. } => ErrorKind::UnsupportedOperation,
            Self::ArithmeticDomain { .. } => ErrorKind::ArithmeticDomain,
            Self::InvalidArgument { .. } => ErrorKind::InvalidArgument,
        }
    }

    /// Create a shape mismatch error
    pub fn shape_mismatch(expected: &[usize], got: &[usize]) -> Self {
        Self::ShapeMismatch {
            expected: expected.to_vec(),
            got: got.to_vec(),
        }
    }

    /// Create a broadcast error
    pub fn broadcast(lhs: &[usize], rhs: &[usize]) -> Self {
        Self::BroadcastError {
            lhs: lhs.to_vec(),
            rhs: rhs.to_vec(),
        }
    }

    /// Create an unsupported dtype error
    pub fn unsupported_dtype(dtype: DType, op: &'static str) -> Self {
        Self::UnsupportedDType { dtype, op }
    }

    /// Create an unsupported operation error
    pub fn unsupported_operation(engine: &'static str, op: &'static str) -> Self {
        Self::UnsupportedOperation { engine, op }
    }

    /// Create an arithmetic domain error
    pub fn domain(op: &'static str, dtype: DType, reason: &'static str) -> Self {
        Self::ArithmeticDomain { op, dtype, reason }
    }

    /// Create an invalid argument error
    pub fn invalid_argument(arg: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            arg,
            reason: reason.into(),
        }
    }
}
