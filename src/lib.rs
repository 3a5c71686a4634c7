//! # numarith
//!
//! **Dtype-generic elementwise tensor arithmetic with pluggable compute engines.**
//!
//! numarith provides add, subtract, multiply, divide, remainder, power and
//! fused multiply-add over any mix of n-dimensional tensors and loose scalars,
//! for every numeric element type, executed by whichever engine the operands
//! are bound to.
//!
//! ## Features
//!
//! - **Scalar/tensor duality**: either side of an operation may be a loose
//!   scalar or a tensor; two scalars give a bare scalar back
//! - **Broadcasting**: NumPy-style, aligned from the trailing dimension
//! - **Capability-based engines**: an engine exposes only the operations it
//!   implements, and missing ones are reported before any work is done
//! - **Fused multiply-add** with automatic fallback to multiply + add
//! - **Targets**: accumulate into (`incr`) or overwrite (`reuse`) an existing
//!   tensor, never leaving it half-written on error
//! - **Multiple dtypes**: f64, f32, signed and unsigned integers of every width
//!
//! ## Quick Start
//!
//! ```rust
//! use numarith::prelude::*;
//!
//! let engine = engine::shared(StdEngine::new());
//! let a = Tensor::from_slice(&[3.0f64, 10.0], &[2], &engine);
//! let b = Tensor::from_slice(&[7.0f64, 2.0], &[2], &engine);
//!
//! let c = ops::pow(&a, &b)?;
//! assert_eq!(c.to_vec::<f64>(), [2187.0, 100.0]);
//!
//! let mut y = Tensor::from_slice(&[1.0f64, 1.0], &[2], &engine);
//! ops::fma(&a, 2.0, &mut y)?;
//! assert_eq!(y.to_vec::<f64>(), [7.0, 21.0]);
//! # Ok::<(), numarith::error::Error>(())
//! ```
//!
//! ## Feature Flags
//!
//! - `rayon` (default): split large contiguous kernels across the rayon thread pool

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_inception)]

pub mod dtype;
pub mod engine;
pub mod error;
pub mod ops;
pub mod tensor;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::dtype::{DType, DTypeSet, Scalar};
    pub use crate::engine::{
        self, Capabilities, Capability, Engine, EngineRef, Float32Engine, Float64Engine,
        Restricted, StdEngine,
    };
    pub use crate::error::{Error, ErrorKind, Result};
    pub use crate::ops::{self, OpOptions, Operand};
    pub use crate::tensor::{Data, Tensor};
}
