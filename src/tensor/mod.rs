//! Tensor types
//!
//! This module provides the core `Tensor` type: an n-dimensional array with
//! contiguous, exclusively owned storage, bound to the compute engine that
//! executes operations on it.

mod core;
mod layout;
mod shape;
mod storage;

pub use core::{Data, Tensor};
pub use layout::{Layout, Strides};
pub use shape::Shape;
pub use storage::Storage;
