//! Per-call options for binary operations

use crate::tensor::Tensor;

/// Where a binary operation puts its result
///
/// By default a fresh tensor is returned. Both options hand the operation a
/// caller-owned tensor whose dtype must equal the result dtype and whose shape
/// must equal the result shape (a one-element target also accepts a scalar
/// result). The target is only touched once the whole result has been
/// computed, so a failed call leaves it unchanged.
///
/// ```
/// use numarith::prelude::*;
///
/// let engine = engine::shared(StdEngine::new());
/// let a = Tensor::from_slice(&[1.0f64, 2.0], &[2], &engine);
/// let mut acc = Tensor::from_slice(&[10.0f64, 10.0], &[2], &engine);
///
/// let out = ops::mul_with(&a, 3.0, OpOptions::new().incr(&mut acc))?;
/// assert_eq!(out.to_vec::<f64>(), [13.0, 16.0]);
/// assert_eq!(acc.to_vec::<f64>(), [13.0, 16.0]);
/// # Ok::<(), numarith::error::Error>(())
/// ```
#[derive(Debug, Default)]
pub struct OpOptions<'t> {
    pub(crate) incr: Option<&'t mut Tensor>,
    pub(crate) reuse: Option<&'t mut Tensor>,
}

impl<'t> OpOptions<'t> {
    /// No options: return a fresh tensor
    pub fn new() -> Self {
        Self::default()
    }

    /// Accumulate the result into `target` (`target += result`)
    ///
    /// Requires the engine's Adder capability.
    pub fn incr(mut self, target: &'t mut Tensor) -> Self {
        self.incr = Some(target);
        self
    }

    /// Overwrite `target` with the result
    pub fn reuse(mut self, target: &'t mut Tensor) -> Self {
        self.reuse = Some(target);
        self
    }
}
