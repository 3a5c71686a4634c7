//! Fused multiply-add coordinator
//!
//! `y = a * x + y`, executed in one pass when the engine has an [`Fmaer`],
//! otherwise as a multiply into scratch followed by an Adder accumulation into
//! `y`. Both paths leave `y` holding the same values as
//! `mul_with(a, x, OpOptions::new().incr(y))` (floats may differ in the last
//! bit, since the fused path rounds once).
//!
//! [`Fmaer`]: crate::engine::Fmaer

use super::classify::{Classification, classify};
use super::dispatch::{accumulate, check_supported, check_target, result_dtype, source};
use super::operand::Operand;
use crate::dtype::DTypeSet;
use crate::engine::{BinaryArgs, EngineRef, FmaPath};
use crate::error::Result;
use crate::tensor::Tensor;
use std::sync::Arc;

/// Engine for an FMA: `a`'s, else `x`'s, else `y`'s
fn resolve_engine(a: Operand<'_>, x: Operand<'_>, y: &Tensor) -> EngineRef {
    a.engine()
        .or_else(|| x.engine())
        .map_or_else(|| Arc::clone(y.engine()), Arc::clone)
}

/// Compute `y = a * x + y` in place and return the updated `y`
///
/// Every check runs before `y` is touched, and `y` is only replaced once the
/// whole result is ready.
///
/// # Errors
///
/// - `UnsupportedDType` / `DTypeMismatch` as for binary operations, or if `y`
///   does not have the result dtype
/// - `BroadcastError` if `a` and `x` do not broadcast, `ShapeMismatch` if `y`
///   does not have their broadcast shape
/// - `UnsupportedOperation` if the engine has no [`Fmaer`](crate::engine::Fmaer)
///   and lacks either Multiplier or Adder
pub fn coordinate(a: Operand<'_>, x: Operand<'_>, y: &mut Tensor) -> Result<Tensor> {
    let engine = resolve_engine(a, x, y);
    let dtype = result_dtype(
        DTypeSet::NUMERIC,
        a.dtype(),
        x.dtype(),
        engine.as_ref(),
        "fma",
    )?;
    check_supported(DTypeSet::NUMERIC, y.dtype(), "fma")?;
    let Classification { shape, .. } = classify(a, x)?;
    check_target(y, dtype, &shape)?;
    let path = FmaPath::resolve(engine.as_ref())?;

    // `y`'s own shape: equal to `shape`, or both hold one element
    let out_shape = y.shape().to_vec();
    let args = BinaryArgs::new(
        source(a, &out_shape, dtype)?,
        source(x, &out_shape, dtype)?,
        &out_shape,
        dtype,
    );

    match path {
        FmaPath::Fused(fmaer) => {
            tracing::trace!("fused fma on engine '{}'", engine.name());
            let mut acc = y.storage().clone();
            fmaer.fma(&args, &mut acc)?;
            y.replace_storage(acc);
        }
        FmaPath::Decomposed { multiplier, adder } => {
            tracing::debug!(
                "engine '{}' has no Fmaer, decomposing fma into mul + add",
                engine.name()
            );
            let mut product = args.output();
            multiplier.mul(&args, &mut product)?;
            accumulate(adder, y, product, &out_shape)?;
        }
    }

    Ok(y.clone())
}
