//! Binary operation dispatcher
//!
//! Every binary entry point funnels through [`dispatch`]. All validation
//! happens before the engine is called, in this order:
//!
//! 1. engine resolution (left tensor's engine, else the right one's)
//! 2. both operand dtypes are in the operation's supported set
//! 3. the dtypes promote to a common result dtype
//! 4. the engine runs the result dtype
//! 5. shape classification
//! 6. the engine has the capability the operation needs
//! 7. any target has the result's dtype and shape (and `incr` needs an Adder)
//!
//! The kernel then writes into a scratch buffer, which is committed only once
//! it is complete: as a fresh tensor, accumulated into an `incr` target, or
//! moved into a `reuse` target.

use super::arithmetic::BinaryOp;
use super::classify::{Classification, classify};
use super::operand::Operand;
use super::options::OpOptions;
use crate::dtype::{DType, DTypeSet, promote};
use crate::engine::{Adder, BinaryArgs, Engine, EngineRef, Kernel, Source};
use crate::error::{Error, Result};
use crate::tensor::{Storage, Tensor};
use std::borrow::Cow;
use std::sync::Arc;

/// Engine that executes an operation: the left tensor's, else the right one's
pub(crate) fn resolve_engine(lhs: Operand<'_>, rhs: Operand<'_>) -> Result<EngineRef> {
    lhs.engine()
        .or_else(|| rhs.engine())
        .map(Arc::clone)
        .ok_or_else(|| Error::invalid_argument("operands", "at least one operand must be a tensor"))
}

/// Reject operands whose dtype is outside `supported`
pub(crate) fn check_supported(supported: DTypeSet, dtype: DType, op: &'static str) -> Result<()> {
    if supported.contains(dtype) {
        Ok(())
    } else {
        Err(Error::unsupported_dtype(dtype, op))
    }
}

/// Common dtype of two operands, checked against the operation and the engine
pub(crate) fn result_dtype(
    supported: DTypeSet,
    lhs: DType,
    rhs: DType,
    engine: &dyn Engine,
    op: &'static str,
) -> Result<DType> {
    check_supported(supported, lhs, op)?;
    check_supported(supported, rhs, op)?;
    let dtype = promote(lhs, rhs).ok_or(Error::DTypeMismatch { lhs, rhs })?;
    check_supported(engine.supported_dtypes(), dtype, op)?;
    Ok(dtype)
}

/// Check that `target` can hold a result of `dtype` and `shape`
///
/// A one-element target accepts any one-element result, including a 0-d one.
pub(crate) fn check_target(target: &Tensor, dtype: DType, shape: &[usize]) -> Result<()> {
    if target.dtype() != dtype {
        return Err(Error::DTypeMismatch {
            lhs: dtype,
            rhs: target.dtype(),
        });
    }
    let numel: usize = shape.iter().product();
    if target.shape() != shape && !(target.is_scalar_like() && numel == 1) {
        return Err(Error::shape_mismatch(shape, target.shape()));
    }
    Ok(())
}

/// Kernel input for `operand`, widened to `dtype` and broadcast to `shape`
pub(crate) fn source<'a>(operand: Operand<'a>, shape: &[usize], dtype: DType) -> Result<Source<'a>> {
    match operand {
        Operand::Scalar(value) => Source::scalar(value, shape, dtype),
        Operand::Tensor(tensor) => Source::tensor(tensor, shape, dtype),
    }
}

/// `target += result`, computed into scratch and committed on success
pub(crate) fn accumulate(
    adder: &dyn Adder,
    target: &mut Tensor,
    result: Storage,
    result_shape: &[usize],
) -> Result<()> {
    let dtype = target.dtype();
    let acc = {
        let args = BinaryArgs::new(
            Source::tensor(target, target.shape(), dtype)?,
            Source::new(Cow::Owned(result), result_shape, target.shape(), dtype)?,
            target.shape(),
            dtype,
        );
        let mut acc = args.output();
        adder.add(&args, &mut acc)?;
        acc
    };
    target.replace_storage(acc);
    Ok(())
}

/// Where a validated result goes
enum Target<'t, 'e> {
    Fresh,
    Incr(&'t mut Tensor, &'e dyn Adder),
    Reuse(&'t mut Tensor),
}

impl<'t, 'e> Target<'t, 'e> {
    /// Validate the requested targets against the result's dtype and shape
    fn resolve(
        options: OpOptions<'t>,
        engine: &'e dyn Engine,
        dtype: DType,
        shape: &[usize],
    ) -> Result<Self> {
        match (options.incr, options.reuse) {
            (None, None) => Ok(Self::Fresh),
            (Some(t), None) => {
                check_target(t, dtype, shape)?;
                let adder = engine
                    .adder()
                    .ok_or_else(|| Error::unsupported_operation(engine.name(), "add"))?;
                Ok(Self::Incr(t, adder))
            }
            (None, Some(t)) => {
                check_target(t, dtype, shape)?;
                Ok(Self::Reuse(t))
            }
            (Some(_), Some(_)) => Err(Error::invalid_argument(
                "options",
                "incr and reuse targets are mutually exclusive",
            )),
        }
    }

    /// Hand `out` over to its destination
    fn commit(self, out: Storage, shape: &[usize], engine: &EngineRef) -> Result<Tensor> {
        match self {
            Self::Fresh => Tensor::from_storage(out, shape, engine),
            Self::Incr(t, adder) => {
                accumulate(adder, t, out, shape)?;
                Ok(t.clone())
            }
            Self::Reuse(t) => {
                t.replace_storage(out);
                Ok(t.clone())
            }
        }
    }
}

/// Run a binary operation
///
/// # Errors
///
/// - `InvalidArgument` if both operands are loose scalars, or both targets are set
/// - `UnsupportedDType` if an operand dtype is outside the operation's set, or
///   the engine does not run the result dtype
/// - `DTypeMismatch` if the operand dtypes do not promote, or a target has the
///   wrong dtype
/// - `BroadcastError` / `ShapeMismatch` for incompatible operand or target shapes
/// - `UnsupportedOperation` if the engine lacks the capability (or an Adder for `incr`)
/// - `ArithmeticDomain` if the kernel rejects an element
///
/// On error, inputs and targets are unchanged.
pub fn dispatch(
    op: BinaryOp,
    lhs: Operand<'_>,
    rhs: Operand<'_>,
    options: OpOptions<'_>,
) -> Result<Tensor> {
    let engine = resolve_engine(lhs, rhs)?;
    let dtype = result_dtype(
        op.supported_dtypes(),
        lhs.dtype(),
        rhs.dtype(),
        engine.as_ref(),
        op.name(),
    )?;
    let Classification { case, shape } = classify(lhs, rhs)?;
    let kernel = Kernel::resolve(engine.as_ref(), op)?;

    let target = Target::resolve(options, engine.as_ref(), dtype, &shape)?;

    tracing::trace!(
        "dispatching {} ({:?}, {}, {:?}) on engine '{}'",
        op,
        case,
        dtype,
        shape,
        engine.name()
    );

    let args = BinaryArgs::new(
        source(lhs, &shape, dtype)?,
        source(rhs, &shape, dtype)?,
        &shape,
        dtype,
    );
    let mut out = args.output();
    kernel.execute(&args, &mut out)?;

    target.commit(out, &shape, &engine)
}
