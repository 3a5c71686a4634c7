//! Predicting whether an operation should fail
//!
//! [`will_fail`] answers, from the dtype tables and engine capabilities alone,
//! whether a call is expected to be rejected. It does not run any part of the
//! dispatcher, so tests can check the two against each other.

use super::arithmetic::BinaryOp;
use super::operand::Operand;
use crate::dtype::{DType, DTypeSet, promote};
use crate::engine::{Capability, Engine};

/// The kind of operation a prediction is for
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum OpKind {
    /// One of the binary operations
    Binary(BinaryOp),
    /// Fused multiply-add
    Fma,
}

impl OpKind {
    /// Whether `engine` has what this operation needs
    fn runnable(self, engine: &dyn Engine) -> bool {
        let caps = engine.capabilities();
        match self {
            Self::Binary(op) => caps.contains(op.capability()),
            Self::Fma => {
                caps.contains(Capability::Fmaer)
                    || (caps.contains(Capability::Multiplier) && caps.contains(Capability::Adder))
            }
        }
    }
}

impl From<BinaryOp> for OpKind {
    fn from(op: BinaryOp) -> Self {
        Self::Binary(op)
    }
}

/// Extra facts that narrow a prediction
#[derive(Clone, Copy, Default)]
pub struct Constraints<'e> {
    other: Option<DType>,
    engine: Option<&'e dyn Engine>,
    op: Option<OpKind>,
}

impl<'e> Constraints<'e> {
    /// No extra facts
    pub fn new() -> Self {
        Self::default()
    }

    /// The other operand's dtype must also be supported and promote with this one
    pub fn other(mut self, dtype: DType) -> Self {
        self.other = Some(dtype);
        self
    }

    /// The engine that will run the operation
    pub fn engine(mut self, engine: &'e dyn Engine) -> Self {
        self.engine = Some(engine);
        self
    }

    /// The operation that will run
    pub fn op(mut self, op: impl Into<OpKind>) -> Self {
        self.op = Some(op.into());
        self
    }
}

impl std::fmt::Debug for Constraints<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Constraints")
            .field("other", &self.other)
            .field("engine", &self.engine.map(|e| e.name()))
            .field("op", &self.op)
            .finish()
    }
}

/// Whether an operation on `operand` is expected to fail
///
/// Fails when the operand's dtype is outside `supported`. With `extra`:
/// - the other dtype must be in `supported` too, and the two must promote;
/// - the engine (from `extra`, else the operand's own) must run the result
///   dtype and, if an operation is named, have the capability it needs
///   (for FMA: Fmaer, or both Multiplier and Adder).
///
/// Shapes and element values are not considered.
pub fn will_fail(operand: Operand<'_>, supported: DTypeSet, extra: Option<&Constraints<'_>>) -> bool {
    let dtype = operand.dtype();
    if !supported.contains(dtype) {
        return true;
    }
    let Some(extra) = extra else {
        return false;
    };

    let result = match extra.other {
        Some(other) if !supported.contains(other) => return true,
        Some(other) => match promote(dtype, other) {
            Some(result) => result,
            None => return true,
        },
        None => dtype,
    };

    let engine: Option<&dyn Engine> = match extra.engine {
        Some(engine) => Some(engine),
        None => operand.engine().map(|e| e.as_ref()),
    };
    match engine {
        Some(engine) => {
            !engine.supported_dtypes().contains(result)
                || extra.op.is_some_and(|op| !op.runnable(engine))
        }
        None => false,
    }
}

/// Whether results of `dtype` should be compared exactly
///
/// Integer arithmetic is exact; float results are compared within a tolerance
/// because the fused and unfused paths may round differently.
pub fn expects_exact(dtype: DType) -> bool {
    dtype.is_int()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{Capabilities, Float32Engine, Restricted, StdEngine, shared};

    #[test]
    fn test_supported_set() {
        assert!(will_fail(Operand::from(true), DTypeSet::NUMERIC, None));
        assert!(!will_fail(Operand::from(1u8), DTypeSet::NUMERIC, None));
        assert!(will_fail(Operand::from(1u8), DTypeSet::FLOATS, None));
    }

    #[test]
    fn test_other_dtype() {
        let c = Constraints::new().other(DType::I64);
        assert!(will_fail(Operand::from(1.0f64), DTypeSet::NUMERIC, Some(&c)));
        let c = Constraints::new().other(DType::F32);
        assert!(!will_fail(Operand::from(1.0f64), DTypeSet::NUMERIC, Some(&c)));
        let c = Constraints::new().other(DType::Bool);
        assert!(will_fail(Operand::from(1.0f64), DTypeSet::NUMERIC, Some(&c)));
    }

    #[test]
    fn test_engine_constraints() {
        let f32_engine = Float32Engine;
        let c = Constraints::new().engine(&f32_engine);
        assert!(will_fail(Operand::from(1.0f64), DTypeSet::NUMERIC, Some(&c)));
        assert!(!will_fail(Operand::from(1.0f32), DTypeSet::NUMERIC, Some(&c)));

        let unfused = Restricted::new(shared(StdEngine::new()), Capabilities::UNFUSED);
        let c = Constraints::new().engine(&unfused).op(OpKind::Fma);
        assert!(!will_fail(Operand::from(1i32), DTypeSet::NUMERIC, Some(&c)));

        let add_only = Restricted::new(shared(StdEngine::new()), [Capability::Adder]);
        let c = Constraints::new().engine(&add_only).op(OpKind::Fma);
        assert!(will_fail(Operand::from(1i32), DTypeSet::NUMERIC, Some(&c)));
        let c = Constraints::new().engine(&add_only).op(BinaryOp::Add);
        assert!(!will_fail(Operand::from(1i32), DTypeSet::NUMERIC, Some(&c)));
    }

    #[test]
    fn test_expects_exact() {
        assert!(expects_exact(DType::U16));
        assert!(!expects_exact(DType::F32));
    }
}
