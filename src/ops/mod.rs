//! Tensor arithmetic operations
//!
//! Elementwise binary arithmetic (`add`, `sub`, `mul`, `div`, `rem`, `pow`) and
//! fused multiply-add over any mix of tensors and loose scalars.
//!
//! # Design
//!
//! ```text
//! add(lhs, rhs) ─┐
//! sub(lhs, rhs) ─┤
//!      ...       ├─> dispatch(op, lhs, rhs, options)
//! pow(lhs, rhs) ─┘     ├── engine resolution     (left tensor, else right)
//!                      ├── dtype checks          (supported set, promotion, engine)
//!                      ├── classify              (scalar/tensor pairing, broadcast shape)
//!                      ├── Kernel::resolve       (engine capability for the op)
//!                      ├── target validation     (incr / reuse)
//!                      └── kernel -> scratch -> commit
//!
//! fma(a, x, y) ──> FmaPath::resolve: Fused(Fmaer) | Decomposed(Multiplier, Adder)
//! ```
//!
//! Operands are anything convertible into an [`Operand`]: `&Tensor`, a
//! [`Scalar`](crate::dtype::Scalar) or a numeric primitive. At least one side
//! must be a tensor, since that is where the engine comes from.
//!
//! # Example
//!
//! ```
//! use numarith::prelude::*;
//!
//! let engine = engine::shared(StdEngine::new());
//! let a = Tensor::from_slice(&[6.0f64, 4.0], &[2], &engine);
//!
//! assert_eq!(ops::div(&a, 2.0)?.to_vec::<f64>(), [3.0, 2.0]);
//! assert_eq!(ops::div(12.0, &a)?.to_vec::<f64>(), [2.0, 3.0]);
//! # Ok::<(), numarith::error::Error>(())
//! ```

mod arithmetic;
mod classify;
mod dispatch;
mod fma;
mod operand;
mod options;
mod predict;

pub use arithmetic::{BinaryOp, broadcast_shape};
pub use classify::{Case, Classification, classify};
pub use dispatch::dispatch;
pub use operand::Operand;
pub use options::OpOptions;
pub use predict::{Constraints, OpKind, expects_exact, will_fail};

use crate::error::Result;
use crate::tensor::Tensor;

macro_rules! binary_entry_points {
    ($($name:ident, $name_with:ident => $op:ident, $doc:literal;)*) => {
        $(
            #[doc = $doc]
            pub fn $name<'a>(lhs: impl Into<Operand<'a>>, rhs: impl Into<Operand<'a>>) -> Result<Tensor> {
                dispatch(BinaryOp::$op, lhs.into(), rhs.into(), OpOptions::new())
            }

            #[doc = concat!("[`", stringify!($name), "`] with an `incr` or `reuse` target")]
            pub fn $name_with<'a>(
                lhs: impl Into<Operand<'a>>,
                rhs: impl Into<Operand<'a>>,
                options: OpOptions<'_>,
            ) -> Result<Tensor> {
                dispatch(BinaryOp::$op, lhs.into(), rhs.into(), options)
            }
        )*
    };
}

binary_entry_points! {
    add, add_with => Add, "Elementwise `lhs + rhs`";
    sub, sub_with => Sub, "Elementwise `lhs - rhs`";
    mul, mul_with => Mul, "Elementwise `lhs * rhs`";
    div, div_with => Div, "Elementwise `lhs / rhs` (integer division by zero is an error)";
    rem, rem_with => Mod, "Elementwise truncating remainder `lhs % rhs`, with the sign of `lhs`";
    pow, pow_with => Pow, "Elementwise `lhs` raised to `rhs` (negative integer exponents are an error)";
}

/// Fused multiply-add: `y = a * x + y`, returning the updated `y`
///
/// Runs in one pass on engines with an [`Fmaer`](crate::engine::Fmaer),
/// otherwise as a multiply followed by an accumulating add. The engine is
/// `a`'s, else `x`'s, else `y`'s.
pub fn fma<'a>(
    a: impl Into<Operand<'a>>,
    x: impl Into<Operand<'a>>,
    y: &mut Tensor,
) -> Result<Tensor> {
    fma::coordinate(a.into(), x.into(), y)
}
