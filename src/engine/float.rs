//! Single-dtype float engines
//!
//! These engines only ever run one element type, so they skip dtype dispatch
//! and call the typed kernels directly.

use super::kernels::{self, BinaryArgs, Parallelism};
use super::{Adder, Divider, Engine, Fmaer, Moduler, Multiplier, Power, Subtracter};
use crate::dtype::{DType, DTypeSet, Element};
use crate::error::{Error, Result};
use crate::ops::BinaryOp;
use crate::tensor::Storage;

fn expect_dtype<T: Element>(args: &BinaryArgs<'_>, op: &'static str) -> Result<()> {
    if args.dtype() == T::DTYPE {
        Ok(())
    } else {
        Err(Error::unsupported_dtype(args.dtype(), op))
    }
}

macro_rules! float_engine {
    ($(#[$meta:meta])* $name:ident, $t:ty, $dtype:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, Default)]
        pub struct $name;

        impl $name {
            fn run(&self, op: BinaryOp, args: &BinaryArgs<'_>, out: &mut Storage) -> Result<()> {
                expect_dtype::<$t>(args, op.name())?;
                kernels::binary::<$t>(op, args, out, Parallelism::sequential())
            }
        }

        impl Adder for $name {
            fn add(&self, args: &BinaryArgs<'_>, out: &mut Storage) -> Result<()> {
                self.run(BinaryOp::Add, args, out)
            }
        }

        impl Subtracter for $name {
            fn sub(&self, args: &BinaryArgs<'_>, out: &mut Storage) -> Result<()> {
                self.run(BinaryOp::Sub, args, out)
            }
        }

        impl Multiplier for $name {
            fn mul(&self, args: &BinaryArgs<'_>, out: &mut Storage) -> Result<()> {
                self.run(BinaryOp::Mul, args, out)
            }
        }

        impl Divider for $name {
            fn div(&self, args: &BinaryArgs<'_>, out: &mut Storage) -> Result<()> {
                self.run(BinaryOp::Div, args, out)
            }
        }

        impl Moduler for $name {
            fn rem(&self, args: &BinaryArgs<'_>, out: &mut Storage) -> Result<()> {
                self.run(BinaryOp::Mod, args, out)
            }
        }

        impl Power for $name {
            fn pow(&self, args: &BinaryArgs<'_>, out: &mut Storage) -> Result<()> {
                self.run(BinaryOp::Pow, args, out)
            }
        }

        impl Fmaer for $name {
            fn fma(&self, args: &BinaryArgs<'_>, acc: &mut Storage) -> Result<()> {
                expect_dtype::<$t>(args, "fma")?;
                kernels::fused_mul_add::<$t>(args, acc, Parallelism::sequential())
            }
        }

        impl Engine for $name {
            fn name(&self) -> &'static str {
                $label
            }

            fn supported_dtypes(&self) -> DTypeSet {
                DTypeSet::single(DType::$dtype)
            }

            fn adder(&self) -> Option<&dyn Adder> {
                Some(self)
            }

            fn subtracter(&self) -> Option<&dyn Subtracter> {
                Some(self)
            }

            fn multiplier(&self) -> Option<&dyn Multiplier> {
                Some(self)
            }

            fn divider(&self) -> Option<&dyn Divider> {
                Some(self)
            }

            fn moduler(&self) -> Option<&dyn Moduler> {
                Some(self)
            }

            fn power(&self) -> Option<&dyn Power> {
                Some(self)
            }

            fn fmaer(&self) -> Option<&dyn Fmaer> {
                Some(self)
            }
        }
    };
}

float_engine!(
    /// Engine that only runs `F64` tensors
    Float64Engine,
    f64,
    F64,
    "float64"
);

float_engine!(
    /// Engine that only runs `F32` tensors
    Float32Engine,
    f32,
    F32,
    "float32"
);
