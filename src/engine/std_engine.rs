//! The general-purpose CPU engine

use super::kernels::{self, BinaryArgs, Parallelism};
use super::{Adder, Divider, Engine, Fmaer, Moduler, Multiplier, Power, Subtracter};
use crate::error::Result;
use crate::ops::BinaryOp;
use crate::tensor::Storage;

/// CPU engine with every capability, for every numeric dtype
///
/// Large contiguous kernels are split across the rayon thread pool according
/// to its [`Parallelism`] setting.
#[derive(Clone, Copy, Debug, Default)]
pub struct StdEngine {
    parallelism: Parallelism,
}

impl StdEngine {
    /// Engine with the default parallelism threshold
    pub fn new() -> Self {
        Self::default()
    }

    /// Engine with a custom parallelism threshold
    pub fn with_parallelism(parallelism: Parallelism) -> Self {
        Self { parallelism }
    }

    /// The parallelism threshold in use
    pub fn parallelism(&self) -> Parallelism {
        self.parallelism
    }
}

macro_rules! impl_binary_capability {
    ($engine:ty, $($trait:ident :: $method:ident => $op:ident),* $(,)?) => {
        $(
            impl $trait for $engine {
                fn $method(&self, args: &BinaryArgs<'_>, out: &mut Storage) -> Result<()> {
                    kernels::binary_storage(BinaryOp::$op, args, out, self.parallelism)
                }
            }
        )*
    };
}

impl_binary_capability!(
    StdEngine,
    Adder::add => Add,
    Subtracter::sub => Sub,
    Multiplier::mul => Mul,
    Divider::div => Div,
    Moduler::rem => Mod,
    Power::pow => Pow,
);

impl Fmaer for StdEngine {
    fn fma(&self, args: &BinaryArgs<'_>, acc: &mut Storage) -> Result<()> {
        kernels::fused_mul_add_storage(args, acc, self.parallelism)
    }
}

impl Engine for StdEngine {
    fn name(&self) -> &'static str {
        "std"
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
