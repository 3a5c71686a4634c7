//! Compute engines and the capabilities they expose
//!
//! An [`Engine`] executes operations on the tensors bound to it. Rather than
//! one monolithic trait, each operation is a separate capability trait
//! ([`Adder`], [`Multiplier`], [`Fmaer`], ...). An engine advertises the
//! capabilities it has through accessor methods; anything it returns `None`
//! for is rejected with `UnsupportedOperation` before any work is done.
//!
//! Engines are stateless with respect to the tensors they run on, so a single
//! instance is shared between tensors and threads as an [`EngineRef`].
//!
//! # Built-in engines
//!
//! | Engine | Capabilities | DTypes |
//! |--------|--------------|--------|
//! | [`StdEngine`] | all | all numeric |
//! | [`Float64Engine`] | all | `F64` |
//! | [`Float32Engine`] | all | `F32` |
//! | [`Restricted`] | a chosen subset of another engine's | the wrapped engine's |

mod float;
pub mod kernels;
mod restricted;
mod std_engine;

pub use float::{Float32Engine, Float64Engine};
pub use kernels::{BinaryArgs, Parallelism, Source};
pub use restricted::Restricted;
pub use std_engine::StdEngine;

use crate::dtype::DTypeSet;
use crate::error::{Error, Result};
use crate::ops::BinaryOp;
use crate::tensor::Storage;
use std::fmt;
use std::sync::Arc;

/// Shared handle to an engine
pub type EngineRef = Arc<dyn Engine>;

/// Wrap an engine into a shareable [`EngineRef`]
pub fn shared<E: Engine + 'static>(engine: E) -> EngineRef {
    Arc::new(engine)
}

/// Elementwise addition: `out = lhs + rhs`
pub trait Adder: Send + Sync {
    /// Write `args.lhs + args.rhs` into `out`
    fn add(&self, args: &BinaryArgs<'_>, out: &mut Storage) -> Result<()>;
}

/// Elementwise subtraction: `out = lhs - rhs`
pub trait Subtracter: Send + Sync {
    /// Write `args.lhs - args.rhs` into `out`
    fn sub(&self, args: &BinaryArgs<'_>, out: &mut Storage) -> Result<()>;
}

/// Elementwise multiplication: `out = lhs * rhs`
pub trait Multiplier: Send + Sync {
    /// Write `args.lhs * args.rhs` into `out`
    fn mul(&self, args: &BinaryArgs<'_>, out: &mut Storage) -> Result<()>;
}

/// Elementwise division: `out = lhs / rhs`
pub trait Divider: Send + Sync {
    /// Write `args.lhs / args.rhs` into `out`
    fn div(&self, args: &BinaryArgs<'_>, out: &mut Storage) -> Result<()>;
}

/// Elementwise truncating remainder: `out = lhs % rhs`
///
/// The result takes the sign of the dividend.
pub trait Moduler: Send + Sync {
    /// Write `args.lhs % args.rhs` into `out`
    fn rem(&self, args: &BinaryArgs<'_>, out: &mut Storage) -> Result<()>;
}

/// Elementwise power: `out = lhs ^ rhs`
pub trait Power: Send + Sync {
    /// Write `args.lhs` raised to `args.rhs` into `out`
    fn pow(&self, args: &BinaryArgs<'_>, out: &mut Storage) -> Result<()>;
}

/// Fused multiply-add: `acc = lhs * rhs + acc`
pub trait Fmaer: Send + Sync {
    /// Accumulate `args.lhs * args.rhs` into `acc` in one pass
    fn fma(&self, args: &BinaryArgs<'_>, acc: &mut Storage) -> Result<()>;
}

/// A compute engine
///
/// Every capability accessor defaults to `None`; implementors override the
/// ones they support. Accessors must be side-effect free and return the same
/// answer for the lifetime of the engine.
pub trait Engine: Send + Sync + fmt::Debug {
    /// Human-readable engine name, used in errors and logs
    fn name(&self) -> &'static str;

    /// Element types this engine executes
    fn supported_dtypes(&self) -> DTypeSet {
        DTypeSet::NUMERIC
    }

    /// The [`Adder`] capability
    fn adder(&self) -> Option<&dyn Adder> {
        None
    }

    /// The [`Subtracter`] capability
    fn subtracter(&self) -> Option<&dyn Subtracter> {
        None
    }

    /// The [`Multiplier`] capability
    fn multiplier(&self) -> Option<&dyn Multiplier> {
        None
    }

    /// The [`Divider`] capability
    fn divider(&self) -> Option<&dyn Divider> {
        None
    }

    /// The [`Moduler`] capability
    fn moduler(&self) -> Option<&dyn Moduler> {
        None
    }

    /// The [`Power`] capability
    fn power(&self) -> Option<&dyn Power> {
        None
    }

    /// The [`Fmaer`] capability
    fn fmaer(&self) -> Option<&dyn Fmaer> {
        None
    }

    /// Every capability this engine advertises
    fn capabilities(&self) -> Capabilities {
        Capability::ALL
            .into_iter()
            .filter(|&cap| match cap {
                Capability::Adder => self.adder().is_some(),
                Capability::Subtracter => self.subtracter().is_some(),
                Capability::Multiplier => self.multiplier().is_some(),
                Capability::Divider => self.divider().is_some(),
                Capability::Moduler => self.moduler().is_some(),
                Capability::Power => self.power().is_some(),
                Capability::Fmaer => self.fmaer().is_some(),
            })
            .collect()
    }
}

/// The capabilities an engine can advertise
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Capability {
    /// [`Adder`]
    Adder = 0,
    /// [`Subtracter`]
    Subtracter = 1,
    /// [`Multiplier`]
    Multiplier = 2,
    /// [`Divider`]
    Divider = 3,
    /// [`Moduler`]
    Moduler = 4,
    /// [`Power`]
    Power = 5,
    /// [`Fmaer`]
    Fmaer = 6,
}

impl Capability {
    /// Every capability
    pub const ALL: [Capability; 7] = [
        Self::Adder,
        Self::Subtracter,
        Self::Multiplier,
        Self::Divider,
        Self::Moduler,
        Self::Power,
        Self::Fmaer,
    ];

    /// Name of the operation this capability provides
    pub const fn op_name(self) -> &'static str {
        match self {
            Self::Adder => "add",
            Self::Subtracter => "sub",
            Self::Multiplier => "mul",
            Self::Divider => "div",
            Self::Moduler => "mod",
            Self::Power => "pow",
            Self::Fmaer => "fma",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Set of capabilities
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub struct Capabilities {
    bits: u8,
}

impl Capabilities {
    /// No capabilities
    pub const EMPTY: Self = Self { bits: 0 };

    /// Every capability
    pub const ALL: Self = Self { bits: 0b111_1111 };

    /// Every capability except [`Capability::Fmaer`]
    pub const UNFUSED: Self = Self {
        bits: Self::ALL.bits & !(1 << Capability::Fmaer as u8),
    };

    /// Create a set containing a single capability
    #[inline]
    pub const fn single(cap: Capability) -> Self {
        Self {
            bits: 1 << cap as u8,
        }
    }

    /// Check membership
    #[inline]
    pub const fn contains(self, cap: Capability) -> bool {
        self.bits & (1 << cap as u8) != 0
    }

    /// This set plus `cap`
    #[inline]
    pub const fn with(self, cap: Capability) -> Self {
        Self {
            bits: self.bits | (1 << cap as u8),
        }
    }

    /// This set minus `cap`
    #[inline]
    pub const fn without(self, cap: Capability) -> Self {
        Self {
            bits: self.bits & !(1 << cap as u8),
        }
    }

    /// Check if set is empty
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.bits == 0
    }

    /// Iterate over the members
    pub fn iter(self) -> impl Iterator<Item = Capability> {
        Capability::ALL
            .into_iter()
            .filter(move |&cap| self.contains(cap))
    }
}

impl FromIterator<Capability> for Capabilities {
    fn from_iter<I: IntoIterator<Item = Capability>>(iter: I) -> Self {
        iter.into_iter().fold(Self::EMPTY, Self::with)
    }
}

impl<const N: usize> From<[Capability; N]> for Capabilities {
    fn from(caps: [Capability; N]) -> Self {
        caps.into_iter().collect()
    }
}

/// A binary capability resolved from an engine for one operation
///
/// Resolution happens once per call; executing the kernel is then a plain
/// dynamic call with no further lookups.
#[derive(Clone, Copy)]
pub enum Kernel<'e> {
    /// Resolved [`Adder`]
    Add(&'e dyn Adder),
    /// Resolved [`Subtracter`]
    Sub(&'e dyn Subtracter),
    /// Resolved [`Multiplier`]
    Mul(&'e dyn Multiplier),
    /// Resolved [`Divider`]
    Div(&'e dyn Divider),
    /// Resolved [`Moduler`]
    Mod(&'e dyn Moduler),
    /// Resolved [`Power`]
    Pow(&'e dyn Power),
}

impl<'e> Kernel<'e> {
    /// Look up the capability `op` needs on `engine`
    pub fn resolve(engine: &'e dyn Engine, op: BinaryOp) -> Result<Self> {
        let kernel = match op {
            BinaryOp::Add => engine.adder().map(Self::Add),
            BinaryOp::Sub => engine.subtracter().map(Self::Sub),
            BinaryOp::Mul => engine.multiplier().map(Self::Mul),
            BinaryOp::Div => engine.divider().map(Self::Div),
            BinaryOp::Mod => engine.moduler().map(Self::Mod),
            BinaryOp::Pow => engine.power().map(Self::Pow),
        };
        kernel.ok_or_else(|| Error::unsupported_operation(engine.name(), op.name()))
    }

    /// Capability this kernel came from
    pub fn capability(&self) -> Capability {
        match self {
            Self::Add(_) => Capability::Adder,
            Self::Sub(_) => Capability::Subtracter,
            Self::Mul(_) => Capability::Multiplier,
            Self::Div(_) => Capability::Divider,
            Self::Mod(_) => Capability::Moduler,
            Self::Pow(_) => Capability::Power,
        }
    }

    /// Run the kernel
    pub fn execute(&self, args: &BinaryArgs<'_>, out: &mut Storage) -> Result<()> {
        match self {
            Self::Add(k) => k.add(args, out),
            Self::Sub(k) => k.sub(args, out),
            Self::Mul(k) => k.mul(args, out),
            Self::Div(k) => k.div(args, out),
            Self::Mod(k) => k.rem(args, out),
            Self::Pow(k) => k.pow(args, out),
        }
    }
}

impl fmt::Debug for Kernel<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Kernel").field(&self.capability()).finish()
    }
}

/// How an engine evaluates fused multiply-add
#[derive(Clone, Copy)]
pub enum FmaPath<'e> {
    /// The engine has [`Fmaer`]
    Fused(&'e dyn Fmaer),
    /// No [`Fmaer`]: multiply into scratch, then accumulate with [`Adder`]
    Decomposed {
        /// Computes the product
        multiplier: &'e dyn Multiplier,
        /// Accumulates the product into the target
        adder: &'e dyn Adder,
    },
}

impl<'e> FmaPath<'e> {
    /// Prefer [`Fmaer`], fall back to [`Multiplier`] + [`Adder`]
    pub fn resolve(engine: &'e dyn Engine) -> Result<Self> {
        if let Some(fmaer) = engine.fmaer() {
            return Ok(Self::Fused(fmaer));
        }
        match (engine.multiplier(), engine.adder()) {
            (Some(multiplier), Some(adder)) => Ok(Self::Decomposed { multiplier, adder }),
            (None, _) => Err(Error::unsupported_operation(engine.name(), "mul")),
            (Some(_), None) => Err(Error::unsupported_operation(engine.name(), "add")),
        }
    }

    /// Whether this is the single-pass path
    pub fn is_fused(&self) -> bool {
        matches!(self, Self::Fused(_))
    }
}

impl fmt::Debug for FmaPath<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fused(_) => f.write_str("FmaPath::Fused"),
            Self::Decomposed { .. } => f.write_str("FmaPath::Decomposed"),
        }
    }
}
