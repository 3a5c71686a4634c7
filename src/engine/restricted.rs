//! Capability-filtering engine wrapper

use super::{
    Adder, Capabilities, Capability, Divider, Engine, EngineRef, Fmaer, Moduler, Multiplier,
    Power, Subtracter,
};
use crate::dtype::DTypeSet;

/// Exposes only an allowed subset of another engine's capabilities
///
/// Useful for plugging in a partial engine, or for checking that callers
/// handle missing capabilities, such as fused multiply-add falling back to
/// multiply followed by add.
///
/// ```
/// use numarith::engine::{self, Capabilities, Capability, Engine, Restricted, StdEngine};
///
/// let unfused = Restricted::new(engine::shared(StdEngine::new()), Capabilities::UNFUSED);
/// assert!(unfused.fmaer().is_none());
/// assert!(unfused.capabilities().contains(Capability::Multiplier));
/// ```
#[derive(Clone, Debug)]
pub struct Restricted {
    inner: EngineRef,
    allowed: Capabilities,
}

impl Restricted {
    /// Wrap `inner`, hiding every capability outside `allowed`
    pub fn new(inner: EngineRef, allowed: impl Into<Capabilities>) -> Self {
        Self {
            inner,
            allowed: allowed.into(),
        }
    }

    fn allows(&self, cap: Capability) -> bool {
        self.allowed.contains(cap)
    }
}

impl Engine for Restricted {
    fn name(&self) -> &'static str {
        "restricted"
    }

    fn supported_dtypes(&self) -> DTypeSet {
        self.inner.supported_dtypes()
    }

    fn adder(&self) -> Option<&dyn Adder> {
        self.inner.adder().filter(|_| self.allows(Capability::Adder))
    }

    fn subtracter(&self) -> Option<&dyn Subtracter> {
        self.inner
            .subtracter()
            .filter(|_| self.allows(Capability::Subtracter))
    }

    fn multiplier(&self) -> Option<&dyn Multiplier> {
        self.inner
            .multiplier()
            .filter(|_| self.allows(Capability::Multiplier))
    }

    fn divider(&self) -> Option<&dyn Divider> {
        self.inner.divider().filter(|_| self.allows(Capability::Divider))
    }

    fn moduler(&self) -> Option<&dyn Moduler> {
        self.inner.moduler().filter(|_| self.allows(Capability::Moduler))
    }

    fn power(&self) -> Option<&dyn Power> {
        self.inner.power().filter(|_| self.allows(Capability::Power))
    }

    fn fmaer(&self) -> Option<&dyn Fmaer> {
        self.inner.fmaer().filter(|_| self.allows(Capability::Fmaer))
    }
}
