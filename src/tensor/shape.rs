//! Tensor dimensions

use smallvec::SmallVec;
use std::fmt;
use std::ops::Deref;

/// Ranks up to this many dimensions stay off the heap
pub(crate) const STACK_DIMS: usize = 4;

/// Extents of a tensor, outermost first
///
/// `[]` is the 0-d shape of a single value, so its element count is 1, while
/// any shape containing a 0 holds nothing. Derefs to `[usize]`.
#[derive(Clone, PartialEq, Eq, Default, Hash)]
pub struct Shape(SmallVec<[usize; STACK_DIMS]>);

impl Shape {
    /// The 0-d shape
    pub fn new() -> Self {
        Self::default()
    }

    /// Dimensions as a plain slice
    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }

    /// Rank
    #[inline]
    pub fn ndim(&self) -> usize {
        self.0.len()
    }

    /// How many elements a tensor of this shape holds
    #[inline]
    pub fn elem_count(&self) -> usize {
        self.0.iter().product()
    }

    /// Rank zero
    #[inline]
    pub fn is_scalar(&self) -> bool {
        self.0.is_empty()
    }

    /// One element, at any rank
    ///
    /// Binary operations treat such tensors as scalars.
    #[inline]
    pub fn is_scalar_like(&self) -> bool {
        self.elem_count() == 1
    }
}

impl Deref for Shape {
    type Target = [usize];

    fn deref(&self) -> &[usize] {
        &self.0
    }
}

impl fmt::Debug for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.0.iter()).finish()
    }
}

impl From<&[usize]> for Shape {
    fn from(dims: &[usize]) -> Self {
        Self(SmallVec::from_slice(dims))
    }
}

impl From<Vec<usize>> for Shape {
    fn from(dims: Vec<usize>) -> Self {
        Self(SmallVec::from_vec(dims))
    }
}

impl<const N: usize> From<[usize; N]> for Shape {
    fn from(dims: [usize; N]) -> Self {
        Self::from(&dims[..])
    }
}

impl FromIterator<usize> for Shape {
    fn from_iter<I: IntoIterator<Item = usize>>(dims: I) -> Self {
        Self(dims.into_iter().collect())
    }
}
