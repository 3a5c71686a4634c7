//! Row-major layouts and the broadcast views kernels read through

use super::Shape;
use super::shape::STACK_DIMS;
use smallvec::SmallVec;
use std::fmt;

/// Per-dimension step through storage, counted in elements
///
/// A zero step repeats one element along a broadcast dimension.
pub type Strides = SmallVec<[isize; STACK_DIMS]>;

/// Shape plus strides
///
/// A tensor always owns dense row-major storage, so its own layout is
/// contiguous. Stretched layouts only exist as views built by
/// [`Layout::broadcast_to`] for kernels.
#[derive(Clone, PartialEq, Eq)]
pub struct Layout {
    shape: Shape,
    strides: Strides,
}

impl Layout {
    /// Dense row-major layout over `shape`
    ///
    /// ```
    /// use numarith::tensor::Layout;
    /// let l = Layout::contiguous(&[4, 2, 5]);
    /// assert_eq!(l.strides(), &[10, 5, 1]);
    /// ```
    pub fn contiguous(shape: &[usize]) -> Self {
        Self {
            shape: shape.into(),
            strides: row_major_strides(shape),
        }
    }

    /// Zero-dimensional layout holding one element
    pub fn scalar() -> Self {
        Self::contiguous(&[])
    }

    /// Extent of each dimension
    #[inline]
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Step of each dimension
    #[inline]
    pub fn strides(&self) -> &[isize] {
        &self.strides
    }

    /// Rank
    #[inline]
    pub fn ndim(&self) -> usize {
        self.shape.ndim()
    }

    /// Number of addressable positions
    #[inline]
    pub fn elem_count(&self) -> usize {
        self.shape.elem_count()
    }

    /// Rank zero
    #[inline]
    pub fn is_scalar(&self) -> bool {
        self.shape.is_scalar()
    }

    /// Whether position `i` lives at storage offset `i`
    pub fn is_contiguous(&self) -> bool {
        self.strides == row_major_strides(&self.shape)
    }

    /// View this layout stretched over `target`
    ///
    /// Shapes line up from the trailing dimension. A dimension of 1 may grow,
    /// and dimensions `target` adds in front read with a zero step. `None`
    /// when some dimension neither matches nor is 1, or when `target` has
    /// lower rank.
    pub fn broadcast_to(&self, target: &[usize]) -> Option<Self> {
        let lead = target.len().checked_sub(self.ndim())?;

        let mut strides = Strides::from_elem(0, lead);
        for (i, (&dim, &step)) in self.shape.iter().zip(&self.strides).enumerate() {
            match target[lead + i] {
                want if want == dim => strides.push(step),
                _ if dim == 1 => strides.push(0),
                _ => return None,
            }
        }

        Some(Self {
            shape: target.into(),
            strides,
        })
    }
}

fn row_major_strides(shape: &[usize]) -> Strides {
    let mut strides = Strides::from_elem(1, shape.len());
    for i in (1..shape.len()).rev() {
        strides[i - 1] = strides[i] * shape[i] as isize;
    }
    strides
}

impl fmt::Debug for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Layout")
            .field("shape", &self.shape.as_slice())
            .field("strides", &self.strides.as_slice())
            .finish()
    }
}
