//! Elementwise kernels shared by the built-in engines
//!
//! Kernels read two broadcast [`Source`]s and write a contiguous output.
//! Broadcasting is expressed entirely through strides: a stride of 0 repeats
//! the same element along that dimension, so a loose scalar is a one-element
//! buffer with all-zero strides.

use crate::dispatch_dtype;
use crate::dtype::{DType, Element, Scalar};
use crate::error::{Error, Result};
use crate::ops::BinaryOp;
use crate::tensor::{Layout, Shape, Storage, Tensor};
use smallvec::SmallVec;
use std::borrow::Cow;

/// Work-splitting threshold for contiguous kernels
///
/// Kernels whose output has at least `min_len` elements run on the rayon
/// thread pool (with the `rayon` feature); smaller ones stay on the caller's
/// thread. Results are identical either way.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Parallelism {
    min_len: usize,
}

impl Parallelism {
    /// Default threshold in elements
    pub const DEFAULT_MIN_LEN: usize = 1 << 15;

    /// Split work for outputs of at least `min_len` elements
    pub const fn new(min_len: usize) -> Self {
        Self {
            min_len: if min_len == 0 { 1 } else { min_len },
        }
    }

    /// Never split work
    pub const fn sequential() -> Self {
        Self { min_len: usize::MAX }
    }

    /// The threshold in elements
    #[inline]
    pub const fn min_len(self) -> usize {
        self.min_len
    }
}

impl Default for Parallelism {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MIN_LEN)
    }
}

/// One input of a kernel: a buffer of the kernel's dtype plus broadcast strides
#[derive(Clone, Debug)]
pub struct Source<'a> {
    storage: Cow<'a, Storage>,
    layout: Layout,
}

impl<'a> Source<'a> {
    /// View `storage` (laid out as `shape`) as an input of `dtype` broadcast to `target`
    ///
    /// The buffer is widened to `dtype` if needed. One-element buffers are
    /// repeated over the whole target regardless of their own shape.
    pub fn new(
        storage: Cow<'a, Storage>,
        shape: &[usize],
        target: &[usize],
        dtype: DType,
    ) -> Result<Self> {
        let storage = if storage.dtype() == dtype {
            storage
        } else {
            Cow::Owned(storage.cast(dtype)?)
        };
        let own = if storage.len() == 1 {
            Layout::scalar()
        } else {
            Layout::contiguous(shape)
        };
        let layout = own
            .broadcast_to(target)
            .ok_or_else(|| Error::broadcast(shape, target))?;
        Ok(Self { storage, layout })
    }

    /// A loose scalar repeated over `target`
    pub fn scalar(value: Scalar, target: &[usize], dtype: DType) -> Result<Self> {
        Self::new(
            Cow::Owned(Storage::from_scalar(value)),
            &[],
            target,
            dtype,
        )
    }

    /// A tensor's elements broadcast to `target`, borrowed when no cast is needed
    pub fn tensor(tensor: &'a Tensor, target: &[usize], dtype: DType) -> Result<Self> {
        Self::new(
            Cow::Borrowed(tensor.storage()),
            tensor.shape(),
            target,
            dtype,
        )
    }

    /// The backing buffer
    #[inline]
    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    /// Broadcast layout over the kernel's output shape
    #[inline]
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    fn typed<T: Element>(&self) -> Result<&[T]> {
        T::slice(&self.storage).ok_or(Error::DTypeMismatch {
            lhs: self.storage.dtype(),
            rhs: T::DTYPE,
        })
    }

    /// The whole buffer, if it maps one-to-one onto the output
    fn contiguous<T: Element>(&self) -> Option<&[T]> {
        if self.layout.is_contiguous() && self.storage.len() == self.layout.elem_count() {
            T::slice(&self.storage)
        } else {
            None
        }
    }
}

/// Operands of a binary kernel, already broadcast to a common shape and dtype
#[derive(Clone, Debug)]
pub struct BinaryArgs<'a> {
    lhs: Source<'a>,
    rhs: Source<'a>,
    shape: Shape,
    dtype: DType,
}

impl<'a> BinaryArgs<'a> {
    /// Pair two sources that were broadcast to `shape` as `dtype`
    pub fn new(lhs: Source<'a>, rhs: Source<'a>, shape: &[usize], dtype: DType) -> Self {
        debug_assert_eq!(lhs.layout().shape(), shape);
        debug_assert_eq!(rhs.layout().shape(), shape);
        Self {
            lhs,
            rhs,
            shape: Shape::from(shape),
            dtype,
        }
    }

    /// Left operand
    #[inline]
    pub fn lhs(&self) -> &Source<'a> {
        &self.lhs
    }

    /// Right operand
    #[inline]
    pub fn rhs(&self) -> &Source<'a> {
        &self.rhs
    }

    /// Output shape
    #[inline]
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Element type of both inputs and the output
    #[inline]
    pub fn dtype(&self) -> DType {
        self.dtype
    }

    /// Number of output elements
    #[inline]
    pub fn len(&self) -> usize {
        self.shape.elem_count()
    }

    /// Whether the output is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// A zeroed output buffer of the right dtype and length
    pub fn output(&self) -> Storage {
        Storage::zeros(self.dtype, self.len())
    }

    fn check_output(&self, out: &Storage) -> Result<()> {
        if out.dtype() != self.dtype {
            return Err(Error::DTypeMismatch {
                lhs: self.dtype,
                rhs: out.dtype(),
            });
        }
        if out.len() != self.len() {
            return Err(Error::shape_mismatch(&[self.len()], &[out.len()]));
        }
        Ok(())
    }
}

/// Row-major walk over a shape yielding the storage offsets of both inputs
///
/// Offsets are updated incrementally instead of recomputed from the linear
/// index for every element.
struct StridedPairs<'s> {
    shape: &'s [usize],
    lhs_strides: &'s [isize],
    rhs_strides: &'s [isize],
    index: SmallVec<[usize; 4]>,
    lhs: isize,
    rhs: isize,
    remaining: usize,
}

impl<'s> StridedPairs<'s> {
    fn new(lhs: &'s Layout, rhs: &'s Layout) -> Self {
        Self {
            shape: lhs.shape(),
            lhs_strides: lhs.strides(),
            rhs_strides: rhs.strides(),
            index: SmallVec::from_elem(0, lhs.ndim()),
            lhs: 0,
            rhs: 0,
            remaining: lhs.elem_count(),
        }
    }
}

impl Iterator for StridedPairs<'_> {
    type Item = (usize, usize);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let item = (self.lhs as usize, self.rhs as usize);

        for dim in (0..self.shape.len()).rev() {
            self.index[dim] += 1;
            self.lhs += self.lhs_strides[dim];
            self.rhs += self.rhs_strides[dim];

            if self.index[dim] < self.shape[dim] {
                break;
            }

            self.index[dim] = 0;
            self.lhs -= self.shape[dim] as isize * self.lhs_strides[dim];
            self.rhs -= self.shape[dim] as isize * self.rhs_strides[dim];
        }

        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

type ElementFn<T> = fn(T, T) -> Option<T>;

fn element_fn<T: Element>(op: BinaryOp) -> ElementFn<T> {
    match op {
        BinaryOp::Add => |a, b| Some(a.elem_add(b)),
        BinaryOp::Sub => |a, b| Some(a.elem_sub(b)),
        BinaryOp::Mul => |a, b| Some(a.elem_mul(b)),
        BinaryOp::Div => T::elem_div,
        BinaryOp::Mod => T::elem_rem,
        BinaryOp::Pow => T::elem_pow,
    }
}

fn domain_reason(op: BinaryOp) -> &'static str {
    match op {
        BinaryOp::Div => "division by zero or overflow",
        BinaryOp::Mod => "remainder by zero or overflow",
        BinaryOp::Pow => "negative or oversized integer exponent",
        BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul => "invalid operands",
    }
}

/// Apply `f` pairwise over contiguous inputs; `false` if any element failed
fn zip_contiguous<T: Element>(
    lhs: &[T],
    rhs: &[T],
    out: &mut [T],
    f: ElementFn<T>,
    parallelism: Parallelism,
) -> bool {
    #[cfg(feature = "rayon")]
    {
        use rayon::prelude::*;

        if out.len() >= parallelism.min_len() {
            return out
                .par_iter_mut()
                .zip(lhs.par_iter().zip(rhs.par_iter()))
                .with_min_len(parallelism.min_len())
                .try_for_each(|(o, (&a, &b))| f(a, b).map(|v| *o = v))
                .is_some();
        }
    }

    #[cfg(not(feature = "rayon"))]
    let _ = parallelism;

    out.iter_mut()
        .zip(lhs.iter().zip(rhs))
        .try_for_each(|(o, (&a, &b))| f(a, b).map(|v| *o = v))
        .is_some()
}

/// Typed binary kernel: `out[i] = op(lhs[i], rhs[i])` over the broadcast shape
///
/// Returns `ArithmeticDomain` if any element is rejected (integer division by
/// zero and the like). `out` is left partially written in that case.
pub fn binary<T: Element>(
    op: BinaryOp,
    args: &BinaryArgs<'_>,
    out: &mut Storage,
    parallelism: Parallelism,
) -> Result<()> {
    args.check_output(out)?;
    let f = element_fn::<T>(op);
    let out_dtype = out.dtype();
    let out = T::slice_mut(out).ok_or(Error::DTypeMismatch {
        lhs: T::DTYPE,
        rhs: out_dtype,
    })?;

    let ok = match (args.lhs.contiguous::<T>(), args.rhs.contiguous::<T>()) {
        (Some(a), Some(b)) => zip_contiguous(a, b, out, f, parallelism),
        _ => {
            let a = args.lhs.typed::<T>()?;
            let b = args.rhs.typed::<T>()?;
            out.iter_mut()
                .zip(StridedPairs::new(args.lhs.layout(), args.rhs.layout()))
                .try_for_each(|(o, (i, j))| f(a[i], b[j]).map(|v| *o = v))
                .is_some()
        }
    };

    if ok {
        Ok(())
    } else {
        Err(Error::domain(op.name(), T::DTYPE, domain_reason(op)))
    }
}

/// Typed fused kernel: `acc[i] = lhs[i] * rhs[i] + acc[i]`
///
/// Floats round once (`mul_add`); integers wrap.
pub fn fused_mul_add<T: Element>(
    args: &BinaryArgs<'_>,
    acc: &mut Storage,
    parallelism: Parallelism,
) -> Result<()> {
    args.check_output(acc)?;
    let acc_dtype = acc.dtype();
    let acc = T::slice_mut(acc).ok_or(Error::DTypeMismatch {
        lhs: T::DTYPE,
        rhs: acc_dtype,
    })?;

    match (args.lhs.contiguous::<T>(), args.rhs.contiguous::<T>()) {
        (Some(a), Some(x)) => {
            #[cfg(feature = "rayon")]
            {
                use rayon::prelude::*;

                if acc.len() >= parallelism.min_len() {
                    acc.par_iter_mut()
                        .zip(a.par_iter().zip(x.par_iter()))
                        .with_min_len(parallelism.min_len())
                        .for_each(|(y, (&a, &x))| *y = a.elem_mul_add(x, *y));
                    return Ok(());
                }
            }

            #[cfg(not(feature = "rayon"))]
            let _ = parallelism;

            for (y, (&a, &x)) in acc.iter_mut().zip(a.iter().zip(x)) {
                *y = a.elem_mul_add(x, *y);
            }
        }
        _ => {
            let a = args.lhs.typed::<T>()?;
            let x = args.rhs.typed::<T>()?;
            for (y, (i, j)) in acc
                .iter_mut()
                .zip(StridedPairs::new(args.lhs.layout(), args.rhs.layout()))
            {
                *y = a[i].elem_mul_add(x[j], *y);
            }
        }
    }
    Ok(())
}

/// [`binary`] for whatever dtype `args` carries
pub fn binary_storage(
    op: BinaryOp,
    args: &BinaryArgs<'_>,
    out: &mut Storage,
    parallelism: Parallelism,
) -> Result<()> {
    dispatch_dtype!(args.dtype(), T => {
        binary::<T>(op, args, out, parallelism)
    }, op.name())
}

/// [`fused_mul_add`] for whatever dtype `args` carries
pub fn fused_mul_add_storage(
    args: &BinaryArgs<'_>,
    acc: &mut Storage,
    parallelism: Parallelism,
) -> Result<()> {
    dispatch_dtype!(args.dtype(), T => {
        fused_mul_add::<T>(args, acc, parallelism)
    }, "fma")
}
