//! The `Tensor` handle

use super::{Layout, Storage};
use crate::dtype::{DType, Element, Scalar};
use crate::engine::EngineRef;
use crate::error::{Error, Result};
use std::fmt;
use std::sync::Arc;

/// N-dimensional array bound to a compute engine
///
/// `Tensor` consists of:
/// - **Storage**: an exclusively owned, contiguous row-major buffer
/// - **Layout**: the shape (an empty shape is a 0-d scalar)
/// - **Engine**: a shared handle to the engine that executes operations on it
///
/// Cloning copies the storage and shares the engine handle.
///
/// # Example
///
/// ```
/// use numarith::prelude::*;
///
/// let engine = engine::shared(StdEngine::new());
/// let a = Tensor::from_slice(&[1.0f64, 2.0, 3.0, 4.0], &[2, 2], &engine);
/// assert_eq!(a.shape(), &[2, 2]);
/// assert_eq!(a.dtype(), DType::F64);
/// ```
#[derive(Clone)]
pub struct Tensor {
    storage: Storage,
    layout: Layout,
    engine: EngineRef,
}

/// Contents of a tensor, as returned by [`Tensor::data`]
///
/// A 0-d tensor yields a bare [`Scalar`], anything else yields its storage,
/// so `5.0` and `[5.0]` stay distinguishable.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Data<'a> {
    /// The value of a 0-d tensor
    Scalar(Scalar),
    /// The elements of a tensor with at least one dimension
    Slice(&'a Storage),
}

impl<'a> Data<'a> {
    /// Whether this is a bare scalar
    pub fn is_scalar(&self) -> bool {
        matches!(self, Self::Scalar(_))
    }

    /// The bare scalar as `T`, if this is a scalar of exactly that type
    pub fn as_scalar<T: Element>(&self) -> Option<T> {
        match self {
            Self::Scalar(s) => s.to::<T>(),
            Self::Slice(_) => None,
        }
    }

    /// The elements as `&[T]`, if this is a sequence of exactly that type
    pub fn as_slice<T: Element>(&self) -> Option<&'a [T]> {
        match self {
            Self::Scalar(_) => None,
            Self::Slice(storage) => storage.as_slice::<T>(),
        }
    }
}

impl Tensor {
    /// Create a tensor from storage and a shape
    ///
    /// Fails with `ShapeMismatch` if the storage length does not equal the
    /// product of the shape dimensions.
    pub fn from_storage(storage: Storage, shape: &[usize], engine: &EngineRef) -> Result<Self> {
        let layout = Layout::contiguous(shape);
        if storage.len() != layout.elem_count() {
            return Err(Error::ShapeMismatch {
                expected: shape.to_vec(),
                got: vec![storage.len()],
            });
        }
        Ok(Self {
            storage,
            layout,
            engine: Arc::clone(engine),
        })
    }

    /// Create a tensor from storage, as a 1-d vector unless `shape` is given
    ///
    /// ```
    /// use numarith::prelude::*;
    /// use numarith::tensor::Storage;
    ///
    /// let engine = engine::shared(StdEngine::new());
    /// let v = Tensor::from_data(Storage::from_f64s(DType::I16, &[1.0, 2.0, 3.0]), None, &engine)?;
    /// assert_eq!(v.shape(), &[3]);
    /// # Ok::<(), numarith::error::Error>(())
    /// ```
    pub fn from_data(storage: Storage, shape: Option<&[usize]>, engine: &EngineRef) -> Result<Self> {
        match shape {
            Some(shape) => Self::from_storage(storage, shape, engine),
            None => Ok(Self::vector(storage, engine)),
        }
    }

    /// 1-d tensor owning `data`, its length taken as the shape
    pub fn from_vec1<T: Element>(data: Vec<T>, engine: &EngineRef) -> Self {
        Self::vector(T::into_storage(data), engine)
    }

    fn vector(storage: Storage, engine: &EngineRef) -> Self {
        Self {
            layout: Layout::contiguous(&[storage.len()]),
            storage,
            engine: Arc::clone(engine),
        }
    }

    /// Copy `data` into a new tensor of `shape`
    ///
    /// # Panics
    ///
    /// When `data` does not fill `shape` exactly. [`Self::try_from_slice`]
    /// reports that as an error instead.
    pub fn from_slice<T: Element>(data: &[T], shape: &[usize], engine: &EngineRef) -> Self {
        Self::try_from_slice(data, shape, engine).expect("Tensor::from_slice failed")
    }

    /// Copy `data` into a new tensor of `shape`, or `ShapeMismatch`
    pub fn try_from_slice<T: Element>(
        data: &[T],
        shape: &[usize],
        engine: &EngineRef,
    ) -> Result<Self> {
        Self::from_vec(data.to_vec(), shape, engine)
    }

    /// Create a tensor that takes ownership of `data`
    pub fn from_vec<T: Element>(data: Vec<T>, shape: &[usize], engine: &EngineRef) -> Result<Self> {
        Self::from_storage(T::into_storage(data), shape, engine)
    }

    /// Create a 0-d tensor holding `value`
    pub fn scalar(value: impl Into<Scalar>, engine: &EngineRef) -> Self {
        Self {
            storage: Storage::from_scalar(value.into()),
            layout: Layout::scalar(),
            engine: Arc::clone(engine),
        }
    }

    /// Create a zero-filled tensor
    pub fn empty(dtype: DType, shape: &[usize], engine: &EngineRef) -> Self {
        let layout = Layout::contiguous(shape);
        Self {
            storage: Storage::zeros(dtype, layout.elem_count()),
            layout,
            engine: Arc::clone(engine),
        }
    }

    /// Create a 1-d tensor counting `start, start + 1, ..., end - 1`
    pub fn range(dtype: DType, start: i64, end: i64, engine: &EngineRef) -> Self {
        Self::vector(Storage::range(dtype, start, end), engine)
    }

    /// Backing buffer
    #[inline]
    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    /// Row-major layout of the buffer
    #[inline]
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Dimensions
    #[inline]
    pub fn shape(&self) -> &[usize] {
        self.layout.shape()
    }

    /// Rank
    #[inline]
    pub fn ndim(&self) -> usize {
        self.layout.ndim()
    }

    /// Element count, 1 for a 0-d tensor
    #[inline]
    pub fn numel(&self) -> usize {
        self.layout.elem_count()
    }

    /// Element type of the buffer
    #[inline]
    pub fn dtype(&self) -> DType {
        self.storage.dtype()
    }

    /// Rank zero
    #[inline]
    pub fn is_scalar(&self) -> bool {
        self.layout.is_scalar()
    }

    /// Exactly one element, whatever the rank
    ///
    /// Binary operations classify such tensors as scalars.
    #[inline]
    pub fn is_scalar_like(&self) -> bool {
        self.numel() == 1
    }

    /// Engine the tensor runs on
    #[inline]
    pub fn engine(&self) -> &EngineRef {
        &self.engine
    }

    /// Rebind this tensor to another engine
    pub fn set_engine(&mut self, engine: &EngineRef) {
        self.engine = Arc::clone(engine);
    }

    /// Builder form of [`Self::set_engine`]
    pub fn with_engine(mut self, engine: &EngineRef) -> Self {
        self.set_engine(engine);
        self
    }

    /// The contents: a bare scalar for 0-d tensors, the storage otherwise
    pub fn data(&self) -> Data<'_> {
        match self.storage.get(0) {
            Some(value) if self.is_scalar() => Data::Scalar(value),
            _ => Data::Slice(&self.storage),
        }
    }

    /// Copy tensor data to a Vec
    ///
    /// # Panics
    ///
    /// Panics if `T` is not the tensor's element type.
    pub fn to_vec<T: Element>(&self) -> Vec<T> {
        match self.storage.as_slice::<T>() {
            Some(values) => values.to_vec(),
            None => panic!(
                "Tensor::to_vec: tensor holds {}, not {}",
                self.dtype(),
                T::DTYPE
            ),
        }
    }

    /// Element at row-major position `index`
    pub fn get(&self, index: usize) -> Option<Scalar> {
        self.storage.get(index)
    }

    /// Extract the value of a single-element tensor
    pub fn item<T: Element>(&self) -> Result<T> {
        if self.numel() != 1 {
            return Err(Error::ShapeMismatch {
                expected: vec![1],
                got: self.shape().to_vec(),
            });
        }
        self.get(0)
            .and_then(T::from_scalar)
            .ok_or(Error::DTypeMismatch {
                lhs: self.dtype(),
                rhs: T::DTYPE,
            })
    }

    /// Reset every element to `value`
    ///
    /// `value` must widen losslessly into the tensor's dtype.
    pub fn memset(&mut self, value: impl Into<Scalar>) -> Result<()> {
        self.storage.fill(value.into())
    }

    /// Swap in a freshly computed buffer of the same dtype and length
    pub(crate) fn replace_storage(&mut self, storage: Storage) {
        debug_assert_eq!(storage.dtype(), self.dtype());
        debug_assert_eq!(storage.len(), self.numel());
        self.storage = storage;
    }
}

impl fmt::Debug for Tensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tensor")
            .field("shape", &self.shape())
            .field("dtype", &self.dtype())
            .field("engine", &self.engine.name())
            .finish()
    }
}

impl fmt::Display for Tensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tensor({:?}, dtype={})", self.shape(), self.dtype())
    }
}
