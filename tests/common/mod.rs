//! Helpers shared by the integration tests
#![allow(dead_code)]

use std::fmt::Display;

use num_traits::Float;
use numarith::dtype::{DType, DTypeSet};
use numarith::engine::{self, Capabilities, EngineRef, Float32Engine, Float64Engine, Restricted, StdEngine};
use numarith::ops::expects_exact;
use numarith::tensor::{Storage, Tensor};

/// Shared handle to the generic engine
pub fn std_engine() -> EngineRef {
    engine::shared(StdEngine::new())
}

/// The generic engine with its Fmaer hidden, forcing the mul + add fallback
pub fn unfused_engine() -> EngineRef {
    engine::shared(Restricted::new(std_engine(), Capabilities::UNFUSED))
}

pub fn float64_engine() -> EngineRef {
    engine::shared(Float64Engine)
}

pub fn float32_engine() -> EngineRef {
    engine::shared(Float32Engine)
}

/// Engines that run every numeric dtype
pub fn generic_engines() -> Vec<(&'static str, EngineRef)> {
    vec![("std", std_engine()), ("unfused", unfused_engine())]
}

/// Shape pairs that broadcast, one-element and 0-d tensors included
pub const SHAPE_PAIRS: [(&[usize], &[usize]); 8] = [
    (&[2, 1], &[3]),
    (&[3], &[2, 3]),
    (&[2, 1, 2], &[3, 1]),
    (&[4], &[4]),
    (&[1], &[4]),
    (&[1, 1], &[2, 2]),
    (&[], &[3]),
    (&[1], &[1, 1]),
];

/// Every dtype arithmetic accepts
pub fn numeric_dtypes() -> Vec<DType> {
    DTypeSet::NUMERIC.iter().collect()
}

/// Build a tensor of `dtype` from f64 values
pub fn tensor_of(dtype: DType, values: &[f64], shape: &[usize], engine: &EngineRef) -> Tensor {
    Tensor::from_storage(Storage::from_f64s(dtype, values), shape, engine)
        .expect("values fill the shape")
}

/// Elementwise `|got - want| <= atol + rtol * |want|`
fn assert_close<T: Float + Display>(got: &[T], want: &[T], rtol: T, atol: T, msg: &str) {
    assert_eq!(got.len(), want.len(), "{msg}: {} values, expected {}", got.len(), want.len());
    for (i, (&g, &w)) in got.iter().zip(want).enumerate() {
        let tol = atol + rtol * w.abs();
        assert!((g - w).abs() <= tol, "{msg}: [{i}] = {g}, expected {w} (tol {tol})");
    }
}

pub fn assert_allclose_f64(got: &[f64], want: &[f64], rtol: f64, atol: f64, msg: &str) {
    assert_close(got, want, rtol, atol, msg);
}

pub fn assert_allclose_f32(got: &[f32], want: &[f32], rtol: f32, atol: f32, msg: &str) {
    assert_close(got, want, rtol, atol, msg);
}

/// Compare two tensors of the same dtype and shape
///
/// Integer tensors must match exactly, float tensors within a tolerance.
pub fn assert_tensors_match(got: &Tensor, want: &Tensor, msg: &str) {
    assert_eq!(got.dtype(), want.dtype(), "{}: dtype mismatch", msg);
    assert_eq!(got.shape(), want.shape(), "{}: shape mismatch", msg);
    if expects_exact(got.dtype()) {
        assert_eq!(got.storage(), want.storage(), "{}: values differ", msg);
        return;
    }
    let values = |t: &Tensor| -> Vec<f64> {
        (0..t.numel())
            .map(|i| t.get(i).map_or(f64::NAN, |s| s.to_f64()))
            .collect()
    };
    assert_allclose_f64(&values(got), &values(want), 1e-5, 1e-6, msg);
}
