//! Integration tests for the binary arithmetic operations

mod common;

use common::{float32_engine, float64_engine, std_engine, tensor_of};
use numarith::dtype::{DType, Scalar};
use numarith::engine::{self, Capability, EngineRef, Parallelism, Restricted, StdEngine};
use numarith::error::{Error, ErrorKind};
use numarith::ops::{self, BinaryOp, OpOptions};
use numarith::tensor::{Data, Tensor};

// ============================================================================
// Scalar/tensor pairings
// ============================================================================

#[test]
fn test_mul_scalar_scalar() {
    let e = std_engine();
    let a = Tensor::from_slice(&[2.0f64], &[1], &e);
    let b = Tensor::from_slice(&[3.0f64], &[1], &e);

    let c = ops::mul(&a, &b).unwrap();
    assert!(c.is_scalar());
    assert_eq!(c.data(), Data::Scalar(Scalar::F64(6.0)));

    // loose scalar on either side of a one-element tensor
    let c = ops::mul(&a, 3.0f64).unwrap();
    assert_eq!(c.data().as_scalar::<f64>(), Some(6.0));
    let c = ops::mul(3.0f64, &a).unwrap();
    assert_eq!(c.data().as_scalar::<f64>(), Some(6.0));
}

#[test]
fn test_scalar_scalar_all_ops() {
    let e = std_engine();
    let a = Tensor::scalar(6.0f64, &e);
    let b = Tensor::scalar(4.0f64, &e);

    let cases = [
        (BinaryOp::Add, 10.0),
        (BinaryOp::Sub, 2.0),
        (BinaryOp::Mul, 24.0),
        (BinaryOp::Div, 1.5),
        (BinaryOp::Mod, 2.0),
        (BinaryOp::Pow, 1296.0),
    ];
    for (op, want) in cases {
        let c = ops::dispatch(op, (&a).into(), (&b).into(), OpOptions::new()).unwrap();
        assert_eq!(c.shape(), &[] as &[usize], "{op}");
        assert_eq!(c.item::<f64>().unwrap(), want, "{op}");
    }
}

#[test]
fn test_scalar_tensor() {
    let e = std_engine();
    let t = Tensor::from_slice(&[3.0f64, 2.0], &[2], &e);

    assert_eq!(ops::mul(&t, 2.0f64).unwrap().to_vec::<f64>(), [6.0, 4.0]);
    assert_eq!(ops::mul(2.0f64, &t).unwrap().to_vec::<f64>(), [6.0, 4.0]);
    assert_eq!(ops::add(&t, 2.0f64).unwrap().to_vec::<f64>(), [5.0, 4.0]);
    assert_eq!(ops::add(2.0f64, &t).unwrap().to_vec::<f64>(), [5.0, 4.0]);
    assert_eq!(ops::sub(&t, 2.0f64).unwrap().to_vec::<f64>(), [1.0, 0.0]);
    assert_eq!(ops::sub(2.0f64, &t).unwrap().to_vec::<f64>(), [-1.0, 0.0]);
    assert_eq!(ops::pow(&t, 2.0f64).unwrap().to_vec::<f64>(), [9.0, 4.0]);
    assert_eq!(ops::pow(2.0f64, &t).unwrap().to_vec::<f64>(), [8.0, 4.0]);
}

#[test]
fn test_div_scalar_tensor() {
    let e = std_engine();
    let t = Tensor::from_slice(&[6.0f64, 4.0], &[2], &e);
    assert_eq!(ops::div(&t, 2.0f64).unwrap().to_vec::<f64>(), [3.0, 2.0]);

    let t = Tensor::from_slice(&[3.0f64, 2.0], &[2], &e);
    assert_eq!(ops::div(6.0f64, &t).unwrap().to_vec::<f64>(), [2.0, 3.0]);
}

#[test]
fn test_tensor_tensor() {
    let e = std_engine();
    let a = Tensor::from_slice(&[3.0f64, 5.0], &[2], &e);
    let b = Tensor::from_slice(&[7.0f64, 2.0], &[2], &e);

    assert_eq!(ops::mul(&a, &b).unwrap().to_vec::<f64>(), [21.0, 10.0]);
    assert_eq!(ops::mul(&b, &a).unwrap().to_vec::<f64>(), [21.0, 10.0]);
    assert_eq!(ops::add(&a, &b).unwrap().to_vec::<f64>(), [10.0, 7.0]);
    assert_eq!(ops::sub(&a, &b).unwrap().to_vec::<f64>(), [-4.0, 3.0]);

    let a = Tensor::from_slice(&[3.0f64, 10.0], &[2], &e);
    assert_eq!(ops::pow(&a, &b).unwrap().to_vec::<f64>(), [2187.0, 100.0]);
}

#[test]
fn test_mod() {
    let e = std_engine();
    let a = Tensor::from_slice(&[1.0f64, 2.0, 3.0, 4.0], &[4], &e);
    let ones = Tensor::from_slice(&[1.0f64, 1.0, 1.0, 1.0], &[4], &e);

    assert_eq!(ops::rem(&a, &ones).unwrap().to_vec::<f64>(), [0.0; 4]);
    assert_eq!(ops::rem(&a, 1.0f64).unwrap().to_vec::<f64>(), [0.0; 4]);
}

#[test]
fn test_mod_takes_sign_of_dividend() {
    let e = std_engine();
    let a = Tensor::from_slice(&[-1.0f64, 1.0, -7.5], &[3], &e);
    assert_eq!(ops::rem(&a, 2.0f64).unwrap().to_vec::<f64>(), [-1.0, 1.0, -1.5]);

    let a = Tensor::from_slice(&[-7i32, 7], &[2], &e);
    assert_eq!(ops::rem(&a, 2i32).unwrap().to_vec::<i32>(), [-1, 1]);
}

#[test]
fn test_integer_ops() {
    let e = std_engine();
    let a = Tensor::from_slice(&[7i64, -7, 9], &[3], &e);

    assert_eq!(ops::div(&a, 2i64).unwrap().to_vec::<i64>(), [3, -3, 4]);
    assert_eq!(ops::pow(&a, 2i64).unwrap().to_vec::<i64>(), [49, 49, 81]);

    let small = Tensor::from_slice(&[250u8, 10], &[2], &e);
    assert_eq!(ops::add(&small, 10u8).unwrap().to_vec::<u8>(), [4, 20]);
    assert_eq!(ops::sub(&small, 20u8).unwrap().to_vec::<u8>(), [230, 246]);
}

// ============================================================================
// Broadcasting
// ============================================================================

#[test]
fn test_broadcast() {
    let e = std_engine();
    let col = Tensor::from_slice(&[1.0f32, 2.0], &[2, 1], &e);
    let row = Tensor::from_slice(&[10.0f32, 20.0, 30.0], &[3], &e);

    let c = ops::add(&col, &row).unwrap();
    assert_eq!(c.shape(), &[2, 3]);
    assert_eq!(c.to_vec::<f32>(), [11.0, 21.0, 31.0, 12.0, 22.0, 32.0]);
}

#[test]
fn test_broadcast_error() {
    let e = std_engine();
    let a = Tensor::from_slice(&[1.0f64, 2.0], &[2], &e);
    let b = Tensor::from_slice(&[1.0f64, 2.0, 3.0], &[3], &e);

    let err = ops::add(&a, &b).unwrap_err();
    assert_eq!(err, Error::broadcast(&[2], &[3]));
    assert_eq!(err.kind(), ErrorKind::ShapeMismatch);
}

#[test]
fn test_one_element_tensor_broadcasts_like_a_scalar() {
    let e = std_engine();
    let one = Tensor::from_slice(&[2.0f64], &[1, 1], &e);
    let t = Tensor::from_slice(&[1.0f64, 2.0, 3.0, 4.0, 5.0, 6.0], &[2, 3], &e);

    let c = ops::mul(&t, &one).unwrap();
    assert_eq!(c.shape(), &[2, 3]);
    assert_eq!(c.to_vec::<f64>(), [2.0, 4.0, 6.0, 8.0, 10.0, 12.0]);
}

// ============================================================================
// Dtypes and engines
// ============================================================================

#[test]
fn test_promotion() {
    let e = std_engine();
    let a = Tensor::from_slice(&[1i32, 2], &[2], &e);
    let b = Tensor::from_slice(&[0.5f64, 0.25], &[2], &e);

    let c = ops::add(&a, &b).unwrap();
    assert_eq!(c.dtype(), DType::F64);
    assert_eq!(c.to_vec::<f64>(), [1.5, 2.25]);

    let wide = Tensor::from_slice(&[1i64, 2], &[2], &e);
    let err = ops::add(&wide, &b).unwrap_err();
    assert_eq!(
        err,
        Error::DTypeMismatch {
            lhs: DType::I64,
            rhs: DType::F64
        }
    );
}

#[test]
fn test_every_numeric_dtype() {
    let e = std_engine();
    for dtype in DType::ALL.into_iter().filter(|d| d.is_numeric()) {
        let a = tensor_of(dtype, &[8.0, 9.0], &[2], &e);
        let b = tensor_of(dtype, &[2.0, 4.0], &[2], &e);

        let checks = [
            (BinaryOp::Add, [10.0, 13.0]),
            (BinaryOp::Sub, [6.0, 5.0]),
            (BinaryOp::Mul, [16.0, 36.0]),
            (BinaryOp::Div, [4.0, 2.25]),
            (BinaryOp::Mod, [0.0, 1.0]),
            (BinaryOp::Pow, [64.0, 6561.0]),
        ];
        for (op, want) in checks {
            if dtype.size_in_bytes() == 1 && op == BinaryOp::Pow {
                // 9^4 wraps in one byte
                continue;
            }
            let want = if dtype.is_int() && op == BinaryOp::Div {
                [4.0, 2.0]
            } else {
                want
            };
            let c = ops::dispatch(op, (&a).into(), (&b).into(), OpOptions::new()).unwrap();
            let want = tensor_of(dtype, &want, &[2], &e);
            common::assert_tensors_match(&c, &want, &format!("{op} {dtype}"));
        }
    }
}

#[test]
fn test_bool_unsupported() {
    let e = std_engine();
    let t = tensor_of(DType::Bool, &[1.0, 0.0], &[2], &e);
    for op in BinaryOp::ALL {
        let err = ops::dispatch(op, (&t).into(), (&t).into(), OpOptions::new()).unwrap_err();
        assert_eq!(err, Error::unsupported_dtype(DType::Bool, op.name()));
    }
}

#[test]
fn test_float_engines() {
    let e64 = float64_engine();
    let a = Tensor::from_slice(&[1.0f64, 2.0], &[2], &e64);
    assert_eq!(ops::mul(&a, 3.0f64).unwrap().to_vec::<f64>(), [3.0, 6.0]);

    let e32 = float32_engine();
    let a = Tensor::from_slice(&[1.0f32, 2.0], &[2], &e32);
    assert_eq!(ops::add(&a, &a).unwrap().to_vec::<f32>(), [2.0, 4.0]);

    let ints = Tensor::from_slice(&[1i32, 2], &[2], &e64);
    let err = ops::add(&ints, &ints).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TypeMismatch);
}

#[test]
fn test_parallel_split_matches_sequential() {
    let split = StdEngine::with_parallelism(Parallelism::new(16));
    assert_eq!(split.parallelism().min_len(), 16);
    let split = engine::shared(split);
    let seq = engine::shared(StdEngine::with_parallelism(Parallelism::sequential()));

    let values: Vec<i64> = (0..1000).map(|v| v * 7 - 3000).collect();
    let row: Vec<i64> = (1..=40).collect();
    for op in [BinaryOp::Add, BinaryOp::Sub, BinaryOp::Mul, BinaryOp::Div, BinaryOp::Mod] {
        let run = |e: &EngineRef| {
            let a = Tensor::from_slice(&values, &[25, 40], e);
            let b = Tensor::from_slice(&row, &[40], e);
            let dense = ops::dispatch(op, (&a).into(), (&a).into(), OpOptions::new());
            let wide = ops::dispatch(op, (&a).into(), (&b).into(), OpOptions::new());
            (dense.map(|t| t.to_vec::<i64>()), wide.map(|t| t.to_vec::<i64>()))
        };
        assert_eq!(run(&split), run(&seq), "{op}");
    }

    let a = Tensor::from_slice(&values, &[1000], &split);
    let mut y = Tensor::from_slice(&values, &[1000], &split);
    ops::fma(&a, 2i64, &mut y).unwrap();
    assert_eq!(y.to_vec::<i64>()[999], 3993 * 3);
}

#[test]
fn test_capability_gating() {
    let e = engine::shared(Restricted::new(std_engine(), [Capability::Adder]));
    let a = Tensor::from_slice(&[1.0f64, 2.0], &[2], &e);

    assert_eq!(ops::add(&a, &a).unwrap().to_vec::<f64>(), [2.0, 4.0]);
    let err = ops::sub(&a, &a).unwrap_err();
    assert_eq!(err, Error::unsupported_operation("restricted", "sub"));
    let err = ops::rem(&a, 1.0f64).unwrap_err();
    assert_eq!(err, Error::unsupported_operation("restricted", "mod"));
}

#[test]
fn test_two_loose_scalars() {
    let err = ops::add(1.0f64, 2.0f64).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
}

// ============================================================================
// Arithmetic domain
// ============================================================================

#[test]
fn test_integer_division_by_zero() {
    let e = std_engine();
    let a = Tensor::from_slice(&[4i32, 5], &[2], &e);
    let b = Tensor::from_slice(&[2i32, 0], &[2], &e);

    let err = ops::div(&a, &b).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ArithmeticDomain);
    let err = ops::rem(&a, &b).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ArithmeticDomain);
}

#[test]
fn test_float_division_by_zero_is_ieee() {
    let e = std_engine();
    let a = Tensor::from_slice(&[1.0f64, -1.0, 0.0], &[3], &e);
    let c = ops::div(&a, 0.0f64).unwrap().to_vec::<f64>();
    assert_eq!(c[0], f64::INFINITY);
    assert_eq!(c[1], f64::NEG_INFINITY);
    assert!(c[2].is_nan());
}

#[test]
fn test_negative_integer_exponent() {
    let e = std_engine();
    let a = Tensor::from_slice(&[2i32, 3], &[2], &e);
    let err = ops::pow(&a, -1i32).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ArithmeticDomain);
}

// ============================================================================
// Targets
// ============================================================================

#[test]
fn test_incr_accumulates() {
    let e = std_engine();
    let a = Tensor::from_slice(&[1.0f64, 2.0], &[2], &e);
    let b = Tensor::from_slice(&[3.0f64, 4.0], &[2], &e);
    let mut acc = Tensor::from_slice(&[10.0f64, 10.0], &[2], &e);

    let out = ops::mul_with(&a, &b, OpOptions::new().incr(&mut acc)).unwrap();
    assert_eq!(out.to_vec::<f64>(), [13.0, 18.0]);
    assert_eq!(acc.to_vec::<f64>(), [13.0, 18.0]);

    ops::mul_with(&a, &b, OpOptions::new().incr(&mut acc)).unwrap();
    assert_eq!(acc.to_vec::<f64>(), [16.0, 26.0]);
}

#[test]
fn test_reuse_overwrites() {
    let e = std_engine();
    let a = Tensor::from_slice(&[1i16, 2], &[2], &e);
    let mut out = Tensor::from_slice(&[100i16, 100], &[2], &e);

    let returned = ops::sub_with(&a, 1i16, OpOptions::new().reuse(&mut out)).unwrap();
    assert_eq!(returned.to_vec::<i16>(), [0, 1]);
    assert_eq!(out.to_vec::<i16>(), [0, 1]);
}

#[test]
fn test_incr_and_reuse_together() {
    let e = std_engine();
    let a = Tensor::from_slice(&[1.0f64], &[1], &e);
    let mut x = Tensor::empty(DType::F64, &[1], &e);
    let mut y = Tensor::empty(DType::F64, &[1], &e);

    let err = ops::add_with(&a, &a, OpOptions::new().incr(&mut x).reuse(&mut y)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
}

#[test]
fn test_target_checked_before_any_work() {
    let e = std_engine();
    let a = Tensor::from_slice(&[1.0f64, 2.0], &[2], &e);

    let mut wrong_shape = Tensor::from_slice(&[5.0f64, 5.0, 5.0], &[3], &e);
    let err = ops::add_with(&a, &a, OpOptions::new().reuse(&mut wrong_shape)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ShapeMismatch);
    assert_eq!(wrong_shape.to_vec::<f64>(), [5.0, 5.0, 5.0]);

    let mut wrong_dtype = Tensor::from_slice(&[5.0f32, 5.0], &[2], &e);
    let err = ops::add_with(&a, &a, OpOptions::new().incr(&mut wrong_dtype)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TypeMismatch);
    assert_eq!(wrong_dtype.to_vec::<f32>(), [5.0, 5.0]);
}

#[test]
fn test_failed_kernel_leaves_target_untouched() {
    let e = std_engine();
    let a = Tensor::from_slice(&[4u32, 5, 6], &[3], &e);
    let b = Tensor::from_slice(&[2u32, 1, 0], &[3], &e);
    let mut acc = Tensor::from_slice(&[1u32, 1, 1], &[3], &e);

    let err = ops::div_with(&a, &b, OpOptions::new().incr(&mut acc)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ArithmeticDomain);
    assert_eq!(acc.to_vec::<u32>(), [1, 1, 1]);
}

#[test]
fn test_incr_needs_adder() {
    let e = engine::shared(Restricted::new(std_engine(), [Capability::Multiplier]));
    let a = Tensor::from_slice(&[1.0f64, 2.0], &[2], &e);
    let mut acc = Tensor::empty(DType::F64, &[2], &e);

    let err = ops::mul_with(&a, &a, OpOptions::new().incr(&mut acc)).unwrap_err();
    assert_eq!(err, Error::unsupported_operation("restricted", "add"));
    assert_eq!(ops::mul(&a, &a).unwrap().to_vec::<f64>(), [1.0, 4.0]);
}
