//! Scale quantization between F32 and I8 tensors.
//!
//! `q = trunc(x / scale)` clamped to `[-128, 127]`, and `x' = q * scale` on
//! the way back. The round trip loses up to one `scale` unit per element
//! (truncation) plus anything outside the clamp range.
//!
//! [`quantize`] and [`dequantize`] skip silently when the representations or
//! element counts do not line up; [`try_quantize`] and [`try_dequantize`]
//! report the same conditions as errors. A zero scale is not guarded and
//! follows IEEE division semantics.

use crate::dtype::DType;
use crate::error::{Result, TensorError};
use crate::tensor::Tensor;

const I8_MIN: f32 = i8::MIN as f32;
const I8_MAX: f32 = i8::MAX as f32;

/// Check that `src`/`dst` have the expected representations and equal
/// element counts.
pub(crate) fn check_pair(src: &Tensor, src_dtype: DType, dst: &Tensor, dst_dtype: DType) -> Result<()> {
    if src.dtype() != src_dtype {
        return Err(TensorError::DTypeMismatch {
            expected: src_dtype,
            got: src.dtype(),
        });
    }
    if dst.dtype() != dst_dtype {
        return Err(TensorError::DTypeMismatch {
            expected: dst_dtype,
            got: dst.dtype(),
        });
    }
    if src.numel() != dst.numel() {
        return Err(TensorError::ShapeMismatch {
            expected: src.numel(),
            got: dst.numel(),
        });
    }
    Ok(())
}

/// Quantize a single value.
///
/// The clamp is applied to the float before narrowing, so the cast never
/// sees an out-of-range value. NaN narrows to 0.
#[inline]
pub fn quantize_value(x: f32, scale: f32) -> i8 {
    let mut v = x / scale;
    if v > I8_MAX {
        v = I8_MAX;
    }
    if v < I8_MIN {
        v = I8_MIN;
    }
    v as i8
}

/// Dequantize a single value.
#[inline]
pub fn dequantize_value(q: i8, scale: f32) -> f32 {
    f32::from(q) * scale
}

/// Quantize an F32 tensor into an I8 tensor of the same element count.
///
/// # Errors
/// [`TensorError::DTypeMismatch`] if `src` is not F32 or `dst` is not I8,
/// [`TensorError::ShapeMismatch`] if the element counts differ. `dst` is left
/// untouched on error.
pub fn try_quantize(src: &Tensor, dst: &mut Tensor, scale: f32) -> Result<()> {
    check_pair(src, DType::F32, dst, DType::I8)?;
    let input = src.as_f32_slice()?;
    let output = dst.as_i8_slice_mut()?;
    for (q, &x) in output.iter_mut().zip(input) {
        *q = quantize_value(x, scale);
    }
    Ok(())
}

/// Dequantize an I8 tensor into an F32 tensor of the same element count.
///
/// # Errors
/// Same conditions as [`try_quantize`] with the representations swapped.
pub fn try_dequantize(src: &Tensor, dst: &mut Tensor, scale: f32) -> Result<()> {
    check_pair(src, DType::I8, dst, DType::F32)?;
    let input = src.as_i8_slice()?;
    let output = dst.as_f32_slice_mut()?;
    for (x, &q) in output.iter_mut().zip(input) {
        *x = dequantize_value(q, scale);
    }
    Ok(())
}

/// Quantize `src` into `dst`, doing nothing if the pair is invalid.
pub fn quantize(src: &Tensor, dst: &mut Tensor, scale: f32) {
    if let Err(e) = try_quantize(src, dst, scale) {
        log::debug!("quantize skipped: {}", e);
    }
}

/// Dequantize `src` into `dst`, doing nothing if the pair is invalid.
pub fn dequantize(src: &Tensor, dst: &mut Tensor, scale: f32) {
    if let Err(e) = try_dequantize(src, dst, scale) {
        log::debug!("dequantize skipped: {}", e);
    }
}
