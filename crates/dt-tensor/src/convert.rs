//! Element-wise half-precision conversion between tensors.
//!
//! Same policy as quantization: the plain functions skip silently on a
//! representation or element-count mismatch, the `try_` variants report it.

use crate::dtype::DType;
use crate::error::Result;
use crate::half_codec::{decode_half, encode_half};
use crate::quant::check_pair;
use crate::tensor::Tensor;

/// Encode an F32 tensor into an F16 tensor.
pub fn try_encode_tensor_f16(src: &Tensor, dst: &mut Tensor) -> Result<()> {
    check_pair(src, DType::F32, dst, DType::F16)?;
    let input = src.as_f32_slice()?;
    let output = dst.as_f16_bits_mut()?;
    for (h, &x) in output.iter_mut().zip(input) {
        *h = encode_half(x);
    }
    Ok(())
}

/// Decode an F16 tensor into an F32 tensor.
pub fn try_decode_tensor_f16(src: &Tensor, dst: &mut Tensor) -> Result<()> {
    check_pair(src, DType::F16, dst, DType::F32)?;
    let input = src.as_f16_bits()?;
    let output = dst.as_f32_slice_mut()?;
    for (x, &h) in output.iter_mut().zip(input) {
        *x = decode_half(h);
    }
    Ok(())
}

pub fn encode_tensor_f16(src: &Tensor, dst: &mut Tensor) {
    if let Err(e) = try_encode_tensor_f16(src, dst) {
        log::debug!("f16 encode skipped: {}", e);
    }
}

pub fn decode_tensor_f16(src: &Tensor, dst: &mut Tensor) {
    if let Err(e) = try_decode_tensor_f16(src, dst) {
        log::debug!("f16 decode skipped: {}", e);
    }
}
