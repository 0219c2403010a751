//! `dt-tensor` - Typed 2-D tensors with half-precision and int8 conversions.
//!
//! This crate provides:
//! - A `Tensor` type owning F32, F16 or I8 CPU storage
//! - A truncating f32 <-> f16 bit codec
//! - Scale quantization from F32 to I8 and back
//! - Memory usage reporting per representation

pub mod convert;
pub mod dtype;
pub mod error;
pub mod half_codec;
pub mod memory;
pub mod quant;
pub mod shape;
pub mod storage;
pub mod tensor;

// Re-export primary types at the crate root for convenience.
pub use convert::{decode_tensor_f16, encode_tensor_f16, try_decode_tensor_f16, try_encode_tensor_f16};
pub use dtype::DType;
pub use error::{Result, TensorError};
pub use half_codec::{decode_half, encode_half};
pub use memory::MemoryUsage;
pub use quant::{dequantize, quantize, try_dequantize, try_quantize};
pub use shape::Shape;
pub use storage::CpuStorage;
pub use tensor::{release, Tensor};
