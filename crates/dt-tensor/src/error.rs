use thiserror::Error;

use crate::dtype::DType;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TensorError {
    #[error("failed to allocate storage for {elements} {dtype} elements")]
    Allocation { elements: u32, dtype: DType },
    #[error("dtype mismatch: expected {expected}, got {got}")]
    DTypeMismatch { expected: DType, got: DType },
    #[error("element count mismatch: expected {expected}, got {got}")]
    ShapeMismatch { expected: usize, got: usize },
    #[error("index {index} out of bounds for tensor with {len} elements")]
    IndexOutOfBounds { index: usize, len: usize },
}

pub type Result<T> = std::result::Result<T, TensorError>;
