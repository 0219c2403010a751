use dt_tensor::Tensor;

/// Opaque tensor handle owned by the C caller.
///
/// Created by `dt_tensor_create`, released by `dt_tensor_free`.
pub struct DTTensor {
    pub tensor: Tensor,
}

impl DTTensor {
    pub fn new(tensor: Tensor) -> Self {
        Self { tensor }
    }
}
