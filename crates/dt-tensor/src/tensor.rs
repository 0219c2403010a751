use std::fmt;

use crate::dtype::DType;
use crate::error::{Result, TensorError};
use crate::half_codec::decode_half;
use crate::shape::Shape;
use crate::storage::CpuStorage;

/// A rectangular tensor that exclusively owns its typed storage.
///
/// The representation and extents are fixed at allocation. Elements are
/// written in place through the typed slice accessors, or by conversion
/// routines that read one tensor and write a different one.
#[derive(Debug, Clone, PartialEq)]
pub struct Tensor {
    storage: CpuStorage,
    shape: Shape,
}

impl Tensor {
    /// Allocate a zero-filled tensor of `rows * cols` elements.
    ///
    /// # Errors
    /// Returns [`TensorError::Allocation`] if the storage request cannot be
    /// satisfied; no tensor is produced in that case.
    pub fn allocate(rows: u16, cols: u16, dtype: DType) -> Result<Self> {
        let shape = Shape::new(rows, cols);
        let storage = CpuStorage::zeros(dtype, shape.numel())?;
        log::trace!("allocated {} tensor {} ({} bytes)", dtype, shape, storage.nbytes());
        Ok(Tensor { storage, shape })
    }

    /// Create a Float32 tensor from row-major data.
    ///
    /// # Errors
    /// Returns [`TensorError::ShapeMismatch`] if `data.len() != rows * cols`.
    pub fn from_f32(rows: u16, cols: u16, data: Vec<f32>) -> Result<Self> {
        let shape = Shape::new(rows, cols);
        let expected = shape.numel() as usize;
        if data.len() != expected {
            return Err(TensorError::ShapeMismatch {
                expected,
                got: data.len(),
            });
        }
        Ok(Tensor {
            storage: CpuStorage::from_f32_vec(data),
            shape,
        })
    }

    /// Release the tensor and its storage. Equivalent to dropping it.
    pub fn release(self) {
        log::trace!("released {} tensor {}", self.dtype(), self.shape);
        drop(self);
    }

    /// Returns the tensor's shape.
    pub fn shape(&self) -> Shape {
        self.shape
    }

    pub fn rows(&self) -> u16 {
        self.shape.rows()
    }

    pub fn cols(&self) -> u16 {
        self.shape.cols()
    }

    /// Total number of elements.
    pub fn numel(&self) -> usize {
        self.storage.len()
    }

    /// Returns the tensor's element representation.
    pub fn dtype(&self) -> DType {
        self.storage.dtype()
    }

    /// Size of the element buffer in bytes.
    pub fn nbytes(&self) -> usize {
        self.storage.nbytes()
    }

    /// Returns the underlying storage reference.
    pub fn storage(&self) -> &CpuStorage {
        &self.storage
    }

    /// Read element `index` as an f32, decoding or widening as needed.
    ///
    /// # Errors
    /// Returns [`TensorError::IndexOutOfBounds`] if `index >= rows * cols`.
    pub fn read_as_f32(&self, index: usize) -> Result<f32> {
        self.storage.get_f32(index)
    }

    pub fn as_f32_slice(&self) -> Result<&[f32]> {
        self.storage.as_f32_slice()
    }

    pub fn as_f32_slice_mut(&mut self) -> Result<&mut [f32]> {
        self.storage.as_f32_slice_mut()
    }

    pub fn as_f16_bits(&self) -> Result<&[u16]> {
        self.storage.as_f16_bits()
    }

    pub fn as_f16_bits_mut(&mut self) -> Result<&mut [u16]> {
        self.storage.as_f16_bits_mut()
    }

    pub fn as_i8_slice(&self) -> Result<&[i8]> {
        self.storage.as_i8_slice()
    }

    pub fn as_i8_slice_mut(&mut self) -> Result<&mut [i8]> {
        self.storage.as_i8_slice_mut()
    }

    /// Write the element grid in row-major order, one line per row.
    ///
    /// Floats (F16 decoded first) use three decimals; I8 elements are
    /// printed as integers. Every element is followed by a single space.
    pub fn fmt_grid(&self, f: &mut impl fmt::Write) -> fmt::Result {
        let cols = usize::from(self.cols());
        for i in 0..self.numel() {
            match &self.storage {
                CpuStorage::F32(v) => write!(f, "{:.3} ", v[i])?,
                CpuStorage::F16(v) => write!(f, "{:.3} ", decode_half(v[i]))?,
                CpuStorage::I8(v) => write!(f, "{} ", v[i])?,
            }
            if (i + 1) % cols == 0 {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

impl fmt::Display for Tensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Tensor ({}):", self.shape)?;
        self.fmt_grid(f)
    }
}

/// Release an optional tensor. `None` is a no-op.
pub fn release(tensor: Option<Tensor>) {
    if let Some(t) = tensor {
        t.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocate_zero_filled() {
        for dtype in DType::ALL {
            let t = Tensor::allocate(2, 3, dtype).unwrap();
            assert_eq!(t.dtype(), dtype);
            assert_eq!(t.rows(), 2);
            assert_eq!(t.cols(), 3);
            assert_eq!(t.numel(), 6);
            assert_eq!(t.nbytes(), 6 * dtype.size_in_bytes());
            for i in 0..6 {
                assert_eq!(t.read_as_f32(i).unwrap(), 0.0);
            }
        }
    }

    #[test]
    fn test_allocate_empty() {
        let t = Tensor::allocate(0, 0, DType::F32).unwrap();
        assert_eq!(t.numel(), 0);
        assert_eq!(t.to_string(), "Tensor (0x0):\n");

        let t = Tensor::allocate(3, 0, DType::I8).unwrap();
        assert_eq!(t.numel(), 0);
        assert_eq!(t.to_string(), "Tensor (3x0):\n");
    }

    #[test]
    fn test_from_f32() {
        let t = Tensor::from_f32(2, 2, vec![0.5, -1.2, 3.4, 2.1]).unwrap();
        assert_eq!(t.dtype(), DType::F32);
        assert_eq!(t.as_f32_slice().unwrap(), &[0.5, -1.2, 3.4, 2.1]);
    }

    #[test]
    fn test_from_f32_mismatch() {
        assert_eq!(
            Tensor::from_f32(2, 2, vec![1.0]).unwrap_err(),
            TensorError::ShapeMismatch {
                expected: 4,
                got: 1
            }
        );
    }

    #[test]
    fn test_indexed_writes() {
        let mut t = Tensor::allocate(1, 3, DType::I8).unwrap();
        t.as_i8_slice_mut().unwrap()[1] = -5;
        assert_eq!(t.read_as_f32(1).unwrap(), -5.0);
        assert!(t.as_f32_slice_mut().is_err());
    }

    #[test]
    fn test_read_as_f32_f16() {
        let mut t = Tensor::allocate(1, 2, DType::F16).unwrap();
        t.as_f16_bits_mut().unwrap().copy_from_slice(&[0x3C00, 0xC000]);
        assert_eq!(t.read_as_f32(0).unwrap(), 1.0);
        assert_eq!(t.read_as_f32(1).unwrap(), -2.0);
    }

    #[test]
    fn test_read_as_f32_out_of_bounds() {
        let t = Tensor::allocate(2, 2, DType::F32).unwrap();
        assert_eq!(
            t.read_as_f32(4).unwrap_err(),
            TensorError::IndexOutOfBounds { index: 4, len: 4 }
        );
    }

    #[test]
    fn test_display_f32() {
        let t = Tensor::from_f32(2, 2, vec![0.5, -1.2, 3.4, 2.1]).unwrap();
        assert_eq!(t.to_string(), "Tensor (2x2):\n0.500 -1.200 \n3.400 2.100 \n");
    }

    #[test]
    fn test_display_i8() {
        let mut t = Tensor::allocate(1, 3, DType::I8).unwrap();
        t.as_i8_slice_mut().unwrap().copy_from_slice(&[5, -12, 127]);
        assert_eq!(t.to_string(), "Tensor (1x3):\n5 -12 127 \n");
    }

    #[test]
    fn test_display_f16() {
        let mut t = Tensor::allocate(2, 1, DType::F16).unwrap();
        t.as_f16_bits_mut().unwrap().copy_from_slice(&[0x3800, 0xC000]);
        assert_eq!(t.to_string(), "Tensor (2x1):\n0.500 \n-2.000 \n");
    }

    #[test]
    fn test_release() {
        let t = Tensor::allocate(2, 2, DType::F32).unwrap();
        t.release();
        release(None);
        release(Some(Tensor::allocate(1, 1, DType::I8).unwrap()));
    }
}
