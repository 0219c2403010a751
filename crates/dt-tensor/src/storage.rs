use crate::dtype::DType;
use crate::error::{Result, TensorError};
use crate::half_codec::decode_half;

/// CPU-side tensor storage.
///
/// Each variant owns its own typed buffer. Half-precision elements are kept
/// as raw `u16` bit patterns produced by [`crate::half_codec::encode_half`].
#[derive(Debug, Clone, PartialEq)]
pub enum CpuStorage {
    /// 32-bit floating point storage.
    F32(Vec<f32>),
    /// 16-bit half-precision storage (raw bits).
    F16(Vec<u16>),
    /// 8-bit signed integer storage.
    I8(Vec<i8>),
}

/// Allocate a zero-filled vector of `n` elements, reporting allocator
/// failure instead of aborting.
fn try_zeroed<T: Clone + Default>(n: u32, dtype: DType) -> Result<Vec<T>> {
    let len = n as usize;
    let mut v = Vec::new();
    v.try_reserve_exact(len)
        .map_err(|_| TensorError::Allocation { elements: n, dtype })?;
    v.resize(len, T::default());
    Ok(v)
}

impl CpuStorage {
    /// Create zero-filled storage for the given dtype and element count.
    ///
    /// # Errors
    /// Returns [`TensorError::Allocation`] if the memory request cannot be
    /// satisfied.
    pub fn zeros(dtype: DType, n: u32) -> Result<Self> {
        Ok(match dtype {
            DType::F32 => CpuStorage::F32(try_zeroed(n, dtype)?),
            DType::F16 => CpuStorage::F16(try_zeroed(n, dtype)?),
            DType::I8 => CpuStorage::I8(try_zeroed(n, dtype)?),
        })
    }

    /// Create storage from an f32 vector.
    pub fn from_f32_vec(data: Vec<f32>) -> Self {
        CpuStorage::F32(data)
    }

    /// Number of elements in this storage.
    pub fn len(&self) -> usize {
        match self {
            CpuStorage::F32(v) => v.len(),
            CpuStorage::F16(v) => v.len(),
            CpuStorage::I8(v) => v.len(),
        }
    }

    /// Returns true if the storage contains no elements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the dtype of this storage.
    pub fn dtype(&self) -> DType {
        match self {
            CpuStorage::F32(_) => DType::F32,
            CpuStorage::F16(_) => DType::F16,
            CpuStorage::I8(_) => DType::I8,
        }
    }

    /// Size of the buffer in bytes.
    pub fn nbytes(&self) -> usize {
        self.len() * self.dtype().size_in_bytes()
    }

    /// Read element `index` as an f32.
    ///
    /// F16 elements go through the half codec; I8 elements are widened
    /// numerically.
    pub fn get_f32(&self, index: usize) -> Result<f32> {
        let len = self.len();
        let oob = || TensorError::IndexOutOfBounds { index, len };
        match self {
            CpuStorage::F32(v) => v.get(index).copied().ok_or_else(oob),
            CpuStorage::F16(v) => v.get(index).map(|&b| decode_half(b)).ok_or_else(oob),
            CpuStorage::I8(v) => v.get(index).map(|&q| f32::from(q)).ok_or_else(oob),
        }
    }

    fn mismatch(&self, expected: DType) -> TensorError {
        TensorError::DTypeMismatch {
            expected,
            got: self.dtype(),
        }
    }

    /// Returns the data as an f32 slice.
    ///
    /// # Errors
    /// Returns an error if the storage is not F32.
    pub fn as_f32_slice(&self) -> Result<&[f32]> {
        match self {
            CpuStorage::F32(v) => Ok(v.as_slice()),
            _ => Err(self.mismatch(DType::F32)),
        }
    }

    /// Returns the data as a mutable f32 slice.
    ///
    /// # Errors
    /// Returns an error if the storage is not F32.
    pub fn as_f32_slice_mut(&mut self) -> Result<&mut [f32]> {
        let got = self.dtype();
        match self {
            CpuStorage::F32(v) => Ok(v.as_mut_slice()),
            _ => Err(TensorError::DTypeMismatch { expected: DType::F32, got }),
        }
    }

    /// Returns the raw half-precision bits.
    ///
    /// # Errors
    /// Returns an error if the storage is not F16.
    pub fn as_f16_bits(&self) -> Result<&[u16]> {
        match self {
            CpuStorage::F16(v) => Ok(v.as_slice()),
            _ => Err(self.mismatch(DType::F16)),
        }
    }

    /// Returns the raw half-precision bits, mutably.
    ///
    /// # Errors
    /// Returns an error if the storage is not F16.
    pub fn as_f16_bits_mut(&mut self) -> Result<&mut [u16]> {
        let got = self.dtype();
        match self {
            CpuStorage::F16(v) => Ok(v.as_mut_slice()),
            _ => Err(TensorError::DTypeMismatch { expected: DType::F16, got }),
        }
    }

    /// Returns the data as an i8 slice.
    ///
    /// # Errors
    /// Returns an error if the storage is not I8.
    pub fn as_i8_slice(&self) -> Result<&[i8]> {
        match self {
            CpuStorage::I8(v) => Ok(v.as_slice()),
            _ => Err(self.mismatch(DType::I8)),
        }
    }

    /// Returns the data as a mutable i8 slice.
    ///
    /// # Errors
    /// Returns an error if the storage is not I8.
    pub fn as_i8_slice_mut(&mut self) -> Result<&mut [i8]> {
        let got = self.dtype();
        match self {
            CpuStorage::I8(v) => Ok(v.as_mut_slice()),
            _ => Err(TensorError::DTypeMismatch { expected: DType::I8, got }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_f32_vec() {
        let s = CpuStorage::from_f32_vec(vec![1.0, 2.0, 3.0]);
        assert_eq!(s.len(), 3);
        assert!(!s.is_empty());
        assert_eq!(s.as_f32_slice().unwrap(), &[1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_zeros_every_dtype() {
        let s = CpuStorage::zeros(DType::F32, 5).unwrap();
        assert_eq!(s.as_f32_slice().unwrap(), &[0.0; 5]);

        let s = CpuStorage::zeros(DType::F16, 3).unwrap();
        assert_eq!(s.as_f16_bits().unwrap(), &[0u16; 3]);

        let s = CpuStorage::zeros(DType::I8, 4).unwrap();
        assert_eq!(s.as_i8_slice().unwrap(), &[0i8; 4]);
    }

    #[test]
    fn test_zeros_empty() {
        let s = CpuStorage::zeros(DType::I8, 0).unwrap();
        assert!(s.is_empty());
        assert_eq!(s.nbytes(), 0);
    }

    #[test]
    fn test_nbytes() {
        assert_eq!(CpuStorage::zeros(DType::F32, 4).unwrap().nbytes(), 16);
        assert_eq!(CpuStorage::zeros(DType::F16, 4).unwrap().nbytes(), 8);
        assert_eq!(CpuStorage::zeros(DType::I8, 4).unwrap().nbytes(), 4);
    }

    #[test]
    fn test_dtype() {
        assert_eq!(CpuStorage::from_f32_vec(vec![]).dtype(), DType::F32);
        assert_eq!(CpuStorage::F16(vec![]).dtype(), DType::F16);
        assert_eq!(CpuStorage::I8(vec![]).dtype(), DType::I8);
    }

    #[test]
    fn test_wrong_accessor() {
        let mut s = CpuStorage::I8(vec![1, 2]);
        assert_eq!(
            s.as_f32_slice().unwrap_err(),
            TensorError::DTypeMismatch {
                expected: DType::F32,
                got: DType::I8
            }
        );
        assert!(s.as_f16_bits_mut().is_err());
        assert!(s.as_i8_slice_mut().is_ok());
    }

    #[test]
    fn test_mut_slice() {
        let mut s = CpuStorage::from_f32_vec(vec![1.0, 2.0]);
        let slice = s.as_f32_slice_mut().unwrap();
        slice[0] = 42.0;
        assert_eq!(s.as_f32_slice().unwrap()[0], 42.0);
    }

    #[test]
    fn test_get_f32_per_dtype() {
        assert_eq!(CpuStorage::F32(vec![1.5]).get_f32(0).unwrap(), 1.5);
        assert_eq!(CpuStorage::F16(vec![0x3C00]).get_f32(0).unwrap(), 1.0);
        assert_eq!(CpuStorage::I8(vec![-7]).get_f32(0).unwrap(), -7.0);
    }

    #[test]
    fn test_get_f32_out_of_bounds() {
        let s = CpuStorage::I8(vec![1, 2]);
        assert_eq!(
            s.get_f32(2).unwrap_err(),
            TensorError::IndexOutOfBounds { index: 2, len: 2 }
        );
    }
}
