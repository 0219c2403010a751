use std::fmt;

/// Element representation of a tensor's storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DType {
    /// 32-bit IEEE-754 floating point.
    F32,
    /// 16-bit floating point, stored as raw bits and converted with the
    /// truncating codec in [`crate::half_codec`].
    F16,
    /// 8-bit signed integer, produced by scale quantization.
    I8,
}

impl DType {
    /// All representations, widest first.
    pub const ALL: [DType; 3] = [DType::F32, DType::F16, DType::I8];

    /// Returns the size in bytes of a single element.
    ///
    /// - F32: 4 bytes
    /// - F16: 2 bytes
    /// - I8: 1 byte
    pub fn size_in_bytes(&self) -> usize {
        match self {
            DType::F32 => 4,
            DType::F16 => 2,
            DType::I8 => 1,
        }
    }

    /// Long name used in human-readable reports ("Float32", "Float16", "Int8").
    pub fn label(&self) -> &'static str {
        match self {
            DType::F32 => "Float32",
            DType::F16 => "Float16",
            DType::I8 => "Int8",
        }
    }

    /// Returns true for the floating point representations.
    pub fn is_float(&self) -> bool {
        matches!(self, DType::F32 | DType::F16)
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DType::F32 => write!(f, "f32"),
            DType::F16 => write!(f, "f16"),
            DType::I8 => write!(f, "i8"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_in_bytes() {
        assert_eq!(DType::F32.size_in_bytes(), 4);
        assert_eq!(DType::F16.size_in_bytes(), 2);
        assert_eq!(DType::I8.size_in_bytes(), 1);
    }

    #[test]
    fn test_display() {
        assert_eq!(DType::F32.to_string(), "f32");
        assert_eq!(DType::F16.to_string(), "f16");
        assert_eq!(DType::I8.to_string(), "i8");
    }

    #[test]
    fn test_is_float() {
        assert!(DType::F32.is_float());
        assert!(DType::F16.is_float());
        assert!(!DType::I8.is_float());
    }
}
