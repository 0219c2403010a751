use std::fmt;

use crate::dtype::DType;

/// Storage cost of an element count in each representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryUsage {
    pub elements: u32,
}

impl MemoryUsage {
    pub fn for_elements(elements: u32) -> Self {
        MemoryUsage { elements }
    }

    /// Bytes needed to store `elements` values of `dtype`.
    pub fn bytes(&self, dtype: DType) -> u64 {
        u64::from(self.elements) * dtype.size_in_bytes() as u64
    }
}

impl fmt::Display for MemoryUsage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Memory Usage Comparison ({} elements):", self.elements)?;
        for dtype in DType::ALL {
            writeln!(f, "{:<8}: {} bytes", dtype.label(), self.bytes(dtype))?;
        }
        Ok(())
    }
}
