use std::fmt;

/// Fixed 2-D extent of a tensor, in row-major order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Shape {
    rows: u16,
    cols: u16,
}

impl Shape {
    /// Create a new shape from row and column counts.
    pub fn new(rows: u16, cols: u16) -> Self {
        Shape { rows, cols }
    }

    pub fn rows(&self) -> u16 {
        self.rows
    }

    pub fn cols(&self) -> u16 {
        self.cols
    }

    /// Total number of elements.
    ///
    /// Both extents are 16-bit, so the product always fits in 32 bits.
    pub fn numel(&self) -> u32 {
        u32::from(self.rows) * u32::from(self.cols)
    }

    /// Flat row-major index of `(row, col)`, or `None` if out of range.
    pub fn index_of(&self, row: u16, col: u16) -> Option<usize> {
        if row < self.rows && col < self.cols {
            Some(usize::from(row) * usize::from(self.cols) + usize::from(col))
        } else {
            None
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.rows, self.cols)
    }
}

impl From<(u16, u16)> for Shape {
    fn from((rows, cols): (u16, u16)) -> Self {
        Shape::new(rows, cols)
    }
}
