//! Visited Mask
//!
//! Row-strided bitset over the tile grid, used only while the sector builder
//! partitions the map: a set bit means the tile has already been assigned to
//! a sector. The mask lives for exactly one build pass and is dropped
//! afterwards.

/// One bit per tile, rows padded up to whole bytes.
pub struct VisitedMask {
    row_stride: usize,
    bits: Vec<u8>,
}

impl VisitedMask {
    /// Zero-filled mask sized for a `width` x `height` grid.
    pub fn new(width: u8, height: u8) -> Self {
        let row_stride = (width as usize).div_ceil(8);
        Self {
            row_stride,
            bits: vec![0; row_stride * height as usize],
        }
    }

    #[inline]
    fn byte_index(&self, x: u8, y: u8) -> usize {
        y as usize * self.row_stride + (x as usize >> 3)
    }

    /// Mark the tile at `(x, y)` as assigned.
    #[inline]
    pub fn mark(&mut self, x: u8, y: u8) {
        let i = self.byte_index(x, y);
        self.bits[i] |= 1 << (x & 7);
    }

    /// Whether the tile at `(x, y)` has been assigned to a sector.
    #[inline]
    pub fn is_marked(&self, x: u8, y: u8) -> bool {
        self.bits[self.byte_index(x, y)] & (1 << (x & 7)) != 0
    }

    /// Mark every tile of the `w` x `h` rectangle starting at `(x, y)`.
    pub fn mark_area(&mut self, x: u8, y: u8, w: u8, h: u8) {
        for row in y..y + h {
            for col in x..x + w {
                self.mark(col, row);
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_cleared() {
        let mask = VisitedMask::new(16, 16);
        for y in 0..16 {
            for x in 0..16 {
                assert!(!mask.is_marked(x, y));
            }
        }
    }

    #[test]
    fn test_mark_single_bit() {
        let mut mask = VisitedMask::new(16, 16);
        mask.mark(9, 3);
        assert!(mask.is_marked(9, 3));
        // Neighbors in the same byte stay clear
        assert!(!mask.is_marked(8, 3));
        assert!(!mask.is_marked(10, 3));
        assert!(!mask.is_marked(9, 2));
    }

    #[test]
    fn test_rows_are_independent_with_odd_width() {
        // Width 9 pads each row to 2 bytes; the last column of one row must
        // not alias the first column of the next.
        let mut mask = VisitedMask::new(9, 4);
        mask.mark(8, 1);
        assert!(mask.is_marked(8, 1));
        assert!(!mask.is_marked(0, 2));
        assert!(!mask.is_marked(8, 0));
    }

    #[test]
    fn test_mark_area_covers_exact_rectangle() {
        let mut mask = VisitedMask::new(12, 8);
        mask.mark_area(2, 1, 3, 4);
        for y in 0..8u8 {
            for x in 0..12u8 {
                let inside = (2..5).contains(&x) && (1..5).contains(&y);
                assert_eq!(mask.is_marked(x, y), inside, "at ({x}, {y})");
            }
        }
    }

    #[test]
    fn test_full_width_area_at_max_axis() {
        let mut mask = VisitedMask::new(255, 2);
        mask.mark_area(0, 0, 255, 1);
        assert!(mask.is_marked(254, 0));
        assert!(!mask.is_marked(254, 1));
    }
}
