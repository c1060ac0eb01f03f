//! Function module map for a symbol version.
//!
//! Marks every module that belongs to a fixed function pattern (finders,
//! separators, timing, alignment, format/version info, dark module) so the
//! unmasker and the zig-zag reader can skip them.

use crate::models::{BitMatrix, Version};

/// Function module mask: true = function module, false = data module
pub struct FunctionMask {
    mask: BitMatrix,
    version: Version,
}

impl FunctionMask {
    /// Build the mask for a version
    pub fn new(version: Version) -> Self {
        let size = version.dimension();
        let mut mask = BitMatrix::new(size, size);

        // Finder patterns + separators (8x8 corner areas)
        Self::mark_finder_area(&mut mask, 0, 0);
        Self::mark_finder_area(&mut mask, size - 7, 0);
        Self::mark_finder_area(&mut mask, 0, size - 7);

        // Timing patterns (row 6 and column 6)
        for i in 0..size {
            mask.set(6, i, true);
            mask.set(i, 6, true);
        }

        // Alignment patterns
        let align = alignment_pattern_positions(version.number());
        for &cx in &align {
            for &cy in &align {
                // Skip the three finder corners
                let in_tl = cx <= 8 && cy <= 8;
                let in_tr = cx >= size - 9 && cy <= 8;
                let in_bl = cx <= 8 && cy >= size - 9;
                if in_tl || in_tr || in_bl {
                    continue;
                }
                for dy in 0..5 {
                    for dx in 0..5 {
                        mask.set(cx - 2 + dx, cy - 2 + dy, true);
                    }
                }
            }
        }

        // Format info areas
        for i in 0..9 {
            if i != 6 {
                mask.set(8, i, true);
                mask.set(i, 8, true);
            }
        }
        for i in 0..8 {
            mask.set(size - 1 - i, 8, true);
            mask.set(8, size - 1 - i, true);
        }

        // Dark module
        mask.set(8, size - 8, true);

        // Version info (v7+)
        if version.has_version_info() {
            for dy in 0..6 {
                for dx in 0..3 {
                    mask.set(size - 11 + dx, dy, true);
                    mask.set(dx, size - 11 + dy, true);
                }
            }
        }

        Self { mask, version }
    }

    /// Modules per side
    pub fn size(&self) -> usize {
        self.mask.width()
    }

    /// Symbol version this mask was built for
    pub fn version(&self) -> Version {
        self.version
    }

    /// Whether (x, y) is a function module
    pub fn is_function(&self, x: usize, y: usize) -> bool {
        self.mask.get(x, y)
    }

    /// Number of data modules; total codeword capacity is this divided by 8
    pub fn data_module_count(&self) -> usize {
        let size = self.mask.width();
        let mut count = 0;
        for y in 0..size {
            for x in 0..size {
                if !self.mask.get(x, y) {
                    count += 1;
                }
            }
        }
        count
    }

    /// Total codeword capacity of the symbol
    pub fn codeword_capacity(&self) -> usize {
        self.data_module_count() / 8
    }

    fn mark_finder_area(mask: &mut BitMatrix, x: usize, y: usize) {
        let size = mask.width();
        let start_x = x.saturating_sub(1);
        let start_y = y.saturating_sub(1);
        let end_x = (x + 8).min(size);
        let end_y = (y + 8).min(size);
        for yy in start_y..end_y {
            for xx in start_x..end_x {
                mask.set(xx, yy, true);
            }
        }
    }
}

/// Alignment pattern center coordinates for a version.
///
/// Computed per the spacing rule (even step, anchored at 6 and size-7);
/// version 32 is the one case the rounding rule gets wrong and is pinned.
pub fn alignment_pattern_positions(version: u8) -> Vec<usize> {
    if version == 1 {
        return Vec::new();
    }
    let num_align = (version / 7) as usize + 2;
    let size = 17 + 4 * version as usize;
    let step = if version == 32 {
        26
    } else {
        let numerator = version as usize * 4 + num_align * 2 + 1;
        let denom = num_align * 2 - 2;
        numerator / denom * 2
    };

    let mut positions = vec![0usize; num_align];
    positions[0] = 6;
    let mut pos = size as isize - 7;
    for i in (1..num_align).rev() {
        positions[i] = pos as usize;
        pos -= step as isize;
    }
    positions
}
