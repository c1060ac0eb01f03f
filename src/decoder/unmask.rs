//! Mask removal: XOR the selected pattern off the data modules.

use crate::decoder::function_mask::FunctionMask;
use crate::models::{BitMatrix, MaskPattern};

/// Toggle every data module selected by `mask`; function modules are never
/// masked and are left untouched.
pub fn unmask(grid: &mut BitMatrix, mask: MaskPattern, func: &FunctionMask) {
    let size = grid.width();
    for row in 0..size {
        for col in 0..size {
            if !func.is_function(col, row) && mask.is_masked(row, col) {
                grid.toggle(col, row);
            }
        }
    }
}
