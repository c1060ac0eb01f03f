//! Block-local adaptive thresholding.
//!
//! The image is partitioned into small blocks; each block gets a threshold
//! from its own min/max midpoint, low-variation blocks inherit from already
//! scanned neighbors, and the final per-pixel threshold averages the 3x3
//! block neighborhood to tolerate uneven lighting.

use crate::error::DecodeError;
use crate::models::BitMatrix;

/// Whole-image dynamic range below which no threshold is usable
pub const MIN_GLOBAL_CONTRAST: u8 = 24;
/// Side length of one threshold block, in pixels
const BLOCK_SIZE: usize = 8;
/// Blocks with less internal range than this inherit a neighbor threshold
const MIN_BLOCK_CONTRAST: u8 = 24;

/// Binarize a luminance image; `true` = black.
///
/// Fails with [`DecodeError::InsufficientContrast`] when the whole image is
/// near-uniform.
pub fn binarize(luma: &[u8], width: usize, height: usize) -> Result<BitMatrix, DecodeError> {
    debug_assert_eq!(luma.len(), width * height);

    let mut global_min = u8::MAX;
    let mut global_max = u8::MIN;
    for &value in luma {
        global_min = global_min.min(value);
        global_max = global_max.max(value);
    }
    if global_max - global_min < MIN_GLOBAL_CONTRAST {
        return Err(DecodeError::InsufficientContrast);
    }

    let blocks_x = width.div_ceil(BLOCK_SIZE);
    let blocks_y = height.div_ceil(BLOCK_SIZE);
    let mut thresholds = vec![0u8; blocks_x * blocks_y];

    for by in 0..blocks_y {
        for bx in 0..blocks_x {
            let x0 = bx * BLOCK_SIZE;
            let y0 = by * BLOCK_SIZE;
            let x1 = (x0 + BLOCK_SIZE).min(width);
            let y1 = (y0 + BLOCK_SIZE).min(height);

            let mut min = u8::MAX;
            let mut max = u8::MIN;
            for y in y0..y1 {
                let row = &luma[y * width..y * width + width];
                for &value in &row[x0..x1] {
                    min = min.min(value);
                    max = max.max(value);
                }
            }

            thresholds[by * blocks_x + bx] = if max - min >= MIN_BLOCK_CONTRAST {
                midpoint(min, max)
            } else if bx > 0 && by > 0 {
                // Flat block: carry over the surrounding lighting estimate
                let left = thresholds[by * blocks_x + bx - 1] as u16;
                let up = thresholds[(by - 1) * blocks_x + bx] as u16;
                let diag = thresholds[(by - 1) * blocks_x + bx - 1] as u16;
                ((left + 2 * up + diag) / 4) as u8
            } else {
                // Flat border block: bias towards white so quiet zones stay quiet
                min / 2
            };
        }
    }

    let mut binary = BitMatrix::new(width, height);
    for by in 0..blocks_y {
        for bx in 0..blocks_x {
            let threshold = neighborhood_threshold(&thresholds, blocks_x, blocks_y, bx, by);
            let x0 = bx * BLOCK_SIZE;
            let y0 = by * BLOCK_SIZE;
            let x1 = (x0 + BLOCK_SIZE).min(width);
            let y1 = (y0 + BLOCK_SIZE).min(height);
            for y in y0..y1 {
                for x in x0..x1 {
                    binary.set(x, y, luma[y * width + x] < threshold);
                }
            }
        }
    }

    Ok(binary)
}

fn midpoint(min: u8, max: u8) -> u8 {
    ((min as u16 + max as u16) / 2) as u8
}

/// Average threshold over the 3x3 block neighborhood, clamped at the edges
fn neighborhood_threshold(
    thresholds: &[u8],
    blocks_x: usize,
    blocks_y: usize,
    bx: usize,
    by: usize,
) -> u8 {
    let mut sum = 0u32;
    let mut count = 0u32;
    for dy in -1i32..=1 {
        for dx in -1i32..=1 {
            let nx = bx as i32 + dx;
            let ny = by as i32 + dy;
            if nx >= 0 && ny >= 0 && (nx as usize) < blocks_x && (ny as usize) < blocks_y {
                sum += thresholds[ny as usize * blocks_x + nx as usize] as u32;
                count += 1;
            }
        }
    }
    (sum / count) as u8
}
