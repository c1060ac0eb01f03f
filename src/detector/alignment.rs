//! Alignment pattern search near a predicted position.

use crate::models::{BitMatrix, Point};

/// Search radius around the predicted center, in module sizes
const SEARCH_RADIUS_MODULES: f32 = 4.0;
/// Maximum template mismatches (out of 25 cells) for an accepted center
const MAX_TEMPLATE_MISMATCHES: usize = 8;

/// Find the center of the 5x5 alignment pattern closest to `predicted`.
///
/// Every pixel inside the search window is scored against the alignment
/// template (black ring, white interior, black center); the best-scoring
/// position wins if it is convincing enough.
pub fn find_alignment_center(
    binary: &BitMatrix,
    predicted: Point,
    module_size: f32,
) -> Option<Point> {
    if !predicted.x.is_finite() || !predicted.y.is_finite() {
        return None;
    }

    let radius = (module_size * SEARCH_RADIUS_MODULES).max(4.0);
    let min_x = (predicted.x - radius).floor().max(0.0) as isize;
    let max_x = (predicted.x + radius)
        .ceil()
        .min(binary.width().saturating_sub(1) as f32) as isize;
    let min_y = (predicted.y - radius).floor().max(0.0) as isize;
    let max_y = (predicted.y + radius)
        .ceil()
        .min(binary.height().saturating_sub(1) as f32) as isize;

    // Rank by template fit first; among equal fits, the position closest
    // to the prediction wins (template cells are a module wide, so several
    // neighboring pixels can all fit perfectly).
    let mut best: Option<(Point, usize, f32)> = None;
    for y in min_y..=max_y {
        for x in min_x..=max_x {
            let center = Point::new(x as f32, y as f32);
            let Some(mismatch) = template_mismatch(binary, &center, module_size) else {
                continue;
            };
            let distance = center.distance_squared(&predicted);
            let better = match best {
                Some((_, best_mismatch, best_distance)) => {
                    mismatch < best_mismatch
                        || (mismatch == best_mismatch && distance < best_distance)
                }
                None => true,
            };
            if better {
                best = Some((center, mismatch, distance));
            }
        }
    }

    match best {
        Some((center, mismatch, _)) if mismatch <= MAX_TEMPLATE_MISMATCHES => Some(center),
        _ => None,
    }
}

/// Count template disagreements over the 5x5 alignment footprint
fn template_mismatch(binary: &BitMatrix, center: &Point, module_size: f32) -> Option<usize> {
    let mut mismatches = 0usize;
    for dy in -2i32..=2 {
        for dx in -2i32..=2 {
            let expected_black = dx.abs() == 2 || dy.abs() == 2 || (dx == 0 && dy == 0);
            let sx = center.x + dx as f32 * module_size;
            let sy = center.y + dy as f32 * module_size;
            let ix = sx.round() as isize;
            let iy = sy.round() as isize;
            if ix < 0
                || iy < 0
                || (ix as usize) >= binary.width()
                || (iy as usize) >= binary.height()
            {
                return None;
            }
            if binary.get(ix as usize, iy as usize) != expected_black {
                mismatches += 1;
            }
        }
    }

    Some(mismatches)
}
