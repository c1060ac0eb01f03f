//! Module sampling: walk the grid through the transform and vote.

use crate::detector::SymbolGeometry;
use crate::models::{BitMatrix, Point};

/// Sample every module of the symbol into a dimension-square grid.
///
/// Each module center is mapped through the perspective transform and the
/// bitmap is sampled with a 3x3 majority vote to absorb edge noise.
pub fn sample_grid(binary: &BitMatrix, geometry: &SymbolGeometry) -> BitMatrix {
    let dimension = geometry.dimension;
    let mut grid = BitMatrix::new(dimension, dimension);

    for y in 0..dimension {
        for x in 0..dimension {
            let module_center = Point::new(x as f32 + 0.5, y as f32 + 0.5);
            let image_point = geometry.transform.transform(&module_center);

            let ix = image_point.x.round() as isize;
            let iy = image_point.y.round() as isize;

            let mut black = 0u32;
            let mut total = 0u32;
            for dy in -1isize..=1 {
                for dx in -1isize..=1 {
                    let sx = ix + dx;
                    let sy = iy + dy;
                    if sx >= 0
                        && sy >= 0
                        && (sx as usize) < binary.width()
                        && (sy as usize) < binary.height()
                    {
                        total += 1;
                        if binary.get(sx as usize, sy as usize) {
                            black += 1;
                        }
                    }
                }
            }
            if total > 0 {
                grid.set(x, y, black * 2 >= total);
            }
        }
    }

    grid
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detector::grouping::CornerTriple;
    use crate::detector::SymbolGeometry;

    #[test]
    fn test_axis_aligned_sampling() {
        // Checkerboard of 4x4 pixel modules for a 21-module grid
        let module = 4usize;
        let dim = 21usize;
        let mut binary = BitMatrix::new(dim * module, dim * module);
        for my in 0..dim {
            for mx in 0..dim {
                if (mx + my) % 2 == 0 {
                    for dy in 0..module {
                        for dx in 0..module {
                            binary.set(mx * module + dx, my * module + dy, true);
                        }
                    }
                }
            }
        }

        let offset = 3.5 * module as f32;
        let far = (dim as f32 - 3.5) * module as f32;
        let corners = CornerTriple {
            top_left: Point::new(offset, offset),
            top_right: Point::new(far, offset),
            bottom_left: Point::new(offset, far),
            module_size: module as f32,
        };
        let geometry = SymbolGeometry::solve(&binary, &corners).unwrap();
        let grid = sample_grid(&binary, &geometry);

        assert_eq!(grid.width(), dim);
        for my in 0..dim {
            for mx in 0..dim {
                assert_eq!(grid.get(mx, my), (mx + my) % 2 == 0, "module ({mx},{my})");
            }
        }
    }
}
