//! Geometry solver: from three ordered finder centers to a sampling grid.
//!
//! Derives the symbol version from the pixel span, completes the fourth
//! corner, builds the grid-to-image homography, and for version 2 and up
//! refines it through the bottom-right alignment pattern.

use crate::detector::alignment::find_alignment_center;
use crate::detector::grouping::CornerTriple;
use crate::error::DecodeError;
use crate::models::{BitMatrix, Point, Version};
use crate::utils::homography::PerspectiveTransform;

/// Acceptable ratio between span-derived and finder-derived module size
const MODULE_CONSISTENCY_RANGE: std::ops::RangeInclusive<f32> = 0.7..=1.3;
/// Maximum disagreement between the two span-derived dimensions, in modules
const MAX_DIMENSION_DISAGREEMENT: isize = 4;
/// Offset of a finder center from its symbol corner, in modules
const FINDER_CENTER_OFFSET: f32 = 3.5;

/// Resolved geometry for one symbol candidate
#[derive(Debug, Clone)]
pub struct SymbolGeometry {
    /// Symbol version derived from the pixel span
    pub version: Version,
    /// Modules per side
    pub dimension: usize,
    /// Refined module size in pixels
    pub module_size: f32,
    /// Maps module-grid coordinates to image coordinates
    pub transform: PerspectiveTransform,
}

impl SymbolGeometry {
    /// Solve geometry for an ordered corner triple.
    pub fn solve(binary: &BitMatrix, corners: &CornerTriple) -> Result<Self, DecodeError> {
        let d_tr = corners.top_left.distance(&corners.top_right);
        let d_bl = corners.top_left.distance(&corners.bottom_left);

        let dim_horizontal = estimate_dimension(d_tr, corners.module_size)?;
        let dim_vertical = estimate_dimension(d_bl, corners.module_size)?;
        let dimension = if dim_horizontal == dim_vertical {
            dim_horizontal
        } else if (dim_horizontal as isize - dim_vertical as isize).abs()
            <= MAX_DIMENSION_DISAGREEMENT
        {
            snap_dimension((dim_horizontal + dim_vertical) / 2)
        } else {
            return Err(DecodeError::GeometryInvalid);
        };

        let version = Version::from_dimension(dimension).ok_or(DecodeError::GeometryInvalid)?;

        let module_size = (d_tr + d_bl) / 2.0 / (dimension as f32 - 7.0);
        if !MODULE_CONSISTENCY_RANGE.contains(&(module_size / corners.module_size)) {
            return Err(DecodeError::GeometryInvalid);
        }

        // Parallelogram completion of the missing corner
        let bottom_right = Point::new(
            corners.top_right.x + corners.bottom_left.x - corners.top_left.x,
            corners.top_right.y + corners.bottom_left.y - corners.top_left.y,
        );

        let transform = build_transform(corners, &bottom_right, dimension)
            .ok_or(DecodeError::GeometryInvalid)?;
        if transform.is_degenerate() {
            return Err(DecodeError::GeometryInvalid);
        }

        let transform = if version.number() >= 2 {
            refine_with_alignment(binary, corners, &transform, dimension, module_size)
                .unwrap_or(transform)
        } else {
            transform
        };
        if transform.is_degenerate() {
            return Err(DecodeError::GeometryInvalid);
        }

        tracing::debug!(
            version = version.number(),
            dimension,
            module_size,
            "geometry solved"
        );

        Ok(Self {
            version,
            dimension,
            module_size,
            transform,
        })
    }
}

/// Dimension from the distance between two finder centers
fn estimate_dimension(distance: f32, module_size: f32) -> Result<usize, DecodeError> {
    if module_size <= 0.0 {
        return Err(DecodeError::GeometryInvalid);
    }
    let raw_dim = distance / module_size + 7.0;
    if raw_dim < 21.0 - 2.0 {
        return Err(DecodeError::GeometryInvalid);
    }
    let version = ((raw_dim - 17.0) / 4.0).round();
    if !(1.0..=40.0).contains(&version) {
        return Err(DecodeError::GeometryInvalid);
    }
    Ok(17 + 4 * version as usize)
}

/// Round a raw module count to the nearest valid dimension (21, 25, ... 177)
fn snap_dimension(raw: usize) -> usize {
    let version = ((raw as f32 - 17.0) / 4.0).round().clamp(1.0, 40.0) as usize;
    17 + 4 * version
}

fn build_transform(
    corners: &CornerTriple,
    bottom_right: &Point,
    dimension: usize,
) -> Option<PerspectiveTransform> {
    let far = dimension as f32 - FINDER_CENTER_OFFSET;
    let src = [
        Point::new(FINDER_CENTER_OFFSET, FINDER_CENTER_OFFSET),
        Point::new(far, FINDER_CENTER_OFFSET),
        Point::new(FINDER_CENTER_OFFSET, far),
        Point::new(far, far),
    ];
    let dst = [
        corners.top_left,
        corners.top_right,
        corners.bottom_left,
        *bottom_right,
    ];
    PerspectiveTransform::from_points(&src, &dst)
}

/// Rebuild the transform through the located bottom-right alignment pattern.
///
/// The parallelogram-completed corner ignores perspective; anchoring the
/// fourth correspondence at a real image feature corrects the skew.
fn refine_with_alignment(
    binary: &BitMatrix,
    corners: &CornerTriple,
    transform: &PerspectiveTransform,
    dimension: usize,
    module_size: f32,
) -> Option<PerspectiveTransform> {
    if module_size < 1.0 {
        return None;
    }

    let align_grid = Point::new(dimension as f32 - 6.5, dimension as f32 - 6.5);
    let predicted = transform.transform(&align_grid);
    let found = find_alignment_center(binary, predicted, module_size)?;

    let far = dimension as f32 - FINDER_CENTER_OFFSET;
    let src = [
        Point::new(FINDER_CENTER_OFFSET, FINDER_CENTER_OFFSET),
        Point::new(far, FINDER_CENTER_OFFSET),
        Point::new(FINDER_CENTER_OFFSET, far),
        align_grid,
    ];
    let dst = [
        corners.top_left,
        corners.top_right,
        corners.bottom_left,
        found,
    ];
    let refined = PerspectiveTransform::from_points(&src, &dst)?;
    if refined.is_degenerate() {
        return None;
    }
    tracing::trace!("transform refined through alignment pattern");
    Some(refined)
}
