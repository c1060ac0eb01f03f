//! Selection and ordering of finder-pattern triples.
//!
//! Out of all located candidates, pick triples that could be the three
//! corners of one symbol: consistent module size, sane separation, and a
//! right angle. Triples are scored so the most symbol-like is tried first.

use crate::detector::finder::FinderPattern;
use crate::models::Point;

/// Maximum deviation of each pattern's module size from the triple mean
pub const FINDER_SCALE_TOLERANCE: f32 = 0.15;
/// Maximum |cos| at the corner joining the two symbol edges
const RIGHT_ANGLE_MAX_COS: f32 = 0.3;
/// Minimum center separation, in module sizes
const MIN_SEPARATION_MODULES: f32 = 3.0;
/// Maximum ratio between the longest and shortest pairwise distance
const MAX_DISTORTION_RATIO: f32 = 5.0;

/// A triple ordered into symbol corners: top-left, top-right, bottom-left
#[derive(Debug, Clone, Copy)]
pub struct CornerTriple {
    /// Corner adjacent to both others
    pub top_left: Point,
    /// Corner clockwise from top-left
    pub top_right: Point,
    /// Corner counter-clockwise from top-left
    pub bottom_left: Point,
    /// Mean module size across the three patterns
    pub module_size: f32,
}

/// Collect candidate triples, best-scored first
pub fn candidate_triples(patterns: &[FinderPattern], max_triples: usize) -> Vec<[usize; 3]> {
    if patterns.len() < 3 {
        return Vec::new();
    }

    let mut triples = Vec::new();
    for i in 0..patterns.len() {
        for j in (i + 1)..patterns.len() {
            for k in (j + 1)..patterns.len() {
                if is_consistent(&patterns[i], &patterns[j], &patterns[k]) {
                    triples.push([i, j, k]);
                }
            }
        }
    }

    triples.sort_by(|a, b| {
        let sa = triple_score(patterns, a);
        let sb = triple_score(patterns, b);
        sa.partial_cmp(&sb).unwrap_or(std::cmp::Ordering::Equal)
    });
    triples.truncate(max_triples);
    triples
}

/// Scale, separation, and right-angle constraints for one triple
fn is_consistent(a: &FinderPattern, b: &FinderPattern, c: &FinderPattern) -> bool {
    let mean_size = (a.module_size + b.module_size + c.module_size) / 3.0;
    if mean_size <= 0.0 {
        return false;
    }
    for p in [a, b, c] {
        if (p.module_size - mean_size).abs() / mean_size > FINDER_SCALE_TOLERANCE {
            return false;
        }
    }

    let d_ab = a.center.distance(&b.center);
    let d_ac = a.center.distance(&c.center);
    let d_bc = b.center.distance(&c.center);
    let min_d = d_ab.min(d_ac).min(d_bc);
    let max_d = d_ab.max(d_ac).max(d_bc);

    if min_d < mean_size * MIN_SEPARATION_MODULES {
        return false;
    }
    if max_d / min_d > MAX_DISTORTION_RATIO {
        return false;
    }

    best_corner_cos(a, b, c) < RIGHT_ANGLE_MAX_COS
}

/// Smallest |cos| over the three corners (0 = perfect right angle)
fn best_corner_cos(a: &FinderPattern, b: &FinderPattern, c: &FinderPattern) -> f32 {
    let patterns = [a, b, c];
    let mut best = f32::INFINITY;
    for i in 0..3 {
        if let Some(cos) = corner_cos(
            &patterns[i].center,
            &patterns[(i + 1) % 3].center,
            &patterns[(i + 2) % 3].center,
        ) {
            best = best.min(cos);
        }
    }
    best
}

fn corner_cos(at: &Point, p1: &Point, p2: &Point) -> Option<f32> {
    let v1x = p1.x - at.x;
    let v1y = p1.y - at.y;
    let v2x = p2.x - at.x;
    let v2y = p2.y - at.y;
    let dot = v1x * v2x + v1y * v2y;
    let denom = (v1x * v1x + v1y * v1y).sqrt() * (v2x * v2x + v2y * v2y).sqrt();
    if denom == 0.0 {
        return None;
    }
    Some((dot / denom).abs())
}

/// Lower is better: prefer tight scale agreement, low distortion, square corner
fn triple_score(patterns: &[FinderPattern], triple: &[usize; 3]) -> f32 {
    let p0 = &patterns[triple[0]];
    let p1 = &patterns[triple[1]];
    let p2 = &patterns[triple[2]];

    let sizes = [p0.module_size, p1.module_size, p2.module_size];
    let min_size = sizes.iter().fold(f32::INFINITY, |a, &b| a.min(b));
    let max_size = sizes.iter().fold(0.0f32, |a, &b| a.max(b));
    let size_ratio = max_size / min_size;

    let d01 = p0.center.distance(&p1.center);
    let d02 = p0.center.distance(&p2.center);
    let d12 = p1.center.distance(&p2.center);
    let min_d = d01.min(d02).min(d12);
    let max_d = d01.max(d02).max(d12);
    let distortion = max_d / min_d;

    size_ratio * 2.0 + distortion + best_corner_cos(p0, p1, p2)
}

/// Order a consistent triple into top-left / top-right / bottom-left.
///
/// The top-left corner subtends the right angle; the cross product of its
/// two edges fixes which neighbor is top-right.
pub fn order_triple(
    a: &FinderPattern,
    b: &FinderPattern,
    c: &FinderPattern,
) -> Option<CornerTriple> {
    let patterns = [a, b, c];
    if patterns.iter().any(|p| p.module_size < 1.0) {
        return None;
    }

    let mut best_idx = 0usize;
    let mut best_cos = f32::INFINITY;
    for i in 0..3 {
        if let Some(cos) = corner_cos(
            &patterns[i].center,
            &patterns[(i + 1) % 3].center,
            &patterns[(i + 2) % 3].center,
        ) {
            if cos < best_cos {
                best_cos = cos;
                best_idx = i;
            }
        }
    }
    if best_cos > RIGHT_ANGLE_MAX_COS {
        return None;
    }

    let tl = patterns[best_idx];
    let p1 = patterns[(best_idx + 1) % 3];
    let p2 = patterns[(best_idx + 2) % 3];

    let v1x = p1.center.x - tl.center.x;
    let v1y = p1.center.y - tl.center.y;
    let v2x = p2.center.x - tl.center.x;
    let v2y = p2.center.y - tl.center.y;
    let cross = v1x * v2y - v1y * v2x;

    let (tr, bl) = if cross > 0.0 { (p1, p2) } else { (p2, p1) };

    Some(CornerTriple {
        top_left: tl.center,
        top_right: tr.center,
        bottom_left: bl.center,
        module_size: (tl.module_size + tr.module_size + bl.module_size) / 3.0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pattern(x: f32, y: f32, size: f32) -> FinderPattern {
        FinderPattern {
            center: Point::new(x, y),
            module_size: size,
            hits: 1,
        }
    }

    #[test]
    fn test_l_shape_accepted_and_ordered() {
        let a = pattern(10.0, 10.0, 4.0);
        let b = pattern(90.0, 10.0, 4.0);
        let c = pattern(10.0, 90.0, 4.0);
        let triples = candidate_triples(&[a, b, c], 8);
        assert_eq!(triples.len(), 1);

        let ordered = order_triple(&a, &b, &c).unwrap();
        assert_eq!(ordered.top_left, Point::new(10.0, 10.0));
        assert_eq!(ordered.top_right, Point::new(90.0, 10.0));
        assert_eq!(ordered.bottom_left, Point::new(10.0, 90.0));
    }

    #[test]
    fn test_ordering_is_rotation_invariant() {
        // Same L rotated 90 degrees clockwise: top-left moves but the
        // corner adjacent to both others is still found.
        let a = pattern(90.0, 10.0, 4.0);
        let b = pattern(90.0, 90.0, 4.0);
        let c = pattern(10.0, 10.0, 4.0);
        let ordered = order_triple(&a, &b, &c).unwrap();
        assert_eq!(ordered.top_left, Point::new(90.0, 10.0));
        // Cross product keeps the clockwise neighbor as top-right
        assert_eq!(ordered.top_right, Point::new(90.0, 90.0));
        assert_eq!(ordered.bottom_left, Point::new(10.0, 10.0));
    }

    #[test]
    fn test_scale_mismatch_rejected() {
        let a = pattern(10.0, 10.0, 4.0);
        let b = pattern(90.0, 10.0, 4.0);
        let c = pattern(10.0, 90.0, 6.0);
        assert!(candidate_triples(&[a, b, c], 8).is_empty());
    }

    #[test]
    fn test_collinear_rejected() {
        let a = pattern(10.0, 10.0, 4.0);
        let b = pattern(50.0, 10.0, 4.0);
        let c = pattern(90.0, 10.0, 4.0);
        assert!(candidate_triples(&[a, b, c], 8).is_empty());
    }

    #[test]
    fn test_scale_tolerance_boundary() {
        // Exactly at the tolerance edge: mean 4.2, deviation 0.2/4.2 < 15%
        let a = pattern(10.0, 10.0, 4.0);
        let b = pattern(90.0, 10.0, 4.2);
        let c = pattern(10.0, 90.0, 4.4);
        assert_eq!(candidate_triples(&[a, b, c], 8).len(), 1);
    }
}
