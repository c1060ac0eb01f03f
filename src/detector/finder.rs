//! Finder pattern location.
//!
//! Rows are scanned for the 1:1:3:1:1 black/white run signature, candidates
//! are verified against the perpendicular scan line and the diagonal, and
//! nearby hits are merged into one sub-pixel center estimate.

use crate::models::{BitMatrix, Point};

/// Allowed deviation of each 1-unit run from the ideal ratio, in units
const RUN_TOLERANCE: f32 = 0.5;
/// Allowed deviation of the 3-unit center run, in units
const CENTER_RUN_TOLERANCE: f32 = 1.5;
/// Minimum overall pattern span in pixels (7 modules at 2 px each)
const MIN_PATTERN_SPAN: usize = 14;
/// Cap on candidates taken from a single row
const MAX_PATTERNS_PER_ROW: usize = 5;
/// Floor for the cluster-merge radius in pixels
const MIN_MERGE_RADIUS: f32 = 5.0;

/// A candidate finder pattern: estimated center plus module size
#[derive(Debug, Clone, Copy)]
pub struct FinderPattern {
    /// Estimated center in image coordinates
    pub center: Point,
    /// Estimated module size in pixels
    pub module_size: f32,
    /// Number of scan-line hits merged into this estimate
    pub hits: u32,
}

impl FinderPattern {
    fn new(x: f32, y: f32, module_size: f32) -> Self {
        Self {
            center: Point::new(x, y),
            module_size,
            hits: 1,
        }
    }
}

/// Scans a binary bitmap for finder pattern candidates
pub struct FinderLocator;

impl FinderLocator {
    /// Locate all finder pattern candidates in the bitmap
    pub fn locate(matrix: &BitMatrix) -> Vec<FinderPattern> {
        let width = matrix.width();
        let height = matrix.height();
        let mut candidates = Vec::new();

        for y in 0..height {
            if !Self::has_significant_edges(matrix, y, width) {
                continue;
            }
            Self::scan_row(matrix, y, width, &mut candidates);
        }

        let merged = Self::merge_candidates(candidates);
        tracing::trace!(candidates = merged.len(), "finder scan complete");
        merged
    }

    /// Quick transition count so flat rows are skipped cheaply
    fn has_significant_edges(matrix: &BitMatrix, y: usize, width: usize) -> bool {
        let sample_step = 4;
        let mut transitions = 0;
        let mut prev_color = matrix.get(0, y);

        for x in (sample_step..width).step_by(sample_step) {
            let color = matrix.get(x, y);
            if color != prev_color {
                transitions += 1;
                prev_color = color;
                if transitions >= 3 {
                    return true;
                }
            }
        }

        transitions >= 2
    }

    fn scan_row(matrix: &BitMatrix, y: usize, width: usize, out: &mut Vec<FinderPattern>) {
        let mut run_lengths: Vec<usize> = Vec::new();
        let mut run_colors: Vec<bool> = Vec::new();
        let mut run_start = 0usize;
        let mut current_color = matrix.get(0, y);
        let mut found_in_row = 0usize;

        for x in 1..width {
            let color = matrix.get(x, y);
            if color == current_color {
                continue;
            }

            run_lengths.push(x - run_start);
            run_colors.push(current_color);
            run_start = x;
            current_color = color;

            let n = run_colors.len();
            if n >= 5 && run_colors[n - 5] && !run_colors[n - 4] && run_colors[n - 3]
                && !run_colors[n - 2]
                && run_colors[n - 1]
            {
                let lengths = &run_lengths[n - 5..n];
                if let Some(candidate) = Self::check_candidate(matrix, lengths, x, y) {
                    out.push(candidate);
                    found_in_row += 1;
                    if found_in_row >= MAX_PATTERNS_PER_ROW {
                        return;
                    }
                }
            }
        }
    }

    /// Validate a horizontal run hit: ratio check, then perpendicular and
    /// diagonal cross-checks with center refinement.
    fn check_candidate(
        matrix: &BitMatrix,
        lengths: &[usize],
        end_x: usize,
        y: usize,
    ) -> Option<FinderPattern> {
        let span: usize = lengths.iter().sum();
        if span < MIN_PATTERN_SPAN {
            return None;
        }

        let runs = [
            lengths[0] as f32,
            lengths[1] as f32,
            lengths[2] as f32,
            lengths[3] as f32,
            lengths[4] as f32,
        ];
        let unit = Self::ratio_unit(&runs)?;

        let center_x =
            end_x as f32 - runs[4] - runs[3] - runs[2] / 2.0;

        let (center_y, vertical_unit) =
            Self::cross_check_vertical(matrix, center_x as usize, y, unit)?;
        if !Self::cross_check_diagonal(matrix, center_x as usize, center_y as usize, unit) {
            return None;
        }

        let module_size = (unit + vertical_unit) / 2.0;
        Some(FinderPattern::new(center_x, center_y, module_size))
    }

    /// Fit five runs against 1:1:3:1:1; returns the module size on success
    fn ratio_unit(runs: &[f32; 5]) -> Option<f32> {
        let total: f32 = runs.iter().sum();
        let unit = total / 7.0;
        if unit < 1.0 {
            return None;
        }

        let fits = (runs[0] - unit).abs() <= RUN_TOLERANCE * unit
            && (runs[1] - unit).abs() <= RUN_TOLERANCE * unit
            && (runs[2] - 3.0 * unit).abs() <= CENTER_RUN_TOLERANCE * unit
            && (runs[3] - unit).abs() <= RUN_TOLERANCE * unit
            && (runs[4] - unit).abs() <= RUN_TOLERANCE * unit;
        fits.then_some(unit)
    }

    /// Walk the vertical line through a horizontal hit and demand the same
    /// run signature; returns the refined center y and the vertical unit.
    fn cross_check_vertical(
        matrix: &BitMatrix,
        cx: usize,
        cy: usize,
        expected_unit: f32,
    ) -> Option<(f32, f32)> {
        if !matrix.get(cx, cy) {
            return None;
        }
        let max_run = (expected_unit * 5.0).ceil() as usize;

        let up = Self::trace_runs(matrix, cx, cy, 0, -1, max_run)?;
        let down = Self::trace_runs(matrix, cx, cy, 0, 1, max_run)?;

        // Center pixel is counted in both directions
        let center = (up[0] + down[0] - 1) as f32;
        let runs = [up[2] as f32, up[1] as f32, center, down[1] as f32, down[2] as f32];
        let unit = Self::ratio_unit(&runs)?;
        if (unit - expected_unit).abs() > expected_unit * RUN_TOLERANCE {
            return None;
        }

        let top = cy as f32 - (up[0] - 1) as f32;
        let refined_cy = top + center / 2.0;
        Some((refined_cy, unit))
    }

    /// Diagonal symmetry check through the candidate center
    fn cross_check_diagonal(matrix: &BitMatrix, cx: usize, cy: usize, unit: f32) -> bool {
        if !matrix.get(cx, cy) {
            return false;
        }
        let max_run = (unit * 5.0).ceil() as usize;

        let (Some(up_left), Some(down_right)) = (
            Self::trace_runs(matrix, cx, cy, -1, -1, max_run),
            Self::trace_runs(matrix, cx, cy, 1, 1, max_run),
        ) else {
            return false;
        };

        let center = (up_left[0] + down_right[0] - 1) as f32;
        let runs = [
            up_left[2] as f32,
            up_left[1] as f32,
            center,
            down_right[1] as f32,
            down_right[2] as f32,
        ];
        Self::ratio_unit(&runs).is_some()
    }

    /// Measure [center-black, white, outer-black] run lengths walking from
    /// (cx, cy) in direction (dx, dy). The center count includes (cx, cy).
    fn trace_runs(
        matrix: &BitMatrix,
        cx: usize,
        cy: usize,
        dx: i32,
        dy: i32,
        max_run: usize,
    ) -> Option<[usize; 3]> {
        let mut x = cx as i32;
        let mut y = cy as i32;
        let mut runs = [0usize; 3];

        for (i, run) in runs.iter_mut().enumerate() {
            let want_black = i != 1;
            while x >= 0
                && y >= 0
                && (x as usize) < matrix.width()
                && (y as usize) < matrix.height()
                && matrix.get(x as usize, y as usize) == want_black
            {
                *run += 1;
                if *run > max_run {
                    return None;
                }
                x += dx;
                y += dy;
            }
            if *run == 0 {
                return None;
            }
        }

        Some(runs)
    }

    /// Merge nearby candidates into hit-count-weighted centers
    fn merge_candidates(candidates: Vec<FinderPattern>) -> Vec<FinderPattern> {
        let mut merged: Vec<FinderPattern> = Vec::new();

        for candidate in candidates {
            let mut absorbed = false;
            for existing in &mut merged {
                let radius = (existing.module_size * 2.0).max(MIN_MERGE_RADIUS);
                if candidate.center.distance_squared(&existing.center) < radius * radius {
                    let total = existing.hits as f32 + 1.0;
                    existing.center.x =
                        (existing.center.x * existing.hits as f32 + candidate.center.x) / total;
                    existing.center.y =
                        (existing.center.y * existing.hits as f32 + candidate.center.y) / total;
                    existing.module_size = (existing.module_size * existing.hits as f32
                        + candidate.module_size)
                        / total;
                    existing.hits += 1;
                    absorbed = true;
                    break;
                }
            }
            if !absorbed {
                merged.push(candidate);
            }
        }

        merged
    }
}
