//! Pixel-level utilities shared by the pipeline stages

/// Block-local adaptive thresholding
pub mod binarize;
/// Perspective transform solver
pub mod homography;
/// RGB/RGBA to luminance conversion
pub mod luminance;
