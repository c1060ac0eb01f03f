//! qrscan - QR code decoding pipeline for camera frames and still images
//!
//! The pipeline turns a raw pixel buffer into a validated, error-corrected
//! payload string: adaptive binarization, finder-pattern location,
//! perspective geometry, module sampling, format/version decoding,
//! unmasking, Reed-Solomon block correction, and segment parsing.
//!
//! [`decode`] is the single-shot entry point shared by both image sources;
//! [`scan::scan`] drives it against successive video frames at a fixed
//! cadence, and [`scan::decode_image_bytes`] handles uploaded image files.
//!
//! ```
//! use qrscan::{decode, DecodeError, PixelBuffer};
//!
//! let buffer = PixelBuffer::from_luma(vec![255u8; 64 * 64], 64, 64).unwrap();
//! assert_eq!(decode(&buffer), Err(DecodeError::InsufficientContrast));
//! ```

#![warn(missing_docs)]
#![allow(clippy::missing_docs_in_private_items)]

/// Symbol decoding (format, unmasking, error correction, payload)
pub mod decoder;
/// Symbol location (finder patterns, grouping, geometry)
pub mod detector;
/// Failure taxonomy
pub mod error;
/// Core data structures
pub mod models;
/// Single-frame pipeline orchestration
pub mod pipeline;
/// Camera polling and upload drivers
pub mod scan;
/// Pixel-level utilities
pub mod utils;

pub use decoder::{CharacterSet, DecodedSegment, SegmentMode};
pub use error::{DecodeError, ScanFailure};
pub use models::{BitMatrix, Decoded, EcLevel, MaskPattern, PixelBuffer, PixelFormat, Version};
pub use pipeline::{decode, decode_with_options, DecodeOptions};
pub use scan::{ScanOptions, ScanOutcome, VideoSource};
