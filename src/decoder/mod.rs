//! Symbol decoding: everything after a sampling grid has been established.
//!
//! - format/version information (short BCH codes, redundant copies)
//! - unmasking and zig-zag codeword extraction
//! - Reed-Solomon block correction
//! - segment/payload parsing

/// Zig-zag extraction and bit reading
pub mod bitstream;
/// EC block tables and deinterleaving
pub mod blocks;
/// Format information (EC level + mask)
pub mod format;
/// Function module map
pub mod function_mask;
/// Segment mode decoders
pub mod modes;
/// Segment-sequence parsing
pub mod payload;
/// Reed-Solomon error correction over GF(256)
pub mod reed_solomon;
/// Module grid sampling
pub mod sampler;
/// Mask removal
pub mod unmask;
/// Version information (versions 7-40)
pub mod version;

pub use format::FormatInfo;
pub use modes::CharacterSet;
pub use payload::{DecodedSegment, SegmentMode};
