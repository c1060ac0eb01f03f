//! Segment mode decoders

/// Alphanumeric mode (pairs per 11 bits)
pub mod alphanumeric;
/// Byte mode (8 bits per byte, charset-dependent)
pub mod byte;
/// Kanji mode (13 bits per Shift-JIS character)
pub mod kanji;
/// Numeric mode (digit groups per 10 bits)
pub mod numeric;

pub use byte::CharacterSet;
