//! Segment-sequence parsing of the corrected codeword stream.

use crate::decoder::bitstream::BitReader;
use crate::decoder::modes::{alphanumeric, byte, kanji, numeric, CharacterSet};
use crate::error::DecodeError;
use crate::models::Version;

/// Mode indicators
const MODE_TERMINATOR: u32 = 0b0000;
const MODE_NUMERIC: u32 = 0b0001;
const MODE_ALPHANUMERIC: u32 = 0b0010;
const MODE_STRUCTURED_APPEND: u32 = 0b0011;
const MODE_BYTE: u32 = 0b0100;
const MODE_FNC1_FIRST: u32 = 0b0101;
const MODE_ECI: u32 = 0b0111;
const MODE_KANJI: u32 = 0b1000;
const MODE_FNC1_SECOND: u32 = 0b1001;

/// Encoding mode of one decoded segment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentMode {
    /// Digits, 10 bits per group of three
    Numeric,
    /// 45-character set, 11 bits per pair
    Alphanumeric,
    /// Raw bytes in a declared or guessed charset
    Byte,
    /// Shift-JIS characters, 13 bits each
    Kanji,
}

/// One decoded segment: mode tag plus its text fragment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedSegment {
    /// Encoding mode the segment used
    pub mode: SegmentMode,
    /// Decoded text fragment
    pub text: String,
}

/// Parse the corrected data codewords into segments.
///
/// Returns the segments in encounter order plus the raw payload bytes.
/// Any structural defect (unknown mode, length overrun, out-of-range group
/// value, undecodable byte text) fails with
/// [`DecodeError::MalformedPayload`].
pub fn decode_payload(
    codewords: &[u8],
    version: Version,
    default_charset: CharacterSet,
) -> Result<(Vec<DecodedSegment>, Vec<u8>), DecodeError> {
    let bits: Vec<bool> = codewords
        .iter()
        .flat_map(|&byte| (0..8).rev().map(move |i| (byte >> i) & 1 != 0))
        .collect();
    let mut reader = BitReader::new(&bits);

    let mut segments = Vec::new();
    let mut raw_bytes = Vec::new();
    let mut charset = default_charset;

    while reader.remaining() >= 4 {
        let mode = reader.read_bits(4).ok_or(DecodeError::MalformedPayload)?;
        match mode {
            MODE_TERMINATOR => break,
            MODE_NUMERIC => {
                let count = read_count(&mut reader, SegmentMode::Numeric, version)?;
                let text = numeric::decode(&mut reader, count)?;
                raw_bytes.extend_from_slice(text.as_bytes());
                segments.push(DecodedSegment {
                    mode: SegmentMode::Numeric,
                    text,
                });
            }
            MODE_ALPHANUMERIC => {
                let count = read_count(&mut reader, SegmentMode::Alphanumeric, version)?;
                let text = alphanumeric::decode(&mut reader, count)?;
                raw_bytes.extend_from_slice(text.as_bytes());
                segments.push(DecodedSegment {
                    mode: SegmentMode::Alphanumeric,
                    text,
                });
            }
            MODE_BYTE => {
                let count = read_count(&mut reader, SegmentMode::Byte, version)?;
                let (text, bytes) = byte::decode(&mut reader, count, charset)?;
                raw_bytes.extend_from_slice(&bytes);
                segments.push(DecodedSegment {
                    mode: SegmentMode::Byte,
                    text,
                });
            }
            MODE_KANJI => {
                let count = read_count(&mut reader, SegmentMode::Kanji, version)?;
                let (text, bytes) = kanji::decode(&mut reader, count)?;
                raw_bytes.extend_from_slice(&bytes);
                segments.push(DecodedSegment {
                    mode: SegmentMode::Kanji,
                    text,
                });
            }
            MODE_ECI => {
                let eci = read_eci(&mut reader)?;
                if let Some(declared) = CharacterSet::from_eci(eci) {
                    charset = declared;
                } else {
                    tracing::debug!(eci, "unrecognized ECI designator, keeping default charset");
                    charset = default_charset;
                }
            }
            MODE_STRUCTURED_APPEND => {
                // Sequence indicator + parity byte; the symbol's own data follows
                reader.read_bits(16).ok_or(DecodeError::MalformedPayload)?;
            }
            MODE_FNC1_FIRST | MODE_FNC1_SECOND => {
                if mode == MODE_FNC1_SECOND {
                    reader.read_bits(8).ok_or(DecodeError::MalformedPayload)?;
                }
            }
            _ => return Err(DecodeError::MalformedPayload),
        }
    }

    Ok((segments, raw_bytes))
}

/// Character-count field width for a mode in a version range
pub fn count_bits(mode: SegmentMode, version: Version) -> usize {
    let v = version.number();
    match mode {
        SegmentMode::Numeric => match v {
            1..=9 => 10,
            10..=26 => 12,
            _ => 14,
        },
        SegmentMode::Alphanumeric => match v {
            1..=9 => 9,
            10..=26 => 11,
            _ => 13,
        },
        SegmentMode::Byte => match v {
            1..=9 => 8,
            _ => 16,
        },
        SegmentMode::Kanji => match v {
            1..=9 => 8,
            10..=26 => 10,
            _ => 12,
        },
    }
}

fn read_count(
    reader: &mut BitReader<'_>,
    mode: SegmentMode,
    version: Version,
) -> Result<usize, DecodeError> {
    reader
        .read_bits(count_bits(mode, version))
        .map(|count| count as usize)
        .ok_or(DecodeError::MalformedPayload)
}

/// Variable-width ECI assignment number (1, 2, or 3 bytes)
fn read_eci(reader: &mut BitReader<'_>) -> Result<u32, DecodeError> {
    let first = reader.read_bits(8).ok_or(DecodeError::MalformedPayload)?;
    if first & 0x80 == 0 {
        return Ok(first);
    }
    if first & 0xC0 == 0x80 {
        let second = reader.read_bits(8).ok_or(DecodeError::MalformedPayload)?;
        return Ok(((first & 0x3F) << 8) | second);
    }
    if first & 0xE0 == 0xC0 {
        let rest = reader.read_bits(16).ok_or(DecodeError::MalformedPayload)?;
        return Ok(((first & 0x1F) << 16) | rest);
    }
    Err(DecodeError::MalformedPayload)
}
