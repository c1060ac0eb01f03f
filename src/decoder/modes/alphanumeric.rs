//! Alphanumeric mode (indicator 0010): character pairs per 11 bits.

use crate::decoder::bitstream::BitReader;
use crate::error::DecodeError;

/// The 45-character alphanumeric set, indexed by code value
const ALPHANUMERIC_TABLE: [char; 45] = [
    '0', '1', '2', '3', '4', '5', '6', '7', '8', '9', 'A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'I',
    'J', 'K', 'L', 'M', 'N', 'O', 'P', 'Q', 'R', 'S', 'T', 'U', 'V', 'W', 'X', 'Y', 'Z', ' ', '$',
    '%', '*', '+', '-', '.', '/', ':',
];

/// Index of `c` in the alphanumeric table, if it is encodable
pub fn char_index(c: char) -> Option<u32> {
    ALPHANUMERIC_TABLE
        .iter()
        .position(|&t| t == c)
        .map(|i| i as u32)
}

/// Decode `count` characters from the reader.
///
/// Pairs take 11 bits (first * 45 + second); a trailing single character
/// takes 6. Indices of 45 and up mean a corrupt stream.
pub fn decode(reader: &mut BitReader<'_>, count: usize) -> Result<String, DecodeError> {
    let mut result = String::with_capacity(count);
    let mut remaining = count;

    while remaining >= 2 {
        let value = reader.read_bits(11).ok_or(DecodeError::MalformedPayload)?;
        let first = (value / 45) as usize;
        let second = (value % 45) as usize;
        if first >= 45 {
            return Err(DecodeError::MalformedPayload);
        }
        result.push(ALPHANUMERIC_TABLE[first]);
        result.push(ALPHANUMERIC_TABLE[second]);
        remaining -= 2;
    }

    if remaining == 1 {
        let value = reader.read_bits(6).ok_or(DecodeError::MalformedPayload)? as usize;
        if value >= 45 {
            return Err(DecodeError::MalformedPayload);
        }
        result.push(ALPHANUMERIC_TABLE[value]);
    }

    Ok(result)
}
