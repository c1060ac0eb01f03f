//! Numeric mode (indicator 0001): groups of 3 digits per 10 bits.

use crate::decoder::bitstream::BitReader;
use crate::error::DecodeError;

/// Decode `count` digits from the reader.
///
/// Full groups of three digits take 10 bits; a trailing pair takes 7 and a
/// single digit 4. Values outside the digit range mean a corrupt stream.
pub fn decode(reader: &mut BitReader<'_>, count: usize) -> Result<String, DecodeError> {
    let mut result = String::with_capacity(count);
    let mut remaining = count;

    while remaining > 0 {
        let group = remaining.min(3);
        let (bits, limit) = match group {
            3 => (10, 1000),
            2 => (7, 100),
            _ => (4, 10),
        };

        let value = reader.read_bits(bits).ok_or(DecodeError::MalformedPayload)?;
        if value >= limit {
            return Err(DecodeError::MalformedPayload);
        }

        match group {
            3 => result.push_str(&format!("{value:03}")),
            2 => result.push_str(&format!("{value:02}")),
            _ => result.push_str(&format!("{value}")),
        }
        remaining -= group;
    }

    Ok(result)
}
