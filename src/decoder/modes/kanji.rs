//! Kanji mode (indicator 1000): 13 bits per Shift-JIS character.

use crate::decoder::bitstream::BitReader;
use crate::error::DecodeError;

/// Decode `count` kanji characters from the reader.
///
/// Each 13-bit value unpacks to a two-byte Shift-JIS code: value split at
/// base 0xC0, rebased into the 0x8140-0x9FFC or 0xE040-0xEBBF range.
pub fn decode(reader: &mut BitReader<'_>, count: usize) -> Result<(String, Vec<u8>), DecodeError> {
    let mut sjis = Vec::with_capacity(count * 2);
    for _ in 0..count {
        let value = reader.read_bits(13).ok_or(DecodeError::MalformedPayload)?;
        let mut code = (value / 0xC0) << 8 | (value % 0xC0);
        if code < 0x1F00 {
            code += 0x8140;
        } else {
            code += 0xC140;
        }
        sjis.push((code >> 8) as u8);
        sjis.push((code & 0xFF) as u8);
    }

    let (text, _, had_errors) = encoding_rs::SHIFT_JIS.decode(&sjis);
    if had_errors {
        return Err(DecodeError::MalformedPayload);
    }
    Ok((text.into_owned(), sjis))
}

/// Pack a two-byte Shift-JIS code into its 13-bit kanji value, if encodable.
///
/// Inverse of the unpacking in [`decode`]; used by test fixtures.
pub fn pack_sjis(code: u16) -> Option<u32> {
    let rebased = if (0x8140..=0x9FFC).contains(&code) {
        code - 0x8140
    } else if (0xE040..=0xEBBF).contains(&code) {
        code - 0xC140
    } else {
        return None;
    };
    Some(((rebased >> 8) as u32) * 0xC0 + (rebased & 0xFF) as u32)
}
