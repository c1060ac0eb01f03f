//! Byte mode (indicator 0100): 8 bits per byte, charset-dependent text.

use crate::decoder::bitstream::BitReader;
use crate::error::DecodeError;

/// Character sets a byte segment can be interpreted in.
///
/// The base standard leaves the default ambiguous; the pipeline tries
/// strict UTF-8 and falls back to ISO-8859-1 unless the caller forces a
/// charset or the stream carries an ECI designator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CharacterSet {
    /// Strict UTF-8, then ISO-8859-1 if the bytes are not valid UTF-8
    #[default]
    Guess,
    /// Strict UTF-8 only
    Utf8,
    /// ISO-8859-1 (Latin-1)
    Iso8859_1,
    /// Shift-JIS
    ShiftJis,
}

impl CharacterSet {
    /// Charset selected by an ECI assignment number, when recognized
    pub fn from_eci(eci: u32) -> Option<Self> {
        match eci {
            1 | 3 => Some(CharacterSet::Iso8859_1),
            20 => Some(CharacterSet::ShiftJis),
            26 => Some(CharacterSet::Utf8),
            _ => None,
        }
    }

    /// Interpret raw segment bytes as text
    pub fn decode_text(&self, bytes: &[u8]) -> Result<String, DecodeError> {
        match self {
            CharacterSet::Guess => Ok(match std::str::from_utf8(bytes) {
                Ok(text) => text.to_owned(),
                Err(_) => encoding_rs::mem::decode_latin1(bytes).into_owned(),
            }),
            CharacterSet::Utf8 => std::str::from_utf8(bytes)
                .map(str::to_owned)
                .map_err(|_| DecodeError::MalformedPayload),
            CharacterSet::Iso8859_1 => Ok(encoding_rs::mem::decode_latin1(bytes).into_owned()),
            CharacterSet::ShiftJis => {
                let (text, _, had_errors) = encoding_rs::SHIFT_JIS.decode(bytes);
                if had_errors {
                    return Err(DecodeError::MalformedPayload);
                }
                Ok(text.into_owned())
            }
        }
    }
}

/// Read `count` raw bytes and interpret them in `charset`.
pub fn decode(
    reader: &mut BitReader<'_>,
    count: usize,
    charset: CharacterSet,
) -> Result<(String, Vec<u8>), DecodeError> {
    let mut bytes = Vec::with_capacity(count);
    for _ in 0..count {
        let byte = reader.read_bits(8).ok_or(DecodeError::MalformedPayload)?;
        bytes.push(byte as u8);
    }
    let text = charset.decode_text(&bytes)?;
    Ok((text, bytes))
}
