//! Pipeline orchestration: one pixel buffer in, one decode result out.
//!
//! Stages run in strict sequence per candidate: binarize, locate, solve
//! geometry, sample, read format/version, unmask, extract, correct, parse.
//! Candidate finder triples are tried best-scored first; the first success
//! wins, otherwise the failure from the deepest stage reached is returned.

use crate::decoder::bitstream::{bits_to_codewords, extract_bits};
use crate::decoder::blocks::deinterleave;
use crate::decoder::function_mask::FunctionMask;
use crate::decoder::payload::decode_payload;
use crate::decoder::reed_solomon::ReedSolomonDecoder;
use crate::decoder::sampler::sample_grid;
use crate::decoder::unmask::unmask;
use crate::decoder::version::extract_version;
use crate::decoder::{CharacterSet, FormatInfo};
use crate::detector::grouping::{candidate_triples, order_triple, CornerTriple};
use crate::detector::{FinderLocator, SymbolGeometry};
use crate::error::DecodeError;
use crate::models::{BitMatrix, Decoded, PixelBuffer};
use crate::utils::binarize::binarize;

/// Tunable knobs for one decode pass
#[derive(Debug, Clone)]
pub struct DecodeOptions {
    /// Charset for byte-mode segments without an ECI designator
    pub byte_charset: CharacterSet,
    /// How many candidate finder triples to attempt, best-scored first
    pub max_candidates: usize,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            byte_charset: CharacterSet::Guess,
            max_candidates: 16,
        }
    }
}

/// Decode one frame with default options.
///
/// Pure: no side effects beyond the returned value, and identical buffers
/// produce identical results.
pub fn decode(buffer: &PixelBuffer) -> Result<Decoded, DecodeError> {
    decode_with_options(buffer, &DecodeOptions::default())
}

/// Decode one frame.
pub fn decode_with_options(
    buffer: &PixelBuffer,
    options: &DecodeOptions,
) -> Result<Decoded, DecodeError> {
    let luma = buffer.to_luma();
    let binary = binarize(&luma, buffer.width(), buffer.height())?;

    let patterns = FinderLocator::locate(&binary);
    if patterns.len() < 3 {
        tracing::debug!(found = patterns.len(), "fewer than three finder patterns");
        return Err(DecodeError::NotFound);
    }

    let triples = candidate_triples(&patterns, options.max_candidates);
    tracing::debug!(
        patterns = patterns.len(),
        triples = triples.len(),
        "finder candidates grouped"
    );

    let mut deepest: Option<DecodeError> = None;
    for triple in &triples {
        let Some(corners) = order_triple(
            &patterns[triple[0]],
            &patterns[triple[1]],
            &patterns[triple[2]],
        ) else {
            continue;
        };

        match decode_candidate(&binary, &corners, options) {
            Ok(decoded) => {
                tracing::debug!(
                    version = decoded.version.number(),
                    length = decoded.text.len(),
                    "symbol decoded"
                );
                return Ok(decoded);
            }
            Err(err) => {
                tracing::trace!(?err, "candidate triple failed");
                if deepest.is_none_or(|d| err.stage_depth() > d.stage_depth()) {
                    deepest = Some(err);
                }
            }
        }
    }

    Err(deepest.unwrap_or(DecodeError::NotFound))
}

/// Run the post-locate stages for one ordered corner triple
fn decode_candidate(
    binary: &BitMatrix,
    corners: &CornerTriple,
    options: &DecodeOptions,
) -> Result<Decoded, DecodeError> {
    let geometry = SymbolGeometry::solve(binary, corners)?;
    let grid = sample_grid(binary, &geometry);

    let format = FormatInfo::extract(&grid)?;

    // The redundant version field cross-validates the span-derived version;
    // a confident disagreement means the transform landed somewhere wrong.
    if geometry.version.has_version_info() {
        let declared = extract_version(&grid)?;
        if declared != geometry.version {
            return Err(DecodeError::GeometryInvalid);
        }
    }

    let func = FunctionMask::new(geometry.version);
    let mut unmasked = grid;
    unmask(&mut unmasked, format.mask, &func);

    let bits = extract_bits(&unmasked, &func);
    let codewords = bits_to_codewords(&bits);

    let blocks = deinterleave(&codewords, geometry.version, format.ec_level)?;
    let mut data = Vec::with_capacity(codewords.len());
    for mut block in blocks {
        let ec_len = block.codewords.len() - block.data_len;
        let corrected = ReedSolomonDecoder::new(ec_len).correct(&mut block.codewords)?;
        if corrected > 0 {
            tracing::trace!(corrected, "reed-solomon corrections applied");
        }
        data.extend_from_slice(&block.codewords[..block.data_len]);
    }

    let (segments, bytes) = decode_payload(&data, geometry.version, options.byte_charset)?;
    if segments.is_empty() {
        return Err(DecodeError::MalformedPayload);
    }

    let text = segments
        .iter()
        .map(|segment| segment.text.as_str())
        .collect::<String>();

    Ok(Decoded {
        text,
        bytes,
        version: geometry.version,
        ec_level: format.ec_level,
        mask: format.mask,
    })
}
