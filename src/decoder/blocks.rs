//! Error-correction block structure and codeword deinterleaving.

use crate::error::DecodeError;
use crate::models::{EcLevel, Version};

/// Block structure for one (version, EC level) combination
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockInfo {
    /// Number of Reed-Solomon blocks
    pub num_blocks: usize,
    /// EC codewords per block
    pub ec_per_block: usize,
}

// Tables from the QR Code specification (Model 2).
// Index: [ec_level][version]
const EC_CODEWORDS_PER_BLOCK: [[i8; 41]; 4] = [
    [
        -1, 7, 10, 15, 20, 26, 18, 20, 24, 30, 18, 20, 24, 26, 30, 22, 24, 28, 30, 28, 28, 28, 28,
        30, 30, 26, 28, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30,
    ], // Low
    [
        -1, 10, 16, 26, 18, 24, 16, 18, 22, 22, 26, 30, 22, 22, 24, 24, 28, 28, 26, 26, 26, 26, 28,
        28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28,
    ], // Medium
    [
        -1, 13, 22, 18, 26, 18, 24, 18, 22, 20, 24, 28, 26, 24, 20, 30, 24, 28, 28, 26, 30, 28, 30,
        30, 30, 30, 28, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30,
    ], // Quartile
    [
        -1, 17, 28, 22, 16, 22, 28, 26, 26, 24, 28, 24, 28, 22, 24, 24, 30, 28, 28, 26, 28, 30, 24,
        30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30,
    ], // High
];

const NUM_BLOCKS: [[i8; 41]; 4] = [
    [
        -1, 1, 1, 1, 1, 1, 2, 2, 2, 2, 4, 4, 4, 4, 4, 6, 6, 6, 6, 7, 8, 8, 9, 9, 10, 12, 12, 12,
        13, 14, 15, 16, 17, 18, 19, 19, 20, 21, 22, 24, 25,
    ], // Low
    [
        -1, 1, 1, 1, 2, 2, 4, 4, 4, 5, 5, 5, 8, 9, 9, 10, 10, 11, 13, 14, 16, 17, 17, 18, 20, 21,
        23, 25, 26, 28, 29, 31, 33, 35, 37, 38, 40, 43, 45, 47, 49,
    ], // Medium
    [
        -1, 1, 1, 2, 2, 4, 4, 6, 6, 8, 8, 8, 10, 12, 16, 12, 17, 16, 18, 21, 20, 23, 23, 25, 27,
        29, 34, 34, 35, 38, 40, 43, 45, 48, 51, 53, 56, 59, 62, 65, 68,
    ], // Quartile
    [
        -1, 1, 1, 2, 4, 4, 4, 5, 6, 8, 8, 11, 11, 16, 16, 18, 16, 19, 21, 25, 25, 25, 34, 30, 32,
        35, 37, 40, 42, 45, 48, 51, 54, 57, 60, 63, 66, 70, 74, 77, 81,
    ], // High
];

/// Block structure for a (version, EC level) pair
pub fn block_info(version: Version, ec_level: EcLevel) -> BlockInfo {
    let idx = ec_level.table_index();
    let v = version.number() as usize;
    BlockInfo {
        num_blocks: NUM_BLOCKS[idx][v] as usize,
        ec_per_block: EC_CODEWORDS_PER_BLOCK[idx][v] as usize,
    }
}

/// One deinterleaved block: data codewords followed by EC codewords
#[derive(Debug, Clone)]
pub struct CodewordBlock {
    /// Data + EC codewords, contiguous
    pub codewords: Vec<u8>,
    /// How many leading codewords are data
    pub data_len: usize,
}

/// Undo the block interleaving of the raw codeword sequence.
///
/// Data codewords are interleaved one byte per block per round (shorter
/// blocks drop out early), then all EC codewords the same way. Fails with
/// [`DecodeError::UncorrectableBlock`] when the stream is shorter than the
/// block structure requires.
pub fn deinterleave(
    codewords: &[u8],
    version: Version,
    ec_level: EcLevel,
) -> Result<Vec<CodewordBlock>, DecodeError> {
    let info = block_info(version, ec_level);
    let total = codewords.len();
    let ec_total = info.num_blocks * info.ec_per_block;
    if total <= ec_total {
        return Err(DecodeError::UncorrectableBlock);
    }
    let data_total = total - ec_total;

    let num_long = data_total % info.num_blocks;
    let num_short = info.num_blocks - num_long;
    let short_len = data_total / info.num_blocks;
    let long_len = short_len + 1;

    let mut blocks: Vec<CodewordBlock> = (0..info.num_blocks)
        .map(|b| CodewordBlock {
            codewords: Vec::with_capacity(long_len + info.ec_per_block),
            data_len: if b < num_short { short_len } else { long_len },
        })
        .collect();

    let mut index = 0;
    for round in 0..long_len {
        for block in blocks.iter_mut() {
            if round < block.data_len {
                if index >= total {
                    return Err(DecodeError::UncorrectableBlock);
                }
                block.codewords.push(codewords[index]);
                index += 1;
            }
        }
    }

    for _ in 0..info.ec_per_block {
        for block in blocks.iter_mut() {
            if index >= total {
                return Err(DecodeError::UncorrectableBlock);
            }
            block.codewords.push(codewords[index]);
            index += 1;
        }
    }

    Ok(blocks)
}
