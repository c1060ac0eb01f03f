//! Synthetic QR symbol builder for integration tests.
#![allow(dead_code)]
//!
//! Builds complete, standard-conformant symbols (segments, Reed-Solomon
//! blocks, interleaving, function patterns, format/version info, masking)
//! and renders them into pixel buffers, optionally rotated or warped.

use qrscan::decoder::blocks::block_info;
use qrscan::decoder::format::{copy_a_position, copy_b_position, FormatInfo};
use qrscan::decoder::function_mask::{alignment_pattern_positions, FunctionMask};
use qrscan::decoder::modes::{alphanumeric, kanji};
use qrscan::decoder::reed_solomon::rs_encode;
use qrscan::decoder::version::{bottom_left_position, encode_version, top_right_position};
use qrscan::models::{BitMatrix, EcLevel, MaskPattern, PixelBuffer, Point, Version};
use qrscan::utils::homography::PerspectiveTransform;

/// Standard pad codewords, alternated to fill spare data capacity
const PAD_CODEWORDS: [u8; 2] = [0xEC, 0x11];

/// Symbol parameters for one fixture
#[derive(Debug, Clone, Copy)]
pub struct SymbolSpec {
    pub version: Version,
    pub ec_level: EcLevel,
    pub mask: MaskPattern,
}

impl SymbolSpec {
    pub fn new(version: u8, ec_level: EcLevel, mask: u8) -> Self {
        Self {
            version: Version::new(version).unwrap(),
            ec_level,
            mask: MaskPattern::new(mask).unwrap(),
        }
    }
}

/// One segment to encode
pub enum Segment<'a> {
    Numeric(&'a str),
    Alphanumeric(&'a str),
    Bytes(&'a [u8]),
    /// Shift-JIS code units (two-byte codes)
    KanjiSjis(&'a [u16]),
}

struct BitSink(Vec<bool>);

impl BitSink {
    fn new() -> Self {
        Self(Vec::new())
    }

    fn push(&mut self, value: u32, count: usize) {
        for i in (0..count).rev() {
            self.0.push((value >> i) & 1 != 0);
        }
    }
}

fn count_field_bits(mode: u8, version: Version) -> usize {
    let v = version.number();
    match mode {
        0b0001 => match v {
            1..=9 => 10,
            10..=26 => 12,
            _ => 14,
        },
        0b0010 => match v {
            1..=9 => 9,
            10..=26 => 11,
            _ => 13,
        },
        0b0100 => match v {
            1..=9 => 8,
            _ => 16,
        },
        _ => match v {
            1..=9 => 8,
            10..=26 => 10,
            _ => 12,
        },
    }
}

fn encode_segments(sink: &mut BitSink, segments: &[Segment<'_>], version: Version) {
    for segment in segments {
        match segment {
            Segment::Numeric(digits) => {
                sink.push(0b0001, 4);
                sink.push(digits.len() as u32, count_field_bits(0b0001, version));
                let chars: Vec<u32> = digits.chars().map(|c| c.to_digit(10).unwrap()).collect();
                for chunk in chars.chunks(3) {
                    match chunk {
                        [a, b, c] => sink.push(a * 100 + b * 10 + c, 10),
                        [a, b] => sink.push(a * 10 + b, 7),
                        [a] => sink.push(*a, 4),
                        _ => unreachable!(),
                    }
                }
            }
            Segment::Alphanumeric(text) => {
                sink.push(0b0010, 4);
                sink.push(text.len() as u32, count_field_bits(0b0010, version));
                let indices: Vec<u32> = text
                    .chars()
                    .map(|c| alphanumeric::char_index(c).unwrap())
                    .collect();
                for chunk in indices.chunks(2) {
                    match chunk {
                        [a, b] => sink.push(a * 45 + b, 11),
                        [a] => sink.push(*a, 6),
                        _ => unreachable!(),
                    }
                }
            }
            Segment::Bytes(bytes) => {
                sink.push(0b0100, 4);
                sink.push(bytes.len() as u32, count_field_bits(0b0100, version));
                for &byte in *bytes {
                    sink.push(byte as u32, 8);
                }
            }
            Segment::KanjiSjis(codes) => {
                sink.push(0b1000, 4);
                sink.push(codes.len() as u32, count_field_bits(0b1000, version));
                for &code in *codes {
                    sink.push(kanji::pack_sjis(code).unwrap(), 13);
                }
            }
        }
    }
}

/// Data codewords for the spec: segments, terminator, padding
pub fn data_codewords(spec: &SymbolSpec, segments: &[Segment<'_>]) -> Vec<u8> {
    let func = FunctionMask::new(spec.version);
    let info = block_info(spec.version, spec.ec_level);
    let data_capacity = func.codeword_capacity() - info.num_blocks * info.ec_per_block;
    let capacity_bits = data_capacity * 8;

    let mut sink = BitSink::new();
    encode_segments(&mut sink, segments, spec.version);
    assert!(
        sink.0.len() <= capacity_bits,
        "segments need {} bits but the symbol holds {}",
        sink.0.len(),
        capacity_bits
    );

    // Terminator, truncated at capacity
    let terminator = 4.min(capacity_bits - sink.0.len());
    sink.push(0, terminator);
    while sink.0.len() % 8 != 0 {
        sink.0.push(false);
    }

    let mut codewords: Vec<u8> = sink
        .0
        .chunks(8)
        .map(|chunk| chunk.iter().fold(0u8, |byte, &bit| (byte << 1) | bit as u8))
        .collect();
    let mut pad = 0usize;
    while codewords.len() < data_capacity {
        codewords.push(PAD_CODEWORDS[pad % 2]);
        pad += 1;
    }
    codewords
}

/// Split into blocks, RS-encode each, and interleave
pub fn interleave_codewords(spec: &SymbolSpec, data: &[u8]) -> Vec<u8> {
    let info = block_info(spec.version, spec.ec_level);
    let num_long = data.len() % info.num_blocks;
    let num_short = info.num_blocks - num_long;
    let short_len = data.len() / info.num_blocks;

    let mut blocks = Vec::with_capacity(info.num_blocks);
    let mut offset = 0;
    for b in 0..info.num_blocks {
        let len = if b < num_short { short_len } else { short_len + 1 };
        blocks.push(rs_encode(&data[offset..offset + len], info.ec_per_block));
        offset += len;
    }

    let max_data_len = short_len + if num_long > 0 { 1 } else { 0 };
    let mut interleaved = Vec::new();
    for round in 0..max_data_len {
        for (b, block) in blocks.iter().enumerate() {
            let data_len = if b < num_short { short_len } else { short_len + 1 };
            if round < data_len {
                interleaved.push(block[round]);
            }
        }
    }
    for round in 0..info.ec_per_block {
        for (b, block) in blocks.iter().enumerate() {
            let data_len = if b < num_short { short_len } else { short_len + 1 };
            interleaved.push(block[data_len + round]);
        }
    }
    interleaved
}

/// Build the complete module grid for a symbol
pub fn build_modules(spec: &SymbolSpec, segments: &[Segment<'_>]) -> BitMatrix {
    let data = data_codewords(spec, segments);
    let interleaved = interleave_codewords(spec, &data);
    place_codewords(spec, &interleaved)
}

/// Build the grid with specific interleaved codewords corrupted first
pub fn build_modules_with_corruption(
    spec: &SymbolSpec,
    segments: &[Segment<'_>],
    corrupt_indices: &[usize],
) -> BitMatrix {
    let data = data_codewords(spec, segments);
    let mut interleaved = interleave_codewords(spec, &data);
    for &index in corrupt_indices {
        interleaved[index] ^= 0xA5;
    }
    place_codewords(spec, &interleaved)
}

/// Draw function patterns, metadata, and masked data into a fresh grid
fn place_codewords(spec: &SymbolSpec, interleaved: &[u8]) -> BitMatrix {
    let dim = spec.version.dimension();
    let func = FunctionMask::new(spec.version);
    let mut grid = BitMatrix::new(dim, dim);

    draw_finder(&mut grid, 0, 0);
    draw_finder(&mut grid, dim - 7, 0);
    draw_finder(&mut grid, 0, dim - 7);

    for i in 8..dim - 8 {
        grid.set(i, 6, i % 2 == 0);
        grid.set(6, i, i % 2 == 0);
    }

    let align = alignment_pattern_positions(spec.version.number());
    for &cx in &align {
        for &cy in &align {
            let in_tl = cx <= 8 && cy <= 8;
            let in_tr = cx >= dim - 9 && cy <= 8;
            let in_bl = cx <= 8 && cy >= dim - 9;
            if in_tl || in_tr || in_bl {
                continue;
            }
            draw_alignment(&mut grid, cx, cy);
        }
    }

    grid.set(8, dim - 8, true); // dark module

    let format = FormatInfo::encode(spec.ec_level, spec.mask);
    for i in 0..15 {
        let bit = format & (1 << i) != 0;
        let (ax, ay) = copy_a_position(i);
        grid.set(ax, ay, bit);
        let (bx, by) = copy_b_position(i, dim);
        grid.set(bx, by, bit);
    }

    if spec.version.has_version_info() {
        let encoded = encode_version(spec.version);
        for i in 0..18 {
            let bit = encoded & (1 << i) != 0;
            let (ax, ay) = top_right_position(i, dim);
            grid.set(ax, ay, bit);
            let (bx, by) = bottom_left_position(i, dim);
            grid.set(bx, by, bit);
        }
    }

    // Data bits in zig-zag order, masked as they are placed
    let mut bits = interleaved
        .iter()
        .flat_map(|&byte| (0..8).rev().map(move |i| (byte >> i) & 1 != 0));

    let mut upward = true;
    let mut col = dim as i32 - 1;
    while col > 0 {
        if col == 6 {
            col -= 1;
            continue;
        }
        let rows: Box<dyn Iterator<Item = usize>> = if upward {
            Box::new((0..dim).rev())
        } else {
            Box::new(0..dim)
        };
        for row in rows {
            for c in [col, col - 1] {
                let x = c as usize;
                if func.is_function(x, row) {
                    continue;
                }
                let bit = bits.next().unwrap_or(false);
                grid.set(x, row, bit ^ spec.mask.is_masked(row, x));
            }
        }
        upward = !upward;
        col -= 2;
    }

    grid
}

fn draw_finder(grid: &mut BitMatrix, ox: usize, oy: usize) {
    for my in 0..7 {
        for mx in 0..7 {
            let ring = mx == 0 || mx == 6 || my == 0 || my == 6;
            let core = (2..=4).contains(&mx) && (2..=4).contains(&my);
            grid.set(ox + mx, oy + my, ring || core);
        }
    }
}

fn draw_alignment(grid: &mut BitMatrix, cx: usize, cy: usize) {
    for dy in -2i32..=2 {
        for dx in -2i32..=2 {
            let black = dx.abs() == 2 || dy.abs() == 2 || (dx == 0 && dy == 0);
            grid.set(
                (cx as i32 + dx) as usize,
                (cy as i32 + dy) as usize,
                black,
            );
        }
    }
}

/// Rotate a module grid 90 degrees clockwise
pub fn rotate90(grid: &BitMatrix) -> BitMatrix {
    let n = grid.width();
    let mut out = BitMatrix::new(n, n);
    for y in 0..n {
        for x in 0..n {
            out.set(n - 1 - y, x, grid.get(x, y));
        }
    }
    out
}

/// Render a module grid into a luma pixel buffer.
///
/// `module_px` pixels per module, `quiet_modules` of white border.
pub fn render(grid: &BitMatrix, module_px: usize, quiet_modules: usize) -> PixelBuffer {
    let dim = grid.width();
    let side = (dim + 2 * quiet_modules) * module_px;
    let mut luma = vec![255u8; side * side];

    for my in 0..dim {
        for mx in 0..dim {
            if !grid.get(mx, my) {
                continue;
            }
            let x0 = (mx + quiet_modules) * module_px;
            let y0 = (my + quiet_modules) * module_px;
            for y in y0..y0 + module_px {
                for x in x0..x0 + module_px {
                    luma[y * side + x] = 0;
                }
            }
        }
    }

    PixelBuffer::from_luma(luma, side, side).unwrap()
}

/// Render through a perspective warp given the four output-image corners of
/// the quiet-zone boundary (top-left, top-right, bottom-left, bottom-right).
pub fn render_warped(
    grid: &BitMatrix,
    module_px: usize,
    quiet_modules: usize,
    out_side: usize,
    corners: [Point; 4],
) -> PixelBuffer {
    let dim = grid.width();
    let symbol_side = ((dim + 2 * quiet_modules) * module_px) as f32;

    // Maps output pixels back into flat symbol space
    let src = corners;
    let dst = [
        Point::new(0.0, 0.0),
        Point::new(symbol_side, 0.0),
        Point::new(0.0, symbol_side),
        Point::new(symbol_side, symbol_side),
    ];
    let inverse = PerspectiveTransform::from_points(&src, &dst).unwrap();

    let mut luma = vec![255u8; out_side * out_side];
    for y in 0..out_side {
        for x in 0..out_side {
            let p = inverse.transform(&Point::new(x as f32 + 0.5, y as f32 + 0.5));
            if p.x < 0.0 || p.y < 0.0 || p.x >= symbol_side || p.y >= symbol_side {
                continue;
            }
            let mx = (p.x as usize) / module_px;
            let my = (p.y as usize) / module_px;
            if mx < quiet_modules || my < quiet_modules {
                continue;
            }
            let gx = mx - quiet_modules;
            let gy = my - quiet_modules;
            if gx < dim && gy < dim && grid.get(gx, gy) {
                luma[y * out_side + x] = 0;
            }
        }
    }

    PixelBuffer::from_luma(luma, out_side, out_side).unwrap()
}
