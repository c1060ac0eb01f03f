//! Luminance conversion from interleaved RGB/RGBA samples.

use rayon::prelude::*;

/// Integer BT.601 weights, scaled by 256
const WEIGHT_R: u32 = 77;
const WEIGHT_G: u32 = 150;
const WEIGHT_B: u32 = 29;

/// Convert interleaved RGB or RGBA bytes to one luma byte per pixel.
///
/// `bytes_per_pixel` selects the stride (3 for RGB, 4 for RGBA); any alpha
/// channel is ignored. Rows are converted in parallel.
pub fn rgb_to_luma(data: &[u8], width: usize, height: usize, bytes_per_pixel: usize) -> Vec<u8> {
    debug_assert_eq!(data.len(), width * height * bytes_per_pixel);

    let mut luma = vec![0u8; width * height];
    luma.par_chunks_mut(width)
        .zip(data.par_chunks(width * bytes_per_pixel))
        .for_each(|(luma_row, pixel_row)| {
            for (out, pixel) in luma_row.iter_mut().zip(pixel_row.chunks(bytes_per_pixel)) {
                let r = pixel[0] as u32;
                let g = pixel[1] as u32;
                let b = pixel[2] as u32;
                *out = ((r * WEIGHT_R + g * WEIGHT_G + b * WEIGHT_B) >> 8) as u8;
            }
        });
    luma
}
