//! Decode a known-good symbol produced by an independent encoder.
//!
//! The 21x21 matrix below is real generator output (Python qrcode library)
//! for the numeric string "4376471154038" at version 1-M, mask 7. It pins
//! the wire conventions (format placement, mask formulas, zig-zag order,
//! block layout) against an implementation that is not our own fixture
//! builder.

mod common;

use qrscan::models::BitMatrix;
use qrscan::{decode, EcLevel};

const GOLDEN: [&str; 21] = [
    "#######.....#.#######",
    "#.....#..#....#.....#",
    "#.###.#...##..#.###.#",
    "#.###.#...#...#.###.#",
    "#.###.#..####.#.###.#",
    "#.....#.#.#...#.....#",
    "#######.#.#.#.#######",
    ".........#...........",
    "#..#.##.######.#.....",
    "###.#..##..#.#.#.##..",
    "#..#.####.##..###...#",
    "..#.#..#....#####....",
    "..#...##.#.#.###.##..",
    "........#.#..####.##.",
    "#######...###.#.####.",
    "#.....#.#.....##....#",
    "#.###.#..##.###..#.##",
    "#.###.#.#.#..####..##",
    "#.###.#..###.###.#..#",
    "#.....#..####..##..#.",
    "#######.###..#.###...",
];

fn golden_grid() -> BitMatrix {
    let mut grid = BitMatrix::new(21, 21);
    for (y, row) in GOLDEN.iter().enumerate() {
        for (x, cell) in row.chars().enumerate() {
            grid.set(x, y, cell == '#');
        }
    }
    grid
}

#[test]
fn test_golden_symbol_decodes() {
    let buffer = common::render(&golden_grid(), 4, 4);
    let decoded = decode(&buffer).expect("golden symbol must decode");
    assert_eq!(decoded.text, "4376471154038");
    assert_eq!(decoded.version.number(), 1);
    assert_eq!(decoded.ec_level, EcLevel::M);
    assert_eq!(decoded.mask.index(), 7);
}

#[test]
fn test_golden_symbol_rotated_still_decodes() {
    let rotated = common::rotate90(&golden_grid());
    let decoded = decode(&common::render(&rotated, 4, 4)).unwrap();
    assert_eq!(decoded.text, "4376471154038");
}
