//! Symbol location: finder patterns, corner triples, and sampling geometry

/// Alignment pattern search
pub mod alignment;
/// Finder pattern scanning and cross-checking
pub mod finder;
/// Geometry solver (version, homography, alignment refinement)
pub mod geometry;
/// Triple selection and corner ordering
pub mod grouping;

pub use finder::{FinderLocator, FinderPattern};
pub use geometry::SymbolGeometry;
pub use grouping::CornerTriple;
