//! SVG document data
//!
//! The owned element tree the effect mutates, the names it is addressed
//! with, and reading/writing it as SVG text or files.

pub mod files;
pub mod names;
pub mod svg;
pub mod tree;

pub use files::{load_svg, PendingWrite};
pub use names::QName;
pub use svg::{parse_svg, write_svg};
pub use tree::{ElementTree, NodeId, SvgDocument};
