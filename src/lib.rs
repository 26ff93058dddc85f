//! layers2font
pub mod core;
pub mod data;
pub mod editing;
pub mod font_source;
pub mod logging;
