//! Font source data read from the document being converted
//!
//! Inkscape documents carry their typographic metrics as labeled guides;
//! this module turns those into [`FontMetrics`].

pub mod guidelines;
pub mod metrics;

pub use guidelines::{guideline_value, Axis};
pub use metrics::FontMetrics;
