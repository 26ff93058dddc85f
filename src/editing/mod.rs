//! The layers-to-font effect
//!
//! One linear pass over the document:
//! - extract metrics from the guides
//! - find or create `defs > font > font-face` and write the metrics
//! - point a glyph at each `GlyphLayer-*` layer
//!
//! Running it again on its own output changes nothing but refreshed
//! attribute values.

pub mod font_tree;
pub mod glyph_layers;

pub use font_tree::{get_or_create, FontTree};
pub use glyph_layers::{map_glyph_layers, GlyphIndex, GlyphMapping, LayerScan};

use crate::core::errors::Result;
use crate::data::tree::ElementTree;
use crate::font_source::FontMetrics;
use serde::Serialize;
use tracing::info;

/// What one run of the effect did
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EffectReport {
    pub metrics: FontMetrics,
    pub glyphs: Vec<GlyphMapping>,
    pub skipped_layers: usize,
}

impl EffectReport {
    pub fn created_glyphs(&self) -> usize {
        self.glyphs.iter().filter(|glyph| glyph.created).count()
    }
}

/// Apply the effect to a document in place
pub fn apply<T: ElementTree + ?Sized>(tree: &mut T) -> Result<EffectReport> {
    let metrics = FontMetrics::from_document(&*tree)?;
    metrics.log();

    let font_tree = FontTree::build(tree, &metrics);
    let scan = map_glyph_layers(tree, font_tree.font)?;

    let report = EffectReport {
        metrics,
        glyphs: scan.glyphs,
        skipped_layers: scan.skipped_layers,
    };
    info!(
        "Mapped {} glyph layers ({} new glyphs), skipped {} layers",
        report.glyphs.len(),
        report.created_glyphs(),
        report.skipped_layers
    );
    Ok(report)
}
