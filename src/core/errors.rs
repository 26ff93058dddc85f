//! Errors raised while applying the layers-to-font effect
//!
//! A missing guideline is not an error (its position defaults to 0) and
//! missing `defs`/`font`/`font-face` elements are created on demand, so
//! everything here describes input the effect cannot make sense of.

pub type Result<T> = std::result::Result<T, EffectError>;

#[derive(Debug, thiserror::Error)]
pub enum EffectError {
    #[error("Failed to parse SVG document: {0}")]
    Parse(#[from] roxmltree::Error),

    #[error("The document root has no `width` attribute, so the set-width is unknown")]
    MissingWidth,

    #[error("The document width {value:?} is not a number")]
    InvalidWidth { value: String },

    #[error("Guideline {label:?} has no `position` attribute")]
    MissingGuidePosition { label: String },

    #[error("Guideline {label:?} has position {position:?} without a numeric component {index}")]
    InvalidGuidePosition {
        label: String,
        position: String,
        index: usize,
    },

    #[error("The {metric:?} metric is out of range for the document's guides")]
    MetricOverflow { metric: String },

    #[error("Layer {label:?} has no identifier after `GlyphLayer-`")]
    EmptyGlyphIdentifier { label: String },

    #[error("Layer {label:?} has no `id` attribute to reference from its glyph")]
    MissingLayerId { label: String },
}
