//! Font metrics derived from the document's guidelines
//!
//! Vertical metrics are measured from the baseline guide. Horizontal
//! metrics are the side-bearings, measured from the left and right edges
//! of the document respectively.

use crate::core::errors::{EffectError, Result};
use crate::data::names::QName;
use crate::data::tree::ElementTree;
use crate::font_source::guidelines::{
    guideline_value, parse_coordinate, Axis, ASCENDER, BASELINE, CAPS, DESCENDER, LEFT_BEARING,
    RIGHT_BEARING, XHEIGHT,
};
use crate::logging::DIAGNOSTIC_TARGET;
use serde::Serialize;
use tracing::info;

/// Font metrics for spacing and positioning
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FontMetrics {
    /// Horizontal advance and units-per-em, taken from the document width
    pub set_width: i64,
    /// Absolute position of the baseline guide
    pub baseline: i64,
    pub ascender: i64,
    pub descender: i64,
    pub cap_height: i64,
    pub x_height: i64,
    pub left_bearing: i64,
    pub right_bearing: i64,
}

impl FontMetrics {
    /// Extract metrics from the document width and its guidelines
    pub fn from_document<T: ElementTree + ?Sized>(tree: &T) -> Result<Self> {
        let set_width = document_width(tree)?;
        let baseline = guideline_value(tree, BASELINE, Axis::Vertical)?;
        let relative = |label: &str| -> Result<i64> {
            guideline_value(tree, label, Axis::Vertical)?
                .checked_sub(baseline)
                .ok_or_else(|| EffectError::MetricOverflow {
                    metric: label.to_string(),
                })
        };
        let right_bearing = set_width
            .checked_sub(guideline_value(tree, RIGHT_BEARING, Axis::Horizontal)?)
            .ok_or_else(|| EffectError::MetricOverflow {
                metric: RIGHT_BEARING.to_string(),
            })?;

        Ok(Self {
            set_width,
            baseline,
            ascender: relative(ASCENDER)?,
            cap_height: relative(CAPS)?,
            x_height: relative(XHEIGHT)?,
            descender: relative(DESCENDER)?,
            left_bearing: guideline_value(tree, LEFT_BEARING, Axis::Horizontal)?,
            right_bearing,
        })
    }

    /// Write one `name: value` line per metric to the diagnostic log
    pub fn log(&self) {
        let entries = [
            ("setwidth", self.set_width),
            ("baseline", self.baseline),
            ("ascender", self.ascender),
            ("descender", self.descender),
            ("caps", self.cap_height),
            ("xheight", self.x_height),
            ("lbearing", self.left_bearing),
            ("rbearing", self.right_bearing),
        ];
        for (name, value) in entries {
            info!(target: DIAGNOSTIC_TARGET, "{name}: {value}");
        }
    }
}

/// The root element's `width`, in user units
fn document_width<T: ElementTree + ?Sized>(tree: &T) -> Result<i64> {
    let width = tree
        .attribute(tree.root(), &QName::local("width"))
        .ok_or(EffectError::MissingWidth)?;
    let number = width.trim();
    let number = number.strip_suffix("px").unwrap_or(number);
    parse_coordinate(number).ok_or_else(|| EffectError::InvalidWidth {
        value: width.to_string(),
    })
}
