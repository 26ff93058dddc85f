//! Guideline lookup
//!
//! Guides are `sodipodi:guide` children of the root's `sodipodi:namedview`,
//! each with an `inkscape:label` and a `position="x,y"` attribute.

use crate::core::errors::{EffectError, Result};
use crate::data::names::QName;
use crate::data::tree::ElementTree;

pub const BASELINE: &str = "baseline";
pub const ASCENDER: &str = "ascender";
pub const CAPS: &str = "caps";
pub const XHEIGHT: &str = "xheight";
pub const DESCENDER: &str = "descender";
pub const LEFT_BEARING: &str = "lbearing";
pub const RIGHT_BEARING: &str = "rbearing";

/// Which component of a guide's `position` to read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// Component 0, the x coordinate
    Horizontal,
    /// Component 1, the y coordinate
    Vertical,
}

impl Axis {
    pub fn index(self) -> usize {
        match self {
            Axis::Horizontal => 0,
            Axis::Vertical => 1,
        }
    }
}

/// Position of the first guide labeled exactly `label`, or 0 if there is none.
///
/// A document without a named view simply has no guides.
pub fn guideline_value<T: ElementTree + ?Sized>(tree: &T, label: &str, axis: Axis) -> Result<i64> {
    let Some(namedview) = tree.find(tree.root(), &QName::sodipodi("namedview")) else {
        return Ok(0);
    };
    let label_name = QName::inkscape("label");

    let guide = tree
        .find_all(namedview, &QName::sodipodi("guide"))
        .into_iter()
        .find(|&guide| tree.attribute(guide, &label_name) == Some(label));
    let Some(guide) = guide else {
        return Ok(0);
    };

    let position = tree
        .attribute(guide, &QName::local("position"))
        .ok_or_else(|| EffectError::MissingGuidePosition {
            label: label.to_string(),
        })?;

    let index = axis.index();
    position
        .split(',')
        .nth(index)
        .and_then(parse_coordinate)
        .ok_or_else(|| EffectError::InvalidGuidePosition {
            label: label.to_string(),
            position: position.to_string(),
            index,
        })
}

/// Parse an integer coordinate; fractional values are truncated toward zero
pub fn parse_coordinate(text: &str) -> Option<i64> {
    let text = text.trim();
    if let Ok(value) = text.parse::<i64>() {
        return Some(value);
    }
    let value = text.parse::<f64>().ok()?;
    if !value.is_finite() || value.abs() >= i64::MAX as f64 {
        return None;
    }
    Some(value.trunc() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::svg::parse_svg;

    fn document_with_guides(guides: &str) -> crate::data::SvgDocument {
        parse_svg(&format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg"
                    xmlns:sodipodi="http://sodipodi.sourceforge.net/DTD/sodipodi-0.dtd"
                    xmlns:inkscape="http://www.inkscape.org/namespaces/inkscape"
                    width="1000">
                 <sodipodi:namedview id="base">{guides}</sodipodi:namedview>
               </svg>"#
        ))
        .unwrap()
    }

    #[test]
    fn missing_label_defaults_to_zero() {
        let doc = document_with_guides(r#"<sodipodi:guide inkscape:label="baseline" position="0,200"/>"#);
        for label in [ASCENDER, CAPS, XHEIGHT, DESCENDER, LEFT_BEARING, RIGHT_BEARING] {
            assert_eq!(guideline_value(&doc, label, Axis::Vertical).unwrap(), 0);
            assert_eq!(guideline_value(&doc, label, Axis::Horizontal).unwrap(), 0);
        }
    }

    #[test]
    fn reads_requested_axis() {
        let doc = document_with_guides(r#"<sodipodi:guide inkscape:label="baseline" position="10,20"/>"#);
        assert_eq!(guideline_value(&doc, BASELINE, Axis::Vertical).unwrap(), 20);
        assert_eq!(guideline_value(&doc, BASELINE, Axis::Horizontal).unwrap(), 10);
    }

    #[test]
    fn first_matching_guide_wins() {
        let doc = document_with_guides(
            r#"<sodipodi:guide inkscape:label="caps" position="0,700"/>
               <sodipodi:guide inkscape:label="caps" position="0,710"/>"#,
        );
        assert_eq!(guideline_value(&doc, CAPS, Axis::Vertical).unwrap(), 700);
    }

    #[test]
    fn labels_match_exactly() {
        let doc = document_with_guides(r#"<sodipodi:guide inkscape:label="Baseline" position="0,200"/>"#);
        assert_eq!(guideline_value(&doc, BASELINE, Axis::Vertical).unwrap(), 0);
    }

    #[test]
    fn no_namedview_means_no_guides() {
        let doc = parse_svg(r#"<svg xmlns="http://www.w3.org/2000/svg" width="10"/>"#).unwrap();
        assert_eq!(guideline_value(&doc, BASELINE, Axis::Vertical).unwrap(), 0);
    }

    #[test]
    fn fractional_positions_are_truncated() {
        let doc = document_with_guides(r#"<sodipodi:guide inkscape:label="xheight" position="0, 480.75"/>"#);
        assert_eq!(guideline_value(&doc, XHEIGHT, Axis::Vertical).unwrap(), 480);
    }

    #[test]
    fn malformed_position_is_reported() {
        let doc = document_with_guides(
            r#"<sodipodi:guide inkscape:label="baseline" position="12"/>
               <sodipodi:guide inkscape:label="caps" position="a,b"/>
               <sodipodi:guide inkscape:label="ascender"/>"#,
        );
        assert!(matches!(
            guideline_value(&doc, BASELINE, Axis::Vertical),
            Err(EffectError::InvalidGuidePosition { index: 1, .. })
        ));
        assert!(matches!(
            guideline_value(&doc, CAPS, Axis::Horizontal),
            Err(EffectError::InvalidGuidePosition { index: 0, .. })
        ));
        assert!(matches!(
            guideline_value(&doc, ASCENDER, Axis::Vertical),
            Err(EffectError::MissingGuidePosition { .. })
        ));
    }

    #[test]
    fn parse_coordinate_accepts_signs_and_decimals() {
        assert_eq!(parse_coordinate("-150"), Some(-150));
        assert_eq!(parse_coordinate(" 42 "), Some(42));
        assert_eq!(parse_coordinate("-0.9"), Some(0));
        assert_eq!(parse_coordinate("NaN"), None);
        assert_eq!(parse_coordinate(""), None);
    }
}
