//! SVG font element tree: `defs > font > font-face`

use crate::data::names::QName;
use crate::data::tree::{ElementTree, NodeId};
use crate::font_source::FontMetrics;

/// First child of `parent` named `name`, appending an empty one if there is none
pub fn get_or_create<T: ElementTree + ?Sized>(tree: &mut T, parent: NodeId, name: &QName) -> NodeId {
    match tree.find(parent, name) {
        Some(existing) => existing,
        None => tree.create_child(parent, name.clone()),
    }
}

/// Handles to the font definition elements of a document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FontTree {
    pub defs: NodeId,
    pub font: NodeId,
    pub font_face: NodeId,
}

impl FontTree {
    /// Find or create the font elements and refresh their metric attributes.
    ///
    /// Attributes are always overwritten, so re-running after moving a guide
    /// updates the font.
    pub fn build<T: ElementTree + ?Sized>(tree: &mut T, metrics: &FontMetrics) -> Self {
        let root = tree.root();
        let defs = get_or_create(tree, root, &QName::svg("defs"));
        let font = get_or_create(tree, defs, &QName::svg("font"));
        let font_face = get_or_create(tree, font, &QName::svg("font-face"));

        tree.set_attribute(font, QName::local("horiz-adv-x"), metrics.set_width.to_string());

        let face_attributes = [
            ("units-per-em", metrics.set_width),
            ("cap-height", metrics.cap_height),
            ("x-height", metrics.x_height),
            ("ascent", metrics.ascender),
            ("descent", metrics.descender),
        ];
        for (name, value) in face_attributes {
            tree.set_attribute(font_face, QName::local(name), value.to_string());
        }

        Self {
            defs,
            font,
            font_face,
        }
    }
}
