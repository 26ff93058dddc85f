//! Mapping `GlyphLayer-*` layers to SVG font glyphs

use crate::core::errors::{EffectError, Result};
use crate::data::names::QName;
use crate::data::tree::{ElementTree, NodeId};
use crate::editing::font_tree::get_or_create;
use serde::Serialize;
use std::collections::HashMap;
use tracing::debug;

/// Label marker for layers that hold a glyph. It may appear anywhere in the label.
pub const GLYPH_LAYER_MARKER: &str = "GlyphLayer-";

/// Glyph identifier carried by a layer label, if the label is a glyph layer.
///
/// The identifier is what follows the first marker, up to a second marker
/// if there is one.
pub fn glyph_identifier(label: &str) -> Option<&str> {
    label.split(GLYPH_LAYER_MARKER).nth(1)
}

/// Glyphs of one font, keyed by their `unicode` attribute
pub struct GlyphIndex {
    font: NodeId,
    glyphs: HashMap<String, NodeId>,
}

impl GlyphIndex {
    /// Index the font's existing glyphs; the first glyph for a value wins
    pub fn new<T: ElementTree + ?Sized>(tree: &T, font: NodeId) -> Self {
        let unicode = QName::local("unicode");
        let mut glyphs = HashMap::new();
        for glyph in tree.find_all(font, &QName::svg("glyph")) {
            if let Some(value) = tree.attribute(glyph, &unicode) {
                glyphs.entry(value.to_string()).or_insert(glyph);
            }
        }
        Self { font, glyphs }
    }

    /// The glyph for `unicode_char`, creating it under the font when missing.
    /// Returns whether the glyph is new.
    pub fn get_or_create_glyph<T: ElementTree + ?Sized>(
        &mut self,
        tree: &mut T,
        unicode_char: &str,
    ) -> (NodeId, bool) {
        if let Some(&glyph) = self.glyphs.get(unicode_char) {
            return (glyph, false);
        }
        let glyph = tree.create_child(self.font, QName::svg("glyph"));
        self.glyphs.insert(unicode_char.to_string(), glyph);
        (glyph, true)
    }
}

/// One layer turned into a glyph
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GlyphMapping {
    pub unicode: String,
    pub layer_id: String,
    pub created: bool,
}

/// Result of scanning the top-level layers
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LayerScan {
    pub glyphs: Vec<GlyphMapping>,
    pub skipped_layers: usize,
}

/// Point a glyph at every `GlyphLayer-*` top-level group through an `svg:use`.
pub fn map_glyph_layers<T: ElementTree + ?Sized>(tree: &mut T, font: NodeId) -> Result<LayerScan> {
    let label_name = QName::inkscape("label");
    let mut index = GlyphIndex::new(&*tree, font);
    let mut scan = LayerScan::default();

    let root = tree.root();
    for group in tree.find_all(root, &QName::svg("g")) {
        let Some(label) = tree.attribute(group, &label_name).map(str::to_string) else {
            scan.skipped_layers += 1;
            continue;
        };
        let Some(unicode_char) = glyph_identifier(&label) else {
            debug!("Skipping layer {:?}", label);
            scan.skipped_layers += 1;
            continue;
        };
        if unicode_char.is_empty() {
            return Err(EffectError::EmptyGlyphIdentifier { label });
        }
        let unicode_char = unicode_char.to_string();

        let layer_id = tree
            .attribute(group, &QName::local("id"))
            .map(str::to_string)
            .ok_or_else(|| EffectError::MissingLayerId {
                label: label.clone(),
            })?;

        let (glyph, created) = index.get_or_create_glyph(tree, &unicode_char);
        tree.set_attribute(glyph, QName::local("unicode"), unicode_char.clone());
        let reference = get_or_create(tree, glyph, &QName::svg("use"));
        tree.set_attribute(reference, QName::xlink("href"), format!("#{layer_id}"));

        debug!(
            "Layer {:?} -> glyph {:?} ({})",
            layer_id,
            unicode_char,
            if created { "new" } else { "updated" }
        );
        scan.glyphs.push(GlyphMapping {
            unicode: unicode_char,
            layer_id,
            created,
        });
    }

    Ok(scan)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::tree::SvgDocument;

    fn layer(doc: &mut SvgDocument, id: Option<&str>, label: Option<&str>) -> NodeId {
        let root = doc.root();
        let group = doc.create_child(root, QName::svg("g"));
        if let Some(id) = id {
            doc.set_attribute(group, QName::local("id"), id.to_string());
        }
        if let Some(label) = label {
            doc.set_attribute(group, QName::inkscape("label"), label.to_string());
        }
        group
    }

    fn font(doc: &mut SvgDocument) -> NodeId {
        let root = doc.root();
        let defs = doc.create_child(root, QName::svg("defs"));
        doc.create_child(defs, QName::svg("font"))
    }

    #[test]
    fn identifier_follows_marker_anywhere() {
        assert_eq!(glyph_identifier("GlyphLayer-0041"), Some("0041"));
        assert_eq!(glyph_identifier("old GlyphLayer-b"), Some("b"));
        assert_eq!(glyph_identifier("GlyphLayer-aGlyphLayer-b"), Some("a"));
        assert_eq!(glyph_identifier("GlyphLayer-"), Some(""));
        assert_eq!(glyph_identifier("Background"), None);
    }

    #[test]
    fn glyph_layer_gets_use_reference() {
        let mut doc = SvgDocument::new(QName::svg("svg"));
        let font = font(&mut doc);
        layer(&mut doc, Some("layer1"), Some("GlyphLayer-0041"));

        let scan = map_glyph_layers(&mut doc, font).unwrap();
        assert_eq!(scan.glyphs.len(), 1);
        assert!(scan.glyphs[0].created);

        let glyph = doc.find(font, &QName::svg("glyph")).unwrap();
        assert_eq!(doc.attribute(glyph, &QName::local("unicode")), Some("0041"));
        let reference = doc.find(glyph, &QName::svg("use")).unwrap();
        assert_eq!(doc.attribute(reference, &QName::xlink("href")), Some("#layer1"));
    }

    #[test]
    fn unmarked_and_unlabeled_groups_are_skipped() {
        let mut doc = SvgDocument::new(QName::svg("svg"));
        let font = font(&mut doc);
        layer(&mut doc, Some("layer1"), Some("Background"));
        layer(&mut doc, Some("g2"), None);

        let scan = map_glyph_layers(&mut doc, font).unwrap();
        assert!(scan.glyphs.is_empty());
        assert_eq!(scan.skipped_layers, 2);
        assert!(doc.find(font, &QName::svg("glyph")).is_none());
    }

    #[test]
    fn existing_glyph_is_reused() {
        let mut doc = SvgDocument::new(QName::svg("svg"));
        let font = font(&mut doc);
        let existing = doc.create_child(font, QName::svg("glyph"));
        doc.set_attribute(existing, QName::local("unicode"), "a".to_string());
        layer(&mut doc, Some("layer1"), Some("GlyphLayer-a"));

        let scan = map_glyph_layers(&mut doc, font).unwrap();
        assert!(!scan.glyphs[0].created);
        assert_eq!(doc.find_all(font, &QName::svg("glyph")), vec![existing]);
    }

    #[test]
    fn two_layers_for_one_character_share_a_glyph() {
        let mut doc = SvgDocument::new(QName::svg("svg"));
        let font = font(&mut doc);
        layer(&mut doc, Some("first"), Some("GlyphLayer-a"));
        layer(&mut doc, Some("second"), Some("GlyphLayer-a"));

        map_glyph_layers(&mut doc, font).unwrap();
        let glyphs = doc.find_all(font, &QName::svg("glyph"));
        assert_eq!(glyphs.len(), 1);

        let uses = doc.find_all(glyphs[0], &QName::svg("use"));
        assert_eq!(uses.len(), 1);
        assert_eq!(doc.attribute(uses[0], &QName::xlink("href")), Some("#second"));
    }

    #[test]
    fn empty_identifier_is_reported() {
        let mut doc = SvgDocument::new(QName::svg("svg"));
        let font = font(&mut doc);
        layer(&mut doc, Some("layer1"), Some("GlyphLayer-"));

        assert!(matches!(
            map_glyph_layers(&mut doc, font),
            Err(EffectError::EmptyGlyphIdentifier { .. })
        ));
    }

    #[test]
    fn glyph_layer_without_id_is_reported() {
        let mut doc = SvgDocument::new(QName::svg("svg"));
        let font = font(&mut doc);
        layer(&mut doc, None, Some("GlyphLayer-a"));

        assert!(matches!(
            map_glyph_layers(&mut doc, font),
            Err(EffectError::MissingLayerId { .. })
        ));
    }

    #[test]
    fn glyph_index_keeps_first_duplicate() {
        let mut doc = SvgDocument::new(QName::svg("svg"));
        let font = font(&mut doc);
        let first = doc.create_child(font, QName::svg("glyph"));
        let second = doc.create_child(font, QName::svg("glyph"));
        doc.set_attribute(first, QName::local("unicode"), "x".to_string());
        doc.set_attribute(second, QName::local("unicode"), "x".to_string());

        let mut index = GlyphIndex::new(&doc, font);
        assert_eq!(index.glyphs.len(), 1);
        assert_eq!(index.get_or_create_glyph(&mut doc, "x"), (first, false));
    }
}
