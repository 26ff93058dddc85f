//! SVG file I/O: `roxmltree` parsing into [`SvgDocument`] and serialization back to text

use crate::core::errors::Result;
use crate::data::names::{preferred_prefix, QName, SVG_NS, XML_NS};
use crate::data::tree::{Attribute, ElementData, NamespaceDecl, NodeId, NodeKind, SvgDocument};
use roxmltree::NodeType;

const XML_DECLARATION: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"no\"?>\n";

/// Parse SVG text into an owned document.
///
/// Comments, processing instructions and text (including whitespace) are
/// kept so that writing the document back only shows the effect's changes.
pub fn parse_svg(text: &str) -> Result<SvgDocument> {
    let options = roxmltree::ParsingOptions {
        allow_dtd: true,
        ..Default::default()
    };
    let xml = roxmltree::Document::parse_with_options(text, options)?;

    let mut doc = SvgDocument::empty();
    // Whitespace between top-level nodes is replaced by the newlines `write_svg` emits.
    for child in xml.root().children().filter(|child| !child.is_text()) {
        if let Some(id) = copy_node(&mut doc, SvgDocument::DOCUMENT_NODE, child) {
            if child == xml.root_element() {
                doc.set_root_element(id);
            }
        }
    }
    Ok(doc)
}

fn copy_node(doc: &mut SvgDocument, parent: NodeId, node: roxmltree::Node<'_, '_>) -> Option<NodeId> {
    let kind = match node.node_type() {
        NodeType::Root => return None,
        NodeType::Element => {
            let tag = node.tag_name();
            NodeKind::Element(ElementData {
                name: QName::new(tag.namespace().unwrap_or(""), tag.name()),
                attributes: node
                    .attributes()
                    .map(|attr| Attribute {
                        name: QName::new(attr.namespace().unwrap_or(""), attr.name()),
                        value: attr.value().to_string(),
                    })
                    .collect(),
                namespaces: declared_namespaces(node),
            })
        }
        NodeType::Text => NodeKind::Text(node.text().unwrap_or_default().to_string()),
        NodeType::Comment => NodeKind::Comment(node.text().unwrap_or_default().to_string()),
        NodeType::PI => {
            let pi = node.pi()?;
            NodeKind::ProcessingInstruction {
                target: pi.target.to_string(),
                value: pi.value.map(str::to_string),
            }
        }
    };

    let id = doc.push_node(parent, kind);
    for child in node.children() {
        copy_node(doc, id, child);
    }
    Some(id)
}

/// roxmltree reports every in-scope namespace; keep only those this element introduces
fn declared_namespaces(node: roxmltree::Node<'_, '_>) -> Vec<NamespaceDecl> {
    let inherited: Vec<(Option<&str>, &str)> = node
        .parent_element()
        .map(|parent| parent.namespaces().map(|ns| (ns.name(), ns.uri())).collect())
        .unwrap_or_default();

    node.namespaces()
        .filter(|ns| ns.name() != Some("xml"))
        .filter(|ns| !inherited.contains(&(ns.name(), ns.uri())))
        .map(|ns| NamespaceDecl {
            prefix: ns.name().map(str::to_string),
            uri: ns.uri().to_string(),
        })
        .collect()
}

/// Serialize a document to SVG text with an XML declaration.
///
/// Existing namespace declarations are written where they were parsed;
/// names in namespaces that are not in scope (for example `xlink:href` in a
/// document that never declared xlink) get a declaration on the element that
/// first needs them.
pub fn write_svg(doc: &SvgDocument) -> String {
    let mut writer = Writer {
        doc,
        out: String::from(XML_DECLARATION),
        scope: Vec::new(),
    };
    for &child in doc.children(SvgDocument::DOCUMENT_NODE) {
        writer.write_node(child);
        writer.out.push('\n');
    }
    writer.out
}

struct Writer<'a> {
    doc: &'a SvgDocument,
    out: String,
    scope: Vec<NamespaceDecl>,
}

impl Writer<'_> {
    fn write_node(&mut self, id: NodeId) {
        let doc = self.doc;
        match &doc.node(id).kind {
            NodeKind::Document => {}
            NodeKind::Element(data) => self.write_element(id, data),
            NodeKind::Text(text) => escape_into(&mut self.out, text, false),
            NodeKind::Comment(text) => {
                self.out.push_str("<!--");
                self.out.push_str(text);
                self.out.push_str("-->");
            }
            NodeKind::ProcessingInstruction { target, value } => {
                self.out.push_str("<?");
                self.out.push_str(target);
                if let Some(value) = value {
                    self.out.push(' ');
                    self.out.push_str(value);
                }
                self.out.push_str("?>");
            }
        }
    }

    fn write_element(&mut self, id: NodeId, data: &ElementData) {
        let scope_mark = self.scope.len();
        let mut declared = data.namespaces.clone();
        self.scope.extend(declared.iter().cloned());

        let tag = self.element_tag(&data.name, &mut declared);
        let attributes: Vec<(String, &str)> = data
            .attributes
            .iter()
            .map(|attr| (self.attribute_name(&attr.name, &mut declared), attr.value.as_str()))
            .collect();

        self.out.push('<');
        self.out.push_str(&tag);
        for decl in &declared {
            match &decl.prefix {
                Some(prefix) => {
                    self.out.push_str(" xmlns:");
                    self.out.push_str(prefix);
                }
                None => self.out.push_str(" xmlns"),
            }
            self.out.push_str("=\"");
            escape_into(&mut self.out, &decl.uri, true);
            self.out.push('"');
        }
        for (name, value) in attributes {
            self.out.push(' ');
            self.out.push_str(&name);
            self.out.push_str("=\"");
            escape_into(&mut self.out, value, true);
            self.out.push('"');
        }

        let doc = self.doc;
        let children = doc.children(id);
        if children.is_empty() {
            self.out.push_str(" />");
        } else {
            self.out.push('>');
            for &child in children {
                self.write_node(child);
            }
            self.out.push_str("</");
            self.out.push_str(&tag);
            self.out.push('>');
        }

        self.scope.truncate(scope_mark);
    }

    fn element_tag(&mut self, name: &QName, declared: &mut Vec<NamespaceDecl>) -> String {
        if !name.has_namespace() {
            if self.binding(None).is_some_and(|uri| !uri.is_empty()) {
                self.bind(declared, None, "");
            }
            return name.local.clone();
        }

        let prefix = match self.lookup_prefix(&name.namespace, true) {
            Some(prefix) => prefix,
            None => {
                let default_free = self.binding(None).is_none_or(str::is_empty);
                let prefix = if name.namespace == SVG_NS && default_free {
                    None
                } else {
                    Some(self.fresh_prefix(&name.namespace))
                };
                self.bind(declared, prefix.clone(), &name.namespace);
                prefix
            }
        };
        qualify(prefix.as_deref(), &name.local)
    }

    fn attribute_name(&mut self, name: &QName, declared: &mut Vec<NamespaceDecl>) -> String {
        if !name.has_namespace() {
            return name.local.clone();
        }
        if name.namespace == XML_NS {
            return qualify(Some("xml"), &name.local);
        }

        // The default namespace never applies to attributes.
        let prefix = match self.lookup_prefix(&name.namespace, false) {
            Some(prefix) => prefix,
            None => {
                let prefix = Some(self.fresh_prefix(&name.namespace));
                self.bind(declared, prefix.clone(), &name.namespace);
                prefix
            }
        };
        qualify(prefix.as_deref(), &name.local)
    }

    fn bind(&mut self, declared: &mut Vec<NamespaceDecl>, prefix: Option<String>, uri: &str) {
        let decl = NamespaceDecl {
            prefix,
            uri: uri.to_string(),
        };
        self.scope.push(decl.clone());
        declared.push(decl);
    }

    /// Innermost URI bound to `prefix`
    fn binding(&self, prefix: Option<&str>) -> Option<&str> {
        self.scope
            .iter()
            .rev()
            .find(|decl| decl.prefix.as_deref() == prefix)
            .map(|decl| decl.uri.as_str())
    }

    /// A prefix currently bound to `uri`, ignoring bindings shadowed by inner declarations
    fn lookup_prefix(&self, uri: &str, allow_default: bool) -> Option<Option<String>> {
        if allow_default && self.binding(None) == Some(uri) {
            return Some(None);
        }
        self.scope
            .iter()
            .rev()
            .filter(|decl| decl.uri == uri)
            .filter(|decl| allow_default || decl.prefix.is_some())
            .find(|decl| self.binding(decl.prefix.as_deref()) == Some(uri))
            .map(|decl| decl.prefix.clone())
    }

    fn fresh_prefix(&self, uri: &str) -> String {
        if let Some(preferred) = preferred_prefix(uri) {
            if self.binding(Some(preferred)).is_none() {
                return preferred.to_string();
            }
        }
        let mut n = 0usize;
        loop {
            let candidate = format!("ns{n}");
            if self.binding(Some(candidate.as_str())).is_none() {
                return candidate;
            }
            n += 1;
        }
    }
}

fn qualify(prefix: Option<&str>, local: &str) -> String {
    match prefix {
        Some(prefix) => format!("{prefix}:{local}"),
        None => local.to_string(),
    }
}

fn escape_into(out: &mut String, text: &str, attribute: bool) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if attribute => out.push_str("&quot;"),
            '\n' if attribute => out.push_str("&#10;"),
            '\r' => out.push_str("&#13;"),
            '\t' if attribute => out.push_str("&#9;"),
            _ => out.push(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::names::{INKSCAPE_NS, XLINK_NS};
    use crate::data::tree::ElementTree;

    const LAYERED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<!-- Created with Inkscape -->
<svg xmlns="http://www.w3.org/2000/svg" xmlns:inkscape="http://www.inkscape.org/namespaces/inkscape" width="1000">
  <g inkscape:label="GlyphLayer-A &amp; B" id="layer1"><text>x &lt; y</text></g>
</svg>"#;

    #[test]
    fn parse_keeps_namespaces_and_text() {
        let doc = parse_svg(LAYERED).unwrap();
        let root = doc.root();
        assert_eq!(doc.name(root), Some(&QName::svg("svg")));

        let layer = doc.find(root, &QName::svg("g")).unwrap();
        assert_eq!(
            doc.attribute(layer, &QName::new(INKSCAPE_NS, "label")),
            Some("GlyphLayer-A & B")
        );
    }

    #[test]
    fn write_preserves_prefixes_comments_and_escapes() {
        let doc = parse_svg(LAYERED).unwrap();
        let text = write_svg(&doc);

        assert!(text.starts_with("<?xml version=\"1.0\""));
        assert!(text.contains("<!-- Created with Inkscape -->"));
        assert!(text.contains(r#"xmlns="http://www.w3.org/2000/svg""#));
        assert!(text.contains(r#"xmlns:inkscape="http://www.inkscape.org/namespaces/inkscape""#));
        assert!(text.contains(r#"inkscape:label="GlyphLayer-A &amp; B""#));
        assert!(text.contains("<text>x &lt; y</text>"));

        // Writing is stable once the document went through us.
        let again = write_svg(&parse_svg(&text).unwrap());
        assert_eq!(text, again);
    }

    #[test]
    fn undeclared_namespace_gets_declared_where_used() {
        let mut doc = parse_svg(LAYERED).unwrap();
        let root = doc.root();
        let defs = doc.create_child(root, QName::svg("defs"));
        let usage = doc.create_child(defs, QName::svg("use"));
        doc.set_attribute(usage, QName::new(XLINK_NS, "href"), "#layer1".to_string());

        let text = write_svg(&doc);
        assert!(text.contains(
            r##"<use xmlns:xlink="http://www.w3.org/1999/xlink" xlink:href="#layer1" />"##
        ));
        assert!(text.contains("<defs>"));
    }

    #[test]
    fn prefixed_svg_documents_stay_prefixed() {
        let doc = parse_svg(
            r#"<svg:svg xmlns:svg="http://www.w3.org/2000/svg" width="10"><svg:g id="a"/></svg:svg>"#,
        )
        .unwrap();
        let text = write_svg(&doc);
        assert!(text.contains(r#"<svg:g id="a" />"#));
    }

    #[test]
    fn malformed_xml_is_an_error() {
        assert!(parse_svg("<svg><g></svg>").is_err());
    }
}
