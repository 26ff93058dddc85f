//! Qualified XML names and the namespaces an Inkscape document uses

use std::fmt;

pub const SVG_NS: &str = "http://www.w3.org/2000/svg";
pub const XLINK_NS: &str = "http://www.w3.org/1999/xlink";
pub const SODIPODI_NS: &str = "http://sodipodi.sourceforge.net/DTD/sodipodi-0.dtd";
pub const INKSCAPE_NS: &str = "http://www.inkscape.org/namespaces/inkscape";
pub const XML_NS: &str = "http://www.w3.org/XML/1998/namespace";

/// Prefix to declare when a namespace is used but not yet bound in scope.
pub fn preferred_prefix(uri: &str) -> Option<&'static str> {
    match uri {
        SVG_NS => Some("svg"),
        XLINK_NS => Some("xlink"),
        SODIPODI_NS => Some("sodipodi"),
        INKSCAPE_NS => Some("inkscape"),
        XML_NS => Some("xml"),
        _ => None,
    }
}

/// An element or attribute name: namespace URI plus local part.
///
/// An empty namespace means "no namespace", which is what plain SVG
/// attributes such as `width` or `unicode` use.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QName {
    pub namespace: String,
    pub local: String,
}

impl QName {
    pub fn new(namespace: impl Into<String>, local: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            local: local.into(),
        }
    }

    /// A name without a namespace
    pub fn local(local: impl Into<String>) -> Self {
        Self::new("", local)
    }

    pub fn svg(local: &str) -> Self {
        Self::new(SVG_NS, local)
    }

    pub fn xlink(local: &str) -> Self {
        Self::new(XLINK_NS, local)
    }

    pub fn sodipodi(local: &str) -> Self {
        Self::new(SODIPODI_NS, local)
    }

    pub fn inkscape(local: &str) -> Self {
        Self::new(INKSCAPE_NS, local)
    }

    pub fn has_namespace(&self) -> bool {
        !self.namespace.is_empty()
    }
}

impl fmt::Display for QName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.has_namespace() {
            write!(f, "{{{}}}{}", self.namespace, self.local)
        } else {
            f.write_str(&self.local)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_uses_clark_notation() {
        assert_eq!(QName::svg("g").to_string(), format!("{{{SVG_NS}}}g"));
        assert_eq!(QName::local("width").to_string(), "width");
    }

    #[test]
    fn known_namespaces_have_prefixes() {
        assert_eq!(preferred_prefix(XLINK_NS), Some("xlink"));
        assert_eq!(preferred_prefix("urn:example"), None);
    }
}
