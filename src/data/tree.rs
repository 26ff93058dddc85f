//! Owned, mutable SVG document tree
//!
//! Nodes live in an arena and are addressed by [`NodeId`], so the effect can
//! hold several handles (defs, font, glyph) while mutating the document.

use crate::data::names::QName;

/// Handle to a node inside a [`SvgDocument`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

/// Element access used by the effect.
///
/// Only direct children are searched, matching how Inkscape effects address
/// layers (top-level groups) and the named view (child of the root).
pub trait ElementTree {
    /// The document's root element
    fn root(&self) -> NodeId;

    /// First child element of `parent` named `name`
    fn find(&self, parent: NodeId, name: &QName) -> Option<NodeId>;

    /// All child elements of `parent` named `name`, in document order
    fn find_all(&self, parent: NodeId, name: &QName) -> Vec<NodeId>;

    /// Append a new empty element named `name` as the last child of `parent`
    fn create_child(&mut self, parent: NodeId, name: QName) -> NodeId;

    fn attribute(&self, element: NodeId, name: &QName) -> Option<&str>;

    /// Set an attribute, overwriting any previous value
    fn set_attribute(&mut self, element: NodeId, name: QName, value: String);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: QName,
    pub value: String,
}

/// A namespace declaration written on an element (`xmlns` / `xmlns:prefix`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespaceDecl {
    pub prefix: Option<String>,
    pub uri: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementData {
    pub name: QName,
    pub attributes: Vec<Attribute>,
    pub namespaces: Vec<NamespaceDecl>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// The document node holding the prolog and the root element
    Document,
    Element(ElementData),
    Text(String),
    Comment(String),
    ProcessingInstruction {
        target: String,
        value: Option<String>,
    },
}

#[derive(Debug, Clone)]
pub struct Node {
    pub kind: NodeKind,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
}

#[derive(Debug, Clone)]
pub struct SvgDocument {
    nodes: Vec<Node>,
    root_element: NodeId,
}

impl SvgDocument {
    pub(crate) const DOCUMENT_NODE: NodeId = NodeId(0);

    /// Create a document whose root element is `root`
    pub fn new(root: QName) -> Self {
        let mut doc = Self::empty();
        doc.root_element = doc.push_node(
            Self::DOCUMENT_NODE,
            NodeKind::Element(ElementData {
                name: root,
                attributes: Vec::new(),
                namespaces: Vec::new(),
            }),
        );
        doc
    }

    /// An empty document used while building from a parser
    pub(crate) fn empty() -> Self {
        Self {
            nodes: vec![Node {
                kind: NodeKind::Document,
                parent: None,
                children: Vec::new(),
            }],
            root_element: Self::DOCUMENT_NODE,
        }
    }

    pub(crate) fn set_root_element(&mut self, id: NodeId) {
        self.root_element = id;
    }

    /// Append any kind of node under `parent`
    pub(crate) fn push_node(&mut self, parent: NodeId, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            kind,
            parent: Some(parent),
            children: Vec::new(),
        });
        self.nodes[parent.0].children.push(id);
        id
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn element(&self, id: NodeId) -> Option<&ElementData> {
        match &self.nodes[id.0].kind {
            NodeKind::Element(data) => Some(data),
            _ => None,
        }
    }

    fn element_mut(&mut self, id: NodeId) -> Option<&mut ElementData> {
        match &mut self.nodes[id.0].kind {
            NodeKind::Element(data) => Some(data),
            _ => None,
        }
    }

    pub fn name(&self, id: NodeId) -> Option<&QName> {
        self.element(id).map(|data| &data.name)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    /// Child elements of `parent`, skipping text and comments
    pub fn child_elements(&self, parent: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.children(parent)
            .iter()
            .copied()
            .filter(|&child| self.element(child).is_some())
    }

    /// Number of elements in the whole document
    #[cfg(test)]
    pub(crate) fn element_count(&self) -> usize {
        self.nodes
            .iter()
            .filter(|node| matches!(node.kind, NodeKind::Element(_)))
            .count()
    }
}

impl ElementTree for SvgDocument {
    fn root(&self) -> NodeId {
        self.root_element
    }

    fn find(&self, parent: NodeId, name: &QName) -> Option<NodeId> {
        self.child_elements(parent)
            .find(|&child| self.name(child) == Some(name))
    }

    fn find_all(&self, parent: NodeId, name: &QName) -> Vec<NodeId> {
        self.child_elements(parent)
            .filter(|&child| self.name(child) == Some(name))
            .collect()
    }

    fn create_child(&mut self, parent: NodeId, name: QName) -> NodeId {
        self.push_node(
            parent,
            NodeKind::Element(ElementData {
                name,
                attributes: Vec::new(),
                namespaces: Vec::new(),
            }),
        )
    }

    fn attribute(&self, element: NodeId, name: &QName) -> Option<&str> {
        self.element(element)?
            .attributes
            .iter()
            .find(|attr| &attr.name == name)
            .map(|attr| attr.value.as_str())
    }

    fn set_attribute(&mut self, element: NodeId, name: QName, value: String) {
        let Some(data) = self.element_mut(element) else {
            return;
        };
        match data.attributes.iter_mut().find(|attr| attr.name == name) {
            Some(existing) => existing.value = value,
            None => data.attributes.push(Attribute { name, value }),
        }
    }
}
