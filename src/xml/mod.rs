//! XML element trees for response documents
//!
//! Response documents are small, built fresh on every render call, and
//! written out once, so a plain owned tree is the right shape. Serialization
//! lives in [`writer`].

mod writer;

pub use writer::{to_bytes_pretty, to_string_pretty, XmlWriteError};

/// XML namespace URIs used by WPS 1.0.0 response documents.
pub mod ns {
    pub const WPS: &str = "http://www.opengis.net/wps/1.0.0";
    pub const OWS: &str = "http://www.opengis.net/ows/1.1";
    pub const XSI: &str = "http://www.w3.org/2001/XMLSchema-instance";
    pub const XLINK: &str = "http://www.w3.org/1999/xlink";
}

/// A child node: nested element or character data.
#[derive(Debug, Clone, PartialEq)]
pub enum XmlNode {
    Element(XmlElement),
    Text(String),
}

/// An XML element with a prefixed name, attributes, and children.
///
/// Attribute and child order is preserved; the writer emits them exactly as
/// pushed.
#[derive(Debug, Clone, PartialEq)]
pub struct XmlElement {
    name: String,
    attrs: Vec<(String, String)>,
    children: Vec<XmlNode>,
}

impl XmlElement {
    /// Create an empty element. `name` carries its prefix (e.g. `wps:Status`).
    pub fn new(name: impl Into<String>) -> Self {
        XmlElement {
            name: name.into(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Builder: add an attribute.
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attr(name, value);
        self
    }

    /// Builder: add a text child.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.children.push(XmlNode::Text(text.into()));
        self
    }

    /// Builder: add a child element.
    pub fn with_child(mut self, child: XmlElement) -> Self {
        self.push(child);
        self
    }

    /// Set an attribute, replacing any existing value for the name.
    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.attrs.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => *existing = value,
            None => self.attrs.push((name, value)),
        }
    }

    /// Append a child element.
    pub fn push(&mut self, child: XmlElement) {
        self.children.push(XmlNode::Element(child));
    }

    /// The element's prefixed name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Attribute value by name, if present.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Attributes in insertion order.
    pub fn attrs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attrs.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    /// All nodes in insertion order.
    pub fn nodes(&self) -> &[XmlNode] {
        &self.children
    }

    /// Child elements in insertion order.
    pub fn children(&self) -> impl Iterator<Item = &XmlElement> {
        self.children.iter().filter_map(|n| match n {
            XmlNode::Element(e) => Some(e),
            XmlNode::Text(_) => None,
        })
    }

    /// First direct child element with the given prefixed name.
    pub fn find(&self, name: &str) -> Option<&XmlElement> {
        self.children().find(|e| e.name == name)
    }

    /// First element with the given prefixed name, searching depth-first.
    pub fn find_descendant(&self, name: &str) -> Option<&XmlElement> {
        for child in self.children() {
            if child.name == name {
                return Some(child);
            }
            if let Some(found) = child.find_descendant(name) {
                return Some(found);
            }
        }
        None
    }

    /// Concatenated direct text content.
    pub fn text(&self) -> String {
        self.children
            .iter()
            .filter_map(|n| match n {
                XmlNode::Text(t) => Some(t.as_str()),
                XmlNode::Element(_) => None,
            })
            .collect()
    }
}
