//! The document root.

use core::{fmt, ops::Deref};

use crate::{Element, Node, Result, node::NodeKind};

/// A live document: the root of a tree holding `<html>`, `<head>` and `<body>`.
///
/// Cloning a document clones the handle; both clones share one tree.
#[derive(Clone, PartialEq, Eq)]
pub struct Document {
    node: Node,
    html: Element,
    head: Element,
    body: Element,
}

impl Document {
    /// Creates an empty document with its `<html>`, `<head>` and `<body>` skeleton.
    ///
    /// # Errors
    ///
    /// Only fails if the skeleton itself cannot be assembled, which indicates a bug in
    /// the tree primitives.
    pub fn new() -> Result<Self> {
        let node = Node::from_kind(NodeKind::Document);
        let html = Element::new("html")?;
        let head = Element::new("head")?;
        let body = Element::new("body")?;
        html.append_child(&head)?;
        html.append_child(&body)?;
        node.append_child(&html)?;
        Ok(Self {
            node,
            html,
            head,
            body,
        })
    }

    /// Creates a detached element owned by no particular position yet.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidCharacter`] when `tag` is not a valid name.
    pub fn create_element(&self, tag: &str) -> Result<Element> {
        Element::new(tag)
    }

    /// Returns the `<html>` element.
    #[must_use]
    pub const fn document_element(&self) -> &Element {
        &self.html
    }

    /// Returns the `<head>` element.
    #[must_use]
    pub const fn head(&self) -> &Element {
        &self.head
    }

    /// Returns the `<body>` element.
    #[must_use]
    pub const fn body(&self) -> &Element {
        &self.body
    }

    /// Returns the first element, in document order, whose attribute `name` equals `value`.
    #[must_use]
    pub fn find_by_attribute(&self, name: &str, value: &str) -> Option<Element> {
        self.node
            .descendants()
            .filter_map(|node| node.as_element())
            .find(|element| element.attribute(name).as_deref() == Some(value))
    }

    /// Returns the first element with the given `id` attribute.
    #[must_use]
    pub fn get_element_by_id(&self, id: &str) -> Option<Element> {
        self.find_by_attribute("id", id)
    }
}

impl Deref for Document {
    type Target = Node;

    fn deref(&self) -> &Self::Target {
        &self.node
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("children", &self.body.child_count())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{NodeType, Text};

    #[test]
    fn skeleton_is_connected() {
        let document = Document::new().unwrap();
        assert_eq!(document.node_type(), NodeType::Document);
        assert!(document.body().is_connected());
        assert_eq!(document.body().parent().as_ref(), Some(document.document_element().as_node()));
        assert!(!Element::new("div").unwrap().is_connected());
    }

    #[test]
    fn documents_reject_text_children() {
        let document = Document::new().unwrap();
        assert!(document.append_child(&Text::new("x")).is_err());
    }

    #[test]
    fn lookup_by_id() {
        let document = Document::new().unwrap();
        let main = document.create_element("main").unwrap();
        main.set_attribute("id", "app").unwrap();
        document.body().append_child(&main).unwrap();
        assert_eq!(document.get_element_by_id("app"), Some(main));
        assert_eq!(document.get_element_by_id("missing"), None);
    }
}
