//! Node handles and the tree primitives built on them.
//!
//! A [`Node`] is a reference-counted handle: cloning it yields another handle to the same node,
//! and equality compares identity, not structure. Children are owned by their parent; the parent
//! link is weak, so dropping a detached subtree frees it.

use alloc::{
    collections::BTreeMap,
    rc::{Rc, Weak},
    string::{String, ToString},
    vec::Vec,
};
use core::{cell::RefCell, fmt, ops::Deref};

use tracing::warn;

use crate::{Error, Event, Listener, Result};

/// The kind of a [`Node`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeType {
    /// The document root.
    Document,
    /// An element such as `<div>`.
    Element,
    /// Character data.
    Text,
}

pub(crate) struct NodeData {
    parent: RefCell<Weak<NodeData>>,
    children: RefCell<Vec<Node>>,
    listeners: RefCell<Vec<(String, Listener)>>,
    kind: NodeKind,
}

pub(crate) enum NodeKind {
    Document,
    Element(ElementData),
    Text(RefCell<String>),
}

pub(crate) struct ElementData {
    tag: String,
    attributes: RefCell<Vec<(String, String)>>,
    properties: RefCell<BTreeMap<String, bool>>,
}

/// A handle to a node in a document tree.
#[derive(Clone)]
pub struct Node(Rc<NodeData>);

/// A non-owning handle to a [`Node`].
#[derive(Debug, Clone, Default)]
pub struct WeakNode(Weak<NodeData>);

impl WeakNode {
    /// Returns the node, if it is still alive.
    #[must_use]
    pub fn upgrade(&self) -> Option<Node> {
        self.0.upgrade().map(Node)
    }
}

impl Node {
    pub(crate) fn from_kind(kind: NodeKind) -> Self {
        Self(Rc::new(NodeData {
            parent: RefCell::new(Weak::new()),
            children: RefCell::new(Vec::new()),
            listeners: RefCell::new(Vec::new()),
            kind,
        }))
    }

    /// Returns the kind of this node.
    #[must_use]
    pub fn node_type(&self) -> NodeType {
        match self.0.kind {
            NodeKind::Document => NodeType::Document,
            NodeKind::Element(_) => NodeType::Element,
            NodeKind::Text(_) => NodeType::Text,
        }
    }

    /// Returns an element handle when this node is an element.
    #[must_use]
    pub fn as_element(&self) -> Option<Element> {
        matches!(self.0.kind, NodeKind::Element(_)).then(|| Element(self.clone()))
    }

    /// Returns a text handle when this node is a text node.
    #[must_use]
    pub fn as_text(&self) -> Option<Text> {
        matches!(self.0.kind, NodeKind::Text(_)).then(|| Text(self.clone()))
    }

    /// Creates a weak handle to this node.
    #[must_use]
    pub fn downgrade(&self) -> WeakNode {
        WeakNode(Rc::downgrade(&self.0))
    }

    /// Returns `true` when both handles address the same node.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Returns the parent node, if attached.
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        self.0.parent.borrow().upgrade().map(Node)
    }

    /// Returns a snapshot of the children in order.
    #[must_use]
    pub fn children(&self) -> Vec<Self> {
        self.0.children.borrow().clone()
    }

    /// Returns the child elements in order, skipping text nodes.
    #[must_use]
    pub fn child_elements(&self) -> Vec<Element> {
        self.0
            .children
            .borrow()
            .iter()
            .filter_map(Self::as_element)
            .collect()
    }

    /// Returns the first child, if any.
    #[must_use]
    pub fn first_child(&self) -> Option<Self> {
        self.0.children.borrow().first().cloned()
    }

    /// Returns the number of children.
    #[must_use]
    pub fn child_count(&self) -> usize {
        self.0.children.borrow().len()
    }

    /// Returns the position of this node among its parent's children.
    #[must_use]
    pub fn index_in_parent(&self) -> Option<usize> {
        let parent = self.parent()?;
        let children = parent.0.children.borrow();
        children.iter().position(|child| child.ptr_eq(self))
    }

    /// Returns the sibling immediately after this node.
    #[must_use]
    pub fn next_sibling(&self) -> Option<Self> {
        let parent = self.parent()?;
        let index = self.index_in_parent()?;
        let children = parent.0.children.borrow();
        children.get(index + 1).cloned()
    }

    /// Returns `true` when `other` is this node or one of its descendants.
    #[must_use]
    pub fn contains(&self, other: &Self) -> bool {
        let mut current = Some(other.clone());
        while let Some(node) = current {
            if node.ptr_eq(self) {
                return true;
            }
            current = node.parent();
        }
        false
    }

    /// Returns `true` when the ancestor chain of this node reaches a document.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        let mut current = Some(self.clone());
        while let Some(node) = current {
            if node.node_type() == NodeType::Document {
                return true;
            }
            current = node.parent();
        }
        false
    }

    /// Returns the concatenated character data of this node and its descendants.
    #[must_use]
    pub fn text_content(&self) -> String {
        match &self.0.kind {
            NodeKind::Text(data) => data.borrow().clone(),
            NodeKind::Document | NodeKind::Element(_) => {
                let mut out = String::new();
                for node in self.descendants() {
                    if let NodeKind::Text(data) = &node.0.kind {
                        out.push_str(&data.borrow());
                    }
                }
                out
            }
        }
    }

    /// Appends `child` as the last child of this node.
    ///
    /// A child that already has a parent is moved.
    ///
    /// # Errors
    ///
    /// Returns [`Error::HierarchyRequest`] when the insertion would produce an invalid tree.
    pub fn append_child(&self, child: &Self) -> Result<()> {
        self.ensure_pre_insert(child)?;
        child.remove();
        *child.0.parent.borrow_mut() = Rc::downgrade(&self.0);
        self.0.children.borrow_mut().push(child.clone());
        Ok(())
    }

    /// Inserts `child` immediately before `reference`, which must be a child of this node.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] when `reference` is not a child of this node, or
    /// [`Error::HierarchyRequest`] when the insertion would produce an invalid tree.
    pub fn insert_before(&self, child: &Self, reference: &Self) -> Result<()> {
        if !reference.parent().is_some_and(|parent| parent.ptr_eq(self)) {
            return Err(Error::NotFound);
        }
        self.ensure_pre_insert(child)?;
        if child.ptr_eq(reference) {
            return Ok(());
        }
        child.remove();
        let mut children = self.0.children.borrow_mut();
        let index = children
            .iter()
            .position(|node| node.ptr_eq(reference))
            .ok_or(Error::NotFound)?;
        *child.0.parent.borrow_mut() = Rc::downgrade(&self.0);
        children.insert(index, child.clone());
        Ok(())
    }

    /// Detaches this node from its parent. Does nothing for a detached node.
    pub fn remove(&self) {
        let Some(parent) = self.parent() else {
            return;
        };
        parent
            .0
            .children
            .borrow_mut()
            .retain(|node| !node.ptr_eq(self));
        *self.0.parent.borrow_mut() = Weak::new();
    }

    fn ensure_pre_insert(&self, child: &Self) -> Result<()> {
        match (&self.0.kind, &child.0.kind) {
            (NodeKind::Text(_), _) => Err(Error::HierarchyRequest("text nodes cannot have children")),
            (_, NodeKind::Document) => Err(Error::HierarchyRequest("a document cannot be inserted")),
            (NodeKind::Document, NodeKind::Text(_)) => {
                Err(Error::HierarchyRequest("a document only holds elements"))
            }
            _ if child.contains(self) => {
                Err(Error::HierarchyRequest("a node cannot be inserted into itself"))
            }
            _ => Ok(()),
        }
    }

    /// Iterates over every descendant in document order, excluding this node.
    #[must_use]
    pub fn descendants(&self) -> Descendants {
        let mut stack = self.children();
        stack.reverse();
        Descendants { stack }
    }

    /// Returns every descendant element whose attribute `name` equals `value`, in document order.
    #[must_use]
    pub fn find_all_by_attribute(&self, name: &str, value: &str) -> Vec<Element> {
        self.descendants()
            .filter_map(|node| node.as_element())
            .filter(|element| element.attribute(name).as_deref() == Some(value))
            .collect()
    }

    /// Registers `listener` for events of `event_type` on this node.
    pub fn add_event_listener(&self, event_type: impl Into<String>, listener: Listener) {
        self.0
            .listeners
            .borrow_mut()
            .push((event_type.into(), listener));
    }

    /// Removes every listener registered for `event_type`.
    pub fn remove_event_listeners(&self, event_type: &str) {
        self.0
            .listeners
            .borrow_mut()
            .retain(|(ty, _)| ty != event_type);
    }

    /// Returns the number of listeners registered for `event_type`.
    #[must_use]
    pub fn listener_count(&self, event_type: &str) -> usize {
        self.0
            .listeners
            .borrow()
            .iter()
            .filter(|(ty, _)| ty == event_type)
            .count()
    }

    /// Dispatches `event` at this node.
    ///
    /// Listeners and the propagation path are snapshotted before any listener runs, so listeners
    /// may mutate the tree, including replacing the node they are attached to. Every listener
    /// runs even when an earlier one fails.
    ///
    /// # Errors
    ///
    /// Returns the first error produced by a listener.
    pub fn dispatch_event(&self, event: &Event) -> Result<()> {
        event.set_target(self.clone());

        let mut path = Vec::new();
        let mut current = Some(self.clone());
        while let Some(node) = current {
            current = if event.bubbles() { node.parent() } else { None };
            path.push(node);
        }

        let mut first_error = None;
        for node in path {
            let listeners: Vec<Listener> = node
                .0
                .listeners
                .borrow()
                .iter()
                .filter(|(ty, _)| ty == event.event_type())
                .map(|(_, listener)| listener.clone())
                .collect();
            for listener in listeners {
                if let Err(error) = listener.call(event) {
                    warn!(event = event.event_type(), %error, "event listener failed");
                    first_error.get_or_insert(error);
                }
            }
            if event.is_propagation_stopped() {
                break;
            }
        }

        first_error.map_or(Ok(()), Err)
    }

    pub(crate) fn kind(&self) -> &NodeKind {
        &self.0.kind
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for Node {}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0.kind {
            NodeKind::Document => f.write_str("Document"),
            NodeKind::Element(data) => write!(f, "Element(<{}>)", data.tag),
            NodeKind::Text(data) => write!(f, "Text({:?})", data.borrow()),
        }
    }
}

/// Pre-order iterator returned by [`Node::descendants`].
#[derive(Debug)]
pub struct Descendants {
    stack: Vec<Node>,
}

impl Iterator for Descendants {
    type Item = Node;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        let children = node.0.children.borrow();
        self.stack.extend(children.iter().rev().cloned());
        drop(children);
        Some(node)
    }
}

/// A node that is statically known to be an element.
#[derive(Clone, PartialEq, Eq)]
pub struct Element(Node);

/// A non-owning handle to an [`Element`].
#[derive(Debug, Clone, Default)]
pub struct WeakElement(WeakNode);

impl WeakElement {
    /// Returns the element, if it is still alive.
    #[must_use]
    pub fn upgrade(&self) -> Option<Element> {
        self.0.upgrade().map(Element)
    }
}

impl Element {
    /// Creates a detached element.
    ///
    /// The tag name is lowercased, as an HTML document does. Nothing checks that the tag is a
    /// known HTML element.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidCharacter`] when `tag` is not a valid XML name.
    pub fn new(tag: &str) -> Result<Self> {
        validate_name(tag)?;
        Ok(Self(Node::from_kind(NodeKind::Element(ElementData {
            tag: tag.to_ascii_lowercase(),
            attributes: RefCell::new(Vec::new()),
            properties: RefCell::new(BTreeMap::new()),
        }))))
    }

    fn data(&self) -> &ElementData {
        match self.0.kind() {
            NodeKind::Element(data) => data,
            NodeKind::Document | NodeKind::Text(_) => {
                unreachable!("Element handles always point at element nodes")
            }
        }
    }

    /// Returns the underlying node handle.
    #[must_use]
    pub const fn as_node(&self) -> &Node {
        &self.0
    }

    /// Converts into the underlying node handle.
    #[must_use]
    pub fn into_node(self) -> Node {
        self.0
    }

    /// Creates a weak handle to this element.
    #[must_use]
    pub fn downgrade_element(&self) -> WeakElement {
        WeakElement(self.0.downgrade())
    }

    /// Returns the lowercase tag name.
    #[must_use]
    pub fn tag_name(&self) -> &str {
        &self.data().tag
    }

    /// Sets an attribute, keeping the original position when it already exists.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidCharacter`] when `name` is not a valid XML name.
    pub fn set_attribute(&self, name: &str, value: impl Into<String>) -> Result<()> {
        validate_name(name)?;
        let name = name.to_ascii_lowercase();
        let value = value.into();
        let mut attributes = self.data().attributes.borrow_mut();
        if let Some(slot) = attributes.iter_mut().find(|(key, _)| *key == name) {
            slot.1 = value;
        } else {
            attributes.push((name, value));
        }
        Ok(())
    }

    /// Returns the value of an attribute.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<String> {
        let name = name.to_ascii_lowercase();
        self.data()
            .attributes
            .borrow()
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.clone())
    }

    /// Returns `true` when the attribute is present.
    #[must_use]
    pub fn has_attribute(&self, name: &str) -> bool {
        self.attribute(name).is_some()
    }

    /// Removes an attribute; absent attributes are ignored.
    pub fn remove_attribute(&self, name: &str) {
        let name = name.to_ascii_lowercase();
        self.data()
            .attributes
            .borrow_mut()
            .retain(|(key, _)| *key != name);
    }

    /// Returns every attribute in insertion order.
    #[must_use]
    pub fn attributes(&self) -> Vec<(String, String)> {
        self.data().attributes.borrow().clone()
    }

    /// Sets a boolean property directly on the element.
    pub fn set_property(&self, name: &str, value: bool) {
        self.data()
            .properties
            .borrow_mut()
            .insert(name.to_string(), value);
    }

    /// Returns a boolean property previously set with [`Element::set_property`].
    #[must_use]
    pub fn property(&self, name: &str) -> Option<bool> {
        self.data().properties.borrow().get(name).copied()
    }

    /// Returns the `id` attribute.
    #[must_use]
    pub fn id(&self) -> Option<String> {
        self.attribute("id")
    }
}

impl Deref for Element {
    type Target = Node;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl From<Element> for Node {
    fn from(value: Element) -> Self {
        value.0
    }
}

impl TryFrom<Node> for Element {
    type Error = Node;

    fn try_from(node: Node) -> core::result::Result<Self, Self::Error> {
        node.as_element().ok_or(node)
    }
}

/// A character data node.
#[derive(Clone, PartialEq, Eq)]
pub struct Text(Node);

impl Text {
    /// Creates a detached text node.
    #[must_use]
    pub fn new(data: impl Into<String>) -> Self {
        Self(Node::from_kind(NodeKind::Text(RefCell::new(data.into()))))
    }

    /// Returns the character data.
    #[must_use]
    pub fn data(&self) -> String {
        self.0.text_content()
    }

    /// Replaces the character data.
    pub fn set_data(&self, data: impl Into<String>) {
        if let NodeKind::Text(cell) = self.0.kind() {
            *cell.borrow_mut() = data.into();
        }
    }

    /// Converts into the underlying node handle.
    #[must_use]
    pub fn into_node(self) -> Node {
        self.0
    }
}

impl Deref for Text {
    type Target = Node;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl fmt::Debug for Text {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl From<Text> for Node {
    fn from(value: Text) -> Self {
        value.0
    }
}

/// Checks that `name` is usable as an element or attribute name.
///
/// Follows the XML `Name` production closely enough for HTML: a letter, `_` or `:` first, then
/// letters, digits, `-`, `.`, `_` or `:`. Non-ASCII characters are accepted anywhere.
///
/// # Errors
///
/// Returns [`Error::InvalidCharacter`] for empty names or names containing other characters.
pub fn validate_name(name: &str) -> Result<()> {
    let mut chars = name.chars();
    let valid_start = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c == ':' || !c.is_ascii());
    let valid_rest =
        chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '.' | '_' | ':') || !c.is_ascii());
    if valid_start && valid_rest {
        Ok(())
    } else {
        Err(Error::InvalidCharacter {
            name: name.to_string(),
        })
    }
}
