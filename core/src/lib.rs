//! The in-memory live document underneath `sprig`.
//!
//! This crate provides the node primitives the element constructor and the component render
//! cycle mutate: [`Node`] handles, [`Element`] and [`Text`] nodes, a [`Document`] root,
//! synthetic [`Event`] dispatch, and HTML serialization for inspecting the result.
//!
//! Everything here is single-threaded. Handles are `Rc`-based and deliberately `!Send`.

extern crate alloc;

mod document;
mod error;
mod event;
mod html;
mod node;

pub use document::Document;
pub use error::{Error, Result};
pub use event::{Event, Listener, listener};
pub use node::{
    Descendants, Element, Node, NodeType, Text, WeakElement, WeakNode, validate_name,
};
