//! HTML serialization.
//!
//! Only attributes and character data are serialized. Properties set with
//! [`Element::set_property`](crate::Element::set_property) and event listeners have no markup
//! form and are left out.

use alloc::string::String;

use crate::{Node, node::NodeKind};

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

impl Node {
    /// Serializes this node and its descendants.
    #[must_use]
    pub fn outer_html(&self) -> String {
        let mut out = String::new();
        write_node(self, &mut out);
        out
    }

    /// Serializes the descendants of this node.
    #[must_use]
    pub fn inner_html(&self) -> String {
        let mut out = String::new();
        for child in self.children() {
            write_node(&child, &mut out);
        }
        out
    }
}

fn write_node(node: &Node, out: &mut String) {
    match node.kind() {
        NodeKind::Document => {
            out.push_str("<!DOCTYPE html>");
            for child in node.children() {
                write_node(&child, out);
            }
        }
        NodeKind::Text(data) => escape_into(&data.borrow(), false, out),
        NodeKind::Element(_) => {
            let Some(element) = node.as_element() else {
                return;
            };
            let tag = element.tag_name();
            out.push('<');
            out.push_str(tag);
            for (name, value) in element.attributes() {
                out.push(' ');
                out.push_str(&name);
                out.push_str("=\"");
                escape_into(&value, true, out);
                out.push('"');
            }
            out.push('>');
            if VOID_ELEMENTS.contains(&tag) {
                return;
            }
            for child in node.children() {
                write_node(&child, out);
            }
            out.push_str("</");
            out.push_str(tag);
            out.push('>');
        }
    }
}

fn escape_into(text: &str, attribute: bool, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if attribute => out.push_str("&quot;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            _ => out.push(c),
        }
    }
}
