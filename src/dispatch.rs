//! Document-level custom events.
//!
//! A lightweight broadcast channel between components: one side listens on the document with
//! [`Node::add_event_listener`](sprig_core::Node::add_event_listener), the other fires with
//! [`dispatch`]. Events fired this way neither bubble nor reach any element.

use serde_json::Value;
use sprig_core::{Document, Event, Result};

/// Fires a custom event named `event_type` at `document`.
///
/// # Errors
///
/// Returns the first error produced by a listener; every listener still runs.
pub fn dispatch(document: &Document, event_type: &str) -> Result<()> {
    document.dispatch_event(&Event::new(event_type))
}

/// Fires a custom event carrying `detail` at `document`.
///
/// # Errors
///
/// Returns the first error produced by a listener; every listener still runs.
pub fn dispatch_with_detail(document: &Document, event_type: &str, detail: Value) -> Result<()> {
    document.dispatch_event(&Event::new(event_type).with_detail(detail))
}
