//! Events and listeners.
//!
//! An [`Event`] is dispatched at a [`Node`](crate::Node) with
//! [`Node::dispatch_event`](crate::Node::dispatch_event). Listeners attached to the target run
//! first, in registration order; bubbling events then visit every ancestor up to the document.

use alloc::{rc::Rc, string::String};
use core::{
    cell::{Cell, RefCell},
    fmt,
};

use serde_json::Value;

use crate::{Node, Result};

/// A shared event callback.
///
/// Cloning a listener shares the callback; it never duplicates captured state.
#[derive(Clone)]
pub struct Listener(Rc<dyn Fn(&Event) -> Result<()>>);

impl Listener {
    /// Wraps a closure as a listener.
    pub fn new(callback: impl Fn(&Event) -> Result<()> + 'static) -> Self {
        Self(Rc::new(callback))
    }

    /// Invokes the listener with the provided event.
    ///
    /// # Errors
    ///
    /// Returns whatever error the callback produced.
    pub fn call(&self, event: &Event) -> Result<()> {
        (self.0)(event)
    }

    /// Returns `true` when both listeners share the same callback.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Listener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Listener(..)")
    }
}

/// Shorthand for [`Listener::new`].
pub fn listener(callback: impl Fn(&Event) -> Result<()> + 'static) -> Listener {
    Listener::new(callback)
}

/// A synthetic event.
#[derive(Debug)]
pub struct Event {
    event_type: String,
    bubbles: bool,
    detail: Option<Value>,
    target: RefCell<Option<Node>>,
    propagation_stopped: Cell<bool>,
}

impl Event {
    /// Creates a non-bubbling event of the given type.
    #[must_use]
    pub fn new(event_type: impl Into<String>) -> Self {
        Self {
            event_type: event_type.into(),
            bubbles: false,
            detail: None,
            target: RefCell::new(None),
            propagation_stopped: Cell::new(false),
        }
    }

    /// Sets whether the event continues to the target's ancestors.
    #[must_use]
    pub fn with_bubbles(mut self, bubbles: bool) -> Self {
        self.bubbles = bubbles;
        self
    }

    /// Attaches a payload, the way a custom event carries its `detail`.
    #[must_use]
    pub fn with_detail(mut self, detail: Value) -> Self {
        self.detail = Some(detail);
        self
    }

    /// Returns the event type, for example `click`.
    #[must_use]
    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    /// Returns whether the event bubbles.
    #[must_use]
    pub const fn bubbles(&self) -> bool {
        self.bubbles
    }

    /// Returns the attached payload, if any.
    #[must_use]
    pub const fn detail(&self) -> Option<&Value> {
        self.detail.as_ref()
    }

    /// Returns the node the event was dispatched at.
    ///
    /// `None` until the event has been dispatched.
    #[must_use]
    pub fn target(&self) -> Option<Node> {
        self.target.borrow().clone()
    }

    /// Prevents the event from reaching further ancestors.
    ///
    /// Remaining listeners on the current node still run.
    pub fn stop_propagation(&self) {
        self.propagation_stopped.set(true);
    }

    pub(crate) fn is_propagation_stopped(&self) -> bool {
        self.propagation_stopped.get()
    }

    pub(crate) fn set_target(&self, target: Node) {
        *self.target.borrow_mut() = Some(target);
    }
}
