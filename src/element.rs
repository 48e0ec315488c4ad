//! The element constructor.
//!
//! [`create_element`] turns a tag name and a list of [`Arg`]s into one detached [`Element`]. The
//! tag factories in [`crate::tags`] are thin wrappers around it.
//!
//! # Argument classification
//!
//! Arguments are scanned once. Text, nodes and components are children, kept in argument order
//! wherever they appear. The first argument that is *not* a child claims the attributes slot.
//! That is normally an [`Attributes`] bag, but an [`Arg::Ignored`] value (a number, `()`,
//! `None`, a boolean) claims it just the same and contributes nothing, which also discards a
//! bag passed after it. Later non-child arguments are dropped without error.
//!
//! ```
//! use sprig::prelude::*;
//!
//! # fn main() -> sprig::Result<()> {
//! let child = span("world")?;
//! let greeting = div((attrs! { "class" => "x" }, "hello ", child))?;
//! assert_eq!(
//!     greeting.outer_html(),
//!     r#"<div class="x">hello <span>world</span></div>"#
//! );
//! # Ok(())
//! # }
//! ```

use alloc::{rc::Rc, string::String, vec::Vec};

use sprig_core::{Element, Error, Listener, Node, Result, Text};
use tracing::trace;

use crate::component::AnyComponent;

/// Key prefix that marks an attributes-bag entry as an event binding.
///
/// `onclick` binds a listener for `click`.
pub const EVENT_PREFIX: &str = "on";

/// A type-erased component passed as a child.
pub type ComponentRef = Rc<dyn AnyComponent>;

/// A value in an [`Attributes`] bag.
#[derive(Debug, Clone)]
pub enum AttrValue {
    /// Assigned as a direct element property.
    Bool(bool),
    /// Assigned as an attribute.
    Str(String),
    /// Accepted in the bag but never assigned.
    Number(f64),
    /// Registered as an event listener when the key carries [`EVENT_PREFIX`].
    Listener(Listener),
}

impl From<bool> for AttrValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        Self::Str(value.into())
    }
}

impl From<String> for AttrValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<&String> for AttrValue {
    fn from(value: &String) -> Self {
        Self::Str(value.clone())
    }
}

impl From<Listener> for AttrValue {
    fn from(value: Listener) -> Self {
        Self::Listener(value)
    }
}

macro_rules! attr_value_from_number {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for AttrValue {
                fn from(value: $ty) -> Self {
                    Self::Number(f64::from(value))
                }
            }
        )*
    };
}

attr_value_from_number!(i8, i16, i32, u8, u16, u32, f32, f64);

/// The attributes bag: attribute, property and event-binding entries in insertion order.
///
/// Usually built with [`attrs!`](crate::attrs).
#[derive(Debug, Clone, Default)]
pub struct Attributes {
    entries: Vec<(String, AttrValue)>,
}

impl Attributes {
    /// Creates an empty bag.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Sets `key` to `value`. A repeated key keeps its position and takes the new value.
    #[must_use]
    pub fn set(mut self, key: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        let key = key.into();
        let value = value.into();
        if let Some(slot) = self.entries.iter_mut().find(|(k, _)| *k == key) {
            slot.1 = value;
        } else {
            self.entries.push((key, value));
        }
        self
    }

    /// Binds `callback` to `event`, stored under the prefixed key (`click` becomes `onclick`).
    #[must_use]
    pub fn on(
        self,
        event: &str,
        callback: impl Fn(&sprig_core::Event) -> Result<()> + 'static,
    ) -> Self {
        self.set(alloc::format!("{EVENT_PREFIX}{event}"), Listener::new(callback))
    }

    /// Returns the value stored under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&AttrValue> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, value)| value)
    }

    /// Iterates over the entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttrValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when the bag has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn apply(self, element: &Element) -> Result<()> {
        let (events, attributes): (Vec<_>, Vec<_>) = self
            .entries
            .into_iter()
            .partition(|(key, _)| key.starts_with(EVENT_PREFIX));

        for (key, value) in attributes {
            match value {
                AttrValue::Bool(value) => element.set_property(&key, value),
                AttrValue::Str(value) => element.set_attribute(&key, value)?,
                AttrValue::Number(_) | AttrValue::Listener(_) => {}
            }
        }

        for (key, value) in events {
            let AttrValue::Listener(listener) = value else {
                return Err(Error::NotInvocable { key });
            };
            element.add_event_listener(&key[EVENT_PREFIX.len()..], listener);
        }
        Ok(())
    }
}

impl<K, V> FromIterator<(K, V)> for Attributes
where
    K: Into<String>,
    V: Into<AttrValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Self::new(), |bag, (key, value)| bag.set(key, value))
    }
}

/// Builds an [`Attributes`] bag.
///
/// ```
/// use sprig::prelude::*;
///
/// let bag = attrs! {
///     "class" => "primary",
///     "disabled" => true,
///     "onclick" => listener(|_| Ok(())),
/// };
/// assert_eq!(bag.len(), 3);
/// ```
#[macro_export]
macro_rules! attrs {
    () => {
        $crate::element::Attributes::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {
        $crate::element::Attributes::new()$(.set($key, $value))+
    };
}

/// One argument to the element constructor.
#[derive(Clone)]
pub enum Arg {
    /// An attributes bag.
    Attributes(Attributes),
    /// Text content, appended as a text node.
    Text(String),
    /// An already-built node, appended as is.
    Node(Node),
    /// A component, rendered through its render cycle and appended.
    Component(ComponentRef),
    /// A value that is neither a bag nor a child.
    Ignored,
}

impl Arg {
    /// Returns `true` for arguments that become children.
    #[must_use]
    pub const fn is_child(&self) -> bool {
        matches!(self, Self::Text(_) | Self::Node(_) | Self::Component(_))
    }
}

impl core::fmt::Debug for Arg {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Attributes(bag) => f.debug_tuple("Attributes").field(bag).finish(),
            Self::Text(text) => f.debug_tuple("Text").field(text).finish(),
            Self::Node(node) => f.debug_tuple("Node").field(node).finish(),
            Self::Component(component) => f
                .debug_tuple("Component")
                .field(&component.id().as_str())
                .finish(),
            Self::Ignored => f.write_str("Ignored"),
        }
    }
}

impl From<Attributes> for Arg {
    fn from(value: Attributes) -> Self {
        Self::Attributes(value)
    }
}

impl From<&str> for Arg {
    fn from(value: &str) -> Self {
        Self::Text(value.into())
    }
}

impl From<String> for Arg {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&String> for Arg {
    fn from(value: &String) -> Self {
        Self::Text(value.clone())
    }
}

impl From<Node> for Arg {
    fn from(value: Node) -> Self {
        Self::Node(value)
    }
}

impl From<&Node> for Arg {
    fn from(value: &Node) -> Self {
        Self::Node(value.clone())
    }
}

impl From<Element> for Arg {
    fn from(value: Element) -> Self {
        Self::Node(value.into())
    }
}

impl From<&Element> for Arg {
    fn from(value: &Element) -> Self {
        Self::Node(value.as_node().clone())
    }
}

impl From<Text> for Arg {
    fn from(value: Text) -> Self {
        Self::Node(value.into())
    }
}

impl From<ComponentRef> for Arg {
    fn from(value: ComponentRef) -> Self {
        Self::Component(value)
    }
}

impl From<()> for Arg {
    fn from((): ()) -> Self {
        Self::Ignored
    }
}

impl<T: Into<Self>> From<Option<T>> for Arg {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Ignored, Into::into)
    }
}

macro_rules! arg_ignored_from {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Arg {
                fn from(_: $ty) -> Self {
                    Self::Ignored
                }
            }
        )*
    };
}

arg_ignored_from!(bool, i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);

/// The variadic argument list accepted by [`create_element`] and the tag factories.
///
/// Implemented for `()`, tuples of up to sixteen `Into<Arg>` values, `Vec<Arg>`, arrays of
/// [`Arg`], and single strings, nodes, bags and components.
pub trait IntoArgs {
    /// Collects the arguments in order.
    fn into_args(self) -> Vec<Arg>;
}

impl IntoArgs for () {
    fn into_args(self) -> Vec<Arg> {
        Vec::new()
    }
}

impl IntoArgs for Vec<Arg> {
    fn into_args(self) -> Vec<Arg> {
        self
    }
}

impl<const N: usize> IntoArgs for [Arg; N] {
    fn into_args(self) -> Vec<Arg> {
        self.into()
    }
}

macro_rules! into_args_single {
    ($($ty:ty),*) => {
        $(
            impl IntoArgs for $ty {
                fn into_args(self) -> Vec<Arg> {
                    alloc::vec![Arg::from(self)]
                }
            }
        )*
    };
}

into_args_single!(
    Arg, Attributes, &str, String, &String, Node, &Node, Element, &Element, Text, ComponentRef
);

macro_rules! into_args_tuple {
    ($($ty:ident),+) => {
        #[allow(non_snake_case)]
        impl<$($ty: Into<Arg>),+> IntoArgs for ($($ty,)+) {
            fn into_args(self) -> Vec<Arg> {
                let ($($ty,)+) = self;
                alloc::vec![$($ty.into()),+]
            }
        }
    };
}

into_args_tuple!(A);
into_args_tuple!(A, B);
into_args_tuple!(A, B, C);
into_args_tuple!(A, B, C, D);
into_args_tuple!(A, B, C, D, E);
into_args_tuple!(A, B, C, D, E, F);
into_args_tuple!(A, B, C, D, E, F, G);
into_args_tuple!(A, B, C, D, E, F, G, H);
into_args_tuple!(A, B, C, D, E, F, G, H, I);
into_args_tuple!(A, B, C, D, E, F, G, H, I, J);
into_args_tuple!(A, B, C, D, E, F, G, H, I, J, K);
into_args_tuple!(A, B, C, D, E, F, G, H, I, J, K, L);
into_args_tuple!(A, B, C, D, E, F, G, H, I, J, K, L, M);
into_args_tuple!(A, B, C, D, E, F, G, H, I, J, K, L, M, N);
into_args_tuple!(A, B, C, D, E, F, G, H, I, J, K, L, M, N, O);
into_args_tuple!(A, B, C, D, E, F, G, H, I, J, K, L, M, N, O, P);

/// Builds one detached element from `tag` and `args`.
///
/// Attributes are assigned first, then event listeners are registered, then children are
/// appended in argument order. Component children go through their full render cycle, and every
/// node of a multi-node render is appended. Inserting the result into a document is up to the
/// caller.
///
/// # Errors
///
/// Propagates the failures of the underlying primitives: [`Error::InvalidCharacter`] for bad tag
/// or attribute names, [`Error::NotInvocable`] for an event key bound to a non-listener value,
/// [`Error::HierarchyRequest`] for impossible appends, and any error a component child's render
/// returns.
pub fn create_element(tag: &str, args: impl IntoArgs) -> Result<Element> {
    let element = Element::new(tag)?;

    let mut bag = None;
    let mut children = Vec::new();
    for arg in args.into_args() {
        if arg.is_child() {
            children.push(arg);
        } else if bag.is_none() {
            bag = Some(arg);
        }
    }

    if let Some(Arg::Attributes(attributes)) = bag {
        attributes.apply(&element)?;
    }

    trace!(tag = element.tag_name(), children = children.len(), "constructing element");

    for child in children {
        match child {
            Arg::Text(text) => element.append_child(&Text::new(text))?,
            Arg::Node(node) => element.append_child(&node)?,
            Arg::Component(component) => {
                for node in &component.render()? {
                    element.append_child(node)?;
                }
            }
            Arg::Attributes(_) | Arg::Ignored => {}
        }
    }

    Ok(element)
}
