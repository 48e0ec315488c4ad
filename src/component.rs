//! Reactive components.
//!
//! A [`Component`] describes how to turn its state into elements. Wrapping it in a [`Handle`]
//! gives it an identity, a state container and the render cycle:
//!
//! 1. look up the output of the previous cycle,
//! 2. call [`Component::render`] against the current state,
//! 3. tag every new top-level element with the identity marker attribute,
//! 4. if the previous output is still attached, insert the new output right before it and
//!    remove the old nodes,
//! 5. return the new output.
//!
//! The first cycle has nothing to replace; placing its output is up to the caller. After that,
//! every [`Handle::update`] runs one full cycle. Updates are not batched: three updates cause
//! three renders.
//!
//! ```
//! use sprig::prelude::*;
//!
//! struct Counter;
//!
//! impl Component for Counter {
//!     type State = u32;
//!
//!     fn render(&self, cx: &Scope<'_, Self>) -> sprig::Result<Rendered> {
//!         Ok(li(cx.state().to_string())?.into())
//!     }
//! }
//!
//! # fn main() -> sprig::Result<()> {
//! let document = Document::new()?;
//! let counter = Handle::new(Counter);
//! counter.set_state(1)?;
//! counter.render()?.append_to(document.body())?;
//!
//! counter.update(|count| *count = 2)?;
//! assert_eq!(document.body().inner_html(), format!(r#"<li data-component-id="{}">2</li>"#, counter.id()));
//! # Ok(())
//! # }
//! ```

use alloc::{rc::Rc, vec::Vec};
use core::{
    cell::{Ref, RefCell},
    fmt,
};

use sprig_core::{Element, Error, Listener, Node, Result, WeakElement};
use tracing::{debug, instrument};

use crate::{
    config,
    element::{Arg, ComponentRef, IntoArgs},
    id::{ComponentId, IdAllocator},
};

/// A unit of UI that renders from its own state.
pub trait Component: Sized + 'static {
    /// The state container installed with [`Handle::set_state`].
    type State: 'static;

    /// Produces the output for the current state.
    ///
    /// # Errors
    ///
    /// Any error is propagated to whoever triggered the render; the previous output stays
    /// mounted. Child components rendered before the failure have already swapped their new
    /// output into the previous output and then moved it into the discarded element, so the
    /// previous output no longer contains them.
    ///
    /// Returning no elements is an error: the component would lose its place in the tree.
    fn render(&self, cx: &Scope<'_, Self>) -> Result<Rendered>;
}

/// What [`Component::render`] sees: the current state and a handle to the component itself.
pub struct Scope<'a, C: Component> {
    state: &'a C::State,
    handle: &'a Handle<C>,
}

impl<'a, C: Component> Scope<'a, C> {
    /// Returns the current state.
    #[must_use]
    pub const fn state(&self) -> &'a C::State {
        self.state
    }

    /// Returns a handle to the rendering component, for use inside event listeners.
    #[must_use]
    pub fn handle(&self) -> Handle<C> {
        self.handle.clone()
    }

    /// Returns the identity of the rendering component.
    #[must_use]
    pub fn id(&self) -> &'a ComponentId {
        self.handle.id()
    }

    /// Builds a listener that applies `f` to this component's state.
    ///
    /// Shorthand for `cx.handle().callback(f)`.
    pub fn callback(&self, f: impl Fn(&mut C::State) + 'static) -> Listener {
        self.handle.callback(f)
    }
}

impl<C: Component> fmt::Debug for Scope<'_, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scope")
            .field("id", self.handle.id())
            .finish_non_exhaustive()
    }
}

/// The output of one render: a single element or an ordered run of sibling elements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rendered {
    /// One element.
    One(Element),
    /// Several sibling elements, kept in order.
    Many(Vec<Element>),
}

impl Rendered {
    /// Returns the elements in order.
    #[must_use]
    pub fn as_slice(&self) -> &[Element] {
        match self {
            Self::One(element) => core::slice::from_ref(element),
            Self::Many(elements) => elements,
        }
    }

    /// Iterates over the elements in order.
    pub fn iter(&self) -> core::slice::Iter<'_, Element> {
        self.as_slice().iter()
    }

    /// Returns the number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    /// Returns `true` when the render produced no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.as_slice().is_empty()
    }

    /// Returns the first element, if any.
    #[must_use]
    pub fn first(&self) -> Option<&Element> {
        self.as_slice().first()
    }

    /// Converts into a vector of elements.
    #[must_use]
    pub fn into_vec(self) -> Vec<Element> {
        match self {
            Self::One(element) => alloc::vec![element],
            Self::Many(elements) => elements,
        }
    }

    fn contains(&self, node: &Element) -> bool {
        self.iter().any(|element| element == node)
    }

    /// Appends every element to `parent`, in order.
    ///
    /// This is how the output of a first render is placed into a document.
    ///
    /// # Errors
    ///
    /// Returns [`Error::HierarchyRequest`] if an element cannot be appended to `parent`.
    pub fn append_to(&self, parent: &Node) -> Result<()> {
        for element in self {
            parent.append_child(element)?;
        }
        Ok(())
    }
}

impl From<Element> for Rendered {
    fn from(value: Element) -> Self {
        Self::One(value)
    }
}

impl From<Vec<Element>> for Rendered {
    fn from(value: Vec<Element>) -> Self {
        Self::Many(value)
    }
}

impl<const N: usize> From<[Element; N]> for Rendered {
    fn from(value: [Element; N]) -> Self {
        Self::Many(value.into())
    }
}

impl IntoIterator for Rendered {
    type Item = Element;
    type IntoIter = alloc::vec::IntoIter<Element>;

    fn into_iter(self) -> Self::IntoIter {
        self.into_vec().into_iter()
    }
}

impl<'a> IntoIterator for &'a Rendered {
    type Item = &'a Element;
    type IntoIter = core::slice::Iter<'a, Element>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl IntoArgs for Rendered {
    fn into_args(self) -> Vec<Arg> {
        self.into_iter().map(Arg::from).collect()
    }
}

/// Whether a component's latest output is in a tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    /// No render has produced output that is currently attached.
    Unmounted,
    /// The latest output is attached under some parent.
    Mounted,
}

/// Object-safe view of a [`Handle`], used where component types are erased.
///
/// Holding an `AnyComponent` is what marks an element-constructor argument as a component.
pub trait AnyComponent {
    /// Returns the component identity.
    fn id(&self) -> &ComponentId;

    /// Runs the render cycle.
    ///
    /// # Errors
    ///
    /// Propagates render failures.
    fn render(&self) -> Result<Rendered>;

    /// Always `true`; components are recognised by type, not by probing.
    fn is_component(&self) -> bool {
        true
    }
}

struct Inner<C: Component> {
    id: ComponentId,
    component: C,
    state: RefCell<Option<C::State>>,
    mounted: RefCell<Vec<WeakElement>>,
}

/// The component base: identity, state container and render cycle around a [`Component`].
///
/// Handles are cheap to clone and share one instance. The instance keeps only weak references
/// to its mounted output, so listeners may hold a strong handle without creating a cycle.
pub struct Handle<C: Component> {
    inner: Rc<Inner<C>>,
}

impl<C: Component> Clone for Handle<C> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<C: Component> fmt::Debug for Handle<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handle")
            .field("component", &core::any::type_name::<C>())
            .field("id", &self.inner.id)
            .field("lifecycle", &self.lifecycle())
            .finish()
    }
}

impl<C: Component> Handle<C> {
    /// Wraps `component`, taking an identity from [`IdAllocator::global`].
    pub fn new(component: C) -> Self {
        Self::with_allocator(component, IdAllocator::global())
    }

    /// Wraps `component`, taking an identity from `allocator`.
    pub fn with_allocator(component: C, allocator: &IdAllocator) -> Self {
        Self {
            inner: Rc::new(Inner {
                id: allocator.next_id(),
                component,
                state: RefCell::new(None),
                mounted: RefCell::new(Vec::new()),
            }),
        }
    }

    /// Returns the identity, stable for the life of the instance.
    #[must_use]
    pub fn id(&self) -> &ComponentId {
        &self.inner.id
    }

    /// Returns the wrapped component.
    #[must_use]
    pub fn component(&self) -> &C {
        &self.inner.component
    }

    /// Installs `state` as the tracked state container, replacing any previous one.
    ///
    /// Installing state never renders; only later updates do.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ReentrantUpdate`] when called while this component is rendering.
    pub fn set_state(&self, state: C::State) -> Result<()> {
        let mut slot = self
            .inner
            .state
            .try_borrow_mut()
            .map_err(|_| self.reentrant())?;
        *slot = Some(state);
        Ok(())
    }

    /// Borrows the current state, if installed.
    ///
    /// Returns `None` while an update closure holds the state mutably.
    #[must_use]
    pub fn state(&self) -> Option<Ref<'_, C::State>> {
        let slot = self.inner.state.try_borrow().ok()?;
        Ref::filter_map(slot, Option::as_ref).ok()
    }

    /// Writes to the state through `f`, then runs one render cycle and returns its output.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StateNotInstalled`] before [`Handle::set_state`],
    /// [`Error::ReentrantUpdate`] when this component is rendering, and otherwise whatever the
    /// render cycle returns. The write is kept even if the render fails.
    pub fn update(&self, f: impl FnOnce(&mut C::State)) -> Result<Rendered> {
        {
            let mut slot = self
                .inner
                .state
                .try_borrow_mut()
                .map_err(|_| self.reentrant())?;
            let state = slot.as_mut().ok_or_else(|| self.not_installed())?;
            f(state);
        }
        self.render()
    }

    /// Builds a listener that runs [`Handle::update`] with `f` on every event.
    pub fn callback(&self, f: impl Fn(&mut C::State) + 'static) -> Listener {
        let handle = self.clone();
        Listener::new(move |_| handle.update(&f).map(drop))
    }

    /// Runs the render cycle and returns the new output.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StateNotInstalled`] before [`Handle::set_state`], any error from
    /// [`Component::render`], [`Error::Render`] when the output is empty, and errors from the
    /// tree primitives while swapping. On a render error this component's nodes stay where they
    /// are.
    #[instrument(level = "debug", skip_all, fields(component = %self.inner.id))]
    pub fn render(&self) -> Result<Rendered> {
        let previous: Vec<Element> = self
            .inner
            .mounted
            .borrow()
            .iter()
            .filter_map(WeakElement::upgrade)
            .collect();
        let anchor = previous
            .iter()
            .find(|element| element.parent().is_some())
            .cloned();

        let output = {
            let slot = self.inner.state.try_borrow().map_err(|_| self.reentrant())?;
            let state = slot.as_ref().ok_or_else(|| self.not_installed())?;
            let cx = Scope {
                state,
                handle: self,
            };
            self.inner.component.render(&cx)?
        };
        if output.is_empty() {
            return Err(Error::render(format_args!(
                "component {} rendered no elements",
                self.inner.id
            )));
        }

        let marker = config::marker_attribute();
        for element in &output {
            element.set_attribute(marker, self.inner.id.as_str())?;
        }

        if let Some(anchor) = &anchor
            && let Some(parent) = anchor.parent()
        {
            // First sibling from the anchor on that is neither replaced nor reused.
            let mut reference = Some(anchor.as_node().clone());
            while let Some(node) = reference.take() {
                let claimed = previous.iter().any(|old| old.as_node() == &node)
                    || output.iter().any(|new| new.as_node() == &node);
                if !claimed {
                    reference = Some(node);
                    break;
                }
                reference = node.next_sibling();
            }

            for element in &output {
                match &reference {
                    Some(reference) => parent.insert_before(element, reference)?,
                    None => parent.append_child(element)?,
                }
            }
            for old in previous.iter().filter(|old| !output.contains(old)) {
                old.remove();
            }
        }

        *self.inner.mounted.borrow_mut() = output.iter().map(Element::downgrade_element).collect();

        debug!(
            nodes = output.len(),
            replaced = previous.len(),
            swapped = anchor.is_some(),
            "render cycle complete"
        );
        Ok(output)
    }

    /// Returns the live elements produced by the latest render.
    #[must_use]
    pub fn mounted(&self) -> Vec<Element> {
        self.inner
            .mounted
            .borrow()
            .iter()
            .filter_map(WeakElement::upgrade)
            .collect()
    }

    /// Returns whether the latest output is attached.
    #[must_use]
    pub fn lifecycle(&self) -> Lifecycle {
        if self.mounted().iter().any(|element| element.parent().is_some()) {
            Lifecycle::Mounted
        } else {
            Lifecycle::Unmounted
        }
    }

    /// Creates a weak handle that does not keep the component alive.
    #[must_use]
    pub fn downgrade(&self) -> WeakHandle<C> {
        WeakHandle {
            inner: Rc::downgrade(&self.inner),
        }
    }

    /// Erases the component type.
    #[must_use]
    pub fn as_any(&self) -> ComponentRef {
        Rc::new(self.clone())
    }

    fn reentrant(&self) -> Error {
        Error::ReentrantUpdate {
            id: self.inner.id.to_string(),
        }
    }

    fn not_installed(&self) -> Error {
        Error::StateNotInstalled {
            id: self.inner.id.to_string(),
        }
    }
}

impl<C: Component> AnyComponent for Handle<C> {
    fn id(&self) -> &ComponentId {
        Self::id(self)
    }

    fn render(&self) -> Result<Rendered> {
        Self::render(self)
    }
}

impl<C: Component> From<Handle<C>> for Arg {
    fn from(value: Handle<C>) -> Self {
        Self::Component(Rc::new(value))
    }
}

impl<C: Component> From<&Handle<C>> for Arg {
    fn from(value: &Handle<C>) -> Self {
        Self::Component(value.as_any())
    }
}

impl<C: Component> IntoArgs for Handle<C> {
    fn into_args(self) -> Vec<Arg> {
        alloc::vec![self.into()]
    }
}

impl<C: Component> IntoArgs for &Handle<C> {
    fn into_args(self) -> Vec<Arg> {
        alloc::vec![self.into()]
    }
}

/// A handle that does not keep its component alive.
pub struct WeakHandle<C: Component> {
    inner: alloc::rc::Weak<Inner<C>>,
}

impl<C: Component> WeakHandle<C> {
    /// Returns a strong handle if the component is still alive.
    #[must_use]
    pub fn upgrade(&self) -> Option<Handle<C>> {
        self.inner.upgrade().map(|inner| Handle { inner })
    }

    /// Runs [`Handle::update`] when the component is alive; does nothing otherwise.
    ///
    /// # Errors
    ///
    /// Same as [`Handle::update`].
    pub fn update(&self, f: impl FnOnce(&mut C::State)) -> Result<()> {
        self.upgrade().map_or(Ok(()), |handle| handle.update(f).map(drop))
    }
}

impl<C: Component> Clone for WeakHandle<C> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<C: Component> fmt::Debug for WeakHandle<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeakHandle")
            .field("component", &core::any::type_name::<C>())
            .field("alive", &(self.inner.strong_count() > 0))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::{String, ToString};
    use core::cell::Cell;

    use sprig_core::Document;

    use super::*;
    use crate::tags::{div, em, h2, li, p, span, ul};

    struct Label {
        renders: Rc<Cell<usize>>,
    }

    impl Component for Label {
        type State = String;

        fn render(&self, cx: &Scope<'_, Self>) -> Result<Rendered> {
            self.renders.set(self.renders.get() + 1);
            Ok(span(cx.state().as_str())?.into())
        }
    }

    fn label(allocator: &IdAllocator) -> (Handle<Label>, Rc<Cell<usize>>) {
        let renders = Rc::new(Cell::new(0));
        let handle = Handle::with_allocator(
            Label {
                renders: Rc::clone(&renders),
            },
            allocator,
        );
        (handle, renders)
    }

    #[test]
    fn set_state_does_not_render() {
        let (handle, renders) = label(&IdAllocator::new());
        handle.set_state("a".into()).unwrap();
        assert_eq!(renders.get(), 0);
        assert_eq!(handle.lifecycle(), Lifecycle::Unmounted);
        assert_eq!(handle.state().as_deref().map(String::as_str), Some("a"));
    }

    #[test]
    fn render_before_state_is_an_error() {
        let (handle, renders) = label(&IdAllocator::new());
        assert!(matches!(handle.render(), Err(Error::StateNotInstalled { .. })));
        assert!(matches!(
            handle.update(|s| s.push('x')),
            Err(Error::StateNotInstalled { .. })
        ));
        assert_eq!(renders.get(), 0);
    }

    #[test]
    fn first_render_is_tagged_but_not_inserted() {
        let (handle, _) = label(&IdAllocator::new());
        handle.set_state("a".into()).unwrap();
        let output = handle.render().unwrap();
        let element = output.first().unwrap();
        assert_eq!(element.attribute("data-component-id").as_deref(), Some("0"));
        assert!(element.parent().is_none());
    }

    #[test]
    fn each_update_renders_once() {
        let document = Document::new().unwrap();
        let (handle, renders) = label(&IdAllocator::new());
        handle.set_state(String::new()).unwrap();
        handle.render().unwrap().append_to(document.body()).unwrap();

        handle.update(|s| s.push('a')).unwrap();
        handle.update(|s| s.push('b')).unwrap();
        handle.update(|s| s.push('c')).unwrap();
        assert_eq!(renders.get(), 4);
        assert_eq!(document.body().text_content(), "abc");
        assert_eq!(document.body().child_count(), 1);
    }

    #[test]
    fn swap_preserves_sibling_position() {
        let document = Document::new().unwrap();
        let (handle, _) = label(&IdAllocator::new());
        handle.set_state("old".into()).unwrap();
        let list = ul(()).unwrap();
        list.append_child(&li("before").unwrap()).unwrap();
        handle.render().unwrap().append_to(&list).unwrap();
        list.append_child(&li("after").unwrap()).unwrap();
        document.body().append_child(&list).unwrap();

        let old = handle.mounted();
        handle.update(|s| *s = "new".into()).unwrap();
        let new = handle.mounted();
        assert_ne!(old, new);
        assert!(old[0].parent().is_none());
        assert_eq!(new[0].index_in_parent(), Some(1));
        assert_eq!(list.text_content(), "beforenewafter");
        assert_eq!(handle.lifecycle(), Lifecycle::Mounted);
    }

    struct Fails;

    impl Component for Fails {
        type State = bool;

        fn render(&self, cx: &Scope<'_, Self>) -> Result<Rendered> {
            if *cx.state() {
                Err(Error::render("refusing to render"))
            } else {
                Ok(div("ok")?.into())
            }
        }
    }

    #[test]
    fn render_error_leaves_old_output_mounted() {
        let document = Document::new().unwrap();
        let handle = Handle::with_allocator(Fails, &IdAllocator::new());
        handle.set_state(false).unwrap();
        handle.render().unwrap().append_to(document.body()).unwrap();
        let before = handle.mounted();

        let result = handle.update(|fail| *fail = true);
        assert_eq!(result, Err(Error::Render("refusing to render".into())));
        assert_eq!(handle.mounted(), before);
        assert!(before[0].is_connected());
        assert_eq!(handle.state().as_deref(), Some(&true));
    }

    struct Recursive;

    impl Component for Recursive {
        type State = u8;

        fn render(&self, cx: &Scope<'_, Self>) -> Result<Rendered> {
            let nested = cx.handle().update(|n| *n += 1);
            assert!(matches!(nested, Err(Error::ReentrantUpdate { .. })));
            Ok(div(cx.state().to_string())?.into())
        }
    }

    #[test]
    fn update_during_own_render_is_rejected() {
        let handle = Handle::with_allocator(Recursive, &IdAllocator::new());
        handle.set_state(0).unwrap();
        let output = handle.render().unwrap();
        assert_eq!(output.first().unwrap().text_content(), "0");
    }

    #[test]
    fn weak_handle_is_noop_after_drop() {
        let (handle, renders) = label(&IdAllocator::new());
        handle.set_state(String::new()).unwrap();
        let weak = handle.downgrade();
        weak.update(|s| s.push('x')).unwrap();
        assert_eq!(renders.get(), 1);
        drop(handle);
        assert!(weak.upgrade().is_none());
        weak.update(|s| s.push('y')).unwrap();
        assert_eq!(renders.get(), 1);
    }

    #[test]
    fn any_component_reports_identity() {
        let allocator = IdAllocator::new();
        let _ = allocator.next_id();
        let (handle, _) = label(&allocator);
        let erased = handle.as_any();
        assert!(erased.is_component());
        assert_eq!(erased.id().as_str(), "1");
    }

    /// Keeps one heading across renders and rebuilds the paragraph after it.
    struct Cached {
        heading: Element,
    }

    impl Component for Cached {
        type State = u32;

        fn render(&self, cx: &Scope<'_, Self>) -> Result<Rendered> {
            Ok([self.heading.clone(), p(cx.state().to_string())?].into())
        }
    }

    fn tags_of(parent: &Node) -> Vec<String> {
        parent
            .child_elements()
            .iter()
            .map(|element| element.tag_name().to_string())
            .collect()
    }

    #[test]
    fn reused_leading_node_keeps_output_order() {
        let document = Document::new().unwrap();
        let handle = Handle::with_allocator(
            Cached {
                heading: h2("keep").unwrap(),
            },
            &IdAllocator::new(),
        );
        handle.set_state(1).unwrap();
        let list = div(()).unwrap();
        handle.render().unwrap().append_to(&list).unwrap();
        list.append_child(&span("after").unwrap()).unwrap();
        document.body().append_child(&list).unwrap();
        let heading = handle.mounted()[0].clone();

        handle.update(|n| *n = 2).unwrap();
        assert_eq!(tags_of(&list), ["h2", "p", "span"]);
        assert_eq!(handle.mounted()[0], heading);
        assert_eq!(list.text_content(), "keep2after");
    }

    struct Optional;

    impl Component for Optional {
        type State = bool;

        fn render(&self, cx: &Scope<'_, Self>) -> Result<Rendered> {
            if *cx.state() {
                Ok(span("here")?.into())
            } else {
                Ok(Rendered::Many(Vec::new()))
            }
        }
    }

    #[test]
    fn empty_output_is_rejected_and_position_kept() {
        let document = Document::new().unwrap();
        let handle = Handle::with_allocator(Optional, &IdAllocator::new());
        handle.set_state(true).unwrap();
        document.body().append_child(&em("before").unwrap()).unwrap();
        handle.render().unwrap().append_to(document.body()).unwrap();
        document.body().append_child(&em("after").unwrap()).unwrap();

        let result = handle.update(|shown| *shown = false);
        assert!(matches!(result, Err(Error::Render(_))));
        assert_eq!(document.body().text_content(), "beforehereafter");

        handle.update(|shown| *shown = true).unwrap();
        assert_eq!(tags_of(document.body()), ["em", "span", "em"]);
        assert_eq!(handle.lifecycle(), Lifecycle::Mounted);
    }

    #[test]
    fn detached_output_is_not_reinserted() {
        let document = Document::new().unwrap();
        let (handle, _) = label(&IdAllocator::new());
        handle.set_state("a".into()).unwrap();
        handle.render().unwrap().append_to(document.body()).unwrap();
        document.body().append_child(&div("sibling").unwrap()).unwrap();
        for element in handle.mounted() {
            element.remove();
        }
        let siblings = document.body().children();

        let output = handle.update(|s| *s = "b".into()).unwrap();
        assert!(output.first().unwrap().parent().is_none());
        assert_eq!(document.body().children(), siblings);
        assert_eq!(handle.lifecycle(), Lifecycle::Unmounted);
    }
}
