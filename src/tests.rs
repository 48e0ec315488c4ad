//! End-to-end behavior of the element constructor and the render cycle against a live document.

use alloc::{rc::Rc, string::String, vec::Vec};
use core::cell::Cell;

use crate::{config::DEFAULT_MARKER_ATTRIBUTE, prelude::*};

// ============================================================================
// Test Components
// ============================================================================

struct Counter;

impl Component for Counter {
    type State = u32;

    fn render(&self, cx: &Scope<'_, Self>) -> crate::Result<Rendered> {
        Ok(li(cx.state().to_string())?.into())
    }
}

/// Renders a term and its definition as two siblings.
struct Entry;

impl Component for Entry {
    type State = (String, String);

    fn render(&self, cx: &Scope<'_, Self>) -> crate::Result<Rendered> {
        let (term, definition) = cx.state();
        Ok([dt(term)?, dd(definition)?].into())
    }
}

/// Wraps a child component under a heading.
struct Panel {
    child: Handle<Counter>,
}

impl Component for Panel {
    type State = String;

    fn render(&self, cx: &Scope<'_, Self>) -> crate::Result<Rendered> {
        Ok(section((h2(cx.state())?, ul(&self.child)?))?.into())
    }
}

fn marked(document: &Document, id: &str) -> Vec<Element> {
    document.find_all_by_attribute(DEFAULT_MARKER_ATTRIBUTE, id)
}

fn mounted_counter(document: &Document, start: u32) -> (Handle<Counter>, Element) {
    let counter = Handle::new(Counter);
    counter.set_state(start).unwrap();
    let list = ul(()).unwrap();
    list.append_child(&li("first").unwrap()).unwrap();
    counter.render().unwrap().append_to(&list).unwrap();
    list.append_child(&li("last").unwrap()).unwrap();
    document.body().append_child(&list).unwrap();
    (counter, list)
}

// ============================================================================
// Render Cycle
// ============================================================================

#[test]
fn exactly_one_marked_node_after_every_render() {
    let document = Document::new().unwrap();
    let (counter, _) = mounted_counter(&document, 0);
    let id = counter.id().as_str();

    assert_eq!(marked(&document, id).len(), 1);
    for _ in 0..5 {
        counter.update(|count| *count += 1).unwrap();
        assert_eq!(marked(&document, id).len(), 1);
    }
}

#[test]
fn update_replaces_node_at_same_position() {
    let document = Document::new().unwrap();
    let (counter, list) = mounted_counter(&document, 1);
    let before = marked(&document, counter.id().as_str()).remove(0);
    assert_eq!(before.text_content(), "1");
    assert_eq!(before.index_in_parent(), Some(1));

    counter.set_state(1).unwrap();
    counter.update(|count| *count = 2).unwrap();

    let after = marked(&document, counter.id().as_str()).remove(0);
    assert_ne!(before, after);
    assert!(!before.is_connected());
    assert_eq!(after.text_content(), "2");
    assert_eq!(after.index_in_parent(), Some(1));
    assert_eq!(list.text_content(), "first2last");
}

#[test]
fn multi_node_output_is_swapped_contiguously() {
    let document = Document::new().unwrap();
    let entry = Handle::new(Entry);
    entry.set_state(("rust".into(), "a language".into())).unwrap();

    let list = dl(dt("head").unwrap()).unwrap();
    entry.render().unwrap().append_to(&list).unwrap();
    list.append_child(&dd("tail").unwrap()).unwrap();
    document.body().append_child(&list).unwrap();
    let old = entry.mounted();

    entry
        .update(|(_, definition)| *definition = "a crab".into())
        .unwrap();

    assert!(old.iter().all(|node| node.parent().is_none()));
    let children = list.child_elements();
    assert_eq!(children.len(), 4);
    assert_eq!(children[1].text_content(), "rust");
    assert_eq!(children[2].text_content(), "a crab");
    assert_eq!(children[3].text_content(), "tail");
    assert_eq!(marked(&document, entry.id().as_str()), &children[1..3]);
}

#[test]
fn nested_component_rerenders_inside_parent() {
    let document = Document::new().unwrap();
    let child = Handle::new(Counter);
    child.set_state(7).unwrap();
    let panel = Handle::new(Panel {
        child: child.clone(),
    });
    panel.set_state("Totals".into()).unwrap();
    panel.render().unwrap().append_to(document.body()).unwrap();

    child.update(|count| *count += 1).unwrap();
    let section = marked(&document, panel.id().as_str()).remove(0);
    assert_eq!(section.text_content(), "Totals8");

    panel.update(|title| *title = "Sums".into()).unwrap();
    assert_eq!(document.body().child_count(), 1);
    assert_eq!(marked(&document, child.id().as_str()).len(), 1);
    assert_eq!(document.body().text_content(), "Sums8");
}

// ============================================================================
// Element Constructor
// ============================================================================

#[test]
fn construction_never_reuses_nodes() {
    let build = || -> crate::Result<Element> {
        div((attrs! { "class" => "card" }, "hello", span("world")?))
    };
    let first = build().unwrap();
    let second = build().unwrap();
    assert_eq!(first.outer_html(), second.outer_html());
    assert_ne!(first, second);
    assert_ne!(first.child_elements()[0], second.child_elements()[0]);
}

#[test]
fn bag_then_children_in_order() {
    let child = em("node").unwrap();
    let element = div((attrs! { "class" => "x" }, "hello", &child)).unwrap();
    assert_eq!(element.attribute("class").as_deref(), Some("x"));
    let children = element.children();
    assert_eq!(children.len(), 2);
    assert_eq!(children[0].as_text().map(|text| text.data()).as_deref(), Some("hello"));
    assert_eq!(&children[1], child.as_node());
}

#[test]
fn numeric_argument_is_dropped() {
    let element = div((42, "hello")).unwrap();
    assert!(element.attributes().is_empty());
    assert_eq!(element.child_count(), 1);
    assert_eq!(element.text_content(), "hello");
}

#[test]
fn event_binding_fires_once_per_dispatch() {
    let clicks = Rc::new(Cell::new(0));
    let seen = Rc::clone(&clicks);
    let element = button(attrs! {
        "onclick" => listener(move |_| {
            seen.set(seen.get() + 1);
            Ok(())
        }),
    })
    .unwrap();

    assert_eq!(element.listener_count("click"), 1);
    assert!(!element.has_attribute("onclick"));
    element.dispatch_event(&Event::new("click")).unwrap();
    assert_eq!(clicks.get(), 1);
    element.dispatch_event(&Event::new("click")).unwrap();
    assert_eq!(clicks.get(), 2);
}

#[test]
fn click_callback_drives_counter() {
    let document = Document::new().unwrap();
    let (counter, list) = mounted_counter(&document, 0);
    let increment = button((
        attrs! { "onclick" => counter.callback(|count| *count += 1) },
        "+1",
    ))
    .unwrap();
    document.body().append_child(&increment).unwrap();

    for _ in 0..3 {
        increment.dispatch_event(&Event::new("click")).unwrap();
    }
    assert_eq!(list.text_content(), "first3last");
    assert_eq!(marked(&document, counter.id().as_str()).len(), 1);
}

#[test]
fn document_events_reach_components() {
    let document = Document::new().unwrap();
    let (counter, _) = mounted_counter(&document, 0);
    let weak = counter.downgrade();
    document.add_event_listener(
        "reset",
        listener(move |_| weak.update(|count| *count = 0)),
    );

    counter.update(|count| *count = 9).unwrap();
    dispatch(&document, "reset").unwrap();
    assert_eq!(counter.state().as_deref(), Some(&0));
    assert_eq!(marked(&document, counter.id().as_str())[0].text_content(), "0");
}
