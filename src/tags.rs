//! One factory function per supported element.
//!
//! Every factory forwards to [`create_element`] with its fixed tag name, so `div(args)` is
//! `create_element("div", args)`.
//!
//! `<var>` has no factory.

use sprig_core::{Element, Result};

use crate::element::{IntoArgs, create_element};

macro_rules! tags {
    ($($(#[$meta:meta])* $name:ident => $tag:literal;)*) => {
        $(
            $(#[$meta])*
            ///
            /// # Errors
            ///
            /// Propagates any failure of [`create_element`].
            pub fn $name(args: impl IntoArgs) -> Result<Element> {
                create_element($tag, args)
            }
        )*

        /// Every tag name that has a factory, in alphabetical order.
        pub const TAG_NAMES: &[&str] = &[$($tag),*];
    };
}

tags! {
    /// Builds a hyperlink: `<a>`.
    a => "a";
    /// Builds an abbreviation: `<abbr>`.
    abbr => "abbr";
    /// Builds contact information: `<address>`.
    address => "address";
    /// Builds a clickable region of an image map: `<area>`.
    area => "area";
    /// Builds self-contained content: `<article>`.
    article => "article";
    /// Builds content aside from the main flow: `<aside>`.
    aside => "aside";
    /// Builds embedded sound: `<audio>`.
    audio => "audio";
    /// Builds text in bold: `<b>`.
    b => "b";
    /// Builds the base URL for relative links: `<base>`.
    base => "base";
    /// Builds text isolated from surrounding direction: `<bdi>`.
    bdi => "bdi";
    /// Builds text with overridden direction: `<bdo>`.
    bdo => "bdo";
    /// Builds a quoted section: `<blockquote>`.
    blockquote => "blockquote";
    /// Builds the document body: `<body>`.
    body => "body";
    /// Builds a line break: `<br>`.
    br => "br";
    /// Builds a clickable button: `<button>`.
    button => "button";
    /// Builds a drawing surface: `<canvas>`.
    canvas => "canvas";
    /// Builds a table caption: `<caption>`.
    caption => "caption";
    /// Builds the title of a work: `<cite>`.
    cite => "cite";
    /// Builds a fragment of code: `<code>`.
    code => "code";
    /// Builds a table column: `<col>`.
    col => "col";
    /// Builds a group of table columns: `<colgroup>`.
    colgroup => "colgroup";
    /// Builds content with a machine-readable value: `<data>`.
    data => "data";
    /// Builds predefined options for an input: `<datalist>`.
    datalist => "datalist";
    /// Builds a description in a description list: `<dd>`.
    dd => "dd";
    /// Builds deleted text: `<del>`.
    del => "del";
    /// Builds a disclosure widget: `<details>`.
    details => "details";
    /// Builds a defining instance of a term: `<dfn>`.
    dfn => "dfn";
    /// Builds a dialog box: `<dialog>`.
    dialog => "dialog";
    /// Builds a generic block container: `<div>`.
    div => "div";
    /// Builds a description list: `<dl>`.
    dl => "dl";
    /// Builds a term in a description list: `<dt>`.
    dt => "dt";
    /// Builds emphasized text: `<em>`.
    em => "em";
    /// Builds embedded external content: `<embed>`.
    embed => "embed";
    /// Builds a group of form controls: `<fieldset>`.
    fieldset => "fieldset";
    /// Builds a figure caption: `<figcaption>`.
    figcaption => "figcaption";
    /// Builds self-contained figure content: `<figure>`.
    figure => "figure";
    /// Builds a footer: `<footer>`.
    footer => "footer";
    /// Builds a form: `<form>`.
    form => "form";
    /// Builds a level 1 heading: `<h1>`.
    h1 => "h1";
    /// Builds a level 2 heading: `<h2>`.
    h2 => "h2";
    /// Builds a level 3 heading: `<h3>`.
    h3 => "h3";
    /// Builds a level 4 heading: `<h4>`.
    h4 => "h4";
    /// Builds a level 5 heading: `<h5>`.
    h5 => "h5";
    /// Builds a level 6 heading: `<h6>`.
    h6 => "h6";
    /// Builds document metadata: `<head>`.
    head => "head";
    /// Builds a header: `<header>`.
    header => "header";
    /// Builds a thematic break: `<hr>`.
    hr => "hr";
    /// Builds the document root element: `<html>`.
    html => "html";
    /// Builds text in an alternate voice: `<i>`.
    i => "i";
    /// Builds a nested browsing context: `<iframe>`.
    iframe => "iframe";
    /// Builds an image: `<img>`.
    img => "img";
    /// Builds an input control: `<input>`.
    input => "input";
    /// Builds inserted text: `<ins>`.
    ins => "ins";
    /// Builds keyboard input: `<kbd>`.
    kbd => "kbd";
    /// Builds a label for a form control: `<label>`.
    label => "label";
    /// Builds a caption for a fieldset: `<legend>`.
    legend => "legend";
    /// Builds a list item: `<li>`.
    li => "li";
    /// Builds a link to an external resource: `<link>`.
    link => "link";
    /// Builds the main content of the document: `<main>`.
    main => "main";
    /// Builds an image map: `<map>`.
    map => "map";
    /// Builds highlighted text: `<mark>`.
    mark => "mark";
    /// Builds document metadata: `<meta>`.
    meta => "meta";
    /// Builds a scalar measurement: `<meter>`.
    meter => "meter";
    /// Builds navigation links: `<nav>`.
    nav => "nav";
    /// Builds content for when scripting is unavailable: `<noscript>`.
    noscript => "noscript";
    /// Builds an embedded object: `<object>`.
    object => "object";
    /// Builds an ordered list: `<ol>`.
    ol => "ol";
    /// Builds a group of options: `<optgroup>`.
    optgroup => "optgroup";
    /// Builds an option in a select list: `<option>`.
    option => "option";
    /// Builds the result of a calculation: `<output>`.
    output => "output";
    /// Builds a paragraph: `<p>`.
    p => "p";
    /// Builds a parameter for an object: `<param>`.
    param => "param";
    /// Builds a container for image sources: `<picture>`.
    picture => "picture";
    /// Builds preformatted text: `<pre>`.
    pre => "pre";
    /// Builds the progress of a task: `<progress>`.
    progress => "progress";
    /// Builds a short quotation: `<q>`.
    q => "q";
    /// Builds ruby fallback parentheses: `<rp>`.
    rp => "rp";
    /// Builds a ruby annotation: `<rt>`.
    rt => "rt";
    /// Builds a ruby annotation container: `<ruby>`.
    ruby => "ruby";
    /// Builds text that is no longer accurate: `<s>`.
    s => "s";
    /// Builds sample program output: `<samp>`.
    samp => "samp";
    /// Builds a script: `<script>`.
    script => "script";
    /// Builds a section: `<section>`.
    section => "section";
    /// Builds a drop-down list: `<select>`.
    select => "select";
    /// Builds side comments: `<small>`.
    small => "small";
    /// Builds a media source: `<source>`.
    source => "source";
    /// Builds a generic inline container: `<span>`.
    span => "span";
    /// Builds important text: `<strong>`.
    strong => "strong";
    /// Builds style information: `<style>`.
    style => "style";
    /// Builds subscript text: `<sub>`.
    sub => "sub";
    /// Builds the summary of a details element: `<summary>`.
    summary => "summary";
    /// Builds superscript text: `<sup>`.
    sup => "sup";
    /// Builds an SVG graphic: `<svg>`.
    svg => "svg";
    /// Builds a table: `<table>`.
    table => "table";
    /// Builds a table body: `<tbody>`.
    tbody => "tbody";
    /// Builds a table cell: `<td>`.
    td => "td";
    /// Builds a content template: `<template>`.
    template => "template";
    /// Builds a multi-line text input: `<textarea>`.
    textarea => "textarea";
    /// Builds a table footer: `<tfoot>`.
    tfoot => "tfoot";
    /// Builds a table header cell: `<th>`.
    th => "th";
    /// Builds a table header: `<thead>`.
    thead => "thead";
    /// Builds a date or time: `<time>`.
    time => "time";
    /// Builds the document title: `<title>`.
    title => "title";
    /// Builds a table row: `<tr>`.
    tr => "tr";
    /// Builds a timed text track: `<track>`.
    track => "track";
    /// Builds text with an unarticulated annotation: `<u>`.
    u => "u";
    /// Builds an unordered list: `<ul>`.
    ul => "ul";
    /// Builds embedded video: `<video>`.
    video => "video";
    /// Builds a line break opportunity: `<wbr>`.
    wbr => "wbr";
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attrs;

    #[test]
    fn factories_use_their_own_tag() {
        assert_eq!(div(()).unwrap().tag_name(), "div");
        assert_eq!(h1("title").unwrap().outer_html(), "<h1>title</h1>");
        assert_eq!(main(()).unwrap().tag_name(), "main");
        assert_eq!(wbr(()).unwrap().outer_html(), "<wbr>");
    }

    #[test]
    fn every_listed_tag_is_a_valid_name() {
        for tag in TAG_NAMES {
            assert!(create_element(tag, ()).is_ok(), "{tag} should construct");
        }
        assert!(!TAG_NAMES.contains(&"var"));
    }

    #[test]
    fn factories_nest() {
        let list = ul((li("one").unwrap(), li((attrs! { "class" => "last" }, "two")).unwrap()))
            .unwrap();
        assert_eq!(
            list.outer_html(),
            r#"<ul><li>one</li><li class="last">two</li></ul>"#
        );
    }
}
