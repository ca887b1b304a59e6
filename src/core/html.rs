// src/core/html.rs
//
// Page queries over a parsed document. Matched elements are copied out into
// owned `Element`s so nothing borrowed from the (non-Send) DOM outlives a call.
use scraper::{ElementRef, Html};

pub use scraper::Selector;

use crate::error::BrowserError;

/// Elements whose content never shows up as page text.
const NON_TEXT: &[&str] = &["script", "style", "noscript", "template", "head"];
/// Elements that don't break text flow; everything else is padded with spaces
/// so adjacent cells don't fuse.
const INLINE: &[&str] = &[
    "a", "abbr", "b", "em", "font", "i", "label", "small", "span", "strong", "sub", "sup", "u",
];

/* ---------------- Elements ---------------- */

/// A matched element, detached from its document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Element {
    tag: String,
    attrs: Vec<(String, String)>,
    inner: String,
    text: String,
}

impl Element {
    /// Build a handle by hand; `inner` is parsed as a fragment for its text.
    pub fn new(tag: &str, attrs: &[(&str, &str)], inner: &str) -> Self {
        let fragment = Html::parse_fragment(inner);
        Self {
            tag: tag.to_ascii_lowercase(),
            attrs: attrs.iter().map(|(k, v)| (k.to_ascii_lowercase(), s!(*v))).collect(),
            inner: s!(inner),
            text: visible_text(fragment.root_element()),
        }
    }

    pub fn tag(&self) -> &str { &self.tag }

    /// Attribute value (entities already decoded). Names are case-insensitive.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn attrs(&self) -> &[(String, String)] { &self.attrs }

    pub fn inner_html(&self) -> &str { &self.inner }

    /// Visible text: scripts dropped, whitespace collapsed.
    pub fn text(&self) -> &str { &self.text }
}

impl From<ElementRef<'_>> for Element {
    fn from(el: ElementRef<'_>) -> Self {
        let value = el.value();
        Self {
            tag: s!(value.name()),
            attrs: value.attrs().map(|(k, v)| (s!(k), s!(v))).collect(),
            inner: el.inner_html(),
            text: visible_text(el),
        }
    }
}

/* ---------------- Text ---------------- */

fn push_text(el: ElementRef<'_>, out: &mut String) {
    for child in el.children() {
        if let Some(text) = child.value().as_text() {
            out.push_str(text);
        } else if let Some(child) = ElementRef::wrap(child) {
            let name = child.value().name();
            if NON_TEXT.contains(&name) { continue; }
            let block = !INLINE.contains(&name);
            if block { out.push(' '); }
            push_text(child, out);
            if block { out.push(' '); }
        }
    }
}

pub fn visible_text(el: ElementRef<'_>) -> String {
    let mut raw = String::new();
    push_text(el, &mut raw);
    normalize_ws(&raw)
}

/// Visible text of a whole document.
pub fn text_of(doc: &str) -> String {
    visible_text(Html::parse_document(doc).root_element())
}

pub fn normalize_ws(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/* ---------------- Queries ---------------- */

pub fn parse_selector(text: &str) -> Result<Selector, BrowserError> {
    Selector::parse(text).map_err(|_| BrowserError::InvalidSelector { selector: s!(text) })
}

/// Every element in `doc` matching `sel`, in document order.
pub fn select(doc: &str, sel: &Selector) -> Vec<Element> {
    Html::parse_document(doc).select(sel).map(Element::from).collect()
}

pub fn select_first(doc: &str, sel: &Selector) -> Option<Element> {
    Html::parse_document(doc).select(sel).next().map(Element::from)
}

/// Run `f` over the first element matching `sel`, with its subtree still attached.
pub fn with_first<T>(doc: &str, sel: &Selector, f: impl FnOnce(ElementRef<'_>) -> T) -> Option<T> {
    let parsed = Html::parse_document(doc);
    let out = parsed.select(sel).next().map(f);
    out
}
