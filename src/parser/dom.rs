//! Navigation helpers over a parsed page.
//!
//! Entries are not self-contained subtrees: a heading, its paragraph, its
//! definition list and its inflection tables are siblings, so most lookups
//! walk forward from the heading rather than searching below it. Every walk
//! here only yields elements; comments and whitespace are stepped over.

use scraper::ElementRef;

pub fn is(el: ElementRef<'_>, name: &str) -> bool {
    el.value().name() == name
}

pub fn has_class(el: ElementRef<'_>, class: &str) -> bool {
    el.value().classes().any(|c| c == class)
}

/// Concatenated text of all descendant text nodes.
pub fn text(el: ElementRef<'_>) -> String {
    el.text().collect()
}

/// Like [`text`], but without the text of descendants named in `skip`.
pub fn text_without(el: ElementRef<'_>, skip: &[&str]) -> String {
    let mut out = String::new();
    collect_text(el, skip, &mut out);
    out
}

fn collect_text(el: ElementRef<'_>, skip: &[&str], out: &mut String) {
    for child in el.children() {
        if let Some(t) = child.value().as_text() {
            out.push_str(t);
        } else if let Some(child) = ElementRef::wrap(child) {
            if !skip.contains(&child.value().name()) {
                collect_text(child, skip, out);
            }
        }
    }
}

/// Following sibling elements, in order.
pub fn next_siblings<'a>(el: ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> {
    el.next_siblings().filter_map(ElementRef::wrap)
}

/// The first following sibling element named `name`.
pub fn next_sibling_named<'a>(el: ElementRef<'a>, name: &str) -> Option<ElementRef<'a>> {
    next_siblings(el).find(|e| is(*e, name))
}

/// The nearest preceding sibling element.
pub fn prev_sibling_element<'a>(el: ElementRef<'a>) -> Option<ElementRef<'a>> {
    el.prev_siblings().find_map(ElementRef::wrap)
}

/// Direct child elements named `name`.
pub fn children_named<'a>(el: ElementRef<'a>, name: &'a str) -> impl Iterator<Item = ElementRef<'a>> {
    el.children()
        .filter_map(ElementRef::wrap)
        .filter(move |e| is(*e, name))
}

/// First descendant element named `name`.
pub fn first_named<'a>(el: ElementRef<'a>, name: &str) -> Option<ElementRef<'a>> {
    descendants(el).find(|e| is(*e, name))
}

/// First descendant element named `name` carrying `class`.
pub fn first_with_class<'a>(el: ElementRef<'a>, name: &str, class: &str) -> Option<ElementRef<'a>> {
    descendants(el).find(|e| is(*e, name) && has_class(*e, class))
}

/// Descendant elements in document order, excluding `el` itself.
pub fn descendants<'a>(el: ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> {
    el.descendants().skip(1).filter_map(ElementRef::wrap)
}

/// Every element after the start of `el` in document order: its own
/// descendants first, then everything that follows it in the page.
pub fn following<'a>(el: ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> {
    std::iter::successors(Some(*el), |node| {
        if let Some(child) = node.first_child() {
            return Some(child);
        }
        let mut cur = *node;
        loop {
            if let Some(sibling) = cur.next_sibling() {
                return Some(sibling);
            }
            cur = cur.parent()?;
        }
    })
    .skip(1)
    .filter_map(ElementRef::wrap)
}

/// Every element before `el` in document order, nearest first. Ancestors are
/// included, as they open before `el` does.
pub fn preceding<'a>(el: ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> {
    std::iter::successors(Some(*el), |node| match node.prev_sibling() {
        Some(mut prev) => {
            while let Some(last) = prev.last_child() {
                prev = last;
            }
            Some(prev)
        }
        None => node.parent(),
    })
    .skip(1)
    .filter_map(ElementRef::wrap)
}

pub fn same(a: ElementRef<'_>, b: ElementRef<'_>) -> bool {
    a.id() == b.id()
}
