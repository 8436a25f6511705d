use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};

use super::dom;

static DECORATION_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div.floatright, span.maintenance-line").unwrap());

const HEADINGS: &[&str] = &["h1", "h2", "h3", "h4", "h5", "h6"];

/// A heading that opens a dictionary section, plus the handles extractors
/// navigate from.
#[derive(Debug, Clone, Copy)]
pub struct EntryAnchor<'a> {
    pub heading: ElementRef<'a>,
    /// The `span.mw-headline` inside `heading`.
    pub headline_span: ElementRef<'a>,
}

impl<'a> EntryAnchor<'a> {
    pub fn headline(&self) -> String {
        dom::text(self.headline_span)
    }
}

/// One rendered page with decorative markup already removed.
pub struct Page {
    html: Html,
}

impl Page {
    pub fn parse(source: &str) -> Self {
        let mut html = Html::parse_document(source);
        strip_decorations(&mut html);
        Page { html }
    }

    /// Section headings in document order, produced lazily.
    pub fn entries(&self) -> impl Iterator<Item = EntryAnchor<'_>> {
        self.html
            .root_element()
            .descendants()
            .filter_map(ElementRef::wrap)
            .filter(|el| HEADINGS.contains(&el.value().name()))
            .filter_map(|heading| {
                let headline_span = dom::first_with_class(heading, "span", "mw-headline")?;
                Some(EntryAnchor {
                    heading,
                    headline_span,
                })
            })
    }
}

/// Floating boxes and maintenance notes would otherwise leak into paragraph
/// and definition text.
fn strip_decorations(html: &mut Html) {
    let ids: Vec<_> = html.select(&DECORATION_SEL).map(|el| el.id()).collect();
    for id in ids {
        if let Some(mut node) = html.tree.get_mut(id) {
            node.detach();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yields_headings_with_headlines_in_order() {
        let page = Page::parse(
            r#"<html><body>
            <h2><span class="mw-headline">Spanish</span></h2>
            <h3>No headline marker</h3>
            <h3><span class="mw-headline">Verb</span><span class="mw-editsection">edit</span></h3>
            <h4><span class="mw-headline">Conjugation</span></h4>
            </body></html>"#,
        );
        let headlines: Vec<_> = page.entries().map(|e| e.headline()).collect();
        assert_eq!(headlines, vec!["Spanish", "Verb", "Conjugation"]);
    }

    #[test]
    fn decorations_are_removed() {
        let page = Page::parse(
            r#"<html><body>
            <h3><span class="mw-headline">Noun</span></h3>
            <div class="floatright">Wikipedia has an article on gato</div>
            <p><strong class="headword">gato</strong><span class="maintenance-line">(please add)</span></p>
            </body></html>"#,
        );
        let anchor = page.entries().next().unwrap();
        let next = dom::next_siblings(anchor.heading).next().unwrap();
        assert!(dom::is(next, "p"));
        assert_eq!(dom::text(next), "gato");
    }
}
