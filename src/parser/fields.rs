//! Headword, attributes, inline forms and definitions of one entry.

use scraper::ElementRef;

use super::document::EntryAnchor;
use super::dom;
use crate::entry::{Extraction, RawVariant};
use crate::error::{ExtractError, Result};

const LIST_BLOCKS: &[&str] = &["ul", "ol", "dl"];
const SKIPPED_DEFINITION_CLASSES: &[&str] = &["form-of-definition", "use-with-mention"];
const RFDEF: &str = "rfdef";
const UNRENDERED_TEMPLATE: &str = "Template:";
const OR_LABEL: &str = "or";

/// Per-extractor knobs for [`extract_fields`].
#[derive(Clone, Copy, Default)]
pub struct FieldOptions {
    pub inline_variants: bool,
    pub extra_attrs: Option<fn(ElementRef<'_>) -> Vec<String>>,
}

impl FieldOptions {
    pub const PLAIN: FieldOptions = FieldOptions {
        inline_variants: false,
        extra_attrs: None,
    };
    pub const WITH_VARIANTS: FieldOptions = FieldOptions {
        inline_variants: true,
        extra_attrs: None,
    };
}

/// Headword, attributes, optional inline forms and definitions of the entry
/// opened by `anchor`.
pub fn extract_fields(anchor: &EntryAnchor<'_>, opts: FieldOptions) -> Result<Extraction> {
    let p = dom::next_sibling_named(anchor.heading, "p")
        .ok_or_else(|| ExtractError::mismatch("no paragraph after heading"))?;
    let form = headword(p)?;

    let mut attrs = gender_attrs(p);
    if let Some(extra) = opts.extra_attrs {
        attrs.extend(extra(p));
    }

    let raw_variants = if opts.inline_variants {
        inline_variants(p)?
    } else {
        Vec::new()
    };

    let ol = dom::next_sibling_named(p, "ol")
        .ok_or_else(|| ExtractError::mismatch("no definition list after headword paragraph"))?;
    let definitions = definitions(ol)?;

    Ok(Extraction {
        form,
        attrs,
        raw_variants,
        variants: Vec::new(),
        definitions,
    })
}

/// The extractor used by parts of speech that need nothing beyond the
/// headword and definitions.
pub fn default_extractor(anchor: &EntryAnchor<'_>) -> Result<Option<Extraction>> {
    extract_fields(anchor, FieldOptions::PLAIN).map(Some)
}

pub fn default_with_variants(anchor: &EntryAnchor<'_>) -> Result<Option<Extraction>> {
    extract_fields(anchor, FieldOptions::WITH_VARIANTS).map(Some)
}

fn headword(p: ElementRef<'_>) -> Result<String> {
    let strong = dom::first_named(p, "strong")
        .ok_or_else(|| ExtractError::mismatch("headword paragraph has no <strong>"))?;
    if !dom::has_class(strong, "headword") {
        return Err(ExtractError::mismatch("<strong> in paragraph is not a headword"));
    }
    Ok(dom::text(strong))
}

fn gender_attrs(p: ElementRef<'_>) -> Vec<String> {
    let Some(span) = dom::first_named(p, "span") else {
        return Vec::new();
    };
    dom::descendants(span)
        .filter(|e| dom::is(*e, "abbr"))
        .map(dom::text)
        .collect()
}

/// Labelled `b.form-of` children of the headword paragraph. An "or" label
/// stands for the last real label before it.
fn inline_variants(p: ElementRef<'_>) -> Result<Vec<RawVariant>> {
    let mut variants = Vec::new();
    let mut last_label: Option<String> = None;
    for b in dom::children_named(p, "b").filter(|b| dom::has_class(*b, "form-of")) {
        let label = dom::prev_sibling_element(b)
            .map(dom::text)
            .ok_or_else(|| ExtractError::mismatch("inline form without a label"))?;
        let label = if label == OR_LABEL {
            last_label
                .clone()
                .ok_or_else(|| ExtractError::mismatch("\"or\" before any variant label"))?
        } else {
            last_label = Some(label.clone());
            label
        };
        variants.push(RawVariant {
            label,
            form: dom::text(b),
        });
    }
    Ok(variants)
}

fn definitions(ol: ElementRef<'_>) -> Result<Vec<String>> {
    let mut defs = Vec::new();
    for li in dom::children_named(ol, "li") {
        if requests_definition(li) || is_cross_reference(li) {
            continue;
        }
        let text = dom::text_without(li, LIST_BLOCKS);
        let text = text.trim();
        if text.is_empty() || text.contains(UNRENDERED_TEMPLATE) {
            continue;
        }
        if text.contains('\n') {
            return Err(ExtractError::DefinitionLineBreak(text.to_string()));
        }
        defs.push(text.to_string());
    }
    Ok(defs)
}

fn requests_definition(li: ElementRef<'_>) -> bool {
    dom::descendants(li).any(|e| dom::is(e, "a") && dom::text(e) == RFDEF)
}

fn is_cross_reference(li: ElementRef<'_>) -> bool {
    dom::children_named(li, "span")
        .any(|span| SKIPPED_DEFINITION_CLASSES.iter().any(|c| dom::has_class(span, c)))
}
