//! Korean verbs and adjectives, whose paradigm lives under a separate
//! "Conjugation" heading rather than next to the entry.

use std::sync::LazyLock;

use regex::Regex;
use scraper::ElementRef;
use tracing::debug;

use super::ExtractorDescriptor;
use crate::entry::{Extraction, Tag, Variant};
use crate::error::{ExtractError, Result};
use crate::parser::document::EntryAnchor;
use crate::parser::dom;
use crate::parser::fields::{extract_fields, FieldOptions};
use crate::parser::normalize::{UnknownLabelPolicy, NO_LABELS};
use crate::parser::tables::{self, Grid};

static NON_LATIN1_OR_PAREN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^\x00-\xFF]|[()]").unwrap());

const STEMS: &[(&str, Tag)] = &[
    ("Stem 1", "stem1"),
    ("Stem 2", "stem2"),
    ("Stem 2a", "stem2a"),
    ("Stem 3", "stem3"),
];
const CONJUGATION_TYPE: &str = "Conjugation type";

const POLITENESS: &[Tag] = &[
    "formal-non-polite",
    "informal-non-polite",
    "informal-polite",
    "formal-polite",
];

const INDICATIVE: Tag = "indicative";
const INTERROGATIVE: Tag = "interrogative";
const HORTATIVE: Tag = "hortative";
const IMPERATIVE: Tag = "imperative";
const ASSERTIVE: Tag = "assertive";
const REASON: Tag = "reason";
const CONTRAST: Tag = "contrast";
const CONJUNCTION: Tag = "conjunction";
const CONDITION: Tag = "condition";
const MOTIVE: Tag = "motive";
const VERBAL_NOUN: Tag = "verbal-noun";
const DETERMINER: Tag = "determiner";
const NON_PAST: Tag = "non-past";
const PAST: Tag = "past";
const PRESENT: Tag = "present";
const FUTURE: Tag = "future";
const HONORIFIC: Tag = "honorific";

/// Main-table rows from index 2 on; `None` marks a separator row.
type RowSet = &'static [Option<&'static [Tag]>];

const VERB_ROWS: RowSet = &[
    Some(&[INDICATIVE, NON_PAST]),
    Some(&[INDICATIVE, PAST]),
    Some(&[INTERROGATIVE, NON_PAST]),
    Some(&[INTERROGATIVE, PAST]),
    Some(&[HORTATIVE]),
    Some(&[IMPERATIVE]),
    Some(&[ASSERTIVE]),
    None,
    Some(&[REASON]),
    Some(&[CONTRAST]),
    Some(&[CONJUNCTION]),
    Some(&[CONDITION]),
    Some(&[MOTIVE]),
    None,
    Some(&[VERBAL_NOUN]),
    Some(&[VERBAL_NOUN, PAST]),
    Some(&[DETERMINER, PAST]),
    Some(&[DETERMINER, PRESENT]),
    Some(&[DETERMINER, FUTURE]),
];

const ADJECTIVE_ROWS: RowSet = &[
    Some(&[INDICATIVE, NON_PAST]),
    Some(&[INDICATIVE, PAST]),
    Some(&[INTERROGATIVE, NON_PAST]),
    Some(&[INTERROGATIVE, PAST]),
    Some(&[ASSERTIVE]),
    None,
    Some(&[REASON]),
    Some(&[CONTRAST]),
    Some(&[CONJUNCTION]),
    Some(&[CONDITION]),
    None,
    Some(&[VERBAL_NOUN]),
    Some(&[VERBAL_NOUN, PAST]),
    Some(&[DETERMINER, PRESENT]),
    Some(&[DETERMINER, FUTURE]),
];

const FIRST_FORM_ROW: usize = 2;
const ASSERTIVE_HEADER: &str = "Assertive";
const SI_IRREGULAR: &str = "si-irregular";
const NORTH_KOREA: &str = "North Korea";

pub const UNKNOWN_LABELS: UnknownLabelPolicy = UnknownLabelPolicy::Warn;

pub const DESCRIPTORS: &[ExtractorDescriptor] = &[
    ExtractorDescriptor::new("Verb", "verb", verb, NO_LABELS),
    ExtractorDescriptor::new("Adjective", "adjective", verb, NO_LABELS),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Paradigm {
    Verb,
    Adjective,
}

impl Paradigm {
    fn rows(self) -> RowSet {
        match self {
            Paradigm::Verb => VERB_ROWS,
            Paradigm::Adjective => ADJECTIVE_ROWS,
        }
    }
}

fn verb(anchor: &EntryAnchor<'_>) -> Result<Option<Extraction>> {
    let plain = extract_fields(anchor, FieldOptions::PLAIN)?;

    let frame = match conjugation_frame(anchor) {
        Ok(Some(frame)) => frame,
        Ok(None) => return Ok(Some(without_paradigm(plain))),
        Err(err @ ExtractError::MisplacedConjugationSection { .. }) => {
            debug!(error = %err, "Conjugation section not attached");
            return Ok(Some(without_paradigm(plain)));
        }
        Err(err) => return Err(err),
    };

    let (variants, classes) = decode_paradigm(frame)?;
    if classes.iter().any(|c| c == SI_IRREGULAR) {
        // Honorific-only paradigm; keep the entry as its headword line shows it.
        return Ok(Some(plain));
    }

    Ok(Some(Extraction {
        form: plain.form,
        attrs: classes,
        raw_variants: Vec::new(),
        variants,
        definitions: plain.definitions,
    }))
}

fn without_paradigm(plain: Extraction) -> Extraction {
    Extraction {
        attrs: Vec::new(),
        raw_variants: Vec::new(),
        variants: Vec::new(),
        ..plain
    }
}

/// The navigation frame holding this entry's paradigm. Fails with
/// [`ExtractError::MisplacedConjugationSection`] when the next "Conjugation"
/// heading belongs to a later Verb or Adjective entry.
fn conjugation_frame<'a>(anchor: &EntryAnchor<'a>) -> Result<Option<ElementRef<'a>>> {
    let mut owner = None;
    let mut conjugation = None;
    for el in dom::following(anchor.heading) {
        if !(dom::is(el, "span") && dom::has_class(el, "mw-headline")) {
            continue;
        }
        match dom::text(el).as_str() {
            "Verb" | "Adjective" => owner = Some(el),
            "Conjugation" => {
                conjugation = Some(el);
                break;
            }
            _ => {}
        }
    }
    let Some(conjugation) = conjugation else {
        return Ok(None);
    };
    if !owner.is_some_and(|o| dom::same(o, anchor.headline_span)) {
        return Err(ExtractError::MisplacedConjugationSection {
            headline: anchor.headline(),
        });
    }

    let next_frame = |from: ElementRef<'a>| {
        dom::following(from)
            .find(|e| tables::is_nav_frame(*e))
            .ok_or_else(|| ExtractError::mismatch("no conjugation frame after heading"))
    };
    let mut frame = next_frame(conjugation)?;
    // North and South Korean paradigms are stacked; the second is the standard one.
    let north_first = dom::preceding(frame)
        .find(|e| dom::is(*e, "p"))
        .is_some_and(|p| dom::text(p).contains(NORTH_KOREA));
    if north_first {
        frame = next_frame(frame)?;
    }
    Ok(Some(frame))
}

fn decode_paradigm(frame: ElementRef<'_>) -> Result<(Vec<Variant>, Vec<String>)> {
    let head = dom::first_with_class(frame, "div", "NavHead")
        .map(|h| dom::text(h).trim().to_string())
        .unwrap_or_default();
    let paradigm = if head.starts_with("Selected forms of the adjective") {
        Paradigm::Adjective
    } else if head.starts_with("Selected forms of the verb") {
        Paradigm::Verb
    } else {
        return Err(ExtractError::mismatch(format!("unknown conjugation head {:?}", head)));
    };

    let content = dom::first_with_class(frame, "div", "NavContent")
        .ok_or_else(|| ExtractError::mismatch("conjugation frame has no content"))?;
    let found: Vec<_> = dom::descendants(content).filter(|e| dom::is(*e, "table")).collect();
    let [stems, main, rest @ ..] = found.as_slice() else {
        return Err(ExtractError::mismatch(format!("expected 2 or 3 conjugation tables, found {}", found.len())));
    };
    if rest.len() > 1 {
        return Err(ExtractError::mismatch(format!("expected 2 or 3 conjugation tables, found {}", found.len())));
    }

    let (mut variants, classes) = decode_stems(&Grid::new("stems", *stems))?;
    let rows = paradigm.rows();
    decode_rows(&Grid::new("conjugation", *main), rows.iter().copied(), false, &mut variants)?;
    if let Some(honorific) = rest.first() {
        let rows = rows.iter().copied().filter(|r| !is_hortative(*r));
        decode_rows(&Grid::new("honorific conjugation", *honorific), rows, true, &mut variants)?;
    }
    Ok((variants, classes))
}

fn is_hortative(row: Option<&[Tag]>) -> bool {
    row == Some(&[HORTATIVE][..])
}

fn decode_stems(grid: &Grid<'_>) -> Result<(Vec<Variant>, Vec<String>)> {
    let mut variants = Vec::new();
    let mut classes = None;
    for row in 1..grid.len() {
        let header = grid.header(row).unwrap_or_default();
        let td = grid.cell(row, 0)?;
        if header == CONJUGATION_TYPE {
            classes = Some(conjugation_classes(&dom::text(td))?);
            continue;
        }
        let &(_, tag) = STEMS
            .iter()
            .find(|(name, _)| *name == header)
            .ok_or_else(|| ExtractError::mismatch(format!("unknown stem row {:?}", header)))?;
        let stem = dom::first_named(td, "span")
            .ok_or_else(|| ExtractError::mismatch(format!("{} has no form", header)))?;
        variants.push(Variant::new(vec![tag], dom::text(stem).trim()));
    }
    let classes = classes.ok_or_else(|| ExtractError::mismatch("stems table has no conjugation type"))?;
    Ok((variants, classes))
}

/// "vowel stem, regular (규칙)" → `["vowel stem", "regular"]`.
fn conjugation_classes(text: &str) -> Result<Vec<String>> {
    let mut parts = text.split(',');
    let stem = parts.next().unwrap_or_default().trim().to_string();
    let regularity = parts
        .next()
        .ok_or_else(|| ExtractError::mismatch(format!("conjugation type without regularity: {:?}", text)))?;
    let regularity = NON_LATIN1_OR_PAREN.replace_all(regularity.trim(), "");
    let regularity = match regularity.trim() {
        "/it/eop-irregular" => "it/eop-irregular",
        other => other,
    };
    Ok(vec![stem, regularity.to_string()])
}

fn decode_rows<'r>(
    grid: &Grid<'_>,
    rows: impl Iterator<Item = Option<&'r [Tag]>>,
    honorific: bool,
    out: &mut Vec<Variant>,
) -> Result<()> {
    let mut idx = FIRST_FORM_ROW;
    for row in rows {
        grid.row(idx)?;
        // Some paradigms have no imperative row; its place is taken by the
        // assertive one.
        if row.is_some_and(|tags| tags.contains(&IMPERATIVE))
            && grid.header(idx).as_deref() == Some(ASSERTIVE_HEADER)
        {
            continue;
        }
        if let Some(tags) = row {
            let mut base = tags.to_vec();
            if honorific {
                base.push(HONORIFIC);
            }
            for (td, &level) in grid.cells(idx)?.into_iter().zip(POLITENESS) {
                let Some(span) = dom::first_named(td, "span") else {
                    continue;
                };
                for form in dom::text(span).split(',').map(str::trim).filter(|f| !f.is_empty()) {
                    let mut tags = base.clone();
                    tags.push(level);
                    out.push(Variant::new(tags, form));
                }
            }
        }
        idx += 1;
    }
    Ok(())
}
