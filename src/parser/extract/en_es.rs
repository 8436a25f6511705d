//! Spanish entries: gendered noun and adjective forms, verb conjugation and
//! combined verb + clitic pronoun tables.

use std::cmp::Reverse;
use std::sync::LazyLock;

use scraper::ElementRef;

use super::ExtractorDescriptor;
use crate::entry::{Extraction, Tag, Variant};
use crate::error::Result;
use crate::parser::document::EntryAnchor;
use crate::parser::dom;
use crate::parser::fields::{default_with_variants, extract_fields, FieldOptions};
use crate::parser::normalize::{Labels, UnknownLabelPolicy, NO_LABELS};
use crate::parser::tables::{self, CellMode, Grid, Inline, Layout, NavFrame};

const PERSONS: &[Tag] = &["1s", "2s", "3s", "1p", "2p", "3p"];

const MASCULINE: Tag = "m.";
const FEMININE: Tag = "f.";
const PLURAL: Tag = "pl.";

const INFINITIVE: Tag = "INF";
const GERUND: Tag = "GER";
const PAST_PARTICIPLE: Tag = "PP";
const PRESENT: Tag = "PRES";
const IMPERFECT: Tag = "IMPERF";
const PRETERITE: Tag = "PRET";
const FUTURE: Tag = "FUT";
const CONDITIONAL: Tag = "COND";
const SUBJUNCTIVE: Tag = "SBJV";
const SUBJUNCTIVE_IMPERFECT: Tag = "SBJV-IMPERF";
const IMPERATIVE: Tag = "IMP";
const REFLEXIVE: Tag = "REFL";
const SUPERLATIVE: Tag = "SUP";

const UNCOUNTABLE: &str = "uncountable";
const GLOSSARY_LINK: &str = "Appendix:Glossary";
const COMPOUND_OF: &str = "Compound of ";

pub const UNKNOWN_LABELS: UnknownLabelPolicy = UnknownLabelPolicy::Warn;

const NOUN_LABELS: Labels = &[
    ("plural", &[&[PLURAL]]),
    ("feminine plural", &[&[FEMININE, PLURAL]]),
    ("feminine", &[&[FEMININE]]),
    ("masculine plural", &[&[MASCULINE, PLURAL]]),
    ("masculine", &[&[MASCULINE]]),
];

const ADJECTIVE_LABELS: Labels = &[
    ("plural", &[&[PLURAL]]),
    ("feminine singular", &[&[FEMININE]]),
    ("feminine plural", &[&[FEMININE, PLURAL]]),
    ("feminine", &[&[FEMININE]]),
    ("masculine plural", &[&[MASCULINE, PLURAL]]),
    ("superlative", &[&[SUPERLATIVE]]),
];

pub const DESCRIPTORS: &[ExtractorDescriptor] = &[
    ExtractorDescriptor::new("Noun", "noun", noun, NOUN_LABELS),
    ExtractorDescriptor::plain("Proper noun", "proper-noun"),
    ExtractorDescriptor::new("Adjective", "adjective", default_with_variants, ADJECTIVE_LABELS),
    ExtractorDescriptor::new("Verb", "verb", verb, NO_LABELS),
    ExtractorDescriptor::plain("Adverb", "adverb"),
    ExtractorDescriptor::plain("Preposition", "preposition"),
    ExtractorDescriptor::plain("Conjunction", "conjunction"),
    ExtractorDescriptor::plain("Phrase", "phrase"),
    ExtractorDescriptor::plain("Numeral", "numeral"),
    ExtractorDescriptor::plain("Interjection", "interjection"),
    ExtractorDescriptor::plain("Pronoun", "pronoun"),
    ExtractorDescriptor::plain("Proverb", "proverb"),
    ExtractorDescriptor::plain("Abbreviation", "abbreviation"),
    ExtractorDescriptor::plain("Initialism", "initialism"),
    ExtractorDescriptor::plain("Determiner", "determiner"),
    ExtractorDescriptor::plain("Article", "article"),
];

/// Tense rows of the conjugation table, one column per person.
const PERSON_ROWS: &[(usize, Tag)] = &[
    (8, PRESENT),
    (9, IMPERFECT),
    (10, PRETERITE),
    (11, FUTURE),
    (12, CONDITIONAL),
    (15, SUBJUNCTIVE),
    (16, SUBJUNCTIVE_IMPERFECT),
    (17, SUBJUNCTIVE_IMPERFECT),
    (21, IMPERATIVE),
];

static CONJUGATION: LazyLock<Layout> = LazyLock::new(|| {
    let mode = CellMode::Inline(Inline::Span);
    let layout = Layout::new("conjugation")
        .cell(0, 0, &[INFINITIVE], mode)
        .cell(1, 0, &[GERUND], mode)
        .cell(3, 0, &[PAST_PARTICIPLE, MASCULINE], mode)
        .cell(3, 1, &[PAST_PARTICIPLE, FEMININE], mode)
        .cell(4, 0, &[PAST_PARTICIPLE, MASCULINE, PLURAL], mode)
        .cell(4, 1, &[PAST_PARTICIPLE, FEMININE, PLURAL], mode);
    with_person_rows(layout, mode)
});

// Reflexive tables have no participle rows and list pronoun and verb as
// plain cell text.
static REFLEXIVE_CONJUGATION: LazyLock<Layout> = LazyLock::new(|| {
    let mode = CellMode::Direct;
    let layout = Layout::new("reflexive conjugation")
        .cell(0, 0, &[INFINITIVE], mode)
        .cell(1, 0, &[GERUND], mode);
    with_person_rows(layout, mode)
});

fn with_person_rows(mut layout: Layout, mode: CellMode) -> Layout {
    for &(row, tense) in PERSON_ROWS {
        layout = layout.row_across(row, &[tense], PERSONS, mode);
    }
    layout
}

const COMBINED_COLUMNS: usize = 6;

static COMBINED_THREE_GROUPS: LazyLock<Layout> = LazyLock::new(|| {
    combined_layout(10, &[(3, INFINITIVE), (6, GERUND), (9, IMPERATIVE)])
});

static COMBINED_SEVEN_GROUPS: LazyLock<Layout> = LazyLock::new(|| {
    combined_layout(
        29,
        &[
            (3, INFINITIVE),
            (4, INFINITIVE),
            (7, GERUND),
            (8, GERUND),
            (11, IMPERATIVE),
            (12, IMPERATIVE),
            (15, IMPERATIVE),
            (16, IMPERATIVE),
            (19, IMPERATIVE),
            (20, IMPERATIVE),
            (23, IMPERATIVE),
            (24, IMPERATIVE),
            (27, IMPERATIVE),
            (28, IMPERATIVE),
        ],
    )
});

fn combined_layout(rows: usize, moods: &[(usize, Tag)]) -> Layout {
    let mode = CellMode::Inline(Inline::Span);
    moods
        .iter()
        .fold(Layout::new("combined forms").with_rows(rows), |layout, &(row, mood)| {
            layout.uniform_row(row, COMBINED_COLUMNS, &[mood], mode)
        })
}

/// Clitic pronouns with the tag they produce, longest first so that `-nos`
/// wins over `-os`.
static CLITICS: LazyLock<Vec<(&'static str, Tag)>> = LazyLock::new(|| {
    let mut clitics = vec![
        ("me", "-me"),
        ("te", "-te"),
        ("le", "-le"),
        ("la", "-la"),
        ("lo", "-lo"),
        ("se", "-se"),
        ("nos", "-nos"),
        ("os", "-os"),
        ("les", "-les"),
        ("las", "-las"),
        ("los", "-los"),
    ];
    clitics.sort_by_key(|(suffix, _)| Reverse(suffix.len()));
    clitics
});

fn noun(anchor: &EntryAnchor<'_>) -> Result<Option<Extraction>> {
    let opts = FieldOptions {
        inline_variants: true,
        extra_attrs: Some(uncountable_marker),
    };
    extract_fields(anchor, opts).map(Some)
}

/// `uncountable` when the headword line links it to the glossary.
fn uncountable_marker(p: ElementRef<'_>) -> Vec<String> {
    dom::descendants(p)
        .filter(|e| dom::is(*e, "i"))
        .flat_map(dom::descendants)
        .filter(|a| {
            dom::is(*a, "a")
                && a.value().attr("title").is_some_and(|t| t.contains(GLOSSARY_LINK))
                && dom::text(*a) == UNCOUNTABLE
        })
        .map(dom::text)
        .collect()
}

fn verb(anchor: &EntryAnchor<'_>) -> Result<Option<Extraction>> {
    // Verb headword lines list forms the conjugation table already covers.
    let mut ex = extract_fields(anchor, FieldOptions::PLAIN)?;
    ex.definitions.retain(|d| !d.contains(COMPOUND_OF));

    let mut conjugations = Vec::new();
    for frame in tables::nav_frames(anchor.heading) {
        let head = frame.head();
        let reflexive = head.contains(&format!("{}se", ex.form)) || ex.form.ends_with("se");
        let decoded = if head.contains(&format!("Conjugation of {}", ex.form)) {
            decode_conjugation(&frame, reflexive)?
        } else if !reflexive && head.contains(&format!("Selected combined forms of {}", ex.form)) {
            decode_combined_forms(&frame)?
        } else {
            continue;
        };
        if reflexive {
            conjugations.extend(decoded.into_iter().map(|v| v.prefixed(REFLEXIVE)));
        } else {
            conjugations.extend(decoded);
        }
    }

    ex.variants = conjugations;
    Ok(Some(ex))
}

fn decode_conjugation(frame: &NavFrame<'_>, reflexive: bool) -> Result<Vec<Variant>> {
    let grid = Grid::new("conjugation", frame.table()?);
    let layout = if reflexive {
        &*REFLEXIVE_CONJUGATION
    } else {
        &*CONJUGATION
    };
    tables::decode(&grid, layout, None)
}

fn decode_combined_forms(frame: &NavFrame<'_>) -> Result<Vec<Variant>> {
    let grid = Grid::new("combined forms", frame.table()?);
    let layout = tables::layout_for(&grid, "combined forms", &[&*COMBINED_THREE_GROUPS, &*COMBINED_SEVEN_GROUPS])?;
    let variants = tables::decode(&grid, layout, None)?;
    Ok(variants.into_iter().filter_map(tag_clitic).collect())
}

/// Append the clitic tag of the longest matching suffix; forms without a
/// clitic are dropped.
fn tag_clitic(variant: Variant) -> Option<Variant> {
    let &(_, tag) = CLITICS
        .iter()
        .find(|(suffix, _)| variant.form.ends_with(*suffix))?;
    let mut tagged = variant;
    tagged.tags.push(tag);
    Some(tagged)
}
