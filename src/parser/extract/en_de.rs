//! German entries. Verb tables carry separable-verb and participle handling;
//! unknown inline labels fail the entry.

use std::sync::LazyLock;

use super::ExtractorDescriptor;
use crate::entry::{Extraction, Tag, Variant};
use crate::error::{ExtractError, Result};
use crate::parser::document::EntryAnchor;
use crate::parser::fields::{extract_fields, FieldOptions};
use crate::parser::normalize::{Labels, UnknownLabelPolicy, NO_LABELS};
use crate::parser::tables::{self, CellMode, Grid, Inline, Layout, NavFrame, RowShift};

const PERSONS: &[Tag] = &["1s", "2s", "3s", "1p", "2p", "3p"];
const PERSON_3_PLURAL: Tag = "3p";

const DIMINUTIVE: Tag = "DIM";
const SUPERLATIVE: Tag = "SUP";
const COMPARATIVE: Tag = "COMP";

const INFINITIVE: Tag = "INF";
const ZU_INFINITIVE: Tag = "ZU-INF";
const PRESENT_PARTICIPLE: Tag = "PRESP";
const PAST_PARTICIPLE: Tag = "PP";
const PRESENT: Tag = "PRES";
const PRETERITE: Tag = "PRET";
const IMPERATIVE: Tag = "IMP";
const SUBJUNCTIVE_I: Tag = "SBJV-I";
const SUBJUNCTIVE_II: Tag = "SBJV-II";

const PARTICIPLE_ENDINGS: &[&str] = &["e", "em", "en", "er", "es"];

const DECLENSION_HEAD: &str = "Declension of";
const CONJUGATION_HEAD: &str = "conjugation of";
const SUBORDINATE_HEAD: &str = "Subordinate-clause forms of";
const DEGREE_HEADS: &[(&str, &[Tag])] = &[
    ("Positive forms of", &[]),
    ("Comparative forms of", &[COMPARATIVE]),
    ("Superlative forms of", &[SUPERLATIVE]),
];

/// Header of row 3 in tables of separable verbs, which gain an extra row.
const ZU_INFINITIVE_HEADER: &str = "zu-infinitive";
const AUXILIARY_ROW: usize = 3;

pub const UNKNOWN_LABELS: UnknownLabelPolicy = UnknownLabelPolicy::Strict;

const NOUN_LABELS: Labels = &[
    ("genitive", &[&[]]),
    ("plural", &[&[]]),
    ("diminutive", &[&[DIMINUTIVE]]),
];

const ADJECTIVE_LABELS: Labels = &[
    ("superlative", &[&[SUPERLATIVE]]),
    ("comparative", &[&[COMPARATIVE]]),
];

pub const DESCRIPTORS: &[ExtractorDescriptor] = &[
    ExtractorDescriptor::new("Noun", "noun", noun, NOUN_LABELS),
    ExtractorDescriptor::new("Proper noun", "proper-noun", noun, NOUN_LABELS),
    ExtractorDescriptor::new("Adjective", "adjective", adjective, ADJECTIVE_LABELS),
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
    ExtractorDescriptor::plain("Idiom", "idiom"),
    ExtractorDescriptor::plain("Ordinal number", "ordinal-number"),
    ExtractorDescriptor::plain("Contraction", "contraction"),
];

const FORM: CellMode = CellMode::Inline(Inline::LatinOrLink);

static CONJUGATION: LazyLock<Layout> = LazyLock::new(|| {
    let layout = Layout::new("conjugation")
        .cell(0, 0, &[INFINITIVE], CellMode::Direct)
        .cell(1, 0, &[PRESENT_PARTICIPLE], FORM)
        .cell(2, 0, &[PAST_PARTICIPLE], FORM);
    let layout = person_block(layout, 5, 0, PRESENT);
    let layout = person_block(layout, 9, 0, PRETERITE);
    let layout = person_block(layout, 5, 2, SUBJUNCTIVE_I);
    let layout = person_block(layout, 9, 2, SUBJUNCTIVE_II);
    layout
        .cell(13, 0, &[IMPERATIVE], FORM)
        .cell(13, 1, &[IMPERATIVE], FORM)
});

static SUBORDINATE: LazyLock<Layout> = LazyLock::new(|| {
    let layout = Layout::new("subordinate-clause");
    let layout = person_block(layout, 1, 0, PRESENT);
    let layout = person_block(layout, 5, 0, PRETERITE);
    let layout = person_block(layout, 1, 2, SUBJUNCTIVE_I);
    person_block(layout, 5, 2, SUBJUNCTIVE_II)
});

/// Three rows of persons from `row`: singular in column `col`, plural in the
/// column after it.
fn person_block(mut layout: Layout, row: usize, col: usize, tense: Tag) -> Layout {
    for i in 0..3 {
        layout = layout
            .cell(row + i, col, &[tense, PERSONS[i]], FORM)
            .cell(row + i, col + 1, &[tense, PERSONS[i + 3]], FORM);
    }
    layout
}

fn noun(anchor: &EntryAnchor<'_>) -> Result<Option<Extraction>> {
    let mut ex = extract_fields(anchor, FieldOptions::WITH_VARIANTS)?;
    for frame in tables::nav_frames(anchor.heading) {
        if frame.head().starts_with(DECLENSION_HEAD) {
            let forms = tables::inline_texts(frame.table()?, Inline::Latin);
            ex.variants.extend(forms.into_iter().map(|f| Variant::new(Vec::new(), f)));
        }
    }
    ex.variants.push(Variant::new(Vec::new(), ex.form.clone()));
    Ok(Some(ex))
}

fn adjective(anchor: &EntryAnchor<'_>) -> Result<Option<Extraction>> {
    let mut ex = extract_fields(anchor, FieldOptions::WITH_VARIANTS)?;
    ex.variants.push(Variant::new(Vec::new(), ex.form.clone()));
    for frame in tables::nav_frames(anchor.heading) {
        let head = frame.head();
        let Some(&(_, tags)) = DEGREE_HEADS.iter().find(|(prefix, _)| head.starts_with(*prefix)) else {
            continue;
        };
        let forms = tables::inline_texts(frame.table()?, Inline::Link);
        ex.variants.extend(forms.into_iter().map(|f| Variant::new(tags.to_vec(), f)));
    }
    Ok(Some(ex))
}

fn verb(anchor: &EntryAnchor<'_>) -> Result<Option<Extraction>> {
    // Verb headword lines carry no labelled inline forms worth keeping.
    let mut ex = extract_fields(anchor, FieldOptions::PLAIN)?;
    if ex.definitions.is_empty() {
        return Ok(Some(ex));
    }

    let mut conjugations = Vec::new();
    for frame in tables::nav_frames(anchor.heading) {
        let head = frame.head();
        if head.to_lowercase().starts_with(CONJUGATION_HEAD) {
            let table = decode_conjugation(&frame)?;
            if table.separable {
                ex.form = separable_lemma(&table.forms)?;
            }
            ex.attrs.push(table.auxiliary);
            conjugations.extend(table.forms);
        } else if head.starts_with(SUBORDINATE_HEAD) {
            let grid = Grid::new("subordinate-clause", frame.table()?);
            conjugations.extend(tables::decode(&grid, &SUBORDINATE, None)?);
        }
    }

    if !conjugations.is_empty() {
        let declined = participle_declension(&conjugations)?;
        conjugations.extend(declined);
    }
    ex.variants = conjugations;
    Ok(Some(ex))
}

struct Conjugation {
    forms: Vec<Variant>,
    auxiliary: String,
    separable: bool,
}

fn decode_conjugation(frame: &NavFrame<'_>) -> Result<Conjugation> {
    let grid = Grid::new("conjugation", frame.table()?);
    let separable = grid.header(AUXILIARY_ROW).as_deref() == Some(ZU_INFINITIVE_HEADER);

    let mut forms = Vec::new();
    let shift = if separable {
        let zu = grid.read(AUXILIARY_ROW, 0, FORM)?;
        forms.extend(zu.into_iter().map(|f| Variant::new(vec![ZU_INFINITIVE], f)));
        Some(RowShift {
            from: AUXILIARY_ROW,
            by: 1,
        })
    } else {
        None
    };

    let auxiliary_row = shift.map_or(AUXILIARY_ROW, |s| s.apply(AUXILIARY_ROW));
    let auxiliary = grid
        .read(auxiliary_row, 0, FORM)?
        .into_iter()
        .next()
        .ok_or(ExtractError::MissingForm { form: "auxiliary" })?;

    forms.extend(tables::decode(&grid, &CONJUGATION, shift)?);
    Ok(Conjugation {
        forms,
        auxiliary,
        separable,
    })
}

/// `an|fangen` from the present plural `fangen an`.
fn separable_lemma(forms: &[Variant]) -> Result<String> {
    let missing = || ExtractError::MissingForm {
        form: "present third-person plural",
    };
    let plural = forms
        .iter()
        .find(|v| v.tags == [PRESENT, PERSON_3_PLURAL])
        .ok_or_else(missing)?;
    match plural.form.split_whitespace().collect::<Vec<_>>()[..] {
        [verb, prefix] => Ok(format!("{}|{}", prefix, verb)),
        _ => Err(missing()),
    }
}

/// Attributive forms of both participles, past participle first.
fn participle_declension(conjugations: &[Variant]) -> Result<Vec<Variant>> {
    let participle = |tag: Tag, name: &'static str| {
        conjugations
            .iter()
            .find(|v| v.tags == [tag])
            .map(|v| v.form.clone())
            .ok_or(ExtractError::MissingForm { form: name })
    };
    let past = participle(PAST_PARTICIPLE, "past participle")?;
    let present = participle(PRESENT_PARTICIPLE, "present participle")?;

    Ok([(PAST_PARTICIPLE, past), (PRESENT_PARTICIPLE, present)]
        .into_iter()
        .flat_map(|(tag, stem)| {
            PARTICIPLE_ENDINGS
                .iter()
                .map(move |ending| Variant::new(vec![tag], format!("{}{}", stem, ending)))
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::extract::{Language, Registry};
    use crate::parser::{process_page, DocumentReport};

    fn run(fixture: &str) -> DocumentReport {
        let source = std::fs::read_to_string(format!("tests/fixtures/{}.html", fixture)).unwrap();
        process_page(&Registry::for_language(Language::EnDe, None), fixture, &source)
    }

    fn forms_tagged<'a>(variants: &'a [Variant], tags: &[Tag]) -> Vec<&'a str> {
        variants
            .iter()
            .filter(|v| v.tags == tags)
            .map(|v| v.form.as_str())
            .collect()
    }

    #[test]
    fn regular_verb_table() {
        let report = run("de_machen");
        assert!(report.failures.is_empty(), "{:?}", report.failures);
        let machen = &report.entries[0];
        assert_eq!(machen.lemma, "machen");
        assert_eq!(machen.attrs, vec!["haben"]);
        assert_eq!(machen.variants.len(), 40);

        let v = &machen.variants;
        assert_eq!(forms_tagged(v, &["INF"]), vec!["machen"]);
        assert_eq!(forms_tagged(v, &["PRES", "2s"]), vec!["machst"]);
        assert_eq!(forms_tagged(v, &["PRES", "2p"]), vec!["macht"]);
        assert_eq!(forms_tagged(v, &["SBJV-I", "3s"]), vec!["mache"]);
        assert_eq!(forms_tagged(v, &["SBJV-II", "1p"]), vec!["machten"]);
        assert_eq!(forms_tagged(v, &["IMP"]), vec!["mach", "mache", "macht"]);
        assert_eq!(
            forms_tagged(v, &["PP"]),
            vec!["gemacht", "gemachte", "gemachtem", "gemachten", "gemachter", "gemachtes"]
        );
        assert_eq!(forms_tagged(v, &["PRESP"])[1..], ["machende", "machendem", "machenden", "machender", "machendes"]);
        assert!(forms_tagged(v, &["ZU-INF"]).is_empty());
    }

    #[test]
    fn separable_verb_rebuilds_lemma() {
        let report = run("de_anfangen");
        assert!(report.failures.is_empty(), "{:?}", report.failures);
        let anfangen = &report.entries[0];
        assert_eq!(anfangen.lemma, "an|fangen");
        assert_eq!(anfangen.attrs, vec!["haben"]);
        assert_eq!(anfangen.variants.len(), 65);

        let v = &anfangen.variants;
        assert_eq!(v[0], Variant::new(vec!["ZU-INF"], "anzufangen"));
        assert_eq!(forms_tagged(v, &["PRES", "3p"]), vec!["fangen an", "anfangen"]);
        assert_eq!(forms_tagged(v, &["PRET", "1s"]), vec!["fing an", "anfing"]);
        assert_eq!(forms_tagged(v, &["IMP"]), vec!["fang an", "fange an", "fangt an"]);
        assert_eq!(forms_tagged(v, &["PP"])[0], "angefangen");
    }

    #[test]
    fn separable_lemma_needs_two_tokens() {
        let forms = vec![Variant::new(vec!["PRES", "3p"], "fangen")];
        assert!(matches!(
            separable_lemma(&forms),
            Err(ExtractError::MissingForm { .. })
        ));
        assert!(separable_lemma(&[]).is_err());
    }

    #[test]
    fn participles_are_required_once_tables_exist() {
        let forms = vec![Variant::new(vec!["PP"], "gemacht")];
        assert!(matches!(
            participle_declension(&forms),
            Err(ExtractError::MissingForm { form: "present participle" })
        ));
    }

    #[test]
    fn nouns_collect_declension_and_fail_strictly() {
        let report = run("de_nouns");
        assert_eq!(report.entries.len(), 1);
        let hund = &report.entries[0];
        assert_eq!(hund.lemma, "Hund");
        assert_eq!(hund.attrs, vec!["m"]);
        assert_eq!(
            hund.variants,
            vec![
                Variant::new(vec![], "Hundes"),
                Variant::new(vec![], "Hunde"),
                Variant::new(vec!["DIM"], "Hündchen"),
                Variant::new(vec![], "Hund"),
                Variant::new(vec![], "Hunds"),
                Variant::new(vec![], "Hunden"),
            ]
        );

        assert_eq!(report.failures.len(), 1);
        let (headline, err) = &report.failures[0];
        assert_eq!(headline, "Noun");
        assert!(matches!(
            err,
            ExtractError::UnknownVariantLabel { pos: "noun", label } if label == "feminine"
        ));
    }

    #[test]
    fn adjective_degree_tables() {
        let report = run("de_schnell");
        let schnell = &report.entries[0];
        assert_eq!(schnell.variants.len(), 11);
        assert_eq!(schnell.variants[0], Variant::new(vec!["COMP"], "schneller"));
        assert_eq!(schnell.variants[2], Variant::new(vec![], "schnell"));
        assert_eq!(forms_tagged(&schnell.variants, &["SUP"]), vec!["am schnellsten", "schnellster", "schnellste"]);
        assert_eq!(forms_tagged(&schnell.variants, &["COMP"]), vec!["schneller", "schnellerer", "schnellere"]);
    }
}
