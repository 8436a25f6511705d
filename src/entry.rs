use itertools::Itertools;
use serde::Serialize;

/// A grammatical category symbol from a language's closed tag vocabulary.
pub type Tag = &'static str;

/// One inflected form and the tags that identify it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Variant {
    #[serde(rename = "type")]
    pub tags: Vec<Tag>,
    pub form: String,
}

impl Variant {
    pub fn new(tags: Vec<Tag>, form: impl Into<String>) -> Self {
        Variant {
            tags,
            form: form.into(),
        }
    }

    /// Prepend `tag` to the tag sequence.
    pub fn prefixed(mut self, tag: Tag) -> Self {
        self.tags.insert(0, tag);
        self
    }
}

/// A labelled inline form as it appears next to the headword, before the
/// label is mapped to tags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawVariant {
    pub label: String,
    pub form: String,
}

/// What an extractor pulled out of one entry.
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    pub form: String,
    pub attrs: Vec<String>,
    /// Inline labelled forms, normalized by the descriptor's label table.
    pub raw_variants: Vec<RawVariant>,
    /// Forms already tagged, e.g. decoded from inflection tables.
    pub variants: Vec<Variant>,
    pub definitions: Vec<String>,
}

/// A finished dictionary record, one per extracted sense group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entry {
    pub lemma: String,
    pub pos: &'static str,
    pub attrs: Vec<String>,
    pub variants: Vec<Variant>,
    #[serde(rename = "defs")]
    pub definitions: Vec<String>,
}

impl Entry {
    pub fn new(
        lemma: String,
        pos: &'static str,
        attrs: Vec<String>,
        variants: Vec<Variant>,
        definitions: Vec<String>,
    ) -> Self {
        Entry {
            lemma,
            pos,
            attrs: attrs.into_iter().unique().collect(),
            variants: dedup_variants(variants),
            definitions,
        }
    }

    pub fn to_json_line(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Drop repeated (tags, form) pairs, keeping the first occurrence.
pub fn dedup_variants(variants: Vec<Variant>) -> Vec<Variant> {
    variants.into_iter().unique().collect()
}
