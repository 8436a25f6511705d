use super::ExtractorDescriptor;
use crate::entry::Tag;
use crate::parser::fields::default_with_variants;
use crate::parser::normalize::{Labels, UnknownLabelPolicy};

const PERSON_3_SINGULAR: Tag = "3s";
const PRESENT_PARTICIPLE: Tag = "PRESP";
const SIMPLE_PAST: Tag = "PST";
const PAST_PARTICIPLE: Tag = "PP";
const PLURAL: Tag = "pl";
const COMPARATIVE: Tag = "COMP";
const SUPERLATIVE: Tag = "SUP";

pub const UNKNOWN_LABELS: UnknownLabelPolicy = UnknownLabelPolicy::Warn;

const NOUN_LABELS: Labels = &[("plural", &[&[PLURAL]])];

const ADJECTIVE_LABELS: Labels = &[
    ("comparative", &[&[COMPARATIVE]]),
    ("superlative", &[&[SUPERLATIVE]]),
];

const VERB_LABELS: Labels = &[
    ("third-person singular simple present", &[&[PERSON_3_SINGULAR]]),
    ("present participle", &[&[PRESENT_PARTICIPLE]]),
    ("simple past", &[&[SIMPLE_PAST]]),
    ("past participle", &[&[PAST_PARTICIPLE]]),
    ("simple past and past participle", &[&[SIMPLE_PAST], &[PAST_PARTICIPLE]]),
];

pub const DESCRIPTORS: &[ExtractorDescriptor] = &[
    ExtractorDescriptor::new("Noun", "noun", default_with_variants, NOUN_LABELS),
    ExtractorDescriptor::plain("Proper noun", "proper-noun"),
    ExtractorDescriptor::new("Adjective", "adjective", default_with_variants, ADJECTIVE_LABELS),
    ExtractorDescriptor::new("Verb", "verb", default_with_variants, VERB_LABELS),
    ExtractorDescriptor::plain("Adverb", "adverb"),
    ExtractorDescriptor::plain("Interjection", "interjection"),
    ExtractorDescriptor::plain("Initialism", "initialism"),
    ExtractorDescriptor::plain("Phrase", "phrase"),
    ExtractorDescriptor::plain("Prepositional phrase", "prepositional-phrase"),
    ExtractorDescriptor::plain("Prefix", "prefix"),
    ExtractorDescriptor::plain("Abbreviation", "abbreviation"),
    ExtractorDescriptor::plain("Proverb", "proverb"),
    ExtractorDescriptor::plain("Suffix", "suffix"),
    ExtractorDescriptor::plain("Contraction", "contraction"),
    ExtractorDescriptor::plain("Pronoun", "pronoun"),
    ExtractorDescriptor::plain("Preposition", "preposition"),
    ExtractorDescriptor::plain("Numeral", "numeral"),
    ExtractorDescriptor::plain("Conjunction", "conjunction"),
    ExtractorDescriptor::plain("Determiner", "determiner"),
    ExtractorDescriptor::plain("Number", "number"),
    ExtractorDescriptor::plain("Particle", "particle"),
];
