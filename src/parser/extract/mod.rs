//! Extractor registry: which parts of speech each language edition handles,
//! and with which extractor and label table.

pub mod en_de;
pub mod en_en;
pub mod en_es;
pub mod en_ko;

use clap::ValueEnum;

use super::document::EntryAnchor;
use super::fields;
use super::normalize::{Labels, UnknownLabelPolicy, NO_LABELS};
use crate::entry::Extraction;
use crate::error::Result;

/// Pulls fields out of one entry. `Ok(None)` means the entry does not apply.
pub type Extractor = fn(&EntryAnchor<'_>) -> Result<Option<Extraction>>;

/// One dispatch rule: headlines starting with `prefix` are extracted as `pos`.
#[derive(Clone, Copy)]
pub struct ExtractorDescriptor {
    pub prefix: &'static str,
    pub pos: &'static str,
    pub extractor: Extractor,
    pub labels: Labels,
}

impl ExtractorDescriptor {
    pub const fn new(prefix: &'static str, pos: &'static str, extractor: Extractor, labels: Labels) -> Self {
        ExtractorDescriptor {
            prefix,
            pos,
            extractor,
            labels,
        }
    }

    /// A part of speech that only needs the headword and definitions.
    pub const fn plain(prefix: &'static str, pos: &'static str) -> Self {
        Self::new(prefix, pos, fields::default_extractor, NO_LABELS)
    }
}

/// Wiktionary language editions with a registered extractor set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Language {
    #[value(name = "en-en")]
    EnEn,
    #[value(name = "en-es")]
    EnEs,
    #[value(name = "en-de")]
    EnDe,
    #[value(name = "en-ko")]
    EnKo,
}

impl Language {
    pub fn code(self) -> &'static str {
        match self {
            Language::EnEn => "en-en",
            Language::EnEs => "en-es",
            Language::EnDe => "en-de",
            Language::EnKo => "en-ko",
        }
    }

    pub fn default_policy(self) -> UnknownLabelPolicy {
        match self {
            Language::EnEn => en_en::UNKNOWN_LABELS,
            Language::EnEs => en_es::UNKNOWN_LABELS,
            Language::EnDe => en_de::UNKNOWN_LABELS,
            Language::EnKo => en_ko::UNKNOWN_LABELS,
        }
    }

    fn descriptors(self) -> &'static [ExtractorDescriptor] {
        match self {
            Language::EnEn => en_en::DESCRIPTORS,
            Language::EnEs => en_es::DESCRIPTORS,
            Language::EnDe => en_de::DESCRIPTORS,
            Language::EnKo => en_ko::DESCRIPTORS,
        }
    }
}

/// The dispatch table for one run. Built once, then only read.
pub struct Registry {
    pub language: Language,
    pub policy: UnknownLabelPolicy,
    descriptors: &'static [ExtractorDescriptor],
}

impl Registry {
    pub fn for_language(language: Language, policy: Option<UnknownLabelPolicy>) -> Self {
        Self::with_descriptors(language, policy, language.descriptors())
    }

    /// A registry over an explicit descriptor list, in place of the
    /// edition's own.
    pub fn with_descriptors(
        language: Language,
        policy: Option<UnknownLabelPolicy>,
        descriptors: &'static [ExtractorDescriptor],
    ) -> Self {
        Registry {
            language,
            policy: policy.unwrap_or_else(|| language.default_policy()),
            descriptors,
        }
    }

    /// Descriptors whose prefix starts `headline`, in registration order.
    pub fn matching<'r>(&'r self, headline: &'r str) -> impl Iterator<Item = &'r ExtractorDescriptor> {
        self.descriptors
            .iter()
            .filter(move |d| headline.starts_with(d.prefix))
    }

    pub fn descriptors(&self) -> &[ExtractorDescriptor] {
        self.descriptors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_dispatch_keeps_registration_order() {
        let registry = Registry::for_language(Language::EnEn, None);
        let pos: Vec<_> = registry.matching("Prepositional phrase").map(|d| d.pos).collect();
        assert_eq!(pos, vec!["prepositional-phrase", "preposition"]);

        let pos: Vec<_> = registry.matching("Verb").map(|d| d.pos).collect();
        assert_eq!(pos, vec!["verb"]);

        assert_eq!(registry.matching("Etymology 1").count(), 0);
    }

    #[test]
    fn policy_defaults_per_language() {
        assert_eq!(Registry::for_language(Language::EnDe, None).policy, UnknownLabelPolicy::Strict);
        assert_eq!(Registry::for_language(Language::EnEs, None).policy, UnknownLabelPolicy::Warn);
        let overridden = Registry::for_language(Language::EnDe, Some(UnknownLabelPolicy::Warn));
        assert_eq!(overridden.policy, UnknownLabelPolicy::Warn);
    }

    #[test]
    fn every_language_registers_verbs() {
        for lang in [Language::EnEn, Language::EnEs, Language::EnDe, Language::EnKo] {
            let registry = Registry::for_language(lang, None);
            assert!(
                registry.descriptors().iter().any(|d| d.pos == "verb"),
                "{}",
                lang.code()
            );
        }
    }
}
