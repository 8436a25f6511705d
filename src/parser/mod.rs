pub mod document;
pub mod dom;
pub mod extract;
pub mod fields;
pub mod normalize;
pub mod tables;

use tracing::{debug, warn};

use crate::entry::Entry;
use crate::error::ExtractError;
use document::{EntryAnchor, Page};
use extract::{ExtractorDescriptor, Registry};

/// What became of one (entry, descriptor) pair.
#[derive(Debug)]
pub enum EntryOutcome {
    Emitted(Entry),
    /// Not applicable, or nothing left to define.
    Skipped,
    Failed(ExtractError),
}

/// Records and per-entry failures of one page.
#[derive(Debug, Default)]
pub struct DocumentReport {
    pub entries: Vec<Entry>,
    pub skipped: usize,
    /// Headline of the failed entry and the cause.
    pub failures: Vec<(String, ExtractError)>,
}

/// Pipeline for one page: scan entries → dispatch by headline → extract →
/// normalize variants. Failures stay with their entry.
pub fn process_page(registry: &Registry, path: &str, source: &str) -> DocumentReport {
    let page = Page::parse(source);
    let mut report = DocumentReport::default();

    for anchor in page.entries() {
        let headline = anchor.headline();
        for descriptor in registry.matching(&headline) {
            match extract_entry(registry, descriptor, &anchor) {
                EntryOutcome::Emitted(entry) => report.entries.push(entry),
                EntryOutcome::Skipped => {
                    debug!(path, headline = %headline, pos = descriptor.pos, "Entry skipped");
                    report.skipped += 1;
                }
                EntryOutcome::Failed(error) => {
                    warn!(path, headline = %headline, pos = descriptor.pos, %error, "Entry failed");
                    report.failures.push((headline.clone(), error));
                }
            }
        }
    }

    report
}

pub fn extract_entry(
    registry: &Registry,
    descriptor: &ExtractorDescriptor,
    anchor: &EntryAnchor<'_>,
) -> EntryOutcome {
    let extraction = match (descriptor.extractor)(anchor) {
        Ok(Some(extraction)) => extraction,
        Ok(None) => return EntryOutcome::Skipped,
        Err(e) => return EntryOutcome::Failed(e),
    };
    if extraction.definitions.is_empty() {
        return EntryOutcome::Skipped;
    }

    let mut variants = match normalize::normalize(
        descriptor.pos,
        descriptor.labels,
        registry.policy,
        extraction.raw_variants,
    ) {
        Ok(variants) => variants,
        Err(e) => return EntryOutcome::Failed(e),
    };
    variants.extend(extraction.variants);

    EntryOutcome::Emitted(Entry::new(
        extraction.form,
        descriptor.pos,
        extraction.attrs,
        variants,
        extraction.definitions,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::Variant;
    use extract::Language;
    use normalize::UnknownLabelPolicy;

    fn fixture(name: &str) -> String {
        std::fs::read_to_string(format!("tests/fixtures/{}.html", name)).unwrap()
    }

    #[test]
    fn english_entries_and_failure_isolation() {
        let registry = Registry::for_language(Language::EnEn, None);
        let report = process_page(&registry, "en_run.html", &fixture("en_run"));

        let summary: Vec<_> = report.entries.iter().map(|e| (e.lemma.as_str(), e.pos)).collect();
        assert_eq!(
            summary,
            vec![
                ("run", "noun"),
                ("run", "verb"),
                ("run over", "prepositional-phrase"),
                ("run over", "preposition"),
            ]
        );

        let noun = &report.entries[0];
        assert_eq!(noun.variants, vec![Variant::new(vec!["pl"], "runs")]);

        let verb = &report.entries[1];
        assert_eq!(
            verb.variants,
            vec![
                Variant::new(vec!["3s"], "runs"),
                Variant::new(vec!["PRESP"], "running"),
                Variant::new(vec!["PST"], "ran"),
                Variant::new(vec!["PP"], "run"),
            ]
        );

        // The broken adjective between them fails alone.
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].0, "Adjective");
        assert!(matches!(report.failures[0].1, ExtractError::StructuralMismatch(_)));
    }

    const PHRASE_LABELS: normalize::Labels = &[("plural", &[&["pl"]])];

    // Two descriptors for the same headline; only the first reads inline
    // forms, so only it trips over the unknown label.
    const OVERLAPPING: &[ExtractorDescriptor] = &[
        ExtractorDescriptor::new(
            "Prepositional phrase",
            "prepositional-phrase",
            fields::default_with_variants,
            PHRASE_LABELS,
        ),
        ExtractorDescriptor::plain("Preposition", "preposition"),
    ];

    #[test]
    fn failing_descriptor_does_not_stop_the_next() {
        let registry =
            Registry::with_descriptors(Language::EnEn, Some(UnknownLabelPolicy::Strict), OVERLAPPING);
        let report = process_page(&registry, "en_run_over.html", &fixture("en_run_over"));

        assert_eq!(report.failures.len(), 1);
        let (headline, err) = &report.failures[0];
        assert_eq!(headline, "Prepositional phrase");
        assert!(matches!(
            err,
            ExtractError::UnknownVariantLabel { pos: "prepositional-phrase", label } if label == "past tense"
        ));

        assert_eq!(report.entries.len(), 1);
        let entry = &report.entries[0];
        assert_eq!((entry.lemma.as_str(), entry.pos), ("run over", "preposition"));
        assert_eq!(entry.definitions, vec!["To drive over someone or something."]);
        assert!(entry.variants.is_empty());
    }

    #[test]
    fn label_expanding_to_two_tags() {
        let registry = Registry::for_language(Language::EnEn, None);
        let report = process_page(&registry, "en_walk.html", &fixture("en_walk"));
        let walk = &report.entries[0];
        assert_eq!(walk.lemma, "walk");
        assert_eq!(
            walk.variants,
            vec![
                Variant::new(vec!["3s"], "walks"),
                Variant::new(vec!["PRESP"], "walking"),
                Variant::new(vec!["PST"], "walked"),
                Variant::new(vec!["PP"], "walked"),
            ]
        );
    }

    #[test]
    fn strict_override_fails_unknown_labels() {
        let source = fixture("en_walk");
        let warn = process_page(&Registry::for_language(Language::EnEn, None), "w", &source);
        assert!(warn.failures.is_empty());

        // "en-en" nouns only know "plural"; walk's noun entry also lists a
        // "countable" label.
        let strict = process_page(
            &Registry::for_language(Language::EnEn, Some(UnknownLabelPolicy::Strict)),
            "w",
            &source,
        );
        assert_eq!(strict.entries.len(), warn.entries.len() - 1);
        assert!(matches!(
            &strict.failures[0].1,
            ExtractError::UnknownVariantLabel { pos: "noun", label } if label == "countable"
        ));
    }

    #[test]
    fn comments_and_whitespace_do_not_change_output() {
        let registry = Registry::for_language(Language::EnEs, None);
        let clean = process_page(&registry, "clean", &fixture("es_hablar"));
        let noisy = process_page(&registry, "noisy", &fixture("es_hablar_noisy"));
        assert!(!clean.entries.is_empty());
        assert_eq!(clean.entries, noisy.entries);
    }

    #[test]
    fn page_without_entries() {
        let registry = Registry::for_language(Language::EnDe, None);
        let report = process_page(&registry, "empty", "<html><body><p>nothing</p></body></html>");
        assert!(report.entries.is_empty());
        assert!(report.failures.is_empty());
        assert_eq!(report.skipped, 0);
    }
}
