use clap::ValueEnum;
use serde::Deserialize;
use tracing::warn;

use crate::entry::{RawVariant, Tag, Variant};
use crate::error::{ExtractError, Result};

/// Surface label → the tag sequences it stands for. A label may expand to
/// several sequences, each producing its own variant.
pub type Labels = &'static [(&'static str, &'static [&'static [Tag]])];

pub const NO_LABELS: Labels = &[];

/// What to do with an inline label missing from the label table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum UnknownLabelPolicy {
    /// Log the pair and drop it.
    Warn,
    /// Fail the entry.
    Strict,
}

/// Map labelled inline forms to tagged variants, in input order.
pub fn normalize(
    pos: &'static str,
    labels: Labels,
    policy: UnknownLabelPolicy,
    raw: Vec<RawVariant>,
) -> Result<Vec<Variant>> {
    let mut variants = Vec::with_capacity(raw.len());
    for RawVariant { label, form } in raw {
        match labels.iter().find(|(known, _)| *known == label) {
            Some((_, sequences)) => {
                for tags in sequences.iter() {
                    variants.push(Variant::new(tags.to_vec(), form.clone()));
                }
            }
            None => match policy {
                UnknownLabelPolicy::Warn => {
                    warn!(pos, label = %label, form = %form, "Unknown variant label, dropped");
                }
                UnknownLabelPolicy::Strict => {
                    return Err(ExtractError::UnknownVariantLabel { pos, label });
                }
            },
        }
    }
    Ok(variants)
}
