use anyhow::{Context, Result};
use config::Config;
use serde::Deserialize;

use crate::parser::normalize::UnknownLabelPolicy;

pub const ENV_PREFIX: &str = "WIKTEXTRACT";

/// Run settings read from `WIKTEXTRACT_*` environment variables. Command-line
/// flags take precedence.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default = "default_worker")]
    pub worker: usize,
    #[serde(default)]
    pub unknown_labels: Option<UnknownLabelPolicy>,
}

fn default_worker() -> usize {
    1
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            worker: default_worker(),
            unknown_labels: None,
        }
    }
}

impl Settings {
    pub fn load() -> Result<Self> {
        Self::from_config(
            Config::builder()
                .add_source(config::Environment::with_prefix(ENV_PREFIX).try_parsing(true))
                .build()
                .context("reading environment settings")?,
        )
    }

    fn from_config(config: Config) -> Result<Self> {
        config
            .try_deserialize()
            .context("invalid WIKTEXTRACT_* settings")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_without_sources() {
        let settings = Settings::from_config(Config::builder().build().unwrap()).unwrap();
        assert_eq!(settings.worker, 1);
        assert_eq!(settings.unknown_labels, None);
    }

    #[test]
    fn reads_overrides() {
        let config = Config::builder()
            .set_override("worker", 4)
            .unwrap()
            .set_override("unknown_labels", "strict")
            .unwrap()
            .build()
            .unwrap();
        let settings = Settings::from_config(config).unwrap();
        assert_eq!(settings.worker, 4);
        assert_eq!(settings.unknown_labels, Some(UnknownLabelPolicy::Strict));
    }

    #[test]
    fn rejects_unknown_policy() {
        let config = Config::builder()
            .set_override("unknown_labels", "ignore")
            .unwrap()
            .build()
            .unwrap();
        assert!(Settings::from_config(config).is_err());
    }
}
