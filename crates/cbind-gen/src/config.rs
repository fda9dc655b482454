//! Generator configuration.
//!
//! Naming rules and type tags are loaded once and handed to the
//! [`Normalizer`] and [`Synthesizer`]; nothing changes them afterwards.

use cbind_core::{NamingConfig, Normalizer, TypeTags};
use serde::{Deserialize, Serialize};

use crate::error::{GenError, Result};
use crate::synth::Synthesizer;

/// Configuration for a generation run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenConfig {
    /// Identifier normalization rules.
    pub naming: NamingConfig,
    /// Type names the shape rules treat specially.
    pub tags: TypeTags,
}

impl GenConfig {
    /// Parse a configuration from a TOML string with `[naming]` and `[tags]` tables.
    pub fn parse(input: &str) -> Result<Self> {
        toml::from_str(input).map_err(GenError::Toml)
    }

    /// Parse a configuration from a file path.
    pub fn load(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn normalizer(&self) -> Normalizer {
        Normalizer::new(self.naming.clone())
    }

    pub fn synthesizer(&self) -> Synthesizer {
        Synthesizer::new(self.tags.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let config = GenConfig::parse("").unwrap();
        assert_eq!(config, GenConfig::default());
        assert_eq!(config.naming.symbol_prefix, "clang_");
        assert_eq!(config.tags.owned_strings, vec!["cxstring".to_string()]);
    }

    #[test]
    fn partial_tables_keep_other_defaults() {
        let config = GenConfig::parse(
            r#"
[naming]
symbol_prefix = "xml"

[naming.reserved_words]
len = "length"

[tags]
timestamp = "Time"
"#,
        )
        .unwrap();
        assert_eq!(config.naming.symbol_prefix, "xml");
        assert_eq!(config.naming.verb_prefixes, vec!["create", "get"]);
        assert_eq!(config.naming.reserved_words.len(), 1);
        assert_eq!(config.tags.timestamp, "Time");
        assert_eq!(config.tags.boolean, "bool");

        let n = config.normalizer();
        assert_eq!(n.trim_symbol_prefix("xmlParseFile"), "ParseFile");
        assert_eq!(n.substitute_reserved_word("len"), Some("length"));
        assert_eq!(config.synthesizer().tags().timestamp, "Time");
    }

    #[test]
    fn reject_invalid_toml() {
        assert!(GenConfig::parse("naming = [[[").is_err());
    }
}
