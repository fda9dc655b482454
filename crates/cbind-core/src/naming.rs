//! Identifier normalization.
//!
//! Turns foreign symbol spellings into target-language names: strips
//! constructor/accessor verbs and namespace prefixes, trims the owner type's
//! name off method names, abbreviates type names into receiver names and
//! substitutes reserved words.
//!
//! All rules are driven by a [`NamingConfig`] handed to the [`Normalizer`]
//! at construction; the normalizer never changes it afterwards.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{NamingError, Result};

/// Prefix and substitution tables used by the [`Normalizer`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NamingConfig {
    /// Literal prefix of every foreign call name (stripped once).
    pub symbol_prefix: String,
    /// Lower-case verbs stripped from the front of names, in order.
    pub verb_prefixes: Vec<String>,
    /// Capitalized verb stripped only when followed by a capital letter and more.
    pub capitalized_verb: String,
    /// Namespace-style prefixes, longest first; each stripped at most once.
    pub namespace_prefixes: Vec<String>,
    /// Conventional owner-name suffixes also tried without the suffix.
    pub owner_suffixes: Vec<String>,
    /// Reserved words of the target language and their safe replacements.
    pub reserved_words: BTreeMap<String, String>,
}

impl Default for NamingConfig {
    fn default() -> Self {
        let reserved_words = [
            ("range", "r"),
            ("type", "typ"),
            ("func", "fn"),
            ("map", "m"),
            ("chan", "ch"),
            ("select", "sel"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        Self {
            symbol_prefix: "clang_".to_string(),
            verb_prefixes: vec!["create".to_string(), "get".to_string()],
            capitalized_verb: "Get".to_string(),
            namespace_prefixes: ["CX_CXX", "CXX", "CX", "ObjC", "_"]
                .into_iter()
                .map(String::from)
                .collect(),
            owner_suffixes: vec!["Kind".to_string()],
            reserved_words,
        }
    }
}

/// Pure string transforms over a fixed [`NamingConfig`].
#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    config: NamingConfig,
}

impl Normalizer {
    pub fn new(config: NamingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &NamingConfig {
        &self.config
    }

    /// Strip the foreign symbol prefix exactly once.
    pub fn trim_symbol_prefix<'a>(&self, foreign_call_name: &'a str) -> &'a str {
        foreign_call_name
            .strip_prefix(self.config.symbol_prefix.as_str())
            .unwrap_or(foreign_call_name)
    }

    /// Strip namespace-style prefixes, each at most once, in table order.
    pub fn trim_language_prefix(&self, name: &str) -> String {
        let mut name = name;
        for prefix in &self.config.namespace_prefixes {
            name = name.strip_prefix(prefix.as_str()).unwrap_or(name);
        }
        name.to_string()
    }

    /// Strip leading constructor/accessor verbs, then namespace prefixes.
    ///
    /// The capitalized verb is only stripped when the character after it is
    /// upper case and at least one more character follows, so `GetX` stays
    /// intact while `GetXY` becomes `XY`.
    pub fn trim_common_prefix(&self, name: &str) -> String {
        let mut name = name;
        for verb in &self.config.verb_prefixes {
            name = name.strip_prefix(verb.as_str()).unwrap_or(name);
        }

        let verb = self.config.capitalized_verb.as_str();
        if !verb.is_empty()
            && name.len() > verb.len() + 1
            && name.as_bytes()[verb.len()].is_ascii_uppercase()
        {
            name = name.strip_prefix(verb).unwrap_or(name);
        }

        self.trim_language_prefix(name)
    }

    /// Trim the owner type's name off a method name.
    ///
    /// Returns the owner name itself when nothing is left, which marks the
    /// symbol as the owner type's constructor.
    pub fn trim_against_owner(&self, name: &str, owner: &str) -> String {
        let mut name = self.trim_common_prefix(name);

        name = strip_owner(&name, owner).unwrap_or(name);
        for suffix in &self.config.owner_suffixes {
            if let Some(stem) = owner.strip_suffix(suffix.as_str()) {
                name = strip_owner(&name, stem).unwrap_or(name);
            }
        }

        let name = self.trim_common_prefix(&name);
        if name.is_empty() {
            owner.to_string()
        } else {
            name
        }
    }

    /// Lower-cased initials of every capitalized run (e.g. `TranslationUnit` → `tu`).
    ///
    /// A type name without capital letters violates the caller's
    /// precondition and is reported as [`NamingError::NoCapitalSegments`].
    pub fn receiver_name_for(&self, type_name: &str) -> Result<String> {
        let name: String = type_name
            .chars()
            .filter(|c| c.is_uppercase())
            .flat_map(char::to_lowercase)
            .collect();

        if name.is_empty() {
            return Err(NamingError::NoCapitalSegments {
                type_name: type_name.to_string(),
            });
        }
        Ok(name)
    }

    /// Replacement for a reserved word, or `None` when `name` is not reserved.
    pub fn substitute_reserved_word(&self, name: &str) -> Option<&str> {
        self.config.reserved_words.get(name).map(String::as_str)
    }
}

fn strip_owner(name: &str, owner: &str) -> Option<String> {
    if owner.is_empty() {
        return None;
    }
    name.strip_prefix(&format!("{owner}_"))
        .or_else(|| name.strip_prefix(owner))
        .map(str::to_string)
}

/// Upper-case the first character.
pub fn upper_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
