//! `cbind.toml` manifest parsing and project configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use cbind_core::{NamingConfig, TypeTags};
use cbind_gen::GenConfig;
use serde::{Deserialize, Serialize};

/// The top-level manifest structure for a cbind project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CbindManifest {
    /// Project metadata (required).
    pub project: ProjectConfig,
    /// Identifier normalization overrides.
    #[serde(default)]
    pub naming: NamingConfig,
    /// Type tag overrides.
    #[serde(default)]
    pub tags: TypeTags,
    /// Output configuration.
    #[serde(default)]
    pub output: Option<OutputConfig>,
}

/// Project metadata section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Project name (required).
    pub name: String,
    /// Package name of generated files.
    #[serde(default)]
    pub package: Option<String>,
}

/// Output configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Generated file, relative to the project directory.
    #[serde(default)]
    pub file: Option<String>,
}

impl CbindManifest {
    /// Search upward from `start_dir` for a `cbind.toml` file, parse and return it
    /// along with the directory it was found in.
    pub fn find_and_load(start_dir: &Path) -> Result<Option<(Self, PathBuf)>> {
        let mut dir = start_dir.to_path_buf();
        loop {
            let candidate = dir.join("cbind.toml");
            if candidate.is_file() {
                let content = std::fs::read_to_string(&candidate)
                    .with_context(|| format!("reading {}", candidate.display()))?;
                let manifest: CbindManifest = toml::from_str(&content)
                    .with_context(|| format!("parsing {}", candidate.display()))?;
                return Ok(Some((manifest, dir)));
            }
            if !dir.pop() {
                break;
            }
        }
        Ok(None)
    }

    /// Parse a manifest from a TOML string.
    #[cfg(test)]
    pub fn from_str(s: &str) -> Result<Self> {
        toml::from_str(s).context("parsing cbind.toml")
    }

    /// Generator configuration from the `[naming]` and `[tags]` sections.
    pub fn gen_config(&self) -> GenConfig {
        GenConfig {
            naming: self.naming.clone(),
            tags: self.tags.clone(),
        }
    }

    /// Configured output file, if any.
    pub fn output_file(&self) -> Option<&str> {
        self.output.as_ref().and_then(|o| o.file.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_full_manifest() {
        let toml_str = r#"
[project]
name = "go-clang"
package = "clang"

[naming]
symbol_prefix = "clang_"

[naming.reserved_words]
type = "t"

[tags]
owned_strings = ["cxstring", "cxstr"]

[output]
file = "clang/bindings_gen.go"
"#;
        let manifest = CbindManifest::from_str(toml_str).unwrap();
        assert_eq!(manifest.project.name, "go-clang");
        assert_eq!(manifest.project.package.as_deref(), Some("clang"));
        assert_eq!(manifest.output_file(), Some("clang/bindings_gen.go"));

        let config = manifest.gen_config();
        assert_eq!(config.naming.reserved_words.get("type").map(String::as_str), Some("t"));
        assert_eq!(config.tags.owned_strings.len(), 2);
        assert_eq!(config.tags.boolean, "bool");
    }

    #[test]
    fn parse_minimal_manifest() {
        let manifest = CbindManifest::from_str("[project]\nname = \"minimal\"\n").unwrap();
        assert_eq!(manifest.project.name, "minimal");
        assert!(manifest.project.package.is_none());
        assert!(manifest.output_file().is_none());
        assert_eq!(manifest.gen_config(), GenConfig::default());
    }

    #[test]
    fn reject_missing_project() {
        assert!(CbindManifest::from_str("[output]\nfile = \"x.go\"\n").is_err());
    }

    #[test]
    fn find_and_load_in_current_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("cbind.toml"), "[project]\nname = \"here\"\n").unwrap();

        let (manifest, found_dir) = CbindManifest::find_and_load(dir.path()).unwrap().unwrap();
        assert_eq!(manifest.project.name, "here");
        assert_eq!(found_dir, dir.path());
    }

    #[test]
    fn find_and_load_walks_up() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("cbind.toml"), "[project]\nname = \"parent\"\n").unwrap();

        let nested = dir.path().join("a").join("b").join("c");
        std::fs::create_dir_all(&nested).unwrap();

        let (manifest, found_dir) = CbindManifest::find_and_load(&nested).unwrap().unwrap();
        assert_eq!(manifest.project.name, "parent");
        assert_eq!(found_dir, dir.path());
    }

    #[test]
    fn find_and_load_reports_parse_errors() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("cbind.toml"), "not toml [[[").unwrap();

        let err = CbindManifest::find_and_load(dir.path()).unwrap_err();
        assert!(format!("{err:#}").contains("parsing"));
    }
}
