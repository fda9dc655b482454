//! Type resolution seam.
//!
//! Foreign introspection names each parameter and return type by a
//! [`TypeHandle`]; a [`TypeResolver`] turns handles into
//! [`NormalizedType`]s. [`TypeTable`] is the table-backed resolver used by
//! declaration files.

use std::collections::BTreeMap;

use cbind_core::NormalizedType;
use serde::{Deserialize, Serialize};

use crate::error::{GenError, Result};

/// Reference to a foreign type at one use site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "HandleSpec")]
pub struct TypeHandle {
    /// Foreign type spelling, the key into the type table.
    pub spelling: String,
    /// The pointer is written by the call rather than read.
    pub output: bool,
    /// This use is the length of the named slice parameter.
    pub length_of: Option<String>,
}

impl TypeHandle {
    pub fn new(spelling: impl Into<String>) -> Self {
        Self {
            spelling: spelling.into(),
            output: false,
            length_of: None,
        }
    }

    pub fn output(mut self) -> Self {
        self.output = true;
        self
    }

    pub fn length_of(mut self, slice: impl Into<String>) -> Self {
        self.length_of = Some(slice.into());
        self
    }
}

/// A handle written either as a bare spelling or as a table.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum HandleSpec {
    /// Simple spelling string.
    Spelling(String),
    /// Spelling with per-use flags.
    Detailed {
        spelling: String,
        #[serde(default)]
        output: bool,
        #[serde(default)]
        length_of: Option<String>,
    },
}

impl From<HandleSpec> for TypeHandle {
    fn from(spec: HandleSpec) -> Self {
        match spec {
            HandleSpec::Spelling(spelling) => TypeHandle::new(spelling),
            HandleSpec::Detailed {
                spelling,
                output,
                length_of,
            } => TypeHandle {
                spelling,
                output,
                length_of,
            },
        }
    }
}

/// Resolves foreign type handles into normalized descriptors.
pub trait TypeResolver {
    fn resolve(&self, handle: &TypeHandle) -> Result<NormalizedType>;
}

/// Table of normalized types keyed by foreign spelling.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeTable {
    types: BTreeMap<String, NormalizedType>,
}

impl TypeTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a type under a foreign spelling.
    pub fn with(mut self, spelling: impl Into<String>, ty: NormalizedType) -> Self {
        self.types.insert(spelling.into(), ty);
        self
    }

    pub fn get(&self, spelling: &str) -> Option<&NormalizedType> {
        self.types.get(spelling)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl TypeResolver for TypeTable {
    fn resolve(&self, handle: &TypeHandle) -> Result<NormalizedType> {
        let mut ty = self
            .types
            .get(&handle.spelling)
            .cloned()
            .ok_or_else(|| GenError::UnknownType {
                spelling: handle.spelling.clone(),
            })?;

        if handle.output {
            ty.is_return_argument = true;
        }
        if let Some(slice) = &handle.length_of {
            ty.length_of_slice = Some(slice.clone());
        }
        Ok(ty)
    }
}
