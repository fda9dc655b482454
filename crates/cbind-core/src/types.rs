//! Normalized type descriptors.
//!
//! A [`NormalizedType`] is what type resolution hands to the generator: the
//! target-language display name, the foreign spelling, an optional primitive
//! representation and the pointer/slice shape of the value. [`TypeTags`]
//! names the handful of display and foreign names the shape rules treat
//! specially (owned strings, character elements, booleans, timestamps).

use serde::{Deserialize, Serialize};

/// Resolved description of one foreign value's shape.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NormalizedType {
    /// Target-language type name (e.g. `uint32`, `Cursor`, `cxstring`).
    pub name: String,
    /// Foreign element spelling without qualifiers (e.g. `uint`, `char`, `CXCursor`).
    #[serde(default)]
    pub foreign_name: String,
    /// Foreign primitive used for casts at the call boundary (e.g. `uint`).
    #[serde(default)]
    pub primitive: Option<String>,
    /// Number of pointer indirections on the foreign side.
    #[serde(default)]
    pub pointer_depth: u32,
    /// The value is passed as a sequence.
    #[serde(default)]
    pub is_slice: bool,
    /// Set on a length parameter: the slice parameter whose length fills it.
    #[serde(default)]
    pub length_of_slice: Option<String>,
    /// The pointer is an output channel written by the foreign call.
    #[serde(default)]
    pub is_return_argument: bool,
    /// The target-language type is a primitive (cast rather than composed).
    #[serde(default)]
    pub is_primitive: bool,
}

impl NormalizedType {
    /// A struct-like type wrapping a foreign representation.
    pub fn named(name: impl Into<String>, foreign_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            foreign_name: foreign_name.into(),
            ..Self::default()
        }
    }

    /// A primitive type with a foreign cast representation.
    pub fn primitive(name: impl Into<String>, foreign: impl Into<String>) -> Self {
        let foreign = foreign.into();
        Self {
            name: name.into(),
            foreign_name: foreign.clone(),
            primitive: Some(foreign),
            is_primitive: true,
            ..Self::default()
        }
    }

    /// Add pointer indirections.
    pub fn pointer(mut self, depth: u32) -> Self {
        self.pointer_depth = depth;
        self
    }

    /// Mark as a sequence.
    pub fn slice(mut self) -> Self {
        self.is_slice = true;
        self
    }

    /// Mark as the length of the named slice parameter.
    pub fn length_of(mut self, slice: impl Into<String>) -> Self {
        self.length_of_slice = Some(slice.into());
        self
    }

    /// Mark as an output argument.
    pub fn output(mut self) -> Self {
        self.is_return_argument = true;
        self
    }

    /// The foreign spelling used in casts: the primitive when known,
    /// otherwise the foreign name.
    pub fn foreign_cast(&self) -> &str {
        self.primitive.as_deref().unwrap_or(&self.foreign_name)
    }
}

/// Display and foreign names with special meaning to the shape rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TypeTags {
    /// Display name of the empty return type.
    pub void: String,
    /// Display name of the boolean type.
    pub boolean: String,
    /// Native string type of the target language.
    pub native_string: String,
    /// Display name of the structured time type.
    pub timestamp: String,
    /// Display names of owned-string wrappers (released exactly once).
    pub owned_strings: Vec<String>,
    /// Foreign element names that make a pointer a character pointer.
    pub char_elements: Vec<String>,
    /// Accessor name prefixes that turn a predicate integer into a boolean.
    pub predicate_prefixes: Vec<String>,
    /// Display name of the integer used for predicate struct fields.
    pub predicate_int: String,
}

impl Default for TypeTags {
    fn default() -> Self {
        Self {
            void: "void".to_string(),
            boolean: "bool".to_string(),
            native_string: "string".to_string(),
            timestamp: "time.Time".to_string(),
            owned_strings: vec!["cxstring".to_string()],
            char_elements: vec!["char".to_string()],
            predicate_prefixes: vec!["has".to_string(), "is".to_string()],
            predicate_int: "int16".to_string(),
        }
    }
}

impl TypeTags {
    pub fn is_void(&self, ty: &NormalizedType) -> bool {
        ty.name == self.void
    }

    pub fn is_boolean(&self, ty: &NormalizedType) -> bool {
        ty.name == self.boolean
    }

    pub fn is_timestamp(&self, ty: &NormalizedType) -> bool {
        ty.name == self.timestamp
    }

    /// Whether the type is an owned-string wrapper.
    pub fn is_owned_string(&self, ty: &NormalizedType) -> bool {
        self.owned_strings.iter().any(|s| *s == ty.name)
    }

    /// Whether the foreign element is a character.
    pub fn is_char_element(&self, ty: &NormalizedType) -> bool {
        self.char_elements.iter().any(|c| *c == ty.foreign_name)
    }

    /// A pointer (of any depth) to characters.
    pub fn is_char_pointer(&self, ty: &NormalizedType) -> bool {
        ty.pointer_depth > 0 && self.is_char_element(ty)
    }

    /// A single-level pointer to characters, i.e. a C string.
    pub fn is_c_string(&self, ty: &NormalizedType) -> bool {
        ty.pointer_depth == 1 && self.is_char_element(ty)
    }

    /// Whether an accessor with this name reads a predicate field.
    pub fn is_predicate_name(&self, name: &str) -> bool {
        self.predicate_prefixes.iter().any(|p| name.starts_with(p.as_str()))
    }
}
