//! Normalized function records.
//!
//! A [`Function`] is built once per foreign symbol and handed by reference to
//! exactly one synthesis call. Nothing downstream mutates it.

use serde::{Deserialize, Serialize};

use crate::types::NormalizedType;

/// The implicit first argument of a method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receiver {
    /// Receiver variable name (e.g. `c`).
    pub name: String,
    /// Receiver type.
    #[serde(rename = "type")]
    pub ty: NormalizedType,
}

/// One foreign parameter, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionParameter {
    /// Target-language parameter name.
    pub name: String,
    /// Foreign display name (may be empty).
    #[serde(default)]
    pub foreign_name: String,
    /// Resolved type.
    #[serde(rename = "type")]
    pub ty: NormalizedType,
}

impl FunctionParameter {
    pub fn new(name: impl Into<String>, ty: NormalizedType) -> Self {
        let name = name.into();
        Self {
            foreign_name: name.clone(),
            name,
            ty,
        }
    }
}

/// A foreign function ready for synthesis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Function {
    /// Target-language function name.
    pub name: String,
    /// Raw foreign symbol invoked by the wrapper.
    pub foreign_call_name: String,
    /// Documentation text.
    #[serde(default)]
    pub doc: Option<String>,
    /// Parameters in declaration order.
    #[serde(default)]
    pub parameters: Vec<FunctionParameter>,
    /// Return type.
    pub return_type: NormalizedType,
    /// Receiver, when the function is rendered as a method.
    #[serde(default)]
    pub receiver: Option<Receiver>,
    /// Struct member read by field accessors.
    #[serde(default)]
    pub member: Option<String>,
}

impl Function {
    pub fn new(
        name: impl Into<String>,
        foreign_call_name: impl Into<String>,
        return_type: NormalizedType,
    ) -> Self {
        Self {
            name: name.into(),
            foreign_call_name: foreign_call_name.into(),
            doc: None,
            parameters: Vec::new(),
            return_type,
            receiver: None,
            member: None,
        }
    }

    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    pub fn param(mut self, param: FunctionParameter) -> Self {
        self.parameters.push(param);
        self
    }

    pub fn with_receiver(mut self, name: impl Into<String>, ty: NormalizedType) -> Self {
        self.receiver = Some(Receiver {
            name: name.into(),
            ty,
        });
        self
    }

    pub fn with_member(mut self, member: impl Into<String>) -> Self {
        self.member = Some(member.into());
        self
    }

    /// Whether the receiver is rendered on the declaration.
    ///
    /// A designated receiver is dropped when the function has no parameters
    /// and the function is emitted as a free function instead.
    pub fn binds_receiver(&self) -> bool {
        self.receiver.is_some() && !self.parameters.is_empty()
    }

    /// Name of the parameter at `index` as seen in the generated body.
    ///
    /// The first parameter takes the receiver's name when one is designated.
    pub fn parameter_name(&self, index: usize) -> &str {
        match (&self.receiver, index) {
            (Some(receiver), 0) => &receiver.name,
            _ => &self.parameters[index].name,
        }
    }

    /// Whether the parameter at `index` is the receiver position.
    pub fn is_receiver_position(&self, index: usize) -> bool {
        index == 0 && self.receiver.is_some()
    }
}

/// Dimensionality of a struct's embedded foreign array.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum ArrayDimensions {
    /// Elements are values and are copied into the sequence.
    #[default]
    One,
    /// Elements are pointers and are referenced, not copied.
    Two,
}

impl TryFrom<u8> for ArrayDimensions {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::One),
            2 => Ok(Self::Two),
            other => Err(format!("array dimensions must be 1 or 2, got {other}")),
        }
    }
}

impl From<ArrayDimensions> for u8 {
    fn from(value: ArrayDimensions) -> Self {
        match value {
            ArrayDimensions::One => 1,
            ArrayDimensions::Two => 2,
        }
    }
}

/// Length of an embedded foreign array.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArraySize {
    /// Compile-time constant length.
    Fixed(u64),
    /// Length read at run time from the named struct member.
    Member(String),
}

/// A struct array accessor rendered by the array template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionSliceReturn {
    /// The accessor itself; carries the receiver and the array member.
    pub function: Function,
    /// Foreign element spelling (e.g. `CXToken`).
    pub element_foreign_name: String,
    /// Target-language element type (e.g. `Token`).
    pub element_name: String,
    /// Elements are cast rather than composed.
    pub is_primitive: bool,
    pub dimensions: ArrayDimensions,
    pub size: ArraySize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cursor() -> NormalizedType {
        NormalizedType::named("Cursor", "CXCursor")
    }

    #[test]
    fn receiver_binding_requires_parameters() {
        let ctor = Function::new("CreateIndex", "clang_createIndex", cursor())
            .with_receiver("i", NormalizedType::named("Index", "CXIndex"));
        assert!(!ctor.binds_receiver());

        let method = Function::new("Kind", "clang_getCursorKind", cursor())
            .with_receiver("c", cursor())
            .param(FunctionParameter::new("C", cursor()));
        assert!(method.binds_receiver());
        assert!(method.is_receiver_position(0));
    }

    #[test]
    fn receiver_renames_first_parameter() {
        let f = Function::new("Equal", "clang_equalCursors", cursor())
            .with_receiver("c", cursor())
            .param(FunctionParameter::new("A", cursor()))
            .param(FunctionParameter::new("B", cursor()));
        assert_eq!(f.parameter_name(0), "c");
        assert_eq!(f.parameter_name(1), "B");

        let free = Function::new("Equal", "clang_equalCursors", cursor())
            .param(FunctionParameter::new("A", cursor()));
        assert_eq!(free.parameter_name(0), "A");
    }

    #[test]
    fn array_dimensions_from_number() {
        assert_eq!(ArrayDimensions::try_from(2).unwrap(), ArrayDimensions::Two);
        assert!(ArrayDimensions::try_from(3).is_err());

        let size: ArraySize = serde_json::from_str(r#"{"member": "NumTokens"}"#).unwrap();
        assert_eq!(size, ArraySize::Member("NumTokens".to_string()));
    }
}
