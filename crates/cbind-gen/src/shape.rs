//! Parameter and return shape classification.
//!
//! Every parameter and every return type falls into exactly one shape; the
//! synthesizer matches on shapes exhaustively, so supporting a new foreign
//! shape means adding a variant here.

use cbind_core::{Function, NormalizedType, TypeTags};

/// How one parameter crosses the boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamShape<'a> {
    /// Filled from the length of the named slice; not declared.
    SliceLength { slice: &'a str },
    /// Input sequence copied into a foreign backing array.
    Slice(SliceElement),
    /// Pointer written by the call, surfaced as an extra return value.
    Output(OutputKind),
    /// Native string copied into a foreign C string for the call.
    CString,
    /// Struct-like value passed through its embedded foreign representation.
    Struct,
    /// Primitive value cast to its foreign primitive.
    Primitive,
}

impl ParamShape<'_> {
    /// Whether the parameter appears in the declared parameter list.
    pub fn is_declared(&self) -> bool {
        !matches!(self, ParamShape::SliceLength { .. } | ParamShape::Output(_))
    }
}

/// Element copy strategy for a slice parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SliceElement {
    /// Each element gets its own foreign string copy.
    CString,
    /// Each element's embedded foreign representation is copied.
    Struct,
    /// Each element is cast to the foreign primitive.
    Primitive,
}

/// Kind of value an output argument produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputKind {
    /// Owned string: disposed after the call, content returned.
    OwnedString,
    /// Foreign primitive cast back to the display type.
    Primitive,
    /// Struct-like value returned as-is.
    Value,
}

/// How the wrapper produces its result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReturnShape<'a> {
    /// No result and no output arguments: a bare call.
    Nothing,
    /// Owned string wrapped, disposed and materialized.
    OwnedString,
    /// Primitive compared against its foreign zero.
    Boolean { foreign: &'a str },
    /// Borrowed C string converted without disposal.
    CharPointer,
    /// Epoch seconds converted into the time type.
    Timestamp,
    /// No result of its own; the output arguments are returned.
    OutputsOnly,
    /// Result reshaped into the display type.
    Reshaped { composite: bool },
}

/// Classify one parameter.
pub fn classify_param<'a>(ty: &'a NormalizedType, tags: &TypeTags) -> ParamShape<'a> {
    if ty.is_slice {
        let element = if tags.is_char_pointer(ty) {
            SliceElement::CString
        } else if ty.primitive.is_some() && !tags.is_owned_string(ty) {
            SliceElement::Primitive
        } else {
            SliceElement::Struct
        };
        return ParamShape::Slice(element);
    }

    if let Some(slice) = ty.length_of_slice.as_deref() {
        return ParamShape::SliceLength { slice };
    }

    if ty.is_return_argument {
        let kind = if tags.is_owned_string(ty) {
            OutputKind::OwnedString
        } else if ty.primitive.is_some() {
            OutputKind::Primitive
        } else {
            OutputKind::Value
        };
        return ParamShape::Output(kind);
    }

    if tags.is_c_string(ty) {
        ParamShape::CString
    } else if ty.primitive.is_none() || tags.is_owned_string(ty) {
        ParamShape::Struct
    } else {
        ParamShape::Primitive
    }
}

/// Classify the return of `function`.
///
/// `has_outputs` reports whether any parameter classified as an output.
pub fn classify_return<'a>(
    function: &'a Function,
    has_outputs: bool,
    tags: &TypeTags,
) -> ReturnShape<'a> {
    let ty = &function.return_type;

    if tags.is_void(ty) && !has_outputs {
        return ReturnShape::Nothing;
    }
    if tags.is_owned_string(ty) {
        return ReturnShape::OwnedString;
    }
    if tags.is_boolean(ty) {
        if let Some(foreign) = ty.primitive.as_deref() {
            return ReturnShape::Boolean { foreign };
        }
    }
    if tags.is_c_string(ty) {
        return ReturnShape::CharPointer;
    }
    if tags.is_timestamp(ty) {
        return ReturnShape::Timestamp;
    }
    if tags.is_void(ty) {
        return ReturnShape::OutputsOnly;
    }
    ReturnShape::Reshaped {
        composite: ty.primitive.is_none(),
    }
}
