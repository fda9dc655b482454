//! Fixed-shape accessors for struct fields and embedded arrays.
//!
//! These never call into the foreign library, so they bypass the
//! synthesizer and are written out directly.

use cbind_core::{ArrayDimensions, ArraySize, Function, FunctionSliceReturn, Receiver, TypeTags};

use crate::error::{GenError, Result};
use crate::syntax::doc_comment;

/// Render the getter reading `function.member` off the receiver's foreign value.
pub fn struct_member_getter(function: &Function, tags: &TypeTags) -> Result<String> {
    let (receiver, member) = accessor_parts(function)?;
    let ty = &function.return_type;
    let field = format!("{}.c.{member}", receiver.name);
    let deref = if ty.pointer_depth >= 1 { "*" } else { "" };

    let (value, result) = if tags.is_boolean(ty) {
        let zero = if ty.foreign_name.is_empty() {
            "int"
        } else {
            ty.foreign_name.as_str()
        };
        (field, format!("value != C.{zero}(0)"))
    } else {
        let value = if ty.primitive.is_some() {
            format!("{}({deref}{field})", ty.name)
        } else {
            format!("{}{{{deref}{field}}}", ty.name)
        };
        let addr = if ty.pointer_depth >= 1 { "&" } else { "" };
        (value, format!("{addr}value"))
    };

    let mut out = header(function, receiver);
    out.push_str(&format!("{}() {deref}{} {{\n", function.name, ty.name));
    out.push_str(&format!("\tvalue := {value}\n"));
    out.push_str(&format!("\treturn {result}\n"));
    out.push_str("}\n");
    Ok(out)
}

/// Render the accessor copying an embedded foreign array into a slice.
///
/// Two-dimensional arrays hold pointers; their elements are referenced
/// rather than copied.
pub fn slice_accessor(accessor: &FunctionSliceReturn) -> Result<String> {
    let function = &accessor.function;
    let (receiver, member) = accessor_parts(function)?;
    let by_ref = accessor.dimensions == ArrayDimensions::Two;

    let elem_ptr = if by_ref { "*" } else { "" };
    let slice_ty = format!("[]{elem_ptr}{}", accessor.element_name);
    let length = match &accessor.size {
        ArraySize::Fixed(n) => n.to_string(),
        ArraySize::Member(size) => format!("int({}.c.{size})", receiver.name),
    };
    let view_ptr = if by_ref || accessor.element_name == "unsafe.Pointer" {
        "*"
    } else {
        ""
    };
    let item = format!("{elem_ptr}goslice[is]");
    let element = if accessor.is_primitive {
        format!("{}({item})", accessor.element_name)
    } else {
        format!("{}{{{item}}}", accessor.element_name)
    };
    let addr = if by_ref { "&" } else { "" };

    let mut out = header(function, receiver);
    out.push_str(&format!("{}() {slice_ty} {{\n", function.name));
    out.push_str(&format!("\tsc := {slice_ty}{{}}\n"));
    out.push('\n');
    out.push_str(&format!("\tlength := {length}\n"));
    out.push_str(&format!(
        "\tgoslice := (*[1 << 30]{view_ptr}C.{})(unsafe.Pointer(&{}.c.{member}))[:length:length]\n",
        accessor.element_foreign_name, receiver.name
    ));
    out.push('\n');
    out.push_str("\tfor is := 0; is < length; is++ {\n");
    out.push_str(&format!("\t\tsc = append(sc, {addr}{element})\n"));
    out.push_str("\t}\n\n");
    out.push_str("\treturn sc\n}\n");
    Ok(out)
}

fn accessor_parts(function: &Function) -> Result<(&Receiver, &str)> {
    let receiver = function
        .receiver
        .as_ref()
        .ok_or_else(|| GenError::MissingReceiver {
            function: function.name.clone(),
        })?;
    let member = function
        .member
        .as_deref()
        .ok_or_else(|| GenError::MissingMember {
            function: function.name.clone(),
        })?;
    Ok((receiver, member))
}

/// Doc comment and `func (r T) ` prefix.
fn header(function: &Function, receiver: &Receiver) -> String {
    let mut out = function.doc.as_deref().map(doc_comment).unwrap_or_default();
    out.push_str(&format!("func ({} {}) ", receiver.name, receiver.ty.name));
    out
}
