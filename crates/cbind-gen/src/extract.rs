//! Signature extraction.
//!
//! Builds normalized [`Function`] records from foreign symbols (as supplied
//! by header introspection) and from explicit struct-member descriptions.
//! Type resolution failures abort extraction with the symbol and position
//! attached; nothing is defaulted.

use cbind_core::{
    upper_first, ArrayDimensions, ArraySize, Function, FunctionParameter, FunctionSliceReturn,
    NormalizedType, Normalizer, Receiver, TypeTags,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{GenError, Result};
use crate::resolve::{TypeHandle, TypeResolver};

/// A foreign function symbol as reported by introspection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignSymbol {
    /// Raw symbol name (e.g. `clang_getFileTime`).
    pub name: String,
    /// Raw documentation text.
    #[serde(default)]
    pub doc: Option<String>,
    /// Return type handle.
    pub return_type: TypeHandle,
    /// Arguments in declaration order.
    #[serde(default)]
    pub arguments: Vec<ForeignArgument>,
}

/// One argument of a [`ForeignSymbol`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignArgument {
    /// Display name from the declaration; empty for unnamed arguments.
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeHandle,
}

impl ForeignArgument {
    pub fn new(name: impl Into<String>, ty: TypeHandle) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

/// A struct member exposed through a generated accessor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberAccess {
    /// Accessor name before export casing (e.g. `isDefinition`).
    pub name: String,
    /// Foreign struct spelling (e.g. `CXSourceRange`).
    #[serde(rename = "struct")]
    pub struct_name: String,
    /// Struct member tag read by the accessor.
    pub member: String,
    #[serde(default)]
    pub doc: Option<String>,
}

/// Element description of an embedded foreign array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArrayElement {
    /// Foreign element spelling.
    pub element_foreign_name: String,
    /// Target-language element type.
    pub element_name: String,
    #[serde(default)]
    pub is_primitive: bool,
    #[serde(default)]
    pub dimensions: ArrayDimensions,
    pub size: ArraySize,
}

/// Builds [`Function`] records from introspection data.
pub struct Extractor<'a, R: TypeResolver + ?Sized> {
    normalizer: &'a Normalizer,
    tags: &'a TypeTags,
    resolver: &'a R,
}

impl<'a, R: TypeResolver + ?Sized> Extractor<'a, R> {
    pub fn new(normalizer: &'a Normalizer, tags: &'a TypeTags, resolver: &'a R) -> Self {
        Self {
            normalizer,
            tags,
            resolver,
        }
    }

    /// Build the normalized function for a foreign symbol.
    ///
    /// The public name is the call name with the symbol prefix stripped once.
    /// Unnamed arguments are named after their type's receiver abbreviation
    /// and reserved words are substituted.
    pub fn extract(&self, symbol: &ForeignSymbol) -> Result<Function> {
        let name = self.normalizer.trim_symbol_prefix(&symbol.name);
        let return_type = self
            .resolver
            .resolve(&symbol.return_type)
            .map_err(|e| unresolved(&symbol.name, "return type".to_string(), e))?;

        let mut function = Function::new(name, &symbol.name, return_type);
        function.doc = symbol.doc.clone().filter(|doc| !doc.trim().is_empty());

        for (index, arg) in symbol.arguments.iter().enumerate() {
            let ty = self
                .resolver
                .resolve(&arg.ty)
                .map_err(|e| unresolved(&symbol.name, format!("parameter {index}"), e))?;

            let mut param_name = if arg.name.is_empty() {
                self.normalizer
                    .receiver_name_for(&ty.name)
                    .map_err(|source| GenError::Naming {
                        symbol: symbol.name.clone(),
                        source,
                    })?
            } else {
                arg.name.clone()
            };
            if let Some(sub) = self
                .normalizer
                .substitute_reserved_word(&param_name)
                .filter(|sub| !sub.is_empty())
            {
                param_name = sub.to_string();
            }

            function.parameters.push(FunctionParameter {
                name: param_name,
                foreign_name: arg.name.clone(),
                ty,
            });
        }

        // Length references name the slice by its declared name.
        let names: Vec<(String, String)> = function
            .parameters
            .iter()
            .map(|p| (p.foreign_name.clone(), p.name.clone()))
            .collect();
        for param in &mut function.parameters {
            if let Some(slice) = param.ty.length_of_slice.as_mut() {
                if let Some((_, renamed)) = names.iter().find(|(foreign, _)| foreign == slice) {
                    *slice = renamed.clone();
                }
            }
        }

        debug!(
            symbol = %symbol.name,
            params = function.parameters.len(),
            "extracted function"
        );
        Ok(function)
    }

    /// Designate `owner` as the receiver and trim its name off the function name.
    pub fn bind_method(&self, function: Function, owner: &NormalizedType) -> Result<Function> {
        let receiver = self
            .normalizer
            .receiver_name_for(&owner.name)
            .map_err(|source| GenError::Naming {
                symbol: function.foreign_call_name.clone(),
                source,
            })?;
        let name = upper_first(&self.normalizer.trim_against_owner(&function.name, &owner.name));

        let mut parameters = function.parameters;
        if let Some(first) = parameters.first().map(|p| p.name.clone()) {
            rename_slice_length(&mut parameters, &first, &receiver);
        }

        Ok(Function {
            name,
            parameters,
            receiver: Some(Receiver {
                name: receiver,
                ty: owner.clone(),
            }),
            ..function
        })
    }

    /// Export a function that has no owner type.
    pub fn export_free(&self, function: Function) -> Function {
        Function {
            name: upper_first(&function.name),
            ..function
        }
    }

    /// Build the accessor for a struct field of type `ty`.
    pub fn struct_accessor(&self, access: &MemberAccess, ty: NormalizedType) -> Result<Function> {
        let receiver_type = self.normalizer.trim_language_prefix(&access.struct_name);
        let receiver_name =
            self.normalizer
                .receiver_name_for(&receiver_type)
                .map_err(|source| GenError::Naming {
                    symbol: access.struct_name.clone(),
                    source,
                })?;

        let mut ty = ty;
        if ty.is_primitive && ty.primitive.is_none() {
            ty.primitive = Some(ty.name.clone());
        }
        if self.tags.is_predicate_name(&access.name) && ty.name == self.tags.predicate_int {
            ty.name = self.tags.boolean.clone();
        }

        let mut function = Function::new(upper_first(&access.name), &access.struct_name, ty)
            .with_receiver(
                receiver_name,
                NormalizedType::named(receiver_type, &access.struct_name),
            )
            .with_member(&access.member);
        function.doc = access.doc.clone();
        Ok(function)
    }

    /// Build the accessor for an embedded foreign array.
    pub fn array_accessor(
        &self,
        access: &MemberAccess,
        element: &ArrayElement,
    ) -> Result<FunctionSliceReturn> {
        let element_type =
            NormalizedType::named(&element.element_name, &element.element_foreign_name).slice();
        let function = self.struct_accessor(access, element_type)?;

        Ok(FunctionSliceReturn {
            function,
            element_foreign_name: element.element_foreign_name.clone(),
            element_name: element.element_name.clone(),
            is_primitive: element.is_primitive,
            dimensions: element.dimensions,
            size: element.size.clone(),
        })
    }
}

/// Point length parameters that fill from slice `from` at `to` instead.
fn rename_slice_length(parameters: &mut [FunctionParameter], from: &str, to: &str) {
    for param in parameters {
        if param.ty.length_of_slice.as_deref() == Some(from) {
            param.ty.length_of_slice = Some(to.to_string());
        }
    }
}

fn unresolved(symbol: &str, position: String, source: GenError) -> GenError {
    GenError::UnresolvedType {
        symbol: symbol.to_string(),
        position,
        source: Box::new(source),
    }
}
