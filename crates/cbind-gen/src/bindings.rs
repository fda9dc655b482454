//! Whole-declaration generation.
//!
//! Walks a [`BindingDeclaration`] in order (functions, then getters, then
//! array accessors), normalizes every active entry and renders it. The
//! first error aborts the run so an incomplete binding surface is never
//! produced.

use cbind_core::{Function, FunctionSliceReturn, TypeTags};
use serde::Serialize;
use tracing::{debug, info};

use crate::config::GenConfig;
use crate::declaration::BindingDeclaration;
use crate::error::{GenError, Result};
use crate::extract::Extractor;
use crate::resolve::TypeResolver;
use crate::synth::Synthesizer;
use crate::template;

/// A normalized entry of a declaration, ready for rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Binding {
    /// Wrapper around a foreign call.
    Function(Function),
    /// Struct field getter.
    Getter(Function),
    /// Embedded array accessor.
    ArrayAccessor(FunctionSliceReturn),
}

impl Binding {
    /// Foreign symbol or `Struct.member` the binding reads.
    pub fn symbol(&self) -> String {
        match self {
            Binding::Function(f) => f.foreign_call_name.clone(),
            Binding::Getter(f) => member_symbol(f),
            Binding::ArrayAccessor(a) => member_symbol(&a.function),
        }
    }

    /// The normalized function behind this binding.
    pub fn function(&self) -> &Function {
        match self {
            Binding::Function(f) | Binding::Getter(f) => f,
            Binding::ArrayAccessor(a) => &a.function,
        }
    }

    /// Render the binding's source block.
    pub fn render(&self, synth: &Synthesizer, tags: &TypeTags) -> Result<String> {
        match self {
            Binding::Function(f) => Ok(synth.generate(f)),
            Binding::Getter(f) => template::struct_member_getter(f, tags),
            Binding::ArrayAccessor(a) => template::slice_accessor(a),
        }
    }
}

fn member_symbol(function: &Function) -> String {
    match &function.member {
        Some(member) => format!("{}.{member}", function.foreign_call_name),
        None => function.foreign_call_name.clone(),
    }
}

/// One rendered source block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedBinding {
    pub symbol: String,
    pub source: String,
}

/// Normalize every active entry of `decl`.
pub fn normalize(decl: &BindingDeclaration, config: &GenConfig) -> Result<Vec<Binding>> {
    let normalizer = config.normalizer();
    let extractor = Extractor::new(&normalizer, &config.tags, &decl.types);
    let mut bindings = Vec::new();

    for func in decl.functions.iter().filter(|f| f.excluded) {
        debug!(symbol = %func.symbol, "skipping excluded function");
    }
    for getter in decl.getters.iter().filter(|g| g.excluded) {
        debug!(
            symbol = %format!("{}.{}", getter.access.struct_name, getter.access.member),
            "skipping excluded getter"
        );
    }
    for accessor in decl.array_accessors.iter().filter(|a| a.excluded) {
        debug!(
            symbol = %format!("{}.{}", accessor.access.struct_name, accessor.access.member),
            "skipping excluded array accessor"
        );
    }

    for func in decl.active_functions() {
        let function = extractor.extract(&func.foreign_symbol())?;
        let function = match &func.owner {
            Some(owner) => {
                let owner = decl.types.resolve(owner).map_err(|e| GenError::UnresolvedType {
                    symbol: func.symbol.clone(),
                    position: "owner".to_string(),
                    source: Box::new(e),
                })?;
                extractor.bind_method(function, &owner)?
            }
            None => extractor.export_free(function),
        };
        bindings.push(Binding::Function(function));
    }

    for getter in decl.active_getters() {
        let ty = decl.types.resolve(&getter.ty).map_err(|e| GenError::UnresolvedType {
            symbol: format!("{}.{}", getter.access.struct_name, getter.access.member),
            position: "member type".to_string(),
            source: Box::new(e),
        })?;
        bindings.push(Binding::Getter(extractor.struct_accessor(&getter.access, ty)?));
    }

    for accessor in decl.active_array_accessors() {
        bindings.push(Binding::ArrayAccessor(
            extractor.array_accessor(&accessor.access, &accessor.element)?,
        ));
    }

    Ok(bindings)
}

/// Generate the source block for every active entry of `decl`.
pub fn generate_bindings(
    decl: &BindingDeclaration,
    config: &GenConfig,
) -> Result<Vec<GeneratedBinding>> {
    let synth = config.synthesizer();
    let bindings = normalize(decl, config)?;

    let mut generated = Vec::with_capacity(bindings.len());
    for binding in &bindings {
        let symbol = binding.symbol();
        debug!(symbol = %symbol, name = %binding.function().name, "rendering binding");
        generated.push(GeneratedBinding {
            source: binding.render(&synth, &config.tags)?,
            symbol,
        });
    }

    info!(
        library = %decl.library.name,
        generated = generated.len(),
        excluded = decl.excluded_count(),
        "generated bindings"
    );
    Ok(generated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const CLANG: &str = r#"
[library]
name = "clang"
header = "clang-c/Index.h"

[types.void]
name = "void"
foreign_name = "void"

[types.unsigned]
name = "uint32"
foreign_name = "uint"
primitive = "uint"
is_primitive = true

[types."unsigned *"]
name = "uint32"
foreign_name = "uint"
primitive = "uint"
pointer_depth = 1
is_primitive = true

[types.short]
name = "int16"
foreign_name = "short"
primitive = "short"
is_primitive = true

[types.time_t]
name = "time.Time"
foreign_name = "time_t"
primitive = "time_t"
is_primitive = true

[types.CXFile]
name = "File"
foreign_name = "CXFile"

[types."CXFile *"]
name = "File"
foreign_name = "CXFile"
pointer_depth = 1

[types.CXIndex]
name = "Index"
foreign_name = "CXIndex"

[types.CXSourceLocation]
name = "SourceLocation"
foreign_name = "CXSourceLocation"

[[functions]]
symbol = "clang_createIndex"
returns = "CXIndex"

[[functions]]
symbol = "clang_getFileTime"
doc = "Retrieve the last modification time of the given file."
returns = "time_t"
owner = "CXFile"
args = [{ name = "SFile", type = "CXFile" }]

[[functions]]
symbol = "clang_getSpellingLocation"
returns = "void"
owner = "CXSourceLocation"
args = [
    { name = "location", type = "CXSourceLocation" },
    { name = "file", type = { spelling = "CXFile *", output = true } },
    { name = "line", type = { spelling = "unsigned *", output = true } },
]

[[functions]]
symbol = "clang_disposeEverything"
returns = "void"
excluded = true

[[getters]]
name = "isDefinition"
struct = "CXIdxEntityInfo"
member = "isDefinition"
type = "short"

[[array_accessors]]
name = "tokens"
struct = "CXTokenSet"
member = "tokens"
element_foreign_name = "CXToken"
element_name = "Token"
size = { member = "numTokens" }
"#;

    #[test]
    fn generate_whole_declaration() {
        let decl = BindingDeclaration::parse(CLANG).unwrap();
        let generated = generate_bindings(&decl, &GenConfig::default()).unwrap();

        let symbols: Vec<&str> = generated.iter().map(|g| g.symbol.as_str()).collect();
        assert_eq!(
            symbols,
            vec![
                "clang_createIndex",
                "clang_getFileTime",
                "clang_getSpellingLocation",
                "CXIdxEntityInfo.isDefinition",
                "CXTokenSet.tokens",
            ]
        );

        assert_eq!(
            generated[0].source,
            "func CreateIndex() Index {\n\treturn Index{C.clang_createIndex()}\n}\n"
        );
        assert_eq!(
            generated[1].source,
            "\
// Retrieve the last modification time of the given file.
func (f File) Time() time.Time {
\treturn time.Unix(int64(C.clang_getFileTime(f.c)), 0)
}
"
        );
        assert_eq!(
            generated[2].source,
            "\
func (sl SourceLocation) SpellingLocation() (File, uint32) {
\tvar file File
\tvar line C.uint

\tC.clang_getSpellingLocation(sl.c, &file.c, &line)

\treturn file, uint32(line)
}
"
        );
        assert!(generated[3]
            .source
            .starts_with("func (iei IdxEntityInfo) IsDefinition() bool {\n"));
        assert!(generated[3].source.contains("return value != C.short(0)"));
        assert!(generated[4].source.contains("length := int(ts.c.numTokens)"));
    }

    #[test]
    fn normalize_reports_kinds() {
        let decl = BindingDeclaration::parse(CLANG).unwrap();
        let bindings = normalize(&decl, &GenConfig::default()).unwrap();
        assert_eq!(bindings.len(), 5);
        assert!(matches!(bindings[0], Binding::Function(_)));
        assert!(matches!(bindings[3], Binding::Getter(_)));
        assert!(matches!(bindings[4], Binding::ArrayAccessor(_)));
        assert_eq!(bindings[1].function().name, "Time");
    }

    #[test]
    fn reserved_slice_name_used_for_length() {
        let toml = r#"
[library]
name = "clang"

[types.void]
name = "void"
foreign_name = "void"

[types.int]
name = "int32"
foreign_name = "int"
primitive = "int"
is_primitive = true

[types."CXType *"]
name = "Type"
foreign_name = "CXType"
pointer_depth = 1
is_slice = true

[[functions]]
symbol = "clang_setTypes"
returns = "void"
args = [
    { name = "type", type = "CXType *" },
    { name = "n", type = { spelling = "int", length_of = "type" } },
]
"#;
        let decl = BindingDeclaration::parse(toml).unwrap();
        let generated = generate_bindings(&decl, &GenConfig::default()).unwrap();
        let source = &generated[0].source;
        assert!(source.starts_with("func SetTypes(typ []Type) {\n"));
        assert!(source.contains("C.clang_setTypes(cp_typ, C.int(len(typ)))"));
        assert!(!source.contains("len(type)"));
    }

    #[test]
    fn unknown_type_aborts_generation() {
        let toml = r#"
[library]
name = "clang"

[[functions]]
symbol = "clang_getModule"
returns = "CXModule"
"#;
        let decl = BindingDeclaration::parse(toml).unwrap();
        let err = generate_bindings(&decl, &GenConfig::default()).unwrap_err();
        assert!(err.to_string().contains("clang_getModule"));
        assert!(err.to_string().contains("CXModule"));
    }

    #[test]
    fn unknown_owner_aborts_generation() {
        let toml = r#"
[library]
name = "clang"

[types.void]
name = "void"
foreign_name = "void"

[[functions]]
symbol = "clang_disposeModule"
returns = "void"
owner = "CXModule"
"#;
        let decl = BindingDeclaration::parse(toml).unwrap();
        let err = generate_bindings(&decl, &GenConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            GenError::UnresolvedType { ref position, .. } if position == "owner"
        ));
    }
}
