//! Binding declaration file (`.bind.toml`) parsing.
//!
//! A `.bind.toml` file stands in for header introspection: it names the
//! foreign library, maps foreign type spellings to normalized types and
//! lists the functions, struct-field getters and array accessors to wrap.

use serde::{Deserialize, Serialize};

use crate::error::{GenError, Result};
use crate::extract::{ArrayElement, ForeignArgument, ForeignSymbol, MemberAccess};
use crate::resolve::{TypeHandle, TypeTable};

/// A complete binding declaration parsed from a `.bind.toml` file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BindingDeclaration {
    /// Metadata about the foreign library.
    pub library: Library,
    /// Foreign type spellings and their normalized descriptors.
    #[serde(default)]
    pub types: TypeTable,
    /// Foreign functions to wrap.
    #[serde(default)]
    pub functions: Vec<FunctionDecl>,
    /// Struct fields exposed through getters.
    #[serde(default)]
    pub getters: Vec<GetterDecl>,
    /// Embedded struct arrays exposed as slices.
    #[serde(default)]
    pub array_accessors: Vec<ArrayAccessorDecl>,
}

/// Metadata about the foreign library.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Library {
    /// Library name (e.g., "clang").
    pub name: String,
    /// Header included by the cgo preamble.
    #[serde(default)]
    pub header: Option<String>,
    /// Package name for the generated file.
    #[serde(default)]
    pub package: Option<String>,
}

/// A single foreign function declaration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionDecl {
    /// Foreign symbol (e.g., "clang_getFileTime").
    pub symbol: String,
    #[serde(default)]
    pub doc: Option<String>,
    /// Return type handle.
    pub returns: TypeHandle,
    /// Type the function is bound to as a method.
    #[serde(default)]
    pub owner: Option<TypeHandle>,
    /// Arguments in declaration order.
    #[serde(default)]
    pub args: Vec<ForeignArgument>,
    /// Whether this function is excluded from generation.
    #[serde(default)]
    pub excluded: bool,
}

impl FunctionDecl {
    /// The introspection record for this declaration.
    pub fn foreign_symbol(&self) -> ForeignSymbol {
        ForeignSymbol {
            name: self.symbol.clone(),
            doc: self.doc.clone(),
            return_type: self.returns.clone(),
            arguments: self.args.clone(),
        }
    }
}

/// A struct field getter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetterDecl {
    #[serde(flatten)]
    pub access: MemberAccess,
    /// Type of the field.
    #[serde(rename = "type")]
    pub ty: TypeHandle,
    #[serde(default)]
    pub excluded: bool,
}

/// An embedded array accessor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArrayAccessorDecl {
    #[serde(flatten)]
    pub access: MemberAccess,
    #[serde(flatten)]
    pub element: ArrayElement,
    #[serde(default)]
    pub excluded: bool,
}

impl BindingDeclaration {
    /// Parse a binding declaration from a TOML string.
    pub fn parse(input: &str) -> Result<Self> {
        let decl: BindingDeclaration = toml::from_str(input).map_err(GenError::Toml)?;

        if decl.library.name.is_empty() {
            return Err(GenError::InvalidDeclaration {
                detail: "library.name is required".to_string(),
            });
        }
        if let Some(f) = decl.functions.iter().find(|f| f.symbol.is_empty()) {
            return Err(GenError::InvalidDeclaration {
                detail: format!("function with empty symbol (returns '{}')", f.returns.spelling),
            });
        }

        Ok(decl)
    }

    /// Parse a binding declaration from a file path.
    pub fn load(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Return only the non-excluded functions.
    pub fn active_functions(&self) -> Vec<&FunctionDecl> {
        self.functions.iter().filter(|f| !f.excluded).collect()
    }

    /// Return only the non-excluded getters.
    pub fn active_getters(&self) -> Vec<&GetterDecl> {
        self.getters.iter().filter(|g| !g.excluded).collect()
    }

    /// Return only the non-excluded array accessors.
    pub fn active_array_accessors(&self) -> Vec<&ArrayAccessorDecl> {
        self.array_accessors.iter().filter(|a| !a.excluded).collect()
    }

    /// Number of entries of any kind marked as excluded.
    pub fn excluded_count(&self) -> usize {
        self.functions.iter().filter(|f| f.excluded).count()
            + self.getters.iter().filter(|g| g.excluded).count()
            + self.array_accessors.iter().filter(|a| a.excluded).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cbind_core::{ArrayDimensions, ArraySize};

    #[test]
    fn parse_clang_declaration() {
        let toml = r#"
[library]
name = "clang"
header = "clang-c/Index.h"

[types.CXFile]
name = "File"
foreign_name = "CXFile"

[types.time_t]
name = "time.Time"
foreign_name = "time_t"
primitive = "time_t"
is_primitive = true

[[functions]]
symbol = "clang_getFileTime"
doc = "Retrieve the last modification time of the given file."
returns = "time_t"
owner = "CXFile"
args = [{ name = "SFile", type = "CXFile" }]
"#;
        let decl = BindingDeclaration::parse(toml).unwrap();
        assert_eq!(decl.library.name, "clang");
        assert_eq!(decl.library.header.as_deref(), Some("clang-c/Index.h"));
        assert_eq!(decl.types.len(), 2);
        assert_eq!(decl.functions.len(), 1);

        let f = &decl.functions[0];
        assert_eq!(f.owner, Some(TypeHandle::new("CXFile")));
        assert_eq!(f.args[0].name, "SFile");

        let symbol = f.foreign_symbol();
        assert_eq!(symbol.name, "clang_getFileTime");
        assert_eq!(symbol.return_type, TypeHandle::new("time_t"));
    }

    #[test]
    fn parse_minimal_declaration() {
        let decl = BindingDeclaration::parse("[library]\nname = \"mylib\"\n").unwrap();
        assert_eq!(decl.library.name, "mylib");
        assert!(decl.library.package.is_none());
        assert!(decl.types.is_empty());
        assert!(decl.functions.is_empty());
        assert!(decl.active_getters().is_empty());
    }

    #[test]
    fn detailed_argument_handles() {
        let toml = r#"
[library]
name = "clang"

[[functions]]
symbol = "clang_getSpellingLocation"
returns = "void"
args = [
    { name = "location", type = "CXSourceLocation" },
    { name = "line", type = { spelling = "unsigned *", output = true } },
]

[[functions]]
symbol = "clang_parse"
returns = "void"
args = [
    { name = "args", type = "const char *const *" },
    { name = "num_args", type = { spelling = "int", length_of = "args" } },
]
"#;
        let decl = BindingDeclaration::parse(toml).unwrap();
        assert_eq!(decl.functions[0].args[1].ty, TypeHandle::new("unsigned *").output());
        assert_eq!(decl.functions[1].args[1].ty, TypeHandle::new("int").length_of("args"));
    }

    #[test]
    fn getters_and_array_accessors() {
        let toml = r#"
[library]
name = "clang"

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
dimensions = 2
size = { member = "numTokens" }

[[array_accessors]]
name = "data"
struct = "CXToken"
member = "int_data"
element_foreign_name = "uint"
element_name = "uint32"
is_primitive = true
size = { fixed = 4 }
excluded = true
"#;
        let decl = BindingDeclaration::parse(toml).unwrap();
        let getter = &decl.getters[0];
        assert_eq!(getter.access.struct_name, "CXIdxEntityInfo");
        assert_eq!(getter.ty, TypeHandle::new("short"));

        let tokens = &decl.array_accessors[0];
        assert_eq!(tokens.element.dimensions, ArrayDimensions::Two);
        assert_eq!(tokens.element.size, ArraySize::Member("numTokens".to_string()));
        assert_eq!(decl.array_accessors[1].element.size, ArraySize::Fixed(4));
        assert_eq!(decl.active_array_accessors().len(), 1);
        assert_eq!(decl.excluded_count(), 1);
    }

    #[test]
    fn excluded_functions_filtered() {
        let toml = r#"
[library]
name = "testlib"

[[functions]]
symbol = "active_fn"
returns = "int"

[[functions]]
symbol = "excluded_fn"
returns = "int"
excluded = true
"#;
        let decl = BindingDeclaration::parse(toml).unwrap();
        assert_eq!(decl.functions.len(), 2);
        let active = decl.active_functions();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].symbol, "active_fn");
    }

    #[test]
    fn missing_library_section() {
        let toml = r#"
[[functions]]
symbol = "orphan"
returns = "void"
"#;
        assert!(matches!(BindingDeclaration::parse(toml), Err(GenError::Toml(_))));
    }

    #[test]
    fn empty_names_rejected() {
        let err = BindingDeclaration::parse("[library]\nname = \"\"\n").unwrap_err();
        assert!(matches!(err, GenError::InvalidDeclaration { .. }));

        let toml = r#"
[library]
name = "lib"

[[functions]]
symbol = ""
returns = "void"
"#;
        assert!(BindingDeclaration::parse(toml).is_err());
    }
}
