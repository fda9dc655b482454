//! `cbind inspect`: show the normalized records of a declaration.

use std::path::Path;

use anyhow::{bail, Context, Result};
use cbind_core::NormalizedType;
use cbind_gen::{normalize, Binding, BindingDeclaration, GenConfig};

use crate::manifest::CbindManifest;

/// Inspect a binding declaration.
pub fn run(
    cwd: &Path,
    manifest: Option<&CbindManifest>,
    declaration: &str,
    format: Option<&str>,
) -> Result<()> {
    let decl_path = cwd.join(declaration);
    let decl = BindingDeclaration::load(&decl_path)
        .with_context(|| format!("loading {}", decl_path.display()))?;
    let config = manifest.map(CbindManifest::gen_config).unwrap_or_default();

    print!("{}", render(&decl, &config, format)?);
    Ok(())
}

/// Render the normalized records in the requested format.
pub fn render(decl: &BindingDeclaration, config: &GenConfig, format: Option<&str>) -> Result<String> {
    let bindings = normalize(decl, config)
        .with_context(|| format!("normalizing '{}'", decl.library.name))?;

    match format.unwrap_or("text") {
        "text" => Ok(text(decl, &bindings)),
        "json" => {
            let mut json = serde_json::to_string_pretty(&bindings)
                .context("serializing normalized records")?;
            json.push('\n');
            Ok(json)
        }
        other => bail!("unknown format '{other}' (expected text or json)"),
    }
}

fn text(decl: &BindingDeclaration, bindings: &[Binding]) -> String {
    let mut out = String::new();
    out.push_str(&format!("--- {} ({} bindings) ---\n", decl.library.name, bindings.len()));

    for binding in bindings {
        let kind = match binding {
            Binding::Function(_) => "function",
            Binding::Getter(_) => "getter",
            Binding::ArrayAccessor(_) => "array",
        };
        let f = binding.function();

        let receiver = match f.receiver.as_ref().filter(|_| f.binds_receiver() || f.member.is_some()) {
            Some(r) => format!("({} {}) ", r.name, r.ty.name),
            None => String::new(),
        };
        let params: Vec<String> = f
            .parameters
            .iter()
            .enumerate()
            .filter(|(i, _)| !f.is_receiver_position(*i))
            .map(|(_, p)| format!("{} {}", p.name, describe(&p.ty)))
            .collect();

        out.push_str(&format!(
            "  {kind:<9} {:<36} {receiver}{}({}) {}\n",
            binding.symbol(),
            f.name,
            params.join(", "),
            describe(&f.return_type)
        ));
    }
    out
}

/// Short shape description of a type.
fn describe(ty: &NormalizedType) -> String {
    let mut s = String::new();
    if ty.is_slice {
        s.push_str("[]");
    }
    s.push_str(&ty.name);
    if ty.is_return_argument {
        s.push_str(" (out)");
    }
    if let Some(slice) = &ty.length_of_slice {
        s.push_str(&format!(" (len {slice})"));
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    const DECL: &str = r#"
[library]
name = "clang"

[types.void]
name = "void"
foreign_name = "void"

[types.CXFile]
name = "File"
foreign_name = "CXFile"

[types."unsigned *"]
name = "uint32"
foreign_name = "uint"
primitive = "uint"
pointer_depth = 1
is_primitive = true

[[functions]]
symbol = "clang_getFileLine"
returns = "void"
owner = "CXFile"
args = [
    { name = "file", type = "CXFile" },
    { name = "line", type = { spelling = "unsigned *", output = true } },
]
"#;

    #[test]
    fn text_lists_signatures() {
        let decl = BindingDeclaration::parse(DECL).unwrap();
        let out = render(&decl, &GenConfig::default(), None).unwrap();
        assert!(out.starts_with("--- clang (1 bindings) ---\n"));
        assert!(out.contains("clang_getFileLine"));
        assert!(out.contains("(f File) Line(line uint32 (out)) void"));
    }

    #[test]
    fn json_is_tagged_by_kind() {
        let decl = BindingDeclaration::parse(DECL).unwrap();
        let out = render(&decl, &GenConfig::default(), Some("json")).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value[0]["kind"], "function");
        assert_eq!(value[0]["name"], "Line");
        assert_eq!(value[0]["receiver"]["name"], "f");
        assert_eq!(value[0]["parameters"][1]["type"]["is_return_argument"], true);
    }

    #[test]
    fn unknown_format_rejected() {
        let decl = BindingDeclaration::parse(DECL).unwrap();
        let err = render(&decl, &GenConfig::default(), Some("yaml")).unwrap_err();
        assert!(err.to_string().contains("unknown format"));
    }
}
