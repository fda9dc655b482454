//! `cbind generate`: render a declaration into a Go source file.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use cbind_gen::{generate_bindings, BindingDeclaration, GeneratedBinding};
use tracing::info;

use crate::manifest::CbindManifest;

/// Run the `cbind generate <file.bind.toml>` workflow.
///
/// Loads the declaration, generates every active binding and writes the
/// assembled file to `--output`, to the manifest's `[output] file`, or to
/// stdout when neither is set.
pub fn run(
    cwd: &Path,
    project_dir: &Path,
    manifest: Option<&CbindManifest>,
    declaration: &str,
    output: Option<&str>,
    package: Option<&str>,
) -> Result<()> {
    let decl_path = cwd.join(declaration);
    if !decl_path.is_file() {
        bail!("binding declaration not found: {}", decl_path.display());
    }

    let decl = BindingDeclaration::load(&decl_path)
        .with_context(|| format!("loading {}", decl_path.display()))?;
    let config = manifest.map(CbindManifest::gen_config).unwrap_or_default();

    let bindings = generate_bindings(&decl, &config)
        .with_context(|| format!("generating bindings for '{}'", decl.library.name))?;

    let package = package
        .map(str::to_string)
        .or_else(|| manifest.and_then(|m| m.project.package.clone()))
        .or_else(|| decl.library.package.clone())
        .unwrap_or_else(|| package_name(&decl.library.name));
    let source = render_file(&decl, &package, &bindings);

    let output_path: Option<PathBuf> = match output {
        Some(path) => Some(cwd.join(path)),
        None => manifest
            .and_then(CbindManifest::output_file)
            .map(|file| project_dir.join(file)),
    };

    match output_path {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("creating {}", parent.display()))?;
            }
            std::fs::write(&path, &source)
                .with_context(|| format!("writing {}", path.display()))?;
            info!(path = %path.display(), bindings = bindings.len(), "wrote bindings");
            eprintln!(
                "Generated {} bindings for '{}' → {}",
                bindings.len(),
                decl.library.name,
                path.display()
            );
        }
        None => print!("{source}"),
    }

    Ok(())
}

/// Package name derived from a library name.
fn package_name(library: &str) -> String {
    library
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '_' })
        .collect()
}

/// Assemble the complete Go file.
pub fn render_file(decl: &BindingDeclaration, package: &str, bindings: &[GeneratedBinding]) -> String {
    let uses = |needle: &str| bindings.iter().any(|b| b.source.contains(needle));

    let mut out = String::new();
    out.push_str(&format!(
        "// Code generated by cbind from {}. DO NOT EDIT.\n",
        decl.library.name
    ));
    out.push('\n');
    out.push_str(&format!("package {package}\n"));
    out.push('\n');

    if let Some(header) = &decl.library.header {
        out.push_str(&format!("// #include \"{header}\"\n"));
    }
    if uses("C.free(") {
        out.push_str("// #include <stdlib.h>\n");
    }
    out.push_str("import \"C\"\n");

    let imports: Vec<&str> = [("time", uses("time.Unix(")), ("unsafe", uses("unsafe.Pointer("))]
        .into_iter()
        .filter_map(|(name, used)| used.then_some(name))
        .collect();
    match imports.as_slice() {
        [] => {}
        [single] => {
            out.push_str(&format!("\nimport \"{single}\"\n"));
        }
        several => {
            out.push_str("\nimport (\n");
            for name in several {
                out.push_str(&format!("\t\"{name}\"\n"));
            }
            out.push_str(")\n");
        }
    }

    for binding in bindings {
        out.push('\n');
        out.push_str(&binding.source);
    }
    out
}
