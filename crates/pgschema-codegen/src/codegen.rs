use crate::naming::TableNames;
use crate::table_codegen::generate_table_unit;
use pgschema::SchemaRegistry;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub const HEADER: &str = "// @generated by pgschema-codegen. Do not edit.\n";

/// File name of the single-file layout.
pub const BUNDLE_FILE: &str = "schema.rs";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    pub path: PathBuf,
    pub content: String,
}

/// How generated units are laid out on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Layout {
    /// `mod.rs`, `types.rs` and one file per table.
    #[default]
    Modules,
    /// One file of inline modules, suitable for `include!`.
    Bundle,
}

impl FromStr for Layout {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "modules" => Ok(Layout::Modules),
            "bundle" => Ok(Layout::Bundle),
            other => anyhow::bail!("unknown layout: {other} (expected `modules` or `bundle`)"),
        }
    }
}

struct Unit {
    names: TableNames,
    body: String,
}

/// Generate the typed API for every table of `registry` into `out_dir`.
pub fn generate(
    registry: &SchemaRegistry,
    out_dir: &Path,
    layout: Layout,
) -> anyhow::Result<Vec<GeneratedFile>> {
    tracing::info!(
        tables = registry.len(),
        ?layout,
        out = %out_dir.display(),
        "generating typed API"
    );

    let units = table_units(registry)?;

    let files = match layout {
        Layout::Modules => {
            let mut files = vec![
                GeneratedFile {
                    path: out_dir.join("mod.rs"),
                    content: format!("{HEADER}\n{}", index_unit(&units)),
                },
                GeneratedFile {
                    path: out_dir.join("types.rs"),
                    content: format!("{HEADER}\n{}", types_unit()),
                },
            ];
            for unit in &units {
                files.push(GeneratedFile {
                    path: out_dir.join(format!("{}.rs", unit.names.file_stem)),
                    content: format!("{HEADER}\n{}", unit.body),
                });
            }
            files
        }
        Layout::Bundle => vec![GeneratedFile {
            path: out_dir.join(BUNDLE_FILE),
            content: bundle(&units),
        }],
    };

    Ok(files)
}

/// Render every unit as inline modules of a single source file.
///
/// The output has no inner attributes, so it can be pulled in with `include!`.
pub fn render_bundle(registry: &SchemaRegistry) -> anyhow::Result<String> {
    Ok(bundle(&table_units(registry)?))
}

fn table_units(registry: &SchemaRegistry) -> anyhow::Result<Vec<Unit>> {
    let mut seen_modules: HashSet<String> = HashSet::new();
    let mut seen_types: HashSet<String> = HashSet::new();
    let mut units = Vec::with_capacity(registry.len());

    for table in registry.tables() {
        table.validate()?;

        let names = TableNames::new(table.name());
        if names.file_stem == "types" || names.file_stem == "mod" {
            anyhow::bail!("table name {} clashes with a generated module", table.name());
        }
        if names.row == names.handle {
            anyhow::bail!(
                "table {}: row type and table handle would both be named {}",
                table.name(),
                names.row
            );
        }
        if !seen_modules.insert(names.module.clone()) {
            anyhow::bail!("duplicate module name after sanitization: {}", names.module);
        }
        for ty in [&names.row, &names.handle] {
            if !seen_types.insert(ty.clone()) {
                anyhow::bail!(
                    "duplicate generated name after sanitization: {ty} (table: {})",
                    table.name()
                );
            }
        }

        tracing::debug!(table = table.name(), row = %names.row, "rendering table unit");
        let body = generate_table_unit(table)?;
        units.push(Unit { names, body });
    }

    Ok(units)
}

fn types_unit() -> String {
    let mut out = String::new();
    out.push_str("/// Traits implemented by every generated builder.\n");
    out.push_str("pub use pgschema::typed::{DeleteBuilder, InsertBuilder, UpdateBuilder};\n");
    out
}

fn reexports(units: &[Unit]) -> String {
    let mut out = String::new();
    for unit in units {
        out.push_str(&format!(
            "pub use {}::{{{}, {}}};\n",
            unit.names.module, unit.names.row, unit.names.handle
        ));
    }
    out
}

fn index_unit(units: &[Unit]) -> String {
    let mut out = String::new();
    out.push_str("pub mod types;\n");
    for unit in units {
        out.push_str(&format!("pub mod {};\n", unit.names.module));
    }
    if !units.is_empty() {
        out.push('\n');
        out.push_str(&reexports(units));
    }
    out
}

fn bundle(units: &[Unit]) -> String {
    let mut out = String::new();
    out.push_str(HEADER);

    out.push_str("\npub mod types {\n");
    out.push_str(&indent(&types_unit()));
    out.push_str("}\n");

    for unit in units {
        out.push_str(&format!("\npub mod {} {{\n", unit.names.module));
        out.push_str(&indent(&unit.body));
        out.push_str("}\n");
    }

    if !units.is_empty() {
        out.push('\n');
        out.push_str(&reexports(units));
    }
    out
}

fn indent(body: &str) -> String {
    let mut out = String::with_capacity(body.len() + body.len() / 8);
    for line in body.lines() {
        if !line.is_empty() {
            out.push_str("    ");
            out.push_str(line);
        }
        out.push('\n');
    }
    out
}
