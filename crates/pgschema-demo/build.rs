#[path = "src/schema.rs"]
mod schema;

use std::path::PathBuf;

fn main() -> anyhow::Result<()> {
    println!("cargo:rerun-if-changed=src/schema.rs");
    println!("cargo:rerun-if-changed=build.rs");

    let registry = schema::registry()?;
    let source = pgschema_codegen::render_bundle(&registry)?;

    let out_dir = PathBuf::from(std::env::var("OUT_DIR")?);
    std::fs::write(out_dir.join(pgschema_codegen::BUNDLE_FILE), source)?;
    Ok(())
}
