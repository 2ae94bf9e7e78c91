//! Writes the typed API of the demo schema to disk (default `generated/`).
//!
//! The crate itself builds from `build.rs`; this binary is for inspecting the
//! output or vendoring it into another project.

use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run() {
        eprintln!("{e:#}");
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let registry = pgschema_demo::schema::registry()?;
    pgschema_codegen::run_with_registry(&registry, std::env::args().collect())
}
