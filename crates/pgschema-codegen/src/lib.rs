//! Code generator for `pgschema`.
//!
//! Turns a [`SchemaRegistry`] into Rust source: one unit per table with a row
//! struct, a table handle, and type-state insert/update builders plus delete and
//! select builders. Output is either a module tree ([`Layout::Modules`]) or one
//! file of inline modules ([`Layout::Bundle`]) for use from a build script:
//!
//! ```rust,ignore
//! // build.rs
//! let source = pgschema_codegen::render_bundle(&registry)?;
//! std::fs::write(out_dir.join("schema.rs"), source)?;
//! ```

mod cli;
mod codegen;
mod config;
mod naming;
mod table_codegen;
mod type_mapper;
mod write;

use pgschema::SchemaRegistry;
use std::path::PathBuf;

pub use codegen::{BUNDLE_FILE, GeneratedFile, HEADER, Layout, generate, render_bundle};
pub use config::{SchemaConfig, SchemaFile};
pub use write::{ChangeKind, FileChange, WriteOptions, WriteSummary, apply_generated_files, plan};

/// Entry point of `pgschema-gen`: load the schema file named by the
/// arguments and generate into the output directory.
pub fn run(args: Vec<String>) -> anyhow::Result<()> {
    let gen_args = match cli::parse_args(&args)? {
        cli::Command::Help => {
            cli::print_help();
            return Ok(());
        }
        cli::Command::Gen(gen_args) => gen_args,
    };

    let config = SchemaConfig::load(&gen_args.schema)?;
    let output = gen_args
        .output
        .clone()
        .or_else(|| config.output_dir())
        .unwrap_or_else(|| PathBuf::from(cli::DEFAULT_OUTPUT));
    let layout = gen_args.layout.or(config.layout()).unwrap_or_default();
    let registry = config.file.into_registry()?;

    emit(&registry, &gen_args, output, layout)
}

/// Like [`run`], but for a registry built in code; `--schema` is ignored.
pub fn run_with_registry(registry: &SchemaRegistry, args: Vec<String>) -> anyhow::Result<()> {
    let gen_args = match cli::parse_args(&args)? {
        cli::Command::Help => {
            cli::print_help();
            return Ok(());
        }
        cli::Command::Gen(gen_args) => gen_args,
    };

    let output = gen_args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(cli::DEFAULT_OUTPUT));
    let layout = gen_args.layout.unwrap_or_default();

    emit(registry, &gen_args, output, layout)
}

fn emit(
    registry: &SchemaRegistry,
    args: &cli::GenArgs,
    output: PathBuf,
    layout: Layout,
) -> anyhow::Result<()> {
    if args.dump {
        println!("{}", serde_json::to_string_pretty(registry)?);
        return Ok(());
    }

    let files = generate(registry, &output, layout)?;
    let summary = apply_generated_files(
        &files,
        &output,
        WriteOptions {
            dry_run: args.dry_run,
            check: args.check,
        },
    )?;

    tracing::info!(
        files = files.len(),
        planned = summary.planned.len(),
        applied = summary.applied,
        "generation finished"
    );
    Ok(())
}
