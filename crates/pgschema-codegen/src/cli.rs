use crate::codegen::Layout;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Gen(GenArgs),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenArgs {
    pub schema: PathBuf,
    /// `None` falls back to the schema file's `[output]`, then `generated`.
    pub output: Option<PathBuf>,
    pub layout: Option<Layout>,
    pub dry_run: bool,
    pub check: bool,
    pub dump: bool,
}

impl Default for GenArgs {
    fn default() -> Self {
        Self {
            schema: PathBuf::from("pgschema.toml"),
            output: None,
            layout: None,
            dry_run: false,
            check: false,
            dump: false,
        }
    }
}

pub const DEFAULT_OUTPUT: &str = "generated";

pub fn parse_args(args: &[String]) -> anyhow::Result<Command> {
    let mut it = args.iter().skip(1).map(|s| s.as_str());
    let mut out = GenArgs::default();

    while let Some(token) = it.next() {
        match token {
            "-h" | "--help" => return Ok(Command::Help),
            "--output" | "-o" => {
                let Some(v) = it.next() else {
                    anyhow::bail!("--output requires a value");
                };
                out.output = Some(PathBuf::from(v));
            }
            _ if token.starts_with("--output=") => {
                out.output = Some(PathBuf::from(token.trim_start_matches("--output=")));
            }
            "--schema" => {
                let Some(v) = it.next() else {
                    anyhow::bail!("--schema requires a value");
                };
                out.schema = PathBuf::from(v);
            }
            _ if token.starts_with("--schema=") => {
                out.schema = PathBuf::from(token.trim_start_matches("--schema="));
            }
            "--layout" => {
                let Some(v) = it.next() else {
                    anyhow::bail!("--layout requires a value");
                };
                out.layout = Some(v.parse()?);
            }
            _ if token.starts_with("--layout=") => {
                out.layout = Some(token.trim_start_matches("--layout=").parse()?);
            }
            "--dry-run" => out.dry_run = true,
            "--check" => out.check = true,
            "--dump" => out.dump = true,
            other => anyhow::bail!("unknown argument: {other}"),
        }
    }

    if out.dry_run && out.check {
        anyhow::bail!("--dry-run and --check are mutually exclusive");
    }

    Ok(Command::Gen(out))
}

pub fn print_help() {
    println!(
        "\
pgschema-gen - generate typed table builders from a schema

USAGE:
  pgschema-gen [OPTIONS]

OPTIONS:
  --schema <FILE>       Schema file (default: pgschema.toml)
  -o, --output <DIR>    Output directory (default: [output].dir or {DEFAULT_OUTPUT})
  --layout <LAYOUT>     modules | bundle (default: modules)
  --dry-run             Print files that would change
  --check               Exit non-zero if output would change
  --dump                Print the parsed registry as JSON and exit
  -h, --help            Print help

ENV:
  RUST_LOG              Log filter (default: info)"
    );
}
