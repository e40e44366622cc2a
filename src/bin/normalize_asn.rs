//! Parse ASN.1 layout definitions and print them normalized, as JSON.
//!
//! Usage:
//!   normalize_asn [OPTIONS] [FILE.asn ...]
//!   normalize_asn < file.asn
//!
//! Options:
//!   --raw, -r                 Print raw parsed definitions instead of normalized ones
//!   --predefined FILE, -p FILE
//!                             Seed the predefined-type registry from FILE (repeatable)
//!   --compact, -c             One JSON document per line instead of pretty output
//!
//! If no files are given, reads from stdin. Set `RUST_LOG=debug` to see which
//! definitions were taken from the registry. Exit code 1 if any input fails
//! to parse.

use anyhow::{bail, Context};
use asnnorm::{parse, Definition, Normalizer, Registry};
use serde::Serialize;
use std::io::{self, Read};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Clone, Copy)]
enum OutputStyle {
    Pretty,
    Compact,
}

struct Options {
    raw: bool,
    style: OutputStyle,
    predefined: Vec<PathBuf>,
    inputs: Vec<PathBuf>,
}

fn parse_args(mut args: Vec<String>) -> anyhow::Result<Options> {
    let raw = if let Some(pos) = args.iter().position(|a| a == "--raw" || a == "-r") {
        args.remove(pos);
        true
    } else {
        false
    };
    let style = if let Some(pos) = args.iter().position(|a| a == "--compact" || a == "-c") {
        args.remove(pos);
        OutputStyle::Compact
    } else {
        OutputStyle::Pretty
    };
    let mut predefined = Vec::new();
    while let Some(pos) = args
        .iter()
        .position(|a| a == "--predefined" || a == "-p")
    {
        args.remove(pos);
        if pos >= args.len() {
            bail!("--predefined needs a file argument");
        }
        predefined.push(PathBuf::from(args.remove(pos)));
    }
    Ok(Options {
        raw,
        style,
        predefined,
        inputs: args.into_iter().map(PathBuf::from).collect(),
    })
}

fn print_json<T: Serialize>(value: &T, style: OutputStyle) -> anyhow::Result<()> {
    let text = match style {
        OutputStyle::Pretty => serde_json::to_string_pretty(value)?,
        OutputStyle::Compact => serde_json::to_string(value)?,
    };
    println!("{}", text);
    Ok(())
}

fn emit(
    definitions: &[Definition],
    normalizer: &Normalizer<'_>,
    options: &Options,
) -> anyhow::Result<()> {
    if options.raw {
        for definition in definitions {
            print_json(definition, options.style)?;
        }
    } else {
        for normalized in normalizer.normalize_all(definitions) {
            print_json(&normalized, options.style)?;
        }
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let options = parse_args(std::env::args().skip(1).collect())?;
    let registry = Registry::from_files(options.predefined.as_slice())
        .context("loading predefined types")?;
    info!(records = registry.len(), "predefined types loaded");
    let normalizer = Normalizer::new(&registry);

    let mut has_error = false;
    if options.inputs.is_empty() {
        let mut src = String::new();
        io::stdin().read_to_string(&mut src)?;
        match parse(&src) {
            Ok(definitions) => emit(&definitions, &normalizer, &options)?,
            Err(e) => {
                eprintln!("<stdin>: {}", e);
                has_error = true;
            }
        }
    } else {
        for path in &options.inputs {
            let src = match std::fs::read_to_string(path) {
                Ok(s) => s,
                Err(e) => {
                    eprintln!("{}: {}", path.display(), e);
                    has_error = true;
                    continue;
                }
            };
            match parse(&src) {
                Ok(definitions) => {
                    info!(file = %path.display(), definitions = definitions.len(), "parsed");
                    emit(&definitions, &normalizer, &options)?;
                }
                Err(e) => {
                    warn!(file = %path.display(), "parse failed");
                    eprintln!("{}: {}", path.display(), e);
                    has_error = true;
                }
            }
        }
    }

    if has_error {
        std::process::exit(1);
    }
    Ok(())
}
