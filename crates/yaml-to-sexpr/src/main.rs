/*
 * main.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! yaml-to-sexpr - convert YAML files to S-expressions

mod diagnostic;

use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use yaml_sexpr::{Config, Converter, DEFAULT_MAX_DEPTH, DEFAULT_PREFIX};

/// File converted when no inputs are given
const DEFAULT_INPUT: &str = "input.yaml";

/// Convert YAML documents to S-expressions
#[derive(Parser, Debug)]
#[command(name = "yaml-to-sexpr")]
#[command(version, about = "Convert YAML documents to Scheme-style S-expressions", long_about = None)]
struct Args {
    /// YAML files to convert, '-' for stdin [default: input.yaml]
    #[arg(value_name = "FILE")]
    inputs: Vec<PathBuf>,

    /// Namespace prefix for mapping keys
    #[arg(long, value_name = "TOKEN", default_value = DEFAULT_PREFIX)]
    prefix: String,

    /// Maximum nesting depth before conversion fails (flow collections
    /// are capped at 255 levels by the parser)
    #[arg(long, value_name = "N", default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: usize,

    /// Write output to FILE instead of stdout
    #[arg(short = 'o', long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Report errors as JSON lines on stderr
    #[arg(long)]
    json_errors: bool,
}

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "yaml_to_sexpr=warn,yaml_sexpr=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let args = Args::parse();

    if let Err(e) = run(&args) {
        if args.json_errors {
            diagnostic::print_json_failure(&e);
        } else {
            eprintln!("Error: {:#}", e);
        }
        process::exit(1);
    }
}

fn run(args: &Args) -> Result<()> {
    let inputs = if args.inputs.is_empty() {
        vec![PathBuf::from(DEFAULT_INPUT)]
    } else {
        args.inputs.clone()
    };

    let converter = Converter::new(
        Config::default()
            .with_prefix(args.prefix.clone())
            .with_max_depth(args.max_depth),
    );

    // Convert everything first so a failure leaves no partial output behind
    let mut outputs = Vec::with_capacity(inputs.len());
    for input in &inputs {
        let name = display_name(input);
        let bytes = read_input(input)?;

        let result = yaml_sexpr::load_bytes(&bytes, Some(&name))
            .and_then(|value| converter.convert_document(&value));

        match result {
            Ok(sexpr) => {
                tracing::debug!(file = %name, bytes = sexpr.len(), "converted");
                outputs.push(sexpr);
            }
            Err(error) => {
                let source = std::str::from_utf8(&bytes).ok();
                diagnostic::report(&error, &name, source, args.json_errors);
                process::exit(1);
            }
        }
    }

    write_outputs(&outputs, args.output.as_deref())
}

fn display_name(input: &Path) -> String {
    if input == Path::new("-") {
        "<stdin>".to_string()
    } else {
        input.display().to_string()
    }
}

fn read_input(input: &Path) -> Result<Vec<u8>> {
    if input == Path::new("-") {
        let mut bytes = Vec::new();
        io::stdin()
            .read_to_end(&mut bytes)
            .context("Failed to read standard input")?;
        return Ok(bytes);
    }

    if !input.exists() {
        anyhow::bail!(
            "Input file '{}' not found\nUsage: yaml-to-sexpr [FILE]...",
            input.display()
        );
    }

    fs::read(input).with_context(|| format!("Failed to read input file: {}", input.display()))
}

fn write_outputs(outputs: &[String], output: Option<&Path>) -> Result<()> {
    let mut writer: Box<dyn Write> = match output {
        Some(path) => Box::new(io::BufWriter::new(
            fs::File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?,
        )),
        None => Box::new(io::stdout().lock()),
    };

    for sexpr in outputs {
        writeln!(writer, "{}", sexpr).context("Failed to write output")?;
    }
    writer.flush().context("Failed to write output")?;
    Ok(())
}
