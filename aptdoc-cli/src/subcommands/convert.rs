use std::{io::Read, path::PathBuf};

use aptdoc_converters_core::{Backend, Converter, GeneratorMetadata, Input, Options};
use clap::Args as ClapArgs;
use miette::IntoDiagnostic;
use rayon::prelude::*;

use crate::error;

/// Name of standard input in error locations.
const STDIN_NAME: &str = "<stdin>";

/// Convert APT documents to canonical APT or an event dump
#[derive(ClapArgs, Debug)]
#[allow(clippy::struct_excessive_bools)] // CLI flags are naturally booleans
pub struct Args {
    /// List of files to convert
    #[arg(conflicts_with = "stdin")]
    pub files: Vec<PathBuf>,

    /// Backend output format: apt or events
    #[arg(long, default_value = "apt")]
    pub backend: Backend,

    /// Input from stdin
    #[arg(long, conflicts_with = "files")]
    pub stdin: bool,

    /// Write every converted document to stdout instead of next to its source
    #[arg(long)]
    pub stdout: bool,

    /// Show timing information
    #[arg(long)]
    pub timings: bool,

    /// Strict mode
    ///
    /// When enabled, malformed `\x` and `\u` escapes fail the conversion
    /// instead of being replaced with `?`.
    #[arg(long)]
    pub strict: bool,

    /// Keep `~~` comments in the output
    #[arg(long)]
    pub emit_comments: bool,

    /// Fail documents whose sections and lists nest deeper than this
    #[arg(long, value_name = "LEVELS")]
    pub max_depth: Option<usize>,

    /// Encoding of the input files, such as `ISO-8859-1`
    ///
    /// Without it, files are read as UTF-8 unless they start with a byte order
    /// mark.
    #[arg(long, value_name = "LABEL")]
    pub encoding: Option<String>,

    /// Suppress the document header and output an embeddable document
    #[arg(short = 'e', long)]
    pub embedded: bool,
}

/// Validate that the requested backend is available (compiled in)
fn validate_backend(backend: Backend) -> Result<(), String> {
    match backend {
        Backend::Apt => Ok(()),
        Backend::Events => {
            #[cfg(feature = "events")]
            return Ok(());
            #[cfg(not(feature = "events"))]
            return Err("Events backend not available. Recompile with --features events".into());
        }
    }
}

pub fn run(args: &Args) -> miette::Result<()> {
    validate_backend(args.backend).map_err(|e| miette::miette!("{e}"))?;

    let options = Options::builder()
        .generator_metadata(GeneratorMetadata::new(
            env!("CARGO_BIN_NAME"),
            env!("CARGO_PKG_VERSION"),
        ))
        .parser(build_parser_options(args))
        .timings(args.timings)
        .embedded(args.embedded)
        .to_stdout(args.stdout)
        .build();

    match args.backend {
        Backend::Apt => run_processor::<aptdoc_converters_apt::Processor>(args, options),

        #[cfg(feature = "events")]
        Backend::Events => run_processor::<aptdoc_converters_events::Processor>(args, options),

        #[cfg(not(feature = "events"))]
        Backend::Events => Ok(()),
    }
}

#[tracing::instrument(skip(options))]
fn run_processor<P>(args: &Args, options: Options) -> miette::Result<()>
where
    P: Converter + Sync,
    P::Error: std::error::Error + Send + 'static,
{
    let processor = P::new(options);

    // Handle stdin separately (no parallelization)
    if args.stdin {
        let mut text = String::new();
        std::io::stdin()
            .lock()
            .read_to_string(&mut text)
            .into_diagnostic()?;
        return processor
            .convert(Input::Text {
                name: STDIN_NAME,
                text: &text,
            })
            .map_err(|e| error::report(&e, Some(&text)));
    }

    if args.files.is_empty() {
        return Err(miette::miette!(
            "You must pass at least one file to convert, or --stdin"
        ));
    }

    let convert = |file: &PathBuf| (file.clone(), processor.convert(Input::File(file)));
    let results: Vec<(PathBuf, Result<(), P::Error>)> = if args.stdout {
        // Everything goes to stdout - convert sequentially to avoid interleaving
        args.files.iter().map(convert).collect()
    } else {
        // Each file writes to its own output - convert in parallel
        args.files.par_iter().map(convert).collect()
    };

    let errors: Vec<(PathBuf, P::Error)> = results
        .into_iter()
        .filter_map(|(file, result)| result.err().map(|error| (file, error)))
        .collect();
    if errors.is_empty() {
        return Ok(());
    }

    eprintln!("\nFailed to process {} file(s):", errors.len());
    for (idx, (file, error)) in errors.iter().enumerate() {
        eprintln!("\n{}. File: {}", idx + 1, file.display());
        let source = std::fs::read_to_string(file).ok();
        eprintln!("{:?}", error::report(error, source.as_deref()));
    }
    Err(miette::miette!("{} file(s) failed to convert", errors.len()))
}

/// Build parser options from CLI args
fn build_parser_options(args: &Args) -> aptdoc_parser::Options {
    let mut builder = aptdoc_parser::Options::builder();

    if args.timings {
        builder = builder.with_timings();
    }

    if args.strict {
        builder = builder.with_strict();
    }

    if args.emit_comments {
        builder = builder.with_comments();
    }

    if let Some(depth) = args.max_depth {
        builder = builder.with_max_nesting_depth(depth);
    }

    if let Some(encoding) = &args.encoding {
        builder = builder.with_encoding(encoding.clone());
    }

    builder.build()
}
