//! Core traits and utilities for aptdoc converters.
//!
//! This crate provides the shared infrastructure used by the aptdoc converters
//! (APT, events):
//!
//! - [`Converter`] - trait that all converters implement
//! - [`Input`] - where a converter reads APT from
//! - [`Options`] - configuration for conversion
//! - [`Backend`] - the output formats known to the CLI
//!
//! # Example
//!
//! ```
//! use aptdoc_converters_core::{GeneratorMetadata, Options};
//!
//! let options = Options::builder()
//!     .embedded(true)
//!     .generator_metadata(GeneratorMetadata::new("my-converter", "1.0.0"))
//!     .build();
//! assert!(options.embedded());
//! ```

use std::{
    io::Write,
    path::{Path, PathBuf},
    time::Instant,
};

use aptdoc_parser::Sink;

mod backend;

pub use backend::Backend;

/// Converter options.
///
/// Use [`Options::builder()`] to construct an instance. This struct is marked
/// `#[non_exhaustive]` to allow adding new fields in future minor versions.
#[derive(Debug, Clone, Default)]
#[non_exhaustive]
pub struct Options {
    generator_metadata: GeneratorMetadata,
    parser: aptdoc_parser::Options,
    timings: bool,
    embedded: bool,
    to_stdout: bool,
}

impl Options {
    /// Create a new builder with default values.
    #[must_use]
    pub fn builder() -> OptionsBuilder {
        OptionsBuilder::default()
    }

    /// Get the generator metadata.
    #[must_use]
    pub fn generator_metadata(&self) -> &GeneratorMetadata {
        &self.generator_metadata
    }

    /// Get the options documents are parsed with.
    #[must_use]
    pub fn parser(&self) -> &aptdoc_parser::Options {
        &self.parser
    }

    /// Get whether timing information should be output.
    #[must_use]
    pub fn timings(&self) -> bool {
        self.timings
    }

    /// Get whether to output an embeddable document.
    ///
    /// When true, converters leave out the document header and anything else
    /// that only makes sense once per output file.
    #[must_use]
    pub fn embedded(&self) -> bool {
        self.embedded
    }

    /// Get whether output goes to stdout even when converting files.
    #[must_use]
    pub fn to_stdout(&self) -> bool {
        self.to_stdout
    }
}

/// Builder for [`Options`].
///
/// Use [`Options::builder()`] to create a new builder.
#[derive(Debug, Default, Clone)]
pub struct OptionsBuilder {
    options: Options,
}

impl OptionsBuilder {
    /// Set the generator metadata (name and version).
    #[must_use]
    pub fn generator_metadata(mut self, meta: GeneratorMetadata) -> Self {
        self.options.generator_metadata = meta;
        self
    }

    /// Set the options documents are parsed with.
    #[must_use]
    pub fn parser(mut self, parser: aptdoc_parser::Options) -> Self {
        self.options.parser = parser;
        self
    }

    /// Enable or disable timing output.
    #[must_use]
    pub fn timings(mut self, timings: bool) -> Self {
        self.options.timings = timings;
        self
    }

    /// Enable or disable embedded output mode.
    #[must_use]
    pub fn embedded(mut self, embedded: bool) -> Self {
        self.options.embedded = embedded;
        self
    }

    /// Write converted files to stdout instead of next to their source.
    #[must_use]
    pub fn to_stdout(mut self, to_stdout: bool) -> Self {
        self.options.to_stdout = to_stdout;
        self
    }

    /// Build the [`Options`] instance.
    #[must_use]
    pub fn build(self) -> Options {
        self.options
    }
}

/// Extension trait for formatting [`Duration`](std::time::Duration) in human-readable form.
pub trait PrettyDuration {
    /// Returns a human-readable string representation of the duration.
    ///
    /// The unit is picked from the magnitude (ns, µs, ms, s) and the value is
    /// rounded to two decimals, without trailing zeros.
    fn pretty_print(&self) -> String;
}

impl PrettyDuration for std::time::Duration {
    fn pretty_print(&self) -> String {
        let nanos = self.as_nanos();
        // Every duration this can be called with fits the f64 mantissa well
        // enough for two decimals.
        #[allow(clippy::cast_precision_loss)]
        let f_nanos = nanos as f64;
        let (value, unit) = match nanos {
            0..=999 => return format!("{nanos}ns"),
            1_000..=999_999 => (f_nanos / 1_000.0, "µs"),
            1_000_000..=999_999_999 => (f_nanos / 1_000_000.0, "ms"),
            _ => (f_nanos / 1_000_000_000.0, "s"),
        };
        let value = format!("{value:.2}");
        format!(
            "{}{unit}",
            value.trim_end_matches('0').trim_end_matches('.')
        )
    }
}

/// Generator metadata for tracking which tool produced the output.
///
/// The APT backend writes it as a leading comment.
#[derive(Debug, Default, Clone)]
#[non_exhaustive]
pub struct GeneratorMetadata {
    name: String,
    version: String,
}

impl GeneratorMetadata {
    /// Create new generator metadata.
    #[must_use]
    pub fn new<S: AsRef<str>>(name: S, version: S) -> Self {
        Self {
            name: name.as_ref().to_string(),
            version: version.as_ref().to_string(),
        }
    }

    /// Get the generator name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the generator version.
    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Whether any metadata was set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_empty()
    }
}

impl std::fmt::Display for GeneratorMetadata {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} v{}", self.name, self.version)
    }
}

/// Where a converter reads APT from.
#[derive(Debug, Clone, Copy)]
pub enum Input<'a> {
    /// A file, decoded according to the parser options.
    File(&'a Path),
    /// Text already in memory, such as everything read from stdin.
    Text {
        /// Name used in error locations.
        name: &'a str,
        /// The APT source.
        text: &'a str,
    },
}

impl Input<'_> {
    /// Parses the input into `sink`.
    ///
    /// # Errors
    ///
    /// Returns the parser error, located in the input.
    pub fn parse<S: Sink>(
        &self,
        options: &aptdoc_parser::Options,
        sink: &mut S,
    ) -> Result<(), aptdoc_parser::Error> {
        match self {
            Self::File(path) => aptdoc_parser::parse_file(path, options, sink),
            Self::Text { name, text } => {
                aptdoc_parser::parse_from_reader(text.as_bytes(), name, options, sink)
            }
        }
    }

    /// A name for the input in messages.
    #[must_use]
    pub fn name(&self) -> String {
        match self {
            Self::File(path) => path.display().to_string(),
            Self::Text { name, .. } => (*name).to_string(),
        }
    }
}

/// Trait for document converters (APT, events).
///
/// Converters are sinks at heart: [`Converter::write_to`] parses the input
/// straight into the converter's sink and writes the result.
pub trait Converter: Sized {
    /// The error type for this converter.
    type Error: From<aptdoc_parser::Error> + From<std::io::Error>;

    /// Create a new converter instance.
    fn new(options: Options) -> Self;

    /// The options this converter was created with.
    fn options(&self) -> &Options;

    /// The backend this converter implements.
    fn backend(&self) -> Backend;

    /// The file converting `input` writes to, or `None` for stdout.
    ///
    /// # Errors
    ///
    /// Returns an error if no usable output path exists, for example when it
    /// would overwrite the input.
    fn derive_output_path(&self, input: &Path) -> Result<Option<PathBuf>, Self::Error>;

    /// Parse `input` and write the converted document to `writer`.
    ///
    /// # Errors
    ///
    /// Returns an error if parsing or writing fails.
    fn write_to<W: Write>(&self, input: Input<'_>, writer: W) -> Result<(), Self::Error>;

    /// Convert `input` into its derived output file, or stdout.
    ///
    /// Output is buffered: nothing is written when parsing fails.
    ///
    /// # Errors
    ///
    /// Returns an error if parsing, deriving the output path or writing
    /// fails.
    #[tracing::instrument(skip(self), fields(backend = %self.backend()))]
    fn convert(&self, input: Input<'_>) -> Result<(), Self::Error> {
        let now = Instant::now();
        let mut buffer = Vec::new();
        self.write_to(input, &mut buffer)?;

        let output_path = match input {
            Input::File(path) if !self.options().to_stdout() => self.derive_output_path(path)?,
            Input::File(_) | Input::Text { .. } => None,
        };
        if let Some(path) = &output_path {
            std::fs::write(path, &buffer)?;
            tracing::debug!(output = %path.display(), bytes = buffer.len(), "wrote output");
        } else {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(&buffer)?;
            stdout.flush()?;
        }

        if self.options().timings() {
            eprintln!(
                "  Converted {} in {}",
                input.name(),
                now.elapsed().pretty_print()
            );
        }
        Ok(())
    }
}

/// Walk the error source chain to find a parser error.
///
/// Lets the CLI show parse failures with their source context no matter which
/// converter error wraps them.
pub fn find_parser_error<'e>(
    e: &'e (dyn std::error::Error + 'static),
) -> Option<&'e aptdoc_parser::Error> {
    let mut current = Some(e);
    while let Some(err) = current {
        if let Some(parser_error) = err.downcast_ref::<aptdoc_parser::Error>() {
            return Some(parser_error);
        }
        current = err.source();
    }
    None
}
