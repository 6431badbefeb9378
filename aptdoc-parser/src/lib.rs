//! A parser for APT ("Almost Plain Text"), the wiki-like markup of Maven
//! sites.
//!
//! The parser does not build a document tree. It drives a [`Sink`] with
//! paired structural events (sections, lists, tables, emphasis, links) in
//! document order. [`EventRecorder`] is a sink that keeps the events as
//! data.
//!
//! ```
//! use aptdoc_parser::{Event, EventRecorder, Options, parse};
//!
//! # fn main() -> Result<(), aptdoc_parser::Error> {
//! let mut recorder = EventRecorder::new();
//! parse("Section\n\n Some <<bold>> text.\n", &Options::default(), &mut recorder)?;
//! assert!(recorder.events().contains(&Event::BoldStart));
//! # Ok(())
//! # }
//! ```
use std::{io::BufRead, path::Path, time::Instant};

use tracing::instrument;

mod block;
mod cursor;
mod diagnostics;
mod error;
mod event;
mod inline;
mod links;
mod macros;
mod model;
mod options;
mod sink;
mod source;
mod table;
mod traverse;

#[cfg(test)]
mod proptests;

use cursor::Cursor;
use traverse::Traverser;

pub use block::BlockKind;
pub use error::{Error, SourceLocation};
pub use event::{Event, EventRecorder};
pub use links::{encode_id, is_external_link, is_internal_link, is_local_link, is_valid_id};
pub use macros::{EchoMacro, Macro, MacroRegistry, MacroRequest};
pub use model::{Justification, MAX_SECTION_LEVEL, Numbering, SectionLevel};
pub use options::{Options, OptionsBuilder};
pub use sink::Sink;
pub use source::{LineSource, ReaderSource};

/// Parse APT text held in memory.
///
/// # Errors
///
/// Returns an [`Error::Located`] naming the line of the block that could not
/// be parsed. Events emitted before the error have already reached `sink`.
#[instrument(skip_all)]
pub fn parse<S: Sink>(input: &str, options: &Options, sink: &mut S) -> Result<(), Error> {
    parse_from_reader(input.as_bytes(), "<input>", options, sink)
}

/// Parse an APT file, decoding it according to [`Options::encoding`] or its
/// byte order mark.
///
/// # Errors
///
/// Returns an error if the file cannot be read or decoded, or if its content
/// cannot be parsed.
#[instrument(skip(options, sink), fields(path = %path.as_ref().display()))]
pub fn parse_file<P: AsRef<Path>, S: Sink>(
    path: P,
    options: &Options,
    sink: &mut S,
) -> Result<(), Error> {
    let path = path.as_ref();
    let input = source::read_and_decode_file(path, options)?;
    parse_from_reader(input.as_bytes(), &path.display().to_string(), options, sink)
}

/// Parse APT read line by line from `reader`. `name` identifies the input in
/// error locations.
///
/// # Errors
///
/// Returns an error if reading fails or the input cannot be parsed.
pub fn parse_from_reader<R: BufRead, S: Sink>(
    reader: R,
    name: &str,
    options: &Options,
    sink: &mut S,
) -> Result<(), Error> {
    let mut source = ReaderSource::new(reader, name);
    parse_source(&mut source, options, sink)
}

/// Parse APT from any [`LineSource`].
///
/// # Errors
///
/// Returns an [`Error::Located`] wrapping the first structural error, with
/// the source name and the line of the block being processed.
#[instrument(skip_all, fields(source = source.name()))]
pub fn parse_source<S: Sink>(
    source: &mut dyn LineSource,
    options: &Options,
    sink: &mut S,
) -> Result<(), Error> {
    let now = Instant::now();
    let mut traverser = Traverser::new(Cursor::new(source, options.emit_comments), options);
    let result = traverser
        .document(sink)
        .map_err(|error| error.at(traverser.location()));
    let location = traverser.location();
    traverser.into_diagnostics().flush();

    if options.timings {
        tracing::info!(
            source = %location.name,
            lines = location.line,
            elapsed = ?now.elapsed(),
            "parsed document"
        );
    }
    result
}
