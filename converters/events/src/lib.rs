//! Events converter: the parser's event stream as JSON.
//!
//! Each event is one object tagged by its `event` name, in document order:
//!
//! ```json
//! [
//!   { "event": "paragraph-start" },
//!   { "event": "text", "text": "Hello" },
//!   { "event": "paragraph-end" }
//! ]
//! ```
//!
//! Embedded output keeps only the events between `body-start` and
//! `body-end`.

use std::{
    io::Write,
    path::{Path, PathBuf},
};

use aptdoc_converters_core::{Backend, Converter, Input, Options};
use aptdoc_parser::{Event, EventRecorder};

mod error;

pub use error::Error;

/// Events converter processor.
#[derive(Clone, Debug)]
pub struct Processor {
    options: Options,
}

impl Processor {
    /// Parses `input` and returns the events to write.
    ///
    /// # Errors
    ///
    /// Returns the parser error if `input` cannot be parsed.
    pub fn events(&self, input: Input<'_>) -> Result<Vec<Event>, Error> {
        let mut recorder = EventRecorder::new();
        input.parse(self.options.parser(), &mut recorder)?;
        let events = recorder.into_events();
        if !self.options.embedded() {
            return Ok(events);
        }
        Ok(events
            .into_iter()
            .skip_while(|event| *event != Event::BodyStart)
            .skip(1)
            .take_while(|event| *event != Event::BodyEnd)
            .collect())
    }
}

impl Converter for Processor {
    type Error = Error;

    fn new(options: Options) -> Self {
        Self { options }
    }

    fn options(&self) -> &Options {
        &self.options
    }

    fn backend(&self) -> Backend {
        Backend::Events
    }

    fn derive_output_path(&self, input: &Path) -> Result<Option<PathBuf>, Error> {
        let json_path = input.with_extension(Backend::Events.extension());
        // Avoid overwriting the input file
        if json_path == input {
            return Err(Error::OutputPathSameAsInput(input.to_path_buf()));
        }
        Ok(Some(json_path))
    }

    #[tracing::instrument(skip(self, writer), fields(input = %input.name()))]
    fn write_to<W: Write>(&self, input: Input<'_>, mut writer: W) -> Result<(), Error> {
        let events = self.events(input)?;
        tracing::debug!(count = events.len(), "recorded events");
        serde_json::to_writer_pretty(&mut writer, &events)?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        Ok(())
    }
}
