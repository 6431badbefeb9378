//! APT converter: parses a document and writes it back in canonical APT.
//!
//! The output parses to the same events as the input, which makes the
//! converter useful as a formatter and as a check of the parser itself.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//!
//! use aptdoc_converters_apt::Processor;
//! use aptdoc_converters_core::{Converter, Input, Options};
//!
//! # fn main() -> Result<(), aptdoc_converters_apt::Error> {
//! let processor = Processor::new(Options::default());
//! processor.convert(Input::File(Path::new("doc.apt")))?;
//! // Outputs: doc.canonical.apt
//! # Ok(())
//! # }
//! ```

use std::{
    io::Write,
    path::{Path, PathBuf},
};

use aptdoc_converters_core::{Backend, Converter, Input, Options};

mod error;
mod writer;

pub use error::Error;
pub use writer::AptWriter;

/// Extension of converted files, kept apart from the `.apt` sources.
const OUTPUT_EXTENSION: &str = "canonical.apt";

/// APT converter processor.
#[derive(Clone, Debug)]
pub struct Processor {
    options: Options,
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
        Backend::Apt
    }

    fn derive_output_path(&self, input: &Path) -> Result<Option<PathBuf>, Error> {
        let apt_path = input.with_extension(OUTPUT_EXTENSION);
        // Avoid overwriting the input file
        if apt_path == input {
            return Err(Error::OutputPathSameAsInput(input.to_path_buf()));
        }
        Ok(Some(apt_path))
    }

    #[tracing::instrument(skip(self, writer), fields(input = %input.name()))]
    fn write_to<W: Write>(&self, input: Input<'_>, mut writer: W) -> Result<(), Error> {
        let mut sink = AptWriter::new().embedded(self.options.embedded());
        let metadata = self.options.generator_metadata();
        if !metadata.is_empty() {
            sink = sink.with_generator(metadata.to_string());
        }
        input.parse(self.options.parser(), &mut sink)?;
        writer.write_all(sink.into_string().as_bytes())?;
        writer.flush()?;
        Ok(())
    }
}
