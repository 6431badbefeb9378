use std::{io::BufRead, path::Path};

use encoding_rs::{Encoding, UTF_8};

use crate::{Error, Options};

/// Supplies the input one line at a time.
pub trait LineSource {
    /// The next line without its terminator, or `None` at end of input.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] when the underlying input cannot be read.
    fn next_line(&mut self) -> Result<Option<String>, Error>;

    /// 1-based number of the line most recently returned; 0 before the first.
    fn line_number(&self) -> usize;

    /// Name used in error messages.
    fn name(&self) -> &str;
}

/// A [`LineSource`] over any buffered reader.
#[derive(Debug)]
pub struct ReaderSource<R> {
    reader: R,
    name: String,
    line_number: usize,
    exhausted: bool,
}

impl<R: BufRead> ReaderSource<R> {
    pub fn new<S: Into<String>>(reader: R, name: S) -> Self {
        Self {
            reader,
            name: name.into(),
            line_number: 0,
            exhausted: false,
        }
    }
}

impl<R: BufRead> LineSource for ReaderSource<R> {
    fn next_line(&mut self) -> Result<Option<String>, Error> {
        if self.exhausted {
            return Ok(None);
        }
        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            self.exhausted = true;
            return Ok(None);
        }
        if line.ends_with('\n') {
            line.pop();
            if line.ends_with('\r') {
                line.pop();
            }
        }
        self.line_number += 1;
        Ok(Some(line))
    }

    fn line_number(&self) -> usize {
        self.line_number
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Reads an APT file into text, decoded per [`Options::encoding`].
pub(crate) fn read_and_decode_file(path: &Path, options: &Options) -> Result<String, Error> {
    let bytes = std::fs::read(path)?;
    decode(&bytes, &path.display().to_string(), options.encoding.as_deref())
}

/// Decodes `bytes` with the encoding named by `label`, or the one announced by
/// a byte order mark, or UTF-8. A byte order mark is never part of the text.
///
/// Bytes that are malformed in the chosen encoding are an error rather than
/// replacement characters.
#[tracing::instrument(skip(bytes), fields(bytes = bytes.len()))]
pub(crate) fn decode(bytes: &[u8], name: &str, label: Option<&str>) -> Result<String, Error> {
    let bom = Encoding::for_bom(bytes);
    let (encoding, skip) = match label {
        Some(label) => {
            let encoding = Encoding::for_label(label.as_bytes())
                .ok_or_else(|| Error::UnknownEncoding(label.to_string()))?;
            let skip = bom
                .filter(|(announced, _)| *announced == encoding)
                .map_or(0, |(_, length)| length);
            (encoding, skip)
        }
        None => bom.unwrap_or((UTF_8, 0)),
    };
    tracing::debug!(encoding = encoding.name(), "decoding input");

    let content = bytes.get(skip..).unwrap_or_default();
    match encoding.decode_without_bom_handling_and_without_replacement(content) {
        Some(text) => Ok(text.into_owned()),
        None if label.is_none() && bom.is_none() => {
            Err(Error::UnrecognizedEncodingInFile(name.to_string()))
        }
        None => Err(Error::MalformedInput {
            name: name.to_string(),
            encoding: encoding.name(),
        }),
    }
}
