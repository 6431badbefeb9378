use std::fmt;

use crate::block::BlockKind;

#[non_exhaustive]
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("{source}, {location}")]
    Located {
        location: SourceLocation,
        source: Box<Error>,
    },

    #[error("expected {expected}, found {found}")]
    UnexpectedBlock { expected: BlockKind, found: BlockKind },

    #[error("missing '{0}'")]
    MissingMarkup(&'static str),

    #[error("missing title")]
    MissingTitle,

    #[error("no columns specified")]
    NoColumns,

    #[error("no table rows")]
    NoTableRows,

    #[error("invalid escape sequence: {0}")]
    InvalidEscape(String),

    #[error("nesting deeper than {0} levels")]
    NestingTooDeep(usize),

    #[error("malformed macro: {0}")]
    MalformedMacro(String),

    #[error("Missing 'key=value' pair for macro parameter: {0}")]
    MacroParameter(String),

    #[error("Unable to find macro used in the APT document: {0}")]
    MacroNotFound(String),

    #[error("macro '{id}' failed: {message}")]
    MacroFailed { id: String, message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unknown encoding: {0}")]
    UnknownEncoding(String),

    #[error("Unrecognized encoding in file: {0}")]
    UnrecognizedEncodingInFile(String),

    #[error("{name} is not valid {encoding}")]
    MalformedInput { name: String, encoding: &'static str },
}

impl Error {
    /// Attach source provenance to this error, unless it already carries some.
    #[must_use]
    pub(crate) fn at(self, location: SourceLocation) -> Self {
        match self {
            Self::Located { .. } => self,
            other => Self::Located {
                location,
                source: Box::new(other),
            },
        }
    }

    /// The error without its provenance wrapper.
    #[must_use]
    pub fn kind(&self) -> &Error {
        match self {
            Self::Located { source, .. } => source.kind(),
            other => other,
        }
    }

    /// Extract location information from this error if available.
    #[must_use]
    pub fn location(&self) -> Option<&SourceLocation> {
        match self {
            Self::Located { location, .. } => Some(location),
            Self::UnexpectedBlock { .. }
            | Self::MissingMarkup(_)
            | Self::MissingTitle
            | Self::NoColumns
            | Self::NoTableRows
            | Self::InvalidEscape(_)
            | Self::NestingTooDeep(_)
            | Self::MalformedMacro(_)
            | Self::MacroParameter(_)
            | Self::MacroNotFound(_)
            | Self::MacroFailed { .. }
            | Self::Io(_)
            | Self::UnknownEncoding(_)
            | Self::UnrecognizedEncodingInFile(_)
            | Self::MalformedInput { .. } => None,
        }
    }

    /// Get advice for this error if available.
    /// Returns helpful information for resolving the error.
    #[must_use]
    pub fn advice(&self) -> Option<&'static str> {
        match self.kind() {
            Self::UnexpectedBlock { .. } => Some(
                "Section levels must increase one at a time: a '**' title needs an enclosing '*' section, which needs an enclosing unstarred section",
            ),
            Self::MissingMarkup(">>>" | ">>" | ">") => {
                Some("Close emphasis spans in the same block they were opened: <italic>, <<bold>>, <<<monospaced>>>")
            }
            Self::MissingMarkup("}}" | "}") => Some(
                "Links are written {{target}} or {{{target}text}}, anchors {name}; escape literal braces with a backslash",
            ),
            Self::NoColumns => {
                Some("A table starts with a separator line such as '*--+--+' declaring one marker per column")
            }
            Self::NoTableRows => Some("Each table row must be followed by a '*--' separator line"),
            Self::MissingTitle => Some("The document header needs a title line after the first ' -----' line"),
            Self::MacroParameter(_) => Some("Macro parameters are written as %{id|key=value|key=value}"),
            Self::NestingTooDeep(_) => Some("Raise the nesting limit or flatten deeply nested lists"),
            Self::UnrecognizedEncodingInFile(_) | Self::MalformedInput { .. } => {
                Some("Name the file's encoding explicitly, for example with --encoding ISO-8859-1")
            }
            Self::Located { .. }
            | Self::MissingMarkup(_)
            | Self::InvalidEscape(_)
            | Self::MalformedMacro(_)
            | Self::MacroNotFound(_)
            | Self::MacroFailed { .. }
            | Self::Io(_)
            | Self::UnknownEncoding(_) => None,
        }
    }
}

/// Where in the input a parse error was detected.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceLocation {
    /// Name of the source: a file path, or a placeholder for in-memory input.
    pub name: String,
    /// 1-based line number.
    pub line: usize,
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "source: {}, line: {}", self.name, self.line)
    }
}
