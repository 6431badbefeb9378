use std::sync::Arc;

use crate::macros::{Macro, MacroRegistry};

#[derive(Debug, Clone, Default)]
#[non_exhaustive]
pub struct Options {
    /// Log how long each parse took at `info` level.
    pub timings: bool,
    /// Strict mode - fail on malformed input that is otherwise tolerated.
    ///
    /// When enabled, numeric escapes that do not decode to a character
    /// (`\xZZ`, `\uD800`) are parse errors instead of being replaced by `?`.
    pub strict: bool,
    /// Forward `~~` comment lines to [`Sink::comment`](crate::Sink::comment)
    /// instead of dropping them.
    pub emit_comments: bool,
    /// Maximum number of nested sections and lists.
    ///
    /// `None` (the default) imposes no limit, so input nesting is bounded only
    /// by the stack. Set a limit when parsing untrusted documents.
    pub max_nesting_depth: Option<usize>,
    /// Encoding label (`"utf-8"`, `"iso-8859-1"`, ...) used by
    /// [`parse_file`](crate::parse_file). When unset the encoding is detected
    /// from the byte order mark, falling back to UTF-8.
    pub encoding: Option<String>,
    /// Macros available to `%{...}` blocks.
    pub macros: MacroRegistry,
}

impl Options {
    /// Create a new `OptionsBuilder` for fluent configuration.
    ///
    /// # Example
    ///
    /// ```
    /// use aptdoc_parser::Options;
    ///
    /// let options = Options::builder()
    ///     .with_strict()
    ///     .with_max_nesting_depth(64)
    ///     .build();
    /// assert!(options.strict);
    /// ```
    #[must_use]
    pub fn builder() -> OptionsBuilder {
        OptionsBuilder::default()
    }

    /// Create a new `Options` with default settings.
    ///
    /// Equivalent to `Options::default()`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

/// Builder for `Options` that provides an API for configuration.
///
/// Create an `OptionsBuilder` using `Options::builder()`.
#[derive(Debug, Clone, Default)]
pub struct OptionsBuilder {
    options: Options,
}

impl OptionsBuilder {
    /// Enable timing output.
    #[must_use]
    pub fn with_timings(mut self) -> Self {
        self.options.timings = true;
        self
    }

    /// Enable strict mode.
    #[must_use]
    pub fn with_strict(mut self) -> Self {
        self.options.strict = true;
        self
    }

    /// Deliver comment lines to the sink.
    #[must_use]
    pub fn with_comments(mut self) -> Self {
        self.options.emit_comments = true;
        self
    }

    /// Limit section and list nesting to `depth` levels.
    #[must_use]
    pub fn with_max_nesting_depth(mut self, depth: usize) -> Self {
        self.options.max_nesting_depth = Some(depth);
        self
    }

    /// Decode input files with the given encoding label.
    #[must_use]
    pub fn with_encoding(mut self, label: impl Into<String>) -> Self {
        self.options.encoding = Some(label.into());
        self
    }

    /// Make `handler` available as `%{id|...}`, replacing any macro with the
    /// same id.
    #[must_use]
    pub fn with_macro<M: Macro + 'static>(mut self, id: impl Into<String>, handler: M) -> Self {
        self.options.macros.register(id, Arc::new(handler));
        self
    }

    /// Build the `Options`.
    #[must_use]
    pub fn build(self) -> Options {
        self.options
    }
}
