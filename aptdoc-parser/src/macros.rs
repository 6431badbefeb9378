//! `%{id|key=value|...}` macro blocks.

use std::{collections::BTreeMap, fmt, sync::Arc};

use rustc_hash::FxHashMap;

use crate::{Error, Sink};

const ESCAPED_EQUALS: char = '\u{11}';
const ESCAPED_PIPE: char = '\u{12}';

/// A parsed macro invocation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MacroRequest {
    pub id: String,
    pub parameters: BTreeMap<String, String>,
}

impl MacroRequest {
    /// Parses the text of a macro block.
    ///
    /// The invocation is the content between the first `{` and the first `}`,
    /// split on `|`; `\|` and `\=` escape the separators. The first piece is
    /// the macro id, every following piece a `key=value` parameter.
    pub(crate) fn parse(text: &str) -> Result<Self, Error> {
        let malformed = || Error::MalformedMacro(text.to_string());
        let start = text.find('{').ok_or_else(malformed)?;
        let end = text.find('}').filter(|end| *end > start).ok_or_else(malformed)?;
        let invocation = text
            .get(start + 1..end)
            .ok_or_else(malformed)?
            .replace("\\=", &ESCAPED_EQUALS.to_string())
            .replace("\\|", &ESCAPED_PIPE.to_string());

        let mut pieces = invocation.split('|').filter(|piece| !piece.is_empty());
        let id = pieces.next().map(unescape).ok_or_else(malformed)?;

        let mut parameters = BTreeMap::new();
        for piece in pieces {
            let mut parts = piece.split('=').filter(|part| !part.is_empty());
            match (parts.next(), parts.next()) {
                (Some(key), Some(value)) => {
                    parameters.insert(unescape(key), unescape(value));
                }
                _ => return Err(Error::MacroParameter(unescape(piece))),
            }
        }
        Ok(Self { id, parameters })
    }
}

fn unescape(text: &str) -> String {
    text.replace(ESCAPED_EQUALS, "=").replace(ESCAPED_PIPE, "|")
}

/// A handler for `%{id|...}` blocks.
///
/// Macros write their output directly into the sink the parser drives. A
/// failure is reported as a message and aborts the parse.
pub trait Macro: Send + Sync {
    /// # Errors
    ///
    /// Returns a description of the problem when the macro cannot run.
    fn execute(&self, request: &MacroRequest, sink: &mut dyn Sink) -> Result<(), String>;
}

/// Lists its parameters in a boxed verbatim block.
#[derive(Debug, Default)]
pub struct EchoMacro;

impl Macro for EchoMacro {
    fn execute(&self, request: &MacroRequest, sink: &mut dyn Sink) -> Result<(), String> {
        let mut text = String::from("echo\n");
        for (key, value) in &request.parameters {
            text.push_str(key);
            text.push_str(" ---> ");
            text.push_str(value);
            text.push('\n');
        }
        sink.verbatim_start(true);
        sink.text(&text);
        sink.verbatim_end();
        Ok(())
    }
}

/// The macros a parse can call, by id.
#[derive(Clone)]
pub struct MacroRegistry {
    macros: FxHashMap<String, Arc<dyn Macro>>,
}

impl MacroRegistry {
    /// A registry without any macro, not even the built-in ones.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            macros: FxHashMap::default(),
        }
    }

    pub fn register(&mut self, id: impl Into<String>, handler: Arc<dyn Macro>) {
        self.macros.insert(id.into(), handler);
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Arc<dyn Macro>> {
        self.macros.get(id)
    }

    #[tracing::instrument(skip(self, sink))]
    pub(crate) fn execute(&self, text: &str, sink: &mut dyn Sink) -> Result<(), Error> {
        let request = MacroRequest::parse(text)?;
        let handler = self
            .get(&request.id)
            .ok_or_else(|| Error::MacroNotFound(request.id.clone()))?;
        tracing::debug!(id = %request.id, parameters = request.parameters.len(), "executing macro");
        handler
            .execute(&request, sink)
            .map_err(|message| Error::MacroFailed {
                id: request.id.clone(),
                message,
            })
    }
}

impl Default for MacroRegistry {
    /// A registry holding the built-in `echo` macro.
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register("echo", Arc::new(EchoMacro));
        registry
    }
}

impl fmt::Debug for MacroRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut ids: Vec<&str> = self.macros.keys().map(String::as_str).collect();
        ids.sort_unstable();
        f.debug_struct("MacroRegistry").field("macros", &ids).finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{Event, EventRecorder};

    #[test]
    fn test_parse_request() -> Result<(), Error> {
        let request = MacroRequest::parse("%{snippet|id=abc|url=http://a.b/c\\=d\\|e}")?;
        assert_eq!(request.id, "snippet");
        assert_eq!(request.parameters.get("id").map(String::as_str), Some("abc"));
        assert_eq!(
            request.parameters.get("url").map(String::as_str),
            Some("http://a.b/c=d|e")
        );
        Ok(())
    }

    #[test]
    fn test_parse_request_without_parameters() -> Result<(), Error> {
        let request = MacroRequest::parse("%{toc}")?;
        assert_eq!(request.id, "toc");
        assert!(request.parameters.is_empty());
        Ok(())
    }

    #[test]
    fn test_parameter_without_value() {
        let result = MacroRequest::parse("%{echo|width}");
        assert!(matches!(result, Err(Error::MacroParameter(ref p)) if p == "width"));
    }

    #[test]
    fn test_unterminated_macro() {
        assert!(matches!(
            MacroRequest::parse("%{echo|a=b"),
            Err(Error::MalformedMacro(_))
        ));
    }

    #[test]
    fn test_echo_macro() -> Result<(), Error> {
        let registry = MacroRegistry::default();
        let mut recorder = EventRecorder::new();
        registry.execute("%{echo|b=2|a=1}", &mut recorder)?;
        assert_eq!(
            recorder.into_events(),
            vec![
                Event::VerbatimStart { boxed: true },
                Event::Text {
                    text: "echo\na ---> 1\nb ---> 2\n".to_string()
                },
                Event::VerbatimEnd,
            ]
        );
        Ok(())
    }

    #[test]
    fn test_unknown_macro() {
        let registry = MacroRegistry::empty();
        let mut recorder = EventRecorder::new();
        let result = registry.execute("%{echo}", &mut recorder);
        assert!(matches!(result, Err(Error::MacroNotFound(ref id)) if id == "echo"));
        assert!(recorder.events().is_empty());
    }

    struct Failing;

    impl Macro for Failing {
        fn execute(&self, _request: &MacroRequest, _sink: &mut dyn Sink) -> Result<(), String> {
            Err("no network".to_string())
        }
    }

    #[test]
    fn test_failing_macro() {
        let mut registry = MacroRegistry::empty();
        registry.register("remote", Arc::new(Failing));
        let result = registry.execute("%{remote}", &mut EventRecorder::new());
        assert!(matches!(
            result,
            Err(Error::MacroFailed { ref id, ref message }) if id == "remote" && message == "no network"
        ));
    }
}
