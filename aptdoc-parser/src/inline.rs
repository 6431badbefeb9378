//! Inline markup: escapes, emphasis, links and anchors.

use crate::{
    Error, Sink,
    diagnostics::Diagnostics,
    event::TextCollector,
    links::{encode_id, normalize_link_target},
};

/// Whitespace as far as inline text is concerned: non-breaking spaces are text.
pub(crate) fn is_breaking_whitespace(c: char) -> bool {
    c.is_whitespace() && !matches!(c, '\u{a0}' | '\u{2007}' | '\u{202f}')
}

/// Inline spans currently open while scanning one piece of text.
#[derive(Debug, Default)]
#[allow(clippy::struct_excessive_bools)]
struct Spans {
    anchor: bool,
    link: bool,
    italic: bool,
    bold: bool,
    monospaced: bool,
}

impl Spans {
    fn emphasis(&self) -> bool {
        self.italic || self.bold || self.monospaced
    }

    /// The closing markup of the first span still open, if any.
    fn unclosed(&self) -> Option<&'static str> {
        if self.monospaced {
            Some(">>>")
        } else if self.bold {
            Some(">>")
        } else if self.italic {
            Some(">")
        } else if self.link {
            Some("}}")
        } else if self.anchor {
            Some("}")
        } else {
            None
        }
    }
}

/// Scans the raw text of a block and emits its inline events.
pub(crate) struct InlineScanner<'d> {
    strict: bool,
    diagnostics: &'d mut Diagnostics,
}

impl<'d> InlineScanner<'d> {
    pub(crate) fn new(strict: bool, diagnostics: &'d mut Diagnostics) -> Self {
        Self {
            strict,
            diagnostics,
        }
    }

    /// Scans all of `text` into `sink`.
    ///
    /// Runs of plain characters are delivered as a single [`Sink::text`] call.
    /// Every span opened in `text` must also be closed in it.
    pub(crate) fn scan(&mut self, text: &str, sink: &mut dyn Sink) -> Result<(), Error> {
        let chars: Vec<char> = text.chars().collect();
        self.scan_chars(&chars, sink)
    }

    #[allow(clippy::too_many_lines)]
    fn scan_chars(&mut self, text: &[char], sink: &mut dyn Sink) -> Result<(), Error> {
        let mut buffer = String::new();
        let mut spans = Spans::default();
        let at = |i: usize| text.get(i).copied();

        let mut i = 0;
        while let Some(c) = at(i) {
            match c {
                '\\' => match at(i + 1) {
                    Some(' ') => {
                        i += 1;
                        flush(&mut buffer, sink);
                        sink.non_breaking_space();
                    }
                    Some('\r' | '\n') => {
                        i += 1;
                        while at(i + 1).is_some_and(is_breaking_whitespace) {
                            i += 1;
                        }
                        flush(&mut buffer, sink);
                        sink.line_break();
                    }
                    Some(
                        escaped @ ('\\' | '|' | '~' | '=' | '-' | '+' | '*' | '[' | ']' | '<' | '>'
                        | '{' | '}'),
                    ) => {
                        i += 1;
                        buffer.push(escaped);
                    }
                    Some(prefix @ ('x' | 'u')) => {
                        let width = if prefix == 'x' { 2 } else { 4 };
                        if let Some(digits) = text.get(i + 2..i + 2 + width) {
                            buffer.push(self.decode_hex(prefix, digits)?);
                            i += 1 + width;
                        } else {
                            buffer.push('\\');
                        }
                    }
                    Some(digit) if digit.is_digit(8) => {
                        let digits: String = text
                            .get(i + 1..)
                            .unwrap_or_default()
                            .iter()
                            .take(3)
                            .take_while(|c| c.is_digit(8))
                            .collect();
                        let decoded = u32::from_str_radix(&digits, 8)
                            .ok()
                            .and_then(char::from_u32)
                            .unwrap_or('?');
                        buffer.push(decoded);
                        i += digits.len();
                    }
                    _ => buffer.push('\\'),
                },

                '{' if !spans.anchor && !spans.link => {
                    flush(&mut buffer, sink);
                    if at(i + 1) == Some('{') {
                        i += 1;
                        spans.link = true;
                        let target = if at(i + 1) == Some('{') {
                            i += 1;
                            let (target, close) = link_anchor(text, i + 1)?;
                            i = close;
                            target
                        } else {
                            self.link_target(text, i + 1)?
                        };
                        let target = normalize_link_target(&target, &mut *self.diagnostics);
                        sink.link_start(&target);
                    } else {
                        spans.anchor = true;
                        let name = self.anchor_name(text, i + 1)?;
                        sink.anchor_start(&encode_id(&name));
                    }
                }

                '}' if spans.link && at(i + 1) == Some('}') => {
                    i += 1;
                    spans.link = false;
                    flush(&mut buffer, sink);
                    sink.link_end();
                }
                '}' if spans.anchor => {
                    spans.anchor = false;
                    flush(&mut buffer, sink);
                    sink.anchor_end();
                }

                '<' if !spans.emphasis() => {
                    flush(&mut buffer, sink);
                    if at(i + 1) == Some('<') {
                        if at(i + 2) == Some('<') {
                            i += 2;
                            spans.monospaced = true;
                            sink.monospaced_start();
                        } else {
                            i += 1;
                            spans.bold = true;
                            sink.bold_start();
                        }
                    } else {
                        spans.italic = true;
                        sink.italic_start();
                    }
                }

                '>' if spans.monospaced && at(i + 1) == Some('>') && at(i + 2) == Some('>') => {
                    i += 2;
                    spans.monospaced = false;
                    flush(&mut buffer, sink);
                    sink.monospaced_end();
                }
                '>' if spans.bold && at(i + 1) == Some('>') => {
                    i += 1;
                    spans.bold = false;
                    flush(&mut buffer, sink);
                    sink.bold_end();
                }
                '>' if spans.italic => {
                    spans.italic = false;
                    flush(&mut buffer, sink);
                    sink.italic_end();
                }

                c if is_breaking_whitespace(c) => {
                    buffer.push(' ');
                    while at(i + 1).is_some_and(is_breaking_whitespace) {
                        i += 1;
                    }
                }

                c => buffer.push(c),
            }
            i += 1;
        }

        if let Some(closer) = spans.unclosed() {
            return Err(Error::MissingMarkup(closer));
        }
        flush(&mut buffer, sink);
        Ok(())
    }

    fn decode_hex(&mut self, prefix: char, digits: &[char]) -> Result<char, Error> {
        let digits: String = digits.iter().collect();
        let decoded = digits
            .chars()
            .all(|c| c.is_ascii_hexdigit())
            .then(|| u32::from_str_radix(&digits, 16).ok())
            .flatten()
            .and_then(char::from_u32);
        match decoded {
            Some(c) => Ok(c),
            None if self.strict => Err(Error::InvalidEscape(format!("\\{prefix}{digits}"))),
            None => {
                self.diagnostics
                    .warn("Invalid escape sequence", format!("\\{prefix}{digits}"));
                Ok('?')
            }
        }
    }

    /// The target of a `{{target}}` link starting at `begin`: its text up to
    /// the first unescaped `}}`, flattened and trimmed.
    fn link_target(&mut self, text: &[char], begin: usize) -> Result<String, Error> {
        let mut previous2 = '{';
        let mut previous = '{';
        for (i, &c) in text.iter().enumerate().skip(begin) {
            if c == '}' && previous == '}' && previous2 != '\\' {
                return self.flatten(text.get(begin..i - 1).unwrap_or_default());
            }
            previous2 = previous;
            previous = c;
        }
        Err(Error::MissingMarkup("}}"))
    }

    /// The name of a `{name}` anchor starting at `begin`, flattened and trimmed.
    fn anchor_name(&mut self, text: &[char], begin: usize) -> Result<String, Error> {
        let mut previous = '{';
        for (i, &c) in text.iter().enumerate().skip(begin) {
            if c == '}' && previous != '\\' {
                return self.flatten(text.get(begin..i).unwrap_or_default());
            }
            previous = c;
        }
        Err(Error::MissingMarkup("}"))
    }

    /// The plain text of `text` after inline processing.
    fn flatten(&mut self, text: &[char]) -> Result<String, Error> {
        let mut collector = TextCollector::default();
        InlineScanner::new(self.strict, &mut *self.diagnostics).scan_chars(text, &mut collector)?;
        Ok(collector.into_text().trim().to_string())
    }
}

/// The explicit target of a `{{{target}text}}` link starting at `begin`, and
/// the index of the `}` closing it. Backslashes escape the next character.
fn link_anchor(text: &[char], begin: usize) -> Result<(String, usize), Error> {
    let mut target = String::new();
    let mut i = begin;
    while let Some(&c) = text.get(i) {
        match c {
            '}' => return Ok((target, i)),
            '\\' if i + 1 < text.len() => {
                i += 1;
                target.extend(text.get(i));
            }
            c => target.push(c),
        }
        i += 1;
    }
    Err(Error::MissingMarkup("}"))
}

fn flush(buffer: &mut String, sink: &mut dyn Sink) {
    if !buffer.is_empty() {
        sink.text(buffer);
        buffer.clear();
    }
}
