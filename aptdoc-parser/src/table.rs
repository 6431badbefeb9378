//! Tables: `*--` separator lines, `|` separated cells and an optional caption.
//!
//! ```text
//! *----------+--------------+
//! || Header  || Other header |
//! *----------+--------------+
//! | cell     | cell that     |
//! |          | spans lines   |
//! *----------:--------------*
//! Caption
//! ```

use crate::{Error, Justification, Sink, inline::InlineScanner};

const SEPARATOR: &str = "*--";
const ESCAPED_PIPE: &str = "\\u007C";
const ESCAPED_NBSP: &str = "\\u00A0";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    /// Before the first separator line.
    Start,
    /// After the first separator, waiting for the first data line.
    Separated,
    /// Rows have started.
    Rows,
}

/// Cells accumulated since the last separator line.
#[derive(Debug)]
struct PendingRow {
    cells: Vec<String>,
    headers: Vec<bool>,
}

impl PendingRow {
    fn new(columns: usize) -> Self {
        Self {
            cells: vec![String::new(); columns],
            headers: vec![false; columns],
        }
    }

    fn is_decorative(&self) -> bool {
        self.cells.iter().all(String::is_empty)
    }

    /// Adds the fragments of one data line to the cells they belong to.
    fn push_line(&mut self, line: &str) {
        let line = line.replace("\\|", ESCAPED_PIPE);
        let columns = self.cells.len();
        let mut column = 0;
        let mut after_pipe = false;
        for token in tokens(&line) {
            if token == "|" {
                if let Some(header) = self.headers.get_mut(column) {
                    *header = after_pipe;
                }
                after_pipe = true;
                continue;
            }
            after_pipe = false;

            let fragment = escape_fragment(token);
            let fragment = trim_control(&fragment);
            if let Some(cell) = self.cells.get_mut(column)
                && !fragment.is_empty()
            {
                if trim_control(cell).ends_with(ESCAPED_NBSP) {
                    cell.push_str("\\\n");
                } else if !cell.is_empty() {
                    cell.push(' ');
                }
                cell.push_str(fragment);
            }

            column += 1;
            if column == columns {
                break;
            }
        }
    }

    /// Emits the row unless every cell is empty, and clears it for the next
    /// one. Returns whether a row was emitted.
    fn emit(
        &mut self,
        justification: &[Justification],
        scanner: &mut InlineScanner<'_>,
        sink: &mut dyn Sink,
    ) -> Result<bool, Error> {
        if self.is_decorative() {
            return Ok(false);
        }
        sink.table_row_start();
        for (i, (cell, header)) in self.cells.iter_mut().zip(self.headers.iter_mut()).enumerate() {
            let justify = justification.get(i).copied().unwrap_or_default();
            if *header {
                sink.table_header_cell_start(justify);
            } else {
                sink.table_cell_start(justify);
            }
            if !cell.is_empty() {
                scanner.scan(cell, sink)?;
                cell.clear();
            }
            if *header {
                sink.table_header_cell_end();
                *header = false;
            } else {
                sink.table_cell_end();
            }
        }
        sink.table_row_end();
        Ok(true)
    }
}

/// Traverses the raw text of a table block.
#[tracing::instrument(level = "trace", skip_all)]
pub(crate) fn traverse_table(
    text: &str,
    scanner: &mut InlineScanner<'_>,
    sink: &mut dyn Sink,
) -> Result<(), Error> {
    let mut phase = Phase::Start;
    let mut justification = Vec::new();
    let mut row = PendingRow::new(0);
    let mut rows = 0_usize;
    let mut caption = None;

    sink.table_start();

    let mut rest = text;
    while !rest.is_empty() {
        if !rest.contains(SEPARATOR) {
            caption = Some(rest);
            break;
        }
        let (line, next) = rest.split_once('\n').unwrap_or((rest, ""));
        rest = next;

        if line.starts_with(SEPARATOR) {
            if phase == Phase::Start {
                phase = Phase::Separated;
                justification = parse_justification(line)?;
                row = PendingRow::new(justification.len());
            } else {
                if row.emit(&justification, scanner, sink)? {
                    rows += 1;
                }
                justification = parse_justification(line)?;
            }
        } else {
            if phase == Phase::Separated {
                phase = Phase::Rows;
                sink.table_rows_start(&justification, line.starts_with('|'));
            }
            row.push_line(line);
        }
    }

    if rows == 0 {
        return Err(Error::NoTableRows);
    }
    tracing::trace!(rows, columns = row.cells.len(), "traversed table");
    sink.table_rows_end();

    if let Some(caption) = caption {
        sink.table_caption_start();
        scanner.scan(caption, sink)?;
        sink.table_caption_end();
    }

    sink.table_end();
    Ok(())
}

/// Column justifications of a separator line, read from its third character
/// on: `*` center, `+` left, `:` right.
pub(crate) fn parse_justification(line: &str) -> Result<Vec<Justification>, Error> {
    let justification: Vec<Justification> = line
        .chars()
        .skip(2)
        .filter_map(Justification::from_marker)
        .collect();
    if justification.is_empty() {
        return Err(Error::NoColumns);
    }
    Ok(justification)
}

/// Splits `line` on `|`, keeping each `|` as its own token. Empty pieces
/// between pipes are dropped.
fn tokens(line: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut start = 0;
    for (i, _) in line.match_indices('|') {
        if i > start {
            tokens.extend(line.get(start..i));
        }
        tokens.push("|");
        start = i + 1;
    }
    if start < line.len() {
        tokens.extend(line.get(start..));
    }
    tokens
}

/// Rewrites the backslashes of a cell fragment: escapes of markup characters
/// (and `\u` escapes) are kept, every other backslash becomes a
/// non-breaking space escape.
fn escape_fragment(fragment: &str) -> String {
    let mut escaped = String::with_capacity(fragment.len());
    let mut chars = fragment.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            escaped.push(c);
            continue;
        }
        match chars.peek() {
            Some(
                &next @ ('~' | '=' | '-' | '+' | '*' | '[' | ']' | '<' | '>' | '{' | '}' | 'u'
                | '\\'),
            ) => {
                escaped.push('\\');
                escaped.push(next);
                chars.next();
            }
            _ => escaped.push_str(ESCAPED_NBSP),
        }
    }
    escaped
}

/// Trims spaces and control characters from both ends.
fn trim_control(text: &str) -> &str {
    text.trim_matches(|c: char| c <= ' ')
}
