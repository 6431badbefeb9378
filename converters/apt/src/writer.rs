//! A [`Sink`] that writes canonical APT.
//!
//! Every construct is written in one fixed form: header parts between
//! ` -----` lines, one space of indentation for top-level paragraphs, list
//! items two columns deeper than their parent, every list closed with `[]`,
//! boxed tables with one separator line per row. Text is escaped so that
//! parsing the output gives back the events that produced it.

use std::mem;

use aptdoc_parser::{Justification, Numbering, SectionLevel, Sink, is_external_link, is_valid_id};

const HEADER_SEPARATOR: &str = " -----";
const BOXED_FENCE: &str = "+------------------------------------------+";
const PLAIN_FENCE: &str = "------------------------------------------";
const HORIZONTAL_RULE: &str = "========================================";
const PAGE_BREAK: &str = "\u{c}";

/// Characters the inline scanner reads as markup anywhere.
const INLINE_MARKUP: [char; 5] = ['\\', '<', '>', '{', '}'];
/// Characters that change the meaning of a line they start.
const LINE_MARKUP: [char; 6] = ['*', '[', '-', '+', '=', '~'];
/// Everything with a meaning inside a table block, where `*--` and `|`
/// are read before any inline markup.
const TABLE_MARKUP: [char; 13] = [
    '\\', '~', '=', '-', '+', '*', '[', ']', '<', '>', '{', '}', '|',
];

/// Where escaped text is going.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Context {
    Block,
    Term,
    Table,
}

#[derive(Debug, Clone, Copy)]
struct List {
    /// Column of the item markers.
    anchor: usize,
    numbering: Numbering,
}

#[derive(Debug, Default)]
struct Cell {
    header: bool,
    justification: Justification,
    /// Escaped content; `\n` separates the lines of a multi-line cell.
    text: String,
}

impl Cell {
    fn fragments(&self) -> Vec<&str> {
        self.text.split('\n').collect()
    }
}

#[derive(Debug, Default)]
struct Table {
    justification: Vec<Justification>,
    grid: bool,
    rows: Vec<Vec<Cell>>,
    row: Vec<Cell>,
    cell: Option<Cell>,
    caption: Option<String>,
}

impl Table {
    fn render(&self, out: &mut String) {
        let columns = self
            .rows
            .iter()
            .map(Vec::len)
            .chain([self.justification.len(), 1])
            .max()
            .unwrap_or(1);

        let mut widths = vec![1; columns];
        for row in &self.rows {
            for (cell, width) in row.iter().zip(widths.iter_mut()) {
                let fragments = cell.fragments();
                for (i, fragment) in fragments.iter().enumerate() {
                    // Broken lines end with a backslash.
                    let broken = usize::from(i + 1 < fragments.len());
                    *width = (*width).max(fragment.chars().count() + broken);
                }
            }
        }

        // A header in the first column needs a leading pipe.
        let grid = self.grid
            || self
                .rows
                .iter()
                .any(|row| row.first().is_some_and(|cell| cell.header));

        push_separator(out, &self.justification, &widths);
        for (i, row) in self.rows.iter().enumerate() {
            let fragments: Vec<Vec<&str>> = row.iter().map(Cell::fragments).collect();
            let lines = fragments.iter().map(Vec::len).max().unwrap_or(1);
            for line in 0..lines {
                push_row_line(out, row, &fragments, line, &widths, grid);
            }
            let below: Vec<Justification> = self.rows.get(i + 1).map_or_else(
                || self.justification.clone(),
                |next| next.iter().map(|cell| cell.justification).collect(),
            );
            push_separator(out, &below, &widths);
        }

        if let Some(caption) = &self.caption
            && !caption.is_empty()
        {
            out.push_str(caption);
            out.push('\n');
        }
    }
}

fn push_separator(out: &mut String, justification: &[Justification], widths: &[usize]) {
    out.push('*');
    for (i, width) in widths.iter().enumerate() {
        out.push_str(&"-".repeat(width + 2));
        out.push(justification.get(i).copied().unwrap_or_default().marker());
    }
    out.push('\n');
}

fn push_row_line(
    out: &mut String,
    row: &[Cell],
    fragments: &[Vec<&str>],
    line: usize,
    widths: &[usize],
    grid: bool,
) {
    for (column, width) in widths.iter().enumerate() {
        let cell = row.get(column);
        let cell_fragments = fragments.get(column);
        let mut fragment = cell_fragments
            .and_then(|f| f.get(line))
            .copied()
            .unwrap_or_default()
            .to_string();
        if cell_fragments.is_some_and(|f| line + 1 < f.len()) {
            fragment.push('\\');
        }

        if grid || column > 0 {
            out.push_str(if cell.is_some_and(|c| c.header) { "||" } else { "|" });
        }
        out.push(' ');
        let justification = cell.map(|c| c.justification).unwrap_or_default();
        out.push_str(&pad(&fragment, *width, justification));
        out.push(' ');
    }
    if grid {
        out.push('|');
    }
    out.push('\n');
}

fn pad(text: &str, width: usize, justification: Justification) -> String {
    let fill = width.saturating_sub(text.chars().count());
    let (left, right) = match justification {
        Justification::Left => (0, fill),
        Justification::Right => (fill, 0),
        Justification::Center => (fill / 2, fill - fill / 2),
    };
    format!("{}{text}{}", " ".repeat(left), " ".repeat(right))
}

/// Appends `text` to `out` with the characters that would be read as markup
/// in `context` escaped. `line_start` is whether nothing but indentation or a
/// block marker precedes it on its line. Line separators become spaces, the
/// way the parser reads them.
fn push_escaped(out: &mut String, text: &str, context: Context, mut line_start: bool) {
    let column_zero = out.is_empty() || out.ends_with('\n');

    for c in text.chars() {
        match c {
            '\n' | '\r' | '\t' => out.push(' '),
            // `%{` opens a macro at the start of a top-level block.
            '%' if column_zero && line_start => out.push_str("\\x25"),
            c if INLINE_MARKUP.contains(&c)
                || (line_start && LINE_MARKUP.contains(&c))
                || (context == Context::Term && c == ']')
                || (context == Context::Table && TABLE_MARKUP.contains(&c)) =>
            {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }
        line_start = false;
    }
}

/// The target as it must be written so the parser gives it back unchanged:
/// a fragment that would otherwise be rewritten into an id is marked as
/// literal with a second `#`.
fn literal_target(target: &str) -> String {
    if target.starts_with('#') || is_external_link(target) {
        return target.to_string();
    }
    match target.split_once('#') {
        Some((path, fragment)) if fragment.starts_with('#') || !is_valid_id(fragment) => {
            format!("{path}##{fragment}")
        }
        Some(_) | None => target.to_string(),
    }
}

/// Writes the events it receives as APT text.
///
/// ```
/// use aptdoc_converters_apt::AptWriter;
/// use aptdoc_parser::{Options, parse};
///
/// # fn main() -> Result<(), aptdoc_parser::Error> {
/// let mut writer = AptWriter::new();
/// parse("Section\n\n  *   item", &Options::default(), &mut writer)?;
/// assert_eq!(writer.into_string(), "Section\n\n * item\n\n []\n");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct AptWriter {
    out: String,
    /// The block being composed: the prefix of its first line, then its
    /// escaped inline content.
    block: Option<String>,
    /// Indentation of the lines following a line break in `block`.
    continuation: usize,
    lists: Vec<List>,
    verbatim: Option<(bool, String)>,
    table: Option<Table>,
    header_parts: usize,
    in_head: bool,
    in_term: bool,
    /// Whether the next inline content starts a line.
    line_start: bool,
    embedded: bool,
    generator: Option<String>,
}

impl AptWriter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Leave out the document header.
    #[must_use]
    pub fn embedded(mut self, embedded: bool) -> Self {
        self.embedded = embedded;
        self
    }

    /// Name the tool that wrote the document in a leading comment.
    #[must_use]
    pub fn with_generator(mut self, generator: impl Into<String>) -> Self {
        self.generator = Some(generator.into());
        self
    }

    /// The APT written so far, with any block still open completed.
    #[must_use]
    pub fn into_string(mut self) -> String {
        self.close_block();
        self.out
    }

    /// Indentation of paragraphs at the current list depth.
    fn indent(&self) -> usize {
        self.lists.last().map_or(1, |list| list.anchor + 2)
    }

    /// Ensures a blank line before the next block.
    fn separate(&mut self) {
        if !self.out.is_empty() && !self.out.ends_with("\n\n") {
            self.out.push('\n');
        }
    }

    fn open_block(&mut self, prefix: String, continuation: usize) {
        self.close_block();
        self.separate();
        self.block = Some(prefix);
        self.continuation = continuation;
        self.line_start = true;
    }

    fn close_block(&mut self) {
        if let Some(block) = self.block.take() {
            self.out.push_str(&block);
            self.out.push('\n');
        }
    }

    fn inline(&mut self) -> &mut String {
        self.target().0
    }

    /// Where inline content currently goes, and whether it starts a line.
    /// Inline content outside any block opens a paragraph.
    fn target(&mut self) -> (&mut String, bool) {
        let in_table = self
            .table
            .as_ref()
            .is_some_and(|table| table.cell.is_some() || table.caption.is_some());
        if !in_table && self.block.is_none() {
            let indent = self.indent();
            self.open_block(" ".repeat(indent), indent);
        }
        let Self {
            table,
            block,
            line_start,
            ..
        } = self;
        let target = match table {
            Some(Table {
                cell: Some(cell), ..
            }) => &mut cell.text,
            Some(Table {
                caption: Some(caption),
                ..
            }) => caption,
            Some(Table {
                cell: None,
                caption: None,
                ..
            })
            | None => block.get_or_insert_with(String::new),
        };
        (target, mem::take(line_start))
    }

    fn context(&self) -> Context {
        if self.table.is_some() {
            Context::Table
        } else if self.in_term {
            Context::Term
        } else {
            Context::Block
        }
    }

    fn in_cell(&self) -> bool {
        self.table.as_ref().is_some_and(|table| table.cell.is_some())
    }

    fn start_header_part(&mut self, part: usize) {
        if self.embedded {
            self.block = Some(String::new());
            return;
        }
        self.close_block();
        if self.header_parts == 0 {
            self.separate();
        }
        while self.header_parts < part {
            self.out.push_str(HEADER_SEPARATOR);
            self.out.push('\n');
            self.header_parts += 1;
        }
        self.block = Some(" ".to_string());
        self.continuation = 1;
        self.line_start = true;
    }

    fn end_header_part(&mut self) {
        if self.embedded {
            self.block = None;
        } else {
            self.close_block();
        }
    }

    fn open_list(&mut self, numbering: Numbering) {
        self.close_block();
        let anchor = self.lists.last().map_or(1, |list| list.anchor + 2);
        self.lists.push(List { anchor, numbering });
    }

    fn close_list(&mut self) {
        self.close_block();
        if let Some(list) = self.lists.pop() {
            self.separate();
            self.out.push_str(&" ".repeat(list.anchor));
            self.out.push_str("[]\n");
        }
    }

    fn open_item(&mut self, marker: &str) {
        let anchor = self.lists.last().map_or(1, |list| list.anchor);
        self.open_block(format!("{}{marker}", " ".repeat(anchor)), anchor + 2);
    }

    fn leaf(&mut self, line: &str) {
        self.close_block();
        self.separate();
        self.out.push_str(line);
        self.out.push('\n');
    }
}

impl Sink for AptWriter {
    fn head_start(&mut self) {
        self.in_head = true;
        if !self.embedded
            && let Some(generator) = &self.generator
        {
            self.out.push_str(&format!("~~ Generated by {generator}\n"));
        }
    }

    fn head_end(&mut self) {
        if self.header_parts > 0 {
            self.out.push_str(HEADER_SEPARATOR);
            self.out.push('\n');
        }
        self.in_head = false;
    }

    fn title_start(&mut self) {
        self.start_header_part(1);
    }

    fn title_end(&mut self) {
        self.end_header_part();
    }

    fn author_start(&mut self) {
        self.start_header_part(2);
    }

    fn author_end(&mut self) {
        self.end_header_part();
    }

    fn date_start(&mut self) {
        self.start_header_part(3);
    }

    fn date_end(&mut self) {
        self.end_header_part();
    }

    fn body_end(&mut self) {
        self.close_block();
    }

    fn section_title_start(&mut self, level: SectionLevel) {
        let stars = usize::from(level.saturating_sub(1));
        let prefix = if stars == 0 {
            String::new()
        } else {
            format!("{} ", "*".repeat(stars))
        };
        self.open_block(prefix, 0);
    }

    fn section_title_end(&mut self, _level: SectionLevel) {
        self.close_block();
    }

    fn paragraph_start(&mut self) {
        let indent = self.indent();
        self.open_block(" ".repeat(indent), indent);
    }

    fn paragraph_end(&mut self) {
        self.close_block();
    }

    fn verbatim_start(&mut self, boxed: bool) {
        self.close_block();
        self.separate();
        self.verbatim = Some((boxed, String::new()));
    }

    fn verbatim_end(&mut self) {
        if let Some((boxed, text)) = self.verbatim.take() {
            let fence = if boxed { BOXED_FENCE } else { PLAIN_FENCE };
            self.out.push_str(fence);
            self.out.push('\n');
            // The parser drops the line separator before the closing fence.
            if !text.is_empty() {
                self.out.push_str(&text);
                self.out.push('\n');
            }
            self.out.push_str(fence);
            self.out.push('\n');
        }
    }

    fn list_start(&mut self) {
        self.open_list(Numbering::Decimal);
    }

    fn list_end(&mut self) {
        self.close_list();
    }

    fn list_item_start(&mut self) {
        self.open_item("* ");
    }

    fn list_item_end(&mut self) {
        self.close_block();
    }

    fn numbered_list_start(&mut self, numbering: Numbering) {
        self.open_list(numbering);
    }

    fn numbered_list_end(&mut self) {
        self.close_list();
    }

    fn numbered_list_item_start(&mut self) {
        let marker = self
            .lists
            .last()
            .map_or(Numbering::Decimal, |list| list.numbering)
            .marker();
        self.open_item(&format!("[[{marker}]] "));
    }

    fn numbered_list_item_end(&mut self) {
        self.close_block();
    }

    fn definition_list_start(&mut self) {
        self.open_list(Numbering::Decimal);
    }

    fn definition_list_end(&mut self) {
        self.close_list();
    }

    fn definition_list_item_end(&mut self) {
        self.close_block();
    }

    fn defined_term_start(&mut self) {
        self.open_item("[");
        self.in_term = true;
    }

    fn defined_term_end(&mut self) {
        self.in_term = false;
        self.inline().push_str("] ");
    }

    fn definition_end(&mut self) {
        self.close_block();
    }

    fn figure_start(&mut self) {
        self.open_block(String::new(), 0);
    }

    fn figure_graphics(&mut self, source: &str) {
        let block = self.block.get_or_insert_with(String::new);
        block.push('[');
        block.push_str(source);
        block.push(']');
    }

    fn figure_caption_start(&mut self) {
        self.inline().push(' ');
    }

    fn figure_end(&mut self) {
        self.close_block();
    }

    fn table_start(&mut self) {
        self.close_block();
        self.separate();
        self.table = Some(Table::default());
    }

    fn table_rows_start(&mut self, justification: &[Justification], grid: bool) {
        if let Some(table) = &mut self.table {
            table.justification = justification.to_vec();
            table.grid = grid;
        }
    }

    fn table_row_start(&mut self) {
        if let Some(table) = &mut self.table {
            table.row.clear();
        }
    }

    fn table_row_end(&mut self) {
        if let Some(table) = &mut self.table {
            let row = mem::take(&mut table.row);
            table.rows.push(row);
        }
    }

    fn table_cell_start(&mut self, justification: Justification) {
        if let Some(table) = &mut self.table {
            table.cell = Some(Cell {
                header: false,
                justification,
                text: String::new(),
            });
        }
        self.line_start = true;
    }

    fn table_cell_end(&mut self) {
        if let Some(table) = &mut self.table
            && let Some(cell) = table.cell.take()
        {
            table.row.push(cell);
        }
    }

    fn table_header_cell_start(&mut self, justification: Justification) {
        if let Some(table) = &mut self.table {
            table.cell = Some(Cell {
                header: true,
                justification,
                text: String::new(),
            });
        }
        self.line_start = true;
    }

    fn table_header_cell_end(&mut self) {
        self.table_cell_end();
    }

    fn table_caption_start(&mut self) {
        if let Some(table) = &mut self.table {
            table.caption = Some(String::new());
        }
        self.line_start = true;
    }

    fn table_end(&mut self) {
        if let Some(table) = self.table.take() {
            table.render(&mut self.out);
        }
    }

    fn horizontal_rule(&mut self) {
        self.leaf(HORIZONTAL_RULE);
    }

    fn page_break(&mut self) {
        self.leaf(PAGE_BREAK);
    }

    fn anchor_start(&mut self, _name: &str) {
        self.inline().push('{');
    }

    fn anchor_end(&mut self) {
        self.inline().push('}');
    }

    fn link_start(&mut self, target: &str) {
        let inline = self.inline();
        inline.push_str("{{{");
        for c in literal_target(target).chars() {
            if matches!(c, '\\' | '}') {
                inline.push('\\');
            }
            inline.push(c);
        }
        inline.push('}');
    }

    fn link_end(&mut self) {
        self.inline().push_str("}}");
    }

    fn italic_start(&mut self) {
        self.inline().push('<');
    }

    fn italic_end(&mut self) {
        self.inline().push('>');
    }

    fn bold_start(&mut self) {
        self.inline().push_str("<<");
    }

    fn bold_end(&mut self) {
        self.inline().push_str(">>");
    }

    fn monospaced_start(&mut self) {
        self.inline().push_str("<<<");
    }

    fn monospaced_end(&mut self) {
        self.inline().push_str(">>>");
    }

    fn line_break(&mut self) {
        if self.in_cell() {
            // The `\` ending the cell line brings the non-breaking space back.
            let text = self.inline();
            if text.ends_with('\u{a0}') {
                text.pop();
            }
            text.push('\n');
            self.line_start = true;
        } else if self.in_head {
            let indent = " ".repeat(self.continuation);
            let text = self.inline();
            text.push('\n');
            text.push_str(&indent);
            self.line_start = true;
        } else {
            let indent = " ".repeat(self.continuation);
            let text = self.inline();
            text.push_str("\\\n");
            text.push_str(&indent);
            self.line_start = true;
        }
    }

    fn non_breaking_space(&mut self) {
        if self.in_cell() {
            self.inline().push('\u{a0}');
        } else {
            self.inline().push_str("\\ ");
        }
    }

    fn text(&mut self, text: &str) {
        if let Some((_, verbatim)) = &mut self.verbatim {
            verbatim.push_str(text);
        } else {
            let context = self.context();
            let (target, line_start) = self.target();
            push_escaped(target, text, context, line_start);
        }
    }

    fn comment(&mut self, comment: &str) {
        self.close_block();
        self.out.push_str("~~ ");
        self.out.push_str(&comment.replace(['\r', '\n'], " "));
        self.out.push('\n');
    }
}
