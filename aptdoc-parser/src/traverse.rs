//! Recursive descent over the block stream: head, body, sections and lists.

use std::mem;

use crate::{
    Error, MAX_SECTION_LEVEL, Options, SectionLevel, Sink,
    block::{Block, BlockKind},
    cursor::Cursor,
    diagnostics::Diagnostics,
    error::SourceLocation,
    inline::{InlineScanner, is_breaking_whitespace},
    table::traverse_table,
};

const HEADER_SEPARATOR: &str = "---";

/// Drives one parse: pulls blocks from the cursor and emits their events.
pub(crate) struct Traverser<'o, 's> {
    cursor: Cursor<'s>,
    options: &'o Options,
    diagnostics: Diagnostics,
    depth: usize,
}

impl<'o, 's> Traverser<'o, 's> {
    pub(crate) fn new(cursor: Cursor<'s>, options: &'o Options) -> Self {
        Self {
            cursor,
            options,
            diagnostics: Diagnostics::default(),
            depth: 0,
        }
    }

    pub(crate) fn location(&self) -> SourceLocation {
        self.cursor.location()
    }

    pub(crate) fn into_diagnostics(self) -> Diagnostics {
        self.diagnostics
    }

    /// Traverses the whole document: head, then body.
    pub(crate) fn document(&mut self, sink: &mut dyn Sink) -> Result<(), Error> {
        self.cursor.next_line()?;
        self.cursor.advance(true)?;
        self.flush_comments(sink);
        self.head(sink)?;
        self.body(sink)
    }

    fn advance(&mut self, sink: &mut dyn Sink) -> Result<(), Error> {
        self.cursor.advance(false)?;
        self.flush_comments(sink);
        Ok(())
    }

    fn flush_comments(&mut self, sink: &mut dyn Sink) {
        for comment in self.cursor.take_comments() {
            sink.comment(&comment);
        }
    }

    fn enter(&mut self) -> Result<(), Error> {
        self.depth += 1;
        match self.options.max_nesting_depth {
            Some(max) if self.depth > max => Err(Error::NestingTooDeep(max)),
            Some(_) | None => Ok(()),
        }
    }

    fn leave(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    fn scan(&mut self, text: &str, sink: &mut dyn Sink) -> Result<(), Error> {
        InlineScanner::new(self.options.strict, &mut self.diagnostics).scan(text, sink)
    }

    fn head(&mut self, sink: &mut dyn Sink) -> Result<(), Error> {
        sink.head_start();
        if self.cursor.kind() == Some(BlockKind::Title)
            && let Some(block) = self.cursor.take()
        {
            self.title(&block.text, sink)?;
            self.advance(sink)?;
        }
        sink.head_end();
        Ok(())
    }

    /// The header block: title, author and date, each introduced by a line
    /// starting with `---`. Lines within one part are separated by line breaks.
    fn title(&mut self, text: &str, sink: &mut dyn Sink) -> Result<(), Error> {
        let mut separators = 0;
        let mut first_line = true;
        let (mut title, mut author, mut date) = (false, false, false);

        for line in text.lines().map(trim_control) {
            if line.starts_with(HEADER_SEPARATOR) {
                match separators {
                    1 if title => sink.title_end(),
                    1 => return Err(Error::MissingTitle),
                    2 if author => sink.author_end(),
                    // A decorative line after the date is allowed.
                    3.. => break,
                    _ => {}
                }
                separators += 1;
                first_line = true;
                continue;
            }

            if first_line {
                first_line = false;
                match separators {
                    1 => {
                        title = true;
                        sink.title_start();
                    }
                    2 => {
                        author = true;
                        sink.author_start();
                    }
                    3 => {
                        date = true;
                        sink.date_start();
                    }
                    _ => {}
                }
            } else {
                sink.line_break();
            }
            self.scan(line, sink)?;
        }

        match separators {
            1 if title => sink.title_end(),
            1 => return Err(Error::MissingTitle),
            2 if author => sink.author_end(),
            3 if date => sink.date_end(),
            _ => {}
        }
        Ok(())
    }

    fn body(&mut self, sink: &mut dyn Sink) -> Result<(), Error> {
        sink.body_start();
        self.section_blocks(sink)?;
        while self.cursor.block().is_some() {
            self.section(1, sink)?;
        }
        sink.body_end();
        Ok(())
    }

    /// A section at `level` and everything nested in it. The current block
    /// must be the section title of exactly that level.
    #[tracing::instrument(level = "trace", skip(self, sink))]
    fn section(&mut self, level: SectionLevel, sink: &mut dyn Sink) -> Result<(), Error> {
        let Some(kind) = self.cursor.kind() else {
            return Ok(());
        };
        let expected = BlockKind::Section(level);
        if kind != expected {
            return Err(Error::UnexpectedBlock {
                expected,
                found: kind,
            });
        }
        let Some(block) = self.cursor.take() else {
            return Ok(());
        };

        self.enter()?;
        sink.section_start(level);
        sink.section_title_start(level);
        self.scan(skip_leading_bullets(&block.text), sink)?;
        sink.section_title_end(level);
        self.advance(sink)?;

        self.section_blocks(sink)?;
        while let Some(BlockKind::Section(next)) = self.cursor.kind()
            && next > level
            && level < MAX_SECTION_LEVEL
        {
            self.section(level + 1, sink)?;
        }

        sink.section_end(level);
        self.leave();
        Ok(())
    }

    /// Content blocks up to the next section title.
    fn section_blocks(&mut self, sink: &mut dyn Sink) -> Result<(), Error> {
        while let Some(kind) = self.cursor.kind() {
            match kind {
                BlockKind::Paragraph
                | BlockKind::Verbatim { .. }
                | BlockKind::Figure
                | BlockKind::Table
                | BlockKind::HorizontalRule
                | BlockKind::PageBreak
                | BlockKind::Macro => self.leaf(sink)?,
                BlockKind::ListItem
                | BlockKind::NumberedListItem(_)
                | BlockKind::DefinitionListItem => self.list(sink)?,
                // A list break that was not indented precisely enough to end
                // any list.
                BlockKind::ListBreak => self.advance(sink)?,
                BlockKind::Title | BlockKind::Section(_) => break,
            }
        }
        Ok(())
    }

    /// A list of the kind of the current block, with all its items and
    /// nested content.
    ///
    /// The indentation of the first item anchors the list: an item of the same
    /// kind at the same indentation is a sibling, anything indented less ends
    /// the list.
    #[tracing::instrument(level = "trace", skip_all)]
    fn list(&mut self, sink: &mut dyn Sink) -> Result<(), Error> {
        let Some(first) = self.cursor.take() else {
            return Ok(());
        };
        let kind = first.kind;
        let anchor = first.indent;
        tracing::trace!(%kind, anchor, "opening list");

        self.enter()?;
        open_list(kind, sink);
        self.item(&first, sink)?;
        self.advance(sink)?;

        while let Some(block) = self.cursor.block() {
            let (next, indent) = (block.kind, block.indent);
            // Only items and paragraphs are placed by their indentation.
            if indent < anchor && (next.is_list_item() || next == BlockKind::Paragraph) {
                break;
            }
            match next {
                BlockKind::Paragraph
                | BlockKind::Verbatim { .. }
                | BlockKind::Figure
                | BlockKind::Table
                | BlockKind::HorizontalRule
                | BlockKind::PageBreak => self.leaf(sink)?,
                BlockKind::Macro if kind == BlockKind::ListItem => self.leaf(sink)?,
                BlockKind::ListItem | BlockKind::NumberedListItem(_) | BlockKind::DefinitionListItem => {
                    if indent == anchor && mem::discriminant(&next) == mem::discriminant(&kind) {
                        let Some(sibling) = self.cursor.take() else {
                            break;
                        };
                        close_item(kind, sink);
                        self.item(&sibling, sink)?;
                        self.advance(sink)?;
                    } else {
                        self.list(sink)?;
                    }
                }
                BlockKind::ListBreak => {
                    if indent >= anchor {
                        self.advance(sink)?;
                    }
                    break;
                }
                BlockKind::Macro | BlockKind::Title | BlockKind::Section(_) => break,
            }
        }

        close_item(kind, sink);
        close_list(kind, sink);
        self.leave();
        Ok(())
    }

    /// Opens a list item and emits its own text; the item stays open for
    /// continuation content.
    fn item(&mut self, block: &Block, sink: &mut dyn Sink) -> Result<(), Error> {
        match block.kind {
            BlockKind::ListItem => {
                sink.list_item_start();
                self.scan(skip_leading_bullets(&block.text), sink)
            }
            BlockKind::NumberedListItem(_) => {
                sink.numbered_list_item_start();
                let text = skip_item_number(&block.text)?;
                self.scan(text, sink)
            }
            BlockKind::DefinitionListItem => {
                sink.definition_list_item_start();
                let (term, definition) = split_bracketed(skip_space(&block.text))?;
                sink.defined_term_start();
                self.scan(term, sink)?;
                sink.defined_term_end();
                sink.definition_start();
                self.scan(skip_space(definition), sink)
            }
            BlockKind::Title
            | BlockKind::Section(_)
            | BlockKind::Paragraph
            | BlockKind::Verbatim { .. }
            | BlockKind::Figure
            | BlockKind::Table
            | BlockKind::HorizontalRule
            | BlockKind::PageBreak
            | BlockKind::ListBreak
            | BlockKind::Macro => Ok(()),
        }
    }

    /// Emits the current block, which has no nested blocks, and moves on.
    fn leaf(&mut self, sink: &mut dyn Sink) -> Result<(), Error> {
        let Some(block) = self.cursor.take() else {
            return Ok(());
        };
        match block.kind {
            BlockKind::Paragraph => {
                sink.paragraph_start();
                self.scan(skip_space(&block.text), sink)?;
                sink.paragraph_end();
            }
            BlockKind::Verbatim { boxed } => {
                sink.verbatim_start(boxed);
                if !block.text.is_empty() {
                    sink.text(&block.text);
                }
                sink.verbatim_end();
            }
            BlockKind::Figure => self.figure(&block.text, sink)?,
            BlockKind::Table => {
                let mut scanner = InlineScanner::new(self.options.strict, &mut self.diagnostics);
                traverse_table(&block.text, &mut scanner, sink)?;
            }
            BlockKind::HorizontalRule => sink.horizontal_rule(),
            BlockKind::PageBreak => sink.page_break(),
            BlockKind::Macro => self.options.macros.execute(&block.text, sink)?,
            // Structural blocks are handled by the traverser itself.
            BlockKind::Title
            | BlockKind::Section(_)
            | BlockKind::ListItem
            | BlockKind::NumberedListItem(_)
            | BlockKind::DefinitionListItem
            | BlockKind::ListBreak => {}
        }
        self.advance(sink)
    }

    /// `[source] caption`: the source is passed through raw.
    fn figure(&mut self, text: &str, sink: &mut dyn Sink) -> Result<(), Error> {
        let (source, caption) = split_bracketed(text)?;
        let caption = skip_space(caption);
        sink.figure_start();
        sink.figure_graphics(source);
        if !caption.is_empty() {
            sink.figure_caption_start();
            self.scan(caption, sink)?;
            sink.figure_caption_end();
        }
        sink.figure_end();
        Ok(())
    }
}

fn open_list(kind: BlockKind, sink: &mut dyn Sink) {
    match kind {
        BlockKind::NumberedListItem(numbering) => sink.numbered_list_start(numbering),
        BlockKind::DefinitionListItem => sink.definition_list_start(),
        BlockKind::ListItem
        | BlockKind::Title
        | BlockKind::Section(_)
        | BlockKind::Paragraph
        | BlockKind::Verbatim { .. }
        | BlockKind::Figure
        | BlockKind::Table
        | BlockKind::HorizontalRule
        | BlockKind::PageBreak
        | BlockKind::ListBreak
        | BlockKind::Macro => sink.list_start(),
    }
}

fn close_list(kind: BlockKind, sink: &mut dyn Sink) {
    match kind {
        BlockKind::NumberedListItem(_) => sink.numbered_list_end(),
        BlockKind::DefinitionListItem => sink.definition_list_end(),
        BlockKind::ListItem
        | BlockKind::Title
        | BlockKind::Section(_)
        | BlockKind::Paragraph
        | BlockKind::Verbatim { .. }
        | BlockKind::Figure
        | BlockKind::Table
        | BlockKind::HorizontalRule
        | BlockKind::PageBreak
        | BlockKind::ListBreak
        | BlockKind::Macro => sink.list_end(),
    }
}

fn close_item(kind: BlockKind, sink: &mut dyn Sink) {
    match kind {
        BlockKind::NumberedListItem(_) => sink.numbered_list_item_end(),
        BlockKind::DefinitionListItem => {
            sink.definition_end();
            sink.definition_list_item_end();
        }
        BlockKind::ListItem
        | BlockKind::Title
        | BlockKind::Section(_)
        | BlockKind::Paragraph
        | BlockKind::Verbatim { .. }
        | BlockKind::Figure
        | BlockKind::Table
        | BlockKind::HorizontalRule
        | BlockKind::PageBreak
        | BlockKind::ListBreak
        | BlockKind::Macro => sink.list_item_end(),
    }
}

fn skip_space(text: &str) -> &str {
    text.trim_start_matches(is_breaking_whitespace)
}

/// Trims spaces and control characters from both ends.
fn trim_control(text: &str) -> &str {
    text.trim_matches(|c: char| c <= ' ')
}

/// Text after leading space, any run of `*` and the space after it.
fn skip_leading_bullets(text: &str) -> &str {
    skip_space(skip_space(text).trim_start_matches('*'))
}

/// Text after the `[[...]]` marker of a numbered list item.
fn skip_item_number(text: &str) -> Result<&str, Error> {
    let text = skip_space(text);
    let end = text.find("]]").ok_or(Error::MissingMarkup("]]"))?;
    Ok(skip_space(text.get(end + 2..).unwrap_or_default()))
}

/// Splits `[inside] rest` at the first `]` not preceded by a backslash.
fn split_bracketed(text: &str) -> Result<(&str, &str), Error> {
    let inner = text.strip_prefix('[').unwrap_or(text);
    let mut previous = '[';
    for (i, c) in inner.char_indices() {
        if c == ']' && previous != '\\' {
            let rest = inner.get(i + 1..).unwrap_or_default();
            return Ok((inner.get(..i).unwrap_or_default(), rest));
        }
        previous = c;
    }
    Err(Error::MissingMarkup("]"))
}
