use crate::{
    Error, LineSource, SourceLocation,
    block::{Block, BlockKind, classify, indentation, is_verbatim_fence, push_expanded},
};

/// Lookahead state of one parse: the next unread line and the next block.
///
/// Classifying a block consumes all of its lines from the source, so at any
/// time `line` is the first line after the current `block`.
pub(crate) struct Cursor<'s> {
    source: &'s mut dyn LineSource,
    line: Option<String>,
    block: Option<Block>,
    block_line: usize,
    emit_comments: bool,
    comments: Vec<String>,
}

impl<'s> Cursor<'s> {
    /// Creates a cursor positioned before the first line of `source`.
    pub(crate) fn new(source: &'s mut dyn LineSource, emit_comments: bool) -> Self {
        Self {
            source,
            line: None,
            block: None,
            block_line: 0,
            emit_comments,
            comments: Vec::new(),
        }
    }

    pub(crate) fn block(&self) -> Option<&Block> {
        self.block.as_ref()
    }

    pub(crate) fn kind(&self) -> Option<BlockKind> {
        self.block.as_ref().map(|block| block.kind)
    }

    /// Removes the current block so it can be traversed while the cursor moves on.
    pub(crate) fn take(&mut self) -> Option<Block> {
        self.block.take()
    }

    /// Comment lines skipped since the last call.
    pub(crate) fn take_comments(&mut self) -> Vec<String> {
        std::mem::take(&mut self.comments)
    }

    /// Where the block being processed starts, or the current source position
    /// before the first block.
    pub(crate) fn location(&self) -> SourceLocation {
        let line = if self.block_line == 0 {
            self.source.line_number()
        } else {
            self.block_line
        };
        SourceLocation {
            name: self.source.name().to_string(),
            line,
        }
    }

    pub(crate) fn next_line(&mut self) -> Result<(), Error> {
        self.line = self.source.next_line()?;
        Ok(())
    }

    /// Classifies the next block, skipping blank and comment lines. Leaves no
    /// current block at end of input.
    #[tracing::instrument(level = "trace", skip(self))]
    pub(crate) fn advance(&mut self, first: bool) -> Result<(), Error> {
        self.block = None;
        while let Some(line) = self.line.take() {
            let (indent, offset) = indentation(&line);
            let content = line.get(offset..).unwrap_or_default();
            if content.is_empty() {
                self.next_line()?;
                continue;
            }
            if let Some(comment) = content.strip_prefix("~~") {
                if self.emit_comments {
                    self.comments.push(comment.trim().to_string());
                }
                self.next_line()?;
                continue;
            }

            let kind = classify(content, indent, first);
            self.block_line = self.source.line_number();
            tracing::trace!(%kind, indent, line = self.block_line, "classified block");

            let text = match kind {
                BlockKind::Verbatim { boxed } => self.read_verbatim(if boxed { '+' } else { '-' })?,
                BlockKind::Macro => {
                    self.next_line()?;
                    line
                }
                BlockKind::HorizontalRule | BlockKind::PageBreak | BlockKind::ListBreak => {
                    self.next_line()?;
                    String::new()
                }
                BlockKind::Title
                | BlockKind::Section(_)
                | BlockKind::Paragraph
                | BlockKind::Figure
                | BlockKind::Table
                | BlockKind::ListItem
                | BlockKind::NumberedListItem(_)
                | BlockKind::DefinitionListItem => self.read_body(line)?,
            };
            self.block = Some(Block {
                kind,
                indent,
                text,
                line: self.block_line,
            });
            break;
        }
        Ok(())
    }

    /// Accumulates lines after `first_line` until a blank line, which is
    /// consumed, or a comment line, which is left for [`Cursor::advance`].
    fn read_body(&mut self, first_line: String) -> Result<String, Error> {
        let mut text = first_line;
        self.next_line()?;
        while let Some(line) = self.line.take() {
            let content = line.trim_start_matches([' ', '\t']);
            if content.is_empty() {
                self.next_line()?;
                break;
            }
            if content.starts_with("~~") {
                self.line = Some(line);
                break;
            }
            text.push('\n');
            text.push_str(&line);
            self.next_line()?;
        }
        Ok(text)
    }

    /// Accumulates every line up to the closing fence, which is consumed.
    /// An unterminated verbatim block runs to the end of input.
    fn read_verbatim(&mut self, delimiter: char) -> Result<String, Error> {
        let mut text = String::new();
        self.next_line()?;
        while let Some(line) = self.line.take() {
            self.next_line()?;
            if is_verbatim_fence(&line, delimiter) {
                break;
            }
            push_expanded(&mut text, &line);
            text.push('\n');
        }
        if text.ends_with('\n') {
            text.pop();
        }
        Ok(text)
    }
}
