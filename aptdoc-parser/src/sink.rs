//! The event interface the parser drives.
//!
//! A [`Sink`] receives the document as a flat stream of paired `*_start` /
//! `*_end` calls mirroring the document structure, interleaved with leaf events
//! such as [`Sink::text`] or [`Sink::horizontal_rule`]. The parser guarantees
//! strict nesting: every `*_start` is matched by the corresponding `*_end`
//! before its enclosing construct is closed, and context-dependent calls only
//! happen in their context (`table_cell_start` only inside a table row,
//! `defined_term_start` only inside a definition list item, and so on).
//!
//! # Document Structure
//!
//! 1. `head_start()`, then `title_*`, `author_*`, `date_*` if the document has a
//!    header block, then `head_end()`
//! 2. `body_start()`
//! 3. Top-level blocks, then `section_start(1)` ... `section_end(1)` for each
//!    top-level section, with deeper sections nested inside
//! 4. `body_end()`
//!
//! Every method has a default no-op implementation, so a sink only implements
//! the events it cares about.
//!
//! # Errors
//!
//! Sink methods are infallible. Sinks that write to fallible outputs buffer
//! their output, or record the first failure and report it once parsing is
//! done. The parser does not roll back events already delivered when a parse
//! error occurs.

use crate::model::{Justification, Numbering, SectionLevel};

/// Receiver of structural document events.
#[allow(unused_variables)]
pub trait Sink {
    /// Opens the document header. Always called, even without a title block.
    fn head_start(&mut self) {}
    fn head_end(&mut self) {}

    fn title_start(&mut self) {}
    fn title_end(&mut self) {}

    fn author_start(&mut self) {}
    fn author_end(&mut self) {}

    fn date_start(&mut self) {}
    fn date_end(&mut self) {}

    fn body_start(&mut self) {}
    fn body_end(&mut self) {}

    /// Opens a section. `level` is between 1 and 5 and increases by exactly
    /// one for each nested section.
    fn section_start(&mut self, level: SectionLevel) {}
    fn section_end(&mut self, level: SectionLevel) {}

    /// Opens the title of the section at `level`; only called directly after
    /// [`Sink::section_start`].
    fn section_title_start(&mut self, level: SectionLevel) {}
    fn section_title_end(&mut self, level: SectionLevel) {}

    fn paragraph_start(&mut self) {}
    fn paragraph_end(&mut self) {}

    /// Opens a verbatim (preformatted) block. The content arrives as a single
    /// [`Sink::text`] call with line separators preserved and tabs expanded.
    fn verbatim_start(&mut self, boxed: bool) {}
    fn verbatim_end(&mut self) {}

    fn list_start(&mut self) {}
    fn list_end(&mut self) {}
    fn list_item_start(&mut self) {}
    fn list_item_end(&mut self) {}

    /// Opens a numbered list. The numbering is fixed by the first item.
    fn numbered_list_start(&mut self, numbering: Numbering) {}
    fn numbered_list_end(&mut self) {}
    fn numbered_list_item_start(&mut self) {}
    fn numbered_list_item_end(&mut self) {}

    fn definition_list_start(&mut self) {}
    fn definition_list_end(&mut self) {}
    fn definition_list_item_start(&mut self) {}
    fn definition_list_item_end(&mut self) {}
    fn defined_term_start(&mut self) {}
    fn defined_term_end(&mut self) {}
    fn definition_start(&mut self) {}
    fn definition_end(&mut self) {}

    fn figure_start(&mut self) {}
    fn figure_end(&mut self) {}
    /// The raw image reference of a figure, without inline processing.
    fn figure_graphics(&mut self, source: &str) {}
    fn figure_caption_start(&mut self) {}
    fn figure_caption_end(&mut self) {}

    fn table_start(&mut self) {}
    fn table_end(&mut self) {}
    /// Opens the row group of a table with one justification per column.
    /// `grid` is true when cells are framed by `|` on both sides.
    fn table_rows_start(&mut self, justification: &[Justification], grid: bool) {}
    fn table_rows_end(&mut self) {}
    fn table_row_start(&mut self) {}
    fn table_row_end(&mut self) {}
    fn table_cell_start(&mut self, justification: Justification) {}
    fn table_cell_end(&mut self) {}
    fn table_header_cell_start(&mut self, justification: Justification) {}
    fn table_header_cell_end(&mut self) {}
    fn table_caption_start(&mut self) {}
    fn table_caption_end(&mut self) {}

    fn horizontal_rule(&mut self) {}
    fn page_break(&mut self) {}

    /// Opens an anchor. `name` is already a valid identifier.
    fn anchor_start(&mut self, name: &str) {}
    fn anchor_end(&mut self) {}
    /// Opens a link. Internal targets start with `#`.
    fn link_start(&mut self, target: &str) {}
    fn link_end(&mut self) {}

    fn italic_start(&mut self) {}
    fn italic_end(&mut self) {}
    fn bold_start(&mut self) {}
    fn bold_end(&mut self) {}
    fn monospaced_start(&mut self) {}
    fn monospaced_end(&mut self) {}

    fn line_break(&mut self) {}
    fn non_breaking_space(&mut self) {}
    fn text(&mut self, text: &str) {}

    /// A `~~` comment line. Only delivered when comment emission is enabled
    /// in the parser options.
    fn comment(&mut self, comment: &str) {}
}
