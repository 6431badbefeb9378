use serde::{Deserialize, Serialize};

use crate::{
    model::{Justification, Numbering, SectionLevel},
    sink::Sink,
};

/// One [`Sink`] call, as data.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "kebab-case")]
pub enum Event {
    HeadStart,
    HeadEnd,
    TitleStart,
    TitleEnd,
    AuthorStart,
    AuthorEnd,
    DateStart,
    DateEnd,
    BodyStart,
    BodyEnd,
    SectionStart { level: SectionLevel },
    SectionEnd { level: SectionLevel },
    SectionTitleStart { level: SectionLevel },
    SectionTitleEnd { level: SectionLevel },
    ParagraphStart,
    ParagraphEnd,
    VerbatimStart { boxed: bool },
    VerbatimEnd,
    ListStart,
    ListEnd,
    ListItemStart,
    ListItemEnd,
    NumberedListStart { numbering: Numbering },
    NumberedListEnd,
    NumberedListItemStart,
    NumberedListItemEnd,
    DefinitionListStart,
    DefinitionListEnd,
    DefinitionListItemStart,
    DefinitionListItemEnd,
    DefinedTermStart,
    DefinedTermEnd,
    DefinitionStart,
    DefinitionEnd,
    FigureStart,
    FigureEnd,
    FigureGraphics { source: String },
    FigureCaptionStart,
    FigureCaptionEnd,
    TableStart,
    TableEnd,
    TableRowsStart {
        justification: Vec<Justification>,
        grid: bool,
    },
    TableRowsEnd,
    TableRowStart,
    TableRowEnd,
    TableCellStart { justification: Justification },
    TableCellEnd,
    TableHeaderCellStart { justification: Justification },
    TableHeaderCellEnd,
    TableCaptionStart,
    TableCaptionEnd,
    HorizontalRule,
    PageBreak,
    AnchorStart { name: String },
    AnchorEnd,
    LinkStart { target: String },
    LinkEnd,
    ItalicStart,
    ItalicEnd,
    BoldStart,
    BoldEnd,
    MonospacedStart,
    MonospacedEnd,
    LineBreak,
    NonBreakingSpace,
    Text { text: String },
    Comment { comment: String },
}

impl Event {
    /// `Some(1)` for events opening a construct, `Some(-1)` for events closing
    /// one, `None` for leaf events.
    #[must_use]
    pub fn nesting(&self) -> Option<i8> {
        match self {
            Self::HeadStart
            | Self::TitleStart
            | Self::AuthorStart
            | Self::DateStart
            | Self::BodyStart
            | Self::SectionStart { .. }
            | Self::SectionTitleStart { .. }
            | Self::ParagraphStart
            | Self::VerbatimStart { .. }
            | Self::ListStart
            | Self::ListItemStart
            | Self::NumberedListStart { .. }
            | Self::NumberedListItemStart
            | Self::DefinitionListStart
            | Self::DefinitionListItemStart
            | Self::DefinedTermStart
            | Self::DefinitionStart
            | Self::FigureStart
            | Self::FigureCaptionStart
            | Self::TableStart
            | Self::TableRowsStart { .. }
            | Self::TableRowStart
            | Self::TableCellStart { .. }
            | Self::TableHeaderCellStart { .. }
            | Self::TableCaptionStart
            | Self::AnchorStart { .. }
            | Self::LinkStart { .. }
            | Self::ItalicStart
            | Self::BoldStart
            | Self::MonospacedStart => Some(1),
            Self::HeadEnd
            | Self::TitleEnd
            | Self::AuthorEnd
            | Self::DateEnd
            | Self::BodyEnd
            | Self::SectionEnd { .. }
            | Self::SectionTitleEnd { .. }
            | Self::ParagraphEnd
            | Self::VerbatimEnd
            | Self::ListEnd
            | Self::ListItemEnd
            | Self::NumberedListEnd
            | Self::NumberedListItemEnd
            | Self::DefinitionListEnd
            | Self::DefinitionListItemEnd
            | Self::DefinedTermEnd
            | Self::DefinitionEnd
            | Self::FigureEnd
            | Self::FigureCaptionEnd
            | Self::TableEnd
            | Self::TableRowsEnd
            | Self::TableRowEnd
            | Self::TableCellEnd
            | Self::TableHeaderCellEnd
            | Self::TableCaptionEnd
            | Self::AnchorEnd
            | Self::LinkEnd
            | Self::ItalicEnd
            | Self::BoldEnd
            | Self::MonospacedEnd => Some(-1),
            Self::FigureGraphics { .. }
            | Self::HorizontalRule
            | Self::PageBreak
            | Self::LineBreak
            | Self::NonBreakingSpace
            | Self::Text { .. }
            | Self::Comment { .. } => None,
        }
    }
}

/// A [`Sink`] that records every call as an [`Event`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EventRecorder {
    events: Vec<Event>,
}

impl EventRecorder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    #[must_use]
    pub fn into_events(self) -> Vec<Event> {
        self.events
    }

    /// Replays the recorded events into another sink.
    pub fn replay(&self, sink: &mut dyn Sink) {
        for event in &self.events {
            event.deliver(sink);
        }
    }

    fn push(&mut self, event: Event) {
        self.events.push(event);
    }
}

impl Event {
    /// Makes the [`Sink`] call this event stands for.
    pub fn deliver(&self, sink: &mut dyn Sink) {
        match self {
            Self::HeadStart => sink.head_start(),
            Self::HeadEnd => sink.head_end(),
            Self::TitleStart => sink.title_start(),
            Self::TitleEnd => sink.title_end(),
            Self::AuthorStart => sink.author_start(),
            Self::AuthorEnd => sink.author_end(),
            Self::DateStart => sink.date_start(),
            Self::DateEnd => sink.date_end(),
            Self::BodyStart => sink.body_start(),
            Self::BodyEnd => sink.body_end(),
            Self::SectionStart { level } => sink.section_start(*level),
            Self::SectionEnd { level } => sink.section_end(*level),
            Self::SectionTitleStart { level } => sink.section_title_start(*level),
            Self::SectionTitleEnd { level } => sink.section_title_end(*level),
            Self::ParagraphStart => sink.paragraph_start(),
            Self::ParagraphEnd => sink.paragraph_end(),
            Self::VerbatimStart { boxed } => sink.verbatim_start(*boxed),
            Self::VerbatimEnd => sink.verbatim_end(),
            Self::ListStart => sink.list_start(),
            Self::ListEnd => sink.list_end(),
            Self::ListItemStart => sink.list_item_start(),
            Self::ListItemEnd => sink.list_item_end(),
            Self::NumberedListStart { numbering } => sink.numbered_list_start(*numbering),
            Self::NumberedListEnd => sink.numbered_list_end(),
            Self::NumberedListItemStart => sink.numbered_list_item_start(),
            Self::NumberedListItemEnd => sink.numbered_list_item_end(),
            Self::DefinitionListStart => sink.definition_list_start(),
            Self::DefinitionListEnd => sink.definition_list_end(),
            Self::DefinitionListItemStart => sink.definition_list_item_start(),
            Self::DefinitionListItemEnd => sink.definition_list_item_end(),
            Self::DefinedTermStart => sink.defined_term_start(),
            Self::DefinedTermEnd => sink.defined_term_end(),
            Self::DefinitionStart => sink.definition_start(),
            Self::DefinitionEnd => sink.definition_end(),
            Self::FigureStart => sink.figure_start(),
            Self::FigureEnd => sink.figure_end(),
            Self::FigureGraphics { source } => sink.figure_graphics(source),
            Self::FigureCaptionStart => sink.figure_caption_start(),
            Self::FigureCaptionEnd => sink.figure_caption_end(),
            Self::TableStart => sink.table_start(),
            Self::TableEnd => sink.table_end(),
            Self::TableRowsStart {
                justification,
                grid,
            } => sink.table_rows_start(justification, *grid),
            Self::TableRowsEnd => sink.table_rows_end(),
            Self::TableRowStart => sink.table_row_start(),
            Self::TableRowEnd => sink.table_row_end(),
            Self::TableCellStart { justification } => sink.table_cell_start(*justification),
            Self::TableCellEnd => sink.table_cell_end(),
            Self::TableHeaderCellStart { justification } => {
                sink.table_header_cell_start(*justification);
            }
            Self::TableHeaderCellEnd => sink.table_header_cell_end(),
            Self::TableCaptionStart => sink.table_caption_start(),
            Self::TableCaptionEnd => sink.table_caption_end(),
            Self::HorizontalRule => sink.horizontal_rule(),
            Self::PageBreak => sink.page_break(),
            Self::AnchorStart { name } => sink.anchor_start(name),
            Self::AnchorEnd => sink.anchor_end(),
            Self::LinkStart { target } => sink.link_start(target),
            Self::LinkEnd => sink.link_end(),
            Self::ItalicStart => sink.italic_start(),
            Self::ItalicEnd => sink.italic_end(),
            Self::BoldStart => sink.bold_start(),
            Self::BoldEnd => sink.bold_end(),
            Self::MonospacedStart => sink.monospaced_start(),
            Self::MonospacedEnd => sink.monospaced_end(),
            Self::LineBreak => sink.line_break(),
            Self::NonBreakingSpace => sink.non_breaking_space(),
            Self::Text { text } => sink.text(text),
            Self::Comment { comment } => sink.comment(comment),
        }
    }
}

impl Sink for EventRecorder {
    fn head_start(&mut self) {
        self.push(Event::HeadStart);
    }
    fn head_end(&mut self) {
        self.push(Event::HeadEnd);
    }
    fn title_start(&mut self) {
        self.push(Event::TitleStart);
    }
    fn title_end(&mut self) {
        self.push(Event::TitleEnd);
    }
    fn author_start(&mut self) {
        self.push(Event::AuthorStart);
    }
    fn author_end(&mut self) {
        self.push(Event::AuthorEnd);
    }
    fn date_start(&mut self) {
        self.push(Event::DateStart);
    }
    fn date_end(&mut self) {
        self.push(Event::DateEnd);
    }
    fn body_start(&mut self) {
        self.push(Event::BodyStart);
    }
    fn body_end(&mut self) {
        self.push(Event::BodyEnd);
    }
    fn section_start(&mut self, level: SectionLevel) {
        self.push(Event::SectionStart { level });
    }
    fn section_end(&mut self, level: SectionLevel) {
        self.push(Event::SectionEnd { level });
    }
    fn section_title_start(&mut self, level: SectionLevel) {
        self.push(Event::SectionTitleStart { level });
    }
    fn section_title_end(&mut self, level: SectionLevel) {
        self.push(Event::SectionTitleEnd { level });
    }
    fn paragraph_start(&mut self) {
        self.push(Event::ParagraphStart);
    }
    fn paragraph_end(&mut self) {
        self.push(Event::ParagraphEnd);
    }
    fn verbatim_start(&mut self, boxed: bool) {
        self.push(Event::VerbatimStart { boxed });
    }
    fn verbatim_end(&mut self) {
        self.push(Event::VerbatimEnd);
    }
    fn list_start(&mut self) {
        self.push(Event::ListStart);
    }
    fn list_end(&mut self) {
        self.push(Event::ListEnd);
    }
    fn list_item_start(&mut self) {
        self.push(Event::ListItemStart);
    }
    fn list_item_end(&mut self) {
        self.push(Event::ListItemEnd);
    }
    fn numbered_list_start(&mut self, numbering: Numbering) {
        self.push(Event::NumberedListStart { numbering });
    }
    fn numbered_list_end(&mut self) {
        self.push(Event::NumberedListEnd);
    }
    fn numbered_list_item_start(&mut self) {
        self.push(Event::NumberedListItemStart);
    }
    fn numbered_list_item_end(&mut self) {
        self.push(Event::NumberedListItemEnd);
    }
    fn definition_list_start(&mut self) {
        self.push(Event::DefinitionListStart);
    }
    fn definition_list_end(&mut self) {
        self.push(Event::DefinitionListEnd);
    }
    fn definition_list_item_start(&mut self) {
        self.push(Event::DefinitionListItemStart);
    }
    fn definition_list_item_end(&mut self) {
        self.push(Event::DefinitionListItemEnd);
    }
    fn defined_term_start(&mut self) {
        self.push(Event::DefinedTermStart);
    }
    fn defined_term_end(&mut self) {
        self.push(Event::DefinedTermEnd);
    }
    fn definition_start(&mut self) {
        self.push(Event::DefinitionStart);
    }
    fn definition_end(&mut self) {
        self.push(Event::DefinitionEnd);
    }
    fn figure_start(&mut self) {
        self.push(Event::FigureStart);
    }
    fn figure_end(&mut self) {
        self.push(Event::FigureEnd);
    }
    fn figure_graphics(&mut self, source: &str) {
        self.push(Event::FigureGraphics {
            source: source.to_string(),
        });
    }
    fn figure_caption_start(&mut self) {
        self.push(Event::FigureCaptionStart);
    }
    fn figure_caption_end(&mut self) {
        self.push(Event::FigureCaptionEnd);
    }
    fn table_start(&mut self) {
        self.push(Event::TableStart);
    }
    fn table_end(&mut self) {
        self.push(Event::TableEnd);
    }
    fn table_rows_start(&mut self, justification: &[Justification], grid: bool) {
        self.push(Event::TableRowsStart {
            justification: justification.to_vec(),
            grid,
        });
    }
    fn table_rows_end(&mut self) {
        self.push(Event::TableRowsEnd);
    }
    fn table_row_start(&mut self) {
        self.push(Event::TableRowStart);
    }
    fn table_row_end(&mut self) {
        self.push(Event::TableRowEnd);
    }
    fn table_cell_start(&mut self, justification: Justification) {
        self.push(Event::TableCellStart { justification });
    }
    fn table_cell_end(&mut self) {
        self.push(Event::TableCellEnd);
    }
    fn table_header_cell_start(&mut self, justification: Justification) {
        self.push(Event::TableHeaderCellStart { justification });
    }
    fn table_header_cell_end(&mut self) {
        self.push(Event::TableHeaderCellEnd);
    }
    fn table_caption_start(&mut self) {
        self.push(Event::TableCaptionStart);
    }
    fn table_caption_end(&mut self) {
        self.push(Event::TableCaptionEnd);
    }
    fn horizontal_rule(&mut self) {
        self.push(Event::HorizontalRule);
    }
    fn page_break(&mut self) {
        self.push(Event::PageBreak);
    }
    fn anchor_start(&mut self, name: &str) {
        self.push(Event::AnchorStart {
            name: name.to_string(),
        });
    }
    fn anchor_end(&mut self) {
        self.push(Event::AnchorEnd);
    }
    fn link_start(&mut self, target: &str) {
        self.push(Event::LinkStart {
            target: target.to_string(),
        });
    }
    fn link_end(&mut self) {
        self.push(Event::LinkEnd);
    }
    fn italic_start(&mut self) {
        self.push(Event::ItalicStart);
    }
    fn italic_end(&mut self) {
        self.push(Event::ItalicEnd);
    }
    fn bold_start(&mut self) {
        self.push(Event::BoldStart);
    }
    fn bold_end(&mut self) {
        self.push(Event::BoldEnd);
    }
    fn monospaced_start(&mut self) {
        self.push(Event::MonospacedStart);
    }
    fn monospaced_end(&mut self) {
        self.push(Event::MonospacedEnd);
    }
    fn line_break(&mut self) {
        self.push(Event::LineBreak);
    }
    fn non_breaking_space(&mut self) {
        self.push(Event::NonBreakingSpace);
    }
    fn text(&mut self, text: &str) {
        self.push(Event::Text {
            text: text.to_string(),
        });
    }
    fn comment(&mut self, comment: &str) {
        self.push(Event::Comment {
            comment: comment.to_string(),
        });
    }
}

/// Collects only the textual content of the events it receives.
///
/// Line breaks and non-breaking spaces become plain spaces. Used to turn the
/// raw text of a link target or anchor name into a single string.
#[derive(Debug, Default)]
pub(crate) struct TextCollector {
    buffer: String,
}

impl TextCollector {
    pub(crate) fn into_text(self) -> String {
        self.buffer
    }
}

impl Sink for TextCollector {
    fn line_break(&mut self) {
        self.buffer.push(' ');
    }

    fn non_breaking_space(&mut self) {
        self.buffer.push(' ');
    }

    fn text(&mut self, text: &str) {
        self.buffer.push_str(text);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_events_serialize_with_kebab_case_tags() {
        let events = vec![
            Event::SectionStart { level: 2 },
            Event::NumberedListStart {
                numbering: Numbering::LowerRoman,
            },
            Event::NonBreakingSpace,
        ];
        let json = serde_json::to_string(&events).unwrap();
        assert_eq!(
            json,
            r#"[{"event":"section-start","level":2},{"event":"numbered-list-start","numbering":"lower-roman"},{"event":"non-breaking-space"}]"#
        );
        let back: Vec<Event> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, events);
    }

    #[test]
    fn test_replay_reproduces_events() {
        let mut recorder = EventRecorder::new();
        recorder.table_rows_start(&[Justification::Center, Justification::Right], true);
        recorder.text("cell");
        recorder.table_rows_end();

        let mut copy = EventRecorder::new();
        recorder.replay(&mut copy);
        assert_eq!(copy, recorder);
    }

    #[test]
    fn test_text_collector_flattens_breaks() {
        let mut collector = TextCollector::default();
        collector.text("a");
        collector.line_break();
        collector.bold_start();
        collector.text("b");
        collector.non_breaking_space();
        collector.text("c");
        assert_eq!(collector.into_text(), "a b c");
    }
}
