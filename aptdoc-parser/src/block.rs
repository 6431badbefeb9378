use std::fmt;

use crate::model::{MAX_SECTION_LEVEL, Numbering, SectionLevel};

const TAB_WIDTH: usize = 8;

/// The kind of a block, decided from the first line of the block.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlockKind {
    Title,
    Section(SectionLevel),
    Paragraph,
    Verbatim { boxed: bool },
    Figure,
    Table,
    ListItem,
    NumberedListItem(Numbering),
    DefinitionListItem,
    HorizontalRule,
    PageBreak,
    ListBreak,
    Macro,
}

impl BlockKind {
    pub(crate) fn is_list_item(self) -> bool {
        matches!(
            self,
            Self::ListItem | Self::NumberedListItem(_) | Self::DefinitionListItem
        )
    }
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Title => write!(f, "TITLE"),
            Self::Section(level) => write!(f, "SECTION{level}"),
            Self::Paragraph => write!(f, "PARAGRAPH"),
            Self::Verbatim { .. } => write!(f, "VERBATIM"),
            Self::Figure => write!(f, "FIGURE"),
            Self::Table => write!(f, "TABLE"),
            Self::ListItem => write!(f, "LIST_ITEM"),
            Self::NumberedListItem(_) => write!(f, "NUMBERED_LIST_ITEM"),
            Self::DefinitionListItem => write!(f, "DEFINITION_LIST_ITEM"),
            Self::HorizontalRule => write!(f, "HORIZONTAL_RULE"),
            Self::PageBreak => write!(f, "PAGE_BREAK"),
            Self::ListBreak => write!(f, "LIST_BREAK"),
            Self::Macro => write!(f, "MACRO"),
        }
    }
}

/// A classified block with its accumulated raw text.
///
/// `text` keeps the first line's indentation. Verbatim text has tabs expanded
/// and no trailing line separator; horizontal rules, page breaks and list
/// breaks have no text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Block {
    pub(crate) kind: BlockKind,
    pub(crate) indent: usize,
    pub(crate) text: String,
    pub(crate) line: usize,
}

/// Indentation of `line` (spaces count one column, tabs advance to the next
/// multiple of eight) and the byte offset of its first other character.
pub(crate) fn indentation(line: &str) -> (usize, usize) {
    let mut indent = 0;
    for (offset, c) in line.char_indices() {
        match c {
            ' ' => indent += 1,
            '\t' => indent = (indent / TAB_WIDTH + 1) * TAB_WIDTH,
            _ => return (indent, offset),
        }
    }
    (indent, line.len())
}

/// Decides the kind of the block starting with `content`, the first line with
/// its indentation removed.
///
/// `first` is true only for the first block of the document, the only place a
/// title block can appear.
pub(crate) fn classify(content: &str, indent: usize, first: bool) -> BlockKind {
    let mut chars = content.chars();
    let c0 = chars.next();
    let c1 = chars.next();
    let c2 = chars.next();
    let top_level = indent == 0;

    match (c0, c1, c2) {
        (Some('*'), Some('-'), Some('-')) if top_level => BlockKind::Table,
        (Some('*'), ..) if top_level => BlockKind::Section(section_level(content)),
        (Some('*'), ..) => BlockKind::ListItem,
        (Some('['), Some(']'), _) => BlockKind::ListBreak,
        (Some('['), ..) if top_level => BlockKind::Figure,
        (Some('['), Some('['), marker) => BlockKind::NumberedListItem(Numbering::from_marker(marker)),
        (Some('['), ..) => BlockKind::DefinitionListItem,
        (Some('-'), Some('-'), Some('-')) if top_level => BlockKind::Verbatim { boxed: false },
        (Some('-'), Some('-'), Some('-')) if first => BlockKind::Title,
        (Some('+'), Some('-'), Some('-')) if top_level => BlockKind::Verbatim { boxed: true },
        (Some('='), Some('='), Some('=')) if top_level => BlockKind::HorizontalRule,
        (Some('\u{c}'), ..) if top_level => BlockKind::PageBreak,
        (Some('%'), Some('{'), _) if top_level => BlockKind::Macro,
        _ if top_level => BlockKind::Section(1),
        _ => BlockKind::Paragraph,
    }
}

/// Level of a section title starting with `*`: one more than the number of
/// leading stars, capped at [`MAX_SECTION_LEVEL`].
fn section_level(content: &str) -> SectionLevel {
    let stars = content.chars().take_while(|c| *c == '*').count();
    SectionLevel::try_from(stars + 1).map_or(MAX_SECTION_LEVEL, |level| level.min(MAX_SECTION_LEVEL))
}

/// Whether `line` closes a verbatim block opened with `delimiter`.
pub(crate) fn is_verbatim_fence(line: &str, delimiter: char) -> bool {
    let mut chars = line.chars();
    chars.next() == Some(delimiter) && chars.next() == Some('-') && chars.next() == Some('-')
}

/// Appends `line` to `text`, replacing each tab with the spaces reaching the
/// next multiple of eight columns.
pub(crate) fn push_expanded(text: &mut String, line: &str) {
    let mut column = 0;
    for c in line.chars() {
        if c == '\t' {
            let next_stop = (column / TAB_WIDTH + 1) * TAB_WIDTH;
            text.extend(std::iter::repeat_n(' ', next_stop - column));
            column = next_stop;
        } else {
            text.push(c);
            column += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[rstest::rstest]
    #[case("", (0, 0))]
    #[case("text", (0, 0))]
    #[case("  text", (2, 2))]
    #[case("\ttext", (8, 1))]
    #[case("   \ttext", (8, 4))]
    #[case(" \t \ttext", (16, 4))]
    #[case("    ", (4, 4))]
    fn test_indentation(#[case] line: &str, #[case] expected: (usize, usize)) {
        assert_eq!(indentation(line), expected);
    }

    #[rstest::rstest]
    #[case("Section", 0, false, BlockKind::Section(1))]
    #[case("* Section", 0, false, BlockKind::Section(2))]
    #[case("** Section", 0, false, BlockKind::Section(3))]
    #[case("*** Section", 0, false, BlockKind::Section(4))]
    #[case("**** Section", 0, false, BlockKind::Section(5))]
    #[case("*----+", 0, false, BlockKind::Table)]
    #[case("* item", 2, false, BlockKind::ListItem)]
    #[case("*-- not a table", 2, false, BlockKind::ListItem)]
    #[case("[]", 0, false, BlockKind::ListBreak)]
    #[case("[]", 4, false, BlockKind::ListBreak)]
    #[case("[image] Caption", 0, false, BlockKind::Figure)]
    #[case("[[a]] item", 2, false, BlockKind::NumberedListItem(Numbering::LowerAlpha))]
    #[case("[[I]] item", 2, false, BlockKind::NumberedListItem(Numbering::UpperRoman))]
    #[case("[[1]] item", 2, false, BlockKind::NumberedListItem(Numbering::Decimal))]
    #[case("[term] definition", 2, false, BlockKind::DefinitionListItem)]
    #[case("----", 0, false, BlockKind::Verbatim { boxed: false })]
    #[case("+---+", 0, false, BlockKind::Verbatim { boxed: true })]
    #[case("-----", 1, true, BlockKind::Title)]
    #[case("-----", 1, false, BlockKind::Paragraph)]
    #[case("+---", 2, false, BlockKind::Paragraph)]
    #[case("=====", 0, false, BlockKind::HorizontalRule)]
    #[case("==", 0, false, BlockKind::Section(1))]
    #[case("\u{c}", 0, false, BlockKind::PageBreak)]
    #[case("%{toc}", 0, false, BlockKind::Macro)]
    #[case("%{toc}", 3, false, BlockKind::Paragraph)]
    #[case("Text", 1, false, BlockKind::Paragraph)]
    fn test_classify(
        #[case] content: &str,
        #[case] indent: usize,
        #[case] first: bool,
        #[case] expected: BlockKind,
    ) {
        assert_eq!(classify(content, indent, first), expected);
    }

    #[test]
    fn test_verbatim_fence() {
        assert!(is_verbatim_fence("---", '-'));
        assert!(is_verbatim_fence("+--------+", '+'));
        assert!(!is_verbatim_fence("+--------+", '-'));
        assert!(!is_verbatim_fence(" ---", '-'));
        assert!(!is_verbatim_fence("--", '-'));
    }

    #[test]
    fn test_push_expanded() {
        let mut text = String::new();
        push_expanded(&mut text, "a\tb\t\tc");
        assert_eq!(text, format!("a{}b{}c", " ".repeat(7), " ".repeat(15)));
    }

    #[rstest::rstest]
    #[case(BlockKind::ListItem, true)]
    #[case(BlockKind::NumberedListItem(Numbering::LowerRoman), true)]
    #[case(BlockKind::DefinitionListItem, true)]
    #[case(BlockKind::ListBreak, false)]
    #[case(BlockKind::Paragraph, false)]
    #[case(BlockKind::Section(2), false)]
    fn test_is_list_item(#[case] kind: BlockKind, #[case] expected: bool) {
        assert_eq!(kind.is_list_item(), expected);
    }

    #[rstest::rstest]
    #[case("* Two", 2)]
    #[case("** Three", 3)]
    #[case("*** Four", 4)]
    #[case("**** Five", MAX_SECTION_LEVEL)]
    #[case("******** Still five", MAX_SECTION_LEVEL)]
    fn test_section_level_is_capped(#[case] title: &str, #[case] expected: SectionLevel) {
        assert_eq!(classify(title, 0, false), BlockKind::Section(expected));
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(BlockKind::Section(4).to_string(), "SECTION4");
        assert_eq!(
            BlockKind::NumberedListItem(Numbering::Decimal).to_string(),
            "NUMBERED_LIST_ITEM"
        );
    }
}
