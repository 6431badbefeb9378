use aptdoc_parser::{
    BlockKind, Error, Event, EventRecorder, Justification, Numbering, Options, SourceLocation,
    parse,
};
use pretty_assertions::assert_eq;

fn events(input: &str) -> Result<Vec<Event>, Error> {
    let mut recorder = EventRecorder::new();
    parse(input, &Options::default(), &mut recorder)?;
    Ok(recorder.into_events())
}

/// The events between `BodyStart` and `BodyEnd`.
fn body(input: &str) -> Result<Vec<Event>, Error> {
    Ok(events(input)?
        .into_iter()
        .skip_while(|e| *e != Event::BodyStart)
        .skip(1)
        .take_while(|e| *e != Event::BodyEnd)
        .collect())
}

fn text(text: &str) -> Event {
    Event::Text {
        text: text.to_string(),
    }
}

fn texts(events: &[Event]) -> Vec<&str> {
    events
        .iter()
        .filter_map(|e| {
            if let Event::Text { text } = e {
                Some(text.as_str())
            } else {
                None
            }
        })
        .collect()
}

#[test]
fn test_end_to_end_example() -> Result<(), Error> {
    let input = " -----\n Title\n -----\n\nSection\n\n  Some <<bold>> text with a {{{http://example.com}link}}.\n";
    assert_eq!(
        events(input)?,
        vec![
            Event::HeadStart,
            Event::TitleStart,
            text("Title"),
            Event::TitleEnd,
            Event::HeadEnd,
            Event::BodyStart,
            Event::SectionStart { level: 1 },
            Event::SectionTitleStart { level: 1 },
            text("Section"),
            Event::SectionTitleEnd { level: 1 },
            Event::ParagraphStart,
            text("Some "),
            Event::BoldStart,
            text("bold"),
            Event::BoldEnd,
            text(" text with a "),
            Event::LinkStart {
                target: "http://example.com".to_string()
            },
            text("link"),
            Event::LinkEnd,
            text("."),
            Event::ParagraphEnd,
            Event::SectionEnd { level: 1 },
            Event::BodyEnd,
        ]
    );
    Ok(())
}

#[test]
fn test_numbering_fixed_by_first_item() -> Result<(), Error> {
    let events = body("  [[a]] item1\n\n  [[1]] item2\n")?;
    let lists: Vec<&Event> = events
        .iter()
        .filter(|e| matches!(e, Event::NumberedListStart { .. }))
        .collect();
    assert_eq!(
        lists,
        vec![&Event::NumberedListStart {
            numbering: Numbering::LowerAlpha
        }]
    );
    assert_eq!(texts(&events), vec!["item1", "item2"]);
    Ok(())
}

#[test]
fn test_deeper_item_nests_and_equal_item_is_sibling() -> Result<(), Error> {
    assert_eq!(
        body("  * a\n\n    * b\n\n  * c\n")?,
        vec![
            Event::ListStart,
            Event::ListItemStart,
            text("a"),
            Event::ListStart,
            Event::ListItemStart,
            text("b"),
            Event::ListItemEnd,
            Event::ListEnd,
            Event::ListItemEnd,
            Event::ListItemStart,
            text("c"),
            Event::ListItemEnd,
            Event::ListEnd,
        ]
    );
    Ok(())
}

#[test]
fn test_multi_lines_in_table_cells() -> Result<(), Error> {
    let input = "*----------*--------------+----------------:\n cell 1, | cell 1,2       | cell 1,3\n 1       |                | \n*----------*--------------+----------------:\n cell 2,1 | cell 2,       | cell 2,3\n          | 2             |\n*----------*--------------+----------------:\n cell 3,1 | cell 3,2      | cell 3,\n          |               | 3\n*----------*--------------+----------------:\n";
    let events = body(input)?;
    assert_eq!(
        texts(&events),
        vec![
            "cell 1, 1", "cell 1,2", "cell 1,3", "cell 2,1", "cell 2, 2", "cell 2,3", "cell 3,1",
            "cell 3,2", "cell 3, 3",
        ]
    );
    assert_eq!(
        events.get(1),
        Some(&Event::TableRowsStart {
            justification: vec![
                Justification::Center,
                Justification::Left,
                Justification::Right
            ],
            grid: false,
        })
    );
    Ok(())
}

#[test]
fn test_line_break_in_table_cells() -> Result<(), Error> {
    let input = "*----------*--------------+----------------:\n cell 1,\\ | cell 1,2       | cell 1,3\n 1       |                | \n*----------*--------------+----------------:\n cell 2,1 | cell 2,\\     | cell 2,3\n          | 2             |\n*----------*--------------+----------------:\n cell 3,1 | cell 3,2      | cell 3,\\\n          |               | 3\n*----------*--------------+----------------:\n";
    let events = body(input)?;
    assert_eq!(
        texts(&events),
        vec![
            "cell 1,\u{a0}", "1", "cell 1,2", "cell 1,3", "cell 2,1", "cell 2,\u{a0}", "2",
            "cell 2,3", "cell 3,1", "cell 3,2", "cell 3,\u{a0}", "3",
        ]
    );
    assert_eq!(events.iter().filter(|e| **e == Event::LineBreak).count(), 3);
    Ok(())
}

#[test]
fn test_justification_per_row() -> Result<(), Error> {
    let input = "*----------*--------------*---------------*\n| Centered |   Centered   |   Centered    |\n*----------*--------------+---------------:\n| Centered | Left-aligned | Right-aligned |\n*----------*--------------+---------------:";
    let justifications: Vec<Justification> = body(input)?
        .iter()
        .filter_map(|e| {
            if let Event::TableCellStart { justification } = e {
                Some(*justification)
            } else {
                None
            }
        })
        .collect();
    assert_eq!(
        justifications,
        vec![
            Justification::Center,
            Justification::Center,
            Justification::Center,
            Justification::Center,
            Justification::Left,
            Justification::Right,
        ]
    );
    Ok(())
}

#[test]
fn test_special_characters_in_paragraph_and_table() -> Result<(), Error> {
    let escaped = "\\~ \\= \\- \\+ \\* \\[ \\] \\< \\> \\{ \\} \\\\ \\u2713";
    let input = format!(
        "  {escaped}\n\n*--------------------------------------------------+---------------+\n| {escaped} | special chars |\n*--------------------------------------------------+---------------+"
    );
    let events = body(&input)?;
    assert_eq!(
        texts(&events),
        vec![
            "~ = - + * [ ] < > { } \\ \u{2713}",
            "~ = - + * [ ] < > { } \\ \u{2713}",
            "special chars",
        ]
    );
    Ok(())
}

#[test]
fn test_spaces_and_brackets_in_anchors() -> Result<(), Error> {
    let input = "  {Anchor with spaces (and brackets)}\n  Link to {{Anchor with spaces (and brackets)}}\n  {{{http://fake.api#method(with, args)}method(with, args)}}\n";
    assert_eq!(
        body(input)?,
        vec![
            Event::ParagraphStart,
            Event::AnchorStart {
                name: "Anchor_with_spaces_.28and_brackets.29".to_string()
            },
            text("Anchor with spaces (and brackets)"),
            Event::AnchorEnd,
            text(" Link to "),
            Event::LinkStart {
                target: "#Anchor_with_spaces_.28and_brackets.29".to_string()
            },
            text("Anchor with spaces (and brackets)"),
            Event::LinkEnd,
            text(" "),
            Event::LinkStart {
                target: "http://fake.api#method(with, args)".to_string()
            },
            text("method(with, args)"),
            Event::LinkEnd,
            Event::ParagraphEnd,
        ]
    );
    Ok(())
}

#[test]
fn test_section_title_anchor() -> Result<(), Error> {
    let events = body("Enhancements to the APT format\n\n{Title with anchor}\n")?;
    assert_eq!(
        events.get(6..11),
        Some(
            &[
                Event::SectionTitleStart { level: 1 },
                Event::AnchorStart {
                    name: "Title_with_anchor".to_string()
                },
                text("Title with anchor"),
                Event::AnchorEnd,
                Event::SectionTitleEnd { level: 1 },
            ][..]
        )
    );
    Ok(())
}

#[test]
fn test_table_headers() -> Result<(), Error> {
    let input = "*-----------+-----------+\n|| Header 1 || Header 2 |\n*-----------+-----------+\n  Cell 1    | Cell 2    |\n*-----------+-----------+\n  Cell 3    | Cell 4    |\n*-----------+-----------+\n";
    let events = body(input)?;
    let header_cells = events
        .iter()
        .filter(|e| matches!(e, Event::TableHeaderCellStart { .. }))
        .count();
    let cells = events
        .iter()
        .filter(|e| matches!(e, Event::TableCellStart { .. }))
        .count();
    assert_eq!((header_cells, cells), (2, 4));
    assert_eq!(
        texts(&events),
        vec!["Header 1", "Header 2", "Cell 1", "Cell 2", "Cell 3", "Cell 4"]
    );
    Ok(())
}

#[test]
fn test_escaped_pipe_in_table_cell() -> Result<(), Error> {
    let events = body("*---+---+\n| cell \\| pipe | next cell \n*---+---+\n")?;
    assert_eq!(texts(&events), vec!["cell | pipe", "next cell"]);
    Ok(())
}

#[test]
fn test_literal_anchor() -> Result<(), Error> {
    let events = body(
        " {{{../apidocs/groovyx/net/http/ParserRegistry.html##parseText(org.apache.http.HttpResponse)}ParserRegistry}}",
    )?;
    assert_eq!(
        events.get(1),
        Some(&Event::LinkStart {
            target: "../apidocs/groovyx/net/http/ParserRegistry.html#parseText(org.apache.http.HttpResponse)"
                .to_string()
        })
    );
    Ok(())
}

#[test]
fn test_verbatim_source() -> Result<(), Error> {
    assert_eq!(
        body("+--\nverbatim source\n+--\n---\nverbatim\n---\n")?,
        vec![
            Event::VerbatimStart { boxed: true },
            text("verbatim source"),
            Event::VerbatimEnd,
            Event::VerbatimStart { boxed: false },
            text("verbatim"),
            Event::VerbatimEnd,
        ]
    );
    Ok(())
}

#[test]
fn test_font_styles() -> Result<(), Error> {
    let events = body(" <\\<Italic\\>> <<\\<Bold\\>>> <<<\\<Monospaced\\>>>>\n")?;
    assert_eq!(texts(&events), vec!["<Italic>", " ", "<Bold>", " ", "<Monospaced>"]);
    Ok(())
}

#[test]
fn test_list_items_with_verbatim_and_paragraph() -> Result<(), Error> {
    let input = " * first\n\n+---\ncode\n+---\n\n   after\n\n * second\n\n+---\ncode\n+---\n\n   after\n";
    let events = body(input)?;
    assert_eq!(
        events,
        vec![
            Event::ListStart,
            Event::ListItemStart,
            text("first"),
            Event::VerbatimStart { boxed: true },
            text("code"),
            Event::VerbatimEnd,
            Event::ParagraphStart,
            text("after"),
            Event::ParagraphEnd,
            Event::ListItemEnd,
            Event::ListItemStart,
            text("second"),
            Event::VerbatimStart { boxed: true },
            text("code"),
            Event::VerbatimEnd,
            Event::ParagraphStart,
            text("after"),
            Event::ParagraphEnd,
            Event::ListItemEnd,
            Event::ListEnd,
        ]
    );
    Ok(())
}

#[test]
fn test_comments_after_paragraph() -> Result<(), Error> {
    let options = Options::builder().with_comments().build();
    let mut recorder = EventRecorder::new();
    parse(
        "Section\n\n paragraph\n~~ some comment\n~~ another comment\n\n paragraph\n",
        &options,
        &mut recorder,
    )?;
    let events = recorder.into_events();
    assert_eq!(
        events.get(9..14),
        Some(
            &[
                Event::ParagraphEnd,
                Event::Comment {
                    comment: "some comment".to_string()
                },
                Event::Comment {
                    comment: "another comment".to_string()
                },
                Event::ParagraphStart,
                text("paragraph"),
            ][..]
        )
    );
    Ok(())
}

#[test]
fn test_comments_are_dropped_by_default() -> Result<(), Error> {
    let events = events("~~ license header\n -----\n Title\n")?;
    assert!(!events.iter().any(|e| matches!(e, Event::Comment { .. })));
    assert_eq!(events.get(1), Some(&Event::TitleStart));
    Ok(())
}

#[test]
fn test_macro_with_trailing_space() -> Result<(), Error> {
    assert_eq!(
        body("%{echo|id=myid}  \n")?,
        vec![
            Event::VerbatimStart { boxed: true },
            text("echo\nid ---> myid\n"),
            Event::VerbatimEnd,
        ]
    );
    Ok(())
}

#[test]
fn test_unknown_macro() {
    let result = events("%{snippet|id=myid}\n");
    assert!(matches!(
        result.as_ref().map_err(Error::kind),
        Err(Error::MacroNotFound(id)) if id == "snippet"
    ));
}

#[test]
fn test_line_break() -> Result<(), Error> {
    assert_eq!(
        body(" Line\\\n break.\n")?,
        vec![
            Event::ParagraphStart,
            text("Line"),
            Event::LineBreak,
            text("break."),
            Event::ParagraphEnd,
        ]
    );
    Ok(())
}

#[test]
fn test_error_messages() {
    let cases = [
        ("* Section\n", "expected SECTION1, found SECTION2"),
        ("*--+--+\n*--+--+\n", "no table rows"),
        ("*------\n| a |\n*--+\n", "no columns specified"),
        (" -----\n -----\n", "missing title"),
        (" <<bold\n", "missing '>>'"),
        (" {{link\n", "missing '}}'"),
        (" {anchor\n", "missing '}'"),
    ];
    for (input, message) in cases {
        let error = events(input).err();
        assert_eq!(
            error.as_ref().map(|e| e.kind().to_string()),
            Some(message.to_string()),
            "input: {input:?}"
        );
    }
}

#[test]
fn test_error_location_names_block_line() {
    let mut recorder = EventRecorder::new();
    let error = aptdoc_parser::parse_from_reader(
        "Top\n\n paragraph\n\n*** Too deep\n".as_bytes(),
        "site/index.apt",
        &Options::default(),
        &mut recorder,
    )
    .err();
    assert_eq!(
        error.as_ref().and_then(Error::location),
        Some(&SourceLocation {
            name: "site/index.apt".to_string(),
            line: 5,
        })
    );
    assert!(matches!(
        error.as_ref().map(Error::kind),
        Some(Error::UnexpectedBlock {
            expected: BlockKind::Section(2),
            found: BlockKind::Section(4),
        })
    ));
}

#[test]
fn test_strict_mode_rejects_bad_escapes() {
    let strict = Options::builder().with_strict().build();
    let result = parse(" \\xZZ\n", &strict, &mut EventRecorder::new());
    assert!(matches!(
        result.as_ref().map_err(Error::kind),
        Err(Error::InvalidEscape(_))
    ));
    assert!(parse(" \\xZZ\n", &Options::default(), &mut EventRecorder::new()).is_ok());
}

#[test]
fn test_tab_indentation_rounds_up() -> Result<(), Error> {
    // A tab indents to column 8, deeper than the six-space item.
    let events = body("      * outer\n\n\t* inner\n")?;
    assert_eq!(events.iter().filter(|e| **e == Event::ListStart).count(), 2);
    assert_eq!(events.get(3), Some(&Event::ListStart));
    Ok(())
}
