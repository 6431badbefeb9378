use std::error::Error;

use aptdoc_converters_core::find_parser_error;
use miette::{Diagnostic, NamedSource, SourceSpan};

/// Rich error wrapper for miette display with source code
#[derive(Debug, Diagnostic, thiserror::Error)]
#[error("{message}")]
#[diagnostic()]
pub(crate) struct RichError {
    message: String,

    #[help]
    advice: Option<String>,

    #[source_code]
    src: NamedSource<String>,

    #[label("{position_advice}")]
    span: SourceSpan,
    position_advice: String,
}

/// The span of the 1-based `line` of `source`, without its terminator.
fn line_span(source: &str, line: usize) -> SourceSpan {
    let mut offset = 0;
    for (number, text) in source.split_inclusive('\n').enumerate() {
        if number + 1 == line {
            let length = text.trim_end_matches(['\r', '\n']).len();
            return SourceSpan::new(offset.into(), length);
        }
        offset += text.len();
    }
    SourceSpan::new(offset.into(), 0)
}

/// A report for `e`. Parser errors found anywhere in its source chain are
/// shown against `source` when it is available.
pub(crate) fn report<E: Error + 'static>(e: &E, source: Option<&str>) -> miette::Report {
    let Some(parser_error) = find_parser_error(e) else {
        return miette::miette!("{e}");
    };
    let advice = parser_error.advice().map(str::to_string);

    match (source, parser_error.location()) {
        (Some(source), Some(location)) => {
            let line = location.line;
            miette::Report::new(RichError {
                message: parser_error.kind().to_string(),
                advice,
                src: NamedSource::new(location.name.clone(), source.to_string()),
                span: line_span(source, line),
                position_advice: format!("in the block starting here (line {line})"),
            })
        }
        _ => match advice {
            Some(advice) => miette::miette!(help = advice, "{parser_error}"),
            None => miette::miette!("{parser_error}"),
        },
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use aptdoc_parser::{EventRecorder, Options, parse_from_reader};
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_line_span() {
        let source = "first\r\nsecond\nthird";
        assert_eq!(line_span(source, 1), SourceSpan::new(0.into(), 5));
        assert_eq!(line_span(source, 2), SourceSpan::new(7.into(), 6));
        assert_eq!(line_span(source, 3), SourceSpan::new(14.into(), 5));
        assert_eq!(line_span(source, 9), SourceSpan::new(19.into(), 0));
    }

    #[test]
    fn test_report_points_at_block() {
        let source = "Title\n\n** Too deep\n";
        let result = parse_from_reader(
            source.as_bytes(),
            "doc.apt",
            &Options::default(),
            &mut EventRecorder::new(),
        );
        let Err(error) = result else {
            panic!("expected a parse error");
        };
        let report = report(&error, Some(source));
        let Some(rich) = report.downcast_ref::<RichError>() else {
            panic!("expected a source-annotated report");
        };
        assert_eq!(rich.message, "expected SECTION2, found SECTION3");
        assert_eq!(rich.span, SourceSpan::new(7.into(), 11));
        assert!(rich.advice.is_some());
    }

    #[test]
    fn test_report_other_errors() {
        let error = std::io::Error::other("disk full");
        assert_eq!(report(&error, None).to_string(), "disk full");
    }
}
