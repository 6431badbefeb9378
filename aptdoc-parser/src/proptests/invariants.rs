//! Parser invariants checked with property-based testing.

use proptest::prelude::*;
use serde_json::Value;

use crate::{Event, EventRecorder, Options, parse};

use super::generators::*;

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 1000,
        max_shrink_iters: 10000,
        .. ProptestConfig::default()
    })]

    /// The parser returns a result for any input, however malformed.
    #[test]
    fn parser_never_panics(input in any_document_string()) {
        let _ = parse(&input, &Options::default(), &mut EventRecorder::new());
    }

    /// Strict mode and comment delivery change results, never robustness.
    #[test]
    fn strict_parser_never_panics(input in ascii_document()) {
        let options = Options::builder().with_strict().with_comments().build();
        let _ = parse(&input, &options, &mut EventRecorder::new());
    }

    /// A successful parse emits a well nested event stream wrapped in head
    /// and body.
    #[test]
    fn successful_parse_is_balanced(input in structured_document()) {
        let mut recorder = EventRecorder::new();
        if parse(&input, &Options::default(), &mut recorder).is_ok() {
            let events = recorder.into_events();
            prop_assert_eq!(verify_balanced(&events), Ok(()));
            prop_assert_eq!(events.first(), Some(&Event::HeadStart));
            prop_assert_eq!(events.last(), Some(&Event::BodyEnd));
        }
    }

    /// Text runs are never empty, and plain runs are merged.
    #[test]
    fn text_runs_are_not_empty(input in inline_text()) {
        let mut recorder = EventRecorder::new();
        if parse(&format!(" {input}\n"), &Options::default(), &mut recorder).is_ok() {
            let events = recorder.into_events();
            for event in &events {
                if let Event::Text { text } = event {
                    prop_assert!(!text.is_empty());
                }
            }
            for pair in events.windows(2) {
                let both_text = pair.iter().all(|e| matches!(e, Event::Text { .. }));
                prop_assert!(!both_text, "adjacent text events: {pair:?}");
            }
        }
    }

    /// Recording and replaying yields the same stream.
    #[test]
    fn replay_is_identical(input in structured_document()) {
        let mut recorder = EventRecorder::new();
        if parse(&input, &Options::default(), &mut recorder).is_ok() {
            let mut replayed = EventRecorder::new();
            recorder.replay(&mut replayed);
            prop_assert_eq!(&recorder, &replayed);
        }
    }
}

/// Every opening event is closed by its own end event, innermost first.
fn verify_balanced(events: &[Event]) -> Result<(), String> {
    let mut open: Vec<&Event> = Vec::new();
    for (i, event) in events.iter().enumerate() {
        match event.nesting() {
            Some(1) => open.push(event),
            Some(_) => {
                let opener = open
                    .pop()
                    .ok_or_else(|| format!("event {i} ({event:?}) closes nothing"))?;
                if !closes(opener, event) {
                    return Err(format!("event {i} ({event:?}) closes {opener:?}"));
                }
            }
            None => {}
        }
    }
    match open.last() {
        Some(opener) => Err(format!("{opener:?} is never closed")),
        None => Ok(()),
    }
}

/// Whether `closer` ends the construct `opener` started: both name the same
/// construct, and every field the end event carries has the opener's value.
fn closes(opener: &Event, closer: &Event) -> bool {
    let (Ok(Value::Object(mut start)), Ok(Value::Object(mut end))) =
        (serde_json::to_value(opener), serde_json::to_value(closer))
    else {
        return false;
    };
    let construct = |name: Option<Value>, suffix: &str| {
        name.as_ref()
            .and_then(Value::as_str)
            .and_then(|name| name.strip_suffix(suffix))
            .map(str::to_string)
    };
    let started = construct(start.remove("event"), "-start");
    let ended = construct(end.remove("event"), "-end");
    started.is_some()
        && started == ended
        && end.iter().all(|(key, value)| start.get(key) == Some(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matching_closers_are_balanced() {
        let events = [
            Event::SectionStart { level: 1 },
            Event::ListStart,
            Event::ListItemStart,
            Event::ListItemEnd,
            Event::ListEnd,
            Event::SectionEnd { level: 1 },
        ];
        assert_eq!(verify_balanced(&events), Ok(()));
    }

    #[test]
    fn test_mismatched_closer_is_rejected() {
        let events = [
            Event::ListStart,
            Event::ListItemStart,
            Event::ListItemEnd,
            Event::NumberedListEnd,
        ];
        assert!(verify_balanced(&events).is_err());
    }

    #[test]
    fn test_closer_with_other_level_is_rejected() {
        let events = [Event::SectionStart { level: 2 }, Event::SectionEnd { level: 3 }];
        assert!(verify_balanced(&events).is_err());
    }

    #[test]
    fn test_unclosed_and_overclosed_are_rejected() {
        assert!(verify_balanced(&[Event::BoldStart]).is_err());
        assert!(verify_balanced(&[Event::BoldEnd]).is_err());
        assert!(verify_balanced(&[Event::BoldStart, Event::ItalicEnd]).is_err());
    }
}
