use std::{
    fs,
    io::{self, Write},
    path::PathBuf,
};

use aptdoc_parser::{Event, EventRecorder, Options};
use crossterm::style::Stylize;
use miette::IntoDiagnostic;

use crate::error;

/// Inspect the event stream of an APT document
#[derive(clap::Args, Debug)]
pub struct Args {
    /// Input APT file
    pub file: PathBuf,

    /// Include `~~` comments
    #[arg(long)]
    pub comments: bool,

    /// Maximum depth to display (0 = unlimited)
    #[arg(long, default_value = "0")]
    pub max_depth: usize,
}

/// Prints events as a tree: every start event opens a level that its end
/// event closes.
struct TreePrinter<W: Write> {
    writer: W,
    depth: usize,
    max_depth: usize,
}

impl<W: Write> TreePrinter<W> {
    fn new(writer: W, max_depth: usize) -> Self {
        Self {
            writer,
            depth: 0,
            max_depth,
        }
    }

    fn should_show(&self) -> bool {
        self.max_depth == 0 || self.depth < self.max_depth
    }

    fn print(&mut self, events: &[Event]) -> io::Result<()> {
        for event in events {
            if event.nesting() == Some(-1) {
                self.depth = self.depth.saturating_sub(1);
                continue;
            }
            if self.should_show() {
                self.print_line(event)?;
            }
            if event.nesting() == Some(1) {
                self.depth += 1;
            }
        }
        self.writer.flush()
    }

    fn print_line(&mut self, event: &Event) -> io::Result<()> {
        let (name, detail) = describe(event)?;
        write!(self.writer, "{}", "│  ".repeat(self.depth))?;
        if event.nesting().is_some() {
            write!(self.writer, "{}", name.cyan().bold())?;
        } else {
            write!(self.writer, "{}", name.green())?;
        }
        if let Some(detail) = detail {
            write!(self.writer, ": {}", detail.yellow())?;
        }
        writeln!(self.writer)
    }
}

/// The event's name without its `-start` suffix, and its fields as
/// `key=value` pairs.
fn describe(event: &Event) -> io::Result<(String, Option<String>)> {
    let serde_json::Value::Object(mut fields) = serde_json::to_value(event)? else {
        return Ok((String::new(), None));
    };
    let name = fields
        .remove("event")
        .and_then(|name| name.as_str().map(str::to_string))
        .unwrap_or_default();
    let name = name.strip_suffix("-start").unwrap_or(&name).to_string();
    let detail = fields
        .iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join(" ");
    Ok((name, (!detail.is_empty()).then_some(detail)))
}

pub fn run(args: &Args) -> miette::Result<()> {
    let mut builder = Options::builder();
    if args.comments {
        builder = builder.with_comments();
    }
    let options = builder.build();

    let mut recorder = EventRecorder::new();
    if let Err(e) = aptdoc_parser::parse_file(&args.file, &options, &mut recorder) {
        let source = fs::read_to_string(&args.file).ok();
        return Err(error::report(&e, source.as_deref()));
    }

    let stdout = io::stdout();
    TreePrinter::new(stdout.lock(), args.max_depth)
        .print(recorder.events())
        .into_diagnostic()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn tree(input: &str, max_depth: usize) -> Result<String, Box<dyn std::error::Error>> {
        let mut recorder = EventRecorder::new();
        aptdoc_parser::parse(input, &Options::default(), &mut recorder)?;
        let mut output = Vec::new();
        TreePrinter::new(&mut output, max_depth).print(recorder.events())?;
        Ok(String::from_utf8(output)?)
    }

    #[test]
    fn test_describe() -> io::Result<()> {
        assert_eq!(
            describe(&Event::SectionStart { level: 2 })?,
            ("section".to_string(), Some("level=2".to_string()))
        );
        assert_eq!(
            describe(&Event::Text {
                text: "hi".to_string()
            })?,
            ("text".to_string(), Some("text=\"hi\"".to_string()))
        );
        assert_eq!(describe(&Event::LineBreak)?, ("line-break".to_string(), None));
        Ok(())
    }

    #[test]
    fn test_tree_nesting() -> Result<(), Box<dyn std::error::Error>> {
        let output = tree("Title\n\n Some text.\n", 0)?;
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 7);
        assert!(lines.iter().any(|line| line.starts_with("│  │  │  ")
            && line.contains("Some text.")));
        Ok(())
    }

    #[test]
    fn test_max_depth() -> Result<(), Box<dyn std::error::Error>> {
        let output = tree("Title\n\n Some text.\n", 1)?;
        assert_eq!(output.lines().count(), 2);
        Ok(())
    }
}
