//! Generate expected event dumps for integration tests.
//!
//! Usage:
//!   `cargo run -p aptdoc-converters-events --example generate_expected_fixtures`

use aptdoc_converters_core::{Converter, Options};
use aptdoc_converters_dev::generate_fixtures::FixtureGenerator;
use aptdoc_converters_events::Processor;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    FixtureGenerator::new("events", "json").generate(|input, output| {
        Processor::new(Options::default()).write_to(input, output)?;
        Ok(())
    })
}
