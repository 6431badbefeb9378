//! Generate expected APT output files for integration tests.
//!
//! Usage:
//!   `cargo run -p aptdoc-converters-apt --example generate_expected_fixtures`

use aptdoc_converters_apt::Processor;
use aptdoc_converters_core::{Converter, GeneratorMetadata, Options};
use aptdoc_converters_dev::generate_fixtures::FixtureGenerator;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    FixtureGenerator::new("apt", "apt").generate(|input, output| {
        let options = Options::builder()
            .generator_metadata(GeneratorMetadata::new("aptdoc", "0.1.0"))
            .build();
        Processor::new(options).write_to(input, output)?;
        Ok(())
    })
}
