//! Expected output generation for converter integration tests.
//!
//! ```ignore
//! use aptdoc_converters_dev::generate_fixtures::FixtureGenerator;
//!
//! FixtureGenerator::new("apt", "apt").generate(|input, output| {
//!     Processor::new(Options::default()).write_to(input, output)?;
//!     Ok(())
//! })?;
//! ```

use std::{error::Error, fs, path::PathBuf};

use aptdoc_converters_core::Input;
use crossterm::style::{PrintStyledContent, Stylize};

/// Writes `tests/fixtures/expected/<name>.<ext>` for every
/// `tests/fixtures/source/<name>.apt` of a converter.
pub struct FixtureGenerator {
    converter_name: String,
    output_extension: String,
}

impl FixtureGenerator {
    /// A generator for the converter in `converters/<converter_name>`.
    #[must_use]
    pub fn new(converter_name: &str, output_extension: &str) -> Self {
        Self {
            converter_name: converter_name.to_string(),
            output_extension: output_extension.to_string(),
        }
    }

    /// Converts every source fixture with `convert_fn` and writes the result.
    ///
    /// Fixtures that fail to convert are reported and skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if a directory cannot be read or created, or an
    /// output file cannot be written.
    pub fn generate<F>(&self, convert_fn: F) -> Result<(), Box<dyn Error>>
    where
        F: Fn(Input<'_>, &mut Vec<u8>) -> Result<(), Box<dyn Error>>,
    {
        let base = PathBuf::from("converters")
            .join(&self.converter_name)
            .join("tests/fixtures");
        let input_dir = base.join("source");
        let output_dir = base.join("expected");
        fs::create_dir_all(&output_dir)?;

        println!(
            "Generating expected {} outputs...\n",
            self.converter_name.to_uppercase()
        );

        let mut sources: Vec<PathBuf> = input_dir
            .read_dir()?
            .filter_map(Result::ok)
            .map(|e| e.path())
            .filter(|path| path.extension().is_some_and(|ext| ext == "apt"))
            .collect();
        sources.sort();

        let mut success_count = 0;
        let mut error_count = 0;
        for input_path in sources {
            let Some(output_path) = input_path
                .file_stem()
                .map(|name| output_dir.join(name).with_extension(&self.output_extension))
            else {
                continue;
            };

            let mut output = Vec::new();
            if let Err(e) = convert_fn(Input::File(&input_path), &mut output) {
                println!(
                    "{} Error converting {}: {e}",
                    PrintStyledContent("❌".red()),
                    input_path.display()
                );
                error_count += 1;
                continue;
            }

            fs::write(&output_path, &output)?;
            success_count += 1;
            println!(
                "{} Generated {} ({} bytes)",
                PrintStyledContent("✓".green()),
                output_path.display(),
                output.len()
            );
        }

        println!();
        if error_count > 0 {
            println!("Completed with {error_count} error(s). {success_count} file(s) generated.");
        } else {
            println!(
                "Done! {success_count} file(s) generated in {}",
                output_dir.display()
            );
        }
        println!("   Manually verify each file before using in tests.");
        Ok(())
    }
}
