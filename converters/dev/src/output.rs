//! Output normalization for test comparisons.

/// Removes trailing whitespace from each line, and trailing blank lines.
///
/// Expected files are edited by hand; whitespace at line ends does not
/// change what the output means.
///
/// # Example
///
/// ```
/// use aptdoc_converters_dev::output::remove_lines_trailing_whitespace;
///
/// let input = " * item \n\n []\t\n\n";
/// assert_eq!(remove_lines_trailing_whitespace(input), " * item\n\n []");
/// ```
#[must_use]
pub fn remove_lines_trailing_whitespace(output: &str) -> String {
    output
        .lines()
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join("\n")
        .trim_end_matches('\n')
        .to_string()
}
