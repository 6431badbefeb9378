//! Development and testing utilities for aptdoc converters.
//!
//! - [`generate_fixtures`] - Expected output generation for integration tests
//! - [`output`] - Output normalization for test comparisons

pub mod generate_fixtures;
pub mod output;
