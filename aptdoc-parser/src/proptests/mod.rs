//! Property-based tests for the APT parser
//!
//! These tests check invariants that must hold for ANY input, not just the
//! fixtures: the parser never panics, and whatever it emits is well nested.

mod generators;
mod invariants;
