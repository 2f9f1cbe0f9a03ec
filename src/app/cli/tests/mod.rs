//! Tests for the CLI module
//!
//! Argument parsing, configuration file merging, validation, and report
//! rendering.
