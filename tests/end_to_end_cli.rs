//! CLI Integration Tests
//!
//! Tests are organized by functionality:
//! - `cli::argument_parsing` - flag parsing and URL precedence
//! - `cli::toml_config` - configuration file merging
//! - `cli::exit_codes` - process exit status of the built binary

mod cli;
