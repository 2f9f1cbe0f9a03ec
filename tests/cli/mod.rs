//! CLI Integration Test Modules

pub mod argument_parsing;
pub mod exit_codes;
pub mod toml_config;
