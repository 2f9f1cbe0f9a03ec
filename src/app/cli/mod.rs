//! CLI module containing argument parsing and related functionality

pub mod args;
pub mod config;
pub mod display;
pub mod validation;

pub use args::Args;
pub use config::LoadedConfig;
pub use display::{ConsoleReport, ReportFormat};

#[cfg(test)]
mod tests;
