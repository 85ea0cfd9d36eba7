//! rarpeval CLI library
//!
//! This library provides the command-line interface for scoring surgical
//! video predictions against a reference set.

pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod output;
pub mod progress;

pub use error::{CliError, CliResult};
