//! Parsing and validation of Pulse project and bench files.
//!
//! This crate reads the `pulse.toml` project configuration (core parameters,
//! trace settings) and `benches/*.toml` stimulus programs, and resolves a
//! bench against the project into a strongly-typed [`ResolvedBench`].

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod resolve;
pub mod types;

pub use error::ConfigError;
pub use loader::{load_bench, load_bench_from_str, load_config, load_config_from_str, CONFIG_FILE};
pub use resolve::{resolve_bench, ResolvedBench};
pub use types::*;
