#[cfg(feature = "cli")]
pub mod args;
pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use args::{CliConfig, Command, EnrichArgs, FilterArgs, Mode};
pub use toml_config::{EnrichConfig, ExtractionConfig, RunConfig};
