pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::{cli::LocalStorage, EnrichConfig};

pub use adapters::{CsvStore, GeminiClient};
pub use app::runner::{Runner, Source};
pub use core::engine::{EnrichmentEngine, RunSummary};
pub use core::validator::{Validator, ValidatorConfig};
pub use domain::model::{Category, EnrichedRecord, Institution, Schema};
pub use utils::error::{EnrichError, Result};
