use crate::app::runner::Source;
use crate::config::toml_config::EnrichConfig;
use crate::utils::error::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "lender-enrich")]
#[command(about = "Enrich Indian banks and NBFCs with business facts from web search")]
pub struct CliConfig {
    #[command(subcommand)]
    pub command: Command,

    #[arg(long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Emit logs as JSON lines")]
    pub log_json: bool,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Validate and enrich a list of institutions
    Enrich(EnrichArgs),
    /// List lenders from an output file that operate in a state
    Filter(FilterArgs),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    /// Built-in list of banks, websites still validated
    Banks,
    /// User-supplied NBFC CSV files
    Nbfcs,
    /// Banks, then NBFCs
    All,
}

impl Mode {
    pub fn sources(&self) -> &'static [Source] {
        match self {
            Mode::Banks => &[Source::Banks],
            Mode::Nbfcs => &[Source::Nbfcs],
            Mode::All => &[Source::Banks, Source::Nbfcs],
        }
    }
}

#[derive(Debug, Clone, Args)]
pub struct EnrichArgs {
    #[arg(value_enum)]
    pub mode: Mode,

    #[arg(long, help = "TOML config file")]
    pub config: Option<PathBuf>,

    #[arg(long, help = "NBFC CSV file or directory of CSV files")]
    pub input: Option<String>,

    #[arg(long)]
    pub output_dir: Option<String>,

    #[arg(long, help = "Extraction service endpoint")]
    pub endpoint: Option<String>,

    #[arg(long, help = "Rewrite the output file every N institutions")]
    pub flush_every: Option<usize>,

    #[arg(long, help = "Pause after each institution, in milliseconds")]
    pub delay_ms: Option<u64>,

    #[arg(long)]
    pub timeout_seconds: Option<u64>,

    #[arg(long, help = "Process at most N institutions per source")]
    pub limit: Option<usize>,

    #[arg(long, help = "Score NBFC websites before extraction")]
    pub validate_nbfcs: bool,
}

impl EnrichArgs {
    /// Config file (or defaults) with command-line overrides applied.
    pub fn load_config(&self) -> Result<EnrichConfig> {
        let mut config = match &self.config {
            Some(path) => EnrichConfig::from_file(path)?,
            None => EnrichConfig::default(),
        };

        if let Some(input) = &self.input {
            config.run.input = Some(input.clone());
        }
        if let Some(output_dir) = &self.output_dir {
            config.run.output_dir = output_dir.clone();
        }
        if let Some(endpoint) = &self.endpoint {
            config.extraction.endpoint = endpoint.clone();
        }
        if let Some(flush_every) = self.flush_every {
            config.run.flush_every = flush_every;
        }
        if let Some(delay_ms) = self.delay_ms {
            config.run.delay_ms = delay_ms;
        }
        if let Some(timeout) = self.timeout_seconds {
            config.extraction.timeout_seconds = timeout;
        }
        if self.limit.is_some() {
            config.run.limit = self.limit;
        }
        if self.validate_nbfcs {
            config.run.validate_nbfcs = true;
        }

        Ok(config)
    }
}

#[derive(Debug, Clone, Args)]
pub struct FilterArgs {
    #[arg(long)]
    pub state: String,

    #[arg(long, help = "Output CSV written by `enrich`")]
    pub file: PathBuf,
}
