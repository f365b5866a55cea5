use crate::adapters::csv_store::{read_records, CsvStore};
use crate::app::pipelines::banks::CuratedBanks;
use crate::app::pipelines::nbfcs::{discover_csv_files, NbfcCsvSource};
use crate::config::cli::LocalStorage;
use crate::config::toml_config::{EnrichConfig, RunConfig};
use crate::core::engine::{EnrichmentEngine, RunSettings, RunSummary};
use crate::core::validator::Validator;
use crate::domain::model::{EnrichedRecord, Schema};
use crate::domain::ports::ExtractionService;
use crate::domain::states::filter_by_state;
use crate::utils::error::{EnrichError, Result};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

pub const BANKS_FILE: &str = "extracted_banks.csv";
pub const NBFCS_FILE: &str = "extracted_nbfcs.csv";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Banks,
    Nbfcs,
}

impl Source {
    pub fn output_file(&self) -> &'static str {
        match self {
            Source::Banks => BANKS_FILE,
            Source::Nbfcs => NBFCS_FILE,
        }
    }

    pub fn schema(&self) -> Schema {
        match self {
            Source::Banks => Schema::Bank,
            Source::Nbfcs => Schema::General,
        }
    }
}

/// Runs one or more sources through a shared engine, each into its own file.
pub struct Runner<E: ExtractionService> {
    engine: EnrichmentEngine<E>,
    run: RunConfig,
}

impl<E: ExtractionService> Runner<E> {
    pub fn new(config: &EnrichConfig, extractor: E) -> Self {
        let validator = Validator::new(config.validation.clone());
        let settings = RunSettings::from(&config.run);
        Self {
            engine: EnrichmentEngine::new(validator, extractor, settings),
            run: config.run.clone(),
        }
    }

    pub fn shutdown_handle(&self) -> Arc<AtomicBool> {
        self.engine.shutdown_handle()
    }

    /// Stops the run after the current institution on Ctrl+C.
    pub fn watch_ctrl_c(&self) {
        let shutdown = self.shutdown_handle();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::warn!("⚠️ Received Ctrl+C, saving progress...");
                shutdown.store(true, Ordering::SeqCst);
            }
        });
    }

    /// Sources run in order; an interrupted source ends the whole run.
    pub async fn run(&self, sources: &[Source]) -> Result<Vec<RunSummary>> {
        let mut summaries = Vec::with_capacity(sources.len());
        for source in sources {
            let summary = self.run_source(*source).await?;
            summary.log();
            let interrupted = summary.interrupted;
            summaries.push(summary);
            if interrupted {
                break;
            }
        }
        Ok(summaries)
    }

    async fn run_source(&self, source: Source) -> Result<RunSummary> {
        let store = CsvStore::new(
            LocalStorage::new(self.run.output_dir.clone()),
            source.output_file(),
            source.schema(),
        );

        match source {
            Source::Banks => self.engine.run(&CuratedBanks, &store).await,
            Source::Nbfcs => {
                let input = self.run.input.as_deref().ok_or_else(|| EnrichError::MissingInput {
                    message: "no NBFC input given, pass --input or set run.input".to_string(),
                })?;
                let files = discover_csv_files(Path::new(input))?;
                let nbfcs =
                    NbfcCsvSource::new(LocalStorage::new(String::new()), files, self.run.validate_nbfcs);
                self.engine.run(&nbfcs, &store).await
            }
        }
    }
}

/// Records in an output file that operate in `state`.
pub async fn filter_file(path: &Path, state: &str) -> Result<Vec<EnrichedRecord>> {
    let storage = LocalStorage::new(String::new());
    let records = read_records(&storage, &path.display().to_string()).await?;
    let matched = filter_by_state(&records, state)
        .into_iter()
        .cloned()
        .collect::<Vec<_>>();
    tracing::info!(
        "🔎 {} of {} lenders operate in {}",
        matched.len(),
        records.len(),
        state
    );
    Ok(matched)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::ExtractedFields;
    use crate::domain::ports::ExtractionRequest;
    use async_trait::async_trait;
    use tempfile::TempDir;

    struct NoAnswer;

    #[async_trait]
    impl ExtractionService for NoAnswer {
        async fn extract(&self, _request: &ExtractionRequest) -> Result<ExtractedFields> {
            Ok(ExtractedFields::default())
        }
    }

    fn config_in(dir: &TempDir) -> EnrichConfig {
        let mut config = EnrichConfig::default();
        config.run.output_dir = dir.path().to_str().unwrap().to_string();
        config.run.delay_ms = 0;
        config
    }

    #[tokio::test]
    async fn test_nbfcs_without_input_is_missing_input() {
        let temp_dir = TempDir::new().unwrap();
        let runner = Runner::new(&config_in(&temp_dir), NoAnswer);
        assert!(matches!(
            runner.run(&[Source::Nbfcs]).await,
            Err(EnrichError::MissingInput { .. })
        ));
    }

    #[tokio::test]
    async fn test_interrupted_run_skips_remaining_sources() {
        let temp_dir = TempDir::new().unwrap();
        let runner = Runner::new(&config_in(&temp_dir), NoAnswer);
        runner.shutdown_handle().store(true, Ordering::SeqCst);

        let summaries = runner.run(&[Source::Banks, Source::Nbfcs]).await.unwrap();

        assert_eq!(summaries.len(), 1);
        assert!(summaries[0].interrupted);
        assert!(temp_dir.path().join(BANKS_FILE).exists());
        assert!(!temp_dir.path().join(NBFCS_FILE).exists());
    }

    #[test]
    fn test_source_files_and_schemas() {
        assert_eq!(Source::Banks.output_file(), "extracted_banks.csv");
        assert_eq!(Source::Banks.schema(), Schema::Bank);
        assert_eq!(Source::Nbfcs.schema(), Schema::General);
    }
}
