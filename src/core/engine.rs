use crate::config::toml_config::RunConfig;
use crate::core::record_builder;
use crate::core::validator::Validator;
use crate::domain::model::{EnrichedRecord, Institution, Status};
use crate::domain::ports::{ExtractionRequest, ExtractionService, InstitutionSource, TabularStore};
use crate::utils::error::{EnrichError, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

pub const EXTRACTION_FAILED: &str = "Gemini extraction failed";

#[derive(Debug, Clone)]
pub struct RunSettings {
    pub flush_every: usize,
    pub delay: Duration,
    pub limit: Option<usize>,
}

impl From<&RunConfig> for RunSettings {
    fn from(config: &RunConfig) -> Self {
        Self {
            flush_every: config.flush_every.max(1),
            delay: Duration::from_millis(config.delay_ms),
            limit: config.limit,
        }
    }
}

impl Default for RunSettings {
    fn default() -> Self {
        Self::from(&RunConfig::default())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub source: String,
    pub total: usize,
    pub processed: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub interrupted: bool,
    pub output: Option<String>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl RunSummary {
    pub fn log(&self) {
        tracing::info!(
            "📊 {} - processed {}/{} (✓{} ✗{}){}",
            self.source,
            self.processed,
            self.total,
            self.succeeded,
            self.failed,
            if self.interrupted { ", interrupted" } else { "" }
        );
        if let Some(output) = &self.output {
            tracing::info!("📁 Output saved to: {}", output);
        }
        tracing::debug!(
            "Run took {}s",
            (self.finished_at - self.started_at).num_seconds()
        );
    }
}

/// Drives institutions one at a time through validation, extraction and
/// record building, flushing the accumulated rows as it goes.
pub struct EnrichmentEngine<E: ExtractionService> {
    validator: Validator,
    extractor: E,
    settings: RunSettings,
    shutdown: Arc<AtomicBool>,
}

impl<E: ExtractionService> EnrichmentEngine<E> {
    pub fn new(validator: Validator, extractor: E, settings: RunSettings) -> Self {
        Self {
            validator,
            extractor,
            settings,
            shutdown: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Setting the flag stops the loop once the current institution is done.
    pub fn shutdown_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.shutdown)
    }

    /// Always yields exactly one record; failures become failed rows.
    pub async fn process(&self, institution: &Institution, validate: bool) -> EnrichedRecord {
        match self.try_process(institution, validate).await {
            Ok(record) => record,
            Err(e) => {
                let error = match e {
                    EnrichError::MissingInput { message } => message,
                    EnrichError::ValidationFailed { reason, .. } => reason,
                    EnrichError::ExtractionFailed { message } => {
                        tracing::warn!("  ✗ {}: {}", institution.name, message);
                        EXTRACTION_FAILED.to_string()
                    }
                    other => other.to_string(),
                };
                EnrichedRecord::failed(institution, error)
            }
        }
    }

    async fn try_process(&self, institution: &Institution, validate: bool) -> Result<EnrichedRecord> {
        if institution.name.trim().is_empty() {
            return Err(EnrichError::MissingInput {
                message: "No company name provided".to_string(),
            });
        }
        if institution.website.trim().is_empty() {
            return Err(EnrichError::MissingInput {
                message: "No URL provided".to_string(),
            });
        }

        if validate {
            let validation =
                self.validator
                    .validate(&institution.name, &institution.website, institution.category);
            tracing::info!("  Validation: {}/100 - {}", validation.score, validation.reason);

            if !validation.passed {
                if institution.has_validation_override() {
                    tracing::info!("  ↪ Official website confirmed upstream, extracting anyway");
                } else {
                    return Err(EnrichError::ValidationFailed {
                        score: validation.score,
                        reason: validation.reason,
                    });
                }
            }
        }

        tracing::info!("  → Extracting...");
        let request = ExtractionRequest::for_institution(institution);
        let extracted = self.extractor.extract(&request).await?;
        if extracted.is_empty() {
            return Err(EnrichError::extraction("empty field map"));
        }
        tracing::info!("  ✓ Extracted {} fields", extracted.len());

        Ok(record_builder::build_for(institution, &extracted))
    }

    pub async fn run<S, T>(&self, source: &S, store: &T) -> Result<RunSummary>
    where
        S: InstitutionSource + ?Sized,
        T: TabularStore + ?Sized,
    {
        let started_at = Utc::now();
        let mut institutions = source.load().await?;
        if let Some(limit) = self.settings.limit {
            institutions.truncate(limit);
        }

        let total = institutions.len();
        tracing::info!("🚀 Processing {} institutions from {}", total, source.name());

        let mut records: Vec<EnrichedRecord> = Vec::with_capacity(total);
        let mut succeeded = 0;
        let mut failed = 0;
        let mut interrupted = false;

        for (index, institution) in institutions.iter().enumerate() {
            if self.shutdown.load(Ordering::SeqCst) {
                tracing::warn!("⚠️ Interrupted by user, stopping before {}", institution.name);
                interrupted = true;
                break;
            }

            tracing::info!("[{}/{}] {}", index + 1, total, institution.name);
            tracing::debug!("  URL: {}", institution.website);

            let record = self.process(institution, source.validates()).await;
            match record.status() {
                Status::Success => succeeded += 1,
                Status::Failed => failed += 1,
            }
            records.push(record);

            let processed = index + 1;
            if processed % self.settings.flush_every == 0 && processed < total {
                match store.flush(&records).await {
                    Ok(location) => tracing::info!(
                        "💾 Saved {} rows (✓{} ✗{}) to {}",
                        records.len(),
                        succeeded,
                        failed,
                        location
                    ),
                    Err(e) => tracing::error!("❌ Periodic save failed: {}", e),
                }
            }

            if !self.settings.delay.is_zero() {
                tokio::time::sleep(self.settings.delay).await;
            }
        }

        let output = store.flush(&records).await?;
        tracing::info!("💾 Saved {} rows to {}", records.len(), output);

        Ok(RunSummary {
            source: source.name().to_string(),
            total,
            processed: records.len(),
            succeeded,
            failed,
            interrupted,
            output: Some(output),
            started_at,
            finished_at: Utc::now(),
        })
    }
}
