use crate::domain::model::{Category, EnrichedRecord, ExtractedFields, Institution};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;

    /// Human-readable location of `path`, for logs and summaries.
    fn location(&self, path: &str) -> String {
        path.to_string()
    }
}

/// What the extraction service is asked about one institution.
#[derive(Debug, Clone)]
pub struct ExtractionRequest {
    pub name: String,
    pub category: Category,
    pub website: String,
    /// Replaces the built-in field list when set.
    pub instruction: Option<String>,
}

impl ExtractionRequest {
    pub fn for_institution(institution: &Institution) -> Self {
        Self {
            name: institution.name.clone(),
            category: institution.category,
            website: institution.website.clone(),
            instruction: None,
        }
    }
}

#[async_trait]
pub trait ExtractionService: Send + Sync {
    async fn extract(&self, request: &ExtractionRequest) -> Result<ExtractedFields>;
}

/// A list of institutions plus how it should be processed.
#[async_trait]
pub trait InstitutionSource: Send + Sync {
    fn name(&self) -> &str;

    /// Whether websites from this source are scored before extraction.
    fn validates(&self) -> bool;

    async fn load(&self) -> Result<Vec<Institution>>;
}

/// Destination that is rewritten in full on every flush.
#[async_trait]
pub trait TabularStore: Send + Sync {
    /// Returns the location written to.
    async fn flush(&self, records: &[EnrichedRecord]) -> Result<String>;
}
