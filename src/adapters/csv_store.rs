use crate::domain::model::{EnrichedRecord, Schema};
use crate::domain::ports::{Storage, TabularStore};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Header row plus one row per record, in `schema` column order.
pub fn encode(records: &[EnrichedRecord], schema: Schema) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(schema.columns())?;
    for record in records {
        writer.write_record(record.to_cells(schema)?)?;
    }
    writer.into_inner().map_err(|e| e.into_error().into())
}

/// Parses rows written by [`encode`]; columns are matched by header name.
pub fn decode(data: &[u8]) -> Result<Vec<EnrichedRecord>> {
    let mut reader = csv::Reader::from_reader(data);
    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();

    let mut records = Vec::new();
    for row in reader.records() {
        let cells: Vec<String> = row?.iter().map(str::to_string).collect();
        records.push(EnrichedRecord::from_cells(&headers, &cells)?);
    }
    Ok(records)
}

pub async fn read_records<S: Storage>(storage: &S, path: &str) -> Result<Vec<EnrichedRecord>> {
    let data = storage.read_file(path).await?;
    decode(&data)
}

/// CSV output file, rewritten in full on every flush.
pub struct CsvStore<S: Storage> {
    storage: S,
    file_name: String,
    schema: Schema,
}

impl<S: Storage> CsvStore<S> {
    pub fn new(storage: S, file_name: impl Into<String>, schema: Schema) -> Self {
        Self {
            storage,
            file_name: file_name.into(),
            schema,
        }
    }
}

#[async_trait]
impl<S: Storage> TabularStore for CsvStore<S> {
    async fn flush(&self, records: &[EnrichedRecord]) -> Result<String> {
        let data = encode(records, self.schema)?;
        tracing::debug!(
            "Writing {} rows ({} bytes) to {}",
            records.len(),
            data.len(),
            self.file_name
        );
        self.storage.write_file(&self.file_name, &data).await?;
        Ok(self.storage.location(&self.file_name))
    }
}
