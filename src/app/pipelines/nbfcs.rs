use crate::domain::model::{parse_flag, Category, Institution};
use crate::domain::ports::{InstitutionSource, Storage};
use crate::utils::error::{EnrichError, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::path::Path;

/// Discovery outcomes worth enriching; other non-empty outcomes are skipped.
pub const ACCEPTED_OUTCOMES: [&str; 2] = ["OFFICIAL_WEBSITE_FOUND", "REVIEW_REQUIRED"];

#[derive(Debug, Default, Deserialize)]
struct NbfcRow {
    #[serde(default)]
    company_name: String,
    #[serde(default)]
    website: Option<String>,
    #[serde(default)]
    validated_url: Option<String>,
    #[serde(default)]
    raw_url: Option<String>,
    #[serde(default)]
    company_type: Option<String>,
    #[serde(default)]
    pan_india: Option<String>,
    #[serde(default)]
    outcome: Option<String>,
}

impl NbfcRow {
    fn url(&self) -> String {
        [&self.website, &self.validated_url, &self.raw_url]
            .into_iter()
            .flatten()
            .map(|url| url.trim())
            .find(|url| !url.is_empty())
            .unwrap_or_default()
            .to_string()
    }

    fn category(&self, origin: &str, line: usize) -> Category {
        match self.company_type.as_deref().map(str::trim) {
            None | Some("") => Category::Nbfc,
            Some(label) => label.parse().unwrap_or_else(|_| {
                tracing::warn!(
                    "⚠️ {}:{} unknown company_type '{}', treating as NBFC",
                    origin,
                    line,
                    label
                );
                Category::Nbfc
            }),
        }
    }
}

/// CSV files under `path`: the file itself, or every `*.csv` in the
/// directory in lexical order.
pub fn discover_csv_files(path: &Path) -> Result<Vec<String>> {
    if !path.is_dir() {
        return Ok(vec![path.display().to_string()]);
    }

    let mut files: Vec<String> = std::fs::read_dir(path)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| {
            p.is_file()
                && p.extension()
                    .and_then(|ext| ext.to_str())
                    .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
        })
        .map(|p| p.display().to_string())
        .collect();
    files.sort();

    if files.is_empty() {
        return Err(EnrichError::MissingInput {
            message: format!("no CSV files in {}", path.display()),
        });
    }
    Ok(files)
}

/// Institutions from one CSV payload, plus how many rows were skipped
/// because of their discovery outcome.
pub fn parse_rows(data: &[u8], origin: &str) -> Result<(Vec<Institution>, usize)> {
    let mut reader = csv::Reader::from_reader(data);
    let mut institutions = Vec::new();
    let mut skipped = 0;

    for (index, row) in reader.deserialize::<NbfcRow>().enumerate() {
        let row = row?;
        // header is line 1
        let line = index + 2;

        let outcome = row
            .outcome
            .as_deref()
            .map(str::trim)
            .filter(|o| !o.is_empty());
        if let Some(outcome) = outcome {
            if !ACCEPTED_OUTCOMES.contains(&outcome) {
                skipped += 1;
                continue;
            }
        }

        let mut institution = Institution::new(
            row.company_name.trim(),
            row.category(origin, line),
            row.url(),
        );
        if let Some(flag) = row.pan_india.as_deref().filter(|f| !f.trim().is_empty()) {
            institution = institution.with_pan_india(parse_flag(flag));
        }
        if let Some(outcome) = outcome {
            institution = institution.with_outcome(outcome);
        }
        institutions.push(institution);
    }

    Ok((institutions, skipped))
}

/// User-supplied NBFC list. Validation is off unless asked for.
pub struct NbfcCsvSource<S: Storage> {
    storage: S,
    files: Vec<String>,
    validate: bool,
}

impl<S: Storage> NbfcCsvSource<S> {
    pub fn new(storage: S, files: Vec<String>, validate: bool) -> Self {
        Self {
            storage,
            files,
            validate,
        }
    }
}

#[async_trait]
impl<S: Storage> InstitutionSource for NbfcCsvSource<S> {
    fn name(&self) -> &str {
        "nbfcs"
    }

    fn validates(&self) -> bool {
        self.validate
    }

    async fn load(&self) -> Result<Vec<Institution>> {
        let mut institutions = Vec::new();
        let mut skipped = 0;

        for file in &self.files {
            let data = self.storage.read_file(file).await?;
            let (mut rows, file_skipped) = parse_rows(&data, file)?;
            tracing::debug!("Read {} rows from {}", rows.len(), file);
            institutions.append(&mut rows);
            skipped += file_skipped;
        }

        tracing::info!(
            "📋 Loaded {} NBFCs from {} file(s), skipped {} by outcome",
            institutions.len(),
            self.files.len(),
            skipped
        );
        Ok(institutions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::cli::LocalStorage;
    use tempfile::TempDir;

    #[test]
    fn test_parse_rows_picks_first_url_and_filters_outcomes() {
        let data = b"row_number,company_name,validated_url,raw_url,outcome\n\
1,Alpha Finance,,https://alpha.in,OFFICIAL_WEBSITE_FOUND\n\
2,Beta Capital,https://beta.in,https://beta-old.in,REVIEW_REQUIRED\n\
3,Gamma Credit,,,NOT_FOUND\n\
4,Delta Leasing,https://delta.in,,\n";

        let (institutions, skipped) = parse_rows(data, "batch.csv").unwrap();

        assert_eq!(skipped, 1);
        assert_eq!(institutions.len(), 3);
        assert_eq!(institutions[0].website, "https://alpha.in");
        assert!(institutions[0].has_validation_override());
        assert_eq!(institutions[1].website, "https://beta.in");
        assert!(!institutions[1].has_validation_override());
        assert_eq!(institutions[2].outcome, None);
        assert!(institutions.iter().all(|i| i.category == Category::Nbfc));
    }

    #[test]
    fn test_parse_rows_reads_type_and_pan_india() {
        let data = b"company_name,website,company_type,pan_india\n\
Big Finance,https://big.in,NBFC,yes\n\
Coop One,https://coop.in,cooperative bank,\n\
Odd One,https://odd.in,Credit Union,no\n";

        let (institutions, _) = parse_rows(data, "list.csv").unwrap();

        assert_eq!(institutions[0].pan_india, Some(true));
        assert_eq!(institutions[1].category, Category::CooperativeBank);
        assert_eq!(institutions[1].pan_india, None);
        assert_eq!(institutions[2].category, Category::Nbfc);
        assert_eq!(institutions[2].pan_india, Some(false));
    }

    #[test]
    fn test_missing_url_is_kept_for_a_failed_record() {
        let (institutions, _) = parse_rows(b"company_name\nNo Site Finance\n", "x.csv").unwrap();
        assert_eq!(institutions.len(), 1);
        assert_eq!(institutions[0].website, "");
    }

    #[tokio::test]
    async fn test_directory_sources_are_read_in_order() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(
            temp_dir.path().join("b.csv"),
            "company_name,website\nSecond,https://second.in\n",
        )
        .unwrap();
        std::fs::write(
            temp_dir.path().join("a.csv"),
            "company_name,website\nFirst,https://first.in\n",
        )
        .unwrap();
        std::fs::write(temp_dir.path().join("notes.txt"), "ignored").unwrap();

        let files = discover_csv_files(temp_dir.path()).unwrap();
        assert_eq!(files.len(), 2);

        let source = NbfcCsvSource::new(LocalStorage::new(String::new()), files, false);
        let institutions = source.load().await.unwrap();
        assert_eq!(institutions[0].name, "First");
        assert_eq!(institutions[1].name, "Second");
        assert!(!source.validates());
    }

    #[test]
    fn test_empty_directory_is_missing_input() {
        let temp_dir = TempDir::new().unwrap();
        assert!(matches!(
            discover_csv_files(temp_dir.path()),
            Err(EnrichError::MissingInput { .. })
        ));
    }
}
