use crate::core::validator::ValidatorConfig;
use crate::utils::error::{EnrichError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;

pub const API_KEY_ENV: &str = "GEMINI_API_KEY";
pub const DEFAULT_ENDPOINT: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.0-flash:generateContent";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EnrichConfig {
    pub extraction: ExtractionConfig,
    pub validation: ValidatorConfig,
    pub run: RunConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    pub endpoint: String,
    pub api_key: Option<String>,
    pub timeout_seconds: u64,
    pub temperature: f32,
    pub max_output_tokens: u32,
    /// Replaces the built-in field list in every prompt.
    pub instruction: Option<String>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_key: None,
            timeout_seconds: 45,
            temperature: 0.1,
            max_output_tokens: 1500,
            instruction: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub output_dir: String,
    /// NBFC input: one CSV file or a directory of them.
    pub input: Option<String>,
    pub flush_every: usize,
    pub delay_ms: u64,
    pub limit: Option<usize>,
    pub validate_nbfcs: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            output_dir: "./data/output".to_string(),
            input: None,
            flush_every: 10,
            delay_ms: 2000,
            limit: None,
            validate_nbfcs: false,
        }
    }
}

fn env_placeholder() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("placeholder pattern is valid"))
}

impl EnrichConfig {
    /// Loads a TOML config file, substituting `${VAR}` placeholders first.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);
        Ok(toml::from_str(&processed_content)?)
    }

    /// Replaces `${VAR}` with the environment value; unknown variables stay as written.
    fn substitute_env_vars(content: &str) -> String {
        env_placeholder()
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .to_string()
    }

    /// Config-file key first, then `GEMINI_API_KEY`. Unresolved placeholders don't count.
    pub fn resolve_api_key(&self) -> Result<String> {
        let from_file = self
            .extraction
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty() && !env_placeholder().is_match(key));
        let key = from_file.or_else(|| std::env::var(API_KEY_ENV).ok());
        let key = validation::validate_required_field(API_KEY_ENV, &key)?;
        validation::validate_non_empty_string(API_KEY_ENV, key).map_err(|_| {
            EnrichError::MissingConfigError {
                field: API_KEY_ENV.to_string(),
            }
        })?;
        Ok(key.trim().to_string())
    }
}

impl Validate for EnrichConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_url("extraction.endpoint", &self.extraction.endpoint)?;
        validation::validate_positive_number(
            "extraction.timeout_seconds",
            self.extraction.timeout_seconds,
            1,
        )?;
        validation::validate_path("run.output_dir", &self.run.output_dir)?;
        validation::validate_positive_number("run.flush_every", self.run.flush_every as u64, 1)?;

        for (field, profile) in [
            ("validation.strict", &self.validation.strict),
            ("validation.lenient", &self.validation.lenient),
        ] {
            validation::validate_range(&format!("{}.threshold", field), profile.threshold, 0, 100)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::Category;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let config = EnrichConfig::default();
        assert_eq!(config.extraction.timeout_seconds, 45);
        assert_eq!(config.run.flush_every, 10);
        assert_eq!(config.run.delay_ms, 2000);
        assert_eq!(config.validation.strict.threshold, 50);
        assert_eq!(config.validation.lenient.threshold, 60);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_partial_toml_config() {
        let toml_content = r#"
[extraction]
endpoint = "http://localhost:9000/generate"
timeout_seconds = 10
instruction = "Return aum_crores only."

[validation]
trusted_categories = ["PSU Bank"]
reject_terms = ["casino"]

[run]
output_dir = "./out"
flush_every = 5
"#;

        let config = EnrichConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.extraction.endpoint, "http://localhost:9000/generate");
        assert_eq!(config.extraction.max_output_tokens, 1500);
        assert_eq!(
            config.extraction.instruction.as_deref(),
            Some("Return aum_crores only.")
        );
        assert_eq!(config.validation.trusted_categories, vec![Category::PsuBank]);
        assert_eq!(config.validation.reject_terms, vec!["casino"]);
        assert!(!config.validation.financial_keywords.is_empty());
        assert_eq!(config.run.flush_every, 5);
        assert_eq!(config.run.delay_ms, 2000);
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("LENDER_TEST_ENDPOINT", "https://test.api.com/gen");

        let config = EnrichConfig::from_toml_str(
            r#"
[extraction]
endpoint = "${LENDER_TEST_ENDPOINT}"
"#,
        )
        .unwrap();
        assert_eq!(config.extraction.endpoint, "https://test.api.com/gen");

        std::env::remove_var("LENDER_TEST_ENDPOINT");
    }

    #[test]
    fn test_api_key_from_file_wins() {
        let config = EnrichConfig::from_toml_str(
            r#"
[extraction]
api_key = "file-key"
"#,
        )
        .unwrap();
        assert_eq!(config.resolve_api_key().unwrap(), "file-key");
    }

    #[test]
    fn test_unresolved_placeholder_is_not_a_key() {
        let config = EnrichConfig::from_toml_str(
            r#"
[extraction]
api_key = "${LENDER_TEST_UNSET_KEY}"
"#,
        )
        .unwrap();
        assert_eq!(
            config.extraction.api_key.as_deref(),
            Some("${LENDER_TEST_UNSET_KEY}")
        );
        // falls back to GEMINI_API_KEY, which may or may not be set here
        if std::env::var(API_KEY_ENV).is_err() {
            assert!(matches!(
                config.resolve_api_key(),
                Err(EnrichError::MissingConfigError { .. })
            ));
        }
    }

    #[test]
    fn test_config_validation() {
        let config = EnrichConfig::from_toml_str(
            r#"
[extraction]
endpoint = "invalid-url"
"#,
        )
        .unwrap();
        assert!(config.validate().is_err());

        let mut config = EnrichConfig::default();
        config.run.flush_every = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[run]\noutput_dir = \"./file-output\"\n")
            .unwrap();

        let config = EnrichConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.run.output_dir, "./file-output");
    }

    #[test]
    fn test_invalid_toml_is_reported() {
        assert!(matches!(
            EnrichConfig::from_toml_str("[run\nflush_every = 1"),
            Err(EnrichError::TomlError(_))
        ));
    }
}
