use crate::config::toml_config::ExtractionConfig;
use crate::domain::model::ExtractedFields;
use crate::domain::ports::{ExtractionRequest, ExtractionService};
use crate::domain::states::PAN_INDIA_SENTINEL;
use crate::utils::error::{EnrichError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;

const DEFAULT_INSTRUCTION: &str = r#"Extract these fields (use null if not found):

1. aum_crores: Assets Under Management in crores (number only)
2. product_types: loan products as an array (e.g. ["Home Loan", "MSME Loan"])
3. primary_product: the single main loan product
4. hq_city: headquarters city
5. hq_state: headquarters state (full name: Maharashtra not MH)
6. operating_states: states where they lend (array of full names), or "{sentinel}" if they operate across India
7. established_year: year founded
8. employee_count: number of employees
9. ticket_size_min_lakhs: minimum loan amount in lakhs
10. ticket_size_max_lakhs: maximum loan amount in lakhs
11. has_subsidiaries: true or false
12. phone: contact phone
13. email: contact email

Return ONLY a JSON object with exactly these keys, no markdown and no extra text."#;

/// Prompt sent for one institution.
pub fn build_prompt(request: &ExtractionRequest) -> String {
    let instruction = request
        .instruction
        .clone()
        .unwrap_or_else(|| DEFAULT_INSTRUCTION.replace("{sentinel}", PAN_INDIA_SENTINEL));

    format!(
        "Extract factual information about this Indian lending institution from web search.\n\n\
         Company: {}\nType: {}\nWebsite: {}\n\n{}",
        request.name, request.category, request.website, instruction
    )
}

/// Strips surrounding markdown code fences from a model answer.
pub fn strip_code_fences(text: &str) -> &str {
    text.trim()
        .trim_start_matches("```json")
        .trim_start_matches("```JSON")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim()
}

/// Parses the model's answer text into a field map.
pub fn parse_answer(text: &str) -> Result<ExtractedFields> {
    match serde_json::from_str::<Value>(strip_code_fences(text))? {
        Value::Object(map) => Ok(ExtractedFields::new(map)),
        other => Err(EnrichError::extraction(format!(
            "expected a JSON object, got {}",
            kind_of(&other)
        ))),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Concatenated text parts of the first candidate.
fn answer_text(body: &Value) -> Option<String> {
    let parts = body.pointer("/candidates/0/content/parts")?.as_array()?;
    let text: String = parts
        .iter()
        .filter_map(|part| part.get("text").and_then(Value::as_str))
        .collect();
    (!text.trim().is_empty()).then_some(text)
}

/// Gemini `generateContent` client with search grounding.
pub struct GeminiClient {
    client: Client,
    config: ExtractionConfig,
    api_key: String,
}

impl GeminiClient {
    pub fn new(config: ExtractionConfig, api_key: String) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;
        Ok(Self {
            client,
            config,
            api_key,
        })
    }

    /// The request's own instruction wins over the configured one.
    fn prompt(&self, request: &ExtractionRequest) -> String {
        match (&request.instruction, &self.config.instruction) {
            (None, Some(instruction)) => build_prompt(&ExtractionRequest {
                instruction: Some(instruction.clone()),
                ..request.clone()
            }),
            _ => build_prompt(request),
        }
    }

    fn payload(&self, request: &ExtractionRequest) -> Value {
        json!({
            "contents": [{ "parts": [{ "text": self.prompt(request) }] }],
            "generationConfig": {
                "temperature": self.config.temperature,
                "maxOutputTokens": self.config.max_output_tokens,
            },
            "tools": [{ "google_search": {} }],
        })
    }
}

#[async_trait]
impl ExtractionService for GeminiClient {
    async fn extract(&self, request: &ExtractionRequest) -> Result<ExtractedFields> {
        tracing::debug!("Making extraction request for: {}", request.name);

        let response = self
            .client
            .post(&self.config.endpoint)
            .query(&[("key", self.api_key.as_str())])
            .json(&self.payload(request))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    EnrichError::extraction(format!(
                        "request timed out after {}s",
                        self.config.timeout_seconds
                    ))
                } else {
                    EnrichError::extraction(format!("request failed: {}", e))
                }
            })?;

        let status = response.status();
        tracing::debug!("Extraction response status: {}", status);
        if !status.is_success() {
            return Err(EnrichError::extraction(format!("HTTP {}", status)));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| EnrichError::extraction(format!("unreadable response body: {}", e)))?;
        let text = answer_text(&body)
            .ok_or_else(|| EnrichError::extraction("response carried no answer text"))?;

        parse_answer(&text).map_err(|e| match e {
            EnrichError::SerializationError(err) => {
                EnrichError::extraction(format!("answer is not valid JSON: {}", err))
            }
            other => other,
        })
    }
}
