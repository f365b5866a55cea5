use crate::domain::states::is_all_india;
use crate::utils::error::{EnrichError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "NBFC")]
    Nbfc,
    #[serde(rename = "PSU Bank")]
    PsuBank,
    #[serde(rename = "Private Bank")]
    PrivateBank,
    #[serde(rename = "Cooperative Bank")]
    CooperativeBank,
    #[serde(rename = "Corporate Bank")]
    CorporateBank,
    #[serde(rename = "Small Finance Bank")]
    SmallFinanceBank,
    #[serde(rename = "Foreign Bank")]
    ForeignBank,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::Nbfc,
        Category::PsuBank,
        Category::PrivateBank,
        Category::CooperativeBank,
        Category::CorporateBank,
        Category::SmallFinanceBank,
        Category::ForeignBank,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Category::Nbfc => "NBFC",
            Category::PsuBank => "PSU Bank",
            Category::PrivateBank => "Private Bank",
            Category::CooperativeBank => "Cooperative Bank",
            Category::CorporateBank => "Corporate Bank",
            Category::SmallFinanceBank => "Small Finance Bank",
            Category::ForeignBank => "Foreign Bank",
        }
    }

    pub fn is_bank(&self) -> bool {
        !matches!(self, Category::Nbfc)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Category {
    type Err = EnrichError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        Category::ALL
            .into_iter()
            .find(|c| c.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| EnrichError::InvalidInput {
                field: "company_type".to_string(),
                value: s.to_string(),
            })
    }
}

/// How an institution's website is checked before extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryGroup {
    /// Curated bank-type categories, accepted without scoring.
    Trusted,
    /// Everything else goes through the keyword scorer.
    Heuristic,
}

/// One lender to enrich.
#[derive(Debug, Clone, PartialEq)]
pub struct Institution {
    pub name: String,
    pub category: Category,
    pub website: String,
    pub pan_india: Option<bool>,
    /// Upstream URL-discovery outcome, when the input carries one.
    pub outcome: Option<String>,
}

impl Institution {
    pub const OFFICIAL_WEBSITE_FOUND: &'static str = "OFFICIAL_WEBSITE_FOUND";

    pub fn new(name: impl Into<String>, category: Category, website: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            category,
            website: website.into(),
            pan_india: None,
            outcome: None,
        }
    }

    pub fn with_pan_india(mut self, pan_india: bool) -> Self {
        self.pan_india = Some(pan_india);
        self
    }

    pub fn with_outcome(mut self, outcome: impl Into<String>) -> Self {
        self.outcome = Some(outcome.into());
        self
    }

    pub fn is_known_pan_india(&self) -> bool {
        self.pan_india.unwrap_or(false)
    }

    /// A confirmed official website lets a failed validation through.
    pub fn has_validation_override(&self) -> bool {
        self.outcome.as_deref() == Some(Self::OFFICIAL_WEBSITE_FOUND)
    }
}

/// Raw field map returned by the extraction service.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractedFields {
    fields: Map<String, Value>,
}

impl ExtractedFields {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key).filter(|v| !v.is_null())
    }

    /// First non-null value among `keys`.
    pub fn get_any(&self, keys: &[&str]) -> Option<&Value> {
        keys.iter().find_map(|key| self.get(key))
    }

    pub fn f64(&self, keys: &[&str]) -> Option<f64> {
        match self.get_any(keys)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().replace(',', "").parse().ok(),
            _ => None,
        }
    }

    pub fn i64(&self, keys: &[&str]) -> Option<i64> {
        match self.get_any(keys)? {
            Value::Number(n) => n
                .as_i64()
                .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
            Value::String(s) => s.trim().replace(',', "").parse().ok(),
            _ => None,
        }
    }

    pub fn string(&self, keys: &[&str]) -> String {
        match self.get_any(keys) {
            Some(Value::String(s)) => s.trim().to_string(),
            Some(Value::Number(n)) => n.to_string(),
            Some(Value::Bool(b)) => b.to_string(),
            _ => String::new(),
        }
    }

    pub fn bool(&self, keys: &[&str]) -> bool {
        match self.get_any(keys) {
            Some(Value::Bool(b)) => *b,
            Some(Value::String(s)) => parse_flag(s),
            Some(Value::Number(n)) => n.as_i64() == Some(1),
            _ => false,
        }
    }

    /// List value with blank entries dropped; `None` when the value is not a list.
    pub fn string_list(&self, keys: &[&str]) -> Option<Vec<String>> {
        match self.get_any(keys)? {
            Value::Array(items) => Some(
                items
                    .iter()
                    .filter_map(|item| match item {
                        Value::String(s) => Some(s.trim().to_string()),
                        Value::Number(n) => Some(n.to_string()),
                        _ => None,
                    })
                    .filter(|s| !s.is_empty())
                    .collect(),
            ),
            _ => None,
        }
    }
}

pub(crate) fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "true" | "yes" | "y" | "1"
    )
}

/// Facts gathered for a successfully enriched institution.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Enrichment {
    pub aum_crores: Option<f64>,
    pub product_types: Vec<String>,
    pub primary_product: String,
    pub hq_location: String,
    pub hq_state: String,
    pub operating_states: Vec<String>,
    pub pan_india: bool,
    pub established_year: Option<i64>,
    pub employee_count: Option<i64>,
    /// Lakhs.
    pub ticket_size_min: Option<f64>,
    /// Lakhs.
    pub ticket_size_max: Option<f64>,
    pub has_subsidiaries: bool,
    pub phone: String,
    pub email: String,
    pub data_source: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Success(Enrichment),
    Failed { error: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Success,
    Failed,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Success => "success",
            Status::Failed => "failed",
        }
    }
}

/// One output row. Either carries enrichment data or an error, never both.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedRecord {
    pub company_name: String,
    pub company_type: Category,
    pub website: String,
    pub outcome: Outcome,
}

impl EnrichedRecord {
    pub fn success(institution: &Institution, enrichment: Enrichment) -> Self {
        Self {
            company_name: institution.name.clone(),
            company_type: institution.category,
            website: institution.website.clone(),
            outcome: Outcome::Success(enrichment),
        }
    }

    pub fn failed(institution: &Institution, error: impl Into<String>) -> Self {
        Self {
            company_name: institution.name.clone(),
            company_type: institution.category,
            website: institution.website.clone(),
            outcome: Outcome::Failed {
                error: error.into(),
            },
        }
    }

    pub fn status(&self) -> Status {
        match self.outcome {
            Outcome::Success(_) => Status::Success,
            Outcome::Failed { .. } => Status::Failed,
        }
    }

    pub fn enrichment(&self) -> Option<&Enrichment> {
        match &self.outcome {
            Outcome::Success(data) => Some(data),
            Outcome::Failed { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.outcome {
            Outcome::Success(_) => None,
            Outcome::Failed { error } => Some(error),
        }
    }

    pub fn is_pan_india(&self) -> bool {
        self.enrichment().is_some_and(|data| data.pan_india)
    }

    /// Cells in `schema` column order.
    pub fn to_cells(&self, schema: Schema) -> Result<Vec<String>> {
        let mut row: HashMap<&'static str, String> = HashMap::new();
        row.insert("company_name", self.company_name.clone());
        row.insert("company_type", self.company_type.label().to_string());
        row.insert("website", self.website.clone());
        row.insert("extraction_status", self.status().as_str().to_string());
        row.insert("error", self.error().unwrap_or_default().to_string());

        if let Some(data) = self.enrichment() {
            row.insert("aum_crores", opt_cell(data.aum_crores));
            row.insert("product_types", serde_json::to_string(&data.product_types)?);
            row.insert("primary_product", data.primary_product.clone());
            row.insert("hq_location", data.hq_location.clone());
            row.insert("hq_state", data.hq_state.clone());
            row.insert(
                "operating_states",
                serde_json::to_string(&data.operating_states)?,
            );
            row.insert("pan_india", data.pan_india.to_string());
            row.insert("established_year", opt_cell(data.established_year));
            row.insert("employee_count", opt_cell(data.employee_count));
            row.insert("ticket_size_min", opt_cell(data.ticket_size_min));
            row.insert("ticket_size_max", opt_cell(data.ticket_size_max));
            row.insert("has_subsidiaries", data.has_subsidiaries.to_string());
            row.insert("phone", data.phone.clone());
            row.insert("email", data.email.clone());
            row.insert("data_source", data.data_source.clone());
        }

        Ok(schema
            .columns()
            .iter()
            .map(|column| row.remove(column).unwrap_or_default())
            .collect())
    }

    /// Rebuilds a record from a header row and the matching cells.
    pub fn from_cells(headers: &[String], cells: &[String]) -> Result<Self> {
        let row: HashMap<&str, &str> = headers
            .iter()
            .map(String::as_str)
            .zip(cells.iter().map(String::as_str))
            .collect();
        let cell = |name: &str| row.get(name).copied().unwrap_or_default();

        let company_name = cell("company_name").to_string();
        let company_type: Category = cell("company_type").parse()?;
        let website = cell("website").to_string();

        let outcome = match cell("extraction_status") {
            "failed" => Outcome::Failed {
                error: cell("error").to_string(),
            },
            "success" => {
                let operating_states = list_cell("operating_states", cell("operating_states"))?;
                let pan_india = match row.get("pan_india") {
                    Some(flag) => parse_flag(flag),
                    None => is_all_india(&operating_states),
                };
                Outcome::Success(Enrichment {
                    aum_crores: num_cell("aum_crores", cell("aum_crores"))?,
                    product_types: list_cell("product_types", cell("product_types"))?,
                    primary_product: cell("primary_product").to_string(),
                    hq_location: cell("hq_location").to_string(),
                    hq_state: cell("hq_state").to_string(),
                    operating_states,
                    pan_india,
                    established_year: num_cell("established_year", cell("established_year"))?,
                    employee_count: num_cell("employee_count", cell("employee_count"))?,
                    ticket_size_min: num_cell("ticket_size_min", cell("ticket_size_min"))?,
                    ticket_size_max: num_cell("ticket_size_max", cell("ticket_size_max"))?,
                    has_subsidiaries: parse_flag(cell("has_subsidiaries")),
                    phone: cell("phone").to_string(),
                    email: cell("email").to_string(),
                    data_source: cell("data_source").to_string(),
                })
            }
            other => {
                return Err(EnrichError::InvalidInput {
                    field: "extraction_status".to_string(),
                    value: other.to_string(),
                })
            }
        };

        Ok(Self {
            company_name,
            company_type,
            website,
            outcome,
        })
    }
}

fn opt_cell<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn num_cell<T: FromStr>(field: &str, value: &str) -> Result<Option<T>> {
    if value.trim().is_empty() {
        return Ok(None);
    }
    value
        .trim()
        .parse()
        .map(Some)
        .map_err(|_| EnrichError::InvalidInput {
            field: field.to_string(),
            value: value.to_string(),
        })
}

fn list_cell(field: &str, value: &str) -> Result<Vec<String>> {
    if value.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(value).map_err(|_| EnrichError::InvalidInput {
        field: field.to_string(),
        value: value.to_string(),
    })
}

/// Column layout of the tabular output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Schema {
    /// Curated banks; carries `pan_india`.
    Bank,
    /// NBFC input files.
    General,
}

const BANK_COLUMNS: [&str; 20] = [
    "company_name",
    "company_type",
    "website",
    "aum_crores",
    "product_types",
    "primary_product",
    "hq_location",
    "hq_state",
    "operating_states",
    "pan_india",
    "established_year",
    "employee_count",
    "ticket_size_min",
    "ticket_size_max",
    "has_subsidiaries",
    "phone",
    "email",
    "data_source",
    "extraction_status",
    "error",
];

const GENERAL_COLUMNS: [&str; 19] = [
    "company_name",
    "company_type",
    "website",
    "aum_crores",
    "product_types",
    "primary_product",
    "hq_location",
    "hq_state",
    "operating_states",
    "established_year",
    "employee_count",
    "ticket_size_min",
    "ticket_size_max",
    "has_subsidiaries",
    "phone",
    "email",
    "data_source",
    "extraction_status",
    "error",
];

impl Schema {
    pub fn columns(&self) -> &'static [&'static str] {
        match self {
            Schema::Bank => &BANK_COLUMNS,
            Schema::General => &GENERAL_COLUMNS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(value: Value) -> ExtractedFields {
        match value {
            Value::Object(map) => ExtractedFields::new(map),
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_category_parsing_is_case_insensitive() {
        assert_eq!("nbfc".parse::<Category>().unwrap(), Category::Nbfc);
        assert_eq!(
            " small finance bank ".parse::<Category>().unwrap(),
            Category::SmallFinanceBank
        );
        assert!("Credit Union".parse::<Category>().is_err());
        for category in Category::ALL {
            assert_eq!(category.label().parse::<Category>().unwrap(), category);
        }
    }

    #[test]
    fn test_extracted_field_accessors() {
        let extracted = fields(json!({
            "aum_crores": "12,500.5",
            "established_year": 1994.0,
            "employee_count": null,
            "phone": 912233445566u64,
            "has_subsidiaries": "yes",
            "product_types": ["Home Loan", " ", 42],
            "operating_states": "Maharashtra"
        }));

        assert_eq!(extracted.f64(&["aum_crores"]), Some(12500.5));
        assert_eq!(extracted.i64(&["established_year"]), Some(1994));
        assert_eq!(extracted.i64(&["employee_count"]), None);
        assert_eq!(extracted.string(&["phone"]), "912233445566");
        assert!(extracted.bool(&["has_subsidiaries"]));
        assert_eq!(
            extracted.string_list(&["product_types"]),
            Some(vec!["Home Loan".to_string(), "42".to_string()])
        );
        assert_eq!(extracted.string_list(&["operating_states"]), None);
        assert_eq!(extracted.string(&["missing", "phone"]), "912233445566");
    }

    #[test]
    fn test_failed_record_cells_leave_data_columns_empty() {
        let institution = Institution::new("Nowhere Finance", Category::Nbfc, "");
        let record = EnrichedRecord::failed(&institution, "No URL provided");
        let cells = record.to_cells(Schema::General).unwrap();

        assert_eq!(cells.len(), GENERAL_COLUMNS.len());
        assert_eq!(cells[0], "Nowhere Finance");
        assert_eq!(cells[1], "NBFC");
        assert_eq!(cells[17], "failed");
        assert_eq!(cells[18], "No URL provided");
        assert!(cells[3..17].iter().all(String::is_empty));
    }

    #[test]
    fn test_general_schema_infers_pan_india_from_states() {
        let headers: Vec<String> = GENERAL_COLUMNS.iter().map(|c| c.to_string()).collect();
        let institution = Institution::new("Wide NBFC", Category::Nbfc, "https://wide.in");
        let record = EnrichedRecord::success(
            &institution,
            Enrichment {
                operating_states: crate::domain::states::all_india_states(),
                pan_india: true,
                data_source: "gemini".to_string(),
                ..Enrichment::default()
            },
        );

        let cells = record.to_cells(Schema::General).unwrap();
        let parsed = EnrichedRecord::from_cells(&headers, &cells).unwrap();
        assert_eq!(parsed, record);
    }

    #[test]
    fn test_unknown_status_is_rejected() {
        let headers = vec![
            "company_name".to_string(),
            "company_type".to_string(),
            "extraction_status".to_string(),
        ];
        let cells = vec![
            "X".to_string(),
            "NBFC".to_string(),
            "pending".to_string(),
        ];
        assert!(EnrichedRecord::from_cells(&headers, &cells).is_err());
    }
}
