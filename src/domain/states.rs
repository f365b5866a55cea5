use crate::domain::model::EnrichedRecord;
use serde_json::Value;

/// Sentinel the extraction service uses for nationwide operation.
pub const PAN_INDIA_SENTINEL: &str = "PAN_INDIA";

/// All 28 states followed by the 8 union territories.
pub const ALL_INDIA_STATES: [&str; 36] = [
    "Andhra Pradesh",
    "Arunachal Pradesh",
    "Assam",
    "Bihar",
    "Chhattisgarh",
    "Goa",
    "Gujarat",
    "Haryana",
    "Himachal Pradesh",
    "Jharkhand",
    "Karnataka",
    "Kerala",
    "Madhya Pradesh",
    "Maharashtra",
    "Manipur",
    "Meghalaya",
    "Mizoram",
    "Nagaland",
    "Odisha",
    "Punjab",
    "Rajasthan",
    "Sikkim",
    "Tamil Nadu",
    "Telangana",
    "Tripura",
    "Uttar Pradesh",
    "Uttarakhand",
    "West Bengal",
    "Andaman and Nicobar Islands",
    "Chandigarh",
    "Dadra and Nagar Haveli and Daman and Diu",
    "Delhi",
    "Jammu and Kashmir",
    "Ladakh",
    "Lakshadweep",
    "Puducherry",
];

pub fn all_india_states() -> Vec<String> {
    ALL_INDIA_STATES.iter().map(|s| s.to_string()).collect()
}

pub fn is_all_india(states: &[String]) -> bool {
    states.len() == ALL_INDIA_STATES.len()
        && states.iter().zip(ALL_INDIA_STATES).all(|(a, b)| a == b)
}

/// True for `"PAN_INDIA"` or `["PAN_INDIA"]`.
pub fn is_pan_india_sentinel(value: &Value) -> bool {
    let is_sentinel = |s: &str| s.trim().eq_ignore_ascii_case(PAN_INDIA_SENTINEL);
    match value {
        Value::String(s) => is_sentinel(s),
        Value::Array(items) => matches!(items.as_slice(), [Value::String(s)] if is_sentinel(s)),
        _ => false,
    }
}

/// Successful records that lend in `state`: pan-India ones always match.
pub fn filter_by_state<'a>(records: &'a [EnrichedRecord], state: &str) -> Vec<&'a EnrichedRecord> {
    let wanted = state.trim();
    records
        .iter()
        .filter(|record| match record.enrichment() {
            Some(data) => {
                data.pan_india
                    || data
                        .operating_states
                        .iter()
                        .any(|s| s.eq_ignore_ascii_case(wanted))
            }
            None => false,
        })
        .collect()
}
