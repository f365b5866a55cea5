use crate::domain::model::{Category, EnrichedRecord, Enrichment, ExtractedFields, Institution};
use crate::domain::states::{all_india_states, is_pan_india_sentinel};

pub const DATA_SOURCE: &str = "gemini";

/// `"{city}, {state}"`, dropping whichever side is missing.
pub fn hq_location(city: &str, state: &str) -> String {
    [city.trim(), state.trim()]
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Operating states and pan-India flag after sentinel expansion.
pub fn resolve_operating_states(
    known_pan_india: bool,
    extracted: &ExtractedFields,
) -> (Vec<String>, bool) {
    let raw = extracted.get("operating_states");
    if known_pan_india || raw.is_some_and(is_pan_india_sentinel) {
        return (all_india_states(), true);
    }
    let states = extracted
        .string_list(&["operating_states"])
        .unwrap_or_default();
    (states, false)
}

/// Normalises one extraction payload into a success record.
pub fn build(
    name: &str,
    category: Category,
    url: &str,
    known_pan_india: bool,
    extracted: &ExtractedFields,
) -> EnrichedRecord {
    let institution = Institution::new(name, category, url).with_pan_india(known_pan_india);
    build_for(&institution, extracted)
}

pub fn build_for(institution: &Institution, extracted: &ExtractedFields) -> EnrichedRecord {
    let (operating_states, pan_india) =
        resolve_operating_states(institution.is_known_pan_india(), extracted);
    let hq_state = extracted.string(&["hq_state"]);

    let enrichment = Enrichment {
        aum_crores: extracted.f64(&["aum_crores"]),
        product_types: extracted
            .string_list(&["product_types", "products"])
            .unwrap_or_default(),
        primary_product: extracted.string(&["primary_product"]),
        hq_location: hq_location(&extracted.string(&["hq_city"]), &hq_state),
        hq_state,
        operating_states,
        pan_india,
        established_year: extracted.i64(&["established_year"]),
        employee_count: extracted.i64(&["employee_count"]),
        ticket_size_min: extracted.f64(&["ticket_size_min_lakhs", "ticket_size_min"]),
        ticket_size_max: extracted.f64(&["ticket_size_max_lakhs", "ticket_size_max"]),
        has_subsidiaries: extracted.bool(&["has_subsidiaries"]),
        phone: extracted.string(&["phone"]),
        email: extracted.string(&["email"]),
        data_source: DATA_SOURCE.to_string(),
    };

    EnrichedRecord::success(institution, enrichment)
}
