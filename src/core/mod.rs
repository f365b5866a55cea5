// Core layer: website scoring, record assembly and the enrichment loop.

pub mod engine;
pub mod record_builder;
pub mod validator;
