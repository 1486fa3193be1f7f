//! JSON Schema of the configuration file.

use super::CharmerConfig;

/// Generates a JSON Schema for the windowcharmer configuration.
///
/// The schema includes all configuration options with their types,
/// descriptions, and default values.
#[must_use]
pub fn generate_schema() -> schemars::Schema { schemars::schema_for!(CharmerConfig) }

/// Generates a pretty-printed JSON Schema string for the configuration.
#[must_use]
pub fn generate_schema_json() -> String {
    let schema = generate_schema();
    serde_json::to_string_pretty(&schema).unwrap_or_default()
}
