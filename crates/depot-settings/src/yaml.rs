//! YAML value helpers
//!
//! Typed accessors over `serde_yaml::Value` used by the schema tables, and
//! unknown-field detection with "did you mean" suggestions.

use crate::error::{Result, SettingsError};
use serde_yaml::Value as YamlValue;

/// YAML value helpers
pub struct YamlFields;

impl YamlFields {
    /// Parse a YAML string, an empty document yields `Null`
    pub fn parse(yaml_str: &str) -> Result<YamlValue> {
        if yaml_str.trim().is_empty() {
            return Ok(YamlValue::Null);
        }
        Ok(serde_yaml::from_str(yaml_str)?)
    }

    /// Scalar as string; numbers and booleans are converted
    pub fn as_string(value: &YamlValue, field: &str) -> Result<String> {
        match value {
            YamlValue::String(s) => Ok(s.clone()),
            YamlValue::Number(n) => Ok(n.to_string()),
            YamlValue::Bool(b) => Ok(b.to_string()),
            other => Err(Self::mismatch(field, "a string", other)),
        }
    }

    pub fn as_bool(value: &YamlValue, field: &str) -> Result<bool> {
        value
            .as_bool()
            .ok_or_else(|| Self::mismatch(field, "a boolean", value))
    }

    pub fn as_i64(value: &YamlValue, field: &str) -> Result<i64> {
        value
            .as_i64()
            .ok_or_else(|| Self::mismatch(field, "an integer", value))
    }

    /// Sequence of scalars, each converted to a string
    pub fn as_string_list(value: &YamlValue, field: &str) -> Result<Vec<String>> {
        let sequence = value
            .as_sequence()
            .ok_or_else(|| Self::mismatch(field, "a list", value))?;

        sequence
            .iter()
            .enumerate()
            .map(|(index, item)| Self::as_string(item, &format!("{}[{}]", field, index)))
            .collect()
    }

    /// Parse a scalar through `FromStr`
    pub fn as_parsed<T>(value: &YamlValue, field: &str) -> Result<T>
    where
        T: std::str::FromStr,
        T::Err: std::fmt::Display,
    {
        Self::as_string(value, field)?
            .parse()
            .map_err(|e: T::Err| SettingsError::invalid(field, e.to_string()))
    }

    /// Get all keys from a YAML mapping
    pub fn get_keys(obj: &YamlValue) -> Vec<String> {
        if let Some(mapping) = obj.as_mapping() {
            mapping
                .keys()
                .filter_map(|k| k.as_str())
                .map(|s| s.to_string())
                .collect()
        } else {
            Vec::new()
        }
    }

    /// Describe the kind of a value for error messages
    pub fn kind(value: &YamlValue) -> &'static str {
        match value {
            YamlValue::Null => "null",
            YamlValue::Bool(_) => "a boolean",
            YamlValue::Number(_) => "a number",
            YamlValue::String(_) => "a string",
            YamlValue::Sequence(_) => "a list",
            YamlValue::Mapping(_) => "a mapping",
            YamlValue::Tagged(_) => "a tagged value",
        }
    }

    fn mismatch(field: &str, expected: &str, actual: &YamlValue) -> SettingsError {
        SettingsError::invalid(field, format!("expected {}, got {}", expected, Self::kind(actual)))
    }

    /// Validate fields in a YAML object against a list of known fields
    /// Returns warnings for unknown fields with suggestions
    pub fn validate_fields(obj: &YamlValue, known_fields: &[&str], context: &str) -> Vec<String> {
        let mut warnings = Vec::new();

        for field_name in Self::get_keys(obj) {
            if known_fields.contains(&field_name.as_str()) {
                continue;
            }

            // Check if this is a common typo
            let typo_correction = FIELD_CORRECTIONS
                .iter()
                .find(|(typo, _)| *typo == field_name)
                .map(|(_, correct)| *correct);

            // Try fuzzy matching if no exact typo match
            let suggestion = if let Some(correct) = typo_correction {
                format!(" Did you mean '{}'?", correct)
            } else if let Some(similar) = Self::find_similar_field(&field_name, known_fields) {
                format!(" Did you mean '{}'?", similar)
            } else {
                String::new()
            };

            warnings.push(format!(
                "Unknown field '{}' in {}.{}",
                field_name, context, suggestion
            ));
        }

        warnings
    }

    /// Find similar field names using Levenshtein distance
    fn find_similar_field(field: &str, known_fields: &[&str]) -> Option<String> {
        known_fields
            .iter()
            .filter(|known| levenshtein_distance(field, known) <= 2)
            .min_by_key(|known| levenshtein_distance(field, known))
            .map(|s| s.to_string())
    }
}

/// Common field name mistakes and their corrections
const FIELD_CORRECTIONS: &[(&str, &str)] = &[
    ("storage", "storageProvider"),
    ("storage_provider", "storageProvider"),
    ("proxy", "proxied"),
    ("proxies", "proxied"),
    ("base_path", "basePath"),
    ("icp_license", "icpLicense"),
    ("forwarded_ip", "forwardedIp"),
    ("interval", "resolvedRequestsInterval"),
];

/// Calculate Levenshtein distance between two strings
fn levenshtein_distance(s1: &str, s2: &str) -> usize {
    let s1_chars: Vec<char> = s1.chars().collect();
    let s2_chars: Vec<char> = s2.chars().collect();

    if s1_chars.is_empty() {
        return s2_chars.len();
    }
    if s2_chars.is_empty() {
        return s1_chars.len();
    }

    let mut previous: Vec<usize> = (0..=s2_chars.len()).collect();
    let mut current = vec![0; s2_chars.len() + 1];

    for (i, c1) in s1_chars.iter().enumerate() {
        current[0] = i + 1;
        for (j, c2) in s2_chars.iter().enumerate() {
            let cost = if c1 == c2 { 0 } else { 1 };
            current[j + 1] = (previous[j + 1] + 1) // deletion
                .min(current[j] + 1) // insertion
                .min(previous[j] + cost); // substitution
        }
        std::mem::swap(&mut previous, &mut current);
    }

    previous[s2_chars.len()]
}
