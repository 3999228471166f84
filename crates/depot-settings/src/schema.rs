//! Schema tables
//!
//! Each settings block declares a static list of [`Field`]s. The loader walks
//! the list, applying every present field onto the block. Absent or null
//! fields keep their defaults, unknown fields are logged.

use crate::error::{Result, SettingsError};
use crate::yaml::YamlFields;
use serde_yaml::Value as YamlValue;

/// One field of a settings block
pub(crate) struct Field<T> {
    pub name: &'static str,
    /// Applies the YAML value onto the target, the `&str` is the field path for errors
    pub apply: fn(&mut T, &YamlValue, &str) -> Result<()>,
}

impl<T> Field<T> {
    pub const fn new(name: &'static str, apply: fn(&mut T, &YamlValue, &str) -> Result<()>) -> Self {
        Self { name, apply }
    }
}

/// Walk `fields` over the mapping in `value`
pub(crate) fn apply_fields<T>(
    target: &mut T,
    value: &YamlValue,
    fields: &[Field<T>],
    context: &str,
) -> Result<()> {
    match value {
        YamlValue::Null => return Ok(()),
        YamlValue::Mapping(_) => {}
        other => {
            return Err(SettingsError::invalid(
                display_context(context),
                format!("expected a mapping, got {}", YamlFields::kind(other)),
            ))
        }
    }

    let known: Vec<&str> = fields.iter().map(|field| field.name).collect();
    for warning in YamlFields::validate_fields(value, &known, display_context(context)) {
        tracing::warn!("{}", warning);
    }

    for field in fields {
        match value.get(field.name) {
            None | Some(YamlValue::Null) => {}
            Some(field_value) => (field.apply)(target, field_value, &path(context, field.name))?,
        }
    }

    Ok(())
}

/// `parent.child`, or `child` at the root
pub(crate) fn path(context: &str, name: &str) -> String {
    if context.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", context, name)
    }
}

fn display_context(context: &str) -> &str {
    if context.is_empty() {
        "configuration"
    } else {
        context
    }
}
