//! Schema validation helpers for Registro JSON5 configuration.

use crate::ConfigError;
use serde_json::{Map, Value};

/// Validate a single config layer against the schema.
pub(super) fn validate_layer_schema(value: &Value, layer: &str) -> Result<(), ConfigError> {
    let map = expect_object(value, layer, "")?;
    ensure_allowed_keys(map, &["$schema", "api", "export"], layer, "")?;

    if let Some(value) = map.get("$schema") {
        expect_string(value, layer, "$schema")?;
    }
    if let Some(value) = map.get("api") {
        validate_api(value, layer, "api")?;
    }
    if let Some(value) = map.get("export") {
        validate_export(value, layer, "export")?;
    }
    Ok(())
}

/// Validate the "api" block.
fn validate_api(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    let map = expect_object(value, layer, path)?;
    ensure_allowed_keys(map, &["base_url", "timeout_secs"], layer, path)?;
    if let Some(value) = map.get("base_url") {
        expect_string(value, layer, &join(path, "base_url"))?;
    }
    if let Some(value) = map.get("timeout_secs") {
        expect_u64(value, layer, &join(path, "timeout_secs"))?;
    }
    Ok(())
}

/// Validate the "export" block.
fn validate_export(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    let map = expect_object(value, layer, path)?;
    ensure_allowed_keys(map, &["directory"], layer, path)?;
    if let Some(value) = map.get("directory")
        && !value.is_null()
    {
        expect_string(value, layer, &join(path, "directory"))?;
    }
    Ok(())
}

fn expect_object<'a>(
    value: &'a Value,
    layer: &str,
    path: &str,
) -> Result<&'a Map<String, Value>, ConfigError> {
    value
        .as_object()
        .ok_or_else(|| invalid(layer, path, "expected object"))
}

fn expect_string(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    if value.is_string() {
        Ok(())
    } else {
        Err(invalid(layer, path, "expected string"))
    }
}

fn expect_u64(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    if value.as_u64().is_some() {
        Ok(())
    } else {
        Err(invalid(layer, path, "expected non-negative integer"))
    }
}

fn ensure_allowed_keys(
    map: &Map<String, Value>,
    allowed: &[&str],
    layer: &str,
    path: &str,
) -> Result<(), ConfigError> {
    for key in map.keys() {
        if !allowed.contains(&key.as_str()) {
            return Err(invalid(
                layer,
                &join(path, key),
                &format!("unknown key '{key}'"),
            ));
        }
    }
    Ok(())
}

fn join(path: &str, key: &str) -> String {
    if path.is_empty() {
        key.to_string()
    } else {
        format!("{path}.{key}")
    }
}

fn invalid(layer: &str, path: &str, message: &str) -> ConfigError {
    let path = if path.is_empty() { "<root>" } else { path };
    ConfigError::InvalidField {
        path: format!("{layer}:{path}"),
        message: message.to_string(),
    }
}
