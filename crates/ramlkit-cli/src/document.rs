//! Reading RAML documents from disk.

// Internal imports (std, crate)
use std::path::Path;

// External imports (alphabetized)
use anyhow::Context;
use ramlkit_core::{Config, Error};
use serde_json::{Map as JsonMap, Number, Value as JsonValue};
use serde_yaml::Value as YamlValue;
use tokio::fs;

const HEADER_PREFIX: &str = "#%RAML";

/// Read and parse the document at `path`.
pub async fn load(path: &Path, config: &Config) -> anyhow::Result<JsonValue> {
    let content = fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let version = check_header(&content, config)?;
    tracing::debug!("{} declares RAML {}", path.display(), version);
    parse(&content).with_context(|| format!("Failed to parse {}", path.display()))
}

/// Validate the `#%RAML <version>` first line and return the version.
pub fn check_header<'c>(content: &'c str, config: &Config) -> Result<&'c str, Error> {
    let first = content.lines().next().unwrap_or_default().trim();
    let version = first
        .strip_prefix(HEADER_PREFIX)
        .map(str::trim)
        .ok_or_else(|| {
            Error::document(format!("expected '{} <version>', got '{}'", HEADER_PREFIX, first))
        })?;
    if !config.raml_versions.iter().any(|v| v == version) {
        return Err(Error::document(format!(
            "unsupported RAML version '{}' (supported: {})",
            version,
            config.raml_versions.join(", ")
        )));
    }
    Ok(version)
}

/// Parse YAML text into the JSON model used by the normalizers.
pub fn parse(content: &str) -> Result<JsonValue, Error> {
    let yaml: YamlValue = serde_yaml::from_str(content)?;
    match yaml {
        YamlValue::Mapping(_) => Ok(to_json(yaml)),
        YamlValue::Null => Err(Error::document("document is empty")),
        _ => Err(Error::document("document root must be a mapping")),
    }
}

/// Convert a YAML value to JSON. Mapping keys are rendered as strings, so
/// `200:` and `"200":` both become `"200"`; tagged values such as
/// `!include` keep only their payload.
fn to_json(value: YamlValue) -> JsonValue {
    match value {
        YamlValue::Null => JsonValue::Null,
        YamlValue::Bool(b) => JsonValue::Bool(b),
        YamlValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                JsonValue::from(i)
            } else if let Some(u) = n.as_u64() {
                JsonValue::from(u)
            } else {
                n.as_f64()
                    .and_then(Number::from_f64)
                    .map(JsonValue::Number)
                    .unwrap_or(JsonValue::Null)
            }
        }
        YamlValue::String(s) => JsonValue::String(s),
        YamlValue::Sequence(items) => JsonValue::Array(items.into_iter().map(to_json).collect()),
        YamlValue::Mapping(mapping) => {
            let mut map = JsonMap::with_capacity(mapping.len());
            for (key, value) in mapping {
                map.insert(key_to_string(key), to_json(value));
            }
            JsonValue::Object(map)
        }
        YamlValue::Tagged(tagged) => {
            tracing::debug!("dropping YAML tag {}", tagged.tag);
            to_json(tagged.value)
        }
    }
}

fn key_to_string(key: YamlValue) -> String {
    match key {
        YamlValue::String(s) => s,
        YamlValue::Number(n) => n.to_string(),
        YamlValue::Bool(b) => b.to_string(),
        YamlValue::Null => "null".to_string(),
        other => serde_yaml::to_string(&other)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_default(),
    }
}
