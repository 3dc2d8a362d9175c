//! Configuration management for ramlkit normalization.
//!
//! This module defines the `Config` struct consulted by validators and
//! normalizers. The configuration can be created programmatically, loaded from
//! a YAML, JSON or TOML file, or extended with user-defined whitelist entries.
//!
//! # Examples
//!
//! ```no_run
//! use ramlkit_core::config::Config;
//!
//! // Create a permissive config programmatically
//! let mut config = Config::default();
//! config.validate = true;
//!
//! // Or load from a config file
//! # async fn load() -> ramlkit_core::Result<()> {
//! let config = Config::from_file("ramlkit.yaml").await?;
//! # Ok(())
//! # }
//! ```

// Internal imports (std, crate)
use std::path::Path;

// External imports (alphabetized)
use serde::{Deserialize, Serialize};
use tokio::fs;

/// Options recognized by validators and normalizers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Fail on the first validation error instead of collecting diagnostics
    #[serde(default)]
    pub validate: bool,

    /// Whether the document is meant to be production-ready
    #[serde(default)]
    pub production: bool,

    /// Accepted HTTP response status codes
    #[serde(default = "default_resp_codes")]
    pub resp_codes: Vec<u16>,

    /// Accept the literal `default` as a response key
    #[serde(default)]
    pub default_response: bool,

    /// Well-known media types accepted in addition to any `type/subtype` string
    #[serde(default = "default_media_types")]
    pub media_types: Vec<String>,

    /// Protocols accepted in `protocols` declarations
    #[serde(default = "default_protocols")]
    pub protocols: Vec<String>,

    /// Supported HTTP methods
    #[serde(default = "default_http_methods")]
    pub http_methods: Vec<String>,

    /// Primitive types allowed for named parameters
    #[serde(default = "default_prim_types")]
    pub prim_types: Vec<String>,

    /// Supported document versions
    #[serde(default = "default_raml_versions")]
    pub raml_versions: Vec<String>,
}

/// User-defined additions to a [`Config`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CustomConfig {
    #[serde(default)]
    pub validate: Option<bool>,
    #[serde(default)]
    pub production: Option<bool>,
    #[serde(default)]
    pub resp_codes: Vec<u16>,
    #[serde(default)]
    pub media_types: Vec<String>,
    #[serde(default)]
    pub protocols: Vec<String>,
    #[serde(default)]
    pub http_methods: Vec<String>,
    #[serde(default)]
    pub prim_types: Vec<String>,
    #[serde(default)]
    pub raml_versions: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            validate: false,
            production: false,
            resp_codes: default_resp_codes(),
            default_response: false,
            media_types: default_media_types(),
            protocols: default_protocols(),
            http_methods: default_http_methods(),
            prim_types: default_prim_types(),
            raml_versions: default_raml_versions(),
        }
    }
}

impl Config {
    /// A config that aborts on the first validation error
    pub fn strict() -> Self {
        Self {
            validate: true,
            ..Self::default()
        }
    }

    /// Load configuration from a file; the format is picked by extension
    pub async fn from_file<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).await?;
        let config = match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => toml::from_str(&content)?,
            Some("json") => serde_json::from_str(&content)?,
            Some("yaml") | Some("yml") => serde_yaml::from_str(&content)?,
            other => {
                return Err(crate::Error::config(format!(
                    "Unsupported config file extension {:?} for {}",
                    other,
                    path.display()
                )));
            }
        };
        log::debug!("loaded config from {}", path.display());
        Ok(config)
    }

    /// Save configuration to a file as YAML
    pub async fn save<P: AsRef<Path>>(&self, path: P) -> crate::Result<()> {
        let content = serde_yaml::to_string(self)?;
        fs::write(path, content).await?;
        Ok(())
    }

    /// Extend the whitelists with user-defined values
    pub fn add_custom(&mut self, custom: CustomConfig) {
        extend_unique(&mut self.resp_codes, custom.resp_codes);
        extend_unique(&mut self.media_types, custom.media_types);
        extend_unique(&mut self.protocols, custom.protocols);
        extend_unique(&mut self.http_methods, custom.http_methods);
        extend_unique(&mut self.prim_types, custom.prim_types);
        extend_unique(&mut self.raml_versions, custom.raml_versions);
        if let Some(validate) = custom.validate {
            self.validate = validate;
        }
        if let Some(production) = custom.production {
            self.production = production;
        }
    }

    /// HTTP methods followed by their optional (`get?`) forms
    pub fn http_optional(&self) -> Vec<String> {
        self.http_methods
            .iter()
            .map(|m| format!("{}?", m))
            .chain(self.http_methods.iter().cloned())
            .collect()
    }
}

fn extend_unique<T: PartialEq>(target: &mut Vec<T>, items: Vec<T>) {
    for item in items {
        if !target.contains(&item) {
            target.push(item);
        }
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn default_resp_codes() -> Vec<u16> {
    vec![
        100, 101, 200, 201, 202, 203, 204, 205, 206, 300, 301, 302, 303, 304, 305, 307, 400, 401,
        402, 403, 404, 405, 406, 407, 408, 409, 410, 411, 412, 413, 414, 415, 416, 417, 428, 429,
        431, 500, 501, 502, 503, 504, 505, 511,
    ]
}

fn default_media_types() -> Vec<String> {
    strings(&[
        "text/yaml",
        "text/x-yaml",
        "application/yaml",
        "application/x-yaml",
        "multipart/form-data",
        "text/html",
        "application/x-www-form-urlencoded",
        "text/plain",
    ])
}

fn default_protocols() -> Vec<String> {
    strings(&["HTTP", "HTTPS"])
}

fn default_http_methods() -> Vec<String> {
    strings(&[
        "get", "post", "put", "delete", "patch", "head", "options", "trace", "connect",
    ])
}

fn default_prim_types() -> Vec<String> {
    strings(&["string", "integer", "number", "boolean", "date", "file"])
}

fn default_raml_versions() -> Vec<String> {
    strings(&["0.8"])
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_config_roundtrip() -> crate::Result<()> {
        let dir = tempdir()?;
        let file_path = dir.path().join("config.yaml");

        let config = Config::strict();
        config.save(&file_path).await?;

        let loaded = Config::from_file(&file_path).await?;
        assert!(loaded.validate);
        assert!(!loaded.production);
        assert_eq!(loaded, config);

        Ok(())
    }

    #[tokio::test]
    async fn test_config_from_toml_fills_defaults() -> crate::Result<()> {
        let dir = tempdir()?;
        let file_path = dir.path().join("config.toml");
        tokio::fs::write(&file_path, "validate = true\nresp_codes = [200, 299]\n").await?;

        let loaded = Config::from_file(&file_path).await?;
        assert!(loaded.validate);
        assert_eq!(loaded.resp_codes, vec![200, 299]);
        assert_eq!(loaded.prim_types, default_prim_types());

        Ok(())
    }

    #[tokio::test]
    async fn test_config_unknown_extension() -> crate::Result<()> {
        let dir = tempdir()?;
        let file_path = dir.path().join("config.ini");
        tokio::fs::write(&file_path, "validate = true").await?;

        let err = Config::from_file(&file_path).await.unwrap_err();
        assert!(matches!(err, crate::Error::Config(_)));
        Ok(())
    }

    #[test]
    fn test_add_custom_extends_without_duplicates() {
        let mut config = Config::default();
        config.add_custom(CustomConfig {
            validate: Some(true),
            resp_codes: vec![299, 200],
            prim_types: vec!["uuid".into()],
            ..Default::default()
        });
        assert!(config.validate);
        assert_eq!(config.resp_codes.iter().filter(|c| **c == 200).count(), 1);
        assert!(config.resp_codes.contains(&299));
        assert_eq!(config.prim_types.last().unwrap(), "uuid");
    }

    #[test]
    fn test_http_optional() {
        let config = Config {
            http_methods: vec!["get".into(), "post".into()],
            ..Config::default()
        };
        assert_eq!(config.http_optional(), vec!["get?", "post?", "get", "post"]);
    }
}
