//! Security schemes and their `describedBy` clauses.
//!
//! # Examples
//!
//! ```
//! use ramlkit_core::{assemble, Config, Context, ErrorSink};
//! use serde_json::json;
//!
//! let document = json!({
//!     "securitySchemes": [
//!         {"oauth_2_0": {
//!             "type": "OAuth 2.0",
//!             "describedBy": {"headers": {"Authorization": {"type": "string"}}},
//!             "settings": {
//!                 "authorizationUri": "https://example.com/authorize",
//!                 "accessTokenUri": "https://example.com/token"
//!             }
//!         }}
//!     ]
//! });
//! let mut errors = ErrorSink::new();
//! let schemes = assemble(&document, &Config::default(), &mut errors, &Context::default())?
//!     .unwrap();
//! assert_eq!(schemes[0].name, "oauth_2_0");
//! assert_eq!(schemes[0].headers.as_ref().unwrap()[0].name, "Authorization");
//! assert!(errors.is_empty());
//! # Ok::<(), ramlkit_core::Error>(())
//! ```

use serde::Serialize;
use serde_json::{Map as JsonMap, Value as JsonValue};

use crate::body::Body;
use crate::config::Config;
use crate::content::{Content, Documentation};
use crate::diagnostics::ErrorSink;
use crate::error::{EntityKind, Result, ValidationError};
use crate::fields::{get, get_map, get_str, json_type, Typed};
use crate::normalize::{build_list, declaration, Context, Normalize};
use crate::params::{FormParameter, Header, QueryParameter, UriParameter};
use crate::response::Response;
use crate::validate::{self, OAUTH_1, OAUTH_2};

/// A declared security scheme.
///
/// The collections below `settings` are only populated when the matching key
/// appears under `describedBy`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SecurityScheme {
    pub name: String,
    /// The scheme's declaration exactly as written
    #[serde(skip)]
    pub raw: JsonValue,
    #[serde(rename = "type")]
    pub scheme_type: Option<String>,
    #[serde(skip)]
    pub described_by: Option<JsonValue>,
    pub description: Option<String>,
    pub settings: Option<JsonValue>,
    pub headers: Option<Vec<Header>>,
    pub body: Option<Vec<Body>>,
    pub responses: Option<Vec<Response>>,
    pub query_params: Option<Vec<QueryParameter>>,
    pub uri_params: Option<Vec<UriParameter>>,
    pub form_params: Option<Vec<FormParameter>>,
    pub documentation: Option<Vec<Documentation>>,
    pub usage: Option<JsonValue>,
    pub media_type: Option<JsonValue>,
    pub protocols: Option<JsonValue>,
}

/// Settings of the scheme types with a known layout.
#[derive(Debug, Clone, PartialEq)]
pub enum SchemeSettings {
    OAuth1 {
        request_token_uri: Option<String>,
        authorization_uri: Option<String>,
        token_credentials_uri: Option<String>,
    },
    OAuth2 {
        authorization_uri: Option<String>,
        access_token_uri: Option<String>,
        authorization_grants: Vec<String>,
        scopes: Vec<String>,
    },
    Other(JsonMap<String, JsonValue>),
}

impl SecurityScheme {
    pub fn description(&self) -> Option<Content> {
        self.description.as_deref().map(Content::from)
    }

    /// Interpret `settings` according to the scheme type.
    pub fn typed_settings(&self) -> Option<SchemeSettings> {
        let settings = self.settings.as_ref()?;
        let map = settings.as_object()?;
        let data = Some(settings);
        let settings = match self.scheme_type.as_deref() {
            Some(OAUTH_1) => SchemeSettings::OAuth1 {
                request_token_uri: get_str(data, "requestTokenUri"),
                authorization_uri: get_str(data, "authorizationUri"),
                token_credentials_uri: get_str(data, "tokenCredentialsUri"),
            },
            Some(OAUTH_2) => SchemeSettings::OAuth2 {
                authorization_uri: get_str(data, "authorizationUri"),
                access_token_uri: get_str(data, "accessTokenUri"),
                authorization_grants: string_list(get(data, "authorizationGrants")),
                scopes: string_list(get(data, "scopes")),
            },
            _ => SchemeSettings::Other(map.clone()),
        };
        Some(settings)
    }

    fn describe(
        &mut self,
        described_by: &JsonMap<String, JsonValue>,
        config: &Config,
        errors: &mut ErrorSink,
        ctx: &Context<'_>,
    ) -> Result<()> {
        for (key, value) in described_by {
            let value = Some(value);
            let owner = self.name.as_str();
            match key.as_str() {
                "headers" => self.headers = build_list(owner, key, value, config, errors, ctx)?,
                "body" => self.body = build_list(owner, key, value, config, errors, ctx)?,
                "responses" => self.responses = build_list(owner, key, value, config, errors, ctx)?,
                "queryParameters" => {
                    self.query_params = build_list(owner, key, value, config, errors, ctx)?
                }
                "uriParameters" => {
                    self.uri_params = build_list(owner, key, value, config, errors, ctx)?
                }
                "formParameters" => {
                    self.form_params = build_list(owner, key, value, config, errors, ctx)?
                }
                "documentation" => {
                    self.documentation = documentation(&self.name, value, config, errors)?
                }
                "usage" => self.usage = value.cloned(),
                "mediaType" => self.media_type = value.cloned(),
                "protocols" => {
                    for err in validate::protocols(&self.name, value, config) {
                        errors.report(config, err)?;
                    }
                    self.protocols = value.cloned()
                }
                other => log::debug!(
                    "ignoring describedBy key '{}' on security scheme '{}'",
                    other,
                    self.name
                ),
            }
        }
        Ok(())
    }
}

impl Normalize for SecurityScheme {
    const ENTITY: EntityKind = EntityKind::SecurityScheme;

    fn normalize(
        name: &str,
        raw: &JsonValue,
        config: &Config,
        errors: &mut ErrorSink,
        ctx: &Context<'_>,
    ) -> Result<Self> {
        let data = declaration(EntityKind::SecurityScheme, name, raw, config, errors)?;
        let mut fields = Typed {
            entity: EntityKind::SecurityScheme,
            name,
            data,
            config,
            errors: &mut *errors,
        };
        let scheme_type = fields.string("type")?;
        let description = fields.string("description")?;
        let settings = get(data, "settings");
        for err in validate::sec_scheme_settings(name, scheme_type.as_deref(), settings) {
            errors.report(config, err)?;
        }

        let mut scheme = Self {
            name: name.to_string(),
            raw: raw.clone(),
            scheme_type,
            described_by: get(data, "describedBy").cloned(),
            description,
            settings: settings.cloned(),
            headers: None,
            body: None,
            responses: None,
            query_params: None,
            uri_params: None,
            form_params: None,
            documentation: None,
            usage: None,
            media_type: None,
            protocols: None,
        };

        match get(data, "describedBy") {
            None => {}
            Some(JsonValue::Object(_)) => {
                if let Some(described_by) = get_map(data, "describedBy") {
                    scheme.describe(described_by, config, errors, ctx)?;
                }
            }
            Some(other) => errors.report(
                config,
                ValidationError::shape(
                    EntityKind::SecurityScheme,
                    name,
                    &["describedBy"],
                    format!("describedBy must be a mapping, got {}", json_type(other)),
                ),
            )?,
        }
        Ok(scheme)
    }
}

/// Owner name used for sections declared at the top of a document.
const ROOT: &str = "(root)";

/// Build every security scheme declared in `document`.
///
/// `securitySchemes` may be a sequence of single-entry mappings or a mapping.
/// Returns `None` when the document declares no schemes.
pub fn assemble(
    document: &JsonValue,
    config: &Config,
    errors: &mut ErrorSink,
    ctx: &Context<'_>,
) -> Result<Option<Vec<SecurityScheme>>> {
    let section = match get(Some(document), "securitySchemes") {
        None => return Ok(None),
        Some(section) => section,
    };
    let items = match section {
        JsonValue::Object(_) => {
            return build_list(ROOT, "securitySchemes", Some(section), config, errors, ctx)
        }
        JsonValue::Array(items) => items,
        other => {
            errors.report(
                config,
                ValidationError::shape(
                    EntityKind::SecurityScheme,
                    ROOT,
                    &["securitySchemes"],
                    format!(
                        "securitySchemes must be a sequence or mapping, got {}",
                        json_type(other)
                    ),
                ),
            )?;
            return Ok(None);
        }
    };

    let mut schemes = Vec::new();
    for item in items {
        match item.as_object() {
            Some(entry) => {
                for (name, data) in entry {
                    schemes.push(SecurityScheme::normalize(name, data, config, errors, ctx)?);
                }
            }
            None => errors.report(
                config,
                ValidationError::shape(
                    EntityKind::SecurityScheme,
                    ROOT,
                    &["securitySchemes"],
                    format!(
                        "securitySchemes entries must be mappings, got {}",
                        json_type(item)
                    ),
                ),
            )?,
        }
    }
    log::debug!("assembled {} security scheme(s)", schemes.len());
    Ok(if schemes.is_empty() { None } else { Some(schemes) })
}

fn documentation(
    scheme: &str,
    value: Option<&JsonValue>,
    config: &Config,
    errors: &mut ErrorSink,
) -> Result<Option<Vec<Documentation>>> {
    let entries = match value {
        Some(JsonValue::Array(entries)) => entries,
        other => {
            errors.report(
                config,
                ValidationError::shape(
                    EntityKind::Documentation,
                    scheme,
                    &["documentation"],
                    format!(
                        "documentation must be a sequence, got {}",
                        other.map(json_type).unwrap_or("nothing")
                    ),
                ),
            )?;
            return Ok(None);
        }
    };
    let mut docs = Vec::with_capacity(entries.len());
    for entry in entries {
        if !entry.is_object() {
            errors.report(
                config,
                ValidationError::shape(
                    EntityKind::Documentation,
                    scheme,
                    &["documentation"],
                    format!(
                        "documentation entries must be mappings, got {}",
                        json_type(entry)
                    ),
                ),
            )?;
            continue;
        }
        let mut fields = Typed {
            entity: EntityKind::Documentation,
            name: scheme,
            data: Some(entry),
            config,
            errors: &mut *errors,
        };
        let title = fields.string("title")?;
        let content = fields.string("content")?;
        docs.push(Documentation::new(title, content));
    }
    Ok(if docs.is_empty() { None } else { Some(docs) })
}

fn string_list(value: Option<&JsonValue>) -> Vec<String> {
    value
        .and_then(JsonValue::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(JsonValue::as_str)
                .map(String::from)
                .collect()
        })
        .unwrap_or_default()
}
