//! Field validators.
//!
//! Each validator checks one constrained field and returns the diagnostic to
//! report. None of them decide whether a failure is fatal; that is the job of
//! [`ErrorSink::report`](crate::diagnostics::ErrorSink::report).

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value as JsonValue;
use url::Url;

use crate::config::Config;
use crate::error::{EntityKind, ValidationError};
use crate::response::ResponseCode;

type Outcome = Result<(), ValidationError>;

/// MIME types whose bodies are described by form parameters.
pub const FORM_MIME_TYPES: [&str; 2] = ["application/x-www-form-urlencoded", "multipart/form-data"];

pub const OAUTH_1: &str = "OAuth 1.0";
pub const OAUTH_2: &str = "OAuth 2.0";
pub const BASIC_AUTH: &str = "Basic Authentication";
pub const DIGEST_AUTH: &str = "Digest Authentication";

const OAUTH_1_SETTINGS: [&str; 3] = ["requestTokenUri", "authorizationUri", "tokenCredentialsUri"];
const OAUTH_2_SETTINGS: [&str; 4] = [
    "authorizationUri",
    "accessTokenUri",
    "authorizationGrants",
    "scopes",
];
const URI_SETTINGS: [&str; 4] = [
    "requestTokenUri",
    "authorizationUri",
    "tokenCredentialsUri",
    "accessTokenUri",
];

static MIME_TYPE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9][A-Za-z0-9!#$&^_.+-]*/[A-Za-z0-9*][A-Za-z0-9!#$&^_.+*-]*(\s*;.*)?$")
        .expect("MIME type pattern compiles")
});

/// `min_length`, `max_length`, `pattern` and `enum` require a `string` type.
pub fn string_type_parameter(
    entity: EntityKind,
    name: &str,
    param_type: &str,
    field: &str,
) -> Outcome {
    if param_type == "string" {
        return Ok(());
    }
    Err(ValidationError::constraint(
        entity,
        name,
        &[field],
        format!(
            "{} must be a string type to have {} attribute set, not '{}'",
            name, field, param_type
        ),
    ))
}

/// `minimum` and `maximum` require an `integer` or `number` type.
pub fn integer_number_type_parameter(
    entity: EntityKind,
    name: &str,
    param_type: &str,
    field: &str,
) -> Outcome {
    if matches!(param_type, "integer" | "number") {
        return Ok(());
    }
    Err(ValidationError::constraint(
        entity,
        name,
        &[field],
        format!(
            "{} must be an integer or number type to have {} attribute set, not '{}'",
            name, field, param_type
        ),
    ))
}

/// Header types must be one of the configured primitive types.
pub fn header_type(name: &str, header_type: &str, config: &Config) -> Outcome {
    if config.prim_types.iter().any(|t| t == header_type) {
        return Ok(());
    }
    Err(ValidationError::constraint(
        EntityKind::Header,
        name,
        &["type"],
        format!(
            "'{}' is not a valid primitive parameter type (expected one of: {})",
            header_type,
            config.prim_types.join(", ")
        ),
    ))
}

/// Body keys must be a well-known media type or a `type/subtype` string.
pub fn body_mime_type(mime_type: &str, config: &Config) -> Outcome {
    if config.media_types.iter().any(|m| m == mime_type) || MIME_TYPE.is_match(mime_type) {
        return Ok(());
    }
    Err(ValidationError::constraint(
        EntityKind::Body,
        mime_type,
        &["mimeType"],
        format!("Unsupported MIME media type '{}'", mime_type),
    ))
}

/// Schema/example and form parameters are mutually exclusive, and form
/// media types must be described by form parameters.
pub fn body_form(mime_type: &str, has_schema: bool, has_example: bool, has_form: bool) -> Outcome {
    let is_form = FORM_MIME_TYPES.contains(&mime_type);

    if has_form && (has_schema || has_example) {
        let mut fields = Vec::new();
        if has_schema {
            fields.push("schema");
        }
        if has_example {
            fields.push("example");
        }
        fields.push("formParameters");
        return Err(ValidationError::constraint(
            EntityKind::Body,
            mime_type,
            &fields,
            "Body can not define both schema/example and formParameters",
        ));
    }

    if is_form && (has_schema || has_example) {
        let fields: Vec<&str> = [("schema", has_schema), ("example", has_example)]
            .iter()
            .filter(|(_, set)| *set)
            .map(|(f, _)| *f)
            .collect();
        return Err(ValidationError::constraint(
            EntityKind::Body,
            mime_type,
            &fields,
            format!(
                "Body with mime type '{}' must define formParameters, not schema/example",
                mime_type
            ),
        ));
    }

    if is_form && !has_form {
        return Err(ValidationError::constraint(
            EntityKind::Body,
            mime_type,
            &["formParameters"],
            format!("Body with mime type '{}' requires formParameters", mime_type),
        ));
    }

    Ok(())
}

/// Response keys must be a configured status code (or `default` when enabled).
pub fn response_code(code: &ResponseCode, config: &Config) -> Outcome {
    let message = match code {
        ResponseCode::Status(status) if config.resp_codes.contains(status) => return Ok(()),
        ResponseCode::Default if config.default_response => return Ok(()),
        ResponseCode::Status(status) => format!("{} is not a supported HTTP response code", status),
        ResponseCode::Default => "'default' responses are not enabled".to_string(),
        ResponseCode::Invalid(raw) => format!("'{}' is not a valid HTTP response code", raw),
    };
    Err(ValidationError::constraint(
        EntityKind::Response,
        code.to_string(),
        &["code"],
        message,
    ))
}

/// Check scheme settings against the keys recognized for known scheme types.
///
/// Unknown scheme types pass through unchecked. Every rejected key yields its
/// own diagnostic.
pub fn sec_scheme_settings(
    name: &str,
    scheme_type: Option<&str>,
    settings: Option<&JsonValue>,
) -> Vec<ValidationError> {
    let allowed: &[&str] = match scheme_type {
        Some(OAUTH_1) => &OAUTH_1_SETTINGS,
        Some(OAUTH_2) => &OAUTH_2_SETTINGS,
        Some(BASIC_AUTH) | Some(DIGEST_AUTH) => &[],
        _ => return Vec::new(),
    };
    let scheme_type = scheme_type.unwrap_or_default();

    let settings = match settings {
        None | Some(JsonValue::Null) => return Vec::new(),
        Some(JsonValue::Object(map)) => map,
        Some(_) => {
            return vec![ValidationError::shape(
                EntityKind::SecurityScheme,
                name,
                &["settings"],
                "settings must be a mapping",
            )];
        }
    };

    let mut errors = Vec::new();
    for (key, value) in settings {
        if !allowed.contains(&key.as_str()) {
            errors.push(ValidationError::constraint(
                EntityKind::SecurityScheme,
                name,
                &[key.as_str()],
                format!("'{}' is not a recognized setting for {}", key, scheme_type),
            ));
            continue;
        }
        if URI_SETTINGS.contains(&key.as_str()) {
            let valid = value.as_str().map(|s| Url::parse(s).is_ok()).unwrap_or(false);
            if !valid {
                errors.push(ValidationError::constraint(
                    EntityKind::SecurityScheme,
                    name,
                    &[key.as_str()],
                    format!("{} must be an absolute URL, got {}", key, value),
                ));
            }
        }
    }
    errors
}

/// A `protocols` declaration must be a sequence of configured protocol
/// names (compared case-insensitively). Each unknown entry yields its own
/// diagnostic.
pub fn protocols(name: &str, value: Option<&JsonValue>, config: &Config) -> Vec<ValidationError> {
    let items = match value {
        None | Some(JsonValue::Null) => return Vec::new(),
        Some(JsonValue::Array(items)) => items,
        Some(_) => {
            return vec![ValidationError::shape(
                EntityKind::SecurityScheme,
                name,
                &["protocols"],
                "protocols must be a sequence",
            )];
        }
    };
    items
        .iter()
        .filter(|item| {
            let known = item.as_str().map(|p| {
                config
                    .protocols
                    .iter()
                    .any(|allowed| allowed.eq_ignore_ascii_case(p))
            });
            !known.unwrap_or(false)
        })
        .map(|item| {
            ValidationError::constraint(
                EntityKind::SecurityScheme,
                name,
                &["protocols"],
                format!(
                    "{} is not a supported protocol (expected one of: {})",
                    item,
                    config.protocols.join(", ")
                ),
            )
        })
        .collect()
}
