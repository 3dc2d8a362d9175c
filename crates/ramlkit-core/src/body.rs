//! Request/response bodies, keyed by MIME type.

use serde::Serialize;
use serde_json::Value as JsonValue;

use crate::config::Config;
use crate::diagnostics::ErrorSink;
use crate::error::{EntityKind, Result};
use crate::fields::get;
use crate::normalize::{build_list, declaration, Context, Normalize};
use crate::params::FormParameter;
use crate::validate;

/// Body of a request or response.
///
/// `schema`/`example` and `form_params` are mutually exclusive, and the
/// form-encoded media types must use `form_params`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Body {
    pub mime_type: String,
    /// The declaration exactly as written
    #[serde(skip)]
    pub raw: JsonValue,
    pub schema: Option<JsonValue>,
    pub example: Option<JsonValue>,
    pub form_params: Option<Vec<FormParameter>>,
}

impl Body {
    /// A body with nothing declared
    pub fn new(mime_type: impl Into<String>) -> Self {
        Self {
            mime_type: mime_type.into(),
            raw: JsonValue::Null,
            schema: None,
            example: None,
            form_params: None,
        }
    }
}

impl Normalize for Body {
    const ENTITY: EntityKind = EntityKind::Body;

    fn normalize(
        name: &str,
        raw: &JsonValue,
        config: &Config,
        errors: &mut ErrorSink,
        ctx: &Context<'_>,
    ) -> Result<Self> {
        errors.check(config, validate::body_mime_type(name, config))?;
        let data = declaration(EntityKind::Body, name, raw, config, errors)?;

        let schema = get(data, "schema").map(|v| ctx.schema_loader.load(v));
        let example = get(data, "example").map(|v| ctx.schema_loader.load(v));
        let form_raw = get(data, "formParameters");
        errors.check(
            config,
            validate::body_form(name, schema.is_some(), example.is_some(), form_raw.is_some()),
        )?;
        let form_params =
            build_list::<FormParameter>(name, "formParameters", form_raw, config, errors, ctx)?;

        Ok(Self {
            mime_type: name.to_string(),
            raw: raw.clone(),
            schema,
            example,
            form_params,
        })
    }
}
