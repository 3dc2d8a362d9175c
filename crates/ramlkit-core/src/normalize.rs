//! Shared normalization plumbing: the per-call context, the [`Normalize`]
//! trait implemented by every record kind, and the generic list builder.

use serde_json::Value as JsonValue;

use crate::config::Config;
use crate::diagnostics::ErrorSink;
use crate::error::{EntityKind, Result, ValidationError};
use crate::fields::json_type;
use crate::schema::{InlineSchemaLoader, SchemaLoader};

/// Caller-supplied context for one normalization call.
#[derive(Clone, Copy)]
pub struct Context<'a> {
    /// HTTP method the declarations belong to, if any
    pub method: Option<&'a str>,
    /// Resolver for body `schema` / `example` payloads
    pub schema_loader: &'a dyn SchemaLoader,
}

impl Default for Context<'static> {
    fn default() -> Self {
        Self {
            method: None,
            schema_loader: &InlineSchemaLoader,
        }
    }
}

impl<'a> Context<'a> {
    pub fn new(schema_loader: &'a dyn SchemaLoader) -> Self {
        Self {
            method: None,
            schema_loader,
        }
    }

    /// The same context scoped to `method`
    pub fn with_method<'b>(&self, method: &'b str) -> Context<'b>
    where
        'a: 'b,
    {
        Context {
            method: Some(method),
            schema_loader: self.schema_loader,
        }
    }
}

impl std::fmt::Debug for Context<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("method", &self.method)
            .finish_non_exhaustive()
    }
}

/// A record built from one `name: declaration` entry.
pub trait Normalize: Sized {
    /// Entity kind used when reporting diagnostics
    const ENTITY: EntityKind;

    /// Build a record from the declaration found under `name`.
    fn normalize(
        name: &str,
        raw: &JsonValue,
        config: &Config,
        errors: &mut ErrorSink,
        ctx: &Context<'_>,
    ) -> Result<Self>;

    /// Hook applied to a freshly built list before it is returned.
    fn finish_list(_items: &mut Vec<Self>) {}
}

/// Normalize every entry of a `{name: declaration}` mapping, in order.
///
/// `owner` and `section` name where the mapping was found (for example the
/// scheme `oauth_2_0` and its `headers` key) and are carried by the shape
/// error raised when the section is not a mapping. Returns `None` for an
/// absent or empty mapping.
pub fn build_list<T: Normalize>(
    owner: &str,
    section: &str,
    raw: Option<&JsonValue>,
    config: &Config,
    errors: &mut ErrorSink,
    ctx: &Context<'_>,
) -> Result<Option<Vec<T>>> {
    let map = match raw {
        None | Some(JsonValue::Null) => return Ok(None),
        Some(JsonValue::Object(map)) => map,
        Some(other) => {
            errors.report(
                config,
                ValidationError::shape(
                    T::ENTITY,
                    owner,
                    &[section],
                    format!(
                        "{} must be a mapping of {} declarations, got {}",
                        section,
                        T::ENTITY,
                        json_type(other)
                    ),
                ),
            )?;
            return Ok(None);
        }
    };

    let mut items = Vec::with_capacity(map.len());
    for (name, declaration) in map {
        items.push(T::normalize(name, declaration, config, errors, ctx)?);
    }
    if items.is_empty() {
        return Ok(None);
    }
    T::finish_list(&mut items);
    log::debug!(
        "normalized {} {} declaration(s) in {} of '{}'",
        items.len(),
        T::ENTITY,
        section,
        owner
    );
    Ok(Some(items))
}

/// Accept a mapping or an empty declaration; anything else is a shape error
/// against the declaration's own key and the declaration is treated as empty.
pub(crate) fn declaration<'v>(
    entity: EntityKind,
    name: &str,
    raw: &'v JsonValue,
    config: &Config,
    errors: &mut ErrorSink,
) -> Result<Option<&'v JsonValue>> {
    match raw {
        JsonValue::Object(_) => Ok(Some(raw)),
        JsonValue::Null => Ok(None),
        other => {
            errors.report(
                config,
                ValidationError::shape(
                    entity,
                    name,
                    &[name],
                    format!(
                        "declaration of '{}' must be a mapping, got {}",
                        name,
                        json_type(other)
                    ),
                ),
            )?;
            Ok(None)
        }
    }
}
