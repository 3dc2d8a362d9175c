//! Named parameters: URI, query and form parameters, and headers.
//!
//! All four kinds share one record type, [`NamedParameter`], parameterized by a
//! [`ParamKind`] marker that supplies the few behaviors that differ per kind:
//! the default for `required`, which validators apply to `type`, and how
//! inheritance picks matching ancestors.
//!
//! Attribute fields hold what the declaration says; `None` means "not
//! declared" and is the only state the inheritance merge will fill. Accessors
//! such as [`NamedParameter::required`] apply the kind's defaults on top.

use std::fmt;
use std::marker::PhantomData;

use serde::Serialize;
use serde_json::{json, Number, Value as JsonValue};

use crate::config::Config;
use crate::content::Content;
use crate::diagnostics::ErrorSink;
use crate::error::{EntityKind, Result, ValidationError};
use crate::fields::{get, Typed};
use crate::normalize::{declaration, Context, Normalize};
use crate::validate;

/// Per-kind behavior of a named parameter.
pub trait ParamKind: fmt::Debug + Clone + Copy + PartialEq + Default + 'static {
    const ENTITY: EntityKind;
    /// Value of `required` when the declaration leaves it out
    const REQUIRED_BY_DEFAULT: bool = false;
    /// Whether ancestors must share the parameter's name to be inherited from
    const MATCH_BY_NAME: bool = true;
    /// Whether the record is scoped to an HTTP method
    const METHOD_SCOPED: bool = false;

    /// Kind-specific check of the effective primitive type.
    fn check_type(
        _name: &str,
        _param_type: &str,
        _config: &Config,
    ) -> std::result::Result<(), ValidationError> {
        Ok(())
    }
}

/// `/users/{id}`: path segments are always required unless stated otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct UriKind;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct QueryKind;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FormKind;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct HeaderKind;

impl ParamKind for UriKind {
    const ENTITY: EntityKind = EntityKind::UriParameter;
    const REQUIRED_BY_DEFAULT: bool = true;
}

impl ParamKind for QueryKind {
    const ENTITY: EntityKind = EntityKind::QueryParameter;
}

impl ParamKind for FormKind {
    const ENTITY: EntityKind = EntityKind::FormParameter;
}

impl ParamKind for HeaderKind {
    const ENTITY: EntityKind = EntityKind::Header;
    // Header ancestors come from the method context, not from a same-named
    // declaration.
    const MATCH_BY_NAME: bool = false;
    const METHOD_SCOPED: bool = true;

    fn check_type(
        name: &str,
        param_type: &str,
        config: &Config,
    ) -> std::result::Result<(), ValidationError> {
        validate::header_type(name, param_type, config)
    }
}

pub type UriParameter = NamedParameter<UriKind>;
pub type QueryParameter = NamedParameter<QueryKind>;
pub type FormParameter = NamedParameter<FormKind>;
pub type Header = NamedParameter<HeaderKind>;

/// Primitive type assumed when a parameter does not declare one.
pub const DEFAULT_TYPE: &str = "string";

/// A parameter declared in a "Named Parameters" section.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NamedParameter<K: ParamKind> {
    /// Key the parameter was declared under
    pub name: String,
    /// `{name: original declaration}`
    #[serde(skip)]
    pub raw: JsonValue,
    pub description: Option<String>,
    pub display_name: Option<String>,
    #[serde(rename = "type")]
    pub param_type: Option<String>,
    pub required: Option<bool>,
    pub repeat: Option<bool>,
    pub min_length: Option<u64>,
    pub max_length: Option<u64>,
    pub minimum: Option<Number>,
    pub maximum: Option<Number>,
    pub example: Option<JsonValue>,
    pub default: Option<JsonValue>,
    pub pattern: Option<String>,
    #[serde(rename = "enum")]
    pub enum_values: Option<Vec<JsonValue>>,
    /// HTTP method a header is scoped to; always `None` for other kinds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(skip)]
    kind: PhantomData<K>,
}

impl<K: ParamKind> NamedParameter<K> {
    /// An undeclared parameter: every attribute unset.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            raw: json!({ name.clone(): {} }),
            name,
            description: None,
            display_name: None,
            param_type: None,
            required: None,
            repeat: None,
            min_length: None,
            max_length: None,
            minimum: None,
            maximum: None,
            example: None,
            default: None,
            pattern: None,
            enum_values: None,
            method: None,
            kind: PhantomData,
        }
    }

    pub fn entity(&self) -> EntityKind {
        K::ENTITY
    }

    pub fn description(&self) -> Option<Content> {
        self.description.as_deref().map(Content::from)
    }

    /// Declared display name, falling back to the parameter name
    pub fn display_name(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.name)
    }

    /// Declared primitive type, falling back to `string`
    pub fn param_type(&self) -> &str {
        self.param_type.as_deref().unwrap_or(DEFAULT_TYPE)
    }

    pub fn required(&self) -> bool {
        self.required.unwrap_or(K::REQUIRED_BY_DEFAULT)
    }

    pub fn repeat(&self) -> bool {
        self.repeat.unwrap_or(false)
    }

    fn validate(&self, config: &Config, errors: &mut ErrorSink) -> Result<()> {
        let ty = self.param_type();
        let string_only = [
            ("minLength", self.min_length.is_some()),
            ("maxLength", self.max_length.is_some()),
            ("pattern", self.pattern.is_some()),
            ("enum", self.enum_values.is_some()),
        ];
        for (field, _) in string_only.iter().filter(|(_, set)| *set) {
            errors.check(
                config,
                validate::string_type_parameter(K::ENTITY, &self.name, ty, field),
            )?;
        }
        let numeric_only = [
            ("minimum", self.minimum.is_some()),
            ("maximum", self.maximum.is_some()),
        ];
        for (field, _) in numeric_only.iter().filter(|(_, set)| *set) {
            errors.check(
                config,
                validate::integer_number_type_parameter(K::ENTITY, &self.name, ty, field),
            )?;
        }
        errors.check(config, K::check_type(&self.name, ty, config))
    }
}

impl<K: ParamKind> Normalize for NamedParameter<K> {
    const ENTITY: EntityKind = K::ENTITY;

    fn normalize(
        name: &str,
        raw: &JsonValue,
        config: &Config,
        errors: &mut ErrorSink,
        ctx: &Context<'_>,
    ) -> Result<Self> {
        let data = declaration(K::ENTITY, name, raw, config, errors)?;
        let mut fields = Typed {
            entity: K::ENTITY,
            name,
            data,
            config,
            errors: &mut *errors,
        };

        let param = Self {
            name: name.to_string(),
            raw: json!({ name: raw.clone() }),
            description: fields.string("description")?,
            display_name: fields.string("displayName")?,
            param_type: fields.string("type")?,
            required: fields.boolean("required")?,
            repeat: fields.boolean("repeat")?,
            min_length: fields.unsigned("minLength")?,
            max_length: fields.unsigned("maxLength")?,
            minimum: fields.number("minimum")?,
            maximum: fields.number("maximum")?,
            example: get(data, "example").cloned(),
            default: get(data, "default").cloned(),
            pattern: fields.string("pattern")?,
            enum_values: fields.sequence("enum")?,
            method: if K::METHOD_SCOPED {
                ctx.method.map(String::from)
            } else {
                None
            },
            kind: PhantomData,
        };
        param.validate(config, errors)?;
        Ok(param)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn normalize<K: ParamKind>(name: &str, raw: JsonValue) -> (NamedParameter<K>, ErrorSink) {
        let mut errors = ErrorSink::new();
        let param = NamedParameter::<K>::normalize(
            name,
            &raw,
            &Config::default(),
            &mut errors,
            &Context::default(),
        )
        .unwrap();
        (param, errors)
    }

    #[test]
    fn test_required_defaults_per_kind() {
        let (uri, _) = normalize::<UriKind>("id", json!({}));
        let (query, _) = normalize::<QueryKind>("q", json!({}));
        let (form, _) = normalize::<FormKind>("f", json!({}));
        let (header, _) = normalize::<HeaderKind>("X-Token", json!({}));
        assert!(uri.required());
        assert!(!query.required());
        assert!(!form.required());
        assert!(!header.required());
        // the default is not a declaration
        assert_eq!(uri.required, None);
    }

    #[test]
    fn test_explicit_required_wins() {
        let (uri, _) = normalize::<UriKind>("id", json!({"required": false}));
        assert!(!uri.required());
        let (query, _) = normalize::<QueryKind>("q", json!({"required": true}));
        assert!(query.required());
    }

    #[test]
    fn test_empty_declaration_gets_defaults() {
        let (param, errors) = normalize::<QueryKind>("limit", JsonValue::Null);
        assert!(errors.is_empty());
        assert_eq!(param.display_name(), "limit");
        assert_eq!(param.param_type(), "string");
        assert!(!param.repeat());
        assert!(param.description().is_none());
    }

    #[test]
    fn test_fields_are_read() {
        let raw = json!({
            "description": "Max items",
            "displayName": "Limit",
            "type": "integer",
            "minimum": 1,
            "maximum": 50,
            "default": 20,
            "example": 10,
            "repeat": false
        });
        let (param, errors) = normalize::<QueryKind>("limit", raw.clone());
        assert!(errors.is_empty());
        assert_eq!(param.display_name(), "Limit");
        assert_eq!(param.description().unwrap().raw(), "Max items");
        assert_eq!(param.minimum, Some(Number::from(1)));
        assert_eq!(param.maximum, Some(Number::from(50)));
        assert_eq!(param.default, Some(json!(20)));
        assert_eq!(param.raw, json!({"limit": raw}));
    }

    #[test]
    fn test_numeric_field_on_string_type_is_reported_and_kept() {
        let (param, errors) = normalize::<QueryKind>("q", json!({"minimum": 3}));
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.errors()[0].kind, ErrorKind::Constraint);
        assert_eq!(errors.errors()[0].fields, vec!["minimum".to_string()]);
        assert_eq!(param.minimum, Some(Number::from(3)));
    }

    #[test]
    fn test_string_fields_on_integer_type() {
        let (_, errors) = normalize::<UriKind>(
            "id",
            json!({"type": "integer", "pattern": "^[0-9]+$", "enum": [1, 2], "maxLength": 3}),
        );
        let fields: Vec<&str> = errors.errors().iter().map(|e| e.fields[0].as_str()).collect();
        assert_eq!(fields, vec!["maxLength", "pattern", "enum"]);
    }

    #[test]
    fn test_strict_mode_aborts() {
        let mut errors = ErrorSink::new();
        let err = QueryParameter::normalize(
            "q",
            &json!({"minimum": 3}),
            &Config::strict(),
            &mut errors,
            &Context::default(),
        )
        .unwrap_err();
        assert_eq!(err.as_validation().unwrap().name, "q");
    }

    #[test]
    fn test_header_type_and_method() {
        let mut errors = ErrorSink::new();
        let ctx = Context::default();
        let header = Header::normalize(
            "X-Rate",
            &json!({"type": "object"}),
            &Config::default(),
            &mut errors,
            &ctx.with_method("get"),
        )
        .unwrap();
        assert_eq!(header.method.as_deref(), Some("get"));
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.errors()[0].entity, EntityKind::Header);
    }

    #[test]
    fn test_method_only_on_headers() {
        let mut errors = ErrorSink::new();
        let ctx = Context::default();
        let query = QueryParameter::normalize(
            "q",
            &json!({}),
            &Config::default(),
            &mut errors,
            &ctx.with_method("get"),
        )
        .unwrap();
        assert!(query.method.is_none());
    }

    #[test]
    fn test_wrong_typed_values_are_reported() {
        let (param, errors) = normalize::<QueryKind>("q", json!({"required": "yes", "enum": "a"}));
        assert_eq!(errors.len(), 2);
        assert_eq!(param.required, None);
        assert_eq!(param.enum_values, None);
    }

    #[test]
    fn test_non_scalar_text_fields_are_reported() {
        let (param, errors) = normalize::<QueryKind>(
            "q",
            json!({"description": ["not", "text"], "displayName": {"x": 1}, "pattern": [1]}),
        );
        assert_eq!(param.description, None);
        assert_eq!(param.display_name, None);
        assert_eq!(param.pattern, None);
        let fields: Vec<&str> = errors.errors().iter().map(|e| e.fields[0].as_str()).collect();
        assert_eq!(fields, vec!["description", "displayName", "pattern"]);
        assert!(errors.errors().iter().all(|e| e.kind == ErrorKind::Constraint));
    }

    #[test]
    fn test_non_scalar_type_is_reported_and_defaults() {
        let (param, errors) = normalize::<UriKind>("id", json!({"type": ["integer"]}));
        assert_eq!(param.param_type, None);
        assert_eq!(param.param_type(), "string");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.errors()[0].fields, vec!["type".to_string()]);
    }

    #[test]
    fn test_integer_bounds_serialize_as_integers() {
        let (param, _) = normalize::<QueryKind>(
            "limit",
            json!({"type": "integer", "minimum": 1, "maximum": 9007199254740993u64}),
        );
        let out = serde_json::to_value(&param).unwrap();
        assert_eq!(out["minimum"], json!(1));
        assert_eq!(out["maximum"], json!(9007199254740993u64));
    }

    #[test]
    fn test_non_mapping_declaration() {
        let (param, errors) = normalize::<FormKind>("f", json!("string"));
        assert_eq!(errors.errors()[0].kind, ErrorKind::Shape);
        assert_eq!(param.param_type(), "string");
        assert_eq!(param.raw, json!({"f": "string"}));
    }
}
