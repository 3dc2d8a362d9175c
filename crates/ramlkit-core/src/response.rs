//! Expected responses, keyed by HTTP status code.

use std::fmt;

use serde::{Serialize, Serializer};
use serde_json::Value as JsonValue;

use crate::body::Body;
use crate::config::Config;
use crate::content::Content;
use crate::diagnostics::ErrorSink;
use crate::error::{EntityKind, Result};
use crate::fields::{get, Typed};
use crate::normalize::{build_list, declaration, Context, Normalize};
use crate::params::Header;
use crate::validate;

/// The key a response is declared under.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ResponseCode {
    Status(u16),
    /// The literal `default`
    Default,
    /// A key that is neither; kept so nothing is dropped in permissive mode
    Invalid(String),
}

impl ResponseCode {
    /// Only canonical keys (`200`, `default`) are recognized; padded or
    /// zero-prefixed keys such as `0200` are kept as [`ResponseCode::Invalid`].
    pub fn parse(key: &str) -> Self {
        if key == "default" {
            return Self::Default;
        }
        match key.parse::<u16>() {
            Ok(status) if status.to_string() == key => Self::Status(status),
            _ => Self::Invalid(key.to_string()),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status(status) => Some(*status),
            _ => None,
        }
    }

    /// Numeric codes ascending, then `default`, then invalid keys.
    fn sort_key(&self) -> (u8, u16) {
        match self {
            Self::Status(status) => (0, *status),
            Self::Default => (1, 0),
            Self::Invalid(_) => (2, 0),
        }
    }
}

impl fmt::Display for ResponseCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Status(status) => write!(f, "{}", status),
            Self::Default => write!(f, "default"),
            Self::Invalid(raw) => write!(f, "{}", raw),
        }
    }
}

impl Serialize for ResponseCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Self::Status(status) => serializer.serialize_u16(*status),
            other => serializer.collect_str(other),
        }
    }
}

/// An expected response.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Response {
    pub code: ResponseCode,
    /// The declaration exactly as written
    #[serde(skip)]
    pub raw: JsonValue,
    pub description: Option<String>,
    pub headers: Option<Vec<Header>>,
    pub body: Option<Vec<Body>>,
    /// HTTP method owning the response, taken from the caller's context
    pub method: Option<String>,
}

impl Response {
    pub fn new(code: ResponseCode) -> Self {
        Self {
            code,
            raw: JsonValue::Null,
            description: None,
            headers: None,
            body: None,
            method: None,
        }
    }

    pub fn description(&self) -> Option<Content> {
        self.description.as_deref().map(Content::from)
    }
}

impl Normalize for Response {
    const ENTITY: EntityKind = EntityKind::Response;

    fn normalize(
        name: &str,
        raw: &JsonValue,
        config: &Config,
        errors: &mut ErrorSink,
        ctx: &Context<'_>,
    ) -> Result<Self> {
        let code = ResponseCode::parse(name);
        errors.check(config, validate::response_code(&code, config))?;
        let data = declaration(EntityKind::Response, name, raw, config, errors)?;
        let description = Typed {
            entity: EntityKind::Response,
            name,
            data,
            config,
            errors: &mut *errors,
        }
        .string("description")?;

        Ok(Self {
            code,
            raw: raw.clone(),
            description,
            headers: build_list::<Header>(name, "headers", get(data, "headers"), config, errors, ctx)?,
            body: build_list::<Body>(name, "body", get(data, "body"), config, errors, ctx)?,
            method: ctx.method.map(String::from),
        })
    }

    fn finish_list(items: &mut Vec<Self>) {
        // stable: equal codes keep declaration order
        items.sort_by_key(|r| r.code.sort_key());
    }
}
