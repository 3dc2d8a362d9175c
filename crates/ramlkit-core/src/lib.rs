//! Ramlkit Core Library
//!
//! This library turns the loosely-typed declarations of a RAML document
//! (named parameters, headers, bodies, responses and security schemes) into
//! validated records, and lets records inherit unset attributes from
//! resource types and traits.

pub mod body;
pub mod config;
pub mod content;
pub mod diagnostics;
pub mod error;
pub mod fields;
pub mod merge;
pub mod normalize;
pub mod params;
pub mod response;
pub mod schema;
pub mod security;
pub mod validate;

pub use crate::{
    body::Body,
    config::{Config, CustomConfig},
    content::{Content, Documentation, MarkdownRenderer, Renderer},
    diagnostics::ErrorSink,
    error::{EntityKind, Error, ErrorKind, Result, ValidationError},
    merge::{collect_ancestors, merge_all, Inherit},
    normalize::{build_list, Context, Normalize},
    params::{
        FormKind, FormParameter, Header, HeaderKind, NamedParameter, ParamKind, QueryKind,
        QueryParameter, UriKind, UriParameter,
    },
    response::{Response, ResponseCode},
    schema::{InlineSchemaLoader, SchemaLoader},
    security::{assemble, SchemeSettings, SecurityScheme},
};
