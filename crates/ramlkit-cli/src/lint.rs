//! Walks a parsed document and normalizes every declaration section.

// External imports (alphabetized)
use ramlkit_core::fields::get;
use ramlkit_core::{
    assemble, build_list, Body, Config, Context, ErrorSink, Header, QueryParameter, Response,
    Result, UriParameter,
};
use serde_json::Value as JsonValue;

/// Owner named in diagnostics for document-level sections.
const ROOT: &str = "(root)";

/// What a lint run looked at.
#[derive(Debug, Default, PartialEq)]
pub struct Summary {
    pub security_schemes: usize,
    pub resources: usize,
    pub methods: usize,
}

/// Normalize every section of `document`, collecting diagnostics in `errors`.
///
/// In strict mode the first diagnostic is returned as an error instead.
pub fn run(
    document: &JsonValue,
    config: &Config,
    errors: &mut ErrorSink,
    ctx: &Context<'_>,
) -> Result<Summary> {
    let mut summary = Summary::default();
    summary.security_schemes = assemble(document, config, errors, ctx)?
        .map(|schemes| schemes.len())
        .unwrap_or(0);

    let root = Some(document);
    for section in ["baseUriParameters", "uriParameters"] {
        build_list::<UriParameter>(ROOT, section, get(root, section), config, errors, ctx)?;
    }
    resources(document, config, errors, ctx, &mut summary)?;
    Ok(summary)
}

fn resources(
    parent: &JsonValue,
    config: &Config,
    errors: &mut ErrorSink,
    ctx: &Context<'_>,
    summary: &mut Summary,
) -> Result<()> {
    let Some(map) = parent.as_object() else {
        return Ok(());
    };
    for (path, resource) in map.iter().filter(|(key, _)| key.starts_with('/')) {
        tracing::debug!("checking resource {}", path);
        summary.resources += 1;
        let data = Some(resource);
        for section in ["uriParameters", "baseUriParameters"] {
            build_list::<UriParameter>(path, section, get(data, section), config, errors, ctx)?;
        }

        for method in config.http_optional() {
            let Some(declaration) = get(data, &method) else {
                continue;
            };
            summary.methods += 1;
            let method = method.trim_end_matches('?');
            let ctx = ctx.with_method(method);
            let owner = format!("{} {}", method, path);
            let decl = Some(declaration);
            let (owner, ctx) = (owner.as_str(), &ctx);
            build_list::<QueryParameter>(
                owner,
                "queryParameters",
                get(decl, "queryParameters"),
                config,
                errors,
                ctx,
            )?;
            build_list::<UriParameter>(
                owner,
                "baseUriParameters",
                get(decl, "baseUriParameters"),
                config,
                errors,
                ctx,
            )?;
            build_list::<Header>(owner, "headers", get(decl, "headers"), config, errors, ctx)?;
            build_list::<Body>(owner, "body", get(decl, "body"), config, errors, ctx)?;
            build_list::<Response>(
                owner,
                "responses",
                get(decl, "responses"),
                config,
                errors,
                ctx,
            )?;
        }

        resources(resource, config, errors, ctx, summary)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ramlkit_core::{EntityKind, ErrorKind};
    use serde_json::json;

    fn document() -> JsonValue {
        json!({
            "title": "Example",
            "baseUri": "https://api.example.com/{version}",
            "baseUriParameters": {"version": {"enum": ["v1"]}},
            "securitySchemes": [{"basic": {"type": "Basic Authentication"}}],
            "/users": {
                "get": {
                    "queryParameters": {"page": {"type": "integer", "minimum": 1}},
                    "responses": {"200": {"body": {"application/json": {}}}}
                },
                "/{id}": {
                    "uriParameters": {"id": {"type": "integer"}},
                    "put?": {
                        "headers": {"If-Match": {"type": "string"}},
                        "body": {"application/x-www-form-urlencoded": {
                            "formParameters": {"name": {"maxLength": 64}}
                        }}
                    }
                }
            }
        })
    }

    #[test]
    fn test_clean_document() {
        let mut errors = ErrorSink::new();
        let summary = run(&document(), &Config::default(), &mut errors, &Context::default()).unwrap();
        assert!(errors.is_empty(), "{:?}", errors);
        assert_eq!(
            summary,
            Summary {
                security_schemes: 1,
                resources: 2,
                methods: 2,
            }
        );
    }

    #[test]
    fn test_nested_diagnostics() {
        let mut doc = document();
        doc["/users"]["/{id}"]["put?"]["headers"]["If-Match"]["type"] = json!("etag");
        doc["/users"]["get"]["responses"]["299"] = json!({});

        let mut errors = ErrorSink::new();
        run(&doc, &Config::default(), &mut errors, &Context::default()).unwrap();
        assert_eq!(errors.len(), 2);
        assert!(errors
            .errors()
            .iter()
            .any(|e| e.entity == EntityKind::Header && e.kind == ErrorKind::Constraint));
        assert!(errors
            .errors()
            .iter()
            .any(|e| e.entity == EntityKind::Response && e.name == "299"));

        let mut errors = ErrorSink::new();
        assert!(run(&doc, &Config::strict(), &mut errors, &Context::default()).is_err());
    }

    #[test]
    fn test_section_shape_names_method_and_path() {
        let mut doc = document();
        doc["/users"]["get"]["queryParameters"] = json!(["page"]);

        let mut errors = ErrorSink::new();
        run(&doc, &Config::default(), &mut errors, &Context::default()).unwrap();
        assert_eq!(errors.len(), 1);
        let err = &errors.errors()[0];
        assert_eq!(err.kind, ErrorKind::Shape);
        assert_eq!(err.name, "get /users");
        assert_eq!(err.fields, vec!["queryParameters".to_string()]);
    }
}
