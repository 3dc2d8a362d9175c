//! Inheritance of unset attributes from ancestor declarations.
//!
//! Ancestors are ordered nearest first (the resource's own resource type,
//! then its parent, traits, ...). Each unset attribute independently takes
//! the value of the first matching ancestor that declares it, so one record
//! can pick up `type` from a trait and `description` from a resource type.
//! Attributes set locally are never touched.
//!
//! Producing a finite, resolved ancestor list is the caller's job;
//! [`collect_ancestors`] helps build one from named fragments.

use std::collections::HashMap;

use crate::body::Body;
use crate::config::Config;
use crate::diagnostics::ErrorSink;
use crate::error::{EntityKind, Result, ValidationError};
use crate::params::{NamedParameter, ParamKind};
use crate::response::Response;

/// Records that can inherit unset attributes from same-kind ancestors.
pub trait Inherit: Sized {
    fn merge_inherited(&mut self, ancestors: &[Self]);
}

/// Fill `slot` from the first matching ancestor that has a value for it.
fn fill<A, T, M, G>(slot: &mut Option<T>, ancestors: &[A], matches: M, get: G)
where
    T: Clone,
    M: Fn(&A) -> bool,
    G: Fn(&A) -> &Option<T>,
{
    if slot.is_some() {
        return;
    }
    *slot = ancestors
        .iter()
        .filter(|&a| matches(a))
        .find_map(|a| get(a).clone());
}

impl<K: ParamKind> Inherit for NamedParameter<K> {
    fn merge_inherited(&mut self, ancestors: &[Self]) {
        let name = self.name.clone();
        let matches = |a: &Self| !K::MATCH_BY_NAME || a.name == name;

        fill(&mut self.description, ancestors, matches, |a| &a.description);
        fill(&mut self.param_type, ancestors, matches, |a| &a.param_type);
        fill(&mut self.enum_values, ancestors, matches, |a| &a.enum_values);
        fill(&mut self.pattern, ancestors, matches, |a| &a.pattern);
        fill(&mut self.minimum, ancestors, matches, |a| &a.minimum);
        fill(&mut self.maximum, ancestors, matches, |a| &a.maximum);
        fill(&mut self.example, ancestors, matches, |a| &a.example);
        fill(&mut self.default, ancestors, matches, |a| &a.default);
        fill(&mut self.required, ancestors, matches, |a| &a.required);
        fill(&mut self.repeat, ancestors, matches, |a| &a.repeat);
        fill(&mut self.display_name, ancestors, matches, |a| &a.display_name);
        fill(&mut self.max_length, ancestors, matches, |a| &a.max_length);
        fill(&mut self.min_length, ancestors, matches, |a| &a.min_length);
        if K::METHOD_SCOPED {
            fill(&mut self.method, ancestors, matches, |a| &a.method);
        }
    }
}

impl Inherit for Body {
    fn merge_inherited(&mut self, ancestors: &[Self]) {
        let mime_type = self.mime_type.clone();
        let matches = |a: &Self| a.mime_type == mime_type;

        fill(&mut self.schema, ancestors, matches, |a| &a.schema);
        fill(&mut self.example, ancestors, matches, |a| &a.example);
        fill(&mut self.form_params, ancestors, matches, |a| &a.form_params);
    }
}

impl Inherit for Response {
    fn merge_inherited(&mut self, ancestors: &[Self]) {
        let code = self.code.clone();
        let matches = |a: &Self| a.code == code;

        fill(&mut self.description, ancestors, matches, |a| &a.description);
        fill(&mut self.headers, ancestors, matches, |a| &a.headers);
        fill(&mut self.body, ancestors, matches, |a| &a.body);
    }
}

/// Merge every record of `records` against the same ancestor list.
pub fn merge_all<T: Inherit>(records: &mut [T], ancestors: &[T]) {
    for record in records {
        record.merge_inherited(ancestors);
    }
}

/// Concatenate the records of the named fragments, in the order given.
///
/// Each name missing from `catalog` is reported as a reference error against
/// `field` (e.g. `is` for traits, `type` for resource types) and skipped.
pub fn collect_ancestors<T: Clone>(
    catalog: &HashMap<String, Vec<T>>,
    names: &[&str],
    entity: EntityKind,
    field: &str,
    config: &Config,
    errors: &mut ErrorSink,
) -> Result<Vec<T>> {
    let mut ancestors = Vec::new();
    for name in names {
        match catalog.get(*name) {
            Some(records) => ancestors.extend(records.iter().cloned()),
            None => errors.report(
                config,
                ValidationError::reference(
                    entity,
                    *name,
                    &[field],
                    format!("'{}' does not refer to a declared fragment", name),
                ),
            )?,
        }
    }
    Ok(ancestors)
}
