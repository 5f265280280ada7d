//! State declarations
//!
//! A declaration is the immutable input to registration. It carries the
//! fields the author wrote; every derived attribute (effective data,
//! compiled URL, parameter sets, view slots, ancestry) lives on the
//! resolved [`crate::StateRecord`] instead.

use std::collections::HashMap;
use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::Value;

use crate::error::{Result, StateError};
use crate::matcher::UrlMatcher;
use trellis_foundation::StateName;

/// A declared URL: a pattern string or an already-compiled matcher.
///
/// A pattern starting with `^` is absolute (the prefix is stripped before
/// compilation); any other pattern is relative and is concatenated onto
/// the nearest navigable ancestor's matcher.
#[derive(Debug, Clone)]
pub enum UrlDecl {
    /// Pattern string, compiled during resolution.
    Pattern(String),
    /// Pre-compiled matcher, used as is.
    Matcher(Arc<dyn UrlMatcher>),
}

/// An unresolved state declaration.
///
/// Only `name` is required, and it may instead be supplied positionally
/// through [`crate::StateRegistry::state`]. Everything else is optional:
///
/// - `parent` overrides the dotted-name parent convention
/// - `url` declares the state's URL pattern or matcher
/// - `data` is overlaid onto the parent's effective data
/// - `params` declares the parameter names (conflicts with `url`)
/// - `views` maps view-slot names to configuration values
#[derive(Debug, Clone, Default)]
pub struct StateDeclaration {
    pub name: Option<StateName>,
    pub parent: Option<StateName>,
    pub url: Option<UrlDecl>,
    pub data: HashMap<String, Value>,
    pub params: Option<Vec<String>>,
    pub views: Option<IndexMap<String, Value>>,
    pub is_abstract: bool,
}

impl StateDeclaration {
    /// Create an empty declaration; the name is supplied positionally.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a declaration with a name.
    pub fn named(name: impl Into<StateName>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Override the implicit dotted-name parent.
    pub fn with_parent(mut self, parent: impl Into<StateName>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    /// Declare a URL pattern.
    pub fn with_url(mut self, pattern: impl Into<String>) -> Self {
        self.url = Some(UrlDecl::Pattern(pattern.into()));
        self
    }

    /// Declare a pre-compiled URL matcher.
    pub fn with_matcher(mut self, matcher: Arc<dyn UrlMatcher>) -> Self {
        self.url = Some(UrlDecl::Matcher(matcher));
        self
    }

    /// Add an own-data entry.
    pub fn with_data(mut self, key: impl Into<String>, value: Value) -> Self {
        self.data.insert(key.into(), value);
        self
    }

    /// Declare the parameter names explicitly.
    pub fn with_params<I, S>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.params = Some(params.into_iter().map(Into::into).collect());
        self
    }

    /// Add an explicit view slot.
    ///
    /// Declaring any view suppresses the synthesized unnamed slot.
    pub fn with_view(mut self, slot: impl Into<String>, config: Value) -> Self {
        self.views
            .get_or_insert_with(IndexMap::new)
            .insert(slot.into(), config);
        self
    }

    /// Mark the state abstract.
    pub fn abstract_state(mut self) -> Self {
        self.is_abstract = true;
        self
    }

    /// Build a declaration from loose JSON configuration.
    ///
    /// This is the ingestion point for untyped declaration objects; it is
    /// where malformed field shapes (non-string name, non-string url,
    /// params that are not a sequence of strings) are rejected.
    pub fn from_value(value: Value) -> Result<Self> {
        let Value::Object(fields) = value else {
            return Err(StateError::InvalidName {
                name: String::new(),
                reason: "declaration is not an object",
            });
        };

        let mut decl = Self::new();

        if let Some(name) = fields.get("name") {
            let Value::String(name) = name else {
                return Err(StateError::InvalidName {
                    name: name.to_string(),
                    reason: "name is not a string",
                });
            };
            decl.name = Some(StateName::from(name.as_str()));
        }

        let declared_name = decl
            .name
            .as_ref()
            .map(|n| n.as_str().to_string())
            .unwrap_or_default();

        if let Some(parent) = fields.get("parent") {
            let Value::String(parent) = parent else {
                return Err(StateError::InvalidName {
                    name: parent.to_string(),
                    reason: "parent is not a string",
                });
            };
            decl.parent = Some(StateName::from(parent.as_str()));
        }

        if let Some(url) = fields.get("url") {
            let Value::String(url) = url else {
                return Err(StateError::InvalidUrl {
                    state: declared_name.clone(),
                    reason: format!("url is not a string: {url}"),
                });
            };
            decl.url = Some(UrlDecl::Pattern(url.clone()));
        }

        if let Some(params) = fields.get("params") {
            let Value::Array(items) = params else {
                return Err(StateError::InvalidParams {
                    state: declared_name.clone(),
                    reason: "params is not an ordered sequence".to_string(),
                });
            };
            let mut names = Vec::with_capacity(items.len());
            for item in items {
                let Value::String(param) = item else {
                    return Err(StateError::InvalidParams {
                        state: declared_name.clone(),
                        reason: format!("parameter name is not a string: {item}"),
                    });
                };
                names.push(param.clone());
            }
            decl.params = Some(names);
        }

        if let Some(Value::Object(data)) = fields.get("data") {
            decl.data = data.iter().map(|(k, v)| (k.clone(), v.clone())).collect();
        }

        if let Some(Value::Object(views)) = fields.get("views") {
            decl.views = Some(views.iter().map(|(k, v)| (k.clone(), v.clone())).collect());
        }

        if let Some(Value::Bool(flag)) = fields.get("abstract") {
            decl.is_abstract = *flag;
        }

        Ok(decl)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_value_full_declaration() {
        let decl = StateDeclaration::from_value(json!({
            "name": "contacts.detail",
            "url": "/detail/:id",
            "data": { "title": "Detail" },
            "views": { "summary": { "template": "summary.html" } },
            "abstract": false,
        }))
        .unwrap();

        assert_eq!(decl.name.unwrap(), "contacts.detail");
        assert!(matches!(decl.url, Some(UrlDecl::Pattern(p)) if p == "/detail/:id"));
        assert_eq!(decl.data["title"], json!("Detail"));
        assert_eq!(decl.views.unwrap().len(), 1);
        assert!(!decl.is_abstract);
    }

    #[test]
    fn test_from_value_rejects_non_string_name() {
        let err = StateDeclaration::from_value(json!({ "name": 42 })).unwrap_err();
        assert!(matches!(err, StateError::InvalidName { .. }));
    }

    #[test]
    fn test_from_value_rejects_scalar_params() {
        let err = StateDeclaration::from_value(json!({
            "name": "a",
            "params": "id",
        }))
        .unwrap_err();
        assert!(matches!(err, StateError::InvalidParams { state, .. } if state == "a"));
    }

    #[test]
    fn test_from_value_rejects_non_string_url() {
        let err = StateDeclaration::from_value(json!({
            "name": "a",
            "url": ["/a"],
        }))
        .unwrap_err();
        assert!(matches!(err, StateError::InvalidUrl { state, .. } if state == "a"));
    }

    #[test]
    fn test_builder_chain() {
        let decl = StateDeclaration::named("a.b")
            .with_parent("a")
            .with_url("/b")
            .with_data("flag", json!(true))
            .with_view("panel", json!({ "template": "panel.html" }));

        assert_eq!(decl.name.unwrap(), "a.b");
        assert_eq!(decl.parent.unwrap(), "a");
        assert_eq!(decl.views.unwrap().len(), 1);
    }
}
