//! End-to-end resolution of a realistic state tree.
//!
//! Declarations arrive out of order, partly from loose JSON config, and
//! the resolved tree is queried the way a transition engine would.

use std::sync::Arc;

use serde_json::json;

use trellis_states::{
    MatcherError, Registration, StateDeclaration, StateName, StateRef, StateRegistry, UrlMatcher,
    UrlMatcherCompiler,
};

/// Minimal path matcher: keeps the pattern, captures `:name` segments,
/// concatenates by string append.
#[derive(Debug)]
struct PathMatcher {
    pattern: String,
}

impl UrlMatcher for PathMatcher {
    fn pattern(&self) -> &str {
        &self.pattern
    }

    fn parameters(&self) -> Vec<String> {
        self.pattern
            .split('/')
            .filter_map(|seg| seg.strip_prefix(':'))
            .map(String::from)
            .collect()
    }

    fn concat(&self, suffix: &str) -> Result<Arc<dyn UrlMatcher>, MatcherError> {
        Ok(Arc::new(PathMatcher {
            pattern: format!("{}{}", self.pattern, suffix),
        }))
    }
}

#[derive(Debug)]
struct PathCompiler;

impl UrlMatcherCompiler for PathCompiler {
    fn compile(&self, pattern: &str) -> Result<Arc<dyn UrlMatcher>, MatcherError> {
        Ok(Arc::new(PathMatcher {
            pattern: pattern.to_string(),
        }))
    }
}

fn app_registry() -> StateRegistry {
    let mut registry = StateRegistry::new(Box::new(PathCompiler)).unwrap();

    // Children first: everything below `contacts` is parked until the
    // parent declaration arrives.
    registry
        .state(
            "contacts.detail.address",
            StateDeclaration::new().with_url("/address/:index"),
        )
        .unwrap();
    registry
        .state(
            "contacts.detail",
            StateDeclaration::new()
                .with_url("/:contact_id")
                .with_data("title", json!("Detail")),
        )
        .unwrap();

    let from_config = StateDeclaration::from_value(json!({
        "name": "contacts",
        "url": "/contacts",
        "data": { "title": "Contacts", "section": "people" },
        "views": { "sidebar": { "template": "sidebar.html" } },
    }))
    .unwrap();
    registry.register(from_config).unwrap();

    registry
        .state("about", StateDeclaration::new().with_url("/about"))
        .unwrap();
    registry
}

#[test]
fn test_out_of_order_tree_is_fully_resolved() {
    let registry = app_registry();
    assert_eq!(registry.len(), 5); // root + 4 states
    assert!(registry.pending().next().is_none());

    let address = registry
        .get(&StateName::from("contacts.detail.address"))
        .unwrap();
    assert_eq!(
        address.url.as_ref().unwrap().pattern(),
        "/contacts/:contact_id/address/:index"
    );
    assert_eq!(
        address.params,
        vec!["contact_id".to_string(), "index".to_string()]
    );
    assert_eq!(
        address.path,
        vec![
            StateName::from("contacts"),
            StateName::from("contacts.detail"),
            StateName::from("contacts.detail.address"),
        ]
    );
}

#[test]
fn test_inherited_data_and_views() {
    let registry = app_registry();

    let detail = registry.get(&StateName::from("contacts.detail")).unwrap();
    assert_eq!(detail.data["section"], json!("people"));
    assert_eq!(detail.data["title"], json!("Detail"));

    let contacts = registry.get(&StateName::from("contacts")).unwrap();
    assert!(contacts.views.contains_key("sidebar@"));
}

#[test]
fn test_activation_order_queries() {
    let registry = app_registry();
    let address = registry
        .get(&StateName::from("contacts.detail.address"))
        .unwrap();

    // The transition engine walks `path` and checks membership through
    // `includes`, exactly what these fields exist for.
    assert!(address.is_descendant_of(&StateName::from("contacts")));
    assert!(!address.is_descendant_of(&StateName::from("about")));
    for ancestor in &address.path {
        assert!(registry.contains(ancestor));
    }
}

#[test]
fn test_relative_lookup_from_detail() {
    let registry = app_registry();
    let base = StateName::from("contacts.detail");

    let address = registry
        .find_state(&StateRef::from(".address"), Some(&base))
        .unwrap()
        .unwrap();
    assert_eq!(address.name, "contacts.detail.address");

    let contacts = registry
        .find_state(&StateRef::from("^"), Some(&base))
        .unwrap()
        .unwrap();
    assert_eq!(contacts.name, "contacts");
}

#[test]
fn test_registration_outcomes() {
    let mut registry = StateRegistry::new(Box::new(PathCompiler)).unwrap();

    let deferred = registry
        .state("missing.child", StateDeclaration::new())
        .unwrap();
    assert!(matches!(deferred, Registration::Deferred));

    let resolved = registry.state("present", StateDeclaration::new()).unwrap();
    assert!(matches!(resolved, Registration::Resolved(_)));

    let awaited: Vec<_> = registry.pending().cloned().collect();
    assert_eq!(awaited, vec![StateName::from("missing")]);
}
