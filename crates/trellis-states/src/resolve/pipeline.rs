//! Field resolution pipeline
//!
//! Derives every attribute of a [`StateRecord`] from a declaration and
//! its already-resolved parent. The rules run in a fixed order because
//! later rules read earlier results on the same state:
//!
//! 1. parent      (resolved by the registry before the pipeline runs)
//! 2. data        - parent's effective data overlaid by own entries
//! 3. url         - compile absolute, concat relative, pass matchers through
//! 4. navigable   - self if it has a URL, else the parent's navigable
//! 5. params      - declared, else from the URL, else inherited
//! 6. views       - absolute slot names (`view@state`)
//! 7. own_params  - params minus the parent's params
//! 8. path        - parent's path plus self
//! 9. includes    - parent's includes plus own name
//!
//! Each rule is a pure function writing one field into the record under
//! construction; the parent record is complete, so a rule may read any
//! parent field.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::Value;

use crate::declaration::{StateDeclaration, UrlDecl};
use crate::error::{Result, StateError};
use crate::matcher::{UrlMatcher, UrlMatcherCompiler};
use crate::state::{StateRecord, ViewTarget};
use trellis_foundation::StateName;

/// Read access the url rule needs beyond the parent record: the compiler
/// and the records of navigable ancestors.
pub(crate) struct PipelineCtx<'a> {
    pub states: &'a IndexMap<StateName, Arc<StateRecord>>,
    pub compiler: &'a dyn UrlMatcherCompiler,
}

/// Run the pipeline over one declaration whose parent is resolved.
pub(crate) fn resolve_record(
    decl: &StateDeclaration,
    name: StateName,
    parent: &StateRecord,
    ctx: &PipelineCtx<'_>,
) -> Result<StateRecord> {
    let data = resolve_data(decl, parent);
    let url = resolve_url(decl, &name, parent, ctx)?;
    let navigable = resolve_navigable(url.is_some(), &name, parent);
    let params = resolve_params(decl, &name, url.as_deref(), parent)?;
    let views = resolve_views(decl, &name, parent);
    let own_params = resolve_own_params(&params, &name, parent)?;
    let path = resolve_path(&name, parent);
    let includes = resolve_includes(&name, parent);

    Ok(StateRecord {
        name,
        parent: Some(parent.name.clone()),
        url,
        data,
        params,
        own_params,
        views,
        navigable,
        path,
        includes,
        is_abstract: decl.is_abstract,
    })
}

/// Rule 2: shallow-merge the parent's effective data under the state's
/// own entries. Own entries win on conflicting keys.
fn resolve_data(decl: &StateDeclaration, parent: &StateRecord) -> HashMap<String, Value> {
    let mut data = parent.data.clone();
    for (key, value) in &decl.data {
        data.insert(key.clone(), value.clone());
    }
    data
}

/// Rule 3: compile or concatenate the declared URL.
///
/// A `^`-prefixed pattern is absolute; the remainder is compiled directly.
/// Any other pattern is concatenated onto the nearest navigable ancestor's
/// matcher, falling back to the root's matcher when no ancestor is
/// navigable. A pre-compiled matcher is used as is.
fn resolve_url(
    decl: &StateDeclaration,
    name: &StateName,
    parent: &StateRecord,
    ctx: &PipelineCtx<'_>,
) -> Result<Option<Arc<dyn UrlMatcher>>> {
    let Some(url) = &decl.url else {
        return Ok(None);
    };

    match url {
        UrlDecl::Matcher(matcher) => Ok(Some(Arc::clone(matcher))),
        UrlDecl::Pattern(pattern) => {
            let invalid = |reason: String| StateError::InvalidUrl {
                state: name.as_str().to_string(),
                reason,
            };
            if let Some(absolute) = pattern.strip_prefix('^') {
                let matcher = ctx
                    .compiler
                    .compile(absolute)
                    .map_err(|e| invalid(e.to_string()))?;
                return Ok(Some(matcher));
            }

            let base = navigable_matcher(parent, ctx).ok_or_else(|| {
                invalid("no navigable ancestor to concatenate a relative url onto".to_string())
            })?;
            let matcher = base.concat(pattern).map_err(|e| invalid(e.to_string()))?;
            Ok(Some(matcher))
        }
    }
}

/// The matcher a relative pattern concatenates onto: the parent's
/// navigable ancestor's, or the root's own matcher when nothing above is
/// navigable. The root compiles a URL at construction, so this only
/// returns None for a registry whose root was built without one.
fn navigable_matcher(parent: &StateRecord, ctx: &PipelineCtx<'_>) -> Option<Arc<dyn UrlMatcher>> {
    let base = match &parent.navigable {
        Some(nav) => ctx.states.get(nav)?,
        None => ctx.states.get(&StateName::root())?,
    };
    base.url.clone()
}

/// Rule 4: this state if it has a URL, else the parent's navigable.
fn resolve_navigable(
    has_url: bool,
    name: &StateName,
    parent: &StateRecord,
) -> Option<StateName> {
    if has_url {
        Some(name.clone())
    } else {
        parent.navigable.clone()
    }
}

/// Rule 5: declared params, else the URL's parameter names, else the
/// parent's params verbatim. Declaring both params and a URL is an error.
fn resolve_params(
    decl: &StateDeclaration,
    name: &StateName,
    url: Option<&dyn UrlMatcher>,
    parent: &StateRecord,
) -> Result<Vec<String>> {
    if let Some(params) = &decl.params {
        if decl.url.is_some() {
            return Err(StateError::ConflictingParamsAndUrl(name.clone()));
        }
        return Ok(params.clone());
    }
    match url {
        Some(matcher) => Ok(matcher.parameters()),
        None => Ok(parent.params.clone()),
    }
}

/// Rule 6: absolutize view-slot names.
///
/// No declared views synthesizes a single unnamed slot pointing at the
/// state itself. Any slot name lacking an `@` is suffixed with
/// `@<parent name>`.
fn resolve_views(
    decl: &StateDeclaration,
    name: &StateName,
    parent: &StateRecord,
) -> IndexMap<String, ViewTarget> {
    let mut views = IndexMap::new();
    let absolutize = |slot: &str| {
        if slot.contains('@') {
            slot.to_string()
        } else {
            format!("{}@{}", slot, parent.name)
        }
    };

    match &decl.views {
        None => {
            views.insert(absolutize(""), ViewTarget::State(name.clone()));
        }
        Some(declared) => {
            for (slot, config) in declared {
                views.insert(absolutize(slot), ViewTarget::Config(config.clone()));
            }
        }
    }
    views
}

/// Rule 7: params the state introduced itself. Every parameter the parent
/// requires must still be present.
fn resolve_own_params(
    params: &[String],
    name: &StateName,
    parent: &StateRecord,
) -> Result<Vec<String>> {
    for required in &parent.params {
        if !params.contains(required) {
            return Err(StateError::MissingRequiredParameter {
                state: name.clone(),
                param: required.clone(),
            });
        }
    }
    Ok(params
        .iter()
        .filter(|p| !parent.params.contains(p))
        .cloned()
        .collect())
}

/// Rule 8: parent's path with this state appended. The root is excluded
/// from every path.
fn resolve_path(name: &StateName, parent: &StateRecord) -> Vec<StateName> {
    let mut path = parent.path.clone();
    path.push(name.clone());
    path
}

/// Rule 9: parent's includes plus this state's own name.
fn resolve_includes(name: &StateName, parent: &StateRecord) -> HashSet<StateName> {
    let mut includes = parent.includes.clone();
    includes.insert(name.clone());
    includes
}
