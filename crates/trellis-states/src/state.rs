//! Resolved state records
//!
//! A [`StateRecord`] is produced once by the field resolution pipeline,
//! stored in the registry, and never mutated afterwards. Links to other
//! states (`parent`, `navigable`, `path`) are non-owning [`StateName`]
//! keys into the registry, so records cannot form reference cycles.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::Value;

use crate::matcher::UrlMatcher;
use trellis_foundation::StateName;

/// The value bound to an absolute view-slot name.
#[derive(Debug, Clone)]
pub enum ViewTarget {
    /// Synthesized unnamed slot pointing back at the declaring state.
    State(StateName),
    /// Explicit view configuration from the declaration.
    Config(Value),
}

/// A fully resolved state.
///
/// Every field is derived by the resolution pipeline from the declaration
/// and the (already resolved) parent record:
///
/// - `url` is the compiled matcher, absolute or concatenated onto the
///   nearest navigable ancestor
/// - `data` is the *effective* data: the parent's effective data overlaid
///   by the state's own entries
/// - `params` is always a superset of the parent's `params`;
///   `own_params` is the part this state introduced
/// - `views` is keyed by absolute slot name (`view@state`)
/// - `navigable` names the nearest ancestor-or-self carrying a URL
/// - `path` lists the ancestors from below the root down to this state
/// - `includes` answers ancestor-or-self membership in O(1)
#[derive(Debug, Clone)]
pub struct StateRecord {
    pub name: StateName,
    /// None only for the root.
    pub parent: Option<StateName>,
    pub url: Option<Arc<dyn UrlMatcher>>,
    pub data: HashMap<String, Value>,
    pub params: Vec<String>,
    pub own_params: Vec<String>,
    pub views: IndexMap<String, ViewTarget>,
    pub navigable: Option<StateName>,
    pub path: Vec<StateName>,
    pub includes: HashSet<StateName>,
    pub is_abstract: bool,
}

impl StateRecord {
    /// Whether `name` is this state or one of its ancestors.
    pub fn is_descendant_of(&self, name: &StateName) -> bool {
        self.includes.contains(name)
    }

    /// Depth below the root; the root itself is at depth zero.
    pub fn depth(&self) -> usize {
        self.path.len()
    }
}
