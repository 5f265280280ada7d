//! State registry
//!
//! The registry owns the resolved tree: a map from absolute name to
//! resolved record, the pending queue for forward references, and the
//! URL matcher compiler. It is built up once at configuration time and
//! read-only afterwards; records are never mutated once stored.

use std::sync::Arc;

use indexmap::IndexMap;
use tracing::{debug, trace};

use crate::declaration::StateDeclaration;
use crate::error::{Result, StateError};
use crate::matcher::UrlMatcherCompiler;
use crate::resolve::names::resolve_reference;
use crate::resolve::pipeline::{resolve_record, PipelineCtx};
use crate::resolve::queue::PendingQueue;
use crate::state::StateRecord;
use trellis_foundation::StateName;

/// Outcome of a registration call.
///
/// A deferred registration is not an error: the declaration named a
/// parent that has not arrived yet and was parked until it does.
#[derive(Debug, Clone)]
pub enum Registration {
    /// The declaration resolved into a stored record.
    Resolved(Arc<StateRecord>),
    /// The declaration is parked until its parent is registered.
    Deferred,
}

/// A state reference accepted by [`StateRegistry::find_state`].
#[derive(Debug, Clone)]
pub enum StateRef {
    /// A state name, absolute or relative (`.` / `^` prefixed).
    Name(String),
    /// A previously resolved record; matches only the identical record.
    Record(Arc<StateRecord>),
}

impl From<&str> for StateRef {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

/// The mapping from absolute state name to resolved record.
#[derive(Debug)]
pub struct StateRegistry {
    states: IndexMap<StateName, Arc<StateRecord>>,
    queue: PendingQueue,
    compiler: Box<dyn UrlMatcherCompiler>,
}

impl StateRegistry {
    /// Build a registry holding only the synthetic root.
    ///
    /// The root has the empty name, an absolute URL of `^` (compiled as
    /// the empty pattern), no views, and is abstract. Although it carries
    /// a URL, its `navigable` is cleared: the root must never be treated
    /// as a navigable target, only as the base for relative URL
    /// concatenation.
    pub fn new(compiler: Box<dyn UrlMatcherCompiler>) -> Result<Self> {
        let root_name = StateName::root();
        let url = compiler.compile("").map_err(|e| StateError::InvalidUrl {
            state: root_name.as_str().to_string(),
            reason: e.to_string(),
        })?;

        let root = StateRecord {
            name: root_name.clone(),
            parent: None,
            params: url.parameters(),
            own_params: url.parameters(),
            url: Some(url),
            data: Default::default(),
            views: Default::default(),
            navigable: None,
            path: Vec::new(),
            includes: std::iter::once(root_name.clone()).collect(),
            is_abstract: true,
        };

        let mut states = IndexMap::new();
        states.insert(root_name, Arc::new(root));
        Ok(Self {
            states,
            queue: PendingQueue::default(),
            compiler,
        })
    }

    /// Register a declaration under a positionally supplied name.
    ///
    /// The positional name overrides any name set on the declaration,
    /// mirroring the `state(name, definition)` entry point.
    pub fn state(
        &mut self,
        name: impl Into<StateName>,
        mut decl: StateDeclaration,
    ) -> Result<Registration> {
        decl.name = Some(name.into());
        self.register(decl)
    }

    /// Register a declaration.
    ///
    /// If the declaration's parent is already resolved, the field
    /// resolution pipeline runs and the record is stored; every
    /// declaration parked under the new name is then registered the same
    /// way, recursively, in the order it arrived. If the parent is
    /// missing, the declaration is parked and `Deferred` is returned.
    pub fn register(&mut self, decl: StateDeclaration) -> Result<Registration> {
        let name = self.validated_name(&decl)?;
        let parent_name = intended_parent(&decl, &name);

        let Some(parent) = self.states.get(&parent_name).cloned() else {
            debug!(state = %name, awaiting = %parent_name, "parking declaration");
            self.queue.park(parent_name, decl);
            return Ok(Registration::Deferred);
        };

        let ctx = PipelineCtx {
            states: &self.states,
            compiler: self.compiler.as_ref(),
        };
        let record = Arc::new(resolve_record(&decl, name.clone(), &parent, &ctx)?);
        self.states.insert(name.clone(), Arc::clone(&record));
        debug!(state = %name, parent = %parent_name, "registered state");

        // Drained one at a time: if a queued declaration fails, its
        // siblings stay parked and visible through `pending()`.
        while let Some(queued) = self.queue.pop_child(&name) {
            trace!(parent = %name, "draining queued child");
            self.register(queued)?;
        }
        Ok(Registration::Resolved(record))
    }

    /// Look a state up by reference.
    ///
    /// A relative name reference requires a `base` state to resolve
    /// against. An unknown absolute name is not an error; it returns
    /// `Ok(None)` so callers can distinguish "not registered" from a
    /// malformed reference.
    pub fn find_state(
        &self,
        reference: &StateRef,
        base: Option<&StateName>,
    ) -> Result<Option<Arc<StateRecord>>> {
        let name = match reference {
            StateRef::Name(raw) => resolve_reference(raw, base, |anchor| {
                self.states.get(anchor).and_then(|r| r.parent.clone())
            })?,
            StateRef::Record(record) => record.name.clone(),
        };

        let found = self.states.get(&name);
        match (reference, found) {
            (StateRef::Name(_), found) => Ok(found.cloned()),
            (StateRef::Record(given), Some(found)) if Arc::ptr_eq(given, found) => {
                Ok(Some(Arc::clone(found)))
            }
            (StateRef::Record(_), _) => Ok(None),
        }
    }

    /// The synthetic root record.
    pub fn root(&self) -> &Arc<StateRecord> {
        &self.states[&StateName::root()]
    }

    /// Look a record up by absolute name.
    pub fn get(&self, name: &StateName) -> Option<&Arc<StateRecord>> {
        self.states.get(name)
    }

    /// Whether `name` is registered.
    pub fn contains(&self, name: &StateName) -> bool {
        self.states.contains_key(name)
    }

    /// All resolved records in registration order, root first.
    pub fn states(&self) -> impl Iterator<Item = &Arc<StateRecord>> {
        self.states.values()
    }

    /// Number of resolved records, counting the root.
    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Parent names that parked declarations are still waiting on.
    ///
    /// Non-empty after configuration means a state was declared whose
    /// parent never arrived, or whose resolution was cut short when an
    /// earlier sibling failed to register.
    pub fn pending(&self) -> impl Iterator<Item = &StateName> {
        self.queue.awaited_parents()
    }

    /// Validate the declared name: present, free of `@`, not taken.
    fn validated_name(&self, decl: &StateDeclaration) -> Result<StateName> {
        let Some(name) = &decl.name else {
            return Err(StateError::InvalidName {
                name: String::new(),
                reason: "declaration has no name",
            });
        };
        if name.as_str().contains('@') {
            return Err(StateError::InvalidName {
                name: name.as_str().to_string(),
                reason: "state names must not contain '@'",
            });
        }
        if self.states.contains_key(name) {
            return Err(StateError::DuplicateState(name.clone()));
        }
        Ok(name.clone())
    }
}

/// Rule 1 of the pipeline: the intended parent name. An explicit `parent`
/// field wins; otherwise the substring before the last dot; otherwise the
/// root.
fn intended_parent(decl: &StateDeclaration, name: &StateName) -> StateName {
    decl.parent
        .clone()
        .or_else(|| name.parent())
        .unwrap_or_else(StateName::root)
}
