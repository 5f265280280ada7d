// Allow unwrap in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]

//! Hierarchical state definition resolver
//!
//! This crate turns a flat stream of state declarations into a fully
//! resolved tree of state records. Declarations may arrive in any order;
//! a child declared before its parent is parked until the parent shows
//! up, at which point the whole waiting subtree is resolved.
//!
//! # Architecture
//!
//! - [`declaration`] - immutable input declarations and loose-config ingestion
//! - [`matcher`] - the URL matcher collaborator traits
//! - [`resolve`] - relative name resolution, the field resolution pipeline,
//!   and the pending-registration queue
//! - [`registry`] - the name-to-record map and the `register`/`find_state`
//!   surface
//! - [`state`] - the resolved, immutable state record
//!
//! # Example
//!
//! ```ignore
//! let mut registry = StateRegistry::new(Box::new(compiler))?;
//! registry.state("contacts", StateDeclaration::new().with_url("/contacts"))?;
//! registry.state("contacts.detail", StateDeclaration::new().with_url("/:id"))?;
//! let detail = registry.get(&"contacts.detail".into()).unwrap();
//! assert!(detail.is_descendant_of(&"contacts".into()));
//! ```

pub mod declaration;
pub mod error;
pub mod matcher;
pub mod registry;
pub mod resolve;
pub mod state;

#[cfg(test)]
pub(crate) mod testing;

pub use declaration::{StateDeclaration, UrlDecl};
pub use error::{Result, StateError};
pub use matcher::{MatcherError, UrlMatcher, UrlMatcherCompiler};
pub use registry::{Registration, StateRef, StateRegistry};
pub use state::{StateRecord, ViewTarget};
pub use trellis_foundation::StateName;
