//! URL matcher collaborator traits
//!
//! URL pattern compilation and matching live outside this crate. The
//! resolver only needs three things from a matcher implementation: compile
//! a pattern string, concatenate a relative suffix onto an existing
//! matcher, and report the parameter names a pattern captures.

use std::fmt;
use std::sync::Arc;

use thiserror::Error;

/// Failure reported by a matcher implementation.
///
/// The registry wraps these into [`crate::StateError::InvalidUrl`] naming
/// the offending state.
#[derive(Debug, Clone, Error)]
#[error("{0}")]
pub struct MatcherError(pub String);

/// A compiled URL pattern.
///
/// Matching a browser location against the pattern is downstream concern;
/// the resolver only reads the captured parameter names and builds longer
/// matchers by concatenation.
pub trait UrlMatcher: fmt::Debug + Send + Sync {
    /// The source pattern this matcher was compiled from.
    fn pattern(&self) -> &str;

    /// Parameter names captured by the pattern, in pattern order.
    fn parameters(&self) -> Vec<String>;

    /// Concatenate a relative suffix pattern onto this matcher.
    fn concat(&self, suffix: &str) -> std::result::Result<Arc<dyn UrlMatcher>, MatcherError>;
}

/// Compiles pattern strings into matchers.
///
/// The registry holds exactly one compiler for its lifetime; every
/// absolute URL declaration goes through it.
pub trait UrlMatcherCompiler: fmt::Debug + Send + Sync {
    /// Compile an absolute pattern string.
    fn compile(&self, pattern: &str) -> std::result::Result<Arc<dyn UrlMatcher>, MatcherError>;
}
