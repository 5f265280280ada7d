//! Test doubles for the URL matcher collaborator.
//!
//! The stub keeps the whole pattern as a string; parameters are the
//! `:name` segments and concatenation is string append. Enough structure
//! for the resolver tests without pulling in a real matcher.

use std::sync::Arc;

use crate::matcher::{MatcherError, UrlMatcher, UrlMatcherCompiler};

#[derive(Debug)]
pub(crate) struct StubMatcher {
    pattern: String,
}

impl StubMatcher {
    pub(crate) fn compiled(pattern: &str) -> Arc<dyn UrlMatcher> {
        Arc::new(Self {
            pattern: pattern.to_string(),
        })
    }
}

impl UrlMatcher for StubMatcher {
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
        Ok(StubMatcher::compiled(&format!("{}{}", self.pattern, suffix)))
    }
}

#[derive(Debug)]
pub(crate) struct StubCompiler;

impl UrlMatcherCompiler for StubCompiler {
    fn compile(&self, pattern: &str) -> Result<Arc<dyn UrlMatcher>, MatcherError> {
        Ok(StubMatcher::compiled(pattern))
    }
}

/// Compiler that rejects every pattern, for invalid-url paths.
#[derive(Debug)]
pub(crate) struct RejectingCompiler;

impl UrlMatcherCompiler for RejectingCompiler {
    fn compile(&self, pattern: &str) -> Result<Arc<dyn UrlMatcher>, MatcherError> {
        Err(MatcherError(format!("unsupported pattern: {pattern:?}")))
    }
}
