//! State name representation
//!
//! State names are dot-separated identifiers forming a hierarchy:
//! - `contacts`
//! - `contacts.detail`
//! - `contacts.detail.item`
//!
//! The empty name is reserved for the synthetic root of the tree. A name
//! starting with `.` or `^` is a *relative* reference and only becomes a
//! real name once resolved against a base state.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The dot-delimited name of a state in the hierarchy.
///
/// Names are immutable and support cheap comparison and hashing. They are
/// used as keys in the state registry and carried in resolved records as
/// non-owning links between states.
///
/// # Examples
///
/// ```
/// # use trellis_foundation::StateName;
/// let name = StateName::from("contacts.detail");
/// assert_eq!(name.leaf(), Some("detail"));
/// assert_eq!(name.parent(), Some(StateName::from("contacts")));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StateName(String);

impl StateName {
    /// The name of the synthetic root state.
    pub fn root() -> Self {
        Self(String::new())
    }

    /// View the name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this is the root name (the empty string).
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether the name is a relative reference (`.` or `^` prefixed).
    ///
    /// Relative references are not names of registered states; they must
    /// be resolved against a base state first.
    pub fn is_relative(&self) -> bool {
        self.0.starts_with('.') || self.0.starts_with('^')
    }

    /// The dot-separated segments of the name. Empty for the root.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('.').filter(|s| !s.is_empty())
    }

    /// The last segment of the name.
    ///
    /// Returns None for the root.
    pub fn leaf(&self) -> Option<&str> {
        if self.is_root() {
            None
        } else {
            Some(self.0.rsplit('.').next().unwrap_or(&self.0))
        }
    }

    /// The implicit parent name: everything before the last dot.
    ///
    /// A single-segment name has the root as its parent. The root itself
    /// has no parent.
    pub fn parent(&self) -> Option<Self> {
        if self.is_root() {
            return None;
        }
        match self.0.rfind('.') {
            Some(idx) => Some(Self(self.0[..idx].to_string())),
            None => Some(Self::root()),
        }
    }

    /// Extend the name with a child segment.
    pub fn child(&self, segment: &str) -> Self {
        if self.is_root() {
            Self(segment.to_string())
        } else {
            Self(format!("{}.{}", self.0, segment))
        }
    }

    /// Join a resolved remainder onto this name.
    ///
    /// A separating dot is inserted only when both sides are non-empty,
    /// so joining onto the root never produces a leading dot.
    pub fn join(&self, remainder: &str) -> Self {
        if self.0.is_empty() || remainder.is_empty() {
            Self(format!("{}{}", self.0, remainder))
        } else {
            Self(format!("{}.{}", self.0, remainder))
        }
    }
}

impl fmt::Display for StateName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for StateName {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for StateName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl PartialEq<&str> for StateName {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}
