//! Relative reference resolution
//!
//! A state reference starting with `.` or `^` is relative and resolves
//! against a base state:
//!
//! - a leading empty segment (the reference starts with `.`) anchors the
//!   walk at the base itself
//! - each leading `^` segment moves the anchor to its parent
//! - the remaining segments are appended to the anchor's name
//!
//! Examples, with base `a.b`:
//!
//! - `.child`      -> `a.b.child`
//! - `^`           -> `a`
//! - `^.sibling`   -> `a.sibling`
//! - `^.^.other`   -> `other`

use crate::error::{Result, StateError};
use trellis_foundation::StateName;

/// Resolve a possibly-relative reference to an absolute name.
///
/// `parent_of` reports the parent of an anchor state; it is only consulted
/// for `^` segments, so callers pass a closure over the registry. Absolute
/// references pass through untouched and never need a base.
///
/// # Errors
///
/// - [`StateError::NoReferencePoint`] if the reference is relative and no
///   base was given
/// - [`StateError::InvalidRelativePath`] if a `^` segment walks above the
///   root
pub fn resolve_reference<F>(
    reference: &str,
    base: Option<&StateName>,
    parent_of: F,
) -> Result<StateName>
where
    F: Fn(&StateName) -> Option<StateName>,
{
    let name = StateName::from(reference);
    if !name.is_relative() {
        return Ok(name);
    }

    let Some(base) = base else {
        return Err(StateError::NoReferencePoint(reference.to_string()));
    };

    let segments: Vec<&str> = reference.split('.').collect();
    let mut anchor = base.clone();
    let mut consumed = 0;

    for (i, segment) in segments.iter().enumerate() {
        if i == 0 && segment.is_empty() {
            consumed += 1;
            continue;
        }
        if *segment == "^" {
            anchor = parent_of(&anchor).ok_or_else(|| StateError::InvalidRelativePath {
                path: reference.to_string(),
                base: base.clone(),
            })?;
            consumed += 1;
            continue;
        }
        break;
    }

    let remainder = segments[consumed..].join(".");
    Ok(anchor.join(&remainder))
}
