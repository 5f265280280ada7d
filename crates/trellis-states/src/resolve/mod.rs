//! Resolution machinery
//!
//! Three pieces turn declarations into resolved records:
//!
//! - [`names`] - the relative-reference mini-language (`.` / `^`)
//! - [`queue`] - parking for declarations whose parent has not arrived
//! - [`pipeline`] - the ordered field derivation rules

pub mod names;
pub mod pipeline;
pub mod queue;
