//! Foundation types for the trellis state tree
//!
//! This crate holds the naming primitives shared by every trellis crate.
//! The central type is [`StateName`], the dot-delimited identifier of a
//! state in the hierarchy.

pub mod name;

pub use name::StateName;
